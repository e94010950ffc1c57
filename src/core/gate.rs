//! # Gate: the two-state pause/resume signal.
//!
//! A [`Gate`] is either **open** (the unit runs) or **closed** (the unit is
//! paused). Unit bodies call [`Gate::wait_until_open`], which suspends on a
//! watch channel until the gate opens — a true wait, never a spin loop.
//!
//! ## Rules
//! - A gate starts **open**.
//! - `open`/`close` are idempotent and may be called from any context.
//! - Cloning a gate shares the same state; the registry and the unit body
//!   hold clones of one gate.
//! - The gate is independent of the execution context the waiter runs in:
//!   both registry variants signal through the same implementation.

use tokio::sync::watch;

/// Two-state signal gating a unit's loop: open = running, closed = paused.
#[derive(Clone, Debug)]
pub struct Gate {
    tx: std::sync::Arc<watch::Sender<bool>>,
}

impl Gate {
    /// Creates a gate in the open state.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(true);
        Self {
            tx: std::sync::Arc::new(tx),
        }
    }

    /// Opens the gate, waking every suspended waiter.
    pub fn open(&self) {
        self.tx.send_replace(true);
    }

    /// Closes the gate; subsequent waits suspend until it reopens.
    pub fn close(&self) {
        self.tx.send_replace(false);
    }

    /// Returns the state at the instant of the call.
    pub fn is_open(&self) -> bool {
        *self.tx.borrow()
    }

    /// Suspends until the gate is open.
    ///
    /// Resolves immediately when the gate is already open. Waiters park on
    /// the watch channel; closing and reopening the gate while nobody waits
    /// loses nothing.
    pub async fn wait_until_open(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in self, so the channel cannot close here.
        let _ = rx.wait_for(|open| *open).await;
    }
}

impl Default for Gate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_gate_starts_open() {
        let gate = Gate::new();
        assert!(gate.is_open());
        // An open gate never blocks the waiter.
        timeout(Duration::from_millis(50), gate.wait_until_open())
            .await
            .expect("open gate should not block");
    }

    #[tokio::test]
    async fn test_closed_gate_blocks_until_opened() {
        let gate = Gate::new();
        gate.close();
        assert!(!gate.is_open());

        let waited = timeout(Duration::from_millis(50), gate.wait_until_open()).await;
        assert!(waited.is_err(), "closed gate must suspend the waiter");

        let waiter = {
            let gate = gate.clone();
            tokio::spawn(async move { gate.wait_until_open().await })
        };
        gate.open();
        timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should wake after open")
            .expect("waiter task should not panic");
    }

    #[tokio::test]
    async fn test_open_close_round_trips() {
        let gate = Gate::new();
        for _ in 0..3 {
            gate.close();
            assert!(!gate.is_open());
            gate.open();
            assert!(gate.is_open());
        }
    }
}
