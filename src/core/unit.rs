//! # Unit: a labeled, gated body of work.
//!
//! A [`Unit`] pairs a human-assigned label with a [`Gate`]. Its body loops
//! forever: wait for the gate, perform one idle tick, repeat. The body has
//! no self-termination path — stopping a unit is always external, done by
//! the registry through the unit's execution context.

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;

use super::gate::Gate;

/// A named unit of concurrent execution, gated by a pause/resume signal.
pub struct Unit {
    label: Arc<str>,
    gate: Gate,
}

impl Unit {
    /// Creates a unit with an already-shared gate.
    pub fn new(label: impl Into<Arc<str>>, gate: Gate) -> Self {
        Self {
            label: label.into(),
            gate,
        }
    }

    /// Returns the unit's label.
    pub fn label(&self) -> &Arc<str> {
        &self.label
    }

    /// Consumes the unit into its body: an endless gated idle loop.
    ///
    /// Each iteration suspends until the gate is open, then sleeps one
    /// `tick`. The loop only ends when the execution context running it is
    /// force-stopped from outside.
    pub fn into_body(self, tick: Duration) -> BoxFuture<'static, ()> {
        async move {
            loop {
                self.gate.wait_until_open().await;
                tokio::time::sleep(tick).await;
            }
        }
        .boxed()
    }
}
