//! # Execution contexts: where unit bodies run.
//!
//! Both registries drive the same gated body (see [`super::unit`]); they
//! differ only in the execution context that mounts it:
//!
//! - [`DedicatedExec`] — each unit gets its own OS thread driving a private
//!   single-threaded runtime (the **worker** kind: isolated stack and
//!   scheduler loop, kernel preemption).
//! - [`SharedExec`] — each unit runs as a lightweight task on the ambient
//!   runtime (the **thread** kind: shared scheduler, shared threads).
//!
//! ## Handles
//! Launching returns the runtime-assigned id of the body task
//! ([`tokio::task::Id`], unique among live tasks) — the registry never
//! mints identifiers — plus a [`StopHandle`] that can force-stop the body
//! and wait, bounded, for the vehicle to fully exit.
//!
//! ## Rules
//! - Stopping is forced: the body is aborted at its next suspension point.
//!   Units observe no cancellation signal and have no cooperative stop.
//! - `StopHandle::join` never waits longer than its grace; a vehicle that
//!   outlives it is reported by the caller, not waited on.

use std::fmt;
use std::io;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::BoxFuture;
use tokio::task::{AbortHandle, JoinHandle};

/// Runtime-assigned identifier of a live unit.
///
/// Wraps the body task's [`tokio::task::Id`]. Renders as a plain integer,
/// which is the form accepted back by the registries' raw-handle
/// resolution.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct UnitId(tokio::task::Id);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The two kinds of supervised units.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum UnitKind {
    /// Heavyweight unit on a dedicated OS thread with a private runtime.
    Worker,
    /// Lightweight unit multiplexed onto the shared runtime.
    Thread,
}

impl UnitKind {
    /// Stable lowercase name, as used in command routing and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitKind::Worker => "worker",
            UnitKind::Thread => "thread",
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit started under an [`ExecContext`]: its runtime-assigned id plus
/// the handle used to stop and join it.
pub struct Launched {
    /// Runtime-assigned handle of the body task.
    pub id: UnitId,
    /// Force-stop + bounded-join handle for the vehicle.
    pub stop: Box<dyn StopHandle>,
}

/// Constructs the execution context for a unit body.
///
/// The capability seam between the shared registry implementation and the
/// two unit kinds: implementations differ only in how they mount the body.
pub trait ExecContext: Send + Sync + 'static {
    /// The kind of unit this context produces.
    fn kind(&self) -> UnitKind;

    /// Starts `body` under this context.
    ///
    /// On error nothing keeps running: a half-constructed context tears
    /// itself down with the returned error.
    fn launch(&self, label: &str, body: BoxFuture<'static, ()>) -> io::Result<Launched>;
}

/// Force-stop and bounded-join for one launched unit.
#[async_trait]
pub trait StopHandle: Send + Sync {
    /// Forcibly stops the body at its next suspension point.
    fn force_stop(&mut self);

    /// Waits up to `grace` for the vehicle to fully exit.
    ///
    /// Returns `false` when the grace elapsed first; the vehicle is then
    /// left to finish on its own and the caller reports it.
    async fn join(self: Box<Self>, grace: Duration) -> bool;
}

/// Dedicated-thread execution: one OS thread per unit, driving a private
/// current-thread runtime.
pub struct DedicatedExec;

impl ExecContext for DedicatedExec {
    fn kind(&self) -> UnitKind {
        UnitKind::Worker
    }

    fn launch(&self, label: &str, body: BoxFuture<'static, ()>) -> io::Result<Launched> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()?;
        let join = rt.spawn(body);
        let id = UnitId(join.id());
        let abort = join.abort_handle();

        let thread = std::thread::Builder::new()
            .name(label.to_string())
            .spawn(move || {
                // Drives the body until it is aborted; the runtime dies
                // with the thread.
                let _ = rt.block_on(join);
            })?;

        Ok(Launched {
            id,
            stop: Box::new(DedicatedStop {
                abort,
                thread: Some(thread),
            }),
        })
    }
}

struct DedicatedStop {
    abort: AbortHandle,
    thread: Option<std::thread::JoinHandle<()>>,
}

#[async_trait]
impl StopHandle for DedicatedStop {
    fn force_stop(&mut self) {
        self.abort.abort();
    }

    async fn join(mut self: Box<Self>, grace: Duration) -> bool {
        let Some(thread) = self.thread.take() else {
            return true;
        };
        let joined = tokio::task::spawn_blocking(move || {
            let _ = thread.join();
        });
        tokio::time::timeout(grace, joined).await.is_ok()
    }
}

/// Shared-runtime execution: each unit is a task on the ambient runtime.
pub struct SharedExec;

impl ExecContext for SharedExec {
    fn kind(&self) -> UnitKind {
        UnitKind::Thread
    }

    fn launch(&self, _label: &str, body: BoxFuture<'static, ()>) -> io::Result<Launched> {
        let join = tokio::spawn(body);
        let id = UnitId(join.id());
        Ok(Launched {
            id,
            stop: Box::new(SharedStop { join: Some(join) }),
        })
    }
}

struct SharedStop {
    join: Option<JoinHandle<()>>,
}

#[async_trait]
impl StopHandle for SharedStop {
    fn force_stop(&mut self) {
        if let Some(join) = &self.join {
            join.abort();
        }
    }

    async fn join(mut self: Box<Self>, grace: Duration) -> bool {
        let Some(join) = self.join.take() else {
            return true;
        };
        tokio::time::timeout(grace, async move {
            let _ = join.await;
        })
        .await
        .is_ok()
    }
}
