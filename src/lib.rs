//! # unitvisor
//!
//! **Unitvisor** is a runtime supervisor for named units of concurrent
//! execution. It creates, pauses, resumes, terminates, and enumerates two
//! kinds of units — **workers** (each on a dedicated OS thread with a
//! private runtime) and **threads** (lightweight tasks on the shared
//! runtime) — and exposes that control surface both as direct registry
//! calls and as an asynchronous, serialized command channel.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   Caller                        Caller
//!     │ direct calls                │ submit(Command)
//!     ▼                             ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Supervisor                                                       │
//! │  - Bus (broadcast events)                                         │
//! │  - SubscriberSet (fans out to user subscribers)                   │
//! │  - Dispatcher (single consumer of the FIFO command queue)         │
//! │  - worker Registry ── DedicatedExec (one OS thread per unit)      │
//! │  - thread Registry ── SharedExec (tasks on the shared runtime)    │
//! └──────┬──────────────────────┬─────────────────────────────────────┘
//!        ▼                      ▼
//!   ┌──────────┐          ┌──────────┐       every unit body:
//!   │  unit    │          │  unit    │       loop {
//!   │ (gated)  │   ...    │ (gated)  │           gate.wait_until_open()
//!   └────┬─────┘          └────┬─────┘           sleep(tick)
//!        │ publishes           │                }
//!        ▼                     ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                      Bus (broadcast channel)                      │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                          SubscriberSet workers
//!                        (LogWriter, custom sinks)
//! ```
//!
//! ### Lifecycle
//! ```text
//! create(label) ─► duplicate check ─► launch body ─► install id↔label maps
//! pause(ident)  ─► resolve (label first, raw handle second) ─► gate.close()
//! resume(ident) ─► same resolution ─► gate.open()
//! terminate(id) ─► remove from both maps ─► force-stop ─► bounded join
//! list()        ─► point-in-time snapshot of (id, label, status)
//! ```
//!
//! ## Features
//! | Area               | Description                                                  | Key types                                  |
//! |--------------------|--------------------------------------------------------------|--------------------------------------------|
//! | **Registries**     | Name ↔ handle maps with atomic create and forced terminate.  | [`Registry`], [`UnitSnapshot`]             |
//! | **Gate**           | Two-state pause/resume signal, blocking wait, no polling.    | [`Gate`]                                   |
//! | **Command channel**| Non-blocking FIFO submission, serialized execution.          | [`Command`], [`CommandHandle`]             |
//! | **Supervision**    | Signal handling and bounded teardown of all units.           | [`Supervisor`], [`Config`]                 |
//! | **Observability**  | Every outcome published as an event; pluggable sinks.        | [`Event`], [`Subscribe`], [`LogWriter`]    |
//! | **Errors**         | Typed, reported at the boundary, never fatal.                | [`RegistryError`], [`RuntimeError`]        |
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use unitvisor::{Command, Config, LogWriter, Subscribe, Supervisor, UnitKind};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
//!     let sup = Supervisor::builder(Config::default())
//!         .with_subscribers(subs)
//!         .build();
//!
//!     // Direct calls...
//!     sup.workers().create("w1").await?;
//!     sup.workers().pause("w1").await?;
//!
//!     // ...or the serialized command channel.
//!     let handle = sup.handle();
//!     handle.submit(Command::create(UnitKind::Thread, "t1"))?;
//!     handle.submit(Command::list(UnitKind::Thread))?;
//!     handle.submit(Command::exit())?;
//!
//!     sup.run().await?;
//!     Ok(())
//! }
//! ```

mod command;
mod core;
mod error;
mod events;
mod subscribers;

pub mod charfreq;

// ---- Public re-exports ----

pub use command::{Command, CommandHandle, Dispatcher, SubmitError};
pub use core::{
    Config, DedicatedExec, ExecContext, Gate, Launched, Registry, SharedExec, StopHandle,
    Supervisor, SupervisorBuilder, Unit, UnitId, UnitKind, UnitSnapshot, UnitStatus,
};
pub use error::{RegistryError, RuntimeError};
pub use events::{Bus, Event, EventKind};
pub use subscribers::{LogWriter, Subscribe, SubscriberSet};
