//! Runtime core: units, registries, and the supervisor.
//!
//! Internal modules:
//! - [`gate`]: the two-state pause/resume signal;
//! - [`unit`]: the labeled, gated unit body;
//! - [`exec`]: execution contexts mounting unit bodies (dedicated thread
//!   vs shared runtime) and the force-stop/join seam;
//! - [`registry`]: the name ↔ handle maps and lifecycle operations;
//! - [`supervisor`]: orchestration, signal handling, bounded teardown;
//! - [`shutdown`]: cross-platform shutdown signal handling.

mod builder;
mod config;
mod exec;
mod gate;
mod registry;
mod shutdown;
mod supervisor;
mod unit;

pub use builder::SupervisorBuilder;
pub use config::Config;
pub use exec::{DedicatedExec, ExecContext, Launched, SharedExec, StopHandle, UnitId, UnitKind};
pub use gate::Gate;
pub use registry::{Registry, UnitSnapshot, UnitStatus};
pub use supervisor::Supervisor;
pub use unit::Unit;
