//! # Command Channel Example
//!
//! Drives the whole unit lifecycle through the serialized command channel,
//! including a malformed command (rejected with a report) and an
//! unroutable one (dropped silently).
//!
//! ## Run
//! ```bash
//! cargo run --example commands
//! ```

use std::sync::Arc;
use std::time::Duration;

use unitvisor::{Command, Config, LogWriter, Subscribe, Supervisor, UnitKind};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let mut cfg = Config::default();
    cfg.command_pause = Duration::from_millis(100);

    let sup = Supervisor::builder(cfg).with_subscribers(subs).build();
    let handle = sup.handle();

    // The queue preserves this order; the dispatcher executes one command
    // at a time once run() starts.
    handle.submit(Command::create(UnitKind::Worker, "w1"))?;
    handle.submit(Command::create(UnitKind::Thread, "t1"))?;
    handle.submit(Command::pause(UnitKind::Worker, "w1"))?;
    handle.submit(Command::list(UnitKind::Worker))?;
    handle.submit(Command::resume(UnitKind::Worker, "w1"))?;

    // Malformed: fewer than two fields — rejected with a log line.
    handle.submit(Command::new(["create"]))?;
    // Unroutable: unknown unit kind — dropped without comment.
    handle.submit(Command::new(["create", "gizmo", "g1"]))?;

    handle.submit(Command::terminate(UnitKind::Worker, "w1"))?;
    handle.submit(Command::list(UnitKind::Worker))?;
    handle.submit(Command::exit())?;

    sup.run().await?;
    println!(" ─► Dispatcher stopped; all units drained.");
    Ok(())
}
