//! # Direct Control Example
//!
//! Drives both registries through direct calls while the supervisor runs:
//! create, pause by label, resume by raw handle, list, terminate.
//!
//! ## Run
//! ```bash
//! cargo run --example control
//! ```

use std::sync::Arc;
use std::time::Duration;

use unitvisor::{Command, Config, LogWriter, Subscribe, Supervisor};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let sup = Supervisor::builder(Config::default())
        .with_subscribers(subs)
        .build();

    let runner = Arc::clone(&sup);
    let running = tokio::spawn(async move { runner.run().await });
    tokio::time::sleep(Duration::from_millis(50)).await;

    // ============================================================
    // Demo 1: create one unit of each kind
    // ============================================================
    println!(" ─► Creating 'worker-A' and 'thread-A'...");

    let worker_id = sup.workers().create("worker-A").await?;
    sup.threads().create("thread-A").await?;
    tokio::time::sleep(Duration::from_millis(200)).await;

    // ============================================================
    // Demo 2: pause by label, resume by raw handle
    // ============================================================
    println!(" ─► Pausing 'worker-A' by label...");
    sup.workers().pause("worker-A").await?;
    tokio::time::sleep(Duration::from_millis(200)).await;

    println!(" ─► Resuming it by raw handle {worker_id}...");
    sup.workers().resume(&worker_id.to_string()).await?;

    // ============================================================
    // Demo 3: snapshot both registries
    // ============================================================
    for row in sup.workers().list().await {
        println!(" ─► worker id={} label={:?} status={}", row.id, row.label, row.status);
    }
    for row in sup.threads().list().await {
        println!(" ─► thread id={} label={:?} status={}", row.id, row.label, row.status);
    }

    // ============================================================
    // Demo 4: terminate, then stop the supervisor
    // ============================================================
    println!(" ─► Terminating 'worker-A'...");
    sup.workers().terminate("worker-A").await?;

    println!(" ─► Submitting the exit sentinel ('thread-A' drains on teardown)...");
    sup.submit(Command::exit())?;
    running.await??;
    Ok(())
}
