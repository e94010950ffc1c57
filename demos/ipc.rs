//! # IPC Examples
//!
//! Three one-shot demonstrations of communication between concurrent
//! units, outside any supervision:
//! - shared state behind a lock, appended to by two tasks;
//! - queue-based producer/consumer across shared-runtime tasks;
//! - queue-based producer/consumer across dedicated OS threads.
//!
//! ## Run
//! ```bash
//! cargo run --example ipc
//! ```

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::sync::mpsc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    println!("Shared state between tasks");
    let started = Instant::now();
    shared_state_roundtrip().await?;
    println!("elapsed: {:?}\n", started.elapsed());

    println!("Message passing between tasks");
    let started = Instant::now();
    message_passing_tasks().await?;
    println!("elapsed: {:?}\n", started.elapsed());

    println!("Message passing between dedicated threads");
    let started = Instant::now();
    message_passing_threads()?;
    println!("elapsed: {:?}", started.elapsed());
    Ok(())
}

/// Two tasks append to one vector behind a lock; the result is printed
/// once both finish.
async fn shared_state_roundtrip() -> anyhow::Result<()> {
    let shared: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

    let mut joins = Vec::new();
    for index in 0..2 {
        let shared = Arc::clone(&shared);
        joins.push(tokio::spawn(async move {
            for i in 0..5 {
                if let Ok(mut data) = shared.lock() {
                    data.push(format!("Data from task-{index}: {i}"));
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        }));
    }
    for join in joins {
        join.await?;
    }

    let data = shared
        .lock()
        .map_err(|_| anyhow::anyhow!("shared state lock poisoned"))?;
    println!("{:?}", *data);
    Ok(())
}

/// Producer/consumer over an mpsc channel; dropping the sender ends the
/// stream.
async fn message_passing_tasks() -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::channel::<String>(8);

    let producer = tokio::spawn(async move {
        for i in 0..10 {
            let _ = tx.send(format!("Message {i}")).await;
        }
    });
    let consumer = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            println!("Received: {message}");
        }
    });

    producer.await?;
    consumer.await?;
    Ok(())
}

/// The same roundtrip across OS threads with a std channel.
fn message_passing_threads() -> anyhow::Result<()> {
    let (tx, rx) = std::sync::mpsc::channel::<String>();

    let producer = std::thread::spawn(move || {
        for i in 0..10 {
            let _ = tx.send(format!("Message {i}"));
        }
    });
    let consumer = std::thread::spawn(move || {
        while let Ok(message) = rx.recv() {
            println!("Received: {message}");
        }
    });

    producer
        .join()
        .map_err(|_| anyhow::anyhow!("producer panicked"))?;
    consumer
        .join()
        .map_err(|_| anyhow::anyhow!("consumer panicked"))?;
    Ok(())
}
