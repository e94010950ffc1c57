//! # Command dispatcher: the single consumer of the FIFO command queue.
//!
//! Commands are submitted from any context through a [`CommandHandle`]
//! (non-blocking, order-preserving) and consumed one at a time by the
//! dispatcher loop, which routes them to the two registries.
//!
//! ## Architecture
//! ```text
//! submit(cmd) ──► [unbounded FIFO queue] ──► dispatcher loop
//!                                               │
//!                            exit sentinel ─────┤─► stop
//!                            < 2 fields ────────┤─► CommandRejected, drop
//!                            (op, kind, [arg]) ─┴─► route:
//!                                 {create,list,pause,resume,terminate}
//!                               × {worker,thread}
//!                            anything else ────────► dropped silently
//! ```
//!
//! ## Rules
//! - Single consumer: commands are executed in submission order, one at a
//!   time. The queue take is the loop's sole suspension point besides the
//!   runtime token.
//! - After each routed command the loop sleeps `Config::command_pause`;
//!   this bounds burst rate and plays no role in correctness.
//! - Unroutable shapes (unknown operation, unknown unit kind, missing
//!   argument) are dropped without comment; this lenient contract is part
//!   of the interface.
//! - A command submitted after the exit sentinel is never processed.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::core::{Config, Registry};
use crate::events::{Bus, Event, EventKind};

use super::command::Command;
use super::error::SubmitError;

/// Handle for submitting commands to the dispatcher.
///
/// Cloneable and safe to use from any concurrent context; `submit` never
/// blocks and preserves submission order.
#[derive(Clone)]
pub struct CommandHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl CommandHandle {
    /// Enqueues one command for the dispatcher.
    pub fn submit(&self, cmd: Command) -> Result<(), SubmitError> {
        self.tx.send(cmd).map_err(|_| SubmitError::Closed)
    }
}

/// Single-consumer command loop over both registries.
pub struct Dispatcher {
    workers: Arc<Registry>,
    threads: Arc<Registry>,
    bus: Bus,
    command_pause: Duration,

    tx: mpsc::UnboundedSender<Command>,
    rx: RwLock<Option<mpsc::UnboundedReceiver<Command>>>,
}

impl Dispatcher {
    /// Creates a new dispatcher (call [`Dispatcher::run`] to start it).
    pub fn new(
        workers: Arc<Registry>,
        threads: Arc<Registry>,
        bus: Bus,
        cfg: &Config,
    ) -> Arc<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        Arc::new(Self {
            workers,
            threads,
            bus,
            command_pause: cfg.command_pause,
            tx,
            rx: RwLock::new(Some(rx)),
        })
    }

    /// Returns a handle for submitting commands.
    pub fn handle(&self) -> CommandHandle {
        CommandHandle {
            tx: self.tx.clone(),
        }
    }

    /// Starts the dispatcher loop in the background.
    ///
    /// The loop ends on the exit sentinel or when `token` is cancelled.
    pub fn run(self: Arc<Self>, token: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            if let Err(e) = self.run_inner(token).await {
                eprintln!("[unitvisor] dispatcher error: {e:?}");
            }
        })
    }

    async fn run_inner(&self, token: CancellationToken) -> anyhow::Result<()> {
        let mut rx = self
            .rx
            .write()
            .await
            .take()
            .ok_or_else(|| anyhow::anyhow!("dispatcher already running"))?;

        loop {
            let cmd = tokio::select! {
                _ = token.cancelled() => break,
                cmd = rx.recv() => match cmd {
                    Some(cmd) => cmd,
                    None => break,
                },
            };

            if cmd.is_exit() {
                self.bus.publish(Event::now(EventKind::DispatcherStopped));
                break;
            }

            self.execute(&cmd).await;
            tokio::time::sleep(self.command_pause).await;
        }

        Ok(())
    }

    /// Validates and routes one command.
    async fn execute(&self, cmd: &Command) {
        let fields = cmd.fields();
        if fields.len() < 2 {
            self.bus.publish(Event::now(EventKind::CommandRejected).with_reason(format!(
                "expected at least an operation and a unit kind, got {fields:?}"
            )));
            return;
        }

        let registry = match fields[1].as_str() {
            "worker" => &self.workers,
            "thread" => &self.threads,
            _ => return,
        };

        // Registry failures are already published on the bus; the queue
        // moves on regardless.
        match (fields[0].as_str(), fields.get(2)) {
            ("create", Some(label)) => {
                let _ = registry.create(label).await;
            }
            ("list", _) => {
                let _ = registry.list().await;
            }
            ("pause", Some(ident)) => {
                let _ = registry.pause(ident).await;
            }
            ("resume", Some(ident)) => {
                let _ = registry.resume(ident).await;
            }
            ("terminate", Some(ident)) => {
                let _ = registry.terminate(ident).await;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::UnitStatus;

    fn test_cfg() -> Config {
        Config {
            tick: Duration::from_millis(20),
            command_pause: Duration::from_millis(1),
            join_grace: Duration::from_secs(2),
            ..Config::default()
        }
    }

    struct Fixture {
        dispatcher: Arc<Dispatcher>,
        threads: Arc<Registry>,
        bus: Bus,
    }

    fn fixture() -> Fixture {
        let cfg = test_cfg();
        let bus = Bus::new(128);
        let workers = Registry::workers(bus.clone(), &cfg);
        let threads = Registry::threads(bus.clone(), &cfg);
        let dispatcher = Dispatcher::new(workers, Arc::clone(&threads), bus.clone(), &cfg);
        Fixture {
            dispatcher,
            threads,
            bus,
        }
    }

    #[tokio::test]
    async fn test_create_then_exit_stops_the_loop() {
        let fx = fixture();
        let handle = fx.dispatcher.handle();

        handle
            .submit(Command::new(["create", "thread", "t1"]))
            .expect("submit");
        handle.submit(Command::exit()).expect("submit exit");

        let loop_task = Arc::clone(&fx.dispatcher).run(CancellationToken::new());
        loop_task.await.expect("dispatcher loop should stop");

        assert_eq!(fx.threads.len().await, 1);

        // The loop is gone; later submissions are enqueued but never run.
        handle
            .submit(Command::new(["create", "thread", "t2"]))
            .expect("channel stays open");
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(fx.threads.len().await, 1);

        fx.threads.terminate("t1").await.expect("cleanup");
    }

    #[tokio::test]
    async fn test_commands_run_in_submission_order() {
        let fx = fixture();
        let handle = fx.dispatcher.handle();

        handle
            .submit(Command::new(["create", "thread", "t"]))
            .expect("submit");
        handle
            .submit(Command::new(["pause", "thread", "t"]))
            .expect("submit");
        handle.submit(Command::exit()).expect("submit exit");

        Arc::clone(&fx.dispatcher)
            .run(CancellationToken::new())
            .await
            .expect("loop");

        let rows = fx.threads.list().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, UnitStatus::Paused);

        fx.threads.terminate("t").await.expect("cleanup");
    }

    #[tokio::test]
    async fn test_short_commands_are_rejected_with_a_report() {
        let fx = fixture();
        let mut rx = fx.bus.subscribe();
        let handle = fx.dispatcher.handle();

        handle.submit(Command::new(["create"])).expect("submit");
        handle.submit(Command::exit()).expect("submit exit");

        Arc::clone(&fx.dispatcher)
            .run(CancellationToken::new())
            .await
            .expect("loop");

        let ev = rx.recv().await.expect("event");
        assert_eq!(ev.kind, EventKind::CommandRejected);
        assert!(ev.reason.as_deref().unwrap_or_default().contains("create"));
    }

    #[tokio::test]
    async fn test_unroutable_commands_are_dropped_silently() {
        let fx = fixture();
        let mut rx = fx.bus.subscribe();
        let handle = fx.dispatcher.handle();

        handle
            .submit(Command::new(["create", "gizmo", "g1"]))
            .expect("submit");
        handle
            .submit(Command::new(["frobnicate", "thread", "t1"]))
            .expect("submit");
        handle
            .submit(Command::new(["create", "thread"]))
            .expect("submit");
        handle.submit(Command::exit()).expect("submit exit");

        Arc::clone(&fx.dispatcher)
            .run(CancellationToken::new())
            .await
            .expect("loop");

        assert!(fx.threads.is_empty().await);

        // Nothing but the stop marker made it onto the bus.
        let mut kinds = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            kinds.push(ev.kind);
        }
        assert_eq!(kinds, [EventKind::DispatcherStopped]);
    }

    #[tokio::test]
    async fn test_run_twice_reports_instead_of_panicking() {
        let fx = fixture();
        let handle = fx.dispatcher.handle();
        handle.submit(Command::exit()).expect("submit exit");

        Arc::clone(&fx.dispatcher)
            .run(CancellationToken::new())
            .await
            .expect("first loop");

        // The receiver is gone; the second run reports and returns.
        Arc::clone(&fx.dispatcher)
            .run(CancellationToken::new())
            .await
            .expect("second loop task should not panic");
    }
}
