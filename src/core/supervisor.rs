//! # Supervisor: ties the registries, dispatcher, and event fan-out together.
//!
//! The [`Supervisor`] owns the event bus, a [`SubscriberSet`], both unit
//! registries, and the command dispatcher. It hands out the submission
//! handle, runs the dispatcher loop, reacts to OS termination signals, and
//! performs bounded teardown of every live unit.
//!
//! ## High-level architecture
//! ```text
//! Callers:
//!   sup.workers() / sup.threads()  ── direct async registry calls
//!   sup.handle().submit(cmd)       ── serialized command channel
//!
//! run():
//!   - subscriber_listener(): Bus.subscribe() ─► SubscriberSet::emit(&Event)
//!   - dispatcher loop (single consumer, FIFO)
//!   - select:
//!       ├─ dispatcher stopped (exit sentinel consumed)
//!       └─ OS signal ─► publish ShutdownRequested, cancel runtime token
//!   - teardown: force-stop every unit in both registries, join within
//!     Config::grace
//!       ├─ all exited   ─► publish AllStoppedWithin, Ok(())
//!       └─ some remain  ─► publish GraceExceeded,
//!                          Err(RuntimeError::GraceExceeded { grace, stuck })
//! ```
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use unitvisor::{Command, Config, LogWriter, Subscribe, Supervisor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
//!     let sup = Supervisor::builder(Config::default())
//!         .with_subscribers(subs)
//!         .build();
//!
//!     let handle = sup.handle();
//!     handle.submit(Command::new(["create", "worker", "w1"]))?;
//!     handle.submit(Command::exit())?;
//!
//!     sup.run().await?;
//!     Ok(())
//! }
//! ```

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

use crate::command::{Command, CommandHandle, Dispatcher, SubmitError};
use crate::core::{config::Config, registry::Registry, shutdown};
use crate::error::RuntimeError;
use crate::events::{Bus, Event, EventKind};
use crate::subscribers::{Subscribe, SubscriberSet};

/// Coordinates both registries, the command dispatcher, event delivery,
/// and bounded teardown.
pub struct Supervisor {
    /// Global runtime configuration.
    pub cfg: Config,
    /// Event bus shared with registries and the dispatcher.
    pub bus: Bus,
    subs: Arc<SubscriberSet>,
    workers: Arc<Registry>,
    threads: Arc<Registry>,
    dispatcher: Arc<Dispatcher>,
}

impl Supervisor {
    /// Starts building a supervisor with the given configuration.
    pub fn builder(cfg: Config) -> super::builder::SupervisorBuilder {
        super::builder::SupervisorBuilder::new(cfg)
    }

    /// Creates a supervisor with the given config and subscribers.
    pub fn new(cfg: Config, subscribers: Vec<Arc<dyn Subscribe>>) -> Arc<Self> {
        Self::builder(cfg).with_subscribers(subscribers).build()
    }

    pub(crate) fn assemble(
        cfg: Config,
        bus: Bus,
        subs: Arc<SubscriberSet>,
        workers: Arc<Registry>,
        threads: Arc<Registry>,
        dispatcher: Arc<Dispatcher>,
    ) -> Arc<Self> {
        Arc::new(Self {
            cfg,
            bus,
            subs,
            workers,
            threads,
            dispatcher,
        })
    }

    /// The worker-kind registry (dedicated-thread units).
    pub fn workers(&self) -> &Arc<Registry> {
        &self.workers
    }

    /// The thread-kind registry (shared-runtime units).
    pub fn threads(&self) -> &Arc<Registry> {
        &self.threads
    }

    /// Returns a cloneable handle for submitting commands.
    pub fn handle(&self) -> CommandHandle {
        self.dispatcher.handle()
    }

    /// Submits one command; shorthand for `handle().submit(cmd)`.
    pub fn submit(&self, cmd: Command) -> Result<(), SubmitError> {
        self.dispatcher.handle().submit(cmd)
    }

    /// Runs the dispatcher until the exit sentinel or an OS termination
    /// signal, then tears down every live unit.
    ///
    /// Returns `Ok(())` when all units exited within [`Config::grace`], or
    /// [`RuntimeError::GraceExceeded`] naming the stuck units.
    pub async fn run(&self) -> Result<(), RuntimeError> {
        let token = CancellationToken::new();
        self.subscriber_listener();

        let mut dispatch = Arc::clone(&self.dispatcher).run(token.child_token());
        tokio::select! {
            _ = shutdown::wait_for_shutdown_signal() => {
                self.bus.publish(Event::now(EventKind::ShutdownRequested));
                token.cancel();
            }
            _ = &mut dispatch => {}
        }

        self.drain_units().await
    }

    /// Subscribes to the bus and forwards events to the subscriber set
    /// (fire-and-forget). The listener drains until the bus closes.
    fn subscriber_listener(&self) {
        let mut rx = self.bus.subscribe();
        let set = Arc::clone(&self.subs);
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => set.emit(&ev),
                    Err(RecvError::Closed) => break,
                    Err(RecvError::Lagged(_)) => continue,
                }
            }
        });
    }

    /// Force-stops every live unit in both registries and joins them
    /// against one shared grace window.
    async fn drain_units(&self) -> Result<(), RuntimeError> {
        let grace = self.cfg.grace;
        let started = Instant::now();

        let mut stuck = self.workers.terminate_all(grace).await;
        let left = grace.saturating_sub(started.elapsed());
        stuck.extend(self.threads.terminate_all(left).await);

        if stuck.is_empty() {
            self.bus.publish(Event::now(EventKind::AllStoppedWithin));
            Ok(())
        } else {
            self.bus.publish(
                Event::now(EventKind::GraceExceeded).with_reason(format!("stuck: {stuck:?}")),
            );
            Err(RuntimeError::GraceExceeded { grace, stuck })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_cfg() -> Config {
        Config {
            tick: Duration::from_millis(20),
            command_pause: Duration::from_millis(1),
            join_grace: Duration::from_secs(2),
            grace: Duration::from_secs(5),
            ..Config::default()
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_run_processes_commands_then_stops_on_exit() {
        let sup = Supervisor::new(test_cfg(), vec![]);
        let handle = sup.handle();

        handle
            .submit(Command::new(["create", "thread", "t1"]))
            .expect("submit create");
        handle
            .submit(Command::new(["create", "worker", "w1"]))
            .expect("submit create");
        handle.submit(Command::exit()).expect("submit exit");

        sup.run().await.expect("run should drain cleanly");

        assert!(sup.workers().is_empty().await);
        assert!(sup.threads().is_empty().await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_commands_after_exit_are_never_processed() {
        let sup = Supervisor::new(test_cfg(), vec![]);
        let mut rx = sup.bus.subscribe();
        let handle = sup.handle();

        handle
            .submit(Command::new(["create", "thread", "before"]))
            .expect("submit");
        handle.submit(Command::exit()).expect("submit exit");
        handle
            .submit(Command::new(["create", "thread", "after"]))
            .expect("submitting stays possible");

        sup.run().await.expect("run");
        assert!(sup.threads().is_empty().await);

        // "before" was created and drained; "after" never reached a registry.
        let mut created = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            if ev.kind == EventKind::UnitCreated {
                created.push(ev.unit.as_deref().map(str::to_string));
            }
        }
        assert_eq!(created, [Some("before".to_string())]);
    }

    #[tokio::test]
    async fn test_direct_calls_work_without_run() {
        let sup = Supervisor::new(test_cfg(), vec![]);

        sup.threads().create("direct").await.expect("create");
        assert_eq!(sup.threads().len().await, 1);
        sup.threads().terminate("direct").await.expect("terminate");
        assert!(sup.threads().is_empty().await);
    }
}
