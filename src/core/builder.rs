use std::sync::Arc;

use crate::command::Dispatcher;
use crate::core::{config::Config, registry::Registry, supervisor::Supervisor};
use crate::events::Bus;
use crate::subscribers::{Subscribe, SubscriberSet};

/// Builder for constructing a [`Supervisor`].
pub struct SupervisorBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl SupervisorBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive runtime events (unit lifecycle, failures,
    /// shutdown flow) through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the supervisor: event bus, subscriber workers, both
    /// registries, and the command dispatcher.
    pub fn build(self) -> Arc<Supervisor> {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let subs = Arc::new(SubscriberSet::new(self.subscribers));

        let workers = Registry::workers(bus.clone(), &self.cfg);
        let threads = Registry::threads(bus.clone(), &self.cfg);
        let dispatcher = Dispatcher::new(
            Arc::clone(&workers),
            Arc::clone(&threads),
            bus.clone(),
            &self.cfg,
        );

        Supervisor::assemble(self.cfg, bus, subs, workers, threads, dispatcher)
    }
}
