//! # Unit registry: the name ↔ handle map and lifecycle operations.
//!
//! One implementation serves both unit kinds; the two variants are built by
//! [`Registry::workers`] and [`Registry::threads`] and differ only in the
//! execution context that mounts unit bodies.
//!
//! ## Architecture
//! ```text
//! create(label) ──► duplicate check ──► ExecContext::launch(body)
//!                                            │
//!                     ┌──────────────────────┘
//!                     ▼
//!          entries: id → { label, gate, stop }      (installed together,
//!          labels:  label → id                       under the write lock)
//!
//! pause/resume(ident) ──► resolve: label first, rendered handle second
//!                     ──► gate.close() / gate.open()
//! terminate(ident)    ──► remove both entries ──► force-stop ──► bounded join
//! list()              ──► point-in-time snapshot of (id, label, status)
//! ```
//!
//! ## Rules
//! - The two maps are always consistent inverses; every read+mutate
//!   sequence runs under the registry lock.
//! - Labels are unique among live units; handles come from the runtime,
//!   never from the registry.
//! - `create` is atomic from the caller's view: a failed launch leaves no
//!   partial entry.
//! - `terminate` is the last operation to touch an entry: the entry leaves
//!   both maps before the unit is stopped, so a concurrent pause/resume
//!   can no longer reach its gate.
//! - Failures are published on the bus and returned; nothing panics and
//!   nothing propagates past the registry boundary.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::core::config::Config;
use crate::core::exec::{DedicatedExec, ExecContext, SharedExec, StopHandle, UnitId, UnitKind};
use crate::core::gate::Gate;
use crate::core::unit::Unit;
use crate::error::RegistryError;
use crate::events::{Bus, Event, EventKind};

/// Status of a unit, derived from its gate at observation time.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum UnitStatus {
    /// Gate open: the unit performs idle ticks.
    Running,
    /// Gate closed: the unit is suspended on its gate.
    Paused,
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnitStatus::Running => "Running",
            UnitStatus::Paused => "Paused",
        })
    }
}

/// One row of a [`Registry::list`] snapshot.
///
/// Status is true at snapshot time only; it may be stale by the time it is
/// displayed.
#[derive(Clone, Debug)]
pub struct UnitSnapshot {
    /// Runtime-assigned handle.
    pub id: UnitId,
    /// Human-assigned label.
    pub label: Arc<str>,
    /// Gate state at the instant of the snapshot.
    pub status: UnitStatus,
}

/// Live-unit entry: the gate shared with the body, and the stop handle.
struct Entry {
    label: Arc<str>,
    gate: Gate,
    stop: Box<dyn StopHandle>,
}

/// The two mutually-inverse maps, guarded together.
#[derive(Default)]
struct Maps {
    entries: HashMap<UnitId, Entry>,
    labels: HashMap<String, UnitId>,
}

/// Registry of live units for one unit kind.
pub struct Registry {
    ctx: Box<dyn ExecContext>,
    units: RwLock<Maps>,
    bus: Bus,
    tick: Duration,
    join_grace: Duration,
}

impl Registry {
    /// Creates the worker-kind registry: units on dedicated OS threads.
    pub fn workers(bus: Bus, cfg: &Config) -> Arc<Self> {
        Self::with_context(Box::new(DedicatedExec), bus, cfg)
    }

    /// Creates the thread-kind registry: units on the shared runtime.
    pub fn threads(bus: Bus, cfg: &Config) -> Arc<Self> {
        Self::with_context(Box::new(SharedExec), bus, cfg)
    }

    /// Creates a registry over an explicit execution context.
    pub fn with_context(ctx: Box<dyn ExecContext>, bus: Bus, cfg: &Config) -> Arc<Self> {
        Arc::new(Self {
            ctx,
            units: RwLock::new(Maps::default()),
            bus,
            tick: cfg.tick,
            join_grace: cfg.join_grace,
        })
    }

    /// The unit kind this registry manages.
    pub fn kind(&self) -> UnitKind {
        self.ctx.kind()
    }

    /// Creates a unit under `label` and returns its runtime-assigned handle.
    ///
    /// The whole sequence (duplicate check, launch, map installation) runs
    /// under the write lock, so exactly one of two concurrent creates with
    /// the same label succeeds and a failed launch leaves nothing behind.
    pub async fn create(&self, label: &str) -> Result<UnitId, RegistryError> {
        let mut units = self.units.write().await;

        if units.labels.contains_key(label) {
            drop(units);
            let err = RegistryError::DuplicateLabel {
                label: label.to_string(),
            };
            self.bus.publish(
                Event::now(EventKind::DuplicateLabel)
                    .with_scope(self.kind())
                    .with_unit(label)
                    .with_reason(err.as_message()),
            );
            return Err(err);
        }

        let gate = Gate::new();
        let unit = Unit::new(label, gate.clone());
        let entry_label = unit.label().clone();

        let launched = match self.ctx.launch(label, unit.into_body(self.tick)) {
            Ok(launched) => launched,
            Err(source) => {
                drop(units);
                let err = RegistryError::Spawn {
                    label: label.to_string(),
                    source,
                };
                self.bus.publish(
                    Event::now(EventKind::SpawnFailed)
                        .with_scope(self.kind())
                        .with_unit(label)
                        .with_reason(err.as_message()),
                );
                return Err(err);
            }
        };

        units.entries.insert(
            launched.id,
            Entry {
                label: entry_label,
                gate,
                stop: launched.stop,
            },
        );
        units.labels.insert(label.to_string(), launched.id);
        drop(units);

        self.bus.publish(
            Event::now(EventKind::UnitCreated)
                .with_scope(self.kind())
                .with_unit(label)
                .with_id(launched.id),
        );
        Ok(launched.id)
    }

    /// Closes the gate of the unit matching `ident`.
    ///
    /// `ident` is resolved as a label first, then as a rendered raw handle.
    /// An unresolved identifier is reported and the call is a no-op.
    pub async fn pause(&self, ident: &str) -> Result<(), RegistryError> {
        self.set_gate(ident, false).await
    }

    /// Opens the gate of the unit matching `ident`.
    ///
    /// Same resolution and failure policy as [`Registry::pause`].
    pub async fn resume(&self, ident: &str) -> Result<(), RegistryError> {
        self.set_gate(ident, true).await
    }

    async fn set_gate(&self, ident: &str, open: bool) -> Result<(), RegistryError> {
        let units = self.units.read().await;
        let found = Self::resolve(&units, ident).and_then(|id| {
            units.entries.get(&id).map(|entry| {
                if open {
                    entry.gate.open();
                } else {
                    entry.gate.close();
                }
                (id, entry.label.clone())
            })
        });
        drop(units);

        match found {
            Some((id, label)) => {
                let kind = if open {
                    EventKind::UnitResumed
                } else {
                    EventKind::UnitPaused
                };
                self.bus.publish(
                    Event::now(kind)
                        .with_scope(self.kind())
                        .with_unit(label)
                        .with_id(id),
                );
                Ok(())
            }
            None => Err(self.report_not_found(ident)),
        }
    }

    /// Force-stops the unit matching `ident`, waits (bounded) for it to
    /// exit, and removes it from both maps.
    ///
    /// Same resolution and failure policy as [`Registry::pause`]. The unit
    /// gets no say: there is no graceful-stop negotiation.
    pub async fn terminate(&self, ident: &str) -> Result<(), RegistryError> {
        let removed = {
            let mut units = self.units.write().await;
            let resolved = Self::resolve(&units, ident);
            resolved.and_then(|id| {
                let entry = units.entries.remove(&id)?;
                units.labels.remove(entry.label.as_ref());
                Some((id, entry))
            })
        };

        let Some((id, entry)) = removed else {
            return Err(self.report_not_found(ident));
        };

        let Entry { label, mut stop, .. } = entry;
        stop.force_stop();
        let clean = stop.join(self.join_grace).await;

        let mut ev = Event::now(EventKind::UnitTerminated)
            .with_scope(self.kind())
            .with_unit(label)
            .with_id(id);
        if !clean {
            ev = ev.with_reason(format!("did not exit within {:?}", self.join_grace));
        }
        self.bus.publish(ev);
        Ok(())
    }

    /// Takes a point-in-time snapshot of all live units, sorted by label.
    pub async fn list(&self) -> Vec<UnitSnapshot> {
        let units = self.units.read().await;
        let mut snapshot: Vec<UnitSnapshot> = units
            .entries
            .iter()
            .map(|(id, entry)| UnitSnapshot {
                id: *id,
                label: entry.label.clone(),
                status: if entry.gate.is_open() {
                    UnitStatus::Running
                } else {
                    UnitStatus::Paused
                },
            })
            .collect();
        drop(units);

        snapshot.sort_by(|a, b| a.label.cmp(&b.label));
        self.bus.publish(
            Event::now(EventKind::UnitsListed)
                .with_scope(self.kind())
                .with_count(snapshot.len()),
        );
        snapshot
    }

    /// Number of live units.
    pub async fn len(&self) -> usize {
        self.units.read().await.entries.len()
    }

    /// True when no units are live.
    pub async fn is_empty(&self) -> bool {
        self.units.read().await.entries.is_empty()
    }

    /// Teardown: force-stops every unit and joins each against a shared
    /// deadline. Returns the labels of units that did not exit in time.
    pub async fn terminate_all(&self, grace: Duration) -> Vec<String> {
        let drained: Vec<(UnitId, Entry)> = {
            let mut units = self.units.write().await;
            units.labels.clear();
            units.entries.drain().collect()
        };

        // Stop everything first so the joins overlap.
        let mut stopping = Vec::with_capacity(drained.len());
        for (id, entry) in drained {
            let Entry { label, mut stop, .. } = entry;
            stop.force_stop();
            stopping.push((id, label, stop));
        }

        let deadline = Instant::now() + grace;
        let mut stuck = Vec::new();
        for (id, label, stop) in stopping {
            let left = deadline.saturating_duration_since(Instant::now());
            let clean = stop.join(left).await;

            let mut ev = Event::now(EventKind::UnitTerminated)
                .with_scope(self.kind())
                .with_unit(label.clone())
                .with_id(id);
            if !clean {
                ev = ev.with_reason("did not exit within the teardown grace");
                stuck.push(label.to_string());
            }
            self.bus.publish(ev);
        }
        stuck
    }

    /// Resolves an identifier: label lookup first, rendered handle second.
    ///
    /// The order is part of the observable contract — a label that happens
    /// to spell another unit's handle wins.
    fn resolve(units: &Maps, ident: &str) -> Option<UnitId> {
        if let Some(id) = units.labels.get(ident) {
            return Some(*id);
        }
        units.entries.keys().copied().find(|id| id.to_string() == ident)
    }

    fn report_not_found(&self, ident: &str) -> RegistryError {
        let err = RegistryError::NotFound {
            ident: ident.to_string(),
        };
        self.bus.publish(
            Event::now(EventKind::UnitNotFound)
                .with_scope(self.kind())
                .with_unit(ident)
                .with_reason(err.as_message()),
        );
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_cfg() -> Config {
        Config {
            tick: Duration::from_millis(20),
            join_grace: Duration::from_secs(2),
            ..Config::default()
        }
    }

    fn threads_registry() -> Arc<Registry> {
        Registry::threads(Bus::new(64), &test_cfg())
    }

    async fn status_of(reg: &Registry, label: &str) -> Option<UnitStatus> {
        reg.list()
            .await
            .into_iter()
            .find(|row| &*row.label == label)
            .map(|row| row.status)
    }

    #[tokio::test]
    async fn test_create_assigns_stable_handle() {
        let reg = threads_registry();
        let id = reg.create("w1").await.expect("create should succeed");

        // The label keeps resolving to the same handle across operations.
        reg.pause("w1").await.expect("pause by label");
        let rows = reg.list().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, id);

        // The rendered handle resolves too.
        reg.terminate(&id.to_string())
            .await
            .expect("terminate by raw handle");
        assert!(reg.is_empty().await);
    }

    #[tokio::test]
    async fn test_duplicate_create_keeps_exactly_one_entry() {
        let reg = threads_registry();
        reg.create("dup").await.expect("first create");

        let second = reg.create("dup").await;
        assert!(matches!(
            second,
            Err(RegistryError::DuplicateLabel { ref label }) if label == "dup"
        ));
        assert_eq!(reg.len().await, 1);

        reg.terminate("dup").await.expect("cleanup");
    }

    #[tokio::test]
    async fn test_pause_resume_pairs_are_idempotent() {
        let reg = threads_registry();
        reg.create("w").await.expect("create");
        assert_eq!(status_of(&reg, "w").await, Some(UnitStatus::Running));

        for _ in 0..3 {
            reg.pause("w").await.expect("pause");
            reg.resume("w").await.expect("resume");
        }
        assert_eq!(status_of(&reg, "w").await, Some(UnitStatus::Running));

        reg.terminate("w").await.expect("cleanup");
    }

    #[tokio::test]
    async fn test_terminate_prunes_both_views() {
        let reg = threads_registry();
        let id = reg.create("x").await.expect("create");
        reg.terminate("x").await.expect("terminate by label");

        let raw = id.to_string();
        assert!(matches!(
            reg.pause("x").await,
            Err(RegistryError::NotFound { .. })
        ));
        assert!(matches!(
            reg.resume(&raw).await,
            Err(RegistryError::NotFound { .. })
        ));
        assert!(matches!(
            reg.terminate(&raw).await,
            Err(RegistryError::NotFound { .. })
        ));
        assert!(reg.is_empty().await);
    }

    #[tokio::test]
    async fn test_list_reports_labels_and_status() {
        let reg = threads_registry();
        for label in ["a", "b", "c"] {
            reg.create(label).await.expect("create");
        }
        reg.pause("b").await.expect("pause");

        let rows = reg.list().await;
        assert_eq!(rows.len(), 3);
        let labels: Vec<&str> = rows.iter().map(|r| &*r.label).collect();
        assert_eq!(labels, ["a", "b", "c"]);
        assert_eq!(rows[0].status, UnitStatus::Running);
        assert_eq!(rows[1].status, UnitStatus::Paused);
        assert_eq!(rows[2].status, UnitStatus::Running);

        for label in ["a", "b", "c"] {
            reg.terminate(label).await.expect("cleanup");
        }
    }

    #[tokio::test]
    async fn test_full_lifecycle_scenario() {
        let reg = threads_registry();
        reg.create("w1").await.expect("create");

        reg.pause("w1").await.expect("pause");
        assert_eq!(status_of(&reg, "w1").await, Some(UnitStatus::Paused));

        reg.resume("w1").await.expect("resume");
        assert_eq!(status_of(&reg, "w1").await, Some(UnitStatus::Running));

        reg.terminate("w1").await.expect("terminate");
        assert!(reg.list().await.is_empty());

        assert!(matches!(
            reg.terminate("w1").await,
            Err(RegistryError::NotFound { .. })
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_duplicate_creates_have_one_winner() {
        let reg = threads_registry();

        let a = {
            let reg = Arc::clone(&reg);
            tokio::spawn(async move { reg.create("dup").await })
        };
        let b = {
            let reg = Arc::clone(&reg);
            tokio::spawn(async move { reg.create("dup").await })
        };
        let (a, b) = (a.await.expect("join"), b.await.expect("join"));

        assert_eq!(
            a.is_ok() as u8 + b.is_ok() as u8,
            1,
            "exactly one create should win"
        );
        assert_eq!(reg.len().await, 1);

        reg.terminate("dup").await.expect("cleanup");
    }

    #[tokio::test]
    async fn test_label_resolution_precedes_raw_handle() {
        let reg = threads_registry();
        let id_a = reg.create("a").await.expect("create a");

        // A second unit whose label spells the first unit's handle.
        let shadow = id_a.to_string();
        reg.create(&shadow).await.expect("create shadow");

        // The label map wins: the shadow unit pauses, unit "a" keeps running.
        reg.pause(&shadow).await.expect("pause");
        assert_eq!(status_of(&reg, &shadow).await, Some(UnitStatus::Paused));
        assert_eq!(status_of(&reg, "a").await, Some(UnitStatus::Running));

        reg.terminate(&shadow).await.expect("cleanup shadow");
        reg.terminate("a").await.expect("cleanup a");
    }

    #[tokio::test]
    async fn test_label_reusable_after_terminate() {
        let reg = threads_registry();
        let first = reg.create("w").await.expect("first create");
        reg.terminate("w").await.expect("terminate");

        let second = reg.create("w").await.expect("label should be free again");
        assert_ne!(first, second, "a terminated entry is never resurrected");

        reg.terminate("w").await.expect("cleanup");
    }

    #[tokio::test]
    async fn test_worker_registry_full_lifecycle() {
        let reg = Registry::workers(Bus::new(64), &test_cfg());
        assert_eq!(reg.kind(), UnitKind::Worker);

        reg.create("hw").await.expect("create worker");
        reg.pause("hw").await.expect("pause worker");
        assert_eq!(status_of(&reg, "hw").await, Some(UnitStatus::Paused));
        reg.resume("hw").await.expect("resume worker");

        reg.terminate("hw").await.expect("terminate worker");
        assert!(reg.is_empty().await);
    }

    #[tokio::test]
    async fn test_terminate_all_drains_registry() {
        let reg = threads_registry();
        for label in ["a", "b", "c"] {
            reg.create(label).await.expect("create");
        }

        let stuck = reg.terminate_all(Duration::from_secs(5)).await;
        assert!(stuck.is_empty(), "idle units exit promptly: {stuck:?}");
        assert!(reg.is_empty().await);
    }

    #[tokio::test]
    async fn test_not_found_is_reported_on_the_bus() {
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let reg = Registry::threads(bus, &test_cfg());

        assert!(reg.pause("ghost").await.is_err());

        let ev = rx.recv().await.expect("event");
        assert_eq!(ev.kind, EventKind::UnitNotFound);
        assert_eq!(ev.unit.as_deref(), Some("ghost"));
    }
}
