//! # Runtime events emitted by the registries, the dispatcher, and the supervisor.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Lifecycle events**: unit control outcomes (created, paused, resumed, terminated, listed)
//! - **Failure events**: rejected operations (duplicate label, unknown identifier, launch failure, malformed command)
//! - **Runtime events**: dispatcher and supervisor state (dispatcher stopped, shutdown flow)
//!
//! The [`Event`] struct carries metadata such as timestamps, the unit kind
//! and label, the runtime-assigned id, and a human-readable reason.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! observed out of order.
//!
//! ## Example
//! ```rust
//! use unitvisor::{Event, EventKind, UnitKind};
//!
//! let ev = Event::now(EventKind::DuplicateLabel)
//!     .with_scope(UnitKind::Worker)
//!     .with_unit("demo")
//!     .with_reason("duplicate label: 'demo'");
//!
//! assert_eq!(ev.kind, EventKind::DuplicateLabel);
//! assert_eq!(ev.unit.as_deref(), Some("demo"));
//! assert_eq!(ev.scope, Some(UnitKind::Worker));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

use crate::core::{UnitId, UnitKind};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Unit lifecycle ===
    /// A unit was created and its body launched.
    ///
    /// Sets:
    /// - `scope`: unit kind
    /// - `unit`: label
    /// - `id`: runtime-assigned handle
    /// - `at`, `seq`
    UnitCreated,

    /// A unit's gate was closed.
    ///
    /// Sets: `scope`, `unit`, `id`, `at`, `seq`.
    UnitPaused,

    /// A unit's gate was opened.
    ///
    /// Sets: `scope`, `unit`, `id`, `at`, `seq`.
    UnitResumed,

    /// A unit was force-stopped and removed from the registry.
    ///
    /// Sets:
    /// - `scope`, `unit`, `id`, `at`, `seq`
    /// - `reason`: present when the unit did not exit within the join grace
    UnitTerminated,

    /// A registry snapshot was taken.
    ///
    /// Sets: `scope`, `count` (live units), `at`, `seq`.
    UnitsListed,

    // === Failures ===
    /// Create was rejected: the label is already registered.
    ///
    /// Sets: `scope`, `unit` (offending label), `reason`, `at`, `seq`.
    DuplicateLabel,

    /// Pause/resume/terminate resolved nothing.
    ///
    /// Sets: `scope`, `unit` (identifier as given), `reason`, `at`, `seq`.
    UnitNotFound,

    /// The execution context could not be constructed.
    ///
    /// Sets: `scope`, `unit` (label), `reason`, `at`, `seq`.
    SpawnFailed,

    /// A submitted command was malformed and dropped without routing.
    ///
    /// Sets: `reason`, `at`, `seq`.
    CommandRejected,

    // === Runtime ===
    /// The dispatcher consumed the exit sentinel and stopped.
    ///
    /// Sets: `at`, `seq`.
    DispatcherStopped,

    /// Shutdown requested (OS signal observed).
    ///
    /// Sets: `at`, `seq`.
    ShutdownRequested,

    /// All units exited within the configured teardown grace.
    ///
    /// Sets: `at`, `seq`.
    AllStoppedWithin,

    /// Teardown grace exceeded; some units did not exit in time.
    ///
    /// Sets: `reason` (stuck labels), `at`, `seq`.
    GraceExceeded,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Which registry the event belongs to, if any.
    pub scope: Option<UnitKind>,
    /// Unit label, or the offending identifier for failure events.
    pub unit: Option<Arc<str>>,
    /// Runtime-assigned handle, if resolved.
    pub id: Option<UnitId>,
    /// Human-readable reason (errors, stuck joins, rejected commands).
    pub reason: Option<Arc<str>>,
    /// Live-unit count for [`EventKind::UnitsListed`].
    pub count: Option<usize>,
}

impl Event {
    /// Creates a new event of the given kind with the current timestamp and
    /// the next global sequence number.
    pub fn now(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            scope: None,
            unit: None,
            id: None,
            reason: None,
            count: None,
        }
    }

    /// Attaches the unit kind the event belongs to.
    #[inline]
    pub fn with_scope(mut self, kind: UnitKind) -> Self {
        self.scope = Some(kind);
        self
    }

    /// Attaches a unit label (or the identifier that failed to resolve).
    #[inline]
    pub fn with_unit(mut self, unit: impl Into<Arc<str>>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Attaches a runtime-assigned handle.
    #[inline]
    pub fn with_id(mut self, id: UnitId) -> Self {
        self.id = Some(id);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a live-unit count.
    #[inline]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    /// True for kinds that represent a rejected or failed operation.
    #[inline]
    pub fn is_failure(&self) -> bool {
        matches!(
            self.kind,
            EventKind::DuplicateLabel
                | EventKind::UnitNotFound
                | EventKind::SpawnFailed
                | EventKind::CommandRejected
                | EventKind::GraceExceeded
        )
    }
}
