//! # LogWriter — the human-readable event sink.
//!
//! A subscriber that renders every runtime event as one leveled,
//! timestamped line on stdout. Failure events (duplicate label, unknown
//! identifier, rejected command, exceeded grace) log at `ERROR`; everything
//! else at `INFO`.
//!
//! ## Example output
//! ```text
//! 1754380800.412 INFO  [created] kind=worker unit="w1" id=7
//! 1754380801.010 INFO  [paused] kind=worker unit="w1" id=7
//! 1754380801.512 ERROR [not-found] kind=thread unit="ghost" reason="not found: 'ghost'"
//! 1754380802.002 INFO  [listed] kind=thread count=3
//! 1754380802.507 INFO  [dispatcher-stopped]
//! ```

use std::fmt::Write as _;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Constructs a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        println!("{}", render(e));
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

fn tag(kind: EventKind) -> &'static str {
    match kind {
        EventKind::UnitCreated => "created",
        EventKind::UnitPaused => "paused",
        EventKind::UnitResumed => "resumed",
        EventKind::UnitTerminated => "terminated",
        EventKind::UnitsListed => "listed",
        EventKind::DuplicateLabel => "duplicate-label",
        EventKind::UnitNotFound => "not-found",
        EventKind::SpawnFailed => "spawn-failed",
        EventKind::CommandRejected => "command-rejected",
        EventKind::DispatcherStopped => "dispatcher-stopped",
        EventKind::ShutdownRequested => "shutdown-requested",
        EventKind::AllStoppedWithin => "all-stopped-within-grace",
        EventKind::GraceExceeded => "grace-exceeded",
    }
}

fn stamp(at: SystemTime) -> String {
    match at.duration_since(UNIX_EPOCH) {
        Ok(d) => format!("{}.{:03}", d.as_secs(), d.subsec_millis()),
        Err(_) => "0.000".to_string(),
    }
}

fn render(e: &Event) -> String {
    let level = if e.is_failure() { "ERROR" } else { "INFO " };
    let mut line = format!("{} {} [{}]", stamp(e.at), level, tag(e.kind));

    if let Some(scope) = e.scope {
        let _ = write!(line, " kind={scope}");
    }
    if let Some(unit) = &e.unit {
        let _ = write!(line, " unit={unit:?}");
    }
    if let Some(id) = e.id {
        let _ = write!(line, " id={id}");
    }
    if let Some(count) = e.count {
        let _ = write!(line, " count={count}");
    }
    if let Some(reason) = &e.reason {
        let _ = write!(line, " reason={reason:?}");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::UnitKind;

    #[test]
    fn test_render_includes_level_tag_and_fields() {
        let ev = Event::now(EventKind::DuplicateLabel)
            .with_scope(UnitKind::Worker)
            .with_unit("w1")
            .with_reason("duplicate label: 'w1'");

        let line = render(&ev);
        assert!(line.contains("ERROR"));
        assert!(line.contains("[duplicate-label]"));
        assert!(line.contains("kind=worker"));
        assert!(line.contains("unit=\"w1\""));
    }

    #[test]
    fn test_render_lifecycle_is_info() {
        let ev = Event::now(EventKind::UnitsListed)
            .with_scope(UnitKind::Thread)
            .with_count(3);

        let line = render(&ev);
        assert!(line.contains("INFO"));
        assert!(line.contains("[listed]"));
        assert!(line.contains("count=3"));
    }
}
