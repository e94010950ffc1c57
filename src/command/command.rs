//! # Command: an ordered tuple of string fields.
//!
//! A command is `(operation, unit kind, optional args…)` — for example
//! `("create", "worker", "w1")` or `("list", "thread")`. The single field
//! `exit` is the sentinel that stops the dispatcher. The fields stay raw
//! strings on purpose: routing is the dispatcher's job, and unroutable
//! shapes are part of its contract.

use crate::core::UnitKind;

/// One externally submitted command.
///
/// ## Example
/// ```
/// use unitvisor::{Command, UnitKind};
///
/// let cmd = Command::new(["create", "worker", "w1"]);
/// assert_eq!(cmd.fields(), ["create", "worker", "w1"]);
/// assert_eq!(cmd, Command::create(UnitKind::Worker, "w1"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command {
    fields: Vec<String>,
}

impl Command {
    /// Builds a command from raw fields.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// The sentinel that stops the dispatcher loop.
    pub fn exit() -> Self {
        Self::new(["exit"])
    }

    /// `("create", kind, label)`
    pub fn create(kind: UnitKind, label: impl Into<String>) -> Self {
        Self::new(["create".to_string(), kind.to_string(), label.into()])
    }

    /// `("list", kind)`
    pub fn list(kind: UnitKind) -> Self {
        Self::new(["list".to_string(), kind.to_string()])
    }

    /// `("pause", kind, ident)`
    pub fn pause(kind: UnitKind, ident: impl Into<String>) -> Self {
        Self::new(["pause".to_string(), kind.to_string(), ident.into()])
    }

    /// `("resume", kind, ident)`
    pub fn resume(kind: UnitKind, ident: impl Into<String>) -> Self {
        Self::new(["resume".to_string(), kind.to_string(), ident.into()])
    }

    /// `("terminate", kind, ident)`
    pub fn terminate(kind: UnitKind, ident: impl Into<String>) -> Self {
        Self::new(["terminate".to_string(), kind.to_string(), ident.into()])
    }

    /// The raw fields, in order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// True when the first field is the exit sentinel.
    pub(crate) fn is_exit(&self) -> bool {
        self.fields.first().is_some_and(|f| f == "exit")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_sentinel() {
        assert!(Command::exit().is_exit());
        assert!(Command::new(["exit", "worker"]).is_exit());
        assert!(!Command::new(["create", "worker", "w1"]).is_exit());
        assert!(!Command::new(Vec::<String>::new()).is_exit());
    }

    #[test]
    fn test_constructors_spell_the_tuples() {
        assert_eq!(
            Command::pause(UnitKind::Thread, "t1").fields(),
            ["pause", "thread", "t1"]
        );
        assert_eq!(Command::list(UnitKind::Worker).fields(), ["list", "worker"]);
    }
}
