//! Error types used by the unitvisor runtime and registries.
//!
//! This module defines two main error enums:
//!
//! - [`RegistryError`] — failures of individual registry operations.
//! - [`RuntimeError`] — errors raised by the supervisor runtime itself.
//!
//! Registry failures are also published on the event bus at the point they
//! occur, so callers that cannot recover (the command dispatcher) simply
//! drop the `Result`; the failure still surfaces as a log line. None of
//! these errors ever tears down the supervisor.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced by registry operations.
///
/// Each failure is reported on the event bus where it happens; the `Result`
/// exists for direct callers and tests.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RegistryError {
    /// A live unit already carries this label.
    #[error("a unit named '{label}' already exists")]
    DuplicateLabel {
        /// The label that was already registered.
        label: String,
    },

    /// The identifier matched neither a label nor a live handle.
    #[error("no unit matches identifier '{ident}'")]
    NotFound {
        /// The identifier as given by the caller.
        ident: String,
    },

    /// The execution context could not be constructed.
    #[error("failed to launch unit '{label}'")]
    Spawn {
        /// The label of the unit that failed to start.
        label: String,
        /// The underlying launch error.
        #[source]
        source: std::io::Error,
    },
}

impl RegistryError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use unitvisor::RegistryError;
    ///
    /// let err = RegistryError::DuplicateLabel { label: "w1".into() };
    /// assert_eq!(err.as_label(), "duplicate_label");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RegistryError::DuplicateLabel { .. } => "duplicate_label",
            RegistryError::NotFound { .. } => "unit_not_found",
            RegistryError::Spawn { .. } => "unit_spawn_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RegistryError::DuplicateLabel { label } => {
                format!("duplicate label: '{label}'")
            }
            RegistryError::NotFound { ident } => {
                format!("not found: '{ident}'")
            }
            RegistryError::Spawn { label, source } => {
                format!("launch failed for '{label}': {source}")
            }
        }
    }
}

/// # Errors produced by the supervisor runtime.
///
/// These represent failures of the orchestration itself, such as a teardown
/// sequence exceeding its grace period.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Teardown grace period was exceeded; some units remained stuck.
    #[error("teardown grace {grace:?} exceeded; stuck: {stuck:?}")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
        /// Labels of units that did not exit in time.
        stuck: Vec<String>,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use unitvisor::RuntimeError;
    /// use std::time::Duration;
    ///
    /// let err = RuntimeError::GraceExceeded { grace: Duration::from_secs(5), stuck: vec![] };
    /// assert_eq!(err.as_label(), "runtime_grace_exceeded");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::GraceExceeded { .. } => "runtime_grace_exceeded",
        }
    }
}
