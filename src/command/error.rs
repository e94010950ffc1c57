use thiserror::Error;

/// Error returned by [`CommandHandle::submit`](crate::CommandHandle::submit).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    /// Command channel is closed (dispatcher was dropped).
    #[error("command channel closed")]
    Closed,
}
