//! # The serialized command channel.
//!
//! [`Command`] tuples are submitted through a [`CommandHandle`] and
//! consumed one at a time by the [`Dispatcher`], which routes them to the
//! worker and thread registries.

mod command;
mod dispatcher;
mod error;

pub use command::Command;
pub use dispatcher::{CommandHandle, Dispatcher};
pub use error::SubmitError;
