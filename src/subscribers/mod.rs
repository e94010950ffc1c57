//! # Event subscribers for the unitvisor runtime.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`]
//! fan-out, and the built-in [`LogWriter`] sink.
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   registries/dispatcher ── publish(Event) ──► Bus ──► supervisor listener
//!                                                          │
//!                                                SubscriberSet::emit(&Event)
//!                                                 ┌────────┼────────┐
//!                                                 ▼        ▼        ▼
//!                                             LogWriter  Metrics  Custom
//! ```

mod log;
mod set;
mod subscribe;

pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
