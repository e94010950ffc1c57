//! # Runtime events and the broadcast bus.
//!
//! Every registry outcome and every dispatcher decision is published as an
//! [`Event`] on the [`Bus`]; subscribers observe them through the
//! supervisor's fan-out (see [`SubscriberSet`](crate::SubscriberSet)).

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
