//! Booking event bus for the ad space marketplace.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`. It is the navigator's booking listener.
//! - [`MarketplaceEvent`]: the event envelope.
//! - [`BookingLog`]: background task that writes every event to the log.

pub mod bus;
pub mod log;

pub use bus::{BookingEventKind, EventBus, MarketplaceEvent, SessionListener};
pub use log::BookingLog;
