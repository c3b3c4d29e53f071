//! Structured log sink for marketplace events.
//!
//! [`BookingLog`] subscribes to the [`EventBus`](crate::bus::EventBus) and
//! writes one `tracing` record per event. It runs as a long-lived background
//! task and exits when the bus is dropped.

use tokio::sync::broadcast;

use crate::bus::{BookingEventKind, MarketplaceEvent};

pub struct BookingLog;

impl BookingLog {
    /// Run the log loop until the channel closes. Returns the number of
    /// events logged.
    pub async fn run(mut receiver: broadcast::Receiver<MarketplaceEvent>) -> u64 {
        let mut logged = 0;
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    Self::record(&event);
                    logged += 1;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Booking log lagged, some events were not logged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!(logged, "Event bus closed, booking log shutting down");
                    break;
                }
            }
        }
        logged
    }

    fn record(event: &MarketplaceEvent) {
        let session_id = event.session_id.map(|id| id.to_string());
        if event.event_type == BookingEventKind::Completed.as_str() {
            tracing::info!(
                event_type = %event.event_type,
                session_id = session_id.as_deref(),
                magazine_id = event.magazine_id.as_deref(),
                total_cost = %event.payload["total_cost"],
                packages = %event.payload["package_ids"],
                "Booking submitted"
            );
        } else {
            tracing::info!(
                event_type = %event.event_type,
                session_id = session_id.as_deref(),
                magazine_id = event.magazine_id.as_deref(),
                "Marketplace event"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::EventBus;

    #[tokio::test]
    async fn exits_when_bus_is_dropped() {
        let bus = EventBus::default();
        let handle = tokio::spawn(BookingLog::run(bus.subscribe()));

        bus.publish(MarketplaceEvent::booking(BookingEventKind::Cancelled));
        bus.publish(MarketplaceEvent::new("booking.completed"));
        drop(bus);

        assert_eq!(handle.await.unwrap(), 2);
    }

    #[tokio::test]
    async fn survives_lag() {
        let bus = EventBus::new(2);
        let rx = bus.subscribe();
        for _ in 0..5 {
            bus.publish(MarketplaceEvent::new("booking.cancelled"));
        }
        drop(bus);

        // Three events were overwritten before the loop started.
        assert_eq!(BookingLog::run(rx).await, 2);
    }
}
