//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`MarketplaceEvent`]s and is
//! shared via `Arc<EventBus>`. Navigators report booking outcomes to it
//! through the [`BookingListener`] seam, either directly or through a
//! per-session [`SessionListener`].

use std::sync::Arc;

use adspace_core::booking::BookingData;
use adspace_core::navigation::BookingListener;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// MarketplaceEvent
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingEventKind {
    Completed,
    Cancelled,
}

impl BookingEventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "booking.completed",
            Self::Cancelled => "booking.cancelled",
        }
    }
}

/// A domain event that occurred in the marketplace.
///
/// Constructed via [`MarketplaceEvent::new`] and enriched with the builder
/// methods [`with_session`](MarketplaceEvent::with_session),
/// [`with_magazine`](MarketplaceEvent::with_magazine), and
/// [`with_payload`](MarketplaceEvent::with_payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketplaceEvent {
    /// Dot-separated event name, e.g. `"booking.completed"`.
    pub event_type: String,

    /// Visitor session the event belongs to, if any.
    pub session_id: Option<Uuid>,

    pub magazine_id: Option<String>,

    /// Event-specific data.
    pub payload: serde_json::Value,

    pub timestamp: DateTime<Utc>,
}

impl MarketplaceEvent {
    /// Create a new event with only the required `event_type`.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            session_id: None,
            magazine_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    pub fn booking(kind: BookingEventKind) -> Self {
        Self::new(kind.as_str())
    }

    /// Event describing a completed booking snapshot.
    pub fn completed(snapshot: &BookingData) -> Self {
        let package_ids: Vec<&str> = snapshot.ad_packages.iter().map(|p| p.id.as_str()).collect();
        let event = Self::booking(BookingEventKind::Completed).with_payload(serde_json::json!({
            "booking": snapshot,
            "package_ids": package_ids,
            "total_cost": snapshot.total_cost(),
        }));
        match snapshot.magazine.as_deref() {
            Some(magazine) => event.with_magazine(magazine.id.clone()),
            None => event,
        }
    }

    pub fn with_session(mut self, session_id: Uuid) -> Self {
        self.session_id = Some(session_id);
        self
    }

    pub fn with_magazine(mut self, magazine_id: impl Into<String>) -> Self {
        self.magazine_id = Some(magazine_id.into());
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// ```rust
/// use adspace_events::bus::{EventBus, MarketplaceEvent};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(MarketplaceEvent::new("booking.cancelled"));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<MarketplaceEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest messages are dropped and slow
    /// receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers. Dropped if there are none.
    pub fn publish(&self, event: MarketplaceEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MarketplaceEvent> {
        self.sender.subscribe()
    }

    /// A listener that tags every event with `session_id`.
    pub fn for_session(self: &Arc<Self>, session_id: Uuid) -> SessionListener {
        SessionListener {
            bus: Arc::clone(self),
            session_id,
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl BookingListener for EventBus {
    fn on_booking_complete(&self, snapshot: &BookingData) {
        self.publish(MarketplaceEvent::completed(snapshot));
    }

    fn on_cancel(&self) {
        self.publish(MarketplaceEvent::booking(BookingEventKind::Cancelled));
    }
}

/// Booking listener bound to one visitor session.
#[derive(Clone)]
pub struct SessionListener {
    bus: Arc<EventBus>,
    session_id: Uuid,
}

impl SessionListener {
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }
}

impl BookingListener for SessionListener {
    fn on_booking_complete(&self, snapshot: &BookingData) {
        self.bus
            .publish(MarketplaceEvent::completed(snapshot).with_session(self.session_id));
    }

    fn on_cancel(&self) {
        self.bus.publish(
            MarketplaceEvent::booking(BookingEventKind::Cancelled).with_session(self.session_id),
        );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
