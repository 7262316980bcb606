//! Notifications module
//!
//! Real-time event notifications for UI clients: every workflow transition
//! publishes a typed event on a broadcast bus, streamed out over the
//! WebSocket endpoint in `interfaces::ws`.
//!
//! # WebSocket Endpoint
//! Connect to `/api/v1/notifications/ws` with optional query parameters:
//! - `entrepot_id` - Filter events by warehouse
//! - `event_types` - Comma-separated list of event types to receive

pub mod event_bus;
pub mod events;

pub use event_bus::{create_event_bus, EventBus, EventSubscriber, SharedEventBus};
pub use events::{Event, EventMessage, TruckEventData, WarehouseDeletedEvent};
