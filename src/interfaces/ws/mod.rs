//! WebSocket interfaces
//!
//! - `notifications`: event stream for UI clients (badge updates)

pub mod notifications;

pub use notifications::{create_notification_state, ws_notifications_handler, NotificationState};
