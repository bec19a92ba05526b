//! Booking message thread.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message in a booking thread. Immutable once sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub sender_id: String,
    #[serde(default)]
    pub sender_name: String,
    pub content: String,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn is_from(&self, user_id: &str) -> bool {
        self.sender_id == user_id
    }
}

/// Body of `POST /api/bookings/{id}/messages`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}
