//! Booking domain models mirrored from the backend.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{AsRefStr, EnumIter, EnumString};

/// Lifecycle state of a booking.
///
/// `REQUESTED → ACCEPTED → IN_PROGRESS → COMPLETED`, with `DECLINED` and
/// `CANCELED` as terminal exits. Anything else the server sends is kept
/// verbatim in [`BookingStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BookingStatus {
    Requested,
    Accepted,
    Declined,
    InProgress,
    Completed,
    Canceled,
    Other(String),
}

impl BookingStatus {
    /// Every status the backend defines, in lifecycle order.
    pub const CANONICAL: [BookingStatus; 6] = [
        BookingStatus::Requested,
        BookingStatus::Accepted,
        BookingStatus::Declined,
        BookingStatus::InProgress,
        BookingStatus::Completed,
        BookingStatus::Canceled,
    ];

    pub fn parse(raw: &str) -> Self {
        match raw {
            "REQUESTED" => Self::Requested,
            "ACCEPTED" => Self::Accepted,
            "DECLINED" => Self::Declined,
            "IN_PROGRESS" => Self::InProgress,
            "COMPLETED" => Self::Completed,
            "CANCELED" => Self::Canceled,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Requested => "REQUESTED",
            Self::Accepted => "ACCEPTED",
            Self::Declined => "DECLINED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Canceled => "CANCELED",
            Self::Other(raw) => raw,
        }
    }

    /// Still moving through the lifecycle (the client may cancel it).
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Requested | Self::Accepted | Self::InProgress)
    }

    /// Finished one way or another.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Completed | Self::Canceled | Self::Declined)
    }

    pub fn is_negative_exit(&self) -> bool {
        matches!(self, Self::Canceled | Self::Declined)
    }
}

impl From<String> for BookingStatus {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<BookingStatus> for String {
    fn from(status: BookingStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment state of a booking, kept verbatim when unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Authorized,
    Captured,
    Refunded,
    Failed,
    Other(String),
}

impl PaymentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "PENDING",
            Self::Authorized => "AUTHORIZED",
            Self::Captured => "CAPTURED",
            Self::Refunded => "REFUNDED",
            Self::Failed => "FAILED",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "PENDING" => Self::Pending,
            "AUTHORIZED" => Self::Authorized,
            "CAPTURED" => Self::Captured,
            "REFUNDED" => Self::Refunded,
            "FAILED" => Self::Failed,
            _ => Self::Other(raw),
        }
    }
}

impl From<PaymentStatus> for String {
    fn from(status: PaymentStatus) -> Self {
        status.as_str().to_string()
    }
}

/// Preferred part of the day for a booking.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, EnumString, AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum TimeSlot {
    Morning,
    Afternoon,
    Evening,
}

impl TimeSlot {
    /// First hour of the slot (08:00, 12:00, 17:00).
    pub fn start_hour(self) -> u32 {
        match self {
            Self::Morning => 8,
            Self::Afternoon => 12,
            Self::Evening => 17,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCategory {
    pub id: String,
    pub slug: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingClient {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingProvider {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub average_rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRating {
    pub score: i32,
    #[serde(default)]
    pub comment: Option<String>,
}

/// A client's service request, owned by the server.
///
/// The client never edits one of these; every change goes through a
/// transition endpoint and the returned entity replaces the local copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub category: BookingCategory,
    pub client: BookingClient,
    #[serde(default)]
    pub provider: Option<BookingProvider>,
    pub status: BookingStatus,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub canton: String,
    #[serde(default)]
    pub preferred_date: Option<String>,
    #[serde(default)]
    pub preferred_time_slot: Option<String>,
    #[serde(default)]
    pub budget_min: Option<f64>,
    #[serde(default)]
    pub budget_max: Option<f64>,
    #[serde(default)]
    pub agreed_price: Option<f64>,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub rating: Option<BookingRating>,
    #[serde(default)]
    pub unread_message_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// The preferred date, when the server sent one we can read.
    pub fn preferred_day(&self) -> Option<NaiveDate> {
        self.preferred_date.as_deref().and_then(parse_day)
    }

    /// Messaging opens once a provider is attached.
    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }
}

/// Parses `YYYY-MM-DD`, also accepting a full RFC 3339 timestamp.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Body of `POST /api/bookings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub category_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
    pub description: String,
    pub postal_code: String,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canton: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_time_slot: Option<TimeSlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_max: Option<f64>,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::TimeZone;

    pub fn booking(id: &str, status: BookingStatus) -> Booking {
        let created = Utc.with_ymd_and_hms(2025, 3, 5, 9, 0, 0).unwrap();
        Booking {
            id: id.to_string(),
            category: BookingCategory {
                id: "c1".into(),
                slug: "babysitting".into(),
                name: "Babysitting".into(),
            },
            client: BookingClient {
                id: "u1".into(),
                name: "Claire Fleury".into(),
                email: "claire@example.ch".into(),
            },
            provider: None,
            status,
            description: "Garde d'un enfant de 5 ans le mercredi".into(),
            postal_code: "2800".into(),
            city: "Delémont".into(),
            canton: "JU".into(),
            preferred_date: None,
            preferred_time_slot: None,
            budget_min: None,
            budget_max: None,
            agreed_price: None,
            payment_status: PaymentStatus::Pending,
            rating: None,
            unread_message_count: 0,
            created_at: created,
            updated_at: created,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_status_parse_keeps_unknown_raw_value() {
        assert_eq!(BookingStatus::parse("IN_PROGRESS"), BookingStatus::InProgress);
        let legacy = BookingStatus::parse("CONFIRMED");
        assert_eq!(legacy, BookingStatus::Other("CONFIRMED".into()));
        assert_eq!(legacy.as_str(), "CONFIRMED");
    }

    #[test]
    fn test_status_buckets_partition_canonical_set() {
        for status in BookingStatus::CANONICAL {
            assert_ne!(status.is_active(), status.is_closed(), "{status}");
        }
        assert!(!BookingStatus::Other("PENDING".into()).is_active());
        assert!(!BookingStatus::Other("PENDING".into()).is_closed());
    }

    #[test]
    fn test_booking_deserializes_frontend_contract() {
        let json = r#"{
            "id": "B1",
            "category": {"id": "c1", "slug": "babysitting", "name": "Babysitting"},
            "client": {"id": "u1", "name": "Claire", "email": "c@x.ch"},
            "provider": null,
            "status": "REQUESTED",
            "description": "Garde",
            "postalCode": "2800",
            "city": "Delémont",
            "canton": "JU",
            "preferredDate": "2025-03-12",
            "preferredTimeSlot": "AFTERNOON",
            "budgetMin": 20,
            "budgetMax": null,
            "agreedPrice": null,
            "paymentStatus": "PENDING",
            "rating": null,
            "unreadMessageCount": 2,
            "createdAt": "2025-03-05T09:00:00Z",
            "updatedAt": "2025-03-05T09:00:00Z"
        }"#;
        let booking: Booking = serde_json::from_str(json).unwrap();
        assert_eq!(booking.status, BookingStatus::Requested);
        assert_eq!(booking.budget_min, Some(20.0));
        assert_eq!(booking.unread_message_count, 2);
        assert_eq!(
            booking.preferred_day(),
            NaiveDate::from_ymd_opt(2025, 3, 12)
        );
        assert!(!booking.has_provider());
    }

    #[test]
    fn test_create_request_omits_empty_optionals() {
        let request = CreateBookingRequest {
            category_id: "c1".into(),
            provider_id: None,
            description: "Garde".into(),
            postal_code: "2800".into(),
            city: "Delémont".into(),
            canton: Some("JU".into()),
            preferred_date: None,
            preferred_time_slot: Some(TimeSlot::Evening),
            budget_min: None,
            budget_max: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["categoryId"], "c1");
        assert_eq!(value["preferredTimeSlot"], "EVENING");
        assert!(value.get("providerId").is_none());
        assert!(value.get("budgetMin").is_none());
    }

    #[test]
    fn test_time_slot_parses_case_insensitively() {
        assert_eq!("morning".parse::<TimeSlot>().unwrap(), TimeSlot::Morning);
        assert_eq!(TimeSlot::iter().count(), 3);
        assert_eq!(TimeSlot::Evening.as_ref(), "EVENING");
    }
}
