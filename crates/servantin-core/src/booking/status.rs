//! How booking statuses are shown and which actions they expose.
//!
//! Nothing here enforces a transition; the backend does. These are the
//! rendering rules shared by the dashboards and the booking detail screen.

use super::model::{Booking, BookingStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

/// Default badge class for statuses outside the canonical set.
pub const DEFAULT_STATUS_COLOR: &str = "bg-gray-100 text-gray-800";

/// Human label for a raw status string; unknown values are echoed back.
pub fn booking_status_label(raw: &str) -> String {
    match BookingStatus::parse(raw) {
        BookingStatus::Other(raw) => raw,
        known => status_label(&known).to_string(),
    }
}

/// Badge class for a raw status string; unknown values get [`DEFAULT_STATUS_COLOR`].
pub fn booking_status_color(raw: &str) -> &'static str {
    status_tone(&BookingStatus::parse(raw)).css_class()
}

pub fn status_label(status: &BookingStatus) -> &str {
    match status {
        BookingStatus::Requested => "En attente",
        BookingStatus::Accepted => "Acceptée",
        BookingStatus::Declined => "Refusée",
        BookingStatus::InProgress => "En cours",
        BookingStatus::Completed => "Terminée",
        BookingStatus::Canceled => "Annulée",
        BookingStatus::Other(raw) => raw,
    }
}

/// Colour family of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Yellow,
    Blue,
    Red,
    Purple,
    Green,
    Gray,
}

impl StatusTone {
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Yellow => "bg-yellow-100 text-yellow-800",
            Self::Blue => "bg-blue-100 text-blue-800",
            Self::Red => "bg-red-100 text-red-800",
            Self::Purple => "bg-purple-100 text-purple-800",
            Self::Green => "bg-green-100 text-green-800",
            Self::Gray => DEFAULT_STATUS_COLOR,
        }
    }
}

pub fn status_tone(status: &BookingStatus) -> StatusTone {
    match status {
        BookingStatus::Requested => StatusTone::Yellow,
        BookingStatus::Accepted => StatusTone::Blue,
        BookingStatus::Declined => StatusTone::Red,
        BookingStatus::InProgress => StatusTone::Purple,
        BookingStatus::Completed => StatusTone::Green,
        BookingStatus::Canceled | BookingStatus::Other(_) => StatusTone::Gray,
    }
}

/// A status transition the client can ask the backend for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum BookingAction {
    Accept,
    Decline,
    Complete,
    Cancel,
}

/// Actions shown to the client who owns the booking.
pub fn client_actions(status: &BookingStatus) -> Vec<BookingAction> {
    if status.is_active() {
        vec![BookingAction::Cancel]
    } else {
        Vec::new()
    }
}

/// Actions shown to the provider handling the booking.
pub fn provider_actions(status: &BookingStatus) -> Vec<BookingAction> {
    match status {
        BookingStatus::Requested => vec![BookingAction::Accept, BookingAction::Decline],
        BookingStatus::Accepted => vec![BookingAction::Complete],
        _ => Vec::new(),
    }
}

/// Filter tabs of the client dashboard.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumIter, EnumString, AsRefStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ClientFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl ClientFilter {
    pub fn matches(self, status: &BookingStatus) -> bool {
        match self {
            Self::All => true,
            Self::Active => status.is_active(),
            Self::Completed => status.is_closed(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "Toutes",
            Self::Active => "En cours",
            Self::Completed => "Terminées",
        }
    }
}

/// Tabs of the provider dashboard.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumIter, EnumString, AsRefStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ProviderTab {
    #[default]
    Pending,
    Active,
    History,
}

impl ProviderTab {
    pub fn matches(self, status: &BookingStatus) -> bool {
        match self {
            Self::Pending => *status == BookingStatus::Requested,
            Self::Active => matches!(status, BookingStatus::Accepted | BookingStatus::InProgress),
            Self::History => status.is_closed(),
        }
    }

    pub fn empty_message(self) -> &'static str {
        match self {
            Self::Pending => "Aucune demande en attente",
            Self::Active => "Aucune mission en cours",
            Self::History => "Aucune mission terminée",
        }
    }
}

/// One line of the status timeline on the booking detail screen.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEntry {
    pub status: BookingStatus,
    pub at: DateTime<Utc>,
    pub label: String,
    /// Declined or canceled: drawn as a negative step.
    pub negative: bool,
}

pub fn status_timeline(booking: &Booking) -> Vec<TimelineEntry> {
    let mut entries = vec![TimelineEntry {
        status: BookingStatus::Requested,
        at: booking.created_at,
        label: "Demande créée".to_string(),
        negative: false,
    }];
    if booking.status != BookingStatus::Requested {
        entries.push(TimelineEntry {
            status: booking.status.clone(),
            at: booking.updated_at,
            label: status_label(&booking.status).to_string(),
            negative: booking.status.is_negative_exit(),
        });
    }
    entries
}
