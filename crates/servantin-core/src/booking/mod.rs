//! Bookings: server-owned entities, their status vocabulary and the wizard draft.

pub mod draft;
pub mod model;
pub mod status;

pub use draft::{BookingDraft, BookingDraftStore, WizardStep};
pub use model::{
    Booking, BookingCategory, BookingClient, BookingProvider, BookingRating, BookingStatus,
    CreateBookingRequest, PaymentStatus, TimeSlot,
};
pub use status::{
    BookingAction, ClientFilter, ProviderTab, StatusTone, TimelineEntry, booking_status_color,
    booking_status_label,
};
