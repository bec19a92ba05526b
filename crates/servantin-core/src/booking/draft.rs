//! Booking wizard draft and its store.
//!
//! The draft lives from wizard start until a booking is created or the user
//! resets it. An unauthenticated submit leaves it untouched so the wizard can
//! resume after login.

use super::model::{CreateBookingRequest, TimeSlot};
use crate::provider::MatchRequest;
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};
use strum::{EnumIter, IntoEnumIterator};

pub const DEFAULT_CANTON: &str = "JU";

/// The four wizard steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, EnumIter)]
pub enum WizardStep {
    #[default]
    Category,
    Details,
    Provider,
    Confirmation,
}

impl WizardStep {
    pub fn index(self) -> u8 {
        match self {
            Self::Category => 0,
            Self::Details => 1,
            Self::Provider => 2,
            Self::Confirmation => 3,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Category),
            1 => Some(Self::Details),
            2 => Some(Self::Provider),
            3 => Some(Self::Confirmation),
            _ => None,
        }
    }

    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Category => "Service",
            Self::Details => "Détails",
            Self::Provider => "Prestataire",
            Self::Confirmation => "Confirmation",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            Self::Category => "Choisissez votre service",
            Self::Details => "Décrivez votre besoin",
            Self::Provider => "Sélectionnez un prestataire",
            Self::Confirmation => "Vérifiez et confirmez",
        }
    }
}

/// A booking being composed in the wizard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingDraft {
    pub step: WizardStep,
    pub category_id: Option<String>,
    pub category_name: Option<String>,
    pub postal_code: String,
    pub city: String,
    pub canton: String,
    pub description: String,
    pub preferred_date: Option<NaiveDate>,
    pub preferred_time_slot: Option<TimeSlot>,
    pub selected_provider_id: Option<String>,
    pub selected_provider_name: Option<String>,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
}

impl Default for BookingDraft {
    fn default() -> Self {
        Self {
            step: WizardStep::Category,
            category_id: None,
            category_name: None,
            postal_code: String::new(),
            city: String::new(),
            canton: DEFAULT_CANTON.to_string(),
            description: String::new(),
            preferred_date: None,
            preferred_time_slot: None,
            selected_provider_id: None,
            selected_provider_name: None,
            budget_min: None,
            budget_max: None,
        }
    }
}

impl BookingDraft {
    /// Whether the fields `step` requires are filled in.
    pub fn can_proceed_at(&self, step: WizardStep) -> bool {
        match step {
            WizardStep::Category => self.category_id.is_some(),
            WizardStep::Details => {
                !self.postal_code.is_empty() && !self.city.is_empty() && !self.description.is_empty()
            }
            // no provider means "let the platform choose"
            WizardStep::Provider => true,
            WizardStep::Confirmation => true,
        }
    }

    pub fn can_proceed(&self) -> bool {
        self.can_proceed_at(self.step)
    }

    /// Whether every step before confirmation has its fields, whatever the current step.
    pub fn is_complete(&self) -> bool {
        WizardStep::iter()
            .take_while(|step| *step < WizardStep::Confirmation)
            .all(|step| self.can_proceed_at(step))
    }

    /// Preferred start time sent to matching: the chosen day at the slot's first hour (UTC).
    ///
    /// Only set when both a date and a slot were picked.
    pub fn preferred_time(&self) -> Option<chrono::DateTime<Utc>> {
        let date = self.preferred_date?;
        let slot = self.preferred_time_slot?;
        let time = NaiveTime::from_hms_opt(slot.start_hour(), 0, 0)?;
        Some(Utc.from_utc_datetime(&date.and_time(time)))
    }

    /// Search criteria for the provider step, `None` until category and location are known.
    pub fn match_request(&self) -> Option<MatchRequest> {
        let category_id = self.category_id.clone()?;
        if self.postal_code.is_empty() || self.city.is_empty() {
            return None;
        }
        Some(MatchRequest {
            category_id,
            postal_code: self.postal_code.clone(),
            city: self.city.clone(),
            preferred_time: self.preferred_time(),
        })
    }

    /// Body of the create call, `None` without a category.
    pub fn to_create_request(&self) -> Option<CreateBookingRequest> {
        let category_id = self.category_id.clone()?;
        let canton = if self.canton.is_empty() {
            DEFAULT_CANTON.to_string()
        } else {
            self.canton.clone()
        };
        Some(CreateBookingRequest {
            category_id,
            provider_id: self.selected_provider_id.clone(),
            description: self.description.clone(),
            postal_code: self.postal_code.clone(),
            city: self.city.clone(),
            canton: Some(canton),
            preferred_date: self.preferred_date.map(|d| d.format("%Y-%m-%d").to_string()),
            preferred_time_slot: self.preferred_time_slot,
            budget_min: self.budget_min.filter(|v| *v > 0.0),
            budget_max: self.budget_max.filter(|v| *v > 0.0),
        })
    }
}

/// Shared store for the wizard draft.
///
/// Every setter touches only its own fields, like form inputs bound to the draft.
#[derive(Debug, Default)]
pub struct BookingDraftStore {
    draft: Mutex<BookingDraft>,
}

impl BookingDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> BookingDraft {
        self.lock().clone()
    }

    pub fn step(&self) -> WizardStep {
        self.lock().step
    }

    pub fn set_step(&self, step: WizardStep) {
        self.lock().step = step;
    }

    pub fn set_category(&self, id: impl Into<String>, name: impl Into<String>) {
        let mut draft = self.lock();
        draft.category_id = Some(id.into());
        draft.category_name = Some(name.into());
    }

    pub fn set_location(
        &self,
        postal_code: impl Into<String>,
        city: impl Into<String>,
        canton: impl Into<String>,
    ) {
        let mut draft = self.lock();
        draft.postal_code = postal_code.into();
        draft.city = city.into();
        draft.canton = canton.into();
    }

    pub fn set_description(&self, description: impl Into<String>) {
        self.lock().description = description.into();
    }

    pub fn set_preferred_time(&self, date: Option<NaiveDate>, slot: Option<TimeSlot>) {
        let mut draft = self.lock();
        draft.preferred_date = date;
        draft.preferred_time_slot = slot;
    }

    pub fn set_selected_provider(&self, id: Option<String>, name: Option<String>) {
        let mut draft = self.lock();
        draft.selected_provider_id = id;
        draft.selected_provider_name = name;
    }

    pub fn set_budget(&self, min: Option<f64>, max: Option<f64>) {
        let mut draft = self.lock();
        draft.budget_min = min;
        draft.budget_max = max;
    }

    /// Moves to the next step if the current one is complete; returns whether it moved.
    pub fn advance(&self) -> bool {
        let mut draft = self.lock();
        if !draft.can_proceed() {
            return false;
        }
        match draft.step.next() {
            Some(next) => {
                draft.step = next;
                true
            }
            None => false,
        }
    }

    /// Moves back one step; returns whether it moved.
    pub fn back(&self) -> bool {
        let mut draft = self.lock();
        match draft.step.previous() {
            Some(previous) => {
                draft.step = previous;
                true
            }
            None => false,
        }
    }

    pub fn reset(&self) {
        *self.lock() = BookingDraft::default();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BookingDraft> {
        self.draft.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_store() -> BookingDraftStore {
        let store = BookingDraftStore::new();
        store.set_category("c1", "Babysitting");
        store.set_location("2800", "Delémont", "JU");
        store.set_description("Garde d'un enfant de 5 ans le mercredi");
        store
    }

    #[test]
    fn test_step_indices_cover_zero_to_three() {
        let indices: Vec<u8> = WizardStep::iter().map(WizardStep::index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert_eq!(WizardStep::from_index(4), None);
        assert_eq!(WizardStep::Category.previous(), None);
        assert_eq!(WizardStep::Confirmation.next(), None);
    }

    #[test]
    fn test_can_proceed_requires_category_at_step_zero() {
        let mut draft = BookingDraft::default();
        assert!(!draft.can_proceed_at(WizardStep::Category));
        draft.category_id = Some("c1".into());
        assert!(draft.can_proceed_at(WizardStep::Category));
    }

    #[test]
    fn test_complete_needs_category_and_details() {
        let mut draft = BookingDraft::default();
        draft.step = WizardStep::Confirmation;
        assert!(!draft.is_complete());

        draft.category_id = Some("c1".into());
        assert!(!draft.is_complete(), "details still blank");

        let draft = filled_store().snapshot();
        assert_eq!(draft.step, WizardStep::Category);
        assert!(draft.is_complete());
    }

    #[test]
    fn test_can_proceed_requires_all_detail_fields() {
        let base = BookingDraft {
            postal_code: "2800".into(),
            city: "Delémont".into(),
            description: "Garde".into(),
            ..BookingDraft::default()
        };
        assert!(base.can_proceed_at(WizardStep::Details));

        for blank in ["postal_code", "city", "description"] {
            let mut draft = base.clone();
            match blank {
                "postal_code" => draft.postal_code.clear(),
                "city" => draft.city.clear(),
                _ => draft.description.clear(),
            }
            assert!(!draft.can_proceed_at(WizardStep::Details), "{blank} empty");
        }
    }

    #[test]
    fn test_provider_and_confirmation_steps_never_block() {
        let draft = BookingDraft::default();
        assert!(draft.can_proceed_at(WizardStep::Provider));
        assert!(draft.can_proceed_at(WizardStep::Confirmation));
    }

    #[test]
    fn test_advance_is_noop_when_blocked() {
        let store = BookingDraftStore::new();
        let before = store.snapshot();
        assert!(!store.advance());
        assert_eq!(store.snapshot(), before);

        store.set_category("c1", "Babysitting");
        assert!(store.advance());
        assert_eq!(store.step(), WizardStep::Details);
        assert!(!store.advance());
        assert_eq!(store.step(), WizardStep::Details);
    }

    #[test]
    fn test_walk_all_steps_and_back() {
        let store = filled_store();
        assert!(store.advance());
        assert!(store.advance());
        assert!(store.advance());
        assert_eq!(store.step(), WizardStep::Confirmation);
        assert!(!store.advance());
        assert!(store.back());
        assert_eq!(store.step(), WizardStep::Provider);
    }

    #[test]
    fn test_reset_restores_initial_value() {
        let store = filled_store();
        store.set_budget(Some(20.0), Some(60.0));
        store.set_step(WizardStep::Confirmation);
        store.reset();
        assert_eq!(store.snapshot(), BookingDraft::default());
        assert_eq!(store.snapshot().canton, "JU");
    }

    #[test]
    fn test_preferred_time_needs_date_and_slot() {
        let store = filled_store();
        let date = NaiveDate::from_ymd_opt(2025, 3, 12);
        store.set_preferred_time(date, None);
        assert!(store.snapshot().preferred_time().is_none());

        store.set_preferred_time(date, Some(TimeSlot::Afternoon));
        let time = store.snapshot().preferred_time().unwrap();
        assert_eq!(time.to_rfc3339(), "2025-03-12T12:00:00+00:00");
    }

    #[test]
    fn test_match_request_carries_location() {
        let request = filled_store().snapshot().match_request().unwrap();
        assert_eq!(request.category_id, "c1");
        assert_eq!(request.postal_code, "2800");
        assert_eq!(request.city, "Delémont");
        assert!(request.preferred_time.is_none());
        assert!(BookingDraft::default().match_request().is_none());
    }

    #[test]
    fn test_create_request_defaults_canton_and_drops_zero_budget() {
        let store = filled_store();
        store.set_location("2800", "Delémont", "");
        store.set_budget(Some(0.0), Some(80.0));
        let request = store.snapshot().to_create_request().unwrap();
        assert_eq!(request.canton.as_deref(), Some("JU"));
        assert_eq!(request.budget_min, None);
        assert_eq!(request.budget_max, Some(80.0));
        assert_eq!(request.provider_id, None);
    }
}
