//! Provider-side models: matching results, the editable profile and admin views.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Search criteria for `POST /api/providers/match`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequest {
    pub category_id: String,
    pub postal_code: String,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_time: Option<DateTime<Utc>>,
}

/// A provider returned by matching, in the server's ranking order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderMatch {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub rating_count: u32,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub hourly_rate: Option<f64>,
    #[serde(default)]
    pub fixed_price: Option<f64>,
    #[serde(default)]
    pub pricing_type: String,
    #[serde(default)]
    pub response_time_minutes: Option<u32>,
}

/// The signed-in provider's own profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderProfile {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub category_ids: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub service_radius: u32,
    #[serde(default)]
    pub hourly_rate: f64,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub years_of_experience: u32,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default, alias = "totalReviews")]
    pub rating_count: u32,
}

impl ProviderProfile {
    /// The editable part of the profile, as sent back on save.
    pub fn to_request(&self) -> ProviderProfileRequest {
        ProviderProfileRequest {
            bio: self.bio.clone(),
            category_ids: self.category_ids.clone(),
            languages: self.languages.clone(),
            postal_code: self.postal_code.clone(),
            city: self.city.clone(),
            service_radius: self.service_radius,
            hourly_rate: self.hourly_rate,
            certifications: self.certifications.clone(),
            years_of_experience: self.years_of_experience,
        }
    }
}

pub const DEFAULT_SERVICE_RADIUS: u32 = 20;
pub const DEFAULT_HOURLY_RATE: f64 = 30.0;

/// Body of `POST` and `PUT /api/providers/profile`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderProfileRequest {
    pub bio: String,
    pub category_ids: Vec<String>,
    pub languages: Vec<String>,
    pub postal_code: String,
    pub city: String,
    pub service_radius: u32,
    pub hourly_rate: f64,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub years_of_experience: u32,
}

impl Default for ProviderProfileRequest {
    fn default() -> Self {
        Self {
            bio: String::new(),
            category_ids: Vec::new(),
            languages: vec!["fr".to_string()],
            postal_code: String::new(),
            city: String::new(),
            service_radius: DEFAULT_SERVICE_RADIUS,
            hourly_rate: DEFAULT_HOURLY_RATE,
            certifications: Vec::new(),
            years_of_experience: 0,
        }
    }
}

impl ProviderProfileRequest {
    /// Adds the id if absent, removes it otherwise.
    pub fn toggle_category(&mut self, id: &str) {
        toggle(&mut self.category_ids, id);
    }

    pub fn toggle_language(&mut self, code: &str) {
        toggle(&mut self.languages, code);
    }

    /// Appends a trimmed, non-empty certification.
    pub fn add_certification(&mut self, certification: &str) -> bool {
        let certification = certification.trim();
        if certification.is_empty() {
            return false;
        }
        self.certifications.push(certification.to_string());
        true
    }

    pub fn remove_certification(&mut self, index: usize) -> Option<String> {
        (index < self.certifications.len()).then(|| self.certifications.remove(index))
    }
}

fn toggle(values: &mut Vec<String>, value: &str) {
    if let Some(position) = values.iter().position(|v| v == value) {
        values.remove(position);
    } else {
        values.push(value.to_string());
    }
}

/// A provider as listed in the admin console.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProvider {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub verification_notes: Option<String>,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub rating_count: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
