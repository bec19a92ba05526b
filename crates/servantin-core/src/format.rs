//! Display formatting in Swiss French.

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};

const MONTHS_LONG: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

const MONTHS_SHORT: [&str; 12] = [
    "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.", "nov.",
    "déc.",
];

/// Languages a provider can offer, with their labels.
pub const PROVIDER_LANGUAGES: [(&str, &str); 4] = [
    ("fr", "Français"),
    ("de", "Allemand"),
    ("it", "Italien"),
    ("en", "Anglais"),
];

/// `1'250.00 CHF`
pub fn format_currency(amount: f64) -> String {
    format_amount(amount, "CHF")
}

pub fn format_amount(amount: f64, currency: &str) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let units = (cents / 100).to_string();
    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, digit) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push('\'');
        }
        grouped.push(digit);
    }
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}{grouped}.{:02} {currency}", cents % 100)
}

/// `5 mars 2025`
pub fn format_date(date: NaiveDate) -> String {
    format!(
        "{} {} {}",
        date.day(),
        MONTHS_LONG[date.month0() as usize],
        date.year()
    )
}

/// `5 mars 2025, 14:30`
pub fn format_date_time(at: DateTime<Utc>) -> String {
    format!(
        "{} {} {}, {:02}:{:02}",
        at.day(),
        MONTHS_SHORT[at.month0() as usize],
        at.year(),
        at.hour(),
        at.minute()
    )
}

/// Label for a raw time slot; unknown values are echoed.
pub fn time_slot_label(slot: &str) -> String {
    match slot {
        "MORNING" => "Matin (8h-12h)".to_string(),
        "AFTERNOON" => "Après-midi (12h-17h)".to_string(),
        "EVENING" => "Soir (17h-21h)".to_string(),
        other => other.to_string(),
    }
}

pub fn category_icon(icon: &str) -> &'static str {
    match icon {
        "baby" => "👶",
        "wrench" => "🔧",
        "heart-pulse" => "❤️",
        "file-text" => "📄",
        "briefcase" => "💼",
        "plane" => "✈️",
        "hand-helping" => "🤝",
        _ => "📋",
    }
}

pub fn language_label(code: &str) -> String {
    match code {
        "fr" => "Français".to_string(),
        "de" => "Allemand".to_string(),
        "en" => "Anglais".to_string(),
        "it" => "Italien".to_string(),
        "pt" => "Portugais".to_string(),
        "es" => "Espagnol".to_string(),
        other => other.to_uppercase(),
    }
}
