//! Terminal rendering of bookings, messages and profiles.

use colored::{ColoredString, Colorize};
use servantin_core::booking::status::{StatusTone, status_label, status_tone};
use servantin_core::booking::{Booking, BookingStatus};
use servantin_core::format::{
    format_currency, format_date, format_date_time, language_label, time_slot_label,
};
use servantin_core::message::Message;
use servantin_core::provider::{ProviderMatch, ProviderProfile};

pub fn status_badge(status: &BookingStatus) -> ColoredString {
    let label = format!(" {} ", status_label(status));
    match status_tone(status) {
        StatusTone::Yellow => label.black().on_yellow(),
        StatusTone::Blue => label.white().on_blue(),
        StatusTone::Red => label.white().on_red(),
        StatusTone::Purple => label.white().on_magenta(),
        StatusTone::Green => label.black().on_green(),
        StatusTone::Gray => label.normal().dimmed(),
    }
}

pub fn heading(text: &str) {
    println!("{}", text.bright_magenta().bold());
}

pub fn success(text: &str) {
    println!("{}", text.green());
}

pub fn notice(text: &str) {
    println!("{}", text.yellow());
}

/// One line per booking: id, badge, category, place, unread count.
pub fn booking_row(booking: &Booking) -> String {
    let mut row = format!(
        "{}  {}  {} · {} {}",
        booking.id.bold(),
        status_badge(&booking.status),
        booking.category.name,
        booking.postal_code,
        booking.city
    );
    if booking.unread_message_count > 0 {
        let unread = booking.unread_message_count;
        let plural = if unread > 1 { "x" } else { "" };
        row.push_str(&format!("  ✉ {unread} nouveau{plural}").cyan().to_string());
    }
    row
}

pub fn booking_details(booking: &Booking) {
    println!("{}  {}", booking.category.name.bold(), status_badge(&booking.status));
    println!("  Lieu         {} {} ({})", booking.postal_code, booking.city, booking.canton);
    if let Some(day) = booking.preferred_day() {
        let slot = booking
            .preferred_time_slot
            .as_deref()
            .map(time_slot_label)
            .map(|label| format!(", {label}"))
            .unwrap_or_default();
        println!("  Date         {}{}", format_date(day), slot);
    }
    match (booking.budget_min, booking.budget_max) {
        (Some(min), Some(max)) => println!(
            "  Budget       {} - {}",
            format_currency(min),
            format_currency(max)
        ),
        (Some(min), None) => println!("  Budget       dès {}", format_currency(min)),
        (None, Some(max)) => println!("  Budget       jusqu'à {}", format_currency(max)),
        (None, None) => {}
    }
    if let Some(price) = booking.agreed_price {
        println!("  Prix convenu {}", format_currency(price));
    }
    match &booking.provider {
        Some(provider) => {
            let badge = if provider.is_verified { " ✔" } else { "" };
            println!("  Prestataire  {}{}", provider.name, badge);
        }
        None => println!("  Prestataire  {}", "en attente d'attribution".dimmed()),
    }
    println!("  Créée le     {}", format_date_time(booking.created_at));
    if !booking.description.is_empty() {
        println!();
        println!("  {}", booking.description);
    }
}

pub fn message_line(message: &Message, own: bool) -> String {
    let when = format_date_time(message.created_at).dimmed();
    if own {
        format!("{:>60}  {}", message.content.green(), when)
    } else {
        let name = if message.sender_name.is_empty() {
            "Prestataire"
        } else {
            message.sender_name.as_str()
        };
        format!("{}: {}  {}", name.bold(), message.content, when)
    }
}

pub fn provider_match_line(provider: &ProviderMatch) -> String {
    let rating = provider
        .average_rating
        .map(|r| format!("★ {r:.1} ({})", provider.rating_count))
        .unwrap_or_else(|| "nouveau".to_string());
    let price = provider
        .hourly_rate
        .map(|rate| format!("{}/h", format_currency(rate)))
        .or_else(|| provider.fixed_price.map(format_currency))
        .unwrap_or_default();
    let verified = if provider.is_verified { " ✔" } else { "" };
    format!(
        "{}  {}{}  {}  {}  {}",
        provider.id.dimmed(),
        provider.name.bold(),
        verified,
        provider.city,
        rating,
        price
    )
}

pub fn profile(profile: &ProviderProfile, category_names: &[String]) {
    let verified = if profile.is_verified {
        "vérifié".green()
    } else {
        "non vérifié".yellow()
    };
    println!("{} ({})", profile.name.bold(), verified);
    println!("  {}", profile.bio);
    println!("  Services     {}", category_names.join(", "));
    let languages: Vec<String> = profile.languages.iter().map(|l| language_label(l)).collect();
    println!("  Langues      {}", languages.join(", "));
    println!(
        "  Zone         {} {} (+{} km)",
        profile.postal_code, profile.city, profile.service_radius
    );
    println!("  Tarif        {}/h", format_currency(profile.hourly_rate));
    println!("  Expérience   {} ans", profile.years_of_experience);
    for (i, certification) in profile.certifications.iter().enumerate() {
        println!("  [{}] {}", i + 1, certification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_status_badge_keeps_raw_label() {
        colored::control::set_override(false);
        let badge = status_badge(&BookingStatus::parse("CONFIRMED"));
        assert_eq!(badge.to_string(), " CONFIRMED ");
        let badge = status_badge(&BookingStatus::Accepted);
        assert_eq!(badge.to_string(), " Acceptée ");
    }
}
