//! Password rules shown as checklists on the registration and reset forms.

use once_cell::sync::Lazy;
use regex::Regex;

static UPPERCASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]").unwrap());
static LOWERCASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z]").unwrap());
static DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]").unwrap());
static SPECIAL: Lazy<Regex> = Lazy::new(|| Regex::new(r#"[!@#$%^&*(),.?":{}|<>]"#).unwrap());

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// One line of a password checklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordRule {
    pub label: &'static str,
    pub met: bool,
}

fn long_enough(password: &str) -> PasswordRule {
    PasswordRule {
        label: "Au moins 8 caractères",
        met: password.chars().count() >= MIN_PASSWORD_LENGTH,
    }
}

/// Rules displayed while registering.
pub fn registration_checklist(password: &str) -> Vec<PasswordRule> {
    vec![
        long_enough(password),
        PasswordRule {
            label: "Une majuscule",
            met: UPPERCASE.is_match(password),
        },
        PasswordRule {
            label: "Un chiffre",
            met: DIGIT.is_match(password),
        },
    ]
}

/// Rules a new password must meet when resetting it.
pub fn reset_checklist(password: &str) -> Vec<PasswordRule> {
    vec![
        long_enough(password),
        PasswordRule {
            label: "Une lettre majuscule",
            met: UPPERCASE.is_match(password),
        },
        PasswordRule {
            label: "Une lettre minuscule",
            met: LOWERCASE.is_match(password),
        },
        PasswordRule {
            label: "Un chiffre",
            met: DIGIT.is_match(password),
        },
        PasswordRule {
            label: "Un caractère spécial",
            met: SPECIAL.is_match(password),
        },
    ]
}

pub fn all_met(rules: &[PasswordRule]) -> bool {
    rules.iter().all(|rule| rule.met)
}

/// Confirmation must be non-empty and identical.
pub fn passwords_match(password: &str, confirmation: &str) -> bool {
    !confirmation.is_empty() && password == confirmation
}
