use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("invalid email regex")
});

// Nine or more digits, separated by at most two spacer characters at a time
// and optionally led by a country code. The nine-digit minimum keeps ISO
// dates (8 digits) and grouped fee amounts from matching; commas are not a
// spacer for the same reason.
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+?\d(?:[\s().-]{0,2}\d){8,14}").expect("invalid phone regex"));

/// The kind of direct contact detail found in an outbound message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ContactViolation {
    EmailAddress,
    PhoneNumber,
}

impl fmt::Display for ContactViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmailAddress => write!(f, "an email address"),
            Self::PhoneNumber => write!(f, "a phone number"),
        }
    }
}

/// Scan a message body for email addresses and phone numbers. First contact
/// must go through the marketplace, so a match blocks the message and counts
/// as a moderation strike against the sending team.
pub fn screen_contact_info(body: &str) -> Option<ContactViolation> {
    if EMAIL_RE.is_match(body) {
        return Some(ContactViolation::EmailAddress);
    }
    if PHONE_RE.is_match(body) {
        return Some(ContactViolation::PhoneNumber);
    }
    None
}
