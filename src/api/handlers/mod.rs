//! API handlers and shared validation helpers for JobStar.

pub mod auth;
pub mod health;
pub mod jobs;

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok());

/// Lightweight email sanity check used before persisting an identity.
pub fn valid_email(email: &str) -> bool {
    EMAIL_RE.as_ref().is_some_and(|re| re.is_match(email))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_email_accepts_basic_format() {
        assert!(valid_email("a@x.com"));
        assert!(valid_email("first.last+tag@sub.example.org"));
        assert!(!valid_email("not-an-email"));
        assert!(!valid_email("a@x"));
        assert!(!valid_email("a b@x.com"));
        assert!(!valid_email(""));
    }
}
