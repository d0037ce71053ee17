use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

pub const INVALID_URL_MESSAGE: &str = "Invalid URL format. Use https://...";
pub const INVALID_EXPIRY_MESSAGE: &str = "Invalid expiry date format.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationLink {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub department: Option<String>,
    /// Informational only: nothing flips `is_active` when this passes.
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl RegistrationLink {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|at| at <= now).unwrap_or(false)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationLinkDraft {
    pub title: String,
    pub url: String,
    pub department: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

lazy_static! {
    static ref URL_RE: Regex = Regex::new(
        r"(?i)^https?://(?:(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+[A-Z]{2,6}\.?|localhost|\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})(?::\d+)?(?:/?|[/?]\S*)$"
    )
    .unwrap();
}

/// Pattern check only: scheme, host shape, optional port and path.
pub fn is_valid_url(url: &str) -> bool {
    URL_RE.is_match(url)
}

/// Trims the input and rejects anything the pattern does not accept.
pub fn validate_url(raw: &str) -> Result<String> {
    let url = raw.trim();
    if is_valid_url(url) {
        Ok(url.to_string())
    } else {
        Err(AppError::Validation(INVALID_URL_MESSAGE.to_string()))
    }
}

const EXPIRY_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Parses the `datetime-local` form value. Blank means no expiry.
pub fn parse_expiry(raw: &str) -> Result<Option<DateTime<Utc>>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let parsed = EXPIRY_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| AppError::Validation(INVALID_EXPIRY_MESSAGE.to_string()))?;

    Ok(Some(DateTime::from_naive_utc_and_offset(parsed, Utc)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_accepts_common_urls() {
        for url in [
            "https://example.com",
            "http://example.com/",
            "https://forms.gle/AbC123",
            "https://sub.domain.college.edu/events/register?id=4",
            "HTTPS://EXAMPLE.ORG",
            "http://localhost",
            "http://localhost:5000/signup",
            "http://192.168.1.10:8080/form",
        ] {
            assert!(is_valid_url(url), "expected {} to be accepted", url);
        }
    }

    #[test]
    fn test_rejects_malformed_urls() {
        for url in [
            "not-a-url",
            "",
            "example.com",
            "ftp://example.com",
            "javascript:alert(1)",
            "https://exa mple.com",
            "https://example.com/with space",
            "https://-bad-.com",
        ] {
            assert!(!is_valid_url(url), "expected {} to be rejected", url);
        }
    }

    #[test]
    fn test_validate_url_trims() {
        assert_eq!(validate_url("  https://example.com  ").unwrap(), "https://example.com");
        match validate_url("not-a-url") {
            Err(AppError::Validation(msg)) => assert_eq!(msg, INVALID_URL_MESSAGE),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_expiry_formats() {
        let expected = Utc.with_ymd_and_hms(2026, 3, 1, 10, 30, 0).unwrap();
        assert_eq!(parse_expiry("2026-03-01T10:30").unwrap(), Some(expected));
        assert_eq!(parse_expiry("2026-03-01 10:30:00").unwrap(), Some(expected));
        assert_eq!(
            parse_expiry("2026-03-01").unwrap(),
            Some(Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_expiry_blank_and_garbage() {
        assert_eq!(parse_expiry("   ").unwrap(), None);
        assert!(matches!(parse_expiry("next friday"), Err(AppError::Validation(_))));
        assert!(parse_expiry("2026-13-01T10:00").is_err());
    }

    #[test]
    fn test_is_expired() {
        let now = Utc::now();
        let mut link = RegistrationLink {
            id: 1,
            title: "Hackathon".into(),
            url: "https://example.com".into(),
            department: None,
            expires_at: None,
            is_active: true,
            created_at: now,
        };
        assert!(!link.is_expired(now));
        link.expires_at = Some(now - Duration::hours(1));
        assert!(link.is_expired(now));
        link.expires_at = Some(now + Duration::hours(1));
        assert!(!link.is_expired(now));
    }
}
