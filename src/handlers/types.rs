//! # Common API Types
//!
//! Response envelopes shared by every endpoint plus the query and body
//! parsing helpers used by the content handlers.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::error::ContentError;

/// Success envelope: `{success: true, data, message?}`
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Always `true`
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.into()),
        }
    }
}

/// Envelope for responses that carry no data
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Offset pagination metadata for the content listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Pagination {
    pub total: u64,
    /// Requested limit, or `total` when no limit was given
    pub limit: u64,
    pub offset: u64,
    /// Only computed when both `limit` and `offset` were given
    #[serde(rename = "hasMore")]
    pub has_more: bool,
}

/// Validated `limit`/`offset` pair for content listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageParams {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Largest page the content listings serve.
pub const MAX_CONTENT_LIMIT: u64 = 100;

impl PageParams {
    pub fn parse(limit: Option<&str>, offset: Option<&str>) -> Result<Self, ContentError> {
        let limit = match non_blank(limit) {
            None => None,
            Some(raw) => match raw.parse::<i64>() {
                Ok(value) if (1..=MAX_CONTENT_LIMIT as i64).contains(&value) => {
                    Some(value as u64)
                }
                _ => {
                    return Err(ContentError::InvalidLimit {
                        max: MAX_CONTENT_LIMIT,
                    });
                }
            },
        };

        let offset = match non_blank(offset) {
            None => None,
            Some(raw) => match raw.parse::<i64>() {
                Ok(value) if value >= 0 => Some(value as u64),
                _ => return Err(ContentError::InvalidOffset),
            },
        };

        Ok(Self { limit, offset })
    }

    pub fn pagination(&self, total: u64) -> Pagination {
        let has_more = match (self.limit, self.offset) {
            (Some(limit), Some(offset)) => offset + limit < total,
            _ => false,
        };

        Pagination {
            total,
            limit: self.limit.unwrap_or(total),
            offset: self.offset.unwrap_or(0),
            has_more,
        }
    }

    pub fn page(&self) -> crate::repositories::Page {
        crate::repositories::Page {
            limit: self.limit,
            offset: self.offset,
        }
    }
}

/// `"true"` and `"false"` filter; anything else means no filter.
pub fn parse_featured(raw: Option<&str>) -> Option<bool> {
    match raw {
        Some("true") => Some(true),
        Some("false") => Some(false),
        _ => None,
    }
}

/// Parse a numeric path id.
pub fn parse_id(raw: &str, entity: &'static str) -> Result<i32, ContentError> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| ContentError::InvalidId(entity))
}

/// Parse an instant from RFC 3339 or one of the naive formats (read as UTC).
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Parse a date field that must be present.
pub fn required_instant(
    raw: Option<&str>,
    field: &'static str,
) -> Result<DateTime<Utc>, ContentError> {
    let raw = non_blank(raw).ok_or(ContentError::MissingField(field))?;
    parse_instant(raw).ok_or(ContentError::InvalidDate(field))
}

/// Parse a date field that may be absent. Blank counts as absent.
pub fn optional_instant(
    raw: Option<&str>,
    field: &'static str,
) -> Result<Option<DateTime<Utc>>, ContentError> {
    non_blank(raw)
        .map(|raw| parse_instant(raw).ok_or(ContentError::InvalidDate(field)))
        .transpose()
}

/// Require a non-blank text field.
pub fn required_text(raw: Option<String>, field: &'static str) -> Result<String, ContentError> {
    raw.filter(|value| !value.trim().is_empty())
        .ok_or(ContentError::MissingField(field))
}

/// Blank strings are treated as absent.
pub fn optional_text(raw: Option<String>) -> Option<String> {
    raw.filter(|value| !value.trim().is_empty())
}

/// Map a three-state update field: absent, explicit `null`/blank (clear), or a value.
pub fn nullable_text(raw: Option<Option<String>>) -> Option<Option<String>> {
    raw.map(optional_text)
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}

/// Distinguishes a missing field (`None`) from an explicit `null` (`Some(None)`).
///
/// Use with `#[serde(default, deserialize_with = "deserialize_nullable")]`.
pub fn deserialize_nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_supported_instant_formats() {
        let expected = Utc.with_ymd_and_hms(2025, 2, 17, 12, 0, 0).unwrap();

        assert_eq!(parse_instant("2025-02-17T12:00:00Z"), Some(expected));
        assert_eq!(parse_instant("2025-02-17T13:00:00+01:00"), Some(expected));
        assert_eq!(parse_instant("2025-02-17T12:00:00.000Z"), Some(expected));
        assert_eq!(parse_instant("2025-02-17T12:00:00"), Some(expected));
        assert_eq!(parse_instant("2025-02-17 12:00:00"), Some(expected));
        assert_eq!(parse_instant("2025-02-17T12:00"), Some(expected));
        assert_eq!(
            parse_instant("2025-02-17"),
            Some(Utc.with_ymd_and_hms(2025, 2, 17, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn rejects_garbage_instants() {
        assert_eq!(parse_instant("not-a-date"), None);
        assert_eq!(parse_instant("2025-13-45"), None);
        assert_eq!(parse_instant(""), None);
    }

    #[test]
    fn page_params_validation() {
        assert_eq!(
            PageParams::parse(None, None).unwrap(),
            PageParams::default()
        );
        assert_eq!(
            PageParams::parse(Some("100"), Some("0")).unwrap(),
            PageParams {
                limit: Some(100),
                offset: Some(0)
            }
        );
        assert_eq!(
            PageParams::parse(Some("101"), None),
            Err(ContentError::InvalidLimit { max: 100 })
        );
        assert_eq!(
            PageParams::parse(Some("0"), None),
            Err(ContentError::InvalidLimit { max: 100 })
        );
        assert_eq!(
            PageParams::parse(None, Some("-1")),
            Err(ContentError::InvalidOffset)
        );
    }

    #[test]
    fn pagination_has_more_needs_limit_and_offset() {
        let both = PageParams {
            limit: Some(2),
            offset: Some(0),
        };
        assert!(both.pagination(5).has_more);
        assert!(!both.pagination(2).has_more);

        let limit_only = PageParams {
            limit: Some(2),
            offset: None,
        };
        let pagination = limit_only.pagination(5);
        assert!(!pagination.has_more);
        assert_eq!(pagination.offset, 0);

        let neither = PageParams::default().pagination(7);
        assert_eq!(neither.limit, 7);
    }

    #[test]
    fn featured_filter_accepts_only_literal_booleans() {
        assert_eq!(parse_featured(Some("true")), Some(true));
        assert_eq!(parse_featured(Some("false")), Some(false));
        assert_eq!(parse_featured(Some("yes")), None);
        assert_eq!(parse_featured(None), None);
    }

    #[test]
    fn nullable_fields_distinguish_null_from_missing() {
        #[derive(Deserialize)]
        struct Body {
            #[serde(default, deserialize_with = "deserialize_nullable")]
            location: Option<Option<String>>,
        }

        let missing: Body = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.location, None);

        let null: Body = serde_json::from_str(r#"{"location": null}"#).unwrap();
        assert_eq!(null.location, Some(None));

        let value: Body = serde_json::from_str(r#"{"location": "Kirken"}"#).unwrap();
        assert_eq!(value.location, Some(Some("Kirken".to_string())));
    }
}
