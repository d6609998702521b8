//! Validated inputs for the banner operations.
//!
//! Raw query and path strings are parsed into these types before any store is
//! touched, so the aggregator only ever sees well-formed requests.

use std::fmt;

use serde::Serialize;
use utoipa::ToSchema;

use super::BannerError;

/// Which content kind a banner was projected from.
///
/// Declaration order is the tie-break order for banners sharing a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BannerKind {
    Event,
    Info,
}

impl BannerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BannerKind::Event => "event",
            BannerKind::Info => "info",
        }
    }

    /// Exact, case-sensitive match on `"event"` or `"info"`.
    pub fn parse(raw: &str) -> Result<Self, BannerError> {
        match raw {
            "event" => Ok(BannerKind::Event),
            "info" => Ok(BannerKind::Info),
            _ => Err(BannerError::InvalidType),
        }
    }
}

impl fmt::Display for BannerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Page size for the banner feed, always within `1..=50`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BannerLimit(u32);

impl BannerLimit {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 50;
    pub const DEFAULT: BannerLimit = BannerLimit(10);

    pub fn new(value: i64) -> Result<Self, BannerError> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            Ok(BannerLimit(value as u32))
        } else {
            Err(BannerError::InvalidLimit)
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for BannerLimit {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Options for listing banners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListBannersOptions {
    pub limit: BannerLimit,
}

impl ListBannersOptions {
    /// Parse the raw `limit` query value.
    ///
    /// Absent or blank falls back to the default. Anything else must be a
    /// whole number in range; `"5.5"` and `"abc"` are rejected.
    pub fn parse(raw_limit: Option<&str>) -> Result<Self, BannerError> {
        let limit = match raw_limit.map(str::trim) {
            None | Some("") => BannerLimit::DEFAULT,
            Some(raw) => {
                let value: i64 = raw.parse().map_err(|_| BannerError::InvalidLimit)?;
                BannerLimit::new(value)?
            }
        };

        Ok(Self { limit })
    }
}

/// Natural key of a single banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BannerKey {
    pub kind: BannerKind,
    pub id: i32,
}

impl BannerKey {
    /// Parse the `{type}/{id}` path segments. The id is checked first.
    pub fn parse(raw_kind: &str, raw_id: &str) -> Result<Self, BannerError> {
        let id = raw_id
            .trim()
            .parse::<i32>()
            .map_err(|_| BannerError::InvalidId)?;
        let kind = BannerKind::parse(raw_kind)?;

        Ok(Self { kind, id })
    }
}
