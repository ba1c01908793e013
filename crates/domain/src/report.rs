//! Paginated pickup-point reports with nested receptions and products.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{PickupPoint, Product, Reception};

pub const DEFAULT_LIMIT: i64 = 10;

/// Optional creation-time window for receptions, half-open: `[start, end)`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ReceptionWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl ReceptionWindow {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.is_none_or(|start| at >= start) && self.end.is_none_or(|end| at < end)
    }
}

/// Normalized report query.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ReportFilter {
    pub window: ReceptionWindow,
    pub page: i64,
    pub limit: i64,
}

impl ReportFilter {
    /// An end bound at or before the start bound is dropped rather than
    /// rejected. Non-positive limits default to 10, pages below 1 to 1.
    pub fn normalize(
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        page: i64,
        limit: i64,
    ) -> Self {
        let end = match (start, end) {
            (Some(start), Some(end)) if end <= start => None,
            (_, end) => end,
        };

        Self {
            window: ReceptionWindow { start, end },
            page: page.max(1),
            limit: if limit <= 0 { DEFAULT_LIMIT } else { limit },
        }
    }

    /// Number of pickup points skipped ahead of the page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceptionReport {
    pub reception: Reception,
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickupPointReport {
    pub pickup_point: PickupPoint,
    pub receptions: Vec<ReceptionReport>,
}
