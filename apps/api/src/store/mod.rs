//! Preference store: persistence seam for submitted profiles and their recommendations.
//!
//! Default: `PgPreferenceStore` (PostgreSQL via sqlx).
//! `AppState` holds an `Arc<dyn PreferenceStore>`; tests swap in `MemoryPreferenceStore`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::preference::{NewPreference, PreferenceRecord};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgPreferenceStore;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;
/// Window used for the "recent submissions" statistic.
pub const RECENT_WINDOW_DAYS: i64 = 7;
/// How many tracks the statistics endpoint ranks.
pub const TOP_TRACK_LIMIT: usize = 5;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                StoreError::Unavailable(e.to_string())
            }
            other => StoreError::Database(other),
        }
    }
}

/// Paging and search options for the admin listing.
#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceQuery {
    /// 1-based.
    pub page: u32,
    pub limit: u32,
    /// Case-insensitive substring over owner email or any recommended track.
    pub search: Option<String>,
}

impl Default for PreferenceQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            search: None,
        }
    }
}

impl PreferenceQuery {
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u64 {
        if self.limit == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.limit))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackStat {
    pub track: String,
    pub count: u64,
    pub avg_percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillAverages {
    pub avg_programming: f64,
    pub avg_math: f64,
    pub avg_cyber: f64,
    pub avg_uiux: f64,
    pub avg_research: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceStats {
    pub total: u64,
    pub recent: u64,
    /// Most recommended tracks, most frequent first, at most `TOP_TRACK_LIMIT`.
    pub track_stats: Vec<TrackStat>,
    pub skill_averages: SkillAverages,
}

/// Persistence operations used by the recommendation and admin handlers.
///
/// Every submission is appended; nothing here updates or deduplicates.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn create(&self, new: NewPreference) -> Result<PreferenceRecord, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PreferenceRecord>, StoreError>;

    /// Newest first.
    async fn find_by_email(&self, email: &str) -> Result<Vec<PreferenceRecord>, StoreError>;

    /// Newest first.
    async fn list(&self, query: &PreferenceQuery) -> Result<Page<PreferenceRecord>, StoreError>;

    /// `recent_since` bounds the `recent` counter.
    async fn stats(&self, recent_since: DateTime<Utc>) -> Result<PreferenceStats, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_is_zero_based() {
        let q = PreferenceQuery {
            page: 3,
            limit: 10,
            search: None,
        };
        assert_eq!(q.offset(), 20);
        assert_eq!(
            PreferenceQuery {
                page: 0,
                ..PreferenceQuery::default()
            }
            .offset(),
            0
        );
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let page: Page<()> = Page {
            items: vec![],
            total: 21,
            page: 1,
            limit: 10,
        };
        assert_eq!(page.total_pages(), 3);

        let empty: Page<()> = Page {
            items: vec![],
            total: 0,
            page: 1,
            limit: 10,
        };
        assert_eq!(empty.total_pages(), 0);
    }
}
