use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::preference::{NewPreference, PreferenceRecord};
use crate::store::{
    Page, PreferenceQuery, PreferenceStats, PreferenceStore, SkillAverages, StoreError, TrackStat,
    TOP_TRACK_LIMIT,
};

/// In-process store for handler tests. Mirrors the Postgres query semantics.
#[derive(Default)]
pub struct MemoryPreferenceStore {
    records: Mutex<Vec<PreferenceRecord>>,
    fail_writes: AtomicBool,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every subsequent `create` returns `StoreError::Unavailable`.
    pub fn failing_writes() -> Self {
        let store = Self::default();
        store.fail_writes.store(true, Ordering::SeqCst);
        store
    }

    pub fn insert(&self, record: PreferenceRecord) {
        self.records.lock().unwrap().push(record);
    }

    pub fn records(&self) -> Vec<PreferenceRecord> {
        self.records.lock().unwrap().clone()
    }

    fn newest_first(&self) -> Vec<PreferenceRecord> {
        let mut all = self.records();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all
    }
}

fn matches_search(record: &PreferenceRecord, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    let email_hit = record
        .email
        .as_deref()
        .is_some_and(|e| e.to_lowercase().contains(&needle));
    email_hit
        || record
            .ai_recommendation
            .recommendations
            .iter()
            .any(|r| r.track.to_lowercase().contains(&needle))
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0u32), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / f64::from(n)
    }
}

#[async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn create(&self, new: NewPreference) -> Result<PreferenceRecord, StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes disabled".to_string()));
        }
        let record = PreferenceRecord {
            id: Uuid::new_v4(),
            email: new.email,
            profile: new.profile,
            ai_recommendation: new.ai_recommendation,
            created_at: Utc::now(),
        };
        self.insert(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PreferenceRecord>, StoreError> {
        Ok(self.records().into_iter().find(|r| r.id == id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Vec<PreferenceRecord>, StoreError> {
        Ok(self
            .newest_first()
            .into_iter()
            .filter(|r| r.email.as_deref() == Some(email))
            .collect())
    }

    async fn list(&self, query: &PreferenceQuery) -> Result<Page<PreferenceRecord>, StoreError> {
        let filtered: Vec<_> = self
            .newest_first()
            .into_iter()
            .filter(|r| query.search.as_deref().map_or(true, |s| matches_search(r, s)))
            .collect();
        let total = filtered.len() as u64;
        let items = filtered
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit as usize)
            .collect();
        Ok(Page {
            items,
            total,
            page: query.page,
            limit: query.limit,
        })
    }

    async fn stats(&self, recent_since: DateTime<Utc>) -> Result<PreferenceStats, StoreError> {
        let all = self.records();

        let mut by_track: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for rec in all.iter().flat_map(|r| &r.ai_recommendation.recommendations) {
            by_track
                .entry(rec.track.clone())
                .or_default()
                .push(f64::from(rec.score));
        }
        let mut track_stats: Vec<TrackStat> = by_track
            .into_iter()
            .map(|(track, scores)| TrackStat {
                track,
                count: scores.len() as u64,
                avg_percentage: mean(scores.into_iter()),
            })
            .collect();
        // BTreeMap order gives the alphabetical tie-break.
        track_stats.sort_by(|a, b| b.count.cmp(&a.count));
        track_stats.truncate(TOP_TRACK_LIMIT);

        let skill = |f: fn(&PreferenceRecord) -> u8| mean(all.iter().map(|r| f64::from(f(r))));

        Ok(PreferenceStats {
            total: all.len() as u64,
            recent: all.iter().filter(|r| r.created_at >= recent_since).count() as u64,
            track_stats,
            skill_averages: SkillAverages {
                avg_programming: skill(|r| r.profile.programming_skill),
                avg_math: skill(|r| r.profile.math_skill),
                avg_cyber: skill(|r| r.profile.cyber_skill),
                avg_uiux: skill(|r| r.profile.uiux_skill),
                avg_research: skill(|r| r.profile.research_skill),
            },
        })
    }
}
