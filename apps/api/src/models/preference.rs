use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::profile::StudentProfile;
use crate::recommendation::merger::{Recommendation, RecommendationOutcome};

/// A recommendation as persisted. The match value lives under `score` in storage
/// and is renamed back to `percentage` only by `RecommendationView`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecommendation {
    pub track: String,
    pub score: u8,
    pub reason: String,
}

impl From<&Recommendation> for StoredRecommendation {
    fn from(rec: &Recommendation) -> Self {
        Self {
            track: rec.track.clone(),
            score: rec.percentage,
            reason: rec.reason.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiRecommendation {
    pub recommendations: Vec<StoredRecommendation>,
    pub suggested_expert_tags: Vec<String>,
    /// Model that produced the answer, or "heuristic" for the local fallback.
    pub model: String,
}

impl From<&RecommendationOutcome> for AiRecommendation {
    fn from(outcome: &RecommendationOutcome) -> Self {
        Self {
            recommendations: outcome
                .recommendations
                .iter()
                .map(StoredRecommendation::from)
                .collect(),
            suggested_expert_tags: outcome.expert_tags.clone(),
            model: outcome.source.clone(),
        }
    }
}

/// Everything needed to insert one submission.
#[derive(Debug, Clone)]
pub struct NewPreference {
    pub email: Option<String>,
    pub profile: StudentProfile,
    pub ai_recommendation: AiRecommendation,
}

#[derive(Debug, Clone, FromRow)]
pub struct PreferenceRow {
    pub id: Uuid,
    pub email: Option<String>,
    pub profile: Json<StudentProfile>,
    pub ai_recommendation: Json<AiRecommendation>,
    pub created_at: DateTime<Utc>,
}

/// A stored submission.
#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceRecord {
    pub id: Uuid,
    pub email: Option<String>,
    pub profile: StudentProfile,
    pub ai_recommendation: AiRecommendation,
    pub created_at: DateTime<Utc>,
}

impl From<PreferenceRow> for PreferenceRecord {
    fn from(row: PreferenceRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            profile: row.profile.0,
            ai_recommendation: row.ai_recommendation.0,
            created_at: row.created_at,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Read views (API shape)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationView {
    pub track: String,
    pub percentage: u8,
    pub reason: String,
}

impl From<StoredRecommendation> for RecommendationView {
    fn from(stored: StoredRecommendation) -> Self {
        Self {
            track: stored.track,
            percentage: stored.score,
            reason: stored.reason,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiRecommendationView {
    pub recommendations: Vec<RecommendationView>,
    pub suggested_expert_tags: Vec<String>,
    pub model: String,
}

/// A stored submission as returned by the admin endpoints: profile fields inline,
/// recommendation values exposed as `percentage`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceView {
    pub id: Uuid,
    pub email: Option<String>,
    #[serde(flatten)]
    pub profile: StudentProfile,
    pub ai_recommendation: AiRecommendationView,
    pub created_at: DateTime<Utc>,
}

impl From<PreferenceRecord> for PreferenceView {
    fn from(record: PreferenceRecord) -> Self {
        let ai = record.ai_recommendation;
        Self {
            id: record.id,
            email: record.email,
            profile: record.profile,
            ai_recommendation: AiRecommendationView {
                recommendations: ai
                    .recommendations
                    .into_iter()
                    .map(RecommendationView::from)
                    .collect(),
                suggested_expert_tags: ai.suggested_expert_tags,
                model: ai.model,
            },
            created_at: record.created_at,
        }
    }
}
