use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::models::preference::{NewPreference, PreferenceRecord, PreferenceRow};
use crate::store::{
    Page, PreferenceQuery, PreferenceStats, PreferenceStore, SkillAverages, StoreError, TrackStat,
    TOP_TRACK_LIMIT,
};

/// PostgreSQL-backed store. The profile and the recommendation block are JSONB
/// columns, so one submission is exactly one INSERT.
#[derive(Clone)]
pub struct PgPreferenceStore {
    pool: PgPool,
}

impl PgPreferenceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct TrackStatRow {
    track: String,
    count: i64,
    avg_percentage: f64,
}

#[derive(FromRow)]
struct SkillAverageRow {
    avg_programming: Option<f64>,
    avg_math: Option<f64>,
    avg_cyber: Option<f64>,
    avg_uiux: Option<f64>,
    avg_research: Option<f64>,
}

/// Matches rows whose email or any recommended track contains `$1` (an ILIKE pattern).
const SEARCH_FILTER: &str = r#"
    ($1::text IS NULL
     OR email ILIKE $1
     OR EXISTS (
         SELECT 1
         FROM jsonb_array_elements(ai_recommendation->'recommendations') AS rec
         WHERE rec->>'track' ILIKE $1
     ))
"#;

#[async_trait]
impl PreferenceStore for PgPreferenceStore {
    async fn create(&self, new: NewPreference) -> Result<PreferenceRecord, StoreError> {
        let row = sqlx::query_as::<_, PreferenceRow>(
            r#"
            INSERT INTO preferences (id, email, profile, ai_recommendation)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, profile, ai_recommendation, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.email)
        .bind(Json(&new.profile))
        .bind(Json(&new.ai_recommendation))
        .fetch_one(&self.pool)
        .await?;

        info!("Stored preference {} (model: {})", row.id, row.ai_recommendation.model);
        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PreferenceRecord>, StoreError> {
        let row = sqlx::query_as::<_, PreferenceRow>(
            "SELECT id, email, profile, ai_recommendation, created_at FROM preferences WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(PreferenceRecord::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Vec<PreferenceRecord>, StoreError> {
        let rows = sqlx::query_as::<_, PreferenceRow>(
            r#"
            SELECT id, email, profile, ai_recommendation, created_at
            FROM preferences
            WHERE email = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(PreferenceRecord::from).collect())
    }

    async fn list(&self, query: &PreferenceQuery) -> Result<Page<PreferenceRecord>, StoreError> {
        let pattern = query.search.as_deref().map(ilike_pattern);

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM preferences WHERE {SEARCH_FILTER}"
        ))
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, PreferenceRow>(&format!(
            r#"
            SELECT id, email, profile, ai_recommendation, created_at
            FROM preferences
            WHERE {SEARCH_FILTER}
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(&pattern)
        .bind(i64::from(query.limit))
        .bind(query.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(Page {
            items: rows.into_iter().map(PreferenceRecord::from).collect(),
            total: total.max(0) as u64,
            page: query.page,
            limit: query.limit,
        })
    }

    async fn stats(&self, recent_since: DateTime<Utc>) -> Result<PreferenceStats, StoreError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM preferences")
            .fetch_one(&self.pool)
            .await?;

        let recent: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM preferences WHERE created_at >= $1")
                .bind(recent_since)
                .fetch_one(&self.pool)
                .await?;

        let track_rows = sqlx::query_as::<_, TrackStatRow>(
            r#"
            SELECT rec->>'track' AS track,
                   COUNT(*) AS count,
                   AVG((rec->>'score')::float8) AS avg_percentage
            FROM preferences,
                 jsonb_array_elements(ai_recommendation->'recommendations') AS rec
            GROUP BY rec->>'track'
            ORDER BY count DESC, track ASC
            LIMIT $1
            "#,
        )
        .bind(TOP_TRACK_LIMIT as i64)
        .fetch_all(&self.pool)
        .await?;

        let skills = sqlx::query_as::<_, SkillAverageRow>(
            r#"
            SELECT AVG((profile->>'programmingSkill')::float8) AS avg_programming,
                   AVG((profile->>'mathSkill')::float8)        AS avg_math,
                   AVG((profile->>'cyberSkill')::float8)       AS avg_cyber,
                   AVG((profile->>'uiuxSkill')::float8)        AS avg_uiux,
                   AVG((profile->>'researchSkill')::float8)    AS avg_research
            FROM preferences
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(PreferenceStats {
            total: total.max(0) as u64,
            recent: recent.max(0) as u64,
            track_stats: track_rows
                .into_iter()
                .map(|r| TrackStat {
                    track: r.track,
                    count: r.count.max(0) as u64,
                    avg_percentage: r.avg_percentage,
                })
                .collect(),
            skill_averages: SkillAverages {
                avg_programming: skills.avg_programming.unwrap_or(0.0),
                avg_math: skills.avg_math.unwrap_or(0.0),
                avg_cyber: skills.avg_cyber.unwrap_or(0.0),
                avg_uiux: skills.avg_uiux.unwrap_or(0.0),
                avg_research: skills.avg_research.unwrap_or(0.0),
            },
        })
    }
}

/// Wraps a user search term in `%…%`, escaping LIKE metacharacters.
fn ilike_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for c in search.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
