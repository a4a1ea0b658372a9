use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::preference::{AiRecommendation, NewPreference, PreferenceView};
use crate::recommendation::heuristics::{score_tracks, top_n};
use crate::recommendation::merger::{recommend, Recommendation};
use crate::recommendation::validation::{validate_profile, FieldErrors};
use crate::state::AppState;
use crate::store::{
    PreferenceQuery, SkillAverages, TrackStat, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
    RECENT_WINDOW_DAYS,
};

/// Number of heuristic candidates handed to the advisor.
const HEURISTIC_CANDIDATES: usize = 5;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferDetailsResponse {
    pub email: Option<String>,
    pub summary: String,
    pub recommendations: Vec<Recommendation>,
    pub expert_types: Vec<String>,
}

/// POST /aiRoute/preferDetails
pub async fn handle_prefer_details(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PreferDetailsResponse>, AppError> {
    let Json(body) = body.map_err(|rejection| {
        let mut errors = FieldErrors::new();
        errors.insert("form".to_string(), rejection.body_text());
        AppError::InvalidProfile(errors)
    })?;
    let profile = validate_profile(&body).map_err(AppError::InvalidProfile)?;
    let email = email_from_cookies(&jar);

    let ranked = score_tracks(&profile);
    let candidates = top_n(&ranked, HEURISTIC_CANDIDATES);
    let outcome = recommend(state.advisor.as_ref(), email.as_deref(), &profile, &candidates).await;

    let record = state
        .store
        .create(NewPreference {
            email: email.clone(),
            profile,
            ai_recommendation: AiRecommendation::from(&outcome),
        })
        .await?;
    info!("Preference {} saved for {:?}", record.id, record.email);

    Ok(Json(PreferDetailsResponse {
        email,
        summary: outcome.summary,
        recommendations: outcome.recommendations,
        expert_types: outcome.expert_tags,
    }))
}

/// Raw query values. Parsed leniently: anything unparseable falls back to the default.
#[derive(Deserialize, Default)]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
}

impl ListParams {
    fn into_query(self) -> PreferenceQuery {
        let page = self
            .page
            .and_then(|p| p.trim().parse::<u32>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1);
        let limit = self
            .limit
            .and_then(|l| l.trim().parse::<i64>().ok())
            .map(|l| l.clamp(1, i64::from(MAX_PAGE_SIZE)) as u32)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        let search = self
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        PreferenceQuery {
            page,
            limit,
            search,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceListResponse {
    pub preferences: Vec<PreferenceView>,
    pub total_pages: u64,
    pub current_page: u32,
    pub total_preferences: u64,
}

/// GET /aiRoute/getPreferDetails
pub async fn handle_list_preferences(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<PreferenceListResponse>, AppError> {
    let query = params.into_query();
    let page = state.store.list(&query).await?;
    let total_pages = page.total_pages();

    Ok(Json(PreferenceListResponse {
        total_pages,
        current_page: page.page,
        total_preferences: page.total,
        preferences: page.items.into_iter().map(PreferenceView::from).collect(),
    }))
}

/// GET /aiRoute/getPreferDetails/:id
pub async fn handle_get_preference(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PreferenceView>, AppError> {
    let id = Uuid::parse_str(id.trim())
        .map_err(|_| AppError::BadRequest("Invalid preference ID".to_string()))?;
    let record = state
        .store
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Preference not found".to_string()))?;
    Ok(Json(record.into()))
}

/// GET /aiRoute/getPreferDetailsByEmail/:email
pub async fn handle_get_preferences_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Vec<PreferenceView>>, AppError> {
    let email = normalize_email(&email)
        .ok_or_else(|| AppError::BadRequest("Email is required".to_string()))?;
    let records = state.store.find_by_email(&email).await?;
    Ok(Json(records.into_iter().map(PreferenceView::from).collect()))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceStatsResponse {
    pub total_preferences: u64,
    pub recent_preferences: u64,
    pub track_stats: Vec<TrackStat>,
    pub skill_averages: SkillAverages,
}

/// GET /aiRoute/getPreferDetailsStats
pub async fn handle_preference_stats(
    State(state): State<AppState>,
) -> Result<Json<PreferenceStatsResponse>, AppError> {
    let since = Utc::now() - Duration::days(RECENT_WINDOW_DAYS);
    let stats = state.store.stats(since).await?;
    Ok(Json(PreferenceStatsResponse {
        total_preferences: stats.total,
        recent_preferences: stats.recent,
        track_stats: stats.track_stats,
        skill_averages: stats.skill_averages,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Owner identity
// ────────────────────────────────────────────────────────────────────────────

/// Reads the `email` cookie. Blank or missing means an anonymous submission.
///
/// The jar has already percent-decoded the value.
fn email_from_cookies(jar: &CookieJar) -> Option<String> {
    jar.get("email")
        .and_then(|cookie| normalize_email(cookie.value().trim_matches('"')))
}

fn normalize_email(raw: &str) -> Option<String> {
    let email = raw.trim().to_lowercase();
    (!email.is_empty()).then_some(email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderMap, HeaderValue};

    fn cookies(value: &str) -> CookieJar {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(value).unwrap());
        CookieJar::from_headers(&headers)
    }

    #[test]
    fn test_email_cookie_is_trimmed_and_lowercased() {
        let jar = cookies("theme=dark; email= Student%40Uni.LK ; lang=en");
        assert_eq!(email_from_cookies(&jar), Some("student@uni.lk".to_string()));
    }

    #[test]
    fn test_missing_or_blank_email_cookie_is_anonymous() {
        assert_eq!(email_from_cookies(&CookieJar::new()), None);
        assert_eq!(email_from_cookies(&cookies("theme=dark")), None);
        assert_eq!(email_from_cookies(&cookies("email=")), None);
    }

    #[test]
    fn test_quoted_and_encoded_cookie_values() {
        assert_eq!(
            email_from_cookies(&cookies("email=\"a%2Bb%40uni.lk\"")),
            Some("a+b@uni.lk".to_string())
        );
        assert_eq!(
            email_from_cookies(&cookies("email=plain@uni.lk")),
            Some("plain@uni.lk".to_string())
        );
    }

    #[test]
    fn test_list_params_defaults_and_clamping() {
        let q = ListParams::default().into_query();
        assert_eq!(q, PreferenceQuery::default());

        let q = ListParams {
            page: Some("abc".into()),
            limit: Some("500".into()),
            search: Some("  ".into()),
        }
        .into_query();
        assert_eq!(q.page, 1);
        assert_eq!(q.limit, MAX_PAGE_SIZE);
        assert_eq!(q.search, None);

        let q = ListParams {
            page: Some("0".into()),
            limit: Some("-4".into()),
            search: Some(" Data ".into()),
        }
        .into_query();
        assert_eq!(q.page, 1);
        assert_eq!(q.limit, 1);
        assert_eq!(q.search.as_deref(), Some("Data"));
    }
}
