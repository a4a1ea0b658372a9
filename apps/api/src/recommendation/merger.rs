//! Recommendation merger: turns the heuristic ranking into three explained
//! recommendations.
//!
//! Flow: heuristic top-5 + profile → advisor model → lenient parse → top up tags/summary.
//! Any failure on the model path (transport, API status, unparseable or short reply)
//! is logged and replaced by a deterministic answer built from the heuristic top-3.
//! `recommend` therefore never fails.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::prompts::{CLOSED_VOCABULARY_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::llm_client::{ChatCompletion, LlmError};
use crate::models::profile::StudentProfile;
use crate::recommendation::heuristics::TrackScore;
use crate::recommendation::prompts::ADVISOR_SYSTEM_TEMPLATE;
use crate::recommendation::tracks::{LearningEase, Track};

pub const RECOMMENDATION_COUNT: usize = 3;
pub const MIN_EXPERT_TAGS: usize = 5;
/// `source` value for outcomes produced without the model.
pub const HEURISTIC_SOURCE: &str = "heuristic";

const FALLBACK_REASON: &str = "Aligned with your interests and skills.";

const DEFAULT_EXPERT_TAGS: [&str; MIN_EXPERT_TAGS] = [
    "Senior Software Engineer",
    "Data Scientist",
    "DevOps/Cloud Engineer",
    "Cyber Security Analyst",
    "Network Engineer",
];

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// One explained track recommendation. `percentage` is the canonical name for the
/// match value everywhere inside the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub track: String,
    pub percentage: u8,
    pub reason: String,
    pub roles: Vec<String>,
    pub required_skills: Vec<String>,
    pub develop_next: Vec<String>,
    pub learning_ease: LearningEase,
    pub future_scope: String,
    pub opportunities: String,
}

/// The merged answer for one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationOutcome {
    pub recommendations: Vec<Recommendation>,
    pub expert_tags: Vec<String>,
    pub summary: String,
    /// Model name, or `HEURISTIC_SOURCE` when the fallback answered.
    pub source: String,
}

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("advisor call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("advisor reply is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("advisor returned {got} usable recommendations, need 3")]
    TooFew { got: usize },
}

/// Grounding context sent as the user message.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AdvisorRequest<'a> {
    email: Option<&'a str>,
    payload: &'a StudentProfile,
    heuristic_top5: &'a [TrackScore],
}

/// Reply shape as the model actually sends it. Missing and `null` fields both
/// take their default, so a partially filled reply can still be used.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdvisorReply {
    #[serde(default, deserialize_with = "null_as_default")]
    recommendations: Vec<AdvisorRecommendation>,
    #[serde(default, deserialize_with = "null_as_default")]
    suggested_expert_tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    summary: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdvisorRecommendation {
    #[serde(default, deserialize_with = "null_as_default")]
    track: String,
    percentage: Option<Value>,
    /// Older reply shape; read only when `percentage` is missing.
    score: Option<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    reason: String,
    #[serde(default, deserialize_with = "null_as_default")]
    roles: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    required_skills: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    develop_next: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    learning_ease: String,
    #[serde(default, deserialize_with = "null_as_default")]
    future_scope: String,
    #[serde(default, deserialize_with = "null_as_default")]
    opportunities: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl AdvisorRecommendation {
    fn into_recommendation(self) -> Recommendation {
        let percentage = self
            .percentage
            .as_ref()
            .and_then(read_percentage)
            .or_else(|| self.score.as_ref().and_then(read_percentage))
            .unwrap_or(0);

        // Known tracks are re-spelled canonically; anything else is kept as sent.
        let track = self.track.trim();
        let track = track
            .parse::<Track>()
            .map(|t| t.name().to_string())
            .unwrap_or_else(|_| track.to_string());

        Recommendation {
            track,
            percentage,
            reason: self.reason,
            roles: self.roles,
            required_skills: self.required_skills,
            develop_next: self.develop_next,
            learning_ease: LearningEase::parse_lenient(&self.learning_ease),
            future_scope: self.future_scope,
            opportunities: self.opportunities,
        }
    }
}

/// Accepts numbers and numeric strings; rounds and clamps to 0..=100.
fn read_percentage(value: &Value) -> Option<u8> {
    let raw = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !raw.is_finite() {
        return None;
    }
    Some(raw.round().clamp(0.0, 100.0) as u8)
}

// ────────────────────────────────────────────────────────────────────────────
// Merge pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Produces exactly three recommendations for a profile.
///
/// `heuristic_top5` must already be ranked (see `heuristics::score_tracks`).
pub async fn recommend(
    oracle: &dyn ChatCompletion,
    email: Option<&str>,
    profile: &StudentProfile,
    heuristic_top5: &[TrackScore],
) -> RecommendationOutcome {
    match ask_advisor(oracle, email, profile, heuristic_top5).await {
        Ok(outcome) => {
            info!(
                "Advisor ({}) recommended: {}",
                outcome.source,
                track_list(&outcome.recommendations)
            );
            outcome
        }
        Err(e) => {
            warn!("Advisor unavailable, using heuristic fallback: {e}");
            fallback(heuristic_top5)
        }
    }
}

async fn ask_advisor(
    oracle: &dyn ChatCompletion,
    email: Option<&str>,
    profile: &StudentProfile,
    heuristic_top5: &[TrackScore],
) -> Result<RecommendationOutcome, MergeError> {
    let system = build_system_prompt();
    let user = serde_json::to_string(&AdvisorRequest {
        email,
        payload: profile,
        heuristic_top5,
    })?;

    let text = oracle.complete_json(&system, &user).await?;
    let mut outcome = parse_reply(&text)?;
    outcome.source = oracle.model().to_string();
    Ok(outcome)
}

pub fn build_system_prompt() -> String {
    let tracks = Track::ALL
        .iter()
        .map(Track::name)
        .collect::<Vec<_>>()
        .join(", ");

    ADVISOR_SYSTEM_TEMPLATE
        .replace("{tracks}", &tracks)
        .replace("{closed_vocabulary}", CLOSED_VOCABULARY_INSTRUCTION)
        .replace("{json_only}", JSON_ONLY_SYSTEM)
}

/// Parses and normalizes a model reply. `source` is left empty for the caller.
fn parse_reply(text: &str) -> Result<RecommendationOutcome, MergeError> {
    let reply: AdvisorReply = serde_json::from_str(text)?;

    let recommendations: Vec<Recommendation> = reply
        .recommendations
        .into_iter()
        .map(AdvisorRecommendation::into_recommendation)
        .filter(|r| !r.track.is_empty())
        .take(RECOMMENDATION_COUNT)
        .collect();

    if recommendations.len() < RECOMMENDATION_COUNT {
        return Err(MergeError::TooFew {
            got: recommendations.len(),
        });
    }

    let expert_tags = top_up_expert_tags(reply.suggested_expert_tags);
    let summary = if reply.summary.trim().is_empty() {
        summarize(&recommendations)
    } else {
        reply.summary.trim().to_string()
    };

    Ok(RecommendationOutcome {
        recommendations,
        expert_tags,
        summary,
        source: String::new(),
    })
}

/// Drops blanks and duplicates, then pads from the defaults up to `MIN_EXPERT_TAGS`.
fn top_up_expert_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len().max(MIN_EXPERT_TAGS));
    for tag in tags {
        let tag = tag.trim().to_string();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    for default in DEFAULT_EXPERT_TAGS {
        if out.len() >= MIN_EXPERT_TAGS {
            break;
        }
        if !out.iter().any(|t| t == default) {
            out.push(default.to_string());
        }
    }
    out
}

/// Deterministic answer from the heuristic ranking alone.
pub fn fallback(ranked: &[TrackScore]) -> RecommendationOutcome {
    let recommendations: Vec<Recommendation> = ranked
        .iter()
        .take(RECOMMENDATION_COUNT)
        .map(|score| {
            let guide = score.track.guide();
            Recommendation {
                track: score.track.name().to_string(),
                percentage: score.percentage,
                reason: FALLBACK_REASON.to_string(),
                roles: to_strings(guide.roles),
                required_skills: to_strings(guide.required_skills),
                develop_next: to_strings(guide.develop_next),
                learning_ease: guide.learning_ease,
                future_scope: guide.future_scope.to_string(),
                opportunities: guide.opportunities.to_string(),
            }
        })
        .collect();

    RecommendationOutcome {
        summary: summarize(&recommendations),
        recommendations,
        expert_tags: to_strings(&DEFAULT_EXPERT_TAGS),
        source: HEURISTIC_SOURCE.to_string(),
    }
}

/// Four-line templated summary led by the track list with percentages.
pub fn summarize(recommendations: &[Recommendation]) -> String {
    let Some(best) = recommendations.first() else {
        return "No track recommendation available.".to_string();
    };

    let tracks = recommendations
        .iter()
        .map(|r| format!("{} {}%", r.track, r.percentage))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Top tracks: {tracks}.\n\
         Roles & opportunities: {} – {}.\n\
         Required: {}; develop: {}; Ease: {}; Scope: {}.\n\
         Final verdict: choose {}.",
        best.roles.join(", "),
        best.opportunities,
        best.required_skills.join(", "),
        best.develop_next.join(", "),
        best.learning_ease.label(),
        best.future_scope,
        best.track,
    )
}

fn track_list(recommendations: &[Recommendation]) -> String {
    recommendations
        .iter()
        .map(|r| format!("{} ({}%)", r.track, r.percentage))
        .collect::<Vec<_>>()
        .join(", ")
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::profile::fixtures::baseline_profile;
    use crate::recommendation::heuristics::{score_tracks, top_n};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Scripted model: returns a canned reply (or error) and records the prompts it saw.
    pub(crate) struct ScriptedAdvisor {
        reply: Result<String, u16>,
        pub seen: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedAdvisor {
        pub(crate) fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing(status: u16) -> Self {
            Self {
                reply: Err(status),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatCompletion for ScriptedAdvisor {
        fn model(&self) -> &str {
            "scripted-model"
        }

        async fn complete_json(&self, system: &str, user: &str) -> Result<String, LlmError> {
            self.seen
                .lock()
                .unwrap()
                .push((system.to_string(), user.to_string()));
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(LlmError::Api {
                    status: *status,
                    message: "upstream unavailable".to_string(),
                }),
            }
        }
    }

    pub(crate) const GOOD_REPLY: &str = r#"{
        "recommendations": [
            {"track": "Software Engineering", "percentage": 92, "reason": "Strong coder",
             "roles": ["Software Engineer"], "requiredSkills": ["Git"], "developNext": ["Testing"],
             "learningEase": "Moderate", "futureScope": "High", "opportunities": "Plenty"},
            {"track": "Information Technology", "score": 71, "reason": "Team player"},
            {"track": "Data Science", "percentage": "64.6", "learningEase": "Challenging"},
            {"track": "Cyber Security", "percentage": 40}
        ],
        "suggestedExpertTags": ["Tech Lead", "Tech Lead", "Data Engineer"],
        "summary": "Go for Software Engineering."
    }"#;

    fn ranked() -> Vec<TrackScore> {
        let mut p = baseline_profile();
        p.programming_skill = 5;
        top_n(&score_tracks(&p), 5)
    }

    #[tokio::test]
    async fn test_good_reply_is_normalized() {
        let advisor = ScriptedAdvisor::replying(GOOD_REPLY);
        let outcome = recommend(&advisor, Some("a@b.lk"), &baseline_profile(), &ranked()).await;

        assert_eq!(outcome.source, "scripted-model");
        assert_eq!(outcome.recommendations.len(), 3);
        assert_eq!(outcome.recommendations[0].percentage, 92);
        // `score` read in place of a missing `percentage`
        assert_eq!(outcome.recommendations[1].percentage, 71);
        assert_eq!(outcome.recommendations[2].percentage, 65);
        assert_eq!(
            outcome.recommendations[2].learning_ease,
            LearningEase::Challenging
        );
        assert_eq!(outcome.summary, "Go for Software Engineering.");
        assert_eq!(outcome.expert_tags.len(), MIN_EXPERT_TAGS);
        assert_eq!(outcome.expert_tags[0], "Tech Lead");
        assert_eq!(outcome.expert_tags[1], "Data Engineer");
    }

    #[tokio::test]
    async fn test_prompt_carries_tracks_and_grounding() {
        let advisor = ScriptedAdvisor::replying(GOOD_REPLY);
        let top5 = ranked();
        recommend(&advisor, Some("a@b.lk"), &baseline_profile(), &top5).await;

        let seen = advisor.seen.lock().unwrap();
        let (system, user) = &seen[0];
        for track in Track::ALL {
            assert!(system.contains(track.name()));
        }
        let user: Value = serde_json::from_str(user).unwrap();
        assert_eq!(user["email"], "a@b.lk");
        assert_eq!(user["heuristicTop5"].as_array().unwrap().len(), 5);
        assert_eq!(user["heuristicTop5"][0]["track"], top5[0].track.name());
        assert_eq!(user["payload"]["workStyle"], "Individual");
    }

    #[tokio::test]
    async fn test_upstream_error_falls_back_to_heuristic_top3() {
        let advisor = ScriptedAdvisor::failing(503);
        let top5 = ranked();
        let outcome = recommend(&advisor, None, &baseline_profile(), &top5).await;

        assert_eq!(outcome.source, HEURISTIC_SOURCE);
        assert_eq!(outcome.recommendations.len(), 3);
        for (rec, score) in outcome.recommendations.iter().zip(&top5) {
            assert_eq!(rec.track, score.track.name());
            assert_eq!(rec.percentage, score.percentage);
            assert!(outcome
                .summary
                .contains(&format!("{} {}%", score.track.name(), score.percentage)));
        }
        assert_eq!(outcome.expert_tags.len(), MIN_EXPERT_TAGS);
    }

    #[tokio::test]
    async fn test_truncated_json_falls_back() {
        let advisor = ScriptedAdvisor::replying(r#"{"recommendations": [{"track": "Softw"#);
        let outcome = recommend(&advisor, None, &baseline_profile(), &ranked()).await;
        assert_eq!(outcome.source, HEURISTIC_SOURCE);
        assert_eq!(outcome.recommendations.len(), 3);
    }

    #[tokio::test]
    async fn test_short_reply_falls_back() {
        let advisor = ScriptedAdvisor::replying(
            r#"{"recommendations": [{"track": "Data Science", "percentage": 90}], "summary": "x"}"#,
        );
        let outcome = recommend(&advisor, None, &baseline_profile(), &ranked()).await;
        assert_eq!(outcome.source, HEURISTIC_SOURCE);
    }

    #[test]
    fn test_parse_reply_rejects_missing_recommendations() {
        assert!(matches!(
            parse_reply(r#"{"summary": "hello"}"#),
            Err(MergeError::TooFew { got: 0 })
        ));
    }

    #[test]
    fn test_blank_summary_replaced_with_template() {
        let reply = r#"{"recommendations": [
            {"track": "Data Science", "percentage": 90},
            {"track": "Computer Science", "percentage": 80},
            {"track": "Software Engineering", "percentage": 70}
        ], "summary": "  "}"#;
        let outcome = parse_reply(reply).unwrap();
        assert!(outcome.summary.starts_with(
            "Top tracks: Data Science 90%, Computer Science 80%, Software Engineering 70%."
        ));
        assert!(outcome.summary.contains("Final verdict: choose Data Science."));
    }

    #[test]
    fn test_percentage_is_clamped_and_rounded() {
        assert_eq!(read_percentage(&serde_json::json!(140)), Some(100));
        assert_eq!(read_percentage(&serde_json::json!(-3)), Some(0));
        assert_eq!(read_percentage(&serde_json::json!("88%")), Some(88));
        assert_eq!(read_percentage(&serde_json::json!(null)), None);
    }

    #[test]
    fn test_percentage_preferred_over_score() {
        let rec: AdvisorRecommendation =
            serde_json::from_str(r#"{"track": "Data Science", "percentage": 61, "score": 12}"#)
                .unwrap();
        assert_eq!(rec.into_recommendation().percentage, 61);
    }

    #[test]
    fn test_null_fields_take_defaults() {
        let reply = r#"{"recommendations": [
            {"track": "Data Science", "percentage": 90, "reason": null, "roles": null,
             "learningEase": null, "futureScope": null},
            {"track": "Computer Science", "percentage": 80, "requiredSkills": null},
            {"track": "Software Engineering", "percentage": null, "score": 70}
        ], "suggestedExpertTags": null, "summary": null}"#;
        let outcome = parse_reply(reply).unwrap();

        assert_eq!(outcome.recommendations.len(), 3);
        assert_eq!(outcome.recommendations[0].reason, "");
        assert!(outcome.recommendations[0].roles.is_empty());
        assert_eq!(outcome.recommendations[0].learning_ease, LearningEase::Moderate);
        assert_eq!(outcome.recommendations[2].percentage, 70);
        assert_eq!(outcome.expert_tags, to_strings(&DEFAULT_EXPERT_TAGS));
        assert!(outcome.summary.starts_with("Top tracks: Data Science 90%"));
    }

    #[tokio::test]
    async fn test_reply_with_nulls_is_kept() {
        let advisor = ScriptedAdvisor::replying(
            r#"{"recommendations": [
                {"track": "Data Science", "percentage": 90, "reason": null},
                {"track": "Computer Science", "percentage": 80, "reason": null},
                {"track": "Cyber Security", "percentage": 60, "reason": null}
            ], "suggestedExpertTags": null, "summary": null}"#,
        );
        let outcome = recommend(&advisor, None, &baseline_profile(), &ranked()).await;
        assert_eq!(outcome.source, "scripted-model");
        assert_eq!(outcome.recommendations[0].track, "Data Science");
    }

    #[test]
    fn test_known_track_names_are_canonicalized() {
        let rec: AdvisorRecommendation =
            serde_json::from_str(r#"{"track": " data science ", "percentage": 70}"#).unwrap();
        assert_eq!(rec.into_recommendation().track, "Data Science");

        let rec: AdvisorRecommendation =
            serde_json::from_str(r#"{"track": "Robotics", "percentage": 70}"#).unwrap();
        assert_eq!(rec.into_recommendation().track, "Robotics");
    }

    #[test]
    fn test_fallback_content_follows_track() {
        let top = vec![
            TrackScore {
                track: Track::CyberSecurity,
                percentage: 100,
            },
            TrackScore {
                track: Track::DataScience,
                percentage: 80,
            },
            TrackScore {
                track: Track::InteractiveMedia,
                percentage: 60,
            },
        ];
        let outcome = fallback(&top);
        assert_eq!(outcome.recommendations[0].roles[0], "Cyber Security Analyst");
        assert_eq!(outcome.recommendations[1].roles[0], "Data Scientist");
        assert_eq!(outcome.recommendations[0].reason, FALLBACK_REASON);
        assert!(outcome.summary.contains("Final verdict: choose Cyber Security."));
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let top = ranked();
        assert_eq!(fallback(&top), fallback(&top));
    }

    #[test]
    fn test_top_up_keeps_model_tags_first() {
        let tags = top_up_expert_tags(vec![
            "Data Scientist".to_string(),
            " ".to_string(),
            "Game Designer".to_string(),
        ]);
        assert_eq!(
            tags,
            vec![
                "Data Scientist",
                "Game Designer",
                "Senior Software Engineer",
                "DevOps/Cloud Engineer",
                "Cyber Security Analyst",
            ]
        );
    }

    #[test]
    fn test_recommendation_serializes_percentage() {
        let rec = fallback(&ranked()).recommendations.remove(0);
        let value = serde_json::to_value(&rec).unwrap();
        assert!(value.get("percentage").is_some());
        assert!(value.get("score").is_none());
        assert!(value.get("requiredSkills").is_some());
    }
}
