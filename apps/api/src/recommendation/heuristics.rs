//! Heuristic track scorer. Deterministic, no I/O.
//!
//! Each track's raw score is a fixed linear combination of the profile's skill
//! ratings, a handful of indicator flags, and keyword bonuses from career goals.
//! Raw scores are then normalized against the best track:
//!
//!   percentage = round(100 * score / max_score)   (50 for every track if max_score == 0)
//!
//! The result holds all nine tracks, sorted by percentage descending. `sort_by` is
//! stable, so ties keep `Track::ALL` order.

use serde::{Deserialize, Serialize};

use crate::models::profile::{CareerGoal, Excitement, Level, StudentProfile, Subject, WorkStyle};
use crate::recommendation::tracks::Track;

/// Percentage assigned to every track when no track scored anything.
const NO_SIGNAL_PERCENTAGE: u8 = 50;

/// One track's normalized match, 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackScore {
    pub track: Track,
    pub percentage: u8,
}

/// Raw (un-normalized) score per track, indexed by `Track::index()`.
pub fn raw_scores(p: &StudentProfile) -> [u32; 9] {
    let programming = u32::from(p.programming_skill);
    let math = u32::from(p.math_skill);
    let cyber = u32::from(p.cyber_skill);
    let uiux = u32::from(p.uiux_skill);
    let research = u32::from(p.research_skill);

    let mut s = [0u32; 9];
    let mut add = |track: Track, points: u32| s[track.index()] += points;

    add(
        Track::SoftwareEngineering,
        15 * programming
            + 5 * flag(p.debug_patience == Level::High)
            + 5 * flag(p.work_style == WorkStyle::Team),
    );
    // Every valid profile carries a work style, so the middle term always fires.
    add(
        Track::InformationTechnology,
        10 * programming + 10 + 10 * flag(p.excitement == Excitement::ManagingItSystems),
    );
    add(
        Track::DataScience,
        12 * math
            + 10 * flag(p.data_handling_comfort == Level::High)
            + 6 * flag(p.excitement == Excitement::AnalyzingData),
    );
    add(
        Track::ComputerSystemsNetworkEngineering,
        8 * programming
            + 10 * flag(p.hardware_interest == Level::High)
            + 10 * flag(p.subjects.contains(&Subject::Networking)),
    );
    add(
        Track::CyberSecurity,
        10 * cyber
            + 10 * flag(p.security_mindset == Level::High)
            + 8 * flag(p.excitement == Excitement::SecuringSystemsAndNetworks),
    );
    add(
        Track::InformationSystemsEngineering,
        8 * programming
            + 8 * flag(p.career_goals.contains(&CareerGoal::BusinessAnalyst))
            + 6 * flag(p.career_goals.contains(&CareerGoal::SystemsAnalyst)),
    );
    add(
        Track::InteractiveMedia,
        12 * uiux
            + 10 * flag(p.design_creativity == Level::High)
            + 8 * flag(p.excitement.label().contains("Media")),
    );
    add(
        Track::ComputerScience,
        12 * math + 6 * research + 6 * flag(p.wants_research_path),
    );
    add(
        Track::ComputerSystemsEngineering,
        10 * flag(p.hardware_interest == Level::High)
            + 8 * flag(p.has_physics_and_combined_maths)
            + 8 * math,
    );

    for goal in &p.career_goals {
        for (track, points) in career_goal_bonuses(goal.label()) {
            add(track, points);
        }
    }

    s
}

/// Keyword bonuses for a single career goal label. A label may hit several rules.
fn career_goal_bonuses(label: &str) -> Vec<(Track, u32)> {
    let mut bonuses = Vec::new();
    if label.contains("Data") {
        bonuses.push((Track::DataScience, 6));
    }
    if label.contains("ML") || label.contains("AI") {
        bonuses.push((Track::DataScience, 4));
        bonuses.push((Track::ComputerScience, 5));
    }
    if label.contains("Network") || label.contains("DevOps") || label.contains("Cloud") {
        bonuses.push((Track::ComputerSystemsNetworkEngineering, 6));
        bonuses.push((Track::InformationTechnology, 4));
    }
    if label.contains("Cyber") {
        bonuses.push((Track::CyberSecurity, 8));
    }
    if label.contains("UI/UX") || label.contains("Game") {
        bonuses.push((Track::InteractiveMedia, 8));
    }
    if label.contains("Research") {
        bonuses.push((Track::ComputerScience, 6));
    }
    bonuses
}

fn flag(condition: bool) -> u32 {
    u32::from(condition)
}

/// Normalizes raw scores against the maximum and sorts descending.
pub fn normalize(raw: &[u32; 9]) -> Vec<TrackScore> {
    let max = raw.iter().copied().max().unwrap_or(0);

    let mut scores: Vec<TrackScore> = Track::ALL
        .iter()
        .map(|&track| {
            let percentage = if max > 0 {
                ((raw[track.index()] as f64 / max as f64) * 100.0).round() as u8
            } else {
                NO_SIGNAL_PERCENTAGE
            };
            TrackScore { track, percentage }
        })
        .collect();

    scores.sort_by(|a, b| b.percentage.cmp(&a.percentage));
    scores
}

/// Scores all nine tracks for a profile, best first.
pub fn score_tracks(profile: &StudentProfile) -> Vec<TrackScore> {
    normalize(&raw_scores(profile))
}

/// The first `n` entries of an already-ranked list.
pub fn top_n(scores: &[TrackScore], n: usize) -> Vec<TrackScore> {
    scores.iter().take(n).copied().collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
