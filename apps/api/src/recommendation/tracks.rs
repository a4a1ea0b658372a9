//! The nine specialization tracks offered by the faculty, plus the static
//! per-track guidance the heuristic fallback hands out when the model is unavailable.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Track {
    #[serde(rename = "Software Engineering")]
    SoftwareEngineering,
    #[serde(rename = "Information Technology")]
    InformationTechnology,
    #[serde(rename = "Data Science")]
    DataScience,
    #[serde(rename = "Computer Systems & Network Engineering")]
    ComputerSystemsNetworkEngineering,
    #[serde(rename = "Cyber Security")]
    CyberSecurity,
    #[serde(rename = "Information Systems Engineering")]
    InformationSystemsEngineering,
    #[serde(rename = "Interactive Media")]
    InteractiveMedia,
    #[serde(rename = "Computer Science")]
    ComputerScience,
    #[serde(rename = "Computer Systems Engineering")]
    ComputerSystemsEngineering,
}

impl Track {
    /// Canonical order. The scorer breaks percentage ties by this order.
    pub const ALL: [Track; 9] = [
        Track::SoftwareEngineering,
        Track::InformationTechnology,
        Track::DataScience,
        Track::ComputerSystemsNetworkEngineering,
        Track::CyberSecurity,
        Track::InformationSystemsEngineering,
        Track::InteractiveMedia,
        Track::ComputerScience,
        Track::ComputerSystemsEngineering,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Track::SoftwareEngineering => "Software Engineering",
            Track::InformationTechnology => "Information Technology",
            Track::DataScience => "Data Science",
            Track::ComputerSystemsNetworkEngineering => "Computer Systems & Network Engineering",
            Track::CyberSecurity => "Cyber Security",
            Track::InformationSystemsEngineering => "Information Systems Engineering",
            Track::InteractiveMedia => "Interactive Media",
            Track::ComputerScience => "Computer Science",
            Track::ComputerSystemsEngineering => "Computer Systems Engineering",
        }
    }

    /// Position in `Track::ALL`.
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn guide(&self) -> &'static TrackGuide {
        &GUIDES[self.index()]
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown track '{0}'")]
pub struct UnknownTrack(pub String);

impl FromStr for Track {
    type Err = UnknownTrack;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Track::ALL
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownTrack(s.to_string()))
    }
}

/// How steep the track is for a typical student.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LearningEase {
    Easy,
    #[default]
    Moderate,
    Challenging,
}

impl LearningEase {
    pub fn label(&self) -> &'static str {
        match self {
            LearningEase::Easy => "Easy",
            LearningEase::Moderate => "Moderate",
            LearningEase::Challenging => "Challenging",
        }
    }

    /// Lenient parse for model output; anything unrecognised reads as `Moderate`.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "easy" => LearningEase::Easy,
            "challenging" | "hard" | "difficult" => LearningEase::Challenging,
            _ => LearningEase::Moderate,
        }
    }
}

/// Static guidance for one track, used to fill a recommendation locally.
#[derive(Debug)]
pub struct TrackGuide {
    pub roles: &'static [&'static str],
    pub required_skills: &'static [&'static str],
    pub develop_next: &'static [&'static str],
    pub learning_ease: LearningEase,
    pub future_scope: &'static str,
    pub opportunities: &'static str,
}

// Indexed by `Track::index()`.
static GUIDES: [TrackGuide; 9] = [
    TrackGuide {
        roles: &["Software Engineer", "Full Stack Developer", "Mobile Developer"],
        required_skills: &["Programming fundamentals", "Problem solving", "Databases"],
        develop_next: &["Algorithms & Data Structures", "Software design patterns"],
        learning_ease: LearningEase::Moderate,
        future_scope: "Strong demand across industries",
        opportunities: "Local and international openings",
    },
    TrackGuide {
        roles: &["IT Support Engineer", "Systems Administrator", "DevOps/Cloud Engineer"],
        required_skills: &["Operating systems", "Networking basics", "Scripting"],
        develop_next: &["Cloud platforms", "Infrastructure automation"],
        learning_ease: LearningEase::Easy,
        future_scope: "Every organisation runs IT operations",
        opportunities: "Steady local demand, growing cloud roles abroad",
    },
    TrackGuide {
        roles: &["Data Scientist", "Data Engineer", "ML/AI Engineer"],
        required_skills: &["Statistics", "Python or R", "SQL"],
        develop_next: &["Machine learning", "Data pipelines"],
        learning_ease: LearningEase::Challenging,
        future_scope: "Rapid growth driven by analytics and AI adoption",
        opportunities: "High demand in finance, telecom and research",
    },
    TrackGuide {
        roles: &["Network Engineer", "DevOps/Cloud Engineer", "Site Reliability Engineer"],
        required_skills: &["Networking fundamentals", "Linux", "Routing and switching"],
        develop_next: &["Cloud networking", "Network automation"],
        learning_ease: LearningEase::Moderate,
        future_scope: "Networks underpin cloud and telecom growth",
        opportunities: "Telecom operators, ISPs and cloud providers",
    },
    TrackGuide {
        roles: &["Cyber Security Analyst", "Penetration Tester", "Security Engineer"],
        required_skills: &["Networking fundamentals", "Operating systems", "Security principles"],
        develop_next: &["Threat analysis", "Secure coding"],
        learning_ease: LearningEase::Challenging,
        future_scope: "Security talent shortage keeps demand high",
        opportunities: "Banks, government and managed security providers",
    },
    TrackGuide {
        roles: &["Business Analyst", "Systems Analyst", "Product Owner"],
        required_skills: &["Requirements analysis", "Databases", "Communication"],
        develop_next: &["Enterprise systems", "Process modelling"],
        learning_ease: LearningEase::Easy,
        future_scope: "Digital transformation needs analysts who bridge business and tech",
        opportunities: "Consultancies and enterprise IT departments",
    },
    TrackGuide {
        roles: &["UI/UX Designer", "Game Developer", "Front-end Developer"],
        required_skills: &["Visual design", "Prototyping", "Front-end programming"],
        develop_next: &["User research", "3D and motion design"],
        learning_ease: LearningEase::Moderate,
        future_scope: "Product quality increasingly competes on experience",
        opportunities: "Product studios, agencies and game companies",
    },
    TrackGuide {
        roles: &["Software Engineer", "ML/AI Engineer", "Research/Academia"],
        required_skills: &["Discrete mathematics", "Algorithms", "Programming"],
        develop_next: &["Theory of computation", "Research methods"],
        learning_ease: LearningEase::Challenging,
        future_scope: "Foundation for research and advanced engineering",
        opportunities: "Research labs, postgraduate study and product companies",
    },
    TrackGuide {
        roles: &["Embedded Systems Engineer", "Hardware Engineer", "IoT Developer"],
        required_skills: &["Digital logic", "C programming", "Physics and mathematics"],
        develop_next: &["Microcontrollers", "Real-time systems"],
        learning_ease: LearningEase::Challenging,
        future_scope: "IoT and embedded devices keep expanding",
        opportunities: "Electronics manufacturers and IoT startups",
    },
];
