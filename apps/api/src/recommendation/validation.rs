//! Student profile validation.
//!
//! The request body is taken as raw JSON and checked field by field so that every
//! problem is reported at once, keyed by the camelCase field name. Only when all
//! fields pass is a typed `StudentProfile` produced.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::models::profile::StudentProfile;

/// Field name → human-readable message.
pub type FieldErrors = BTreeMap<String, String>;

const MAX_ADDITIONAL_CHARS: usize = 1000;
const RATING_MIN: u64 = 1;
const RATING_MAX: u64 = 5;
const CGPA_MAX: f64 = 4.0;

/// Validates a raw request body into a `StudentProfile`.
pub fn validate_profile(body: &Value) -> Result<StudentProfile, FieldErrors> {
    let Some(obj) = body.as_object() else {
        let mut errors = FieldErrors::new();
        errors.insert("form".to_string(), "Expected a JSON object.".to_string());
        return Err(errors);
    };

    let mut f = FieldReader {
        obj,
        errors: FieldErrors::new(),
    };

    let current_year = f.choice("currentYear", "Please select Year 1–4.");
    let current_semester = f.choice("currentSemester", "Please select Semester 1 or 2.");
    let cgpa = f.cgpa();
    let al_stream = f.optional_choice("alStream", "Please select a valid A/L stream.");
    let has_physics_and_combined_maths = f.boolean("hasPhysicsAndCombinedMaths");
    let subjects = f.multi_choice("subjects", "Pick at least one subject.");
    let excitement = f.choice("excitement", "Tell us what excites you.");
    let programming_skill = f.rating("programmingSkill");
    let math_skill = f.rating("mathSkill");
    let cyber_skill = f.rating("cyberSkill");
    let uiux_skill = f.rating("uiuxSkill");
    let research_skill = f.rating("researchSkill");
    let motivation = f.rating("motivation");
    let languages = f.string_list("languages");
    let work_style = f.choice("workStyle", "Work style is required.");
    let debug_patience = f.choice("debugPatience", "Select your patience level.");
    let hardware_interest = f.choice("hardwareInterest", "Select Low, Medium or High.");
    let design_creativity = f.choice("designCreativity", "Select Low, Medium or High.");
    let data_handling_comfort = f.choice("dataHandlingComfort", "Select Low, Medium or High.");
    let security_mindset = f.choice("securityMindset", "Select Low, Medium or High.");
    let wants_research_path = f.boolean("wantsResearchPath");
    let career_goals = f.multi_choice("careerGoals", "Select at least one career goal.");
    let additional = f.additional();
    let consent_to_share_with_experts = f.boolean("consentToShareWithExperts");

    let profile = (|| {
        Some(StudentProfile {
            current_year: current_year?,
            current_semester: current_semester?,
            cgpa: cgpa?,
            al_stream: al_stream?,
            has_physics_and_combined_maths: has_physics_and_combined_maths?,
            subjects: subjects?,
            excitement: excitement?,
            programming_skill: programming_skill?,
            math_skill: math_skill?,
            cyber_skill: cyber_skill?,
            uiux_skill: uiux_skill?,
            research_skill: research_skill?,
            motivation: motivation?,
            languages: languages?,
            work_style: work_style?,
            debug_patience: debug_patience?,
            hardware_interest: hardware_interest?,
            design_creativity: design_creativity?,
            data_handling_comfort: data_handling_comfort?,
            security_mindset: security_mindset?,
            wants_research_path: wants_research_path?,
            career_goals: career_goals?,
            additional: additional?,
            consent_to_share_with_experts: consent_to_share_with_experts?,
        })
    })();

    match profile {
        Some(profile) if f.errors.is_empty() => Ok(profile),
        _ => Err(f.errors),
    }
}

/// Reads fields out of the body, recording at most one message per field.
struct FieldReader<'a> {
    obj: &'a Map<String, Value>,
    errors: FieldErrors,
}

impl FieldReader<'_> {
    fn fail<T>(&mut self, key: &str, message: impl Into<String>) -> Option<T> {
        self.errors
            .entry(key.to_string())
            .or_insert_with(|| message.into());
        None
    }

    /// Present and not `null`.
    fn get(&self, key: &str) -> Option<&Value> {
        self.obj.get(key).filter(|v| !v.is_null())
    }

    fn choice<T: DeserializeOwned>(&mut self, key: &str, message: &str) -> Option<T> {
        match self.get(key).cloned().map(serde_json::from_value::<T>) {
            Some(Ok(value)) => Some(value),
            _ => self.fail(key, message),
        }
    }

    fn optional_choice<T: DeserializeOwned + Default>(
        &mut self,
        key: &str,
        message: &str,
    ) -> Option<T> {
        if self.get(key).is_none() {
            return Some(T::default());
        }
        self.choice(key, message)
    }

    /// Non-empty list of choices. Duplicates are dropped, first occurrence kept.
    fn multi_choice<T: DeserializeOwned + PartialEq>(
        &mut self,
        key: &str,
        empty_message: &str,
    ) -> Option<Vec<T>> {
        let Some(items) = self.get(key).and_then(Value::as_array).cloned() else {
            return self.fail(key, empty_message);
        };
        if items.is_empty() {
            return self.fail(key, empty_message);
        }

        let mut values: Vec<T> = Vec::with_capacity(items.len());
        for item in items {
            let label = item.as_str().unwrap_or_default().to_string();
            match serde_json::from_value::<T>(item) {
                Ok(v) if !values.contains(&v) => values.push(v),
                Ok(_) => {}
                Err(_) => return self.fail(key, format!("'{label}' is not a valid option.")),
            }
        }
        Some(values)
    }

    fn rating(&mut self, key: &str) -> Option<u8> {
        let message = format!("{key} must be a whole number from {RATING_MIN} to {RATING_MAX}.");
        match self.get(key).and_then(Value::as_u64) {
            Some(n) if (RATING_MIN..=RATING_MAX).contains(&n) => Some(n as u8),
            _ => self.fail(key, message),
        }
    }

    fn boolean(&mut self, key: &str) -> Option<bool> {
        match self.get(key).and_then(Value::as_bool) {
            Some(b) => Some(b),
            None => self.fail(key, format!("{key} must be true or false.")),
        }
    }

    /// CGPA may be absent, an empty string, a number, or a numeric string.
    fn cgpa(&mut self) -> Option<Option<f64>> {
        let key = "cgpa";
        let parsed = match self.get(key) {
            None => return Some(None),
            Some(Value::String(s)) if s.trim().is_empty() => return Some(None),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            Some(Value::Number(n)) => n.as_f64(),
            Some(_) => None,
        };

        match parsed {
            Some(v) if v.is_finite() && (0.0..=CGPA_MAX).contains(&v) => Some(Some(v)),
            _ => self.fail(key, "Invalid CGPA."),
        }
    }

    fn string_list(&mut self, key: &str) -> Option<Vec<String>> {
        let Some(value) = self.get(key) else {
            return Some(Vec::new());
        };
        let list: Option<Vec<String>> = value.as_array().and_then(|items| {
            items
                .iter()
                .map(|v| v.as_str().map(str::to_string))
                .collect()
        });
        if list.is_none() {
            return self.fail(key, format!("{key} must be a list of names."));
        }
        list
    }

    fn additional(&mut self) -> Option<String> {
        let key = "additional";
        let message = match self.get(key) {
            None => return Some(String::new()),
            Some(Value::String(s)) if s.chars().count() <= MAX_ADDITIONAL_CHARS => {
                return Some(s.clone())
            }
            Some(Value::String(_)) => {
                format!("Additional notes must be at most {MAX_ADDITIONAL_CHARS} characters.")
            }
            Some(_) => "Additional notes must be text.".to_string(),
        };
        self.fail(key, message)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
