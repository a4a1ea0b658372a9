// Specialization recommendation engine.
// Implements: profile validation, heuristic scoring, advisor merge with fallback, HTTP handlers.
// All model calls go through llm_client via the ChatCompletion trait.

pub mod handlers;
pub mod heuristics;
pub mod merger;
pub mod prompts;
pub mod tracks;
pub mod validation;
