// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Instruction that keeps the model from inventing categories of its own.
pub const CLOSED_VOCABULARY_INSTRUCTION: &str = "\
    Use ONLY the names listed above, spelled exactly as given. \
    Do NOT invent, merge, or rename categories.";
