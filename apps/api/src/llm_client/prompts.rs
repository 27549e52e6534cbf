// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Appended to prompts whose reply must be machine-readable.
pub const JSON_ONLY_INSTRUCTION: &str = "\
Respond with the JSON object only. \
Do NOT wrap it in markdown code fences. \
Do NOT include explanations before or after it.";
