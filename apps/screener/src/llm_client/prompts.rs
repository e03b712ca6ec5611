// Shared prompt fragments. Each collaborator keeps its own prompts.rs alongside it.

/// Appended to every prompt that expects structured output.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    You MUST respond with a single valid JSON object only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";
