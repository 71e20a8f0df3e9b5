// Shared prompt fragments. Each service that calls the LLM keeps its own
// prompts.rs alongside it and reuses these.

/// System prompt fragment that enforces bare text output.
pub const PLAIN_TEXT_SYSTEM: &str = "You are a precise writing assistant. \
    Respond with the requested text only. \
    Do NOT wrap it in quotes or markdown code fences. \
    Do NOT include explanations, greetings to the user, or apologies.";

/// Spintax grammar as the engine understands it.
pub const SPINTAX_RULES: &str = "\
    SPINTAX RULES: \
    - An alternation block is written {option one|option two|option three}. \
    - Blocks must NOT be nested: never write {a|{b|c}}. \
    - Every option must be non-empty: never write {a|} or { | }. \
    - Braces are reserved for blocks; do not use them anywhere else. \
    - Placeholders in square brackets such as [name] must be kept verbatim, outside any block.";
