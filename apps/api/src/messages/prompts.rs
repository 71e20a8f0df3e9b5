// Prompt constants for AI-assisted template authoring.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Template rewrite prompt. Replace: {channel}, {spintax_rules}, {message}
pub const ASSIST_PROMPT_TEMPLATE: &str = r#"Rewrite the job-seeker {channel} message below as a spintax template so that every message sent from it sounds natural and slightly different.

{spintax_rules}

GUIDELINES:
- Offer 2 to 4 options per block; every option must keep the meaning of the original.
- Vary greetings, connecting phrases and closings. Keep names, company names, job titles and dates fixed.
- Keep the language and formality of the original message.
- Keep line breaks of the original message.

MESSAGE:
{message}"#;
