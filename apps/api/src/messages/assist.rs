//! AI-assisted authoring — turns a plain message into a spintax template.
//!
//! The generated template is linted before it is returned; an invalid
//! suggestion is still returned so the author can fix it in the editor.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::prompts::{PLAIN_TEXT_SYSTEM, SPINTAX_RULES};
use crate::llm_client::TextGenerator;
use crate::messages::prompts::ASSIST_PROMPT_TEMPLATE;
use crate::messages::templates::Channel;
use crate::spintax::{count_spintax, get_variation_count, validate, ValidationReport};

#[derive(Debug, Clone, Deserialize)]
pub struct AssistRequest {
    pub message: String,
    pub channel: Channel,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateSuggestion {
    pub template: String,
    pub block_count: usize,
    pub variation_count: u64,
    pub validation: ValidationReport,
}

fn build_prompt(message: &str, channel: Channel) -> String {
    let channel = match channel {
        Channel::Whatsapp => "WhatsApp",
        Channel::Email => "email",
    };
    ASSIST_PROMPT_TEMPLATE
        .replace("{channel}", channel)
        .replace("{spintax_rules}", SPINTAX_RULES)
        .replace("{message}", message.trim())
}

/// Asks the generator for a spintax rewrite of `request.message`.
pub async fn suggest_template(
    request: &AssistRequest,
    generator: &dyn TextGenerator,
) -> Result<TemplateSuggestion, AppError> {
    if request.message.trim().is_empty() {
        return Err(AppError::Validation("message cannot be empty".to_string()));
    }

    let prompt = build_prompt(&request.message, request.channel);
    let template = generator.generate(&prompt, PLAIN_TEXT_SYSTEM).await?;
    let template = template.trim().to_string();

    let validation = validate(&template);
    if !validation.valid {
        warn!("Suggested template failed validation: {:?}", validation.errors);
    }

    let suggestion = TemplateSuggestion {
        block_count: count_spintax(&template),
        variation_count: get_variation_count(&template),
        validation,
        template,
    };
    info!(
        "Suggested template with {} blocks ({} variations)",
        suggestion.block_count, suggestion.variation_count
    );

    Ok(suggestion)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::llm_client::LlmError;

    /// Returns a canned reply and records the prompts it was given.
    pub(crate) struct FakeGenerator {
        pub reply: String,
        pub prompts: Mutex<Vec<String>>,
    }

    impl FakeGenerator {
        pub(crate) fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for FakeGenerator {
        async fn generate(&self, prompt: &str, _system: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            if self.reply.is_empty() {
                return Err(LlmError::EmptyContent);
            }
            Ok(self.reply.clone())
        }
    }

    #[test]
    fn test_prompt_contains_message_and_channel() {
        let prompt = build_prompt("  Hi, is the role open?  ", Channel::Whatsapp);
        assert!(prompt.contains("job-seeker WhatsApp message"));
        assert!(prompt.contains("MESSAGE:\nHi, is the role open?"));
        assert!(prompt.contains("SPINTAX RULES"));
        assert!(!prompt.contains("{message}"));
    }

    #[tokio::test]
    async fn test_suggest_template_reports_counts() {
        let generator = FakeGenerator::new("{Hi|Hello} [name], is the {role|position} open?\n");
        let request = AssistRequest {
            message: "Hi [name], is the role open?".to_string(),
            channel: Channel::Whatsapp,
        };

        let suggestion = suggest_template(&request, &generator).await.unwrap();
        assert_eq!(suggestion.template, "{Hi|Hello} [name], is the {role|position} open?");
        assert_eq!(suggestion.block_count, 2);
        assert_eq!(suggestion.variation_count, 4);
        assert!(suggestion.validation.valid);
        assert_eq!(generator.prompts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_suggest_template_keeps_invalid_suggestion() {
        let generator = FakeGenerator::new("{Hi|{Hello|Hey}} there");
        let request = AssistRequest {
            message: "Hi there".to_string(),
            channel: Channel::Email,
        };

        let suggestion = suggest_template(&request, &generator).await.unwrap();
        assert!(!suggestion.validation.valid);
        assert_eq!(suggestion.block_count, 1);
    }

    #[tokio::test]
    async fn test_suggest_template_rejects_empty_message() {
        let generator = FakeGenerator::new("unused");
        let request = AssistRequest {
            message: "   ".to_string(),
            channel: Channel::Email,
        };

        let err = suggest_template(&request, &generator).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(generator.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_suggest_template_surfaces_llm_errors() {
        let generator = FakeGenerator::new("");
        let request = AssistRequest {
            message: "Hi".to_string(),
            channel: Channel::Whatsapp,
        };

        let err = suggest_template(&request, &generator).await.unwrap_err();
        assert!(matches!(err, AppError::Llm(LlmError::EmptyContent)));
    }
}
