use crate::config::prompt::build_system_instruction;
use crate::knowledge::KnowledgeBase;
use crate::llm::chat::{ new_client as new_chat_client, ChatClient, GenerationRequest };
use crate::llm::{ LlmConfig, LlmError };
use crate::models::chat::Turn;

use log::{ error, info, warn };
use once_cell::sync::OnceCell;
use std::sync::Arc;
use thiserror::Error;

pub const UNCONFIGURED_FALLBACK: &str =
    "I'm currently unable to connect to the AI service. Please ensure the API key is configured.";
pub const UNAVAILABLE_FALLBACK: &str =
    "I'm having trouble connecting right now. Please try again later or contact our support directly.";
pub const EMPTY_FALLBACK: &str = "I apologize, I didn't catch that. Could you rephrase?";

#[derive(Debug, Error)]
pub enum GenerationFailure {
    #[error("chat model is not configured (no API key)")]
    ServiceUnconfigured,
    #[error("chat model request failed: {0}")]
    TransportOrServiceFailure(#[source] LlmError),
    #[error("chat model returned an empty completion")]
    EmptyCompletion,
}

impl GenerationFailure {
    pub fn fallback(&self) -> &'static str {
        match self {
            GenerationFailure::ServiceUnconfigured => UNCONFIGURED_FALLBACK,
            GenerationFailure::TransportOrServiceFailure(_) => UNAVAILABLE_FALLBACK,
            GenerationFailure::EmptyCompletion => EMPTY_FALLBACK,
        }
    }
}

/// Produces the next assistant message for a conversation. The chat client
/// is built on first use and shared by every caller afterwards.
pub struct ResponseGenerator {
    llm_config: LlmConfig,
    chat_client: OnceCell<Option<Arc<dyn ChatClient>>>,
    system_instruction: Arc<str>,
}

impl ResponseGenerator {
    pub fn new(llm_config: LlmConfig, knowledge: &KnowledgeBase) -> Self {
        let system_instruction: Arc<str> = build_system_instruction(knowledge).into();
        info!("System instruction built ({} characters)", system_instruction.len());
        Self {
            llm_config,
            chat_client: OnceCell::new(),
            system_instruction,
        }
    }

    /// Uses an already constructed client instead of building one from config.
    pub fn with_client(chat_client: Arc<dyn ChatClient>, knowledge: &KnowledgeBase) -> Self {
        Self {
            llm_config: LlmConfig::default(),
            chat_client: OnceCell::with_value(Some(chat_client)),
            system_instruction: build_system_instruction(knowledge).into(),
        }
    }

    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    fn client(&self) -> Option<&Arc<dyn ChatClient>> {
        self.chat_client
            .get_or_init(|| {
                match new_chat_client(&self.llm_config) {
                    Ok(client) => {
                        info!(
                            "Chat client configured: Model={}, BaseURL={:?}",
                            client.get_model(),
                            client.get_base_url()
                        );
                        Some(client)
                    }
                    Err(LlmError::MissingApiKey) => {
                        warn!("No chat API key configured; chat replies will use the fallback text");
                        None
                    }
                    Err(e) => {
                        error!("Failed to construct chat client: {}", e);
                        None
                    }
                }
            })
            .as_ref()
    }

    pub fn is_configured(&self) -> bool {
        self.client().is_some()
    }

    pub fn build_request(&self, prior_history: &[Turn], new_user_text: &str) -> GenerationRequest {
        let mut turns = Vec::with_capacity(prior_history.len() + 1);
        turns.extend_from_slice(prior_history);
        turns.push(Turn::user(new_user_text));
        GenerationRequest {
            system_instruction: self.system_instruction.to_string(),
            turns,
        }
    }

    pub async fn try_generate(
        &self,
        prior_history: &[Turn],
        new_user_text: &str
    ) -> Result<String, GenerationFailure> {
        let client = self.client().ok_or(GenerationFailure::ServiceUnconfigured)?;
        let request = self.build_request(prior_history, new_user_text);

        let completion = client
            .complete(&request).await
            .map_err(GenerationFailure::TransportOrServiceFailure)?;

        if completion.response.trim().is_empty() {
            return Err(GenerationFailure::EmptyCompletion);
        }
        Ok(completion.response)
    }

    /// Never fails: any problem is logged and replaced by its fallback text.
    pub async fn generate(&self, prior_history: &[Turn], new_user_text: &str) -> String {
        match self.try_generate(prior_history, new_user_text).await {
            Ok(text) => text,
            Err(failure) => {
                match &failure {
                    GenerationFailure::ServiceUnconfigured => warn!("Chat generation skipped: {}", failure),
                    _ => error!("Chat generation failed: {}", failure),
                }
                failure.fallback().to_string()
            }
        }
    }
}
