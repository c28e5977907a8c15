use async_trait::async_trait;
use serde::{ Deserialize, Serialize };
use log::{ debug, info };

use super::{ ChatClient, CompletionResponse, GenerationRequest };
use crate::llm::{ LlmConfig, LlmError, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL };
use crate::models::chat::Turn;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerateRequest {
    system_instruction: GeminiInstruction,
    contents: Vec<GeminiContent>,
}

#[derive(Serialize)]
struct GeminiInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Deserialize, Default)]
struct GoogleResponse {
    #[serde(default)]
    candidates: Vec<GoogleCandidate>,
}

#[derive(Deserialize)]
struct GoogleCandidate {
    content: Option<GoogleContent>,
}

#[derive(Deserialize)]
struct GoogleContent {
    #[serde(default)]
    parts: Vec<GooglePart>,
}

#[derive(Deserialize)]
struct GooglePart {
    text: Option<String>,
}

impl From<&Turn> for GeminiContent {
    fn from(turn: &Turn) -> Self {
        GeminiContent {
            role: turn.role.as_str().to_string(),
            parts: vec![GeminiPart { text: turn.text.clone() }],
        }
    }
}

impl GoogleResponse {
    /// Text of the first candidate, all parts joined. Empty when the model
    /// returned nothing usable.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content.parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

pub struct GeminiChatClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiChatClient {
    pub fn new(
        api_key: String,
        model: Option<String>,
        base_url: Option<String>,
        timeout: std::time::Duration
    ) -> Result<Self, LlmError> {
        let model = model
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
        let base_url = base_url
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string());
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { http, api_key, model, base_url })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_key = config.api_key().ok_or(LlmError::MissingApiKey)?.to_string();
        Self::new(api_key, config.completion_model.clone(), config.base_url.clone(), config.timeout)
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url.trim_end_matches('/'), self.model)
    }
}

#[async_trait]
impl ChatClient for GeminiChatClient {
    async fn complete(&self, request: &GenerationRequest) -> Result<CompletionResponse, LlmError> {
        let payload = GeminiGenerateRequest {
            system_instruction: GeminiInstruction {
                parts: vec![GeminiPart { text: request.system_instruction.clone() }],
            },
            contents: request.turns.iter().map(GeminiContent::from).collect(),
        };

        info!(
            "GeminiChatClient::complete() → model={} turns={}",
            self.model,
            request.turns.len()
        );

        let resp = self.http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Status { status: status.as_u16(), body });
        }

        let parsed: GoogleResponse = resp.json().await?;
        let text = parsed.text();
        debug!("Gemini returned {} characters", text.len());
        Ok(CompletionResponse { response: text })
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }

    fn get_base_url(&self) -> Option<String> {
        Some(self.base_url.clone())
    }
}
