use clap::Parser;
use std::time::Duration;

use crate::forms::relay::{
    FormEndpoints,
    DEFAULT_BOOKING_ENDPOINT,
    DEFAULT_CONSULTANCY_ENDPOINT,
    DEFAULT_JOB_ENDPOINT,
    DEFAULT_TRAINING_ENDPOINT,
};
use crate::llm::{ LlmConfig, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL };

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Chat LLM Provider Args ---
    /// API Key for the hosted chat model. Leave empty to run with the fallback reply only.
    #[arg(long, env = "CHAT_API_KEY", default_value = "")]
    pub chat_api_key: String,

    /// Legacy name for the chat API key, used when CHAT_API_KEY is empty
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model name for chat completion (e.g., gemini-3-pro-preview, gemini-2.5-flash)
    #[arg(long, env = "CHAT_MODEL", default_value = DEFAULT_GEMINI_MODEL)]
    pub chat_model: String,

    /// Base URL for the chat model API
    #[arg(long, env = "CHAT_BASE_URL", default_value = DEFAULT_GEMINI_BASE_URL)]
    pub chat_base_url: String,

    /// Seconds to wait for a chat completion before answering with the fallback text.
    #[arg(
        long,
        env = "CHAT_TIMEOUT_SECS",
        default_value = "30",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub chat_timeout_secs: u64,

    // --- Knowledge Base Args ---
    /// Optional JSON file replacing the built-in company profile and service list.
    #[arg(long, env = "KNOWLEDGE_PATH")]
    pub knowledge_path: Option<String>,

    // --- Form Intake Args ---
    #[arg(long, env = "FORM_ENDPOINT_JOB", default_value = DEFAULT_JOB_ENDPOINT)]
    pub form_endpoint_job: String,

    #[arg(long, env = "FORM_ENDPOINT_CONSULTANCY", default_value = DEFAULT_CONSULTANCY_ENDPOINT)]
    pub form_endpoint_consultancy: String,

    #[arg(long, env = "FORM_ENDPOINT_TRAINING", default_value = DEFAULT_TRAINING_ENDPOINT)]
    pub form_endpoint_training: String,

    #[arg(long, env = "FORM_ENDPOINT_BOOKING", default_value = DEFAULT_BOOKING_ENDPOINT)]
    pub form_endpoint_booking: String,

    /// Seconds to wait for the form-intake service.
    #[arg(
        long,
        env = "FORM_TIMEOUT_SECS",
        default_value = "30",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub form_timeout_secs: u64,

    // --- Session Args ---
    /// Seconds an HTTP chat session may sit unused before it is discarded.
    #[arg(
        long,
        env = "SESSION_IDLE_SECS",
        default_value = "1800",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub session_idle_secs: u64,

    // --- General App Args ---
    /// Enable debug logging/output
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,

    /// Host address and port for the chat WebSocket server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:4000")]
    pub server_addr: String,

    /// Port for the HTTP JSON API.
    #[arg(long, env = "HTTP_PORT", default_value = "8080")]
    pub http_port: u16,

    /// Optional path to the TLS certificate file (PEM format) for the HTTP API. Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format) for the HTTP API. Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,
}

impl Args {
    pub fn resolved_api_key(&self) -> Option<String> {
        let primary = self.chat_api_key.trim();
        if !primary.is_empty() {
            return Some(primary.to_string());
        }
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
    }

    pub fn llm_config(&self) -> LlmConfig {
        LlmConfig {
            api_key: self.resolved_api_key(),
            completion_model: Some(self.chat_model.clone()),
            base_url: Some(self.chat_base_url.clone()),
            timeout: Duration::from_secs(self.chat_timeout_secs),
        }
    }

    pub fn form_endpoints(&self) -> FormEndpoints {
        FormEndpoints {
            job_application: self.form_endpoint_job.clone(),
            consultancy_request: self.form_endpoint_consultancy.clone(),
            training_registration: self.form_endpoint_training.clone(),
            service_booking: self.form_endpoint_booking.clone(),
        }
    }

    pub fn form_timeout(&self) -> Duration {
        Duration::from_secs(self.form_timeout_secs)
    }

    pub fn session_idle(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }

    /// How often idle sessions are swept: once a minute, or more often when
    /// the idle limit is shorter than that.
    pub fn session_sweep_interval(&self) -> Duration {
        self.session_idle().min(Duration::from_secs(60))
    }
}
