pub mod agent;
pub mod cli;
pub mod config;
pub mod forms;
pub mod knowledge;
pub mod llm;
pub mod markup;
pub mod models;
pub mod server;
pub mod session;
pub mod site;

use agent::ResponseGenerator;
use cli::Args;
use forms::FormRelay;
use knowledge::initialize_knowledge;
use log::info;
use server::{ AppState, Server };
use session::SessionRegistry;
use std::error::Error;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    let llm_config = args.llm_config();
    let endpoints = args.form_endpoints();

    info!("--- Core Configuration ---");
    info!("WS Server Address: {}", args.server_addr);
    info!("HTTP API Port: {}", args.http_port);
    info!("Chat Model: {}", args.chat_model);
    info!("Chat Base URL: {}", args.chat_base_url);
    info!("Chat API Key Configured: {}", llm_config.api_key().is_some());
    info!("Chat Timeout: {}s", args.chat_timeout_secs);
    info!("Knowledge Path: {}", args.knowledge_path.as_deref().unwrap_or("built-in"));
    info!("Form Endpoint (job): {}", endpoints.job_application);
    info!("Form Endpoint (consultancy): {}", endpoints.consultancy_request);
    info!("Form Endpoint (training): {}", endpoints.training_registration);
    info!("Form Endpoint (booking): {}", endpoints.service_booking);
    info!("Session Idle Limit: {}s", args.session_idle_secs);
    info!("TLS Enabled: {}", args.enable_tls);
    info!("-------------------------");

    let knowledge = initialize_knowledge(args.knowledge_path.as_deref())?;
    let generator = Arc::new(ResponseGenerator::new(llm_config, &knowledge));
    let forms = Arc::new(FormRelay::new(endpoints, args.form_timeout())?);

    let sessions = SessionRegistry::new();
    sessions.spawn_sweeper(args.session_sweep_interval(), args.session_idle());

    let state = AppState {
        generator,
        knowledge,
        sessions,
        forms,
    };

    let server = Server::new(args.server_addr.clone(), state, args.clone());
    server.run().await?;

    Ok(())
}
