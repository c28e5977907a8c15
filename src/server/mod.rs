pub mod api;
pub mod websocket;

use crate::agent::ResponseGenerator;
use crate::cli::Args;
use crate::forms::FormRelay;
use crate::knowledge::KnowledgeBase;
use crate::session::SessionRegistry;
use std::error::Error;
use std::sync::Arc;

/// Shared by every HTTP handler.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<ResponseGenerator>,
    pub knowledge: Arc<KnowledgeBase>,
    pub sessions: SessionRegistry,
    pub forms: Arc<FormRelay>,
}

pub struct Server {
    addr: String,
    state: AppState,
    args: Args,
}

impl Server {
    pub fn new(addr: String, state: AppState, args: Args) -> Self {
        Self { addr, state, args }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.start_http_server().await?;
        self.start_ws_server().await?;
        Ok(())
    }

    async fn start_http_server(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        api::start_http_server(self.args.http_port, self.state.clone(), self.args.clone()).await
    }

    async fn start_ws_server(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        websocket::start_ws_server(&self.addr, self.state.generator.clone()).await
    }
}
