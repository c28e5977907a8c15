use super::AppState;
use crate::cli::Args;
use crate::forms::{ Attachment, FormError, FormKind, FormSubmission, MAX_ATTACHMENT_BYTES };
use crate::models::view::MessageView;
use crate::session::{ SessionError, TurnState };
use crate::site::{ resolve_service, Redirect as SiteRedirect };
use std::error::Error;
use std::net::SocketAddr;
use axum::{
    routing::{ get, post },
    Router,
    Json,
    extract::{ DefaultBodyLimit, Multipart, Path, State },
    response::{ IntoResponse, Redirect, Response },
    http::StatusCode,
};
use serde::{ Deserialize, Serialize };
use tower_http::cors::{ Any, CorsLayer };
use log::{ info, error, warn };
use uuid::Uuid;

const BODY_LIMIT: usize = MAX_ATTACHMENT_BYTES * 2;

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    retryable: bool,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse { success: false, message: message.into(), retryable: false })).into_response()
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let status = match self {
            SessionError::EmptyMessage => StatusCode::BAD_REQUEST,
            SessionError::Busy => StatusCode::CONFLICT,
            SessionError::NotFound(_) => StatusCode::NOT_FOUND,
            SessionError::NotAwaiting | SessionError::Interrupted => StatusCode::INTERNAL_SERVER_ERROR,
        };
        error_response(status, self.to_string())
    }
}

impl IntoResponse for FormError {
    fn into_response(self) -> Response {
        let status = match &self {
            FormError::UnknownForm(_) => StatusCode::NOT_FOUND,
            FormError::Rejected(_) | FormError::Transport(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        };
        let body = ErrorResponse {
            success: false,
            message: self.user_message(),
            retryable: self.is_retryable(),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    chat_configured: bool,
    sessions: usize,
}

#[derive(Serialize)]
struct FormInfo {
    slug: &'static str,
    path: &'static str,
    title: &'static str,
    subtitle: &'static str,
}

#[derive(Serialize)]
struct SessionSnapshot {
    session_id: Uuid,
    state: TurnState,
    messages: Vec<MessageView>,
}

#[derive(Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}

#[derive(Serialize)]
struct TurnResponse {
    user: MessageView,
    reply: MessageView,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/company", get(company_handler))
        .route("/api/services", get(services_handler))
        .route("/api/services/{id}", get(service_handler))
        .route("/api/chat/sessions", post(create_session_handler))
        .route("/api/chat/sessions/{id}", get(get_session_handler).delete(delete_session_handler))
        .route("/api/chat/sessions/{id}/messages", post(send_message_handler))
        .route("/api/forms", get(forms_handler))
        .route("/api/forms/{slug}", post(submit_form_handler))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(cors)
        .with_state(state)
}

pub async fn start_http_server(
    http_port: u16,
    state: AppState,
    args: Args,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let addr = format!("0.0.0.0:{}", http_port).parse::<SocketAddr>()?;
    let app = router(state);

    match (args.enable_tls, &args.tls_cert_path, &args.tls_key_path) {
        (true, Some(cert_path), Some(key_path)) => {
            let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
                cert_path,
                key_path
            ).await?;

            tokio::spawn(async move {
                let result = axum_server::bind_rustls(addr, tls_config)
                    .serve(app.into_make_service())
                    .await;

                if let Err(e) = result {
                    error!("HTTPS server error: {}", e);
                }
            });

            info!("HTTPS API server started on https://{}", addr);
        }
        (true, _, _) => {
            error!("--enable-tls requires both --tls-cert-path and --tls-key-path.");
            return Err("TLS enabled without cert/key".into());
        }
        (false, _, _) => {
            let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
                format!("Failed to bind HTTP server to {}: {}. Try a different port.", addr, e)
            })?;

            tokio::spawn(async move {
                if let Err(e) = axum::serve(listener, app.into_make_service()).await {
                    error!("HTTP server error: {}", e);
                }
            });

            info!("HTTP API server started on http://{}", addr);
        }
    }

    Ok(())
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        chat_configured: state.generator.is_configured(),
        sessions: state.sessions.len(),
    })
}

async fn company_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.knowledge.company.clone())
}

async fn services_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.knowledge.services.clone())
}

async fn service_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match resolve_service(&state.knowledge, &id) {
        Ok(service) => Json(service.clone()).into_response(),
        Err(SiteRedirect(to)) => {
            info!("Unknown service '{}', redirecting to {}", id, to);
            Redirect::temporary(&to).into_response()
        }
    }
}

async fn forms_handler() -> impl IntoResponse {
    let forms: Vec<FormInfo> = FormKind::ALL
        .iter()
        .map(|kind| FormInfo {
            slug: kind.slug(),
            path: kind.path(),
            title: kind.title(),
            subtitle: kind.subtitle(),
        })
        .collect();
    Json(forms)
}

async fn create_session_handler(State(state): State<AppState>) -> Response {
    let (id, handle) = state.sessions.create();
    let session = handle.lock().await;
    let snapshot = SessionSnapshot {
        session_id: id,
        state: session.state(),
        messages: session.conversation().messages().iter().map(MessageView::from).collect(),
    };
    (StatusCode::CREATED, Json(snapshot)).into_response()
}

async fn get_session_handler(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    let Some(handle) = state.sessions.get(&id) else {
        return SessionError::NotFound(id).into_response();
    };
    let session = handle.lock().await;
    Json(SessionSnapshot {
        session_id: id,
        state: session.state(),
        messages: session.conversation().messages().iter().map(MessageView::from).collect(),
    }).into_response()
}

async fn delete_session_handler(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    if state.sessions.remove(&id) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        SessionError::NotFound(id).into_response()
    }
}

async fn send_message_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SendMessageRequest>,
) -> Response {
    match state.sessions.submit(&id, &req.text, state.generator.clone()).await {
        Ok((user, reply)) => Json(TurnResponse {
            user: MessageView::from(&user),
            reply: MessageView::from(&reply),
        }).into_response(),
        Err(e) => {
            warn!("Chat turn rejected for session {}: {}", id, e);
            e.into_response()
        }
    }
}

async fn submit_form_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    mut multipart: Multipart,
) -> Response {
    let kind = match slug.parse::<FormKind>() {
        Ok(kind) => kind,
        Err(e) => return e.into_response(),
    };
    let mut submission = FormSubmission::new(kind);

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return error_response(e.status(), e.body_text()),
        };
        let name = field.name().unwrap_or_default().to_string();

        if let Some(file_name) = field.file_name().map(str::to_string) {
            let content_type = field.content_type().map(str::to_string);
            let bytes = match field.bytes().await {
                Ok(bytes) => bytes,
                Err(e) => return error_response(e.status(), e.body_text()),
            };
            if bytes.is_empty() && file_name.is_empty() {
                continue;
            }
            let attachment = Attachment { file_name, content_type, bytes: bytes.to_vec() };
            if let Err(e) = submission.attach_cv(attachment) {
                return e.into_response();
            }
        } else {
            match field.text().await {
                Ok(value) => submission.set_field(&name, value),
                Err(e) => return error_response(e.status(), e.body_text()),
            }
        }
    }

    match state.forms.submit(&submission).await {
        Ok(receipt) => Json(receipt).into_response(),
        Err(e) => {
            warn!("{} submission not accepted: {}", kind, e);
            e.into_response()
        }
    }
}
