use crate::agent::ResponseGenerator;
use crate::models::view::MessageView;
use crate::models::websocket::{ ClientMessage, ServerMessage };
use crate::session::ChatSession;

use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use futures::stream::SplitSink;
use futures::{ SinkExt, StreamExt };
use log::{ debug, error, info, warn };
use tokio::io::{ AsyncRead, AsyncWrite };
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{ accept_async, WebSocketStream };

const MAX_MESSAGE_SIZE: usize = 1024 * 1024;

pub async fn start_ws_server(
    addr: &str,
    generator: Arc<ResponseGenerator>
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let listener = TcpListener::bind(addr).await?;
    info!("WS chat server listening on: {}", addr);
    serve(listener, generator).await
}

/// Accepts connections forever. Each connection is one chat view with its
/// own conversation, dropped when the socket closes.
pub async fn serve(
    listener: TcpListener,
    generator: Arc<ResponseGenerator>
) -> Result<(), Box<dyn Error + Send + Sync>> {
    loop {
        let (stream, peer) = listener.accept().await?;
        info!("Incoming connection from: {}", peer);
        let generator = Arc::clone(&generator);

        tokio::spawn(async move {
            match accept_async(stream).await {
                Ok(ws) => handle_connection(peer, ws, generator).await,
                Err(e) => error!("Handshake failed for {}: {}", peer, e),
            }
        });
    }
}

async fn send_message<S>(
    tx: &mut SplitSink<WebSocketStream<S>, Message>,
    peer: SocketAddr,
    msg: &ServerMessage
) -> bool
    where S: AsyncRead + AsyncWrite + Unpin
{
    let json = match serde_json::to_string(msg) {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to encode message for {}: {}", peer, e);
            return true;
        }
    };
    if let Err(e) = tx.send(Message::Text(json)).await {
        error!("Error sending message to {}: {}", peer, e);
        return false;
    }
    true
}

pub async fn handle_connection<S>(
    peer: SocketAddr,
    websocket: WebSocketStream<S>,
    generator: Arc<ResponseGenerator>
)
    where S: AsyncRead + AsyncWrite + Unpin
{
    let (mut tx, mut rx) = websocket.split();
    let mut session = ChatSession::new();
    info!("Assigned conversation ID {} to {}", session.id(), peer);

    if let Some(greeting) = session.conversation().last() {
        let msg = ServerMessage::Response { message: MessageView::from(greeting) };
        if !send_message(&mut tx, peer, &msg).await {
            return;
        }
    }

    let (reply_tx, mut reply_rx) = mpsc::channel::<String>(1);

    loop {
        tokio::select! {
            Some(reply) = reply_rx.recv() => {
                let msg = match session.complete_turn(reply) {
                    Ok(model_message) => ServerMessage::Response { message: MessageView::from(model_message) },
                    Err(e) => {
                        error!("Reply for {} arrived out of turn: {}", peer, e);
                        continue;
                    }
                };
                if !send_message(&mut tx, peer, &msg).await {
                    break;
                }
            }
            incoming = rx.next() => {
                let message = match incoming {
                    Some(Ok(message)) => message,
                    Some(Err(e)) => {
                        info!("WebSocket connection closed or errored for {}: {}", peer, e);
                        break;
                    }
                    None => break,
                };

                if message.len() > MAX_MESSAGE_SIZE {
                    warn!(
                        "Message from {} exceeds size limit ({} > {})",
                        peer,
                        message.len(),
                        MAX_MESSAGE_SIZE
                    );
                    let msg = ServerMessage::Error { message: "Message too large".to_string() };
                    send_message(&mut tx, peer, &msg).await;
                    break;
                }

                match message {
                    Message::Text(text) => {
                        let content = match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(ClientMessage::Chat { content }) => content,
                            Err(e) => {
                                error!("Failed to parse message from {}: {}", peer, e);
                                let msg = ServerMessage::Error {
                                    message: format!("Failed to parse message: {}", e),
                                };
                                if !send_message(&mut tx, peer, &msg).await {
                                    break;
                                }
                                continue;
                            }
                        };

                        let pending = match session.begin_turn(&content) {
                            Ok(pending) => pending,
                            Err(e) => {
                                debug!("Rejected chat from {}: {}", peer, e);
                                let msg = ServerMessage::Error { message: e.to_string() };
                                if !send_message(&mut tx, peer, &msg).await {
                                    break;
                                }
                                continue;
                            }
                        };

                        if !send_message(&mut tx, peer, &ServerMessage::Processing).await {
                            break;
                        }

                        let generator = Arc::clone(&generator);
                        let reply_tx = reply_tx.clone();
                        tokio::spawn(async move {
                            let reply = generator.generate(&pending.prior_history, &pending.text).await;
                            // Receiver is gone if the visitor left; the reply is discarded.
                            let _ = reply_tx.send(reply).await;
                        });
                    }
                    Message::Close(_) => {
                        info!("Received close frame from {}", peer);
                        break;
                    }
                    Message::Ping(ping_data) => {
                        if tx.send(Message::Pong(ping_data)).await.is_err() {
                            error!("Failed to send pong to {}", peer);
                            break;
                        }
                    }
                    Message::Pong(_) => {}
                    Message::Binary(_) => {
                        warn!("Ignoring binary message from {}", peer);
                    }
                    Message::Frame(_) => {}
                }
            }
        }
    }
    info!("WebSocket connection closed for {} (Conv ID: {})", peer, session.id());
}
