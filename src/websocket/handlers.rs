use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, WebSocketUpgrade,
    },
    response::Response,
    Extension,
};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};
use validator::Validate;

use crate::{
    app_state::AppState,
    error::AppError,
    middleware::auth_middleware::ChatUser,
    models::message::PostMessageData,
    services::chat_service,
};

use super::types::{ErrorMessage, StatusMessage, UserStatus, WebSocketMessage};

// GET /ws/:room_name/ upgrades once the room is resolved
pub async fn room_websocket_handler(
    ws: WebSocketUpgrade,
    Extension(state): Extension<AppState>,
    Extension(ChatUser(username)): Extension<ChatUser>,
    Path(room_name): Path<String>,
) -> Result<Response, AppError> {
    let room = chat_service::resolve_room(&state, &room_name).await?;
    Ok(ws.on_upgrade(move |socket| handle_room_socket(socket, state, room.name, username)))
}

fn encode(frame: &WebSocketMessage) -> Option<Message> {
    serde_json::to_string(frame).ok().map(Message::Text)
}

fn status_frame(room: &str, username: &str, status: UserStatus) -> WebSocketMessage {
    WebSocketMessage::Status(StatusMessage {
        room: room.to_string(),
        username: username.to_string(),
        status,
    })
}

// Stores a client frame as a message; the broadcast echoes it back to the sender too.
async fn handle_client_frame(
    state: &AppState,
    room: &str,
    username: &str,
    text: &str,
) -> Result<(), ErrorMessage> {
    let data: PostMessageData = serde_json::from_str(text).map_err(|e| ErrorMessage {
        code: "invalid_frame".to_string(),
        message: e.to_string(),
    })?;
    data.validate().map_err(|e| ErrorMessage {
        code: "invalid_message".to_string(),
        message: e.to_string(),
    })?;

    chat_service::post_message(state, room, username, &data.content)
        .await
        .map(|_| ())
        .map_err(|e| ErrorMessage {
            code: "not_stored".to_string(),
            message: e.to_string(),
        })
}

async fn handle_room_socket(mut socket: WebSocket, state: AppState, room: String, username: String) {
    let connections = &state.connections;

    let mut rx = match connections.join(&room) {
        Ok(rx) => rx,
        Err(e) => {
            warn!("Failed to join room {}: {}", room, e);
            return;
        }
    };
    info!(
        "{} joined room {} ({} connected)",
        username,
        room,
        connections.member_count(&room)
    );
    if let Err(e) = connections.broadcast(&room, status_frame(&room, &username, UserStatus::Joined)) {
        warn!("Failed to announce {} in {}: {}", username, room, e);
    }

    loop {
        tokio::select! {
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        if let Err(error) = handle_client_frame(&state, &room, &username, &text).await {
                            debug!("Rejected frame from {} in {}: {}", username, room, error.message);
                            let Some(reply) = encode(&WebSocketMessage::Error(error)) else { continue };
                            if socket.send(reply).await.is_err() {
                                break;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("WebSocket error for {} in {}: {}", username, room, e);
                        break;
                    }
                }
            }
            outgoing = rx.recv() => {
                match outgoing {
                    Ok(frame) => {
                        let Some(frame) = encode(&frame) else { continue };
                        if socket.send(frame).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("{} lagged behind in {}, {} frames skipped", username, room, skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }

    if let Err(e) = connections.leave(&room) {
        warn!("Failed to remove {} from room {}: {}", username, room, e);
    }
    if let Err(e) = connections.broadcast(&room, status_frame(&room, &username, UserStatus::Left)) {
        warn!("Failed to announce {} leaving {}: {}", username, room, e);
    }
    info!("{} left room {}", username, room);
}
