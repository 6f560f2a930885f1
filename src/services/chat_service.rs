use tracing::{debug, info, warn};
use validator::Validate;

use crate::{
    app_state::AppState,
    error::AppError,
    models::{
        message::Message,
        room::{CreateRoomRequest, Room},
    },
    utils::validation::normalize_room_name,
    websocket::types::WebSocketMessage,
};

pub async fn list_rooms(state: &AppState) -> Result<Vec<Room>, AppError> {
    Ok(state.repo.list_rooms().await?)
}

pub async fn create_room(state: &AppState, payload: CreateRoomRequest) -> Result<Room, AppError> {
    let payload = CreateRoomRequest {
        name: payload.name.to_lowercase(),
    };
    payload.validate()?;

    let room = state.repo.create_room(&payload.name).await?;
    info!("Room created: {} ({})", room.name, room.id);
    Ok(room)
}

/// Resolves a room from a path segment, creating it on first use.
///
/// Names that cannot be a room resolve to `NotFound`.
pub async fn resolve_room(state: &AppState, raw_name: &str) -> Result<Room, AppError> {
    let name = normalize_room_name(raw_name).ok_or(AppError::NotFound)?;
    Ok(state.repo.get_or_create_room(&name).await?)
}

pub async fn get_room_messages(state: &AppState, raw_name: &str) -> Result<Vec<Message>, AppError> {
    let room = resolve_room(state, raw_name).await?;
    let messages = state.repo.list_messages(room.id).await?;
    debug!("Loaded {} messages for room {}", messages.len(), room.name);
    Ok(messages)
}

/// Stores a message and pushes it to the room's live subscribers
pub async fn post_message(
    state: &AppState,
    raw_name: &str,
    username: &str,
    content: &str,
) -> Result<Message, AppError> {
    let room = resolve_room(state, raw_name).await?;
    let message = state.repo.insert_message(room.id, username, content).await?;

    match state
        .connections
        .broadcast(&room.name, WebSocketMessage::Message(message.clone()))
    {
        Ok(receivers) => debug!("Message {} delivered to {} live subscribers", message.id, receivers),
        Err(e) => warn!("Failed to broadcast message {}: {}", message.id, e),
    }

    Ok(message)
}
