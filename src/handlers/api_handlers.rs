use axum::{
    extract::{rejection::JsonRejection, Path},
    Extension, Json,
};
use hyper::StatusCode;
use validator::Validate;

use crate::{
    app_state::AppState,
    error::AppError,
    models::{
        message::{CreateMessageRequest, Message},
        room::{CreateRoomRequest, Room},
    },
    services::chat_service,
};

/// GET /api/rooms/
pub async fn list_rooms(Extension(state): Extension<AppState>) -> Result<Json<Vec<Room>>, AppError> {
    Ok(Json(chat_service::list_rooms(&state).await?))
}

/// POST /api/rooms/
pub async fn create_room(
    Extension(state): Extension<AppState>,
    payload: Result<Json<CreateRoomRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Room>), AppError> {
    let Json(payload) = payload?;
    let room = chat_service::create_room(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(room)))
}

/// GET /api/:room_name/messages/
pub async fn list_messages(
    Extension(state): Extension<AppState>,
    Path(room_name): Path<String>,
) -> Result<Json<Vec<Message>>, AppError> {
    Ok(Json(chat_service::get_room_messages(&state, &room_name).await?))
}

/// POST /api/:room_name/messages/
pub async fn create_message(
    Extension(state): Extension<AppState>,
    Path(room_name): Path<String>,
    payload: Result<Json<CreateMessageRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Message>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let message =
        chat_service::post_message(&state, &room_name, &payload.username, &payload.content).await?;
    Ok((StatusCode::CREATED, Json(message)))
}
