// src/routes/app_routes.rs

use axum::middleware::from_fn;
use axum::{routing::get, Extension, Router};
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::handlers::{
    api_handlers::{create_message, create_room, list_messages, list_rooms},
    chat_handlers::{chat_page, login, login_page, post_chat_message},
    download_handlers::download_static_file,
};
use crate::middleware::auth_middleware::auth_middleware;
use crate::websocket::handlers::room_websocket_handler;

pub fn create_router(state: AppState) -> Router {
    let logged_in = Router::new()
        .route("/chat/:room_name/", get(chat_page).post(post_chat_message))
        .route("/ws/:room_name/", get(room_websocket_handler))
        .route_layer(from_fn(auth_middleware));

    Router::new()
        .route("/", get(login_page).post(login))
        .route("/api/rooms/", get(list_rooms).post(create_room))
        .route("/api/:room_name/messages/", get(list_messages).post(create_message))
        .route("/download/:file_type/", get(download_static_file))
        .merge(logged_in)
        .layer(TraceLayer::new_for_http())
        .layer(Extension(state))
}
