// Import necessary modules
mod app_state;
mod config;
mod database;
mod error;
mod handlers;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod utils;
mod websocket;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use app_state::AppState;
use config::Settings;
use database::init::init_db;
use repositories::{
    chat_repository::{ChatRepository, PgChatRepository},
    memory_repository::InMemoryChatRepository,
};
use routes::app_routes::create_router;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

// The main entry point for the application using the tokio runtime.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("room_chat=info,tower_http=info")),
        )
        .init();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };

    let repo: Arc<dyn ChatRepository> = match settings.database_url.as_deref() {
        Some(database_url) => match init_db(database_url).await {
            Ok(pool) => {
                info!("Database initialized successfully");
                Arc::new(PgChatRepository::new(pool))
            }
            Err(e) => {
                error!("Error initializing the database: {}", e);
                return;
            }
        },
        None => {
            warn!("DATABASE_URL not set, rooms and messages are kept in memory only");
            Arc::new(InMemoryChatRepository::new())
        }
    };

    let addr = settings.bind_addr;
    let app = create_router(AppState::new(repo, settings));

    info!("Server running on http://{}", addr);

    // Start the server, binding to the specified address and enabling graceful shutdown
    if let Err(e) = axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
    }
}

// A function to handle graceful shutdown by listening for termination signals.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Signal received, starting graceful shutdown");
}
