// app_state.rs

use std::sync::Arc;

use crate::{
    config::Settings, repositories::chat_repository::ChatRepository,
    websocket::connection_manager::ConnectionManager,
};

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Room and message storage
    pub repo: Arc<dyn ChatRepository>,
    /// Live room channels
    pub connections: ConnectionManager,
    /// Settings loaded at startup
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Creates a new instance of AppState
    ///
    /// # Arguments
    /// * `repo` - Storage backend for rooms and messages
    /// * `settings` - Runtime configuration
    pub fn new(repo: Arc<dyn ChatRepository>, settings: Settings) -> Self {
        Self {
            repo,
            connections: ConnectionManager::new(),
            settings: Arc::new(settings),
        }
    }
}
