use serde::{Deserialize, Serialize};

use crate::models::message::Message;

/// Frames pushed to room subscribers
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WebSocketMessage {
    Message(Message),
    Status(StatusMessage),
    Error(ErrorMessage),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StatusMessage {
    pub room: String,
    pub username: String,
    pub status: UserStatus,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Joined,
    Left,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ErrorMessage {
    pub code: String,
    pub message: String,
}
