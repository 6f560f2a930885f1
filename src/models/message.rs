use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::utils::validation::USERNAME_REGEX;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Uuid,
    /// Id of the owning room
    pub room: Uuid,
    pub username: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Deserialize, Validate, Debug)]
pub struct CreateMessageRequest {
    #[validate(regex(
        path = "USERNAME_REGEX",
        message = "Usernames are 1 to 30 letters, digits, underscores or dashes"
    ))]
    pub username: String,
    #[validate(length(min = 1, message = "Message content must not be empty"))]
    pub content: String,
}

/// Message body posted from the chat page or over the live channel;
/// the author comes from the login token.
#[derive(Deserialize, Validate, Debug)]
pub struct PostMessageData {
    #[validate(length(min = 1, message = "Message content must not be empty"))]
    pub content: String,
}
