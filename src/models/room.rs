use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::utils::validation::ROOM_NAME_REGEX;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: Uuid,
    pub name: String,
}

#[derive(Deserialize, Validate, Debug)]
pub struct CreateRoomRequest {
    #[validate(regex(
        path = "ROOM_NAME_REGEX",
        message = "Room names are 1 to 50 letters, digits, underscores or dashes"
    ))]
    pub name: String,
}
