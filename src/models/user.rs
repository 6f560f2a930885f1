use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::validation::{ROOM_NAME_REGEX, USERNAME_REGEX};

#[derive(Deserialize, Validate, Debug)]
pub struct LoginData {
    #[validate(regex(
        path = "USERNAME_REGEX",
        message = "Usernames are 1 to 30 letters, digits, underscores or dashes"
    ))]
    pub username: String,
    #[validate(regex(
        path = "ROOM_NAME_REGEX",
        message = "Room names are 1 to 50 letters, digits, underscores or dashes"
    ))]
    pub room_name: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}
