// utils/validation.rs

use once_cell::sync::Lazy;
use regex::Regex;

/// Room names: word characters and dashes, lowercased before use
pub static ROOM_NAME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\w-]{1,50}$").unwrap());

/// Display names shown next to chat messages
pub static USERNAME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\w-]{1,30}$").unwrap());

/// Normalizes a room name taken from a path or payload.
///
/// Returns `None` when the lowercased name is not a valid room name.
pub fn normalize_room_name(raw: &str) -> Option<String> {
    // Lowercasing can lengthen a name, so the limit applies afterwards.
    let name = raw.to_lowercase();
    ROOM_NAME_REGEX.is_match(&name).then_some(name)
}
