// src/websocket/connection_manager.rs
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;

use super::types::WebSocketMessage;

const ROOM_CHANNEL_CAPACITY: usize = 100;

/// Live fan-out channels, one per room name
#[derive(Clone, Default)]
pub struct ConnectionManager {
    rooms: Arc<Mutex<HashMap<String, RoomChannel>>>,
}

struct RoomChannel {
    channel: broadcast::Sender<WebSocketMessage>,
    members: usize,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to a room, creating its channel on first join
    pub fn join(&self, room: &str) -> Result<broadcast::Receiver<WebSocketMessage>, String> {
        let mut rooms = self.rooms.lock().map_err(|_| "Lock error")?;
        let room_channel = rooms.entry(room.to_string()).or_insert_with(|| {
            let (tx, _) = broadcast::channel(ROOM_CHANNEL_CAPACITY);
            RoomChannel {
                channel: tx,
                members: 0,
            }
        });

        room_channel.members += 1;
        Ok(room_channel.channel.subscribe())
    }

    /// Drops one membership; the channel goes away with its last member
    pub fn leave(&self, room: &str) -> Result<(), String> {
        let mut rooms = self.rooms.lock().map_err(|_| "Lock error")?;

        if let Some(room_channel) = rooms.get_mut(room) {
            room_channel.members = room_channel.members.saturating_sub(1);

            if room_channel.members == 0 {
                rooms.remove(room);
            }
        }

        Ok(())
    }

    /// Sends to every subscriber of the room, returning how many received it
    pub fn broadcast(&self, room: &str, message: WebSocketMessage) -> Result<usize, String> {
        let rooms = self.rooms.lock().map_err(|_| "Lock error")?;

        Ok(rooms
            .get(room)
            .and_then(|room_channel| room_channel.channel.send(message).ok())
            .unwrap_or(0))
    }

    pub fn member_count(&self, room: &str) -> usize {
        self.rooms
            .lock()
            .map(|rooms| rooms.get(room).map_or(0, |room_channel| room_channel.members))
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::websocket::types::{StatusMessage, UserStatus};

    fn joined(room: &str) -> WebSocketMessage {
        WebSocketMessage::Status(StatusMessage {
            room: room.to_string(),
            username: "ann".to_string(),
            status: UserStatus::Joined,
        })
    }

    #[tokio::test]
    async fn broadcast_reaches_only_the_same_room() {
        let manager = ConnectionManager::new();
        let mut lobby = manager.join("lobby").unwrap();
        let mut other = manager.join("other").unwrap();

        assert_eq!(manager.broadcast("lobby", joined("lobby")).unwrap(), 1);
        assert_eq!(lobby.recv().await.unwrap(), joined("lobby"));
        assert!(other.try_recv().is_err());
    }

    #[test]
    fn broadcast_to_an_empty_room_is_a_no_op() {
        let manager = ConnectionManager::new();
        assert_eq!(manager.broadcast("nobody", joined("nobody")).unwrap(), 0);
    }

    #[test]
    fn last_leave_removes_the_channel() {
        let manager = ConnectionManager::new();
        let _a = manager.join("lobby").unwrap();
        let _b = manager.join("lobby").unwrap();
        assert_eq!(manager.member_count("lobby"), 2);

        manager.leave("lobby").unwrap();
        assert_eq!(manager.member_count("lobby"), 1);
        manager.leave("lobby").unwrap();
        assert_eq!(manager.member_count("lobby"), 0);
        assert_eq!(manager.broadcast("lobby", joined("lobby")).unwrap(), 0);
    }
}
