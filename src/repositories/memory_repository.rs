// repositories/memory_repository.rs

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::chat_repository::{ChatRepository, RepositoryError};
use crate::models::{message::Message, room::Room};

#[derive(Default)]
struct Tables {
    rooms: Vec<Room>,
    messages: Vec<Message>,
}

/// Process-local repository used when no database is configured
#[derive(Default)]
pub struct InMemoryChatRepository {
    tables: RwLock<Tables>,
}

impl InMemoryChatRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tables {
    fn find_room(&self, name: &str) -> Option<&Room> {
        self.rooms.iter().find(|room| room.name == name)
    }

    fn push_room(&mut self, name: &str) -> Room {
        let room = Room {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        self.rooms.push(room.clone());
        room
    }
}

#[async_trait]
impl ChatRepository for InMemoryChatRepository {
    async fn list_rooms(&self) -> Result<Vec<Room>, RepositoryError> {
        Ok(self.tables.read().await.rooms.clone())
    }

    async fn create_room(&self, name: &str) -> Result<Room, RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.find_room(name).is_some() {
            return Err(RepositoryError::RoomNameTaken(name.to_string()));
        }
        Ok(tables.push_room(name))
    }

    async fn get_or_create_room(&self, name: &str) -> Result<Room, RepositoryError> {
        let mut tables = self.tables.write().await;
        if let Some(room) = tables.find_room(name) {
            return Ok(room.clone());
        }
        Ok(tables.push_room(name))
    }

    async fn list_messages(&self, room_id: Uuid) -> Result<Vec<Message>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .messages
            .iter()
            .filter(|message| message.room == room_id)
            .cloned()
            .collect())
    }

    async fn insert_message(
        &self,
        room_id: Uuid,
        username: &str,
        content: &str,
    ) -> Result<Message, RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.rooms.iter().any(|room| room.id == room_id) {
            return Err(RepositoryError::RoomNotFound(room_id));
        }

        let message = Message {
            id: Uuid::new_v4(),
            room: room_id,
            username: username.to_string(),
            content: content.to_string(),
            timestamp: Utc::now(),
        };
        tables.messages.push(message.clone());
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn get_or_create_returns_the_existing_room() {
        let repo = InMemoryChatRepository::new();
        let first = repo.get_or_create_room("lobby").await.unwrap();
        let second = repo.get_or_create_room("lobby").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(repo.list_rooms().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn concurrent_get_or_create_yields_one_room() {
        let repo = Arc::new(InMemoryChatRepository::new());
        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.get_or_create_room("busy").await.unwrap() })
            })
            .collect();

        let mut ids = Vec::new();
        for task in tasks {
            ids.push(task.await.unwrap().id);
        }
        ids.dedup();

        assert_eq!(ids.len(), 1);
        assert_eq!(repo.list_rooms().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn create_room_rejects_duplicates() {
        let repo = InMemoryChatRepository::new();
        repo.create_room("dup").await.unwrap();

        let err = repo.create_room("dup").await.unwrap_err();
        assert!(matches!(err, RepositoryError::RoomNameTaken(name) if name == "dup"));
    }

    #[tokio::test]
    async fn messages_are_scoped_to_their_room() {
        let repo = InMemoryChatRepository::new();
        let a = repo.get_or_create_room("a").await.unwrap();
        let b = repo.get_or_create_room("b").await.unwrap();

        repo.insert_message(a.id, "ann", "first").await.unwrap();
        repo.insert_message(b.id, "bob", "elsewhere").await.unwrap();
        repo.insert_message(a.id, "ann", "second").await.unwrap();

        let contents: Vec<_> = repo
            .list_messages(a.id)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.content)
            .collect();
        assert_eq!(contents, ["first", "second"]);
    }

    #[tokio::test]
    async fn insert_message_requires_a_room() {
        let repo = InMemoryChatRepository::new();
        let missing = Uuid::new_v4();

        let err = repo.insert_message(missing, "ann", "hi").await.unwrap_err();
        assert!(matches!(err, RepositoryError::RoomNotFound(id) if id == missing));
    }
}
