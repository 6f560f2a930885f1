// repositories/chat_repository.rs

use async_trait::async_trait;
use deadpool_postgres::{Client, Pool};
use thiserror::Error;
use tokio_postgres::{error::SqlState, Row};
use uuid::Uuid;

use crate::models::{message::Message, room::Room};

/// Storage errors for rooms and messages
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Failed to get client from pool: {0}")]
    Pool(String),

    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    /// Violates the unique constraint on room names
    #[error("Room name already taken: {0}")]
    RoomNameTaken(String),

    #[error("Room not found: {0}")]
    RoomNotFound(Uuid),
}

/// Persistence of rooms and their messages.
///
/// Room names reach the repository already normalized (lowercase).
#[async_trait]
pub trait ChatRepository: Send + Sync + 'static {
    /// All rooms, oldest first
    async fn list_rooms(&self) -> Result<Vec<Room>, RepositoryError>;

    /// Creates a room, failing with `RoomNameTaken` if the name exists
    async fn create_room(&self, name: &str) -> Result<Room, RepositoryError>;

    /// Returns the room with this name, creating it first if needed.
    ///
    /// Concurrent calls for the same new name observe a single room.
    async fn get_or_create_room(&self, name: &str) -> Result<Room, RepositoryError>;

    /// Messages of one room in insertion order
    async fn list_messages(&self, room_id: Uuid) -> Result<Vec<Message>, RepositoryError>;

    /// Appends a message to an existing room
    async fn insert_message(
        &self,
        room_id: Uuid,
        username: &str,
        content: &str,
    ) -> Result<Message, RepositoryError>;
}

/// Postgres-backed repository
pub struct PgChatRepository {
    pool: Pool,
}

impl PgChatRepository {
    pub fn new(pool: Pool) -> Self {
        PgChatRepository { pool }
    }

    async fn client(&self) -> Result<Client, RepositoryError> {
        self.pool
            .get()
            .await
            .map_err(|e| RepositoryError::Pool(e.to_string()))
    }
}

fn room_from_row(row: &Row) -> Room {
    Room {
        id: row.get(0),
        name: row.get(1),
    }
}

fn message_from_row(row: &Row) -> Message {
    Message {
        id: row.get(0),
        room: row.get(1),
        username: row.get(2),
        content: row.get(3),
        timestamp: row.get(4),
    }
}

#[async_trait]
impl ChatRepository for PgChatRepository {
    async fn list_rooms(&self) -> Result<Vec<Room>, RepositoryError> {
        let client = self.client().await?;
        let rows = client
            .query("SELECT id, name FROM rooms ORDER BY created_at, name", &[])
            .await?;
        Ok(rows.iter().map(room_from_row).collect())
    }

    async fn create_room(&self, name: &str) -> Result<Room, RepositoryError> {
        let client = self.client().await?;
        let query = "
            INSERT INTO rooms (id, name)
            VALUES ($1, $2)
            RETURNING id, name
        ";
        match client.query_one(query, &[&Uuid::new_v4(), &name]).await {
            Ok(row) => Ok(room_from_row(&row)),
            Err(e) if e.code() == Some(&SqlState::UNIQUE_VIOLATION) => {
                Err(RepositoryError::RoomNameTaken(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get_or_create_room(&self, name: &str) -> Result<Room, RepositoryError> {
        let client = self.client().await?;

        // The loser of a concurrent insert does nothing and reads the winner's row.
        let insert_query = "
            INSERT INTO rooms (id, name)
            VALUES ($1, $2)
            ON CONFLICT (name) DO NOTHING
        ";
        client
            .execute(insert_query, &[&Uuid::new_v4(), &name])
            .await?;

        let row = client
            .query_one("SELECT id, name FROM rooms WHERE name = $1", &[&name])
            .await?;
        Ok(room_from_row(&row))
    }

    async fn list_messages(&self, room_id: Uuid) -> Result<Vec<Message>, RepositoryError> {
        let client = self.client().await?;
        let query = "
            SELECT m.id, m.room_id, m.username, m.content, m.timestamp
            FROM messages m
            WHERE m.room_id = $1
            ORDER BY m.timestamp, m.id
        ";
        let rows = client.query(query, &[&room_id]).await?;
        Ok(rows.iter().map(message_from_row).collect())
    }

    async fn insert_message(
        &self,
        room_id: Uuid,
        username: &str,
        content: &str,
    ) -> Result<Message, RepositoryError> {
        let client = self.client().await?;
        let query = "
            INSERT INTO messages (id, room_id, username, content)
            VALUES ($1, $2, $3, $4)
            RETURNING id, room_id, username, content, timestamp
        ";
        match client
            .query_one(query, &[&Uuid::new_v4(), &room_id, &username, &content])
            .await
        {
            Ok(row) => Ok(message_from_row(&row)),
            Err(e) if e.code() == Some(&SqlState::FOREIGN_KEY_VIOLATION) => {
                Err(RepositoryError::RoomNotFound(room_id))
            }
            Err(e) => Err(e.into()),
        }
    }
}
