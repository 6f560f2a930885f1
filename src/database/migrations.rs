use log::info;
use tokio_postgres::Client;

// Creates the rooms and messages tables if they are missing.
pub async fn apply_migrations(client: &Client) -> Result<(), String> {
    create_tables(client).await?;
    info!("Schema is up to date");
    Ok(())
}

async fn create_tables(client: &Client) -> Result<(), String> {
    // Room names are stored lowercased; the unique constraint backs get-or-create
    let create_rooms_table_query = "
        CREATE TABLE IF NOT EXISTS rooms (
            id UUID PRIMARY KEY,
            name VARCHAR(255) NOT NULL UNIQUE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
    ";
    client
        .execute(create_rooms_table_query, &[])
        .await
        .map_err(|e| format!("Error creating rooms table: {}", e))?;

    let create_messages_table_query = "
        CREATE TABLE IF NOT EXISTS messages (
            id UUID PRIMARY KEY,
            room_id UUID NOT NULL REFERENCES rooms(id) ON DELETE CASCADE,
            username VARCHAR(255) NOT NULL,
            content TEXT NOT NULL,
            timestamp TIMESTAMPTZ NOT NULL DEFAULT now()
        )
    ";
    client
        .execute(create_messages_table_query, &[])
        .await
        .map_err(|e| format!("Error creating messages table: {}", e))?;

    let create_messages_index_query =
        "CREATE INDEX IF NOT EXISTS messages_room_id_timestamp_idx ON messages (room_id, timestamp)";
    client
        .execute(create_messages_index_query, &[])
        .await
        .map_err(|e| format!("Error creating messages index: {}", e))?;

    Ok(())
}
