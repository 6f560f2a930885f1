pub mod api_handlers;
pub mod chat_handlers;
pub mod download_handlers;
