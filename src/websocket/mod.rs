pub mod connection_manager;
pub mod handlers;
pub mod types;
