pub mod chat_service;
pub mod download_service;
pub mod jwt_service;
