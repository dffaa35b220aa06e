pub mod chat;
pub mod credentials;
pub mod error;
pub mod repo;
pub mod service;
pub mod upsert;
