pub mod audio;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod identity;
pub mod server;
pub mod speech;
pub mod store;
