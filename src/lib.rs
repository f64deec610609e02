pub mod analysis;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod monitoring;
pub mod players;
pub mod scheduler;
pub mod server;
pub mod sheets;
pub mod store;
