#[path = "config.rs"]
pub mod config;

#[path = "dataset.rs"]
pub mod dataset;

#[path = "error.rs"]
pub mod error;

#[path = "file_handler.rs"]
pub mod file_handler;

#[path = "session.rs"]
pub mod session;

#[path = "spotify_handler.rs"]
pub mod spotify_handler;
