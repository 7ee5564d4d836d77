pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod server;
pub mod store;
pub mod telemetry;

pub use error::QuizError;
pub use store::{MemoryStore, QuizStore, SharedStore, SqliteStore};
