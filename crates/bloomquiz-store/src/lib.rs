//! bloomquiz-store — Leaderboard storage backends.
//!
//! Implements the `LeaderboardStore` trait for a local JSON file, a remote
//! HTTP leaderboard API, and an in-memory list, and loads the configuration
//! that selects between them.

pub mod config;
pub mod file;
pub mod memory;
pub mod records;
pub mod remote;

pub use bloomquiz_core::error::StoreError;
pub use config::{create_store, load_config, load_config_from, QuizConfig, StoreConfig};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use remote::RemoteStore;
