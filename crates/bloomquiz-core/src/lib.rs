//! bloomquiz-core — Game engine, scoring, and leaderboard rules.
//!
//! This crate defines the question model, the level progression state
//! machine, and the ranking rules that the rest of bloomquiz builds on.

pub mod deck;
pub mod engine;
pub mod error;
pub mod leaderboard;
pub mod model;
pub mod parser;
pub mod report;
pub mod scoring;
pub mod service;
pub mod traits;
