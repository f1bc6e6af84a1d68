//! Storage module - SQLite persistence for nights and curve snapshots

pub mod migrations;
mod sqlite;

pub use sqlite::{Result, Store, StoreError};
