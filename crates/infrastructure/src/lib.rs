//! PowerShare Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus configuration loading and
//! document saving for the console binary.

pub mod adapters;
pub mod config;
pub mod documents;
pub mod persistence;
pub mod serialization;

pub use adapters::ReqwestHttpClient;
pub use config::{AppConfig, ConfigError, default_config_path};
pub use documents::{DocumentSaver, SaveError, file_name};
pub use persistence::FileCredentialStorage;
pub use serialization::{SerializationError, from_json_bytes, to_json_stable_bytes};
