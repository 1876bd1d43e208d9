//! # Userbase Config
//!
//! Configuration management for Userbase.
//! Supports layered configuration from files and environment variables
//! and validation of the loaded values.

mod app_config;
mod loader;
mod storage;
mod validation;

pub use app_config::*;
pub use loader::*;
pub use storage::*;
pub use validation::*;
