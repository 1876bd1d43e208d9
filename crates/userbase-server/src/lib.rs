//! # Userbase Server Library
//!
//! Wiring for the server binary: builds the repository, service and HTTP
//! state from configuration.

pub mod app;
pub mod startup;
