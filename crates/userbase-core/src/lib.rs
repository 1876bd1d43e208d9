//! # Userbase Core
//!
//! Core types and error definitions for Userbase.
//! This crate provides the `User` entity, its typed identifier, and the
//! error taxonomy shared by the repository, service, and REST layers.

pub mod domain;
pub mod error;
pub mod id;
pub mod result;
pub mod telemetry;
pub mod validation;

pub use domain::*;
pub use error::*;
pub use id::*;
pub use result::*;
pub use validation::*;
