//! # Userbase REST
//!
//! HTTP surface for the users service. Handlers translate requests into
//! service calls and service errors into status codes; they add no rules of
//! their own beyond request shape validation.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
