//! REST API controllers.

pub mod health_controller;
pub mod users_controller;

pub use health_controller::*;
