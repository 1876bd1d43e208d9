//! # Userbase Service
//!
//! Business rules for the users resource. The service checks email and
//! phone uniqueness against the repository before writing and reports
//! missing users and empty listings as `NotFound`.

pub mod dto;
pub mod r#impl;
pub mod users_service;

pub use dto::*;
pub use r#impl::UsersServiceImpl;
pub use users_service::*;
