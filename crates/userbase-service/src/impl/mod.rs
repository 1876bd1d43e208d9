//! Service implementations.
//!
//! Trait definitions live in the parent module (`users_service.rs`).

pub mod users_service_impl;

pub use users_service_impl::UsersServiceImpl;
