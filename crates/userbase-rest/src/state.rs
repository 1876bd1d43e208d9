//! Application state for Axum handlers.

use std::sync::Arc;
use userbase_repository::UsersRepository;
use userbase_service::UsersService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users_service: Arc<dyn UsersService>,
    /// Used by the readiness probe only; handlers go through the service.
    pub users_repository: Arc<dyn UsersRepository>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(users_service: Arc<dyn UsersService>, users_repository: Arc<dyn UsersRepository>) -> Self {
        Self {
            users_service,
            users_repository,
        }
    }
}
