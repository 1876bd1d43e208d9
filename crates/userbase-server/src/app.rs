//! Component wiring.

use std::sync::Arc;
use tracing::info;
use userbase_config::{AppConfig, StorageBackend};
use userbase_core::UserbaseResult;
use userbase_repository::{create_pool, DatabasePool, InMemoryUsersRepository, PgUsersRepository, UsersRepository};
use userbase_rest::AppState;
use userbase_service::{UsersService, UsersServiceImpl};

/// Everything the HTTP server needs, built once at startup.
pub struct Components {
    pub state: AppState,
    /// Present only for the postgres backend; closed on shutdown.
    pub pool: Option<Arc<DatabasePool>>,
}

impl Components {
    /// Builds the repository for the configured backend and the service on top of it.
    pub async fn build(config: &AppConfig) -> UserbaseResult<Self> {
        let mut pool = None;
        let users_repository: Arc<dyn UsersRepository> = match config.storage.backend {
            StorageBackend::Postgres => {
                let db_pool = create_pool(&config.database).await?;
                if config.storage.run_migrations {
                    db_pool.run_migrations().await?;
                }
                pool = Some(db_pool.clone());
                Arc::new(PgUsersRepository::new(db_pool))
            }
            StorageBackend::Memory => Arc::new(InMemoryUsersRepository::new()),
        };

        let users_service: Arc<dyn UsersService> = Arc::new(UsersServiceImpl::new(users_repository.clone()));

        info!(backend = %config.storage.backend, "Components built");

        Ok(Self {
            state: AppState::new(users_service, users_repository),
            pool,
        })
    }

    /// Releases storage resources.
    pub async fn shutdown(self) {
        if let Some(pool) = self.pool {
            pool.close().await;
        }
    }
}
