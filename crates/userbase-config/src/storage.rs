//! Storage backend selection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where user records are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// PostgreSQL through a connection pool.
    #[default]
    Postgres,
    /// Process-local map; contents are lost on restart.
    Memory,
}

impl StorageBackend {
    /// Returns true if this backend needs a database connection.
    #[must_use]
    pub const fn requires_database(&self) -> bool {
        matches!(self, Self::Postgres)
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Postgres => write!(f, "postgres"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Selected backend.
    pub backend: StorageBackend,
    /// Apply pending migrations on startup (postgres only).
    pub run_migrations: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Postgres,
            run_migrations: true,
        }
    }
}
