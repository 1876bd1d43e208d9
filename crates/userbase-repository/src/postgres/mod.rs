//! PostgreSQL repository implementations.

mod users_repository;

pub use users_repository::PgUsersRepository;
