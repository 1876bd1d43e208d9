//! Repository trait definitions.

use async_trait::async_trait;
use userbase_core::{NewUser, User, UserChanges, UserId, UserbaseResult};

/// Users repository trait.
///
/// Lookups return `Ok(None)` when nothing matches; only writes against a
/// missing id fail with `NotFound`.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Finds the user holding an email address.
    async fn find_by_email(&self, email: &str) -> UserbaseResult<Option<User>>;

    /// Finds a user holding a phone number, ignoring the user `exclude_id`.
    async fn find_by_phone(&self, phone: &str, exclude_id: UserId) -> UserbaseResult<Option<User>>;

    /// Finds a user by ID.
    async fn find_by_id(&self, id: UserId) -> UserbaseResult<Option<User>>;

    /// Returns every user ordered by ascending id.
    async fn find_all(&self) -> UserbaseResult<Vec<User>>;

    /// Persists a new user and returns it with its assigned id.
    async fn create(&self, user: NewUser) -> UserbaseResult<User>;

    /// Applies changes to an existing user and returns the updated record.
    async fn update(&self, id: UserId, changes: UserChanges) -> UserbaseResult<User>;

    /// Removes a user and returns the deleted record.
    async fn delete(&self, id: UserId) -> UserbaseResult<User>;

    /// Checks that the backing store is reachable.
    async fn health_check(&self) -> UserbaseResult<()> {
        Ok(())
    }
}
