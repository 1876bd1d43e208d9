//! Users service trait definition.

use crate::dto::{CreateUserRequest, UpdateUserRequest, UserResponse};
use async_trait::async_trait;
use userbase_core::{UserId, UserbaseResult};

/// Users service trait.
#[async_trait]
pub trait UsersService: Send + Sync {
    /// Creates a user; fails with `Conflict` if the email is taken.
    async fn create(&self, request: CreateUserRequest) -> UserbaseResult<UserResponse>;

    /// Updates name, phone and city of an existing user.
    async fn update(&self, id: UserId, request: UpdateUserRequest) -> UserbaseResult<UserResponse>;

    /// Lists every user; an empty store is reported as `NotFound`.
    async fn get_all(&self) -> UserbaseResult<Vec<UserResponse>>;

    /// Gets a user by ID.
    async fn show(&self, id: UserId) -> UserbaseResult<UserResponse>;

    /// Deletes a user and returns the removed record.
    async fn delete(&self, id: UserId) -> UserbaseResult<UserResponse>;
}
