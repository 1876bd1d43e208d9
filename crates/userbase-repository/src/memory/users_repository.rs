//! In-memory users repository.
//!
//! Records live in a `BTreeMap` keyed by id, so iteration order is ascending
//! id. Ids come from a counter that never reuses a value, even after deletes.

use crate::{phone_in_use, traits::UsersRepository, EMAIL_IN_USE, USER_NOT_FOUND};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};
use userbase_core::{NewUser, User, UserChanges, UserId, UserbaseError, UserbaseResult};

#[derive(Debug, Default)]
struct Store {
    users: BTreeMap<UserId, User>,
    last_id: i64,
}

/// Process-local users repository.
#[derive(Debug, Default)]
pub struct InMemoryUsersRepository {
    store: Mutex<Store>,
}

impl InMemoryUsersRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub fn len(&self) -> UserbaseResult<usize> {
        Ok(self.lock()?.users.len())
    }

    /// Returns true if no users are stored.
    pub fn is_empty(&self) -> UserbaseResult<bool> {
        Ok(self.len()? == 0)
    }

    // The guard is never held across an await point.
    fn lock(&self) -> UserbaseResult<MutexGuard<'_, Store>> {
        self.store
            .lock()
            .map_err(|_| UserbaseError::internal("user store lock poisoned"))
    }
}

#[async_trait]
impl UsersRepository for InMemoryUsersRepository {
    async fn find_by_email(&self, email: &str) -> UserbaseResult<Option<User>> {
        debug!("Finding user by email: {}", email);
        Ok(self.lock()?.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_phone(&self, phone: &str, exclude_id: UserId) -> UserbaseResult<Option<User>> {
        debug!("Finding user by phone: {} (excluding {})", phone, exclude_id);
        Ok(self
            .lock()?
            .users
            .values()
            .find(|u| u.phone == phone && u.id != exclude_id)
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> UserbaseResult<Option<User>> {
        debug!("Finding user by id: {}", id);
        Ok(self.lock()?.users.get(&id).cloned())
    }

    async fn find_all(&self) -> UserbaseResult<Vec<User>> {
        debug!("Finding all users");
        Ok(self.lock()?.users.values().cloned().collect())
    }

    async fn create(&self, user: NewUser) -> UserbaseResult<User> {
        let mut store = self.lock()?;

        if store.users.values().any(|u| u.email == user.email) {
            return Err(UserbaseError::conflict(EMAIL_IN_USE));
        }
        if store.users.values().any(|u| u.phone == user.phone) {
            return Err(UserbaseError::conflict(phone_in_use(&user.phone)));
        }

        store.last_id += 1;
        let id = UserId::new(store.last_id);
        let created = User::from_new(id, user, Utc::now());
        store.users.insert(id, created.clone());

        info!("Inserted user {}", id);
        Ok(created)
    }

    async fn update(&self, id: UserId, changes: UserChanges) -> UserbaseResult<User> {
        let mut store = self.lock()?;

        if !store.users.contains_key(&id) {
            return Err(UserbaseError::not_found(USER_NOT_FOUND));
        }
        if let Some(phone) = changes.phone.as_deref() {
            if store.users.values().any(|u| u.phone == phone && u.id != id) {
                return Err(UserbaseError::conflict(phone_in_use(phone)));
            }
        }

        let user = store
            .users
            .get_mut(&id)
            .ok_or_else(|| UserbaseError::not_found(USER_NOT_FOUND))?;
        user.apply(changes, Utc::now());

        info!("Updated user {}", id);
        Ok(user.clone())
    }

    async fn delete(&self, id: UserId) -> UserbaseResult<User> {
        let removed = self
            .lock()?
            .users
            .remove(&id)
            .ok_or_else(|| UserbaseError::not_found(USER_NOT_FOUND))?;

        info!("Deleted user {}", id);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str, phone: &str) -> NewUser {
        NewUser {
            name: "Test User".to_string(),
            email: email.to_string(),
            password: "secret".to_string(),
            phone: phone.to_string(),
            city: "Lisbon".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let repo = InMemoryUsersRepository::new();
        let first = repo.create(new_user("a@x.com", "1")).await.unwrap();
        let second = repo.create(new_user("b@x.com", "2")).await.unwrap();

        assert_eq!(first.id, UserId::new(1));
        assert_eq!(second.id, UserId::new(2));
        assert_eq!(first.email, "a@x.com");
        assert_eq!(first.password, "secret");
        assert_eq!(repo.len().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let repo = InMemoryUsersRepository::new();
        let first = repo.create(new_user("a@x.com", "1")).await.unwrap();
        repo.delete(first.id).await.unwrap();

        let second = repo.create(new_user("b@x.com", "2")).await.unwrap();
        assert_eq!(second.id, UserId::new(2));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_email_and_phone() {
        let repo = InMemoryUsersRepository::new();
        repo.create(new_user("a@x.com", "1")).await.unwrap();

        let err = repo.create(new_user("a@x.com", "2")).await.unwrap_err();
        assert!(matches!(err, UserbaseError::Conflict(ref m) if m == "Email is already in use"));

        let err = repo.create(new_user("b@x.com", "1")).await.unwrap_err();
        assert!(matches!(err, UserbaseError::Conflict(ref m) if m == "Phone number 1 is already in use"));

        assert_eq!(repo.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_find_by_email_and_id() {
        let repo = InMemoryUsersRepository::new();
        let created = repo.create(new_user("a@x.com", "1")).await.unwrap();

        assert_eq!(repo.find_by_email("a@x.com").await.unwrap(), Some(created.clone()));
        assert!(repo.find_by_email("A@X.COM").await.unwrap().is_none());
        assert_eq!(repo.find_by_id(created.id).await.unwrap(), Some(created));
        assert!(repo.find_by_id(UserId::new(999)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_phone_excludes_given_id() {
        let repo = InMemoryUsersRepository::new();
        let a = repo.create(new_user("a@x.com", "111")).await.unwrap();
        let b = repo.create(new_user("b@x.com", "222")).await.unwrap();

        assert!(repo.find_by_phone("111", a.id).await.unwrap().is_none());
        assert_eq!(repo.find_by_phone("111", b.id).await.unwrap().map(|u| u.id), Some(a.id));
        assert!(repo.find_by_phone("333", b.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_all_is_ordered_by_id() {
        let repo = InMemoryUsersRepository::new();
        assert!(repo.find_all().await.unwrap().is_empty());

        for i in 0..5 {
            repo.create(new_user(&format!("u{i}@x.com"), &i.to_string())).await.unwrap();
        }

        let ids: Vec<i64> = repo.find_all().await.unwrap().iter().map(|u| u.id.into_inner()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_update_applies_only_given_fields() {
        let repo = InMemoryUsersRepository::new();
        let created = repo.create(new_user("a@x.com", "111")).await.unwrap();

        let updated = repo
            .update(
                created.id,
                UserChanges {
                    city: Some("Porto".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.city, "Porto");
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.phone, "111");
        assert_eq!(updated.email, created.email);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_update_to_own_phone_is_allowed() {
        let repo = InMemoryUsersRepository::new();
        let created = repo.create(new_user("a@x.com", "111")).await.unwrap();

        let updated = repo
            .update(
                created.id,
                UserChanges {
                    phone: Some("111".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.phone, "111");
    }

    #[tokio::test]
    async fn test_update_rejects_phone_of_other_user() {
        let repo = InMemoryUsersRepository::new();
        repo.create(new_user("a@x.com", "111")).await.unwrap();
        let b = repo.create(new_user("b@x.com", "222")).await.unwrap();

        let err = repo
            .update(
                b.id,
                UserChanges {
                    phone: Some("111".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Phone number 111 is already in use");
        assert_eq!(repo.find_by_id(b.id).await.unwrap().unwrap().phone, "222");
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_user() {
        let repo = InMemoryUsersRepository::new();

        let err = repo.update(UserId::new(7), UserChanges::default()).await.unwrap_err();
        assert!(matches!(err, UserbaseError::NotFound(ref m) if m == "User not found"));

        let err = repo.delete(UserId::new(7)).await.unwrap_err();
        assert!(matches!(err, UserbaseError::NotFound(ref m) if m == "User not found"));
    }

    #[tokio::test]
    async fn test_delete_returns_removed_record() {
        let repo = InMemoryUsersRepository::new();
        let created = repo.create(new_user("a@x.com", "1")).await.unwrap();

        let deleted = repo.delete(created.id).await.unwrap();
        assert_eq!(deleted, created);
        assert!(repo.is_empty().unwrap());
        assert!(repo.health_check().await.is_ok());
    }
}
