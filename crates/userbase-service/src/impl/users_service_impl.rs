//! Users service implementation.

use crate::dto::{CreateUserRequest, UpdateUserRequest, UserResponse};
use crate::users_service::UsersService;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};
use userbase_core::{UserId, UserbaseError, UserbaseResult};
use userbase_repository::{phone_in_use, UsersRepository, EMAIL_IN_USE, USER_NOT_FOUND};

const EMPTY_USER_LIST: &str = "Empty user list";

/// Users service backed by a `UsersRepository`.
///
/// Holds no state besides the repository handle; uniqueness is checked with a
/// lookup before each write and the storage layer rejects anything that
/// slips through between the two calls.
pub struct UsersServiceImpl {
    users_repository: Arc<dyn UsersRepository>,
}

impl UsersServiceImpl {
    /// Creates a new users service.
    pub fn new(users_repository: Arc<dyn UsersRepository>) -> Self {
        Self { users_repository }
    }
}

#[async_trait]
impl UsersService for UsersServiceImpl {
    async fn create(&self, request: CreateUserRequest) -> UserbaseResult<UserResponse> {
        debug!("Creating user: {}", request.email);

        if self.users_repository.find_by_email(&request.email).await?.is_some() {
            return Err(UserbaseError::conflict(EMAIL_IN_USE));
        }

        let created = self.users_repository.create(request.into()).await?;

        info!("User created: {}", created.id);
        Ok(UserResponse::from(created))
    }

    async fn update(&self, id: UserId, request: UpdateUserRequest) -> UserbaseResult<UserResponse> {
        debug!("Updating user: {}", id);

        let existing = self
            .users_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| UserbaseError::not_found(USER_NOT_FOUND))?;

        // Keeping the current phone never conflicts with the user's own record.
        if let Some(phone) = request.phone.as_deref().filter(|p| !p.is_empty() && *p != existing.phone) {
            if self.users_repository.find_by_phone(phone, id).await?.is_some() {
                return Err(UserbaseError::conflict(phone_in_use(phone)));
            }
        }

        let updated = self.users_repository.update(id, request.into()).await?;

        info!("User updated: {}", id);
        Ok(UserResponse::from(updated))
    }

    async fn get_all(&self) -> UserbaseResult<Vec<UserResponse>> {
        debug!("Listing users");

        let users = self.users_repository.find_all().await?;
        if users.is_empty() {
            return Err(UserbaseError::not_found(EMPTY_USER_LIST));
        }

        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    async fn show(&self, id: UserId) -> UserbaseResult<UserResponse> {
        debug!("Getting user: {}", id);

        let user = self
            .users_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| UserbaseError::not_found(USER_NOT_FOUND))?;

        Ok(UserResponse::from(user))
    }

    async fn delete(&self, id: UserId) -> UserbaseResult<UserResponse> {
        debug!("Deleting user: {}", id);

        if self.users_repository.find_by_id(id).await?.is_none() {
            return Err(UserbaseError::not_found(USER_NOT_FOUND));
        }

        let deleted = self.users_repository.delete(id).await?;

        info!("User deleted: {}", id);
        Ok(UserResponse::from(deleted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mockall::mock;
    use mockall::predicate::eq;
    use userbase_core::{NewUser, User, UserChanges};
    use userbase_repository::InMemoryUsersRepository;

    mock! {
        Repo {}

        #[async_trait]
        impl UsersRepository for Repo {
            async fn find_by_email(&self, email: &str) -> UserbaseResult<Option<User>>;
            async fn find_by_phone(&self, phone: &str, exclude_id: UserId) -> UserbaseResult<Option<User>>;
            async fn find_by_id(&self, id: UserId) -> UserbaseResult<Option<User>>;
            async fn find_all(&self) -> UserbaseResult<Vec<User>>;
            async fn create(&self, user: NewUser) -> UserbaseResult<User>;
            async fn update(&self, id: UserId, changes: UserChanges) -> UserbaseResult<User>;
            async fn delete(&self, id: UserId) -> UserbaseResult<User>;
        }
    }

    fn stored_user(id: i64, email: &str, phone: &str) -> User {
        let now = Utc::now();
        User {
            id: UserId::new(id),
            name: "Stored".to_string(),
            email: email.to_string(),
            password: "pw".to_string(),
            phone: phone.to_string(),
            city: "Recife".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn create_request(email: &str, phone: &str) -> CreateUserRequest {
        CreateUserRequest {
            name: "Ana".to_string(),
            email: email.to_string(),
            password: "pw".to_string(),
            phone: phone.to_string(),
            city: "Recife".to_string(),
        }
    }

    fn service_with_memory() -> (UsersServiceImpl, Arc<InMemoryUsersRepository>) {
        let repo = Arc::new(InMemoryUsersRepository::new());
        (UsersServiceImpl::new(repo.clone()), repo)
    }

    fn service_with_mock(mock: MockRepo) -> UsersServiceImpl {
        UsersServiceImpl::new(Arc::new(mock))
    }

    // =============================================================================
    // create
    // =============================================================================

    #[tokio::test]
    async fn test_create_returns_input_with_assigned_id() {
        let (service, _) = service_with_memory();

        let created = service.create(create_request("a@x.com", "1")).await.unwrap();

        assert_eq!(created.id, UserId::new(1));
        assert_eq!(created.name, "Ana");
        assert_eq!(created.email, "a@x.com");
        assert_eq!(created.phone, "1");
        assert_eq!(created.city, "Recife");
    }

    #[tokio::test]
    async fn test_create_duplicate_email_conflicts() {
        let (service, repo) = service_with_memory();

        service.create(create_request("a@x.com", "1")).await.unwrap();
        let err = service.create(create_request("a@x.com", "2")).await.unwrap_err();

        assert!(matches!(err, UserbaseError::Conflict(ref m) if m == "Email is already in use"));
        assert_eq!(repo.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_conflict_performs_no_write() {
        let mut mock = MockRepo::new();
        mock.expect_find_by_email()
            .withf(|email| email == "a@x.com")
            .times(1)
            .returning(|_| Ok(Some(stored_user(1, "a@x.com", "1"))));
        mock.expect_create().never();

        let err = service_with_mock(mock)
            .create(create_request("a@x.com", "2"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 409);
    }

    #[tokio::test]
    async fn test_create_does_not_check_phone() {
        let mut mock = MockRepo::new();
        mock.expect_find_by_email().returning(|_| Ok(None));
        mock.expect_find_by_phone().never();
        mock.expect_create()
            .times(1)
            .returning(|new_user| Ok(User::from_new(UserId::new(9), new_user, Utc::now())));

        let created = service_with_mock(mock)
            .create(create_request("b@x.com", "1"))
            .await
            .unwrap();
        assert_eq!(created.id, UserId::new(9));
    }

    #[tokio::test]
    async fn test_create_propagates_repository_error() {
        let mut mock = MockRepo::new();
        mock.expect_find_by_email()
            .returning(|_| Err(UserbaseError::Database("connection reset".to_string())));
        mock.expect_create().never();

        let err = service_with_mock(mock)
            .create(create_request("a@x.com", "1"))
            .await
            .unwrap_err();
        assert!(matches!(err, UserbaseError::Database(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_with_same_email_store_one_user() {
        let (service, repo) = service_with_memory();
        let service = Arc::new(service);

        let handles: Vec<_> = (0..64)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move { service.create(create_request("race@x.com", &format!("p{i}"))).await })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(err) => assert!(matches!(err, UserbaseError::Conflict(ref m) if m == "Email is already in use")),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(repo.len().unwrap(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_to_same_phone_keep_it_unique() {
        let (service, repo) = service_with_memory();
        let service = Arc::new(service);
        let mut ids = Vec::new();
        for i in 0..16 {
            let created = service
                .create(create_request(&format!("u{i}@x.com"), &format!("own{i}")))
                .await
                .unwrap();
            ids.push(created.id);
        }

        let handles: Vec<_> = ids
            .into_iter()
            .map(|id| {
                let service = service.clone();
                tokio::spawn(async move {
                    let request = UpdateUserRequest {
                        phone: Some("999".to_string()),
                        ..Default::default()
                    };
                    service.update(id, request).await
                })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(err) => {
                    assert!(matches!(err, UserbaseError::Conflict(ref m) if m == "Phone number 999 is already in use"));
                }
            }
        }

        assert_eq!(successes, 1);
        let holders = repo.find_all().await.unwrap().into_iter().filter(|u| u.phone == "999").count();
        assert_eq!(holders, 1);
    }

    // =============================================================================
    // update
    // =============================================================================

    #[tokio::test]
    async fn test_update_missing_user_not_found() {
        let mut mock = MockRepo::new();
        mock.expect_find_by_id()
            .with(eq(UserId::new(5)))
            .returning(|_| Ok(None));
        mock.expect_find_by_phone().never();
        mock.expect_update().never();

        let err = service_with_mock(mock)
            .update(UserId::new(5), UpdateUserRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, UserbaseError::NotFound(ref m) if m == "User not found"));
    }

    #[tokio::test]
    async fn test_update_phone_taken_by_other_user_conflicts() {
        let (service, repo) = service_with_memory();
        service.create(create_request("a@x.com", "111")).await.unwrap();
        let b = service.create(create_request("b@x.com", "222")).await.unwrap();

        let err = service
            .update(
                b.id,
                UpdateUserRequest {
                    phone: Some("111".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, UserbaseError::Conflict(ref m) if m == "Phone number 111 is already in use"));
        assert_eq!(repo.find_by_id(b.id).await.unwrap().unwrap().phone, "222");
    }

    #[tokio::test]
    async fn test_update_phone_conflict_performs_no_write() {
        let mut mock = MockRepo::new();
        mock.expect_find_by_id()
            .returning(|id| Ok(Some(stored_user(id.into_inner(), "b@x.com", "222"))));
        mock.expect_find_by_phone()
            .withf(|phone, exclude_id| phone == "111" && *exclude_id == UserId::new(2))
            .times(1)
            .returning(|_, _| Ok(Some(stored_user(1, "a@x.com", "111"))));
        mock.expect_update().never();

        let err = service_with_mock(mock)
            .update(
                UserId::new(2),
                UpdateUserRequest {
                    phone: Some("111".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Phone number 111 is already in use");
    }

    #[tokio::test]
    async fn test_update_same_phone_skips_lookup() {
        let mut mock = MockRepo::new();
        mock.expect_find_by_id()
            .returning(|id| Ok(Some(stored_user(id.into_inner(), "a@x.com", "111"))));
        mock.expect_find_by_phone().never();
        mock.expect_update()
            .withf(|id, changes| {
                *id == UserId::new(1)
                    && changes.phone.as_deref() == Some("111")
                    && changes.city.as_deref() == Some("X")
                    && changes.name.is_none()
            })
            .times(1)
            .returning(|id, changes| {
                let mut user = stored_user(id.into_inner(), "a@x.com", "111");
                user.apply(changes, Utc::now());
                Ok(user)
            });

        let updated = service_with_mock(mock)
            .update(
                UserId::new(1),
                UpdateUserRequest {
                    phone: Some("111".to_string()),
                    city: Some("X".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.city, "X");
        assert_eq!(updated.phone, "111");
    }

    #[tokio::test]
    async fn test_update_own_phone_with_memory_repository() {
        let (service, _) = service_with_memory();
        let a = service.create(create_request("a@x.com", "111")).await.unwrap();

        let updated = service
            .update(
                a.id,
                UpdateUserRequest {
                    phone: Some("111".to_string()),
                    city: Some("X".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.city, "X");
        assert_eq!(updated.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_update_new_free_phone_succeeds() {
        let (service, _) = service_with_memory();
        let a = service.create(create_request("a@x.com", "111")).await.unwrap();

        let updated = service
            .update(
                a.id,
                UpdateUserRequest {
                    name: Some("Renamed".to_string()),
                    phone: Some("333".to_string()),
                    city: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.phone, "333");
        assert_eq!(updated.city, "Recife");
    }

    // =============================================================================
    // get_all / show / delete
    // =============================================================================

    #[tokio::test]
    async fn test_get_all_empty_not_found() {
        let (service, _) = service_with_memory();

        let err = service.get_all().await.unwrap_err();
        assert!(matches!(err, UserbaseError::NotFound(ref m) if m == "Empty user list"));
    }

    #[tokio::test]
    async fn test_get_all_returns_repository_order() {
        let mut mock = MockRepo::new();
        mock.expect_find_all().times(1).returning(|| {
            Ok(vec![
                stored_user(3, "c@x.com", "3"),
                stored_user(1, "a@x.com", "1"),
                stored_user(2, "b@x.com", "2"),
            ])
        });

        let users = service_with_mock(mock).get_all().await.unwrap();
        let ids: Vec<i64> = users.iter().map(|u| u.id.into_inner()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn test_show_missing_user_not_found() {
        let (service, _) = service_with_memory();

        let err = service.show(UserId::new(999)).await.unwrap_err();
        assert!(matches!(err, UserbaseError::NotFound(ref m) if m == "User not found"));
    }

    #[tokio::test]
    async fn test_show_existing_user() {
        let (service, _) = service_with_memory();
        let created = service.create(create_request("a@x.com", "1")).await.unwrap();

        assert_eq!(service.show(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_delete_missing_user_performs_no_write() {
        let mut mock = MockRepo::new();
        mock.expect_find_by_id().returning(|_| Ok(None));
        mock.expect_delete().never();

        let err = service_with_mock(mock).delete(UserId::new(4)).await.unwrap_err();
        assert!(matches!(err, UserbaseError::NotFound(ref m) if m == "User not found"));
    }

    #[tokio::test]
    async fn test_delete_returns_deleted_user() {
        let (service, repo) = service_with_memory();
        let created = service.create(create_request("a@x.com", "1")).await.unwrap();

        let deleted = service.delete(created.id).await.unwrap();

        assert_eq!(deleted, created);
        assert!(repo.is_empty().unwrap());
        assert!(service.show(created.id).await.is_err());
    }
}
