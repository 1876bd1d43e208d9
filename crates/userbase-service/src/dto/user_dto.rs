//! User-related DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use userbase_core::rules::not_blank;
use userbase_core::{NewUser, User, UserChanges, UserId};
use utoipa::ToSchema;
use validator::Validate;

/// Request to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(custom(function = "not_blank", message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    #[validate(custom(function = "not_blank", message = "Phone is required"))]
    pub phone: String,

    #[validate(custom(function = "not_blank", message = "City is required"))]
    pub city: String,
}

impl From<CreateUserRequest> for NewUser {
    fn from(request: CreateUserRequest) -> Self {
        Self {
            name: request.name,
            email: request.email,
            password: request.password,
            phone: request.phone,
            city: request.city,
        }
    }
}

/// Request to update a user. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(custom(function = "not_blank", message = "Name cannot be blank"))]
    pub name: Option<String>,

    #[validate(custom(function = "not_blank", message = "Phone cannot be blank"))]
    pub phone: Option<String>,

    #[validate(custom(function = "not_blank", message = "City cannot be blank"))]
    pub city: Option<String>,
}

impl From<UpdateUserRequest> for UserChanges {
    fn from(request: UpdateUserRequest) -> Self {
        Self {
            name: request.name,
            phone: request.phone,
            city: request.city,
        }
    }
}

/// User response DTO. Never carries the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            city: user.city,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
