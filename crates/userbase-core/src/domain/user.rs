//! User entity and the write-side values passed to persistence.

use crate::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Identifier assigned by the persistence layer.
    pub id: UserId,

    /// Display name.
    pub name: String,

    /// Email address, unique across all users.
    pub email: String,

    /// Opaque password value (never exposed via API).
    #[serde(skip_serializing)]
    pub password: String,

    /// Phone number, unique across all users.
    pub phone: String,

    /// City of residence.
    pub city: String,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Builds a stored user from a `NewUser` once an id has been assigned.
    #[must_use]
    pub fn from_new(id: UserId, new_user: NewUser, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new_user.name,
            email: new_user.email,
            password: new_user.password,
            phone: new_user.phone,
            city: new_user.city,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a set of changes in place. Email and password are never touched.
    pub fn apply(&mut self, changes: UserChanges, now: DateTime<Utc>) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(phone) = changes.phone {
            self.phone = phone;
        }
        if let Some(city) = changes.city {
            self.city = city;
        }
        self.updated_at = now;
    }
}

/// Fields required to create a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub city: String,
}

/// Mutable fields of a user. `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserChanges {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
}
