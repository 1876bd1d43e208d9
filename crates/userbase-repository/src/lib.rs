//! # Userbase Repository
//!
//! Data access for the `users` table.
//!
//! ```text
//! UsersService
//!   ↓  Arc<dyn UsersRepository>
//! PgUsersRepository        InMemoryUsersRepository
//!   ↓                        ↓
//! PostgreSQL (SQLx)        BTreeMap behind a mutex
//! ```
//!
//! Both implementations enforce email and phone uniqueness at write time and
//! report a violation as `UserbaseError::Conflict` with the same message the
//! service uses.

pub mod memory;
pub mod pool;
pub mod postgres;
pub mod traits;

pub use memory::InMemoryUsersRepository;
pub use pool::*;
pub use postgres::PgUsersRepository;
pub use traits::*;

/// Message reported when an email is already taken.
pub const EMAIL_IN_USE: &str = "Email is already in use";

/// Message reported when a phone number is already taken by another user.
#[must_use]
pub fn phone_in_use(phone: &str) -> String {
    format!("Phone number {} is already in use", phone)
}

/// Message reported when no user has the requested id.
pub const USER_NOT_FOUND: &str = "User not found";
