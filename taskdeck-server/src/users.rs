//! User directory for the HTTP surface.
//!
//! Maintains the registered users in memory, keyed by id, with
//! case-insensitive email uniqueness. The registry is persisted as part of
//! the state snapshot. Credential checks live here; nothing below this
//! layer ever sees a password.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{hash_password, verify_password};

/// Errors that can occur during user registry operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UserError {
    /// A user with the same email (case-insensitive) already exists.
    #[error("Email already registered")]
    EmailTaken,
    /// Unknown email or wrong password. Deliberately indistinguishable.
    #[error("Incorrect email or password")]
    BadCredentials,
}

/// A registered user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Stable user id (UUID v7), also the owner id for the user's tasks.
    pub id: String,
    /// Login email, unique case-insensitively.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Salted iterated password hash, `salt$digest`.
    pub password_hash: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// In-memory directory of registered users.
///
/// Thread-safe via [`RwLock`]; signup holds the write lock across the
/// uniqueness check and the insert so two concurrent signups can never
/// share an email.
#[derive(Debug, Default)]
pub struct UserRegistry {
    users: RwLock<HashMap<String, User>>,
}

impl UserRegistry {
    /// Creates a new, empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }

    /// Rebuilds a registry from a snapshot of users.
    #[must_use]
    pub fn from_users(users: Vec<User>) -> Self {
        Self {
            users: RwLock::new(users.into_iter().map(|u| (u.id.clone(), u)).collect()),
        }
    }

    /// Registers a new user, hashing the password.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::EmailTaken`] if the email is already
    /// registered (case-insensitive).
    pub fn signup(&self, email: &str, name: &str, password: &str) -> Result<User, UserError> {
        let mut users = self.users.write();

        let email_lower = email.to_lowercase();
        if users.values().any(|u| u.email.to_lowercase() == email_lower) {
            return Err(UserError::EmailTaken);
        }

        let user = User {
            id: Uuid::now_v7().to_string(),
            email: email.to_string(),
            name: name.to_string(),
            password_hash: hash_password(password),
            created_at: Utc::now(),
        };
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    /// Checks an email/password pair and returns the matching user.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::BadCredentials`] for an unknown email or a
    /// wrong password; the two cases are not distinguishable.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<User, UserError> {
        let users = self.users.read();
        let email_lower = email.to_lowercase();
        let user = users
            .values()
            .find(|u| u.email.to_lowercase() == email_lower)
            .ok_or(UserError::BadCredentials)?;
        if verify_password(password, &user.password_hash) {
            Ok(user.clone())
        } else {
            Err(UserError::BadCredentials)
        }
    }

    /// Looks up a user by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<User> {
        self.users.read().get(id).cloned()
    }

    /// Exports all users for the persistence snapshot, in id order for a
    /// stable file layout.
    #[must_use]
    pub fn export(&self) -> Vec<User> {
        let mut users: Vec<User> = self.users.read().values().cloned().collect();
        users.sort_by(|a, b| a.id.cmp(&b.id));
        users
    }

    /// Returns the number of registered users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    /// Returns `true` if no users are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }
}
