//! Account entity as seen by the authentication subsystem.

use serde::{Deserialize, Serialize};

/// Numeric account identifier
pub type UserId = i64;

/// Account record holding the primary credential
///
/// Only the fields the authentication subsystem needs; everything else about
/// a staff or customer account belongs to the wider application.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account identifier
    pub id: UserId,

    /// Normalized (lowercase) email address
    pub email: String,

    /// Self-describing bcrypt hash, `None` until a password has been set
    pub password_hash: Option<String>,
}

impl Account {
    /// Create an account without a password
    pub fn new(id: UserId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            password_hash: None,
        }
    }

    /// Whether a password has been set for this account
    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &self.password_hash.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
