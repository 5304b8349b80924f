//! Account directory and account store interfaces.
//!
//! The directory answers "which account owns this address"; the account store
//! holds the primary credential hash. Both are usually backed by the same
//! table, but the services depend on them separately.

use async_trait::async_trait;

use crate::domain::entities::account::UserId;
use crate::errors::DomainError;

/// Lookup of accounts by email address
///
/// # Example Implementation
/// ```no_run
/// use async_trait::async_trait;
/// use bh_core::repositories::Directory;
/// use bh_core::domain::entities::UserId;
/// use bh_core::errors::DomainError;
///
/// struct StaticDirectory;
///
/// #[async_trait]
/// impl Directory for StaticDirectory {
///     async fn resolve_user_id_by_address(
///         &self,
///         address: &str,
///     ) -> Result<Option<UserId>, DomainError> {
///         Ok((address == "owner@bakehouse.example").then_some(1))
///     }
/// }
/// ```
#[async_trait]
pub trait Directory: Send + Sync {
    /// Resolve an email address to an account identifier
    ///
    /// # Arguments
    /// * `address` - Normalized (trimmed, lowercase) email address
    ///
    /// # Returns
    /// * `Ok(Some(UserId))` - Account found
    /// * `Ok(None)` - No account owns the address
    /// * `Err(DomainError)` - Lookup failed
    async fn resolve_user_id_by_address(&self, address: &str)
        -> Result<Option<UserId>, DomainError>;

    /// Check whether an account owns the address
    async fn exists(&self, address: &str) -> Result<bool, DomainError> {
        Ok(self.resolve_user_id_by_address(address).await?.is_some())
    }
}

/// Storage of the primary credential hash
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Whether an account with this identifier exists
    async fn account_exists(&self, user_id: UserId) -> Result<bool, DomainError>;

    /// Fetch the stored password hash
    ///
    /// # Returns
    /// * `Ok(Some(hash))` - Account exists and has a password
    /// * `Ok(None)` - Unknown account or no password set
    /// * `Err(DomainError)` - Store failure
    async fn get_password_hash(&self, user_id: UserId) -> Result<Option<String>, DomainError>;

    /// Replace the stored password hash
    ///
    /// # Returns
    /// * `Ok(())` - Hash stored
    /// * `Err(DomainError::NotFound)` - Unknown account
    /// * `Err(DomainError)` - Store failure
    async fn set_password_hash(&self, user_id: UserId, password_hash: &str)
        -> Result<(), DomainError>;
}
