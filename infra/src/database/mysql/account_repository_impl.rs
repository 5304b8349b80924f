//! MySQL implementation of the Directory and AccountStore traits.
//!
//! Backed by a single table:
//!
//! ```sql
//! CREATE TABLE accounts (
//!     id            BIGINT       NOT NULL PRIMARY KEY,
//!     email         VARCHAR(254) NOT NULL UNIQUE,
//!     password_hash VARCHAR(128) NULL
//! );
//! ```

use async_trait::async_trait;
use sqlx::MySqlPool;

use bh_core::domain::entities::UserId;
use bh_core::errors::DomainError;
use bh_core::repositories::{AccountStore, Directory};
use bh_shared::utils::email::normalize_email;

/// MySQL implementation of the account directory and account store
#[derive(Clone)]
pub struct MySqlAccountRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlAccountRepository {
    /// Create a new MySQL account repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn find_id(&self, user_id: UserId) -> Result<Option<i64>, DomainError> {
        sqlx::query_scalar("SELECT id FROM accounts WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::query_failed)
    }

    fn query_failed(e: sqlx::Error) -> DomainError {
        tracing::error!(error = %e, "Account query failed");
        DomainError::store(format!("Database query failed: {}", e))
    }
}

#[async_trait]
impl Directory for MySqlAccountRepository {
    async fn resolve_user_id_by_address(
        &self,
        address: &str,
    ) -> Result<Option<UserId>, DomainError> {
        let query = r#"
            SELECT id
            FROM accounts
            WHERE LOWER(email) = ?
            LIMIT 1
        "#;

        sqlx::query_scalar::<_, i64>(query)
            .bind(normalize_email(address))
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::query_failed)
    }
}

#[async_trait]
impl AccountStore for MySqlAccountRepository {
    async fn account_exists(&self, user_id: UserId) -> Result<bool, DomainError> {
        Ok(self.find_id(user_id).await?.is_some())
    }

    async fn get_password_hash(&self, user_id: UserId) -> Result<Option<String>, DomainError> {
        let query = r#"
            SELECT password_hash
            FROM accounts
            WHERE id = ?
        "#;

        let hash: Option<Option<String>> = sqlx::query_scalar(query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::query_failed)?;

        Ok(hash.flatten())
    }

    async fn set_password_hash(
        &self,
        user_id: UserId,
        password_hash: &str,
    ) -> Result<(), DomainError> {
        let query = r#"
            UPDATE accounts
            SET password_hash = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(password_hash)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(Self::query_failed)?;

        if result.rows_affected() == 0 {
            // MySQL reports 0 affected rows when the value is unchanged
            if !self.account_exists(user_id).await? {
                return Err(DomainError::NotFound {
                    resource: format!("account {}", user_id),
                });
            }
        }

        Ok(())
    }
}
