//! Composition root: builds the step-up services from configuration

use std::sync::Arc;

use bh_core::services::{DeliveryDispatcher, MailTransport, OtpLedger, PasswordService};
use bh_shared::config::AppConfig;

use crate::cache::{RedisClient, RedisOtpStore};
use crate::database::{DatabasePool, MySqlAccountRepository};
use crate::mail::create_mail_transport;
use crate::InfrastructureError;

/// Dispatcher wired to the production collaborators
pub type ProductionDispatcher =
    DeliveryDispatcher<MySqlAccountRepository, RedisOtpStore, dyn MailTransport>;

/// Services sharing one OTP ledger
pub struct StepUpServices {
    /// Asynchronous OTP delivery
    pub dispatcher: ProductionDispatcher,
    /// Issuance and verification of codes
    pub ledger: Arc<OtpLedger<RedisOtpStore>>,
    /// Primary password management
    pub passwords: PasswordService<MySqlAccountRepository, RedisOtpStore>,
    /// Database pool, kept for health checks and shutdown
    pub database: DatabasePool,
}

/// Connect Redis and MySQL and wire the services
///
/// # Errors
///
/// Returns an error when either backing service cannot be reached.
pub async fn bootstrap(config: &AppConfig) -> Result<StepUpServices, InfrastructureError> {
    tracing::info!(environment = %config.environment, "Initializing step-up services");

    let redis_client = RedisClient::new(config.cache.clone()).await?;
    let database = DatabasePool::new(config.database.clone()).await?;

    let store = Arc::new(RedisOtpStore::new(redis_client));
    let accounts = Arc::new(MySqlAccountRepository::new(database.get_pool().clone()));
    let transport = create_mail_transport(&config.mail);

    let ledger = Arc::new(OtpLedger::new(store, config.otp.clone()));
    let dispatcher = DeliveryDispatcher::new(
        accounts.clone(),
        ledger.clone(),
        transport.clone(),
        config.delivery.clone(),
    );
    let passwords = PasswordService::new(accounts, ledger.clone(), &config.password);

    tracing::info!(
        mail_provider = transport.provider_name(),
        "Step-up services initialized"
    );

    Ok(StepUpServices {
        dispatcher,
        ledger,
        passwords,
        database,
    })
}

/// Load configuration, initialise tracing and wire the services
pub async fn bootstrap_from_env() -> Result<StepUpServices, InfrastructureError> {
    let config = AppConfig::load()?;
    crate::telemetry::init_tracing(&config.logging);
    bootstrap(&config).await
}
