//! Unit tests for the delivery dispatcher

use std::sync::Arc;
use std::time::{Duration, Instant};

use bh_shared::config::{DeliveryConfig, OtpConfig};

use crate::domain::value_objects::{DeliveryResult, ANTI_ENUMERATION_MESSAGE};
use crate::repositories::{InMemoryAccountDirectory, InMemoryOtpStore};
use crate::services::delivery::{compose_message, DeliveryDispatcher, MailTransport};
use crate::services::hashing::OtpCodeHasher;
use crate::services::otp::OtpLedger;

use super::mocks::{HangingMailTransport, PanickingMailTransport, RecordingMailTransport};

const OWNER: &str = "owner@bakehouse.example";
const TEMPLATE: &str = "Hello from BakeHouse.";

struct Fixture<M: MailTransport> {
    dispatcher: DeliveryDispatcher<InMemoryAccountDirectory, InMemoryOtpStore, M>,
    directory: Arc<InMemoryAccountDirectory>,
    store: Arc<InMemoryOtpStore>,
    transport: Arc<M>,
}

async fn fixture_with<M: MailTransport + 'static>(
    transport: M,
    store: InMemoryOtpStore,
    config: DeliveryConfig,
) -> Fixture<M> {
    let directory = Arc::new(InMemoryAccountDirectory::new());
    directory.insert_account(42, OWNER).await;

    let store = Arc::new(store);
    let ledger = Arc::new(OtpLedger::new(
        store.clone(),
        OtpConfig::default().with_iterations(1_000),
    ));
    let transport = Arc::new(transport);
    let dispatcher =
        DeliveryDispatcher::new(directory.clone(), ledger, transport.clone(), config);

    Fixture {
        dispatcher,
        directory,
        store,
        transport,
    }
}

async fn fixture() -> Fixture<RecordingMailTransport> {
    fixture_with(
        RecordingMailTransport::new(),
        InMemoryOtpStore::new(),
        DeliveryConfig::default(),
    )
    .await
}

#[test]
fn test_compose_message() {
    let body = compose_message("Hello from BakeHouse.\n", "004211", 5);
    assert_eq!(
        body,
        "Hello from BakeHouse.\n\nYour one-time passcode is: 004211\nThis code is valid for 5 minutes."
    );
}

#[tokio::test]
async fn test_delivery_to_known_address() {
    let fx = fixture().await;

    let result = fx.dispatcher.request_otp_delivery(OWNER, TEMPLATE).await;
    assert_eq!(result, DeliveryResult::accepted());

    let (address, body) = fx.transport.last_message().unwrap();
    assert_eq!(address, OWNER);
    assert!(body.starts_with(TEMPLATE));
    assert!(body.ends_with("This code is valid for 5 minutes."));

    let code = fx.transport.last_code().unwrap();
    assert_eq!(code.len(), 6);
    assert!(fx.dispatcher.ledger().verify(42, &code).await);
}

#[tokio::test]
async fn test_unknown_address_is_indistinguishable() {
    let fx = fixture().await;

    let known = fx.dispatcher.request_otp_delivery(OWNER, TEMPLATE).await;
    let unknown = fx
        .dispatcher
        .request_otp_delivery("stranger@bakehouse.example", TEMPLATE)
        .await;

    assert_eq!(known, unknown);
    assert!(unknown.succeeded);
    assert_eq!(unknown.message, ANTI_ENUMERATION_MESSAGE);

    // Only the known account received a code
    assert_eq!(fx.transport.sent_count(), 1);
    assert_eq!(fx.store.len().await, 1);
}

#[tokio::test]
async fn test_invalid_address_is_treated_as_unknown() {
    let fx = fixture().await;

    for address in ["", "not-an-email", "owner@", "@bakehouse.example"] {
        let result = fx.dispatcher.request_otp_delivery(address, TEMPLATE).await;
        assert_eq!(result, DeliveryResult::accepted(), "address {:?}", address);
    }
    assert_eq!(fx.transport.sent_count(), 0);
    assert!(fx.store.is_empty().await);
}

#[tokio::test]
async fn test_address_is_normalized() {
    let fx = fixture().await;

    let result = fx
        .dispatcher
        .request_otp_delivery("  Owner@BakeHouse.Example ", TEMPLATE)
        .await;
    assert_eq!(result, DeliveryResult::accepted());

    let (address, _) = fx.transport.last_message().unwrap();
    assert_eq!(address, OWNER);
}

#[tokio::test]
async fn test_store_failure_is_reported() {
    let fx = fixture_with(
        RecordingMailTransport::new(),
        InMemoryOtpStore::failing(),
        DeliveryConfig::without_cooldown(),
    )
    .await;

    let result = fx.dispatcher.request_otp_delivery(OWNER, TEMPLATE).await;
    assert!(!result.succeeded);
    assert!(result.message.contains("OTP store unavailable"));
    assert_eq!(fx.transport.sent_count(), 0);
}

#[tokio::test]
async fn test_directory_failure_is_a_system_error() {
    let fx = fixture().await;
    fx.directory.set_should_fail(true);

    let result = fx.dispatcher.request_otp_delivery(OWNER, TEMPLATE).await;
    assert!(!result.succeeded);
    assert!(result.message.starts_with("System error: "));
}

#[tokio::test]
async fn test_transport_error_is_reported() {
    let fx = fixture_with(
        RecordingMailTransport::failing(),
        InMemoryOtpStore::new(),
        DeliveryConfig::default(),
    )
    .await;

    let result = fx.dispatcher.request_otp_delivery(OWNER, TEMPLATE).await;
    assert!(!result.succeeded);
    assert!(result.message.contains("SMTP relay unavailable"));
}

#[tokio::test]
async fn test_transport_decline_is_reported() {
    let fx = fixture_with(
        RecordingMailTransport::declining(),
        InMemoryOtpStore::new(),
        DeliveryConfig::default(),
    )
    .await;

    let result = fx.dispatcher.request_otp_delivery(OWNER, TEMPLATE).await;
    assert_eq!(result, DeliveryResult::failure("Failed to send OTP email"));
}

#[tokio::test]
async fn test_transport_panic_becomes_system_error() {
    let fx = fixture_with(
        PanickingMailTransport,
        InMemoryOtpStore::new(),
        DeliveryConfig::default(),
    )
    .await;

    let result = fx.dispatcher.request_otp_delivery(OWNER, TEMPLATE).await;
    assert_eq!(
        result,
        DeliveryResult::system_error("delivery task panicked")
    );
}

#[tokio::test]
async fn test_abort_resolves_to_system_error() {
    let fx = fixture_with(
        HangingMailTransport,
        InMemoryOtpStore::new(),
        DeliveryConfig::default(),
    )
    .await;

    let handle = fx.dispatcher.request_otp_delivery(OWNER, TEMPLATE);
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!handle.is_finished());

    handle.abort();
    let result = handle.await;
    assert_eq!(result, DeliveryResult::system_error("delivery cancelled"));
}

#[tokio::test]
async fn test_hanging_transport_stays_pending() {
    let fx = fixture_with(
        HangingMailTransport,
        InMemoryOtpStore::new(),
        DeliveryConfig::default(),
    )
    .await;

    let handle = fx.dispatcher.request_otp_delivery(OWNER, TEMPLATE);
    let outcome = tokio::time::timeout(Duration::from_millis(50), handle).await;
    assert!(outcome.is_err());
}

#[tokio::test]
async fn test_resend_within_cooldown_is_throttled() {
    let fx = fixture().await;

    let first = fx.dispatcher.request_otp_delivery(OWNER, TEMPLATE).await;
    let first_record = fx.dispatcher.ledger().current_record(42).await.unwrap();
    let second = fx.dispatcher.request_otp_delivery(OWNER, TEMPLATE).await;

    assert_eq!(first, second);
    assert_eq!(fx.transport.sent_count(), 1);
    assert_eq!(
        fx.dispatcher.ledger().current_record(42).await.unwrap(),
        first_record
    );
}

#[tokio::test]
async fn test_resend_without_cooldown_supersedes() {
    let fx = fixture_with(
        RecordingMailTransport::new(),
        InMemoryOtpStore::new(),
        DeliveryConfig::without_cooldown(),
    )
    .await;

    fx.dispatcher.request_otp_delivery(OWNER, TEMPLATE).await;
    let first_code = fx.transport.last_code().unwrap();
    fx.dispatcher.request_otp_delivery(OWNER, TEMPLATE).await;
    let second_code = fx.transport.last_code().unwrap();

    assert_eq!(fx.transport.sent_count(), 2);
    assert_eq!(fx.store.len().await, 1);
    if first_code != second_code {
        assert!(!fx.dispatcher.ledger().verify(42, &first_code).await);
    }
    assert!(fx.dispatcher.ledger().verify(42, &second_code).await);
}

#[tokio::test]
async fn test_concurrent_requests_all_resolve() {
    let fx = fixture_with(
        RecordingMailTransport::new(),
        InMemoryOtpStore::new(),
        DeliveryConfig::without_cooldown(),
    )
    .await;

    let handles: Vec<_> = (0..5)
        .map(|_| fx.dispatcher.request_otp_delivery(OWNER, TEMPLATE))
        .collect();
    for handle in handles {
        assert_eq!(handle.await, DeliveryResult::accepted());
    }

    assert_eq!(fx.transport.sent_count(), 5);
    assert_eq!(fx.store.len().await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_within_cooldown_send_once() {
    let fx = fixture().await;

    let handles: Vec<_> = (0..8)
        .map(|_| fx.dispatcher.request_otp_delivery(OWNER, TEMPLATE))
        .collect();
    for handle in handles {
        assert_eq!(handle.await, DeliveryResult::accepted());
    }

    assert_eq!(fx.transport.sent_count(), 1);
    let code = fx.transport.last_code().unwrap();
    assert!(fx.dispatcher.ledger().verify(42, &code).await);
}

#[tokio::test]
async fn test_failed_issue_does_not_spend_cooldown() {
    let fx = fixture().await;
    let failing_ledger = Arc::new(OtpLedger::new(
        fx.store.clone(),
        OtpConfig::default().with_iterations(0),
    ));
    let dispatcher = DeliveryDispatcher::new(
        fx.directory.clone(),
        failing_ledger,
        fx.transport.clone(),
        DeliveryConfig::default(),
    );

    let result = dispatcher.request_otp_delivery(OWNER, TEMPLATE).await;
    assert!(!result.succeeded);
    assert_eq!(fx.transport.sent_count(), 0);

    // The window is free again for a working ledger over the same store
    let result = fx.dispatcher.request_otp_delivery(OWNER, TEMPLATE).await;
    assert_eq!(result, DeliveryResult::accepted());
    assert_eq!(fx.transport.sent_count(), 1);
}

#[tokio::test]
async fn test_unknown_address_spends_hashing_work() {
    let config = OtpConfig::default().with_iterations(50_000);
    let directory = Arc::new(InMemoryAccountDirectory::new());
    let ledger = Arc::new(OtpLedger::new(Arc::new(InMemoryOtpStore::new()), config.clone()));
    let dispatcher = DeliveryDispatcher::new(
        directory,
        ledger,
        Arc::new(RecordingMailTransport::new()),
        DeliveryConfig::default(),
    );

    let hasher = OtpCodeHasher::new(&config);
    let started = Instant::now();
    hasher.hash("123456").unwrap();
    let one_hash = started.elapsed();

    let started = Instant::now();
    let result = dispatcher
        .request_otp_delivery("stranger@bakehouse.example", TEMPLATE)
        .await;
    let unknown = started.elapsed();

    assert_eq!(result, DeliveryResult::accepted());
    assert!(
        unknown * 4 >= one_hash,
        "unknown address resolved in {:?}, one hash takes {:?}",
        unknown,
        one_hash
    );
}

#[test]
fn test_request_from_outside_the_runtime() {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .unwrap();
    let fx = runtime.block_on(fixture());

    // The dispatcher was built inside the runtime and keeps its handle
    let handle = fx.dispatcher.request_otp_delivery(OWNER, TEMPLATE);
    assert_eq!(runtime.block_on(handle), DeliveryResult::accepted());
    assert_eq!(fx.transport.sent_count(), 1);
}

#[test]
fn test_request_without_any_runtime_is_a_system_error() {
    let dispatcher = DeliveryDispatcher::new(
        Arc::new(InMemoryAccountDirectory::new()),
        Arc::new(OtpLedger::new(
            Arc::new(InMemoryOtpStore::new()),
            OtpConfig::default().with_iterations(1_000),
        )),
        Arc::new(RecordingMailTransport::new()),
        DeliveryConfig::default(),
    );

    let handle = dispatcher.request_otp_delivery(OWNER, TEMPLATE);
    assert!(handle.is_finished());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    assert_eq!(
        runtime.block_on(handle),
        DeliveryResult::system_error("no async runtime available")
    );
}
