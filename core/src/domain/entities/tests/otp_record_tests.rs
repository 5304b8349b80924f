//! Unit tests for the OTP record entity

use chrono::{Duration, TimeZone, Utc};

use crate::domain::entities::otp_record::{IssuedOtp, OtpRecord, DEFAULT_EXPIRATION_MINUTES};

fn record_issued_at_noon() -> OtpRecord {
    let issued_at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    OtpRecord::new(
        42,
        "c2FsdA==:a2V5".to_string(),
        issued_at,
        Duration::minutes(DEFAULT_EXPIRATION_MINUTES),
    )
}

#[test]
fn test_new_record_expiry() {
    let record = record_issued_at_noon();
    assert_eq!(record.user_id, 42);
    assert_eq!(record.expire_at - record.issued_at, Duration::minutes(5));
}

#[test]
fn test_expiry_boundary() {
    let record = record_issued_at_noon();

    assert!(!record.is_expired_at(record.issued_at + Duration::seconds(1)));
    // The exact expiry instant is still accepted
    assert!(!record.is_expired_at(record.expire_at));
    assert!(record.is_expired_at(record.expire_at + Duration::milliseconds(1)));
    assert!(record.is_expired_at(record.issued_at + Duration::seconds(301)));
}

#[test]
fn test_time_until_expiration() {
    let record = record_issued_at_noon();

    let remaining = record.time_until_expiration_at(record.issued_at + Duration::minutes(2));
    assert_eq!(remaining, Duration::minutes(3));

    let remaining = record.time_until_expiration_at(record.expire_at + Duration::minutes(1));
    assert_eq!(remaining, Duration::zero());
}

#[test]
fn test_age() {
    let record = record_issued_at_noon();
    assert_eq!(record.age_at(record.issued_at + Duration::seconds(30)), Duration::seconds(30));
}

#[test]
fn test_serialization() {
    let record = record_issued_at_noon();
    let json = serde_json::to_string(&record).unwrap();
    let deserialized: OtpRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(record, deserialized);
}

#[test]
fn test_issued_otp_debug_redacts_code() {
    let issued = IssuedOtp {
        code: "483920".to_string(),
        record: record_issued_at_noon(),
    };
    let debug = format!("{:?}", issued);
    assert!(!debug.contains("483920"));
    assert!(debug.contains("<redacted>"));
    assert_eq!(issued.user_id(), 42);
}
