//! Unit tests for the passcode hash policy

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use bh_shared::config::OtpConfig;

use crate::services::hashing::OtpCodeHasher;

fn fast_hasher() -> OtpCodeHasher {
    OtpCodeHasher::new(&OtpConfig::default().with_iterations(1_000))
}

#[test]
fn test_default_policy() {
    let hasher = OtpCodeHasher::default();
    assert_eq!(hasher.iterations(), 65_536);

    let stored = hasher.hash("483920").unwrap();
    let (salt, key) = stored.split_once(':').unwrap();
    assert_eq!(BASE64.decode(salt).unwrap().len(), 16);
    assert_eq!(BASE64.decode(key).unwrap().len(), 32);
    assert!(hasher.verify("483920", &stored));
}

#[test]
fn test_verify_rejects_other_codes() {
    let hasher = fast_hasher();
    let stored = hasher.hash("483920").unwrap();

    assert!(!hasher.verify("483921", &stored));
    assert!(!hasher.verify("000000", &stored));
    assert!(!hasher.verify("", &stored));
}

#[test]
fn test_salts_are_random() {
    let hasher = fast_hasher();
    let first = hasher.hash("483920").unwrap();
    let second = hasher.hash("483920").unwrap();

    assert_ne!(first, second);
    assert!(hasher.verify("483920", &first));
    assert!(hasher.verify("483920", &second));
}

#[test]
fn test_hash_with_salt_is_deterministic() {
    let hasher = fast_hasher();
    let salt = [7u8; 16];
    assert_eq!(
        hasher.hash_with_salt("123456", &salt).unwrap(),
        hasher.hash_with_salt("123456", &salt).unwrap()
    );
}

#[test]
fn test_known_vector() {
    // RFC 7914 section 11 PBKDF2-HMAC-SHA256 vector: P="passwd", S="salt", c=1, dkLen=64
    let config = OtpConfig {
        key_length: 64,
        ..OtpConfig::default().with_iterations(1)
    };
    let hasher = OtpCodeHasher::new(&config);
    let stored = hasher.hash_with_salt("passwd", b"salt").unwrap();
    let (_, key) = stored.split_once(':').unwrap();
    let key = BASE64.decode(key).unwrap();
    assert_eq!(&key[..4], &[0x55, 0xac, 0x04, 0x6e]);
}

#[test]
fn test_malformed_stored_values_fail_closed() {
    let hasher = fast_hasher();
    let stored = hasher.hash("483920").unwrap();

    // Wrong delimiter count
    assert!(!hasher.verify("483920", "no-delimiter"));
    assert!(!hasher.verify("483920", &format!("{}:extra", stored)));
    assert!(!hasher.verify("483920", ""));
    assert!(!hasher.verify("483920", ":"));

    // Undecodable salt
    let (_, key) = stored.split_once(':').unwrap();
    assert!(!hasher.verify("483920", &format!("!!notbase64!!:{}", key)));
}

#[test]
fn test_derivation_failure_fails_closed() {
    let broken = OtpCodeHasher::new(&OtpConfig::default().with_iterations(0));
    assert!(broken.hash("483920").is_err());

    let stored = fast_hasher().hash("483920").unwrap();
    assert!(!broken.verify("483920", &stored));
}

#[test]
fn test_iteration_count_is_part_of_the_hash() {
    let stored = fast_hasher().hash("483920").unwrap();
    let other = OtpCodeHasher::new(&OtpConfig::default().with_iterations(2_000));
    assert!(!other.verify("483920", &stored));
}
