//! One-time passcode issuance and verification

mod ledger;


pub use ledger::OtpLedger;
