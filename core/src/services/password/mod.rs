//! Primary password management and OTP-backed account recovery

mod service;


pub use service::PasswordService;
