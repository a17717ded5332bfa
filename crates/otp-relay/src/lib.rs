//! OTP Relay - one-time password delivery over WhatsApp.
//!
//! A small HTTP service that:
//! - Issues six-digit codes and delivers them as WhatsApp template messages
//! - Verifies submitted codes against an in-memory store with expiry
//! - Passes sender number registration/deregistration through to the Cloud API
//! - Answers the provider's webhook handshake and logs inbound events

pub mod api;
pub mod config;
pub mod error;
pub mod otp;

pub use config::Config;
pub use error::RelayError;
pub use otp::{MemoryOtpStore, OtpRecord, OtpStore, Verification};
