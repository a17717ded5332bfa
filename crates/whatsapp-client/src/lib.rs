//! WhatsApp Cloud API client.
//!
//! Covers the handful of endpoints an OTP relay needs: templated messages
//! and sender phone number registration/deregistration.

mod client;
mod error;
mod types;

pub use client::{WhatsAppClient, DEFAULT_API_BASE, DEFAULT_API_VERSION};
pub use error::WhatsAppError;
pub use types::*;
