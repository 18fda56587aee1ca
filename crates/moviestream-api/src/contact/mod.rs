//! Contact-form relay client.
//!
//! Sends the contact form through the EmailJS REST endpoint, keyed by a
//! service / template / public key triple.

mod client;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use client::{ContactClient, ContactClientBuilder};
#[allow(clippy::module_name_repetitions)]
pub use types::ContactMessage;
