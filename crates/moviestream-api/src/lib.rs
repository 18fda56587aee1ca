//! API client library for moviestream.
//!
//! Provides the TMDB catalog client, the normalized catalog model,
//! video-embed URL construction, and the contact-form relay client.

/// Normalized catalog model and page fetching.
pub mod catalog;

/// Contact-form email relay client.
pub mod contact;

/// Video-embed URL construction.
pub mod embed;

/// TMDB API client.
pub mod tmdb;
