//! Storage layer for Compass Embeds
//!
//! This crate provides the persisted settings that gate third-party
//! embedded players.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod preferences;

pub use preferences::{EmbedConsent, ExternalEmbedsPrefs, ExternalSource, PreferencesError};
