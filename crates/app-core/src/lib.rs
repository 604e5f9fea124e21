//! Core embed player logic for Compass Embeds
//!
//! This crate recognizes third-party links (YouTube, Spotify, GIPHY, ...)
//! that can be played inline and computes how large their players render.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod embed_detector;
pub mod embed_dims;
pub mod embeds;

pub use embed_detector::{EmbedDetector, EmbedRule, PlayerContext};
pub use embed_dims::{gif_dims, player_height, GifDims};
pub use embeds::{EmbedError, EmbedPlayerParams, EmbedPlayerType};
