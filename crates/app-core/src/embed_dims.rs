//! Player sizing for embedded content

use crate::embeds::EmbedPlayerType;
use serde::{Deserialize, Serialize};

/// Tallest a GIF embed is allowed to render
pub const MAX_GIF_HEIGHT: f64 = 250.0;

/// Height of album, playlist and set players
pub const PANEL_PLAYER_HEIGHT: f64 = 380.0;

/// Spotify track player height on narrow layouts
pub const SPOTIFY_SONG_COMPACT_HEIGHT: f64 = 155.0;

/// Spotify track player height on wide layouts
pub const SPOTIFY_SONG_HEIGHT: f64 = 232.0;

/// Widest layout that still gets the compact Spotify track player
pub const SPOTIFY_SONG_COMPACT_MAX_WIDTH: f64 = 300.0;

/// SoundCloud track player height
pub const SOUNDCLOUD_TRACK_HEIGHT: f64 = 165.0;

/// Apple Music song player height
pub const APPLE_MUSIC_SONG_HEIGHT: f64 = 150.0;

fn widescreen_height(width: f64) -> f64 {
    width / 16.0 * 9.0
}

/// Height of a player rendered at `width`.
///
/// Without a thumbnail the aspect ratio is unknown and 16:9 is assumed for
/// every kind.
pub fn player_height(player_type: EmbedPlayerType, width: f64, has_thumb: bool) -> f64 {
    if !has_thumb {
        return widescreen_height(width);
    }

    match player_type {
        EmbedPlayerType::YoutubeVideo
        | EmbedPlayerType::TwitchVideo
        | EmbedPlayerType::VimeoVideo => widescreen_height(width),
        EmbedPlayerType::SpotifyAlbum
        | EmbedPlayerType::AppleMusicAlbum
        | EmbedPlayerType::AppleMusicPlaylist
        | EmbedPlayerType::SpotifyPlaylist
        | EmbedPlayerType::SoundcloudSet => PANEL_PLAYER_HEIGHT,
        EmbedPlayerType::SpotifySong => {
            if width <= SPOTIFY_SONG_COMPACT_MAX_WIDTH {
                SPOTIFY_SONG_COMPACT_HEIGHT
            } else {
                SPOTIFY_SONG_HEIGHT
            }
        }
        EmbedPlayerType::SoundcloudTrack => SOUNDCLOUD_TRACK_HEIGHT,
        EmbedPlayerType::AppleMusicSong => APPLE_MUSIC_SONG_HEIGHT,
        EmbedPlayerType::GiphyGif | EmbedPlayerType::TenorGif => width,
    }
}

/// Rendered size of a GIF embed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GifDims {
    /// Height in points
    pub height: f64,
    /// Width in points
    pub width: f64,
}

/// Scale a GIF of the given original size to fit `view_width`.
///
/// The height is capped at [`MAX_GIF_HEIGHT`]. The width is always derived
/// from the uncapped scaled height, so once the cap applies the two are no
/// longer proportional.
pub fn gif_dims(original_height: f64, original_width: f64, view_width: f64) -> GifDims {
    let scaled_height = original_height / original_width * view_width;

    GifDims {
        height: if scaled_height > MAX_GIF_HEIGHT { MAX_GIF_HEIGHT } else { scaled_height },
        width: MAX_GIF_HEIGHT / scaled_height * view_width,
    }
}
