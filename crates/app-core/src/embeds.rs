//! External embed player descriptors
//!
//! This module defines the typed result of recognizing a third-party link
//! (YouTube, Spotify, SoundCloud, Giphy, ...) as something that can be played
//! inline. A descriptor carries everything a renderer needs to build the
//! player surface without parsing the URL again.

use crate::embed_dims;
use serde::{Deserialize, Serialize};
use storage::{EmbedConsent, ExternalEmbedsPrefs, ExternalSource};
use thiserror::Error;

/// Errors that can occur while recognizing an embed URL
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmbedError {
    /// The string could not be parsed as an absolute URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The URL is valid but no provider rule recognizes it
    #[error("Unsupported embed URL: {0}")]
    Unsupported(String),
}

/// Result type for embed operations
pub type Result<T> = std::result::Result<T, EmbedError>;

/// Kind of embedded player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbedPlayerType {
    /// YouTube video or short
    YoutubeVideo,
    /// Twitch channel, video or clip
    TwitchVideo,
    /// Spotify album
    SpotifyAlbum,
    /// Spotify playlist
    SpotifyPlaylist,
    /// Spotify track
    SpotifySong,
    /// SoundCloud track
    SoundcloudTrack,
    /// SoundCloud set
    SoundcloudSet,
    /// Apple Music playlist
    AppleMusicPlaylist,
    /// Apple Music album
    AppleMusicAlbum,
    /// Single song on an Apple Music album
    AppleMusicSong,
    /// Vimeo video
    VimeoVideo,
    /// GIPHY gif
    GiphyGif,
    /// Tenor gif
    TenorGif,
}

impl EmbedPlayerType {
    /// Get the player type as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbedPlayerType::YoutubeVideo => "youtube_video",
            EmbedPlayerType::TwitchVideo => "twitch_video",
            EmbedPlayerType::SpotifyAlbum => "spotify_album",
            EmbedPlayerType::SpotifyPlaylist => "spotify_playlist",
            EmbedPlayerType::SpotifySong => "spotify_song",
            EmbedPlayerType::SoundcloudTrack => "soundcloud_track",
            EmbedPlayerType::SoundcloudSet => "soundcloud_set",
            EmbedPlayerType::AppleMusicPlaylist => "apple_music_playlist",
            EmbedPlayerType::AppleMusicAlbum => "apple_music_album",
            EmbedPlayerType::AppleMusicSong => "apple_music_song",
            EmbedPlayerType::VimeoVideo => "vimeo_video",
            EmbedPlayerType::GiphyGif => "giphy_gif",
            EmbedPlayerType::TenorGif => "tenor_gif",
        }
    }

    /// Whether this player shows an animated image rather than a media player
    pub fn is_gif(&self) -> bool {
        matches!(self, EmbedPlayerType::GiphyGif | EmbedPlayerType::TenorGif)
    }

    /// Get the provider whose consent setting gates this player
    pub fn source(&self) -> ExternalSource {
        match self {
            EmbedPlayerType::YoutubeVideo => ExternalSource::Youtube,
            EmbedPlayerType::TwitchVideo => ExternalSource::Twitch,
            EmbedPlayerType::SpotifyAlbum
            | EmbedPlayerType::SpotifyPlaylist
            | EmbedPlayerType::SpotifySong => ExternalSource::Spotify,
            EmbedPlayerType::SoundcloudTrack | EmbedPlayerType::SoundcloudSet => {
                ExternalSource::Soundcloud
            }
            EmbedPlayerType::AppleMusicPlaylist
            | EmbedPlayerType::AppleMusicAlbum
            | EmbedPlayerType::AppleMusicSong => ExternalSource::AppleMusic,
            EmbedPlayerType::VimeoVideo => ExternalSource::Vimeo,
            EmbedPlayerType::GiphyGif => ExternalSource::Giphy,
            EmbedPlayerType::TenorGif => ExternalSource::Tenor,
        }
    }
}

/// Description of an embeddable player recognized from a link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum EmbedPlayerParams {
    /// YouTube video or short
    YoutubeVideo {
        /// Video ID
        video_id: String,
        /// Embed player URL
        player_uri: String,
    },
    /// Twitch channel, video or clip
    TwitchVideo {
        /// Embed player URL
        player_uri: String,
    },
    /// Spotify album
    SpotifyAlbum {
        /// Album ID
        album_id: String,
        /// Embed player URL
        player_uri: String,
    },
    /// Spotify playlist
    SpotifyPlaylist {
        /// Playlist ID
        playlist_id: String,
        /// Embed player URL
        player_uri: String,
    },
    /// Spotify track
    SpotifySong {
        /// Track ID
        song_id: String,
        /// Embed player URL
        player_uri: String,
    },
    /// SoundCloud track
    SoundcloudTrack {
        /// Account name
        user: String,
        /// Track slug
        track: String,
        /// Embed player URL
        player_uri: String,
    },
    /// SoundCloud set
    SoundcloudSet {
        /// Account name
        user: String,
        /// Set slug
        set: String,
        /// Embed player URL
        player_uri: String,
    },
    /// Apple Music playlist
    AppleMusicPlaylist {
        /// Playlist ID
        playlist_id: String,
        /// Embed player URL
        player_uri: String,
    },
    /// Apple Music album
    AppleMusicAlbum {
        /// Album ID
        album_id: String,
        /// Embed player URL
        player_uri: String,
    },
    /// Single song on an Apple Music album
    AppleMusicSong {
        /// Song ID
        song_id: String,
        /// Embed player URL
        player_uri: String,
    },
    /// Vimeo video
    VimeoVideo {
        /// Video ID
        video_id: String,
        /// Embed player URL
        player_uri: String,
    },
    /// GIPHY gif
    GiphyGif {
        /// Always `true`
        is_gif: bool,
        /// GIF ID
        gif_id: String,
        /// Canonical giphy.com page for the gif
        meta_uri: String,
        /// Direct image URL
        player_uri: String,
    },
    /// Tenor gif
    TenorGif {
        /// Always `true`
        is_gif: bool,
        /// Direct image URL
        player_uri: String,
    },
}

impl EmbedPlayerParams {
    /// Build a GIPHY descriptor from a gif id
    pub(crate) fn giphy(gif_id: &str) -> Self {
        EmbedPlayerParams::GiphyGif {
            is_gif: true,
            gif_id: gif_id.to_string(),
            meta_uri: format!("https://giphy.com/gifs/{}", gif_id),
            player_uri: format!("https://i.giphy.com/media/{}/giphy.webp", gif_id),
        }
    }

    /// Build a Tenor descriptor from its image URL
    pub(crate) fn tenor(player_uri: String) -> Self {
        EmbedPlayerParams::TenorGif {
            is_gif: true,
            player_uri,
        }
    }

    /// Get the player type
    pub fn player_type(&self) -> EmbedPlayerType {
        match self {
            EmbedPlayerParams::YoutubeVideo { .. } => EmbedPlayerType::YoutubeVideo,
            EmbedPlayerParams::TwitchVideo { .. } => EmbedPlayerType::TwitchVideo,
            EmbedPlayerParams::SpotifyAlbum { .. } => EmbedPlayerType::SpotifyAlbum,
            EmbedPlayerParams::SpotifyPlaylist { .. } => EmbedPlayerType::SpotifyPlaylist,
            EmbedPlayerParams::SpotifySong { .. } => EmbedPlayerType::SpotifySong,
            EmbedPlayerParams::SoundcloudTrack { .. } => EmbedPlayerType::SoundcloudTrack,
            EmbedPlayerParams::SoundcloudSet { .. } => EmbedPlayerType::SoundcloudSet,
            EmbedPlayerParams::AppleMusicPlaylist { .. } => EmbedPlayerType::AppleMusicPlaylist,
            EmbedPlayerParams::AppleMusicAlbum { .. } => EmbedPlayerType::AppleMusicAlbum,
            EmbedPlayerParams::AppleMusicSong { .. } => EmbedPlayerType::AppleMusicSong,
            EmbedPlayerParams::VimeoVideo { .. } => EmbedPlayerType::VimeoVideo,
            EmbedPlayerParams::GiphyGif { .. } => EmbedPlayerType::GiphyGif,
            EmbedPlayerParams::TenorGif { .. } => EmbedPlayerType::TenorGif,
        }
    }

    /// Get the URL the player should load
    pub fn player_uri(&self) -> &str {
        match self {
            EmbedPlayerParams::YoutubeVideo { player_uri, .. }
            | EmbedPlayerParams::TwitchVideo { player_uri }
            | EmbedPlayerParams::SpotifyAlbum { player_uri, .. }
            | EmbedPlayerParams::SpotifyPlaylist { player_uri, .. }
            | EmbedPlayerParams::SpotifySong { player_uri, .. }
            | EmbedPlayerParams::SoundcloudTrack { player_uri, .. }
            | EmbedPlayerParams::SoundcloudSet { player_uri, .. }
            | EmbedPlayerParams::AppleMusicPlaylist { player_uri, .. }
            | EmbedPlayerParams::AppleMusicAlbum { player_uri, .. }
            | EmbedPlayerParams::AppleMusicSong { player_uri, .. }
            | EmbedPlayerParams::VimeoVideo { player_uri, .. }
            | EmbedPlayerParams::GiphyGif { player_uri, .. }
            | EmbedPlayerParams::TenorGif { player_uri, .. } => player_uri,
        }
    }

    /// Get the giphy.com page for GIPHY gifs
    pub fn meta_uri(&self) -> Option<&str> {
        match self {
            EmbedPlayerParams::GiphyGif { meta_uri, .. } => Some(meta_uri),
            _ => None,
        }
    }

    /// Whether this is a GIF rather than a media player
    pub fn is_gif(&self) -> bool {
        self.player_type().is_gif()
    }

    /// Get the provider whose consent setting gates this player
    pub fn source(&self) -> ExternalSource {
        self.player_type().source()
    }

    /// Look up the user's consent for this player's provider
    pub fn consent(&self, prefs: &ExternalEmbedsPrefs) -> EmbedConsent {
        prefs.get(self.source())
    }

    /// Height of the player when rendered at `width`
    pub fn player_height(&self, width: f64, has_thumb: bool) -> f64 {
        embed_dims::player_height(self.player_type(), width, has_thumb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_type_as_str() {
        assert_eq!(EmbedPlayerType::YoutubeVideo.as_str(), "youtube_video");
        assert_eq!(EmbedPlayerType::AppleMusicSong.as_str(), "apple_music_song");
        assert_eq!(EmbedPlayerType::TenorGif.as_str(), "tenor_gif");
    }

    #[test]
    fn test_player_type_is_gif() {
        assert!(EmbedPlayerType::GiphyGif.is_gif());
        assert!(EmbedPlayerType::TenorGif.is_gif());
        assert!(!EmbedPlayerType::YoutubeVideo.is_gif());
        assert!(!EmbedPlayerType::SoundcloudSet.is_gif());
    }

    #[test]
    fn test_player_type_source() {
        assert_eq!(EmbedPlayerType::SpotifySong.source(), ExternalSource::Spotify);
        assert_eq!(EmbedPlayerType::AppleMusicAlbum.source(), ExternalSource::AppleMusic);
        assert_eq!(EmbedPlayerType::SoundcloudTrack.source(), ExternalSource::Soundcloud);
        assert_eq!(EmbedPlayerType::GiphyGif.source(), ExternalSource::Giphy);
    }

    #[test]
    fn test_giphy_constructor() {
        let params = EmbedPlayerParams::giphy("abc123");
        assert_eq!(params.player_type(), EmbedPlayerType::GiphyGif);
        assert_eq!(params.meta_uri(), Some("https://giphy.com/gifs/abc123"));
        assert_eq!(params.player_uri(), "https://i.giphy.com/media/abc123/giphy.webp");
        assert!(params.is_gif());
    }

    #[test]
    fn test_meta_uri_only_for_giphy() {
        let params = EmbedPlayerParams::tenor("https://tenor.com/view/cat-1.gif".to_string());
        assert!(params.meta_uri().is_none());
        assert!(params.is_gif());
    }

    #[test]
    fn test_consent_lookup() {
        let mut prefs = ExternalEmbedsPrefs::default();
        prefs.set(ExternalSource::Vimeo, EmbedConsent::Never);

        let params = EmbedPlayerParams::VimeoVideo {
            video_id: "1".to_string(),
            player_uri: "https://player.vimeo.com/video/1?autoplay=1".to_string(),
        };
        assert_eq!(params.consent(&prefs), EmbedConsent::Never);

        let params = EmbedPlayerParams::giphy("x");
        assert_eq!(params.consent(&prefs), EmbedConsent::Ask);
    }

    #[test]
    fn test_serialization_shape() {
        let params = EmbedPlayerParams::YoutubeVideo {
            video_id: "abc123".to_string(),
            player_uri: "https://www.youtube.com/embed/abc123?autoplay=1".to_string(),
        };

        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["type"], "youtube_video");
        assert_eq!(json["videoId"], "abc123");
        assert_eq!(json["playerUri"], "https://www.youtube.com/embed/abc123?autoplay=1");

        let restored: EmbedPlayerParams = serde_json::from_value(json).unwrap();
        assert_eq!(restored, params);
    }

    #[test]
    fn test_serialization_giphy_fields() {
        let json = serde_json::to_value(EmbedPlayerParams::giphy("abc123")).unwrap();
        assert_eq!(json["type"], "giphy_gif");
        assert_eq!(json["gifId"], "abc123");
        assert_eq!(json["metaUri"], "https://giphy.com/gifs/abc123");
        assert_eq!(json["isGif"], true);
    }

    #[test]
    fn test_serialization_is_gif_only_for_gifs() {
        let tenor = EmbedPlayerParams::tenor("https://tenor.com/view/cat-1.gif".to_string());
        let json = serde_json::to_value(&tenor).unwrap();
        assert_eq!(json["type"], "tenor_gif");
        assert_eq!(json["isGif"], true);

        let restored: EmbedPlayerParams = serde_json::from_value(json).unwrap();
        assert_eq!(restored, tenor);

        let video = EmbedPlayerParams::VimeoVideo {
            video_id: "1".to_string(),
            player_uri: "https://player.vimeo.com/video/1?autoplay=1".to_string(),
        };
        let json = serde_json::to_value(&video).unwrap();
        assert!(json.get("isGif").is_none());
    }

    #[test]
    fn test_embed_error_display() {
        let error = EmbedError::InvalidUrl("not a url".to_string());
        assert!(error.to_string().contains("Invalid URL"));

        let error = EmbedError::Unsupported("https://example.com".to_string());
        assert!(error.to_string().contains("Unsupported embed URL"));
    }
}
