//! User preferences for third-party embedded content
//!
//! Before an external player (YouTube, Spotify, Giphy, ...) is activated the
//! user is asked for consent once per provider. The answer is stored here so it
//! can be kept in the persisted app state alongside other settings.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors that can occur while loading or saving preferences
#[derive(Debug, Error)]
pub enum PreferencesError {
    /// Serialization or deserialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for preference operations
pub type Result<T> = std::result::Result<T, PreferencesError>;

/// Third-party content provider that requires embed consent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExternalSource {
    /// giphy.com and its CDNs
    Giphy,
    /// tenor.com
    Tenor,
    /// YouTube videos and shorts
    Youtube,
    /// Twitch channels, videos and clips
    Twitch,
    /// Vimeo videos
    Vimeo,
    /// Spotify tracks, albums and playlists
    Spotify,
    /// Apple Music songs, albums and playlists
    AppleMusic,
    /// SoundCloud tracks and sets
    Soundcloud,
}

impl ExternalSource {
    /// Every known source, in settings display order
    pub const ALL: [ExternalSource; 8] = [
        ExternalSource::Giphy,
        ExternalSource::Tenor,
        ExternalSource::Youtube,
        ExternalSource::Twitch,
        ExternalSource::Vimeo,
        ExternalSource::Spotify,
        ExternalSource::AppleMusic,
        ExternalSource::Soundcloud,
    ];

    /// Get the source key as stored in settings
    pub fn as_str(&self) -> &'static str {
        match self {
            ExternalSource::Giphy => "giphy",
            ExternalSource::Tenor => "tenor",
            ExternalSource::Youtube => "youtube",
            ExternalSource::Twitch => "twitch",
            ExternalSource::Vimeo => "vimeo",
            ExternalSource::Spotify => "spotify",
            ExternalSource::AppleMusic => "appleMusic",
            ExternalSource::Soundcloud => "soundcloud",
        }
    }

    /// Get a human-readable provider name
    pub fn display_name(&self) -> &'static str {
        match self {
            ExternalSource::Giphy => "GIPHY",
            ExternalSource::Tenor => "Tenor",
            ExternalSource::Youtube => "YouTube",
            ExternalSource::Twitch => "Twitch",
            ExternalSource::Vimeo => "Vimeo",
            ExternalSource::Spotify => "Spotify",
            ExternalSource::AppleMusic => "Apple Music",
            ExternalSource::Soundcloud => "SoundCloud",
        }
    }
}

impl fmt::Display for ExternalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Consent setting for a single external source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedConsent {
    /// Prompt before loading the player
    #[default]
    Ask,
    /// Load the player without prompting
    Always,
    /// Never load the player, show a plain link instead
    Never,
}

impl EmbedConsent {
    /// Get the consent value as stored in settings
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbedConsent::Ask => "ask",
            EmbedConsent::Always => "always",
            EmbedConsent::Never => "never",
        }
    }

    /// Whether the player may start without user interaction
    pub fn allows_autoplay(&self) -> bool {
        matches!(self, EmbedConsent::Always)
    }

    /// Whether a consent prompt has to be shown first
    pub fn requires_prompt(&self) -> bool {
        matches!(self, EmbedConsent::Ask)
    }

    /// Whether the player must never be shown
    pub fn is_blocked(&self) -> bool {
        matches!(self, EmbedConsent::Never)
    }
}

/// Per-provider consent for external embeds
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalEmbedsPrefs {
    /// GIPHY consent
    #[serde(default)]
    pub giphy: EmbedConsent,
    /// Tenor consent
    #[serde(default)]
    pub tenor: EmbedConsent,
    /// YouTube consent
    #[serde(default)]
    pub youtube: EmbedConsent,
    /// Twitch consent
    #[serde(default)]
    pub twitch: EmbedConsent,
    /// Vimeo consent
    #[serde(default)]
    pub vimeo: EmbedConsent,
    /// Spotify consent
    #[serde(default)]
    pub spotify: EmbedConsent,
    /// Apple Music consent
    #[serde(default)]
    pub apple_music: EmbedConsent,
    /// SoundCloud consent
    #[serde(default)]
    pub soundcloud: EmbedConsent,
}

impl ExternalEmbedsPrefs {
    /// Create preferences with every source set to `ask`
    pub fn new() -> Self {
        Self::default()
    }

    /// Load preferences from their JSON representation
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize preferences to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Get the consent for a source
    pub fn get(&self, source: ExternalSource) -> EmbedConsent {
        match source {
            ExternalSource::Giphy => self.giphy,
            ExternalSource::Tenor => self.tenor,
            ExternalSource::Youtube => self.youtube,
            ExternalSource::Twitch => self.twitch,
            ExternalSource::Vimeo => self.vimeo,
            ExternalSource::Spotify => self.spotify,
            ExternalSource::AppleMusic => self.apple_music,
            ExternalSource::Soundcloud => self.soundcloud,
        }
    }

    /// Set the consent for a source
    pub fn set(&mut self, source: ExternalSource, consent: EmbedConsent) {
        tracing::debug!("Setting embed consent for {} to {}", source, consent.as_str());

        let slot = match source {
            ExternalSource::Giphy => &mut self.giphy,
            ExternalSource::Tenor => &mut self.tenor,
            ExternalSource::Youtube => &mut self.youtube,
            ExternalSource::Twitch => &mut self.twitch,
            ExternalSource::Vimeo => &mut self.vimeo,
            ExternalSource::Spotify => &mut self.spotify,
            ExternalSource::AppleMusic => &mut self.apple_music,
            ExternalSource::Soundcloud => &mut self.soundcloud,
        };
        *slot = consent;
    }

    /// Allow every source without prompting
    pub fn allow_all(&mut self) {
        for source in ExternalSource::ALL {
            self.set(source, EmbedConsent::Always);
        }
    }

    /// Block every source
    pub fn deny_all(&mut self) {
        for source in ExternalSource::ALL {
            self.set(source, EmbedConsent::Never);
        }
    }

    /// Sources the user has not decided on yet
    pub fn pending_sources(&self) -> Vec<ExternalSource> {
        ExternalSource::ALL
            .into_iter()
            .filter(|source| self.get(*source).requires_prompt())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embed_consent_default() {
        assert_eq!(EmbedConsent::default(), EmbedConsent::Ask);
    }

    #[test]
    fn test_embed_consent_flags() {
        assert!(EmbedConsent::Always.allows_autoplay());
        assert!(!EmbedConsent::Ask.allows_autoplay());
        assert!(!EmbedConsent::Never.allows_autoplay());

        assert!(EmbedConsent::Ask.requires_prompt());
        assert!(!EmbedConsent::Always.requires_prompt());

        assert!(EmbedConsent::Never.is_blocked());
        assert!(!EmbedConsent::Ask.is_blocked());
    }

    #[test]
    fn test_external_embeds_prefs_default() {
        let prefs = ExternalEmbedsPrefs::default();
        for source in ExternalSource::ALL {
            assert_eq!(prefs.get(source), EmbedConsent::Ask);
        }
        assert_eq!(prefs.pending_sources().len(), 8);
    }

    #[test]
    fn test_external_embeds_prefs_set() {
        let mut prefs = ExternalEmbedsPrefs::new();
        prefs.set(ExternalSource::Youtube, EmbedConsent::Always);
        prefs.set(ExternalSource::AppleMusic, EmbedConsent::Never);

        assert_eq!(prefs.get(ExternalSource::Youtube), EmbedConsent::Always);
        assert_eq!(prefs.apple_music, EmbedConsent::Never);
        assert_eq!(prefs.get(ExternalSource::Spotify), EmbedConsent::Ask);
        assert!(!prefs.pending_sources().contains(&ExternalSource::Youtube));
    }

    #[test]
    fn test_external_embeds_prefs_allow_and_deny_all() {
        let mut prefs = ExternalEmbedsPrefs::new();

        prefs.allow_all();
        assert!(ExternalSource::ALL.iter().all(|s| prefs.get(*s).allows_autoplay()));
        assert!(prefs.pending_sources().is_empty());

        prefs.deny_all();
        assert!(ExternalSource::ALL.iter().all(|s| prefs.get(*s).is_blocked()));
    }

    #[test]
    fn test_external_embeds_prefs_json_keys() {
        let mut prefs = ExternalEmbedsPrefs::new();
        prefs.set(ExternalSource::AppleMusic, EmbedConsent::Always);

        let json = prefs.to_json().unwrap();
        assert!(json.contains("\"appleMusic\":\"always\""));
        assert!(json.contains("\"giphy\":\"ask\""));

        let restored = ExternalEmbedsPrefs::from_json(&json).unwrap();
        assert_eq!(restored, prefs);
    }

    #[test]
    fn test_external_embeds_prefs_missing_keys_default_to_ask() {
        let prefs = ExternalEmbedsPrefs::from_json(r#"{"tenor":"never"}"#).unwrap();
        assert_eq!(prefs.tenor, EmbedConsent::Never);
        assert_eq!(prefs.giphy, EmbedConsent::Ask);
        assert_eq!(prefs.soundcloud, EmbedConsent::Ask);
    }

    #[test]
    fn test_external_embeds_prefs_invalid_json() {
        let result = ExternalEmbedsPrefs::from_json(r#"{"youtube":"sometimes"}"#);
        assert!(matches!(result, Err(PreferencesError::Serialization(_))));
    }

    #[test]
    fn test_external_source_names() {
        assert_eq!(ExternalSource::AppleMusic.as_str(), "appleMusic");
        assert_eq!(ExternalSource::Soundcloud.to_string(), "soundcloud");
        assert_eq!(ExternalSource::Giphy.display_name(), "GIPHY");
    }
}
