//! Embed player detection for third-party links
//!
//! Links in posts are checked against an ordered list of provider rules. The
//! first rule that recognizes the URL produces an [`EmbedPlayerParams`]; when
//! nothing matches the link is rendered as a plain link card.
//!
//! Supported providers: YouTube, Twitch, Spotify, SoundCloud, Apple Music,
//! Vimeo, GIPHY (page, media CDN and image CDN) and Tenor.

use crate::embeds::{EmbedError, EmbedPlayerParams, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use url::Url;

/// media.giphy.com and media0-4.giphy.com
static GIPHY_MEDIA_HOST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)media(?:[0-4]\.giphy\.com|\.giphy\.com)").expect("valid giphy host regex")
});

static GIF_FILENAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\S+)\.(webp|gif|mp4)$").expect("valid gif filename regex")
});

/// Environment the player will be embedded into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerContext {
    /// Hostname of the page hosting the player. Twitch refuses to play
    /// unless this matches the embedding page.
    pub parent_host: String,
}

impl Default for PlayerContext {
    fn default() -> Self {
        Self {
            parent_host: "localhost".to_string(),
        }
    }
}

impl PlayerContext {
    /// Context for a player hosted on a web page served from `host`
    pub fn web(host: impl Into<String>) -> Self {
        Self {
            parent_host: host.into(),
        }
    }
}

/// A single provider's URL grammar
pub trait EmbedRule: Send + Sync {
    /// Rule name used in logs
    fn name(&self) -> &'static str;

    /// Try to recognize `url`. `raw` is the string the URL was parsed from.
    fn try_parse(&self, url: &Url, raw: &str, ctx: &PlayerContext) -> Option<EmbedPlayerParams>;
}

/// Evaluation order matters only for the three GIPHY rules.
const RULES: &[&dyn EmbedRule] = &[
    &YouTubeRule,
    &TwitchRule,
    &SpotifyRule,
    &SoundCloudRule,
    &AppleMusicRule,
    &VimeoRule,
    &GiphyPageRule,
    &GiphyMediaRule,
    &GiphyImageRule,
    &TenorRule,
];

fn host_is(url: &Url, hosts: &[&str]) -> bool {
    url.host_str().is_some_and(|host| hosts.contains(&host))
}

/// Path split on `/`; index 0 is the empty string before the leading slash
fn path_segments(url: &Url) -> Vec<&str> {
    url.path().split('/').collect()
}

fn segment<'a>(segments: &[&'a str], index: usize) -> Option<&'a str> {
    segments.get(index).copied().filter(|s| !s.is_empty())
}

fn query_param(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

fn non_empty(id: &str) -> Option<&str> {
    (!id.is_empty()).then_some(id)
}

fn youtube(video_id: &str) -> EmbedPlayerParams {
    EmbedPlayerParams::YoutubeVideo {
        video_id: video_id.to_string(),
        player_uri: format!("https://www.youtube.com/embed/{}?autoplay=1", video_id),
    }
}

struct YouTubeRule;

impl EmbedRule for YouTubeRule {
    fn name(&self) -> &'static str {
        "youtube"
    }

    fn try_parse(&self, url: &Url, _raw: &str, _ctx: &PlayerContext) -> Option<EmbedPlayerParams> {
        let segments = path_segments(url);

        if host_is(url, &["youtu.be"]) {
            return segment(&segments, 1).map(youtube);
        }

        if host_is(url, &["www.youtube.com", "youtube.com", "m.youtube.com"]) {
            let video_id = if segments.get(1) == Some(&"shorts") {
                segment(&segments, 2).map(str::to_string)
            } else {
                query_param(url, "v")
            };
            return video_id.as_deref().map(youtube);
        }

        None
    }
}

struct TwitchRule;

impl EmbedRule for TwitchRule {
    fn name(&self) -> &'static str {
        "twitch"
    }

    fn try_parse(&self, url: &Url, _raw: &str, ctx: &PlayerContext) -> Option<EmbedPlayerParams> {
        if !host_is(url, &["twitch.tv", "www.twitch.tv", "m.twitch.tv"]) {
            return None;
        }

        let segments = path_segments(url);
        let parent = &ctx.parent_host;

        let player_uri = if segments.get(1) == Some(&"videos") {
            let video_id = segment(&segments, 2)?;
            format!(
                "https://player.twitch.tv/?volume=0.5&!muted&autoplay&video={}&parent={}",
                video_id, parent
            )
        } else if segments.get(2) == Some(&"clip") {
            let clip_id = segment(&segments, 3)?;
            format!(
                "https://clips.twitch.tv/embed?volume=0.5&autoplay=true&clip={}&parent={}",
                clip_id, parent
            )
        } else {
            let channel = segment(&segments, 1)?;
            format!(
                "https://player.twitch.tv/?volume=0.5&!muted&autoplay&channel={}&parent={}",
                channel, parent
            )
        };

        Some(EmbedPlayerParams::TwitchVideo { player_uri })
    }
}

struct SpotifyRule;

impl EmbedRule for SpotifyRule {
    fn name(&self) -> &'static str {
        "spotify"
    }

    fn try_parse(&self, url: &Url, _raw: &str, _ctx: &PlayerContext) -> Option<EmbedPlayerParams> {
        if !host_is(url, &["open.spotify.com"]) {
            return None;
        }

        let segments = path_segments(url);
        let kind = segment(&segments, 1)?;
        let id = segment(&segments, 2)?.to_string();
        let player_uri = format!("https://open.spotify.com/embed/{}/{}", kind, id);

        match kind {
            "playlist" => Some(EmbedPlayerParams::SpotifyPlaylist {
                playlist_id: id,
                player_uri,
            }),
            "album" => Some(EmbedPlayerParams::SpotifyAlbum {
                album_id: id,
                player_uri,
            }),
            "track" => Some(EmbedPlayerParams::SpotifySong {
                song_id: id,
                player_uri,
            }),
            _ => None,
        }
    }
}

struct SoundCloudRule;

impl EmbedRule for SoundCloudRule {
    fn name(&self) -> &'static str {
        "soundcloud"
    }

    fn try_parse(&self, url: &Url, raw: &str, _ctx: &PlayerContext) -> Option<EmbedPlayerParams> {
        if !host_is(url, &["soundcloud.com", "www.soundcloud.com"]) {
            return None;
        }

        let segments = path_segments(url);
        let user = segment(&segments, 1)?.to_string();
        let track_or_sets = segment(&segments, 2)?;
        let player_uri = format!(
            "https://w.soundcloud.com/player/?url={}&auto_play=true&visual=false&hide_related=true",
            raw
        );

        match (track_or_sets, segment(&segments, 3)) {
            ("sets", Some(set)) => Some(EmbedPlayerParams::SoundcloudSet {
                user,
                set: set.to_string(),
                player_uri,
            }),
            _ => Some(EmbedPlayerParams::SoundcloudTrack {
                user,
                track: track_or_sets.to_string(),
                player_uri,
            }),
        }
    }
}

struct AppleMusicRule;

impl EmbedRule for AppleMusicRule {
    fn name(&self) -> &'static str {
        "apple_music"
    }

    fn try_parse(&self, url: &Url, _raw: &str, _ctx: &PlayerContext) -> Option<EmbedPlayerParams> {
        if !host_is(url, &["music.apple.com"]) {
            return None;
        }

        // /{locale}/{playlist|album}/{name}/{id}
        let segments = path_segments(url);
        if segments.len() != 5 {
            return None;
        }
        let kind = segments[2];
        if kind != "playlist" && kind != "album" {
            return None;
        }
        let id = non_empty(segments[4])?.to_string();
        let song_id = query_param(url, "i");

        let mut player_uri = format!("https://embed.music.apple.com{}", url.path());
        let has_query = url.query().is_some_and(|query| !query.is_empty());
        if let (true, Some(song_id)) = (has_query, song_id.as_deref()) {
            player_uri.push_str("?i=");
            player_uri.push_str(song_id);
        }

        match (kind, song_id) {
            ("playlist", _) => Some(EmbedPlayerParams::AppleMusicPlaylist {
                playlist_id: id,
                player_uri,
            }),
            (_, Some(song_id)) => Some(EmbedPlayerParams::AppleMusicSong {
                song_id,
                player_uri,
            }),
            (_, None) => Some(EmbedPlayerParams::AppleMusicAlbum {
                album_id: id,
                player_uri,
            }),
        }
    }
}

struct VimeoRule;

impl EmbedRule for VimeoRule {
    fn name(&self) -> &'static str {
        "vimeo"
    }

    fn try_parse(&self, url: &Url, _raw: &str, _ctx: &PlayerContext) -> Option<EmbedPlayerParams> {
        if !host_is(url, &["vimeo.com", "www.vimeo.com"]) {
            return None;
        }

        let segments = path_segments(url);
        let video_id = segment(&segments, 1)?;

        Some(EmbedPlayerParams::VimeoVideo {
            video_id: video_id.to_string(),
            player_uri: format!("https://player.vimeo.com/video/{}?autoplay=1", video_id),
        })
    }
}

/// giphy.com/gifs/{name-words-id}
struct GiphyPageRule;

impl EmbedRule for GiphyPageRule {
    fn name(&self) -> &'static str {
        "giphy_page"
    }

    fn try_parse(&self, url: &Url, _raw: &str, _ctx: &PlayerContext) -> Option<EmbedPlayerParams> {
        if !host_is(url, &["giphy.com", "www.giphy.com"]) {
            return None;
        }

        let segments = path_segments(url);
        if segments.get(1) != Some(&"gifs") {
            return None;
        }
        let name_and_id = segment(&segments, 2)?;
        let gif_id = non_empty(name_and_id.rsplit('-').next()?)?;

        Some(EmbedPlayerParams::giphy(gif_id))
    }
}

/// media{,0-4}.giphy.com/media/[{tracking}/]{id}/{file}
struct GiphyMediaRule;

impl EmbedRule for GiphyMediaRule {
    fn name(&self) -> &'static str {
        "giphy_media"
    }

    fn try_parse(&self, url: &Url, _raw: &str, _ctx: &PlayerContext) -> Option<EmbedPlayerParams> {
        if !url.host_str().is_some_and(|host| GIPHY_MEDIA_HOST_RE.is_match(host)) {
            return None;
        }

        let segments = path_segments(url);
        if segments.get(1) != Some(&"media") {
            return None;
        }

        let tracking_or_id = segments.get(2).copied().unwrap_or_default();
        let is_gif_file =
            |index: usize| segment(&segments, index).is_some_and(|s| GIF_FILENAME_RE.is_match(s));

        let gif_id = if is_gif_file(3) {
            tracking_or_id
        } else if is_gif_file(4) {
            segments[3]
        } else {
            return None;
        };

        non_empty(gif_id).map(EmbedPlayerParams::giphy)
    }
}

/// i.giphy.com/media/{id}.{ext} or i.giphy.com/{id}.{ext}
struct GiphyImageRule;

impl EmbedRule for GiphyImageRule {
    fn name(&self) -> &'static str {
        "giphy_image"
    }

    fn try_parse(&self, url: &Url, _raw: &str, _ctx: &PlayerContext) -> Option<EmbedPlayerParams> {
        if !host_is(url, &["i.giphy.com", "www.i.giphy.com"]) {
            return None;
        }

        let segments = path_segments(url);
        let media_or_filename = segment(&segments, 1)?;
        let filename = match segment(&segments, 2) {
            Some(filename) if media_or_filename == "media" => filename,
            _ => media_or_filename,
        };
        let gif_id = non_empty(filename.split('.').next()?)?;

        Some(EmbedPlayerParams::giphy(gif_id))
    }
}

struct TenorRule;

impl EmbedRule for TenorRule {
    fn name(&self) -> &'static str {
        "tenor"
    }

    fn try_parse(&self, url: &Url, raw: &str, _ctx: &PlayerContext) -> Option<EmbedPlayerParams> {
        if !host_is(url, &["tenor.com", "www.tenor.com"]) {
            return None;
        }

        let segments = path_segments(url);
        if segments.get(1) != Some(&"view") {
            return None;
        }
        let filename = segment(&segments, 2)?;
        let includes_ext = filename.rsplit('.').next() == Some("gif");

        let player_uri = if includes_ext {
            raw.to_string()
        } else {
            format!("{}.gif", raw)
        };

        Some(EmbedPlayerParams::tenor(player_uri))
    }
}

/// Detector for embeddable third-party links
pub struct EmbedDetector;

impl EmbedDetector {
    /// Recognize `url` using the default (non-browser) player context.
    ///
    /// Returns `None` both for unparseable input and for URLs no provider
    /// supports; either way the link should be shown as a plain link.
    pub fn classify(url: &str) -> Option<EmbedPlayerParams> {
        Self::classify_with(url, &PlayerContext::default())
    }

    /// Recognize `url` for a player hosted in `ctx`
    pub fn classify_with(url: &str, ctx: &PlayerContext) -> Option<EmbedPlayerParams> {
        Self::parse(url, ctx).ok()
    }

    /// Recognize `url`, reporting why it was rejected
    pub fn parse(url: &str, ctx: &PlayerContext) -> Result<EmbedPlayerParams> {
        let parsed = Url::parse(url).map_err(|e| {
            tracing::trace!("Not embeddable, failed to parse URL: {}", e);
            EmbedError::InvalidUrl(url.to_string())
        })?;

        for rule in RULES {
            if let Some(params) = rule.try_parse(&parsed, url, ctx) {
                tracing::debug!("Matched {} embed rule for {}", rule.name(), parsed);
                return Ok(params);
            }
        }

        tracing::trace!("No embed rule matched {}", parsed);
        Err(EmbedError::Unsupported(url.to_string()))
    }

    /// Names of the provider rules in evaluation order
    pub fn rule_names() -> Vec<&'static str> {
        RULES.iter().map(|rule| rule.name()).collect()
    }

    /// Whether `url` is served by a GIPHY CDN host
    pub fn is_giphy_cdn(url: &Url) -> bool {
        url.host_str()
            .is_some_and(|host| GIPHY_MEDIA_HOST_RE.is_match(host) || host == "i.giphy.com")
    }

    /// Get the giphy.com page for a GIPHY CDN link
    pub fn giphy_meta_uri(url: &Url) -> Option<String> {
        if !Self::is_giphy_cdn(url) {
            return None;
        }

        match Self::classify(url.as_str())? {
            EmbedPlayerParams::GiphyGif { meta_uri, .. } => Some(meta_uri),
            _ => None,
        }
    }
}
