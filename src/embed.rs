//! Profile music URL → embeddable player resolution

use std::sync::OnceLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

static URL_RE: OnceLock<Option<Regex>> = OnceLock::new();
static AUDIO_RE: OnceLock<Option<Regex>> = OnceLock::new();

/// How a music URL should be presented on the profile widget board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EmbedPlayer {
    /// Embeddable player page
    Iframe {
        /// Player URL
        src: String,
    },
    /// Direct audio file
    Audio {
        /// File URL
        src: String,
    },
    /// Spotify page that cannot be embedded directly
    Spotify {
        /// Original URL
        src: String,
    },
    /// Nothing playable
    None,
}

/// Pieces of a URL needed for player detection
struct UrlParts<'a> {
    host: &'a str,
    path: &'a str,
    query: &'a str,
}

fn split_url(url: &str) -> Option<UrlParts<'_>> {
    let re = URL_RE
        .get_or_init(|| {
            Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*://([^/?#]+)([^?#]*)(?:\?([^#]*))?").ok()
        })
        .as_ref()?;
    let caps = re.captures(url)?;
    Some(UrlParts {
        host: caps.get(1)?.as_str(),
        path: caps.get(2).map_or("", |m| m.as_str()),
        query: caps.get(3).map_or("", |m| m.as_str()),
    })
}

fn query_param<'a>(query: &'a str, name: &str) -> Option<&'a str> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

fn is_audio_path(path: &str) -> bool {
    AUDIO_RE
        .get_or_init(|| Regex::new(r"(?i)\.(mp3|wav|ogg|aac)$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(path))
}

/// Decide how to play a profile music URL
pub fn resolve_embed(url: &str) -> EmbedPlayer {
    let url = url.trim();
    if url.is_empty() {
        return EmbedPlayer::None;
    }

    let Some(parts) = split_url(url) else {
        tracing::debug!("Not a URL, no embed player: {url}");
        return EmbedPlayer::None;
    };
    let host = parts.host.to_lowercase();

    if host.contains("youtube.com") || host.contains("youtu.be") {
        let video_id = if host.contains("youtu.be") {
            Some(parts.path.trim_start_matches('/')).filter(|id| !id.is_empty())
        } else {
            query_param(parts.query, "v")
        };
        return video_id.map_or(EmbedPlayer::None, |id| EmbedPlayer::Iframe {
            src: format!("https://www.youtube.com/embed/{id}"),
        });
    }

    if host.contains("soundcloud.com") {
        return EmbedPlayer::Iframe {
            src: format!(
                "https://w.soundcloud.com/player/?url={}&auto_play=false&visual=true&hide_related=true&show_comments=false&show_user=true&show_reposts=false",
                urlencoding::encode(url)
            ),
        };
    }

    if is_audio_path(parts.path) {
        return EmbedPlayer::Audio {
            src: url.to_string(),
        };
    }

    if host.contains("spotify.com") {
        if url.contains("/embed/") {
            return EmbedPlayer::Iframe {
                src: url.to_string(),
            };
        }
        return EmbedPlayer::Spotify {
            src: url.to_string(),
        };
    }

    EmbedPlayer::None
}
