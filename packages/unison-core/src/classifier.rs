//! URL-to-track-source classification.
//!
//! Maps a shared URL to the playback backend it needs plus a best-effort
//! display name. Display-name polish (oEmbed titles, etc.) belongs to the
//! title-lookup collaborator; the classifier only guarantees that every
//! enqueued track gets *some* label.

use reqwest::Url;

use crate::protocol::TrackKind;

/// Maximum display-name length before the raw-URL fallback is ellipsized.
const FALLBACK_NAME_MAX: usize = 40;

/// Classification result: the backend a URL needs and a display label.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackSource {
    pub kind: TrackKind,
    pub display_name: String,
}

/// Maps a URL to a playable kind and display name.
///
/// Injectable so hosts can swap in richer heuristics without touching the
/// room state machine.
pub trait TrackClassifier: Send + Sync {
    /// Classifies a URL. Must be total: unrecognized input falls back to
    /// [`TrackKind::File`] with a truncated-URL label.
    fn classify(&self, url: &str) -> TrackSource;
}

/// Default classifier covering the three supported backends.
#[derive(Debug, Default)]
pub struct BasicClassifier;

impl TrackClassifier for BasicClassifier {
    fn classify(&self, url: &str) -> TrackSource {
        if let Ok(parsed) = Url::parse(url) {
            if let Some(source) = classify_parsed(&parsed) {
                return source;
            }
        }
        TrackSource {
            kind: TrackKind::File,
            display_name: fallback_name(url),
        }
    }
}

fn classify_parsed(url: &Url) -> Option<TrackSource> {
    let host = url.host_str()?;

    if is_youtube_host(host) {
        return Some(TrackSource {
            kind: TrackKind::Youtube,
            display_name: "YouTube video".to_string(),
        });
    }

    if host == "soundcloud.com" || host == "www.soundcloud.com" {
        return Some(TrackSource {
            kind: TrackKind::Soundcloud,
            display_name: soundcloud_name(url),
        });
    }

    if host == "drive.google.com" || url.path() == "/api/audio-proxy" {
        return Some(TrackSource {
            kind: TrackKind::File,
            display_name: "Google Drive audio".to_string(),
        });
    }

    // Plain file URL: derive a label from the filename
    let filename = url.path_segments()?.last()?;
    if filename.is_empty() {
        return None;
    }
    let stem = filename
        .rsplit_once('.')
        .map(|(stem, _ext)| stem)
        .unwrap_or(filename);
    Some(TrackSource {
        kind: TrackKind::File,
        display_name: humanize(stem),
    })
}

/// Returns whether a host belongs to YouTube (including short links).
pub fn is_youtube_host(host: &str) -> bool {
    matches!(
        host,
        "youtube.com" | "www.youtube.com" | "youtu.be" | "www.youtu.be"
    )
}

/// Builds "Track — Artist" from a soundcloud.com/<artist>/<track> path.
fn soundcloud_name(url: &Url) -> String {
    let parts: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|p| !p.is_empty()).collect())
        .unwrap_or_default();
    if parts.len() >= 2 {
        format!("{} — {}", humanize(parts[1]), humanize(parts[0]))
    } else {
        "SoundCloud track".to_string()
    }
}

/// Replaces separators with spaces and capitalizes word starts.
fn humanize(slug: &str) -> String {
    let spaced = slug.replace(['-', '_'], " ");
    let mut out = String::with_capacity(spaced.len());
    let mut at_word_start = true;
    for c in spaced.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = c.is_whitespace();
    }
    out
}

fn fallback_name(url: &str) -> String {
    if url.chars().count() > FALLBACK_NAME_MAX {
        let cut: String = url.chars().take(FALLBACK_NAME_MAX - 3).collect();
        format!("{}…", cut)
    } else {
        url.to_string()
    }
}
