use crate::types::{RawTweet, RejectReason, Tweet};
use chrono::Utc;
use url::Url;
use uuid::Uuid;

const TIMELINE_BASE: &str = "https://x.com";

/// Turn a raw timeline candidate into a validated [`Tweet`], or classify why
/// it cannot be one. Pure apart from the wall-clock read for `scraped_at`.
pub fn extract(raw: &RawTweet) -> Result<Tweet, RejectReason> {
    let tweet_url = raw
        .tweet_url
        .as_deref()
        .map(absolutize_url)
        .filter(|u| !u.is_empty());

    let tweet_id = tweet_url
        .as_deref()
        .and_then(extract_tweet_id)
        .ok_or(RejectReason::MissingIdentifier)?;

    let content = normalize_content(raw.text.as_deref().unwrap_or(""));
    if content.is_empty() {
        return Err(RejectReason::EmptyContent);
    }

    let author = raw
        .author
        .as_deref()
        .map(|a| a.trim().trim_start_matches('@').to_string())
        .filter(|a| !a.is_empty())
        .or_else(|| tweet_url.as_deref().and_then(extract_author));

    let now = Utc::now();
    Ok(Tweet {
        id: Uuid::new_v4(),
        tweet_id,
        content,
        author,
        tweet_url,
        thread_selected: false,
        scraped_at: now,
        created_at: now,
        updated_at: now,
    })
}

/// Extract the post identifier from a `/status/` URL, stripping any query
/// string or trailing path segments (`.../status/123/photo/1?s=20` -> `123`).
pub fn extract_tweet_id(url: &str) -> Option<String> {
    let (_, after) = url.split_once("/status/")?;
    let id = after
        .split(['?', '/', '#'])
        .next()
        .unwrap_or("")
        .trim()
        .to_string();
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

/// Derive the author handle from a status URL: the path segment immediately
/// before `status` (`https://x.com/alice/status/1` -> `alice`).
pub fn extract_author(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segments: Vec<&str> = parsed.path_segments()?.filter(|s| !s.is_empty()).collect();
    let status_pos = segments.iter().position(|s| *s == "status")?;
    if status_pos == 0 {
        return None;
    }
    let author = segments[status_pos - 1];
    if author.is_empty() {
        None
    } else {
        Some(author.to_string())
    }
}

/// Timeline DOM links are often relative (`/alice/status/1`); resolve those
/// against the canonical host.
fn absolutize_url(url: &str) -> String {
    let url = url.trim();
    if url.starts_with('/') {
        format!("{TIMELINE_BASE}{url}")
    } else {
        url.to_string()
    }
}

/// Trim whitespace and collapse runs of blank lines left behind by the DOM
/// text dump.
pub fn normalize_content(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = false;
    for line in text.lines() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            blank_run = true;
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
            if blank_run {
                out.push('\n');
            }
        }
        blank_run = false;
        out.push_str(line);
    }
    out.trim().to_string()
}
