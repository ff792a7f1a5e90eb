//! Share-link snapshots.
//!
//! A snapshot token is the compact JSON document, base64 encoded with the
//! URL-hostile characters swapped out (`+` → `-`, `/` → `_`, `=` → `.`) so it
//! can sit in a URL fragment untouched. Decoding never fails loudly: a token
//! that does not decode is the same as no token at all.

use anyhow::{Context, Result};
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use log::warn;
use url::Url;

use crate::schema::Project;

const TOKEN_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

pub fn encode_snapshot(text: &str) -> String {
    TOKEN_ENGINE
        .encode(text.as_bytes())
        .chars()
        .map(|ch| match ch {
            '+' => '-',
            '/' => '_',
            '=' => '.',
            other => other,
        })
        .collect()
}

/// Reverses [`encode_snapshot`]. Returns an empty string for an empty,
/// truncated, or otherwise undecodable token.
pub fn decode_snapshot(token: &str) -> String {
    let token = token.trim();
    if token.is_empty() {
        return String::new();
    }

    let standard = token
        .chars()
        .map(|ch| match ch {
            '-' => '+',
            '_' => '/',
            '.' => '=',
            other => other,
        })
        .collect::<String>();

    let bytes = match TOKEN_ENGINE.decode(standard.as_bytes()) {
        Ok(bytes) => bytes,
        Err(error) => {
            warn!("ignoring snapshot token that is not valid base64: {error}");
            return String::new();
        }
    };

    String::from_utf8(bytes).unwrap_or_else(|error| {
        warn!("ignoring snapshot token that is not valid UTF-8: {error}");
        String::new()
    })
}

pub fn encode_project(project: &Project) -> Result<String> {
    let json = serde_json::to_string(project).context("failed to serialize project")?;
    Ok(encode_snapshot(&json))
}

/// Decodes a token into a project. `None` means "no usable snapshot".
pub fn hydrate_from_token(token: &str) -> Option<Project> {
    let json = decode_snapshot(token);
    if json.is_empty() {
        return None;
    }
    match serde_json::from_str::<Project>(&json) {
        Ok(project) => Some(project),
        Err(error) => {
            warn!("ignoring snapshot that is not a project document: {error}");
            None
        }
    }
}

/// Load path for shared links: the snapshot if it hydrates, otherwise a
/// fresh default project.
pub fn hydrate_or_default(link_or_token: &str) -> Project {
    hydrate_from_token(&token_from_link(link_or_token)).unwrap_or_default()
}

pub fn share_url(base: &str, project: &Project) -> Result<String> {
    let mut url = Url::parse(base).with_context(|| format!("invalid base url '{base}'"))?;
    let token = encode_project(project)?;
    url.set_fragment(Some(&token));
    Ok(url.into())
}

/// Accepts a full share link (uses its fragment) or a bare token, with or
/// without the leading `#`.
pub fn token_from_link(input: &str) -> String {
    let input = input.trim();
    if let Ok(url) = Url::parse(input) {
        if url.cannot_be_a_base() {
            return input.trim_start_matches('#').to_owned();
        }
        return url.fragment().unwrap_or_default().to_owned();
    }
    input.trim_start_matches('#').to_owned()
}
