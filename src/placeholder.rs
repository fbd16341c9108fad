//! Placeholder substitution for text content.
//!
//! Two tokens are recognized, nothing else:
//!
//! | Token | Replacement |
//! |---|---|
//! | `%BASEURL%` | [`ProjectSettings::base_url`] |
//! | `%SITENAME%` | [`ProjectSettings::site_name`] |
//!
//! An unset value replaces its token with the empty string and logs a
//! warning. Substitution only ever applies to the extensions in
//! [`SUBSTITUTABLE_EXTENSIONS`]; binary assets are copied untouched.

use crate::config::ProjectSettings;

pub const BASE_URL_TOKEN: &str = "%BASEURL%";
pub const SITE_NAME_TOKEN: &str = "%SITENAME%";

/// Extensions (with leading dot) whose content is text that may carry tokens.
pub const SUBSTITUTABLE_EXTENSIONS: &[&str] = &[".md", ".html"];

/// Whether files with this extension get placeholder substitution.
pub fn is_substitutable(extension: &str) -> bool {
    SUBSTITUTABLE_EXTENSIONS.contains(&extension)
}

/// Replace every known token in `text` with its configured value.
pub fn substitute(text: &str, settings: &ProjectSettings) -> String {
    // Tokens and values are UTF-8, so valid input stays valid.
    String::from_utf8_lossy(&substitute_bytes(text.as_bytes(), settings)).into_owned()
}

/// Byte-level [`substitute`]: content that is not UTF-8 passes through
/// unchanged around the replaced tokens.
pub fn substitute_bytes(content: &[u8], settings: &ProjectSettings) -> Vec<u8> {
    let content = replace_token(content, BASE_URL_TOKEN, settings.base_url.as_deref());
    replace_token(&content, SITE_NAME_TOKEN, settings.site_name.as_deref())
}

fn replace_token(content: &[u8], token: &str, value: Option<&str>) -> Vec<u8> {
    let needle = token.as_bytes();
    let replacement = value.unwrap_or("").as_bytes();

    let mut out = Vec::with_capacity(content.len());
    let mut rest = content;
    let mut replaced = 0;
    while let Some(pos) = rest.windows(needle.len()).position(|w| w == needle) {
        out.extend_from_slice(&rest[..pos]);
        out.extend_from_slice(replacement);
        rest = &rest[pos + needle.len()..];
        replaced += 1;
    }
    out.extend_from_slice(rest);

    if replaced > 0 {
        match value {
            Some(value) => tracing::debug!(token, value, replaced, "Replaced placeholder"),
            None => tracing::warn!(token, "Placeholder value unset, replacing with nothing"),
        }
    }
    out
}
