//! URL detection in message text.

use regex_lite::Regex;
use std::sync::LazyLock;

/// `http(s)://` up to whitespace or Slack link delimiters (`<url|label>`).
static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s<>|]+").expect("URL pattern compiles"));

/// Every URL in `text`, in order of appearance, duplicates included.
pub fn extract_urls(text: &str) -> Vec<&str> {
    URL_RE.find_iter(text).map(|m| m.as_str()).collect()
}

pub fn contains_url(text: &str) -> bool {
    URL_RE.is_match(text)
}
