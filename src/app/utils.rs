// src/app/utils.rs
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

// Summaries only use simple inline markup (<p>, <b>, <i>, <br>).
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("tag regex"));

static BLOCK_BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</p>\s*<p[^>]*>|<br\s*/?>").expect("break regex"));

pub fn pad2(n: u32) -> String {
    format!("{n:02}")
}

/// Turn catalog summary HTML into plain text for painting.
/// Paragraph breaks become newlines, other tags are dropped and the
/// common entities decoded.
pub fn strip_html(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }
    let with_breaks = BLOCK_BREAK_RE.replace_all(html, "\n");
    let text = TAG_RE.replace_all(&with_breaks, "");
    decode_entities(text.trim())
}

fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// "2011-04-17" -> "17 Apr 2011"; anything unparsable is passed through.
pub fn format_airdate(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(d) => Some(d.format("%-d %b %Y").to_string()),
        Err(_) => Some(raw.to_string()),
    }
}

pub fn format_rating(avg: Option<f64>) -> String {
    match avg {
        Some(r) => format!("Rating: {r:.1}"),
        None => "Rating: n/a".to_string(),
    }
}

pub fn format_runtime(minutes: Option<u32>) -> Option<String> {
    minutes.map(|m| format!("{m} min"))
}

/// Stable texture/cache name for an image URL.
pub fn url_to_cache_key(url: &str) -> String {
    format!("{:x}", md5::compute(url.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_and_keeps_paragraphs() {
        let html = "<p><b>Pilot</b> starts here.</p><p>Then &amp; now.</p>";
        assert_eq!(strip_html(html), "Pilot starts here.\nThen & now.");
    }

    #[test]
    fn strip_html_passes_plain_text() {
        assert_eq!(strip_html("just text"), "just text");
        assert_eq!(strip_html(""), "");
    }

    #[test]
    fn airdate_formats() {
        assert_eq!(format_airdate("2011-04-17").as_deref(), Some("17 Apr 2011"));
        assert_eq!(format_airdate("sometime").as_deref(), Some("sometime"));
        assert_eq!(format_airdate("  "), None);
    }

    #[test]
    fn cache_key_is_md5_hex() {
        let k = url_to_cache_key("https://example.com/a.jpg");
        assert_eq!(k.len(), 32);
        assert_eq!(k, url_to_cache_key("https://example.com/a.jpg"));
    }
}
