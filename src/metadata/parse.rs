use scraper::{Html, Selector};
use url::Url;

use crate::models::ExtractedMetadata;

pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_DESCRIPTION_CHARS: usize = 500;
pub const DEFAULT_FAVICON_PATH: &str = "/favicon.ico";

/// Extract title, description, thumbnail and favicon from `html`.
///
/// Each field walks its own fallback chain; a miss in one never affects
/// another. Only an absent or empty value is a miss: whitespace-only content
/// wins and trims to empty afterwards. Relative image and icon links resolve
/// against the origin of `source`, not its full path.
pub fn extract_metadata(html: &str, source: &Url) -> ExtractedMetadata {
    let document = Html::parse_document(html);

    let title = get_meta_property(&document, "og:title")
        .or_else(|| get_meta_name(&document, "twitter:title"))
        .or_else(|| get_element_text(&document, "title"))
        .or_else(|| get_element_text(&document, "h1"))
        .unwrap_or_default();

    let description = get_meta_property(&document, "og:description")
        .or_else(|| get_meta_name(&document, "twitter:description"))
        .or_else(|| get_meta_name(&document, "description"))
        .unwrap_or_default();

    let thumbnail = get_meta_property(&document, "og:image")
        .or_else(|| get_meta_name(&document, "twitter:image"))
        .map(|href| absolutize(&href, source))
        .unwrap_or_default();

    let favicon = get_link_href(&document, "icon")
        .or_else(|| get_link_href(&document, "shortcut icon"))
        .or_else(|| get_link_href(&document, "apple-touch-icon"))
        .unwrap_or_else(|| DEFAULT_FAVICON_PATH.to_string());
    let favicon = absolutize(&favicon, source);

    ExtractedMetadata {
        title: truncate_chars(title.trim(), MAX_TITLE_CHARS),
        description: truncate_chars(description.trim(), MAX_DESCRIPTION_CHARS),
        thumbnail,
        favicon,
    }
}

/// Resolve `href` against the origin of `source` unless it already starts
/// with `http`. Unresolvable links become empty.
pub fn absolutize(href: &str, source: &Url) -> String {
    if href.starts_with("http") {
        return href.to_string();
    }
    Url::parse(&source.origin().ascii_serialization())
        .and_then(|origin| origin.join(href))
        .map(String::from)
        .unwrap_or_default()
}

/// Keep at most `max` characters (not bytes) of `s`.
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

fn get_meta_property(doc: &Html, property: &str) -> Option<String> {
    first_attr(doc, &format!(r#"meta[property="{property}"]"#), "content")
}

fn get_meta_name(doc: &Html, name: &str) -> Option<String> {
    first_attr(doc, &format!(r#"meta[name="{name}"]"#), "content")
}

fn get_link_href(doc: &Html, rel: &str) -> Option<String> {
    first_attr(doc, &format!(r#"link[rel="{rel}"]"#), "href")
}

fn first_attr(doc: &Html, selector: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    doc.select(&selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn get_element_text(doc: &Html, tag: &str) -> Option<String> {
    let selector = Selector::parse(tag).ok()?;
    doc.select(&selector)
        .next()
        .map(|el| el.text().collect::<String>())
        .filter(|s| !s.is_empty())
}
