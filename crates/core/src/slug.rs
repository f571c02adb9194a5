//! Slug and plain-text helpers.
//!
//! `title_slug` mirrors the host catalog's title sanitiser so handles and
//! colour slugs line up with what the storefront already uses.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

static TAGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));
static ENTITIES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"&[^\s;]+?;").expect("valid regex"));
static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9 _\-]").expect("valid regex"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static DASHES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").expect("valid regex"));

/// Remove markup, leaving the text content.
pub fn strip_tags(input: &str) -> String {
    TAGS.replace_all(input, "").trim().to_string()
}

fn remove_accents(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.nfd() {
        if is_combining_mark(ch) {
            continue;
        }
        match ch {
            'ß' => out.push_str("ss"),
            'æ' => out.push_str("ae"),
            'Æ' => out.push_str("AE"),
            'ø' => out.push('o'),
            'Ø' => out.push('O'),
            'œ' => out.push_str("oe"),
            'Œ' => out.push_str("OE"),
            'ð' => out.push('d'),
            'þ' => out.push_str("th"),
            _ => out.push(ch),
        }
    }
    out
}

/// URL-safe slug of a title: `"Frame Size"` → `"frame-size"`.
///
/// Accents are folded, markup and entities dropped, dots become dashes and
/// anything outside `[a-z0-9_-]` is removed before whitespace collapses into
/// single dashes.
pub fn title_slug(input: &str) -> String {
    let text = remove_accents(&strip_tags(input)).to_lowercase();
    let text = ENTITIES.replace_all(&text, "");
    let text = text.replace('.', "-");
    let text = DISALLOWED.replace_all(&text, "");
    let text = WHITESPACE.replace_all(text.trim(), "-");
    let text = DASHES.replace_all(&text, "-");
    text.trim_matches('-').to_string()
}

/// Slug for an option value.
///
/// Falls back to a whitespace-dashed lowercase form when the value has no
/// sluggable characters at all (e.g. purely non-latin text).
pub fn slugify_value(value: &str) -> String {
    let slug = title_slug(value);
    if slug.is_empty() && !value.is_empty() {
        return WHITESPACE
            .replace_all(value.trim(), "-")
            .to_lowercase();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_titles() {
        assert_eq!(title_slug("Frame Size"), "frame-size");
        assert_eq!(title_slug("  Heavy   Duty  Bench "), "heavy-duty-bench");
        assert_eq!(title_slug("Red / Black"), "red-black");
        assert_eq!(title_slug("v1.5 Model"), "v1-5-model");
        assert_eq!(title_slug("snake_case"), "snake_case");
    }

    #[test]
    fn folds_accents_and_drops_markup() {
        assert_eq!(title_slug("Crème <b>Brûlée</b>"), "creme-brulee");
        assert_eq!(title_slug("Rock &amp; Roll"), "rock-roll");
        assert_eq!(title_slug("Straße"), "strasse");
    }

    #[test]
    fn value_slug_falls_back_for_unsluggable_text() {
        assert_eq!(slugify_value("Anthracite Grey"), "anthracite-grey");
        assert_eq!(slugify_value("深 蓝"), "深-蓝");
        assert_eq!(slugify_value(""), "");
    }

    #[test]
    fn strips_tags() {
        assert_eq!(strip_tags("<p>Hello <em>world</em></p>"), "Hello world");
    }
}
