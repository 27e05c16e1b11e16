//! Brand name capture from raw registry page markup
//!
//! Pattern-based scan, no HTML parse: every `<a ... href="...">text</a>` whose
//! href contains the registry's link marker contributes its trimmed text.
//! Tag and marker matching are case-insensitive.

use once_cell::sync::Lazy;
use regex::Regex;

static ANCHOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<a\s(?:[^>]*?\s)?href\s*=\s*["']([^"']*)["'][^>]*>([^<]+)</a\s*>"#)
        .expect("valid anchor regex")
});

/// Extract brand names from one page, in document order
///
/// Empty captures are dropped; duplicates are kept (deduplication happens
/// once the whole directory has been collected).
pub fn extract_brand_names(html: &str, link_marker: &str) -> Vec<String> {
    let marker = link_marker.to_lowercase();

    ANCHOR
        .captures_iter(html)
        .filter(|caps| caps[1].to_lowercase().contains(&marker))
        .map(|caps| decode_entities(caps[2].trim()))
        .filter(|name| !name.is_empty())
        .collect()
}

/// Decode the handful of entities that show up in brand names
fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    text.replace("&#39;", "'")
        .replace("&#039;", "'")
        .replace("&apos;", "'")
        .replace("&quot;", "\"")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_marker_links_only() {
        let html = r#"
            <nav><a href="/about">About us</a></nav>
            <a href="/brand/lush" class="card">  LUSH  </a>
            <a class="card" href="/brand/aveda">Aveda</a>
            <a href="https://other.org/shop">Shop</a>
        "#;

        assert_eq!(extract_brand_names(html, "/brand/"), vec!["LUSH", "Aveda"]);
    }

    #[test]
    fn test_multiple_anchors_on_one_line() {
        let html = r#"<li><a href="/question/is-lush-vegan">Lush</a></li><li><a href="/question/is-elf-vegan">e.l.f.</a></li>"#;

        assert_eq!(
            extract_brand_names(html, "/question/is-"),
            vec!["Lush", "e.l.f."]
        );
    }

    #[test]
    fn test_case_insensitive_tag_and_marker() {
        let html = r#"<A HREF="/BRAND/Pacifica">Pacifica</A>"#;
        assert_eq!(extract_brand_names(html, "/brand/"), vec!["Pacifica"]);
    }

    #[test]
    fn test_empty_and_nested_captures_skipped() {
        let html = r#"<a href="/brand/x">   </a><a href="/brand/y"><img src="y.png"></a>"#;
        assert!(extract_brand_names(html, "/brand/").is_empty());
    }

    #[test]
    fn test_does_not_match_other_tags_starting_with_a() {
        let html = r#"<abbr href="/brand/fake">Fake</abbr><a href="/brand/real">Real</a>"#;
        assert_eq!(extract_brand_names(html, "/brand/"), vec!["Real"]);
    }

    #[test]
    fn test_entities_decoded() {
        let html = r#"<a href="/brand/burts">Burt&#39;s Bees</a><a href="/brand/ps">Pacifica &amp; Co</a>"#;
        assert_eq!(
            extract_brand_names(html, "/brand/"),
            vec!["Burt's Bees", "Pacifica & Co"]
        );
    }

    #[test]
    fn test_hyphenated_href_attributes_ignored() {
        let html = r#"<a data-href="/brand/fake" href="/about">About</a><a href="/brand/real">Real</a>"#;
        assert_eq!(extract_brand_names(html, "/brand/"), vec!["Real"]);

        let html = r#"<a class="x" data-href="/brand/decoy">Decoy</a>"#;
        assert!(extract_brand_names(html, "/brand/").is_empty());
    }

    #[test]
    fn test_no_anchors() {
        assert!(extract_brand_names("<html><body>No results</body></html>", "/brand/").is_empty());
    }
}
