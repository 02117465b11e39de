//! Embedded image discovery.

use std::sync::LazyLock;

use regex::Regex;

/// `src` attribute of an `<img>` tag, double- or single-quoted.
#[allow(clippy::expect_used)]
static IMG_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<img\b[^>]*?\ssrc\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("valid regex literal")
});

/// Source URLs of all `<img>` tags in `html`, in document order.
///
/// Attribute-escaped ampersands are decoded.
pub fn embedded_image_sources(html: &str) -> Vec<String> {
    IMG_SRC
        .captures_iter(html)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().trim().replace("&amp;", "&"))
        .filter(|src| !src.is_empty())
        .collect()
}

/// Whether `url` is served by the site rooted at `site_url`.
pub fn belongs_to_site(url: &str, site_url: &str) -> bool {
    let site_url = site_url.trim_end_matches('/');
    if site_url.is_empty() {
        return false;
    }
    url.strip_prefix(site_url)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Sources of embedded images served by the site.
pub fn site_image_sources(html: &str, site_url: &str) -> Vec<String> {
    embedded_image_sources(html)
        .into_iter()
        .filter(|src| belongs_to_site(src, site_url))
        .collect()
}
