//! Minification utilities for HTML and XML.
//!
//! Rendered pages and the sitemap go through `minify`, which is a no-op
//! unless `build.minify` is on.

use crate::config::SiteConfig;
use std::borrow::Cow;

// ============================================================================
// Types
// ============================================================================

/// Content type for minification.
pub enum MinifyType<'a> {
    /// HTML content
    Html(&'a [u8]),
    /// XML content
    Xml(&'a [u8]),
}

// ============================================================================
// Unified Minify Function
// ============================================================================

/// Minify content based on type and config.
///
/// Returns `Cow::Borrowed` if minify disabled, `Cow::Owned` if minified.
pub fn minify<'a>(content: MinifyType<'a>, config: &SiteConfig) -> Cow<'a, [u8]> {
    if !config.build.minify {
        match content {
            MinifyType::Html(html) => Cow::Borrowed(html),
            MinifyType::Xml(xml) => Cow::Borrowed(xml),
        }
    } else {
        match content {
            MinifyType::Html(html) => Cow::Owned(minify_html_inner(html)),
            MinifyType::Xml(xml) => Cow::Owned(minify_xml_inner(xml)),
        }
    }
}

// ============================================================================
// Internal Implementation
// ============================================================================

/// Minify HTML content using `minify_html` crate.
fn minify_html_inner(html: &[u8]) -> Vec<u8> {
    let mut cfg = minify_html::Cfg::new();
    cfg.keep_closing_tags = true;
    cfg.keep_html_and_head_opening_tags = true;
    cfg.keep_comments = false;
    cfg.minify_css = true;
    cfg.minify_js = true;
    cfg.remove_bangs = true;
    cfg.remove_processing_instructions = true;
    minify_html::minify(html, &cfg)
}

/// Minify XML by removing unnecessary whitespace.
fn minify_xml_inner(xml: &[u8]) -> Vec<u8> {
    let xml_str = std::str::from_utf8(xml).unwrap_or("");
    xml_str
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("")
        .into_bytes()
}

// ============================================================================
// Tests
// ============================================================================
