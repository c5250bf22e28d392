//! Sitemap generation.
//!
//! Generates a sitemap.xml file listing all pages for search engine indexing.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/</loc>
//!     <lastmod>2025-01-01</lastmod>
//!   </url>
//! </urlset>
//! ```

use crate::{
    config::SiteConfig,
    log,
    render::Page,
    utils::{
        escape::escape_xml,
        minify::{MinifyType, minify},
    },
};
use anyhow::{Context, Result};
use std::fs;

// ============================================================================
// Constants
// ============================================================================

/// XML namespace for sitemap
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

// ============================================================================
// Public API
// ============================================================================

/// Build sitemap if enabled in config.
///
/// Every indexable page gets the build date as `lastmod`.
pub fn build_sitemap(config: &SiteConfig, pages: &[Page]) -> Result<()> {
    if config.build.sitemap.enable {
        let today = chrono::Local::now().format("%Y-%m-%d").to_string();
        let sitemap = Sitemap::from_pages(config, pages, &today);
        sitemap.write(config)?;
    }
    Ok(())
}

// ============================================================================
// Sitemap Implementation
// ============================================================================

/// Sitemap data structure
struct Sitemap {
    /// List of URL entries
    urls: Vec<UrlEntry>,
}

/// Single URL entry in the sitemap
struct UrlEntry {
    /// Full URL location
    loc: String,
    /// Last modification date (YYYY-MM-DD format)
    lastmod: String,
}

impl Sitemap {
    /// Build sitemap from rendered pages, skipping unindexable ones.
    fn from_pages(config: &SiteConfig, pages: &[Page], lastmod: &str) -> Self {
        let urls = pages
            .iter()
            .filter(|page| page.indexable)
            .map(|page| UrlEntry {
                loc: config.page_url(&page.path),
                lastmod: lastmod.to_owned(),
            })
            .collect();

        Self { urls }
    }

    /// Generate sitemap XML string.
    fn into_xml(self) -> String {
        let mut xml = String::with_capacity(4096);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#));
        xml.push('\n');

        for entry in self.urls {
            xml.push_str("  <url>\n");
            xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.loc)));
            xml.push_str(&format!("    <lastmod>{}</lastmod>\n", entry.lastmod));
            xml.push_str("  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }

    /// Write sitemap to output file.
    fn write(self, config: &SiteConfig) -> Result<()> {
        let sitemap_path = &config.build.sitemap.path;
        let xml = self.into_xml();
        let xml = minify(MinifyType::Xml(xml.as_bytes()), config);

        fs::write(sitemap_path, &*xml)
            .with_context(|| format!("Failed to write sitemap to {}", sitemap_path.display()))?;

        log!("sitemap"; "{}", sitemap_path.file_name().unwrap_or_default().to_string_lossy());
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
