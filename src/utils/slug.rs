//! URL slugification.
//!
//! Tags like `"Full-Stack"` or `"Real-Time"` become path segments of the
//! prerendered tag pages (`/projects/tags/full-stack/`).

use regex::Regex;
use std::sync::LazyLock;

/// Runs of anything that is not a lowercase ASCII letter or digit
static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Convert text to a URL-safe slug.
///
/// Transliterates to ASCII, lowercases, collapses every run of
/// non-alphanumerics to a single `-` and trims `-` from both ends.
pub fn slugify(text: &str) -> String {
    let ascii = deunicode::deunicode(text).to_ascii_lowercase();
    SEPARATORS
        .replace_all(&ascii, "-")
        .trim_matches('-')
        .to_owned()
}

/// Site path of the prerendered listing for `tag`.
pub fn tag_path(tag: &str) -> String {
    format!("/projects/tags/{}/", slugify(tag))
}

/// Site path of a project detail page.
pub fn project_path(slug: &str) -> String {
    format!("/projects/{slug}/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Full-Stack"), "full-stack");
        assert_eq!(slugify("AI"), "ai");
        assert_eq!(slugify("Node.js"), "node-js");
    }

    #[test]
    fn test_slugify_collapses_and_trims() {
        assert_eq!(slugify("  Real   Time!! "), "real-time");
        assert_eq!(slugify("--a--b--"), "a-b");
        assert_eq!(slugify("C++ / C#"), "c-c");
    }

    #[test]
    fn test_slugify_transliterates() {
        assert_eq!(slugify("Résumé"), "resume");
        assert_eq!(slugify("Straße"), "strasse");
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_paths() {
        assert_eq!(tag_path("Real-Time"), "/projects/tags/real-time/");
        assert_eq!(project_path("wealthwise"), "/projects/wealthwise/");
    }
}
