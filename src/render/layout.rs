//! Shared page chrome: head, navigation, footer and the loading screen.

use super::{Renderer, STYLESHEET_PATH, Section};
use crate::utils::escape::escape_html;
use chrono::Datelike;

/// Wrap a page body in the full document.
pub(super) fn page(
    r: &Renderer<'_>,
    title: Option<&str>,
    active: Option<Section>,
    body: &str,
) -> String {
    let base = &r.config.base;
    let profile = &r.content.profile;

    let site_title = if base.title.is_empty() {
        profile.name.as_str()
    } else {
        base.title.as_str()
    };
    let full_title = match title {
        Some(title) => format!("{title} | {site_title}"),
        None => site_title.to_owned(),
    };
    let description = if base.description.is_empty() {
        profile.bio.short.as_str()
    } else {
        base.description.as_str()
    };

    let mut html = String::with_capacity(body.len() + 2048);
    html.push_str("<!DOCTYPE html>\n");
    html.push_str(&format!(
        r#"<html lang="{}" data-theme="{}" data-sound="{}">"#,
        escape_html(&base.language),
        r.settings.theme,
        if r.settings.sound { "on" } else { "off" },
    ));
    html.push_str("\n<head>\n");
    html.push_str(r#"<meta charset="utf-8">"#);
    html.push_str(r#"<meta name="viewport" content="width=device-width, initial-scale=1">"#);
    html.push_str(&format!("\n<title>{}</title>\n", escape_html(&full_title)));
    html.push_str(&format!(
        r#"<meta name="description" content="{}">"#,
        escape_html(description)
    ));
    html.push_str(&format!(
        "\n<link rel=\"stylesheet\" href=\"{STYLESHEET_PATH}\">\n</head>\n<body>\n"
    ));
    html.push_str(&nav(&profile.name, active));
    html.push_str("<main>\n");
    html.push_str(body);
    html.push_str("</main>\n");
    html.push_str(&footer(r));
    html.push_str("</body>\n</html>\n");
    html
}

fn nav(name: &str, active: Option<Section>) -> String {
    let mut html = String::from("<header class=\"site-header\">\n<nav>\n");
    html.push_str(&format!(
        "<a class=\"brand\" href=\"/\">{}</a>\n<ul>\n",
        escape_html(name)
    ));
    for section in Section::ALL {
        let current = if active == Some(section) {
            r#" aria-current="page""#
        } else {
            ""
        };
        html.push_str(&format!(
            "<li><a href=\"{}\"{current}>{}</a></li>\n",
            section.href(),
            section.label()
        ));
    }
    html.push_str("</ul>\n</nav>\n</header>\n");
    html
}

fn footer(r: &Renderer<'_>) -> String {
    let profile = &r.content.profile;
    let mut html = String::from("<footer class=\"site-footer\">\n<ul class=\"socials\">\n");

    for (label, url) in profile.socials.entries() {
        html.push_str(&format!(
            "<li><a href=\"{}\" rel=\"noopener\" target=\"_blank\">{label}</a></li>\n",
            escape_html(url)
        ));
    }
    if !profile.email.is_empty() {
        html.push_str(&format!(
            "<li><a href=\"mailto:{0}\">{0}</a></li>\n",
            escape_html(&profile.email)
        ));
    }
    html.push_str("</ul>\n");

    let copyright = if r.config.base.copyright.is_empty() {
        format!("© {} {}", chrono::Local::now().year(), profile.name)
    } else {
        r.config.base.copyright.clone()
    };
    html.push_str(&format!(
        "<p class=\"copyright\">{}</p>\n</footer>\n",
        escape_html(&copyright)
    ));
    html
}

// ============================================================================
// Loading Screen
// ============================================================================

/// Initials shown on the loading screen, e.g. `"Jane Doe"` -> `"JD"`.
fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(3)
        .collect()
}

/// Insert the loading screen right after the opening `<body>` tag.
///
/// Returns the page unchanged when it has no body tag.
pub fn inject_loader(html: &str, name: &str) -> String {
    let Some(start) = html.find("<body") else {
        return html.to_owned();
    };
    let Some(end) = html[start..].find('>').map(|offset| start + offset + 1) else {
        return html.to_owned();
    };

    let loader = format!(
        "<div class=\"loader\" aria-hidden=\"true\"><span>{}</span></div>",
        escape_html(&initials(name))
    );

    let mut out = String::with_capacity(html.len() + loader.len());
    out.push_str(&html[..end]);
    out.push_str(&loader);
    out.push_str(&html[end..]);
    out
}
