//! Page bodies.
//!
//! Each function returns the markup placed inside `<main>`.

use super::{LinkStyle, Renderer, filter_href};
use crate::{
    content::{Certification, EducationEntry, Project},
    filter::ProjectFilter,
    utils::{
        escape::escape_html,
        slug::{project_path, tag_path},
    },
};

/// Text shown when the filter hides every project.
pub const NO_RESULTS: &str = "No projects match your filters.";

// ============================================================================
// Helpers
// ============================================================================

/// Blank-line separated text as `<p>` elements.
fn paragraphs(text: &str) -> String {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| format!("<p>{}</p>\n", escape_html(p)))
        .collect()
}

/// `<ul>` of escaped items, empty string for no items.
fn list(class: &str, items: &[String]) -> String {
    if items.is_empty() {
        return String::new();
    }
    let mut html = format!("<ul class=\"{class}\">\n");
    for item in items {
        html.push_str(&format!("<li>{}</li>\n", escape_html(item)));
    }
    html.push_str("</ul>\n");
    html
}

fn external_link(href: &str, label: &str) -> String {
    format!(
        "<a class=\"button\" href=\"{}\" rel=\"noopener\" target=\"_blank\">{label}</a>",
        escape_html(href)
    )
}

fn project_card(project: &Project) -> String {
    let mut html = String::from("<article class=\"project-card\">\n");
    if let Some(thumbnail) = &project.images.thumbnail {
        html.push_str(&format!(
            "<img src=\"{}\" alt=\"{}\" loading=\"lazy\">\n",
            escape_html(thumbnail),
            escape_html(&project.name)
        ));
    }
    html.push_str(&format!(
        "<h3><a href=\"{}\">{}</a></h3>\n<p>{}</p>\n",
        project_path(&project.slug),
        escape_html(&project.name),
        escape_html(&project.summary)
    ));
    html.push_str(&list("tech", &project.tech));
    html.push_str("</article>\n");
    html
}

fn project_grid<'a>(projects: impl IntoIterator<Item = &'a Project>) -> String {
    let mut html = String::from("<div class=\"project-grid\">\n");
    for project in projects {
        html.push_str(&project_card(project));
    }
    html.push_str("</div>\n");
    html
}

fn education_section(entries: &[EducationEntry]) -> String {
    if entries.is_empty() {
        return String::new();
    }
    let mut html = String::from("<section class=\"education\">\n<h2>Education</h2>\n");
    for entry in entries {
        let degree = match &entry.field {
            Some(field) => format!("{} in {field}", entry.degree),
            None => entry.degree.clone(),
        };
        html.push_str(&format!(
            "<article>\n<h3>{}</h3>\n<p>{}</p>\n<p class=\"meta\">{} · {}",
            escape_html(&degree),
            escape_html(&entry.institution),
            escape_html(&entry.period),
            escape_html(&entry.location)
        ));
        if entry.current {
            html.push_str(" · <span class=\"badge\">Current</span>");
        }
        html.push_str("</p>\n");
        if !entry.grade.is_empty() {
            html.push_str(&format!("<p>{}</p>\n", escape_html(&entry.grade)));
        }
        html.push_str("</article>\n");
    }
    html.push_str("</section>\n");
    html
}

fn certifications_section(certifications: &[Certification]) -> String {
    if certifications.is_empty() {
        return String::new();
    }
    let mut html = String::from("<section class=\"certifications\">\n<h2>Certifications</h2>\n<ul>\n");
    for cert in certifications {
        let name = escape_html(&cert.name);
        match &cert.link {
            Some(link) => html.push_str(&format!(
                "<li><a href=\"{}\" rel=\"noopener\" target=\"_blank\">{name}</a>",
                escape_html(link)
            )),
            None => html.push_str(&format!("<li>{name}")),
        }
        html.push_str(&format!(" <span class=\"meta\">{}", escape_html(&cert.issuer)));
        if let Some(date) = &cert.date {
            html.push_str(&format!(", {}", escape_html(date)));
        }
        if let Some(id) = &cert.credential_id {
            html.push_str(&format!(" (ID {})", escape_html(id)));
        }
        html.push_str("</span></li>\n");
    }
    html.push_str("</ul>\n</section>\n");
    html
}

// ============================================================================
// Pages
// ============================================================================

pub(super) fn home(r: &Renderer<'_>) -> String {
    let profile = &r.content.profile;
    let mut html = String::from("<section class=\"hero\">\n");

    if let Some(image) = &profile.profile_image {
        html.push_str(&format!(
            "<img class=\"avatar\" src=\"{}\" alt=\"{}\">\n",
            escape_html(image),
            escape_html(&profile.name)
        ));
    }
    html.push_str(&format!(
        "<h1>{}</h1>\n<p class=\"title\">{}</p>\n<p class=\"tagline\">{}</p>\n",
        escape_html(&profile.name),
        escape_html(&profile.title),
        escape_html(&profile.tagline)
    ));
    if !profile.availability.is_empty() {
        let class = if profile.open_to_opportunities {
            "status open"
        } else {
            "status"
        };
        html.push_str(&format!(
            "<p class=\"{class}\">{}</p>\n",
            escape_html(&profile.availability)
        ));
    }
    html.push_str("</section>\n");

    let featured = r.content.projects.featured();
    if !featured.is_empty() {
        html.push_str("<section class=\"featured\">\n<h2>Featured Projects</h2>\n");
        html.push_str(&project_grid(featured));
        html.push_str("<a class=\"more\" href=\"/projects/\">View all projects</a>\n</section>\n");
    }

    let skills = &r.content.skills;
    if !skills.highlighted.is_empty() {
        html.push_str("<section class=\"skills\">\n<h2>Skills</h2>\n");
        html.push_str(&list("skill-list", &skills.highlighted));
        html.push_str("</section>\n");
    }

    html.push_str(
        "<section class=\"cta\">\n<h2>Let's work together</h2>\n\
         <a class=\"button\" href=\"/contact/\">Get in touch</a>\n</section>\n",
    );
    html
}

pub(super) fn about(r: &Renderer<'_>) -> String {
    let content = r.content;
    let profile = &content.profile;

    let mut html = String::from("<section class=\"bio\">\n<h1>About Me</h1>\n");
    html.push_str(&paragraphs(&profile.bio.long));
    if !profile.location.is_empty() {
        html.push_str(&format!(
            "<p class=\"meta\">{} · {}</p>\n",
            escape_html(&profile.location),
            escape_html(&profile.timezone)
        ));
    }
    html.push_str(&list("work-preference", &profile.work_preference));
    html.push_str("</section>\n");

    if !profile.values.is_empty() {
        html.push_str("<section class=\"values\">\n<h2>What I Value</h2>\n");
        for value in &profile.values {
            html.push_str(&format!(
                "<article>\n<h3>{}</h3>\n<p>{}</p>\n</article>\n",
                escape_html(&value.title),
                escape_html(&value.description)
            ));
        }
        html.push_str("</section>\n");
    }

    if !content.skills.categories.is_empty() {
        html.push_str("<section class=\"skills\">\n<h2>Skills</h2>\n");
        for category in &content.skills.categories {
            html.push_str(&format!("<h3>{}</h3>\n<ul class=\"skill-list\">\n", escape_html(&category.name)));
            for skill in &category.skills {
                let class = if content.skills.is_highlighted(skill) {
                    " class=\"highlighted\""
                } else {
                    ""
                };
                html.push_str(&format!("<li{class}>{}</li>\n", escape_html(skill)));
            }
            html.push_str("</ul>\n");
        }
        html.push_str("</section>\n");
    }

    html.push_str(&education_section(&content.education.entries));
    html.push_str(&certifications_section(&content.education.certifications));
    html
}

/// Projects listing for `filter`.
///
/// Tag controls link to the toggled filter state, "All" clears the tag, and
/// an empty result shows the "no results" block with a link clearing both
/// the query and the tag.
pub(super) fn listing(r: &Renderer<'_>, filter: &ProjectFilter, style: LinkStyle) -> String {
    let projects = &r.content.projects;
    let visible = filter.apply(projects);

    let mut html = String::from("<section class=\"projects\">\n<h1>Projects</h1>\n");

    // Search box
    html.push_str(&format!(
        "<form class=\"search\" action=\"/projects/\" method=\"get\">\n\
         <input type=\"search\" name=\"q\" value=\"{}\" placeholder=\"Search by name, summary or tech\">\n",
        escape_html(filter.search_query())
    ));
    if let Some(tag) = filter.selected_tag() {
        html.push_str(&format!(
            "<input type=\"hidden\" name=\"tag\" value=\"{}\">\n",
            escape_html(tag)
        ));
    }
    html.push_str("<button type=\"submit\">Search</button>\n</form>\n");

    // Tag controls
    let mut all = filter.clone();
    all.select_all();
    let all_class = if filter.selected_tag().is_none() {
        "tag active"
    } else {
        "tag"
    };
    html.push_str(&format!(
        "<nav class=\"tags\">\n<a class=\"{all_class}\" href=\"{}\">All</a>\n",
        escape_html(&filter_href(&all, style))
    ));
    for tag in projects.all_tags() {
        let class = if filter.selected_tag() == Some(tag) {
            "tag active"
        } else {
            "tag"
        };
        html.push_str(&format!(
            "<a class=\"{class}\" href=\"{}\">{}</a>\n",
            escape_html(&filter_href(&filter.toggled(tag), style)),
            escape_html(tag)
        ));
    }
    html.push_str("</nav>\n");

    if visible.is_empty() {
        html.push_str(&format!(
            "<div class=\"no-results\">\n<p>{NO_RESULTS}</p>\n\
             <a class=\"button\" href=\"{}\">Clear filters</a>\n</div>\n",
            escape_html(&filter_href(&filter.cleared(), style))
        ));
    } else {
        html.push_str(&format!(
            "<p class=\"count\">Showing {} of {} projects</p>\n",
            visible.len(),
            projects.len()
        ));
        html.push_str(&project_grid(visible));
    }

    html.push_str("</section>\n");
    html
}

pub(super) fn project(_r: &Renderer<'_>, project: &Project) -> String {
    let mut html = String::from(
        "<article class=\"project\">\n<a class=\"back\" href=\"/projects/\">&larr; Back to projects</a>\n",
    );
    html.push_str(&format!(
        "<h1>{}</h1>\n<p class=\"summary\">{}</p>\n<p class=\"meta\">{} · {}</p>\n",
        escape_html(&project.name),
        escape_html(&project.summary),
        project.role,
        escape_html(&project.date)
    ));

    let links: Vec<String> = [
        project.links.live.as_deref().map(|url| external_link(url, "Live Demo")),
        project.links.github.as_deref().map(|url| external_link(url, "Source Code")),
    ]
    .into_iter()
    .flatten()
    .collect();
    if !links.is_empty() {
        html.push_str(&format!("<p class=\"links\">{}</p>\n", links.join(" ")));
    }

    for (image, class) in [
        (&project.images.desktop, "screenshot desktop"),
        (&project.images.mobile, "screenshot mobile"),
    ] {
        if let Some(src) = image {
            html.push_str(&format!(
                "<img class=\"{class}\" src=\"{}\" alt=\"{}\" loading=\"lazy\">\n",
                escape_html(src),
                escape_html(&project.name)
            ));
        }
    }

    html.push_str("<section>\n<h2>Overview</h2>\n");
    for paragraph in project.paragraphs() {
        html.push_str(&format!("<p>{}</p>\n", escape_html(paragraph)));
    }
    html.push_str("</section>\n");

    html.push_str("<section>\n<h2>Tech Stack</h2>\n");
    html.push_str(&list("tech", &project.tech));
    html.push_str("</section>\n");

    if !project.highlights.is_empty() {
        html.push_str("<section>\n<h2>Highlights</h2>\n");
        html.push_str(&list("highlights", &project.highlights));
        html.push_str("</section>\n");
    }
    if !project.challenges.is_empty() {
        html.push_str("<section>\n<h2>Challenges</h2>\n");
        html.push_str(&list("challenges", &project.challenges));
        html.push_str("</section>\n");
    }

    html.push_str("<nav class=\"tags\">\n");
    for tag in &project.tags {
        html.push_str(&format!(
            "<a class=\"tag\" href=\"{}\">{}</a>\n",
            tag_path(tag),
            escape_html(tag)
        ));
    }
    html.push_str("</nav>\n</article>\n");
    html
}

pub(super) fn resume(r: &Renderer<'_>) -> String {
    let content = r.content;
    let resume = &content.profile.resume;

    let mut html = String::from("<section class=\"resume\">\n<h1>Resume</h1>\n");
    match (&resume.url, &resume.drive_link) {
        (None, None) => html.push_str("<p>Resume available on request.</p>\n"),
        (url, drive) => {
            html.push_str("<p class=\"links\">");
            if let Some(url) = url {
                let download = if resume.allow_download { " download" } else { "" };
                html.push_str(&format!(
                    "<a class=\"button\" href=\"{}\"{download}>View Resume</a>",
                    escape_html(url)
                ));
            }
            if let Some(drive) = drive {
                html.push_str(&format!(
                    " {}",
                    external_link(drive, "Open in Google Drive")
                ));
            }
            html.push_str("</p>\n");
        }
    }
    html.push_str("</section>\n");

    html.push_str(&education_section(&content.education.entries));
    html.push_str(&certifications_section(&content.education.certifications));
    html
}

/// Contact details and the form.
///
/// With a relay access key the form posts to the relay and carries the
/// hidden `access_key`, `from_name` and an always-empty `botcheck`.
/// Without one it falls back to a `mailto:` form.
pub(super) fn contact(r: &Renderer<'_>) -> String {
    let profile = &r.content.profile;
    let contact = &r.config.contact;
    let email = escape_html(&profile.email);

    let mut html = String::from("<section class=\"contact\">\n<h1>Get In Touch</h1>\n<ul class=\"details\">\n");
    html.push_str(&format!("<li>Email: <a href=\"mailto:{email}\">{email}</a></li>\n"));
    if let Some(phone) = &profile.phone {
        html.push_str(&format!("<li>Phone: {}</li>\n", escape_html(phone)));
    }
    if !profile.location.is_empty() {
        html.push_str(&format!("<li>Location: {}</li>\n", escape_html(&profile.location)));
    }
    html.push_str("</ul>\n");

    match contact.access_key() {
        Some(key) => {
            html.push_str(&format!(
                "<form class=\"contact-form\" action=\"{}\" method=\"post\">\n",
                escape_html(&contact.endpoint)
            ));
            html.push_str(&format!(
                "<input type=\"hidden\" name=\"access_key\" value=\"{}\">\n\
                 <input type=\"hidden\" name=\"from_name\" value=\"{}\">\n\
                 <input type=\"hidden\" name=\"botcheck\" value=\"\">\n",
                escape_html(&key),
                escape_html(&contact.from_name)
            ));
        }
        None => html.push_str(&format!(
            "<form class=\"contact-form\" action=\"mailto:{email}\" method=\"post\" enctype=\"text/plain\">\n"
        )),
    }

    for (name, label, kind) in [
        ("name", "Name", "text"),
        ("email", "Email", "email"),
        ("subject", "Subject", "text"),
    ] {
        html.push_str(&format!(
            "<label>{label}<input type=\"{kind}\" name=\"{name}\" required></label>\n"
        ));
    }
    html.push_str(
        "<label>Message<textarea name=\"message\" rows=\"6\" required></textarea></label>\n\
         <button type=\"submit\">Send Message</button>\n</form>\n</section>\n",
    );
    html
}

pub(super) fn not_found(_r: &Renderer<'_>) -> String {
    String::from(
        "<section class=\"not-found\">\n<h1>404</h1>\n<p>This page could not be found.</p>\n\
         <a class=\"button\" href=\"/\">Back home</a>\n</section>\n",
    )
}

// ============================================================================
// Tests
// ============================================================================
