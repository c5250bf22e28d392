//! Terminal commands over the portfolio content: `projects`, `tags`, `show`,
//! `contact` and `prefs`.

use crate::{
    cli::ThemeArg,
    config::SiteConfig,
    contact::{ContactFields, ContactForm, ContactOptions, ContactStatus, HttpRelay, SystemLauncher},
    content::{Content, Project},
    filter::ProjectFilter,
    log, logger,
    render::NO_RESULTS,
    settings::{Settings, Theme},
    storage::FileStore,
};
use anyhow::{Context, Result, bail};

// ============================================================================
// Projects
// ============================================================================

/// Projects passing the filter, optionally narrowed to featured ones.
fn visible<'a>(content: &'a Content, filter: &ProjectFilter, featured: bool) -> Vec<&'a Project> {
    let mut projects = filter.apply(&content.projects);
    if featured {
        projects.retain(|project| project.featured);
    }
    projects
}

/// Print the visible projects, or the "no results" notice.
pub fn list_projects(content: &Content, search: &str, tag: Option<&str>, featured: bool) {
    let filter = ProjectFilter::new(search, tag.map(str::to_owned));
    let projects = visible(content, &filter, featured);

    if projects.is_empty() {
        log!("projects"; "{NO_RESULTS} Run `folio projects` to clear filters.");
        return;
    }
    for project in &projects {
        log!("projects"; "{:<20} {} - {}", project.slug, project.name, project.summary);
    }
    if filter.is_active() || featured {
        log!("projects"; "showing {} of {}", projects.len(), content.projects.len());
    }
}

/// Print every distinct tag in first-seen order.
pub fn list_tags(content: &Content) {
    log!("tags"; "{}", content.projects.all_tags().join(", "));
}

/// Print one project in full.
pub fn show_project(content: &Content, slug: &str) -> Result<()> {
    let Some(project) = content.projects.by_slug(slug) else {
        bail!("Unknown project `{slug}`. Run `folio projects` to list slugs.");
    };
    log!("show"; "{}", describe(project));
    Ok(())
}

/// Multi-line text rendering of a project.
fn describe(project: &Project) -> String {
    let mut lines = vec![
        format!("{} ({})", project.name, project.slug),
        project.summary.clone(),
        format!("{} · {}", project.role, project.date),
    ];
    if !project.tags.is_empty() {
        lines.push(format!("tags: {}", project.tags.join(", ")));
    }
    if !project.tech.is_empty() {
        lines.push(format!("tech: {}", project.tech.join(", ")));
    }
    for (label, url) in [("live", &project.links.live), ("github", &project.links.github)] {
        if let Some(url) = url {
            lines.push(format!("{label}: {url}"));
        }
    }

    lines.push(String::new());
    lines.extend(project.paragraphs().map(str::to_owned));

    for (title, items) in [
        ("Highlights", &project.highlights),
        ("Challenges", &project.challenges),
    ] {
        if !items.is_empty() {
            lines.push(String::new());
            lines.push(format!("{title}:"));
            lines.extend(items.iter().map(|item| format!("  - {item}")));
        }
    }
    lines.join("\n")
}

// ============================================================================
// Contact
// ============================================================================

/// Form options from config and profile.
fn contact_options(config: &SiteConfig, content: &Content) -> ContactOptions {
    ContactOptions {
        recipient: content.profile.email.clone(),
        access_key: config.contact.access_key(),
        subject_prefix: config.contact.subject_prefix.clone(),
        from_name: config.contact.from_name.clone(),
    }
}

/// Run one submission and report the outcome.
///
/// Returns an error when the submission ends in the `error` status.
pub fn send_contact(config: &SiteConfig, content: &Content, fields: ContactFields) -> Result<()> {
    let options = contact_options(config, content);
    let via_relay = options.access_key.is_some();
    let relay = HttpRelay::new(&config.contact.endpoint).context("Failed to create relay client")?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let state = runtime.block_on(async {
        let mut form = ContactForm::new(options, relay, SystemLauncher);
        form.set_fields(fields);
        log!("contact"; "sending...");
        form.submit().await;
        form.state()
    });

    match state.status {
        ContactStatus::Success if via_relay => {
            logger::success("Message sent. Thanks for reaching out!");
            Ok(())
        }
        ContactStatus::Success => {
            logger::success("Opened your mail client with the message.");
            Ok(())
        }
        _ => {
            logger::failure("Message not sent", &state.error_message);
            bail!("contact failed")
        }
    }
}

// ============================================================================
// Preferences
// ============================================================================

/// Apply the requested changes to `settings`. Returns whether anything changed.
fn apply_prefs(settings: &mut Settings, theme: Option<ThemeArg>, sound: Option<bool>) -> bool {
    let before = *settings;
    if let Some(theme) = theme {
        settings.theme = match theme {
            ThemeArg::Dark => Theme::Dark,
            ThemeArg::Light => Theme::Light,
            ThemeArg::Toggle => settings.theme.toggled(),
        };
    }
    if let Some(sound) = sound {
        settings.sound = sound;
    }
    *settings != before
}

/// Show the saved preferences, updating them first when asked to.
pub fn update_prefs(config: &SiteConfig, theme: Option<ThemeArg>, sound: Option<bool>) -> Result<()> {
    let store = FileStore::open(config.prefs_path()).context("Failed to open preferences")?;
    let mut settings = Settings::load(&store);

    if apply_prefs(&mut settings, theme, sound) {
        settings.save(&store).context("Failed to save preferences")?;
        log!("prefs"; "saved to {}", store.path().display());
    }
    log!("prefs"; "theme = {}, sound = {}", settings.theme, settings.sound);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::fixtures::sample_content;
    use crate::storage::Store;
    use tempfile::TempDir;

    fn slugs(projects: &[&Project]) -> Vec<String> {
        projects.iter().map(|p| p.slug.clone()).collect()
    }

    #[test]
    fn test_visible_featured() {
        let content = sample_content();
        let all = ProjectFilter::default();
        assert_eq!(slugs(&visible(&content, &all, false)), ["wealthwise", "inkwell", "chatpulse"]);
        assert_eq!(slugs(&visible(&content, &all, true)), ["wealthwise", "chatpulse"]);

        let rust = ProjectFilter::new("rust", None);
        assert!(visible(&content, &rust, true).is_empty());
    }

    #[test]
    fn test_show_unknown_slug() {
        let content = sample_content();
        assert!(show_project(&content, "inkwell").is_ok());
        let err = show_project(&content, "nope").unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_describe() {
        let content = sample_content();
        let text = describe(content.projects.by_slug("wealthwise").unwrap());

        assert!(text.starts_with("WealthWise (wealthwise)\n"));
        assert!(text.contains("Solo Developer · 2024"));
        assert!(text.contains("tags: AI, Full-Stack, Finance, MERN"));
        assert!(text.contains("github: https://github.com/example/wealthwise"));
        assert!(text.contains("A personal finance platform.\nWith an AI assistant."));
        assert!(text.contains("Challenges:\n  - Designed MongoDB schemas"));
    }

    #[test]
    fn test_contact_options() {
        let mut config = SiteConfig::default();
        config.contact.access_key = Some(" key ".into());
        let content = sample_content();

        let options = contact_options(&config, &content);
        assert_eq!(options.recipient, "jane@example.com");
        assert_eq!(options.access_key.as_deref(), Some("key"));
        assert_eq!(options.subject_prefix, "Portfolio Contact: ");
        assert_eq!(options.from_name, "Portfolio Contact Form");
    }

    #[test]
    fn test_apply_prefs() {
        let mut settings = Settings::default();
        assert!(!apply_prefs(&mut settings, None, None));

        assert!(apply_prefs(&mut settings, Some(ThemeArg::Toggle), Some(true)));
        assert_eq!(settings.theme, Theme::Light);
        assert!(settings.sound);

        assert!(!apply_prefs(&mut settings, Some(ThemeArg::Light), None));
        assert!(apply_prefs(&mut settings, Some(ThemeArg::Toggle), None));
        assert_eq!(settings.theme, Theme::Dark);
    }

    #[test]
    fn test_update_prefs_persists() {
        let dir = TempDir::new().unwrap();
        let mut config = SiteConfig::default();
        config.set_root(dir.path());

        update_prefs(&config, Some(ThemeArg::Light), Some(true)).unwrap();

        let store = FileStore::open(config.prefs_path()).unwrap();
        assert_eq!(store.get("theme").as_deref(), Some("light"));
        assert_eq!(Settings::load(&store), Settings { theme: Theme::Light, sound: true });
    }
}
