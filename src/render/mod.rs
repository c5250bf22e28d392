//! HTML rendering of the portfolio pages.
//!
//! Every page is a [`Route`] rendered through the shared layout:
//!
//! | Route                        | Path                          |
//! |------------------------------|-------------------------------|
//! | `Home`                       | `/`                           |
//! | `About`                      | `/about/`                     |
//! | `Projects`                   | `/projects/`                  |
//! | `Tag(tag)`                   | `/projects/tags/{tag-slug}/`  |
//! | `Project(project)`           | `/projects/{slug}/`           |
//! | `Resume`                     | `/resume/`                    |
//! | `Contact`                    | `/contact/`                   |
//! | `NotFound`                   | `/404.html`                   |
//!
//! The renderer is pure: it reads configuration, content and the UI
//! [`Settings`] it was given and returns strings. Writing files is the
//! caller's job.

mod layout;
mod pages;

pub use layout::inject_loader;
pub use pages::NO_RESULTS;

use crate::{
    config::SiteConfig,
    content::{Content, Project},
    filter::ProjectFilter,
    settings::Settings,
    utils::slug::{project_path, tag_path},
};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Stylesheet shipped next to the pages.
pub const STYLESHEET: &str = include_str!("../embed/style.css");

/// Site path of the stylesheet.
pub const STYLESHEET_PATH: &str = "/style.css";

// ============================================================================
// Routes
// ============================================================================

/// A renderable page of the site.
#[derive(Debug, Clone, Copy)]
pub enum Route<'a> {
    Home,
    About,
    Projects,
    Tag(&'a str),
    Project(&'a Project),
    Resume,
    Contact,
    NotFound,
}

impl Route<'_> {
    /// Site path the page is served under.
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_owned(),
            Self::About => "/about/".to_owned(),
            Self::Projects => "/projects/".to_owned(),
            Self::Tag(tag) => tag_path(tag),
            Self::Project(project) => project_path(&project.slug),
            Self::Resume => "/resume/".to_owned(),
            Self::Contact => "/contact/".to_owned(),
            Self::NotFound => "/404.html".to_owned(),
        }
    }

    /// Whether the page belongs in the sitemap.
    pub const fn is_indexable(&self) -> bool {
        !matches!(self, Self::NotFound)
    }

    /// Navigation entry highlighted while this page is shown.
    const fn section(&self) -> Option<Section> {
        match self {
            Self::Home => Some(Section::Home),
            Self::About => Some(Section::About),
            Self::Projects | Self::Tag(_) | Self::Project(_) => Some(Section::Projects),
            Self::Resume => Some(Section::Resume),
            Self::Contact => Some(Section::Contact),
            Self::NotFound => None,
        }
    }
}

/// Top-level navigation entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Home,
    About,
    Projects,
    Resume,
    Contact,
}

impl Section {
    const ALL: [Self; 5] = [
        Self::Home,
        Self::About,
        Self::Projects,
        Self::Resume,
        Self::Contact,
    ];

    const fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::About => "About",
            Self::Projects => "Projects",
            Self::Resume => "Resume",
            Self::Contact => "Contact",
        }
    }

    const fn href(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::About => "/about/",
            Self::Projects => "/projects/",
            Self::Resume => "/resume/",
            Self::Contact => "/contact/",
        }
    }
}

// ============================================================================
// Filter Links
// ============================================================================

/// How filter controls on the projects listing link to other filter states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStyle {
    /// Prerendered pages: tags link to `/projects/tags/{tag-slug}/`.
    /// The search query cannot be carried by a static link and is dropped.
    Static,
    /// Live pages: `/projects/?q=..&tag=..`.
    Query,
}

/// Href of the listing showing `filter`.
pub fn filter_href(filter: &ProjectFilter, style: LinkStyle) -> String {
    match style {
        LinkStyle::Static => match filter.selected_tag() {
            Some(tag) => tag_path(tag),
            None => "/projects/".to_owned(),
        },
        LinkStyle::Query => {
            let mut params = Vec::with_capacity(2);
            if !filter.search_query().is_empty() {
                params.push(format!("q={}", urlencoding::encode(filter.search_query())));
            }
            if let Some(tag) = filter.selected_tag() {
                params.push(format!("tag={}", urlencoding::encode(tag)));
            }
            if params.is_empty() {
                "/projects/".to_owned()
            } else {
                format!("/projects/?{}", params.join("&"))
            }
        }
    }
}

// ============================================================================
// Rendered Pages
// ============================================================================

/// One rendered HTML page.
#[derive(Debug, Clone)]
pub struct Page {
    /// Site path, e.g. `/projects/` or `/404.html`
    pub path: String,
    pub html: String,
    pub indexable: bool,
}

impl Page {
    /// File the page is written to under `output`.
    ///
    /// Directory paths map to their `index.html`.
    pub fn output_path(&self, output: &Path) -> PathBuf {
        let relative = self.path.trim_start_matches('/');
        if self.path.ends_with('/') {
            output.join(relative).join("index.html")
        } else {
            output.join(relative)
        }
    }
}

// ============================================================================
// Renderer
// ============================================================================

/// Renders pages from configuration, content and UI settings.
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'a> {
    config: &'a SiteConfig,
    content: &'a Content,
    settings: Settings,
}

impl<'a> Renderer<'a> {
    pub const fn new(config: &'a SiteConfig, content: &'a Content, settings: Settings) -> Self {
        Self {
            config,
            content,
            settings,
        }
    }

    /// Every page of the static site, in sitemap order.
    pub fn routes(&self) -> Vec<Route<'a>> {
        let content: &'a Content = self.content;
        let projects = &content.projects;
        let tags = projects.all_tags();

        let mut routes = Vec::with_capacity(6 + tags.len() + projects.len());
        routes.extend([Route::Home, Route::About, Route::Projects]);
        routes.extend(tags.into_iter().map(Route::Tag));
        routes.extend(projects.iter().map(Route::Project));
        routes.extend([Route::Resume, Route::Contact, Route::NotFound]);
        routes
    }

    /// Render every route in parallel.
    pub fn render_site(&self) -> Vec<Page> {
        self.routes()
            .par_iter()
            .map(|route| Page {
                path: route.path(),
                html: self.render(route),
                indexable: route.is_indexable(),
            })
            .collect()
    }

    /// Render one route.
    pub fn render(&self, route: &Route<'_>) -> String {
        let (title, body) = match route {
            Route::Home => (None, pages::home(self)),
            Route::About => (Some("About"), pages::about(self)),
            Route::Projects => (
                Some("Projects"),
                pages::listing(self, &ProjectFilter::default(), LinkStyle::Static),
            ),
            Route::Tag(tag) => (
                Some("Projects"),
                pages::listing(
                    self,
                    &ProjectFilter::new("", Some((*tag).to_owned())),
                    LinkStyle::Static,
                ),
            ),
            Route::Project(project) => (Some(project.name.as_str()), pages::project(self, project)),
            Route::Resume => (Some("Resume"), pages::resume(self)),
            Route::Contact => (Some("Contact"), pages::contact(self)),
            Route::NotFound => (Some("Not Found"), pages::not_found(self)),
        };
        layout::page(self, title, route.section(), &body)
    }

    /// Render the projects listing for a live filter.
    pub fn render_listing(&self, filter: &ProjectFilter) -> String {
        let body = pages::listing(self, filter, LinkStyle::Query);
        layout::page(self, Some("Projects"), Some(Section::Projects), &body)
    }
}

// ============================================================================
// Tests
// ============================================================================
