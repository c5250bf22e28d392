//! Project records and the project collection.
//!
//! Projects are loaded once from `projects.toml` and never mutated afterwards.
//!
//! # Example
//!
//! ```toml
//! [[projects]]
//! slug = "wealthwise"
//! name = "WealthWise"
//! summary = "AI-Powered Personal Finance Platform"
//! description = "..."
//! role = "Solo Developer"
//! featured = true
//! tags = ["AI", "Full-Stack"]
//! tech = ["React", "Node.js"]
//! date = "2024"
//!
//! [projects.links]
//! github = "https://github.com/you/wealthwise"
//! ```

use super::error::ContentError;
use crate::utils::slug::slugify;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the owner did on a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Role {
    #[default]
    #[serde(rename = "Solo Developer")]
    SoloDeveloper,
    #[serde(rename = "Team Lead")]
    TeamLead,
    #[serde(rename = "Team Member")]
    TeamMember,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SoloDeveloper => "Solo Developer",
            Self::TeamLead => "Team Lead",
            Self::TeamMember => "Team Member",
        })
    }
}

/// External links of a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Links {
    pub live: Option<String>,
    pub github: Option<String>,
}

/// Screenshot paths, relative to the site root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Images {
    pub thumbnail: Option<String>,
    pub desktop: Option<String>,
    pub mobile: Option<String>,
}

/// A single portfolio project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    /// Unique identifier, used in URLs (`/projects/{slug}/`).
    pub slug: String,
    pub name: String,
    /// One-line summary shown on cards.
    pub summary: String,
    /// Long description; blank lines separate paragraphs.
    pub description: String,
    #[serde(default)]
    pub role: Role,
    /// Shown in the featured section of the landing page.
    #[serde(default)]
    pub featured: bool,
    /// Category labels used for filtering.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Technology labels, display only.
    #[serde(default)]
    pub tech: Vec<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub challenges: Vec<String>,
    #[serde(default)]
    pub links: Links,
    pub date: String,
    #[serde(default)]
    pub images: Images,
}

impl Project {
    /// Description split into paragraphs on blank lines.
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.description
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

/// Layout of `projects.toml`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct ProjectsFile {
    #[serde(default)]
    pub projects: Vec<Project>,
}

/// The ordered, read-only project collection.
///
/// Construction rejects duplicate slugs, so `by_slug` returns at most one record.
/// It also rejects tags that would share a listing URL or have none.
#[derive(Debug, Clone, Default)]
pub struct Projects {
    items: Vec<Project>,
}

impl Projects {
    /// Build a collection, checking that every slug is unique.
    pub fn new(items: Vec<Project>) -> Result<Self, ContentError> {
        let mut seen = FxHashSet::default();
        for project in &items {
            if !seen.insert(project.slug.as_str()) {
                return Err(ContentError::DuplicateSlug(project.slug.clone()));
            }
        }
        let projects = Self { items };
        projects.check_tag_slugs()?;
        Ok(projects)
    }

    /// Every distinct tag must map to its own non-empty URL slug.
    fn check_tag_slugs(&self) -> Result<(), ContentError> {
        let mut owners: FxHashMap<String, &str> = FxHashMap::default();
        for tag in self.all_tags() {
            let slug = slugify(tag);
            if slug.is_empty() {
                return Err(ContentError::EmptyTagSlug(tag.to_owned()));
            }
            if let Some(owner) = owners.insert(slug.clone(), tag) {
                return Err(ContentError::TagCollision(owner.to_owned(), tag.to_owned(), slug));
            }
        }
        Ok(())
    }

    pub fn as_slice(&self) -> &[Project] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Project> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find a project by slug.
    pub fn by_slug(&self, slug: &str) -> Option<&Project> {
        self.items.iter().find(|p| p.slug == slug)
    }

    /// Featured projects, in collection order.
    pub fn featured(&self) -> Vec<&Project> {
        self.items.iter().filter(|p| p.featured).collect()
    }

    /// Every tag across the collection, each listed once, in first-seen order.
    pub fn all_tags(&self) -> Vec<&str> {
        let mut seen = FxHashSet::default();
        self.items
            .iter()
            .flat_map(|p| p.tags.iter().map(String::as_str))
            .filter(|tag| seen.insert(*tag))
            .collect()
    }
}

impl<'a> IntoIterator for &'a Projects {
    type Item = &'a Project;
    type IntoIter = std::slice::Iter<'a, Project>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
