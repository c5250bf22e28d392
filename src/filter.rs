//! Project filtering for the projects listing.
//!
//! A project is visible when it matches both the free-text query and the
//! selected tag:
//!
//! | Input          | Matches when                                             |
//! |----------------|----------------------------------------------------------|
//! | `search_query` | empty, or a case-insensitive substring of `name`,       |
//! |                | `summary` or any `tech` entry                            |
//! | `selected_tag` | `None`, or contained in the project's `tags`             |
//!
//! Filtering never reorders: the result is a subsequence of the collection.
//! Nothing is cached, so the visible set is recomputed on every call.

use crate::content::Project;

/// Live filter input of the projects page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFilter {
    search_query: String,
    selected_tag: Option<String>,
}

impl ProjectFilter {
    pub fn new(search_query: impl Into<String>, selected_tag: Option<String>) -> Self {
        Self {
            search_query: search_query.into(),
            selected_tag,
        }
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn selected_tag(&self) -> Option<&str> {
        self.selected_tag.as_deref()
    }

    /// Select `tag`, or clear the selection if `tag` is already selected.
    pub fn toggle_tag(&mut self, tag: &str) {
        if self.selected_tag.as_deref() == Some(tag) {
            self.selected_tag = None;
        } else {
            self.selected_tag = Some(tag.to_owned());
        }
    }

    /// The "All" control: drop the tag selection.
    pub fn select_all(&mut self) {
        self.selected_tag = None;
    }

    /// Reset query and tag together (the "clear filters" action).
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether any filter input is set.
    pub fn is_active(&self) -> bool {
        !self.search_query.is_empty() || self.selected_tag.is_some()
    }

    /// Filter state after `toggle_tag(tag)`, leaving `self` untouched.
    pub fn toggled(&self, tag: &str) -> Self {
        let mut next = self.clone();
        next.toggle_tag(tag);
        next
    }

    /// Filter state after `clear()`, leaving `self` untouched.
    pub fn cleared(&self) -> Self {
        let mut next = self.clone();
        next.clear();
        next
    }

    pub fn matches(&self, project: &Project) -> bool {
        self.matches_query(project) && self.matches_tag(project)
    }

    fn matches_query(&self, project: &Project) -> bool {
        if self.search_query.is_empty() {
            return true;
        }
        let query = self.search_query.to_lowercase();
        let contains = |text: &str| text.to_lowercase().contains(&query);

        contains(&project.name)
            || contains(&project.summary)
            || project.tech.iter().any(|t| contains(t))
    }

    fn matches_tag(&self, project: &Project) -> bool {
        match &self.selected_tag {
            None => true,
            Some(tag) => project.tags.contains(tag),
        }
    }

    /// The visible projects, in their original order.
    pub fn apply<'a, I>(&self, projects: I) -> Vec<&'a Project>
    where
        I: IntoIterator<Item = &'a Project>,
    {
        projects.into_iter().filter(|p| self.matches(p)).collect()
    }
}
