//! Skill categories and the highlighted skill list.

use serde::{Deserialize, Serialize};

/// The `skills.toml` content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Skills {
    #[serde(default)]
    pub categories: Vec<SkillCategory>,
    /// Skills shown as primary on the landing page.
    #[serde(default)]
    pub highlighted: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkillCategory {
    pub name: String,
    pub icon: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl Skills {
    /// Every skill of every category, in declaration order.
    pub fn all_skills(&self) -> impl Iterator<Item = &str> {
        self.categories
            .iter()
            .flat_map(|c| c.skills.iter().map(String::as_str))
    }

    pub fn is_highlighted(&self, skill: &str) -> bool {
        self.highlighted.iter().any(|s| s == skill)
    }

    /// Highlighted skills that no category lists.
    pub fn unlisted_highlights(&self) -> Vec<&str> {
        self.highlighted
            .iter()
            .map(String::as_str)
            .filter(|skill| !self.all_skills().any(|s| s == *skill))
            .collect()
    }
}
