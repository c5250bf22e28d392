//! Portfolio content loaded from the `content/` directory.
//!
//! | File             | Type        |
//! |------------------|-------------|
//! | `profile.toml`   | `Profile`   |
//! | `projects.toml`  | `Projects`  |
//! | `skills.toml`    | `Skills`    |
//! | `education.toml` | `Education` |
//!
//! Content is read once per command and treated as immutable afterwards.

mod education;
mod error;
mod profile;
mod project;
mod skills;

pub use education::{Certification, Education, EducationEntry};
pub use error::ContentError;
pub use profile::Profile;
pub use project::{Project, Projects};
pub use skills::Skills;

use crate::log;
use project::ProjectsFile;
use serde::de::DeserializeOwned;
use std::{fs, path::Path};

pub const PROFILE_FILE: &str = "profile.toml";
pub const PROJECTS_FILE: &str = "projects.toml";
pub const SKILLS_FILE: &str = "skills.toml";
pub const EDUCATION_FILE: &str = "education.toml";

/// All portfolio content.
#[derive(Debug, Clone, Default)]
pub struct Content {
    pub profile: Profile,
    pub projects: Projects,
    pub skills: Skills,
    pub education: Education,
}

impl Content {
    /// Load every content file from `dir`.
    pub fn load(dir: &Path) -> Result<Self, ContentError> {
        let profile = read_toml(&dir.join(PROFILE_FILE))?;
        let ProjectsFile { projects } = read_toml(&dir.join(PROJECTS_FILE))?;
        let skills: Skills = read_toml(&dir.join(SKILLS_FILE))?;
        let education = read_toml(&dir.join(EDUCATION_FILE))?;

        for skill in skills.unlisted_highlights() {
            log!("content"; "highlighted skill `{skill}` is not in any category");
        }

        Ok(Self {
            profile,
            projects: Projects::new(projects)?,
            skills,
            education,
        })
    }
}

fn read_toml<T: DeserializeOwned>(path: &Path) -> Result<T, ContentError> {
    let text =
        fs::read_to_string(path).map_err(|err| ContentError::Io(path.to_path_buf(), err))?;
    toml::from_str(&text).map_err(|err| ContentError::Toml(path.to_path_buf(), err))
}
