//! Education history and certifications.

use serde::{Deserialize, Serialize};

/// The `education.toml` content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Education {
    #[serde(default, rename = "education")]
    pub entries: Vec<EducationEntry>,
    #[serde(default)]
    pub certifications: Vec<Certification>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    pub field: Option<String>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub grade: String,
    /// Still enrolled.
    #[serde(default)]
    pub current: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Certification {
    pub name: String,
    pub issuer: String,
    pub date: Option<String>,
    pub link: Option<String>,
    pub credential_id: Option<String>,
}
