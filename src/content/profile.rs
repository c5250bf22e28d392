//! Owner profile: identity, contact details, bio and social links.

use serde::{Deserialize, Serialize};

/// The `profile.toml` content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Profile {
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub tagline: String,

    /// Contact address; also the recipient of the mailto fallback.
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub timezone: String,
    /// e.g. `["Remote", "Onsite", "Hybrid"]`
    #[serde(default)]
    pub work_preference: Vec<String>,
    #[serde(default)]
    pub availability: String,
    #[serde(default)]
    pub open_to_opportunities: bool,

    #[serde(default)]
    pub bio: Bio,
    #[serde(default)]
    pub socials: Socials,
    #[serde(default)]
    pub resume: Resume,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub values: Vec<WorkValue>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Bio {
    #[serde(default)]
    pub short: String,
    #[serde(default)]
    pub long: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Socials {
    pub linkedin: Option<String>,
    pub github: Option<String>,
}

impl Socials {
    /// `(label, url)` pairs for every configured network.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        [("LinkedIn", &self.linkedin), ("GitHub", &self.github)]
            .into_iter()
            .filter_map(|(label, url)| url.as_deref().map(|url| (label, url)))
            .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Resume {
    /// Path of the PDF under the site root.
    pub url: Option<String>,
    #[serde(default)]
    pub allow_download: bool,
    pub drive_link: Option<String>,
}

/// One "how I work" value shown on the about page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkValue {
    pub title: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_minimal() {
        let profile: Profile = toml::from_str(
            r#"
            name = "Jane Doe"
            title = "Developer"
            email = "jane@example.com"
        "#,
        )
        .unwrap();

        assert_eq!(profile.name, "Jane Doe");
        assert_eq!(profile.phone, None);
        assert!(profile.values.is_empty());
        assert!(profile.socials.entries().is_empty());
    }

    #[test]
    fn test_profile_socials_and_resume() {
        let profile: Profile = toml::from_str(
            r#"
            name = "Jane Doe"
            title = "Developer"
            email = "jane@example.com"

            [socials]
            github = "https://github.com/jane"

            [resume]
            url = "/assets/resume.pdf"
            allow_download = true

            [[values]]
            title = "Clean Code"
            description = "Readable first."
        "#,
        )
        .unwrap();

        assert_eq!(
            profile.socials.entries(),
            vec![("GitHub", "https://github.com/jane")]
        );
        assert!(profile.resume.allow_download);
        assert_eq!(profile.values[0].title, "Clean Code");
    }
}
