//! `[contact]` section configuration.
//!
//! Settings of the form relay. Without an access key the contact form falls
//! back to opening the visitor's mail client.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::env;

/// `[contact]` section in folio.toml.
///
/// # Example
/// ```toml
/// [contact]
/// access_key_env = "WEB3FORMS_KEY"   # read the key from this variable
/// subject_prefix = "Portfolio Contact: "
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ContactConfig {
    /// Relay endpoint receiving the JSON POST.
    #[serde(default = "defaults::contact::endpoint")]
    #[educe(Default = defaults::contact::endpoint())]
    pub endpoint: String,

    /// Relay access key. Takes precedence over `access_key_env`.
    #[serde(default)]
    pub access_key: Option<String>,

    /// Environment variable holding the access key.
    #[serde(default = "defaults::contact::access_key_env")]
    #[educe(Default = defaults::contact::access_key_env())]
    pub access_key_env: String,

    /// Prepended to the subject of relayed messages.
    #[serde(default = "defaults::contact::subject_prefix")]
    #[educe(Default = defaults::contact::subject_prefix())]
    pub subject_prefix: String,

    /// Sender label of relayed messages.
    #[serde(default = "defaults::contact::from_name")]
    #[educe(Default = defaults::contact::from_name())]
    pub from_name: String,
}

impl ContactConfig {
    /// The configured access key, if any. Blank values count as unset.
    pub fn access_key(&self) -> Option<String> {
        self.access_key
            .clone()
            .or_else(|| env::var(&self.access_key_env).ok())
            .map(|key| key.trim().to_owned())
            .filter(|key| !key.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;

    fn parse(extra: &str) -> SiteConfig {
        toml::from_str(&format!(
            "[base]\ntitle = \"Test\"\ndescription = \"Test\"\n{extra}"
        ))
        .unwrap()
    }

    #[test]
    fn test_contact_defaults() {
        let config = parse("");
        assert_eq!(config.contact.endpoint, "https://api.web3forms.com/submit");
        assert_eq!(config.contact.subject_prefix, "Portfolio Contact: ");
        assert_eq!(config.contact.from_name, "Portfolio Contact Form");
        assert_eq!(config.contact.access_key_env, "WEB3FORMS_KEY");
    }

    #[test]
    fn test_access_key_from_config() {
        let config = parse("[contact]\naccess_key = \" abc \"\naccess_key_env = \"FOLIO_TEST_UNSET_KEY\"");
        assert_eq!(config.contact.access_key().as_deref(), Some("abc"));
    }

    #[test]
    fn test_blank_access_key_is_unset() {
        let config = parse("[contact]\naccess_key = \"  \"\naccess_key_env = \"FOLIO_TEST_UNSET_KEY\"");
        assert_eq!(config.contact.access_key(), None);
    }

    #[test]
    fn test_access_key_from_env() {
        // Every system defines PATH; it stands in for a configured key
        let config = parse("[contact]\naccess_key_env = \"PATH\"");
        assert!(config.contact.access_key().is_some());

        let config = parse("[contact]\naccess_key_env = \"FOLIO_TEST_UNSET_KEY\"");
        assert_eq!(config.contact.access_key(), None);
    }
}
