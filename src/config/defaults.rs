//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#true() -> bool {
    true
}

// ============================================================================
// [base] Section Defaults
// ============================================================================

pub mod base {
    pub fn url() -> Option<String> {
        None
    }

    pub fn language() -> String {
        "en".into()
    }
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use std::path::PathBuf;

    pub fn root() -> Option<PathBuf> {
        None
    }

    pub fn content() -> PathBuf {
        "content".into()
    }

    pub fn output() -> PathBuf {
        "public".into()
    }

    pub fn assets() -> PathBuf {
        "assets".into()
    }

    pub mod sitemap {
        use std::path::PathBuf;

        pub fn path() -> PathBuf {
            "sitemap.xml".into()
        }
    }
}

// ============================================================================
// [serve] Section Defaults
// ============================================================================

pub mod serve {
    pub fn interface() -> String {
        "127.0.0.1".into()
    }

    pub fn port() -> u16 {
        5277
    }
}

// ============================================================================
// [contact] Section Defaults
// ============================================================================

pub mod contact {
    pub fn endpoint() -> String {
        "https://api.web3forms.com/submit".into()
    }

    pub fn access_key_env() -> String {
        "WEB3FORMS_KEY".into()
    }

    pub fn subject_prefix() -> String {
        "Portfolio Contact: ".into()
    }

    pub fn from_name() -> String {
        "Portfolio Contact Form".into()
    }
}
