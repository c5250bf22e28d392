//! Local mail-client fallback.
//!
//! Builds a `mailto:` URI from the form and hands it to the platform opener,
//! which starts the user's configured mail client.

use super::ContactFields;
use std::{
    io,
    process::{Command, ExitStatus, Stdio},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to start `{0}`")]
    Spawn(&'static str, #[source] io::Error),

    #[error("`{0}` exited with {1}")]
    Exit(&'static str, ExitStatus),
}

/// Hands a `mailto:` URI to a mail client.
///
/// Launching is synchronous: it returns once the opener has exited.
pub trait MailLauncher {
    fn launch(&self, uri: &str) -> Result<(), LaunchError>;
}

/// Opens URIs with the platform's default handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl SystemLauncher {
    #[cfg(target_os = "windows")]
    const fn opener() -> (&'static str, &'static [&'static str]) {
        // `cmd /C start` would split the URI on `&`
        ("rundll32", &["url.dll,FileProtocolHandler"])
    }

    #[cfg(target_os = "macos")]
    const fn opener() -> (&'static str, &'static [&'static str]) {
        ("open", &[])
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    const fn opener() -> (&'static str, &'static [&'static str]) {
        ("xdg-open", &[])
    }
}

impl MailLauncher for SystemLauncher {
    fn launch(&self, uri: &str) -> Result<(), LaunchError> {
        let (program, args) = Self::opener();
        run_opener(program, args, uri)
    }
}

/// Run the opener to completion; a non-zero exit means no handler took the URI.
fn run_opener(program: &'static str, args: &[&str], uri: &str) -> Result<(), LaunchError> {
    let status = Command::new(program)
        .args(args)
        .arg(uri)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|err| LaunchError::Spawn(program, err))?;

    if status.success() {
        Ok(())
    } else {
        Err(LaunchError::Exit(program, status))
    }
}

/// Body of the fallback email: sender identity, blank line, message.
pub fn mail_body(fields: &ContactFields) -> String {
    format!(
        "From: {} ({})\n\n{}",
        fields.name, fields.email, fields.message
    )
}

/// `mailto:` URI addressed to `recipient`, with encoded subject and body.
pub fn mailto_uri(recipient: &str, fields: &ContactFields) -> String {
    format!(
        "mailto:{recipient}?subject={}&body={}",
        urlencoding::encode(&fields.subject),
        urlencoding::encode(&mail_body(fields))
    )
}
