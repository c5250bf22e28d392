//! Contact form submission.
//!
//! # States
//!
//! ```text
//!            submit                 relay ok / mail client opened
//!   Idle ─────────────► Sending ─────────────────────────────► Success
//!    ▲                     │                                       │
//!    │                     │ rejected / network / launch failure   │
//!    │                     ▼                                       │
//!    │                   Error                                     │
//!    │                     │                                       │
//!    └──── after RESET_DELAY ◄─────────────────────────────────────┘
//! ```
//!
//! Without an access key the form falls back to a `mailto:` hand-off (see
//! [`mailto`]); with one it posts to the relay (see [`relay`]).
//!
//! Fields are cleared on success and kept on error so the user can retry.
//! Every finished attempt arms exactly one reset timer; a new submission or
//! dropping the form cancels the pending one. An attempt whose future is
//! dropped mid-flight ends as a network failure, so the form never stays in
//! `Sending`. `submit` takes `&mut self`, so attempts cannot overlap.

pub mod mailto;
pub mod relay;

pub use mailto::{MailLauncher, SystemLauncher};
pub use relay::{FormRelay, HttpRelay, Submission};

use crate::log;
use std::{fmt, sync::Arc, time::Duration};
use tokio::{runtime::Handle, sync::watch, task::JoinHandle};

/// How long a terminal status stays visible before returning to idle.
pub const RESET_DELAY: Duration = Duration::from_secs(5);

pub const MAIL_CLIENT_FAILED: &str = "Failed to open email client. Please try again.";
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";
pub const NETWORK_FAILURE: &str = "Network error. Please check your connection and try again.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContactStatus {
    #[default]
    Idle,
    Sending,
    Success,
    Error,
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Sending => "sending",
            Self::Success => "success",
            Self::Error => "error",
        })
    }
}

/// The four user-entered fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// Everything a view needs to draw the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactState {
    pub status: ContactStatus,
    pub fields: ContactFields,
    /// Only meaningful while `status` is `Error`.
    pub error_message: String,
}

impl ContactState {
    /// The submit control is disabled while a submission is in flight.
    pub fn can_submit(&self) -> bool {
        self.status != ContactStatus::Sending
    }
}

/// Static settings of a contact form.
#[derive(Debug, Clone, Default)]
pub struct ContactOptions {
    /// Owner address used by the mailto fallback.
    pub recipient: String,
    /// Relay access key. `None` selects the mailto fallback.
    pub access_key: Option<String>,
    /// Prepended to the subject of relayed messages.
    pub subject_prefix: String,
    /// Sender label of relayed messages.
    pub from_name: String,
}

/// A contact form instance with its own status and reset timer.
pub struct ContactForm<R, L> {
    options: ContactOptions,
    relay: R,
    launcher: L,
    state: Arc<watch::Sender<ContactState>>,
    reset: Option<JoinHandle<()>>,
}

impl<R: FormRelay, L: MailLauncher> ContactForm<R, L> {
    pub fn new(options: ContactOptions, relay: R, launcher: L) -> Self {
        let (state, _) = watch::channel(ContactState::default());
        Self {
            options,
            relay,
            launcher,
            state: Arc::new(state),
            reset: None,
        }
    }

    pub fn state(&self) -> ContactState {
        self.state.borrow().clone()
    }

    #[cfg(test)]
    pub fn status(&self) -> ContactStatus {
        self.state.borrow().status
    }

    #[cfg(test)]
    pub fn can_submit(&self) -> bool {
        self.state.borrow().can_submit()
    }

    /// Observe every state change.
    #[cfg(test)]
    pub fn subscribe(&self) -> watch::Receiver<ContactState> {
        self.state.subscribe()
    }

    pub fn set_fields(&self, fields: ContactFields) {
        self.state.send_modify(|state| state.fields = fields);
    }

    /// Run one submission to its terminal status.
    ///
    /// The reset timer is spawned on the current tokio runtime; without one
    /// the terminal status stays until the next submission.
    pub async fn submit(&mut self) -> ContactStatus {
        let Self {
            options,
            relay,
            launcher,
            state,
            reset,
        } = self;

        let attempt = Attempt::start(state, reset);
        let fields = state.borrow().fields.clone();
        let outcome = match &options.access_key {
            None => open_mail_client(&*launcher, &options.recipient, &fields),
            Some(key) => post_to_relay(&*relay, options, key, &fields).await,
        };
        attempt.finish(outcome)
    }
}

impl<R, L> Drop for ContactForm<R, L> {
    fn drop(&mut self) {
        if let Some(reset) = self.reset.take() {
            reset.abort();
        }
    }
}

fn open_mail_client(
    launcher: &impl MailLauncher,
    recipient: &str,
    fields: &ContactFields,
) -> Result<(), String> {
    let uri = mailto::mailto_uri(recipient, fields);
    launcher.launch(&uri).map_err(|err| {
        log!("contact"; "{err}");
        MAIL_CLIENT_FAILED.to_owned()
    })
}

async fn post_to_relay(
    relay: &impl FormRelay,
    options: &ContactOptions,
    access_key: &str,
    fields: &ContactFields,
) -> Result<(), String> {
    let submission = Submission::new(
        access_key,
        fields,
        &options.subject_prefix,
        &options.from_name,
    );
    match relay.submit(&submission).await {
        Ok(reply) if reply.success => Ok(()),
        Ok(reply) => Err(reply
            .message
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE.to_owned())),
        Err(err) => {
            log!("contact"; "{err}");
            Err(NETWORK_FAILURE.to_owned())
        }
    }
}

/// The `Sending` phase of one submission.
///
/// Dropped without `finish` (the submit future was cancelled), it ends the
/// attempt with the network error.
struct Attempt<'a> {
    state: &'a Arc<watch::Sender<ContactState>>,
    reset: &'a mut Option<JoinHandle<()>>,
    finished: bool,
}

impl<'a> Attempt<'a> {
    fn start(
        state: &'a Arc<watch::Sender<ContactState>>,
        reset: &'a mut Option<JoinHandle<()>>,
    ) -> Self {
        debug_assert!(state.borrow().can_submit(), "overlapping submissions");
        if let Some(pending) = reset.take() {
            pending.abort();
        }
        state.send_modify(|state| {
            state.status = ContactStatus::Sending;
            state.error_message.clear();
        });
        Self {
            state,
            reset,
            finished: false,
        }
    }

    fn finish(mut self, outcome: Result<(), String>) -> ContactStatus {
        self.finished = true;
        self.conclude(outcome)
    }

    /// Apply the terminal status and arm the reset timer.
    fn conclude(&mut self, outcome: Result<(), String>) -> ContactStatus {
        self.state.send_modify(|state| match outcome {
            Ok(()) => {
                state.status = ContactStatus::Success;
                state.fields = ContactFields::default();
            }
            Err(message) => {
                state.status = ContactStatus::Error;
                state.error_message = message;
            }
        });

        if let Ok(runtime) = Handle::try_current() {
            let state = Arc::clone(self.state);
            *self.reset = Some(runtime.spawn(async move {
                tokio::time::sleep(RESET_DELAY).await;
                state.send_modify(|state| state.status = ContactStatus::Idle);
            }));
        }
        self.state.borrow().status
    }
}

impl Drop for Attempt<'_> {
    fn drop(&mut self) {
        if !self.finished {
            log!("contact"; "submission cancelled");
            self.conclude(Err(NETWORK_FAILURE.to_owned()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::{
        mailto::LaunchError,
        relay::{RelayError, RelayResponse},
    };
    use parking_lot::Mutex;
    use std::{cell::RefCell, rc::Rc};

    /// Lets a fake peek at the form while it is being called.
    #[derive(Clone, Default)]
    struct Peek(Rc<RefCell<Option<watch::Receiver<ContactState>>>>);

    impl Peek {
        fn attach(&self, rx: watch::Receiver<ContactState>) {
            *self.0.borrow_mut() = Some(rx);
        }

        fn state(&self) -> ContactState {
            self.0.borrow().as_ref().unwrap().borrow().clone()
        }
    }

    enum Reply {
        Answer(RelayResponse),
        Garbled,
        Silent,
    }

    struct FakeRelay {
        reply: Reply,
        peek: Peek,
        seen: Rc<RefCell<Vec<(Submission, ContactState)>>>,
    }

    impl FormRelay for FakeRelay {
        async fn submit(&self, submission: &Submission) -> Result<RelayResponse, RelayError> {
            self.seen
                .borrow_mut()
                .push((submission.clone(), self.peek.state()));
            match &self.reply {
                Reply::Answer(reply) => Ok(reply.clone()),
                Reply::Garbled => {
                    let err = serde_json::from_str::<RelayResponse>("<html>").unwrap_err();
                    Err(RelayError::Decode(err))
                }
                Reply::Silent => std::future::pending().await,
            }
        }
    }

    struct FakeLauncher {
        fail: bool,
        peek: Peek,
        seen: Arc<Mutex<Vec<(String, ContactState)>>>,
    }

    impl MailLauncher for FakeLauncher {
        fn launch(&self, uri: &str) -> Result<(), LaunchError> {
            self.seen.lock().push((uri.to_owned(), self.peek.state()));
            if self.fail {
                Err(LaunchError::Spawn(
                    "xdg-open",
                    std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
                ))
            } else {
                Ok(())
            }
        }
    }

    struct Harness {
        form: ContactForm<FakeRelay, FakeLauncher>,
        relay_calls: Rc<RefCell<Vec<(Submission, ContactState)>>>,
        launches: Arc<Mutex<Vec<(String, ContactState)>>>,
    }

    fn harness(access_key: Option<&str>, reply: Reply, launch_fails: bool) -> Harness {
        let peek = Peek::default();
        let relay_calls = Rc::new(RefCell::new(Vec::new()));
        let launches = Arc::new(Mutex::new(Vec::new()));
        let options = ContactOptions {
            recipient: "owner@example.com".into(),
            access_key: access_key.map(str::to_owned),
            subject_prefix: "Portfolio Contact: ".into(),
            from_name: "Portfolio Contact Form".into(),
        };
        let form = ContactForm::new(
            options,
            FakeRelay {
                reply,
                peek: peek.clone(),
                seen: Rc::clone(&relay_calls),
            },
            FakeLauncher {
                fail: launch_fails,
                peek: peek.clone(),
                seen: Arc::clone(&launches),
            },
        );
        peek.attach(form.subscribe());
        form.set_fields(jane());
        Harness {
            form,
            relay_calls,
            launches,
        }
    }

    fn jane() -> ContactFields {
        ContactFields {
            name: "Jane".into(),
            email: "jane@x.com".into(),
            subject: "Hi".into(),
            message: "Hello".into(),
        }
    }

    fn answer(success: bool, message: Option<&str>) -> Reply {
        Reply::Answer(RelayResponse {
            success,
            message: message.map(str::to_owned),
        })
    }

    async fn advance(duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_mailto_fallback_success() {
        let mut h = harness(None, answer(true, None), false);
        assert_eq!(h.form.status(), ContactStatus::Idle);

        let status = h.form.submit().await;
        assert_eq!(status, ContactStatus::Success);
        assert_eq!(h.form.state().fields, ContactFields::default());
        assert!(h.relay_calls.borrow().is_empty());

        let launches = h.launches.lock();
        assert_eq!(launches.len(), 1);
        let (uri, during) = &launches[0];
        assert_eq!(during.status, ContactStatus::Sending);
        assert!(!during.can_submit());
        assert!(uri.starts_with("mailto:owner@example.com?subject=Hi&body="));
        let body = urlencoding::decode(uri.split("body=").nth(1).unwrap()).unwrap();
        assert!(body.contains("Jane"));
        assert!(body.contains("jane@x.com"));
        assert!(body.contains("Hello"));
        drop(launches);

        advance(RESET_DELAY - Duration::from_millis(1)).await;
        assert_eq!(h.form.status(), ContactStatus::Success);
        advance(Duration::from_millis(2)).await;
        assert_eq!(h.form.status(), ContactStatus::Idle);
        assert!(h.form.can_submit());
    }

    #[tokio::test(start_paused = true)]
    async fn test_mailto_fallback_launch_failure() {
        let mut h = harness(None, answer(true, None), true);

        let status = h.form.submit().await;
        assert_eq!(status, ContactStatus::Error);
        let state = h.form.state();
        assert_eq!(state.error_message, MAIL_CLIENT_FAILED);
        assert_eq!(state.fields, jane());

        advance(RESET_DELAY + Duration::from_millis(1)).await;
        let state = h.form.state();
        assert_eq!(state.status, ContactStatus::Idle);
        assert_eq!(state.fields, jane());
    }

    #[tokio::test(start_paused = true)]
    async fn test_relay_success() {
        let mut h = harness(Some("key"), answer(true, None), false);

        let status = h.form.submit().await;
        assert_eq!(status, ContactStatus::Success);
        assert_eq!(h.form.state().fields, ContactFields::default());
        assert!(h.launches.lock().is_empty());

        let calls = h.relay_calls.borrow();
        let (submission, during) = &calls[0];
        assert_eq!(calls.len(), 1);
        assert_eq!(during.status, ContactStatus::Sending);
        assert_eq!(submission.access_key, "key");
        assert_eq!(submission.subject, "Portfolio Contact: Hi");
        assert_eq!(submission.from_name, "Portfolio Contact Form");
        assert_eq!(serde_json::to_value(submission).unwrap()["botcheck"], "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_relay_rejection_uses_service_message() {
        let mut h = harness(Some("key"), answer(false, Some("Spam detected")), false);

        let status = h.form.submit().await;
        assert_eq!(status, ContactStatus::Error);
        let state = h.form.state();
        assert_eq!(state.error_message, "Spam detected");
        assert_eq!(state.fields, jane());
    }

    #[tokio::test(start_paused = true)]
    async fn test_relay_rejection_without_message() {
        for message in [None, Some("")] {
            let mut h = harness(Some("key"), answer(false, message), false);
            h.form.submit().await;
            assert_eq!(h.form.state().error_message, GENERIC_FAILURE);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_relay_unreadable_reply() {
        let mut h = harness(Some("key"), Reply::Garbled, false);

        let status = h.form.submit().await;
        assert_eq!(status, ContactStatus::Error);
        let state = h.form.state();
        assert_eq!(state.error_message, NETWORK_FAILURE);
        assert_eq!(state.fields, jane());
    }

    #[tokio::test(start_paused = true)]
    async fn test_resubmit_clears_error_and_supersedes_timer() {
        let mut h = harness(Some("key"), answer(false, Some("Spam detected")), false);
        h.form.submit().await;

        advance(Duration::from_secs(3)).await;
        h.form.submit().await;
        assert_eq!(h.relay_calls.borrow()[1].1.error_message, "");

        // The first timer would have fired at 5s
        advance(Duration::from_secs(3)).await;
        assert_eq!(h.form.status(), ContactStatus::Error);

        advance(Duration::from_secs(2) + Duration::from_millis(1)).await;
        assert_eq!(h.form.status(), ContactStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transitions_are_observable() {
        let mut h = harness(Some("key"), answer(true, None), false);
        let mut rx = h.form.subscribe();
        rx.borrow_and_update();

        h.form.submit().await;
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().status, ContactStatus::Success);

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().status, ContactStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_submission_ends_in_error() {
        let mut h = harness(Some("key"), Reply::Silent, false);

        let result = tokio::time::timeout(Duration::from_secs(1), h.form.submit()).await;
        assert!(result.is_err());
        assert_eq!(h.relay_calls.borrow().len(), 1);

        let state = h.form.state();
        assert_eq!(state.status, ContactStatus::Error);
        assert_eq!(state.error_message, NETWORK_FAILURE);
        assert_eq!(state.fields, jane());
        assert!(h.form.can_submit());

        advance(RESET_DELAY + Duration::from_millis(1)).await;
        assert_eq!(h.form.status(), ContactStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_after_cancellation() {
        let mut h = harness(Some("key"), Reply::Silent, false);
        let _ = tokio::time::timeout(Duration::from_secs(1), h.form.submit()).await;

        h.form.set_fields(jane());
        let result = tokio::time::timeout(Duration::from_secs(1), h.form.submit()).await;
        assert!(result.is_err());
        assert_eq!(h.relay_calls.borrow().len(), 2);
        assert_eq!(h.relay_calls.borrow()[1].1.status, ContactStatus::Sending);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_reset() {
        let mut h = harness(None, answer(true, None), false);
        h.form.submit().await;
        let rx = h.form.subscribe();

        drop(h.form);
        advance(RESET_DELAY * 2).await;
        assert_eq!(rx.borrow().status, ContactStatus::Success);
    }

    #[test]
    fn test_can_submit_only_blocked_while_sending() {
        let mut state = ContactState::default();
        for (status, expected) in [
            (ContactStatus::Idle, true),
            (ContactStatus::Sending, false),
            (ContactStatus::Success, true),
            (ContactStatus::Error, true),
        ] {
            state.status = status;
            assert_eq!(state.can_submit(), expected, "{status}");
        }
    }

    #[test]
    fn test_status_display() {
        assert_eq!(ContactStatus::Sending.to_string(), "sending");
        assert_eq!(ContactStatus::Error.to_string(), "error");
    }
}
