//! Submission lifecycle of the contact form.
//!
//! ```text
//! idle -> submitting -> success | error -> idle
//! ```
//!
//! A terminal status falls back to idle after a fixed delay. Only one
//! submission can be in flight at a time and the draft cannot be edited while
//! it is.

use std::{future::Future, sync::Arc, time::Duration};

use portfolio_di::Build;
use portfolio_extern_contracts::contact::ContactRelayApiService;
use portfolio_models::contact::ContactDraft;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, warn};

pub const SUCCESS_BANNER: &str = "Message sent successfully! I'll get back to you soon.";
pub const ERROR_BANNER: &str = "Something went wrong. Please try again or reach out via email.";

pub trait ContactFormService: Send + Sync + 'static {
    /// The current contents of the form.
    fn draft(&self) -> ContactDraft;

    /// Replace the value of a single field.
    fn update_field(
        &self,
        field: ContactFormField,
        value: String,
    ) -> Result<(), ContactFormUpdateError>;

    fn status(&self) -> SubmissionStatus;

    /// Watch the form for changes of its draft and status.
    fn subscribe(&self) -> watch::Receiver<ContactFormState>;

    /// Whether a submission is in flight, i.e. inputs should be disabled and
    /// a busy indicator shown.
    fn is_busy(&self) -> bool {
        self.status() == SubmissionStatus::Submitting
    }

    /// The status message to display, if any.
    fn banner(&self) -> Option<&'static str> {
        self.status().banner()
    }

    /// Submit the current draft to the contact relay and return the terminal
    /// status of the submission.
    fn submit(
        &self,
    ) -> impl Future<Output = Result<SubmissionStatus, ContactFormSubmitError>> + Send;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Success,
    Error,
}

impl SubmissionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }

    pub fn banner(self) -> Option<&'static str> {
        match self {
            Self::Idle | Self::Submitting => None,
            Self::Success => Some(SUCCESS_BANNER),
            Self::Error => Some(ERROR_BANNER),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactFormField {
    Name,
    Email,
    Message,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFormState {
    pub draft: ContactDraft,
    pub status: SubmissionStatus,
    /// Incremented on every submission, so that reset timers of earlier
    /// submissions can be told apart.
    submission: u64,
}

#[derive(Debug, Error)]
pub enum ContactFormSubmitError {
    #[error("A submission is already in progress.")]
    Busy,
    #[error("All fields are required.")]
    Incomplete,
}

#[derive(Debug, Error)]
pub enum ContactFormUpdateError {
    #[error("The form cannot be edited while a submission is in progress.")]
    Busy,
}

#[derive(Debug, Clone, Build)]
pub struct ContactFormImpl<Relay> {
    relay: Relay,
    config: ContactFormConfig,
    #[state]
    state: Arc<State>,
}

#[derive(Debug, Clone)]
pub struct ContactFormConfig {
    pub status_reset_delay: Duration,
}

#[derive(Debug)]
struct State {
    form: watch::Sender<ContactFormState>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            form: watch::Sender::new(Default::default()),
        }
    }
}

impl<Relay> ContactFormService for ContactFormImpl<Relay>
where
    Relay: ContactRelayApiService,
{
    fn draft(&self) -> ContactDraft {
        self.state.form.borrow().draft.clone()
    }

    fn update_field(
        &self,
        field: ContactFormField,
        value: String,
    ) -> Result<(), ContactFormUpdateError> {
        let mut busy = false;
        self.state.form.send_if_modified(|form| {
            if form.status == SubmissionStatus::Submitting {
                busy = true;
                return false;
            }

            let target = match field {
                ContactFormField::Name => &mut form.draft.name,
                ContactFormField::Email => &mut form.draft.email,
                ContactFormField::Message => &mut form.draft.message,
            };
            if *target == value {
                return false;
            }
            *target = value;
            true
        });

        if busy {
            return Err(ContactFormUpdateError::Busy);
        }
        Ok(())
    }

    fn status(&self) -> SubmissionStatus {
        self.state.form.borrow().status
    }

    fn subscribe(&self) -> watch::Receiver<ContactFormState> {
        self.state.form.subscribe()
    }

    async fn submit(&self) -> Result<SubmissionStatus, ContactFormSubmitError> {
        let mut started = Err(ContactFormSubmitError::Busy);
        self.state.form.send_if_modified(|form| {
            if form.status == SubmissionStatus::Submitting {
                return false;
            }
            if !form.draft.is_complete() {
                started = Err(ContactFormSubmitError::Incomplete);
                return false;
            }

            form.status = SubmissionStatus::Submitting;
            form.submission += 1;
            started = Ok((form.draft.clone(), form.submission));
            true
        });
        let (draft, submission) = started?;

        let status = match self.relay.send_message(draft).await {
            Ok(response) => {
                info!(id = %response.id, "Contact message has been sent");
                SubmissionStatus::Success
            }
            Err(err) => {
                warn!("Failed to send contact message: {err}");
                SubmissionStatus::Error
            }
        };

        self.state.form.send_modify(|form| {
            form.status = status;
            if status == SubmissionStatus::Success {
                form.draft = Default::default();
            }
        });

        self.schedule_reset(submission);

        Ok(status)
    }
}

impl<Relay> ContactFormImpl<Relay> {
    fn schedule_reset(&self, submission: u64) {
        let state = Arc::clone(&self.state);
        let delay = self.config.status_reset_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            state.form.send_if_modified(|form| {
                if form.submission != submission || !form.status.is_terminal() {
                    return false;
                }
                form.status = SubmissionStatus::Idle;
                true
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use portfolio_extern_contracts::contact::{
        ContactRelayError, ContactRelayResponse, MockContactRelayApiService,
    };
    use portfolio_utils::assert_matches;
    use pretty_assertions::assert_eq;
    use tokio::time::Instant;

    use super::*;

    const DELAY: Duration = Duration::from_secs(5);

    #[tokio::test(start_paused = true)]
    async fn success() {
        // Arrange
        let relay = MockContactRelayApiService::new()
            .with_send_message(make_draft(), Ok(make_response()));
        let sut = make_sut(relay);
        fill(&sut);
        let mut rx = sut.subscribe();

        // Act
        let result = sut.submit().await;

        // Assert
        assert_eq!(result.unwrap(), SubmissionStatus::Success);
        assert_eq!(sut.status(), SubmissionStatus::Success);
        assert_eq!(sut.banner(), Some(SUCCESS_BANNER));
        assert_eq!(sut.draft(), ContactDraft::default());
        assert!(!sut.is_busy());

        let finished = Instant::now();
        rx.wait_for(|x| x.status == SubmissionStatus::Idle)
            .await
            .unwrap();
        assert!(finished.elapsed() >= DELAY);
        assert_eq!(sut.banner(), None);
        assert_eq!(sut.draft(), ContactDraft::default());
    }

    #[tokio::test(start_paused = true)]
    async fn error() {
        // Arrange
        let relay = MockContactRelayApiService::new().with_send_message(
            make_draft(),
            Err(ContactRelayError::Rejected {
                status: 500,
                error: "Failed to send email".into(),
            }),
        );
        let sut = make_sut(relay);
        fill(&sut);
        let mut rx = sut.subscribe();

        // Act
        let result = sut.submit().await;

        // Assert
        assert_eq!(result.unwrap(), SubmissionStatus::Error);
        assert_eq!(sut.banner(), Some(ERROR_BANNER));
        assert_eq!(sut.draft(), make_draft());

        let finished = Instant::now();
        rx.wait_for(|x| x.status == SubmissionStatus::Idle)
            .await
            .unwrap();
        assert!(finished.elapsed() >= DELAY);
        assert_eq!(sut.banner(), None);
        assert_eq!(sut.draft(), make_draft());
    }

    #[tokio::test(start_paused = true)]
    async fn incomplete() {
        // Arrange
        let sut = make_sut(MockContactRelayApiService::new());
        sut.update_field(ContactFormField::Name, "Jane Doe".into())
            .unwrap();
        sut.update_field(ContactFormField::Email, "jane@example.com".into())
            .unwrap();

        // Act
        let result = sut.submit().await;

        // Assert
        assert_matches!(result, Err(ContactFormSubmitError::Incomplete));
        assert_eq!(sut.status(), SubmissionStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn no_email_syntax_check() {
        // Arrange
        let draft = ContactDraft {
            email: "not-an-email".into(),
            ..make_draft()
        };
        let relay = MockContactRelayApiService::new().with_send_message(
            draft.clone(),
            Err(ContactRelayError::Rejected {
                status: 400,
                error: "Invalid email format".into(),
            }),
        );
        let sut = make_sut(relay);
        fill(&sut);
        sut.update_field(ContactFormField::Email, draft.email.clone())
            .unwrap();

        // Act
        let result = sut.submit().await;

        // Assert
        assert_eq!(result.unwrap(), SubmissionStatus::Error);
        assert_eq!(sut.banner(), Some(ERROR_BANNER));
    }

    #[tokio::test(start_paused = true)]
    async fn double_submit() {
        // Arrange
        let sut = make_sut(slow_relay(Duration::from_secs(1), Ok(make_response())));
        fill(&sut);

        // Act
        let (first, second) = tokio::join!(sut.submit(), sut.submit());

        // Assert
        assert_eq!(first.unwrap(), SubmissionStatus::Success);
        assert_matches!(second, Err(ContactFormSubmitError::Busy));
    }

    #[tokio::test(start_paused = true)]
    async fn update_while_submitting() {
        // Arrange
        let sut = make_sut(slow_relay(Duration::from_secs(1), Ok(make_response())));
        fill(&sut);

        // Act
        let (submitted, updated) = tokio::join!(sut.submit(), async {
            assert!(sut.is_busy());
            sut.update_field(ContactFormField::Message, "Changed".into())
        });

        // Assert
        assert_eq!(submitted.unwrap(), SubmissionStatus::Success);
        assert_matches!(updated, Err(ContactFormUpdateError::Busy));
        assert_eq!(sut.draft(), ContactDraft::default());
    }

    #[tokio::test(start_paused = true)]
    async fn stale_reset_does_not_affect_newer_submission() {
        // Arrange
        let mut relay = MockContactRelayApiService::new();
        relay
            .expect_send_message()
            .times(2)
            .returning(|_| {
                let result: Result<ContactRelayResponse, _> =
                    Err(ContactRelayError::Other(anyhow::anyhow!("offline")));
                Box::pin(std::future::ready(result))
            });
        let sut = make_sut(relay);
        fill(&sut);

        assert_eq!(sut.submit().await.unwrap(), SubmissionStatus::Error);
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(sut.submit().await.unwrap(), SubmissionStatus::Error);
        let second_finished = Instant::now();
        let mut rx = sut.subscribe();

        // Act
        tokio::time::sleep(Duration::from_secs(3)).await;

        // Assert
        assert_eq!(sut.status(), SubmissionStatus::Error);
        rx.wait_for(|x| x.status == SubmissionStatus::Idle)
            .await
            .unwrap();
        assert!(second_finished.elapsed() >= DELAY);
    }

    fn make_sut(relay: MockContactRelayApiService) -> ContactFormImpl<MockContactRelayApiService> {
        ContactFormImpl {
            relay,
            config: ContactFormConfig {
                status_reset_delay: DELAY,
            },
            state: Default::default(),
        }
    }

    fn slow_relay(
        delay: Duration,
        result: Result<ContactRelayResponse, ContactRelayError>,
    ) -> MockContactRelayApiService {
        let mut relay = MockContactRelayApiService::new();
        relay
            .expect_send_message()
            .once()
            .withf(|draft| *draft == make_draft())
            .return_once(move |_| {
                Box::pin(async move {
                    tokio::time::sleep(delay).await;
                    result
                })
            });
        relay
    }

    fn fill(sut: &ContactFormImpl<MockContactRelayApiService>) {
        let ContactDraft {
            name,
            email,
            message,
        } = make_draft();
        sut.update_field(ContactFormField::Name, name).unwrap();
        sut.update_field(ContactFormField::Email, email).unwrap();
        sut.update_field(ContactFormField::Message, message)
            .unwrap();
    }

    fn make_draft() -> ContactDraft {
        ContactDraft {
            name: "Jane Doe".into(),
            email: "jane@example.com".into(),
            message: "Hello\nWorld".into(),
        }
    }

    fn make_response() -> ContactRelayResponse {
        ContactRelayResponse {
            message: "Email sent successfully".into(),
            id: "msg_123".to_owned().into(),
        }
    }
}
