use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, trace};

const RESEND_API_URL: &str = "https://api.resend.com/emails";

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("Email transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Email provider rejected the message with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("Mailer is not configured: {0}")]
    NotConfigured(String),
}

/// Outbound email delivery seam.
///
/// Handlers talk to this trait so tests can record sends without network
/// access and deployments without an API key can still boot.
#[async_trait]
pub trait Mailer: Send + Sync + std::fmt::Debug {
    async fn send(&self, to: &[String], subject: &str, html: &str) -> Result<(), MailerError>;
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    html: &'a str,
}

/// Delivers email through the Resend HTTP API.
pub struct ResendMailer {
    client: reqwest::Client,
    api_key: String,
    from: String,
}

impl ResendMailer {
    pub fn new(api_key: String, from: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            from,
        }
    }
}

// The API key stays out of log output.
impl std::fmt::Debug for ResendMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResendMailer")
            .field("from", &self.from)
            .finish()
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, to: &[String], subject: &str, html: &str) -> Result<(), MailerError> {
        trace!("Sending email to {} recipient(s)", to.len());

        let request = SendEmailRequest {
            from: &self.from,
            to,
            subject,
            html,
        };

        let response = self
            .client
            .post(RESEND_API_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Email provider rejected the message: {} {}", status, body);
            return Err(MailerError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!("Email accepted by provider for {} recipient(s)", to.len());
        Ok(())
    }
}

/// Stand-in used when no mail API key is configured. Every send fails with
/// [`MailerError::NotConfigured`].
#[derive(Debug)]
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    async fn send(&self, _to: &[String], _subject: &str, _html: &str) -> Result<(), MailerError> {
        Err(MailerError::NotConfigured(
            "MAIL_API_KEY is not set".to_string(),
        ))
    }
}
