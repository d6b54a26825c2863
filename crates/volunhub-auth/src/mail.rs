//! Outbound mail
//!
//! Email delivery abstraction used by the OTP flows. The sender decides
//! how to deliver and returns `Ok`/`Err`; dispatch is fire-and-await with
//! no retry, and a failure propagates to the caller.

use async_trait::async_trait;

use crate::config::MailConfig;
use crate::error::{AuthError, AuthResult};
use crate::otp::OtpPurpose;

/// A plain-text email.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Compose the delivery message for a freshly issued one-time code.
pub fn otp_email(to: &str, purpose: OtpPurpose, code: &str, ttl: std::time::Duration) -> EmailMessage {
    let minutes = ttl.as_secs() / 60;
    let (subject, body) = match purpose {
        OtpPurpose::Login => (
            "Your OTP Code",
            format!("Your OTP is: {code}. It will expire in {minutes} minutes"),
        ),
        OtpPurpose::PasswordReset => (
            "Reset Password OTP",
            format!("Reset OTP is: {code}. It will expire in {minutes} minutes"),
        ),
    };

    EmailMessage {
        to: to.to_string(),
        subject: subject.to_string(),
        body,
    }
}

/// Email delivery abstraction.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Deliver a message or return an error.
    async fn send(&self, message: &EmailMessage) -> AuthResult<()>;
}

/// Local dev sender that logs the payload instead of sending real email.
#[derive(Clone, Debug, Default)]
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, message: &EmailMessage) -> AuthResult<()> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            "mail send stub"
        );
        Ok(())
    }
}

/// Sender that posts JSON to an HTTP mail API with bearer authentication.
///
/// Credentials are construction inputs; nothing is read from the
/// environment here.
pub struct HttpEmailSender {
    client: reqwest::Client,
    endpoint: String,
    token: String,
    from: String,
}

impl HttpEmailSender {
    /// Build a sender from mail configuration. Fails if the endpoint or
    /// token is missing.
    pub fn from_config(config: &MailConfig) -> AuthResult<Self> {
        let endpoint = config
            .api_url
            .clone()
            .ok_or_else(|| AuthError::Internal("Mail API URL not configured".into()))?;
        let token = config
            .api_token
            .clone()
            .ok_or_else(|| AuthError::Internal("Mail API token not configured".into()))?;

        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
            token,
            from: config.from_address.clone(),
        })
    }
}

#[async_trait]
impl EmailSender for HttpEmailSender {
    async fn send(&self, message: &EmailMessage) -> AuthResult<()> {
        let payload = serde_json::json!({
            "from": self.from,
            "to": message.to,
            "subject": message.subject,
            "text": message.body,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AuthError::Mail(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::Mail(format!(
                "mail API returned {}",
                response.status()
            )));
        }

        Ok(())
    }
}

/// Test sender that records every message so assertions can read the
/// delivered codes.
#[cfg(any(test, feature = "mock"))]
#[derive(Clone, Default)]
pub struct CapturingEmailSender {
    sent: std::sync::Arc<std::sync::Mutex<Vec<EmailMessage>>>,
    fail: std::sync::Arc<std::sync::atomic::AtomicBool>,
}

#[cfg(any(test, feature = "mock"))]
impl CapturingEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages sent so far.
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().expect("mail mutex poisoned").clone()
    }

    /// The most recent message.
    pub fn last(&self) -> Option<EmailMessage> {
        self.sent().last().cloned()
    }

    /// Make subsequent sends fail.
    pub fn fail_next(&self, fail: bool) {
        self.fail.store(fail, std::sync::atomic::Ordering::SeqCst);
    }

    /// Extract the 6-digit code from the most recent message body.
    pub fn last_code(&self) -> Option<String> {
        let message = self.last()?;
        message
            .body
            .split_whitespace()
            .map(|word| word.trim_end_matches('.'))
            .find(|word| word.len() == 6 && word.chars().all(|c| c.is_ascii_digit()))
            .map(str::to_string)
    }
}

#[cfg(any(test, feature = "mock"))]
#[async_trait]
impl EmailSender for CapturingEmailSender {
    async fn send(&self, message: &EmailMessage) -> AuthResult<()> {
        if self.fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(AuthError::Mail("capturing sender set to fail".into()));
        }
        self.sent
            .lock()
            .expect("mail mutex poisoned")
            .push(message.clone());
        Ok(())
    }
}
