//! Email delivery service (verification mail).

use civita_common::config::EmailConfig;
use civita_common::{AppError, AppResult};
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// Email service for outgoing mail.
///
/// When mail is disabled in configuration the service logs the message
/// instead of sending it, so development setups work without an SMTP relay.
#[derive(Clone)]
pub struct EmailService {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from_address: String,
    server_url: String,
}

impl EmailService {
    /// Create a new email service.
    pub fn new(config: &EmailConfig, server_url: String) -> AppResult<Self> {
        let transport = if config.enabled {
            let mut builder =
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                    .map_err(|e| AppError::Email(e.to_string()))?
                    .port(config.smtp_port);

            if let (Some(username), Some(password)) = (&config.username, &config.password) {
                builder = builder.credentials(Credentials::new(
                    username.clone(),
                    password.clone(),
                ));
            }

            Some(builder.build())
        } else {
            None
        };

        Ok(Self {
            transport,
            from_address: config.from_address.clone(),
            server_url,
        })
    }

    /// Send an email verification link.
    pub async fn send_verification(
        &self,
        to: &str,
        username: &str,
        token: &str,
    ) -> AppResult<()> {
        let link = format!(
            "{}/verify-email?token={}",
            self.server_url.trim_end_matches('/'),
            urlencoding::encode(token)
        );
        let body = format!(
            "Hello {username},\n\n\
             Please verify your email address by opening the link below:\n\n\
             {link}\n\n\
             The link expires in 24 hours. If you did not create this \
             account, you can ignore this message.\n"
        );

        self.send(to, "Verify your email address", &body).await
    }

    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        let Some(transport) = &self.transport else {
            tracing::info!(to = to, subject = subject, "Email disabled, logging instead");
            tracing::debug!(body = body, "Email body");
            return Ok(());
        };

        let message = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|e| AppError::Email(format!("Invalid from address: {e}")))?,
            )
            .to(to
                .parse()
                .map_err(|e| AppError::Email(format!("Invalid recipient: {e}")))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| AppError::Email(e.to_string()))?;

        transport
            .send(message)
            .await
            .map_err(|e| AppError::Email(e.to_string()))?;

        Ok(())
    }
}
