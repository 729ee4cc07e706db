// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::services::logging::anonymize_email;
use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::env;

/// Configuration for the SMTP mailer.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub smtp_tls: bool,
    pub from_email: String,
    pub from_name: String,
}

impl EmailConfig {
    /// Load email configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            smtp_host: env::var("SMTP_HOST").context("SMTP_HOST must be set")?,
            smtp_port: env::var("SMTP_PORT")
                .unwrap_or_else(|_| "587".to_string())
                .parse()
                .context("SMTP_PORT must be a valid port number")?,
            smtp_username: env::var("SMTP_USERNAME").context("SMTP_USERNAME must be set")?,
            smtp_password: env::var("SMTP_PASSWORD").context("SMTP_PASSWORD must be set")?,
            smtp_tls: env::var("SMTP_TLS").map(|v| v == "true").unwrap_or(true),
            from_email: env::var("SMTP_FROM_EMAIL").context("SMTP_FROM_EMAIL must be set")?,
            from_name: env::var("SMTP_FROM_NAME").unwrap_or_else(|_| "Movie Master".to_string()),
        })
    }
}

/// Email template with simple variable substitution.
struct EmailTemplate {
    content: &'static str,
}

impl EmailTemplate {
    const fn new(content: &'static str) -> Self {
        Self { content }
    }

    fn render(&self, vars: &[(&str, &str)]) -> String {
        let mut result = self.content.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }
}

const PASSWORD_RESET_TEMPLATE: EmailTemplate =
    EmailTemplate::new(include_str!("../../templates/emails/password_reset.html"));

pub const PASSWORD_RESET_SUBJECT: &str = "Movie Master Password Reset Link";

/// Escape text for HTML element content and quoted attributes.
fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// HTML body of the password reset email. User-supplied values are escaped.
pub fn render_password_reset(username: &str, reset_link: &str, expiry_minutes: i64) -> String {
    let username = escape_html(username);
    let reset_link = escape_html(reset_link);
    let expiry = expiry_minutes.to_string();
    PASSWORD_RESET_TEMPLATE.render(&[
        ("username", username.as_str()),
        ("reset_link", reset_link.as_str()),
        ("expiry_minutes", expiry.as_str()),
    ])
}

/// Outgoing mail transport.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<()>;
}

/// Sends mail through an SMTP relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_mailbox: Mailbox,
}

impl SmtpMailer {
    /// Create a new SMTP mailer with the given configuration.
    pub fn new(config: &EmailConfig) -> Result<Self> {
        let creds = Credentials::new(config.smtp_username.clone(), config.smtp_password.clone());

        let transport = if config.smtp_tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
                .context("Failed to create SMTP relay")?
                .port(config.smtp_port)
                .credentials(creds)
                .build()
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
                .port(config.smtp_port)
                .credentials(creds)
                .build()
        };

        let from_mailbox: Mailbox = format!("{} <{}>", config.from_name, config.from_email)
            .parse()
            .context("Invalid from email address")?;

        Ok(Self {
            transport,
            from_mailbox,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<()> {
        let to_mailbox: Mailbox = to.parse().context("Invalid recipient email address")?;

        let email = Message::builder()
            .from(self.from_mailbox.clone())
            .to(to_mailbox)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .context("Failed to build email message")?;

        self.transport
            .send(email)
            .await
            .context("Failed to send email")?;

        tracing::info!(to = %anonymize_email(to), subject, "Email sent");
        Ok(())
    }
}

/// Logs outgoing mail instead of sending it. Used when SMTP is not configured.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<()> {
        tracing::warn!(
            to = %anonymize_email(to),
            subject,
            body_len = html_body.len(),
            "SMTP not configured, email not sent"
        );
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_render() {
        let template = EmailTemplate::new("Hello {{name}}, your code is {{code}}.");
        let result = template.render(&[("name", "Alice"), ("code", "12345")]);
        assert_eq!(result, "Hello Alice, your code is 12345.");
    }

    #[test]
    fn test_template_render_missing_var() {
        let template = EmailTemplate::new("Hello {{name}}, welcome!");
        let result = template.render(&[]);
        assert_eq!(result, "Hello {{name}}, welcome!");
    }

    #[test]
    fn test_password_reset_template_loads() {
        let result = render_password_reset(
            "alice",
            "http://localhost:5173/signin/password/reset?passwordResetToken=abc",
            15,
        );
        assert!(result.contains("Hello alice"));
        assert!(result.contains("passwordResetToken=abc"));
        assert!(result.contains("only valid for 15 minutes"));
        assert!(!result.contains("{{"));
    }

    #[test]
    fn test_password_reset_escapes_username() {
        let result = render_password_reset(
            "<a href=\"http://evil.test\">x</a>",
            "http://localhost:5173/signin/password/reset?passwordResetToken=abc",
            15,
        );
        assert!(!result.contains("<a href=\"http://evil.test\">"));
        assert!(result.contains("&lt;a href=&quot;http://evil.test&quot;&gt;x&lt;/a&gt;"));
        assert!(result.contains("passwordResetToken=abc"));
    }

    #[tokio::test]
    async fn test_log_mailer_accepts_mail() {
        assert!(LogMailer
            .send("alice@example.com", "subject", "<p>body</p>")
            .await
            .is_ok());
    }
}
