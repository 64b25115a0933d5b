use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::{
    app_error::{AppError, AppResult},
    use_cases::auth::{MailTemplate, Mailer},
};

/// Delivers through the Resend HTTP API. The core never sees delivery
/// internals; a failed send surfaces as an error the caller converts to
/// `false`.
#[derive(Clone)]
pub struct ResendMailer {
    client: Client,
    api_key: SecretString,
    from: String,
}

impl ResendMailer {
    pub fn new(api_key: SecretString, from: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            from,
        }
    }
}

#[derive(Serialize)]
struct ResendReq<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

fn render(template: MailTemplate, recipient_name: &str, link: &str) -> (&'static str, String) {
    match template {
        MailTemplate::Verification => (
            "Verify your email",
            format!(
                "<p>Hi {recipient_name},</p>\
                 <p>Confirm your email address to finish signing up. \
                 This link expires in five minutes.</p>\
                 <a href=\"{link}\">Verify email</a>"
            ),
        ),
        MailTemplate::PasswordReset => (
            "Reset your password",
            format!(
                "<p>Hi {recipient_name},</p>\
                 <p>We received a request to reset your password. \
                 This link expires in five minutes.</p>\
                 <a href=\"{link}\">Reset password</a>"
            ),
        ),
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(
        &self,
        to: &str,
        template: MailTemplate,
        recipient_name: &str,
        link: &str,
    ) -> AppResult<()> {
        let (subject, html) = render(template, recipient_name, link);
        let body = ResendReq {
            from: &self.from,
            to: [to],
            subject,
            html: &html,
        };
        self.client
            .post("https://api.resend.com/emails")
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
            .error_for_status()
            .map_err(|e| AppError::Internal(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_embed_name_and_link() {
        let (subject, html) = render(MailTemplate::Verification, "Ada", "http://x/verify/t");
        assert_eq!(subject, "Verify your email");
        assert!(html.contains("Hi Ada"));
        assert!(html.contains("http://x/verify/t"));

        let (subject, html) = render(MailTemplate::PasswordReset, "Ada", "http://x/reset/t");
        assert_eq!(subject, "Reset your password");
        assert!(html.contains("http://x/reset/t"));
    }
}
