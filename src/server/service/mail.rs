//! Transactional email over an HTTP mail API.

use std::sync::Arc;

use serde::Serialize;

use crate::server::{
    config::Config,
    error::mail::MailError,
    util::template::{html_to_text, render},
};

const FORGOT_PASSWORD_TEMPLATE: &str =
    include_str!("../../../templates/email/forgot_password.html");
const RESET_PASSWORD_TEMPLATE: &str = include_str!("../../../templates/email/reset_password.html");

#[derive(Serialize)]
struct SendEmail<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

#[derive(Clone)]
pub struct Mailer {
    http: reqwest::Client,
    api_url: Arc<str>,
    api_key: Arc<str>,
    from: Arc<str>,
}

impl Mailer {
    pub fn new(api_url: &str, api_key: &str, from: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.into(),
            api_key: api_key.into(),
            from: from.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.mail_api_url, &config.mail_api_key, &config.mail_from)
    }

    /// Sends an HTML email with its plain text alternative
    pub async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailError> {
        let text = html_to_text(html);
        if text.is_empty() {
            return Err(MailError::EmptyBody(subject.to_string()));
        }

        let response = self
            .http
            .post(self.api_url.as_ref())
            .bearer_auth(self.api_key.as_ref())
            .json(&SendEmail {
                from: &self.from,
                to: [to],
                subject,
                html,
                text: &text,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            return Err(MailError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!("Mail \"{}\" sent", subject);

        Ok(())
    }

    /// Sends the link that issues a new password
    pub async fn send_forgot_password(
        &self,
        to: &str,
        name: &str,
        link: &str,
    ) -> Result<(), MailError> {
        let html = render(
            FORGOT_PASSWORD_TEMPLATE,
            &[("Name", name), ("Email", to), ("Link", link)],
        );

        self.send(to, "Forgot Password for CleanCare", &html).await
    }

    /// Sends a newly generated password
    pub async fn send_reset_password(
        &self,
        to: &str,
        name: &str,
        reset_by: &str,
        password: &str,
    ) -> Result<(), MailError> {
        let html = render(
            RESET_PASSWORD_TEMPLATE,
            &[
                ("Name", name),
                ("ResetBy", reset_by),
                ("Account", to),
                ("Password", password),
            ],
        );

        self.send(to, "Reset Password for CleanCare", &html).await
    }
}
