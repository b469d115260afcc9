//! Account email rendering and delivery abstraction.
//!
//! Registration renders a welcome message carrying the verification link and
//! hands it to an [`EmailSender`]. Delivery is best-effort: the caller logs a
//! failed send and carries on. The default sender for local dev is
//! [`LogEmailSender`], which logs and returns `Ok(())`.

use anyhow::{Context as _, Result};
use tera::{Context, Tera};
use tracing::info;
use url::Url;

pub const WELCOME_SUBJECT: &str = "Welcome to JobStar!";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub display_name: String,
    pub html_body: String,
}

/// Email delivery abstraction used by registration.
pub trait EmailSender: Send + Sync {
    /// Deliver a message or return an error; callers treat errors as non-fatal.
    ///
    /// # Errors
    /// Returns an error when the message could not be handed off.
    fn send(&self, message: &EmailMessage) -> Result<()>;
}

/// Local dev sender that logs the message instead of sending real email.
#[derive(Clone, Debug)]
pub struct LogEmailSender;

impl EmailSender for LogEmailSender {
    fn send(&self, message: &EmailMessage) -> Result<()> {
        info!(
            to_email = %message.to,
            subject = %message.subject,
            display_name = %message.display_name,
            "email send stub"
        );
        Ok(())
    }
}

/// Build `{api_host_url}/api/v1/auth/verifyAccount?e=<email>&t=<token>`.
///
/// # Errors
/// Returns an error if `api_host_url` is not an absolute URL.
pub fn build_verify_link(api_host_url: &str, email: &str, token: &str) -> Result<Url> {
    let base = api_host_url.trim_end_matches('/');
    let mut url = Url::parse(&format!("{base}/api/v1/auth/verifyAccount"))
        .with_context(|| format!("Invalid API host URL: {api_host_url}"))?;
    url.query_pairs_mut()
        .append_pair("e", email)
        .append_pair("t", token);
    Ok(url)
}

const WELCOME_TEMPLATE_NAME: &str = "welcome.html";

// The `.html` name turns on Tera autoescaping for every interpolated value.
const WELCOME_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <style>
        body { font-family: Arial, sans-serif; background-color: #f4f4f4; margin: 0; padding: 0; color: #333333; }
        .container { width: 80%; margin: 0 auto; background-color: #ffffff; padding: 20px; border-radius: 10px; }
        h1 { color: #4CAF50; }
        p { line-height: 1.5; }
        .footer { margin-top: 20px; text-align: center; color: #777777; }
    </style>
    <title>{{ subject }}</title>
</head>
<body>
    <div class="container">
        <h1>Hello {{ name }},</h1>
        <p>Thank you for registering with JobStar! We're excited to have you on board.</p>
        <p>Please verify your account by clicking the following link:</p>
        <p><a href="{{ verify_link }}">Verify your account</a></p>
        <p>Best regards,</p>
        <p>The JobStar Team</p>
    </div>
    <div class="footer">
        <p>&copy; JobStar. All rights reserved.</p>
    </div>
</body>
</html>
"#;

/// Welcome message for a freshly registered identity.
///
/// # Errors
/// Returns an error if the template fails to render.
pub fn welcome_message(to: &str, first_name: &str, verify_link: &Url) -> Result<EmailMessage> {
    Ok(EmailMessage {
        to: to.to_string(),
        subject: WELCOME_SUBJECT.to_string(),
        display_name: first_name.to_string(),
        html_body: render_welcome(WELCOME_SUBJECT, first_name, verify_link)?,
    })
}

/// Render the JobStar welcome layout with `name`, `subject` and
/// `verify_link` in the context.
///
/// # Errors
/// Returns an error if the template cannot be parsed or rendered.
pub fn render_welcome(subject: &str, name: &str, verify_link: &Url) -> Result<String> {
    let mut tera = Tera::default();
    tera.add_raw_template(WELCOME_TEMPLATE_NAME, WELCOME_TEMPLATE)
        .context("Failed to parse welcome email template")?;

    let mut context = Context::new();
    context.insert("subject", subject);
    context.insert("name", name);
    context.insert("verify_link", verify_link.as_str());

    tera.render(WELCOME_TEMPLATE_NAME, &context)
        .context("Failed to render welcome email")
}
