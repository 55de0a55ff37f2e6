// ============================================================================
// LMS Infrastructure - SMTP Notifier
// File: crates/lms-infrastructure/src/mail/smtp_notifier.rs
// ============================================================================

use async_trait::async_trait;
use handlebars::Handlebars;
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials, AsyncSmtpTransport,
    AsyncTransport, Message, Tokio1Executor,
};
use serde_json::json;
use tracing::info;

use lms_core::domain::User;
use lms_core::error::DomainError;
use lms_core::ports::Notifier;
use lms_shared::config::MailSettings;
use lms_shared::utils::mask_email;

const WELCOME: &str = "welcome";
const INSTRUCTOR_INVITE: &str = "instructor_invite";

/// Renders the mail bodies shared by every notifier.
pub(crate) struct MailTemplates {
    registry: Handlebars<'static>,
    app_name: String,
    login_url: String,
}

impl MailTemplates {
    pub(crate) fn new(app_name: &str, login_url: &str) -> Result<Self, DomainError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry
            .register_template_string(WELCOME, include_str!("templates/welcome.hbs"))
            .map_err(|e| DomainError::InternalError(format!("Mail template: {}", e)))?;
        registry
            .register_template_string(INSTRUCTOR_INVITE, include_str!("templates/instructor_invite.hbs"))
            .map_err(|e| DomainError::InternalError(format!("Mail template: {}", e)))?;

        Ok(Self {
            registry,
            app_name: app_name.to_string(),
            login_url: login_url.to_string(),
        })
    }

    pub(crate) fn render(&self, template: &str, user: &User) -> Result<String, DomainError> {
        let data = json!({
            "name": user.display_name,
            "email": user.email,
            "app_name": self.app_name,
            "login_url": self.login_url,
        });
        self.registry
            .render(template, &data)
            .map_err(|e| DomainError::InternalError(format!("Mail render: {}", e)))
    }
}

pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
    templates: MailTemplates,
}

impl SmtpNotifier {
    pub fn new(settings: &MailSettings, app_name: &str) -> Result<Self, DomainError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.smtp_host)
            .map_err(|e| DomainError::InternalError(format!("SMTP relay error: {}", e)))?
            .port(settings.smtp_port);

        if let (Some(user), Some(pass)) = (&settings.smtp_username, &settings.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from: settings.from_address.clone(),
            templates: MailTemplates::new(app_name, &settings.login_url)?,
        })
    }

    async fn send(&self, user: &User, subject: &str, template: &str) -> Result<(), DomainError> {
        let body = self.templates.render(template, user)?;
        let message = Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|e| DomainError::InternalError(format!("Invalid from address: {}", e)))?,
            )
            .to(user
                .email
                .parse()
                .map_err(|e| DomainError::validation(format!("Invalid recipient: {}", e)))?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(body)
            .map_err(|e| DomainError::InternalError(format!("Failed to build email: {}", e)))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| DomainError::InternalError(format!("SMTP send failed: {}", e)))?;

        info!("Sent '{}' mail to {}", template, mask_email(&user.email));
        Ok(())
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send_welcome(&self, user: &User) -> Result<(), DomainError> {
        self.send(user, "Welcome aboard", WELCOME).await
    }

    async fn send_instructor_invite(&self, user: &User) -> Result<(), DomainError> {
        self.send(user, "You're invited to teach", INSTRUCTOR_INVITE).await
    }
}

/// Used when mail is disabled: renders the message and logs it instead.
pub struct LogNotifier {
    templates: MailTemplates,
}

impl LogNotifier {
    pub fn new(settings: &MailSettings, app_name: &str) -> Result<Self, DomainError> {
        Ok(Self {
            templates: MailTemplates::new(app_name, &settings.login_url)?,
        })
    }

    fn log(&self, user: &User, template: &str) -> Result<(), DomainError> {
        let body = self.templates.render(template, user)?;
        info!(
            "Mail disabled, skipping '{}' to {} ({} bytes)",
            template,
            mask_email(&user.email),
            body.len()
        );
        Ok(())
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_welcome(&self, user: &User) -> Result<(), DomainError> {
        self.log(user, WELCOME)
    }

    async fn send_instructor_invite(&self, user: &User) -> Result<(), DomainError> {
        self.log(user, INSTRUCTOR_INVITE)
    }
}
