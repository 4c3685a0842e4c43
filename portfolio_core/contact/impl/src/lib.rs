use std::{net::IpAddr, sync::Arc};

use anyhow::{ensure, Context};
use portfolio_core_contact_contracts::{ContactService, ContactSubmitError};
use portfolio_email_contracts::{Email, EmailBody, EmailService};
use portfolio_models::{
    contact::{ContactSubmission, ContactSubmissionDraft},
    email_address::{EmailAddress, EmailAddressWithName},
};
use portfolio_shared_contracts::{
    rate_limit::{RateLimitDecision, RateLimitService},
    time::TimeService,
};
use portfolio_templates_contracts::{AutoReplyTemplate, OwnerNotificationTemplate, TemplateService};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct ContactServiceImpl<RateLimit, Time, Email, Template> {
    rate_limit: RateLimit,
    time: Time,
    email: Email,
    template: Template,
    config: ContactServiceConfig,
}

#[derive(Debug, Clone)]
pub struct ContactServiceConfig {
    pub recipient: Arc<EmailAddressWithName>,
    pub auto_reply: bool,
}

impl<RateLimit, Time, Email, Template> ContactServiceImpl<RateLimit, Time, Email, Template> {
    pub fn new(
        rate_limit: RateLimit,
        time: Time,
        email: Email,
        template: Template,
        config: ContactServiceConfig,
    ) -> Self {
        Self {
            rate_limit,
            time,
            email,
            template,
            config,
        }
    }
}

impl<RateLimit, Time, EmailS, TemplateS> ContactService
    for ContactServiceImpl<RateLimit, Time, EmailS, TemplateS>
where
    RateLimit: RateLimitService,
    Time: TimeService,
    EmailS: EmailService,
    TemplateS: TemplateService,
{
    async fn submit(
        &self,
        client: IpAddr,
        draft: ContactSubmissionDraft,
    ) -> Result<(), ContactSubmitError> {
        if let RateLimitDecision::Rejected { retry_after } = self.rate_limit.check(client) {
            debug!(%client, ?retry_after, "contact submission rate limited");
            return Err(ContactSubmitError::RateLimited { retry_after });
        }

        let submission = draft.validate()?;

        self.notify_owner(&submission).await?;
        info!(
            "Contact form submitted by {} <{}>",
            *submission.name, *submission.email
        );

        if self.config.auto_reply {
            // Best effort: the owner notification already went out, so a
            // failed acknowledgment must not fail the submission.
            if let Err(err) = self.send_auto_reply(&submission).await {
                warn!("Failed to send auto-reply to {}: {err:#}", *submission.email);
            }
        }

        Ok(())
    }
}

impl<RateLimit, Time, EmailS, TemplateS> ContactServiceImpl<RateLimit, Time, EmailS, TemplateS>
where
    Time: TimeService,
    EmailS: EmailService,
    TemplateS: TemplateService,
{
    async fn notify_owner(&self, submission: &ContactSubmission) -> Result<(), ContactSubmitError> {
        let reply_to = submitter_mailbox(submission)?;
        let submitted_at = self.time.now().to_rfc3339();

        let text = format!(
            "New message from your portfolio website:\n\n\
             Name: {name}\n\
             Email: {email}\n\
             Subject: {subject}\n\n\
             Message:\n\
             {message}\n\n\
             ---\n\
             Sent from the portfolio contact form at {submitted_at}\n",
            name = *submission.name,
            email = *submission.email,
            subject = *submission.subject,
            message = *submission.message,
        );

        let html = self.template.render(&OwnerNotificationTemplate {
            name: submission.name.clone().into_inner(),
            email: submission.email.clone().into_inner(),
            subject: submission.subject.clone().into_inner(),
            message: submission.message.clone().into_inner(),
            submitted_at,
        })?;

        let sent = self
            .email
            .send(Email {
                recipient: (*self.config.recipient).clone(),
                subject: format!("[Portfolio Contact] {}", *submission.subject),
                body: EmailBody::Alternative { text, html },
                reply_to: Some(reply_to),
            })
            .await?;

        if !sent {
            return Err(ContactSubmitError::Send);
        }

        Ok(())
    }

    async fn send_auto_reply(&self, submission: &ContactSubmission) -> anyhow::Result<()> {
        let recipient = submitter_mailbox(submission).map_err(anyhow::Error::from)?;
        let owner = self.config.recipient.name().unwrap_or_default().to_owned();

        let signature = if owner.is_empty() {
            String::new()
        } else {
            format!("Best regards,\n{owner}\n\n")
        };

        let text = format!(
            "Hello {name},\n\n\
             Thank you for reaching out through my portfolio website!\n\n\
             I've received your message regarding \"{subject}\" and will review it shortly. \
             I typically respond within 24-48 hours.\n\n\
             {signature}\
             ---\n\
             This is an automated confirmation.\n",
            name = *submission.name,
            subject = *submission.subject,
        );

        let html = self.template.render(&AutoReplyTemplate {
            name: submission.name.clone().into_inner(),
            subject: submission.subject.clone().into_inner(),
            owner,
        })?;

        let sent = self
            .email
            .send(Email {
                recipient,
                subject: format!("Thanks for your message: {}", *submission.subject),
                body: EmailBody::Alternative { text, html },
                reply_to: None,
            })
            .await?;
        ensure!(sent, "smtp server refused the auto-reply");

        Ok(())
    }
}

/// The validation regex admits a superset of what an SMTP envelope accepts,
/// so the conversion can still fail for exotic addresses.
fn submitter_mailbox(
    submission: &ContactSubmission,
) -> Result<EmailAddressWithName, ContactSubmitError> {
    Ok(EmailAddress::try_from(&submission.email)
        .context("Failed to parse submitter address")?
        .with_name(submission.name.clone().into_inner()))
}
