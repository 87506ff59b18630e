//! Outgoing email: template rendering and the outbox mailer
//!
//! Delivery is out of scope. [`OutboxMailer`] renders the stored template and
//! queues the result in `outbound_emails` for an external sender to pick up.

use async_trait::async_trait;
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

use crate::db::models::OutboundEmail;
use crate::db::repositories::EmailRepository;
use crate::db::DatabasePool;
use crate::{LinguabridgeError, Result};

/// A message to send, identified by template name plus placeholder values
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to: String,
    pub template: String,
    pub vars: HashMap<String, String>,
}

impl OutgoingEmail {
    pub fn new(to: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            template: template.into(),
            vars: HashMap::new(),
        }
    }

    /// Set a placeholder value
    pub fn var(mut self, key: &str, value: impl Into<String>) -> Self {
        self.vars.insert(key.to_string(), value.into());
        self
    }
}

/// Sends email on behalf of the services
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<()>;
}

/// Replace `{{key}}` markers; keys without a value render empty
pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        match after_open.find("}}") {
            Some(end) => {
                let key = after_open[..end].trim();
                if let Some(value) = vars.get(key) {
                    out.push_str(value);
                }
                rest = &after_open[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Mailer that queues rendered messages in the database
#[derive(Clone)]
pub struct OutboxMailer {
    pool: DatabasePool,
}

impl OutboxMailer {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Mailer for OutboxMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<()> {
        let template = EmailRepository::get_template(&self.pool, &email.template)
            .await?
            .ok_or_else(|| LinguabridgeError::not_found("email template", email.template.clone()))?;

        let outbound = OutboundEmail {
            id: Uuid::new_v4().to_string(),
            recipient: email.to.clone(),
            template: email.template.clone(),
            subject: render(&template.subject, &email.vars),
            body: render(&template.body, &email.vars),
            status: "queued".to_string(),
            created_at: crate::db::now_timestamp(),
        };
        EmailRepository::enqueue(&self.pool, &outbound).await?;

        info!(
            "Queued {} email to {}: {}",
            outbound.template, outbound.recipient, outbound.subject
        );
        Ok(())
    }
}
