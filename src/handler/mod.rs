//! The email-dispatching log handler
//!
//! [`EmailHandler`] renders every record to an output destination and, when a
//! record's level meets the configured email threshold, also dispatches it as
//! an email notification through one of three delivery strategies:
//!
//! - synchronous: the log call blocks on the SMTP round trip, transport
//!   errors return to the caller ([`EmailHandler::new`])
//! - queued: a bounded queue plus one background worker; a full queue blocks
//!   the log call, delivery errors are logged by the worker
//!   ([`EmailHandler::queued`])
//! - custom: a user-supplied [`Deliver`] implementation receives the raw
//!   record and rendered text ([`EmailHandler::with_deliver`])

mod config;
mod queue;

pub use config::{BodyFn, EmailOptions, SubjectFn};
pub use queue::StopHandle;

use crate::email::SmtpMailer;
use crate::error::{LogmailError, Result};
use crate::record::{Attr, Level, Record};
use crate::render::{JsonRenderer, TextRenderer};
use crate::traits::deliver::Deliver;
use crate::traits::mailer::{Email, Mailer};
use crate::traits::render::{Render, RenderOptions};
use config::{pretty_json, EmailConfig};
use queue::{EmailTask, QueueSlot};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
enum Delivery {
    Sync(Arc<dyn Mailer>),
    Queued(QueueSlot),
    Custom(Arc<dyn Deliver>),
}

/// A log handler that writes rendered records to an output destination and
/// emails qualifying records
///
/// Cloning (or [`with_attrs`](EmailHandler::with_attrs) /
/// [`with_group`](EmailHandler::with_group)) shares the output destination,
/// mailer and queue with the original handler.
///
/// # Example
///
/// ```rust,ignore
/// use logmail::{EmailHandler, EmailOptions, Level, Record, RenderOptions, SmtpConfig};
///
/// let handler = EmailHandler::new(
///     std::io::stderr(),
///     RenderOptions::default(),
///     EmailOptions::new("alerts@example.com", Level::Error)
///         .to("oncall@example.com")
///         .smtp(SmtpConfig::new("smtp.example.com").credentials("user", "pass")),
/// )?;
///
/// handler.handle(&Record::new(Level::Error, "db down")).await?;
/// ```
#[derive(Clone)]
pub struct EmailHandler {
    renderer: Arc<dyn Render>,
    out: Arc<Mutex<Box<dyn Write + Send>>>,
    stopped: Arc<AtomicBool>,
    email: Arc<EmailConfig>,
    delivery: Delivery,
}

impl EmailHandler {
    /// Create a handler with synchronous SMTP delivery
    ///
    /// Fails if `email.smtp` is missing or the SMTP transport cannot be
    /// constructed.
    pub fn new(
        out: impl Write + Send + 'static,
        render_opts: RenderOptions,
        email: EmailOptions,
    ) -> Result<Self> {
        let mailer = smtp_mailer(&email)?;
        Ok(Self::with_mailer(out, render_opts, email, mailer))
    }

    /// Create a handler with synchronous delivery through a custom mailer
    pub fn with_mailer(
        out: impl Write + Send + 'static,
        render_opts: RenderOptions,
        email: EmailOptions,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let renderer = build_renderer(email.json, render_opts);
        Self::with_renderer(out, renderer, email, mailer)
    }

    /// Create a synchronous handler with a caller-supplied renderer backend
    pub fn with_renderer(
        out: impl Write + Send + 'static,
        renderer: Box<dyn Render>,
        email: EmailOptions,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            renderer: Arc::from(renderer),
            out: Arc::new(Mutex::new(Box::new(out))),
            stopped: Arc::new(AtomicBool::new(false)),
            email: Arc::new(email.into_config()),
            delivery: Delivery::Sync(mailer),
        }
    }

    /// Create a handler with queued asynchronous SMTP delivery
    ///
    /// Spawns one background worker draining a bounded queue of
    /// `email.queue_capacity` tasks. The returned [`StopHandle`] closes the
    /// queue and waits for the worker to drain. Must be called within a
    /// tokio runtime.
    pub fn queued(
        out: impl Write + Send + 'static,
        render_opts: RenderOptions,
        email: EmailOptions,
    ) -> Result<(Self, StopHandle)> {
        let mailer = smtp_mailer(&email)?;
        Ok(Self::queued_with_mailer(out, render_opts, email, mailer))
    }

    /// Create a queued handler delivering through a custom mailer
    pub fn queued_with_mailer(
        out: impl Write + Send + 'static,
        render_opts: RenderOptions,
        email: EmailOptions,
        mailer: Arc<dyn Mailer>,
    ) -> (Self, StopHandle) {
        let renderer = build_renderer(email.json, render_opts);
        let stopped = Arc::new(AtomicBool::new(false));
        let capacity = email.queue_capacity;
        let config = email.into_config();
        let (queue_slot, stop) = queue::spawn(
            capacity,
            mailer,
            config.from_addr.clone(),
            config.to_addrs.clone(),
            stopped.clone(),
        );

        let handler = Self {
            renderer: Arc::from(renderer),
            out: Arc::new(Mutex::new(Box::new(out))),
            stopped,
            email: Arc::new(config),
            delivery: Delivery::Queued(queue_slot),
        };
        (handler, stop)
    }

    /// Create a handler that delegates email dispatch entirely to `deliver`
    ///
    /// The delivery function receives every rendered record and assumes full
    /// responsibility for deciding what, if anything, to send. Its errors
    /// propagate to the caller of [`handle`](EmailHandler::handle).
    pub fn with_deliver(
        out: impl Write + Send + 'static,
        render_opts: RenderOptions,
        deliver: Arc<dyn Deliver>,
        json: bool,
    ) -> Self {
        let renderer = build_renderer(json, render_opts);
        Self {
            renderer: Arc::from(renderer),
            out: Arc::new(Mutex::new(Box::new(out))),
            stopped: Arc::new(AtomicBool::new(false)),
            email: Arc::new(EmailConfig::custom(json)),
            delivery: Delivery::Custom(deliver),
        }
    }

    /// Whether the handler would process a record at this level
    ///
    /// True iff the handler has not been stopped and the renderer's base
    /// level filter accepts the level. Callers use this to skip building
    /// records that would be discarded.
    pub fn enabled(&self, level: Level) -> bool {
        !self.stopped.load(Ordering::Relaxed) && self.renderer.enabled(level)
    }

    /// Process one record: render, write, and maybe email
    ///
    /// The rendered text is always written to the output destination when
    /// rendering succeeds, independent of the email outcome. Render and
    /// write errors abort the call before any email work. Synchronous and
    /// custom delivery errors return to the caller; queued delivery errors
    /// are observable only at the worker.
    pub async fn handle(&self, record: &Record) -> Result<()> {
        let rendered = self.renderer.render(record)?;

        {
            // Lock held for the write only, never across a transport send,
            // so unrelated log calls are not serialized behind network I/O.
            let mut out = self.out.lock().await;
            out.write_all(rendered.as_bytes())?;
            out.flush()?;
        }

        self.dispatch(record, &rendered).await
    }

    /// Return a handler with additional attributes bound to every record
    ///
    /// Email configuration and the delivery strategy are shared with the
    /// original handler; safe to call concurrently with `handle`.
    pub fn with_attrs(&self, attrs: Vec<Attr>) -> EmailHandler {
        let mut next = self.clone();
        next.renderer = Arc::from(self.renderer.with_attrs(attrs));
        next
    }

    /// Return a handler that nests subsequent attribute keys under a group
    pub fn with_group(&self, name: &str) -> EmailHandler {
        let mut next = self.clone();
        next.renderer = Arc::from(self.renderer.with_group(name));
        next
    }

    async fn dispatch(&self, record: &Record, rendered: &str) -> Result<()> {
        if self.stopped.load(Ordering::SeqCst) {
            tracing::debug!("handler stopped, skipping email dispatch");
            return Ok(());
        }

        match &self.delivery {
            Delivery::Custom(deliver) => deliver.deliver(record, rendered).await,
            Delivery::Sync(mailer) => {
                if record.level < self.email.level {
                    return Ok(());
                }
                let (subject, body) = self.subject_body(record, rendered)?;
                let email = Email::new(self.email.from_addr.clone(), subject)
                    .to_many(self.email.to_addrs.iter().cloned())
                    .body(body);
                mailer.send(&email).await
            }
            Delivery::Queued(queue_slot) => {
                if record.level < self.email.level {
                    return Ok(());
                }
                let (subject, body) = self.subject_body(record, rendered)?;
                let tx = queue_slot.read().await.as_ref().cloned();
                match tx {
                    Some(tx) => {
                        let task = EmailTask {
                            level: record.level,
                            subject,
                            body,
                        };
                        // Blocks when the queue is full: backpressure, not drop.
                        if tx.send(task).await.is_err() {
                            tracing::warn!("email queue closed, dropping notification");
                        }
                        Ok(())
                    }
                    None => {
                        tracing::debug!("email queue stopped, skipping notification");
                        Ok(())
                    }
                }
            }
        }
    }

    fn subject_body(&self, record: &Record, rendered: &str) -> Result<(String, String)> {
        let subject = match &self.email.subject_fn {
            Some(f) => f(record, rendered),
            None => record.level.to_string(),
        };
        let body = match &self.email.body_fn {
            Some(f) => f(record, rendered)?,
            None if self.email.json => pretty_json(rendered)?,
            None => rendered.to_string(),
        };
        Ok((subject, body))
    }
}

impl std::fmt::Debug for EmailHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let strategy = match self.delivery {
            Delivery::Sync(_) => "sync",
            Delivery::Queued(_) => "queued",
            Delivery::Custom(_) => "custom",
        };
        f.debug_struct("EmailHandler")
            .field("delivery", &strategy)
            .field("email_level", &self.email.level)
            .field("stopped", &self.stopped.load(Ordering::Relaxed))
            .finish()
    }
}

fn build_renderer(json: bool, opts: RenderOptions) -> Box<dyn Render> {
    if json {
        Box::new(JsonRenderer::new(opts))
    } else {
        Box::new(TextRenderer::new(opts))
    }
}

fn smtp_mailer(email: &EmailOptions) -> Result<Arc<dyn Mailer>> {
    let smtp = email.smtp.clone().ok_or_else(|| {
        LogmailError::config(
            "SMTP connection parameters are required when no custom mailer or delivery function is supplied",
        )
    })?;
    Ok(Arc::new(SmtpMailer::new(smtp)?))
}
