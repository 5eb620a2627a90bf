//! Bounded queue and background worker for queued email delivery
//!
//! One worker per handler drains a fixed-capacity channel sequentially.
//! A full queue blocks the enqueuing log call (backpressure, not drop);
//! closing the queue is the single shutdown signal.

use crate::record::Level;
use crate::traits::mailer::{Email, Mailer};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;

/// Shared slot holding the queue's send side. `StopHandle::stop` takes the
/// sender out, which closes the channel once in-flight clones drop, so the
/// worker drains whatever is buffered and exits.
pub(crate) type QueueSlot = Arc<RwLock<Option<mpsc::Sender<EmailTask>>>>;

/// One pending email, derived at enqueue time so subject/body errors surface
/// to the log caller rather than inside the worker
#[derive(Debug)]
pub(crate) struct EmailTask {
    pub(crate) level: Level,
    pub(crate) subject: String,
    pub(crate) body: String,
}

/// Spawn the delivery worker and return the queue slot plus its stop handle
///
/// Must be called within a tokio runtime.
pub(crate) fn spawn(
    capacity: usize,
    mailer: Arc<dyn Mailer>,
    from: String,
    to: Vec<String>,
    stopped: Arc<AtomicBool>,
) -> (QueueSlot, StopHandle) {
    // A zero-capacity bounded channel is not meaningful; clamp to 1.
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let queue: QueueSlot = Arc::new(RwLock::new(Some(tx)));
    let worker = tokio::spawn(run(rx, mailer, from, to));

    let handle = StopHandle {
        queue: queue.clone(),
        stopped,
        worker,
    };
    (queue, handle)
}

async fn run(
    mut rx: mpsc::Receiver<EmailTask>,
    mailer: Arc<dyn Mailer>,
    from: String,
    to: Vec<String>,
) {
    tracing::debug!("email worker started");

    while let Some(task) = rx.recv().await {
        let EmailTask {
            level,
            subject,
            body,
        } = task;
        let email = Email::new(from.clone(), subject)
            .to_many(to.iter().cloned())
            .body(body);

        // The log call that enqueued this task has already returned, so a
        // failure here is observable only through tracing. At-most-once
        // delivery: the task is dropped either way.
        if let Err(error) = mailer.send(&email).await {
            tracing::error!(level = %level, %error, "failed to deliver log notification");
        }
    }

    tracing::debug!("email worker stopped");
}

/// Handle for stopping a queued handler's email side
///
/// Returned by the queued constructors alongside the handler.
#[derive(Debug)]
pub struct StopHandle {
    queue: QueueSlot,
    stopped: Arc<AtomicBool>,
    worker: JoinHandle<()>,
}

impl StopHandle {
    /// Stop email dispatch and wait for the worker to drain
    ///
    /// Marks the handler stopped, closes the queue and blocks until the
    /// worker has delivered everything already buffered and exited. Records
    /// logged after this still render to the output stream but are no longer
    /// emailed. Consumes the handle, so a second stop cannot race the first.
    pub async fn stop(self) {
        self.stopped.store(true, Ordering::SeqCst);
        self.queue.write().await.take();

        if let Err(error) = self.worker.await {
            tracing::error!(%error, "email worker task failed");
        }
    }
}
