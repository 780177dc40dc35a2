//! [`DeferredWorker`] – the host runtime's deferred execution context.
//!
//! Implements the [`DeferredExecutor`] seam with an unbounded channel
//! drained by one spawned task, so scheduled work runs strictly in
//! submission order and never on the thread that scheduled it.

use std::sync::Arc;

use matterhub_fabric::DeferredExecutor;
use tokio::sync::mpsc;
use tracing::warn;

type Job = Box<dyn FnOnce() + Send>;

pub struct DeferredWorker {
    tx: mpsc::UnboundedSender<Job>,
}

impl DeferredWorker {
    /// Spawn the drain task on the current tokio runtime.
    pub fn spawn() -> Arc<Self> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Job>();
        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                job();
            }
        });
        Arc::new(Self { tx })
    }
}

impl DeferredExecutor for DeferredWorker {
    fn schedule(&self, work: Job) {
        if self.tx.send(work).is_err() {
            warn!("deferred worker is gone; dropping scheduled work");
        }
    }
}
