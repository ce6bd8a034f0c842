// src/session.rs

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, error};

use crate::dataset::Dataset;
use crate::error::{DashError, Result};
use crate::views::{DashboardView, Selection};

pub type ViewReceiver = watch::Receiver<Option<Arc<DashboardView>>>;

/// Recomputes the dashboard off the calling task whenever the selection
/// changes.
///
/// At most one recomputation is in flight: a new selection aborts the
/// previous one (the blocking build notices its ticket is stale and stops),
/// and a result is only published while its request is still
/// the latest, so subscribers never see a superseded view replace a newer
/// one.
pub struct Session {
    dataset: Arc<Dataset>,
    latest: Arc<AtomicU64>,
    inflight: Option<JoinHandle<()>>,
    tx: Arc<watch::Sender<Option<Arc<DashboardView>>>>,
}

impl Session {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            dataset,
            latest: Arc::new(AtomicU64::new(0)),
            inflight: None,
            tx: Arc::new(tx),
        }
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn subscribe(&self) -> ViewReceiver {
        self.tx.subscribe()
    }

    /// The most recently published view.
    pub fn current(&self) -> Option<Arc<DashboardView>> {
        self.tx.borrow().clone()
    }

    /// Start recomputing for `selection`, superseding any recomputation in
    /// flight. Must be called from within a tokio runtime.
    ///
    /// The generation is checked up front; an unknown label means the caller's
    /// generation list and the dataset disagree, and nothing is spawned.
    pub fn select(&mut self, selection: Selection) -> Result<()> {
        self.dataset.schema().require(&selection.generation)?;

        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(handle) = self.inflight.take() {
            if !handle.is_finished() {
                debug!(ticket, "superseding in-flight recomputation");
            }
            handle.abort();
        }

        let dataset = Arc::clone(&self.dataset);
        let latest = Arc::clone(&self.latest);
        let tx = Arc::clone(&self.tx);

        self.inflight = Some(tokio::spawn(async move {
            let generation = selection.generation.clone();
            let superseded = Arc::clone(&latest);
            // abort() cannot stop a blocking task, so the build polls the ticket itself
            let built = tokio::task::spawn_blocking(move || {
                DashboardView::build_until(&dataset, &selection, &|| {
                    superseded.load(Ordering::SeqCst) != ticket
                })
            })
            .await;

            match built {
                Ok(Ok(view)) => {
                    let view = Arc::new(view);
                    let published = tx.send_if_modified(|slot| {
                        if latest.load(Ordering::SeqCst) == ticket {
                            *slot = Some(view);
                            true
                        } else {
                            false
                        }
                    });
                    if !published {
                        debug!(ticket, %generation, "dropping superseded view");
                    }
                }
                Ok(Err(DashError::Cancelled)) => {
                    debug!(ticket, %generation, "superseded build stopped early");
                }
                Ok(Err(e)) => error!(%generation, "recomputation failed: {}", e),
                Err(e) if e.is_cancelled() => {}
                Err(e) => error!(%generation, "recomputation task panicked: {}", e),
            }
        }));
        Ok(())
    }

    /// Wait for the in-flight recomputation, if any, to finish or be dropped.
    pub async fn settle(&mut self) {
        if let Some(handle) = self.inflight.take() {
            let _ = handle.await;
        }
    }
}
