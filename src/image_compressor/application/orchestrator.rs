use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::{debug, warn};

use super::compression_service::CompressionService;
use super::debounce::Debouncer;
use super::error::ApplicationError;
use super::session::{CompressionSession, ViewState};
use crate::domain::quality::Quality;
use crate::domain::source_image::PickedFile;
use crate::infrastructure::file_storage::LocalFileStorage;
use crate::infrastructure::object_url::ObjectUrlRegistry;

struct Inner {
    session: Mutex<CompressionSession>,
    service: CompressionService,
    debouncer: Debouncer,
    urls: ObjectUrlRegistry,
    in_flight: Mutex<JoinSet<()>>,
}

impl Inner {
    fn session(&self) -> MutexGuard<'_, CompressionSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn in_flight(&self) -> MutexGuard<'_, JoinSet<()>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Event handlers for the page: picking, dropping, the slider and download.
#[derive(Clone)]
pub struct Orchestrator {
    inner: Arc<Inner>,
}

impl Orchestrator {
    pub fn new(
        service: CompressionService,
        urls: ObjectUrlRegistry,
        debounce_window: Duration,
        quality: Quality,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                session: Mutex::new(CompressionSession::new(quality, urls.clone())),
                service,
                debouncer: Debouncer::new(debounce_window),
                urls,
                in_flight: Mutex::new(JoinSet::new()),
            }),
        }
    }

    pub fn view(&self) -> ViewState {
        self.inner.session().view().clone()
    }

    /// Non-images are rejected before anything changes.
    pub fn select_file(&self, file: PickedFile) -> Result<(), ApplicationError> {
        let source = file.into_source().map_err(|e| {
            warn!("Rejected file: {}", e);
            ApplicationError::from(e)
        })?;

        // compressing right away below makes a pending slider pass redundant
        self.inner.debouncer.cancel();
        self.inner.session().load_source(source);
        self.trigger();
        Ok(())
    }

    /// Only the first dropped file is used.
    pub fn drop_files(&self, files: Vec<PickedFile>) -> Result<(), ApplicationError> {
        match files.into_iter().next() {
            Some(file) => self.select_file(file),
            None => {
                debug!("Empty drop ignored");
                Ok(())
            }
        }
    }

    pub fn slider_input(&self, percent: u32) -> Result<(), ApplicationError> {
        let quality = Quality::new(percent)?;
        self.inner.session().set_quality(quality);

        let this = self.clone();
        self.inner.debouncer.schedule(async move {
            this.trigger();
        });
        Ok(())
    }

    fn trigger(&self) {
        let Some(request) = self.inner.session().begin_request() else {
            debug!("No source loaded, nothing to compress");
            return;
        };

        let inner = self.inner.clone();
        let mut in_flight = self.inner.in_flight();
        while in_flight.try_join_next().is_some() {}
        in_flight.spawn(async move {
            let outcome = inner.service.compress(&request.source, request.quality).await;
            inner.session().apply(request.sequence, outcome);
        });
    }

    /// Waits for a pending slider pass and every pass in flight.
    pub async fn settle(&self) {
        self.inner.debouncer.flush().await;
        loop {
            let mut pending = std::mem::take(&mut *self.inner.in_flight());
            if pending.is_empty() {
                break;
            }
            while let Some(joined) = pending.join_next().await {
                if let Err(e) = joined {
                    warn!("Compression task ended abnormally: {}", e);
                }
            }
        }
    }

    /// Saves the current result as `compressed_<name>`. `Ok(None)` when there is
    /// nothing to save yet.
    pub async fn download(
        &self,
        storage: &LocalFileStorage,
    ) -> Result<Option<PathBuf>, ApplicationError> {
        let Some((file_name, data)) = self.inner.session().download_request() else {
            debug!("Download requested before any result exists");
            return Ok(None);
        };

        let url = self.inner.urls.create(data);
        let bytes = self.inner.urls.resolve(url.as_str())?;
        let saved = storage.save_download(&file_name, &bytes).await;
        drop(url);
        Ok(Some(saved?))
    }
}
