//! View-model for a single compression page.
//!
//! Every compression pass is tagged with a request number; an outcome only
//! reaches the view when it belongs to the most recent request.

use tracing::{debug, error, info};

use super::error::{ApplicationError, COMPRESSION_FAILED_NOTICE};
use crate::domain::compressed_result::CompressedResult;
use crate::domain::file_size::format_file_size;
use crate::domain::quality::Quality;
use crate::domain::source_image::SourceImage;
use crate::infrastructure::object_url::{ObjectUrl, ObjectUrlRegistry};

pub const EMPTY_SIZE_TEXT: &str = "-";
pub const COMPRESSING_TEXT: &str = "Compressing...";

/// Everything the page shows.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub original_preview: Option<String>,
    pub original_size: String,
    pub section_visible: bool,
    pub quality_label: String,
    pub compressed_preview: Option<String>,
    pub compressed_size: String,
    pub download_visible: bool,
}

impl ViewState {
    fn new(quality: Quality) -> Self {
        Self {
            original_preview: None,
            original_size: EMPTY_SIZE_TEXT.to_string(),
            section_visible: false,
            quality_label: quality.label(),
            compressed_preview: None,
            compressed_size: EMPTY_SIZE_TEXT.to_string(),
            download_visible: false,
        }
    }
}

/// A compression pass to run for the source and quality current at issue time.
#[derive(Debug, Clone)]
pub struct CompressionRequest {
    pub sequence: u64,
    pub source: SourceImage,
    pub quality: Quality,
}

pub fn data_url(source: &SourceImage) -> String {
    format!("data:{};base64,{}", source.media_type, base64::encode(&source.data))
}

pub struct CompressionSession {
    source: Option<SourceImage>,
    result: Option<CompressedResult>,
    quality: Quality,
    latest_request: u64,
    preview: Option<ObjectUrl>,
    urls: ObjectUrlRegistry,
    view: ViewState,
}

impl CompressionSession {
    pub fn new(quality: Quality, urls: ObjectUrlRegistry) -> Self {
        Self {
            source: None,
            result: None,
            quality,
            latest_request: 0,
            preview: None,
            urls,
            view: ViewState::new(quality),
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Makes `source` current and resets everything derived from the previous one.
    pub fn load_source(&mut self, source: SourceImage) {
        info!("Loaded {} ({})", source.name, format_file_size(source.size()));
        self.view.original_size = format_file_size(source.size());
        self.view.original_preview = Some(data_url(&source));
        self.view.section_visible = true;
        self.set_preview(None);
        self.view.compressed_size = EMPTY_SIZE_TEXT.to_string();
        self.view.download_visible = false;
        self.result = None;
        self.source = Some(source);
    }

    pub fn set_quality(&mut self, quality: Quality) {
        self.quality = quality;
        self.view.quality_label = quality.label();
    }

    /// Issues a new request; `None` while no source is loaded.
    pub fn begin_request(&mut self) -> Option<CompressionRequest> {
        let source = self.source.clone()?;
        self.latest_request += 1;
        self.view.compressed_size = COMPRESSING_TEXT.to_string();
        Some(CompressionRequest {
            sequence: self.latest_request,
            source,
            quality: self.quality,
        })
    }

    /// Applies an outcome. Returns false when the request has been superseded.
    pub fn apply(
        &mut self,
        sequence: u64,
        outcome: Result<CompressedResult, ApplicationError>,
    ) -> bool {
        if sequence != self.latest_request {
            debug!(
                "Discarding outcome of request {} (latest is {})",
                sequence, self.latest_request
            );
            return false;
        }

        match outcome {
            Ok(result) => {
                info!(
                    "Request {}: {} at quality {:.2}{}",
                    sequence,
                    result.summary(),
                    result.quality,
                    if result.used_fallback { " (fallback)" } else { "" }
                );
                self.view.compressed_size = result.summary();
                let url = self.urls.create(result.data.clone());
                self.set_preview(Some(url));
                self.view.download_visible = true;
                self.result = Some(result);
            }
            Err(e) => {
                error!("Compression failed: {}", e);
                self.view.compressed_size = COMPRESSION_FAILED_NOTICE.to_string();
                self.view.download_visible = false;
                self.result = None;
            }
        }
        true
    }

    /// File name and bytes to save, if there is anything to save.
    pub fn download_request(&self) -> Option<(String, std::sync::Arc<[u8]>)> {
        let source = self.source.as_ref()?;
        let result = self.result.as_ref()?;
        Some((source.download_name(), result.data.clone()))
    }

    fn set_preview(&mut self, url: Option<ObjectUrl>) {
        self.view.compressed_preview = url.as_ref().map(|u| u.as_str().to_string());
        // assigning drops, and thereby revokes, the previous URL
        self.preview = url;
    }
}
