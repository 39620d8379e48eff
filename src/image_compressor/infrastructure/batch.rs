//! Non-interactive run over a list of files. A file that can't be read or
//! isn't an image is reported and skipped; the rest still get processed.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::warn;

use super::error::InfrastructureError;
use super::file_storage::LocalFileStorage;
use crate::application::error::ApplicationError;
use crate::application::orchestrator::Orchestrator;

/// Reads and selects `path`. Failures are written to `out`; `Ok(false)` means skipped.
pub async fn open_file<W: Write>(
    orchestrator: &Orchestrator,
    storage: &LocalFileStorage,
    path: &Path,
    out: &mut W,
) -> Result<bool, InfrastructureError> {
    let selected = match storage.pick_file(path).await {
        // read errors go through the same user-facing mapping as rejected files
        Ok(file) => orchestrator.select_file(file),
        Err(e) => Err(ApplicationError::from(e)),
    };
    match selected {
        Ok(()) => Ok(true),
        Err(e) => {
            warn!("Skipping {}: {}", path.display(), e);
            writeln!(out, "{}: {}", path.display(), e.user_message())?;
            Ok(false)
        }
    }
}

/// Compresses and saves every file in turn. Returns how many could not be saved.
pub async fn run_batch<W: Write>(
    orchestrator: &Orchestrator,
    storage: &LocalFileStorage,
    files: &[PathBuf],
    mut out: W,
) -> Result<usize, InfrastructureError> {
    let mut failures = 0;
    for path in files {
        if !open_file(orchestrator, storage, path, &mut out).await? {
            failures += 1;
            continue;
        }
        orchestrator.settle().await;

        let view = orchestrator.view();
        writeln!(out, "{}: {} -> {}", path.display(), view.original_size, view.compressed_size)?;
        match orchestrator.download(storage).await {
            Ok(Some(saved)) => writeln!(out, "  saved {}", saved.display())?,
            Ok(None) => failures += 1,
            Err(e) => {
                writeln!(out, "  {}", e.user_message())?;
                failures += 1;
            }
        }
    }
    Ok(failures)
}
