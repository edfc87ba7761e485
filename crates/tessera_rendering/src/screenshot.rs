//! Screenshot capture.
//!
//! Screenshots land in a fixed directory, created on first use, named by
//! local time: `screenshot_dd-MM-yyyy-HH-mm-ss.png`.

use std::fmt::Display;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};
use tessera_ui::Extent;
use thiserror::Error;

use crate::backend::{BackendError, GraphicsBackend};

/// Screenshot failure.
#[derive(Debug, Error)]
pub enum ScreenshotError {
    /// The output directory could not be created.
    #[error("cannot create screenshot directory {dir}: {source}")]
    CreateDir {
        /// Directory.
        dir: PathBuf,
        /// Cause.
        #[source]
        source: std::io::Error,
    },

    /// The backend failed to read back or write the image.
    #[error("cannot capture screenshot to {path}: {source}")]
    Capture {
        /// Target file.
        path: PathBuf,
        /// Cause.
        #[source]
        source: BackendError,
    },
}

/// File name for a screenshot taken at `now`.
#[must_use]
pub fn screenshot_file_name<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!("screenshot_{}.png", now.format("%d-%m-%Y-%H-%M-%S"))
}

/// Captures the back buffer into `dir`, creating it if needed.
///
/// Returns the file name (not the full path) on success.
pub fn capture(
    backend: &mut dyn GraphicsBackend,
    dir: &Path,
    size: Extent,
    now: &DateTime<Local>,
) -> Result<String, ScreenshotError> {
    if !dir.is_dir() {
        std::fs::create_dir_all(dir).map_err(|source| ScreenshotError::CreateDir {
            dir: dir.to_path_buf(),
            source,
        })?;
    }

    let file = screenshot_file_name(now);
    let path = dir.join(&file);
    backend
        .take_screenshot(&path, size)
        .map_err(|source| ScreenshotError::Capture {
            path: path.clone(),
            source,
        })?;
    tracing::info!("screenshot saved to {}", path.display());
    Ok(file)
}
