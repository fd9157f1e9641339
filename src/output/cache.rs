use std::fs;
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

use super::OutputError;

/// Copies the sketch cache into `output`, replacing whatever was there
///
/// Returns the number of files copied.
pub fn copy_cache(cache: &Path, output: &Path) -> Result<usize, OutputError> {
    if output.exists() {
        debug!(path = %output.display(), "Removing previous output directory");
        fs::remove_dir_all(output).map_err(|e| OutputError::io("Failed to remove", output, e))?;
    }

    let mut copied = 0;
    for entry in WalkDir::new(cache).follow_links(true) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(cache)
            .unwrap_or_else(|_| entry.path());
        let destination = output.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&destination)
                .map_err(|e| OutputError::io("Failed to create", &destination, e))?;
        } else {
            fs::copy(entry.path(), &destination)
                .map_err(|e| OutputError::io("Failed to copy", entry.path(), e))?;
            copied += 1;
        }
    }

    info!(
        from = %cache.display(),
        to = %output.display(),
        files = copied,
        "Copied sketch cache"
    );
    Ok(copied)
}
