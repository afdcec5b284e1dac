//! File output with idempotent, atomic writes.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counter for unique temp file names.
static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Writes `content` to `path` only if the on-disk bytes differ.
///
/// Returns `true` if the file was written, `false` if it was already
/// identical (its modification time is then preserved, which keeps
/// downstream build tools quiet). The write itself goes through a sibling
/// temp file and a rename, so a failure never leaves a truncated target.
pub fn update_file(path: &Path, content: &str) -> io::Result<bool> {
    if path.exists() {
        let existing = fs::read(path)?;
        if existing == content.as_bytes() {
            return Ok(false);
        }
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    atomic_write(path, content)?;
    Ok(true)
}

/// Writes content to a file atomically using a temp file.
fn atomic_write(path: &Path, content: &str) -> io::Result<()> {
    let parent = path.parent().unwrap_or(Path::new("."));
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let temp_path = parent.join(format!(".weft-tmp-{}-{}", std::process::id(), counter));

    {
        let mut file = File::create(&temp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }

    fs::rename(&temp_path, path)?;

    Ok(())
}
