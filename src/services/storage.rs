use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// Reads a JSON document, `None` when the file does not exist.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let data = fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&data)?))
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    write_atomic(path, json.as_bytes())
}

/// Writes through a sibling temp file so readers never see a half-written file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = tmp_path(path);

    if let Some(parent) = tmp.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(&tmp, bytes)?;

    // Unix `rename` replaces the target atomically; keep the old file until then.
    #[cfg(windows)]
    {
        if path.exists() {
            fs::remove_file(path)?;
        }
    }

    fs::rename(&tmp, path)?;

    Ok(())
}

/// Recursively copies `from` into `to`, skipping entries that fail.
/// Returns the number of files copied.
pub fn copy_dir(from: &Path, to: &Path) -> Result<usize> {
    fs::create_dir_all(to)?;

    let mut copied = 0usize;
    for entry in fs::read_dir(from)?.flatten() {
        let src = entry.path();
        let dst = to.join(entry.file_name());

        let outcome = if src.is_dir() {
            copy_dir(&src, &dst)
        } else {
            fs::copy(&src, &dst).map(|_| 1).map_err(Into::into)
        };

        match outcome {
            Ok(n) => copied += n,
            Err(e) => tracing::warn!(file = %src.display(), error = %e, "failed to copy file"),
        }
    }

    Ok(copied)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut p = path.to_path_buf();
    let file_name = match path.file_name().and_then(|s| s.to_str()) {
        Some(n) => n.to_string(),
        None => "data".to_string(),
    };
    p.set_file_name(format!("{file_name}.tmp"));
    p
}
