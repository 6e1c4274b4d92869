use std::{fs, path::Path};

use anyhow::{Context, Result};

use crate::utils;

/// Writes to a sibling temp file and renames it over `path`, so readers see
/// either the previous artifact or the complete new one.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    utils::ensure_parent(path)
        .with_context(|| format!("unable to create parent directory for {}", path.display()))?;

    let mut tmp_name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "calendar.ics".into());
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    fs::write(&tmp_path, contents.as_bytes())
        .with_context(|| format!("unable to write {}", tmp_path.display()))?;
    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err).with_context(|| format!("unable to replace {}", path.display()));
    }
    Ok(())
}
