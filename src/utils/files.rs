use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::AppError;
use crate::models::config::FormatterConfig;

/// List the data files of `folder`, sorted by file name.
///
/// Subdirectories and names on the config's ignore list are skipped.
/// Symlinks are followed, so a link to a regular file counts as a data file.
pub fn list_data_files(folder: &Path, config: &FormatterConfig) -> Result<Vec<PathBuf>, AppError> {
    if !folder.is_dir() {
        return Err(AppError::FileNotFound(folder.display().to_string()));
    }

    let entries = std::fs::read_dir(folder)
        .map_err(|e| AppError::FileRead(format!("{}: {}", folder.display(), e)))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();

        if config.is_ignored(&name) {
            debug!("Skipping ignored entry {}", path.display());
            continue;
        }
        if !path.is_file() {
            debug!("Skipping non-file entry {}", path.display());
            continue;
        }
        files.push(path);
    }

    files.sort();
    Ok(files)
}

/// File name component as a string, for naming outputs.
///
/// Non-UTF-8 names are rejected: a lossy conversion could map two inputs to
/// the same output name.
pub fn file_name_of(path: &Path) -> Result<String, AppError> {
    let name = path
        .file_name()
        .ok_or_else(|| AppError::Internal(format!("path has no file name: {}", path.display())))?;
    name.to_str()
        .map(str::to_string)
        .ok_or_else(|| AppError::InvalidFileName(path.display().to_string()))
}
