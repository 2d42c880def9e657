use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::config::{validate_file_name, OutputFormat, OutputLayout};
use crate::utils::terminal::TerminalPrinter;

/// Serialize a payload as JSON text in the requested layout.
pub fn render_json<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<String, AppError> {
    let text = match format {
        OutputFormat::Compact => serde_json::to_string(value)?,
        OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
    };
    Ok(text)
}

/// Write `payload` to `<data_dir>[/<dirname>]/<file_name>`, creating folders as needed.
///
/// `file_name` must be a bare name and `dirname` a relative path below the
/// data folder. Announces the creation of the base data folder on the
/// printer. Returns the written path.
pub fn save_to_file<W: Write>(
    payload: &str,
    file_name: &str,
    dirname: Option<&str>,
    layout: &OutputLayout,
    printer: &mut TerminalPrinter<W>,
) -> Result<PathBuf, AppError> {
    validate_file_name(file_name)?;
    let target_dir = layout.target_dir(dirname)?;

    let data_dir = layout.data_dir();
    if !data_dir.exists() {
        create_dir(data_dir)?;
        printer.message(&format!(
            "Data folder in R directory not present.\nCreating directory {} at {}",
            dir_label(data_dir),
            data_dir.display()
        ));
    }

    if !target_dir.exists() {
        create_dir(&target_dir)?;
    }

    let path = target_dir.join(file_name);
    let mut file = std::fs::File::create(&path)
        .map_err(|e| AppError::FileWrite(format!("Cannot create {}: {}", path.display(), e)))?;
    file.write_all(payload.as_bytes())
        .map_err(|e| AppError::FileWrite(format!("{}: {}", path.display(), e)))?;

    info!("Wrote {} bytes to {}", payload.len(), path.display());
    Ok(path)
}

/// Replace the contents of an existing file.
pub fn overwrite_file(path: &Path, payload: &str) -> Result<(), AppError> {
    std::fs::write(path, payload)
        .map_err(|e| AppError::FileWrite(format!("{}: {}", path.display(), e)))?;
    info!("Rewrote {}", path.display());
    Ok(())
}

fn create_dir(dir: &Path) -> Result<(), AppError> {
    std::fs::create_dir_all(dir)
        .map_err(|e| AppError::FileWrite(format!("Cannot create directory {}: {}", dir.display(), e)))?;
    info!("Created directory {}", dir.display());
    Ok(())
}

fn dir_label(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string())
}
