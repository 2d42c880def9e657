use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;

/// Output directory, relative to the project root, that the R scripts read from.
pub const DEFAULT_OUTPUT_DIR: &str = "R_analysis/R_formatted_data";

/// Prefix prepended to every converted file name.
pub const DEFAULT_FILE_PREFIX: &str = "R_";

/// Timestamp field truncated to whole seconds.
pub const DEFAULT_DATE_FIELD: &str = "date";

/// Formatter settings. Every field has a default, so a config file only
/// needs the keys it wants to change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterConfig {
    /// Output directory relative to the root passed at run time.
    pub output_dir: PathBuf,
    /// Prefix for converted file names.
    pub file_prefix: String,
    /// Field holding the record timestamp.
    pub date_field: String,
    /// Strip sub-second precision from `date_field` when converting.
    pub convert_time: bool,
    /// Folder entries never treated as data files.
    pub ignored_files: Vec<String>,
    /// How converted JSON is laid out.
    pub format: OutputFormat,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            date_field: DEFAULT_DATE_FIELD.to_string(),
            convert_time: true,
            ignored_files: vec![".DS_Store".to_string()],
            format: OutputFormat::Compact,
        }
    }
}

impl FormatterConfig {
    /// Load settings from a JSON file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            return Err(AppError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: FormatterConfig = serde_json::from_str(&content)
            .map_err(|e| AppError::InvalidConfig(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.date_field.is_empty() {
            return Err(AppError::InvalidConfig("date_field must not be empty".into()));
        }
        if self.output_dir.is_absolute() {
            return Err(AppError::InvalidConfig(format!(
                "output_dir must be relative to the root, got {}",
                self.output_dir.display()
            )));
        }
        if self.file_prefix.contains(['/', '\\']) {
            return Err(AppError::InvalidConfig(format!(
                "file_prefix must not contain path separators: {}",
                self.file_prefix
            )));
        }
        Ok(())
    }

    pub fn is_ignored(&self, file_name: &str) -> bool {
        self.ignored_files.iter().any(|f| f == file_name)
    }

    /// Name of the converted file for an input file name.
    pub fn output_file_name(&self, file_name: &str) -> String {
        format!("{}{}", self.file_prefix, file_name)
    }
}

/// JSON layout of converted files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Compact,
    Pretty,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Compact => "compact",
            OutputFormat::Pretty => "pretty",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(OutputFormat::Compact),
            "pretty" => Ok(OutputFormat::Pretty),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Resolved output locations for one run: an explicit root joined with the
/// configured output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
    data_dir: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>, config: &FormatterConfig) -> Self {
        let root = root.into();
        let data_dir = root.join(&config.output_dir);
        Self { root, data_dir }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Base output folder, `<root>/<output_dir>`.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Folder a file lands in, optionally below a subfolder of the base.
    ///
    /// The subfolder must be a plain relative path: no root, prefix, `.` or
    /// `..` components, so the result always stays inside the base folder.
    pub fn target_dir(&self, subfolder: Option<&str>) -> Result<PathBuf, AppError> {
        let Some(sub) = subfolder else {
            return Ok(self.data_dir.clone());
        };
        let sub_path = Path::new(sub);
        let nested = sub_path
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if sub.is_empty() || !nested {
            return Err(AppError::InvalidConfig(format!(
                "output subfolder must be a relative path below {}, got '{}'",
                self.data_dir.display(),
                sub
            )));
        }
        Ok(self.data_dir.join(sub_path))
    }
}

/// Reject output file names that are empty, special, or contain a path separator.
pub fn validate_file_name(name: &str) -> Result<(), AppError> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(AppError::InvalidConfig(format!(
            "output file name must be a bare file name, got '{}'",
            name
        )));
    }
    Ok(())
}
