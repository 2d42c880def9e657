/// All application errors, categorized by domain.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ── Files ──
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read file: {0}")]
    FileRead(String),

    #[error("Failed to write file: {0}")]
    FileWrite(String),

    #[error("File name is not valid UTF-8: {0}")]
    InvalidFileName(String),

    // ── Data ──
    #[error("Invalid JSON in {path}: {message}")]
    InvalidJson { path: String, message: String },

    #[error("Not a dictionary of records: {0}")]
    NotADataset(String),

    #[error("Record '{key}' has no '{field}' field")]
    MissingField { key: String, field: String },

    #[error("Field '{field}' of record '{key}' must be {expected}")]
    InvalidFieldType {
        key: String,
        field: String,
        expected: &'static str,
    },

    // ── Configuration ──
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Serialization ──
    #[error("Serialization error: {0}")]
    Serialization(String),

    // ── General ──
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable code for the error category.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::FileNotFound(_) => "FILE_NOT_FOUND",
            AppError::FileRead(_) => "FILE_READ",
            AppError::FileWrite(_) => "FILE_WRITE",
            AppError::InvalidFileName(_) => "INVALID_FILE_NAME",
            AppError::InvalidJson { .. } => "INVALID_JSON",
            AppError::NotADataset(_) => "NOT_A_DATASET",
            AppError::MissingField { .. } => "MISSING_FIELD",
            AppError::InvalidFieldType { .. } => "INVALID_FIELD_TYPE",
            AppError::InvalidConfig(_) => "INVALID_CONFIG",
            AppError::Serialization(_) => "SERIALIZATION",
            AppError::Internal(_) => "INTERNAL",
        }
    }
}

// ── Conversions from external errors ──

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::FileRead(err.to_string())
    }
}
