use thiserror::Error;

// Exit statuses shared with the calling infrastructure. Only these four
// codes are contractual; every other failure class exits with the generic
// status.
pub const EXIT_DEPENDENCY: i32 = 1;
pub const EXIT_BAD_ARGUMENTS: i32 = 2;
pub const EXIT_FILE_NOT_FOUND: i32 = 6;
pub const EXIT_INVALID_JSON: i32 = 7;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Wrong arguments")]
    BadArguments,
    #[error("JSON file {0} doesn't exist")]
    FileNotFound(String),
    #[error("File {path} is not valid JSON: {source}")]
    InvalidJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed alert: {0}")]
    MalformedAlert(String),
    #[error("Payload construction produced no content")]
    EmptyPayload,
    #[error("Payload serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("HTTP client unavailable: {0}")]
    HttpClient(#[source] reqwest::Error),
    #[error("Delivery failed: {0}")]
    Delivery(#[from] reqwest::Error),
}

impl NotifyError {
    /// Stable process exit status for this failure class.
    pub fn exit_code(&self) -> i32 {
        match self {
            NotifyError::BadArguments => EXIT_BAD_ARGUMENTS,
            NotifyError::FileNotFound(_) => EXIT_FILE_NOT_FOUND,
            NotifyError::InvalidJson { .. } => EXIT_INVALID_JSON,
            NotifyError::HttpClient(_) => EXIT_DEPENDENCY,
            // Unhandled classes share the generic failure status.
            NotifyError::Io { .. }
            | NotifyError::MalformedAlert(_)
            | NotifyError::EmptyPayload
            | NotifyError::Serialization(_)
            | NotifyError::Delivery(_) => 1,
        }
    }
}
