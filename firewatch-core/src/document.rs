use crate::error::NotifyError;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use tracing::{debug, error};

/// Read and parse a JSON document from disk.
///
/// A missing file and unparseable content are distinct failure classes so
/// the calling infrastructure can tell them apart by exit status alone.
pub fn load_json_document(path: &str) -> Result<Value, NotifyError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => {
            debug!("Read {} bytes from {}", text.len(), path);
            text
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            error!("JSON file {} doesn't exist", path);
            return Err(NotifyError::FileNotFound(path.to_string()));
        }
        Err(e) => {
            error!("Failed to read {}: {}", path, e);
            return Err(NotifyError::Io {
                path: path.to_string(),
                source: e,
            });
        }
    };

    serde_json::from_str(&text).map_err(|e| {
        error!("Failed to parse {} as JSON: {}", path, e);
        NotifyError::InvalidJson {
            path: path.to_string(),
            source: e,
        }
    })
}
