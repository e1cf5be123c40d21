//! Structured error types for the Folio layout engine.
//!
//! Blank text and empty tables are not errors (they are no-ops), and bad
//! column counts are clamped. What remains are the failures a caller has
//! to handle: request parsing, image decoding, persistence, and calls made
//! in the wrong lifecycle state.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FolioError>;

/// The unified error type returned by all public Folio API functions.
#[derive(Debug, Error)]
pub enum FolioError {
    /// JSON input failed to parse as a valid document request.
    #[error("Failed to parse document request: {source}{}", hint_suffix(.hint))]
    Parse {
        source: serde_json::Error,
        hint: String,
    },

    /// Image bytes could not be decoded or are in an unsupported format.
    #[error("Image error: {0}")]
    Image(String),

    /// Persisting the finished document failed.
    #[error("Failed to write '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The document was already rendered; call `reset()` to start another.
    #[error("Document already finished; reset the engine before adding content")]
    DocumentFinished,

    /// Row/column grid calls issued out of order.
    #[error("Row grid misuse: {0}")]
    RowState(&'static str),
}

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {hint}")
    }
}

impl From<serde_json::Error> for FolioError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the request schema. Check content \"type\" values and field names.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        FolioError::Parse { source: e, hint }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_error_carries_hint() {
        let err: FolioError = serde_json::from_str::<serde_json::Value>("{,}")
            .unwrap_err()
            .into();
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to parse document request"));
        assert!(msg.contains("Hint: Check for trailing commas"));
    }

    #[test]
    fn io_error_names_the_path() {
        let err = FolioError::Io {
            path: PathBuf::from("/nope/out.pdf"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains("/nope/out.pdf"));
    }
}
