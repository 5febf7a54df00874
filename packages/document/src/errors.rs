//! Error types for the document model

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentFormatError {
    #[error("Malformed document JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("Failed to serialize document: {0}")]
    Serialize(#[source] serde_json::Error),
}
