use thiserror::Error;

/// Errors shared by every guide-editor crate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommonError {
    #[error("Unsupported language: {0} (expected \"en\" or \"ar\")")]
    UnsupportedLanguage(String),
}
