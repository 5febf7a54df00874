//! Error types for the editor

use crate::InstanceId;
use guide_document::DocumentFormatError;
use guide_gateway::{EntityKind, GatewayError};
use guide_render::RenderError;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Document format error: {0}")]
    Document(#[from] DocumentFormatError),

    #[error("Unknown block type: {0}")]
    UnknownBlockType(String),

    #[error("Unknown block instance: {0}")]
    UnknownInstance(InstanceId),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Editor has been destroyed")]
    Destroyed,

    #[error("Entity fetches need a running tokio runtime")]
    NoRuntime,
}

pub type EditorResult<T> = Result<T, EditorError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Cannot register {tag:?}: registry is frozen once the editor is constructed")]
    Frozen { tag: String },

    #[error("Block type tag must not be empty")]
    EmptyTag,
}

/// Why a block's entity list could not be loaded
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("entity list request timed out after {0:?}")]
    Timeout(Duration),

    #[error("entity list task failed: {0}")]
    TaskFailed(String),

    #[error("expected a {expected} list")]
    UnexpectedEntities { expected: EntityKind },
}
