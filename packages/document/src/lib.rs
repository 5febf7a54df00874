//! # Guide Document
//!
//! Serializable model of a guide's rich-text content.
//!
//! A document is an ordered list of blocks. Each block is a type tag plus an
//! opaque `data` object owned by whichever block plugin renders it. Order is
//! the only identity a block has; saving always rewrites the full sequence.
//!
//! ## Persisted shape
//!
//! ```text
//! {
//!   "time": 1700000000000,          // optional, preserved, never injected
//!   "blocks": [
//!     { "id": "x1", "type": "productPlugin", "data": { "id": "p1" } }
//!   ],
//!   "version": "2.30.7"             // optional, preserved
//! }
//! ```

mod document;
mod errors;
mod payload;

pub use document::{Block, BlockData, Document};
pub use errors::DocumentFormatError;
pub use payload::PickerBlockPayload;
