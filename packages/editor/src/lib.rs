//! # Guide Editor
//!
//! Block editor core for rich guide content.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ host: (initial value, on_change) seam       │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: mounted blocks + fetch dispatch     │
//! │  - Resolve block tags through the registry  │
//! │  - Run entity fetches off the caller's task │
//! │  - Drop stale or orphaned completions       │
//! │  - Save by pulling every block's payload    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ plugins: one render tree per block          │
//! │  - Product / store pickers                  │
//! │  - Static text, media and table blocks      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Rendering never waits**: a block renders its select first and asks
//!    for data afterwards
//! 2. **Blocks own their subtree**: no block touches another block's tree
//! 3. **Failures stay local**: a failed fetch is inline text in that block
//! 4. **Save is a pull**: the document is assembled only when saved
//!
//! ## Usage
//!
//! ```rust,ignore
//! use guide_editor::{EditorConfig, EditorHost};
//! use guide_gateway::{GatewayConfig, HttpGateway};
//! use std::sync::Arc;
//!
//! let gateway = Arc::new(HttpGateway::new(GatewayConfig::default())?);
//! let mut host = EditorHost::mount(
//!     stored_json,
//!     |value| form.set_field("content", value),
//!     gateway,
//!     EditorConfig::default(),
//! )?;
//!
//! host.settle().await;
//! if let Some(product) = host.editor().and_then(|e| e.instance_at(0)) {
//!     host.select(product, "p1")?;
//! }
//! ```

mod config;
mod editor;
mod errors;
mod host;
mod picker;
mod plugin;
mod product;
mod registry;
mod static_block;
mod store;

pub use config::{EditorConfig, PluginConfig};
pub use editor::{Editor, EditorEvent, InstanceId};
pub use errors::{EditorError, EditorResult, FetchError, RegistryError};
pub use host::{ChangeHandler, EditorHost};
pub use picker::{PickerBlock, PickerEntity};
pub use plugin::{
    BlockPlugin, FetchOutcome, FetchRequest, FetchTicket, FetchedEntities, HostApi, Lifecycle,
    LifecycleState, SelectOutcome,
};
pub use product::{currency_decimals, format_price, ProductPickerBlock};
pub use registry::{BlockDescriptor, BlockKind, Registry};
pub use static_block::StaticBlock;
pub use store::StorePickerBlock;
