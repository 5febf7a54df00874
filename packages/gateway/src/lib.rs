//! # Guide Gateway
//!
//! Read-only access to the catalog entities a guide can embed.
//!
//! Picker blocks only ever list entities: active, approved products and
//! active stores. [`EntityGateway`] is that seam; [`HttpGateway`] talks to
//! the console's REST API and [`MemoryGateway`] serves fixtures (tests,
//! offline rendering).

mod errors;
mod gateway;
mod http;
mod memory;
mod types;

pub use errors::{GatewayError, GatewayResult};
pub use gateway::EntityGateway;
pub use http::{GatewayConfig, HttpGateway};
pub use memory::{Catalog, Gate, MemoryGateway};
pub use types::{
    EntityKind, EntityStatus, ImageRef, ListFilter, Paginated, ProductSummary, StoreSummary,
};
