//! # Guide Render
//!
//! Abstract render tree for block plugins.
//!
//! Plugins never touch a real DOM. Each plugin instance owns one
//! [`RenderTree`] and mutates it through [`NodeId`] handles it keeps for the
//! nodes it cares about (its select control, its summary card, its error
//! line). Hosts read immutable [`VNode`] snapshots and draw them however
//! they like; [`html`] turns snapshots into markup.

pub mod html;
mod tree;
mod vdom;
pub mod visitor;

pub use html::{render_html, HtmlOptions};
pub use tree::{NodeId, RenderError, RenderResult, RenderTree};
pub use vdom::{VNode, VirtualDomDocument};
