//! # Block Plugin Lifecycle
//!
//! Contract every block type implements, and the state machine it moves
//! through:
//!
//! ```text
//! Constructed → Rendering → AwaitingFetch → FetchSucceeded ─┐
//!                   │              │       → FetchFailed ───┤
//!                   │              └──── (re-render) ←──────┤
//!                   └──────────────────────────────→ Interactive
//!                                                     ↓     ↑
//!                                         Selecting → Resolved
//!
//! any state → Destroyed
//! ```
//!
//! `render` is synchronous. A plugin that needs data returns a
//! [`FetchRequest`] instead of awaiting anything; the editor runs the fetch
//! and hands the result back through `on_fetch` together with the
//! [`FetchTicket`] it was issued with. A ticket from an older render pass,
//! or any completion after `on_destroy`, is dropped without touching the
//! render tree.

use crate::{BlockKind, EditorResult, FetchError};
use guide_common::Language;
use guide_document::BlockData;
use guide_gateway::{EntityKind, ListFilter, ProductSummary, StoreSummary};
use guide_render::{RenderTree, VNode};
use std::fmt;
use tracing::{debug, trace};

/// Read-only view of the host handed to each instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HostApi {
    language: Language,
}

impl HostApi {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    Constructed,
    Rendering,
    AwaitingFetch,
    FetchSucceeded,
    FetchFailed,
    Interactive,
    Selecting,
    Resolved,
    Destroyed,
}

impl LifecycleState {
    pub fn can_transition(self, to: LifecycleState) -> bool {
        use LifecycleState::*;
        match (self, to) {
            (Destroyed, _) => false,
            (_, Destroyed) => true,
            (Constructed, Rendering)
            | (Rendering, AwaitingFetch)
            | (Rendering, Interactive)
            | (AwaitingFetch, FetchSucceeded)
            | (AwaitingFetch, FetchFailed)
            | (AwaitingFetch, Rendering)
            | (FetchSucceeded, Interactive)
            | (FetchFailed, Interactive)
            | (Interactive, Selecting)
            | (Interactive, Rendering)
            | (Selecting, Resolved)
            | (Selecting, Interactive)
            | (Resolved, Interactive) => true,
            _ => false,
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Identifies the render pass a fetch was issued for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchTicket {
    pub generation: u64,
}

/// State machine plus render generation of one instance
#[derive(Debug, Clone)]
pub struct Lifecycle {
    state: LifecycleState,
    generation: u64,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: LifecycleState::Constructed,
            generation: 0,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_destroyed(&self) -> bool {
        self.state == LifecycleState::Destroyed
    }

    /// Move to `to` if the transition is allowed. Returns whether it happened.
    pub fn advance(&mut self, to: LifecycleState) -> bool {
        if !self.state.can_transition(to) {
            debug!(from = %self.state, to = %to, "lifecycle transition rejected");
            return false;
        }
        trace!(from = %self.state, to = %to, generation = self.generation, "lifecycle");
        self.state = to;
        true
    }

    /// Enter `Rendering` for a new generation
    pub fn begin_render(&mut self) -> Option<FetchTicket> {
        if !self.advance(LifecycleState::Rendering) {
            return None;
        }
        self.generation += 1;
        Some(FetchTicket {
            generation: self.generation,
        })
    }

    /// Whether a completion carrying `ticket` may still be applied
    pub fn accepts(&self, ticket: FetchTicket) -> bool {
        self.state == LifecycleState::AwaitingFetch && ticket.generation == self.generation
    }
}

/// Entity list an instance asks the editor to load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub ticket: FetchTicket,
    pub kind: EntityKind,
    pub filter: ListFilter,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchedEntities {
    Products(Vec<ProductSummary>),
    Stores(Vec<StoreSummary>),
}

impl FetchedEntities {
    pub fn kind(&self) -> EntityKind {
        match self {
            FetchedEntities::Products(_) => EntityKind::Product,
            FetchedEntities::Stores(_) => EntityKind::Store,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            FetchedEntities::Products(list) => list.len(),
            FetchedEntities::Stores(list) => list.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// List applied. `preselected` when the persisted id was found in it;
    /// `changed` when that replaced the saved payload.
    Applied { preselected: bool, changed: bool },
    /// Inline error rendered
    Failed(FetchError),
    /// Completion from an earlier render pass
    Stale,
    /// Instance already destroyed
    Destroyed,
    /// Block type never fetches
    Ignored,
}

impl FetchOutcome {
    pub fn changed(&self) -> bool {
        matches!(self, FetchOutcome::Applied { changed: true, .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Selected { changed: bool },
    Cleared { changed: bool },
    /// Identifier not in the fetched list; previous payload kept
    NotFound,
    /// Instance is not interactive (still fetching, or destroyed)
    NotReady,
    /// Block type has no selection control
    Unsupported,
}

impl SelectOutcome {
    pub fn changed(&self) -> bool {
        matches!(
            self,
            SelectOutcome::Selected { changed: true } | SelectOutcome::Cleared { changed: true }
        )
    }
}

/// A live block instance
pub trait BlockPlugin: fmt::Debug {
    fn kind(&self) -> BlockKind;

    fn state(&self) -> LifecycleState;

    /// Build the render tree. Never blocks; returns the fetch to run, if any.
    fn render(&mut self) -> EditorResult<Option<FetchRequest>>;

    /// Result of a fetch issued by `render`
    fn on_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<FetchedEntities, FetchError>,
    ) -> EditorResult<FetchOutcome>;

    /// Change event from the selection control. `""` is the placeholder.
    fn on_select(&mut self, value: &str) -> EditorResult<SelectOutcome>;

    /// Current payload
    fn save(&self) -> BlockData;

    fn on_destroy(&mut self);

    fn tree(&self) -> &RenderTree;

    /// Snapshot of the render tree; `None` before the first render
    fn view(&self) -> Option<VNode> {
        self.tree().to_vnode().ok()
    }
}
