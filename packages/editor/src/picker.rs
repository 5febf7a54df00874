//! # Picker Blocks
//!
//! Shared implementation of the product and store picker blocks. A picker
//! renders a `<select>` right away, asks for its entity list, and once the
//! list arrives fills the select and shows a summary card for the chosen
//! entity:
//!
//! ```text
//! div.picker-block (dir = ltr | rtl)
//! ├── select.picker-select
//! │   ├── option ""        placeholder
//! │   └── option <id>…     one per selectable entity
//! ├── div.block-error       only after a failed fetch
//! └── div.<card>            only while the payload is resolved
//! ```
//!
//! The card is always built from the payload, never from the fetched
//! entity, so a pre-selected block and a manually selected one render the
//! same card. Pre-selection goes through the same selection path as a
//! change event.

use crate::{
    BlockKind, BlockPlugin, EditorResult, FetchError, FetchOutcome, FetchRequest, FetchTicket,
    FetchedEntities, HostApi, Lifecycle, LifecycleState, PluginConfig, SelectOutcome,
};
use guide_common::Bilingual;
use guide_document::{BlockData, PickerBlockPayload};
use guide_gateway::{EntityKind, ListFilter};
use guide_render::{NodeId, RenderError, RenderTree, VNode};
use std::fmt;
use tracing::{debug, warn};

/// What a picker block picks
pub trait PickerEntity: Bilingual + Clone + fmt::Debug + 'static {
    const ENTITY: EntityKind;
    const BLOCK: BlockKind;
    const ROOT_CLASS: &'static str;
    const PLACEHOLDER: &'static str;
    const LOAD_ERROR: &'static str;

    fn id(&self) -> &str;

    /// Server-side filter of the entity list
    fn list_filter() -> ListFilter;

    /// Client-side guard on top of the server filter
    fn is_selectable(&self) -> bool;

    fn take_list(entities: FetchedEntities) -> Option<Vec<Self>>;

    /// Fields persisted when this entity is selected
    fn to_payload(&self) -> PickerBlockPayload;

    /// Summary card of a resolved payload
    fn card(payload: &PickerBlockPayload, config: &PluginConfig) -> VNode;
}

#[derive(Debug)]
struct Handles {
    root: NodeId,
    select: NodeId,
    /// `(value, option)` in display order, placeholder first
    options: Vec<(String, NodeId)>,
    card: Option<NodeId>,
    error: Option<NodeId>,
}

#[derive(Debug)]
pub struct PickerBlock<E: PickerEntity> {
    initial: BlockData,
    payload: PickerBlockPayload,
    /// Set by the first selection; until then `save` returns `initial`
    touched: bool,
    host: HostApi,
    config: PluginConfig,
    lifecycle: Lifecycle,
    tree: RenderTree,
    handles: Option<Handles>,
    entities: Vec<E>,
}

impl<E: PickerEntity> PickerBlock<E> {
    pub fn new(data: BlockData, host: HostApi, config: PluginConfig) -> Self {
        let payload = PickerBlockPayload::from_data(&data);
        Self {
            initial: data,
            payload,
            touched: false,
            host,
            config,
            lifecycle: Lifecycle::new(),
            tree: RenderTree::new(),
            handles: None,
            entities: Vec::new(),
        }
    }

    pub fn payload(&self) -> &PickerBlockPayload {
        &self.payload
    }

    /// Selectable entities from the last successful fetch
    pub fn entities(&self) -> &[E] {
        &self.entities
    }

    pub fn generation(&self) -> u64 {
        self.lifecycle.generation()
    }

    pub fn has_card(&self) -> bool {
        self.handles.as_ref().is_some_and(|h| h.card.is_some())
    }

    /// Whether the last fetch failed and its inline error is showing
    pub fn has_error(&self) -> bool {
        self.handles.as_ref().is_some_and(|h| h.error.is_some())
    }

    fn handles(&self) -> EditorResult<&Handles> {
        self.handles.as_ref().ok_or_else(|| RenderError::NoRoot.into())
    }

    fn populate_options(&mut self) -> EditorResult<()> {
        let select = self.handles()?.select;
        self.tree.clear_children(select)?;

        let mut options = Vec::with_capacity(self.entities.len() + 1);
        let placeholder = self.tree.append(
            select,
            VNode::element("option")
                .with_attr("value", "")
                .with_child(VNode::text(E::PLACEHOLDER)),
        )?;
        options.push((String::new(), placeholder));

        for entity in &self.entities {
            let option = self.tree.append(
                select,
                VNode::element("option")
                    .with_attr("value", entity.id())
                    .with_child(VNode::text(entity.label(self.config.language))),
            )?;
            options.push((entity.id().to_string(), option));
        }

        self.tree.set_attr(select, "data-state", "ready")?;
        if let Some(handles) = self.handles.as_mut() {
            handles.options = options;
        }
        self.mark_selected("")
    }

    fn mark_selected(&mut self, value: &str) -> EditorResult<()> {
        let handles = self.handles()?;
        let select = handles.select;
        let options = handles.options.clone();

        for (option_value, option) in options {
            let selected = self.tree.attr(option, "selected")?.is_some();
            if option_value == value && !selected {
                self.tree.set_attr(option, "selected", "selected")?;
            } else if option_value != value && selected {
                self.tree.remove_attr(option, "selected")?;
            }
        }
        self.tree.set_attr(select, "value", value)?;
        Ok(())
    }

    fn remove_card(&mut self) -> EditorResult<()> {
        if let Some(card) = self.handles.as_mut().and_then(|h| h.card.take()) {
            self.tree.remove(card)?;
        }
        Ok(())
    }

    /// Replace the card with one built from the current payload
    fn show_card(&mut self) -> EditorResult<()> {
        self.remove_card()?;
        let root = self.handles()?.root;
        let card = self.tree.append(root, E::card(&self.payload, &self.config))?;
        if let Some(handles) = self.handles.as_mut() {
            handles.card = Some(card);
        }
        Ok(())
    }

    fn show_error(&mut self) -> EditorResult<()> {
        let handles = self.handles()?;
        let (root, select) = (handles.root, handles.select);
        self.tree.set_attr(select, "data-state", "error")?;
        let error = self.tree.append(root, VNode::error(E::LOAD_ERROR))?;
        if let Some(handles) = self.handles.as_mut() {
            handles.error = Some(error);
        }
        Ok(())
    }

    fn apply_selection(&mut self, value: &str) -> EditorResult<SelectOutcome> {
        if !self.lifecycle.advance(LifecycleState::Selecting) {
            return Ok(SelectOutcome::NotReady);
        }
        let before = self.save();

        if value.is_empty() {
            self.payload = PickerBlockPayload::empty();
            self.touched = true;
            self.remove_card()?;
            self.mark_selected("")?;
            self.lifecycle.advance(LifecycleState::Interactive);
            return Ok(SelectOutcome::Cleared {
                changed: self.save() != before,
            });
        }

        let Some(entity) = self.entities.iter().find(|e| e.id() == value).cloned() else {
            debug!(entity = %E::ENTITY, id = value, "selected id is not in the fetched list");
            self.lifecycle.advance(LifecycleState::Interactive);
            return Ok(SelectOutcome::NotFound);
        };

        self.payload = entity.to_payload();
        self.touched = true;
        self.show_card()?;
        self.mark_selected(value)?;
        self.lifecycle.advance(LifecycleState::Resolved);
        self.lifecycle.advance(LifecycleState::Interactive);
        Ok(SelectOutcome::Selected {
            changed: self.save() != before,
        })
    }
}

impl<E: PickerEntity> BlockPlugin for PickerBlock<E> {
    fn kind(&self) -> BlockKind {
        E::BLOCK
    }

    fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    fn render(&mut self) -> EditorResult<Option<FetchRequest>> {
        let Some(ticket) = self.lifecycle.begin_render() else {
            return Ok(None);
        };
        self.entities.clear();

        let root = self.tree.mount(
            VNode::element("div")
                .with_class("picker-block")
                .with_class(E::ROOT_CLASS)
                .with_attr("dir", self.host.language().dir()),
        );
        let select = self.tree.append(
            root,
            VNode::element("select")
                .with_class("picker-select")
                .with_attr("data-state", "loading"),
        )?;
        self.handles = Some(Handles {
            root,
            select,
            options: Vec::new(),
            card: None,
            error: None,
        });
        self.lifecycle.advance(LifecycleState::AwaitingFetch);

        let mut filter = E::list_filter();
        if let Some(limit) = self.config.page_limit {
            filter = filter.with_limit(limit);
        }
        Ok(Some(FetchRequest {
            ticket,
            kind: E::ENTITY,
            filter,
        }))
    }

    fn on_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<FetchedEntities, FetchError>,
    ) -> EditorResult<FetchOutcome> {
        if self.lifecycle.is_destroyed() {
            return Ok(FetchOutcome::Destroyed);
        }
        if !self.lifecycle.accepts(ticket) {
            debug!(
                entity = %E::ENTITY,
                generation = ticket.generation,
                current = self.lifecycle.generation(),
                "discarding stale fetch completion"
            );
            return Ok(FetchOutcome::Stale);
        }

        let list = result.and_then(|entities| {
            E::take_list(entities).ok_or(FetchError::UnexpectedEntities {
                expected: E::ENTITY,
            })
        });

        match list {
            Ok(list) => {
                self.lifecycle.advance(LifecycleState::FetchSucceeded);
                self.entities = list.into_iter().filter(|e| e.is_selectable()).collect();
                self.populate_options()?;
                self.lifecycle.advance(LifecycleState::Interactive);

                let Some(id) = self.payload.id.clone().filter(|id| !id.is_empty()) else {
                    return Ok(FetchOutcome::Applied {
                        preselected: false,
                        changed: false,
                    });
                };
                match self.apply_selection(&id)? {
                    SelectOutcome::Selected { changed } => Ok(FetchOutcome::Applied {
                        preselected: true,
                        changed,
                    }),
                    _ => {
                        self.show_card()?;
                        Ok(FetchOutcome::Applied {
                            preselected: false,
                            changed: false,
                        })
                    }
                }
            }
            Err(error) => {
                warn!(entity = %E::ENTITY, %error, "entity list fetch failed");
                self.lifecycle.advance(LifecycleState::FetchFailed);
                self.show_error()?;
                self.lifecycle.advance(LifecycleState::Interactive);
                if self.payload.is_resolved() {
                    self.show_card()?;
                }
                Ok(FetchOutcome::Failed(error))
            }
        }
    }

    fn on_select(&mut self, value: &str) -> EditorResult<SelectOutcome> {
        self.apply_selection(value)
    }

    fn save(&self) -> BlockData {
        if self.touched {
            self.payload.to_data()
        } else {
            self.initial.clone()
        }
    }

    fn on_destroy(&mut self) {
        self.lifecycle.advance(LifecycleState::Destroyed);
        self.entities.clear();
        self.handles = None;
    }

    fn tree(&self) -> &RenderTree {
        &self.tree
    }
}
