//! # Editor Core
//!
//! Owns the mounted blocks of one document and runs their entity fetches.
//!
//! Everything except the fetches runs on the caller's task. Each fetch is a
//! tokio task that only talks to the gateway; its result comes back through
//! [`Editor::process_next`] / [`Editor::settle`] and is applied to the
//! instance that asked for it if that task is still the instance's current
//! fetch. Re-rendering, removing a block or destroying the editor aborts its
//! pending fetch. A fetch task that panics is reported to its block as a
//! failed fetch.

use crate::{
    BlockDescriptor, BlockPlugin, EditorConfig, EditorError, EditorResult, FetchError,
    FetchOutcome, FetchRequest, FetchTicket, FetchedEntities, HostApi, LifecycleState, Registry,
    SelectOutcome,
};
use guide_common::Language;
use guide_document::{Block, BlockData, Document};
use guide_gateway::{EntityGateway, EntityKind, GatewayResult, ListFilter};
use guide_render::{VNode, VirtualDomDocument};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{AbortHandle, Id as TaskId, JoinSet};
use tracing::{debug, error, info, warn};

/// Identity of a mounted block, stable across moves and re-renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u64);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block-{}", self.0)
    }
}

/// Something that changed while applying fetch results
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    Fetched {
        instance: InstanceId,
        /// Pre-selection replaced the saved payload
        changed: bool,
    },
    FetchFailed {
        instance: InstanceId,
        error: FetchError,
    },
}

impl EditorEvent {
    pub fn instance(&self) -> InstanceId {
        match self {
            EditorEvent::Fetched { instance, .. } | EditorEvent::FetchFailed { instance, .. } => {
                *instance
            }
        }
    }

    pub fn changed(&self) -> bool {
        matches!(self, EditorEvent::Fetched { changed: true, .. })
    }
}

type FetchResult = Result<FetchedEntities, FetchError>;

enum Slot {
    Mounted {
        id: InstanceId,
        block_id: Option<String>,
        type_tag: String,
        plugin: Box<dyn BlockPlugin>,
    },
    /// Block whose tag is not registered; kept so it saves back untouched
    Unknown(Block),
}

pub struct Editor {
    registry: Registry,
    gateway: Arc<dyn EntityGateway>,
    config: EditorConfig,
    language: Language,
    time: Option<i64>,
    version: Option<String>,
    slots: Vec<Slot>,
    next_instance: u64,
    tasks: JoinSet<FetchResult>,
    /// Who each spawned fetch task belongs to
    spawned: HashMap<TaskId, (InstanceId, FetchTicket)>,
    /// Current fetch of each instance
    pending: HashMap<InstanceId, AbortHandle>,
    destroyed: bool,
}

impl fmt::Debug for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Editor")
            .field("blocks", &self.slots.len())
            .field("pending", &self.pending.len())
            .field("language", &self.language)
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

impl Editor {
    /// Freezes `registry`; later registrations fail with
    /// [`RegistryError::Frozen`](crate::RegistryError::Frozen)
    pub fn new(mut registry: Registry, gateway: Arc<dyn EntityGateway>, config: EditorConfig) -> Self {
        registry.freeze();
        Self {
            registry,
            gateway,
            language: config.language,
            config,
            time: None,
            version: None,
            slots: Vec::new(),
            next_instance: 0,
            tasks: JoinSet::new(),
            spawned: HashMap::new(),
            pending: HashMap::new(),
            destroyed: false,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Always fails: the registry is frozen once the editor exists
    pub fn register_tool(&mut self, tag: &str, descriptor: BlockDescriptor) -> EditorResult<()> {
        self.registry.register(tag, descriptor)?;
        Ok(())
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Fetches issued and not yet applied or aborted
    pub fn pending_fetches(&self) -> usize {
        self.pending.len()
    }

    /// Replace the current blocks with those of `document`
    pub fn mount(&mut self, document: Document) -> EditorResult<()> {
        self.ensure_live()?;
        if tokio::runtime::Handle::try_current().is_err() {
            return Err(EditorError::NoRuntime);
        }
        self.clear();
        self.time = document.time;
        self.version = document.version;

        for (index, block) in document.blocks.into_iter().enumerate() {
            let slot = self.instantiate(block);
            self.slots.push(slot);
            self.render_slot(index);
        }
        info!(blocks = self.slots.len(), "document mounted");
        Ok(())
    }

    fn ensure_live(&self) -> EditorResult<()> {
        if self.destroyed {
            return Err(EditorError::Destroyed);
        }
        Ok(())
    }

    fn next_id(&mut self) -> InstanceId {
        self.next_instance += 1;
        InstanceId(self.next_instance)
    }

    fn instantiate(&mut self, block: Block) -> Slot {
        let Some(descriptor) = self.registry.resolve(&block.type_tag) else {
            warn!(tag = %block.type_tag, "unknown block type, rendering placeholder");
            return Slot::Unknown(block);
        };
        let config = descriptor.config.clone().with_language(self.language);
        let plugin = descriptor
            .kind
            .instantiate(block.data, HostApi::new(self.language), config);
        Slot::Mounted {
            id: self.next_id(),
            block_id: block.id,
            type_tag: block.type_tag,
            plugin,
        }
    }

    /// Render the block at `index` and start its fetch, if it has one
    fn render_slot(&mut self, index: usize) {
        let Some(Slot::Mounted { id, plugin, .. }) = self.slots.get_mut(index) else {
            return;
        };
        let id = *id;
        match plugin.render() {
            Ok(Some(request)) => self.dispatch(id, request),
            Ok(None) => {}
            Err(e) => error!(instance = %id, block = index, "render failed: {}", e),
        }
    }

    fn dispatch(&mut self, instance: InstanceId, request: FetchRequest) {
        let gateway = self.gateway.clone();
        let timeout = self.config.fetch_timeout();
        let FetchRequest { ticket, kind, filter } = request;
        debug!(%instance, %kind, generation = ticket.generation, "fetch dispatched");

        let handle = self.tasks.spawn(async move {
            fetch_entities(gateway.as_ref(), kind, &filter, timeout).await
        });
        self.spawned.insert(handle.id(), (instance, ticket));
        if let Some(previous) = self.pending.insert(instance, handle) {
            previous.abort();
        }
    }

    /// Wait for the next fetch to finish and apply it. `None` once nothing is
    /// in flight.
    pub async fn process_next(&mut self) -> Option<Vec<EditorEvent>> {
        let (task, result) = match self.tasks.join_next_with_id().await? {
            Ok((task, result)) => (task, result),
            Err(e) if e.is_cancelled() => {
                self.spawned.remove(&e.id());
                return Some(Vec::new());
            }
            Err(e) => {
                error!("fetch task failed: {}", e);
                (e.id(), Err(FetchError::TaskFailed(e.to_string())))
            }
        };
        let Some((instance, ticket)) = self.spawned.remove(&task) else {
            return Some(Vec::new());
        };
        Some(self.apply(task, instance, ticket, result).into_iter().collect())
    }

    /// Apply every in-flight fetch, in completion order
    pub async fn settle(&mut self) -> Vec<EditorEvent> {
        let mut events = Vec::new();
        while let Some(batch) = self.process_next().await {
            events.extend(batch);
        }
        events
    }

    fn apply(
        &mut self,
        task: TaskId,
        instance: InstanceId,
        ticket: FetchTicket,
        result: FetchResult,
    ) -> Option<EditorEvent> {
        let current = self
            .pending
            .get(&instance)
            .is_some_and(|handle| handle.id() == task);
        if !current {
            debug!(%instance, generation = ticket.generation, "superseded fetch dropped");
            return None;
        }
        self.pending.remove(&instance);

        let Some(plugin) = self.plugin_mut(instance) else {
            debug!(%instance, "fetch completed for a removed block");
            return None;
        };

        match plugin.on_fetch(ticket, result) {
            Ok(FetchOutcome::Applied { changed, .. }) => {
                Some(EditorEvent::Fetched { instance, changed })
            }
            Ok(FetchOutcome::Failed(error)) => Some(EditorEvent::FetchFailed { instance, error }),
            Ok(outcome) => {
                debug!(%instance, generation = ticket.generation, ?outcome, "fetch completion dropped");
                None
            }
            Err(e) => {
                error!(%instance, "applying fetch result failed: {}", e);
                None
            }
        }
    }

    fn position(&self, instance: InstanceId) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| matches!(slot, Slot::Mounted { id, .. } if *id == instance))
    }

    fn plugin_mut(&mut self, instance: InstanceId) -> Option<&mut Box<dyn BlockPlugin>> {
        self.slots.iter_mut().find_map(|slot| match slot {
            Slot::Mounted { id, plugin, .. } if *id == instance => Some(plugin),
            _ => None,
        })
    }

    pub fn plugin(&self, instance: InstanceId) -> Option<&dyn BlockPlugin> {
        self.slots.iter().find_map(|slot| match slot {
            Slot::Mounted { id, plugin, .. } if *id == instance => Some(plugin.as_ref()),
            _ => None,
        })
    }

    /// Instance mounted at `index`; `None` for unknown block types
    pub fn instance_at(&self, index: usize) -> Option<InstanceId> {
        match self.slots.get(index)? {
            Slot::Mounted { id, .. } => Some(*id),
            Slot::Unknown(_) => None,
        }
    }

    pub fn instances(&self) -> Vec<InstanceId> {
        (0..self.slots.len())
            .filter_map(|index| self.instance_at(index))
            .collect()
    }

    pub fn state(&self, instance: InstanceId) -> Option<LifecycleState> {
        self.plugin(instance).map(|plugin| plugin.state())
    }

    /// Inline error a block is showing, e.g. after its entity list failed
    /// to load
    pub fn load_error(&self, instance: InstanceId) -> Option<String> {
        let node = self.plugin(instance)?.view()?;
        guide_render::visitor::error_messages(std::slice::from_ref(&node))
            .first()
            .map(|message| message.to_string())
    }

    /// Change event from a block's selection control
    pub fn select(&mut self, instance: InstanceId, value: &str) -> EditorResult<SelectOutcome> {
        self.ensure_live()?;
        let plugin = self
            .plugin_mut(instance)
            .ok_or(EditorError::UnknownInstance(instance))?;
        let outcome = plugin.on_select(value)?;
        debug!(%instance, value, ?outcome, "selection");
        Ok(outcome)
    }

    /// Insert a new block of type `tag` at `index` (clamped to the end)
    pub fn insert_block(&mut self, index: usize, tag: &str, data: BlockData) -> EditorResult<InstanceId> {
        self.ensure_live()?;
        if self.registry.resolve(tag).is_none() {
            return Err(EditorError::UnknownBlockType(tag.to_string()));
        }
        let index = index.min(self.slots.len());
        let slot = self.instantiate(Block::new(tag, data));
        let Slot::Mounted { id, .. } = &slot else {
            return Err(EditorError::UnknownBlockType(tag.to_string()));
        };
        let id = *id;
        self.slots.insert(index, slot);
        self.render_slot(index);
        Ok(id)
    }

    /// Destroy and remove a block
    pub fn remove_block(&mut self, instance: InstanceId) -> EditorResult<()> {
        self.ensure_live()?;
        let index = self
            .position(instance)
            .ok_or(EditorError::UnknownInstance(instance))?;
        if let Slot::Mounted { mut plugin, .. } = self.slots.remove(index) {
            self.abort_fetch(instance);
            plugin.on_destroy();
        }
        debug!(%instance, "block removed");
        Ok(())
    }

    /// Move a block to `to` (clamped to the end)
    pub fn move_block(&mut self, instance: InstanceId, to: usize) -> EditorResult<()> {
        self.ensure_live()?;
        let from = self
            .position(instance)
            .ok_or(EditorError::UnknownInstance(instance))?;
        let slot = self.slots.remove(from);
        let to = to.min(self.slots.len());
        self.slots.insert(to, slot);
        Ok(())
    }

    /// Re-mount every block in `language`, carrying over its current
    /// payload. Instance ids survive; fetches still in flight are aborted.
    pub fn set_language(&mut self, language: Language) -> EditorResult<()> {
        self.ensure_live()?;
        if language == self.language {
            return Ok(());
        }
        self.language = language;

        for index in 0..self.slots.len() {
            let Slot::Mounted {
                id,
                type_tag,
                plugin,
                ..
            } = &mut self.slots[index]
            else {
                continue;
            };
            let Some(descriptor) = self.registry.resolve(type_tag) else {
                continue;
            };
            let id = *id;
            let data = plugin.save();
            plugin.on_destroy();
            *plugin = descriptor.kind.instantiate(
                data,
                HostApi::new(language),
                descriptor.config.clone().with_language(language),
            );
            self.abort_fetch(id);
            self.render_slot(index);
        }
        info!(%language, "editor language changed");
        Ok(())
    }

    /// Pull every block's current payload
    pub fn save(&self) -> Document {
        let blocks = self
            .slots
            .iter()
            .map(|slot| match slot {
                Slot::Mounted {
                    block_id,
                    type_tag,
                    plugin,
                    ..
                } => Block {
                    id: block_id.clone(),
                    type_tag: type_tag.clone(),
                    data: plugin.save(),
                },
                Slot::Unknown(block) => block.clone(),
            })
            .collect();

        Document {
            time: self.time,
            blocks,
            version: self.version.clone(),
        }
    }

    pub fn save_json(&self) -> EditorResult<String> {
        Ok(self.save().to_json()?)
    }

    /// Render snapshot of every block, in document order
    pub fn view(&self) -> VirtualDomDocument {
        let mut document = VirtualDomDocument::new();
        for slot in &self.slots {
            let node = match slot {
                Slot::Mounted { id, plugin, .. } => plugin
                    .view()
                    .map(|node| node.with_key(id.to_string()))
                    .unwrap_or_else(|| VNode::error(format!("Block {} is not rendered", id))),
                Slot::Unknown(block) => VNode::error(format!("Unknown block type: {}", block.type_tag)),
            };
            document.add_node(node);
        }
        document
    }

    fn abort_fetch(&mut self, instance: InstanceId) {
        if let Some(handle) = self.pending.remove(&instance) {
            debug!(%instance, "pending fetch aborted");
            handle.abort();
        }
    }

    fn clear(&mut self) {
        self.tasks.abort_all();
        self.spawned.clear();
        self.pending.clear();
        for slot in &mut self.slots {
            if let Slot::Mounted { plugin, .. } = slot {
                plugin.on_destroy();
            }
        }
        self.slots.clear();
    }

    /// Tear down every block. Returns `false` if already destroyed.
    pub fn destroy(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        self.clear();
        self.destroyed = true;
        info!("editor destroyed");
        true
    }
}

async fn fetch_entities(
    gateway: &dyn EntityGateway,
    kind: EntityKind,
    filter: &ListFilter,
    timeout: Duration,
) -> Result<FetchedEntities, FetchError> {
    let fetch = async {
        let entities: GatewayResult<FetchedEntities> = match kind {
            EntityKind::Product => gateway
                .list_products(filter)
                .await
                .map(|page| FetchedEntities::Products(page.data)),
            EntityKind::Store => gateway
                .list_stores(filter)
                .await
                .map(|page| FetchedEntities::Stores(page.data)),
        };
        entities
    };
    match tokio::time::timeout(timeout, fetch).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(FetchError::Timeout(timeout)),
    }
}

impl Drop for Editor {
    fn drop(&mut self) {
        self.destroy();
    }
}
