//! # Block Type Registry
//!
//! Maps the `type` tag of a persisted block to the tool that renders it.
//! Registration is last-wins per tag; [`Registry::freeze`] (called when the
//! editor is constructed) turns every later registration into
//! [`RegistryError::Frozen`].

use crate::product::ProductPickerBlock;
use crate::store::StorePickerBlock;
use crate::static_block::StaticBlock;
use crate::{BlockPlugin, HostApi, PluginConfig, RegistryError};
use guide_document::BlockData;
use std::collections::BTreeMap;
use tracing::debug;

/// Every block tool the editor knows how to instantiate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlockKind {
    Paragraph,
    Header,
    Title,
    Quote,
    Warning,
    Delimiter,
    List,
    Image,
    Table,
    Code,
    Raw,
    ProductPicker,
    StorePicker,
}

impl BlockKind {
    pub const ALL: [BlockKind; 13] = [
        BlockKind::Paragraph,
        BlockKind::Header,
        BlockKind::Title,
        BlockKind::Quote,
        BlockKind::Warning,
        BlockKind::Delimiter,
        BlockKind::List,
        BlockKind::Image,
        BlockKind::Table,
        BlockKind::Code,
        BlockKind::Raw,
        BlockKind::ProductPicker,
        BlockKind::StorePicker,
    ];

    /// Tag this kind is registered under by default, as found in saved guides
    pub fn default_tag(&self) -> &'static str {
        match self {
            BlockKind::Paragraph => "paragraph",
            BlockKind::Header => "header",
            BlockKind::Title => "title",
            BlockKind::Quote => "quote",
            BlockKind::Warning => "warning",
            BlockKind::Delimiter => "delimiter",
            BlockKind::List => "list",
            BlockKind::Image => "image",
            BlockKind::Table => "table",
            BlockKind::Code => "code",
            BlockKind::Raw => "raw",
            BlockKind::ProductPicker => "productPlugin",
            BlockKind::StorePicker => "StorePlugin",
        }
    }

    pub fn toolbox_title(&self) -> &'static str {
        match self {
            BlockKind::Paragraph => "Text",
            BlockKind::Header => "Heading",
            BlockKind::Title => "Title",
            BlockKind::Quote => "Quote",
            BlockKind::Warning => "Warning",
            BlockKind::Delimiter => "Delimiter",
            BlockKind::List => "List",
            BlockKind::Image => "Image",
            BlockKind::Table => "Table",
            BlockKind::Code => "Code",
            BlockKind::Raw => "Raw HTML",
            BlockKind::ProductPicker => "Product",
            BlockKind::StorePicker => "Store",
        }
    }

    pub fn is_picker(&self) -> bool {
        matches!(self, BlockKind::ProductPicker | BlockKind::StorePicker)
    }

    /// Construct an instance in the `Constructed` state
    pub fn instantiate(
        &self,
        data: BlockData,
        host: HostApi,
        config: PluginConfig,
    ) -> Box<dyn BlockPlugin> {
        match self {
            BlockKind::ProductPicker => Box::new(ProductPickerBlock::new(data, host, config)),
            BlockKind::StorePicker => Box::new(StorePickerBlock::new(data, host, config)),
            kind => Box::new(StaticBlock::new(*kind, data, host)),
        }
    }
}

/// What a tag resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockDescriptor {
    pub kind: BlockKind,
    pub title: String,
    /// Static configuration given to every instance of this tool
    pub config: PluginConfig,
}

impl BlockDescriptor {
    pub fn new(kind: BlockKind, config: PluginConfig) -> Self {
        Self {
            kind,
            title: kind.toolbox_title().to_string(),
            config,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    tools: BTreeMap<String, BlockDescriptor>,
    frozen: bool,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every block kind under its default tag
    pub fn with_defaults(config: PluginConfig) -> Self {
        let mut registry = Self::new();
        for kind in BlockKind::ALL {
            registry
                .tools
                .insert(kind.default_tag().to_string(), BlockDescriptor::new(kind, config.clone()));
        }
        registry
    }

    pub fn register(
        &mut self,
        tag: impl Into<String>,
        descriptor: BlockDescriptor,
    ) -> Result<(), RegistryError> {
        let tag = tag.into();
        if self.frozen {
            return Err(RegistryError::Frozen { tag });
        }
        if tag.is_empty() {
            return Err(RegistryError::EmptyTag);
        }
        if let Some(previous) = self.tools.insert(tag.clone(), descriptor) {
            debug!(%tag, previous = ?previous.kind, "block tool re-registered");
        }
        Ok(())
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn resolve(&self, tag: &str) -> Option<&BlockDescriptor> {
        self.tools.get(tag)
    }

    /// Registered tools ordered by tag
    pub fn tools(&self) -> impl Iterator<Item = (&str, &BlockDescriptor)> {
        self.tools.iter().map(|(tag, d)| (tag.as_str(), d))
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
