//! # Host Shell
//!
//! The form-field seam: `(initial value, on_change)` in, serialized document
//! strings out. Malformed input mounts as an empty document. Every change
//! that alters the serialization is forwarded once; teardown happens exactly
//! once, on [`EditorHost::destroy`] or on drop.

use crate::{
    Editor, EditorConfig, EditorError, EditorEvent, EditorResult, InstanceId, Registry,
    SelectOutcome,
};
use guide_common::Language;
use guide_document::{BlockData, Document};
use guide_gateway::EntityGateway;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, warn};

pub type ChangeHandler = Box<dyn FnMut(String)>;

pub struct EditorHost {
    editor: Option<Editor>,
    on_change: ChangeHandler,
    last_forwarded: String,
}

impl fmt::Debug for EditorHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorHost")
            .field("editor", &self.editor)
            .field("last_forwarded", &self.last_forwarded)
            .finish()
    }
}

impl EditorHost {
    /// Mount `initial_value` with the default tool set. Must run inside a
    /// tokio runtime.
    pub fn mount(
        initial_value: &str,
        on_change: impl FnMut(String) + 'static,
        gateway: Arc<dyn EntityGateway>,
        config: EditorConfig,
    ) -> EditorResult<Self> {
        let document = Document::load(Some(initial_value)).unwrap_or_else(|e| {
            warn!("stored guide content is not valid, starting empty: {}", e);
            Document::new()
        });

        let registry = Registry::with_defaults(config.plugin_config());
        let mut editor = Editor::new(registry, gateway, config);
        editor.mount(document)?;
        let last_forwarded = editor.save_json()?;

        Ok(Self {
            editor: Some(editor),
            on_change: Box::new(on_change),
            last_forwarded,
        })
    }

    pub fn editor(&self) -> Option<&Editor> {
        self.editor.as_ref()
    }

    pub fn is_destroyed(&self) -> bool {
        self.editor.is_none()
    }

    /// Last serialization forwarded (or the one taken at mount)
    pub fn value(&self) -> &str {
        &self.last_forwarded
    }

    fn editor_mut(&mut self) -> EditorResult<&mut Editor> {
        self.editor.as_mut().ok_or(EditorError::Destroyed)
    }

    /// Forward the current serialization if it differs from the last one
    fn forward_change(&mut self) {
        let Some(editor) = &self.editor else {
            return;
        };
        match editor.save_json() {
            Ok(json) if json != self.last_forwarded => {
                debug!(bytes = json.len(), "forwarding document change");
                self.last_forwarded = json.clone();
                (self.on_change)(json);
            }
            Ok(_) => {}
            Err(e) => error!("could not serialize document: {}", e),
        }
    }

    /// Apply the next fetch completion. `false` once nothing is in flight.
    pub async fn process_next(&mut self) -> bool {
        let Some(editor) = self.editor.as_mut() else {
            return false;
        };
        let Some(events) = editor.process_next().await else {
            return false;
        };
        if events.iter().any(EditorEvent::changed) {
            self.forward_change();
        }
        true
    }

    /// Apply every in-flight fetch
    pub async fn settle(&mut self) -> Vec<EditorEvent> {
        let Some(editor) = self.editor.as_mut() else {
            return Vec::new();
        };
        let events = editor.settle().await;
        if events.iter().any(EditorEvent::changed) {
            self.forward_change();
        }
        events
    }

    pub fn select(&mut self, instance: InstanceId, value: &str) -> EditorResult<SelectOutcome> {
        let outcome = self.editor_mut()?.select(instance, value)?;
        if outcome.changed() {
            self.forward_change();
        }
        Ok(outcome)
    }

    pub fn insert_block(&mut self, index: usize, tag: &str, data: BlockData) -> EditorResult<InstanceId> {
        let id = self.editor_mut()?.insert_block(index, tag, data)?;
        self.forward_change();
        Ok(id)
    }

    pub fn remove_block(&mut self, instance: InstanceId) -> EditorResult<()> {
        self.editor_mut()?.remove_block(instance)?;
        self.forward_change();
        Ok(())
    }

    pub fn move_block(&mut self, instance: InstanceId, to: usize) -> EditorResult<()> {
        self.editor_mut()?.move_block(instance, to)?;
        self.forward_change();
        Ok(())
    }

    pub fn set_language(&mut self, language: Language) -> EditorResult<()> {
        self.editor_mut()?.set_language(language)
    }

    /// Tear the editor down. Safe to call any number of times; only the
    /// first call does anything.
    pub fn destroy(&mut self) -> bool {
        match self.editor.take() {
            Some(mut editor) => editor.destroy(),
            None => false,
        }
    }
}

impl Drop for EditorHost {
    fn drop(&mut self) {
        self.destroy();
    }
}
