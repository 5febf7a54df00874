//! Blocks without a data dependency: text, headings, lists, media, tables.
//!
//! They render their payload straight into the tree and save it back
//! untouched.

use crate::{
    BlockKind, BlockPlugin, EditorResult, FetchError, FetchOutcome, FetchRequest, FetchTicket,
    FetchedEntities, HostApi, Lifecycle, LifecycleState, SelectOutcome,
};
use guide_document::BlockData;
use guide_render::{RenderTree, VNode};
use serde_json::Value;

const DEFAULT_HEADER_LEVEL: u64 = 3;

#[derive(Debug)]
pub struct StaticBlock {
    kind: BlockKind,
    data: BlockData,
    host: HostApi,
    lifecycle: Lifecycle,
    tree: RenderTree,
}

impl StaticBlock {
    pub fn new(kind: BlockKind, data: BlockData, host: HostApi) -> Self {
        Self {
            kind,
            data,
            host,
            lifecycle: Lifecycle::new(),
            tree: RenderTree::new(),
        }
    }

    fn text(&self, key: &str) -> String {
        self.data
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }

    fn content(&self) -> VNode {
        match self.kind {
            BlockKind::Paragraph => paragraph(&self.text("text")),
            BlockKind::Header => {
                let level = self
                    .data
                    .get("level")
                    .and_then(Value::as_u64)
                    .unwrap_or(DEFAULT_HEADER_LEVEL);
                heading(level, &self.text("text"))
            }
            BlockKind::Title => {
                // "H1".."H6"
                let level = self
                    .text("titleType")
                    .trim_start_matches(['H', 'h'])
                    .parse()
                    .unwrap_or(1);
                heading(level, &self.text("text")).with_class("title")
            }
            BlockKind::Quote => {
                let mut quote = VNode::element("blockquote").with_child(paragraph(&self.text("text")));
                let caption = self.text("caption");
                if !caption.is_empty() {
                    quote = quote.with_child(VNode::element("cite").with_child(VNode::text(caption)));
                }
                quote
            }
            BlockKind::Warning => VNode::element("div")
                .with_class("warning")
                .with_attr("role", "note")
                .with_child(VNode::element("strong").with_child(VNode::text(self.text("title"))))
                .with_child(paragraph(&self.text("message"))),
            BlockKind::Delimiter => VNode::element("hr").with_class("delimiter"),
            BlockKind::List => {
                let ordered = self.text("style") == "ordered";
                list(ordered, self.data.get("items"))
            }
            BlockKind::Image => {
                let url = self
                    .data
                    .get("file")
                    .and_then(|file| file.get("url"))
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                let caption = self.text("caption");
                let mut figure = VNode::element("figure").with_child(
                    VNode::element("img")
                        .with_attr("src", url)
                        .with_attr("alt", caption.clone()),
                );
                for flag in ["withBorder", "stretched", "withBackground"] {
                    if self.data.get(flag).and_then(Value::as_bool) == Some(true) {
                        figure = figure.with_class(flag);
                    }
                }
                if !caption.is_empty() {
                    figure = figure.with_child(VNode::element("figcaption").with_child(VNode::text(caption)));
                }
                figure
            }
            BlockKind::Table => {
                let headings = self.data.get("withHeadings").and_then(Value::as_bool) == Some(true);
                table(headings, self.data.get("content"))
            }
            BlockKind::Code => VNode::element("pre")
                .with_child(VNode::element("code").with_child(VNode::text(self.text("code")))),
            BlockKind::Raw => VNode::element("div")
                .with_class("raw-html")
                .with_child(VNode::text(self.text("html"))),
            BlockKind::ProductPicker | BlockKind::StorePicker => {
                VNode::error(format!("{:?} is not a static block", self.kind))
            }
        }
    }
}

fn paragraph(text: &str) -> VNode {
    VNode::element("p").with_child(VNode::text(text))
}

fn heading(level: u64, text: &str) -> VNode {
    VNode::element(format!("h{}", level.clamp(1, 6))).with_child(VNode::text(text))
}

/// Items are strings, or `{ content, items }` objects for nested lists
fn list(ordered: bool, items: Option<&Value>) -> VNode {
    let tag = if ordered { "ol" } else { "ul" };
    let items = items.and_then(Value::as_array).map(Vec::as_slice).unwrap_or_default();

    VNode::element(tag).with_children(
        items
            .iter()
            .map(|item| match item {
                Value::String(text) => VNode::element("li").with_child(VNode::text(text.as_str())),
                Value::Object(object) => {
                    let content = object.get("content").and_then(Value::as_str).unwrap_or_default();
                    let mut li = VNode::element("li").with_child(VNode::text(content));
                    let nested = object.get("items");
                    if nested.and_then(Value::as_array).is_some_and(|n| !n.is_empty()) {
                        li = li.with_child(list(ordered, nested));
                    }
                    li
                }
                other => VNode::element("li").with_child(VNode::text(other.to_string())),
            })
            .collect(),
    )
}

fn table(with_headings: bool, content: Option<&Value>) -> VNode {
    let rows = content.and_then(Value::as_array).map(Vec::as_slice).unwrap_or_default();

    VNode::element("table").with_children(
        rows.iter()
            .enumerate()
            .map(|(index, row)| {
                let cell_tag = if with_headings && index == 0 { "th" } else { "td" };
                let cells = row.as_array().map(Vec::as_slice).unwrap_or_default();
                VNode::element("tr").with_children(
                    cells
                        .iter()
                        .map(|cell| {
                            let text = cell.as_str().map(str::to_string).unwrap_or_else(|| cell.to_string());
                            VNode::element(cell_tag).with_child(VNode::text(text))
                        })
                        .collect(),
                )
            })
            .collect(),
    )
}

impl BlockPlugin for StaticBlock {
    fn kind(&self) -> BlockKind {
        self.kind
    }

    fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    fn render(&mut self) -> EditorResult<Option<FetchRequest>> {
        if self.lifecycle.begin_render().is_none() {
            return Ok(None);
        }
        let root = VNode::element("div")
            .with_class("static-block")
            .with_class(self.kind.default_tag())
            .with_attr("dir", self.host.language().dir())
            .with_child(self.content());
        self.tree.mount(root);
        self.lifecycle.advance(LifecycleState::Interactive);
        Ok(None)
    }

    fn on_fetch(
        &mut self,
        _ticket: FetchTicket,
        _result: Result<FetchedEntities, FetchError>,
    ) -> EditorResult<FetchOutcome> {
        Ok(FetchOutcome::Ignored)
    }

    fn on_select(&mut self, _value: &str) -> EditorResult<SelectOutcome> {
        Ok(SelectOutcome::Unsupported)
    }

    fn save(&self) -> BlockData {
        self.data.clone()
    }

    fn on_destroy(&mut self) {
        self.lifecycle.advance(LifecycleState::Destroyed);
    }

    fn tree(&self) -> &RenderTree {
        &self.tree
    }
}
