//! # Render Tree
//!
//! Mutable arena of nodes owned by a single plugin instance.
//!
//! Nodes are addressed by [`NodeId`] handles. Removing a node frees its
//! whole subtree; ids are never reused, so a handle to a removed node fails
//! with [`RenderError::NodeNotFound`] instead of silently pointing at
//! something else. Every successful mutation bumps [`RenderTree::revision`].

use crate::VNode;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Handle to a node inside one [`RenderTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Node is not an element: {0}")]
    NotAnElement(NodeId),

    #[error("Node {0} is already attached to a parent")]
    AlreadyAttached(NodeId),

    #[error("Tree has no root")]
    NoRoot,
}

pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Debug, Clone)]
enum NodeKind {
    Element {
        tag: String,
        attributes: BTreeMap<String, String>,
        styles: BTreeMap<String, String>,
        key: Option<String>,
    },
    Text(String),
    Comment(String),
    Error(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct RenderTree {
    nodes: Vec<Option<Node>>,
    root: Option<NodeId>,
    revision: u64,
}

impl RenderTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a detached subtree from a snapshot and return its top node
    pub fn create(&mut self, vnode: VNode) -> NodeId {
        let id = self.insert_detached(vnode);
        self.revision += 1;
        id
    }

    fn insert_detached(&mut self, vnode: VNode) -> NodeId {
        let (kind, children) = match vnode {
            VNode::Element {
                tag,
                attributes,
                styles,
                children,
                key,
            } => (
                NodeKind::Element {
                    tag,
                    attributes,
                    styles,
                    key,
                },
                children,
            ),
            VNode::Text { content } => (NodeKind::Text(content), Vec::new()),
            VNode::Comment { content } => (NodeKind::Comment(content), Vec::new()),
            VNode::Error { message } => (NodeKind::Error(message), Vec::new()),
        };

        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Node {
            kind,
            parent: None,
            children: Vec::new(),
        }));

        for child in children {
            let child_id = self.insert_detached(child);
            if let Some(node) = self.nodes[child_id.0].as_mut() {
                node.parent = Some(id);
            }
            if let Some(node) = self.nodes[id.0].as_mut() {
                node.children.push(child_id);
            }
        }
        id
    }

    /// Create a subtree and make it the root. Any previous root is freed.
    pub fn mount(&mut self, vnode: VNode) -> NodeId {
        if let Some(old) = self.root.take() {
            self.free(old);
        }
        let id = self.create(vnode);
        self.root = Some(id);
        id
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Number of successful mutations so far
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_ok()
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, id: NodeId) -> RenderResult<&Node> {
        self.nodes
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or(RenderError::NodeNotFound(id))
    }

    fn get_mut(&mut self, id: NodeId) -> RenderResult<&mut Node> {
        self.nodes
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(RenderError::NodeNotFound(id))
    }

    pub fn children(&self, id: NodeId) -> RenderResult<&[NodeId]> {
        Ok(&self.get(id)?.children)
    }

    pub fn parent(&self, id: NodeId) -> RenderResult<Option<NodeId>> {
        Ok(self.get(id)?.parent)
    }

    /// Attach a detached node as the last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> RenderResult<()> {
        if !matches!(self.get(parent)?.kind, NodeKind::Element { .. }) {
            return Err(RenderError::NotAnElement(parent));
        }
        let child_node = self.get_mut(child)?;
        if child_node.parent.is_some() {
            return Err(RenderError::AlreadyAttached(child));
        }
        child_node.parent = Some(parent);
        self.get_mut(parent)?.children.push(child);
        self.revision += 1;
        Ok(())
    }

    /// Build `vnode` and append it under `parent` in one step
    pub fn append(&mut self, parent: NodeId, vnode: VNode) -> RenderResult<NodeId> {
        if !matches!(self.get(parent)?.kind, NodeKind::Element { .. }) {
            return Err(RenderError::NotAnElement(parent));
        }
        let id = self.create(vnode);
        self.append_child(parent, id)?;
        Ok(id)
    }

    /// Detach `id` from its parent and free its subtree
    pub fn remove(&mut self, id: NodeId) -> RenderResult<()> {
        let parent = self.get(id)?.parent;
        if let Some(parent) = parent {
            self.get_mut(parent)?.children.retain(|c| *c != id);
        }
        if self.root == Some(id) {
            self.root = None;
        }
        self.free(id);
        self.revision += 1;
        Ok(())
    }

    /// Free every child of `id`
    pub fn clear_children(&mut self, id: NodeId) -> RenderResult<()> {
        let children = std::mem::take(&mut self.get_mut(id)?.children);
        for child in children {
            self.free(child);
        }
        self.revision += 1;
        Ok(())
    }

    fn free(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get_mut(id.0).and_then(Option::take) else {
            return;
        };
        for child in node.children {
            self.free(child);
        }
    }

    pub fn set_attr(
        &mut self,
        id: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> RenderResult<()> {
        match &mut self.get_mut(id)?.kind {
            NodeKind::Element { attributes, .. } => {
                attributes.insert(name.into(), value.into());
            }
            _ => return Err(RenderError::NotAnElement(id)),
        }
        self.revision += 1;
        Ok(())
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> RenderResult<()> {
        match &mut self.get_mut(id)?.kind {
            NodeKind::Element { attributes, .. } => {
                attributes.remove(name);
            }
            _ => return Err(RenderError::NotAnElement(id)),
        }
        self.revision += 1;
        Ok(())
    }

    pub fn attr(&self, id: NodeId, name: &str) -> RenderResult<Option<&str>> {
        match &self.get(id)?.kind {
            NodeKind::Element { attributes, .. } => Ok(attributes.get(name).map(String::as_str)),
            _ => Err(RenderError::NotAnElement(id)),
        }
    }

    /// Snapshot the subtree rooted at `id`
    pub fn snapshot(&self, id: NodeId) -> RenderResult<VNode> {
        let node = self.get(id)?;
        Ok(match &node.kind {
            NodeKind::Element {
                tag,
                attributes,
                styles,
                key,
            } => VNode::Element {
                tag: tag.clone(),
                attributes: attributes.clone(),
                styles: styles.clone(),
                children: node
                    .children
                    .iter()
                    .map(|child| self.snapshot(*child))
                    .collect::<RenderResult<Vec<_>>>()?,
                key: key.clone(),
            },
            NodeKind::Text(content) => VNode::text(content.clone()),
            NodeKind::Comment(content) => VNode::comment(content.clone()),
            NodeKind::Error(message) => VNode::error(message.clone()),
        })
    }

    /// Snapshot of the whole tree
    pub fn to_vnode(&self) -> RenderResult<VNode> {
        let root = self.root.ok_or(RenderError::NoRoot)?;
        self.snapshot(root)
    }
}
