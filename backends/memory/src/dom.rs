use core::fmt;
use std::collections::BTreeMap;

use serde::Serialize;
use stack_reconciler_core::Backend;
use tracing::trace;

use crate::error::MemoryDomError;
use crate::snapshot::{self, NodeSnapshot};

/// Handle to a node stored in a [`MemoryDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    /// Returns the raw arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One recorded write to the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// An element node was created.
    CreateElement {
        /// The new node.
        node: NodeId,
        /// Its tag.
        tag: String,
    },
    /// A text node was created.
    CreateText {
        /// The new node.
        node: NodeId,
        /// Its content.
        text: String,
    },
    /// An attribute was written.
    SetAttribute {
        /// The element.
        node: NodeId,
        /// Attribute name.
        key: String,
        /// Attribute value.
        value: String,
    },
    /// An attribute was removed.
    RemoveAttribute {
        /// The element.
        node: NodeId,
        /// Attribute name.
        key: String,
    },
    /// A node was appended to a parent.
    AppendChild {
        /// The parent.
        parent: NodeId,
        /// The appended node.
        child: NodeId,
    },
    /// A child was swapped for another node.
    ReplaceChild {
        /// The parent.
        parent: NodeId,
        /// The node put in place.
        new_child: NodeId,
        /// The node taken out.
        old_child: NodeId,
    },
    /// A child was detached.
    RemoveChild {
        /// The parent.
        parent: NodeId,
        /// The detached node.
        child: NodeId,
    },
}

#[derive(Debug, Clone)]
pub(crate) enum NodeKind {
    Element {
        tag: String,
        attributes: BTreeMap<String, String>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct NodeEntry {
    pub(crate) kind: NodeKind,
    parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

/// Arena-backed display tree.
///
/// Nodes are never freed; detached nodes simply have no parent.
#[derive(Debug, Default, Clone)]
pub struct MemoryDom {
    nodes: Vec<NodeEntry>,
    journal: Vec<Mutation>,
}

impl MemoryDom {
    /// Creates an empty tree.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            journal: Vec::new(),
        }
    }

    /// Creates a detached `<div id="...">` to render into. Not recorded in the journal.
    pub fn create_container(&mut self, id: &str) -> NodeId {
        let mut attributes = BTreeMap::new();
        attributes.insert("id".to_owned(), id.to_owned());
        self.push(NodeKind::Element {
            tag: "div".to_owned(),
            attributes,
        })
    }

    /// Total number of nodes ever created.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the tag of an element node.
    #[must_use]
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.nodes.get(node.0)?.kind {
            NodeKind::Element { tag, .. } => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    /// Returns the content of a text node.
    #[must_use]
    pub fn text(&self, node: NodeId) -> Option<&str> {
        match &self.nodes.get(node.0)?.kind {
            NodeKind::Text(text) => Some(text),
            NodeKind::Element { .. } => None,
        }
    }

    /// Returns the attributes of an element node.
    #[must_use]
    pub fn attributes(&self, node: NodeId) -> Option<&BTreeMap<String, String>> {
        match &self.nodes.get(node.0)?.kind {
            NodeKind::Element { attributes, .. } => Some(attributes),
            NodeKind::Text(_) => None,
        }
    }

    /// Returns one attribute of an element node.
    #[must_use]
    pub fn attribute(&self, node: NodeId, key: &str) -> Option<&str> {
        self.attributes(node)?.get(key).map(String::as_str)
    }

    /// Returns the children of a node; empty for text and unknown nodes.
    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map_or(&[], |entry| entry.children.as_slice())
    }

    /// Returns the parent of a node.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0)?.parent
    }

    /// Returns every mutation recorded so far.
    #[must_use]
    pub fn journal(&self) -> &[Mutation] {
        &self.journal
    }

    /// Drains the journal.
    pub fn take_journal(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.journal)
    }

    /// Captures the subtree under `node`.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryDomError::UnknownNode`] for foreign handles.
    pub fn snapshot(&self, node: NodeId) -> Result<NodeSnapshot, MemoryDomError> {
        snapshot::capture(self, node)
    }

    /// Serializes the subtree under `node` as HTML.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryDomError::UnknownNode`] for foreign handles.
    pub fn to_html(&self, node: NodeId) -> Result<String, MemoryDomError> {
        Ok(self.snapshot(node)?.to_html())
    }

    /// Serializes the subtree under `node` as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryDomError::UnknownNode`] for foreign handles.
    pub fn to_json(&self, node: NodeId) -> Result<String, MemoryDomError> {
        Ok(serde_json::to_string_pretty(&self.snapshot(node)?)?)
    }

    pub(crate) fn entry(&self, node: NodeId) -> Result<&NodeEntry, MemoryDomError> {
        self.nodes.get(node.0).ok_or(MemoryDomError::UnknownNode(node))
    }

    fn entry_mut(&mut self, node: NodeId) -> Result<&mut NodeEntry, MemoryDomError> {
        self.nodes
            .get_mut(node.0)
            .ok_or(MemoryDomError::UnknownNode(node))
    }

    fn attributes_mut(
        &mut self,
        node: NodeId,
    ) -> Result<&mut BTreeMap<String, String>, MemoryDomError> {
        match &mut self.entry_mut(node)?.kind {
            NodeKind::Element { attributes, .. } => Ok(attributes),
            NodeKind::Text(_) => Err(MemoryDomError::NotAnElement(node)),
        }
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeEntry {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    fn record(&mut self, mutation: Mutation) {
        trace!(?mutation, "memory dom mutation");
        self.journal.push(mutation);
    }

    /// Checks that `child` may be placed under `parent`.
    fn check_insert(&self, parent: NodeId, child: NodeId) -> Result<(), MemoryDomError> {
        if matches!(self.entry(parent)?.kind, NodeKind::Text(_)) {
            return Err(MemoryDomError::NotAnElement(parent));
        }
        self.entry(child)?;

        let mut cursor = Some(parent);
        while let Some(current) = cursor {
            if current == child {
                return Err(MemoryDomError::HierarchyRequest { parent, child });
            }
            cursor = self.nodes[current.0].parent;
        }
        Ok(())
    }

    fn position(&self, parent: NodeId, child: NodeId) -> Result<usize, MemoryDomError> {
        self.entry(parent)?
            .children
            .iter()
            .position(|&c| c == child)
            .ok_or(MemoryDomError::NotAChild { parent, child })
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != node);
        }
    }
}

fn valid_tag(tag: &str) -> bool {
    let mut chars = tag.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn valid_attribute(key: &str) -> bool {
    !key.is_empty()
        && !key
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '>' | '/' | '='))
}

impl Backend for MemoryDom {
    type Node = NodeId;
    type Error = MemoryDomError;

    fn create_element(&mut self, tag: &str) -> Result<NodeId, MemoryDomError> {
        if !valid_tag(tag) {
            return Err(MemoryDomError::InvalidTagName(tag.to_owned()));
        }
        let node = self.push(NodeKind::Element {
            tag: tag.to_owned(),
            attributes: BTreeMap::new(),
        });
        self.record(Mutation::CreateElement {
            node,
            tag: tag.to_owned(),
        });
        Ok(node)
    }

    fn create_text_node(&mut self, text: &str) -> Result<NodeId, MemoryDomError> {
        let node = self.push(NodeKind::Text(text.to_owned()));
        self.record(Mutation::CreateText {
            node,
            text: text.to_owned(),
        });
        Ok(node)
    }

    fn set_attribute(&mut self, node: &NodeId, key: &str, value: &str) -> Result<(), MemoryDomError> {
        if !valid_attribute(key) {
            return Err(MemoryDomError::InvalidAttributeName(key.to_owned()));
        }
        self.attributes_mut(*node)?
            .insert(key.to_owned(), value.to_owned());
        self.record(Mutation::SetAttribute {
            node: *node,
            key: key.to_owned(),
            value: value.to_owned(),
        });
        Ok(())
    }

    fn remove_attribute(&mut self, node: &NodeId, key: &str) -> Result<(), MemoryDomError> {
        self.attributes_mut(*node)?.remove(key);
        self.record(Mutation::RemoveAttribute {
            node: *node,
            key: key.to_owned(),
        });
        Ok(())
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), MemoryDomError> {
        let (parent, child) = (*parent, *child);
        self.check_insert(parent, child)?;
        self.detach(child);
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
        self.record(Mutation::AppendChild { parent, child });
        Ok(())
    }

    fn replace_child(
        &mut self,
        parent: &NodeId,
        new_child: &NodeId,
        old_child: &NodeId,
    ) -> Result<(), MemoryDomError> {
        let (parent, new_child, old_child) = (*parent, *new_child, *old_child);
        self.position(parent, old_child)?;
        if new_child != old_child {
            self.check_insert(parent, new_child)?;
            self.detach(new_child);
            let index = self.position(parent, old_child)?;
            self.nodes[parent.0].children[index] = new_child;
            self.nodes[new_child.0].parent = Some(parent);
            self.nodes[old_child.0].parent = None;
        }
        self.record(Mutation::ReplaceChild {
            parent,
            new_child,
            old_child,
        });
        Ok(())
    }

    fn remove_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), MemoryDomError> {
        let (parent, child) = (*parent, *child);
        let index = self.position(parent, child)?;
        self.nodes[parent.0].children.remove(index);
        self.nodes[child.0].parent = None;
        self.record(Mutation::RemoveChild { parent, child });
        Ok(())
    }
}
