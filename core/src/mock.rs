//! Recording backend for unit tests.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::backend::Backend;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MockError {
    #[error("node {0} does not exist")]
    Unknown(usize),
    #[error("node {child} is not a child of {parent}")]
    NotAChild { parent: usize, child: usize },
    #[error("attribute `{0}` rejected")]
    Rejected(String),
}

#[derive(Debug, Default)]
pub struct MockNode {
    pub label: String,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<usize>,
}

/// Nodes are indices; every call is appended to `log`.
#[derive(Debug, Default)]
pub struct MockBackend {
    pub nodes: Vec<MockNode>,
    pub log: Vec<String>,
}

impl MockBackend {
    pub fn children_of(&self, node: usize) -> Vec<usize> {
        self.nodes[node].children.clone()
    }

    pub fn attributes_of(&self, node: usize) -> &BTreeMap<String, String> {
        &self.nodes[node].attributes
    }

    fn push(&mut self, label: String) -> usize {
        self.nodes.push(MockNode {
            label,
            ..MockNode::default()
        });
        self.nodes.len() - 1
    }

    fn node_mut(&mut self, node: usize) -> Result<&mut MockNode, MockError> {
        self.nodes.get_mut(node).ok_or(MockError::Unknown(node))
    }

    fn position(&self, parent: usize, child: usize) -> Result<usize, MockError> {
        self.nodes
            .get(parent)
            .ok_or(MockError::Unknown(parent))?
            .children
            .iter()
            .position(|&c| c == child)
            .ok_or(MockError::NotAChild { parent, child })
    }
}

impl Backend for MockBackend {
    type Node = usize;
    type Error = MockError;

    fn create_element(&mut self, tag: &str) -> Result<usize, MockError> {
        let node = self.push(tag.to_owned());
        self.log.push(format!("create {tag} {node}"));
        Ok(node)
    }

    fn create_text_node(&mut self, text: &str) -> Result<usize, MockError> {
        let node = self.push(format!("#{text}"));
        self.log.push(format!("text {text:?} {node}"));
        Ok(node)
    }

    fn set_attribute(&mut self, node: &usize, key: &str, value: &str) -> Result<(), MockError> {
        if key == "reject" {
            return Err(MockError::Rejected(key.to_owned()));
        }
        self.node_mut(*node)?
            .attributes
            .insert(key.to_owned(), value.to_owned());
        self.log.push(format!("set {node} {key}={value}"));
        Ok(())
    }

    fn remove_attribute(&mut self, node: &usize, key: &str) -> Result<(), MockError> {
        self.node_mut(*node)?.attributes.remove(key);
        self.log.push(format!("unset {node} {key}"));
        Ok(())
    }

    fn append_child(&mut self, parent: &usize, child: &usize) -> Result<(), MockError> {
        self.node_mut(*parent)?.children.push(*child);
        self.log.push(format!("append {parent} {child}"));
        Ok(())
    }

    fn replace_child(
        &mut self,
        parent: &usize,
        new_child: &usize,
        old_child: &usize,
    ) -> Result<(), MockError> {
        let index = self.position(*parent, *old_child)?;
        self.node_mut(*parent)?.children[index] = *new_child;
        self.log
            .push(format!("replace {parent} {new_child} {old_child}"));
        Ok(())
    }

    fn remove_child(&mut self, parent: &usize, child: &usize) -> Result<(), MockError> {
        let index = self.position(*parent, *child)?;
        self.node_mut(*parent)?.children.remove(index);
        self.log.push(format!("remove {parent} {child}"));
        Ok(())
    }
}
