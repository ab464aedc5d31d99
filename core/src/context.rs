//! Options and the per-render context shared by every instance.

use crate::backend::Backend;
use crate::error::{Error, ReconcileResult};

/// How attributes present in the next props are written on update.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum AttributeWrites {
    /// Only write attributes that are new or whose value changed.
    #[default]
    Changed,
    /// Overwrite every attribute of the next props on every update.
    Always,
}

/// Knobs applied to a whole render pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// Attribute write policy for host instance updates.
    pub attribute_writes: AttributeWrites,
}

/// Borrow of the backend plus the options for one render pass.
///
/// Wraps each backend call so failures come back as [`Error::Backend`].
#[derive(Debug)]
pub struct RenderContext<'a, B: Backend> {
    backend: &'a mut B,
    options: ReconcileOptions,
}

impl<'a, B: Backend> RenderContext<'a, B> {
    /// Creates a context over `backend`.
    pub const fn new(backend: &'a mut B, options: ReconcileOptions) -> Self {
        Self { backend, options }
    }

    /// Returns the options of this pass.
    #[must_use]
    pub const fn options(&self) -> ReconcileOptions {
        self.options
    }

    /// Returns the backend.
    #[allow(clippy::missing_const_for_fn)]
    pub fn backend(&mut self) -> &mut B {
        self.backend
    }

    pub(crate) fn create_element(&mut self, tag: &str) -> ReconcileResult<B::Node, B> {
        self.backend.create_element(tag).map_err(Error::Backend)
    }

    pub(crate) fn create_text_node(&mut self, text: &str) -> ReconcileResult<B::Node, B> {
        self.backend.create_text_node(text).map_err(Error::Backend)
    }

    pub(crate) fn set_attribute(
        &mut self,
        node: &B::Node,
        key: &str,
        value: &str,
    ) -> ReconcileResult<(), B> {
        self.backend
            .set_attribute(node, key, value)
            .map_err(Error::Backend)
    }

    pub(crate) fn remove_attribute(&mut self, node: &B::Node, key: &str) -> ReconcileResult<(), B> {
        self.backend
            .remove_attribute(node, key)
            .map_err(Error::Backend)
    }

    pub(crate) fn append_child(&mut self, parent: &B::Node, child: &B::Node) -> ReconcileResult<(), B> {
        self.backend
            .append_child(parent, child)
            .map_err(Error::Backend)
    }

    pub(crate) fn replace_child(
        &mut self,
        parent: &B::Node,
        new_child: &B::Node,
        old_child: &B::Node,
    ) -> ReconcileResult<(), B> {
        self.backend
            .replace_child(parent, new_child, old_child)
            .map_err(Error::Backend)
    }

    pub(crate) fn remove_child(&mut self, parent: &B::Node, child: &B::Node) -> ReconcileResult<(), B> {
        self.backend
            .remove_child(parent, child)
            .map_err(Error::Backend)
    }
}
