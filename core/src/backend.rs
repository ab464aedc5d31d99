//! The display tree the reconciler writes to.

use core::fmt::Debug;
use core::hash::Hash;

/// Write-only access to a mutable display tree, such as a browser DOM.
///
/// The reconciler never reads node contents back. Its own instance tree is the source of truth
/// for what each node currently holds.
pub trait Backend {
    /// Handle to a display node. Handles are compared to locate a container's root instance.
    type Node: Clone + Eq + Hash + Debug;
    /// Failure reported by the display tree. It reaches the caller of a render unchanged.
    type Error: std::error::Error + 'static;

    /// Creates a detached element node.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the tag.
    fn create_element(&mut self, tag: &str) -> Result<Self::Node, Self::Error>;

    /// Creates a detached text node.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot allocate the node.
    fn create_text_node(&mut self, text: &str) -> Result<Self::Node, Self::Error>;

    /// Sets or overwrites an attribute.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid attribute names or nodes that cannot carry attributes.
    fn set_attribute(&mut self, node: &Self::Node, key: &str, value: &str)
    -> Result<(), Self::Error>;

    /// Removes an attribute.
    ///
    /// # Errors
    ///
    /// Returns an error if the node cannot carry attributes.
    fn remove_attribute(&mut self, node: &Self::Node, key: &str) -> Result<(), Self::Error>;

    /// Appends `child` as the last child of `parent`.
    ///
    /// # Errors
    ///
    /// Returns an error if the insertion is structurally invalid.
    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), Self::Error>;

    /// Puts `new_child` where `old_child` currently sits under `parent`.
    ///
    /// # Errors
    ///
    /// Returns an error if `old_child` is not a child of `parent`.
    fn replace_child(
        &mut self,
        parent: &Self::Node,
        new_child: &Self::Node,
        old_child: &Self::Node,
    ) -> Result<(), Self::Error>;

    /// Detaches `child` from `parent`.
    ///
    /// # Errors
    ///
    /// Returns an error if `child` is not a child of `parent`.
    fn remove_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), Self::Error>;
}
