//! Root entry point: one instance tree per container.

use std::collections::HashMap;

use tracing::debug;

use crate::backend::Backend;
use crate::context::{AttributeWrites, ReconcileOptions, RenderContext};
use crate::element::Element;
use crate::error::ReconcileResult;
use crate::instance::{Instance, Lifecycle, instantiate};

/// Builder for [`Renderer`].
#[derive(Debug, Default, Clone, Copy)]
pub struct RendererBuilder {
    options: ReconcileOptions,
}

impl RendererBuilder {
    /// Creates a builder with default options.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            options: ReconcileOptions {
                attribute_writes: AttributeWrites::Changed,
            },
        }
    }

    /// Selects how attributes are written on update.
    #[must_use]
    pub const fn attribute_writes(mut self, writes: AttributeWrites) -> Self {
        self.options.attribute_writes = writes;
        self
    }

    /// Replaces all options at once.
    #[must_use]
    pub const fn options(mut self, options: ReconcileOptions) -> Self {
        self.options = options;
        self
    }

    /// Finalises the builder around `backend`.
    pub fn build<B: Backend>(self, backend: B) -> Renderer<B> {
        Renderer {
            backend,
            options: self.options,
            roots: HashMap::new(),
        }
    }
}

/// Owns the display backend and the registry of root instances keyed by container.
///
/// A registry entry lives until the container is unmounted or the renderer is dropped. Renders
/// into one container must not overlap; `&mut self` enforces that.
#[derive(Debug)]
pub struct Renderer<B: Backend> {
    backend: B,
    options: ReconcileOptions,
    roots: HashMap<B::Node, Instance<B>>,
}

impl<B: Backend> Renderer<B> {
    /// Creates a renderer with default options.
    pub fn new(backend: B) -> Self {
        RendererBuilder::new().build(backend)
    }

    /// Returns a builder for custom options.
    #[must_use]
    pub const fn builder() -> RendererBuilder {
        RendererBuilder::new()
    }

    /// Renders `element` into `container`.
    ///
    /// The first render mounts a fresh tree and appends its node to the container. Later renders
    /// update the existing tree in place when the root element type is unchanged, and replace it
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns the first dispatcher, lifecycle or backend failure. Display mutations issued
    /// before it are not rolled back, but the registry keeps matching the container: a root that
    /// ends up without a node is unmounted, detached and forgotten.
    pub fn render(&mut self, element: Element, container: &B::Node) -> ReconcileResult<(), B> {
        let mut cx = RenderContext::new(&mut self.backend, self.options);

        match self.roots.get_mut(container) {
            None => {
                debug!(container = ?container, root = %element.describe(), "mounting new root");
                let mut root = instantiate(element)?;
                let node = root.mount(&mut cx)?;
                cx.append_child(container, &node)?;
                self.roots.insert(container.clone(), root);
            }
            Some(root) if root.can_receive(&element) => {
                debug!(container = ?container, root = %element.describe(), "updating root");
                let prev_node = root.host_node()?.clone();
                match root.receive(&mut cx, element) {
                    Ok(Some(replacement)) => {
                        cx.replace_child(container, &replacement.next, &replacement.prev)?;
                    }
                    Ok(None) => {}
                    Err(error) => {
                        if root.lifecycle() != Lifecycle::Mounted {
                            debug!(container = ?container, "root lost its node, detaching");
                            self.roots.remove(container);
                            cx.remove_child(container, &prev_node)?;
                        }
                        return Err(error);
                    }
                }
            }
            Some(root) => {
                debug!(
                    container = ?container,
                    prev = %root.describe(),
                    next = %element.describe(),
                    "root type changed, replacing tree"
                );
                let mut fresh = instantiate(element)?;
                let prev_node = root.host_node()?.clone();
                if let Some(mut prev) = self.roots.remove(container) {
                    prev.unmount()?;
                }
                let node = match fresh.mount(&mut cx) {
                    Ok(node) => node,
                    Err(error) => {
                        cx.remove_child(container, &prev_node)?;
                        return Err(error);
                    }
                };
                cx.replace_child(container, &node, &prev_node)?;
                self.roots.insert(container.clone(), fresh);
            }
        }
        Ok(())
    }

    /// Unmounts the tree rendered into `container` and detaches its node.
    ///
    /// Returns `false` if nothing was rendered there.
    ///
    /// # Errors
    ///
    /// Propagates lifecycle and backend failures.
    pub fn unmount(&mut self, container: &B::Node) -> ReconcileResult<bool, B> {
        let Some(mut root) = self.roots.remove(container) else {
            return Ok(false);
        };
        debug!(container = ?container, root = %root.describe(), "unmounting root");
        let node = root.host_node()?.clone();
        root.unmount()?;
        let mut cx = RenderContext::new(&mut self.backend, self.options);
        cx.remove_child(container, &node)?;
        Ok(true)
    }

    /// Returns the root instance rendered into `container`.
    #[must_use]
    pub fn root(&self, container: &B::Node) -> Option<&Instance<B>> {
        self.roots.get(container)
    }

    /// Returns `true` if a tree is rendered into `container`.
    #[must_use]
    pub fn is_mounted(&self, container: &B::Node) -> bool {
        self.roots.contains_key(container)
    }

    /// Number of containers holding a rendered tree.
    #[must_use]
    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    /// Returns the options in effect.
    #[must_use]
    pub const fn options(&self) -> ReconcileOptions {
        self.options
    }

    /// Provides immutable access to the backend.
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Provides mutable access to the backend.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Consumes the renderer, dropping every root instance without unmounting it.
    pub fn into_backend(self) -> B {
        self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::element::Props;
    use crate::mock::{MockBackend, MockError};

    fn container(renderer: &mut Renderer<MockBackend>) -> usize {
        renderer
            .backend_mut()
            .create_element("main")
            .expect("container")
    }

    #[test]
    fn second_render_reuses_the_root() {
        let mut renderer = Renderer::new(MockBackend::default());
        let root = container(&mut renderer);

        renderer
            .render(Element::tag("div").attr("id", "a"), &root)
            .expect("first render");
        let first = renderer.backend().children_of(root);

        renderer
            .render(Element::tag("div").attr("id", "b"), &root)
            .expect("second render");
        assert_eq!(renderer.backend().children_of(root), first);
        assert_eq!(
            renderer.backend().attributes_of(first[0]).get("id").map(String::as_str),
            Some("b")
        );
        assert_eq!(renderer.root_count(), 1);
    }

    #[test]
    fn root_type_change_replaces_in_place() {
        let mut renderer = Renderer::new(MockBackend::default());
        let root = container(&mut renderer);

        renderer.render(Element::tag("div"), &root).expect("mount");
        let before = renderer.backend().children_of(root);
        renderer.render(Element::tag("span"), &root).expect("replace");
        let after = renderer.backend().children_of(root);

        assert_eq!(after.len(), 1);
        assert_ne!(after, before);
        assert_eq!(renderer.backend().nodes[after[0]].label, "span");
    }

    #[test]
    fn unsupported_root_leaves_previous_tree_registered() {
        let mut renderer = Renderer::new(MockBackend::default());
        let root = container(&mut renderer);

        renderer.render(Element::tag("div"), &root).expect("mount");
        let result = renderer.render(Element::fragment(), &root);

        assert!(matches!(result, Err(Error::UnsupportedElementKind { .. })));
        assert!(renderer.is_mounted(&root));
    }

    #[test]
    fn unmount_detaches_and_forgets() {
        let mut renderer = Renderer::new(MockBackend::default());
        let root = container(&mut renderer);

        assert!(!renderer.unmount(&root).expect("nothing to unmount"));
        renderer.render(Element::tag("div"), &root).expect("mount");
        assert!(renderer.unmount(&root).expect("unmount"));
        assert!(renderer.backend().children_of(root).is_empty());
        assert!(!renderer.is_mounted(&root));
    }

    #[test]
    fn builder_sets_attribute_policy() {
        let renderer = Renderer::<MockBackend>::builder()
            .attribute_writes(AttributeWrites::Always)
            .build(MockBackend::default());
        assert_eq!(renderer.options().attribute_writes, AttributeWrites::Always);
    }

    fn shape(props: &Props) -> Element {
        let element = Element::tag(props.get_str("as").unwrap_or("div").to_owned());
        if props.contains("reject") {
            element.attr("reject", 1)
        } else {
            element
        }
    }

    #[test]
    fn root_composite_that_loses_its_node_is_forgotten() {
        let mut renderer = Renderer::new(MockBackend::default());
        let root = container(&mut renderer);

        renderer.render(Element::function(shape), &root).expect("mount");
        let result = renderer.render(
            Element::function(shape).attr("as", "span").attr("reject", 1),
            &root,
        );

        assert!(matches!(result, Err(Error::Backend(MockError::Rejected(_)))));
        assert!(!renderer.is_mounted(&root));
        assert!(renderer.backend().children_of(root).is_empty());

        renderer.render(Element::function(shape), &root).expect("remount");
        assert_eq!(renderer.backend().children_of(root).len(), 1);
    }

    #[test]
    fn failed_root_replacement_detaches_the_old_tree() {
        let mut renderer = Renderer::new(MockBackend::default());
        let root = container(&mut renderer);

        renderer.render(Element::tag("div"), &root).expect("mount");
        let result = renderer.render(Element::tag("span").attr("reject", 1), &root);

        assert!(matches!(result, Err(Error::Backend(MockError::Rejected(_)))));
        assert!(!renderer.is_mounted(&root));
        assert!(renderer.backend().children_of(root).is_empty());

        renderer.render(Element::tag("div"), &root).expect("remount");
        assert_eq!(renderer.backend().children_of(root).len(), 1);
    }
}
