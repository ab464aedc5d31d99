//! Live counterparts of elements.
//!
//! Every mounted [`Instance`] owns either a display node (host and text instances) or exactly one
//! rendered child instance (composite instances). Parents own their children outright; an
//! unmounted child is dropped, never referenced again.

mod composite;
mod host;
mod text;

use core::fmt;

use tracing::trace;

pub use composite::CompositeInstance;
pub use host::{HostInstance, diff_children};
pub use text::TextInstance;

use crate::backend::Backend;
use crate::component::Component;
use crate::context::RenderContext;
use crate::element::{Element, ElementType};
use crate::error::{Error, ReconcileResult};

/// Lifecycle state of an instance: `Pending -> Mounted -> Unmounted`.
///
/// An unmounted instance is never mounted again; a fresh instance takes its slot instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Created by the dispatcher, not mounted yet.
    Pending,
    /// Owns its display node or rendered child.
    Mounted,
    /// Torn down; its resources are gone.
    Unmounted,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::Mounted => "mounted",
            Self::Unmounted => "unmounted",
        })
    }
}

/// State an instance holds only while mounted.
#[derive(Debug)]
pub(crate) enum Slot<T> {
    Pending,
    Mounted(T),
    Unmounted,
}

impl<T> Slot<T> {
    pub(crate) const fn lifecycle(&self) -> Lifecycle {
        match self {
            Self::Pending => Lifecycle::Pending,
            Self::Mounted(_) => Lifecycle::Mounted,
            Self::Unmounted => Lifecycle::Unmounted,
        }
    }

    pub(crate) fn ensure_pending<E>(&self, operation: &'static str) -> Result<(), Error<E>> {
        match self {
            Self::Pending => Ok(()),
            _ => Err(Error::stale(operation, self.lifecycle())),
        }
    }

    pub(crate) fn get<E>(&self, operation: &'static str) -> Result<&T, Error<E>> {
        match self {
            Self::Mounted(state) => Ok(state),
            _ => Err(Error::stale(operation, self.lifecycle())),
        }
    }

    pub(crate) fn get_mut<E>(&mut self, operation: &'static str) -> Result<&mut T, Error<E>> {
        let lifecycle = self.lifecycle();
        match self {
            Self::Mounted(state) => Ok(state),
            _ => Err(Error::stale(operation, lifecycle)),
        }
    }

    /// Moves the mounted state out, leaving the slot unmounted for good.
    pub(crate) fn take<E>(&mut self, operation: &'static str) -> Result<T, Error<E>> {
        match core::mem::replace(self, Self::Unmounted) {
            Self::Mounted(state) => Ok(state),
            other => {
                let lifecycle = other.lifecycle();
                *self = other;
                Err(Error::stale(operation, lifecycle))
            }
        }
    }
}

/// The host node of an instance changed during an update.
///
/// A composite whose rendered child had to be replaced cannot patch the display tree itself,
/// since it does not know the parent node. It hands the change up instead, and whoever owns the
/// parent node (a host instance or the root) performs the swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement<N> {
    /// The node that was attached.
    pub prev: N,
    /// The node that must take its place.
    pub next: N,
}

/// What an instance exposes to the outside world.
#[derive(Clone, Copy)]
pub enum PublicInstance<'a, N> {
    /// Host and text instances expose their display node.
    Node(&'a N),
    /// Stateful composites expose their component object.
    Component(&'a dyn Component),
    /// Function components and unmounted instances expose nothing.
    None,
}

impl<N: fmt::Debug> fmt::Debug for PublicInstance<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(node) => f.debug_tuple("Node").field(node).finish(),
            Self::Component(_) => f.write_str("Component(..)"),
            Self::None => f.write_str("None"),
        }
    }
}

/// A node of the instance tree.
#[derive(Debug)]
pub enum Instance<B: Backend> {
    /// Backed by one element node.
    Host(HostInstance<B>),
    /// Backed by a user component.
    Composite(CompositeInstance<B>),
    /// Backed by one text node.
    Text(TextInstance<B>),
}

/// Maps an element to the instance variant that can materialize it.
///
/// Pure: nothing is created in the display tree until the instance is mounted.
///
/// # Errors
///
/// Returns [`Error::UnsupportedElementKind`] for fragments and empty tag names.
pub fn instantiate<B: Backend>(element: Element) -> ReconcileResult<Instance<B>, B> {
    match element {
        Element::Text(text) => Ok(Instance::Text(TextInstance::new(text))),
        Element::Typed {
            ty: ElementType::Tag(tag),
            ..
        } if tag.is_empty() => Err(Error::unsupported("host element with an empty tag")),
        Element::Typed {
            ty: ElementType::Tag(tag),
            props,
        } => Ok(Instance::Host(HostInstance::new(tag, props))),
        Element::Typed {
            ty: ElementType::Component(component),
            props,
        } => Ok(Instance::Composite(CompositeInstance::new(component, props))),
        Element::Typed {
            ty: ElementType::Fragment,
            ..
        } => Err(Error::unsupported("fragment")),
    }
}

impl<B: Backend> Instance<B> {
    /// Materializes the instance, returning the display node that represents it.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::StaleInstanceAccess`] unless the instance is pending, and propagates
    /// dispatcher and backend failures from the subtree.
    pub fn mount(&mut self, cx: &mut RenderContext<'_, B>) -> ReconcileResult<B::Node, B> {
        trace!(instance = %self.describe(), "mount");
        match self {
            Self::Host(host) => host.mount(cx),
            Self::Composite(composite) => composite.mount(cx),
            Self::Text(text) => text.mount(cx),
        }
    }

    /// Updates the instance in place to match `next`.
    ///
    /// Returns a [`Replacement`] when the instance's host node changed and the caller has to
    /// swap it in the parent node.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::StaleInstanceAccess`] unless mounted, with [`Error::TypeMismatch`] if
    /// [`can_receive`](Self::can_receive) is false for `next`, and propagates subtree failures.
    pub fn receive(
        &mut self,
        cx: &mut RenderContext<'_, B>,
        next: Element,
    ) -> ReconcileResult<Option<Replacement<B::Node>>, B> {
        trace!(instance = %self.describe(), next = %next.describe(), "receive");
        match self {
            Self::Host(host) => host.receive(cx, next).map(|()| None),
            Self::Composite(composite) => composite.receive(cx, next),
            Self::Text(text) => text.receive(next).map(|()| None),
        }
    }

    /// Tears down the instance and its subtree, children first.
    ///
    /// Does not detach the node from its parent; the caller records that.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::StaleInstanceAccess`] unless mounted.
    pub fn unmount(&mut self) -> ReconcileResult<(), B> {
        trace!(instance = %self.describe(), "unmount");
        match self {
            Self::Host(host) => host.unmount(),
            Self::Composite(composite) => composite.unmount(),
            Self::Text(text) => text.unmount(),
        }
    }

    /// Resolves the concrete display node, following composites down to a host or text node.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::StaleInstanceAccess`] unless mounted.
    pub fn host_node(&self) -> ReconcileResult<&B::Node, B> {
        match self {
            Self::Host(host) => host.host_node(),
            Self::Composite(composite) => composite.host_node(),
            Self::Text(text) => text.host_node(),
        }
    }

    /// Returns `true` if `next` can be applied with [`receive`](Self::receive) instead of
    /// replacing this instance.
    ///
    /// Host and composite instances accept elements of the same type. Text instances accept
    /// identical text only, since the display tree offers no way to edit a text node.
    #[must_use]
    pub fn can_receive(&self, next: &Element) -> bool {
        match (self, next) {
            (Self::Host(host), Element::Typed { ty: ElementType::Tag(tag), .. }) => {
                host.tag() == tag
            }
            (
                Self::Composite(composite),
                Element::Typed {
                    ty: ElementType::Component(component),
                    ..
                },
            ) => composite.component() == component,
            (Self::Text(instance), Element::Text(text)) => instance.text() == text,
            _ => false,
        }
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub const fn lifecycle(&self) -> Lifecycle {
        match self {
            Self::Host(host) => host.lifecycle(),
            Self::Composite(composite) => composite.lifecycle(),
            Self::Text(text) => text.lifecycle(),
        }
    }

    /// Returns what this instance exposes publicly.
    #[must_use]
    pub fn public_instance(&self) -> PublicInstance<'_, B::Node> {
        match self {
            Self::Host(host) => host.public_instance(),
            Self::Composite(composite) => composite.public_instance(),
            Self::Text(text) => text.public_instance(),
        }
    }

    /// Short description for diagnostics.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Host(host) => format!("<{}>", host.tag()),
            Self::Composite(composite) => format!("<{}>", composite.component().name()),
            Self::Text(text) => format!("text {:?}", text.text()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ComponentType;
    use crate::context::ReconcileOptions;
    use crate::element::Props;
    use crate::mock::MockBackend;

    type MockInstance = Instance<MockBackend>;

    fn app(_props: &Props) -> Element {
        Element::tag("div")
    }

    #[test]
    fn dispatcher_picks_variant_by_type() {
        assert!(matches!(
            instantiate::<MockBackend>(Element::tag("div")),
            Ok(Instance::Host(_))
        ));
        assert!(matches!(
            instantiate::<MockBackend>(Element::text("hi")),
            Ok(Instance::Text(_))
        ));
        assert!(matches!(
            instantiate::<MockBackend>(Element::function(app)),
            Ok(Instance::Composite(_))
        ));
    }

    #[test]
    fn dispatcher_rejects_unsupported_kinds() {
        assert!(matches!(
            instantiate::<MockBackend>(Element::fragment()),
            Err(Error::UnsupportedElementKind { .. })
        ));
        assert!(matches!(
            instantiate::<MockBackend>(Element::tag("")),
            Err(Error::UnsupportedElementKind { .. })
        ));
    }

    #[test]
    fn dispatcher_is_side_effect_free() {
        let instance: MockInstance = instantiate(Element::tag("div").child("x")).expect("host");
        assert_eq!(instance.lifecycle(), Lifecycle::Pending);
        assert!(matches!(
            instance.host_node(),
            Err(Error::StaleInstanceAccess {
                state: Lifecycle::Pending,
                ..
            })
        ));
    }

    #[test]
    fn can_receive_compares_types() {
        let host: MockInstance = instantiate(Element::tag("div")).expect("host");
        assert!(host.can_receive(&Element::tag("div").attr("id", "x")));
        assert!(!host.can_receive(&Element::tag("span")));
        assert!(!host.can_receive(&Element::text("div")));

        let text: MockInstance = instantiate(Element::text("a")).expect("text");
        assert!(text.can_receive(&Element::text("a")));
        assert!(!text.can_receive(&Element::text("b")));

        let composite: MockInstance = instantiate(Element::function(app)).expect("composite");
        assert!(composite.can_receive(&Element::component(ComponentType::function(app))));
        assert!(!composite.can_receive(&Element::tag("div")));
    }

    #[test]
    fn stale_instances_fail_loudly() {
        let mut backend = MockBackend::default();
        let mut cx = RenderContext::new(&mut backend, ReconcileOptions::default());
        let mut instance: MockInstance = instantiate(Element::tag("div")).expect("host");

        assert!(matches!(
            instance.unmount(),
            Err(Error::StaleInstanceAccess {
                operation: "unmount",
                state: Lifecycle::Pending
            })
        ));

        instance.mount(&mut cx).expect("mount");
        assert!(matches!(
            instance.mount(&mut cx),
            Err(Error::StaleInstanceAccess {
                operation: "mount",
                state: Lifecycle::Mounted
            })
        ));

        instance.unmount().expect("unmount");
        assert_eq!(instance.lifecycle(), Lifecycle::Unmounted);
        assert!(matches!(
            instance.receive(&mut cx, Element::tag("div")),
            Err(Error::StaleInstanceAccess {
                state: Lifecycle::Unmounted,
                ..
            })
        ));
        assert!(matches!(
            instance.unmount(),
            Err(Error::StaleInstanceAccess { .. })
        ));
    }

    #[test]
    fn slot_take_keeps_non_mounted_state() {
        let mut slot: Slot<u8> = Slot::Pending;
        assert!(slot.take::<()>("unmount").is_err());
        assert_eq!(slot.lifecycle(), Lifecycle::Pending);

        let mut slot = Slot::Mounted(7u8);
        assert_eq!(slot.take::<()>("unmount").ok(), Some(7));
        assert_eq!(slot.lifecycle(), Lifecycle::Unmounted);
    }
}
