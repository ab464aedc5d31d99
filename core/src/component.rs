//! User components.
//!
//! A component is either a plain function from props to an element, or a stateful object
//! implementing [`Component`] that lives as long as its composite instance stays mounted.

use core::any::{TypeId, type_name};
use core::fmt;
use std::rc::Rc;

use crate::element::{Element, Props};

/// A stateful component.
///
/// The object is created once per mount and kept across updates for as long as the parent keeps
/// rendering the same component type at the same position.
pub trait Component: 'static {
    /// Constructs the component from its initial props.
    fn create(props: &Props) -> Self
    where
        Self: Sized;

    /// Produces the element this component currently renders to.
    fn render(&mut self, props: &Props) -> Element;

    /// Called before the first render.
    fn will_mount(&mut self, _props: &Props) {}

    /// Called once the rendered subtree has been mounted.
    fn did_mount(&mut self) {}

    /// Called with the next props before re-rendering on update.
    fn will_receive_props(&mut self, _next: &Props) {}

    /// Called after the rendered subtree has been unmounted.
    fn did_unmount(&mut self) {}
}

type RenderFn = Rc<dyn Fn(&Props) -> Element>;

#[derive(Clone)]
enum ComponentKind {
    Function(RenderFn),
    Stateful(fn(&Props) -> Box<dyn Component>),
}

/// Identity and constructor of a component, used as an element type.
///
/// Two component types are equal when they were built from the same Rust type: the same
/// [`Component`] implementor, or the same function item or closure.
#[derive(Clone)]
pub struct ComponentType {
    id: TypeId,
    name: &'static str,
    kind: ComponentKind,
}

impl ComponentType {
    /// Wraps a function component.
    pub fn function<F>(render: F) -> Self
    where
        F: Fn(&Props) -> Element + 'static,
    {
        Self {
            id: TypeId::of::<F>(),
            name: short_name(type_name::<F>()),
            kind: ComponentKind::Function(Rc::new(render)),
        }
    }

    /// Wraps a stateful component type.
    #[must_use]
    pub fn stateful<C: Component>() -> Self {
        Self {
            id: TypeId::of::<C>(),
            name: short_name(type_name::<C>()),
            kind: ComponentKind::Stateful(construct::<C>),
        }
    }

    /// Returns a display name derived from the Rust type.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` for components implementing [`Component`].
    #[must_use]
    pub const fn is_stateful(&self) -> bool {
        matches!(self.kind, ComponentKind::Stateful(_))
    }

    pub(crate) fn instantiate(&self, props: &Props) -> LiveComponent {
        match &self.kind {
            ComponentKind::Function(render) => LiveComponent::Function(render.clone()),
            ComponentKind::Stateful(construct) => LiveComponent::Stateful(construct(props)),
        }
    }
}

impl PartialEq for ComponentType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ComponentType {}

impl fmt::Debug for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentType({})", self.name)
    }
}

fn construct<C: Component>(props: &Props) -> Box<dyn Component> {
    Box::new(C::create(props))
}

fn short_name(full: &'static str) -> &'static str {
    let path = full.split('<').next().unwrap_or(full);
    match path.rsplit("::").find(|segment| !segment.starts_with('{')) {
        Some(segment) if !segment.is_empty() => segment,
        _ => full,
    }
}

/// A mounted component: the function to call, or the live public instance.
pub(crate) enum LiveComponent {
    Function(RenderFn),
    Stateful(Box<dyn Component>),
}

impl LiveComponent {
    pub(crate) fn render(&mut self, props: &Props) -> Element {
        match self {
            Self::Function(render) => render(props),
            Self::Stateful(component) => component.render(props),
        }
    }

    pub(crate) fn will_mount(&mut self, props: &Props) {
        if let Self::Stateful(component) = self {
            component.will_mount(props);
        }
    }

    pub(crate) fn did_mount(&mut self) {
        if let Self::Stateful(component) = self {
            component.did_mount();
        }
    }

    pub(crate) fn will_receive_props(&mut self, next: &Props) {
        if let Self::Stateful(component) = self {
            component.will_receive_props(next);
        }
    }

    pub(crate) fn did_unmount(&mut self) {
        if let Self::Stateful(component) = self {
            component.did_unmount();
        }
    }

    pub(crate) fn public(&self) -> Option<&dyn Component> {
        match self {
            Self::Function(_) => None,
            Self::Stateful(component) => Some(component.as_ref()),
        }
    }
}

impl fmt::Debug for LiveComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function(_) => f.write_str("LiveComponent::Function"),
            Self::Stateful(_) => f.write_str("LiveComponent::Stateful"),
        }
    }
}
