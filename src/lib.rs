#![doc = include_str!("../README.md")]
#![allow(clippy::multiple_crate_versions)]

pub mod logging;

#[cfg(test)]
mod tests;

#[doc(inline)]
pub use stack_reconciler_core::{
    AttributeWrites, Backend, CHILDREN, Component, ComponentType, CompositeInstance, Element,
    ElementType, Error, HostInstance, Instance, Lifecycle, Operation, PropValue, Props,
    PublicInstance, ReconcileOptions, ReconcileResult, RenderContext, Renderer, RendererBuilder,
    Replacement, TextInstance, apply_operations, create_element, instantiate,
};
pub use stack_reconciler_memory as memory;

pub mod prelude {
    //! Commonly used types for building elements and rendering them.
    //!
    //! ```rust
    //! use stack_reconciler::prelude::*;
    //!
    //! let mut renderer = Renderer::new(MemoryDom::new());
    //! let container = renderer.backend_mut().create_container("root");
    //! renderer
    //!     .render(Element::tag("p").child("hello"), &container)
    //!     .unwrap();
    //! assert_eq!(
    //!     renderer.backend().to_html(container).unwrap(),
    //!     r#"<div id="root"><p>hello</p></div>"#
    //! );
    //! ```
    pub use super::{
        AttributeWrites, Backend, Component, ComponentType, Element, Props, Renderer,
        create_element,
    };
    pub use stack_reconciler_memory::{MemoryDom, NodeId};
}
