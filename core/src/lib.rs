#![allow(clippy::module_name_repetitions)]

//! Core of the stack reconciler.
//!
//! An [`Element`] describes what the display tree should look like. The reconciler keeps a
//! persistent tree of [`Instance`]s mirroring the last rendered elements and, on every render,
//! walks the new element tree against it: instances whose element type is unchanged receive the
//! new element and keep their state, everything else is unmounted and replaced. Display mutations
//! are issued through a [`Backend`], which the reconciler only ever writes to.
//!
//! Children are matched by position only. There are no keys and no move detection, so inserting
//! or removing in the middle of a child list remounts every following sibling.

pub mod backend;
pub mod component;
pub mod context;
pub mod element;
pub mod error;
pub mod instance;
pub mod operation;
pub mod renderer;

#[cfg(test)]
mod mock;

pub use backend::Backend;
pub use component::{Component, ComponentType};
pub use context::{AttributeWrites, ReconcileOptions, RenderContext};
pub use element::{CHILDREN, Element, ElementType, PropValue, Props, create_element};
pub use error::{Error, ReconcileResult};
pub use instance::{
    CompositeInstance, HostInstance, Instance, Lifecycle, PublicInstance, Replacement,
    TextInstance, instantiate,
};
pub use operation::{Operation, apply_operations};
pub use renderer::{Renderer, RendererBuilder};
