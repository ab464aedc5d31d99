//! In-memory display backend for the stack reconciler.
//!
//! [`MemoryDom`] keeps element and text nodes in an arena, follows DOM semantics for the
//! operations the reconciler issues, and records every mutation in a journal so callers can
//! check exactly what a render did to the tree.

mod dom;
mod error;
mod snapshot;

pub use dom::{MemoryDom, Mutation, NodeId};
pub use error::MemoryDomError;
pub use snapshot::NodeSnapshot;
