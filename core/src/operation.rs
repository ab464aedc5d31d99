//! Display operations recorded while diffing a host node's children.
//!
//! The child diff only decides what has to happen and records it as a list of [`Operation`]s.
//! [`apply_operations`] then replays that list against the backend in recorded order.

use tracing::trace;

use crate::backend::Backend;

/// A single structural change to one parent node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation<N> {
    /// Append a freshly mounted node.
    Add {
        /// The node to append.
        node: N,
    },
    /// Swap a node for a freshly mounted one, keeping its position.
    Replace {
        /// The node currently attached.
        prev: N,
        /// The node taking its place.
        next: N,
    },
    /// Detach a node whose instance was unmounted.
    Remove {
        /// The node to detach.
        node: N,
    },
}

impl<N> Operation<N> {
    /// Short label of the operation kind.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Add { .. } => "ADD",
            Self::Replace { .. } => "REPLACE",
            Self::Remove { .. } => "REMOVE",
        }
    }
}

/// Applies `operations` to the children of `parent`, in order.
///
/// # Errors
///
/// Stops at and returns the first backend failure. Operations before it stay applied.
pub fn apply_operations<B, I>(backend: &mut B, parent: &B::Node, operations: I) -> Result<(), B::Error>
where
    B: Backend,
    I: IntoIterator<Item = Operation<B::Node>>,
{
    for operation in operations {
        trace!(parent = ?parent, op = operation.label(), "applying display operation");
        match operation {
            Operation::Add { node } => backend.append_child(parent, &node)?,
            Operation::Replace { prev, next } => backend.replace_child(parent, &next, &prev)?,
            Operation::Remove { node } => backend.remove_child(parent, &node)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockBackend;

    #[test]
    fn operations_apply_in_recorded_order() {
        let mut backend = MockBackend::default();
        let parent = backend.create_element("ul").expect("create");
        let a = backend.create_text_node("a").expect("create");
        let b = backend.create_text_node("b").expect("create");
        let c = backend.create_text_node("c").expect("create");
        backend.append_child(&parent, &a).expect("append");
        backend.append_child(&parent, &b).expect("append");
        backend.log.clear();

        apply_operations(
            &mut backend,
            &parent,
            vec![
                Operation::Replace { prev: a, next: c },
                Operation::Remove { node: b },
                Operation::Add { node: a },
            ],
        )
        .expect("apply");

        assert_eq!(
            backend.log,
            vec![
                format!("replace {parent} {c} {a}"),
                format!("remove {parent} {b}"),
                format!("append {parent} {a}"),
            ]
        );
        assert_eq!(backend.children_of(parent), vec![c, a]);
    }

    #[test]
    fn failure_stops_the_replay() {
        let mut backend = MockBackend::default();
        let parent = backend.create_element("ul").expect("create");
        let stray = backend.create_text_node("x").expect("create");
        let fresh = backend.create_text_node("y").expect("create");

        let result = apply_operations(
            &mut backend,
            &parent,
            vec![
                Operation::Remove { node: stray },
                Operation::Add { node: fresh },
            ],
        );

        assert!(result.is_err());
        assert!(backend.children_of(parent).is_empty());
    }

    #[test]
    fn labels() {
        assert_eq!(Operation::Add { node: 1 }.label(), "ADD");
        assert_eq!(Operation::Replace { prev: 1, next: 2 }.label(), "REPLACE");
        assert_eq!(Operation::Remove { node: 1 }.label(), "REMOVE");
    }
}
