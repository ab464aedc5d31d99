use std::collections::BTreeMap;

use tracing::trace;

use super::{Instance, Lifecycle, PublicInstance, Slot, instantiate};
use crate::backend::Backend;
use crate::context::{AttributeWrites, RenderContext};
use crate::element::{CHILDREN, Element, ElementType, PropValue, Props};
use crate::error::{Error, ReconcileResult};
use crate::operation::{Operation, apply_operations};

#[derive(Debug)]
struct HostMount<B: Backend> {
    node: B::Node,
    children: Vec<Instance<B>>,
}

/// Instance backed by one element node.
#[derive(Debug)]
pub struct HostInstance<B: Backend> {
    tag: String,
    attributes: BTreeMap<String, PropValue>,
    /// Children waiting for the first mount.
    pending: Vec<Element>,
    slot: Slot<HostMount<B>>,
}

impl<B: Backend> HostInstance<B> {
    pub(crate) fn new(tag: String, props: Props) -> Self {
        let (attributes, pending) = props.into_parts();
        Self {
            tag,
            attributes,
            pending,
            slot: Slot::Pending,
        }
    }

    /// Returns the tag this instance was created for.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns the attributes last written to the node.
    #[must_use]
    pub const fn attributes(&self) -> &BTreeMap<String, PropValue> {
        &self.attributes
    }

    /// Returns the mounted child instances, in display order.
    #[must_use]
    pub fn children(&self) -> &[Instance<B>] {
        match &self.slot {
            Slot::Mounted(mount) => &mount.children,
            _ => &[],
        }
    }

    pub(crate) const fn lifecycle(&self) -> Lifecycle {
        self.slot.lifecycle()
    }

    pub(crate) fn host_node(&self) -> ReconcileResult<&B::Node, B> {
        self.slot.get("resolve the host node of").map(|mount| &mount.node)
    }

    pub(crate) fn public_instance(&self) -> PublicInstance<'_, B::Node> {
        match &self.slot {
            Slot::Mounted(mount) => PublicInstance::Node(&mount.node),
            _ => PublicInstance::None,
        }
    }

    pub(crate) fn mount(&mut self, cx: &mut RenderContext<'_, B>) -> ReconcileResult<B::Node, B> {
        self.slot.ensure_pending::<B::Error>("mount")?;

        let node = cx.create_element(&self.tag)?;
        for (key, value) in &self.attributes {
            if key != CHILDREN {
                cx.set_attribute(&node, key, &value.to_string())?;
            }
        }

        let mut children = Vec::with_capacity(self.pending.len());
        for element in std::mem::take(&mut self.pending) {
            children.push(instantiate(element)?);
        }
        let mut child_nodes = Vec::with_capacity(children.len());
        for child in &mut children {
            child_nodes.push(child.mount(cx)?);
        }
        for child_node in &child_nodes {
            cx.append_child(&node, child_node)?;
        }

        self.slot = Slot::Mounted(HostMount {
            node: node.clone(),
            children,
        });
        Ok(node)
    }

    pub(crate) fn receive(
        &mut self,
        cx: &mut RenderContext<'_, B>,
        next: Element,
    ) -> ReconcileResult<(), B> {
        let Self {
            tag,
            attributes,
            slot,
            ..
        } = self;
        let mount = slot.get_mut::<B::Error>("receive")?;

        let props = match next {
            Element::Typed {
                ty: ElementType::Tag(next_tag),
                props,
            } if next_tag == *tag => props,
            other => return Err(Error::mismatch(format!("<{tag}>"), other.describe())),
        };
        let (next_attributes, next_children) = props.into_parts();

        reconcile_attributes(cx, &mount.node, attributes, &next_attributes)?;
        *attributes = next_attributes;

        let mut operations = Vec::new();
        let diffed = diff_children(cx, &mut mount.children, next_children, &mut operations);
        // Applied even after a failed diff, so the node matches the children that survived.
        let applied =
            apply_operations(cx.backend(), &mount.node, operations).map_err(Error::Backend);
        diffed.and(applied)
    }

    pub(crate) fn unmount(&mut self) -> ReconcileResult<(), B> {
        let mut mount = self.slot.take::<B::Error>("unmount")?;
        for child in &mut mount.children {
            child.unmount()?;
        }
        Ok(())
    }
}

/// Removes attributes that disappeared and writes the ones in `next`.
///
/// Keys absent from both maps are never touched.
fn reconcile_attributes<B: Backend>(
    cx: &mut RenderContext<'_, B>,
    node: &B::Node,
    previous: &BTreeMap<String, PropValue>,
    next: &BTreeMap<String, PropValue>,
) -> ReconcileResult<(), B> {
    for key in previous.keys() {
        if key != CHILDREN && !next.contains_key(key) {
            cx.remove_attribute(node, key)?;
        }
    }

    let always = cx.options().attribute_writes == AttributeWrites::Always;
    for (key, value) in next {
        if key == CHILDREN {
            continue;
        }
        if always || previous.get(key) != Some(value) {
            cx.set_attribute(node, key, &value.to_string())?;
        }
    }
    Ok(())
}

/// Matches `children` against the next child elements by index, in place.
///
/// An index past the old list is an `ADD`; a compatible instance at the same index receives the
/// element and is kept; an incompatible one is unmounted and `REPLACE`d. Old instances past the
/// end of the next list are unmounted and `REMOVE`d. There is no key or move detection, so an
/// insertion in the middle shows up as a replacement of every later sibling.
///
/// Operations are pushed to `operations` in decision order and not applied here; see
/// [`apply_operations`].
///
/// # Errors
///
/// Stops at the first dispatcher, lifecycle or backend failure. `children` then still holds every
/// mounted instance in the order the parent shows them once `operations` are applied: the
/// children handled so far, then the untouched rest of the old list. A child that lost its node
/// while failing is unmounted and gets a `REMOVE`.
pub fn diff_children<B: Backend>(
    cx: &mut RenderContext<'_, B>,
    children: &mut Vec<Instance<B>>,
    next: Vec<Element>,
    operations: &mut Vec<Operation<B::Node>>,
) -> ReconcileResult<(), B> {
    let mut previous = std::mem::take(children).into_iter();
    let result = match_children(cx, &mut previous, next, children, operations);
    children.extend(previous);

    trace!(
        children = children.len(),
        operations = operations.len(),
        failed = result.is_err(),
        "diffed children"
    );
    result
}

fn match_children<B: Backend>(
    cx: &mut RenderContext<'_, B>,
    previous: &mut std::vec::IntoIter<Instance<B>>,
    next: Vec<Element>,
    children: &mut Vec<Instance<B>>,
    operations: &mut Vec<Operation<B::Node>>,
) -> ReconcileResult<(), B> {
    for element in next {
        let Some(prev) = previous.next() else {
            let mut child = instantiate(element)?;
            let node = child.mount(cx)?;
            operations.push(Operation::Add { node });
            children.push(child);
            continue;
        };

        // Parked in the output first so an early return keeps it.
        let index = children.len();
        children.push(prev);
        let prev_node = children[index].host_node()?.clone();

        if children[index].can_receive(&element) {
            match children[index].receive(cx, element) {
                Ok(Some(replacement)) => operations.push(Operation::Replace {
                    prev: replacement.prev,
                    next: replacement.next,
                }),
                Ok(None) => {}
                Err(error) => {
                    if children[index].lifecycle() != Lifecycle::Mounted {
                        children.truncate(index);
                        operations.push(Operation::Remove { node: prev_node });
                    }
                    return Err(error);
                }
            }
            continue;
        }

        let mut child = instantiate(element)?;
        let mut prev = children.remove(index);
        match prev.unmount().and_then(|()| child.mount(cx)) {
            Ok(next_node) => {
                operations.push(Operation::Replace {
                    prev: prev_node,
                    next: next_node,
                });
                children.push(child);
            }
            Err(error) => {
                operations.push(Operation::Remove { node: prev_node });
                return Err(error);
            }
        }
    }

    for mut stale in previous {
        let node = stale.host_node()?.clone();
        operations.push(Operation::Remove { node });
        stale.unmount()?;
    }
    Ok(())
}
