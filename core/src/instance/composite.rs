use tracing::trace;

use super::{Instance, Lifecycle, PublicInstance, Replacement, Slot, instantiate};
use crate::backend::Backend;
use crate::component::{ComponentType, LiveComponent};
use crate::context::RenderContext;
use crate::element::{Element, ElementType, Props};
use crate::error::{Error, ReconcileResult};

#[derive(Debug)]
struct CompositeMount<B: Backend> {
    live: LiveComponent,
    rendered: Box<Instance<B>>,
}

/// Instance backed by a user component. It owns exactly one rendered child while mounted and
/// delegates every display mutation to it.
#[derive(Debug)]
pub struct CompositeInstance<B: Backend> {
    component: ComponentType,
    props: Props,
    slot: Slot<CompositeMount<B>>,
}

impl<B: Backend> CompositeInstance<B> {
    pub(crate) const fn new(component: ComponentType, props: Props) -> Self {
        Self {
            component,
            props,
            slot: Slot::Pending,
        }
    }

    /// Returns the component this instance renders.
    #[must_use]
    pub const fn component(&self) -> &ComponentType {
        &self.component
    }

    /// Returns the props the component last rendered with.
    #[must_use]
    pub const fn props(&self) -> &Props {
        &self.props
    }

    /// Returns the rendered child, if mounted.
    #[must_use]
    pub fn rendered(&self) -> Option<&Instance<B>> {
        match &self.slot {
            Slot::Mounted(mount) => Some(&mount.rendered),
            _ => None,
        }
    }

    pub(crate) const fn lifecycle(&self) -> Lifecycle {
        self.slot.lifecycle()
    }

    pub(crate) fn host_node(&self) -> ReconcileResult<&B::Node, B> {
        self.slot
            .get::<B::Error>("resolve the host node of")?
            .rendered
            .host_node()
    }

    pub(crate) fn public_instance(&self) -> PublicInstance<'_, B::Node> {
        match &self.slot {
            Slot::Mounted(mount) => mount
                .live
                .public()
                .map_or(PublicInstance::None, PublicInstance::Component),
            _ => PublicInstance::None,
        }
    }

    pub(crate) fn mount(&mut self, cx: &mut RenderContext<'_, B>) -> ReconcileResult<B::Node, B> {
        self.slot.ensure_pending::<B::Error>("mount")?;

        let mut live = self.component.instantiate(&self.props);
        live.will_mount(&self.props);
        let element = live.render(&self.props);

        let mut rendered = instantiate(element)?;
        let node = rendered.mount(cx)?;
        live.did_mount();

        self.slot = Slot::Mounted(CompositeMount {
            live,
            rendered: Box::new(rendered),
        });
        Ok(node)
    }

    pub(crate) fn receive(
        &mut self,
        cx: &mut RenderContext<'_, B>,
        next: Element,
    ) -> ReconcileResult<Option<Replacement<B::Node>>, B> {
        let Self {
            component,
            props,
            slot,
        } = self;
        let mount = slot.get_mut::<B::Error>("receive")?;

        let next_props = match next {
            Element::Typed {
                ty: ElementType::Component(next_component),
                props,
            } if next_component == *component => props,
            other => {
                return Err(Error::mismatch(
                    format!("<{}>", component.name()),
                    other.describe(),
                ));
            }
        };

        mount.live.will_receive_props(&next_props);
        *props = next_props;
        let element = mount.live.render(props);

        let result = if mount.rendered.can_receive(&element) {
            mount.rendered.receive(cx, element)
        } else {
            trace!(
                component = component.name(),
                next = %element.describe(),
                "rendered type changed, replacing child"
            );
            swap_rendered(cx, &mut mount.rendered, element)
        };

        if result.is_err() && mount.rendered.lifecycle() != Lifecycle::Mounted {
            // Nothing left to show; the owner drops the old node.
            trace!(component = component.name(), "rendered child lost, unmounting");
            slot.take::<B::Error>("unmount")?.live.did_unmount();
        }
        result
    }

    pub(crate) fn unmount(&mut self) -> ReconcileResult<(), B> {
        let mut mount = self.slot.take::<B::Error>("unmount")?;
        mount.rendered.unmount()?;
        mount.live.did_unmount();
        Ok(())
    }
}

/// Unmounts `rendered` and mounts `element` in its place.
///
/// If the new child fails to mount, `rendered` is left unmounted.
fn swap_rendered<B: Backend>(
    cx: &mut RenderContext<'_, B>,
    rendered: &mut Instance<B>,
    element: Element,
) -> ReconcileResult<Option<Replacement<B::Node>>, B> {
    let prev = rendered.host_node()?.clone();
    let mut fresh = instantiate(element)?;
    rendered.unmount()?;
    let next = fresh.mount(cx)?;
    *rendered = fresh;
    Ok(Some(Replacement { prev, next }))
}
