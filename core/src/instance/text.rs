use super::{Lifecycle, PublicInstance, Slot};
use crate::backend::Backend;
use crate::context::RenderContext;
use crate::element::Element;
use crate::error::{Error, ReconcileResult};

/// Instance backed by one text node.
#[derive(Debug)]
pub struct TextInstance<B: Backend> {
    text: String,
    slot: Slot<B::Node>,
}

impl<B: Backend> TextInstance<B> {
    pub(crate) const fn new(text: String) -> Self {
        Self {
            text,
            slot: Slot::Pending,
        }
    }

    /// Returns the text content.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    pub(crate) const fn lifecycle(&self) -> Lifecycle {
        self.slot.lifecycle()
    }

    pub(crate) fn host_node(&self) -> ReconcileResult<&B::Node, B> {
        self.slot.get("resolve the host node of")
    }

    pub(crate) fn public_instance(&self) -> PublicInstance<'_, B::Node> {
        match &self.slot {
            Slot::Mounted(node) => PublicInstance::Node(node),
            _ => PublicInstance::None,
        }
    }

    pub(crate) fn mount(&mut self, cx: &mut RenderContext<'_, B>) -> ReconcileResult<B::Node, B> {
        self.slot.ensure_pending::<B::Error>("mount")?;
        let node = cx.create_text_node(&self.text)?;
        self.slot = Slot::Mounted(node.clone());
        Ok(node)
    }

    /// Identical text needs no display mutation; anything else must be replaced by the parent.
    pub(crate) fn receive(&mut self, next: Element) -> ReconcileResult<(), B> {
        self.slot.get::<B::Error>("receive")?;
        match next {
            Element::Text(text) if text == self.text => Ok(()),
            other => Err(Error::mismatch(
                format!("text {:?}", self.text),
                other.describe(),
            )),
        }
    }

    pub(crate) fn unmount(&mut self) -> ReconcileResult<(), B> {
        self.slot.take::<B::Error>("unmount").map(drop)
    }
}
