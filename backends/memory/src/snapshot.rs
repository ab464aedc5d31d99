use std::collections::BTreeMap;

use serde::Serialize;

use crate::dom::{MemoryDom, NodeId, NodeKind};
use crate::error::MemoryDomError;

/// Owned copy of a subtree, comparable and serializable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeSnapshot {
    /// An element with its attributes and children.
    Element {
        /// Tag name.
        tag: String,
        /// Attributes in name order.
        attributes: BTreeMap<String, String>,
        /// Children in order.
        children: Vec<NodeSnapshot>,
    },
    /// A text node.
    Text {
        /// Content.
        text: String,
    },
}

impl NodeSnapshot {
    /// Renders the snapshot as HTML, escaping text and attribute values.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Self::Text { text } => escape_into(out, text, false),
            Self::Element {
                tag,
                attributes,
                children,
            } => {
                out.push('<');
                out.push_str(tag);
                for (key, value) in attributes {
                    out.push(' ');
                    out.push_str(key);
                    out.push_str("=\"");
                    escape_into(out, value, true);
                    out.push('"');
                }
                out.push('>');
                for child in children {
                    child.write_html(out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

fn escape_into(out: &mut String, raw: &str, attribute: bool) {
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

pub(crate) fn capture(dom: &MemoryDom, node: NodeId) -> Result<NodeSnapshot, MemoryDomError> {
    let entry = dom.entry(node)?;
    Ok(match &entry.kind {
        NodeKind::Text(text) => NodeSnapshot::Text { text: text.clone() },
        NodeKind::Element { tag, attributes } => NodeSnapshot::Element {
            tag: tag.clone(),
            attributes: attributes.clone(),
            children: entry
                .children
                .iter()
                .map(|&child| capture(dom, child))
                .collect::<Result<_, _>>()?,
        },
    })
}
