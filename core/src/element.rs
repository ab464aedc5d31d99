//! Immutable descriptions of the desired display tree.
//!
//! Elements are cheap values recreated on every render. They carry no identity: two elements
//! describe the same kind of thing when their [`ElementType`]s are equal.

use core::fmt;
use std::collections::BTreeMap;

use crate::component::{Component, ComponentType};

/// Reserved prop key under which an element's children live.
///
/// It is never written to the display tree as an attribute.
pub const CHILDREN: &str = "children";

/// A scalar prop value. Host instances write it as an attribute using its [`Display`](fmt::Display)
/// form.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum PropValue {
    /// A boolean flag.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A string.
    Str(String),
}

impl PropValue {
    /// Returns the string payload, if this value is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Str(value) => f.write_str(value),
        }
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for PropValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// Props of an element: named attributes plus the ordered `children` sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props {
    attributes: BTreeMap<String, PropValue>,
    children: Vec<Element>,
}

impl Props {
    /// Creates empty props.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Adds an attribute, returning the updated props.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts or overwrites an attribute, returning the previous value.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<PropValue>,
    ) -> Option<PropValue> {
        self.attributes.insert(key.into(), value.into())
    }

    /// Removes an attribute.
    pub fn remove(&mut self, key: &str) -> Option<PropValue> {
        self.attributes.remove(key)
    }

    /// Looks up an attribute.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.attributes.get(key)
    }

    /// Looks up a string attribute.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(PropValue::as_str)
    }

    /// Returns `true` if the attribute is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    /// Iterates over attributes in key order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value))
    }

    /// Returns the children in order.
    #[must_use]
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Appends a child.
    pub fn push_child(&mut self, child: impl Into<Element>) {
        self.children.push(child.into());
    }

    /// Replaces the children, returning the updated props.
    #[must_use]
    pub fn with_children<I, E>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Element>,
    {
        self.children = children.into_iter().map(Into::into).collect();
        self
    }

    /// Splits the props into attributes and children.
    #[must_use]
    pub fn into_parts(self) -> (BTreeMap<String, PropValue>, Vec<Element>) {
        (self.attributes, self.children)
    }
}

/// What an element describes.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementType {
    /// A host element backed directly by a display node, named by its tag.
    Tag(String),
    /// A user component that renders to further elements.
    Component(ComponentType),
    /// A list of siblings without a wrapping node. The reconciler does not support it.
    Fragment,
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(tag) => write!(f, "<{tag}>"),
            Self::Component(component) => write!(f, "<{}>", component.name()),
            Self::Fragment => f.write_str("fragment"),
        }
    }
}

impl From<&str> for ElementType {
    fn from(tag: &str) -> Self {
        Self::Tag(tag.to_owned())
    }
}

impl From<String> for ElementType {
    fn from(tag: String) -> Self {
        Self::Tag(tag)
    }
}

impl From<ComponentType> for ElementType {
    fn from(component: ComponentType) -> Self {
        Self::Component(component)
    }
}

/// An immutable description of desired UI.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// Raw text.
    Text(String),
    /// A typed element with props.
    Typed {
        /// Tag or component this element describes.
        ty: ElementType,
        /// Attributes and children.
        props: Props,
    },
}

impl Element {
    /// Creates a text element.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Creates a host element with the given tag and no props.
    pub fn tag(tag: impl Into<String>) -> Self {
        Self::Typed {
            ty: ElementType::Tag(tag.into()),
            props: Props::new(),
        }
    }

    /// Creates a component element with no props.
    #[must_use]
    pub const fn component(component: ComponentType) -> Self {
        Self::Typed {
            ty: ElementType::Component(component),
            props: Props::new(),
        }
    }

    /// Creates an element for a function component.
    pub fn function<F>(render: F) -> Self
    where
        F: Fn(&Props) -> Self + 'static,
    {
        Self::component(ComponentType::function(render))
    }

    /// Creates an element for a stateful component.
    #[must_use]
    pub fn stateful<C: Component>() -> Self {
        Self::component(ComponentType::stateful::<C>())
    }

    /// Creates a fragment element.
    #[must_use]
    pub const fn fragment() -> Self {
        Self::Typed {
            ty: ElementType::Fragment,
            props: Props::new(),
        }
    }

    /// Sets an attribute. Has no effect on text elements.
    #[must_use]
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        if let Self::Typed { props, .. } = &mut self {
            props.insert(key, value);
        }
        self
    }

    /// Appends a child. Has no effect on text elements.
    #[must_use]
    pub fn child(mut self, child: impl Into<Self>) -> Self {
        if let Self::Typed { props, .. } = &mut self {
            props.push_child(child);
        }
        self
    }

    /// Appends several children. Has no effect on text elements.
    #[must_use]
    pub fn children<I, E>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Self>,
    {
        if let Self::Typed { props, .. } = &mut self {
            for child in children {
                props.push_child(child);
            }
        }
        self
    }

    /// Returns the element type, or `None` for text.
    #[must_use]
    pub const fn ty(&self) -> Option<&ElementType> {
        match self {
            Self::Text(_) => None,
            Self::Typed { ty, .. } => Some(ty),
        }
    }

    /// Returns the props, or `None` for text.
    #[must_use]
    pub const fn props(&self) -> Option<&Props> {
        match self {
            Self::Text(_) => None,
            Self::Typed { props, .. } => Some(props),
        }
    }

    /// Returns the text payload, if this is a text element.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Typed { .. } => None,
        }
    }

    /// Human readable description used in diagnostics.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Text(text) => format!("text {text:?}"),
            Self::Typed { ty, .. } => ty.to_string(),
        }
    }
}

impl From<&str> for Element {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

impl From<String> for Element {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// Builds an element the way JSX desugars: children given here replace `props.children` when
/// non-empty.
pub fn create_element<I>(ty: impl Into<ElementType>, mut props: Props, children: I) -> Element
where
    I: IntoIterator<Item = Element>,
{
    let children: Vec<Element> = children.into_iter().collect();
    if !children.is_empty() {
        props = props.with_children(children);
    }
    Element::Typed {
        ty: ty.into(),
        props,
    }
}
