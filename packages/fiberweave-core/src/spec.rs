//! Declarative child specifications.
//!
//! A [`ChildSpec`] is the immutable description a parent hands to the
//! reconciler for its children. Only elements, coroutines, yields and lists of
//! those are understood; every other shape is carried as one of the
//! unrecognized variants so the reconciler can report it and move on.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::ids::{ElementType, Key};

/// A scalar prop value.
#[derive(Clone, Debug, PartialEq)]
pub enum PropValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl From<bool> for PropValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for PropValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for PropValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for PropValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for PropValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<String> for PropValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

/// Input data for one position. `children` is the description of the next
/// level down; it is reconciled when the host processes the fiber that
/// received these props, not when the fiber itself is placed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Props {
    attributes: BTreeMap<String, PropValue>,
    children: Option<Arc<ChildSpec>>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_children(mut self, children: impl Into<ChildSpec>) -> Self {
        self.children = Some(Arc::new(children.into()));
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<PropValue>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.attributes.get(name)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn children(&self) -> Option<&ChildSpec> {
        self.children.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.children.is_none()
    }
}

/// A host element or component instance.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementSpec {
    pub element_type: ElementType,
    pub key: Option<Key>,
    pub props: Props,
}

impl ElementSpec {
    pub fn new(element_type: impl Into<ElementType>) -> Self {
        Self {
            element_type: element_type.into(),
            key: None,
            props: Props::default(),
        }
    }

    pub fn keyed(mut self, key: impl Into<Key>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn props(mut self, props: Props) -> Self {
        self.props = props;
        self
    }
}

/// A coroutine boundary: `handler` runs once its children have yielded.
#[derive(Clone, Debug, PartialEq)]
pub struct CoroutineSpec {
    pub handler: ElementType,
    pub key: Option<Key>,
    pub props: Props,
}

impl CoroutineSpec {
    pub fn new(handler: impl Into<ElementType>) -> Self {
        Self {
            handler: handler.into(),
            key: None,
            props: Props::default(),
        }
    }

    pub fn keyed(mut self, key: impl Into<Key>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn props(mut self, props: Props) -> Self {
        self.props = props;
        self
    }
}

/// A yield out of a coroutine's child list. `continuation` is what the
/// enclosing coroutine resumes with.
#[derive(Clone, Debug, PartialEq)]
pub struct YieldSpec {
    pub continuation: ElementType,
    pub key: Option<Key>,
    pub props: Props,
}

impl YieldSpec {
    pub fn new(continuation: impl Into<ElementType>) -> Self {
        Self {
            continuation: continuation.into(),
            key: None,
            props: Props::default(),
        }
    }

    pub fn keyed(mut self, key: impl Into<Key>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn props(mut self, props: Props) -> Self {
        self.props = props;
        self
    }
}

/// One new-children value.
#[derive(Clone, Debug, PartialEq)]
pub enum ChildSpec {
    Element(ElementSpec),
    Coroutine(CoroutineSpec),
    Yield(YieldSpec),
    /// Items may themselves be lists.
    List(Vec<ChildSpec>),
    /// `null` / nothing.
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
    /// An object without a recognized tag; the string is a rendering of it for
    /// diagnostics.
    Opaque(String),
}

impl ChildSpec {
    pub fn element(
        element_type: impl Into<ElementType>,
        key: Option<&str>,
        props: Props,
    ) -> Self {
        Self::Element(ElementSpec {
            element_type: element_type.into(),
            key: key.map(Key::from),
            props,
        })
    }

    pub fn list(items: impl IntoIterator<Item = ChildSpec>) -> Self {
        Self::List(items.into_iter().collect())
    }
}

impl From<ElementSpec> for ChildSpec {
    fn from(spec: ElementSpec) -> Self {
        Self::Element(spec)
    }
}

impl From<CoroutineSpec> for ChildSpec {
    fn from(spec: CoroutineSpec) -> Self {
        Self::Coroutine(spec)
    }
}

impl From<YieldSpec> for ChildSpec {
    fn from(spec: YieldSpec) -> Self {
        Self::Yield(spec)
    }
}

impl From<Vec<ChildSpec>> for ChildSpec {
    fn from(items: Vec<ChildSpec>) -> Self {
        Self::List(items)
    }
}
