//! The fiber: one unit of work at one tree position, in one generation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ids::{ElementType, FiberId, Key, PriorityLevel};
use crate::reified::ReifiedYield;
use crate::spec::{CoroutineSpec, ElementSpec, Props, YieldSpec};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FiberKind {
    Element,
    Coroutine,
    /// Fragment fiber standing in for a yield; its output is the captured
    /// continuation.
    Continuation,
}

/// Computed payload of a fiber.
#[derive(Clone, Debug, PartialEq)]
pub enum FiberOutput {
    Continuation(ReifiedYield),
}

/// A fiber node.
///
/// `child` and `sibling` own the structure below and to the right;
/// `return_fiber` and `alternate` are plain back-references. A cloned fiber
/// shares its `child` with the prior-generation fiber it was cloned from.
#[derive(Clone, Debug, PartialEq)]
pub struct Fiber {
    pub kind: FiberKind,
    pub element_type: ElementType,
    pub key: Option<Key>,
    pub pending_props: Props,
    pub child: Option<FiberId>,
    pub sibling: Option<FiberId>,
    pub return_fiber: Option<FiberId>,
    pub alternate: Option<FiberId>,
    pub output: Option<FiberOutput>,
    pub priority: PriorityLevel,
}

impl Fiber {
    fn detached(
        kind: FiberKind,
        element_type: ElementType,
        key: Option<Key>,
        pending_props: Props,
        priority: PriorityLevel,
    ) -> Self {
        Self {
            kind,
            element_type,
            key,
            pending_props,
            child: None,
            sibling: None,
            return_fiber: None,
            alternate: None,
            output: None,
            priority,
        }
    }

    pub fn from_element(spec: &ElementSpec, priority: PriorityLevel) -> Self {
        Self::detached(
            FiberKind::Element,
            spec.element_type.clone(),
            spec.key.clone(),
            spec.props.clone(),
            priority,
        )
    }

    pub fn from_coroutine(spec: &CoroutineSpec, priority: PriorityLevel) -> Self {
        Self::detached(
            FiberKind::Coroutine,
            spec.handler.clone(),
            spec.key.clone(),
            spec.props.clone(),
            priority,
        )
    }

    /// The output is left empty; the reconciler attaches the reified yield.
    pub fn from_yield(spec: &YieldSpec, priority: PriorityLevel) -> Self {
        Self::detached(
            FiberKind::Continuation,
            spec.continuation.clone(),
            spec.key.clone(),
            spec.props.clone(),
            priority,
        )
    }

    /// Next-generation copy of `self`, paired back to it through `alternate`.
    ///
    /// Keeps identity, subtree and output; drops the sibling and return links,
    /// which belong to whichever chain the clone is placed in.
    pub fn clone_for_next_generation(&self, prior: FiberId, priority: PriorityLevel) -> Self {
        Self {
            kind: self.kind,
            element_type: self.element_type.clone(),
            key: self.key.clone(),
            pending_props: self.pending_props.clone(),
            child: self.child,
            sibling: None,
            return_fiber: None,
            alternate: Some(prior),
            output: self.output.clone(),
            priority,
        }
    }

    pub fn reified_yield(&self) -> Option<&ReifiedYield> {
        match &self.output {
            Some(FiberOutput::Continuation(reified)) => Some(reified),
            None => None,
        }
    }
}
