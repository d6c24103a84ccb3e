//! Per-position reuse decision.
//!
//! A prior fiber is reused only when it is an element fiber whose type and key
//! both equal the new element's. Coroutines and yields are always created
//! fresh, whatever sits at their position.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::fiber::{Fiber, FiberKind, FiberOutput};
use crate::ids::{FiberId, PriorityLevel};
use crate::reified::create_reified_yield;
use crate::spec::{CoroutineSpec, ElementSpec, YieldSpec};
use crate::traits::FiberStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MatchDecision {
    /// Clone `prior`, keeping its subtree.
    Clone { prior: FiberId },
    Create,
}

/// A child value that occupies exactly one position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LeafSpec<'a> {
    Element(&'a ElementSpec),
    Coroutine(&'a CoroutineSpec),
    Yield(&'a YieldSpec),
}

impl LeafSpec<'_> {
    /// Kind of the fiber this value is placed as.
    pub fn fiber_kind(&self) -> FiberKind {
        match self {
            LeafSpec::Element(_) => FiberKind::Element,
            LeafSpec::Coroutine(_) => FiberKind::Coroutine,
            LeafSpec::Yield(_) => FiberKind::Continuation,
        }
    }
}

pub fn can_reuse(prior: &Fiber, element: &ElementSpec) -> bool {
    prior.kind == FiberKind::Element
        && prior.element_type == element.element_type
        && prior.key == element.key
}

pub fn decide(candidate: Option<(FiberId, &Fiber)>, leaf: LeafSpec<'_>) -> MatchDecision {
    match (candidate, leaf) {
        (Some((prior_id, prior)), LeafSpec::Element(element)) if can_reuse(prior, element) => {
            MatchDecision::Clone { prior: prior_id }
        }
        _ => MatchDecision::Create,
    }
}

/// Produce the fiber for one position under `return_fiber`.
///
/// The returned fiber has its `return_fiber` set and no sibling; linking it
/// into a chain is the caller's job. `candidate` is only read.
pub(crate) fn place<S: FiberStore>(
    store: &mut S,
    return_fiber: FiberId,
    candidate: Option<FiberId>,
    leaf: LeafSpec<'_>,
    priority: PriorityLevel,
) -> (FiberId, MatchDecision) {
    let decision = decide(
        candidate.and_then(|id| store.fiber(id).map(|fiber| (id, fiber))),
        leaf,
    );

    let (id, decision) = match decision {
        MatchDecision::Clone { prior } => match reuse(store, prior, leaf, priority) {
            Some(id) => (id, decision),
            None => {
                tracing::debug!(prior = %prior, "clone failed, creating instead");
                (create(store, leaf, priority), MatchDecision::Create)
            }
        },
        MatchDecision::Create => (create(store, leaf, priority), MatchDecision::Create),
    };

    if let Some(fiber) = store.fiber_mut(id) {
        fiber.return_fiber = Some(return_fiber);
        fiber.sibling = None;
    }
    (id, decision)
}

fn reuse<S: FiberStore>(
    store: &mut S,
    prior: FiberId,
    leaf: LeafSpec<'_>,
    priority: PriorityLevel,
) -> Option<FiberId> {
    let LeafSpec::Element(element) = leaf else {
        return None;
    };
    let prior_child = store.fiber(prior)?.child;
    let id = store.clone_fiber(prior, priority)?;
    let Some(clone) = store.fiber_mut(id) else {
        // Never leave an unreachable clone behind in the store.
        store.remove(id);
        return None;
    };
    clone.pending_props = element.props.clone();
    clone.child = prior_child;
    clone.alternate = Some(prior);
    Some(id)
}

fn create<S: FiberStore>(store: &mut S, leaf: LeafSpec<'_>, priority: PriorityLevel) -> FiberId {
    match leaf {
        LeafSpec::Element(element) => store.create_fiber_from_element(element, priority),
        LeafSpec::Coroutine(coroutine) => store.create_fiber_from_coroutine(coroutine, priority),
        LeafSpec::Yield(yield_spec) => {
            let id = store.create_fiber_from_yield(yield_spec, priority);
            if let Some(fiber) = store.fiber_mut(id) {
                fiber.output = Some(FiberOutput::Continuation(create_reified_yield(yield_spec)));
            }
            id
        }
    }
}
