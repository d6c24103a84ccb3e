//! Building a parent's new child chain.
//!
//! The chain is built left to right. The list head has nothing to attach to,
//! so it goes through `create_first_child`; every later item goes through
//! `create_subsequent_child`, which links the new fiber after the current
//! tail.
//!
//! Prior fibers are matched purely by position: a walking candidate pointer
//! moves one sibling forward per list item. When an item is itself a list it
//! may consume more or fewer prior siblings than that, and the walk drifts out
//! of step with the prior chain; later items are then compared with whichever
//! prior sibling the walk landed on. Prior fibers left without a counterpart
//! are not reported.
//!
//! A list at the head of the chain stands for its own first fiber: the next
//! item is linked after that fiber, replacing whatever the nested list had
//! linked behind it.

use crate::classify::{classify, describe, Classified};
use crate::config::DiagnosticsConfig;
use crate::diagnostics::{ChildPosition, DiagnosticSink, Placement, TracingSink, UnrecognizedChild};
use crate::ids::{FiberId, PriorityLevel};
use crate::matcher::{place, LeafSpec};
use crate::spec::ChildSpec;
use crate::traits::FiberStore;

/// Both ends of a chain segment built from one list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ChainEnds {
    head: Option<FiberId>,
    tail: Option<FiberId>,
}

/// Reconciles child chains against a fiber store, reporting to a sink.
#[derive(Debug)]
pub struct ChildReconciler<S, D = TracingSink> {
    store: S,
    sink: D,
}

impl<S: FiberStore> ChildReconciler<S, TracingSink> {
    /// Reconciler that logs through `tracing`.
    pub fn with_tracing(store: S, config: DiagnosticsConfig) -> Self {
        Self::new(store, TracingSink::new(config))
    }
}

impl<S: FiberStore, D: DiagnosticSink> ChildReconciler<S, D> {
    pub fn new(store: S, sink: D) -> Self {
        Self { store, sink }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn sink(&self) -> &D {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut D {
        &mut self.sink
    }

    pub fn into_parts(self) -> (S, D) {
        (self.store, self.sink)
    }

    /// Build the new child chain of `return_fiber` from `new_children`, reusing
    /// fibers from the prior chain starting at `current_first_child` where
    /// type and key line up.
    ///
    /// Returns the new first child, or `None` when nothing placeable was
    /// described. The prior chain is only read; every fiber in the new chain
    /// carries `priority`. Never fails: unplaceable values are reported to the
    /// sink and skipped.
    pub fn reconcile_child_fibers(
        &mut self,
        return_fiber: FiberId,
        current_first_child: Option<FiberId>,
        new_children: &ChildSpec,
        priority: PriorityLevel,
    ) -> Option<FiberId> {
        self.create_first_child(return_fiber, current_first_child, new_children, priority)
    }

    /// Place `new_children` at the head of a chain that has no fiber yet,
    /// returning the first fiber placed.
    fn create_first_child(
        &mut self,
        return_fiber: FiberId,
        existing: Option<FiberId>,
        new_children: &ChildSpec,
        priority: PriorityLevel,
    ) -> Option<FiberId> {
        let leaf = match classify(new_children) {
            Classified::Element(element) => LeafSpec::Element(element),
            Classified::Coroutine(coroutine) => LeafSpec::Coroutine(coroutine),
            Classified::Continuation(yield_spec) => LeafSpec::Yield(yield_spec),
            Classified::List(items) => {
                return self
                    .reconcile_list(return_fiber, existing, None, items, priority)
                    .head
            }
            Classified::Unrecognized(shape) => {
                self.sink.unrecognized_child(&UnrecognizedChild {
                    parent: return_fiber,
                    position: ChildPosition::First,
                    shape,
                    detail: describe(new_children),
                });
                return None;
            }
        };

        Some(self.place_leaf(return_fiber, existing, leaf, priority))
    }

    /// Place `new_children` after `previous`, returning the new tail.
    ///
    /// An unplaceable value leaves the tail where it was.
    fn create_subsequent_child(
        &mut self,
        return_fiber: FiberId,
        existing: Option<FiberId>,
        previous: FiberId,
        new_children: &ChildSpec,
        priority: PriorityLevel,
    ) -> FiberId {
        let leaf = match classify(new_children) {
            Classified::Element(element) => LeafSpec::Element(element),
            Classified::Coroutine(coroutine) => LeafSpec::Coroutine(coroutine),
            Classified::Continuation(yield_spec) => LeafSpec::Yield(yield_spec),
            Classified::List(items) => {
                return self
                    .reconcile_list(return_fiber, existing, Some(previous), items, priority)
                    .tail
                    .unwrap_or(previous)
            }
            Classified::Unrecognized(shape) => {
                self.sink.unrecognized_child(&UnrecognizedChild {
                    parent: return_fiber,
                    position: ChildPosition::Subsequent,
                    shape,
                    detail: describe(new_children),
                });
                return previous;
            }
        };

        let fiber = self.place_leaf(return_fiber, existing, leaf, priority);
        if let Some(prev) = self.store.fiber_mut(previous) {
            prev.sibling = Some(fiber);
        }
        fiber
    }

    /// Walk `items` left to right, extending the chain that ends at
    /// `previous`, or starting one when `previous` is `None`.
    ///
    /// `head` is the first fiber placed when the list started the chain. `tail`
    /// is the fiber the next item links after, which is `previous` if the list
    /// placed nothing.
    fn reconcile_list(
        &mut self,
        return_fiber: FiberId,
        existing: Option<FiberId>,
        previous: Option<FiberId>,
        items: &[ChildSpec],
        priority: PriorityLevel,
    ) -> ChainEnds {
        let mut head = None;
        let mut tail = previous;
        let mut existing = existing;

        for item in items {
            tail = match tail {
                None => {
                    head = self.create_first_child(return_fiber, existing, item, priority);
                    head
                }
                Some(prev) => Some(self.create_subsequent_child(
                    return_fiber,
                    existing,
                    prev,
                    item,
                    priority,
                )),
            };
            // One prior sibling per item, however many fibers the item produced.
            if let (Some(_), Some(current)) = (tail, existing) {
                existing = self.store.fiber(current).and_then(|fiber| fiber.sibling);
            }
        }

        ChainEnds { head, tail }
    }

    fn place_leaf(
        &mut self,
        return_fiber: FiberId,
        existing: Option<FiberId>,
        leaf: LeafSpec<'_>,
        priority: PriorityLevel,
    ) -> FiberId {
        let (fiber, decision) = place(&mut self.store, return_fiber, existing, leaf, priority);
        self.sink.placement(&Placement {
            parent: return_fiber,
            fiber,
            kind: leaf.fiber_kind(),
            decision,
        });
        fiber
    }
}

/// One-off reconciliation without keeping a [`ChildReconciler`] around.
pub fn reconcile_child_fibers<S, D>(
    store: &mut S,
    sink: &mut D,
    return_fiber: FiberId,
    current_first_child: Option<FiberId>,
    new_children: &ChildSpec,
    priority: PriorityLevel,
) -> Option<FiberId>
where
    S: FiberStore + ?Sized,
    D: DiagnosticSink + ?Sized,
{
    ChildReconciler::new(store, sink).reconcile_child_fibers(
        return_fiber,
        current_first_child,
        new_children,
        priority,
    )
}
