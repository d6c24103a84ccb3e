use crate::fiber::Fiber;
use crate::ids::{FiberId, PriorityLevel};
use crate::spec::{CoroutineSpec, ElementSpec, YieldSpec};

/// Owner of fiber nodes, as seen by the reconciler.
///
/// Only `insert`, `remove`, `fiber` and `fiber_mut` are required. The
/// creation and cloning hooks have defaults built on [`Fiber`]'s constructors;
/// a host that pools nodes or tracks allocations overrides them.
pub trait FiberStore {
    fn insert(&mut self, fiber: Fiber) -> FiberId;
    /// Take a fiber back out of the store. `None` if `id` is not live.
    fn remove(&mut self, id: FiberId) -> Option<Fiber>;
    fn fiber(&self, id: FiberId) -> Option<&Fiber>;
    fn fiber_mut(&mut self, id: FiberId) -> Option<&mut Fiber>;

    fn create_fiber_from_element(&mut self, spec: &ElementSpec, priority: PriorityLevel) -> FiberId {
        self.insert(Fiber::from_element(spec, priority))
    }

    fn create_fiber_from_coroutine(
        &mut self,
        spec: &CoroutineSpec,
        priority: PriorityLevel,
    ) -> FiberId {
        self.insert(Fiber::from_coroutine(spec, priority))
    }

    fn create_fiber_from_yield(&mut self, spec: &YieldSpec, priority: PriorityLevel) -> FiberId {
        self.insert(Fiber::from_yield(spec, priority))
    }

    /// Allocate a next-generation copy of `prior`. Returns `None` when `prior`
    /// is not a live fiber of this store. `prior` itself is left untouched.
    fn clone_fiber(&mut self, prior: FiberId, priority: PriorityLevel) -> Option<FiberId> {
        let clone = self.fiber(prior)?.clone_for_next_generation(prior, priority);
        Some(self.insert(clone))
    }
}

impl<S: FiberStore + ?Sized> FiberStore for &mut S {
    fn insert(&mut self, fiber: Fiber) -> FiberId {
        (**self).insert(fiber)
    }

    fn remove(&mut self, id: FiberId) -> Option<Fiber> {
        (**self).remove(id)
    }

    fn fiber(&self, id: FiberId) -> Option<&Fiber> {
        (**self).fiber(id)
    }

    fn fiber_mut(&mut self, id: FiberId) -> Option<&mut Fiber> {
        (**self).fiber_mut(id)
    }

    fn create_fiber_from_element(&mut self, spec: &ElementSpec, priority: PriorityLevel) -> FiberId {
        (**self).create_fiber_from_element(spec, priority)
    }

    fn create_fiber_from_coroutine(
        &mut self,
        spec: &CoroutineSpec,
        priority: PriorityLevel,
    ) -> FiberId {
        (**self).create_fiber_from_coroutine(spec, priority)
    }

    fn create_fiber_from_yield(&mut self, spec: &YieldSpec, priority: PriorityLevel) -> FiberId {
        (**self).create_fiber_from_yield(spec, priority)
    }

    fn clone_fiber(&mut self, prior: FiberId, priority: PriorityLevel) -> Option<FiberId> {
        (**self).clone_fiber(prior, priority)
    }
}
