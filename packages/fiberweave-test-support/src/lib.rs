//! Shared fixtures and a conformance suite for [`FiberStore`] implementations.
//!
//! A store passes when `conformance::run_all::<S>()` returns without
//! panicking. The suite only goes through the `FiberStore` trait, so it works
//! for any host store, not just the in-memory arena.

use std::cell::Cell;

use fiberweave_core::{
    ChildSpec, CoroutineSpec, ElementSpec, Fiber, FiberId, FiberStore, PriorityLevel, Props,
    YieldSpec,
};

/// Install a `tracing` subscriber that writes through the test harness.
///
/// Honors `RUST_LOG`; defaults to `warn`. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_test_writer()
        .try_init();
}

pub mod fixtures {
    use super::*;

    pub fn row(key: &str) -> ChildSpec {
        ChildSpec::element("row", Some(key), Props::new())
    }

    pub fn element(ty: &str, key: Option<&str>, props: Props) -> ChildSpec {
        ChildSpec::element(ty, key, props)
    }

    pub fn coroutine(handler: &str, key: Option<&str>) -> ChildSpec {
        let spec = CoroutineSpec::new(handler);
        match key {
            Some(key) => spec.keyed(key).into(),
            None => spec.into(),
        }
    }

    pub fn yield_to(continuation: &str, key: Option<&str>) -> ChildSpec {
        let spec = YieldSpec::new(continuation);
        match key {
            Some(key) => spec.keyed(key).into(),
            None => spec.into(),
        }
    }

    /// A parentless element fiber in any store.
    pub fn root<S: FiberStore>(store: &mut S) -> FiberId {
        store.insert(Fiber::from_element(
            &ElementSpec::new("root"),
            PriorityLevel::Synchronous,
        ))
    }

    /// Make `head` the committed child chain of `parent`.
    pub fn commit<S: FiberStore>(store: &mut S, parent: FiberId, head: Option<FiberId>) {
        if let Some(fiber) = store.fiber_mut(parent) {
            fiber.child = head;
        }
    }

    /// Collect a sibling chain. Panics if it does not end within `limit` steps.
    pub fn chain<S: FiberStore>(store: &S, head: Option<FiberId>) -> Vec<FiberId> {
        const LIMIT: usize = 10_000;
        let mut out = Vec::new();
        let mut current = head;
        while let Some(id) = current {
            assert!(out.len() < LIMIT, "sibling chain does not terminate");
            out.push(id);
            current = store.fiber(id).and_then(|f| f.sibling);
        }
        out
    }
}

/// Wraps a store and counts calls to the creation and cloning hooks.
#[derive(Debug, Default)]
pub struct CountingStore<S> {
    pub inner: S,
    creates: Cell<usize>,
    clones: Cell<usize>,
}

impl<S> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            creates: Cell::new(0),
            clones: Cell::new(0),
        }
    }

    pub fn creates(&self) -> usize {
        self.creates.get()
    }

    pub fn clones(&self) -> usize {
        self.clones.get()
    }

    pub fn reset_counts(&self) {
        self.creates.set(0);
        self.clones.set(0);
    }
}

impl<S: FiberStore> FiberStore for CountingStore<S> {
    fn insert(&mut self, fiber: Fiber) -> FiberId {
        self.inner.insert(fiber)
    }

    fn remove(&mut self, id: FiberId) -> Option<Fiber> {
        self.inner.remove(id)
    }

    fn fiber(&self, id: FiberId) -> Option<&Fiber> {
        self.inner.fiber(id)
    }

    fn fiber_mut(&mut self, id: FiberId) -> Option<&mut Fiber> {
        self.inner.fiber_mut(id)
    }

    fn create_fiber_from_element(&mut self, spec: &ElementSpec, priority: PriorityLevel) -> FiberId {
        self.creates.set(self.creates.get() + 1);
        self.inner.create_fiber_from_element(spec, priority)
    }

    fn create_fiber_from_coroutine(
        &mut self,
        spec: &CoroutineSpec,
        priority: PriorityLevel,
    ) -> FiberId {
        self.creates.set(self.creates.get() + 1);
        self.inner.create_fiber_from_coroutine(spec, priority)
    }

    fn create_fiber_from_yield(&mut self, spec: &YieldSpec, priority: PriorityLevel) -> FiberId {
        self.creates.set(self.creates.get() + 1);
        self.inner.create_fiber_from_yield(spec, priority)
    }

    fn clone_fiber(&mut self, prior: FiberId, priority: PriorityLevel) -> Option<FiberId> {
        self.clones.set(self.clones.get() + 1);
        self.inner.clone_fiber(prior, priority)
    }
}

/// How a [`FaultyStore`] fails a clone request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CloneFault {
    /// `clone_fiber` returns `None` without allocating anything.
    Refuse,
    /// `clone_fiber` allocates the clone, but `fiber_mut` cannot reach it.
    Unwritable,
}

/// Wraps a store and makes every `clone_fiber` call fail in the given way.
#[derive(Debug)]
pub struct FaultyStore<S> {
    pub inner: S,
    fault: CloneFault,
    unwritable: Vec<FiberId>,
    removed: usize,
}

impl<S> FaultyStore<S> {
    pub fn new(inner: S, fault: CloneFault) -> Self {
        Self {
            inner,
            fault,
            unwritable: Vec::new(),
            removed: 0,
        }
    }

    /// Number of fibers taken back out through `remove`.
    pub fn removed(&self) -> usize {
        self.removed
    }
}

impl<S: FiberStore> FiberStore for FaultyStore<S> {
    fn insert(&mut self, fiber: Fiber) -> FiberId {
        self.inner.insert(fiber)
    }

    fn remove(&mut self, id: FiberId) -> Option<Fiber> {
        let fiber = self.inner.remove(id)?;
        self.unwritable.retain(|&u| u != id);
        self.removed += 1;
        Some(fiber)
    }

    fn fiber(&self, id: FiberId) -> Option<&Fiber> {
        self.inner.fiber(id)
    }

    fn fiber_mut(&mut self, id: FiberId) -> Option<&mut Fiber> {
        if self.unwritable.contains(&id) {
            return None;
        }
        self.inner.fiber_mut(id)
    }

    fn clone_fiber(&mut self, prior: FiberId, priority: PriorityLevel) -> Option<FiberId> {
        match self.fault {
            CloneFault::Refuse => None,
            CloneFault::Unwritable => {
                let id = self.inner.clone_fiber(prior, priority)?;
                self.unwritable.push(id);
                Some(id)
            }
        }
    }
}

pub mod conformance {
    use fiberweave_core::{reconcile_child_fibers, FiberKind, RecordingSink};

    use super::fixtures::{chain, commit, coroutine, root, row, yield_to};
    use super::*;

    /// Reconcile `spec` under `parent` against its committed children and
    /// commit the result.
    fn pass<S: FiberStore>(
        store: &mut S,
        sink: &mut RecordingSink,
        parent: FiberId,
        spec: &ChildSpec,
    ) -> Vec<FiberId> {
        let prior = store.fiber(parent).and_then(|f| f.child);
        let head = reconcile_child_fibers(store, sink, parent, prior, spec, PriorityLevel::High);
        commit(store, parent, head);
        chain(&*store, head)
    }

    pub fn clones_matching_element<S: FiberStore + Default>() {
        let mut store = S::default();
        let mut sink = RecordingSink::new();
        let parent = root(&mut store);
        let first = pass(&mut store, &mut sink, parent, &row("a"));
        let prior = first[0];

        let props = Props::new().with("x", 1);
        let second = pass(
            &mut store,
            &mut sink,
            parent,
            &ChildSpec::element("row", Some("a"), props.clone()),
        );

        assert_eq!(second.len(), 1);
        let clone = store.fiber(second[0]).expect("clone is live");
        assert_ne!(second[0], prior);
        assert_eq!(clone.alternate, Some(prior));
        assert_eq!(clone.pending_props, props);
        assert_eq!(clone.return_fiber, Some(parent));
        assert_eq!(clone.priority, PriorityLevel::High);
    }

    pub fn mismatch_creates<S: FiberStore + Default>() {
        let mut store = S::default();
        let mut sink = RecordingSink::new();
        let parent = root(&mut store);
        let prior = pass(&mut store, &mut sink, parent, &row("a"))[0];
        let prior_before = store.fiber(prior).cloned();

        let next = pass(&mut store, &mut sink, parent, &row("b"));
        assert_eq!(next.len(), 1);
        assert_eq!(store.fiber(next[0]).and_then(|f| f.alternate), None);
        assert!(!next.contains(&prior));
        assert_eq!(store.fiber(prior).cloned(), prior_before);
    }

    pub fn positional_list<S: FiberStore + Default>() {
        let mut store = S::default();
        let mut sink = RecordingSink::new();
        let parent = root(&mut store);
        let spec = ChildSpec::list([row("a"), row("b"), row("c")]);
        let prior = pass(&mut store, &mut sink, parent, &spec);
        let next = pass(&mut store, &mut sink, parent, &spec);

        assert_eq!(next.len(), 3);
        for (new, old) in next.iter().zip(&prior) {
            let fiber = store.fiber(*new).expect("live");
            assert_eq!(fiber.alternate, Some(*old));
            assert_eq!(fiber.return_fiber, Some(parent));
        }
    }

    pub fn shrink_and_grow<S: FiberStore + Default>() {
        let mut store = S::default();
        let mut sink = RecordingSink::new();
        let parent = root(&mut store);
        let grown = pass(
            &mut store,
            &mut sink,
            parent,
            &ChildSpec::list([row("a"), row("b"), row("c")]),
        );
        assert_eq!(grown.len(), 3);
        for id in &grown {
            assert_eq!(store.fiber(*id).and_then(|f| f.alternate), None);
        }

        let shrunk = pass(&mut store, &mut sink, parent, &ChildSpec::list([row("a")]));
        assert_eq!(shrunk.len(), 1);
        assert_eq!(
            store.fiber(shrunk[0]).and_then(|f| f.alternate),
            Some(grown[0])
        );
        assert_eq!(store.fiber(shrunk[0]).and_then(|f| f.sibling), None);
    }

    pub fn unrecognized_items_are_skipped<S: FiberStore + Default>() {
        let mut store = S::default();
        let mut sink = RecordingSink::new();
        let parent = root(&mut store);

        let none = pass(&mut store, &mut sink, parent, &ChildSpec::Bool(true));
        assert!(none.is_empty());
        assert_eq!(sink.unrecognized().count(), 1);

        sink.clear();
        let spec = ChildSpec::list([row("a"), ChildSpec::Number(3.0), row("b")]);
        let placed = pass(&mut store, &mut sink, parent, &spec);
        assert_eq!(placed.len(), 2);
        assert_eq!(sink.unrecognized().count(), 1);
    }

    pub fn coroutines_and_yields_are_recreated<S: FiberStore + Default>() {
        let mut store = S::default();
        let mut sink = RecordingSink::new();
        let parent = root(&mut store);
        let spec = ChildSpec::list([coroutine("h", Some("c")), yield_to("k", Some("y"))]);
        pass(&mut store, &mut sink, parent, &spec);
        let next = pass(&mut store, &mut sink, parent, &spec);

        assert_eq!(next.len(), 2);
        let kinds: Vec<FiberKind> = next
            .iter()
            .filter_map(|id| store.fiber(*id).map(|f| f.kind))
            .collect();
        assert_eq!(kinds, [FiberKind::Coroutine, FiberKind::Continuation]);
        for id in &next {
            assert_eq!(store.fiber(*id).and_then(|f| f.alternate), None);
        }
        assert!(store
            .fiber(next[1])
            .and_then(|f| f.reified_yield())
            .is_some());
    }

    pub fn run_all<S: FiberStore + Default>() {
        clones_matching_element::<S>();
        mismatch_creates::<S>();
        positional_list::<S>();
        shrink_and_grow::<S>();
        unrecognized_items_are_skipped::<S>();
        coroutines_and_yields_are_recreated::<S>();
    }
}
