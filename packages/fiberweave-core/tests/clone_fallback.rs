use fiberweave_core::{
    reconcile_child_fibers, ChildSpec, FiberId, FiberStore, FiberTree, MatchDecision,
    PriorityLevel, PropValue, Props, RecordingSink,
};
use fiberweave_test_support::fixtures::{chain, commit, root, row};
use fiberweave_test_support::{CloneFault, FaultyStore};

fn reconcile(
    store: &mut FaultyStore<FiberTree>,
    sink: &mut RecordingSink,
    parent: FiberId,
    prior: Option<FiberId>,
    spec: &ChildSpec,
) -> Option<FiberId> {
    reconcile_child_fibers(store, sink, parent, prior, spec, PriorityLevel::High)
}

fn failed_clone_creates(fault: CloneFault) {
    let mut store = FaultyStore::new(FiberTree::new(), fault);
    let parent = root(&mut store);
    let mut sink = RecordingSink::new();

    let head = reconcile(&mut store, &mut sink, parent, None, &row("a"));
    commit(&mut store, parent, head);
    let prior = head.unwrap();
    let live = store.inner.len();

    sink.clear();
    let spec = ChildSpec::element("row", Some("a"), Props::new().with("x", 1));
    let head = reconcile(&mut store, &mut sink, parent, Some(prior), &spec);
    let ids = chain(&store, head);

    assert_eq!(ids.len(), 1);
    assert_ne!(ids[0], prior);
    let fiber = store.fiber(ids[0]).unwrap();
    assert_eq!(fiber.alternate, None);
    assert_eq!(fiber.return_fiber, Some(parent));
    assert_eq!(fiber.priority, PriorityLevel::High);
    assert_eq!(fiber.pending_props.get("x"), Some(&PropValue::Int(1)));

    let decisions: Vec<_> = sink.placements().map(|p| p.decision).collect();
    assert_eq!(decisions, [MatchDecision::Create]);

    // Exactly one new fiber is live: nothing is left over from the clone.
    assert_eq!(store.inner.len(), live + 1);
    assert!(store.inner.contains(prior));
}

#[test]
fn refused_clone_falls_back_to_create() {
    failed_clone_creates(CloneFault::Refuse);
}

#[test]
fn unwritable_clone_is_removed_before_creating() {
    failed_clone_creates(CloneFault::Unwritable);
}

#[test]
fn only_unwritable_clones_are_removed() {
    let spec = ChildSpec::list([row("a"), row("b")]);

    for (fault, removed) in [(CloneFault::Refuse, 0), (CloneFault::Unwritable, 2)] {
        let mut store = FaultyStore::new(FiberTree::new(), fault);
        let mut sink = RecordingSink::new();
        let parent = root(&mut store);
        let head = reconcile(&mut store, &mut sink, parent, None, &spec);
        let next = reconcile(&mut store, &mut sink, parent, head, &spec);

        assert_eq!(store.removed(), removed, "{fault:?}");
        assert_eq!(chain(&store, next).len(), 2);
    }
}
