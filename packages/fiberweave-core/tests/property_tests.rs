use fiberweave_core::{
    reconcile_child_fibers, ChildSpec, FiberId, FiberTree, NoopSink, PriorityLevel, Props,
};
use fiberweave_test_support::fixtures::chain;
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Item {
    Element(&'static str, Option<&'static str>),
    Skipped,
}

fn item() -> impl Strategy<Value = Item> {
    let types = prop::sample::select(vec!["row", "cell"]);
    let keys = prop::sample::select(vec![None, Some("a"), Some("b")]);
    prop_oneof![
        4 => (types, keys).prop_map(|(ty, key)| Item::Element(ty, key)),
        1 => Just(Item::Skipped),
    ]
}

fn to_spec(items: &[Item]) -> ChildSpec {
    ChildSpec::list(items.iter().map(|item| match item {
        Item::Element(ty, key) => ChildSpec::element(*ty, *key, Props::new()),
        Item::Skipped => ChildSpec::Bool(true),
    }))
}

/// Which prior position each placed item should clone, if any.
///
/// The candidate moves one prior sibling per item, but only once the new
/// chain has a tail.
fn expected_alternates(
    prior: &[(&'static str, Option<&'static str>)],
    items: &[Item],
) -> Vec<Option<usize>> {
    let mut out = Vec::new();
    let mut candidate = 0;
    let mut has_tail = false;
    for item in items {
        if let Item::Element(ty, key) = item {
            let reused = prior
                .get(candidate)
                .filter(|(pty, pkey)| pty == ty && pkey == key)
                .map(|_| candidate);
            out.push(reused);
            has_tail = true;
        }
        if has_tail && candidate < prior.len() {
            candidate += 1;
        }
    }
    out
}

proptest! {
    #[test]
    fn positional_matching_follows_the_candidate_walk(
        prior in prop::collection::vec(
            (prop::sample::select(vec!["row", "cell"]), prop::sample::select(vec![None, Some("a"), Some("b")])),
            0..6,
        ),
        next in prop::collection::vec(item(), 0..8),
    ) {
        let mut tree = FiberTree::new();
        let root = tree.create_root("root", Props::new(), PriorityLevel::Low);

        let prior_items: Vec<Item> = prior.iter().map(|(ty, key)| Item::Element(*ty, *key)).collect();
        let prior_head = reconcile_child_fibers(
            &mut tree, &mut NoopSink, root, None, &to_spec(&prior_items), PriorityLevel::Low,
        );
        let prior_ids = chain(&tree, prior_head);
        prop_assert_eq!(prior_ids.len(), prior.len());

        let head = reconcile_child_fibers(
            &mut tree, &mut NoopSink, root, prior_head, &to_spec(&next), PriorityLevel::High,
        );
        let ids = chain(&tree, head);
        let expected = expected_alternates(&prior, &next);
        prop_assert_eq!(ids.len(), expected.len());

        let actual: Vec<Option<FiberId>> = ids
            .iter()
            .map(|id| tree.get(*id).unwrap().alternate)
            .collect();
        let wanted: Vec<Option<FiberId>> = expected
            .iter()
            .map(|slot| slot.map(|i| prior_ids[i]))
            .collect();
        prop_assert_eq!(actual, wanted);

        for id in &ids {
            prop_assert!(!prior_ids.contains(id));
            let fiber = tree.get(*id).unwrap();
            prop_assert_eq!(fiber.return_fiber, Some(root));
            prop_assert_eq!(fiber.priority, PriorityLevel::High);
        }
        if head.is_some() {
            tree.validate_chain(root, head).unwrap();
        }
        // The prior generation reads back exactly as it was built.
        prop_assert_eq!(chain(&tree, prior_head), prior_ids);
    }

    #[test]
    fn leading_nested_list_is_cut_after_its_first_fiber(
        items in prop::collection::vec(item(), 0..8),
        split in 0usize..8,
    ) {
        let mut tree = FiberTree::new();
        let root = tree.create_root("root", Props::new(), PriorityLevel::Low);
        let split = split.min(items.len());
        let (left, right) = items.split_at(split);
        let nested = ChildSpec::list([to_spec(left), to_spec(right)]);

        let head = reconcile_child_fibers(
            &mut tree, &mut NoopSink, root, None, &nested, PriorityLevel::Low,
        );
        let placed = chain(&tree, head);

        let identity = |item: &Item| match item {
            Item::Element(ty, key) => Some((ty.to_string(), key.map(str::to_string))),
            Item::Skipped => None,
        };
        let left: Vec<_> = left.iter().filter_map(identity).collect();
        let right: Vec<_> = right.iter().filter_map(identity).collect();
        // A non-empty leading list contributes only its first fiber once the
        // trailing list links anything after it.
        let expected: Vec<_> = if left.is_empty() {
            right
        } else if right.is_empty() {
            left
        } else {
            left.into_iter().take(1).chain(right).collect()
        };

        let actual: Vec<(String, Option<String>)> = placed
            .iter()
            .map(|id| {
                let fiber = tree.get(*id).unwrap();
                (fiber.element_type.to_string(), fiber.key.as_ref().map(|k| k.to_string()))
            })
            .collect();
        prop_assert_eq!(actual, expected);
    }
}
