//! Pure operations on the nav tree. Nothing here touches signals or the network.

pub(crate) mod drag;

use crate::models::{NavId, NavNode};

/// Move the sibling at `from` to `to`, returning a fresh list.
///
/// Only reorders within `items`; a node never changes parent here.
/// Out-of-range indices give back an unchanged copy.
pub(crate) fn move_item(items: &[NavNode], from: usize, to: usize) -> Vec<NavNode> {
    let mut next = items.to_vec();
    if from == to || from >= next.len() || to >= next.len() {
        return next;
    }
    let moved = next.remove(from);
    next.insert(to, moved);
    next
}

/// Stable sort by `order`, treating a missing order as 0. Top level only.
pub(crate) fn sort_by_order(mut items: Vec<NavNode>) -> Vec<NavNode> {
    items.sort_by_key(NavNode::order_key);
    items
}

/// Copy of `items` with each node's `order` set to its index. Children are
/// passed through untouched.
pub(crate) fn stamp_order(items: &[NavNode]) -> Vec<NavNode> {
    items
        .iter()
        .enumerate()
        .map(|(i, n)| NavNode {
            order: Some(i as i64),
            ..n.clone()
        })
        .collect()
}

/// Nodes to show for a sibling list. Hidden nodes drop out in view mode only.
pub(crate) fn displayed(items: &[NavNode], editing: bool) -> Vec<&NavNode> {
    items.iter().filter(|n| editing || n.is_visible()).collect()
}

pub(crate) fn find_node<'a>(items: &'a [NavNode], id: &NavId) -> Option<&'a NavNode> {
    for n in items {
        if &n.id == id {
            return Some(n);
        }
        if let Some(found) = find_node(&n.children, id) {
            return Some(found);
        }
    }
    None
}

pub(crate) fn find_node_mut<'a>(items: &'a mut [NavNode], id: &NavId) -> Option<&'a mut NavNode> {
    for n in items.iter_mut() {
        if &n.id == id {
            return Some(n);
        }
        if let Some(found) = find_node_mut(&mut n.children, id) {
            return Some(found);
        }
    }
    None
}

/// Sibling list owned by `parent`, or the top level for `None`.
pub(crate) fn siblings_mut<'a>(
    tree: &'a mut Vec<NavNode>,
    parent: Option<&NavId>,
) -> Option<&'a mut Vec<NavNode>> {
    match parent {
        None => Some(tree),
        Some(id) => find_node_mut(tree, id).map(|n| &mut n.children),
    }
}

/// Rename one node. Descendants keep their titles.
pub(crate) fn update_title(tree: &mut [NavNode], id: &NavId, title: &str) -> bool {
    match find_node_mut(tree, id) {
        Some(n) => {
            n.title = title.to_string();
            true
        }
        None => false,
    }
}

pub(crate) fn update_visibility(tree: &mut [NavNode], id: &NavId, visible: bool) -> bool {
    match find_node_mut(tree, id) {
        Some(n) => {
            n.visible = Some(visible);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn ids(items: &[NavNode]) -> Vec<String> {
        items.iter().map(|n| n.id.to_string()).collect()
    }

    fn titles(items: &[&NavNode]) -> Vec<String> {
        items.iter().map(|n| n.title.clone()).collect()
    }

    fn flat(n: usize) -> Vec<NavNode> {
        (0..n)
            .map(|i| NavNode::new(i as i64, format!("item {i}")))
            .collect()
    }

    fn sample_tree() -> Vec<NavNode> {
        let mut hidden = NavNode::new("b", "Jobs");
        hidden.visible = Some(false);
        vec![
            NavNode::new("a", "Dashboard"),
            hidden,
            NavNode::new("c", "Settings").with_children(vec![
                NavNode::new("c1", "Profile"),
                NavNode::new("c2", "Billing").with_children(vec![NavNode::new("c2a", "Invoices")]),
            ]),
        ]
    }

    #[test]
    fn test_move_item_down_and_up() {
        let items = flat(4);
        assert_eq!(ids(&move_item(&items, 0, 2)), vec!["1", "2", "0", "3"]);
        assert_eq!(ids(&move_item(&items, 3, 1)), vec!["0", "3", "1", "2"]);
        // Input untouched.
        assert_eq!(ids(&items), vec!["0", "1", "2", "3"]);
    }

    #[test]
    fn test_move_item_same_index_is_noop() {
        let items = sample_tree();
        assert_eq!(move_item(&items, 1, 1), items);
    }

    #[test]
    fn test_move_item_out_of_range_is_noop() {
        let items = flat(3);
        assert_eq!(move_item(&items, 0, 3), items);
        assert_eq!(move_item(&items, 5, 0), items);
        assert!(move_item(&[], 0, 0).is_empty());
    }

    proptest! {
        #[test]
        fn prop_move_item_is_a_single_relocation(
            (len, from, to) in (1usize..12).prop_flat_map(|len| (Just(len), 0..len, 0..len))
        ) {
            let items = flat(len);
            let moved = move_item(&items, from, to);

            prop_assert_eq!(moved.len(), len);
            prop_assert_eq!(&moved[to].id, &items[from].id);

            let mut sorted = ids(&moved);
            sorted.sort();
            let mut expected = ids(&items);
            expected.sort();
            prop_assert_eq!(sorted, expected);

            let others_before: Vec<_> = items.iter().filter(|n| n.id != items[from].id).map(|n| n.id.clone()).collect();
            let others_after: Vec<_> = moved.iter().filter(|n| n.id != items[from].id).map(|n| n.id.clone()).collect();
            prop_assert_eq!(others_before, others_after);
        }
    }

    #[test]
    fn test_sort_by_order_missing_is_zero_and_stable() {
        let mut missing = NavNode::new("m", "Missing");
        missing.order = None;
        let items = vec![
            NavNode::new("two", "Two").with_order(2),
            missing,
            NavNode::new("one", "One").with_order(1),
            NavNode::new("zero", "Zero").with_order(0),
        ];
        // "m" and "zero" tie at 0; original position breaks the tie.
        assert_eq!(ids(&sort_by_order(items)), vec!["m", "zero", "one", "two"]);
    }

    #[test]
    fn test_sort_by_order_is_top_level_only() {
        let items = vec![NavNode::new("p", "Parent").with_children(vec![
            NavNode::new("x", "X").with_order(1),
            NavNode::new("y", "Y").with_order(0),
        ])];
        let sorted = sort_by_order(items);
        assert_eq!(ids(&sorted[0].children), vec!["x", "y"]);
    }

    #[test]
    fn test_stamp_order_is_contiguous_top_level() {
        let items = vec![
            NavNode::new("a", "A").with_order(9),
            NavNode::new("b", "B"),
            NavNode::new("c", "C")
                .with_order(-4)
                .with_children(vec![NavNode::new("c1", "C1").with_order(5)]),
        ];
        let stamped = stamp_order(&items);
        let orders: Vec<_> = stamped.iter().map(|n| n.order).collect();
        assert_eq!(orders, vec![Some(0), Some(1), Some(2)]);
        assert_eq!(stamped[2].children[0].order, Some(5));
    }

    #[test]
    fn test_displayed_filters_hidden_only_in_view_mode() {
        let tree = sample_tree();
        assert_eq!(titles(&displayed(&tree, false)), vec!["Dashboard", "Settings"]);
        assert_eq!(
            titles(&displayed(&tree, true)),
            vec!["Dashboard", "Jobs", "Settings"]
        );
    }

    #[test]
    fn test_displayed_applies_at_every_level() {
        let mut tree = sample_tree();
        assert!(update_visibility(&mut tree, &"c2a".into(), false));
        let billing = find_node(&tree, &"c2".into()).unwrap();
        assert!(displayed(&billing.children, false).is_empty());
        assert_eq!(displayed(&billing.children, true).len(), 1);
    }

    #[test]
    fn test_update_title_touches_only_target() {
        let mut tree = sample_tree();
        let before = tree.clone();
        assert!(update_title(&mut tree, &"c2".into(), "X"));

        assert_eq!(find_node(&tree, &"c2".into()).unwrap().title, "X");
        assert_eq!(find_node(&tree, &"c2a".into()).unwrap().title, "Invoices");
        assert_eq!(find_node(&tree, &"c1".into()).unwrap().title, "Profile");
        assert_eq!(tree[0], before[0]);
        assert_eq!(tree[1], before[1]);
    }

    #[test]
    fn test_update_unknown_id_reports_false() {
        let mut tree = sample_tree();
        assert!(!update_title(&mut tree, &"nope".into(), "X"));
        assert!(!update_visibility(&mut tree, &NavId::Num(1), true));
        assert_eq!(tree, sample_tree());
    }

    #[test]
    fn test_siblings_mut_resolves_parent_scope() {
        let mut tree = sample_tree();
        assert_eq!(siblings_mut(&mut tree, None).map(|s| s.len()), Some(3));
        assert_eq!(
            siblings_mut(&mut tree, Some(&"c".into())).map(|s| ids(s)),
            Some(vec!["c1".to_string(), "c2".to_string()])
        );
        assert!(siblings_mut(&mut tree, Some(&"zzz".into())).is_none());
    }
}
