//! Close and undo scenarios
//!
//! Exercises child promotion on close, pinned-tab confirmation, and the
//! independence of stacked undo records.

use tabtree_core::{CloseOutcome, OpenRelation, TabData, TreeError, TreeModel};

use super::{open_child, open_root};

#[test]
fn closing_middle_of_a_chain_splices_the_child_up() {
    let mut model = TreeModel::new();
    let a = open_root(&mut model, "a");
    let b = open_child(&mut model, a, "b");
    let c = open_child(&mut model, b, "c");

    model.close(b, false, true).unwrap();

    assert_eq!(model.get(c).unwrap().parent(), Some(a));
    assert_eq!(model.get(a).unwrap().children(), &[c]);
    assert!(model.check_invariants().is_ok());
}

#[test]
fn closing_chain_root_promotes_the_chain_and_leaves_neighbors_alone() {
    let mut model = TreeModel::new();
    let a = open_root(&mut model, "a");
    let b = open_child(&mut model, a, "b");
    let c = open_child(&mut model, b, "c");
    let d = open_root(&mut model, "d");
    model.focus(a).unwrap();

    model.close(a, false, true).unwrap();

    assert_eq!(model.roots(), &[b, d]);
    assert_eq!(model.get(b).unwrap().children(), &[c]);
    assert_eq!(model.focused(), Some(b));
}

#[test]
fn closing_chain_root_recursively_leaves_only_neighbors() {
    let mut model = TreeModel::new();
    let a = open_root(&mut model, "a");
    let b = open_child(&mut model, a, "b");
    let _c = open_child(&mut model, b, "c");
    let d = open_root(&mut model, "d");
    model.focus(a).unwrap();

    model.close(a, true, true).unwrap();

    assert_eq!(model.roots(), &[d]);
    assert_eq!(model.len(), 1);
    assert_eq!(model.focused(), Some(d));
}

#[test]
fn closing_parent_of_many_children_keeps_their_order() {
    let mut model = TreeModel::new();
    let p = open_root(&mut model, "p");
    let b = open_child(&mut model, p, "b");
    let c = open_child(&mut model, p, "c");
    let d = open_child(&mut model, p, "d");

    model.close(p, false, true).unwrap();

    // b takes p's place; c and d hang under b in their original order.
    assert_eq!(model.roots(), &[b]);
    assert_eq!(model.get(b).unwrap().children(), &[c, d]);
    assert_eq!(model.visible_order(), &[b, c, d]);
}

#[test]
fn promoted_children_land_after_existing_ones() {
    let mut model = TreeModel::new();
    let p = open_root(&mut model, "p");
    let b = open_child(&mut model, p, "b");
    let own = open_child(&mut model, b, "own");
    let c = open_child(&mut model, p, "c");

    model.close(p, false, true).unwrap();

    assert_eq!(model.get(b).unwrap().children(), &[own, c]);
}

#[test]
fn recursive_close_of_deep_tree_then_undo_rebuilds_it() {
    let mut model = TreeModel::new();
    let keep = open_root(&mut model, "keep");
    let p = open_root(&mut model, "p");
    let b = open_child(&mut model, p, "b");
    let _c = open_child(&mut model, b, "c");
    let _d = open_child(&mut model, p, "d");

    model.close(p, true, true).unwrap();
    assert_eq!(model.len(), 1);

    let restored = model.undo_close().unwrap();
    assert_eq!(model.len(), 5);
    assert_eq!(model.roots(), &[keep, restored]);
    let children = model.get(restored).unwrap().children().to_vec();
    assert_eq!(children.len(), 2);
    assert_eq!(model.get(children[0]).unwrap().data().url, "b");
    assert_eq!(model.get(children[1]).unwrap().data().url, "d");
    assert_eq!(model.get(children[0]).unwrap().children().len(), 1);
    assert!(model.check_invariants().is_ok());
}

#[test]
fn undo_restores_collapse_and_pin_state() {
    let mut model = TreeModel::new();
    let p = open_root(&mut model, "p");
    let _b = open_child(&mut model, p, "b");
    model.set_collapsed(p, true).unwrap();
    model.set_pinned(p, true).unwrap();

    model.close(p, true, true).unwrap();
    let restored = model.undo_close().unwrap();

    assert!(model.get(restored).unwrap().collapsed());
    assert!(model.get(restored).unwrap().pinned());
    // The collapsed group comes back as one visible entry.
    assert_eq!(model.visible_order(), &[restored]);
}

#[test]
fn undoing_two_closes_does_not_reattach_across_records() {
    let mut model = TreeModel::new();
    let p = open_root(&mut model, "p");
    let c = open_child(&mut model, p, "c");

    model.close(c, false, true).unwrap();
    model.close(p, false, true).unwrap();
    assert!(model.is_empty());

    // p is restored first under a fresh handle. c's record still points
    // at the old p, which no longer exists, so c becomes a root.
    let restored = model.undo(2).unwrap();
    let new_p = restored[0];
    let new_c = restored[1];
    assert_eq!(model.get(new_p).unwrap().data().url, "p");
    assert_eq!(model.get(new_c).unwrap().data().url, "c");
    assert!(model.get(new_p).unwrap().children().is_empty());
    assert_eq!(model.get(new_c).unwrap().parent(), None);
    assert_eq!(model.roots().len(), 2);
}

#[test]
fn undo_reattaches_when_original_parent_survived() {
    let mut model = TreeModel::new();
    let p = open_root(&mut model, "p");
    let c = open_child(&mut model, p, "c");

    model.close(c, false, true).unwrap();
    let restored = model.undo_close().unwrap();

    assert_eq!(model.get(restored).unwrap().parent(), Some(p));
    assert_eq!(model.get(p).unwrap().children(), &[restored]);
}

#[test]
fn undo_focuses_the_restored_tab() {
    let mut model = TreeModel::new();
    let a = open_root(&mut model, "a");
    let b = open_root(&mut model, "b");
    model.focus(a).unwrap();
    model.close(b, false, true).unwrap();

    let restored = model.undo_close().unwrap();
    assert_eq!(model.focused(), Some(restored));
}

#[test]
fn close_flow_with_pinned_descendant_confirm_then_force() {
    let mut model = TreeModel::new();
    let p = open_root(&mut model, "p");
    let b = open_child(&mut model, p, "b");
    let c = open_child(&mut model, b, "c");
    model.set_pinned(c, true).unwrap();

    // First attempt reports the pinned tab and changes nothing.
    let outcome = model.close(p, true, false).unwrap();
    assert_eq!(outcome.pinned(), &[c]);
    assert_eq!(model.len(), 3);
    assert_eq!(model.undo_depth(), 0);

    // The confirmed retry goes through.
    let outcome = model.close(p, true, true).unwrap();
    assert!(matches!(outcome, CloseOutcome::Closed { .. }));
    assert!(model.is_empty());
    assert_eq!(model.undo_depth(), 1);
}

#[test]
fn non_recursive_close_ignores_pinned_descendants() {
    let mut model = TreeModel::new();
    let p = open_root(&mut model, "p");
    let b = open_child(&mut model, p, "b");
    model.set_pinned(b, true).unwrap();

    // Only p itself is in scope, and p is not pinned.
    let outcome = model.close(p, false, false).unwrap();
    assert!(outcome.is_closed());
    assert_eq!(model.roots(), &[b]);
}

#[test]
fn closing_collapsed_group_counts_hidden_pinned_tabs() {
    let mut model = TreeModel::new();
    let p = open_root(&mut model, "p");
    let b = open_child(&mut model, p, "b");
    model.set_pinned(b, true).unwrap();
    model.set_collapsed(p, true).unwrap();

    // The collapsed head widens the scope to the whole subtree.
    let outcome = model.close(p, false, false).unwrap();
    assert_eq!(outcome.pinned(), &[b]);
    assert_eq!(model.len(), 2);
}

#[test]
fn undo_depth_tracks_each_close_separately() {
    let mut model = TreeModel::new();
    let p = open_root(&mut model, "p");
    let b = open_child(&mut model, p, "b");
    let c = open_root(&mut model, "c");

    model.close(b, false, true).unwrap();
    model.close(c, false, true).unwrap();
    model.close(p, true, true).unwrap();
    assert_eq!(model.undo_depth(), 3);

    model.undo(1).unwrap();
    assert_eq!(model.undo_depth(), 2);
    model.undo(2).unwrap();
    assert_eq!(model.undo_depth(), 0);
    assert_eq!(model.len(), 3);
    assert!(matches!(model.undo(1), Err(TreeError::NothingToUndo)));
}

#[test]
fn reopening_after_undo_does_not_collide_with_old_handle() {
    let mut model = TreeModel::new();
    let a = open_root(&mut model, "a");
    model.close(a, false, true).unwrap();
    let restored = model.undo_close().unwrap();
    let b = model
        .open(TabData::from_url("b"), OpenRelation::Related, false)
        .unwrap();
    assert_ne!(restored, a);
    assert!(!model.contains(a));
    assert_eq!(model.get(b).unwrap().parent(), Some(restored));
}
