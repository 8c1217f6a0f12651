//! Structural move, promote/demote and collapse scenarios

use tabtree_core::{MoveTarget, TreeError, TreeModel};

use super::{open_child, open_root};

#[test]
fn step_moves_count_collapsed_groups_as_one_unit() {
    let mut model = TreeModel::new();
    let p = open_root(&mut model, "p");
    let _b = open_child(&mut model, p, "b");
    let _c = open_child(&mut model, p, "c");
    let d = open_root(&mut model, "d");
    model.set_collapsed(p, true).unwrap();
    assert_eq!(model.visible_order(), &[p, d]);

    // One step up jumps the whole hidden group.
    model.move_tab(d, MoveTarget::Relative(-1)).unwrap();
    assert_eq!(model.roots(), &[d, p]);
    assert_eq!(model.visible_order(), &[d, p]);
}

#[test]
fn moving_down_out_of_a_group_leaves_it() {
    let mut model = TreeModel::new();
    let p = open_root(&mut model, "p");
    let b = open_child(&mut model, p, "b");
    let q = open_root(&mut model, "q");
    assert_eq!(model.visible_order(), &[p, b, q]);

    // b steps past q, which has no children, so it lands beside it.
    model.move_tab(b, MoveTarget::Relative(1)).unwrap();
    assert_eq!(model.get(b).unwrap().parent(), None);
    assert_eq!(model.roots(), &[p, q, b]);
}

#[test]
fn moving_up_before_a_nested_tab_joins_its_parent() {
    let mut model = TreeModel::new();
    let p = open_root(&mut model, "p");
    let b = open_child(&mut model, p, "b");
    let q = open_root(&mut model, "q");

    // q moves to visible index 1, displacing b, and so becomes a child
    // of b's parent.
    model.move_tab(q, MoveTarget::Absolute(1)).unwrap();
    assert_eq!(model.get(q).unwrap().parent(), Some(p));
    assert_eq!(model.get(p).unwrap().children(), &[q, b]);
}

#[test]
fn absolute_move_to_end_appends_at_top_level() {
    let mut model = TreeModel::new();
    let a = open_root(&mut model, "a");
    let b = open_root(&mut model, "b");
    let c = open_root(&mut model, "c");

    model.move_tab(a, MoveTarget::Absolute(2)).unwrap();
    assert_eq!(model.roots(), &[b, c, a]);
}

#[test]
fn promote_carries_the_subtree_along() {
    let mut model = TreeModel::new();
    let p = open_root(&mut model, "p");
    let b = open_child(&mut model, p, "b");
    let c = open_child(&mut model, b, "c");

    model.move_tab(b, MoveTarget::Promote).unwrap();

    assert_eq!(model.roots(), &[p, b]);
    assert_eq!(model.get(c).unwrap().parent(), Some(b));
    assert_eq!(model.visible_order(), &[p, b, c]);
}

#[test]
fn promote_from_deep_nesting_goes_one_level_at_a_time() {
    let mut model = TreeModel::new();
    let a = open_root(&mut model, "a");
    let b = open_child(&mut model, a, "b");
    let c = open_child(&mut model, b, "c");

    model.move_tab(c, MoveTarget::Promote).unwrap();
    assert_eq!(model.get(c).unwrap().parent(), Some(a));
    assert_eq!(model.get(a).unwrap().children(), &[b, c]);

    model.move_tab(c, MoveTarget::Promote).unwrap();
    assert_eq!(model.get(c).unwrap().parent(), None);
    assert_eq!(model.roots(), &[a, c]);
}

#[test]
fn demote_nests_under_the_previous_sibling() {
    let mut model = TreeModel::new();
    let p = open_root(&mut model, "p");
    let b = open_child(&mut model, p, "b");
    let c = open_child(&mut model, p, "c");

    model.move_tab(c, MoveTarget::Demote).unwrap();
    assert_eq!(model.get(c).unwrap().parent(), Some(b));
    assert_eq!(model.get(p).unwrap().children(), &[b]);
}

#[test]
fn demote_appends_after_existing_children() {
    let mut model = TreeModel::new();
    let a = open_root(&mut model, "a");
    let existing = open_child(&mut model, a, "existing");
    let b = open_root(&mut model, "b");

    model.move_tab(b, MoveTarget::Demote).unwrap();
    assert_eq!(model.get(a).unwrap().children(), &[existing, b]);
}

#[test]
fn promote_then_demote_round_trips() {
    let mut model = TreeModel::new();
    let p = open_root(&mut model, "p");
    let b = open_child(&mut model, p, "b");

    model.move_tab(b, MoveTarget::Promote).unwrap();
    model.move_tab(b, MoveTarget::Demote).unwrap();
    assert_eq!(model.get(b).unwrap().parent(), Some(p));
    assert!(model.check_invariants().is_ok());
}

#[test]
fn failed_moves_leave_the_tree_untouched() {
    let mut model = TreeModel::new();
    let p = open_root(&mut model, "p");
    let b = open_child(&mut model, p, "b");
    let before = model.visible_order().to_vec();

    assert!(matches!(
        model.move_tab(p, MoveTarget::Promote),
        Err(TreeError::CannotPromoteRoot(_))
    ));
    assert!(matches!(
        model.move_tab(b, MoveTarget::Relative(10)),
        Err(TreeError::MoveOutOfRange { .. })
    ));
    assert!(matches!(
        model.move_tab(b, MoveTarget::Relative(0)),
        Err(TreeError::MoveWouldNotChange(_))
    ));
    assert_eq!(model.visible_order(), before);
    assert!(model.check_invariants().is_ok());
}

#[test]
fn gutter_prefixes_follow_structure_changes() {
    let mut model = TreeModel::new();
    let p = open_root(&mut model, "p");
    let b = open_child(&mut model, p, "b");
    let _c = open_child(&mut model, p, "c");

    let prefixes: Vec<String> = model.rendered().into_iter().map(|r| r.prefix).collect();
    assert_eq!(prefixes, vec!["", "├─", "└─"]);

    model.move_tab(b, MoveTarget::Promote).unwrap();
    let prefixes: Vec<String> = model.rendered().into_iter().map(|r| r.prefix).collect();
    assert_eq!(prefixes, vec!["", "└─", ""]);
}

#[test]
fn collapse_round_trip_preserves_descendants() {
    let mut model = TreeModel::new();
    let p = open_root(&mut model, "p");
    let b = open_child(&mut model, p, "b");
    let c = open_child(&mut model, b, "c");

    model.set_collapsed(p, true).unwrap();
    assert_eq!(model.visible_order(), &[p]);
    assert_eq!(model.len(), 3);

    model.set_collapsed(p, false).unwrap();
    assert_eq!(model.visible_order(), &[p, b, c]);
}

#[test]
fn toggle_collapse_flips_the_flag() {
    let mut model = TreeModel::new();
    let p = open_root(&mut model, "p");
    let _b = open_child(&mut model, p, "b");

    model.toggle_collapse(p).unwrap();
    assert!(model.get(p).unwrap().collapsed());
    model.toggle_collapse(p).unwrap();
    assert!(!model.get(p).unwrap().collapsed());
}
