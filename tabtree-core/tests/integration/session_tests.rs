//! Session snapshot and persistence scenarios

use tabtree_core::{
    NewTabPosition, SessionSnapshot, TabSnapshot, TreeModel, TreeSettings,
};

use super::{open_child, open_root};

fn sample_model() -> TreeModel {
    let mut model = TreeModel::new();
    let p = open_root(&mut model, "https://p.example");
    let b = open_child(&mut model, p, "https://b.example");
    let _c = open_child(&mut model, b, "https://c.example");
    let q = open_root(&mut model, "https://q.example");
    model.set_title(p, "parent").unwrap();
    model.set_pinned(q, true).unwrap();
    model.set_collapsed(b, true).unwrap();
    model
}

#[test]
fn snapshot_mirrors_the_forest() {
    let model = sample_model();
    let snapshot = model.snapshot();

    assert_eq!(snapshot.count(), 4);
    assert_eq!(snapshot.tabs.len(), 2);
    assert_eq!(snapshot.tabs[0].url, "https://p.example");
    assert_eq!(snapshot.tabs[0].title, "parent");
    assert!(snapshot.tabs[0].children[0].collapsed);
    assert!(snapshot.tabs[1].pinned);
}

#[test]
fn restore_into_fresh_model_matches_snapshot() {
    let model = sample_model();
    let snapshot = model.snapshot();

    let mut restored = TreeModel::new();
    restored.restore(&snapshot);

    assert_eq!(restored.snapshot(), snapshot);
    assert_eq!(restored.len(), 4);
    // Collapse survives the round trip, so the hidden child stays hidden.
    assert_eq!(restored.visible_order().len(), 3);
    assert!(restored.check_invariants().is_ok());
}

#[test]
fn restore_clears_undo_and_focuses_first_tab() {
    let mut model = sample_model();
    let extra = open_root(&mut model, "https://extra.example");
    model.close(extra, false, true).unwrap();
    assert_eq!(model.undo_depth(), 1);

    let snapshot = sample_model().snapshot();
    model.restore(&snapshot);

    assert_eq!(model.undo_depth(), 0);
    let first = model.roots()[0];
    assert_eq!(model.focused(), Some(first));
}

#[test]
fn file_round_trip_preserves_the_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let model = sample_model();
    model.snapshot().save(&path).unwrap();

    let loaded = SessionSnapshot::load(&path).unwrap();
    let mut restored = TreeModel::new();
    restored.restore(&loaded);
    assert_eq!(restored.snapshot(), model.snapshot());
}

#[test]
fn handles_are_not_persisted() {
    let model = sample_model();
    let text = model.snapshot().to_json().unwrap();
    for &id in model.roots() {
        assert!(!text.contains(&id.0.to_string()));
    }
}

#[test]
fn snapshot_built_by_hand_restores() {
    let snapshot = SessionSnapshot::new(vec![TabSnapshot {
        url: "https://a.example".into(),
        title: "A".into(),
        collapsed: false,
        pinned: true,
        children: vec![TabSnapshot::from_url("https://a.example/sub")],
    }]);

    let mut model = TreeModel::new();
    model.restore(&snapshot);

    let root = model.roots()[0];
    assert!(model.get(root).unwrap().pinned());
    assert_eq!(model.get(root).unwrap().children().len(), 1);
    assert_eq!(model.snapshot(), snapshot);
}

#[test]
fn settings_file_round_trip_controls_placement() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");

    let settings = TreeSettings {
        new_toplevel_position: NewTabPosition::First,
        ..TreeSettings::default()
    };
    settings.save(&path).unwrap();

    let mut model = TreeModel::with_settings(TreeSettings::load(&path).unwrap());
    let a = open_root(&mut model, "a");
    let b = open_root(&mut model, "b");
    // New top-level tabs go first under the loaded policy.
    assert_eq!(model.roots(), &[b, a]);
}
