//! Store and projection behavior end to end through the public API.

use htnview::feed::{decode_line, FeedEvent};
use htnview::store::TreeStore;
use htnview::tree::NodeId;
use htnview::view::{project, status_color};
use ratatui::style::Color;

use crate::fixtures::{envelope_line, leaf, node, tea_plan, visible};

fn decode(line: &str) -> FeedEvent {
    decode_line(line).expect("non-blank line")
}

#[test]
fn test_scenario_a_first_snapshot() {
    let mut store = TreeStore::new();
    let line = r#"{"name":"Root","status":"in-progress","children":[{"name":"Sub1","status":"completed","children":[]}]}"#;
    let FeedEvent::Snapshot(snapshot) = decode(line) else {
        panic!("expected snapshot");
    };
    store.apply_snapshot(snapshot);

    let rows = project(&store);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].label(), "Root (in-progress)");
    assert_eq!(rows[0].toggle, Some(true));
    assert_eq!(rows[1].label(), "Sub1 (completed)");
    assert!(!rows[1].has_toggle());
}

#[test]
fn test_scenario_b_toggle_root_twice() {
    let mut store = TreeStore::new();
    store.apply_snapshot(Some(tea_plan()));
    let before = visible(&store);
    let root = NodeId::from("Make tea");

    store.toggle(&root);
    assert_eq!(visible(&store), vec!["Make tea (in-progress)"]);

    store.toggle(&root);
    assert_eq!(visible(&store), before);
}

#[test]
fn test_scenario_c_unknown_status_is_neutral() {
    let mut store = TreeStore::new();
    let FeedEvent::Snapshot(snapshot) = decode(r#"{"name":"Odd","status":"unknown-value"}"#)
    else {
        panic!("expected snapshot");
    };
    store.apply_snapshot(snapshot);

    let rows = project(&store);
    assert_eq!(rows[0].label(), "Odd (unknown-value)");
    assert_eq!(status_color(&rows[0].status), Color::DarkGray);
}

#[test]
fn test_scenario_d_new_root_discards_old_tree() {
    let mut store = TreeStore::new();
    store.apply_snapshot(Some(tea_plan()));
    let brew = NodeId::from("Make tea/Brew");
    store.toggle(&brew);

    store.apply_snapshot(Some(node(
        "Clean kitchen",
        "pending",
        vec![leaf("Wipe counter", "pending")],
    )));

    assert_eq!(
        visible(&store),
        vec!["Clean kitchen (pending)", "  Wipe counter (pending)"]
    );
    // Stale flag stays in the map with no visible effect.
    assert!(store.expansion().contains(&brew));
    assert!(!store.is_expanded(&brew));
}

#[test]
fn test_replace_not_merge() {
    let mut store = TreeStore::new();
    store.apply_snapshot(Some(tea_plan()));
    store.apply_snapshot(Some(node(
        "Make tea",
        "completed",
        vec![leaf("Serve", "completed")],
    )));

    assert_eq!(
        visible(&store),
        vec!["Make tea (completed)", "  Serve (completed)"]
    );
}

#[test]
fn test_collapse_survives_plan_growth() {
    let mut store = TreeStore::new();
    store.apply_snapshot(Some(tea_plan()));
    store.toggle(&NodeId::from("Make tea/Boil water"));

    // Planner adds a step; the folded subtree stays folded.
    let mut grown = tea_plan();
    grown.children.push(leaf("Wash cup", "pending"));
    store.apply_snapshot(Some(grown));

    assert_eq!(
        visible(&store),
        vec![
            "Make tea (in-progress)",
            "  Boil water (completed)",
            "  Brew (in-progress)",
            "    Add teabag (completed)",
            "    Pour water (pending)",
            "  Serve (pending)",
            "  Wash cup (pending)",
        ]
    );
}

#[test]
fn test_new_root_is_forced_open() {
    let mut store = TreeStore::new();
    store.apply_snapshot(Some(tea_plan()));
    store.toggle(&NodeId::from("Make tea"));
    assert_eq!(project(&store).len(), 1);

    store.apply_snapshot(Some(tea_plan()));
    assert_eq!(project(&store).len(), 8);
}

#[test]
fn test_malformed_line_keeps_last_tree() {
    let mut store = TreeStore::new();
    store.apply_snapshot(Some(tea_plan()));
    let before = visible(&store);

    for line in [r#"{"event":"task_node_update","data":{"status":"failed"}}"#, "{oops"] {
        match decode(line) {
            FeedEvent::Snapshot(s) => store.apply_snapshot(s),
            FeedEvent::Malformed(_) | FeedEvent::Ignored(_) => {}
        }
    }
    assert_eq!(visible(&store), before);
}

#[test]
fn test_null_envelope_clears() {
    let mut store = TreeStore::new();
    store.apply_snapshot(Some(tea_plan()));

    let FeedEvent::Snapshot(snapshot) = decode(&envelope_line(None)) else {
        panic!("expected snapshot");
    };
    store.apply_snapshot(snapshot);
    assert!(store.is_empty());
    assert!(project(&store).is_empty());
}

#[test]
fn test_absent_and_empty_children_render_alike() {
    let mut store = TreeStore::new();
    let FeedEvent::Snapshot(snapshot) = decode(
        r#"{"task_name":"R","status":"pending","children":[
            {"task_name":"a","status":"pending"},
            {"task_name":"b","status":"pending","children":null},
            {"task_name":"c","status":"pending","children":[]}
        ]}"#,
    ) else {
        panic!("expected snapshot");
    };
    store.apply_snapshot(snapshot);

    let rows = project(&store);
    assert_eq!(rows.len(), 4);
    assert!(rows[1..].iter().all(|r| r.toggle.is_none()));
}

#[test]
fn test_envelope_roundtrip_through_codec() {
    let FeedEvent::Snapshot(Some(decoded)) = decode(&envelope_line(Some(&tea_plan()))) else {
        panic!("expected snapshot");
    };
    assert_eq!(decoded, tea_plan());
}
