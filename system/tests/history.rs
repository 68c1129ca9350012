use system::DocumentRegistry;

#[test]
fn it_starts_with_a_single_empty_version() {
    let mut registry = DocumentRegistry::new();
    let id = registry.create();
    let document = registry.get(&id).expect("must exist");

    assert_eq!(document.version_count(), 1);
    assert_eq!(document.cursor(), 0);
    assert_eq!(document.current().content, "");
    assert_eq!(document.current().index, 0);
}

#[test]
fn it_keeps_cursor_at_newest_version_while_appending() {
    let mut registry = DocumentRegistry::new();
    let id = registry.create();
    let document = registry.get_mut(&id).expect("must exist");

    for (i, content) in ["a", "ab", "abc"].iter().enumerate() {
        document.append(content.to_string());
        assert_eq!(document.cursor(), i + 1);
        assert_eq!(document.cursor(), document.version_count() - 1);
    }
}

#[test]
fn it_round_trips_undo_then_redo() {
    let mut registry = DocumentRegistry::new();
    let id = registry.create();
    let document = registry.get_mut(&id).expect("must exist");

    document.append("hello".into());
    let before = document.current().clone();

    document.undo().expect("must step back");
    assert_eq!(document.current().content, "");

    let restored = document.redo().expect("must step forward");
    assert_eq!(*restored, before);
}

#[test]
fn it_signals_no_op_at_history_boundaries() {
    let mut registry = DocumentRegistry::new();
    let id = registry.create();
    let document = registry.get_mut(&id).expect("must exist");

    assert!(document.undo().is_none());
    assert!(document.redo().is_none());

    document.append("hello".into());
    assert!(document.redo().is_none());
    assert_eq!(document.cursor(), 1);
}

#[test]
fn it_truncates_redo_history_on_append_after_undo() {
    let mut registry = DocumentRegistry::new();
    let id = registry.create();
    let document = registry.get_mut(&id).expect("must exist");

    // [v0, v1, v2, v3], then undo twice so the cursor sits at v1.
    document.append("v1".into());
    document.append("v2".into());
    document.append("v3".into());
    document.undo();
    document.undo();
    assert_eq!(document.cursor(), 1);

    let appended = document.append("v4".into());
    assert_eq!(appended.index, 2);
    assert_eq!(document.version_count(), 3);
    assert_eq!(document.cursor(), 2);
    assert_eq!(document.current().content, "v4");

    // v2 and v3 are gone; redo has nothing left to restore.
    assert!(document.redo().is_none());
}

#[test]
fn it_jumps_without_mutating_history() {
    let mut registry = DocumentRegistry::new();
    let id = registry.create();
    let document = registry.get_mut(&id).expect("must exist");

    document.append("v1".into());
    document.append("v2".into());
    let versions_before = document.snapshot().versions;

    let version = document.jump(0).expect("in bounds");
    assert_eq!(version.content, "");
    assert_eq!(document.cursor(), 0);
    assert_eq!(document.snapshot().versions, versions_before);

    // Jump never truncates, so the newest version is still reachable.
    let version = document.jump(2).expect("in bounds");
    assert_eq!(version.content, "v2");
}

#[test]
fn it_rejects_out_of_range_jump_and_keeps_cursor() {
    let mut registry = DocumentRegistry::new();
    let id = registry.create();
    let document = registry.get_mut(&id).expect("must exist");

    document.append("v1".into());
    assert!(document.jump(2).is_none());
    assert_eq!(document.cursor(), 1);
    assert_eq!(document.version_count(), 2);
}

#[test]
fn it_lists_documents_in_insertion_order() {
    let mut registry = DocumentRegistry::new();
    let first = registry.create();
    let second = registry.create();
    let third = registry.create();

    let ids: Vec<_> = registry.list().iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![first, second, third]);

    registry.delete(&second).expect("must exist");
    let ids: Vec<_> = registry.list().iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![first, third]);
}

#[test]
fn it_deletes_documents_with_their_versions() {
    let mut registry = DocumentRegistry::new();
    let id = registry.create();
    registry.get_mut(&id).expect("must exist").append("v1".into());

    assert!(registry.delete(&id).is_some());
    assert!(registry.get(&id).is_none());
    assert!(registry.delete(&id).is_none());
}
