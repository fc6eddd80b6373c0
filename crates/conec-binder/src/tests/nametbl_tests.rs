use super::*;

#[test]
fn inner_binding_shadows_then_restores() {
    let mut table = NameTable::new();
    let x = Atom(1);

    table.push_frame();
    table.hook(x, NodeId(10));
    assert_eq!(table.lookup(x), Some(NodeId(10)));

    table.push_frame();
    table.hook(x, NodeId(20));
    assert_eq!(table.lookup(x), Some(NodeId(20)));

    table.pop_frame();
    assert_eq!(table.lookup(x), Some(NodeId(10)));

    table.pop_frame();
    assert_eq!(table.lookup(x), None);
    assert!(table.is_balanced());
}

#[test]
fn pop_frame_unhooks_only_its_own_bindings() {
    let mut table = NameTable::new();
    let (x, y) = (Atom(1), Atom(2));

    table.push_frame();
    table.hook(x, NodeId(10));
    table.push_frame();
    table.hook(y, NodeId(20));
    table.pop_frame();

    assert_eq!(table.lookup(x), Some(NodeId(10)));
    assert_eq!(table.lookup(y), None);
    table.pop_frame();
    assert!(table.is_balanced());
}

#[test]
fn lookup_on_empty_table_misses() {
    let table = NameTable::new();
    assert_eq!(table.lookup(Atom(9)), None);
}

#[test]
fn frame_depth_tracks_open_scopes() {
    let mut table = NameTable::new();
    assert_eq!(table.frame_depth(), 0);
    table.push_frame();
    table.push_frame();
    assert_eq!(table.frame_depth(), 2);
    table.pop_frame();
    assert_eq!(table.frame_depth(), 1);
    table.pop_frame();
    assert!(table.is_balanced());
}
