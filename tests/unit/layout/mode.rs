use super::*;
use crate::pedigree::{record::HorseRecord, store::PedigreeRecordStore, tree::AncestryTreeBuilder};

#[test]
fn layout_dispatches_on_mode() {
    let store = PedigreeRecordStore::from_records([HorseRecord::new("A", Some("B"), Some("C"))]);
    let tree = AncestryTreeBuilder::new(&store).build("A", 2).unwrap();
    let dam = tree.dam.as_deref().unwrap();

    let tabular = Layout::new(LayoutMode::Tabular, Generations(2)).unwrap();
    assert_eq!(tabular.mode(), LayoutMode::Tabular);
    match tabular.slot_for(dam).unwrap() {
        Slot::Tabular(s) => assert_eq!((s.row, s.column), (5, 1)),
        other => panic!("unexpected slot {other:?}"),
    }

    let circular = Layout::new(LayoutMode::Circular, Generations(2)).unwrap();
    assert_eq!(circular.mode(), LayoutMode::Circular);
    match circular.slot_for(dam).unwrap() {
        Slot::Circular(s) => assert_eq!((s.ring, s.angle_deg()), (1, Some(270.0))),
        other => panic!("unexpected slot {other:?}"),
    }
}

#[test]
fn mode_reads_as_snake_case() {
    let mode: LayoutMode = serde_json::from_str("\"circular\"").unwrap();
    assert_eq!(mode, LayoutMode::Circular);
    assert_eq!(LayoutMode::default(), LayoutMode::Tabular);
    assert!(Layout::new(LayoutMode::Circular, Generations(63)).is_err());
}
