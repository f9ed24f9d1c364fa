use super::*;
use crate::pedigree::{record::HorseRecord, store::PedigreeRecordStore};

fn chart() -> PedigreeChart {
    let store = PedigreeRecordStore::from_records([
        HorseRecord::new("A", Some("B"), Some("C")).with_sex(Sex::Male),
        HorseRecord::new("B", Some("D"), None),
        HorseRecord::new("C", Some("D"), Some("MISSING")).with_sex(Sex::Female),
        HorseRecord::new("D", None, None).with_name("Dancer"),
    ]);
    PedigreeChart::prepare(&store, "A", 2).unwrap()
}

#[test]
fn plan_covers_every_node_with_its_band() {
    let plan = TablePlan::from_chart(&chart()).unwrap();
    assert_eq!(plan.rows, 4);
    assert_eq!(plan.columns, 3);
    assert_eq!(plan.cells.len(), chart().tree.node_count());

    let root = &plan.cells[0];
    assert_eq!((root.first_row, root.last_row, root.column), (0, 3, 0));

    let dam = plan.cell_starting_at(2, 1).unwrap();
    assert_eq!(dam.text, "C");
    assert_eq!(dam.fill, CellFill::Female);
    assert_eq!(dam.last_row, 3);
}

#[test]
fn repeated_ancestor_cells_are_flagged() {
    let plan = TablePlan::from_chart(&chart()).unwrap();
    let flagged: Vec<_> = plan
        .cells
        .iter()
        .filter(|c| c.inbred)
        .map(|c| (c.first_row, c.text.as_str()))
        .collect();
    assert_eq!(flagged, vec![(0, "Dancer (D)"), (2, "Dancer (D)")]);
}

#[test]
fn fills_follow_sex_then_parent_side() {
    let plan = TablePlan::from_chart(&chart()).unwrap();
    assert_eq!(plan.cells[0].fill, CellFill::Male);
    // B has no recorded sex but sits in a sire slot.
    assert_eq!(plan.cell_starting_at(0, 1).unwrap().fill, CellFill::Male);
    let missing = plan.cell_starting_at(3, 2).unwrap();
    assert_eq!(missing.fill, CellFill::Unknown);
    assert_eq!(missing.text, "MISSING (not_found)");
}
