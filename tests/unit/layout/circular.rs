use super::*;
use crate::layout::tabular::TabularLayout;
use crate::pedigree::{record::HorseRecord, store::PedigreeRecordStore, tree::AncestryTreeBuilder};

fn full_tree(g: u32) -> AncestorNode {
    // Every known horse has two known parents up to the horizon.
    let mut records = Vec::new();
    let mut frontier = vec!["R".to_string()];
    for _ in 0..=g {
        let mut next = Vec::new();
        for key in frontier {
            let sire = format!("{key}s");
            let dam = format!("{key}d");
            records.push(HorseRecord::new(
                key.as_str(),
                Some(sire.as_str()),
                Some(dam.as_str()),
            ));
            next.push(sire);
            next.push(dam);
        }
        frontier = next;
    }
    let store = PedigreeRecordStore::from_records(records);
    AncestryTreeBuilder::new(&store).build_to("R", Generations(g))
}

#[test]
fn root_is_the_centre_without_angle() {
    let t = full_tree(2);
    let layout = CircularLayout::new(Generations(2)).unwrap();
    let slot = layout.slot_for(&t).unwrap();
    assert_eq!(slot.ring, 0);
    assert_eq!(slot.angle_deg(), None);
    assert_eq!(slot.sweep_deg, 360.0);
}

#[test]
fn sire_and_dam_lines_stay_in_their_halves() {
    let t = full_tree(5);
    let layout = CircularLayout::new(Generations(5)).unwrap();
    for n in t.walk() {
        let Some(side) = n.path.side() else {
            continue;
        };
        let slot = layout.slot_for(n).unwrap();
        let (lo, hi) = half_range_deg(side);
        let angle = slot.angle_deg().unwrap();
        assert!(lo <= angle && angle < hi, "{} at {angle}", n.path);
        assert!(lo <= slot.start_deg && slot.end_deg() <= hi);
    }
}

#[test]
fn each_ring_splits_each_half_without_overlap() {
    let g = 4;
    let t = full_tree(g);
    let layout = CircularLayout::new(Generations(g)).unwrap();
    for ring in 1..=g {
        let mut spans: Vec<(f64, f64)> = t
            .walk()
            .filter(|n| n.depth == ring)
            .map(|n| {
                let s = layout.slot_for(n).unwrap();
                (s.start_deg, s.end_deg())
            })
            .collect();
        spans.sort_by(|a, b| a.0.total_cmp(&b.0));
        let total: f64 = spans.iter().map(|(a, b)| b - a).sum();
        assert!((total - 360.0).abs() < 1e-9);
        for pair in spans.windows(2) {
            assert!(pair[0].1 <= pair[1].0 + 1e-9);
        }
    }
}

#[test]
fn children_split_parent_span_sire_first() {
    let t = full_tree(3);
    let layout = CircularLayout::new(Generations(3)).unwrap();
    for n in t.walk().filter(|n| n.depth > 0) {
        let parent = layout.slot_for(n).unwrap();
        let kids: Vec<CircularSlot> = n.children().map(|c| layout.slot_for(c).unwrap()).collect();
        if let [sire, dam] = kids.as_slice() {
            assert_eq!(sire.start_deg, parent.start_deg);
            assert_eq!(sire.end_deg(), dam.start_deg);
            assert!((dam.end_deg() - parent.end_deg()).abs() < 1e-9);
        }
    }
}

#[test]
fn angle_order_matches_tabular_row_order() {
    let g = 4;
    let t = full_tree(g);
    let circle = CircularLayout::new(Generations(g)).unwrap();
    let table = TabularLayout::new(Generations(g)).unwrap();
    for ring in 1..=g {
        let mut by_angle: Vec<&AncestorNode> = t.walk().filter(|n| n.depth == ring).collect();
        let mut by_row = by_angle.clone();
        by_angle.sort_by(|a, b| {
            let a = circle.slot_for(a).unwrap().start_deg;
            let b = circle.slot_for(b).unwrap().start_deg;
            a.total_cmp(&b)
        });
        by_row.sort_by_key(|n| table.slot_for(n).unwrap().row);
        let a: Vec<_> = by_angle.iter().map(|n| n.path.clone()).collect();
        let b: Vec<_> = by_row.iter().map(|n| n.path.clone()).collect();
        assert_eq!(a, b);
    }
}

#[test]
fn oversized_generation_counts_are_rejected() {
    assert!(CircularLayout::new(Generations(MAX_ADDRESSABLE_GENERATIONS + 1)).is_err());
}
