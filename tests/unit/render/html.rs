use super::*;
use crate::pedigree::{record::HorseRecord, store::PedigreeRecordStore};

fn chart(generations: i64) -> PedigreeChart {
    let mut sire = HorseRecord::new("B", Some("D"), None);
    sire.url = "https://example.org/horse?id=B&x=1".to_string();
    let store = PedigreeRecordStore::from_records([
        HorseRecord::new("A", Some("B"), Some("C")).with_name("Alpha <Jr>"),
        sire,
        HorseRecord::new("C", Some("D"), None),
        HorseRecord::new("D", None, None),
    ]);
    PedigreeChart::prepare(&store, "A", generations).unwrap()
}

#[test]
fn every_row_of_the_table_is_emitted() {
    let html = render_html(&chart(3), &ChartSettings::default()).unwrap();
    assert_eq!(html.matches("<tr>").count(), 8);
    assert!(html.contains(r#"rowspan="8""#));
}

#[test]
fn text_and_links_are_escaped() {
    let html = render_html(&chart(2), &ChartSettings::default()).unwrap();
    assert!(html.contains("Alpha &lt;Jr&gt;"));
    assert!(!html.contains("Alpha <Jr>"));
    assert!(html.contains(r#"href="https://example.org/horse?id=B&amp;x=1""#));
}

#[test]
fn repeated_ancestors_carry_the_inbred_class() {
    let html = render_html(&chart(2), &ChartSettings::default()).unwrap();
    assert_eq!(html.matches(" inbred\"").count(), 2);
    assert!(html.contains("D 50.00% 2 x 2"));
}

#[test]
fn missing_branches_leave_empty_cells() {
    // B has no dam, so the rows under that slot stay blank.
    let html = render_html(&chart(3), &ChartSettings::default()).unwrap();
    assert!(html.contains(r#"class="b_empty""#));
}

#[test]
fn colours_come_from_settings() {
    let mut settings = ChartSettings::default();
    settings.colors.male_fill = "#123456".to_string();
    let html = render_html(&chart(1), &settings).unwrap();
    assert!(html.contains("#123456"));
}

#[test]
fn columns_stop_at_the_deepest_known_ancestor() {
    let store = PedigreeRecordStore::from_records([HorseRecord::new("A", None, None)]);
    let chart = PedigreeChart::prepare(&store, "A", 3).unwrap();
    let html = render_html(&chart, &ChartSettings::default()).unwrap();
    assert_eq!(html.matches("<td").count(), 1);
    assert!(!html.contains(r#"class="b_empty""#));
    assert!(html.contains("width: 100.00%"));
}

#[test]
fn oversized_tables_are_a_render_error() {
    let store = PedigreeRecordStore::from_records([HorseRecord::new("A", None, None)]);
    let chart = PedigreeChart::prepare(&store, "A", 17).unwrap();
    let err = render_html(&chart, &ChartSettings::default()).unwrap_err();
    assert!(matches!(err, BloodlineError::Render(_)));

    let chart = PedigreeChart::prepare(&store, "A", 16).unwrap();
    assert!(render_html(&chart, &ChartSettings::default()).is_ok());
}
