use super::*;

#[test]
fn sex_codes_map_to_male_and_female() {
    for code in ["H", "c", " G ", "S"] {
        assert_eq!(Sex::from_code(code), Sex::Male, "code {code:?}");
    }
    assert_eq!(Sex::from_code("M"), Sex::Female);
    assert_eq!(Sex::from_code("f"), Sex::Female);
    assert_eq!(Sex::from_code(""), Sex::Unknown);
    assert_eq!(Sex::from_code("X"), Sex::Unknown);
}

#[test]
fn csv_row_is_trimmed_and_blanks_become_absent() {
    let row = CsvRow {
        primary_key: " K1 ".to_string(),
        name: " Deep Impact (JPN) ".to_string(),
        year: "2002".to_string(),
        sire: " SS ".to_string(),
        dam: "   ".to_string(),
        sex: "H".to_string(),
        ..CsvRow::default()
    };
    let rec = row.into_record().unwrap();
    assert_eq!(rec.primary_key, "K1");
    assert_eq!(rec.name, "Deep Impact (JPN)");
    assert_eq!(rec.birth_year, Some(2002));
    assert_eq!(rec.sire_key.as_deref(), Some("SS"));
    assert_eq!(rec.dam_key, None);
    assert_eq!(rec.sex, Sex::Male);
}

#[test]
fn csv_row_without_key_is_skipped_and_name_falls_back() {
    assert!(CsvRow::default().into_record().is_none());

    let rec = CsvRow {
        primary_key: "K2".to_string(),
        year: "unknown".to_string(),
        ..CsvRow::default()
    }
    .into_record()
    .unwrap();
    assert_eq!(rec.name, "K2");
    assert_eq!(rec.birth_year, None);
}
