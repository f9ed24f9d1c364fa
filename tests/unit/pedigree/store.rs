use super::*;

const CSV: &str = "\u{feff}PrimaryKey,Horse Name,Year,Sire,Dam,Sex\n\
A,Alpha,2010,B,C,H\n\
B,Bravo,2000,,,H\n\
C,Charlie,2001,D,,M\n\
,Nameless,1999,,,H\n\
D,,1990,,,H\n";

#[test]
fn csv_with_bom_loads_and_skips_blank_keys() {
    let store = PedigreeRecordStore::from_csv_reader(CSV.as_bytes()).unwrap();
    assert_eq!(store.len(), 4);
    assert_eq!(store.get("A").unwrap().name, "Alpha");
    assert_eq!(store.get("D").unwrap().name, "D");
    assert!(store.get("").is_none());
}

#[test]
fn missing_optional_columns_read_as_blank() {
    let store =
        PedigreeRecordStore::from_csv_reader("PrimaryKey,Sire\nX,Y\nY,\n".as_bytes()).unwrap();
    let x = store.get("X").unwrap();
    assert_eq!(x.sire_key.as_deref(), Some("Y"));
    assert_eq!(x.dam_key, None);
    assert_eq!(x.birth_year, None);
}

#[test]
fn header_without_primary_key_is_a_data_error() {
    let err = PedigreeRecordStore::from_csv_reader("Name,Sire\nX,Y\n".as_bytes()).unwrap_err();
    assert!(matches!(err, BloodlineError::Data(_)));
}

#[test]
fn duplicate_keys_keep_last_row() {
    let store = PedigreeRecordStore::from_records([
        HorseRecord::new("A", None, None).with_name("first"),
        HorseRecord::new("A", None, None).with_name("second"),
    ]);
    assert_eq!(store.len(), 1);
    assert_eq!(store.get("A").unwrap().name, "second");
}

#[test]
fn lineage_depth_follows_longest_chain() {
    let store = PedigreeRecordStore::from_csv_reader(CSV.as_bytes()).unwrap();
    assert_eq!(store.lineage_depth("A"), 2);
    assert_eq!(store.lineage_depth("B"), 0);
    assert_eq!(store.lineage_depth("missing"), 0);
    assert_eq!(
        store.effective_generations("A", Generations(5)),
        Generations(2)
    );
    assert_eq!(
        store.effective_generations("A", Generations(1)),
        Generations(1)
    );
}

#[test]
fn lineage_depth_terminates_on_self_reference() {
    let store = PedigreeRecordStore::from_records([
        HorseRecord::new("L", Some("M"), None),
        HorseRecord::new("M", Some("L"), None),
    ]);
    assert_eq!(store.lineage_depth("L"), 2);
    assert_eq!(store.lineage_depth("M"), 2);
}

#[test]
fn lineage_depth_walks_long_chains_on_a_small_stack() {
    let worker = std::thread::Builder::new()
        .stack_size(256 * 1024)
        .spawn(|| {
            let keys: Vec<String> = (0..20_000).map(|i| format!("H{i}")).collect();
            let store = PedigreeRecordStore::from_records(keys.iter().enumerate().map(|(i, k)| {
                HorseRecord::new(k.as_str(), keys.get(i + 1).map(String::as_str), None)
            }));
            assert_eq!(store.lineage_depth("H0"), 19_999);
            assert_eq!(store.lineage_depth("H19998"), 1);
            assert_eq!(
                store.effective_generations("H0", Generations(9)),
                Generations(9)
            );
        })
        .unwrap();
    worker.join().unwrap();
}
