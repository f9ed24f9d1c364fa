use super::*;

use ParentSide::{Dam, Sire};

#[test]
fn generations_reject_negative_requests() {
    let err = Generations::new(-1).unwrap_err();
    assert!(matches!(err, BloodlineError::InvalidArgument(_)));
    assert_eq!(Generations::new(0).unwrap(), Generations(0));
    assert_eq!(Generations::new(5).unwrap().get(), 5);
}

#[test]
fn generations_reject_values_beyond_u32() {
    assert!(Generations::new(i64::from(u32::MAX) + 1).is_err());
}

#[test]
fn path_index_orders_sire_before_dam() {
    let ss = AncestorPath::from_steps([Sire, Sire]);
    let sd = AncestorPath::from_steps([Sire, Dam]);
    let ds = AncestorPath::from_steps([Dam, Sire]);
    let dd = AncestorPath::from_steps([Dam, Dam]);
    assert_eq!(
        [ss.index(), sd.index(), ds.index(), dd.index()],
        [0, 1, 2, 3]
    );
    assert_eq!(AncestorPath::root().index(), 0);
}

#[test]
fn child_extends_depth_and_keeps_prefix() {
    let sire = AncestorPath::root().child(Sire);
    let sire_dam = sire.child(Dam);
    assert_eq!(sire_dam.depth(), 2);
    assert_eq!(sire_dam.side(), Some(Sire));
    assert_eq!(sire_dam.last(), Some(Dam));
    assert!(sire.is_strict_prefix_of(&sire_dam));
    assert!(AncestorPath::root().is_strict_prefix_of(&sire));
    assert!(!sire_dam.is_strict_prefix_of(&sire_dam));
    assert!(!AncestorPath::root().child(Dam).is_strict_prefix_of(&sire_dam));
}

#[test]
fn path_display_uses_side_letters() {
    assert_eq!(AncestorPath::root().to_string(), "-");
    assert_eq!(AncestorPath::from_steps([Dam, Sire, Sire]).to_string(), "DSS");
}
