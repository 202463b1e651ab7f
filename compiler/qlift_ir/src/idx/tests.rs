use super::*;

#[test]
fn pre_interned_indices_are_stable() {
    assert_eq!(Idx::OBJECT.raw(), 0);
    assert_eq!(Idx::BOOL.raw(), 1);
    assert_eq!(Idx::INT.raw(), 2);
    assert_eq!(Idx::CANCELLATION.raw(), 6);
    assert_eq!(Idx::DEFERRED_FACTORY.raw(), 8);
    assert_eq!(Idx::FIRST_DYNAMIC, 9);
}

#[test]
fn primitive_check_works() {
    assert!(Idx::STR.is_primitive());
    assert!(Idx::DEFERRED_FACTORY.is_primitive());
    assert!(!Idx::from_raw(Idx::FIRST_DYNAMIC).is_primitive());
}

#[test]
fn none_sentinel_works() {
    assert!(Idx::NONE.is_none());
    assert!(!Idx::OBJECT.is_none());
    assert_eq!(Idx::default(), Idx::NONE);
}

#[test]
fn debug_uses_primitive_names() {
    assert_eq!(format!("{:?}", Idx::INT), "Idx(int)");
    assert_eq!(format!("{:?}", Idx::from_raw(40)), "Idx(40)");
    assert_eq!(format!("{:?}", Idx::NONE), "Idx::NONE");
}
