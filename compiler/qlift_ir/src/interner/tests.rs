use super::*;

#[test]
fn empty_string_is_pre_interned() {
    let interner = StringInterner::new();
    assert_eq!(interner.intern(""), Name::EMPTY);
    assert!(interner.is_empty());
}

#[test]
fn interning_is_deduplicated() {
    let interner = StringInterner::new();
    let a = interner.intern("order");
    let b = interner.intern("order");
    let c = interner.intern("customer");
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(interner.len(), 3);
}

#[test]
fn lookup_returns_original_text() {
    let interner = StringInterner::new();
    let name = interner.intern("total");
    assert_eq!(interner.lookup(name), "total");
}

#[test]
fn concurrent_interning_agrees() {
    let interner = StringInterner::new();
    let names: Vec<Name> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|| interner.intern("shared")))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|_| panic!("interning thread panicked")))
            .collect()
    });
    assert!(names.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(interner.len(), 2);
}
