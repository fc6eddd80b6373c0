use super::*;

#[test]
fn interning_is_idempotent() {
    let mut interner = Interner::new();
    let a = interner.intern("x");
    let b = interner.intern("x");
    assert_eq!(a, b);
    assert_eq!(interner.len(), 1);
}

#[test]
fn distinct_strings_get_distinct_atoms() {
    let mut interner = Interner::new();
    let a = interner.intern("scale");
    let b = interner.intern("scalE");
    assert_ne!(a, b);
    assert_eq!(interner.resolve(a), "scale");
    assert_eq!(interner.resolve(b), "scalE");
}
