use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_equal_signatures_share_an_id() {
    let mut table = SignatureTable::new();
    let a = table.intern(Signature::new(vec![Type::I32, Type::F64], Type::VOID));
    let b = table.intern(Signature::new(vec![Type::I32, Type::F64], Type::VOID));
    assert_eq!(a, b);
    assert_eq!(table.len(), 1);
}

#[test]
fn test_ids_are_monotonic() {
    let mut table = SignatureTable::new();
    let a = table.intern(Signature::new(vec![Type::I32], Type::VOID));
    let b = table.intern(Signature::new(vec![Type::I64], Type::VOID));
    let c = table.intern(Signature::new(vec![Type::I32], Type::I32));
    assert_eq!((a.raw(), b.raw(), c.raw()), (0, 1, 2));
    assert_eq!(table.get(b).params, vec![Type::I64]);
}

#[test]
fn test_required_count_and_this_distinguish() {
    let mut table = SignatureTable::new();
    let all = table.intern(Signature::new(vec![Type::I32, Type::I32], Type::VOID));
    let one = table.intern(Signature::new(vec![Type::I32, Type::I32], Type::VOID).with_required(1));
    let this = table.intern(Signature::new(vec![Type::I32, Type::I32], Type::VOID).with_this(Type::USIZE32));
    assert_ne!(all, one);
    assert_ne!(all, this);
}

#[test]
fn test_accepts_arg_count() {
    let sig = Signature::new(vec![Type::I32, Type::I32], Type::VOID).with_required(1);
    assert!(!sig.accepts_arg_count(0));
    assert!(sig.accepts_arg_count(1));
    assert!(sig.accepts_arg_count(2));
    assert!(!sig.accepts_arg_count(3));

    let rest = Signature::new(vec![Type::I32], Type::VOID).with_rest();
    assert!(rest.accepts_arg_count(5));
}
