//! Integration tests for flags enums and bitmask queries

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use enumforge_engine::{Kind, make_enum};
use enumforge_foundation::{Error, ErrorKind, LtMap, NativeFn, Value};
use proptest::prelude::*;

fn perm_fields() -> LtMap<Value> {
    [
        ("Read", Value::Int(1)),
        ("Delete", Value::from("")),
        ("Write", Value::Bool(true)),
        ("Mod", Value::Int(5)),
        ("Admin", Value::Int(99)),
    ]
    .into_iter()
    .collect()
}

#[test]
fn keys_of_five() {
    let perm = make_enum("Perm", &perm_fields(), Kind::Flags).unwrap();
    let keys = perm.keys(5).unwrap().into_found().unwrap();
    assert_eq!(keys.as_slice(), &[1, 4]);
}

#[test]
fn entries_of_seven() {
    let perm = make_enum("Perm", &perm_fields(), Kind::Flags).unwrap();
    let entries = perm.entries(7).unwrap().into_found().unwrap();
    assert_eq!(entries.print(), "Read(1), Delete(2), Write(4)");
    // printing does not consume or change the view
    assert_eq!(entries.len(), 3);
}

#[test]
fn values_agree_with_keys_and_entries() {
    let perm = make_enum("Perm", &perm_fields(), Kind::Flags).unwrap();
    let values = perm.values(0b10110).unwrap().into_found().unwrap();
    let names: Vec<&str> = values.iter().map(|n| &**n).collect();
    assert_eq!(names, vec!["Delete", "Write", "Admin"]);
}

#[test]
fn lookups() {
    let perm = make_enum("Perm", &perm_fields(), Kind::Flags).unwrap();
    assert_eq!(perm.bit_of("Admin"), Some(16));
    assert_eq!(perm.int_of("Mod"), Some(8));
    assert_eq!(perm.name_of(8), Some("Mod"));
    assert_eq!(perm.name_of(3), None);
    assert_eq!(perm.size(), 5);
    assert_eq!(perm.to_string(), "Perm { Read(1), Delete(2), Write(4), Mod(8), Admin(16) }");
}

#[test]
fn fallback_receives_mask() {
    let fields = perm_fields().insert(
        "0",
        Value::Fn(NativeFn::new("none", |args| {
            Ok(Value::from(format!("no permissions in {}", args[0])))
        })),
    );
    let perm = make_enum("Perm", &fields, Kind::Flags).unwrap();
    assert_eq!(perm.size(), 5);
    let result = perm.values(64).unwrap();
    assert_eq!(result.fallback(), Some(&Value::from("no permissions in 64")));
}

#[test]
fn fallback_only_runs_when_nothing_matches() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let fields = perm_fields().insert(
        "0",
        Value::Fn(NativeFn::new("count", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Value::Null)
        })),
    );
    let perm = make_enum("Perm", &fields, Kind::Flags).unwrap();
    perm.entries(1).unwrap();
    perm.entries(31).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    perm.entries(0).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn fallback_errors_propagate() {
    let fields = perm_fields().insert(
        "0",
        Value::Fn(NativeFn::new("fail", |_| Err(Error::host("boom")))),
    );
    let perm = make_enum("Perm", &fields, Kind::Flags).unwrap();
    let err = perm.keys(0).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Host(_)));
    assert_eq!(err.context.and_then(|c| c.title).as_deref(), Some("Perm"));
}

#[test]
fn non_callable_fallback_fails() {
    let fields = perm_fields().insert("0", Value::from("nothing"));
    let err = make_enum("Perm", &fields, Kind::Flags).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::FallbackNotCallable { .. }));
}

#[test]
fn symbolic_enums_are_not_bitmaskable() {
    let e = make_enum("Sym", &perm_fields(), Kind::Symbolic).unwrap();
    let err = e.values(1).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NotBitmaskable { .. }));
}

fn wide(n: usize) -> LtMap<Value> {
    (0..n).map(|i| (format!("F{i}"), Value::Null)).collect()
}

#[test]
fn capacity_limit_counts_entries() {
    assert!(make_enum("Wide", &wide(32), Kind::Flags).is_ok());
    let err = make_enum("Wide", &wide(33), Kind::Flags).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::TooManyFlags { count: 33 }));

    let with_fallback = wide(32).insert("0", Value::Fn(NativeFn::new("fb", |_| Ok(Value::Null))));
    assert!(make_enum("Wide", &with_fallback, Kind::Flags).is_ok());
}

proptest! {
    #[test]
    fn bits_are_distinct_powers_of_two(n in 1usize..=32) {
        let e = make_enum("Wide", &wide(n), Kind::Flags).unwrap();
        let mut seen = 0u64;
        for member in e.iter() {
            let bit = member.as_flag().unwrap().bit();
            prop_assert!(bit.is_power_of_two());
            prop_assert_eq!(seen & u64::from(bit), 0);
            seen |= u64::from(bit);
        }
    }

    #[test]
    fn queries_agree(n in 1usize..=32, mask in any::<i64>()) {
        let e = make_enum("Wide", &wide(n), Kind::Flags).unwrap();
        let values = e.values(mask).unwrap();
        let keys = e.keys(mask).unwrap();
        let entries = e.entries(mask).unwrap();
        prop_assert_eq!(values.is_found(), keys.is_found());
        if let (Some(v), Some(k), Some(en)) = (values.found(), keys.found(), entries.found()) {
            prop_assert_eq!(v.len(), k.len());
            for ((name, bit), entry) in v.iter().zip(k.iter()).zip(en.iter()) {
                prop_assert_eq!(&**name, entry.name());
                prop_assert_eq!(*bit, entry.bit());
                prop_assert!(mask | i64::from(*bit) == mask);
            }
            prop_assert!(k.as_slice().windows(2).all(|w| w[0] < w[1]));
        }
    }
}
