//! Integration tests for match forms, single-variant handlers, and dispatch

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use enumforge_engine::{EnumValue, Kind, MatchForm, make_enum, match_member, match_variant};
use enumforge_foundation::{Error, ErrorKind, LtMap, NativeFn, Value};

fn shapes() -> EnumValue {
    let fields: LtMap<Value> = [
        ("Empty", Value::Bool(true)),
        ("Circle", Value::from("float")),
        (
            "Rect",
            Value::object([("w", Value::from("float")), ("h", Value::from("float"))]),
        ),
    ]
    .into_iter()
    .collect();
    make_enum("Shape", &fields, Kind::Symbolic).unwrap()
}

fn area_form() -> MatchForm {
    MatchForm::new()
        .arm("Empty", |_| Ok(Value::Float(0.0)))
        .arm("Circle", |r| {
            let r = r.as_number().unwrap_or(f64::NAN);
            Ok(Value::Float(3.0 * r * r))
        })
        .arm("Rect", |rect| {
            let w = rect.field("w").and_then(Value::as_number).unwrap_or(0.0);
            let h = rect.field("h").and_then(Value::as_number).unwrap_or(0.0);
            Ok(Value::Float(w * h))
        })
}

#[test]
fn registered_form_dispatches() {
    let shapes = shapes();
    shapes.register_form(&area_form()).unwrap();

    let circle = shapes.construct("Circle", &Value::Int(2)).unwrap();
    assert_eq!(shapes.dispatch(&circle).unwrap(), Value::Float(12.0));

    let rect = shapes
        .construct(
            "Rect",
            &Value::object([("w", Value::Int(3)), ("h", Value::from("1.5"))]),
        )
        .unwrap();
    assert_eq!(rect.dispatch().unwrap(), Value::Float(4.5));

    let empty = shapes.variant("Empty").unwrap();
    assert_eq!(shapes.dispatch(&empty).unwrap(), Value::Float(0.0));
}

#[test]
fn library_match_needs_no_registration() {
    let shapes = shapes();
    let circle = shapes.construct("Circle", &Value::Int(1)).unwrap();
    assert_eq!(match_variant(&area_form(), &circle).unwrap(), Value::Float(3.0));
    assert_eq!(circle.matches(&area_form()).unwrap(), Value::Float(3.0));
}

#[test]
fn incomplete_form_lists_all_missing() {
    let shapes = shapes();
    let form = MatchForm::new().arm("Circle", |_| Ok(Value::Null));
    let err = shapes.register_form(&form).unwrap_err();
    assert!(err.to_string().ends_with("missing: Empty,Rect"));
}

#[test]
fn non_function_handler_is_rejected() {
    let shapes = shapes();
    let form = area_form().entry("Rect", "area");
    let err = shapes.register_form(&form).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::HandlerNotCallable { ref field } if field == "Rect"));
}

#[test]
fn dispatch_without_full_coverage_fails() {
    let shapes = shapes();
    let circle = shapes.constructor("Circle").unwrap();
    circle
        .register_handler(NativeFn::new("circle", |_| Ok(Value::from("round"))))
        .unwrap();
    let instance = circle.construct(&Value::Int(1)).unwrap();
    let err = shapes.dispatch(&instance).unwrap_err();
    match &err.kind {
        ErrorKind::IncompleteMatch { missing } => assert_eq!(missing, &["Empty", "Rect"]),
        other => panic!("unexpected error kind: {other:?}"),
    }
}

#[test]
fn single_variant_registration_completes_coverage() {
    let shapes = shapes();
    shapes
        .variant("Empty")
        .unwrap()
        .register_handler(NativeFn::new("empty", |_| Ok(Value::from("nothing"))))
        .unwrap();
    shapes
        .constructor("Circle")
        .unwrap()
        .register_handler(NativeFn::new("circle", |_| Ok(Value::from("round"))))
        .unwrap();
    shapes
        .constructor("Rect")
        .unwrap()
        .register_handler(NativeFn::new("rect", |_| Ok(Value::from("square"))))
        .unwrap();

    let empty = shapes.variant("Empty").unwrap();
    assert_eq!(empty.dispatch().unwrap(), Value::from("nothing"));

    // replacing one handler keeps the others
    shapes
        .constructor("Rect")
        .unwrap()
        .register_handler(NativeFn::new("rect2", |_| Ok(Value::from("box"))))
        .unwrap();
    let rect = shapes
        .construct("Rect", &Value::object([("w", Value::Int(1)), ("h", Value::Int(1))]))
        .unwrap();
    assert_eq!(rect.dispatch().unwrap(), Value::from("box"));
    assert_eq!(empty.dispatch().unwrap(), Value::from("nothing"));
}

#[test]
fn single_variant_registration_requires_function() {
    let shapes = shapes();
    let err = shapes.variant("Empty").unwrap().register_handler(5).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::HandlerNotCallable { .. }));
}

#[test]
fn whole_form_replaces_single_handlers() {
    let shapes = shapes();
    shapes
        .constructor("Circle")
        .unwrap()
        .register_handler(NativeFn::new("circle", |_| Ok(Value::from("round"))))
        .unwrap();
    shapes.register_form(&area_form()).unwrap();
    let circle = shapes.construct("Circle", &Value::Int(1)).unwrap();
    assert_eq!(circle.dispatch().unwrap(), Value::Float(3.0));
}

#[test]
fn exactly_one_handler_fires() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut form = MatchForm::new();
    for name in ["Empty", "Circle", "Rect"] {
        let calls = calls.clone();
        form = form.arm(name, move |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(Value::Null)
        });
    }
    let shapes = shapes();
    let empty = shapes.variant("Empty").unwrap();
    match_variant(&form, &empty).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn handler_errors_propagate() {
    let shapes = shapes();
    let form = area_form().arm("Empty", |_| Err(Error::host("nothing to measure")));
    let empty = shapes.variant("Empty").unwrap();
    let err = match_variant(&form, &empty).unwrap_err();
    assert_eq!(err.to_string(), "nothing to measure");
    assert_eq!(err.context.map(|c| c.stack), Some(vec!["match Empty".to_string()]));
}

#[test]
fn foreign_variants_are_rejected() {
    let a = shapes();
    let b = shapes();
    b.register_form(&area_form()).unwrap();
    let from_a = a.variant("Empty").unwrap();
    let err = b.dispatch(&from_a).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ForeignVariant { .. }));
}

#[test]
fn only_symbolic_enums_accept_forms() {
    let fields: LtMap<Value> = [("A", Value::Null)].into_iter().collect();
    let simple = make_enum("Plain", &fields, Kind::Simple).unwrap();
    let err = simple.register_form(&MatchForm::new()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NotSymbolic { .. }));
}

#[test]
fn match_member_rejects_non_variants() {
    let fields: LtMap<Value> = [("A", Value::Null)].into_iter().collect();
    let simple = make_enum("Plain", &fields, Kind::Simple).unwrap();
    let member = simple.get("A").unwrap();
    let err = match_member(&area_form(), &member).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NotAVariant { .. }));

    let shapes = shapes();
    let constructor = shapes.get("Circle").unwrap();
    assert!(match_member(&area_form(), &constructor).is_err());
    let sentinel = shapes.get("Empty").unwrap();
    assert_eq!(match_member(&area_form(), &sentinel).unwrap(), Value::Float(0.0));
}

#[test]
fn handlers_may_reenter_the_enum() {
    let shapes = shapes();
    let weak = shapes.downgrade();
    let form = area_form().arm("Empty", move |_| {
        // dispatching from inside a handler must not deadlock
        let inner = weak.upgrade().ok_or_else(|| Error::host("shape enum dropped"))?;
        let circle = inner.construct("Circle", &Value::Int(1))?;
        inner.dispatch(&circle)
    });
    shapes.register_form(&form).unwrap();
    let empty = shapes.variant("Empty").unwrap();
    assert_eq!(empty.dispatch().unwrap(), Value::Float(3.0));
}

#[test]
fn handlers_holding_a_weak_handle_let_the_enum_drop() {
    let shapes = shapes();
    let weak = shapes.downgrade();
    let captured = shapes.downgrade();
    let form = area_form().arm("Empty", move |_| {
        Ok(Value::Bool(captured.upgrade().is_some()))
    });
    shapes.register_form(&form).unwrap();
    shapes
        .constructor("Circle")
        .unwrap()
        .register_handler(NativeFn::new("circle", {
            let captured = shapes.downgrade();
            move |_| Ok(Value::Bool(captured.upgrade().is_some()))
        }))
        .unwrap();
    assert_eq!(shapes.variant("Empty").unwrap().dispatch().unwrap(), Value::Bool(true));

    drop(shapes);
    assert!(weak.upgrade().is_none());
}
