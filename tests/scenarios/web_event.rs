//! A tagged union of browser events with typed payloads

use enumforge::engine::{Kind, MatchForm, make_enum};
use enumforge::foundation::{ErrorKind, LtMap, Marker, Value};

fn web_event() -> LtMap<Value> {
    [
        ("PageLoad", Value::Marker(Marker::new("load"))),
        ("PageUnload", Value::Bool(true)),
        ("KeyPress", Value::from("char")),
        ("Paste", Value::from("str")),
        (
            "Click",
            Value::object([("x", Value::from("int")), ("y", Value::from("int"))]),
        ),
    ]
    .into_iter()
    .collect()
}

fn describe() -> MatchForm {
    MatchForm::new()
        .arm("PageLoad", |_| Ok(Value::from("page loaded")))
        .arm("PageUnload", |_| Ok(Value::from("page unloaded")))
        .arm("KeyPress", |c| Ok(Value::from(format!("pressed '{}'", c.as_str().unwrap_or("?")))))
        .arm("Paste", |s| Ok(Value::from(format!("pasted {s}"))))
        .arm("Click", |p| {
            let x = p.field("x").cloned().unwrap_or(Value::Undefined);
            let y = p.field("y").cloned().unwrap_or(Value::Undefined);
            Ok(Value::from(format!("clicked at x={x}, y={y}")))
        })
}

#[test]
fn inspect_every_event() {
    let event = make_enum("WebEvent", &web_event(), Kind::Symbolic).unwrap();
    event.register_form(&describe()).unwrap();

    let load = event.variant("PageLoad").unwrap();
    let key = event.construct("KeyPress", &Value::from("xfgh")).unwrap();
    let paste = event.construct("Paste", &Value::from("my text")).unwrap();
    let click = event
        .construct(
            "Click",
            &Value::object([
                ("x", Value::Float(59.92)),
                ("y", Value::from("77.1")),
                ("button", Value::Int(1)),
            ]),
        )
        .unwrap();

    let described: Vec<Value> = [load, key, paste, click]
        .iter()
        .map(|e| event.dispatch(e).unwrap())
        .collect();
    assert_eq!(
        described,
        vec![
            Value::from("page loaded"),
            Value::from("pressed 'x'"),
            Value::from("pasted \"my text\""),
            Value::from("clicked at x=59, y=77"),
        ]
    );
}

#[test]
fn click_drops_unknown_fields() {
    let event = make_enum("WebEvent", &web_event(), Kind::Symbolic).unwrap();
    let click = event
        .construct(
            "Click",
            &Value::object([("x", Value::Int(1)), ("y", Value::Int(2)), ("z", Value::Int(3))]),
        )
        .unwrap();
    assert_eq!(click.field("z"), None);
    assert_eq!(click.payload().as_object().map(|o| o.len()), Some(2));
}

#[test]
fn click_without_y_is_rejected() {
    let event = make_enum("WebEvent", &web_event(), Kind::Symbolic).unwrap();
    let err = event
        .construct("Click", &Value::object([("x", Value::Int(1))]))
        .unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::MissingField { ref variant, ref field, depth: 0 } if variant == "Click" && field == "y"
    ));
}

#[test]
fn schema_is_exposed() {
    let event = make_enum("WebEvent", &web_event(), Kind::Symbolic).unwrap();
    let click = event.constructor("Click").unwrap();
    assert_eq!(click.schema().to_string(), "{ x: 'int', y: 'int' }");
    assert_eq!(click.to_string(), "Click({ x: 'int', y: 'int' })");
}
