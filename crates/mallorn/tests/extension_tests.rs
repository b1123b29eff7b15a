//! Extension tables and method invocation

use mallorn::*;
use pretty_assertions::assert_eq;

// Each test registers against its own payload type: the global registry is
// shared by every test thread.

#[derive(Clone)]
struct Counter(i64);

impl Payload for Counter {
    fn to_integer(&self) -> i64 {
        self.0
    }

    fn type_name() -> &'static str {
        "Counter"
    }
}

#[derive(Clone)]
struct Unregistered;

impl Payload for Unregistered {
    fn type_name() -> &'static str {
        "Unregistered"
    }
}

#[derive(Clone)]
struct Bag(Vec<Value>);

impl Payload for Bag {
    fn type_name() -> &'static str {
        "Bag"
    }
}

#[test]
fn test_extensions_on_empty_fail() {
    let v = Value::empty();
    assert_eq!(
        v.extensions().unwrap_err(),
        ValueError::ExtensionUnsupported
    );
    assert_eq!(
        v.invoke("anything", []).unwrap_err().kind(),
        ErrorKind::ExtensionUnsupported
    );
}

#[test]
fn test_unregistered_type_has_empty_table() {
    let v = Value::new(Unregistered);
    assert!(v.extensions().unwrap().is_empty());
    assert_eq!(
        v.invoke("len", []).unwrap_err(),
        ValueError::UnknownExtension {
            type_name: "Unregistered",
            name: "len".to_string(),
        }
    );
}

#[test]
fn test_invoke_passes_receiver_first() -> anyhow::Result<()> {
    ExtensionRegistry::global().register::<Counter, _>("plus", |args| {
        let base = args[0].to_integer();
        let step = args.get(1).map_or(1, Value::to_integer);
        Ok(Value::from(base + step))
    });

    let c = Value::new(Counter(40));
    assert_eq!(c.invoke("plus", [Value::from(2i64)])?.as_i64(), Some(42));
    assert_eq!(c.invoke("plus", [])?.as_i64(), Some(41));
    assert!(c.extensions()?.contains("plus"));
    Ok(())
}

#[test]
fn test_extension_can_mutate_receiver_in_place() -> anyhow::Result<()> {
    ExtensionRegistry::global().install::<Bag>(
        ExtensionTable::new()
            .with("push", |args| {
                let item = args.get(1).cloned().unwrap_or_default();
                args[0].access_raw::<Bag>()?.0.push(item);
                Ok(Value::empty())
            })
            .with("len", |args| {
                let len = args[0].read::<Bag>()?.0.len();
                Ok(Value::from(len as i64))
            }),
    );

    let bag = Value::new(Bag(Vec::new()));
    let alias = bag.clone();
    bag.invoke("push", [Value::from("acorn")])?;
    bag.invoke("push", [Value::from("seed")])?;

    assert_eq!(alias.invoke("len", [])?.as_i64(), Some(2));
    Ok(())
}

#[test]
fn test_extension_errors_propagate() {
    #[derive(Clone)]
    struct Fragile;
    impl Payload for Fragile {}

    ExtensionRegistry::global().register::<Fragile, _>("break", |_| {
        Err(ValueError::Extension("snapped".to_string()))
    });

    let v = Value::new(Fragile);
    let err = v.invoke("break", []).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Extension);
    assert_eq!(err.to_string(), "Extension error: snapped");
}

#[test]
fn test_private_registry_is_isolated() {
    #[derive(Clone)]
    struct Tag;
    impl Payload for Tag {}

    let registry = ExtensionRegistry::new();
    registry.register::<Tag, _>("name", |_| Ok(Value::from("tag")));
    assert!(registry.table::<Tag>().contains("name"));
    // A private registry does not leak into the global one
    assert!(!ExtensionRegistry::global().table::<Tag>().contains("name"));
}
