use objfilter::cli::{CheckOptions, CheckResult, CliError, ExpanderKind, execute_check};
use objfilter::expander::Resolve;
use objfilter::{Filter, OperatorKind, Registry, Value, compile};
use serde_json::json;
use std::sync::Arc;
use std::thread;

fn json_object(pairs: Vec<(&str, Value)>) -> Value {
    Value::object(pairs)
}

fn check(query: &str, input: serde_json::Value, expander: ExpanderKind) -> Result<serde_json::Value, CliError> {
    let options = CheckOptions {
        query: query.to_string(),
        input: Some(input.to_string()),
        expander,
        ..Default::default()
    };
    match execute_check(&options)? {
        CheckResult::Success(output) => Ok(output),
        CheckResult::SyntaxValid(tree) => panic!("unexpected syntax result {tree}"),
    }
}

// ============================================================================
// Resolution Strategies
// ============================================================================

#[test]
fn test_attribute_lookup_is_case_sensitive() {
    let object = json_object(vec![("color", Value::from("grey"))]);
    let filter = compile("Color is 'grey'", &Registry::attribute()).unwrap();
    assert!(!filter.matches(&object));
}

#[test]
fn test_lowercase_attribute_lookup() {
    let object = json_object(vec![("color", Value::from("grey"))]);
    let filter = compile("Color is 'grey'", &Registry::lowercase_attribute()).unwrap();
    assert!(filter.matches(&object));
}

#[test]
fn test_key_lookup() {
    let event = Value::map([
        ("source", Value::from("registry")),
        ("values", Value::map([("Run", Value::from("evil.exe"))])),
    ]);
    let registry = Registry::keyed();

    assert!(compile("source is 'registry'", &registry).unwrap().matches(&event));
    // The nested map is tested whole, so contains sees its keys
    assert!(compile("values.Run contains 'Run'", &registry).unwrap().matches(&event));
    assert!(!compile("values.Run contains 'Missing'", &registry).unwrap().matches(&event));

    let record = json_object(vec![("source", Value::from("registry"))]);
    assert!(!compile("source is 'registry'", &registry).unwrap().matches(&record));
}

struct PrefixResolver;

impl Resolve for PrefixResolver {
    fn name(&self) -> &'static str {
        "prefix"
    }

    fn resolve<'v>(&self, object: &'v Value, name: &str) -> Option<&'v Value> {
        match object {
            Value::Object(fields) => fields.get(&format!("attr_{name}")),
            _ => None,
        }
    }
}

#[test]
fn test_custom_resolver_and_alias() {
    let mut registry = Registry::new(PrefixResolver).with_default_operators();
    registry.register("LIKE", OperatorKind::RegexpInsensitive);

    let object = json_object(vec![("attr_name", Value::from("Notepad.exe"))]);
    let filter = compile("name like '^notepad'", &registry).unwrap();
    assert!(filter.matches(&object));
    assert_eq!(registry.expander().resolver_name(), "prefix");
}

#[test]
fn test_empty_registry_knows_no_operators() {
    let registry = Registry::new(objfilter::expander::AttributeResolver);
    assert!(compile("a is 1", &registry).is_err());
    assert!(compile("", &registry).is_ok());
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_filter_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Filter>();
    assert_send_sync::<Registry>();
}

#[test]
fn test_filter_shared_across_threads() {
    let filter = Arc::new(compile("n >= 50 and name regexp '^item'", &Registry::default()).unwrap());
    let objects: Vec<Value> = (0..100)
        .map(|n| {
            json_object(vec![
                ("n", Value::from(n)),
                ("name", Value::from(format!("item{n}"))),
            ])
        })
        .collect();

    let counts: Vec<usize> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let filter = Arc::clone(&filter);
                let objects = &objects;
                scope.spawn(move || filter.filter(objects).count())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(counts, vec![50; 4]);
}

// ============================================================================
// CLI Check
// ============================================================================

#[test]
fn test_check_filters_records() {
    let input = json!([
        {"color": "grey", "doors": 3},
        {"color": "grey", "doors": 2},
        {"color": "red", "doors": 5}
    ]);
    let output = check("color is 'grey' and doors >= 3", input, ExpanderKind::Attribute).unwrap();
    assert_eq!(output, json!([{"color": "grey", "doors": 3}]));
}

#[test]
fn test_check_context_over_json() {
    let input = json!([
        {"id": 1, "imported_dlls": [
            {"name": "CreateFileA", "num_functions": 1},
            {"name": "RegQueryValueEx", "num_functions": 2}
        ]},
        {"id": 2, "imported_dlls": [
            {"name": "RegQueryValueEx", "num_functions": 1}
        ]}
    ]);
    let output = check(
        r#"@imported_dlls(name is "RegQueryValueEx" and num_functions is 1)"#,
        input,
        ExpanderKind::Attribute,
    )
    .unwrap();
    let ids: Vec<_> = output.as_array().unwrap().iter().map(|o| o["id"].clone()).collect();
    assert_eq!(ids, vec![json!(2)]);
}

#[test]
fn test_check_lowercase_expander() {
    let input = json!({"name": "a"});
    let output = check("NAME is 'a'", input, ExpanderKind::Lowercase).unwrap();
    assert_eq!(output, json!([{"name": "a"}]));
}

#[test]
fn test_check_reports_errors() {
    assert!(matches!(
        check("a is", json!({}), ExpanderKind::Attribute),
        Err(CliError::Parse(_))
    ));
    assert!(matches!(
        check("a regexp '('", json!({}), ExpanderKind::Attribute),
        Err(CliError::Compile(_))
    ));

    let options = CheckOptions {
        query: "a is 1".to_string(),
        input: Some("{not json".to_string()),
        ..Default::default()
    };
    assert!(matches!(execute_check(&options), Err(CliError::Json(_))));
}

#[test]
fn test_check_syntax_only() {
    let options = CheckOptions {
        query: "a is 1 or b is 2".to_string(),
        syntax_only: true,
        ..Default::default()
    };
    match execute_check(&options).unwrap() {
        CheckResult::SyntaxValid(tree) => assert_eq!(tree, "Or(Equals(a, 1), Equals(b, 2))"),
        other => panic!("unexpected result {other:?}"),
    }
}
