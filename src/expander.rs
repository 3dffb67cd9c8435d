//! Path expansion over candidate objects.
//!
//! A [`Path`] such as `tyres.brand` is followed through a [`Value`] one segment
//! at a time. Each segment is looked up with a [`Resolve`] strategy; when an
//! intermediate value is an array, the rest of the path is followed for every
//! element and all results are collected ("fan-out").

use std::{fmt, sync::Arc};

use crate::value::Value;

/// Looks a single name up on an object.
///
/// This is the only capability a resolution strategy provides. Returning
/// `None` means the name is absent; absence is never an error.
pub trait Resolve: Send + Sync {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    fn resolve<'v>(&self, object: &'v Value, name: &str) -> Option<&'v Value>;
}

/// Exact-case attribute lookup on [`Value::Object`] records.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeResolver;

impl Resolve for AttributeResolver {
    fn name(&self) -> &'static str {
        "attribute"
    }

    fn resolve<'v>(&self, object: &'v Value, name: &str) -> Option<&'v Value> {
        match object {
            Value::Object(attributes) => attributes.get(name),
            _ => None,
        }
    }
}

/// Attribute lookup with the path segment lowercased first.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowercaseAttributeResolver;

impl Resolve for LowercaseAttributeResolver {
    fn name(&self) -> &'static str {
        "lowercase"
    }

    fn resolve<'v>(&self, object: &'v Value, name: &str) -> Option<&'v Value> {
        AttributeResolver.resolve(object, &name.to_lowercase())
    }
}

/// Keyed lookup on [`Value::Map`] containers.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyResolver;

impl Resolve for KeyResolver {
    fn name(&self) -> &'static str {
        "key"
    }

    fn resolve<'v>(&self, object: &'v Value, name: &str) -> Option<&'v Value> {
        match object {
            Value::Map(entries) => entries.get(name),
            _ => None,
        }
    }
}

/// A dotted attribute path, split once at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    pub const SEPARATOR: char = '.';

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl From<&str> for Path {
    fn from(path: &str) -> Self {
        Path {
            segments: path.split(Path::SEPARATOR).map(str::to_string).collect(),
        }
    }
}

impl From<Vec<String>> for Path {
    fn from(segments: Vec<String>) -> Self {
        Path { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

/// Follows paths through objects with a chosen resolution strategy.
///
/// Expansion is pure: it never mutates the object and may be called any
/// number of times, from any number of threads.
///
/// # Limitations
///
/// Expansion recurses once per path segment and per nested array level, so a
/// pathologically deep object graph makes a single expansion arbitrarily
/// slow. There is no timeout or cancellation.
#[derive(Clone)]
pub struct ValueExpander {
    resolver: Arc<dyn Resolve>,
}

impl ValueExpander {
    pub fn new<R: Resolve + 'static>(resolver: R) -> Self {
        ValueExpander {
            resolver: Arc::new(resolver),
        }
    }

    pub fn resolver_name(&self) -> &'static str {
        self.resolver.name()
    }

    /// Returns every value reachable from `object` through `path`, in
    /// collection order.
    ///
    /// - An absent (or `Null`) segment contributes nothing.
    /// - The last segment yields the resolved value itself.
    /// - Before the last segment, a [`Value::Map`] is yielded whole, an array
    ///   fans out over its elements, and anything else is descended into.
    ///   Strings and bytes are not treated as collections.
    ///
    /// # Examples
    ///
    /// ```
    /// use objfilter::{Path, Value, ValueExpander, expander::AttributeResolver};
    ///
    /// let car = Value::object([(
    ///     "tyres",
    ///     Value::Array(vec![
    ///         Value::object([("brand", Value::from("AVON"))]),
    ///         Value::object([("brand", Value::from("PIRELLI"))]),
    ///     ]),
    /// )]);
    /// let expander = ValueExpander::new(AttributeResolver);
    /// let brands = expander.expand(&car, &Path::from("tyres.brand"));
    /// assert_eq!(brands, vec![&Value::from("AVON"), &Value::from("PIRELLI")]);
    /// ```
    pub fn expand<'v>(&self, object: &'v Value, path: &Path) -> Vec<&'v Value> {
        let mut values = Vec::new();
        self.expand_into(object, path.segments(), &mut values);
        values
    }

    fn expand_into<'v>(&self, object: &'v Value, path: &[String], values: &mut Vec<&'v Value>) {
        let Some((name, rest)) = path.split_first() else {
            return;
        };
        let value = match self.resolver.resolve(object, name) {
            None | Some(Value::Null) => return,
            Some(value) => value,
        };

        if rest.is_empty() {
            values.push(value);
            return;
        }

        match value {
            Value::Map(_) => values.push(value),
            Value::Array(items) => {
                for item in items {
                    self.expand_into(item, rest, values);
                }
            }
            _ => self.expand_into(value, rest, values),
        }
    }
}

impl fmt::Debug for ValueExpander {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueExpander")
            .field("resolver", &self.resolver.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested() -> Value {
        Value::object([
            ("name", Value::from("outer")),
            ("missing", Value::Null),
            (
                "inner",
                Value::object([("size", Value::from(7)), ("label", Value::from("x"))]),
            ),
            ("tags", Value::map([("owner", Value::from("root"))])),
            (
                "grid",
                Value::Array(vec![
                    Value::Array(vec![Value::object([("v", Value::from(1))])]),
                    Value::Array(vec![
                        Value::object([("v", Value::from(2))]),
                        Value::object([("v", Value::from(3))]),
                    ]),
                ]),
            ),
        ])
    }

    #[test]
    fn descends_into_records() {
        let expander = ValueExpander::new(AttributeResolver);
        let object = nested();
        assert_eq!(
            expander.expand(&object, &Path::from("inner.size")),
            vec![&Value::from(7)]
        );
    }

    #[test]
    fn nested_arrays_flatten_in_order() {
        let expander = ValueExpander::new(AttributeResolver);
        let object = nested();
        let values = expander.expand(&object, &Path::from("grid.v"));
        assert_eq!(values, vec![&Value::from(1), &Value::from(2), &Value::from(3)]);
    }

    #[test]
    fn null_and_absent_yield_nothing() {
        let expander = ValueExpander::new(AttributeResolver);
        let object = nested();
        assert!(expander.expand(&object, &Path::from("missing")).is_empty());
        assert!(expander.expand(&object, &Path::from("nope.deeper")).is_empty());
        assert!(expander.expand(&object, &Path::from("name.length")).is_empty());
    }

    #[test]
    fn mappings_are_yielded_whole() {
        let expander = ValueExpander::new(AttributeResolver);
        let object = nested();
        let values = expander.expand(&object, &Path::from("tags.owner"));
        assert_eq!(values.len(), 1);
        assert!(matches!(values[0], Value::Map(_)));
    }

    #[test]
    fn lowercase_resolver_folds_segment() {
        let expander = ValueExpander::new(LowercaseAttributeResolver);
        let object = nested();
        assert_eq!(
            expander.expand(&object, &Path::from("Inner.SIZE")),
            vec![&Value::from(7)]
        );
    }

    #[test]
    fn key_resolver_reads_maps_only() {
        let expander = ValueExpander::new(KeyResolver);
        let record = nested();
        assert!(expander.expand(&record, &Path::from("name")).is_empty());

        let map = Value::map([("name", Value::from("m"))]);
        assert_eq!(expander.expand(&map, &Path::from("name")), vec![&Value::from("m")]);
    }
}
