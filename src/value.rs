use std::{cmp::Ordering, collections::HashMap, fmt};

use rust_decimal::{Decimal, prelude::FromPrimitive};

/// A candidate object, or any value reachable inside one.
///
/// Filters never see host types directly; records are described as a `Value`
/// tree and resolution strategies decide how a path segment is looked up.
///
/// # Records versus mappings
///
/// - **`Object`** is a record with named attributes (the analogue of a struct's
///   field table). Attribute strategies resolve names against it.
/// - **`Map`** is a keyed container. The key strategy resolves names against it,
///   and path expansion yields it whole instead of descending into it.
///
/// # Examples
///
/// ```
/// use objfilter::Value;
///
/// let car = Value::object([
///     ("color", Value::from("grey")),
///     ("doors", Value::from(3)),
/// ]);
/// let tags = Value::map([("owner", Value::from("fleet"))]);
/// let fleet = Value::Array(vec![car, tags]);
/// assert_eq!(fleet.type_name(), "array");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value; a name bound to `Null` contributes nothing when expanded
    Null,

    Boolean(bool),

    /// Floating-point number
    Float(f64),

    /// Integer number (kept apart from floats); wide enough for any
    /// unsigned 64-bit mask
    Integer(i128),

    /// UTF-8 text
    String(String),

    /// Raw bytes
    Bytes(Vec<u8>),

    /// Ordered collection; paths fan out across its elements
    Array(Vec<Value>),

    /// Keyed container (dictionary)
    Map(HashMap<String, Value>),

    /// Record with named attributes
    Object(HashMap<String, Value>),
}

impl Value {
    /// Builds an attribute record.
    pub fn object<K, I>(attributes: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Object(attributes.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Builds a keyed container.
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Returns a human-readable type name
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
            Value::Object(_) => "object",
        }
    }

    /// Get as float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Text form used by regular-expression operators.
    ///
    /// Integers render in decimal, bytes are decoded with invalid sequences
    /// dropped and arrays are the concatenation of their elements. Anything
    /// else has no text form.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Value::String(s) => Some(s.clone()),
            Value::Integer(n) => Some(n.to_string()),
            Value::Bytes(bytes) => Some(bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()),
            Value::Array(items) => items.iter().map(Value::to_text).collect(),
            _ => None,
        }
    }

    /// Equality as used by the `==` family of operators.
    ///
    /// Integers and floats compare by numeric value; all other values only
    /// equal values of the same type.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Integer(_) | Value::Float(_), Value::Integer(_) | Value::Float(_)) => {
                self.compare(other) == Some(Ordering::Equal)
            }
            (Value::Array(a), Value::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.equals(y))
            }
            (Value::Map(a), Value::Map(b)) | (Value::Object(a), Value::Object(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(k, v)| b.get(k).is_some_and(|w| v.equals(w)))
            }
            _ => self == other,
        }
    }

    /// Ordering as used by `<`, `<=`, `>` and `>=`.
    ///
    /// Returns `None` when the two values are incomparable (different types,
    /// NaN, mappings, records).
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Integer(a), Value::Float(b)) => compare_mixed(*a, *b),
            (Value::Float(a), Value::Integer(b)) => compare_mixed(*b, *a).map(Ordering::reverse),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Bytes(a), Value::Bytes(b)) => Some(a.cmp(b)),
            (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
            (Value::Array(a), Value::Array(b)) => {
                for (x, y) in a.iter().zip(b) {
                    if x.equals(y) {
                        continue;
                    }
                    return x.compare(y);
                }
                Some(a.len().cmp(&b.len()))
            }
            _ => None,
        }
    }
}

/// Compares an integer with a float without losing precision on large integers.
fn compare_mixed(int: i128, float: f64) -> Option<Ordering> {
    if let Some(id) = Decimal::from_i128(int)
        && let Some(fd) = Decimal::from_f64(float)
    {
        return Some(id.cmp(&fd));
    }
    (int as f64).partial_cmp(&float)
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n.into())
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Integer(n.into())
    }
}

impl From<i128> for Value {
    fn from(n: i128) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n.into())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n:?}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Bytes(bytes) => write!(f, "b{:?}", String::from_utf8_lossy(bytes)),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Map(_) => f.write_str("{map}"),
            Value::Object(_) => f.write_str("{object}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_and_floats_compare_numerically() {
        assert!(Value::Integer(3).equals(&Value::Float(3.0)));
        assert_eq!(
            Value::Float(2.5).compare(&Value::Integer(3)),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn large_integers_keep_precision() {
        let big = Value::Integer(9_007_199_254_740_993);
        assert_eq!(
            big.compare(&Value::Float(9_007_199_254_740_992.0)),
            Some(Ordering::Greater)
        );
    }

    #[test]
    fn text_and_numbers_are_incomparable() {
        assert_eq!(Value::from("3").compare(&Value::Integer(3)), None);
        assert!(!Value::from("3").equals(&Value::Integer(3)));
    }

    #[test]
    fn nan_is_incomparable() {
        assert_eq!(Value::Float(f64::NAN).compare(&Value::Float(1.0)), None);
    }

    #[test]
    fn unsigned_masks_compare_exactly() {
        let mask = Value::from(u64::MAX);
        assert!(mask.equals(&Value::Integer(0xffff_ffff_ffff_ffff)));
        assert_eq!(mask.compare(&Value::from(i64::MAX)), Some(Ordering::Greater));
        assert_eq!(
            mask.compare(&Value::Float(18_446_744_073_709_551_616.0)),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn bytes_text_drops_invalid_sequences() {
        assert_eq!(Value::Bytes(b"a\xffb".to_vec()).to_text().as_deref(), Some("ab"));
    }

    #[test]
    fn text_form() {
        assert_eq!(Value::Integer(42).to_text().as_deref(), Some("42"));
        assert_eq!(
            Value::Array(vec![Value::from("ab"), Value::Integer(1)]).to_text().as_deref(),
            Some("ab1")
        );
        assert_eq!(Value::Boolean(true).to_text(), None);
    }
}
