use std::fmt;

use regex::{Regex, RegexBuilder};

use crate::{
    ast::OperatorKind,
    error::CompileError,
    expander::{Path, ValueExpander},
    value::Value,
};

/// Result of testing one candidate value against a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Match,
    NoMatch,
    /// The two values cannot be compared (e.g. text against a number).
    /// Treated exactly like [`Outcome::NoMatch`].
    Incomparable,
}

impl Outcome {
    pub fn is_match(self) -> bool {
        self == Outcome::Match
    }
}

impl From<bool> for Outcome {
    fn from(b: bool) -> Self {
        if b { Outcome::Match } else { Outcome::NoMatch }
    }
}

impl From<Option<bool>> for Outcome {
    fn from(b: Option<bool>) -> Self {
        b.map_or(Outcome::Incomparable, Outcome::from)
    }
}

/// Compiled predicate tested against a filter's literal.
#[derive(Debug, Clone)]
enum Predicate {
    Equals,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Contains,
    InSet,
    Regexp(Regex),
}

impl Predicate {
    fn test(&self, x: &Value, y: &Value) -> Outcome {
        use std::cmp::Ordering::*;

        match self {
            Predicate::Equals => x.equals(y).into(),
            Predicate::Less => x.compare(y).map(|o| o == Less).into(),
            Predicate::LessEqual => x.compare(y).map(|o| o != Greater).into(),
            Predicate::Greater => x.compare(y).map(|o| o == Greater).into(),
            Predicate::GreaterEqual => x.compare(y).map(|o| o != Less).into(),
            Predicate::Contains => contains(x, y),
            Predicate::InSet => in_set(x, y),
            Predicate::Regexp(regex) => x.to_text().map(|text| regex.is_match(&text)).into(),
        }
    }
}

/// Whether `item` is a member of `container`.
///
/// Text containers test for substrings, arrays for an equal element and maps
/// for a key. `None` when membership is undefined for the pair.
fn membership(container: &Value, item: &Value) -> Option<bool> {
    match (container, item) {
        (Value::String(haystack), Value::String(needle)) => Some(haystack.contains(needle.as_str())),
        (Value::String(_), _) => None,
        (Value::Bytes(haystack), Value::Bytes(needle)) => Some(
            needle.is_empty() || haystack.windows(needle.len()).any(|w| w == needle.as_slice()),
        ),
        (Value::Bytes(haystack), Value::Integer(n)) => {
            Some(u8::try_from(*n).is_ok_and(|byte| haystack.contains(&byte)))
        }
        (Value::Bytes(_), _) => None,
        (Value::Array(items), _) => Some(items.iter().any(|candidate| candidate.equals(item))),
        (Value::Map(entries), Value::String(key)) => Some(entries.contains_key(key)),
        (Value::Map(_), _) => Some(false),
        _ => None,
    }
}

/// `contains`: case-insensitive substring on text, membership otherwise.
fn contains(x: &Value, y: &Value) -> Outcome {
    match (x, y) {
        (Value::String(text), Value::String(needle)) => {
            text.to_lowercase().contains(&needle.to_lowercase()).into()
        }
        (Value::String(_), _) => Outcome::Incomparable,
        _ => membership(x, y).into(),
    }
}

/// `inset`: `x` is in `y`, or every element of a non-text `x` is.
fn in_set(x: &Value, y: &Value) -> Outcome {
    match membership(y, x) {
        None => Outcome::Incomparable,
        Some(true) => Outcome::Match,
        Some(false) => match x {
            Value::Array(items) => items
                .iter()
                .all(|item| membership(y, item) == Some(true))
                .into(),
            Value::Map(entries) => entries
                .keys()
                .all(|key| membership(y, &Value::String(key.clone())) == Some(true))
                .into(),
            _ => Outcome::NoMatch,
        },
    }
}

/// A comparison between the values at a path and a literal.
///
/// The filter matches when **any** expanded value satisfies the predicate.
/// Negation flips what is returned, so `not` on a path with no values
/// matches, and so does `!=`.
#[derive(Debug, Clone)]
pub struct ComparisonFilter {
    operator: OperatorKind,
    left: Path,
    right: Value,
    predicate: Predicate,
    bool_value: bool,
    expander: ValueExpander,
}

impl ComparisonFilter {
    /// Builds a comparison node.
    ///
    /// Regular-expression literals are compiled here, so a malformed pattern
    /// fails before any object is matched.
    pub fn new(
        operator: OperatorKind,
        left: impl Into<Path>,
        right: Value,
        expander: ValueExpander,
    ) -> Result<Self, CompileError> {
        let predicate = match operator {
            OperatorKind::Equals | OperatorKind::NotEquals => Predicate::Equals,
            OperatorKind::Less => Predicate::Less,
            OperatorKind::LessEqual => Predicate::LessEqual,
            OperatorKind::Greater => Predicate::Greater,
            OperatorKind::GreaterEqual => Predicate::GreaterEqual,
            OperatorKind::Contains => Predicate::Contains,
            OperatorKind::InSet => Predicate::InSet,
            OperatorKind::Regexp | OperatorKind::RegexpInsensitive => {
                let pattern = right
                    .to_text()
                    .ok_or_else(|| CompileError::NonTextPattern(right.to_string()))?;
                let regex = RegexBuilder::new(&pattern)
                    .dot_matches_new_line(true)
                    .case_insensitive(operator == OperatorKind::RegexpInsensitive)
                    .build()
                    .map_err(|source| CompileError::MalformedRegex {
                        pattern: pattern.clone(),
                        source,
                    })?;
                log::debug!("compiled {pattern:?}");
                Predicate::Regexp(regex)
            }
        };

        Ok(ComparisonFilter {
            operator,
            left: left.into(),
            right,
            predicate,
            bool_value: operator != OperatorKind::NotEquals,
            expander,
        })
    }

    pub fn operator(&self) -> OperatorKind {
        self.operator
    }

    /// Whether this node currently matches in the negative sense.
    pub fn is_negated(&self) -> bool {
        self.bool_value == (self.operator == OperatorKind::NotEquals)
    }

    pub fn flip(&mut self) {
        log::debug!("negative matching");
        self.bool_value = !self.bool_value;
    }

    pub fn matches(&self, object: &Value) -> bool {
        let values = self.expander.expand(object, &self.left);
        let hit = values.iter().any(|value| {
            let outcome = self.predicate.test(value, &self.right);
            if outcome == Outcome::Incomparable {
                log::trace!(
                    "{} cannot compare {} with {}",
                    self.operator,
                    value.type_name(),
                    self.right.type_name()
                );
            }
            outcome.is_match()
        });
        if hit { self.bool_value } else { !self.bool_value }
    }
}

/// Runs a condition against each element reached through a path.
///
/// Every clause of the condition must hold for the *same* element, which
/// keeps independent facts about sibling elements from combining into a
/// false positive.
#[derive(Debug, Clone)]
pub struct ContextFilter {
    path: Path,
    condition: Box<Filter>,
    expander: ValueExpander,
}

impl ContextFilter {
    pub fn new(path: impl Into<Path>, condition: Filter, expander: ValueExpander) -> Self {
        ContextFilter {
            path: path.into(),
            condition: Box::new(condition),
            expander,
        }
    }

    pub fn matches(&self, object: &Value) -> bool {
        self.expander
            .expand(object, &self.path)
            .into_iter()
            .any(|value| match value {
                Value::Array(items) => items.iter().any(|item| self.condition.matches(item)),
                other => self.condition.matches(other),
            })
    }
}

/// Compiled, immutable evaluation tree.
///
/// A filter never fails: absent attributes and incomparable values simply do
/// not match. It can be shared freely between threads.
#[derive(Debug, Clone)]
pub enum Filter {
    /// Always matches
    Identity,
    /// All children match (true when empty)
    And(Vec<Filter>),
    /// Any child matches (also true when empty)
    Or(Vec<Filter>),
    Context(ContextFilter),
    Comparison(ComparisonFilter),
}

impl Filter {
    pub fn matches(&self, object: &Value) -> bool {
        match self {
            Filter::Identity => true,
            Filter::And(children) => children.iter().all(|child| child.matches(object)),
            Filter::Or(children) => {
                children.is_empty() || children.iter().any(|child| child.matches(object))
            }
            Filter::Context(context) => context.matches(object),
            Filter::Comparison(comparison) => comparison.matches(object),
        }
    }

    /// Lazily yields the objects that match.
    ///
    /// # Examples
    ///
    /// ```
    /// use objfilter::{Registry, Value, compile};
    ///
    /// let fleet = vec![
    ///     Value::object([("doors", Value::from(3))]),
    ///     Value::object([("doors", Value::from(5))]),
    /// ];
    /// let filter = compile("doors > 4", &Registry::default()).unwrap();
    /// let matching: Vec<_> = filter.filter(&fleet).collect();
    /// assert_eq!(matching, vec![&fleet[1]]);
    /// ```
    pub fn filter<'a, I>(&'a self, objects: I) -> impl Iterator<Item = &'a Value> + 'a
    where
        I: IntoIterator<Item = &'a Value>,
        I::IntoIter: 'a,
    {
        objects.into_iter().filter(move |object| self.matches(object))
    }

    /// Negates the node. Returns `false` when the node has no negated form.
    pub fn flip(&mut self) -> bool {
        match self {
            Filter::Comparison(comparison) => {
                comparison.flip();
                true
            }
            _ => false,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn children(f: &mut fmt::Formatter<'_>, name: &str, items: &[Filter]) -> fmt::Result {
            write!(f, "{name}(")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{item}")?;
            }
            f.write_str(")")
        }

        match self {
            Filter::Identity => f.write_str("Identity()"),
            Filter::And(items) => children(f, "And", items),
            Filter::Or(items) => children(f, "Or", items),
            Filter::Context(context) => write!(f, "Context({}, {})", context.path, context.condition),
            Filter::Comparison(c) if c.is_negated() => {
                write!(f, "Not({}({}, {}))", c.operator, c.left, c.right)
            }
            Filter::Comparison(c) => write!(f, "{}({}, {})", c.operator, c.left, c.right),
        }
    }
}
