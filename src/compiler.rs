use std::collections::HashMap;

use crate::{
    ast::{BinOp, Expression, OperatorKind},
    error::{CompileError, Error},
    evaluator::{ComparisonFilter, ContextFilter, Filter},
    expander::{
        AttributeResolver, KeyResolver, LowercaseAttributeResolver, Path, Resolve, ValueExpander,
    },
    parser,
};

/// Operator table plus the resolution strategy used to compile queries.
///
/// # Examples
///
/// ```
/// use objfilter::{OperatorKind, Registry};
///
/// let mut registry = Registry::keyed();
/// registry.register("matches", OperatorKind::Regexp);
/// assert_eq!(registry.operator("MATCHES"), Some(OperatorKind::Regexp));
/// assert_eq!(registry.expander().resolver_name(), "key");
/// ```
#[derive(Debug, Clone)]
pub struct Registry {
    operators: HashMap<String, OperatorKind>,
    expander: ValueExpander,
}

impl Registry {
    /// An empty operator table over the given strategy.
    pub fn new<R: Resolve + 'static>(resolver: R) -> Self {
        Registry {
            operators: HashMap::new(),
            expander: ValueExpander::new(resolver),
        }
    }

    /// Binds every default operator spelling.
    pub fn with_default_operators(mut self) -> Self {
        for &(name, operator) in OperatorKind::DEFAULT_NAMES {
            self.register(name, operator);
        }
        self
    }

    /// Default operators over exact-case attribute lookup.
    pub fn attribute() -> Self {
        Registry::new(AttributeResolver).with_default_operators()
    }

    /// Default operators over lowercased attribute lookup.
    pub fn lowercase_attribute() -> Self {
        Registry::new(LowercaseAttributeResolver).with_default_operators()
    }

    /// Default operators over keyed-container lookup.
    pub fn keyed() -> Self {
        Registry::new(KeyResolver).with_default_operators()
    }

    /// Adds or replaces an operator alias.
    pub fn register(&mut self, name: &str, operator: OperatorKind) -> &mut Self {
        self.operators.insert(name.to_lowercase(), operator);
        self
    }

    /// Looks an operator spelling up, ignoring case.
    pub fn operator(&self, name: &str) -> Option<OperatorKind> {
        self.operators.get(&name.to_lowercase()).copied()
    }

    pub fn expander(&self) -> &ValueExpander {
        &self.expander
    }
}

impl Default for Registry {
    fn default() -> Self {
        Registry::attribute()
    }
}

impl Expression {
    /// Turns the AST into an evaluation tree.
    pub fn compile(&self, registry: &Registry) -> Result<Filter, CompileError> {
        match self {
            Expression::Identity => Ok(Filter::Identity),

            Expression::Basic(basic) => {
                let (Some(attribute), Some(name)) = (&basic.attribute, &basic.operator) else {
                    return Err(CompileError::Incomplete(self.to_string()));
                };
                let operator = registry
                    .operator(name)
                    .ok_or_else(|| CompileError::UnknownOperator(name.clone()))?;
                let [arg] = basic.args.as_slice() else {
                    return Err(CompileError::OperandCount {
                        node: "comparison",
                        expected: 1,
                        received: basic.args.len(),
                    });
                };

                let mut filter = Filter::Comparison(ComparisonFilter::new(
                    operator,
                    Path::from(attribute.as_str()),
                    arg.clone(),
                    registry.expander().clone(),
                )?);
                if basic.negated && !filter.flip() {
                    log::warn!("{operator} cannot be negated, ignoring 'not'");
                }
                Ok(filter)
            }

            Expression::Binary(binary) => {
                let op = BinOp::from_name(&binary.operator)
                    .ok_or_else(|| CompileError::InvalidBinaryOperator(binary.operator.clone()))?;
                let [lhs, rhs] = binary.operands.as_slice() else {
                    return Err(CompileError::OperandCount {
                        node: "binary",
                        expected: 2,
                        received: binary.operands.len(),
                    });
                };

                let children = vec![lhs.compile(registry)?, rhs.compile(registry)?];
                Ok(match op {
                    BinOp::And => Filter::And(children),
                    BinOp::Or => Filter::Or(children),
                })
            }

            Expression::Context(context) => {
                let inner = context.inner.as_deref().ok_or(CompileError::OperandCount {
                    node: "context",
                    expected: 1,
                    received: 0,
                })?;
                Ok(Filter::Context(ContextFilter::new(
                    Path::from(context.attribute.as_str()),
                    inner.compile(registry)?,
                    registry.expander().clone(),
                )))
            }
        }
    }
}

/// Parses and compiles a query in one step.
///
/// # Examples
///
/// ```
/// use objfilter::{Registry, Value, compile};
///
/// let filter = compile("color is \"grey\" and doors >= 3", &Registry::default()).unwrap();
/// let car = Value::object([("color", Value::from("grey")), ("doors", Value::from(5))]);
/// assert!(filter.matches(&car));
/// ```
pub fn compile(query: &str, registry: &Registry) -> Result<Filter, Error> {
    let expression = parser::parse(query)?;
    Ok(expression.compile(registry)?)
}
