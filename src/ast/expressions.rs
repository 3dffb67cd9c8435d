use std::fmt;

use crate::{error::ParseErrorKind, value::Value};

/// Abstract Syntax Tree node produced by the parser.
///
/// Binary and context nodes are created empty while they sit on the parse
/// stack and are filled by the reducer; an expression is *complete* once all
/// of its parts are present. Only complete expressions leave the parser.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Matches everything; produced for an empty query.
    Identity,

    /// Comparison of an attribute path against a literal
    ///
    /// # Example
    /// ```text
    /// color is "grey"
    /// ```
    Basic(BasicExpression),

    /// Two expressions joined by `and` / `or`
    ///
    /// # Example
    /// ```text
    /// color is "grey" and doors >= 3
    /// ```
    Binary(BinaryExpression),

    /// Expression evaluated against each element reached by a path
    ///
    /// # Example
    /// ```text
    /// @imported_dlls(name is "x" and num_functions is 1)
    /// ```
    Context(ContextExpression),
}

impl Expression {
    pub fn is_complete(&self) -> bool {
        match self {
            Expression::Identity => true,
            Expression::Basic(basic) => basic.is_complete(),
            Expression::Binary(binary) => binary.operands.len() == 2,
            Expression::Context(context) => context.inner.is_some(),
        }
    }
}

/// `attribute [not] operator argument`
#[derive(Debug, Clone, PartialEq)]
pub struct BasicExpression {
    pub attribute: Option<String>,
    pub operator: Option<String>,
    pub args: Vec<Value>,
    pub number_of_args: usize,
    /// Set by `not`
    pub negated: bool,
}

impl Default for BasicExpression {
    fn default() -> Self {
        BasicExpression {
            attribute: None,
            operator: None,
            args: Vec::new(),
            number_of_args: 1,
            negated: false,
        }
    }
}

impl BasicExpression {
    pub fn new(attribute: impl Into<String>, operator: impl Into<String>, arg: Value) -> Self {
        BasicExpression {
            attribute: Some(attribute.into()),
            operator: Some(operator.into()),
            args: vec![arg],
            ..Default::default()
        }
    }

    pub fn negate(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    /// Records an argument; returns `true` once the expression has all of them.
    pub fn add_arg(&mut self, arg: Value) -> Result<bool, ParseErrorKind> {
        self.args.push(arg);
        if self.args.len() > self.number_of_args {
            return Err(ParseErrorKind::TooManyArguments);
        }
        Ok(self.args.len() == self.number_of_args)
    }

    pub fn is_complete(&self) -> bool {
        self.attribute.is_some() && self.operator.is_some() && self.args.len() == self.number_of_args
    }
}

/// `lhs and rhs`, `lhs or rhs`
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    /// Operator as written (`and`, `AND`, `&&`, ...)
    pub operator: String,
    pub operands: Vec<Expression>,
}

impl BinaryExpression {
    /// Creates a binary expression still waiting for its operands.
    pub fn pending(operator: impl Into<String>) -> Self {
        BinaryExpression {
            operator: operator.into(),
            operands: Vec::new(),
        }
    }

    pub fn new(operator: impl Into<String>, lhs: Expression, rhs: Expression) -> Self {
        BinaryExpression {
            operator: operator.into(),
            operands: vec![lhs, rhs],
        }
    }

    pub fn is_pending(&self) -> bool {
        self.operands.is_empty()
    }

    pub fn add_operands(&mut self, lhs: Expression, rhs: Expression) -> Result<(), ParseErrorKind> {
        if !lhs.is_complete() {
            return Err(ParseErrorKind::NotAnExpression("left hand side"));
        }
        if !rhs.is_complete() {
            return Err(ParseErrorKind::NotAnExpression("right hand side"));
        }
        self.operands = vec![lhs, rhs];
        Ok(())
    }
}

/// `@attribute(inner)`
#[derive(Debug, Clone, PartialEq)]
pub struct ContextExpression {
    pub attribute: String,
    pub inner: Option<Box<Expression>>,
}

impl ContextExpression {
    pub fn pending(attribute: impl Into<String>) -> Self {
        ContextExpression {
            attribute: attribute.into(),
            inner: None,
        }
    }

    pub fn new(attribute: impl Into<String>, inner: Expression) -> Self {
        ContextExpression {
            attribute: attribute.into(),
            inner: Some(Box::new(inner)),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.inner.is_none()
    }

    pub fn set_expression(&mut self, expression: Expression) -> Result<(), ParseErrorKind> {
        if !expression.is_complete() {
            return Err(ParseErrorKind::NotAnExpression("context body"));
        }
        self.inner = Some(Box::new(expression));
        Ok(())
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identity => f.write_str("Identity"),
            Expression::Basic(basic) => {
                let attribute = basic.attribute.as_deref().unwrap_or("?");
                let operator = basic.operator.as_deref().unwrap_or("?");
                let not = if basic.negated { "not " } else { "" };
                write!(f, "{attribute} {not}{operator}")?;
                for arg in &basic.args {
                    write!(f, " {arg}")?;
                }
                Ok(())
            }
            Expression::Binary(binary) => match binary.operands.as_slice() {
                [lhs, rhs] => write!(f, "({lhs} {} {rhs})", binary.operator),
                _ => write!(f, "({})", binary.operator),
            },
            Expression::Context(context) => match &context.inner {
                Some(inner) => write!(f, "@{}({inner})", context.attribute),
                None => write!(f, "@{}", context.attribute),
            },
        }
    }
}
