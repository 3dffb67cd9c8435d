//! Errors raised while parsing and compiling queries.
//!
//! Evaluation never fails: absent attributes and incomparable values simply
//! do not match, so there is no evaluation error type.

use thiserror::Error;

use crate::ast::State;

/// What went wrong while lexing or parsing a query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// No token rule matches in the current lexer state.
    #[error("expected {0}")]
    UnexpectedInput(State),

    #[error("too many arguments for this expression")]
    TooManyArguments,

    #[error("{0} is not a complete expression")]
    NotAnExpression(&'static str),

    #[error("the operator 'not' can only be expressed once")]
    RepeatedNot,

    #[error("unable to place the keyword 'not' after an argument")]
    NotAfterArgument,

    #[error("keyword 'not' does not work against operator: {0}")]
    NotUnsupported(String),

    #[error("invalid hex escape {0}")]
    InvalidHexEscape(String),

    #[error("invalid escape character {0}")]
    InvalidEscape(String),

    #[error("{0} is not a valid number")]
    InvalidNumber(String),

    #[error("tried to pop the state but failed - possible recursion or parenthesis mismatch")]
    StateUnderflow,

    #[error("premature end of expression")]
    PrematureEnd,

    #[error("illegal query expression")]
    IllegalExpression,
}

/// A failed parse, with the split between consumed and unconsumed input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at position {position}: {processed} <----> {remaining}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Byte offset into the query at which the failure was detected
    pub position: usize,
    pub processed: String,
    pub remaining: String,
}

impl ParseError {
    /// Whether no token rule matched, as opposed to a grammar or literal error.
    pub fn is_lexical(&self) -> bool {
        matches!(self.kind, ParseErrorKind::UnexpectedInput(_))
    }
}

/// Errors raised while turning an AST into a filter tree.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("unknown operator {0} provided")]
    UnknownOperator(String),

    #[error("invalid binary operator {0}")]
    InvalidBinaryOperator(String),

    #[error("regular expression {pattern:?} is malformed")]
    MalformedRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("regular expression operand {0} has no text form")]
    NonTextPattern(String),

    #[error("{node} accepts {expected} operands, received {received}")]
    OperandCount {
        node: &'static str,
        expected: usize,
        received: usize,
    },

    #[error("expression is incomplete: {0}")]
    Incomplete(String),
}

/// Any error raised by [`crate::compile`].
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Compile(#[from] CompileError),
}
