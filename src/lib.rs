//! Object filter query language.
//!
//! Queries such as `color is "grey" and doors >= 3` are parsed into an
//! [`Expression`], compiled against a [`Registry`] into an immutable
//! [`Filter`], and matched against [`Value`] trees.
//!
//! ```
//! use objfilter::{Registry, Value, compile};
//!
//! let filter = compile("@tyres(brand is \"AVON\" and pressure > 2.0)", &Registry::default()).unwrap();
//! let car = Value::object([(
//!     "tyres",
//!     Value::Array(vec![
//!         Value::object([("brand", Value::from("AVON")), ("pressure", Value::from(2.4))]),
//!         Value::object([("brand", Value::from("PIRELLI")), ("pressure", Value::from(1.9))]),
//!     ]),
//! )]);
//! assert!(filter.matches(&car));
//! ```

pub mod ast;
#[cfg(feature = "cli")]
pub mod cli;
pub mod compiler;
pub mod error;
pub mod evaluator;
pub mod expander;
pub mod lexer;
pub mod parser;
pub mod value;

pub use ast::{BinOp, Expression, OperatorKind};
pub use compiler::{Registry, compile};
pub use error::{CompileError, Error, ParseError, ParseErrorKind};
pub use evaluator::{Filter, Outcome};
pub use expander::{Path, Resolve, ValueExpander};
pub use lexer::Lexer;
pub use parser::{Parser, parse};
pub use value::Value;
