//! # Object Filter Query Language - Abstract Syntax Tree
//!
//! This module defines the lexical vocabulary and the Abstract Syntax Tree (AST)
//! of the query language, a compact condition language for selecting records
//! by attribute paths.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical states, lexer actions and the ordered token-rule table
//! - **[expressions]** - AST nodes (identity, basic, binary, context)
//! - **[operators]** - Comparison operator kinds and boolean connectives
//!
//! ## Quick Start
//!
//! ```text
//! color is "grey" and doors >= 3
//! ```
//!
//! This query keeps records whose `color` attribute equals `"grey"` and whose
//! `doors` attribute is at least 3.
//!
//! ## Core Concepts
//!
//! ### Terms
//!
//! Every term is `attribute-path [not] operator argument`. The path is a dotted
//! list of names; the argument is an integer (`3`, `0x1f`), a float (`1.5`) or a
//! quoted string (`"grey"`, `'grey'`).
//!
//! ### Precedence
//!
//! `and` binds tighter than `or`; parentheses group:
//!
//! ```text
//! a is 1 and b is 2 or c is 3      // (a is 1 and b is 2) or c is 3
//! a is 1 and (b is 2 or c is 3)
//! ```
//!
//! ### Contexts
//!
//! `@path(...)` requires every clause inside to hold for the *same* element
//! reached through `path`:
//!
//! ```text
//! @imported_dlls(name is "RegQueryValueEx" and num_functions is 1)
//! ```
pub mod expressions;
pub mod operators;
pub mod tokens;

pub use expressions::{BasicExpression, BinaryExpression, ContextExpression, Expression};
pub use operators::{BinOp, OperatorKind};
pub use tokens::{Action, Scope, State, TokenRule, TOKENS};
