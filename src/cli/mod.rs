//! CLI support for objfilter
//!
//! Provides programmatic access to the `objfilter` commands so they can be
//! embedded in other tools.

mod check;
mod convert;
mod docs;

pub use check::{CheckOptions, CheckResult, ExpanderKind, execute_check};
pub use convert::{ObjectModel, json_to_value, value_to_json};
pub use docs::{DocCategory, get_doc_category, get_docs_overview};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Parse error: {0}")]
    Parse(#[from] crate::ParseError),

    #[error("Compile error: {0}")]
    Compile(#[from] crate::CompileError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No input provided. Use --input or pipe JSON to stdin.")]
    NoInput,

    #[error("Unknown category: '{0}'\nRun 'objfilter docs' to see available categories.")]
    UnknownCategory(String),
}

impl From<crate::Error> for CliError {
    fn from(e: crate::Error) -> Self {
        match e {
            crate::Error::Parse(e) => CliError::Parse(e),
            crate::Error::Compile(e) => CliError::Compile(e),
        }
    }
}
