//! Run object filter queries against JSON input

use super::{CliError, ObjectModel, json_to_value, value_to_json};
use crate::{Registry, compile};

/// Resolution strategy selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExpanderKind {
    /// Exact-case attribute lookup
    #[default]
    Attribute,
    /// Attribute lookup with lowercased path segments
    Lowercase,
    /// Keyed lookup; JSON objects become maps
    Key,
}

impl ExpanderKind {
    pub fn registry(self) -> Registry {
        match self {
            ExpanderKind::Attribute => Registry::attribute(),
            ExpanderKind::Lowercase => Registry::lowercase_attribute(),
            ExpanderKind::Key => Registry::keyed(),
        }
    }

    pub fn object_model(self) -> ObjectModel {
        match self {
            ExpanderKind::Attribute | ExpanderKind::Lowercase => ObjectModel::Record,
            ExpanderKind::Key => ObjectModel::Map,
        }
    }
}

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The query to run
    pub query: String,
    /// JSON input string
    pub input: Option<String>,
    /// Pretty-print the output
    pub pretty: bool,
    /// Only parse and compile, don't filter
    pub syntax_only: bool,
    pub expander: ExpanderKind,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Query compiled; carries the rendered filter tree
    SyntaxValid(String),
    /// Records that matched, as a JSON array
    Success(serde_json::Value),
}

/// Execute a check operation
///
/// An input array is filtered element by element; any other document is
/// treated as a single record.
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let registry = options.expander.registry();
    let filter = compile(&options.query, &registry)?;
    log::debug!("compiled filter {filter}");

    if options.syntax_only {
        return Ok(CheckResult::SyntaxValid(filter.to_string()));
    }

    let json_str = options.input.as_ref().ok_or(CliError::NoInput)?;
    let json_value: serde_json::Value = serde_json::from_str(json_str)?;

    let records = match json_to_value(json_value, options.expander.object_model()) {
        crate::Value::Array(items) => items,
        other => vec![other],
    };

    let matches = filter.filter(&records).map(value_to_json).collect();
    Ok(CheckResult::Success(serde_json::Value::Array(matches)))
}
