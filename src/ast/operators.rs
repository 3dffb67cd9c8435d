use std::fmt;

/// Comparison operators available to basic expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    /// Equal (`is`, `equals`, `==`)
    Equals,
    /// Not equal (`!=`)
    NotEquals,
    /// Less than (`<`)
    Less,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than (`>`)
    Greater,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Case-insensitive substring, or element membership (`contains`)
    Contains,
    /// Value (or every element of it) is a member of the literal (`inset`)
    InSet,
    /// Regular expression search (`regexp`)
    Regexp,
    /// Case-insensitive regular expression search (`iregexp`)
    RegexpInsensitive,
}

impl OperatorKind {
    /// Default spellings, as bound by the stock registries.
    pub const DEFAULT_NAMES: &'static [(&'static str, OperatorKind)] = &[
        ("equals", OperatorKind::Equals),
        ("is", OperatorKind::Equals),
        ("==", OperatorKind::Equals),
        ("!=", OperatorKind::NotEquals),
        ("contains", OperatorKind::Contains),
        (">", OperatorKind::Greater),
        (">=", OperatorKind::GreaterEqual),
        ("<", OperatorKind::Less),
        ("<=", OperatorKind::LessEqual),
        ("inset", OperatorKind::InSet),
        ("regexp", OperatorKind::Regexp),
        ("iregexp", OperatorKind::RegexpInsensitive),
    ];

    pub fn name(self) -> &'static str {
        match self {
            OperatorKind::Equals => "Equals",
            OperatorKind::NotEquals => "NotEquals",
            OperatorKind::Less => "Less",
            OperatorKind::LessEqual => "LessEqual",
            OperatorKind::Greater => "Greater",
            OperatorKind::GreaterEqual => "GreaterEqual",
            OperatorKind::Contains => "Contains",
            OperatorKind::InSet => "InSet",
            OperatorKind::Regexp => "Regexp",
            OperatorKind::RegexpInsensitive => "RegexpInsensitive",
        }
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Operator spellings that accept a `not`.
///
/// Flipping anything else (`<`, `regexp`, ...) would not be a clean negation.
pub const NEGATABLE: &[&str] = &["is", "contains", "inset", "equals"];

pub fn is_negatable(operator: &str) -> bool {
    let operator = operator.to_lowercase();
    NEGATABLE.contains(&operator.as_str())
}

/// Boolean connectives joining two expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    /// `and` / `&&`
    And,
    /// `or` / `||`
    Or,
}

impl BinOp {
    /// Resolves a connective spelling, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "and" | "&&" => Some(BinOp::And),
            "or" | "||" => Some(BinOp::Or),
            _ => None,
        }
    }
}
