use std::{fmt, sync::LazyLock};

use regex::Regex;

/// Lexical state of the query lexer.
///
/// Every token rule is scoped to the state(s) in which it may fire; the rule's
/// actions and its declared next state drive the transitions between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// Start of an expression, or right after `and` / `or` / `(`.
    Initial,
    /// After `@name`, waiting for the opening bracket of the context.
    ContextOpen,
    /// Inside a double-quoted string.
    String,
    /// Inside a single-quoted string.
    SqString,
    /// Reading the attribute path of a basic expression.
    Attribute,
    /// Reading the comparison operator (or a leading `not`).
    Operator,
    /// After the operator, where a trailing `not` may still appear.
    CheckNot,
    /// Reading the argument literal.
    Arg,
    /// After a complete expression, where `and` / `or` may appear.
    Binary,
}

impl State {
    pub fn name(self) -> &'static str {
        match self {
            State::Initial => "INITIAL",
            State::ContextOpen => "CONTEXTOPEN",
            State::String => "STRING",
            State::SqString => "SQ_STRING",
            State::Attribute => "ATTRIBUTE",
            State::Operator => "OPERATOR",
            State::CheckNot => "CHECKNOT",
            State::Arg => "ARG",
            State::Binary => "BINARY",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// States in which a token rule is tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// The catch-all scope; used for skipping whitespace everywhere.
    Any,
    In(State),
}

impl Scope {
    pub fn admits(self, state: State) -> bool {
        match self {
            Scope::Any => true,
            Scope::In(s) => s == state,
        }
    }
}

/// Action executed when a token rule matches.
///
/// Lexer-side actions (`PushState`, `PopState`, `PushBack`) are handled by the
/// lexer itself, everything else is forwarded to the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    PushState,
    PopState,
    PushBack,
    ContextOperator,
    BracketOpen,
    BracketClose,
    StringStart,
    StringInsert,
    StringFinish,
    HexEscape,
    StringEscape,
    StoreAttribute,
    StoreOperator,
    FlipLogic,
    InsertFloatArg,
    InsertInt16Arg,
    InsertIntArg,
    BinaryOperator,
}

/// A single lexer rule.
///
/// Rules are tried in declaration order. The first one whose scope admits the
/// current state and whose pattern matches at the start of the remaining input
/// wins.
#[derive(Debug)]
pub struct TokenRule {
    pub scope: Scope,
    pub source: &'static str,
    pub pattern: Regex,
    pub actions: &'static [Action],
    pub next_state: Option<State>,
}

impl TokenRule {
    fn new(
        scope: Scope,
        source: &'static str,
        actions: &'static [Action],
        next_state: Option<State>,
    ) -> Self {
        // Anchored, case-insensitive, and `.` also matches newlines.
        let pattern = Regex::new(&format!(r"(?is)\A(?:{source})")).expect("valid token regex");
        TokenRule {
            scope,
            source,
            pattern,
            actions,
            next_state,
        }
    }
}

/// The token table shared by every parser.
pub static TOKENS: LazyLock<Vec<TokenRule>> = LazyLock::new(|| {
    use Action::*;
    use Scope::{Any, In};
    use State::*;

    vec![
        // Context, attribute start and brackets
        TokenRule::new(In(Initial), r"@[\w.]+", &[ContextOperator, PushState], Some(ContextOpen)),
        TokenRule::new(In(Initial), r"[^\s()]", &[PushState, PushBack], Some(Attribute)),
        TokenRule::new(In(Initial), r"\(", &[PushState, BracketOpen], None),
        TokenRule::new(In(Initial), r"\)", &[BracketClose], Some(Binary)),
        TokenRule::new(In(ContextOpen), r"\(", &[BracketOpen], Some(Initial)),
        // Double quoted string
        TokenRule::new(In(String), r#"""#, &[PopState, StringFinish], None),
        TokenRule::new(In(String), r"\\x(..)", &[HexEscape], None),
        TokenRule::new(In(String), r"\\(.)", &[StringEscape], None),
        TokenRule::new(In(String), r#"[^\\"]+"#, &[StringInsert], None),
        // Single quoted string
        TokenRule::new(In(SqString), r"'", &[PopState, StringFinish], None),
        TokenRule::new(In(SqString), r"\\x(..)", &[HexEscape], None),
        TokenRule::new(In(SqString), r"\\(.)", &[StringEscape], None),
        TokenRule::new(In(SqString), r"[^\\']+", &[StringInsert], None),
        // Attribute path, bare or quoted
        TokenRule::new(In(Attribute), r"[\w.]+", &[StoreAttribute], Some(Operator)),
        TokenRule::new(In(Attribute), r#"""#, &[PushState, StringStart], Some(String)),
        TokenRule::new(In(Attribute), r"'", &[PushState, StringStart], Some(SqString)),
        // Operator, with an optional `not` on either side
        TokenRule::new(In(Operator), r"not ", &[FlipLogic], None),
        TokenRule::new(In(Operator), r"(\w+|[<>!=]=?)", &[StoreOperator], Some(CheckNot)),
        TokenRule::new(In(CheckNot), r"not", &[FlipLogic], Some(Arg)),
        TokenRule::new(In(CheckNot), r"\s+", &[], None),
        TokenRule::new(In(CheckNot), r"[^not]", &[PushBack], Some(Arg)),
        // Arguments
        TokenRule::new(In(Arg), r"\d+\.\d+", &[InsertFloatArg], Some(Arg)),
        TokenRule::new(In(Arg), r"0x[0-9a-f]+", &[InsertInt16Arg], Some(Arg)),
        TokenRule::new(In(Arg), r"\d+", &[InsertIntArg], Some(Arg)),
        TokenRule::new(In(Arg), r#"""#, &[PushState, StringStart], Some(String)),
        TokenRule::new(In(Arg), r"'", &[PushState, StringStart], Some(SqString)),
        // Binary operators; anything else goes back to the enclosing state
        TokenRule::new(In(Binary), r"(?:and|or)\b|&&|\|\|", &[BinaryOperator], Some(Initial)),
        TokenRule::new(In(Binary), r"\s+", &[], None),
        TokenRule::new(In(Binary), r".", &[PushBack, PopState], None),
        // Skip whitespace
        TokenRule::new(Any, r"\s+", &[], None),
    ]
});
