use std::mem;

use crate::{
    ast::{
        Action, BasicExpression, BinOp, BinaryExpression, ContextExpression, Expression, State,
        operators::is_negatable,
    },
    error::{ParseError, ParseErrorKind},
    lexer::{Actions, Lexeme, Lexer},
    value::Value,
};

/// An entry of the parse stack.
#[derive(Debug, Clone, PartialEq)]
enum StackItem {
    Expression(Expression),
    Open,
    Close,
}

impl StackItem {
    fn is_complete_expression(&self) -> bool {
        matches!(self, StackItem::Expression(e) if e.is_complete())
    }

    fn is_pending_context(&self) -> bool {
        matches!(self, StackItem::Expression(Expression::Context(c)) if c.is_pending())
    }
}

/// Everything the lexer actions accumulate while a query is parsed.
#[derive(Debug, Default)]
struct ParseState {
    stack: Vec<StackItem>,
    /// Expression being assembled from attribute, operator and arguments
    current: BasicExpression,
    /// Quoted string being assembled; `Some` only between the quotes
    string: Option<String>,
    /// Whether `not` was seen for the current expression
    flipped: bool,
}

impl ParseState {
    fn store_attribute(&mut self, attribute: String) -> Option<State> {
        log::debug!("storing attribute {attribute:?}");
        self.flipped = false;
        self.current.attribute = Some(attribute);
        Some(State::Operator)
    }

    fn insert_arg(&mut self, arg: Value) -> Result<Option<State>, ParseErrorKind> {
        log::debug!("storing argument {arg}");
        self.flip_allowed()?;

        if self.current.add_arg(arg)? {
            let complete = mem::take(&mut self.current);
            self.stack.push(StackItem::Expression(Expression::Basic(complete)));
            // Look for a following `and` / `or`
            return Ok(Some(State::Binary));
        }
        Ok(None)
    }

    fn flip_allowed(&self) -> Result<(), ParseErrorKind> {
        if !self.flipped {
            return Ok(());
        }
        match &self.current.operator {
            Some(operator) if !is_negatable(operator) => {
                Err(ParseErrorKind::NotUnsupported(operator.clone()))
            }
            _ => Ok(()),
        }
    }

    fn flip_logic(&mut self) -> Result<(), ParseErrorKind> {
        if self.flipped {
            return Err(ParseErrorKind::RepeatedNot);
        }
        if !self.current.args.is_empty() {
            return Err(ParseErrorKind::NotAfterArgument);
        }
        self.flipped = true;
        self.flip_allowed()?;

        self.current.negated = !self.current.negated;
        log::debug!("negative matching, flipping boolean logic");
        Ok(())
    }

    fn string_mut(&mut self) -> &mut String {
        self.string.get_or_insert_with(String::new)
    }

    fn hex_escape(&mut self, lexeme: Lexeme<'_>) -> Result<(), ParseErrorKind> {
        let invalid = || ParseErrorKind::InvalidHexEscape(lexeme.text.to_string());
        let digits = lexeme.group.ok_or_else(invalid)?;
        let byte = u8::from_str_radix(digits, 16).map_err(|_| invalid())?;
        let decoded = std::str::from_utf8(&[byte]).map_err(|_| invalid())?.to_string();
        self.string_mut().push_str(&decoded);
        Ok(())
    }

    fn string_escape(&mut self, lexeme: Lexeme<'_>) -> Result<(), ParseErrorKind> {
        let invalid = || ParseErrorKind::InvalidEscape(lexeme.text.to_string());
        let mut chars = lexeme.group.ok_or_else(invalid)?.chars();
        let escaped = match chars.next().ok_or_else(invalid)? {
            c @ ('\\' | '\'' | '"') => c.to_string(),
            'r' => "\r".to_string(),
            'n' => "\n".to_string(),
            'b' => "\u{8}".to_string(),
            't' => "\t".to_string(),
            // Regex classes survive with their backslash
            c @ ('.' | 'w' | 's') => format!("\\{c}"),
            _ => return Err(invalid()),
        };
        self.string_mut().push_str(&escaped);
        Ok(())
    }

    fn string_finish(&mut self, state: State) -> Result<Option<State>, ParseErrorKind> {
        let string = self.string.take().unwrap_or_default();
        match state {
            State::Attribute => Ok(self.store_attribute(string)),
            State::Arg => self.insert_arg(Value::String(string)),
            _ => Ok(None),
        }
    }
}

fn parse_number<T>(text: &str, parse: impl FnOnce(&str) -> Option<T>) -> Result<T, ParseErrorKind> {
    parse(text).ok_or_else(|| ParseErrorKind::InvalidNumber(text.to_string()))
}

/// Integer literal of any length.
///
/// Values past the `i128` range degrade to the nearest float.
fn integer_literal(digits: &str, radix: u32) -> Option<Value> {
    if let Ok(n) = i128::from_str_radix(digits, radix) {
        return Some(Value::Integer(n));
    }
    let mut n = 0.0_f64;
    for c in digits.chars() {
        n = n * f64::from(radix) + f64::from(c.to_digit(radix)?);
    }
    (!digits.is_empty()).then_some(Value::Float(n))
}

impl Actions for ParseState {
    fn apply(
        &mut self,
        action: Action,
        lexeme: Lexeme<'_>,
        state: State,
    ) -> Result<Option<State>, ParseErrorKind> {
        let text = lexeme.text;
        match action {
            // Handled by the lexer
            Action::PushState | Action::PopState | Action::PushBack => Ok(None),
            Action::ContextOperator => {
                let attribute = text.strip_prefix('@').unwrap_or(text);
                self.stack.push(StackItem::Expression(Expression::Context(
                    ContextExpression::pending(attribute),
                )));
                Ok(None)
            }
            Action::BracketOpen => {
                self.stack.push(StackItem::Open);
                Ok(None)
            }
            Action::BracketClose => {
                self.stack.push(StackItem::Close);
                Ok(None)
            }
            Action::StringStart => {
                self.string = Some(String::new());
                Ok(None)
            }
            Action::StringInsert => {
                self.string_mut().push_str(text);
                Ok(None)
            }
            Action::HexEscape => self.hex_escape(lexeme).map(|_| None),
            Action::StringEscape => self.string_escape(lexeme).map(|_| None),
            Action::StringFinish => self.string_finish(state),
            Action::StoreAttribute => Ok(self.store_attribute(text.to_string())),
            Action::StoreOperator => {
                log::debug!("storing operator {text:?}");
                self.current.operator = Some(text.to_string());
                Ok(None)
            }
            Action::FlipLogic => self.flip_logic().map(|_| None),
            Action::InsertFloatArg => {
                let n = parse_number(text, |t| t.parse::<f64>().ok())?;
                self.insert_arg(Value::Float(n))
            }
            Action::InsertInt16Arg => {
                let n = parse_number(text, |t| integer_literal(t.get(2..)?, 16))?;
                self.insert_arg(n)
            }
            Action::InsertIntArg => {
                let n = parse_number(text, |t| integer_literal(t, 10))?;
                self.insert_arg(n)
            }
            Action::BinaryOperator => {
                self.stack.push(StackItem::Expression(Expression::Binary(
                    BinaryExpression::pending(text),
                )));
                Ok(None)
            }
        }
    }
}

/// Parser for query strings.
///
/// A parser is single-use: [`Parser::parse`] consumes it.
///
/// # Examples
///
/// ```
/// use objfilter::{Expression, Parser};
///
/// let ast = Parser::new("color is \"grey\" and doors >= 3").parse().unwrap();
/// assert!(matches!(ast, Expression::Binary(_)));
/// ```
pub struct Parser<'q> {
    lexer: Lexer<'q>,
    state: ParseState,
}

impl<'q> Parser<'q> {
    pub fn new(query: &'q str) -> Self {
        Parser {
            lexer: Lexer::new(query),
            state: ParseState::default(),
        }
    }

    /// Parses the whole query into a single expression.
    ///
    /// An empty (or whitespace-only) query yields [`Expression::Identity`].
    pub fn parse(mut self) -> Result<Expression, ParseError> {
        if self.lexer.remaining().trim().is_empty() {
            return Ok(Expression::Identity);
        }

        self.close()?;
        self.reduce()
    }

    /// Runs the lexer until the input is exhausted.
    fn close(&mut self) -> Result<(), ParseError> {
        while !self.lexer.is_empty() {
            self.lexer.next_token(&mut self.state)?;
        }
        Ok(())
    }

    /// Folds the parse stack into a single expression.
    fn reduce(&mut self) -> Result<Expression, ParseError> {
        if !matches!(self.lexer.state(), State::Initial | State::Binary) {
            return Err(self.lexer.error(ParseErrorKind::PrematureEnd));
        }

        let mut length = self.state.stack.len();
        while length > 1 {
            // Precedence order
            self.combine_parenthesis();
            self.combine_binary(BinOp::And)
                .map_err(|kind| self.lexer.error(kind))?;
            self.combine_binary(BinOp::Or)
                .map_err(|kind| self.lexer.error(kind))?;
            self.combine_context()
                .map_err(|kind| self.lexer.error(kind))?;

            if self.state.stack.len() == length {
                break;
            }
            length = self.state.stack.len();
        }

        match self.state.stack.pop() {
            Some(StackItem::Expression(expression))
                if self.state.stack.is_empty() && expression.is_complete() =>
            {
                Ok(expression)
            }
            _ => Err(self.lexer.error(ParseErrorKind::IllegalExpression)),
        }
    }

    /// `( expr )` becomes `expr`.
    fn combine_parenthesis(&mut self) {
        let stack = mem::take(&mut self.state.stack);
        let mut reduced = Vec::with_capacity(stack.len());
        let mut items = stack.into_iter();

        while let Some(item) = items.next() {
            reduced.push(item);
            let n = reduced.len();
            if n >= 3
                && reduced[n - 3] == StackItem::Open
                && reduced[n - 2].is_complete_expression()
                && reduced[n - 1] == StackItem::Close
            {
                reduced.pop();
                let expression = reduced.pop();
                reduced.pop();
                reduced.extend(expression);
                // The collapsed expression must not join a following triple
                if let Some(next) = items.next() {
                    reduced.push(next);
                }
            }
        }
        self.state.stack = reduced;
    }

    /// `lhs OP rhs` becomes a filled binary expression, left to right.
    fn combine_binary(&mut self, class: BinOp) -> Result<(), ParseErrorKind> {
        let mut slots: Vec<Option<StackItem>> =
            mem::take(&mut self.state.stack).into_iter().map(Some).collect();

        for i in 1..slots.len().saturating_sub(1) {
            let pending = matches!(
                &slots[i],
                Some(StackItem::Expression(Expression::Binary(b)))
                    if b.is_pending() && BinOp::from_name(&b.operator) == Some(class)
            );
            let complete = |slot: &Option<StackItem>| {
                slot.as_ref().is_some_and(StackItem::is_complete_expression)
            };
            // An expression right after an unattached context belongs to it
            let claimed = i >= 2
                && slots[i - 2]
                    .as_ref()
                    .is_some_and(StackItem::is_pending_context);

            if !pending || claimed || !complete(&slots[i - 1]) || !complete(&slots[i + 1]) {
                continue;
            }

            let (Some(StackItem::Expression(lhs)), Some(StackItem::Expression(rhs))) =
                (slots[i - 1].take(), slots[i + 1].take())
            else {
                continue;
            };
            if let Some(StackItem::Expression(Expression::Binary(binary))) = &mut slots[i] {
                binary.add_operands(lhs, rhs)?;
            }
        }

        self.state.stack = slots.into_iter().flatten().collect();
        Ok(())
    }

    /// `@ctx expr` attaches `expr` to the context.
    ///
    /// Runs after the binary passes, which leave an expression directly
    /// after a pending context alone. So in `@a(x is 1) and y is 2` the
    /// context takes only `x is 1`, and the `and` joins the finished
    /// context with `y is 2` on the next pass.
    fn combine_context(&mut self) -> Result<(), ParseErrorKind> {
        let mut slots: Vec<Option<StackItem>> =
            mem::take(&mut self.state.stack).into_iter().map(Some).collect();

        for i in (1..slots.len()).rev() {
            let attach = slots[i - 1]
                .as_ref()
                .is_some_and(StackItem::is_pending_context)
                && slots[i]
                    .as_ref()
                    .is_some_and(StackItem::is_complete_expression);
            if !attach {
                continue;
            }
            let Some(StackItem::Expression(expression)) = slots[i].take() else {
                continue;
            };
            if let Some(StackItem::Expression(Expression::Context(context))) = &mut slots[i - 1] {
                context.set_expression(expression)?;
            }
        }

        self.state.stack = slots.into_iter().flatten().collect();
        Ok(())
    }
}

/// Parses a query string.
pub fn parse(query: &str) -> Result<Expression, ParseError> {
    Parser::new(query).parse()
}
