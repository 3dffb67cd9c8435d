use crate::{
    ast::{Action, State, TOKENS, TokenRule},
    error::{ParseError, ParseErrorKind},
};

/// Text matched by a token rule.
#[derive(Debug, Clone, Copy)]
pub struct Lexeme<'q> {
    /// The whole match
    pub text: &'q str,
    /// First capture group, if the rule has one
    pub group: Option<&'q str>,
}

/// Receiver of the parser-side actions fired by token rules.
///
/// `state` is the lexer state at the time the action runs, which already
/// reflects any `PopState` earlier in the same rule. Returning a state
/// overrides the rule's declared next state.
pub trait Actions {
    fn apply(
        &mut self,
        action: Action,
        lexeme: Lexeme<'_>,
        state: State,
    ) -> Result<Option<State>, ParseErrorKind>;
}

/// Regex-driven lexer over a query string.
///
/// The lexer keeps a cursor into the input: everything before it has been
/// processed, everything after it is the remaining buffer.
pub struct Lexer<'q> {
    input: &'q str,
    position: usize,
    state: State,
    state_stack: Vec<State>,
}

impl<'q> Lexer<'q> {
    pub fn new(input: &'q str) -> Self {
        Lexer {
            input,
            position: 0,
            state: State::Initial,
            state_stack: Vec::new(),
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_empty(&self) -> bool {
        self.position >= self.input.len()
    }

    pub fn processed(&self) -> &'q str {
        &self.input[..self.position]
    }

    pub fn remaining(&self) -> &'q str {
        &self.input[self.position..]
    }

    /// Builds an error carrying the current processed/remaining split.
    pub fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError {
            kind,
            position: self.position,
            processed: self.processed().to_string(),
            remaining: self.remaining().to_string(),
        }
    }

    /// Consumes one token and runs its actions.
    ///
    /// When no rule matches, one character is skipped so that the lexer
    /// always makes progress, and the lexical error is returned.
    pub fn next_token<A: Actions>(&mut self, actions: &mut A) -> Result<&'static TokenRule, ParseError> {
        let current = self.state;
        let remaining = self.remaining();

        for rule in TOKENS.iter() {
            if !rule.scope.admits(current) {
                continue;
            }
            let Some(captures) = rule.pattern.captures(remaining) else {
                continue;
            };
            let Some(whole) = captures.get(0) else {
                continue;
            };
            let lexeme = Lexeme {
                text: whole.as_str(),
                group: captures.get(1).map(|m| m.as_str()),
            };
            log::trace!("{current}: matched {:?} with /{}/", lexeme.text, rule.source);

            self.position += lexeme.text.len();

            let mut next_state = rule.next_state;
            for &action in rule.actions {
                let outcome = match action {
                    Action::PushState => {
                        self.push_state();
                        None
                    }
                    Action::PopState => Some(self.pop_state()?),
                    Action::PushBack => {
                        self.push_back(lexeme.text);
                        None
                    }
                    other => actions
                        .apply(other, lexeme, self.state)
                        .map_err(|kind| self.error(kind))?,
                };
                if let Some(state) = outcome {
                    next_state = Some(state);
                }
            }

            if let Some(state) = next_state {
                self.state = state;
            }
            return Ok(rule);
        }

        let error = self.error(ParseErrorKind::UnexpectedInput(current));
        if let Some(ch) = remaining.chars().next() {
            self.position += ch.len_utf8();
        }
        Err(error)
    }

    fn push_state(&mut self) {
        log::debug!("storing state {}", self.state);
        self.state_stack.push(self.state);
    }

    fn pop_state(&mut self) -> Result<State, ParseError> {
        match self.state_stack.pop() {
            Some(state) => {
                log::debug!("returned state to {state}");
                self.state = state;
                Ok(state)
            }
            None => Err(self.error(ParseErrorKind::StateUnderflow)),
        }
    }

    /// Puts the matched text back in front of the remaining input.
    fn push_back(&mut self, text: &str) {
        self.position -= text.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        fired: Vec<(Action, String)>,
    }

    impl Actions for Recorder {
        fn apply(
            &mut self,
            action: Action,
            lexeme: Lexeme<'_>,
            _state: State,
        ) -> Result<Option<State>, ParseErrorKind> {
            self.fired.push((action, lexeme.text.to_string()));
            Ok(None)
        }
    }

    #[test]
    fn push_back_rewinds_cursor() {
        let mut lexer = Lexer::new("a is 1");
        let mut recorder = Recorder::default();
        lexer.next_token(&mut recorder).unwrap();
        assert_eq!(lexer.state(), State::Attribute);
        assert_eq!(lexer.remaining(), "a is 1");
    }

    #[test]
    fn unmatched_input_skips_one_char() {
        let mut lexer = Lexer::new("a is ?");
        let mut recorder = Recorder::default();
        let error = loop {
            if let Err(error) = lexer.next_token(&mut recorder) {
                break error;
            }
        };
        assert_eq!(error.kind, ParseErrorKind::UnexpectedInput(State::Arg));
        assert_eq!(error.remaining, "?");
        assert!(lexer.is_empty());
    }
}
