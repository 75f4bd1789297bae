use crate::selector::errors::SelectorError;
use crate::selector::filter::{Filter, PseudoSpec};
use crate::selector::handler::{default_handlers, TokenHandler};
use crate::selector::reader::SourceReader;
use crate::selector::token::{Token, TokenStream, TokenType};
use std::collections::BTreeMap;

/// Turns selector text such as `operator[name=equal]:first` into a [`Filter`].
///
/// # Grammar
///
/// ```text
/// selector := [ ">" ] kind [ "[" param { "," param } "]" ] { ":" pseudo }
/// param    := identifier "=" value
/// pseudo   := identifier [ "(" value ")" ]
/// value    := identifier | number | quoted-string
/// ```
///
/// A leading `>` restricts matching to the nodes handed to the finder
/// instead of searching their descendants too.
pub struct SelectorParser {
    handlers: Vec<Box<dyn TokenHandler>>,
}

impl SelectorParser {
    pub fn new() -> Self {
        Self {
            handlers: default_handlers(),
        }
    }

    /// Use a custom handler chain. Order is priority order.
    pub fn with_handlers(handlers: Vec<Box<dyn TokenHandler>>) -> Self {
        Self { handlers }
    }

    /// Split selector text into tokens.
    pub fn tokenize(&self, input: &str) -> Result<TokenStream, SelectorError> {
        let mut reader = SourceReader::new(input);
        let mut stream = TokenStream::new();

        while !reader.at_end() {
            let accepted = self
                .handlers
                .iter()
                .any(|handler| handler.handle(&mut reader, &mut stream));

            if !accepted {
                return Err(SelectorError::Lexical {
                    character: reader.current().unwrap_or_default(),
                    position: reader.position(),
                });
            }
        }

        Ok(stream)
    }

    /// Parse selector text into a filter descriptor.
    pub fn parse(&self, input: &str) -> Result<Filter, SelectorError> {
        let stream = self.tokenize(input)?;
        log::trace!("selector {input:?} tokenized into {} tokens", stream.len());
        FilterBuilder::new(&stream, input.chars().count()).run()
    }
}

impl Default for SelectorParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse with the default handler chain.
pub fn parse_selector(input: &str) -> Result<Filter, SelectorError> {
    SelectorParser::new().parse(input)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ReadingNodeKind,
    ReadingParam,
    ReadingPseudo,
    Done,
}

struct FilterBuilder<'s> {
    tokens: Vec<&'s Token>,
    index: usize,
    end: usize,
    traverse_children: bool,
    node_kind: String,
    params: BTreeMap<String, String>,
    pseudo: Vec<PseudoSpec>,
}

impl<'s> FilterBuilder<'s> {
    fn new(stream: &'s TokenStream, end: usize) -> Self {
        Self {
            tokens: stream
                .iter()
                .filter(|t| t.token_type() != TokenType::Whitespace)
                .collect(),
            index: 0,
            end,
            traverse_children: true,
            node_kind: String::new(),
            params: BTreeMap::new(),
            pseudo: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Filter, SelectorError> {
        let mut state = State::ReadingNodeKind;
        while state != State::Done {
            state = match state {
                State::ReadingNodeKind => self.read_node_kind()?,
                State::ReadingParam => self.read_params()?,
                State::ReadingPseudo => self.read_pseudo()?,
                State::Done => State::Done,
            };
        }

        Ok(Filter {
            node_kind: self.node_kind,
            params: self.params,
            traverse_children: self.traverse_children,
            pseudo: self.pseudo,
        })
    }

    fn peek(&self) -> Option<&'s Token> {
        self.tokens.get(self.index).copied()
    }

    fn bump(&mut self) -> Option<&'s Token> {
        let token = self.peek();
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    fn expect(&mut self, token_type: TokenType, what: &str) -> Result<&'s Token, SelectorError> {
        match self.bump() {
            Some(token) if token.token_type() == token_type => Ok(token),
            Some(token) => Err(unexpected(token, what)),
            None => Err(SelectorError::malformed(
                self.end,
                format!("expected {what}, found end of selector"),
            )),
        }
    }

    fn expect_value(&mut self, what: &str) -> Result<&'s Token, SelectorError> {
        match self.bump() {
            Some(token) if token.token_type().is_value() => Ok(token),
            Some(token) => Err(unexpected(token, what)),
            None => Err(SelectorError::malformed(
                self.end,
                format!("expected {what}, found end of selector"),
            )),
        }
    }

    fn read_node_kind(&mut self) -> Result<State, SelectorError> {
        if self.peek().is_none() {
            return Err(SelectorError::malformed(0, "empty selector"));
        }
        if self.peek().map(Token::token_type) == Some(TokenType::GreaterThan) {
            self.bump();
            self.traverse_children = false;
        }

        let kind = self.expect(TokenType::Identifier, "a node kind")?;
        self.node_kind = kind.text().to_string();

        match self.peek() {
            Some(token) if token.token_type() == TokenType::BracketOpen => Ok(State::ReadingParam),
            _ => self.after_section(),
        }
    }

    fn read_params(&mut self) -> Result<State, SelectorError> {
        let open = self.expect(TokenType::BracketOpen, "'['")?;

        loop {
            let key = self.expect(TokenType::Identifier, "a parameter name")?;
            self.expect(TokenType::Equals, "'=' after parameter name")?;
            let value = self.expect_value("a parameter value")?;

            if self.params.contains_key(key.text()) {
                return Err(SelectorError::malformed(
                    key.position(),
                    format!("duplicate parameter '{}'", key.text()),
                ));
            }
            self.params
                .insert(key.text().to_string(), value.text().to_string());

            match self.bump() {
                Some(token) if token.token_type() == TokenType::Comma => continue,
                Some(token) if token.token_type() == TokenType::BracketClose => break,
                Some(token) => return Err(unexpected(token, "',' or ']'")),
                None => {
                    return Err(SelectorError::malformed(
                        open.position(),
                        "unterminated '['",
                    ))
                }
            }
        }

        self.after_section()
    }

    fn read_pseudo(&mut self) -> Result<State, SelectorError> {
        self.expect(TokenType::Colon, "':'")?;
        let name = self.expect(TokenType::Identifier, "a pseudo-filter name after ':'")?;

        let spec = match self.peek() {
            Some(open) if open.token_type() == TokenType::ParenOpen => {
                self.bump();
                let arg = self.expect_value("a pseudo-filter argument")?;
                match self.bump() {
                    Some(token) if token.token_type() == TokenType::ParenClose => {}
                    Some(token) => return Err(unexpected(token, "')'")),
                    None => {
                        return Err(SelectorError::malformed(
                            open.position(),
                            "unterminated '('",
                        ))
                    }
                }
                PseudoSpec::with_arg(name.text(), arg.text())
            }
            _ => PseudoSpec::new(name.text()),
        };
        self.pseudo.push(spec);

        self.after_section()
    }

    /// After a kind, a parameter block or a pseudo-filter only more
    /// pseudo-filters may follow.
    fn after_section(&self) -> Result<State, SelectorError> {
        match self.peek() {
            None => Ok(State::Done),
            Some(token) if token.token_type() == TokenType::Colon => Ok(State::ReadingPseudo),
            Some(token) => Err(unexpected(token, "':' or end of selector")),
        }
    }
}

fn unexpected(token: &Token, expected: &str) -> SelectorError {
    SelectorError::malformed(
        token.position(),
        format!(
            "expected {expected}, found {} '{}'",
            token.token_type(),
            token.text()
        ),
    )
}
