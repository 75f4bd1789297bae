use serde::Serialize;
use std::fmt;

/// The kind of lexeme a token was produced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenType {
    Whitespace,
    Colon,
    BracketOpen,
    BracketClose,
    ParenOpen,
    ParenClose,
    Equals,
    Comma,
    GreaterThan,
    String,
    Number,
    Identifier,
}

impl TokenType {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenType::Whitespace => "whitespace",
            TokenType::Colon => "colon",
            TokenType::BracketOpen => "bracket-open",
            TokenType::BracketClose => "bracket-close",
            TokenType::ParenOpen => "paren-open",
            TokenType::ParenClose => "paren-close",
            TokenType::Equals => "equals",
            TokenType::Comma => "comma",
            TokenType::GreaterThan => "greater-than",
            TokenType::String => "string",
            TokenType::Number => "number",
            TokenType::Identifier => "identifier",
        }
    }

    /// Tokens that can stand on the right-hand side of `key=` or inside `eq(...)`.
    pub fn is_value(self) -> bool {
        matches!(
            self,
            TokenType::String | TokenType::Number | TokenType::Identifier
        )
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single lexeme. For quoted strings `text` holds the unescaped contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    #[serde(rename = "type")]
    token_type: TokenType,
    text: String,
    position: usize,
}

impl Token {
    pub fn new(token_type: TokenType, text: impl Into<String>, position: usize) -> Self {
        Self {
            token_type,
            text: text.into(),
            position,
        }
    }

    pub fn token_type(&self) -> TokenType {
        self.token_type
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Character offset of the first character of the lexeme.
    pub fn position(&self) -> usize {
        self.position
    }
}

/// Tokens in the order they appeared in the selector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn last(&self) -> Option<&Token> {
        self.tokens.last()
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
