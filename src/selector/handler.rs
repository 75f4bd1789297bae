//! Lexical recognisers for selector text.
//!
//! Each handler recognises one kind of lexeme. The parser asks them in a
//! fixed priority order and the first one that accepts the current position
//! wins. A handler that declines must leave the reader where it found it.

use crate::selector::reader::SourceReader;
use crate::selector::token::{Token, TokenStream, TokenType};

pub trait TokenHandler: Send + Sync {
    /// The token type this handler produces.
    fn token_type(&self) -> TokenType;

    /// Consume one lexeme at the reader's position, or return `None` and
    /// leave the reader unchanged.
    fn try_consume(&self, reader: &mut SourceReader) -> Option<Token>;

    /// Consume one lexeme and append it to `stream`.
    ///
    /// Returns `false` (touching neither reader nor stream) when the current
    /// position does not belong to this handler.
    fn handle(&self, reader: &mut SourceReader, stream: &mut TokenStream) -> bool {
        match self.try_consume(reader) {
            Some(token) => {
                stream.push(token);
                true
            }
            None => false,
        }
    }
}

/// Runs of whitespace. Emitted so positions stay honest; the parser skips them.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceHandler;

impl TokenHandler for WhitespaceHandler {
    fn token_type(&self) -> TokenType {
        TokenType::Whitespace
    }

    fn try_consume(&self, reader: &mut SourceReader) -> Option<Token> {
        let start = reader.position();
        let mut text = String::new();
        while let Some(ch) = reader.current().filter(|c| c.is_whitespace()) {
            text.push(ch);
            reader.advance(1);
        }
        if text.is_empty() {
            return None;
        }
        Some(Token::new(TokenType::Whitespace, text, start))
    }
}

/// A single punctuation character such as `:` or `[`.
#[derive(Debug, Clone, Copy)]
pub struct SymbolHandler {
    symbol: char,
    token_type: TokenType,
}

impl SymbolHandler {
    pub const fn new(symbol: char, token_type: TokenType) -> Self {
        Self { symbol, token_type }
    }

    pub const fn colon() -> Self {
        Self::new(':', TokenType::Colon)
    }

    pub const fn bracket_open() -> Self {
        Self::new('[', TokenType::BracketOpen)
    }

    pub const fn bracket_close() -> Self {
        Self::new(']', TokenType::BracketClose)
    }

    pub const fn paren_open() -> Self {
        Self::new('(', TokenType::ParenOpen)
    }

    pub const fn paren_close() -> Self {
        Self::new(')', TokenType::ParenClose)
    }

    pub const fn equals() -> Self {
        Self::new('=', TokenType::Equals)
    }

    pub const fn comma() -> Self {
        Self::new(',', TokenType::Comma)
    }

    pub const fn greater_than() -> Self {
        Self::new('>', TokenType::GreaterThan)
    }

    pub fn symbol(&self) -> char {
        self.symbol
    }
}

impl TokenHandler for SymbolHandler {
    fn token_type(&self) -> TokenType {
        self.token_type
    }

    fn try_consume(&self, reader: &mut SourceReader) -> Option<Token> {
        if reader.current() != Some(self.symbol) {
            return None;
        }
        let token = Token::new(self.token_type, self.symbol.to_string(), reader.position());
        reader.advance(1);
        Some(token)
    }
}

/// Single or double quoted values with backslash escapes.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringHandler;

impl TokenHandler for StringHandler {
    fn token_type(&self) -> TokenType {
        TokenType::String
    }

    fn try_consume(&self, reader: &mut SourceReader) -> Option<Token> {
        let quote = reader.current().filter(|c| *c == '"' || *c == '\'')?;
        let start = reader.position();
        let mut text = String::new();
        reader.advance(1);

        while let Some(ch) = reader.current() {
            match ch {
                c if c == quote => {
                    reader.advance(1);
                    return Some(Token::new(TokenType::String, text, start));
                }
                '\\' => {
                    let escaped = match reader.peek(1) {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some(other) => other,
                        None => break,
                    };
                    text.push(escaped);
                    reader.advance(2);
                }
                other => {
                    text.push(other);
                    reader.advance(1);
                }
            }
        }

        // Unterminated: not ours.
        reader.reset(start);
        None
    }
}

/// Unsigned or negative integers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberHandler;

impl TokenHandler for NumberHandler {
    fn token_type(&self) -> TokenType {
        TokenType::Number
    }

    fn try_consume(&self, reader: &mut SourceReader) -> Option<Token> {
        let start = reader.position();
        let negative = reader.current() == Some('-');
        let first_digit = if negative { reader.peek(1) } else { reader.current() };
        if !first_digit.is_some_and(|c| c.is_ascii_digit()) {
            return None;
        }

        let mut text = String::new();
        if negative {
            text.push('-');
            reader.advance(1);
        }
        while let Some(ch) = reader.current().filter(char::is_ascii_digit) {
            text.push(ch);
            reader.advance(1);
        }
        Some(Token::new(TokenType::Number, text, start))
    }
}

/// Names: `[A-Za-z_][A-Za-z0-9_-]*`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentifierHandler;

impl IdentifierHandler {
    fn is_start(ch: char) -> bool {
        ch.is_ascii_alphabetic() || ch == '_'
    }

    fn is_continue(ch: char) -> bool {
        ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'
    }
}

impl TokenHandler for IdentifierHandler {
    fn token_type(&self) -> TokenType {
        TokenType::Identifier
    }

    fn try_consume(&self, reader: &mut SourceReader) -> Option<Token> {
        let start = reader.position();
        reader.current().filter(|c| Self::is_start(*c))?;

        let mut text = String::new();
        while let Some(ch) = reader.current().filter(|c| Self::is_continue(*c)) {
            text.push(ch);
            reader.advance(1);
        }
        Some(Token::new(TokenType::Identifier, text, start))
    }
}

/// The handler chain in priority order.
pub fn default_handlers() -> Vec<Box<dyn TokenHandler>> {
    vec![
        Box::new(WhitespaceHandler),
        Box::new(SymbolHandler::colon()),
        Box::new(SymbolHandler::bracket_open()),
        Box::new(SymbolHandler::bracket_close()),
        Box::new(SymbolHandler::paren_open()),
        Box::new(SymbolHandler::paren_close()),
        Box::new(SymbolHandler::equals()),
        Box::new(SymbolHandler::comma()),
        Box::new(SymbolHandler::greater_than()),
        Box::new(StringHandler),
        Box::new(NumberHandler),
        Box::new(IdentifierHandler),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colon_handler_type() {
        assert_eq!(SymbolHandler::colon().token_type(), TokenType::Colon);
        assert_eq!(SymbolHandler::colon().token_type().as_str(), "colon");
    }

    #[test]
    fn colon_handler_can_handle() {
        let mut reader = SourceReader::new(":");
        let mut stream = TokenStream::new();
        assert!(SymbolHandler::colon().handle(&mut reader, &mut stream));
        assert!(reader.at_end());
        assert_eq!(stream.len(), 1);
    }

    #[test]
    fn colon_handler_cannot_handle() {
        let mut reader = SourceReader::new("d");
        let mut stream = TokenStream::new();
        assert!(!SymbolHandler::colon().handle(&mut reader, &mut stream));
        assert_eq!(reader.position(), 0);
        assert!(stream.is_empty());
    }

    #[test]
    fn identifier_allows_dashes_after_first_char() {
        let mut reader = SourceReader::new("encapsed-string[");
        let token = IdentifierHandler.try_consume(&mut reader).unwrap();
        assert_eq!(token.text(), "encapsed-string");
        assert_eq!(reader.current(), Some('['));

        let mut reader = SourceReader::new("-x");
        assert!(IdentifierHandler.try_consume(&mut reader).is_none());
    }

    #[test]
    fn string_unescapes_and_reports_start() {
        let mut reader = SourceReader::new(r#"x="a\"b""#);
        reader.advance(2);
        let token = StringHandler.try_consume(&mut reader).unwrap();
        assert_eq!(token.text(), "a\"b");
        assert_eq!(token.position(), 2);
        assert!(reader.at_end());
    }

    #[test]
    fn unterminated_string_is_declined() {
        let mut reader = SourceReader::new("'abc");
        let mut stream = TokenStream::new();
        assert!(!StringHandler.handle(&mut reader, &mut stream));
        assert_eq!(reader.position(), 0);
        assert!(stream.is_empty());
    }

    #[test]
    fn numbers_may_be_negative() {
        let mut reader = SourceReader::new("-12)");
        let token = NumberHandler.try_consume(&mut reader).unwrap();
        assert_eq!(token.text(), "-12");
        assert_eq!(reader.current(), Some(')'));

        let mut reader = SourceReader::new("-a");
        assert!(NumberHandler.try_consume(&mut reader).is_none());
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn whitespace_is_grouped() {
        let mut reader = SourceReader::new("  \tx");
        let token = WhitespaceHandler.try_consume(&mut reader).unwrap();
        assert_eq!(token.text(), "  \t");
        assert_eq!(reader.current(), Some('x'));
    }
}
