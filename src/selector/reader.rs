/// Cursor over an immutable selector string.
///
/// Positions are character offsets, not byte offsets, so error messages line
/// up with what the user typed even when the selector contains non-ASCII
/// text inside quoted values.
#[derive(Debug, Clone)]
pub struct SourceReader {
    input: Vec<char>,
    position: usize,
}

impl SourceReader {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Character under the cursor, `None` at end of input.
    pub fn current(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Character `offset` places after the cursor.
    pub fn peek(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    /// Move forward `n` characters. Saturates at end of input.
    pub fn advance(&mut self, n: usize) {
        self.position = (self.position + n).min(self.input.len());
    }

    pub fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Rewind to a previously observed position.
    ///
    /// Handlers use this to leave the reader untouched when a lexeme turns
    /// out not to be theirs after all (an unterminated quote, say).
    pub(crate) fn reset(&mut self, position: usize) {
        self.position = position.min(self.input.len());
    }

    pub fn len(&self) -> usize {
        self.input.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }
}
