use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    #[error("unexpected character '{character}' at position {position}")]
    Lexical { character: char, position: usize },

    #[error("malformed selector at position {position}: {message}")]
    Malformed { position: usize, message: String },
}

impl SelectorError {
    pub(crate) fn malformed(position: usize, message: impl Into<String>) -> Self {
        SelectorError::Malformed {
            position,
            message: message.into(),
        }
    }

    /// Character offset the error points at.
    pub fn position(&self) -> usize {
        match self {
            SelectorError::Lexical { position, .. } | SelectorError::Malformed { position, .. } => {
                *position
            }
        }
    }
}
