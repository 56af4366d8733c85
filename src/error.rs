use std::io;
use thiserror::Error;

/// Errors that end an interactive session.
///
/// Everything the user can recover from (malformed commands, unknown names,
/// out-of-range selections) is reported on the console instead and never
/// surfaces as a `SessionError`.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The input source failed while a read was outstanding.
    #[error("the system experienced a failure reading user input: {0}")]
    StreamFailure(String),

    /// Writing to the console failed.
    #[error("failed to write to the console")]
    Output(#[from] io::Error),

    /// The document could not be constructed.
    #[error("could not create the document: {0}")]
    Collaborator(String),
}

/// Formatting errors raised by the table renderer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// A single whitespace-delimited token does not fit its column.
    #[error("token \"{token}\" is too long to fit in a column of width {width}")]
    TokenTooLong { token: String, width: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_too_long_message_names_token_and_width() {
        let err = TableError::TokenTooLong {
            token: "abc".to_string(),
            width: 2,
        };
        assert_eq!(
            err.to_string(),
            "token \"abc\" is too long to fit in a column of width 2"
        );
    }

    #[test]
    fn test_io_error_converts_to_output() {
        let err: SessionError = io::Error::other("broken pipe").into();
        assert!(matches!(err, SessionError::Output(_)));
    }
}
