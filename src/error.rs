//! # Error Types
//!
//! Every fallible library operation returns [`Result`], whose error side is
//! one of three kinds:
//!
//! - [`Error::InvalidArgument`] - a parameter broke its range or length contract
//! - [`Error::InvalidState`] - the operation is not supported right now
//! - [`Error::Exhausted`] - a bounded navigator walked off its sequence
//!
//! `Exhausted` is an ordinary end-of-sequence signal, the navigator's
//! [`Iterator`] implementation turns it into `None`.

use thiserror::Error;

/// Errors raised by selectors and navigators.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A construction or mutation parameter is out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The operation cannot run in the current state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A bounded navigator moved its head outside the sequence.
    #[error("navigator exhausted: head left the sequence")]
    Exhausted,
}

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub(crate) fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// True for the end-of-sequence signal.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_kind() {
        let err = Error::invalid_argument("decay rate 1.5 outside (0, 1]");
        assert_eq!(err.to_string(), "invalid argument: decay rate 1.5 outside (0, 1]");

        let err = Error::invalid_state("empty selector");
        assert_eq!(err.to_string(), "invalid state: empty selector");
    }

    #[test]
    fn test_exhausted_detection() {
        assert!(Error::Exhausted.is_exhausted());
        assert!(!Error::invalid_state("x").is_exhausted());
    }

    #[test]
    fn test_errors_convert_into_anyhow() {
        fn fails() -> anyhow::Result<()> {
            Err(Error::Exhausted)?;
            Ok(())
        }
        let err = fails().unwrap_err();
        assert!(err.downcast_ref::<Error>().is_some_and(Error::is_exhausted));
    }
}
