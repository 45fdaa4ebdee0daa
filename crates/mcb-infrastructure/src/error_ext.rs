//! Error extension utilities
//!
//! Provides context extension methods for domain errors, so infrastructure
//! code (config loading, file I/O) can attach a human-readable description
//! without hand-writing a `map_err` closure at every call site.

use mcb_domain::error::Error;
use std::error::Error as StdError;

/// Attaches a description to an error, converting it into the domain
/// [`Error`] type.
pub trait ErrorContext<T> {
    /// Attach a static description.
    fn context(self, message: &str) -> Result<T, Error>;

    /// Attach a lazily computed description.
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T, Error>;

    /// Attach a description, tagging the error as an I/O failure.
    fn io_context(self, message: &str) -> Result<T, Error>;

    /// Attach a description, tagging the error as a configuration failure.
    fn config_context(self, message: &str) -> Result<T, Error>;

    /// Attach a description, tagging the error as a network failure.
    fn network_context(self, message: &str) -> Result<T, Error>;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn context(self, message: &str) -> Result<T, Error> {
        self.map_err(|e| Error::internal(format!("{message}: {e}")))
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T, Error> {
        self.map_err(|e| Error::internal(format!("{}: {e}", f())))
    }

    fn io_context(self, message: &str) -> Result<T, Error> {
        self.map_err(|e| Error::io_with_source(message, std::io::Error::other(e)))
    }

    fn config_context(self, message: &str) -> Result<T, Error> {
        self.map_err(|e| Error::configuration_with_source(message, Box::new(e)))
    }

    fn network_context(self, message: &str) -> Result<T, Error> {
        self.map_err(|e| Error::network_with_source(message, Box::new(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failing() -> Result<(), std::io::Error> {
        Err(std::io::Error::other("disk full"))
    }

    #[test]
    fn context_wraps_the_error_message() {
        let err = failing().context("writing snapshot").unwrap_err();
        assert!(err.to_string().contains("writing snapshot"));
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn config_context_produces_a_configuration_error() {
        let err = failing().config_context("loading mcb.toml").unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }
}
