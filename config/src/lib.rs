//! Aggregate configuration for page cursor clients.
//!
//! Configuration is read in two steps: the [`parameters::user`] layer holds
//! whatever the user provided (TOML file and environment), and
//! [`Complete::complete`] turns it into the validated
//! [`parameters::actual`] layer with defaults filled in.

pub mod logger;
pub mod parameters;

/// Turn a partial user layer into a complete, validated configuration.
pub trait Complete {
    /// Complete configuration type
    type Output;

    /// Fill in defaults and validate.
    ///
    /// # Errors
    /// If some provided value is out of its valid range.
    fn complete(self) -> CompleteResult<Self::Output>;
}

/// Error returned by [`Complete::complete`]
#[derive(Debug, Clone, PartialEq, Eq, displaydoc::Display, thiserror::Error)]
pub enum CompleteError {
    /// Invalid value of `{field}`: {reason}
    Invalid {
        /// Dotted path of the offending field
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

/// Result of [`Complete::complete`]
pub type CompleteResult<T> = Result<T, CompleteError>;
