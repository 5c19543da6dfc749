/*!
Error types for value resolution.

Errors come in two families. A [`UsageError`] means the *user* gave us
something we can't use: a value that doesn't convert, the wrong number of
tokens, or a value a validator rejected. These are the expected failure mode
of a parse pass and should be reported at the dispatch boundary. A
[`ProgrammerError`] means the *integrator* misused the API, such as reading an
option before it was finalized. Those aren't expected in correct programs.
 */

use std::{borrow::Cow, fmt::Display};

use thiserror::Error;

use crate::parameter::Names;
use crate::printers::printable_origin;

/**
An error produced by one of the stages of a
[`ValuePipeline`][crate::pipeline::ValuePipeline].

Pipeline stages don't know which option they belong to, so this type carries
no option identity. During finalize it gets wrapped in a [`UsageError`] that
names the option and where its value came from.
 */
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ValueError {
    /// A raw string couldn't be converted into the target type
    #[error("{raw:?} is not a valid {expected}: {message}")]
    Conversion {
        raw: String,
        expected: Cow<'static, str>,
        message: String,
    },

    /// An occurrence had the wrong number of raw values
    #[error("expected {expected} value(s) per occurrence, got {got}")]
    Arity { expected: usize, got: usize },

    /// A validator rejected the fully resolved value
    #[error("{message}")]
    Invalid { message: String },

    /// Something else went wrong
    #[error("{0}")]
    Custom(String),
}

impl ValueError {
    /// The argument failed to parse into an instance of the type
    pub fn conversion(
        raw: &str,
        expected: impl Into<Cow<'static, str>>,
        message: impl Display,
    ) -> Self {
        Self::Conversion {
            raw: raw.to_owned(),
            expected: expected.into(),
            message: message.to_string(),
        }
    }

    /// A validator rejected the value
    pub fn invalid(message: impl Display) -> Self {
        Self::Invalid {
            message: message.to_string(),
        }
    }

    pub fn custom(message: impl Display) -> Self {
        Self::Custom(message.to_string())
    }
}

/// Where the raw values for an option came from during a parse pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// One or more occurrences on the command line
    CommandLine,

    /// The named environment variable
    Environment(String),

    /// Neither; the option was absent
    Absent,
}

/// A user-input error attributed to a specific option.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value for {names}{}: {error}", printable_origin(.origin))]
pub struct UsageError {
    pub names: Names,
    pub origin: ValueSource,
    #[source]
    pub error: ValueError,
}

/// Misuse of the API. These indicate a bug in the program using `verdict`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ProgrammerError {
    /// An option was read before its command finalized it
    #[error("cannot read from option {names} before parsing command line")]
    NotFinalized { names: Names },

    /// An option was finalized without ever being attached to a command
    #[error("option {names} was finalized before being attached to a command")]
    Unbound { names: Names },

    /// An option reached finalize with no names at all
    #[error("option has no names; declare one or attach it with a name hint")]
    EmptyNames,

    /// `attach` was called twice on the same option
    #[error("option {names} was attached more than once")]
    AlreadyAttached { names: Names },

    #[error("counted option {names} cannot have off names")]
    CountedOffNames { names: Names },

    /// Two options in the same command claim the same name, or a flag uses
    /// the same name to switch on and off
    #[error("name {name:?} is claimed more than once in command {command:?}")]
    ConflictingNames { name: String, command: String },
}

/// Any error that can come out of finalizing an option.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Usage(#[from] UsageError),

    #[error(transparent)]
    Programmer(#[from] ProgrammerError),
}

impl Error {
    /// Get the usage error, if this is one. Usage errors are the recoverable
    /// kind; a dispatcher should print them and exit with a failure code.
    pub fn usage(&self) -> Option<&UsageError> {
        match self {
            Self::Usage(error) => Some(error),
            Self::Programmer(_) => None,
        }
    }
}
