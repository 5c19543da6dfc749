#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("unrecognized option {0:?}")]
    UnknownOption(String),

    #[error("{option} requires {expected} value(s)")]
    MissingValue { option: String, expected: usize },

    #[error("unknown command {0:?}")]
    UnknownCommand(String),

    #[error(transparent)]
    Finalize(#[from] verdict::Error),
}

impl DispatchError {
    /// Whether this error is the user's fault, as opposed to a bug in the
    /// demo's declarations.
    pub fn is_usage(&self) -> bool {
        match self {
            Self::Finalize(error) => error.usage().is_some(),
            Self::UnknownOption(_) | Self::MissingValue { .. } | Self::UnknownCommand(_) => true,
        }
    }
}
