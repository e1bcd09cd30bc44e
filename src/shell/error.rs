use crate::error::FieldErrors;

/// The error type handlers may return.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors from registering or executing shell commands.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("command not found: {0}")]
    CommandNotFound(String),

    /// A command with the same name is already registered.
    #[error("command '{0}' already registered")]
    DuplicateCommand(String),

    /// The params did not parse. The handler was not called.
    #[error("{command}: failed to parse params: {errors}")]
    InvalidParams {
        command: String,
        errors: FieldErrors,
    },

    /// The handler returned an error.
    #[error("{command}: handler: {source}")]
    Handler {
        command: String,
        #[source]
        source: BoxError,
    },

    #[error("{command}: encode response: {source}")]
    Encode {
        command: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{command}: decode response: {source}")]
    Decode {
        command: String,
        #[source]
        source: serde_json::Error,
    },

    /// The command was registered without a handler.
    #[error("{0}: missing function")]
    MissingHandler(String),
}

impl ShellError {
    /// Returns the name of the command the error is about.
    pub fn command_name(&self) -> &str {
        match self {
            ShellError::CommandNotFound(name)
            | ShellError::DuplicateCommand(name)
            | ShellError::MissingHandler(name) => name,
            ShellError::InvalidParams { command, .. }
            | ShellError::Handler { command, .. }
            | ShellError::Encode { command, .. }
            | ShellError::Decode { command, .. } => command,
        }
    }

    /// Returns the field errors if the params failed to parse.
    pub fn params_errors(&self) -> Option<&FieldErrors> {
        match self {
            ShellError::InvalidParams { errors, .. } => Some(errors),
            _ => None,
        }
    }
}
