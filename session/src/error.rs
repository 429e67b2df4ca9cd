use crate::code::CodeError;
use crate::controller::ConnectionState;

/// Reasons the controller refuses a user request. None of them change state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Please enter a valid 5-character code ({0})")]
    InvalidCode(#[from] CodeError),

    #[error("That is your own code. Share it with a friend instead.")]
    OwnCode,

    #[error("Already {0}; disconnect first")]
    Busy(ConnectionState),
}
