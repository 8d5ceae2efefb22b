use core::fmt;

use crate::arg::Range;
use crate::command::NodeId;

/// Why a line could not be dispatched.
///
/// Argument indices are 1-based and count every argument collected along the
/// command path, not only those of the failing command. String payloads borrow
/// from the parsed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchError<'l> {
    /// No sibling matched exactly, and the token was a prefix of zero or several.
    CommandNotFound { token: &'l str, parent: Option<NodeId> },

    /// The line ended before every declared argument was given.
    NotEnoughArguments { command: NodeId },

    /// Token not convertible to the declared argument type.
    ArgumentParseFailure { command: NodeId, index: usize },

    /// Converted value outside the declared inclusive range.
    ArgumentOutOfRange { command: NodeId, index: usize, range: Range },

    /// Input left over after a leaf command's last argument.
    TooManyArguments { command: NodeId },

    /// The path collected more than `MAX_ARGS` values.
    ArgumentCapacity { command: NodeId },
}

impl DispatchError<'_> {
    /// Command whose signature helps explain the error, if any.
    pub fn command(&self) -> Option<NodeId> {
        match *self {
            DispatchError::CommandNotFound { .. } => None,
            DispatchError::NotEnoughArguments { command }
            | DispatchError::ArgumentParseFailure { command, .. }
            | DispatchError::ArgumentOutOfRange { command, .. }
            | DispatchError::TooManyArguments { command }
            | DispatchError::ArgumentCapacity { command } => Some(command),
        }
    }
}

impl fmt::Display for DispatchError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::CommandNotFound { token, .. } => {
                write!(f, "ERROR: Command does not exist \"{}\"", token)
            }
            DispatchError::NotEnoughArguments { .. } => f.write_str("ERROR: Not enough arguments"),
            DispatchError::ArgumentParseFailure { index, .. } => {
                write!(f, "ERROR: Can't parse argument {}", index)
            }
            DispatchError::ArgumentOutOfRange { index, range, .. } => {
                write!(f, "ERROR: Argument out of range {} ({})", index, range)
            }
            DispatchError::TooManyArguments { .. } => f.write_str("ERROR: Too many arguments"),
            DispatchError::ArgumentCapacity { .. } => f.write_str("ERROR: Argument limit reached"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DispatchError<'_> {}
