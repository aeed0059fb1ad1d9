// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Command rejection reasons.
//!
//! Every variant is terminal at the interpreter: it is printed as `Error: <message>` and the
//! command has no effect.

use core::fmt;

use crate::converter::{Mode, TypeError};
use crate::protocol::number::ParseNumberError;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    UnknownCommand,
    MissingArgument { command: &'static str },
    UnexpectedArgument { command: &'static str },
    TooManyArguments,
    InvalidNumber(ParseNumberError),
    UnknownMode,
    UnknownType,
    AlreadyInMode(Mode),
    Type(TypeError),
    /// Operation not permitted in the current mode.
    NotAllowed { command: &'static str, mode: Mode },
}

impl From<ParseNumberError> for CommandError {
    fn from(e: ParseNumberError) -> Self {
        CommandError::InvalidNumber(e)
    }
}

impl From<TypeError> for CommandError {
    fn from(e: TypeError) -> Self {
        CommandError::Type(e)
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::UnknownCommand => f.write_str("unknown command, type 'help'"),
            CommandError::MissingArgument { command } => {
                write!(f, "'{}' needs an argument", command)
            }
            CommandError::UnexpectedArgument { command } => {
                write!(f, "'{}' takes no argument", command)
            }
            CommandError::TooManyArguments => f.write_str("too many arguments"),
            CommandError::InvalidNumber(e) => write!(f, "invalid number ({})", e),
            CommandError::UnknownMode => f.write_str("mode must be one of idle, config, mod"),
            CommandError::UnknownType => f.write_str("type must be 0, 1, 2 or 3"),
            CommandError::AlreadyInMode(mode) => write!(f, "already in {} mode", mode),
            CommandError::Type(e) => write!(f, "{}", e),
            CommandError::NotAllowed { command, mode } => {
                write!(f, "'{}' is not allowed in {} mode", command, mode)
            }
        }
    }
}
