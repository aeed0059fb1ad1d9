// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Command table.
//!
//! Each entry names a command, its arity and an argument decoder. Arity is checked once for every
//! command in [`parse`], so the decoders only ever see the argument shape they declared.
//! Mode-dependent permissions are not checked here; they belong to whoever executes the
//! [`Command`].

use crate::converter::Mode;
use crate::protocol::error::CommandError;
use crate::protocol::number::str_to_float;
use crate::protocol::tokenize::Tokens;

/// A fully decoded command line.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    Help,
    Status,
    Mode(Mode),
    /// Raw converter type id. Checked against the known types only once the mode allows it.
    Type(u8),
    Kp(f32),
    Ki(f32),
    Kd(f32),
    Ref(f32),
    Stream,
    Exit,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Arity {
    None,
    One,
}

pub struct CommandEntry {
    pub name: &'static str,
    pub arity: Arity,
    /// Argument placeholder shown by `help`.
    pub usage: &'static str,
    pub summary: &'static str,
    decode: fn(Option<&str>) -> Result<Command, CommandError>,
}

pub static COMMANDS: [CommandEntry; 10] = [
    CommandEntry {
        name: "help",
        arity: Arity::None,
        usage: "",
        summary: "list commands",
        decode: |_| Ok(Command::Help),
    },
    CommandEntry {
        name: "status",
        arity: Arity::None,
        usage: "",
        summary: "show mode, type, gains and reference",
        decode: |_| Ok(Command::Status),
    },
    CommandEntry {
        name: "mode",
        arity: Arity::One,
        usage: "<idle|config|mod>",
        summary: "change operating mode",
        decode: decode_mode,
    },
    CommandEntry {
        name: "type",
        arity: Arity::One,
        usage: "<0..3>",
        summary: "select converter type (CONFIG)",
        decode: decode_type,
    },
    CommandEntry {
        name: "kp",
        arity: Arity::One,
        usage: "<value>",
        summary: "set proportional gain (CONFIG)",
        decode: |arg| number(arg).map(Command::Kp),
    },
    CommandEntry {
        name: "ki",
        arity: Arity::One,
        usage: "<value>",
        summary: "set integral gain (CONFIG)",
        decode: |arg| number(arg).map(Command::Ki),
    },
    CommandEntry {
        name: "kd",
        arity: Arity::One,
        usage: "<value>",
        summary: "set derivative gain (CONFIG)",
        decode: |arg| number(arg).map(Command::Kd),
    },
    CommandEntry {
        name: "ref",
        arity: Arity::One,
        usage: "<value>",
        summary: "set reference voltage (CONFIG, MOD)",
        decode: |arg| number(arg).map(Command::Ref),
    },
    CommandEntry {
        name: "stream",
        arity: Arity::None,
        usage: "",
        summary: "stream output voltage, any key stops (MOD)",
        decode: |_| Ok(Command::Stream),
    },
    CommandEntry {
        name: "exit",
        arity: Arity::None,
        usage: "",
        summary: "leave CONFIG for IDLE",
        decode: |_| Ok(Command::Exit),
    },
];

/// Case-insensitive table lookup.
pub fn lookup(name: &str) -> Option<&'static CommandEntry> {
    COMMANDS.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}

/// Decode a tokenized, non-empty line into a [`Command`].
pub fn parse(tokens: &Tokens<'_>) -> Result<Command, CommandError> {
    let entry = tokens
        .command
        .and_then(lookup)
        .ok_or(CommandError::UnknownCommand)?;

    if tokens.excessive {
        return Err(CommandError::TooManyArguments);
    }
    match (entry.arity, tokens.argument) {
        (Arity::None, Some(_)) => Err(CommandError::UnexpectedArgument {
            command: entry.name,
        }),
        (Arity::One, None) => Err(CommandError::MissingArgument {
            command: entry.name,
        }),
        (_, arg) => (entry.decode)(arg),
    }
}

fn number(arg: Option<&str>) -> Result<f32, CommandError> {
    Ok(str_to_float(arg.unwrap_or(""))?)
}

fn decode_mode(arg: Option<&str>) -> Result<Command, CommandError> {
    arg.and_then(Mode::from_name)
        .map(Command::Mode)
        .ok_or(CommandError::UnknownMode)
}

fn decode_type(arg: Option<&str>) -> Result<Command, CommandError> {
    arg.and_then(|s| s.parse::<u8>().ok())
        .map(Command::Type)
        .ok_or(CommandError::UnknownType)
}
