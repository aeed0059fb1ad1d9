// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Serial Command Protocol
//!
//! Bytes from the terminal go through the [`line`] editor, completed lines are split by
//! [`tokenize`], and [`commands`] turns the tokens into a [`Command`] or a [`CommandError`].
//!
//! ## Modules
//!
//! - [`line`] - Echoing line editor with backspace handling.
//! - [`tokenize`] - Whitespace tokenizer, at most two tokens.
//! - [`number`] - Strict decimal parsing.
//! - [`commands`] - Command table and generic arity checks.
//! - [`error`] - Command rejection reasons.

pub mod commands;
pub mod error;
pub mod line;
pub mod number;
pub mod tokenize;

pub use commands::{parse, Command, COMMANDS};
pub use error::CommandError;
pub use line::LineEditor;
pub use number::{str_to_float, ParseNumberError};
pub use tokenize::tokenize;
