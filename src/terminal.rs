// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! ANSI terminal helpers.
//!
//! Note: the terminal expects `\r\n` line endings. Use [`new_line`] rather than a bare `\n`.

use core::fmt::{self, Write};

use crate::converter::Mode;

pub const PROMPT: &str = "> ";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl Color {
    /// SGR foreground code.
    const fn code(self) -> u8 {
        match self {
            Color::Black => 30,
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
            Color::Magenta => 35,
            Color::Cyan => 36,
            Color::White => 37,
        }
    }

    /// Text colour used while in `mode`.
    pub const fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Idle => Color::Blue,
            Mode::Config => Color::Yellow,
            Mode::Mod => Color::White,
        }
    }
}

/// Clear scrollback and screen, cursor home.
pub fn clear<W: Write + ?Sized>(out: &mut W) -> fmt::Result {
    out.write_str("\x1b[3J\x1b[H\x1b[2J")
}

#[inline]
pub fn new_line<W: Write + ?Sized>(out: &mut W) -> fmt::Result {
    out.write_str("\r\n")
}

#[inline]
pub fn prompt<W: Write + ?Sized>(out: &mut W) -> fmt::Result {
    out.write_str(PROMPT)
}

pub fn set_color<W: Write + ?Sized>(out: &mut W, color: Color) -> fmt::Result {
    write!(out, "\x1b[{}m", color.code())
}

pub fn reset_color<W: Write + ?Sized>(out: &mut W) -> fmt::Result {
    out.write_str("\x1b[0m")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_sequences() {
        let mut s = String::new();
        set_color(&mut s, Color::for_mode(Mode::Config)).unwrap();
        reset_color(&mut s).unwrap();
        clear(&mut s).unwrap();
        assert_eq!(s, "\x1b[33m\x1b[0m\x1b[3J\x1b[H\x1b[2J");
    }
}
