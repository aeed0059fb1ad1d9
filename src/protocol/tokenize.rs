// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Whitespace tokenizer for command lines.

/// Most tokens a command line can carry: a name and one argument.
pub const MAX_TOKENS: usize = 2;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tokens<'a> {
    pub command: Option<&'a str>,
    pub argument: Option<&'a str>,
    /// A third token was present. It and everything after it were discarded.
    pub excessive: bool,
}

impl<'a> Tokens<'a> {
    pub fn len(&self) -> usize {
        self.command.is_some() as usize + self.argument.is_some() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.command.is_none()
    }
}

/// Split `line` on runs of whitespace, keeping at most [`MAX_TOKENS`] tokens.
pub fn tokenize(line: &str) -> Tokens<'_> {
    let mut words = line.split_ascii_whitespace();
    Tokens {
        command: words.next(),
        argument: words.next(),
        excessive: words.next().is_some(),
    }
}
