// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Terminal line editor.
//!
//! Fed one received byte at a time, like a packet parser. Printable bytes are echoed and
//! buffered, backspace/DEL erase the last byte on screen and in the buffer, and CR or LF
//! completes the line. A CR LF pair completes only one line.

use core::fmt;

use heapless::String;

use crate::config::LINE_LEN;

const BACKSPACE: u8 = 0x08;
const DELETE: u8 = 0x7F;
const CR: u8 = b'\r';
const LF: u8 = b'\n';

pub type Line = String<LINE_LEN>;

pub struct LineEditor {
    buf: Line,
    after_cr: bool,
}

impl LineEditor {
    pub const fn new() -> Self {
        Self {
            buf: String::new(),
            after_cr: false,
        }
    }

    /// Process one received byte, echoing to `echo`. Returns the line once it is terminated.
    ///
    /// Bytes that don't fit in the buffer are dropped without echo. Non-printable bytes other
    /// than the editing keys are ignored.
    pub fn push<W: fmt::Write + ?Sized>(&mut self, byte: u8, echo: &mut W) -> Option<Line> {
        let after_cr = core::mem::replace(&mut self.after_cr, byte == CR);

        match byte {
            LF if after_cr => None,
            CR | LF => Some(core::mem::take(&mut self.buf)),
            BACKSPACE | DELETE => {
                if self.buf.pop().is_some() {
                    let _ = echo.write_str("\x08 \x08");
                }
                None
            }
            0x20..=0x7E => {
                if self.buf.push(byte as char).is_ok() {
                    let _ = echo.write_char(byte as char);
                }
                None
            }
            _ => None,
        }
    }

    /// Consume `byte` if it is the LF of a CR LF pair whose CR already completed a line.
    ///
    /// For callers that sometimes hand bytes elsewhere instead of to [`push`](Self::push). Any
    /// byte ends the pair, so the CR is forgotten either way.
    pub fn absorb_line_feed(&mut self, byte: u8) -> bool {
        core::mem::take(&mut self.after_cr) && byte == LF
    }

    #[inline]
    pub fn pending(&self) -> &str {
        &self.buf
    }
}

impl Default for LineEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(editor: &mut LineEditor, bytes: &[u8], echo: &mut std::string::String) -> Vec<Line> {
        bytes.iter().filter_map(|&b| editor.push(b, echo)).collect()
    }

    #[test]
    fn echoes_and_completes_on_cr() {
        let mut ed = LineEditor::new();
        let mut echo = std::string::String::new();
        let lines = feed(&mut ed, b"kp 1\r", &mut echo);
        assert_eq!(lines, ["kp 1"]);
        assert_eq!(echo, "kp 1");
        assert_eq!(ed.pending(), "");
    }

    #[test]
    fn crlf_is_one_line_but_lf_lf_is_two() {
        let mut ed = LineEditor::new();
        let mut echo = std::string::String::new();
        assert_eq!(feed(&mut ed, b"help\r\nstatus\r\n", &mut echo), ["help", "status"]);
        assert_eq!(feed(&mut ed, b"\n\n", &mut echo), ["", ""]);
    }

    #[test]
    fn line_feed_after_cr_is_absorbed_once() {
        let mut ed = LineEditor::new();
        let mut echo = std::string::String::new();
        assert_eq!(feed(&mut ed, b"stream\r", &mut echo), ["stream"]);
        assert!(ed.absorb_line_feed(LF));
        assert!(!ed.absorb_line_feed(LF));

        // Anything else breaks the pair, and a later LF is a line of its own.
        feed(&mut ed, b"\r", &mut echo);
        assert!(!ed.absorb_line_feed(b'x'));
        assert!(!ed.absorb_line_feed(LF));
        assert_eq!(feed(&mut ed, b"\n", &mut echo), [""]);
    }

    #[test]
    fn backspace_and_delete_erase() {
        let mut ed = LineEditor::new();
        let mut echo = std::string::String::new();
        let lines = feed(&mut ed, b"kx\x08p\x7F\x7F\x7Fref\r", &mut echo);
        assert_eq!(lines, ["ref"]);
        // The third DEL had nothing left to erase.
        assert_eq!(echo, "kx\x08 \x08p\x08 \x08\x08 \x08ref");
    }

    #[test]
    fn overflow_is_dropped() {
        let mut ed = LineEditor::new();
        let mut echo = std::string::String::new();
        let long = [b'a'; LINE_LEN + 8];
        assert!(feed(&mut ed, &long, &mut echo).is_empty());
        assert_eq!(ed.pending().len(), LINE_LEN);
        assert_eq!(echo.len(), LINE_LEN);
    }

    #[test]
    fn control_bytes_are_ignored() {
        let mut ed = LineEditor::new();
        let mut echo = std::string::String::new();
        let lines = feed(&mut ed, b"\x1b[Amode\tidle\r", &mut echo);
        assert_eq!(lines, ["[Amodeidle"]);
    }
}
