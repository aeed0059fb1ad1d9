// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Recording doubles for the hardware collaborators.

use std::collections::VecDeque;
use std::string::String;
use std::vec::Vec;

use core::fmt;

use crate::converter::Mode;
use crate::hw::{LoopTimer, ModeIndicator, Pwm, PushButton, Serial, Watchdog};

#[derive(Default)]
pub struct MockBoard {
    /// Everything written to the terminal.
    pub tx: String,
    /// Bytes the terminal will receive next.
    pub rx: VecDeque<u8>,
    pub duty: f32,
    pub duty_history: Vec<f32>,
    pub pwm_enabled: bool,
    pub timer_armed: bool,
    pub indicated: Option<Mode>,
    /// Raw button levels returned by successive samples. Released once exhausted.
    pub button: VecDeque<bool>,
}

impl MockBoard {
    pub fn type_line(&mut self, line: &str) {
        self.rx.extend(line.bytes());
        self.rx.push_back(b'\r');
    }

    /// Queue a line terminated CR LF, as most desktop terminals send it.
    pub fn type_line_crlf(&mut self, line: &str) {
        self.type_line(line);
        self.rx.push_back(b'\n');
    }

    /// Take and clear the captured terminal output.
    pub fn take_tx(&mut self) -> String {
        core::mem::take(&mut self.tx)
    }
}

impl fmt::Write for MockBoard {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.tx.push_str(s);
        Ok(())
    }
}

impl Serial for MockBoard {
    fn receive_byte(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }
}

impl Pwm for MockBoard {
    fn set_duty_percent(&mut self, percent: f32) {
        self.duty = percent.clamp(0.0, 100.0);
        self.duty_history.push(self.duty);
    }

    fn enable(&mut self) {
        self.pwm_enabled = true;
    }

    fn disable(&mut self) {
        self.pwm_enabled = false;
    }
}

impl LoopTimer for MockBoard {
    fn arm(&mut self) {
        self.timer_armed = true;
    }

    fn disarm(&mut self) {
        self.timer_armed = false;
    }
}

impl ModeIndicator for MockBoard {
    fn show_mode(&mut self, mode: Mode) {
        self.indicated = Some(mode);
    }
}

impl PushButton for MockBoard {
    fn is_pressed(&mut self) -> bool {
        self.button.pop_front().unwrap_or(false)
    }
}

#[derive(Default)]
pub struct MockWatchdog {
    pub refreshes: u32,
}

impl Watchdog for MockWatchdog {
    fn refresh(&mut self) {
        self.refreshes += 1;
    }
}
