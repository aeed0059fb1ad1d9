// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Hardware Collaborators
//!
//! The application never touches registers. It talks to the board through the narrow traits
//! below, which the `board` module implements for the Nucleo-F767ZI and the test suite implements
//! with recording mocks.
//!
//! ## Modules
//!
//! - [`debounce`] - Two-sample button debounce with edge detection.

use core::fmt;

use crate::converter::Mode;

pub mod debounce;

pub use debounce::Debouncer;

/// Terminal link. Output goes through [`core::fmt::Write`].
pub trait Serial: fmt::Write {
    /// Next received byte, if one is waiting.
    fn receive_byte(&mut self) -> Option<u8>;
}

/// Loop-rate PWM output channel.
pub trait Pwm {
    /// Set the duty cycle in percent. Values outside `0..=100` are saturated.
    fn set_duty_percent(&mut self, percent: f32);
    fn enable(&mut self);
    fn disable(&mut self);
}

/// Periodic interrupt source of the control loop.
pub trait LoopTimer {
    fn arm(&mut self);
    fn disarm(&mut self);
}

/// Mode LEDs.
pub trait ModeIndicator {
    fn show_mode(&mut self, mode: Mode);
}

/// User push button, sampled from the debounce task.
pub trait PushButton {
    /// Raw, undebounced level.
    fn is_pressed(&mut self) -> bool;
}

/// Liveness supervisor. Must be refreshed within its timeout or the MCU resets.
pub trait Watchdog {
    fn refresh(&mut self);
}

/// Everything the application drives.
pub trait Board: Serial + Pwm + LoopTimer + ModeIndicator + PushButton {}

impl<T: Serial + Pwm + LoopTimer + ModeIndicator + PushButton> Board for T {}
