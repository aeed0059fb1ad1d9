// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Converter Supervision
//!
//! ## Modules
//!
//! - [`mode`] - IDLE/CONFIG/MOD state machine and its side effects.
//! - [`topology`] - Converter types: reference shaping and plant input mapping.
//! - [`supervisor`] - Owner of mode, type and plant; entry point for mode changes.

pub mod mode;
pub mod supervisor;
pub mod topology;

pub use mode::{Effect, Mode, Transition};
pub use supervisor::{Supervisor, TypeError};
pub use topology::{ConverterType, Modulator};
