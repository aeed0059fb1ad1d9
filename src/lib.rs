// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # convctl Firmware
//!
//! This crate contains the firmware for a power-converter controller bench, written in Rust,
//! targeting an STM32F767 MCU (Nucleo-F767ZI). A discretized state-space model of the converter
//! is driven by a discrete PID loop, and a line-oriented serial terminal is used for live tuning
//! and mode switching.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`control`] | Numeric core: PID controller and state-space plant model |
//! | [`converter`] | Operating-mode state machine, converter topologies, supervisor |
//! | [`sched`] | Interrupt-fed ready-set and the cooperative priority scheduler |
//! | [`protocol`] | Serial command line: line editor, tokenizer, command table |
//! | [`hw`] | Narrow hardware collaborator traits and button debounce |
//! | [`app`] | The explicit context object and the scheduler tasks |
//! | [`terminal`] | ANSI terminal helpers |
//! | [`config`] | Compiled-in system constants |
//! | `board` | STM32F767 implementation of the [`hw`] traits (`board` feature) |
//!
//! ## Getting Started
//!
//! Run the host tests:
//!
//! ```bash
//! cargo test
//! ```
//!
//! Flash the board:
//!
//! ```bash
//! cargo run --release --features board --target thumbv7em-none-eabihf
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod app;
pub mod config;
pub mod control;
pub mod converter;
pub mod hw;
pub mod protocol;
pub mod sched;
pub mod terminal;

#[cfg(feature = "board")]
pub mod board;

#[cfg(test)]
mod testing;
