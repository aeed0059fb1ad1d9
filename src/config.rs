// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Compiled-in system constants.
//!
//! There is no runtime configuration store: every value here is what the firmware boots with, and
//! what it reverts to after a watchdog reset.

/// Reference magnitude limit (V). Tied to the simulated DC-link.
pub const REF_MAX: f32 = 50.0;

/// DC-link voltage switched by the H-bridge topologies (V).
pub const DC_LINK_VOLTAGE: f32 = 60.0;

/// Sampling interval of the discretized plant, also used by the PID (s).
pub const TS: f32 = 0.000_020;

/// PID integral anti-windup limits.
pub const INT_MIN: f32 = -50.0;
pub const INT_MAX: f32 = 50.0;

/// PID output saturation.
pub const OUT_MIN: f32 = -60.0;
pub const OUT_MAX: f32 = 60.0;

/// Boot-time gains. All cleared; tune them over the terminal in CONFIG mode.
pub const DEFAULT_KP: f32 = 0.0;
pub const DEFAULT_KI: f32 = 0.0;
pub const DEFAULT_KD: f32 = 0.0;

/// Boot-time reference (V).
pub const DEFAULT_REFERENCE: f32 = 10.0;

/// Control loop timer rate (TIM2 update).
pub const LOOP_RATE_HZ: u32 = 25;

/// Button sampling rate (TIM3 update), i.e. 20 ms between samples.
pub const DEBOUNCE_RATE_HZ: u32 = 50;

/// SysTick rate and the number of ticks between two streamed output lines.
pub const SYSTICK_RATE_HZ: u32 = 1_000;
pub const PRINT_PERIOD_TICKS: u32 = 200;

/// Control loop ticks per period of the inverter's sinusoidal reference.
pub const SINE_STEPS: u32 = 50;

/// Control loop ticks per H-bridge carrier period.
pub const CARRIER_STEPS: u32 = 10;

/// Longest command line accepted by the line editor (bytes).
pub const LINE_LEN: usize = 32;

/// Received bytes buffered between the USART interrupt and the serial task.
pub const RX_QUEUE_LEN: usize = 32;

/// The terminal is cleared after this many streamed lines.
pub const STREAM_LINES_PER_SCREEN: u16 = 100;

/// Independent watchdog timeout (ms).
pub const WATCHDOG_TIMEOUT_MS: u32 = 5_000;

/// Serial baud rate of the terminal.
pub const BAUD_RATE: u32 = 115_200;
