// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Control Algorithms
//!
//! The numeric core of the converter loop. Everything here is a total function over owned state:
//! no allocation, no hardware access, no error paths.
//!
//! ## Modules
//!
//! - [`pid`] - Discrete PID controller with delayed integrator and anti-windup.
//! - [`plant`] - Six-state discrete model of the converter.

pub mod pid;
pub mod plant;

pub use pid::Pid;
pub use plant::Plant;
