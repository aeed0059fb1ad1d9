// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Task Scheduling
//!
//! Interrupt handlers never do work themselves. They mark a task ready in a shared [`ReadySet`]
//! and return; the foreground [`Scheduler`] picks the highest-priority ready task, runs it to
//! completion, refreshes the watchdog and scans again.
//!
//! ## Modules
//!
//! - [`ready`] - Atomic ready bitset and the task priority table.
//! - [`scheduler`] - Cooperative dispatch loop.

pub mod ready;
pub mod scheduler;

pub use ready::{ReadySet, TaskId};
pub use scheduler::Scheduler;
