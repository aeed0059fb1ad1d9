// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Ready bitset shared between interrupt handlers and the scheduler.
//!
//! Bit `n` set means the task with priority `n` has a pending request. Lower bit index means
//! higher priority. Interrupt handlers only ever set bits (`fetch_or`), the scheduler only ever
//! clears the one bit it is about to service (`fetch_and`), so neither side can lose the other's
//! update.

use core::sync::atomic::{AtomicU32, Ordering};

/// Task priorities. The discriminant is the bit index in the [`ReadySet`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum TaskId {
    /// TIM2 update, 25 Hz while in MOD.
    ControlLoop = 0,
    /// USART3 receive.
    SerialRx = 1,
    /// TIM3 update, button sampling.
    Button = 2,
    /// SysTick divider, streamed output.
    PrintOutput = 3,
}

impl TaskId {
    pub const COUNT: usize = 4;

    #[inline]
    pub const fn bit(self) -> u32 {
        1 << self as u32
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

pub struct ReadySet {
    bits: AtomicU32,
}

impl ReadySet {
    /// Widest task table a ready set can serve.
    pub const CAPACITY: usize = 32;

    pub const fn new() -> Self {
        Self {
            bits: AtomicU32::new(0),
        }
    }

    /// Mark a task ready. Safe to call from any interrupt priority.
    #[inline]
    pub fn raise(&self, task: TaskId) {
        self.raise_index(task.index());
    }

    /// Mark the task at `priority` ready. Out-of-range priorities are ignored.
    #[inline]
    pub fn raise_index(&self, priority: usize) {
        if priority < Self::CAPACITY {
            self.bits.fetch_or(1 << priority, Ordering::AcqRel);
        }
    }

    /// Claim the highest-priority ready task among `enabled`, clearing its bit.
    ///
    /// Every other ready bit is left set for the next scan.
    pub fn take_highest(&self, enabled: u32) -> Option<usize> {
        let pending = self.bits.load(Ordering::Acquire) & enabled;
        if pending == 0 {
            return None;
        }
        let priority = pending.trailing_zeros();
        let bit = 1u32 << priority;
        // Only this context clears bits, so the bit is still set here.
        self.bits.fetch_and(!bit, Ordering::AcqRel);
        Some(priority as usize)
    }

    #[inline]
    pub fn is_pending(&self, task: TaskId) -> bool {
        self.bits.load(Ordering::Acquire) & task.bit() != 0
    }

    /// Raw snapshot, for diagnostics.
    #[inline]
    pub fn snapshot(&self) -> u32 {
        self.bits.load(Ordering::Acquire)
    }
}

impl Default for ReadySet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowest_bit_wins_and_others_stay() {
        let ready = ReadySet::new();
        ready.raise(TaskId::Button);
        ready.raise(TaskId::ControlLoop);

        assert_eq!(ready.take_highest(u32::MAX), Some(0));
        assert!(!ready.is_pending(TaskId::ControlLoop));
        assert!(ready.is_pending(TaskId::Button));

        assert_eq!(ready.take_highest(u32::MAX), Some(2));
        assert_eq!(ready.take_highest(u32::MAX), None);
    }

    #[test]
    fn disabled_priorities_are_skipped_but_kept() {
        let ready = ReadySet::new();
        ready.raise(TaskId::SerialRx);
        assert_eq!(ready.take_highest(TaskId::PrintOutput.bit()), None);
        assert!(ready.is_pending(TaskId::SerialRx));
    }

    #[test]
    fn raising_twice_is_one_request() {
        let ready = ReadySet::new();
        ready.raise(TaskId::PrintOutput);
        ready.raise(TaskId::PrintOutput);
        assert_eq!(ready.take_highest(u32::MAX), Some(3));
        assert_eq!(ready.take_highest(u32::MAX), None);
    }

    #[test]
    fn out_of_range_index_is_ignored() {
        let ready = ReadySet::new();
        ready.raise_index(ReadySet::CAPACITY);
        assert_eq!(ready.snapshot(), 0);
    }
}
