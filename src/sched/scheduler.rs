// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Cooperative priority scheduler.
//!
//! Tasks are plain functions over a caller-owned context `C`. Index 0 in the task table is the
//! highest priority. One scan runs at most one task to completion and then refreshes the
//! watchdog, whether a task ran or not. A task that hangs therefore stops the refreshes and the
//! watchdog resets the MCU.
//!
//! There is no aging: a high-priority task raised faster than it completes starves everything
//! below it.

use crate::hw::Watchdog;
use crate::sched::ready::ReadySet;

/// Task entry point.
pub type Task<C> = fn(&mut C);

pub struct Scheduler<'a, C, const N: usize> {
    ready: &'a ReadySet,
    tasks: [Task<C>; N],
    enabled: u32,
}

impl<'a, C, const N: usize> Scheduler<'a, C, N> {
    /// Register the task table against a ready set.
    ///
    /// Only the first [`ReadySet::CAPACITY`] entries can ever be dispatched.
    pub fn new(ready: &'a ReadySet, tasks: [Task<C>; N]) -> Self {
        let enabled = if N >= ReadySet::CAPACITY {
            u32::MAX
        } else {
            (1u32 << N) - 1
        };
        Self {
            ready,
            tasks,
            enabled,
        }
    }

    /// One scan: dispatch the highest-priority ready task, if any, then refresh the watchdog.
    ///
    /// Returns the priority of the task that ran.
    pub fn poll_once<W: Watchdog>(&self, ctx: &mut C, watchdog: &mut W) -> Option<usize> {
        let ran = self.ready.take_highest(self.enabled).map(|priority| {
            (self.tasks[priority])(ctx);
            priority
        });
        watchdog.refresh();
        ran
    }

    pub fn run<W: Watchdog>(&self, ctx: &mut C, watchdog: &mut W) -> ! {
        loop {
            self.poll_once(ctx, watchdog);
        }
    }

    #[inline]
    pub fn task_count(&self) -> usize {
        N
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sched::TaskId;
    use crate::testing::MockWatchdog;

    #[derive(Default)]
    struct Trace {
        ran: Vec<usize>,
    }

    fn t0(c: &mut Trace) {
        c.ran.push(0);
    }
    fn t1(c: &mut Trace) {
        c.ran.push(1);
    }
    fn t2(c: &mut Trace) {
        c.ran.push(2);
    }
    fn t3(c: &mut Trace) {
        c.ran.push(3);
    }

    #[test]
    fn only_the_highest_ready_task_runs_per_scan() {
        let ready = ReadySet::new();
        let sched = Scheduler::new(&ready, [t0, t1, t2, t3]);
        let mut trace = Trace::default();
        let mut wdg = MockWatchdog::default();

        ready.raise(TaskId::Button);
        ready.raise(TaskId::ControlLoop);

        assert_eq!(sched.poll_once(&mut trace, &mut wdg), Some(0));
        assert_eq!(trace.ran, [0]);
        assert!(ready.is_pending(TaskId::Button));

        assert_eq!(sched.poll_once(&mut trace, &mut wdg), Some(2));
        assert_eq!(trace.ran, [0, 2]);
    }

    #[test]
    fn heartbeat_even_when_idle() {
        let ready = ReadySet::new();
        let sched = Scheduler::new(&ready, [t0, t1, t2, t3]);
        let mut trace = Trace::default();
        let mut wdg = MockWatchdog::default();

        for _ in 0..3 {
            assert_eq!(sched.poll_once(&mut trace, &mut wdg), None);
        }
        ready.raise(TaskId::SerialRx);
        sched.poll_once(&mut trace, &mut wdg);

        assert_eq!(wdg.refreshes, 4);
        assert_eq!(trace.ran, [1]);
    }

    #[test]
    fn bits_past_the_table_are_never_dispatched() {
        let ready = ReadySet::new();
        let sched = Scheduler::new(&ready, [t0, t1]);
        let mut trace = Trace::default();
        let mut wdg = MockWatchdog::default();

        ready.raise(TaskId::PrintOutput);
        assert_eq!(sched.poll_once(&mut trace, &mut wdg), None);
        assert!(ready.is_pending(TaskId::PrintOutput));
        assert_eq!(sched.task_count(), 2);
    }

    #[test]
    fn interrupt_raised_during_a_task_is_kept() {
        static READY: ReadySet = ReadySet::new();

        fn raises_lower(c: &mut Trace) {
            c.ran.push(0);
            READY.raise(TaskId::SerialRx);
        }

        let sched = Scheduler::new(&READY, [raises_lower, t1]);
        let mut trace = Trace::default();
        let mut wdg = MockWatchdog::default();

        READY.raise(TaskId::ControlLoop);
        sched.poll_once(&mut trace, &mut wdg);
        sched.poll_once(&mut trace, &mut wdg);
        assert_eq!(trace.ran, [0, 1]);
    }
}
