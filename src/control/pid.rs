// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Discrete PID controller for the converter voltage loop.
//!
//! Works in `no_std` and does not allocate memory.
//!
//! The integrator uses a one-step delay: the output of step `k` contains the integral accumulated
//! up to step `k - 1`, and the integrator is advanced afterwards. Loop traces taken on the bench
//! depend on this ordering.

use crate::config::REF_MAX;

/// PID controller with tunable gains, anti-windup and output clamping.
#[derive(Debug, Clone)]
pub struct Pid {
    /// Proportional gain
    kp: f32,
    /// Integral gain
    ki: f32,
    /// Derivative gain
    kd: f32,

    /// Sampling interval (s)
    ts: f32,

    /// Integrator state
    integral: f32,
    /// Error of the previous step (for derivative term)
    prev_error: f32,

    /// Output clamp
    out_min: f32,
    out_max: f32,

    /// Integral anti-windup clamp
    int_min: f32,
    int_max: f32,

    /// Setpoint, always within `[-REF_MAX, REF_MAX]`
    reference: f32,
}

impl Pid {
    /// Create a new PID controller.
    ///
    /// `kp`, `ki`, `kd` are the gain constants, `ts` is the sampling interval in seconds.
    pub fn new(kp: f32, ki: f32, kd: f32, ts: f32) -> Self {
        Self {
            kp,
            ki,
            kd,
            ts,

            integral: 0.0,
            prev_error: 0.0,

            out_min: -1.0,
            out_max: 1.0,

            int_min: -1.0,
            int_max: 1.0,

            reference: 0.0,
        }
    }

    /// Set output limits.
    pub fn with_output_limits(mut self, min: f32, max: f32) -> Self {
        self.out_min = min;
        self.out_max = max;
        self
    }

    /// Set integral limits for anti-windup.
    pub fn with_integral_limits(mut self, min: f32, max: f32) -> Self {
        self.int_min = min;
        self.int_max = max;
        self
    }

    /// Set the initial reference (clamped like [`Pid::set_reference`]).
    pub fn with_reference(mut self, reference: f32) -> Self {
        self.set_reference(reference);
        self
    }

    /// Run one controller step.
    ///
    /// `reference`: desired value
    /// `measurement`: current value
    ///
    /// Returns the command in [`out_min`, `out_max`].
    pub fn update(&mut self, reference: f32, measurement: f32) -> f32 {
        let error = reference - measurement;

        // ----- P term -----
        let p = self.kp * error;

        // ----- D term -----
        let d = self.kd * (error - self.prev_error) / self.ts;

        // ----- Output clamp, using last step's integral -----
        let out = (p + self.integral + d).clamp(self.out_min, self.out_max);

        // ----- Advance the integrator -----
        self.integral =
            (self.integral + self.ki * self.ts * error).clamp(self.int_min, self.int_max);
        self.prev_error = error;

        out
    }

    #[inline]
    pub fn kp(&self) -> f32 {
        self.kp
    }

    #[inline]
    pub fn ki(&self) -> f32 {
        self.ki
    }

    #[inline]
    pub fn kd(&self) -> f32 {
        self.kd
    }

    /// Gains are not range-checked. Callers gate writes on CONFIG mode.
    #[inline]
    pub fn set_kp(&mut self, kp: f32) {
        self.kp = kp;
    }

    #[inline]
    pub fn set_ki(&mut self, ki: f32) {
        self.ki = ki;
    }

    #[inline]
    pub fn set_kd(&mut self, kd: f32) {
        self.kd = kd;
    }

    #[inline]
    pub fn reference(&self) -> f32 {
        self.reference
    }

    /// Set the setpoint, clamped to `[-REF_MAX, REF_MAX]`.
    ///
    /// Returns `true` if the value had to be clamped, so the caller can tell the user.
    pub fn set_reference(&mut self, value: f32) -> bool {
        let clamped = value.clamp(-REF_MAX, REF_MAX);
        self.reference = clamped;
        clamped != value
    }

    #[inline]
    pub fn integral(&self) -> f32 {
        self.integral
    }

    #[inline]
    pub fn previous_error(&self) -> f32 {
        self.prev_error
    }

    pub fn clear_integrator(&mut self) {
        self.integral = 0.0;
    }

    pub fn clear_previous_error(&mut self) {
        self.prev_error = 0.0;
    }

    /// Reset integrator + derivative history.
    pub fn reset(&mut self) {
        self.clear_integrator();
        self.clear_previous_error();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(kp: f32, ki: f32, kd: f32) -> Pid {
        Pid::new(kp, ki, kd, 0.5)
            .with_output_limits(-60.0, 60.0)
            .with_integral_limits(-50.0, 50.0)
    }

    #[test]
    fn output_uses_previous_integral() {
        let mut pid = pid(0.0, 1.0, 0.0);

        // First step: integral was zero, so the output is zero.
        assert_eq!(pid.update(4.0, 0.0), 0.0);
        // Integrator advanced by ki * ts * e = 2.
        assert_eq!(pid.integral(), 2.0);
        // Second step reports the integral of the first step.
        assert_eq!(pid.update(4.0, 0.0), 2.0);
        assert_eq!(pid.integral(), 4.0);
    }

    #[test]
    fn zero_error_holds_integral() {
        let mut pid = pid(3.0, 1.0, 0.25);
        pid.update(6.0, 0.0);
        pid.update(6.0, 6.0);
        let held = pid.integral();

        // prev_error is 0 now, so a second zero-error step has no D contribution either.
        let out = pid.update(6.0, 6.0);
        assert_eq!(pid.integral(), held);
        assert_eq!(out, held);
    }

    #[test]
    fn derivative_on_error_change() {
        let mut pid = pid(0.0, 0.0, 1.0);
        // (2 - 0) / 0.5 = 4
        assert_eq!(pid.update(2.0, 0.0), 4.0);
        // error unchanged -> no D
        assert_eq!(pid.update(2.0, 0.0), 0.0);
        assert_eq!(pid.previous_error(), 2.0);
    }

    #[test]
    fn anti_windup_and_saturation() {
        let mut pid = pid(100.0, 100.0, 0.0);
        for _ in 0..10 {
            let out = pid.update(50.0, 0.0);
            assert!(out <= 60.0);
        }
        assert_eq!(pid.integral(), 50.0);
        assert_eq!(pid.update(-50.0, 0.0), -60.0);
    }

    #[test]
    fn reference_is_clamped() {
        let mut pid = pid(0.0, 0.0, 0.0);
        assert!(pid.set_reference(1000.0));
        assert_eq!(pid.reference(), REF_MAX);
        assert!(pid.set_reference(-1000.0));
        assert_eq!(pid.reference(), -REF_MAX);
        assert!(!pid.set_reference(12.5));
        assert_eq!(pid.reference(), 12.5);
    }

    #[test]
    fn reset_clears_history_but_keeps_gains() {
        let mut pid = pid(1.0, 2.0, 3.0);
        pid.update(5.0, 1.0);
        pid.reset();
        assert_eq!(pid.integral(), 0.0);
        assert_eq!(pid.previous_error(), 0.0);
        assert_eq!((pid.kp(), pid.ki(), pid.kd()), (1.0, 2.0, 3.0));
    }
}
