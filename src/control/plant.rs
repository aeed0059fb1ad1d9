// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Discrete state-space model of the converter.
//!
//! ```text
//! x[k+1] = A x[k] + B u[k]
//! y[k+1] = C x[k+1] + D u[k]
//! ```
//!
//! Discretized at 50 kHz (20 µs). Output is taken from the updated state, so state and output
//! always refer to the same time index. No NaN/overflow guards: the caller keeps `u` inside the
//! converter's operating envelope.

/// Number of states.
pub const N_STATES: usize = 6;

const A: [[f32; N_STATES]; N_STATES] = [
    [0.9652, -0.0172, 0.0057, -0.0058, 0.0052, -0.0251],
    [0.7732, 0.1252, 0.2315, 0.0700, 0.1282, 0.7754],
    [0.8278, -0.7522, -0.0956, 0.3299, -0.4855, 0.3915],
    [0.9948, 0.2655, -0.3848, 0.4212, 0.3927, 0.2899],
    [0.7648, -0.4165, -0.4855, -0.3366, -0.0986, 0.7281],
    [1.1056, 0.7587, -0.1179, 0.0748, -0.2192, 0.1491],
];

const B: [f32; N_STATES] = [0.0471, 0.0377, 0.4040, 0.0485, 0.0373, 0.0539];

const C: [f32; N_STATES] = [0.0, 0.0, 0.0, 0.0, 0.0, 1.0];

const D: f32 = 0.0;

/// Plant state vector and the single-step update.
#[derive(Debug, Clone, PartialEq)]
pub struct Plant {
    x: [f32; N_STATES],
}

impl Plant {
    /// Plant at rest (all states zero).
    pub const fn new() -> Self {
        Self {
            x: [0.0; N_STATES],
        }
    }

    /// Advance one sample with input `u` and return the output of the new state.
    pub fn step(&mut self, u: f32) -> f32 {
        let mut next = [0.0; N_STATES];
        for (row, xn) in A.iter().zip(next.iter_mut()) {
            *xn = row.iter().zip(self.x.iter()).map(|(a, x)| a * x).sum::<f32>();
        }
        for (xn, b) in next.iter_mut().zip(B.iter()) {
            *xn += b * u;
        }
        self.x = next;

        C.iter().zip(self.x.iter()).map(|(c, x)| c * x).sum::<f32>() + D * u
    }

    /// Zero the state vector.
    pub fn reset(&mut self) {
        self.x = [0.0; N_STATES];
    }

    #[inline]
    pub fn state(&self) -> &[f32; N_STATES] {
        &self.x
    }

    pub fn is_at_rest(&self) -> bool {
        self.x.iter().all(|&x| x == 0.0)
    }
}

impl Default for Plant {
    fn default() -> Self {
        Self::new()
    }
}
