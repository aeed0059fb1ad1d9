// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Push-button debounce.
//!
//! Sampled at a fixed rate. A new level is accepted only once two consecutive samples agree,
//! and only the released → pressed edge is reported.

#[derive(Debug, Default, Clone)]
pub struct Debouncer {
    last_sample: bool,
    stable: bool,
}

impl Debouncer {
    pub const fn new() -> Self {
        Self {
            last_sample: false,
            stable: false,
        }
    }

    /// Feed one raw sample. Returns `true` on a debounced press.
    pub fn sample(&mut self, pressed: bool) -> bool {
        let agreed = pressed == self.last_sample;
        self.last_sample = pressed;

        if !agreed || pressed == self.stable {
            return false;
        }
        self.stable = pressed;
        pressed
    }

    /// Debounced level.
    #[inline]
    pub fn is_pressed(&self) -> bool {
        self.stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_needs_two_samples() {
        let mut d = Debouncer::new();
        assert!(!d.sample(true));
        assert!(d.sample(true));
        assert!(d.is_pressed());
        // Held: no repeat.
        assert!(!d.sample(true));
        assert!(!d.sample(true));
    }

    #[test]
    fn bounce_is_ignored() {
        let mut d = Debouncer::new();
        for level in [true, false, true, false, false] {
            assert!(!d.sample(level));
        }
        assert!(!d.is_pressed());
    }

    #[test]
    fn release_is_not_an_event() {
        let mut d = Debouncer::new();
        d.sample(true);
        d.sample(true);
        assert!(!d.sample(false));
        assert!(!d.sample(false));
        assert!(!d.is_pressed());
        assert!(!d.sample(true));
        assert!(d.sample(true));
    }
}
