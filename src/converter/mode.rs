// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Operating modes and the transition table.
//!
//! [`transition`] is pure: it names the side effects a mode change requires and leaves applying
//! them to whoever owns the affected state and hardware.

use core::fmt;

/// Operating mode of the converter.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Converter stopped.
    Idle,
    /// Loop stopped, gains and converter type editable.
    Config,
    /// Loop running at the fixed loop rate. Only the reference is editable.
    Mod,
}

impl Mode {
    pub const fn name(self) -> &'static str {
        match self {
            Mode::Idle => "IDLE",
            Mode::Config => "CONFIG",
            Mode::Mod => "MOD",
        }
    }

    /// Parse a terminal mode name (`idle`, `config`, `mod`), ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        [Mode::Idle, Mode::Config, Mode::Mod]
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(name))
    }

    /// Next mode in the push-button cycle.
    pub const fn next(self) -> Self {
        match self {
            Mode::Idle => Mode::Config,
            Mode::Config => Mode::Mod,
            Mode::Mod => Mode::Idle,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Side effect required by a mode change.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Effect {
    /// Enable the control-loop timer interrupt.
    ArmLoopTimer,
    /// Disable the control-loop timer interrupt.
    DisarmLoopTimer,
    /// Enable the loop-rate PWM channel.
    EnablePwm,
    /// Drive the loop-rate PWM channel to 0 % and disable it.
    DisablePwm,
    /// Zero the shared `u`/`y` scalars.
    ZeroOutputs,
    /// Zero the plant state vector and restart the reference/carrier phase.
    ResetPlant,
    /// Clear the PID integrator and previous error.
    ResetController,
    /// Stop periodic output streaming.
    StopStream,
    /// Mode LEDs and terminal colour.
    Indicate(Mode),
}

const ENTER_MOD: &[Effect] = &[
    Effect::ArmLoopTimer,
    Effect::EnablePwm,
    Effect::Indicate(Mode::Mod),
];

const ENTER_CONFIG: &[Effect] = &[
    Effect::DisarmLoopTimer,
    Effect::DisablePwm,
    Effect::ZeroOutputs,
    Effect::ResetPlant,
    Effect::ResetController,
    Effect::StopStream,
    Effect::Indicate(Mode::Config),
];

const ENTER_IDLE: &[Effect] = &[
    Effect::DisarmLoopTimer,
    Effect::DisablePwm,
    Effect::ZeroOutputs,
    Effect::ResetPlant,
    Effect::ResetController,
    Effect::StopStream,
    Effect::Indicate(Mode::Idle),
];

/// Result of a mode request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Already in the requested mode. Nothing was touched.
    Unchanged(Mode),
    Changed {
        from: Mode,
        to: Mode,
        effects: &'static [Effect],
    },
}

impl Transition {
    pub fn effects(&self) -> &'static [Effect] {
        match self {
            Transition::Unchanged(_) => &[],
            Transition::Changed { effects, .. } => *effects,
        }
    }

    pub fn is_change(&self) -> bool {
        matches!(self, Transition::Changed { .. })
    }
}

/// Effects of entering `to`, regardless of where we come from.
pub const fn entry_effects(to: Mode) -> &'static [Effect] {
    match to {
        Mode::Idle => ENTER_IDLE,
        Mode::Config => ENTER_CONFIG,
        Mode::Mod => ENTER_MOD,
    }
}

/// Transition function of the mode state machine.
pub const fn transition(from: Mode, to: Mode) -> Transition {
    if from as u8 == to as u8 {
        Transition::Unchanged(from)
    } else {
        Transition::Changed {
            from,
            to,
            effects: entry_effects(to),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_transition_is_unchanged() {
        for m in [Mode::Idle, Mode::Config, Mode::Mod] {
            let t = transition(m, m);
            assert_eq!(t, Transition::Unchanged(m));
            assert!(t.effects().is_empty());
        }
    }

    #[test]
    fn entering_mod_arms_the_loop() {
        for from in [Mode::Idle, Mode::Config] {
            let t = transition(from, Mode::Mod);
            assert!(t.effects().contains(&Effect::ArmLoopTimer));
            assert!(t.effects().contains(&Effect::EnablePwm));
            assert!(!t.effects().contains(&Effect::ResetPlant));
        }
    }

    #[test]
    fn leaving_mod_resets_everything() {
        for to in [Mode::Idle, Mode::Config] {
            let effects = transition(Mode::Mod, to).effects();
            for e in [
                Effect::DisarmLoopTimer,
                Effect::DisablePwm,
                Effect::ZeroOutputs,
                Effect::ResetPlant,
                Effect::ResetController,
                Effect::StopStream,
                Effect::Indicate(to),
            ] {
                assert!(effects.contains(&e), "{:?} missing for {:?}", e, to);
            }
        }
    }

    #[test]
    fn names_parse_case_insensitively() {
        assert_eq!(Mode::from_name("idle"), Some(Mode::Idle));
        assert_eq!(Mode::from_name("CoNfIg"), Some(Mode::Config));
        assert_eq!(Mode::from_name("MOD"), Some(Mode::Mod));
        assert_eq!(Mode::from_name("modulating"), None);
    }

    #[test]
    fn button_cycle() {
        assert_eq!(Mode::Idle.next(), Mode::Config);
        assert_eq!(Mode::Config.next(), Mode::Mod);
        assert_eq!(Mode::Mod.next(), Mode::Idle);
    }
}
