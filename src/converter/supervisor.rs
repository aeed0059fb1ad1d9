// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Converter supervisor.
//!
//! Owns the plant model, the operating mode and the converter type, and is the single entry point
//! for mode changes. Both the serial `mode` command and the push button go through
//! [`Supervisor::set_mode`], so every path gets the same resets.
//!
//! Plant-side resets are applied here. Everything else a transition requires (controller reset,
//! timer, PWM, streaming, indicators) is returned to the caller as [`Effect`]s.

use core::fmt;

use crate::control::Plant;
use crate::converter::mode::{self, Effect, Mode, Transition};
use crate::converter::topology::{ConverterType, Modulator};

/// Converter type access outside of CONFIG, or a no-op reselection.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TypeError {
    NotInConfig(Mode),
    AlreadySelected(ConverterType),
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeError::NotInConfig(mode) => {
                write!(f, "converter type is only accessible in CONFIG mode (now {})", mode)
            }
            TypeError::AlreadySelected(ty) => write!(f, "type {} is already selected", ty),
        }
    }
}

pub struct Supervisor {
    mode: Mode,
    topology: ConverterType,
    plant: Plant,
    modulator: Modulator,
}

impl Supervisor {
    pub const fn new() -> Self {
        Self {
            mode: Mode::Idle,
            topology: ConverterType::DcDcIdeal,
            plant: Plant::new(),
            modulator: Modulator::new(),
        }
    }

    /// Bring the supervisor to IDLE with a plant at rest.
    ///
    /// Returns the IDLE entry effects so the caller can put the hardware in a matching state.
    pub fn init(&mut self) -> &'static [Effect] {
        self.mode = Mode::Idle;
        self.reset_plant();
        mode::entry_effects(Mode::Idle)
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Request a mode change.
    ///
    /// A request for the current mode is reported as [`Transition::Unchanged`] and touches
    /// nothing.
    pub fn set_mode(&mut self, target: Mode) -> Transition {
        let transition = mode::transition(self.mode, target);
        if let Transition::Changed { from, to, effects } = transition {
            if effects.contains(&Effect::ResetPlant) {
                self.reset_plant();
            }
            self.mode = to;
            info!("mode {} -> {}", from.name(), to.name());
        }
        transition
    }

    /// Selected converter type. Only readable in CONFIG.
    pub fn get_type(&self) -> Result<ConverterType, TypeError> {
        match self.mode {
            Mode::Config => Ok(self.topology),
            other => Err(TypeError::NotInConfig(other)),
        }
    }

    /// Select the converter type. Only in CONFIG, and only if it differs from the current one.
    pub fn set_type(&mut self, ty: ConverterType) -> Result<(), TypeError> {
        if self.mode != Mode::Config {
            return Err(TypeError::NotInConfig(self.mode));
        }
        if ty == self.topology {
            return Err(TypeError::AlreadySelected(ty));
        }
        self.topology = ty;
        self.modulator.reset();
        info!("converter type {}", ty.id());
        Ok(())
    }

    /// Read-only view of the selected type, for the loop and status reporting.
    #[inline]
    pub fn topology(&self) -> ConverterType {
        self.topology
    }

    /// Step the plant. Only while MOD; otherwise the plant stays at rest and 0 is returned.
    pub fn step(&mut self, input: f32) -> f32 {
        if self.mode != Mode::Mod {
            return 0.0;
        }
        self.plant.step(input)
    }

    /// Reference for this loop tick, shaped by the converter type.
    pub fn shape_reference(&mut self, reference: f32) -> f32 {
        self.modulator.shape_reference(self.topology, reference)
    }

    /// Plant input for a controller output, mapped by the converter type.
    pub fn plant_input(&mut self, controller_out: f32) -> f32 {
        self.modulator.plant_input(self.topology, controller_out)
    }

    /// Reference the loop tracked on its last tick.
    #[inline]
    pub fn shaped_reference(&self) -> f32 {
        self.modulator.last_reference()
    }

    #[inline]
    pub fn plant(&self) -> &Plant {
        &self.plant
    }

    fn reset_plant(&mut self) {
        self.plant.reset();
        self.modulator.reset();
    }
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running() -> Supervisor {
        let mut s = Supervisor::new();
        s.init();
        assert!(s.set_mode(Mode::Mod).is_change());
        s
    }

    #[test]
    fn boots_idle() {
        let mut s = Supervisor::new();
        let effects = s.init();
        assert_eq!(s.mode(), Mode::Idle);
        assert!(effects.contains(&Effect::DisarmLoopTimer));
        assert!(s.plant().is_at_rest());
    }

    #[test]
    fn step_only_in_mod() {
        let mut s = Supervisor::new();
        assert_eq!(s.step(5.0), 0.0);
        assert!(s.plant().is_at_rest());

        let mut s = running();
        assert_ne!(s.step(5.0), 0.0);
        assert!(!s.plant().is_at_rest());
    }

    #[test]
    fn leaving_mod_zeroes_plant() {
        let mut s = running();
        for _ in 0..5 {
            s.step(3.0);
        }
        let t = s.set_mode(Mode::Idle);
        assert!(t.is_change());
        assert_eq!(s.mode(), Mode::Idle);
        assert!(s.plant().is_at_rest());
    }

    #[test]
    fn self_transition_touches_nothing() {
        let mut s = running();
        s.step(3.0);
        let before = s.plant().clone();
        assert_eq!(s.set_mode(Mode::Mod), Transition::Unchanged(Mode::Mod));
        assert_eq!(s.plant(), &before);
    }

    #[test]
    fn type_only_in_config() {
        let mut s = Supervisor::new();
        s.init();
        assert_eq!(
            s.set_type(ConverterType::InverterIdeal),
            Err(TypeError::NotInConfig(Mode::Idle))
        );
        assert_eq!(s.get_type(), Err(TypeError::NotInConfig(Mode::Idle)));

        s.set_mode(Mode::Config);
        assert_eq!(
            s.set_type(ConverterType::DcDcIdeal),
            Err(TypeError::AlreadySelected(ConverterType::DcDcIdeal))
        );
        assert_eq!(s.set_type(ConverterType::InverterHBridge), Ok(()));
        assert_eq!(s.get_type(), Ok(ConverterType::InverterHBridge));

        s.set_mode(Mode::Mod);
        assert_eq!(
            s.set_type(ConverterType::DcDcIdeal),
            Err(TypeError::NotInConfig(Mode::Mod))
        );
        assert_eq!(s.topology(), ConverterType::InverterHBridge);
    }
}
