// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Converter topologies and how each maps controller output onto the plant.
//!
//! - DC/DC types track the reference directly, inverter types track `reference · sin(φ)`.
//! - Ideal types feed the controller output straight into the plant, H-bridge types feed a
//!   bipolar `±V_dc` square wave whose duty follows the controller output.

use core::f32::consts::TAU;
use core::fmt;

#[allow(unused_imports)]
use micromath::F32Ext;

use crate::config::{CARRIER_STEPS, DC_LINK_VOLTAGE, REF_MAX, SINE_STEPS};

/// Converter topology selector.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ConverterType {
    DcDcIdeal = 0,
    InverterIdeal = 1,
    DcDcHBridge = 2,
    InverterHBridge = 3,
}

impl ConverterType {
    /// Number of selectable types. Valid ids are `0..COUNT`.
    pub const COUNT: u8 = 4;

    pub const ALL: [ConverterType; 4] = [
        ConverterType::DcDcIdeal,
        ConverterType::InverterIdeal,
        ConverterType::DcDcHBridge,
        ConverterType::InverterHBridge,
    ];

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    #[inline]
    pub const fn id(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            ConverterType::DcDcIdeal => "DC/DC (ideal)",
            ConverterType::InverterIdeal => "Inverter (ideal)",
            ConverterType::DcDcHBridge => "DC/DC (H-bridge)",
            ConverterType::InverterHBridge => "Inverter (H-bridge)",
        }
    }

    #[inline]
    pub const fn is_inverter(self) -> bool {
        matches!(
            self,
            ConverterType::InverterIdeal | ConverterType::InverterHBridge
        )
    }

    #[inline]
    pub const fn is_switched(self) -> bool {
        matches!(
            self,
            ConverterType::DcDcHBridge | ConverterType::InverterHBridge
        )
    }

    /// Loop-rate PWM duty (%) that visualizes a controller output.
    ///
    /// Inverters light up on both half-waves.
    pub fn duty_percent(self, controller_out: f32) -> f32 {
        let level = if self.is_inverter() {
            controller_out.abs()
        } else {
            controller_out
        };
        100.0 * (level / REF_MAX).clamp(0.0, 1.0)
    }
}

impl fmt::Display for ConverterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.id(), self.name())
    }
}

/// Per-tick reference shaping and bridge switching.
#[derive(Debug, Clone, PartialEq)]
pub struct Modulator {
    /// Inverter reference phase, [0, 2π)
    phase: f32,
    /// H-bridge carrier position, 0..CARRIER_STEPS
    carrier_step: u32,
    /// Last shaped reference
    reference: f32,
}

impl Modulator {
    pub const fn new() -> Self {
        Self {
            phase: 0.0,
            carrier_step: 0,
            reference: 0.0,
        }
    }

    /// Restart phase and carrier.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Reference the loop should track this tick. Advances the inverter phase.
    pub fn shape_reference(&mut self, ty: ConverterType, reference: f32) -> f32 {
        self.reference = if ty.is_inverter() {
            self.phase += TAU / SINE_STEPS as f32;
            if self.phase >= TAU {
                self.phase -= TAU;
            }
            reference * self.phase.sin()
        } else {
            reference
        };
        self.reference
    }

    /// Plant input for a controller output. Advances the carrier for switched types.
    pub fn plant_input(&mut self, ty: ConverterType, controller_out: f32) -> f32 {
        if !ty.is_switched() {
            return controller_out;
        }

        let index = (controller_out / DC_LINK_VOLTAGE).clamp(-1.0, 1.0);
        let carrier = -1.0 + 2.0 * self.carrier_step as f32 / CARRIER_STEPS as f32;
        self.carrier_step = (self.carrier_step + 1) % CARRIER_STEPS;

        if index > carrier {
            DC_LINK_VOLTAGE
        } else {
            -DC_LINK_VOLTAGE
        }
    }

    /// Reference produced by the last [`Modulator::shape_reference`] call.
    #[inline]
    pub fn last_reference(&self) -> f32 {
        self.reference
    }

    #[inline]
    pub fn phase(&self) -> f32 {
        self.phase
    }
}

impl Default for Modulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_and_reject_out_of_range() {
        for ty in ConverterType::ALL {
            assert_eq!(ConverterType::from_id(ty.id()), Some(ty));
        }
        assert_eq!(ConverterType::from_id(ConverterType::COUNT), None);
    }

    #[test]
    fn dc_reference_passes_through() {
        let mut m = Modulator::new();
        assert_eq!(m.shape_reference(ConverterType::DcDcIdeal, 12.0), 12.0);
        assert_eq!(m.phase(), 0.0);
    }

    #[test]
    fn inverter_reference_follows_a_sine() {
        let mut m = Modulator::new();
        let mut peak = 0.0f32;
        for _ in 0..SINE_STEPS {
            let r = m.shape_reference(ConverterType::InverterIdeal, 10.0);
            assert!(r.abs() <= 10.0 + 1e-3);
            peak = peak.max(r);
        }
        assert!(peak > 9.9, "peak {}", peak);
        // One full period brings the phase back near zero.
        assert!(m.phase() < 1e-3 || (TAU - m.phase()) < 1e-3);
    }

    #[test]
    fn ideal_input_is_controller_output() {
        let mut m = Modulator::new();
        assert_eq!(m.plant_input(ConverterType::InverterIdeal, -7.5), -7.5);
    }

    #[test]
    fn bridge_average_tracks_controller_output() {
        let mut m = Modulator::new();
        let demand = DC_LINK_VOLTAGE / 2.0;
        let mut sum = 0.0;
        for _ in 0..CARRIER_STEPS {
            let u = m.plant_input(ConverterType::DcDcHBridge, demand);
            assert!(u == DC_LINK_VOLTAGE || u == -DC_LINK_VOLTAGE);
            sum += u;
        }
        let avg = sum / CARRIER_STEPS as f32;
        assert!((avg - demand).abs() <= 2.0 * DC_LINK_VOLTAGE / CARRIER_STEPS as f32);
    }

    #[test]
    fn duty_mapping() {
        assert_eq!(ConverterType::DcDcIdeal.duty_percent(25.0), 50.0);
        assert_eq!(ConverterType::DcDcIdeal.duty_percent(-25.0), 0.0);
        assert_eq!(ConverterType::InverterIdeal.duty_percent(-25.0), 50.0);
        assert_eq!(ConverterType::DcDcHBridge.duty_percent(500.0), 100.0);
    }
}
