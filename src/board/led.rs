// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Mode LEDs and user button.

use stm32f7xx_hal::gpio::{gpiob, gpioc, Floating, Input, Output, PushPull};

use crate::converter::Mode;
use crate::hw::{ModeIndicator, PushButton};

/// One LED per mode. Exactly one is lit.
pub struct ModeLeds {
    idle: gpiob::PB7<Output<PushPull>>,
    config: gpiob::PB14<Output<PushPull>>,
    modulating: gpiob::PB0<Output<PushPull>>,
}

impl ModeLeds {
    /// Blue marks IDLE, red CONFIG, green MOD. All start off.
    pub fn new(
        mut blue: gpiob::PB7<Output<PushPull>>,
        mut red: gpiob::PB14<Output<PushPull>>,
        mut green: gpiob::PB0<Output<PushPull>>,
    ) -> Self {
        blue.set_low();
        red.set_low();
        green.set_low();
        Self {
            idle: blue,
            config: red,
            modulating: green,
        }
    }
}

impl ModeIndicator for ModeLeds {
    fn show_mode(&mut self, mode: Mode) {
        self.idle.set_low();
        self.config.set_low();
        self.modulating.set_low();
        match mode {
            Mode::Idle => self.idle.set_high(),
            Mode::Config => self.config.set_high(),
            Mode::Mod => self.modulating.set_high(),
        }
    }
}

pub struct UserButton {
    pin: gpioc::PC13<Input<Floating>>,
}

impl UserButton {
    pub fn new(pin: gpioc::PC13<Input<Floating>>) -> Self {
        Self { pin }
    }
}

impl PushButton for UserButton {
    #[inline]
    fn is_pressed(&mut self) -> bool {
        self.pin.is_high()
    }
}
