// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Nucleo-F767ZI Board Support
//!
//! Implements the [`crate::hw`] traits on real peripherals. Only compiled with the `board`
//! feature.
//!
//! | Function | Peripheral | Pins |
//! | -------- | ---------- | ---- |
//! | Terminal | USART3, 115200 8N1, RXNE interrupt | PD8 / PD9 (ST-LINK VCP) |
//! | Control loop tick + loop PWM | TIM2 update, TIM2_CH1 | PA5 |
//! | Button sampling tick | TIM3 update | |
//! | Print tick | SysTick 1 kHz | |
//! | Mode LEDs | GPIO | PB7 blue, PB14 red, PB0 green |
//! | User button | GPIO | PC13 |
//! | Watchdog | IWDG | |
//!
//! Interrupt priorities follow task priorities: TIM2 highest, then USART3, TIM3, SysTick.

use core::fmt;

use cortex_m::peripheral::{scb::SystemHandler, NVIC};
use stm32f7xx_hal::{
    pac::{self, Interrupt},
    prelude::*,
    serial::{self, Serial},
};

use crate::config::{
    BAUD_RATE, DEBOUNCE_RATE_HZ, LOOP_RATE_HZ, SYSTICK_RATE_HZ, WATCHDOG_TIMEOUT_MS,
};
use crate::converter::Mode;
use crate::hw::{LoopTimer, ModeIndicator, Pwm, PushButton, Serial as SerialLink};

pub mod iwdg;
pub mod led;
pub mod pins;
pub mod timer;
pub mod usart;

pub use iwdg::Iwdg;
pub use led::{ModeLeds, UserButton};
pub use pins::BoardPins;
pub use timer::{DebounceTimer, LoopPwm};
pub use usart::{RxQueue, Usart};

/// NVIC priority values (upper four bits significant).
const PRIO_LOOP: u8 = 0 << 4;
const PRIO_RX: u8 = 1 << 4;
const PRIO_BUTTON: u8 = 2 << 4;
const PRIO_SYSTICK: u8 = 3 << 4;

pub struct NucleoBoard {
    usart: Usart<pac::USART3>,
    loop_pwm: LoopPwm,
    leds: ModeLeds,
    button: UserButton,
    _debounce: DebounceTimer,
}

impl NucleoBoard {
    /// Bring up clocks, pins and peripherals, start the watchdog and enable the interrupts.
    ///
    /// Interrupt handlers only touch `rx` and the ready set, so they may fire as soon as this
    /// returns.
    pub fn init(
        dp: pac::Peripherals,
        mut cp: cortex_m::Peripherals,
        rx: &'static RxQueue,
    ) -> (Self, Iwdg) {
        // Clocks
        let rcc = dp.RCC.constrain();
        let clocks = rcc.cfgr.freeze();
        let timer_clock = clocks.timclk1().raw();

        let pins = BoardPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOC, dp.GPIOD);

        // USART3 (ST-LINK VCP)
        let usart_cfg = serial::Config {
            baud_rate: BAUD_RATE.bps(),
            ..Default::default()
        };
        let serial = Serial::new(
            dp.USART3,
            (pins.usart3.tx, pins.usart3.rx),
            &clocks,
            usart_cfg,
        );
        let mut usart = Usart::new(serial, rx);
        usart.listen_rx();

        let loop_pwm = LoopPwm::tim2(dp.TIM2, pins.pwm.tim2_ch1, timer_clock, LOOP_RATE_HZ);
        let debounce = DebounceTimer::tim3(dp.TIM3, timer_clock, DEBOUNCE_RATE_HZ);

        let leds = ModeLeds::new(pins.leds.blue, pins.leds.red, pins.leds.green);
        let button = UserButton::new(pins.button);

        timer::start_systick(&mut cp.SYST, clocks.hclk().raw(), SYSTICK_RATE_HZ);

        // SAFETY: priorities are set before the lines are unmasked, and no handler relies on a
        // critical section held across these calls.
        unsafe {
            cp.SCB.set_priority(SystemHandler::SysTick, PRIO_SYSTICK);
            cp.NVIC.set_priority(Interrupt::TIM2, PRIO_LOOP);
            cp.NVIC.set_priority(Interrupt::USART3, PRIO_RX);
            cp.NVIC.set_priority(Interrupt::TIM3, PRIO_BUTTON);
            NVIC::unmask(Interrupt::TIM2);
            NVIC::unmask(Interrupt::USART3);
            NVIC::unmask(Interrupt::TIM3);
        }

        let watchdog = Iwdg::start(dp.IWDG, WATCHDOG_TIMEOUT_MS);
        info!("board up, timer clock {} Hz", timer_clock);

        (
            Self {
                usart,
                loop_pwm,
                leds,
                button,
                _debounce: debounce,
            },
            watchdog,
        )
    }
}

impl fmt::Write for NucleoBoard {
    #[inline]
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.usart.write_str(s);
        Ok(())
    }
}

impl SerialLink for NucleoBoard {
    #[inline]
    fn receive_byte(&mut self) -> Option<u8> {
        self.usart.receive_byte()
    }
}

impl Pwm for NucleoBoard {
    fn set_duty_percent(&mut self, percent: f32) {
        self.loop_pwm.set_duty_percent(percent);
    }

    fn enable(&mut self) {
        self.loop_pwm.enable();
    }

    fn disable(&mut self) {
        self.loop_pwm.disable();
    }
}

impl LoopTimer for NucleoBoard {
    fn arm(&mut self) {
        self.loop_pwm.arm();
    }

    fn disarm(&mut self) {
        self.loop_pwm.disarm();
    }
}

impl ModeIndicator for NucleoBoard {
    fn show_mode(&mut self, mode: Mode) {
        self.leds.show_mode(mode);
    }
}

impl PushButton for NucleoBoard {
    fn is_pressed(&mut self) -> bool {
        self.button.is_pressed()
    }
}
