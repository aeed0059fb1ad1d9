// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Independent watchdog.
//!
//! Clocked by the 32 kHz LSI, prescaler 64, so one reload count is 2 ms. Once started it cannot
//! be stopped; a missed refresh resets the MCU.

use stm32f7xx_hal::pac;

use crate::hw::Watchdog;

const KEY_START: u32 = 0xCCCC;
const KEY_UNLOCK: u32 = 0x5555;
const KEY_REFRESH: u32 = 0xAAAA;

const LSI_HZ: u32 = 32_000;
const PRESCALER_DIV64: u32 = 0b100;
const PRESCALER: u32 = 64;
const RELOAD_MAX: u32 = 0x0FFF;

pub struct Iwdg {
    iwdg: pac::IWDG,
}

impl Iwdg {
    pub fn start(iwdg: pac::IWDG, timeout_ms: u32) -> Self {
        let reload = (timeout_ms * (LSI_HZ / PRESCALER) / 1000).clamp(1, RELOAD_MAX);

        iwdg.kr.write(|w| unsafe { w.bits(KEY_START) });
        iwdg.kr.write(|w| unsafe { w.bits(KEY_UNLOCK) });
        iwdg.pr.write(|w| unsafe { w.bits(PRESCALER_DIV64) });
        iwdg.rlr.write(|w| unsafe { w.bits(reload) });

        // Wait for the prescaler and reload updates to land
        while iwdg.sr.read().bits() != 0 {}

        iwdg.kr.write(|w| unsafe { w.bits(KEY_REFRESH) });
        Self { iwdg }
    }
}

impl Watchdog for Iwdg {
    #[inline]
    fn refresh(&mut self) {
        self.iwdg.kr.write(|w| unsafe { w.bits(KEY_REFRESH) });
    }
}
