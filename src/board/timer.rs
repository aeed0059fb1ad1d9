// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Periodic interrupt sources.
//!
//! - TIM2 (32-bit) paces the control loop and drives the loop-rate PWM on CH1 (PA5). Its update
//!   interrupt is armed only while modulating.
//! - TIM3 (16-bit) paces button sampling and always runs.
//! - SysTick runs at 1 kHz and feeds the print divider.
//!
//! Both timers count at [`COUNT_RATE_HZ`]; the auto-reload value sets the period.

use cortex_m::peripheral::{syst::SystClkSource, NVIC, SYST};
use stm32f7xx_hal::{
    gpio::{gpioa, Alternate},
    pac::{self, Interrupt},
};

use crate::hw::{LoopTimer, Pwm};

/// Timer counter rate after the prescaler.
pub const COUNT_RATE_HZ: u32 = 10_000;

fn enable_clocks() {
    // SAFETY: RCC is owned by the HAL after `constrain()`; these bits are not touched by it.
    let rcc = unsafe { &*pac::RCC::ptr() };
    rcc.apb1enr
        .modify(|_, w| w.tim2en().set_bit().tim3en().set_bit());
}

/// TIM2: control loop period and PWM output.
pub struct LoopPwm {
    tim: pac::TIM2,
    period: u32,
    _ch1: gpioa::PA5<Alternate<1>>,
}

impl LoopPwm {
    /// Configure TIM2 to overflow at `rate_hz`, CH1 in PWM mode 1, output and interrupt off.
    pub fn tim2(
        tim2: pac::TIM2,
        ch1: gpioa::PA5<Alternate<1>>,
        timer_clock_hz: u32,
        rate_hz: u32,
    ) -> Self {
        enable_clocks();
        let tim = tim2;
        let period = COUNT_RATE_HZ / rate_hz;

        // Disable counter while configuring
        tim.cr1.modify(|_, w| w.cen().clear_bit());

        tim.psc
            .write(|w| unsafe { w.bits(timer_clock_hz / COUNT_RATE_HZ - 1) });
        tim.arr.write(|w| unsafe { w.bits(period - 1) });

        // PWM mode 1 on CH1, preloaded compare
        tim.ccmr1_output()
            .modify(|_, w| unsafe { w.oc1m().bits(0b110) }.oc1pe().set_bit());
        tim.ccr1.write(|w| unsafe { w.bits(0) });
        tim.ccer.modify(|_, w| w.cc1p().clear_bit().cc1e().clear_bit());

        // Auto-reload preload, load shadow registers, drop the resulting flag
        tim.cr1.modify(|_, w| w.arpe().set_bit());
        tim.egr.write(|w| w.ug().set_bit());
        tim.sr.modify(|_, w| w.uif().clear_bit());

        tim.cr1.modify(|_, w| w.cen().set_bit());

        Self {
            tim,
            period,
            _ch1: ch1,
        }
    }
}

impl Pwm for LoopPwm {
    fn set_duty_percent(&mut self, percent: f32) {
        let percent = percent.clamp(0.0, 100.0);
        let compare = (self.period as f32 * percent / 100.0) as u32;
        self.tim.ccr1.write(|w| unsafe { w.bits(compare) });
    }

    fn enable(&mut self) {
        self.tim.ccer.modify(|_, w| w.cc1e().set_bit());
    }

    fn disable(&mut self) {
        self.tim.ccer.modify(|_, w| w.cc1e().clear_bit());
    }
}

impl LoopTimer for LoopPwm {
    fn arm(&mut self) {
        self.tim.cnt.write(|w| unsafe { w.bits(0) });
        self.tim.sr.modify(|_, w| w.uif().clear_bit());
        self.tim.dier.modify(|_, w| w.uie().set_bit());
    }

    fn disarm(&mut self) {
        self.tim.dier.modify(|_, w| w.uie().clear_bit());
        self.tim.sr.modify(|_, w| w.uif().clear_bit());
        NVIC::unpend(Interrupt::TIM2);
    }
}

/// TIM3: free-running button sampling tick.
pub struct DebounceTimer {
    _tim: pac::TIM3,
}

impl DebounceTimer {
    pub fn tim3(tim3: pac::TIM3, timer_clock_hz: u32, rate_hz: u32) -> Self {
        enable_clocks();
        let tim = tim3;

        // Disable counter while configuring
        tim.cr1.modify(|_, w| w.cen().clear_bit());

        tim.psc
            .write(|w| unsafe { w.bits(timer_clock_hz / COUNT_RATE_HZ - 1) });
        tim.arr
            .write(|w| unsafe { w.bits(COUNT_RATE_HZ / rate_hz - 1) });

        tim.cr1.modify(|_, w| w.arpe().set_bit());
        tim.egr.write(|w| w.ug().set_bit());
        tim.sr.modify(|_, w| w.uif().clear_bit());
        tim.dier.modify(|_, w| w.uie().set_bit());

        tim.cr1.modify(|_, w| w.cen().set_bit());

        Self { _tim: tim }
    }
}

/// Acknowledge a TIM2 update. Called from the TIM2 handler.
#[inline]
pub fn ack_tim2() {
    // SAFETY: clearing UIF is the only access made from interrupt context.
    let tim = unsafe { &*pac::TIM2::ptr() };
    tim.sr.modify(|_, w| w.uif().clear_bit());
}

/// Acknowledge a TIM3 update. Called from the TIM3 handler.
#[inline]
pub fn ack_tim3() {
    // SAFETY: clearing UIF is the only access made from interrupt context.
    let tim = unsafe { &*pac::TIM3::ptr() };
    tim.sr.modify(|_, w| w.uif().clear_bit());
}

/// Start SysTick at `rate_hz` from the core clock.
pub fn start_systick(syst: &mut SYST, hclk_hz: u32, rate_hz: u32) {
    syst.disable_counter();
    syst.set_clock_source(SystClkSource::Core);
    syst.set_reload(hclk_hz / rate_hz - 1);
    syst.clear_current();
    syst.enable_interrupt();
    syst.enable_counter();
}
