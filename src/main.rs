// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Converter controller firmware for the Nucleo-F767ZI.
//!
//! Interrupt handlers only acknowledge their peripheral and raise a ready bit (the USART handler
//! also queues the received byte). All work happens in the scheduler tasks.

#![no_main]
#![no_std]

use cortex_m_rt::{entry, exception};
use defmt_rtt as _;
use panic_halt as _;

use hal::pac::{self, interrupt};
use stm32f7xx_hal as hal;

use convctl::app::App;
use convctl::board::{self, NucleoBoard, RxQueue};
use convctl::config::PRINT_PERIOD_TICKS;
use convctl::sched::{ReadySet, Scheduler, TaskId};

static READY: ReadySet = ReadySet::new();
static RX_QUEUE: RxQueue = RxQueue::new();

#[entry]
fn main() -> ! {
    // Peripherals
    let dp = pac::Peripherals::take().unwrap();
    let cp = cortex_m::Peripherals::take().unwrap();

    let (board, mut watchdog) = NucleoBoard::init(dp, cp, &RX_QUEUE);

    let mut app = App::new(board);
    app.start();

    let scheduler = Scheduler::new(&READY, App::<NucleoBoard>::TASKS);
    scheduler.run(&mut app, &mut watchdog)
}

#[interrupt]
fn TIM2() {
    board::timer::ack_tim2();
    READY.raise(TaskId::ControlLoop);
}

#[interrupt]
fn USART3() {
    if board::usart::on_rx_interrupt(&RX_QUEUE) {
        READY.raise(TaskId::SerialRx);
    }
}

#[interrupt]
fn TIM3() {
    board::timer::ack_tim3();
    READY.raise(TaskId::Button);
}

#[exception]
fn SysTick() {
    static mut TICKS: u32 = 0;

    *TICKS += 1;
    if *TICKS >= PRINT_PERIOD_TICKS {
        *TICKS = 0;
        READY.raise(TaskId::PrintOutput);
    }
}
