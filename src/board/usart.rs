// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! USART terminal link.
//!
//! Transmit is blocking, byte by byte. Receive is interrupt driven: the USART3 handler calls
//! [`on_rx_interrupt`], which moves the byte into an [`RxQueue`] that the serial task drains.
//!
//! Note: When using `write!`, be sure to include `\r` (CR) in the format string to ensure correct
//! line endings on the terminal.
//!
//! To access the terminal on the host machine, connect to the ST-LINK USB port and use
//! ```text
//! $ screen /dev/tty.usbmodem* 115200
//! ```

use core::cell::RefCell;
use core::fmt;

use cortex_m::interrupt::{self, Mutex};
use heapless::Deque;
use nb::block;
use stm32f7xx_hal::{
    pac,
    prelude::*,
    serial::{Instance, Pins, Serial, Tx},
};

use crate::config::RX_QUEUE_LEN;
use crate::hw;

/// Bytes received by the interrupt handler, waiting for the serial task.
pub struct RxQueue {
    bytes: Mutex<RefCell<Deque<u8, RX_QUEUE_LEN>>>,
}

impl RxQueue {
    pub const fn new() -> Self {
        Self {
            bytes: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Queue a byte. Returns `false` if the queue was full and the byte was dropped.
    pub fn push(&self, byte: u8) -> bool {
        interrupt::free(|cs| self.bytes.borrow(cs).borrow_mut().push_back(byte).is_ok())
    }

    pub fn pop(&self) -> Option<u8> {
        interrupt::free(|cs| self.bytes.borrow(cs).borrow_mut().pop_front())
    }
}

impl Default for RxQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// USART3 receive handler body. Returns `true` if a byte was queued.
pub fn on_rx_interrupt(queue: &RxQueue) -> bool {
    // SAFETY: read-only status access plus RDR/ICR, which only this handler touches.
    let usart = unsafe { &*pac::USART3::ptr() };
    let isr = usart.isr.read();

    if isr.ore().bit_is_set() {
        usart.icr.write(|w| w.orecf().set_bit());
    }
    if isr.rxne().bit_is_clear() {
        return false;
    }

    let byte = usart.rdr.read().rdr().bits() as u8;
    if !queue.push(byte) {
        warn!("rx queue full, byte dropped");
        return false;
    }
    true
}

pub struct Usart<U: Instance> {
    tx: Tx<U>,
    rx: &'static RxQueue,
}

impl<U: Instance> Usart<U> {
    pub fn new<PINS: Pins<U>>(serial: Serial<U, PINS>, rx: &'static RxQueue) -> Self {
        let (tx, _rx) = serial.split();
        Self { tx, rx }
    }

    #[inline]
    pub fn write_byte(&mut self, b: u8) {
        let _ = block!(self.tx.write(b));
    }

    pub fn write_str(&mut self, s: &str) {
        for &b in s.as_bytes() {
            self.write_byte(b);
        }
    }
}

impl Usart<pac::USART3> {
    /// Raise the USART3 interrupt on every received byte.
    pub fn listen_rx(&mut self) {
        // SAFETY: single read-modify-write of CR1 during bring-up.
        let usart = unsafe { &*pac::USART3::ptr() };
        usart.cr1.modify(|_, w| w.rxneie().set_bit());
    }
}

// Implement `core::fmt::Write` so we can use `write!` on `Usart`.
impl<U: Instance> fmt::Write for Usart<U> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        Usart::write_str(self, s);
        Ok(())
    }
}

impl<U: Instance> hw::Serial for Usart<U> {
    #[inline]
    fn receive_byte(&mut self) -> Option<u8> {
        self.rx.pop()
    }
}
