//! Serial port (COM1 UART 16550) driver.
//!
//! Used for kernel logging and as a mirror of the fault report. The fault
//! path must never block on the port lock: a fault can arrive while normal
//! kernel code holds it. The `try_*` functions give up instead of spinning.

use core::fmt;
use spin::Mutex;

use crate::port::Port;

/// COM1 base port address
const COM1: Port = Port::new(0x3F8);

const DATA: u16 = 0;
const INTERRUPT_ENABLE: u16 = 1;
const FIFO_CONTROL: u16 = 2;
const LINE_CONTROL: u16 = 3;
const MODEM_CONTROL: u16 = 4;
const LINE_STATUS: u16 = 5;

/// Line status: transmitter holding register empty.
const THR_EMPTY: u8 = 0x20;

/// Serial port driver for one 16550 UART.
pub struct Serial {
    base: Port,
    initialized: bool,
}

impl Serial {
    /// Create a new uninitialized Serial port instance
    const fn new(base: Port) -> Self {
        Self {
            base,
            initialized: false,
        }
    }

    /// Initialize the serial port (115200 baud, 8N1)
    pub fn init(&mut self) {
        let reg = |offset| self.base.offset(offset);
        unsafe {
            // Disable all interrupts
            reg(INTERRUPT_ENABLE).write(0x00);

            // Enable DLAB, divisor 1 (115200 baud)
            reg(LINE_CONTROL).write(0x80);
            reg(DATA).write(0x01);
            reg(INTERRUPT_ENABLE).write(0x00);

            // 8 bits, no parity, one stop bit (clear DLAB)
            reg(LINE_CONTROL).write(0x03);

            // Enable FIFO, clear them, with 14-byte threshold
            reg(FIFO_CONTROL).write(0xC7);

            // Loopback self-test. A failed echo is not fatal: output may
            // simply be lost, which is still better than no kernel at all.
            reg(MODEM_CONTROL).write(0x1E);
            reg(DATA).write(0xAE);
            let _echoed = reg(DATA).read();

            // Normal operation (OUT1, OUT2, RTS, DTR), interrupts stay off.
            reg(MODEM_CONTROL).write(0x0F);
        }
        self.initialized = true;
    }

    fn is_transmit_empty(&self) -> bool {
        unsafe { self.base.offset(LINE_STATUS).read() & THR_EMPTY != 0 }
    }

    /// Write a byte to the serial port
    pub fn write_byte(&self, byte: u8) {
        if !self.initialized {
            return;
        }

        while !self.is_transmit_empty() {
            core::hint::spin_loop();
        }

        unsafe {
            self.base.offset(DATA).write(byte);
        }
    }

    /// Write a string to the serial port
    pub fn write_str(&self, s: &str) {
        for byte in s.bytes() {
            self.write_byte(byte);
        }
    }
}

impl fmt::Write for Serial {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        Serial::write_str(self, s);
        Ok(())
    }
}

/// Global serial port instance (COM1)
static SERIAL: Mutex<Serial> = Mutex::new(Serial::new(COM1));

/// Initialize the global serial port
pub fn init() {
    SERIAL.lock().init();
}

/// Write formatted arguments to the serial port
pub fn write_fmt(args: fmt::Arguments) {
    use fmt::Write;
    let _ = SERIAL.lock().write_fmt(args);
}

/// Write a string unless the port is already held. Returns whether it was written.
pub fn try_write_str(s: &str) -> bool {
    match SERIAL.try_lock() {
        Some(serial) => {
            serial.write_str(s);
            true
        }
        None => false,
    }
}

/// Write formatted arguments unless the port is already held.
pub fn try_write_fmt(args: fmt::Arguments) -> bool {
    use fmt::Write;
    match SERIAL.try_lock() {
        Some(mut serial) => serial.write_fmt(args).is_ok(),
        None => false,
    }
}
