//! x86 port-mapped I/O.
//!
//! A [`Port`] names one 8-bit I/O port. The UART driver is the only user;
//! the fault path never touches any other device register.

/// An 8-bit I/O port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Port(u16);

impl Port {
    pub const fn new(number: u16) -> Self {
        Self(number)
    }

    /// The port `offset` registers above this one.
    pub const fn offset(self, offset: u16) -> Self {
        Self(self.0 + offset)
    }

    /// Write a byte to the port.
    ///
    /// # Safety
    ///
    /// Writing to an arbitrary I/O port can have side effects on hardware.
    /// The caller must ensure the port and value are valid.
    #[inline]
    pub unsafe fn write(self, value: u8) {
        unsafe {
            core::arch::asm!(
                "out dx, al",
                in("dx") self.0,
                in("al") value,
                options(nomem, nostack, preserves_flags)
            );
        }
    }

    /// Read a byte from the port.
    ///
    /// # Safety
    ///
    /// Reading some device registers has side effects (e.g. popping a FIFO).
    /// The caller must ensure the port is valid.
    #[inline]
    pub unsafe fn read(self) -> u8 {
        let value: u8;
        unsafe {
            core::arch::asm!(
                "in al, dx",
                in("dx") self.0,
                out("al") value,
                options(nomem, nostack, preserves_flags)
            );
        }
        value
    }
}
