//! Where the report goes.
//!
//! The reporter only needs three primitives, so any text device can take
//! the report: the VGA text buffer, the serial port, or a test recorder.

use khal::vga::{self, Color, ColorCode};

/// Red background, bright white foreground.
pub const ALERT_STYLE: ColorCode = ColorCode::new(Color::White, Color::Red);

/// A synchronous, infallible text device.
pub trait OutputSink {
    /// Emits `text` as is, no implicit newline.
    fn write(&mut self, text: &str);

    /// Emits `value` in hex digits. No `0x` prefix; the caller writes it.
    fn write_hex(&mut self, value: u32);

    /// Sets the VGA-style attribute byte for subsequent writes.
    fn set_style(&mut self, attribute: u8);
}

impl<S: OutputSink + ?Sized> OutputSink for &mut S {
    fn write(&mut self, text: &str) {
        (**self).write(text);
    }

    fn write_hex(&mut self, value: u32) {
        (**self).write_hex(value);
    }

    fn set_style(&mut self, attribute: u8) {
        (**self).set_style(attribute);
    }
}

impl OutputSink for vga::Writer<'_> {
    fn write(&mut self, text: &str) {
        self.write_str(text);
    }

    fn write_hex(&mut self, value: u32) {
        vga::Writer::write_hex(self, value);
    }

    fn set_style(&mut self, attribute: u8) {
        self.set_color(ColorCode::from_raw(attribute));
    }
}

/// Upper-case, zero-padded, eight digits.
pub fn hex_digits(value: u32) -> [u8; 8] {
    const DIGITS: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = [b'0'; 8];
    for (i, slot) in out.iter_mut().enumerate() {
        let shift = (7 - i) * 4;
        *slot = DIGITS[((value >> shift) & 0xF) as usize];
    }
    out
}

/// Sends every primitive to two sinks, first `A` then `B`.
pub struct Tee<A, B> {
    pub first: A,
    pub second: B,
}

impl<A, B> Tee<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: OutputSink, B: OutputSink> OutputSink for Tee<A, B> {
    fn write(&mut self, text: &str) {
        self.first.write(text);
        self.second.write(text);
    }

    fn write_hex(&mut self, value: u32) {
        self.first.write_hex(value);
        self.second.write_hex(value);
    }

    fn set_style(&mut self, attribute: u8) {
        self.first.set_style(attribute);
        self.second.set_style(attribute);
    }
}

/// ANSI SGR colour numbers `(foreground, background)` closest to a VGA attribute.
pub fn ansi_colors(attribute: u8) -> (u8, u8) {
    // VGA palette order is BGR, ANSI is RGB.
    const ANSI_ORDER: [u8; 8] = [0, 4, 2, 6, 1, 5, 3, 7];
    let fg = attribute & 0x0F;
    let bg = (attribute >> 4) & 0x07;
    let fg_base = if fg & 0x08 != 0 { 90 } else { 30 };
    (
        fg_base + ANSI_ORDER[(fg & 0x07) as usize],
        40 + ANSI_ORDER[bg as usize],
    )
}

/// Report mirror on COM1.
///
/// Never waits for the port lock: if the interrupted code was in the middle
/// of printing, the mirror stays silent and the VGA copy is all there is.
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub struct SerialSink;

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
impl OutputSink for SerialSink {
    fn write(&mut self, text: &str) {
        khal::serial::try_write_str(text);
    }

    fn write_hex(&mut self, value: u32) {
        let digits = hex_digits(value);
        if let Ok(text) = core::str::from_utf8(&digits) {
            khal::serial::try_write_str(text);
        }
    }

    fn set_style(&mut self, attribute: u8) {
        let (fg, bg) = ansi_colors(attribute);
        khal::serial::try_write_fmt(format_args!("\x1b[{fg};{bg}m"));
    }
}
