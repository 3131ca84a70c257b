//! VGA text-mode (80x25) writer.
//!
//! Each cell of the text buffer is a `u16`: the low byte is the code-page
//! 437 character, the high byte the colour attribute (background in the
//! high nibble, foreground in the low nibble).
//!
//! The writer appends at the bottom row and scrolls the screen up, so
//! whatever the kernel printed before stays visible above new output.
//! Scrolling for a newline is deferred to the next character: a block of
//! text ending in `\n` occupies exactly as many rows as it has lines.

use core::fmt;
use core::ptr;

/// Physical (and identity-mapped) address of the colour text buffer.
pub const TEXT_BUFFER_ADDR: usize = 0xB8000;

pub const BUFFER_WIDTH: usize = 80;
pub const BUFFER_HEIGHT: usize = 25;

/// Glyph drawn in place of characters outside printable ASCII.
const REPLACEMENT_GLYPH: u8 = 0xFE;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

#[repr(u8)]
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Black = 0x0,
    Blue = 0x1,
    Green = 0x2,
    Cyan = 0x3,
    Red = 0x4,
    Magenta = 0x5,
    Brown = 0x6,
    LightGrey = 0x7,
    DarkGrey = 0x8,
    LightBlue = 0x9,
    LightGreen = 0xA,
    LightCyan = 0xB,
    LightRed = 0xC,
    Pink = 0xD,
    Yellow = 0xE,
    White = 0xF,
}

/// A foreground/background attribute byte.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorCode(u8);

impl ColorCode {
    pub const fn new(foreground: Color, background: Color) -> Self {
        Self((background as u8) << 4 | (foreground as u8))
    }

    pub const fn from_raw(attribute: u8) -> Self {
        Self(attribute)
    }

    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl Default for ColorCode {
    fn default() -> Self {
        Self::new(Color::LightGrey, Color::Black)
    }
}

/// Returns the hardware text buffer as a cell slice.
///
/// # Safety
///
/// `TEXT_BUFFER_ADDR` must be mapped and writable, and the caller must be
/// the only writer for the lifetime of the returned slice. On the fault
/// path both hold: the kernel identity-maps low memory and nothing else
/// runs once a fault is being reported.
pub unsafe fn text_buffer() -> &'static mut [u16] {
    unsafe {
        core::slice::from_raw_parts_mut(
            TEXT_BUFFER_ADDR as *mut u16,
            BUFFER_WIDTH * BUFFER_HEIGHT,
        )
    }
}

/// A cursor-tracking writer over a text buffer.
pub struct Writer<'a> {
    cells: &'a mut [u16],
    rows: usize,
    column: usize,
    color: ColorCode,
    /// A `\n` was written but the screen hasn't scrolled for it yet.
    line_pending: bool,
}

impl<'a> Writer<'a> {
    /// Creates a writer over `cells`, which holds whole 80-column rows.
    /// Trailing cells that don't fill a row are never touched.
    pub fn new(cells: &'a mut [u16]) -> Self {
        let rows = cells.len() / BUFFER_WIDTH;
        Self {
            cells,
            rows,
            column: 0,
            color: ColorCode::default(),
            line_pending: false,
        }
    }

    /// Sets the attribute for subsequent writes. Already drawn cells keep theirs.
    pub fn set_color(&mut self, color: ColorCode) {
        self.color = color;
    }

    /// Writes one code-page 437 byte. A newline only scrolls once the next
    /// byte arrives, so a trailing `\n` doesn't cost a screen row.
    pub fn write_byte(&mut self, byte: u8) {
        if self.rows == 0 {
            return;
        }
        if self.line_pending {
            self.scroll();
            self.line_pending = false;
        }
        match byte {
            b'\n' => self.line_pending = true,
            byte => {
                if self.column >= BUFFER_WIDTH {
                    self.scroll();
                }
                let index = (self.rows - 1) * BUFFER_WIDTH + self.column;
                self.put(index, byte);
                self.column += 1;
            }
        }
    }

    /// Writes printable ASCII as is and one replacement glyph per other character.
    pub fn write_str(&mut self, s: &str) {
        for ch in s.chars() {
            match ch {
                ' '..='~' | '\n' => self.write_byte(ch as u8),
                _ => self.write_byte(REPLACEMENT_GLYPH),
            }
        }
    }

    /// Writes `value` as eight upper-case hex digits, zero padded, no prefix.
    pub fn write_hex(&mut self, value: u32) {
        for shift in (0..8).rev() {
            let nibble = (value >> (shift * 4)) & 0xF;
            self.write_byte(HEX_DIGITS[nibble as usize]);
        }
    }

    fn put(&mut self, index: usize, byte: u8) {
        let cell = u16::from(self.color.raw()) << 8 | u16::from(byte);
        // SAFETY: `index` is in bounds, so the reference is valid for a write.
        unsafe { ptr::write_volatile(&mut self.cells[index], cell) };
    }

    fn scroll(&mut self) {
        for index in BUFFER_WIDTH..self.rows * BUFFER_WIDTH {
            // SAFETY: both indices are in bounds of `cells`.
            unsafe {
                let cell = ptr::read_volatile(&self.cells[index]);
                ptr::write_volatile(&mut self.cells[index - BUFFER_WIDTH], cell);
            }
        }
        self.clear_row(self.rows - 1);
        self.column = 0;
    }

    fn clear_row(&mut self, row: usize) {
        let start = row * BUFFER_WIDTH;
        for index in start..start + BUFFER_WIDTH {
            self.put(index, b' ');
        }
    }
}

impl fmt::Write for Writer<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        Writer::write_str(self, s);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CELLS: usize = BUFFER_WIDTH * BUFFER_HEIGHT;

    fn row_text(cells: &[u16], row: usize) -> String {
        cells[row * BUFFER_WIDTH..(row + 1) * BUFFER_WIDTH]
            .iter()
            .map(|cell| match (cell & 0xFF) as u8 {
                0 => ' ',
                byte => byte as char,
            })
            .collect::<String>()
            .trim_end()
            .to_string()
    }

    #[test]
    fn color_code_packs_background_in_high_nibble() {
        assert_eq!(ColorCode::new(Color::White, Color::Red).raw(), 0x4F);
        assert_eq!(ColorCode::new(Color::LightRed, Color::Black).raw(), 0x0C);
        assert_eq!(ColorCode::default().raw(), 0x07);
    }

    #[test]
    fn text_lands_on_bottom_row_with_current_attribute() {
        let mut cells = [0u16; CELLS];
        let mut writer = Writer::new(&mut cells);
        writer.set_color(ColorCode::from_raw(0x4F));
        writer.write_str("OK");

        let bottom = (BUFFER_HEIGHT - 1) * BUFFER_WIDTH;
        assert_eq!(cells[bottom], 0x4F00 | u16::from(b'O'));
        assert_eq!(cells[bottom + 1], 0x4F00 | u16::from(b'K'));
    }

    #[test]
    fn newline_scrolls_previous_lines_up() {
        let mut cells = [0u16; CELLS];
        let mut writer = Writer::new(&mut cells);
        writer.write_str("first\nsecond\n");

        assert_eq!(row_text(&cells, BUFFER_HEIGHT - 2), "first");
        assert_eq!(row_text(&cells, BUFFER_HEIGHT - 1), "second");
    }

    #[test]
    fn trailing_newline_scrolls_only_when_more_text_follows() {
        let mut cells = [0u16; CELLS];
        let mut writer = Writer::new(&mut cells);
        writer.write_str("one\n");
        assert_eq!(row_text(&cells, BUFFER_HEIGHT - 1), "one");
        assert_eq!(row_text(&cells, BUFFER_HEIGHT - 2), "");

        let mut cells = [0u16; CELLS];
        let mut writer = Writer::new(&mut cells);
        writer.write_str("a\n\nb");
        assert_eq!(row_text(&cells, BUFFER_HEIGHT - 3), "a");
        assert_eq!(row_text(&cells, BUFFER_HEIGHT - 2), "");
        assert_eq!(row_text(&cells, BUFFER_HEIGHT - 1), "b");
    }

    #[test]
    fn a_screenful_of_lines_keeps_the_first_one() {
        let mut cells = [0u16; CELLS];
        let mut writer = Writer::new(&mut cells);
        for line in 0..BUFFER_HEIGHT {
            writer.write_str(if line == 0 { "top\n" } else { "x\n" });
        }
        assert_eq!(row_text(&cells, 0), "top");
    }

    #[test]
    fn long_lines_wrap_at_column_80() {
        let mut cells = [0u16; CELLS];
        let mut writer = Writer::new(&mut cells);
        for _ in 0..BUFFER_WIDTH {
            writer.write_byte(b'a');
        }
        writer.write_byte(b'b');

        assert_eq!(row_text(&cells, BUFFER_HEIGHT - 2).len(), BUFFER_WIDTH);
        assert_eq!(row_text(&cells, BUFFER_HEIGHT - 1), "b");
    }

    #[test]
    fn hex_is_eight_uppercase_digits() {
        let mut cells = [0u16; CELLS];
        let mut writer = Writer::new(&mut cells);
        writer.write_hex(0xDEAD_BEEF);
        writer.write_str(" ");
        writer.write_hex(0x0010_0234);

        assert_eq!(row_text(&cells, BUFFER_HEIGHT - 1), "DEADBEEF 00100234");
    }

    #[test]
    fn unprintable_bytes_are_replaced() {
        let mut cells = [0u16; CELLS];
        let mut writer = Writer::new(&mut cells);
        writer.write_str("a\tb");

        let bottom = (BUFFER_HEIGHT - 1) * BUFFER_WIDTH;
        assert_eq!(cells[bottom + 1] & 0xFF, u16::from(REPLACEMENT_GLYPH));
    }

    #[test]
    fn multibyte_characters_take_one_cell_each() {
        let mut cells = [0u16; CELLS];
        let mut writer = Writer::new(&mut cells);
        writer.write_str("a\u{e9}\u{20ac}\u{1F600}b");

        let bottom = (BUFFER_HEIGHT - 1) * BUFFER_WIDTH;
        let glyphs: Vec<u16> = cells[bottom..bottom + 6].iter().map(|cell| cell & 0xFF).collect();
        let glyph = u16::from(REPLACEMENT_GLYPH);
        assert_eq!(glyphs, [u16::from(b'a'), glyph, glyph, glyph, u16::from(b'b'), 0]);
    }

    #[test]
    fn buffer_smaller_than_a_row_is_ignored() {
        let mut cells = [0u16; 10];
        let mut writer = Writer::new(&mut cells);
        writer.write_str("dropped\n");
        assert!(cells.iter().all(|&cell| cell == 0));
    }
}
