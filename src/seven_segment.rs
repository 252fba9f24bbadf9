//! Character encoder for the seven-segment digit groups.
//!
//! Segments are named the usual way, clockwise from the top with `g` in the
//! middle:
//!
//! ```text
//!  aaa
//! f   b
//!  ggg
//! e   c
//!  ddd
//! ```
//!
//! Slot `i` of a digit view holds segment bit `i`, so `a` is slot 0 and `g` is
//! slot 6.

use bitfield::bitfield;

use crate::view::ViewMut;
use crate::Brightness;

bitfield! {
    /// Lit segments of one seven-segment digit.
    ///
    /// The bit layout is as follows:
    /// - Bit 7: Unused
    /// - Bit 6: Segment g (middle)
    /// - Bit 5: Segment f (upper left)
    /// - Bit 4: Segment e (lower left)
    /// - Bit 3: Segment d (bottom)
    /// - Bit 2: Segment c (lower right)
    /// - Bit 1: Segment b (upper right)
    /// - Bit 0: Segment a (top)
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    #[repr(transparent)]
    pub struct Segments(u8);
    impl Debug;
    a, _: 0;
    b, _: 1;
    c, _: 2;
    d, _: 3;
    e, _: 4;
    f, _: 5;
    g, _: 6;
}

impl Segments {
    /// Number of segments in a digit.
    pub const COUNT: usize = 7;

    /// No segment lit.
    pub const BLANK: Segments = Segments(0);

    /// Segments from their raw bit pattern; bit 7 is ignored.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0x7f)
    }

    /// The raw bit pattern.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Whether each segment is lit, in slot order.
    #[must_use]
    pub fn slots(self) -> [bool; Segments::COUNT] {
        [
            self.a(),
            self.b(),
            self.c(),
            self.d(),
            self.e(),
            self.f(),
            self.g(),
        ]
    }

    /// The segments of a 7-bit ASCII character. The high bit of `value` is
    /// ignored; characters without a glyph are blank.
    #[must_use]
    pub fn for_char(value: char) -> Self {
        Self::from_bits(ASCII_TABLE[(value as u32 & 0x7f) as usize])
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Segments {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Segments({=u8:b})", self.0);
    }
}

const SEG_A: u8 = 0b_0000_0001;
const SEG_B: u8 = 0b_0000_0010;
const SEG_C: u8 = 0b_0000_0100;
const SEG_D: u8 = 0b_0000_1000;
const SEG_E: u8 = 0b_0001_0000;
const SEG_F: u8 = 0b_0010_0000;
const SEG_G: u8 = 0b_0100_0000;

/// Segment patterns for 7-bit ASCII.
///
/// Letters use whichever case reads better on seven segments; the other case
/// maps to the same glyph where that is unambiguous.
pub const ASCII_TABLE: [u8; 128] = {
    let mut table = [0u8; 128];

    table[b'0' as usize] = SEG_A | SEG_B | SEG_C | SEG_D | SEG_E | SEG_F;
    table[b'1' as usize] = SEG_B | SEG_C;
    table[b'2' as usize] = SEG_A | SEG_B | SEG_D | SEG_E | SEG_G;
    table[b'3' as usize] = SEG_A | SEG_B | SEG_C | SEG_D | SEG_G;
    table[b'4' as usize] = SEG_B | SEG_C | SEG_F | SEG_G;
    table[b'5' as usize] = SEG_A | SEG_C | SEG_D | SEG_F | SEG_G;
    table[b'6' as usize] = SEG_A | SEG_C | SEG_D | SEG_E | SEG_F | SEG_G;
    table[b'7' as usize] = SEG_A | SEG_B | SEG_C;
    table[b'8' as usize] = SEG_A | SEG_B | SEG_C | SEG_D | SEG_E | SEG_F | SEG_G;
    table[b'9' as usize] = SEG_A | SEG_B | SEG_C | SEG_D | SEG_F | SEG_G;

    table[b'A' as usize] = SEG_A | SEG_B | SEG_C | SEG_E | SEG_F | SEG_G;
    table[b'b' as usize] = SEG_C | SEG_D | SEG_E | SEG_F | SEG_G;
    table[b'C' as usize] = SEG_A | SEG_D | SEG_E | SEG_F;
    table[b'c' as usize] = SEG_D | SEG_E | SEG_G;
    table[b'd' as usize] = SEG_B | SEG_C | SEG_D | SEG_E | SEG_G;
    table[b'E' as usize] = SEG_A | SEG_D | SEG_E | SEG_F | SEG_G;
    table[b'F' as usize] = SEG_A | SEG_E | SEG_F | SEG_G;
    table[b'G' as usize] = SEG_A | SEG_C | SEG_D | SEG_E | SEG_F;
    table[b'H' as usize] = SEG_B | SEG_C | SEG_E | SEG_F | SEG_G;
    table[b'h' as usize] = SEG_C | SEG_E | SEG_F | SEG_G;
    table[b'I' as usize] = SEG_E | SEG_F;
    table[b'i' as usize] = SEG_E;
    table[b'J' as usize] = SEG_B | SEG_C | SEG_D | SEG_E;
    table[b'L' as usize] = SEG_D | SEG_E | SEG_F;
    table[b'n' as usize] = SEG_C | SEG_E | SEG_G;
    table[b'o' as usize] = SEG_C | SEG_D | SEG_E | SEG_G;
    table[b'O' as usize] = table[b'0' as usize];
    table[b'P' as usize] = SEG_A | SEG_B | SEG_E | SEG_F | SEG_G;
    table[b'r' as usize] = SEG_E | SEG_G;
    table[b'S' as usize] = table[b'5' as usize];
    table[b't' as usize] = SEG_D | SEG_E | SEG_F | SEG_G;
    table[b'T' as usize] = table[b't' as usize];
    table[b'U' as usize] = SEG_B | SEG_C | SEG_D | SEG_E | SEG_F;
    table[b'u' as usize] = SEG_C | SEG_D | SEG_E;
    table[b'Y' as usize] = SEG_B | SEG_C | SEG_D | SEG_F | SEG_G;
    table[b'Z' as usize] = table[b'2' as usize];

    table[b'a' as usize] = table[b'A' as usize];
    table[b'B' as usize] = table[b'b' as usize];
    table[b'D' as usize] = table[b'd' as usize];
    table[b'e' as usize] = table[b'E' as usize];
    table[b'f' as usize] = table[b'F' as usize];
    table[b'g' as usize] = table[b'9' as usize];
    table[b'j' as usize] = table[b'J' as usize];
    table[b'l' as usize] = table[b'I' as usize];
    table[b'N' as usize] = table[b'n' as usize];
    table[b'p' as usize] = table[b'P' as usize];
    table[b'R' as usize] = table[b'r' as usize];
    table[b's' as usize] = table[b'S' as usize];
    table[b'y' as usize] = table[b'Y' as usize];
    table[b'z' as usize] = table[b'Z' as usize];

    table[b'-' as usize] = SEG_G;
    table[b'_' as usize] = SEG_D;
    table[b'=' as usize] = SEG_D | SEG_G;
    table[b'\'' as usize] = SEG_F;
    table[b' ' as usize] = 0;
    table
};

/// Show `value` on a seven-segment digit view.
///
/// Lit segments are written as `brightness`, the others as 0. Views shorter
/// than seven slots are truncated.
pub fn write_seven_segment_display(view: &mut ViewMut<'_>, value: char, brightness: Brightness) {
    for (slot, lit) in Segments::for_char(value).slots().into_iter().enumerate() {
        view.set_value(slot, if lit { brightness } else { 0 });
    }
}
