//! Mapping of the 14 charlieplexed lines onto microcontroller port pins.
//!
//! The lines are spread over three 8-bit I/O ports:
//!
//! | Lines  | Port | Bits |
//! |--------|------|------|
//! | 0..=7  | D    | 0..=7 |
//! | 8..=11 | B    | 0..=3 |
//! | 12..=13| C    | 0..=1 |
//!
//! Each port has a data-direction register (1 = output) and an output
//! register (1 = high). A floating line is an input with its output bit
//! cleared, which also disables the pull-up. [`PortLines`] implements
//! [`LineDriver`] with read-modify-write accesses that only ever touch the
//! bit of the line being changed, so the remaining pins of ports B and C stay
//! usable by other code.

use bitfield::bitfield;

use crate::display::LineDriver;
use crate::LINE_COUNT;

/// An 8-bit I/O port carrying display lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Port {
    /// Lines 0 to 7
    D,
    /// Lines 8 to 11
    B,
    /// Lines 12 and 13
    C,
}

impl Port {
    /// Number of ports used by the display.
    pub const COUNT: usize = 3;

    /// Every port used by the display.
    pub const ALL: [Port; Port::COUNT] = [Port::D, Port::B, Port::C];

    /// Position of the port in [`Port::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    const fn from_index(index: u8) -> Self {
        match index {
            0 => Port::D,
            1 => Port::B,
            _ => Port::C,
        }
    }

    /// Bits of the port that belong to display lines.
    #[must_use]
    pub const fn display_mask(self) -> u8 {
        match self {
            Port::D => 0b1111_1111,
            Port::B => 0b0000_1111,
            Port::C => 0b0000_0011,
        }
    }
}

bitfield! {
    /// Port and bit of one display line, packed into a byte.
    ///
    /// The bit layout is as follows:
    /// - Bits 7-6: Port index (see [`Port::index`])
    /// - Bits 2-0: Bit number within the port
    #[derive(Clone, Copy, PartialEq, Eq)]
    #[repr(transparent)]
    pub struct PinAssignment(u8);
    impl Debug;
    port_index, _: 7, 6;
    bit_number, _: 2, 0;
}

impl PinAssignment {
    /// Pack `port` and `bit` (0 to 7).
    #[must_use]
    pub const fn new(port: Port, bit: u8) -> Self {
        Self(((port.index() as u8) << 6) | (bit & 0b111))
    }

    /// The port carrying the line.
    #[must_use]
    pub fn port(&self) -> Port {
        Port::from_index(self.port_index())
    }

    /// The bit number of the line within its port.
    #[must_use]
    pub fn bit(&self) -> u8 {
        self.bit_number()
    }

    /// Single-bit mask of the line within its port.
    #[must_use]
    pub fn mask(&self) -> u8 {
        1 << self.bit_number()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PinAssignment {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "PinAssignment({}, bit {})", self.port(), self.bit());
    }
}

/// Port pin of every display line, indexed by line number.
pub const PIN_TABLE: [PinAssignment; LINE_COUNT] = [
    PinAssignment::new(Port::D, 0),
    PinAssignment::new(Port::D, 1),
    PinAssignment::new(Port::D, 2),
    PinAssignment::new(Port::D, 3),
    PinAssignment::new(Port::D, 4),
    PinAssignment::new(Port::D, 5),
    PinAssignment::new(Port::D, 6),
    PinAssignment::new(Port::D, 7),
    PinAssignment::new(Port::B, 0),
    PinAssignment::new(Port::B, 1),
    PinAssignment::new(Port::B, 2),
    PinAssignment::new(Port::B, 3),
    PinAssignment::new(Port::C, 0),
    PinAssignment::new(Port::C, 1),
];

/// Access to the data-direction and output registers of the display ports.
pub trait PortRegisters {
    /// Read the data-direction register of `port`.
    fn ddr(&self, port: Port) -> u8;

    /// Write the data-direction register of `port`.
    fn set_ddr(&mut self, port: Port, value: u8);

    /// Read the output register of `port`.
    fn output(&self, port: Port) -> u8;

    /// Write the output register of `port`.
    fn set_output(&mut self, port: Port, value: u8);
}

/// [`LineDriver`] for lines wired as in [`PIN_TABLE`].
#[derive(Debug)]
pub struct PortLines<R> {
    registers: R,
}

impl<R: PortRegisters> PortLines<R> {
    /// Drive the display lines through `registers`.
    pub const fn new(registers: R) -> Self {
        Self { registers }
    }

    /// The underlying registers.
    #[must_use]
    pub fn registers(&self) -> &R {
        &self.registers
    }

    /// Give back the underlying registers.
    pub fn release(self) -> R {
        self.registers
    }

    fn update_ddr(&mut self, port: Port, f: impl FnOnce(u8) -> u8) {
        let value = f(self.registers.ddr(port));
        self.registers.set_ddr(port, value);
    }

    fn update_output(&mut self, port: Port, f: impl FnOnce(u8) -> u8) {
        let value = f(self.registers.output(port));
        self.registers.set_output(port, value);
    }
}

impl<R: PortRegisters> LineDriver for PortLines<R> {
    fn drive_high(&mut self, line: usize) {
        if let Some(pin) = PIN_TABLE.get(line) {
            let (port, mask) = (pin.port(), pin.mask());
            self.update_output(port, |v| v | mask);
            self.update_ddr(port, |v| v | mask);
        }
    }

    fn drive_low(&mut self, line: usize) {
        if let Some(pin) = PIN_TABLE.get(line) {
            let (port, mask) = (pin.port(), pin.mask());
            self.update_output(port, |v| v & !mask);
            self.update_ddr(port, |v| v | mask);
        }
    }

    fn float(&mut self, line: usize) {
        if let Some(pin) = PIN_TABLE.get(line) {
            let (port, mask) = (pin.port(), pin.mask());
            self.update_ddr(port, |v| v & !mask);
            self.update_output(port, |v| v & !mask);
        }
    }

    fn float_all(&mut self) {
        for port in Port::ALL {
            let mask = port.display_mask();
            self.update_ddr(port, |v| v & !mask);
            self.update_output(port, |v| v & !mask);
        }
    }
}
