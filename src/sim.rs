//! Host-side stand-ins for the display hardware.
//!
//! These types let the scan run without a microcontroller: in tests, in
//! benches, or in a desktop preview. None of them allocate.

use crate::display::DutyDelay;
use crate::display::LineDriver;
use crate::led_index;
use crate::pins::Port;
use crate::pins::PortRegisters;
use crate::LED_COUNT;
use crate::LINE_COUNT;

/// Electrical state of a simulated line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineState {
    /// High-impedance input
    #[default]
    Floating,
    /// Output driven high
    High,
    /// Output driven low
    Low,
}

/// [`LineDriver`] that records which LEDs a scan lights.
///
/// An LED counts as lit when a line is pulled low while exactly one other
/// line is high. Any other combination of driven lines would light several
/// LEDs at once and is counted as a conflict.
#[derive(Clone, Debug)]
pub struct ScanRecorder {
    states: [LineState; LINE_COUNT],
    lit_counts: [u16; LED_COUNT],
    order: [u8; LED_COUNT],
    order_len: usize,
    conflicts: u32,
}

impl Default for ScanRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanRecorder {
    /// A recorder with every line floating and nothing recorded.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            states: [LineState::Floating; LINE_COUNT],
            lit_counts: [0; LED_COUNT],
            order: [0; LED_COUNT],
            order_len: 0,
            conflicts: 0,
        }
    }

    /// Forget everything recorded so far. Line states are kept.
    pub fn reset(&mut self) {
        self.lit_counts = [0; LED_COUNT];
        self.order_len = 0;
        self.conflicts = 0;
    }

    /// Current state of `line`.
    #[must_use]
    pub fn state(&self, line: usize) -> LineState {
        self.states[line]
    }

    /// How often the LED at `index` was lit.
    #[must_use]
    pub fn lit_count(&self, index: usize) -> u16 {
        self.lit_counts.get(index).copied().unwrap_or(0)
    }

    /// Indices of the first [`LED_COUNT`] LEDs lit, in the order they lit up.
    #[must_use]
    pub fn lit_order(&self) -> &[u8] {
        &self.order[..self.order_len]
    }

    /// Number of times more than one LED could conduct at once.
    #[must_use]
    pub fn conflicts(&self) -> u32 {
        self.conflicts
    }

    fn record_pulse(&mut self, negative: usize) {
        let mut high = self
            .states
            .iter()
            .enumerate()
            .filter(|&(_, &s)| s == LineState::High)
            .map(|(line, _)| line);
        let lows = self
            .states
            .iter()
            .filter(|&&s| s == LineState::Low)
            .count();

        match (high.next(), high.next()) {
            (Some(positive), None) if lows == 1 => {
                if let Some(index) = led_index(positive, negative) {
                    self.lit_counts[index] = self.lit_counts[index].saturating_add(1);
                    if self.order_len < LED_COUNT {
                        self.order[self.order_len] = index as u8;
                        self.order_len += 1;
                    }
                }
            }
            (None, _) => {}
            _ => self.conflicts += 1,
        }
    }
}

impl LineDriver for ScanRecorder {
    fn drive_high(&mut self, line: usize) {
        self.states[line] = LineState::High;
    }

    fn drive_low(&mut self, line: usize) {
        self.states[line] = LineState::Low;
        self.record_pulse(line);
    }

    fn float(&mut self, line: usize) {
        self.states[line] = LineState::Floating;
    }
}

/// [`DutyDelay`] that returns immediately.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NoDelay;

impl DutyDelay for NoDelay {
    fn wait(&mut self, _units: u8) {}
}

const MAX_RECORDED_WAITS: usize = 2 * LED_COUNT;

/// [`DutyDelay`] that records every wait instead of blocking.
#[derive(Clone, Debug)]
pub struct RecordingDelay {
    waits: [u8; MAX_RECORDED_WAITS],
    len: usize,
    total_units: u64,
}

impl Default for RecordingDelay {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingDelay {
    /// An empty recording.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            waits: [0; MAX_RECORDED_WAITS],
            len: 0,
            total_units: 0,
        }
    }

    /// The first waits of the recording, in call order. One scan never needs
    /// more than two waits per LED, so a single scan always fits.
    #[must_use]
    pub fn waits(&self) -> &[u8] {
        &self.waits[..self.len]
    }

    /// Sum of all waited units.
    #[must_use]
    pub fn total_units(&self) -> u64 {
        self.total_units
    }

    /// Forget everything recorded so far.
    pub fn reset(&mut self) {
        self.len = 0;
        self.total_units = 0;
    }
}

impl DutyDelay for RecordingDelay {
    fn wait(&mut self, units: u8) {
        if self.len < MAX_RECORDED_WAITS {
            self.waits[self.len] = units;
            self.len += 1;
        }
        self.total_units += u64::from(units);
    }
}

/// In-memory data-direction and output registers for the three port groups.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SimulatedPorts {
    ddr: [u8; Port::COUNT],
    port: [u8; Port::COUNT],
}

impl SimulatedPorts {
    /// Registers with every bit set, as if other code had claimed the
    /// pins sharing a port with the display lines.
    #[must_use]
    pub const fn all_set() -> Self {
        Self {
            ddr: [0xff; Port::COUNT],
            port: [0xff; Port::COUNT],
        }
    }
}

impl PortRegisters for SimulatedPorts {
    fn ddr(&self, port: Port) -> u8 {
        self.ddr[port.index()]
    }

    fn set_ddr(&mut self, port: Port, value: u8) {
        self.ddr[port.index()] = value;
    }

    fn output(&self, port: Port) -> u8 {
        self.port[port.index()]
    }

    fn set_output(&mut self, port: Port, value: u8) {
        self.port[port.index()] = value;
    }
}
