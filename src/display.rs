//! The charlieplex scan engine.
//!
//! [`ClockDisplay`] owns the [`FrameBuffer`] and turns it into light by
//! toggling the 14 shared lines through a [`LineDriver`]. Brightness comes from
//! software duty cycling: every lit LED gets a slot of 255 delay units, of
//! which `value` units are spent with the LED conducting and `255 − value`
//! units dark. Dark LEDs are skipped entirely.
//!
//! The scan is blocking and must be called in a tight loop; with the default
//! calibration a fully lit scan takes about 15 ms (see
//! [`crate::scan_budget_nanos`]).
//!
//! # Example
//! ```rust
//! use charlieplex_clock::display::ClockDisplay;
//! use charlieplex_clock::sim::{NoDelay, ScanRecorder};
//!
//! let mut display = ClockDisplay::new(ScanRecorder::new(), NoDelay);
//! display.begin();
//!
//! display.set_led_value(0, 255);
//! display.set_led_value(13, 128);
//! display.display();
//!
//! assert_eq!(display.lines().lit_count(0), 1);
//! assert_eq!(display.lines().lit_count(13), 1);
//! assert_eq!(display.lines().lit_count(1), 0);
//! ```

use embedded_graphics::pixelcolor::Gray8;
use embedded_graphics::prelude::DrawTarget;
use embedded_hal::delay::DelayNs;

use crate::framebuffer::FrameBuffer;
use crate::view::FrameBufferView;
use crate::Brightness;
use crate::LINE_COUNT;

/// Drives the charlieplexed lines.
///
/// Line indices are `0..LINE_COUNT`. Every call must take effect before it
/// returns; the scan relies on the order of calls and does not batch them.
pub trait LineDriver {
    /// Configure `line` as an output driven high.
    fn drive_high(&mut self, line: usize);

    /// Configure `line` as an output driven low.
    fn drive_low(&mut self, line: usize);

    /// Configure `line` as a floating input without pull-up.
    fn float(&mut self, line: usize);

    /// Float every line.
    fn float_all(&mut self) {
        for line in 0..LINE_COUNT {
            self.float(line);
        }
    }
}

/// Busy-waits for a number of duty-cycle units.
///
/// One unit is the time resolution of the software dimming; an LED at
/// brightness `v` is lit for `v` units.
pub trait DutyDelay {
    /// Block for `units` delay units.
    fn wait(&mut self, units: u8);
}

/// Default length of one delay unit in nanoseconds.
///
/// Calibrated so a scan with every LED lit (182 × 255 units) stays around
/// 15 ms, comfortably inside the 20 ms flicker limit.
pub const DEFAULT_NANOS_PER_UNIT: u32 = 320;

/// [`DutyDelay`] on top of an `embedded-hal` [`DelayNs`] provider.
#[derive(Debug)]
pub struct CalibratedDelay<D> {
    delay: D,
    ns_per_unit: u32,
}

impl<D: DelayNs> CalibratedDelay<D> {
    /// Use `delay` with [`DEFAULT_NANOS_PER_UNIT`] per unit.
    pub const fn new(delay: D) -> Self {
        Self::with_calibration(delay, DEFAULT_NANOS_PER_UNIT)
    }

    /// Use `delay` with a custom unit length.
    pub const fn with_calibration(delay: D, ns_per_unit: u32) -> Self {
        Self { delay, ns_per_unit }
    }

    /// Length of one unit in nanoseconds.
    #[must_use]
    pub const fn ns_per_unit(&self) -> u32 {
        self.ns_per_unit
    }

    /// Give back the wrapped delay provider.
    pub fn release(self) -> D {
        self.delay
    }
}

impl<D: DelayNs> DutyDelay for CalibratedDelay<D> {
    fn wait(&mut self, units: u8) {
        if units > 0 {
            self.delay
                .delay_ns(u32::from(units).saturating_mul(self.ns_per_unit));
        }
    }
}

/// [`DutyDelay`] spinning a fixed number of loop iterations per unit.
///
/// Used on targets without a usable delay timer. The iteration count has to
/// be calibrated for the core clock so that one unit lasts roughly
/// [`DEFAULT_NANOS_PER_UNIT`]; on a 16 MHz AVR that is a single iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpinDelay {
    spins_per_unit: u32,
}

impl SpinDelay {
    /// Spin `spins_per_unit` iterations per unit.
    #[must_use]
    pub const fn new(spins_per_unit: u32) -> Self {
        Self { spins_per_unit }
    }

    /// Spin for `units` and return the number of iterations run.
    ///
    /// Every iteration passes its counter through [`core::hint::black_box`]
    /// so the optimiser cannot drop the loop where `spin_loop` is empty.
    pub fn spin(&self, units: u8) -> u32 {
        let mut iterations = 0;
        for i in 0..u32::from(units).saturating_mul(self.spins_per_unit) {
            core::hint::black_box(i);
            core::hint::spin_loop();
            iterations += 1;
        }
        iterations
    }
}

impl DutyDelay for SpinDelay {
    fn wait(&mut self, units: u8) {
        self.spin(units);
    }
}

/// Charlieplexed display of 182 LEDs on 14 lines.
pub struct ClockDisplay<L, D> {
    framebuffer: FrameBuffer,
    lines: L,
    delay: D,
}

impl<L: LineDriver, D: DutyDelay> ClockDisplay<L, D> {
    /// Create a display with every LED off.
    pub const fn new(lines: L, delay: D) -> Self {
        Self {
            framebuffer: FrameBuffer::new(),
            lines,
            delay,
        }
    }

    /// Float every line. Call once before the first scan.
    pub fn begin(&mut self) {
        self.lines.float_all();
    }

    /// Run one full scan over all 182 LEDs.
    ///
    /// Each positive line is driven high in turn; for every other line whose
    /// LED is lit the negative line is pulled low for `value` units, released,
    /// and the slot is padded with `255 − value` dark units. All lines float
    /// when the scan returns.
    pub fn display(&mut self) {
        let mut index = 0;
        for positive in 0..LINE_COUNT {
            self.lines.drive_high(positive);

            for negative in (0..LINE_COUNT).filter(|&n| n != positive) {
                let value = self.framebuffer.as_slice()[index];
                // Dark LEDs are skipped without padding
                if value > 0 {
                    self.lines.drive_low(negative);
                    self.delay.wait(value);
                    self.lines.float(negative);

                    if value < Brightness::MAX {
                        self.delay.wait(Brightness::MAX - value);
                    }
                }
                index += 1;
            }

            self.lines.float(positive);
        }
    }

    /// Set the brightness of the LED at `index`. Out of range indices are
    /// ignored.
    pub fn set_led_value(&mut self, index: usize, value: Brightness) {
        self.framebuffer.set_value(index, value);
    }

    /// Copy `source` into the frame buffer at `dest_index`, truncated at the
    /// end of the buffer.
    pub fn set_led_values(&mut self, source: &[Brightness], dest_index: usize) {
        self.framebuffer.set_values(source, dest_index);
    }

    /// Set every LED to the same brightness.
    pub fn set_all_values(&mut self, value: Brightness) {
        let Ok(()) = self.framebuffer.clear(Gray8::new(value));
    }

    /// Create a view of `count` LEDs starting at `start`.
    ///
    /// Both arguments are clamped to the frame buffer; a `start` past the end
    /// yields an empty view.
    #[must_use]
    pub fn new_frame_buffer_view(&self, start: usize, count: usize) -> FrameBufferView {
        FrameBufferView::new(start, count)
    }

    /// The frame buffer shown by the next scan.
    #[must_use]
    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.framebuffer
    }

    /// Mutable access to the frame buffer shown by the next scan.
    pub fn frame_buffer_mut(&mut self) -> &mut FrameBuffer {
        &mut self.framebuffer
    }

    /// The line driver.
    #[must_use]
    pub fn lines(&self) -> &L {
        &self.lines
    }

    /// Mutable access to the line driver.
    pub fn lines_mut(&mut self) -> &mut L {
        &mut self.lines
    }

    /// Give back the line driver and the delay.
    pub fn release(self) -> (L, D) {
        (self.lines, self.delay)
    }
}

impl<L, D> core::fmt::Debug for ClockDisplay<L, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ClockDisplay")
            .field("framebuffer", &self.framebuffer)
            .field("lines", &LINE_COUNT)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "defmt")]
impl<L, D> defmt::Format for ClockDisplay<L, D> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "ClockDisplay<{} lines> {}", LINE_COUNT, self.framebuffer);
    }
}
