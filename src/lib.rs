//! Rendering core for a charlieplexed analog clock face.
//!
//! ## How a Charlieplexed Clock Face Works
//!
//! The clock face carries 182 single-colour LEDs but only 14 microcontroller
//! I/O lines. Each LED sits between two of those lines, one LED for every
//! ordered pair of distinct lines, so 14 lines address 14 × 13 = 182 LEDs.
//!
//! ### Line states
//! - **High** – output driven to VCC; the anode side of the LED that should light
//! - **Low** – output driven to GND; the cathode side of the LED that should light
//! - **Float** – input without pull-up (tri-state); the line carries no current
//!
//! Exactly one LED conducts when one line is driven high, one line is driven low
//! and all other lines float. Only one LED can be lit at any instant.
//!
//! ### Scan workflow
//! 1. For every positive line P, drive P high.
//! 2. For every negative line N ≠ P whose LED has a non-zero brightness, drive N
//!    low for a time proportional to the brightness, float N again, then wait out
//!    the remaining `255 − brightness` units so every LED gets the same slot.
//! 3. Float P and move on to the next positive line.
//! 4. Repeat the whole scan fast enough (well under 20 ms per scan) that the eye
//!    integrates the short pulses into a steady, dimmable image.
//!
//! ### Brightness
//! There is no hardware PWM involved. Brightness is pure software duty cycling:
//! the on-time of each LED is `value × unit` where `unit` is a calibrated delay
//! (see [`display::DutyDelay`]).
//!
//! ## Crate Layout
//!
//! - [`framebuffer::FrameBuffer`] – the 182 brightness bytes, also usable as an
//!   `embedded-graphics` draw target
//! - [`view::FrameBufferView`] – a bounded window into the buffer that owns its
//!   own fade animation
//! - [`clock_buffers::ClockFrameBuffers`] – the named rings and digit groups of
//!   the clock face
//! - [`display::ClockDisplay`] – owns the buffer and runs the charlieplex scan
//! - [`pins`] – the 14 line pin table and a port-register line driver
//! - [`mode::DisplayMode`] – analog, binary and fill renderings of the time
//! - [`seven_segment`] – character encoder for the two digit groups
//! - [`face`] – hourly clock-face ring effects
//! - [`options::ClockOptions`] – user options read by the renderer
//! - [`clock::Clock`] – runs one full render cycle per tick
//! - [`sim`] – host-side line and delay simulators
//!
//! ## Available Feature Flags
//!
//! ### `defmt` Feature
//! Implements `defmt::Format` for the public types and emits `defmt` log
//! messages from the clock lifecycle. No functional changes.
#![no_std]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod clock;
pub mod clock_buffers;
pub mod display;
pub mod face;
pub mod framebuffer;
pub mod mode;
pub mod options;
pub mod pins;
pub mod seven_segment;
pub mod sim;
pub mod view;

/// Brightness of a single LED, 0 (off) to 255 (fully on)
pub type Brightness = u8;

/// Number of LEDs on the clock face
pub const LED_COUNT: usize = 182;

/// Number of charlieplexed I/O lines driving the LEDs
pub const LINE_COUNT: usize = 14;

const _: () = assert!(LINE_COUNT * (LINE_COUNT - 1) == LED_COUNT);

/// Returns the frame buffer index of the LED between `positive` and `negative`.
///
/// LEDs are numbered positive-line-major, skipping the impossible pairs where
/// both leads would sit on the same line. Returns `None` for `positive ==
/// negative` or lines outside `0..LINE_COUNT`.
#[must_use]
pub const fn led_index(positive: usize, negative: usize) -> Option<usize> {
    if positive >= LINE_COUNT || negative >= LINE_COUNT || positive == negative {
        return None;
    }
    let column = if negative < positive {
        negative
    } else {
        negative - 1
    };
    Some(positive * (LINE_COUNT - 1) + column)
}

/// Returns the `(positive, negative)` line pair of the LED at `index`.
///
/// This is the inverse of [`led_index`]. Returns `None` for indices outside
/// `0..LED_COUNT`.
#[must_use]
pub const fn line_pair(index: usize) -> Option<(usize, usize)> {
    if index >= LED_COUNT {
        return None;
    }
    let positive = index / (LINE_COUNT - 1);
    let column = index % (LINE_COUNT - 1);
    let negative = if column < positive { column } else { column + 1 };
    Some((positive, negative))
}

/// Worst-case duration of one full scan in nanoseconds.
///
/// Every lit LED occupies `255` delay units (on-time plus dark-time), so a
/// scan with all LEDs lit takes `LED_COUNT × 255 × ns_per_unit`. Scans with
/// dark LEDs are shorter. The result should stay well below 20 ms.
#[must_use]
pub const fn scan_budget_nanos(ns_per_unit: u32) -> u64 {
    LED_COUNT as u64 * 255 * ns_per_unit as u64
}
