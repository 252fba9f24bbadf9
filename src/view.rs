//! Bounded windows into the frame buffer with per-window fade animation.
//!
//! A [`FrameBufferView`] is a pair of coordinates (start, count) into the
//! [`FrameBuffer`] plus the fade state for that window. The coordinates are
//! clamped once at construction, so every later write stays inside
//! `start..start + count`. The view does not hold a reference to the buffer;
//! it is bound to the buffer for the duration of one or more operations with
//! [`FrameBufferView::bind`], which returns a [`ViewMut`].
//!
//! # Fading
//! A view fades all of its values linearly toward a single target value. The
//! fade is driven by real time: [`ViewMut::update_fade`] takes a free-running
//! microsecond timestamp, counts the whole fade intervals elapsed since the
//! last step and moves every value `rate` units toward the target for each of
//! them. The fractional remainder of an interval is carried over to the next
//! call so long fades do not drift. Values never overshoot the target.
//!
//! ```rust
//! use charlieplex_clock::framebuffer::FrameBuffer;
//! use charlieplex_clock::view::FrameBufferView;
//!
//! let mut framebuffer = FrameBuffer::new();
//! let mut view = FrameBufferView::new(60, 60);
//!
//! let mut minutes = view.bind(&mut framebuffer);
//! minutes.initialize_fade_with_target(10, 1_000, 0); // 10 units per ms, fade to off
//! minutes.set_value(30, 100);
//!
//! minutes.update_fade(0); // first call only records the timestamp
//! minutes.update_fade(2_000); // two intervals elapsed
//! assert_eq!(minutes.get(30), Some(80));
//!
//! minutes.accelerate_fade_to_end();
//! assert_eq!(minutes.get(30), Some(0));
//! assert!(!minutes.is_fade_active());
//! ```

use crate::framebuffer::FrameBuffer;
use crate::Brightness;
use crate::LED_COUNT;

/// Fade parameters and timing state of a single view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Fade {
    target: Brightness,
    rate: u8,
    interval_us: u32,
    last_step_us: u32,
    active: bool,
    was_active: bool,
}

impl Fade {
    /// A fade with no rate configured; it never becomes active.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            target: 0,
            rate: 0,
            interval_us: 0,
            last_step_us: 0,
            active: false,
            was_active: false,
        }
    }

    /// The value every element converges to.
    #[must_use]
    pub const fn target(&self) -> Brightness {
        self.target
    }

    /// Units moved per elapsed interval.
    #[must_use]
    pub const fn rate(&self) -> u8 {
        self.rate
    }

    /// Length of one fade step in microseconds.
    #[must_use]
    pub const fn interval_us(&self) -> u32 {
        self.interval_us
    }

    /// Whether the fade still has work to do.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// A fade only runs with both a rate and an interval.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.rate > 0 && self.interval_us > 0
    }

    fn mark_written(&mut self) {
        self.active = self.is_configured();
    }

    /// Consume the time elapsed since the last step and return the total
    /// number of units to move, saturated to a byte.
    fn take_delta(&mut self, now_us: u32) -> u8 {
        if !self.was_active {
            self.last_step_us = now_us;
            return 0;
        }
        let steps = now_us.wrapping_sub(self.last_step_us) / self.interval_us;
        self.last_step_us = self
            .last_step_us
            .wrapping_add(steps * self.interval_us);
        steps
            .saturating_mul(u32::from(self.rate))
            .min(u32::from(u8::MAX)) as u8
    }
}

/// A bounded window into the frame buffer together with its fade state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameBufferView {
    start: u8,
    count: u8,
    fade: Fade,
}

impl FrameBufferView {
    /// Create a view of `count` values starting at `start`.
    ///
    /// Both arguments are clamped to the frame buffer: a window running past
    /// the end is shortened, a `start` past the end yields an empty view.
    #[must_use]
    pub const fn new(start: usize, count: usize) -> Self {
        let start = if start < LED_COUNT { start } else { LED_COUNT };
        let available = LED_COUNT - start;
        let count = if count < available { count } else { available };
        Self {
            start: start as u8,
            count: count as u8,
            fade: Fade::new(),
        }
    }

    /// Index of the first value in the frame buffer.
    #[must_use]
    pub const fn start(&self) -> usize {
        self.start as usize
    }

    /// Number of values in the view.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.count as usize
    }

    /// Whether the view covers no values at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The fade state of this view.
    #[must_use]
    pub const fn fade(&self) -> &Fade {
        &self.fade
    }

    /// The values of this view inside `framebuffer`.
    #[must_use]
    pub fn values<'a>(&self, framebuffer: &'a FrameBuffer) -> &'a [Brightness] {
        &framebuffer.as_slice()[self.start()..self.start() + self.len()]
    }

    /// Bind the view to `framebuffer` for reading and writing.
    pub fn bind<'a>(&'a mut self, framebuffer: &'a mut FrameBuffer) -> ViewMut<'a> {
        ViewMut {
            values: framebuffer.region_mut(self.start(), self.len()),
            fade: &mut self.fade,
        }
    }
}

/// A [`FrameBufferView`] bound to its frame buffer.
#[derive(Debug)]
pub struct ViewMut<'a> {
    values: &'a mut [Brightness],
    fade: &'a mut Fade,
}

impl ViewMut<'_> {
    /// Number of values in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the view covers no values at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the value at `index`, or `None` if out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Brightness> {
        self.values.get(index).copied()
    }

    /// The values of the view.
    #[must_use]
    pub fn as_slice(&self) -> &[Brightness] {
        self.values
    }

    /// Set the value at `index`. Out of range indices are ignored.
    pub fn set_value(&mut self, index: usize, value: Brightness) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = value;
            self.fade.mark_written();
        }
    }

    /// Set `count` values starting at `start`, truncated to the view.
    pub fn set_values(&mut self, start: usize, count: usize, value: Brightness) {
        if start >= self.values.len() {
            return;
        }
        let end = start + count.min(self.values.len() - start);
        self.values[start..end].fill(value);
        self.fade.mark_written();
    }

    /// Set every value in the view.
    pub fn set_all_values(&mut self, value: Brightness) {
        self.values.fill(value);
        self.fade.mark_written();
    }

    /// Show the low `bit_count` bits of `bit_value`, least significant bit
    /// first, with `values_per_bit` consecutive values per bit.
    ///
    /// One bits are written as `intensity`. Zero bits are written as 0 when
    /// `set_zeroes` is true and left untouched otherwise, so a fade running in
    /// those values is not disturbed.
    ///
    /// `bit_count` is clamped to `1..=8` and `values_per_bit` to
    /// `1..=len / bit_count`; a view shorter than `bit_count` is not written.
    pub fn set_values_binary_display(
        &mut self,
        bit_value: u8,
        bit_count: u8,
        values_per_bit: usize,
        set_zeroes: bool,
        intensity: Brightness,
    ) {
        let bit_count = usize::from(bit_count.clamp(1, 8));
        let values_per_bit = values_per_bit.max(1).min(self.values.len() / bit_count);

        if values_per_bit > 0 {
            for (bit, chunk) in self
                .values
                .chunks_exact_mut(values_per_bit)
                .take(bit_count)
                .enumerate()
            {
                let is_one = (bit_value >> bit) & 1 == 1;
                if is_one || set_zeroes {
                    chunk.fill(if is_one { intensity } else { 0 });
                }
            }
        }

        self.fade.mark_written();
    }

    /// Configure the fade rate and interval, keeping the current target.
    ///
    /// `rate` units are moved per `interval_us` microseconds. A zero rate or
    /// interval disables fading for this view.
    pub fn initialize_fade(&mut self, rate: u8, interval_us: u32) {
        self.fade.rate = rate;
        self.fade.interval_us = interval_us;
        self.fade.mark_written();
    }

    /// Configure the fade rate, interval and target.
    pub fn initialize_fade_with_target(&mut self, rate: u8, interval_us: u32, target: Brightness) {
        self.fade.target = target;
        self.initialize_fade(rate, interval_us);
    }

    /// Change the fade target without resetting the fade timing.
    pub fn set_fade_target(&mut self, target: Brightness) {
        self.fade.target = target;
        self.fade.mark_written();
    }

    /// The current fade target.
    #[must_use]
    pub fn fade_target(&self) -> Brightness {
        self.fade.target
    }

    /// Whether the fade still has work to do.
    #[must_use]
    pub fn is_fade_active(&self) -> bool {
        self.fade.active
    }

    /// Advance the fade to `now_us`, a free-running microsecond counter.
    ///
    /// All whole intervals elapsed since the last step are applied in one
    /// pass. The first call after the fade becomes active only records the
    /// timestamp. Cheap when the fade is inactive.
    pub fn update_fade(&mut self, now_us: u32) {
        if self.fade.active {
            let delta = self.fade.take_delta(now_us);
            if delta > 0 {
                self.fade.active = step_toward(self.values, self.fade.target, delta);
            }
        }
        self.fade.was_active = self.fade.active;
    }

    /// Jump every value straight to the fade target and stop the fade.
    pub fn accelerate_fade_to_end(&mut self) {
        if self.fade.active {
            self.values.fill(self.fade.target);
            self.fade.active = false;
            self.fade.was_active = false;
        }
    }
}

/// Move every value up to `delta` units toward `target`. Returns whether any
/// value is still short of the target.
fn step_toward(values: &mut [Brightness], target: Brightness, delta: u8) -> bool {
    let mut remaining = false;
    for value in values {
        if *value > target {
            *value -= delta.min(*value - target);
        } else if *value < target {
            *value += delta.min(target - *value);
        }
        remaining |= *value != target;
    }
    remaining
}
