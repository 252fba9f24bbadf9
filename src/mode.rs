//! Renderings of the time onto the seconds, minutes and hours rings.
//!
//! A [`DisplayMode`] writes the current time into the rings once per tick and
//! leaves the animation between ticks to the fade engine: every mode sets the
//! fade target of each ring once in [`DisplayMode::initialize`] and then only
//! writes the values that must be lit (or dark) right now. Whatever was written
//! on earlier ticks fades toward the target, which gives the hands their
//! trailing glow.
//!
//! Every mode also swings the pendulum: a lookup table keyed by the
//! sub-second offset gives the phase of the swing, which is scaled to the
//! length of the pendulum arc.
//!
//! ```rust
//! use charlieplex_clock::clock_buffers::ClockFrameBuffers;
//! use charlieplex_clock::display::ClockDisplay;
//! use charlieplex_clock::mode::DisplayMode;
//! use charlieplex_clock::sim::{NoDelay, ScanRecorder};
//! use time::Time;
//!
//! let mut display = ClockDisplay::new(ScanRecorder::new(), NoDelay);
//! let mut buffers = ClockFrameBuffers::new(&display);
//! let fb = display.frame_buffer_mut();
//!
//! let mode = DisplayMode::Analog;
//! mode.initialize(&mut buffers, fb, 255);
//! mode.update(&mut buffers, fb, &Time::from_hms(10, 30, 45).unwrap(), 255);
//!
//! assert_eq!(buffers.seconds(fb).get(45), Some(255));
//! assert_eq!(buffers.minutes(fb).get(30), Some(255));
//! assert_eq!(buffers.hours(fb).get(10), Some(255));
//! ```

use time::Time;

use crate::clock_buffers::ClockFrameBuffers;
use crate::framebuffer::FrameBuffer;
use crate::view::ViewMut;
use crate::Brightness;

/// How the time is drawn on the rings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayMode {
    /// One lit LED per ring, like the hands of an analog clock
    #[default]
    Analog,
    /// Every LED lit except the hand positions
    InvertedAnalog,
    /// Seconds and minutes as 6 bits, hours as 4 bits, least significant first
    Binary,
    /// Each ring filled from the top up to the current value
    Fill,
    /// Like [`DisplayMode::Fill`], alternating with the complement every
    /// other lap
    FillUnfill,
}

impl DisplayMode {
    /// Every mode, in selector order.
    pub const ALL: [DisplayMode; 5] = [
        DisplayMode::Analog,
        DisplayMode::InvertedAnalog,
        DisplayMode::Binary,
        DisplayMode::Fill,
        DisplayMode::FillUnfill,
    ];

    /// The mode stored under `selector` in the options. Unknown selectors
    /// fall back to [`DisplayMode::Analog`].
    #[must_use]
    pub const fn from_selector(selector: u8) -> Self {
        match selector {
            1 => DisplayMode::InvertedAnalog,
            2 => DisplayMode::Binary,
            3 => DisplayMode::Fill,
            4 => DisplayMode::FillUnfill,
            _ => DisplayMode::Analog,
        }
    }

    /// The selector stored in the options for this mode.
    #[must_use]
    pub const fn selector(self) -> u8 {
        self as u8
    }

    /// Set the fade targets the mode draws against.
    ///
    /// Call whenever the mode or the brightness changes.
    pub fn initialize(
        self,
        buffers: &mut ClockFrameBuffers,
        framebuffer: &mut FrameBuffer,
        brightness: Brightness,
    ) {
        let target = match self {
            DisplayMode::InvertedAnalog => brightness,
            _ => 0,
        };
        buffers.pendulum(framebuffer).set_fade_target(target);
        buffers.seconds(framebuffer).set_fade_target(target);
        buffers.minutes(framebuffer).set_fade_target(target);
        buffers.hours(framebuffer).set_fade_target(target);
    }

    /// Draw `time` onto the rings and the pendulum.
    pub fn update(
        self,
        buffers: &mut ClockFrameBuffers,
        framebuffer: &mut FrameBuffer,
        time: &Time,
        brightness: Brightness,
    ) {
        let second = usize::from(time.second());
        let minute = usize::from(time.minute());
        let hour = usize::from(time.hour());

        let mut pendulum = buffers.pendulum(framebuffer);
        let swing = pendulum_position(time.millisecond(), pendulum.len());
        let pendulum_value = match self {
            DisplayMode::InvertedAnalog => 0,
            _ => brightness,
        };
        pendulum.set_value(swing, pendulum_value);

        match self {
            DisplayMode::Analog => {
                buffers.seconds(framebuffer).set_value(second, brightness);
                buffers.minutes(framebuffer).set_value(minute, brightness);
                buffers.hours(framebuffer).set_value(hour % 12, brightness);
            }
            DisplayMode::InvertedAnalog => {
                buffers.seconds(framebuffer).set_value(second, 0);
                buffers.minutes(framebuffer).set_value(minute, 0);
                buffers.hours(framebuffer).set_value(hour % 12, 0);
            }
            DisplayMode::Binary => {
                buffers
                    .seconds(framebuffer)
                    .set_values_binary_display(second as u8, 6, 10, false, brightness);
                buffers
                    .minutes(framebuffer)
                    .set_values_binary_display(minute as u8, 6, 10, false, brightness);
                buffers
                    .hours(framebuffer)
                    .set_values_binary_display((hour % 12) as u8, 4, 3, false, brightness);
            }
            DisplayMode::Fill => {
                fill(&mut buffers.seconds(framebuffer), second, brightness);
                fill(&mut buffers.minutes(framebuffer), minute, brightness);
                fill(&mut buffers.hours(framebuffer), hour % 12, brightness);
            }
            DisplayMode::FillUnfill => {
                fill_or_unfill(
                    &mut buffers.seconds(framebuffer),
                    second,
                    minute % 2 == 0,
                    brightness,
                );
                fill_or_unfill(
                    &mut buffers.minutes(framebuffer),
                    minute,
                    hour % 2 == 0,
                    brightness,
                );
                fill_or_unfill(&mut buffers.hours(framebuffer), hour % 12, hour < 12, brightness);
            }
        }
    }
}

/// Swing phase of the pendulum over one second, sampled every 10 ms.
///
/// 0 and 255 are the two ends of the arc. The swing eases in and out at the
/// ends like a real pendulum and crosses the centre twice per second.
pub const PENDULUM_TABLE: [u8; 100] = [
    0, 0, 1, 2, 4, 6, 9, 12, 16, 20, 24, 29, 35, 40, 46, 53, 59, 66, 73, 81, 88, 96, 104, 112,
    119, 127, 136, 143, 151, 159, 167, 174, 182, 189, 196, 202, 209, 215, 220, 226, 231, 235, 239,
    243, 246, 249, 251, 253, 254, 255, 255, 255, 254, 253, 251, 249, 246, 243, 239, 235, 231, 226,
    220, 215, 209, 202, 196, 189, 182, 174, 167, 159, 151, 143, 136, 128, 119, 112, 104, 96, 88,
    81, 73, 66, 59, 53, 46, 40, 35, 29, 24, 20, 16, 12, 9, 6, 4, 2, 1, 0,
];

/// Index of the lit pendulum LED `millisecond` into the current second, on
/// an arc of `len` LEDs. Milliseconds past 999 stay at the last sample.
#[must_use]
pub fn pendulum_position(millisecond: u16, len: usize) -> usize {
    let sample = usize::from(millisecond / 10).min(PENDULUM_TABLE.len() - 1);
    usize::from(PENDULUM_TABLE[sample]) * len / 256
}

/// Light `0..value` directly and fade the ring up behind it; at zero the whole
/// ring fades out.
fn fill(view: &mut ViewMut<'_>, value: usize, brightness: Brightness) {
    if value == 0 {
        view.set_fade_target(0);
    } else {
        view.set_values(0, value, brightness);
        let len = view.len();
        view.set_values(value, len, 0);
        view.set_fade_target(brightness);
    }
}

/// Darken `0..value` directly and fade the rest of the ring up.
fn unfill(view: &mut ViewMut<'_>, value: usize, brightness: Brightness) {
    if value > 0 {
        view.set_values(0, value, 0);
    }
    view.set_fade_target(brightness);
}

fn fill_or_unfill(view: &mut ViewMut<'_>, value: usize, filling: bool, brightness: Brightness) {
    if filling {
        fill(view, value, brightness);
    } else {
        unfill(view, value, brightness);
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::clock_buffers::Region;
    use crate::display::ClockDisplay;
    use crate::sim::{NoDelay, ScanRecorder};

    fn setup() -> (ClockDisplay<ScanRecorder, NoDelay>, ClockFrameBuffers) {
        let display = ClockDisplay::new(ScanRecorder::new(), NoDelay);
        let buffers = ClockFrameBuffers::new(&display);
        (display, buffers)
    }

    fn at(hour: u8, minute: u8, second: u8, millisecond: u16) -> Time {
        Time::from_hms_milli(hour, minute, second, millisecond).unwrap()
    }

    fn lit(buffers: &ClockFrameBuffers, fb: &FrameBuffer, region: Region) -> usize {
        buffers
            .view(region)
            .values(fb)
            .iter()
            .filter(|&&v| v > 0)
            .count()
    }

    #[test]
    fn test_selector_round_trip() {
        for mode in DisplayMode::ALL {
            assert_eq!(DisplayMode::from_selector(mode.selector()), mode);
        }
        assert_eq!(DisplayMode::from_selector(5), DisplayMode::Analog);
        assert_eq!(DisplayMode::from_selector(255), DisplayMode::Analog);
    }

    #[test]
    fn test_pendulum_table_shape() {
        assert_eq!(PENDULUM_TABLE[0], 0);
        assert_eq!(PENDULUM_TABLE[99], 0);
        assert_eq!(*PENDULUM_TABLE.iter().max().unwrap(), 255);
        // rises for the first half, falls for the second
        assert!(PENDULUM_TABLE[..50].windows(2).all(|w| w[0] <= w[1]));
        assert!(PENDULUM_TABLE[50..].windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_pendulum_position_stays_on_arc() {
        for millisecond in 0..1_200 {
            assert!(pendulum_position(millisecond, 12) < 12);
        }
        assert_eq!(pendulum_position(0, 12), 0);
        assert_eq!(pendulum_position(500, 12), 11);
        assert_eq!(pendulum_position(999, 12), 0);
        assert_eq!(pendulum_position(500, 0), 0);
    }

    #[test]
    fn test_analog_lights_hand_positions() {
        let (mut display, mut buffers) = setup();
        let fb = display.frame_buffer_mut();
        let mode = DisplayMode::Analog;
        mode.initialize(&mut buffers, fb, 255);
        mode.update(&mut buffers, fb, &at(10, 30, 45, 0), 255);

        assert_eq!(buffers.seconds(fb).get(45), Some(255));
        assert_eq!(buffers.minutes(fb).get(30), Some(255));
        assert_eq!(buffers.hours(fb).get(10), Some(255));
        assert_eq!(lit(&buffers, fb, Region::Seconds), 1);
        assert_eq!(lit(&buffers, fb, Region::Minutes), 1);
        assert_eq!(lit(&buffers, fb, Region::Hours), 1);
        assert_eq!(buffers.pendulum(fb).get(0), Some(255));
    }

    #[test]
    fn test_analog_afternoon_uses_twelve_hour_ring() {
        let (mut display, mut buffers) = setup();
        let fb = display.frame_buffer_mut();
        DisplayMode::Analog.update(&mut buffers, fb, &at(22, 0, 0, 0), 100);
        assert_eq!(buffers.hours(fb).get(10), Some(100));
    }

    #[test]
    fn test_old_hands_fade_out() {
        let (mut display, mut buffers) = setup();
        let fb = display.frame_buffer_mut();
        for region in Region::ALL {
            buffers.bind(region, fb).initialize_fade(100, 1_000);
        }
        let mode = DisplayMode::Analog;
        mode.initialize(&mut buffers, fb, 200);
        mode.update(&mut buffers, fb, &at(1, 2, 3, 0), 200);
        buffers.update_fade(fb, 0);
        buffers.update_fade(fb, 1_000);
        assert_eq!(buffers.seconds(fb).get(3), Some(100));

        mode.update(&mut buffers, fb, &at(1, 2, 4, 0), 200);
        buffers.update_fade(fb, 2_000);
        assert_eq!(buffers.seconds(fb).get(3), Some(0));
        assert_eq!(buffers.seconds(fb).get(4), Some(100));
        assert!(buffers.seconds(fb).is_fade_active());
    }

    #[test]
    fn test_inverted_analog() {
        let (mut display, mut buffers) = setup();
        let fb = display.frame_buffer_mut();
        let mode = DisplayMode::InvertedAnalog;
        mode.initialize(&mut buffers, fb, 180);
        for region in [Region::Pendulum, Region::Seconds, Region::Minutes, Region::Hours] {
            let mut view = buffers.bind(region, fb);
            assert_eq!(view.fade_target(), 180);
            view.set_all_values(180);
        }

        mode.update(&mut buffers, fb, &at(10, 30, 45, 500), 180);
        assert_eq!(buffers.seconds(fb).get(45), Some(0));
        assert_eq!(buffers.minutes(fb).get(30), Some(0));
        assert_eq!(buffers.hours(fb).get(10), Some(0));
        assert_eq!(buffers.pendulum(fb).get(11), Some(0));
        assert_eq!(lit(&buffers, fb, Region::Seconds), 59);
    }

    #[test]
    fn test_initialize_targets_dark_rings() {
        let (mut display, mut buffers) = setup();
        let fb = display.frame_buffer_mut();
        DisplayMode::InvertedAnalog.initialize(&mut buffers, fb, 99);
        DisplayMode::Fill.initialize(&mut buffers, fb, 99);
        for region in [Region::Pendulum, Region::Seconds, Region::Minutes, Region::Hours] {
            assert_eq!(buffers.bind(region, fb).fade_target(), 0);
        }
    }

    #[test]
    fn test_binary() {
        let (mut display, mut buffers) = setup();
        let fb = display.frame_buffer_mut();
        // 0b101101 seconds, 0b000011 minutes, 0b0101 hours
        DisplayMode::Binary.update(&mut buffers, fb, &at(17, 3, 45, 0), 50);

        let seconds = buffers.view(Region::Seconds).values(fb);
        for (bit, chunk) in seconds.chunks(10).enumerate() {
            let expected = if (45 >> bit) & 1 == 1 { 50 } else { 0 };
            assert!(chunk.iter().all(|&v| v == expected), "seconds bit {bit}");
        }
        let minutes = buffers.view(Region::Minutes).values(fb);
        assert!(minutes[..20].iter().all(|&v| v == 50));
        assert!(minutes[20..].iter().all(|&v| v == 0));
        let hours = buffers.view(Region::Hours).values(fb);
        assert_eq!(hours, &[50, 50, 50, 0, 0, 0, 50, 50, 50, 0, 0, 0]);
    }

    #[test]
    fn test_binary_keeps_fading_zero_bits() {
        let (mut display, mut buffers) = setup();
        let fb = display.frame_buffer_mut();
        buffers.seconds(fb).set_all_values(7);
        DisplayMode::Binary.update(&mut buffers, fb, &at(0, 0, 1, 0), 50);
        let seconds = buffers.view(Region::Seconds).values(fb);
        assert!(seconds[..10].iter().all(|&v| v == 50));
        assert!(seconds[10..].iter().all(|&v| v == 7));
    }

    #[test]
    fn test_fill() {
        let (mut display, mut buffers) = setup();
        let fb = display.frame_buffer_mut();
        buffers.seconds(fb).set_all_values(3);
        DisplayMode::Fill.update(&mut buffers, fb, &at(4, 0, 20, 0), 90);

        let seconds = buffers.view(Region::Seconds).values(fb);
        assert!(seconds[..20].iter().all(|&v| v == 90));
        assert!(seconds[20..].iter().all(|&v| v == 0));
        assert_eq!(buffers.seconds(fb).fade_target(), 90);
        assert_eq!(lit(&buffers, fb, Region::Hours), 4);
        // minute 0 leaves the ring to fade out
        assert_eq!(buffers.minutes(fb).fade_target(), 0);
        assert_eq!(lit(&buffers, fb, Region::Minutes), 0);
    }

    #[test]
    fn test_fill_unfill_even_minute_fills() {
        let (mut display, mut buffers) = setup();
        let fb = display.frame_buffer_mut();
        DisplayMode::FillUnfill.update(&mut buffers, fb, &at(2, 10, 20, 0), 120);

        let seconds = buffers.view(Region::Seconds).values(fb);
        assert!(seconds[..20].iter().all(|&v| v == 120));
        assert!(seconds[20..].iter().all(|&v| v == 0));
        assert_eq!(buffers.seconds(fb).fade_target(), 120);
    }

    #[test]
    fn test_fill_unfill_odd_minute_unfills() {
        let (mut display, mut buffers) = setup();
        let fb = display.frame_buffer_mut();
        buffers.seconds(fb).set_all_values(120);
        DisplayMode::FillUnfill.update(&mut buffers, fb, &at(2, 11, 20, 0), 120);

        let seconds = buffers.view(Region::Seconds).values(fb);
        assert!(seconds[..20].iter().all(|&v| v == 0));
        assert!(seconds[20..].iter().all(|&v| v == 120));
        assert_eq!(buffers.seconds(fb).fade_target(), 120);
    }

    #[test]
    fn test_fill_unfill_parity_sources() {
        let (mut display, mut buffers) = setup();
        let fb = display.frame_buffer_mut();
        for region in [Region::Minutes, Region::Hours] {
            buffers.bind(region, fb).set_all_values(60);
        }
        // odd hour unfills the minutes ring, PM unfills the hours ring
        DisplayMode::FillUnfill.update(&mut buffers, fb, &at(15, 5, 0, 0), 60);

        let minutes = buffers.view(Region::Minutes).values(fb);
        assert!(minutes[..5].iter().all(|&v| v == 0));
        assert!(minutes[5..].iter().all(|&v| v == 60));
        let hours = buffers.view(Region::Hours).values(fb);
        assert!(hours[..3].iter().all(|&v| v == 0));
        assert!(hours[3..].iter().all(|&v| v == 60));

        // even hour before noon fills both
        DisplayMode::FillUnfill.update(&mut buffers, fb, &at(4, 5, 0, 0), 60);
        let minutes = buffers.view(Region::Minutes).values(fb);
        assert!(minutes[..5].iter().all(|&v| v == 60));
        assert!(minutes[5..].iter().all(|&v| v == 0));
        assert_eq!(lit(&buffers, fb, Region::Hours), 4);
    }

    #[test]
    fn test_fill_unfill_hours_ring_follows_am_pm() {
        let (mut display, mut buffers) = setup();
        let fb = display.frame_buffer_mut();

        // even hour after noon still unfills
        buffers.bind(Region::Hours, fb).set_all_values(60);
        DisplayMode::FillUnfill.update(&mut buffers, fb, &at(14, 5, 0, 0), 60);
        let hours = buffers.view(Region::Hours).values(fb);
        assert!(hours[..2].iter().all(|&v| v == 0));
        assert!(hours[2..].iter().all(|&v| v == 60));

        // odd hour before noon still fills
        buffers.bind(Region::Hours, fb).set_all_values(60);
        DisplayMode::FillUnfill.update(&mut buffers, fb, &at(3, 5, 0, 0), 60);
        let hours = buffers.view(Region::Hours).values(fb);
        assert!(hours[..3].iter().all(|&v| v == 60));
        assert!(hours[3..].iter().all(|&v| v == 0));
    }

    #[test]
    fn test_unfill_at_zero_only_retargets() {
        let (mut display, mut buffers) = setup();
        let fb = display.frame_buffer_mut();
        let mut seconds = buffers.bind(Region::Seconds, fb);
        seconds.initialize_fade(1, 1500);
        seconds.set_values(0, 20, 60);
        let before: std::vec::Vec<u8> = buffers.view(Region::Seconds).values(fb).to_vec();

        // odd minute unfills the seconds ring, second 0 darkens nothing
        DisplayMode::FillUnfill.update(&mut buffers, fb, &at(10, 7, 0, 0), 90);
        assert_eq!(buffers.view(Region::Seconds).values(fb), &before[..]);
        assert_eq!(buffers.bind(Region::Seconds, fb).fade_target(), 90);
        assert!(buffers.view(Region::Seconds).fade().is_active());
    }

    #[test]
    fn test_modes_only_touch_their_regions() {
        for mode in DisplayMode::ALL {
            let (mut display, mut buffers) = setup();
            let fb = display.frame_buffer_mut();
            mode.initialize(&mut buffers, fb, 255);
            mode.update(&mut buffers, fb, &at(23, 59, 59, 999), 255);
            for region in [
                Region::FaceInner,
                Region::FaceOuter,
                Region::DigitLeft,
                Region::DigitRight,
            ] {
                assert_eq!(lit(&buffers, fb, region), 0, "{mode:?} wrote {region:?}");
            }
        }
    }
}
