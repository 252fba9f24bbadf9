//! One render cycle of the whole clock face per tick.
//!
//! [`Clock`] ties the pieces together. Each [`Clock::tick`] draws the time in
//! the configured [`DisplayMode`], points the face rings at their targets,
//! writes the digit text, advances every fade and runs one blocking scan. The
//! caller only has to supply the wall-clock time and a free-running
//! microsecond counter:
//!
//! ```rust
//! use charlieplex_clock::clock::Clock;
//! use charlieplex_clock::options::ClockOptions;
//! use charlieplex_clock::sim::{NoDelay, ScanRecorder};
//! use time::Time;
//!
//! let mut clock = Clock::new(ScanRecorder::new(), NoDelay);
//! let options = ClockOptions::default();
//! clock.begin();
//!
//! let now = Time::from_hms(10, 30, 45).unwrap();
//! clock.tick(&now, 0, &options);
//!
//! let fb = clock.display().frame_buffer();
//! assert_eq!(fb.get(45), Some(255)); // seconds hand
//! assert_eq!(fb.get(60 + 30), Some(255)); // minutes hand
//! assert_eq!(fb.get(120 + 10), Some(255)); // hours hand
//! ```

use time::Time;

use crate::clock_buffers::ClockFrameBuffers;
use crate::clock_buffers::Region;
use crate::display::ClockDisplay;
use crate::display::DutyDelay;
use crate::display::LineDriver;
use crate::framebuffer::FrameBuffer;
use crate::mode::DisplayMode;
use crate::options::ClockOptions;
use crate::options::UtilityMode;
use crate::seven_segment::write_seven_segment_display;
use crate::Brightness;
use crate::LED_COUNT;

/// Fade step of the seconds, minutes and hours rings.
pub const RING_FADE_RATE: u8 = 1;
/// Fade interval of the seconds, minutes and hours rings in microseconds.
pub const RING_FADE_INTERVAL_US: u32 = 1_500;
/// Fade step of the pendulum arc.
pub const PENDULUM_FADE_RATE: u8 = 1;
/// Fade interval of the pendulum arc in microseconds.
pub const PENDULUM_FADE_INTERVAL_US: u32 = 800;
/// Fade step of the face rings.
pub const FACE_FADE_RATE: u8 = 1;
/// Fade interval of the face rings in microseconds; a full sunrise takes
/// about five seconds.
pub const FACE_FADE_INTERVAL_US: u32 = 20_000;

/// Time each LED stays lit in [`UtilityMode::LedTestSequence`].
pub const LED_TEST_STEP_US: u32 = 100_000;

/// `(rate, interval_us)` of the fade of `region`. Digits do not fade.
#[must_use]
pub const fn fade_config(region: Region) -> (u8, u32) {
    match region {
        Region::Seconds | Region::Minutes | Region::Hours => {
            (RING_FADE_RATE, RING_FADE_INTERVAL_US)
        }
        Region::Pendulum => (PENDULUM_FADE_RATE, PENDULUM_FADE_INTERVAL_US),
        Region::FaceInner | Region::FaceOuter => (FACE_FADE_RATE, FACE_FADE_INTERVAL_US),
        Region::DigitLeft | Region::DigitRight => (0, 0),
    }
}

/// The clock face: display, region views and render state.
pub struct Clock<L, D> {
    display: ClockDisplay<L, D>,
    buffers: ClockFrameBuffers,
    mode: Option<DisplayMode>,
    brightness: Brightness,
    utility_mode: UtilityMode,
    sequence_start_us: u32,
    text: Option<[char; 2]>,
}

impl<L: LineDriver, D: DutyDelay> Clock<L, D> {
    /// Create a dark clock driving `lines` and timing the duty cycle with
    /// `delay`.
    pub fn new(lines: L, delay: D) -> Self {
        let mut display = ClockDisplay::new(lines, delay);
        let mut buffers = ClockFrameBuffers::new(&display);
        let fb = display.frame_buffer_mut();
        for region in Region::ALL {
            let (rate, interval_us) = fade_config(region);
            buffers.bind(region, fb).initialize_fade(rate, interval_us);
        }

        Self {
            display,
            buffers,
            mode: None,
            brightness: 0,
            utility_mode: UtilityMode::None,
            sequence_start_us: 0,
            text: None,
        }
    }

    /// Float every line. Call once before the first tick.
    pub fn begin(&mut self) {
        #[cfg(feature = "defmt")]
        defmt::debug!("clock begin");
        self.display.begin();
    }

    /// Show two characters on the digit groups, or blank them with `None`.
    pub fn set_text(&mut self, text: Option<[char; 2]>) {
        self.text = text;
    }

    /// The text on the digit groups.
    #[must_use]
    pub fn text(&self) -> Option<[char; 2]> {
        self.text
    }

    /// Run one full render cycle and scan.
    ///
    /// `now_us` is a free-running microsecond counter; it may wrap.
    pub fn tick(&mut self, time: &Time, now_us: u32, options: &ClockOptions) {
        let utility_mode = options.utility_mode();
        if utility_mode != self.utility_mode {
            self.enter_utility_mode(utility_mode, now_us);
        }

        match utility_mode {
            UtilityMode::LedTestAll => {
                self.display.set_all_values(Brightness::MAX);
            }
            UtilityMode::LedTestSequence => {
                let step = now_us.wrapping_sub(self.sequence_start_us) / LED_TEST_STEP_US;
                self.display.set_all_values(0);
                self.display
                    .set_led_value(step as usize % LED_COUNT, Brightness::MAX);
            }
            UtilityMode::None => self.render(time, now_us, options),
        }

        self.display.display();
    }

    fn enter_utility_mode(&mut self, utility_mode: UtilityMode, now_us: u32) {
        #[cfg(feature = "defmt")]
        defmt::debug!("utility mode {} -> {}", self.utility_mode, utility_mode);

        if self.utility_mode != UtilityMode::None {
            // Leave nothing of the test pattern behind
            self.display.set_all_values(0);
            self.buffers.accelerate_fade_to_end(self.display.frame_buffer_mut());
            self.mode = None;
        }
        self.utility_mode = utility_mode;
        self.sequence_start_us = now_us;
    }

    fn render(&mut self, time: &Time, now_us: u32, options: &ClockOptions) {
        let hour = time.hour();
        let brightness = options.brightness_at(hour);
        let mode = options.display_mode();
        let fades = options.fade_effects_enabled();
        let fb = self.display.frame_buffer_mut();

        if !fades {
            self.buffers.accelerate_fade_to_end(fb);
        }

        if self.mode != Some(mode) || self.brightness != brightness {
            #[cfg(feature = "defmt")]
            defmt::debug!("display mode {} at brightness {}", mode, brightness);
            mode.initialize(&mut self.buffers, fb, brightness);
            self.mode = Some(mode);
            self.brightness = brightness;
        }

        mode.update(&mut self.buffers, fb, time, brightness);
        options
            .face_effects()
            .render(&mut self.buffers, fb, hour, brightness);
        write_text(&mut self.buffers, fb, self.text, brightness);

        if fades {
            self.buffers.update_fade(fb, now_us);
        }
    }

    /// The display.
    #[must_use]
    pub fn display(&self) -> &ClockDisplay<L, D> {
        &self.display
    }

    /// Mutable access to the display.
    pub fn display_mut(&mut self) -> &mut ClockDisplay<L, D> {
        &mut self.display
    }

    /// The region views.
    #[must_use]
    pub fn buffers(&self) -> &ClockFrameBuffers {
        &self.buffers
    }

    /// Give back the line driver and the delay.
    pub fn release(self) -> (L, D) {
        self.display.release()
    }
}

fn write_text(
    buffers: &mut ClockFrameBuffers,
    framebuffer: &mut FrameBuffer,
    text: Option<[char; 2]>,
    brightness: Brightness,
) {
    let [left, right] = text.unwrap_or([' ', ' ']);
    write_seven_segment_display(&mut buffers.bind(Region::DigitLeft, framebuffer), left, brightness);
    write_seven_segment_display(
        &mut buffers.bind(Region::DigitRight, framebuffer),
        right,
        brightness,
    );
}

impl<L, D> core::fmt::Debug for Clock<L, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Clock")
            .field("display", &self.display)
            .field("mode", &self.mode)
            .field("brightness", &self.brightness)
            .field("utility_mode", &self.utility_mode)
            .field("text", &self.text)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "defmt")]
impl<L, D> defmt::Format for Clock<L, D> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Clock {{ mode: {}, brightness: {}, utility_mode: {} }}",
            self.mode,
            self.brightness,
            self.utility_mode
        );
    }
}
