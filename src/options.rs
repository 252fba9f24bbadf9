//! User options read by the renderer.
//!
//! [`ClockOptions`] is a plain in-memory option set. Every setter raises a
//! changed flag that the owner polls with [`ClockOptions::take_changed`], for
//! example to persist the options or to re-initialize the display mode.
//!
//! ```rust
//! use charlieplex_clock::options::{map_brightness_option, ClockOptions};
//!
//! let mut options = ClockOptions::default();
//! assert!(options.take_changed());
//!
//! options.set_daytime_brightness(map_brightness_option(8, 10, 255));
//! options.set_night_brightness(map_brightness_option(5, 10, 255));
//! assert_eq!(options.daytime_brightness(), 204);
//! assert_eq!(options.brightness_at(12), 204);
//! assert_eq!(options.brightness_at(22), 102);
//! assert!(options.take_changed());
//! assert!(!options.take_changed());
//! ```

use crate::face::FaceEffects;
use crate::mode::DisplayMode;
use crate::Brightness;

/// First hour of the daytime brightness.
pub const DAYTIME_START_HOUR: u8 = 6;

/// First hour of the night brightness.
pub const NIGHT_START_HOUR: u8 = 18;

/// Diagnostic modes that take over the whole display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UtilityMode {
    /// Normal clock rendering
    #[default]
    None,
    /// Every LED fully lit
    LedTestAll,
    /// One LED at a time, walking through the whole buffer
    LedTestSequence,
}

/// Options controlling what the clock shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockOptions {
    face_effects: u8,
    fade_effects_enabled: bool,
    daytime_brightness: Brightness,
    night_brightness: Brightness,
    premultiplied_night_brightness: Brightness,
    display_mode: u8,
    utility_mode: UtilityMode,
    changed: bool,
}

impl Default for ClockOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockOptions {
    /// Factory defaults: face effects and fades on, full brightness day and
    /// night, analog display. The changed flag starts raised.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            face_effects: FaceEffects::On.selector(),
            fade_effects_enabled: true,
            daytime_brightness: Brightness::MAX,
            night_brightness: Brightness::MAX,
            premultiplied_night_brightness: Brightness::MAX,
            display_mode: DisplayMode::Analog.selector(),
            utility_mode: UtilityMode::None,
            changed: true,
        }
    }

    /// The stored face effects selector.
    #[must_use]
    pub const fn face_effects_selector(&self) -> u8 {
        self.face_effects
    }

    /// Which face rings are lit; unknown selectors read as
    /// [`FaceEffects::On`].
    #[must_use]
    pub const fn face_effects(&self) -> FaceEffects {
        FaceEffects::from_selector(self.face_effects)
    }

    /// Change which face rings are lit.
    pub fn set_face_effects(&mut self, face_effects: FaceEffects) {
        self.set_face_effects_selector(face_effects.selector());
    }

    /// Store a raw face effects selector, as read back from storage.
    pub fn set_face_effects_selector(&mut self, selector: u8) {
        self.face_effects = selector;
        self.changed = true;
    }

    /// Whether values fade or jump.
    #[must_use]
    pub const fn fade_effects_enabled(&self) -> bool {
        self.fade_effects_enabled
    }

    /// Enable or disable fading.
    pub fn set_fade_effects_enabled(&mut self, enabled: bool) {
        self.fade_effects_enabled = enabled;
        self.changed = true;
    }

    /// Brightness from 06:00 to 17:59.
    #[must_use]
    pub const fn daytime_brightness(&self) -> Brightness {
        self.daytime_brightness
    }

    /// Change the daytime brightness.
    pub fn set_daytime_brightness(&mut self, value: Brightness) {
        self.daytime_brightness = value;
        self.update_premultiplied_night_brightness();
        self.changed = true;
    }

    /// Night brightness as a fraction of the daytime brightness, 255 being
    /// the same as daytime.
    #[must_use]
    pub const fn night_brightness(&self) -> Brightness {
        self.night_brightness
    }

    /// Change the night brightness.
    pub fn set_night_brightness(&mut self, value: Brightness) {
        self.night_brightness = value;
        self.update_premultiplied_night_brightness();
        self.changed = true;
    }

    /// Absolute brightness from 18:00 to 05:59.
    #[must_use]
    pub const fn premultiplied_night_brightness(&self) -> Brightness {
        self.premultiplied_night_brightness
    }

    /// The stored display mode selector.
    #[must_use]
    pub const fn display_mode_selector(&self) -> u8 {
        self.display_mode
    }

    /// The display mode; unknown selectors read as [`DisplayMode::Analog`].
    #[must_use]
    pub const fn display_mode(&self) -> DisplayMode {
        DisplayMode::from_selector(self.display_mode)
    }

    /// Change the display mode.
    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        self.set_display_mode_selector(mode.selector());
    }

    /// Store a raw display mode selector, as read back from storage.
    pub fn set_display_mode_selector(&mut self, selector: u8) {
        self.display_mode = selector;
        self.changed = true;
    }

    /// The active utility mode.
    #[must_use]
    pub const fn utility_mode(&self) -> UtilityMode {
        self.utility_mode
    }

    /// Enter or leave a utility mode.
    pub fn set_utility_mode(&mut self, mode: UtilityMode) {
        self.utility_mode = mode;
        self.changed = true;
    }

    /// Returns whether any option changed since the last call and lowers the
    /// flag.
    pub fn take_changed(&mut self) -> bool {
        core::mem::replace(&mut self.changed, false)
    }

    /// Brightness to render with at `hour` (0 to 23).
    #[must_use]
    pub const fn brightness_at(&self, hour: u8) -> Brightness {
        if hour >= DAYTIME_START_HOUR && hour < NIGHT_START_HOUR {
            self.daytime_brightness
        } else {
            self.premultiplied_night_brightness
        }
    }

    fn update_premultiplied_night_brightness(&mut self) {
        self.premultiplied_night_brightness = (u16::from(self.daytime_brightness)
            * u16::from(self.night_brightness)
            / 255) as Brightness;
    }
}

/// Rescale `option` from `0..=from_range` to `0..=to_range`, rounding half
/// up. Used to convert between menu levels (1 to 10) and brightness bytes.
///
/// A zero `from_range` yields 0.
#[must_use]
pub const fn map_brightness_option(option: u8, from_range: u8, to_range: u8) -> u8 {
    if from_range == 0 {
        return 0;
    }
    let numerator = option as u16 * to_range as u16;
    let from = from_range as u16;
    let mut result = numerator / from;
    if numerator % from >= from >> 1 {
        result += 1;
    }
    if result > u8::MAX as u16 {
        u8::MAX
    } else {
        result as u8
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn test_defaults() {
        let options = ClockOptions::default();
        assert_eq!(options.face_effects(), FaceEffects::On);
        assert!(options.fade_effects_enabled());
        assert_eq!(options.daytime_brightness(), 255);
        assert_eq!(options.night_brightness(), 255);
        assert_eq!(options.premultiplied_night_brightness(), 255);
        assert_eq!(options.display_mode(), DisplayMode::Analog);
        assert_eq!(options.utility_mode(), UtilityMode::None);
    }

    #[test]
    fn test_changed_flag() {
        let mut options = ClockOptions::new();
        assert!(options.take_changed());
        assert!(!options.take_changed());

        options.set_fade_effects_enabled(false);
        assert!(options.take_changed());
        options.set_face_effects(FaceEffects::Both);
        options.set_display_mode(DisplayMode::Binary);
        assert!(options.take_changed());
        assert!(!options.take_changed());

        options.set_utility_mode(UtilityMode::LedTestAll);
        assert!(options.take_changed());
    }

    #[test]
    fn test_premultiplied_night_brightness() {
        let mut options = ClockOptions::new();
        options.set_night_brightness(128);
        assert_eq!(options.premultiplied_night_brightness(), 128);
        options.set_daytime_brightness(100);
        assert_eq!(options.premultiplied_night_brightness(), 50);
        options.set_night_brightness(0);
        assert_eq!(options.premultiplied_night_brightness(), 0);
    }

    #[test]
    fn test_brightness_at() {
        let mut options = ClockOptions::new();
        options.set_daytime_brightness(200);
        options.set_night_brightness(51);
        for hour in 0..24 {
            let expected = if (6..18).contains(&hour) { 200 } else { 40 };
            assert_eq!(options.brightness_at(hour), expected, "hour {hour}");
        }
    }

    #[test]
    fn test_unknown_display_mode_selector() {
        let mut options = ClockOptions::new();
        options.set_display_mode_selector(42);
        assert_eq!(options.display_mode_selector(), 42);
        assert_eq!(options.display_mode(), DisplayMode::Analog);
    }

    #[test]
    fn test_face_effects_selector() {
        let mut options = ClockOptions::new();
        options.take_changed();

        options.set_face_effects_selector(FaceEffects::Inner.selector());
        assert!(options.take_changed());
        assert_eq!(options.face_effects(), FaceEffects::Inner);

        options.set_face_effects(FaceEffects::Both);
        assert_eq!(options.face_effects_selector(), 3);

        options.set_face_effects_selector(200);
        assert_eq!(options.face_effects_selector(), 200);
        assert_eq!(options.face_effects(), FaceEffects::On);
    }

    #[test]
    fn test_map_brightness_option() {
        assert_eq!(map_brightness_option(10, 10, 255), 255);
        assert_eq!(map_brightness_option(1, 10, 255), 26);
        assert_eq!(map_brightness_option(5, 10, 255), 128);
        assert_eq!(map_brightness_option(255, 255, 10), 10);
        assert_eq!(map_brightness_option(128, 255, 10), 5);
        assert_eq!(map_brightness_option(26, 255, 10), 1);
        assert_eq!(map_brightness_option(0, 10, 255), 0);
        assert_eq!(map_brightness_option(3, 0, 255), 0);
    }

    #[test]
    fn test_map_brightness_option_round_trips_menu_levels() {
        for level in 1..=10 {
            let brightness = map_brightness_option(level, 10, 255);
            assert_eq!(map_brightness_option(brightness, 255, 10), level);
        }
    }
}
