//! Effects on the two decorative clock-face rings.
//!
//! With [`FaceEffects::On`] the rings follow the sun: the inner ring glows
//! around sunrise and sunset (06:00 to 07:59 and 18:00 to 19:59) while the
//! outer ring is lit the rest of the day. The rings change through their fade
//! targets, so the switch-over fades as slowly as the ring fade rate allows.

use crate::clock_buffers::ClockFrameBuffers;
use crate::clock_buffers::Region;
use crate::framebuffer::FrameBuffer;
use crate::Brightness;

/// Which face rings are lit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaceEffects {
    /// Rings follow the hour of day
    #[default]
    On,
    /// Outer ring always lit
    Outer,
    /// Inner ring always lit
    Inner,
    /// Both rings always lit
    Both,
}

/// Inner ring brightness per hour of day, before scaling.
pub const FACE_INNER_HOURLY_BRIGHTNESS: [Brightness; 24] = [
    0, 0, 0, 0, 0, 0, //
    255, 255, 0, 0, 0, 0, //
    0, 0, 0, 0, 0, 0, //
    255, 255, 0, 0, 0, 0,
];

/// Outer ring brightness per hour of day, before scaling.
pub const FACE_OUTER_HOURLY_BRIGHTNESS: [Brightness; 24] = [
    255, 255, 255, 255, 255, 255, //
    0, 0, 255, 255, 255, 255, //
    255, 255, 255, 255, 255, 255, //
    0, 0, 255, 255, 255, 255,
];

impl FaceEffects {
    /// Every setting, in selector order.
    pub const ALL: [FaceEffects; 4] = [
        FaceEffects::On,
        FaceEffects::Outer,
        FaceEffects::Inner,
        FaceEffects::Both,
    ];

    /// The setting stored under `selector`. Unknown selectors fall back to
    /// [`FaceEffects::On`].
    #[must_use]
    pub const fn from_selector(selector: u8) -> Self {
        match selector {
            1 => FaceEffects::Outer,
            2 => FaceEffects::Inner,
            3 => FaceEffects::Both,
            _ => FaceEffects::On,
        }
    }

    /// The selector stored in the options for this setting.
    #[must_use]
    pub const fn selector(self) -> u8 {
        self as u8
    }

    /// Target brightness of the `(inner, outer)` rings at `hour` (0 to 23).
    #[must_use]
    pub fn ring_targets(self, hour: u8, brightness: Brightness) -> (Brightness, Brightness) {
        match self {
            FaceEffects::On => {
                let hour = usize::from(hour % 24);
                (
                    scale(FACE_INNER_HOURLY_BRIGHTNESS[hour], brightness),
                    scale(FACE_OUTER_HOURLY_BRIGHTNESS[hour], brightness),
                )
            }
            FaceEffects::Outer => (0, brightness),
            FaceEffects::Inner => (brightness, 0),
            FaceEffects::Both => (brightness, brightness),
        }
    }

    /// Point the face ring fades at their targets for `hour`.
    pub fn render(
        self,
        buffers: &mut ClockFrameBuffers,
        framebuffer: &mut FrameBuffer,
        hour: u8,
        brightness: Brightness,
    ) {
        let (inner, outer) = self.ring_targets(hour, brightness);
        retarget(buffers, framebuffer, Region::FaceInner, inner);
        retarget(buffers, framebuffer, Region::FaceOuter, outer);
    }
}

fn scale(level: Brightness, brightness: Brightness) -> Brightness {
    (u16::from(level) * u16::from(brightness) / 255) as Brightness
}

// Only a changed target restarts the fade; the rings are otherwise left idle.
fn retarget(
    buffers: &mut ClockFrameBuffers,
    framebuffer: &mut FrameBuffer,
    region: Region,
    target: Brightness,
) {
    let mut ring = buffers.bind(region, framebuffer);
    if ring.fade_target() != target || ring.as_slice().iter().any(|&v| v != target) {
        ring.set_fade_target(target);
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::display::ClockDisplay;
    use crate::sim::{NoDelay, ScanRecorder};

    #[test]
    fn test_selector_round_trip() {
        for effects in FaceEffects::ALL {
            assert_eq!(FaceEffects::from_selector(effects.selector()), effects);
        }
        assert_eq!(FaceEffects::from_selector(9), FaceEffects::On);
    }

    #[test]
    fn test_hourly_tables_are_complementary() {
        for hour in 0..24 {
            let inner = FACE_INNER_HOURLY_BRIGHTNESS[hour];
            let outer = FACE_OUTER_HOURLY_BRIGHTNESS[hour];
            assert_eq!(u16::from(inner) + u16::from(outer), 255, "hour {hour}");
        }
    }

    #[test]
    fn test_sun_following_targets() {
        assert_eq!(FaceEffects::On.ring_targets(5, 255), (0, 255));
        assert_eq!(FaceEffects::On.ring_targets(6, 255), (255, 0));
        assert_eq!(FaceEffects::On.ring_targets(7, 100), (100, 0));
        assert_eq!(FaceEffects::On.ring_targets(8, 100), (0, 100));
        assert_eq!(FaceEffects::On.ring_targets(19, 51), (51, 0));
        assert_eq!(FaceEffects::On.ring_targets(23, 0), (0, 0));
    }

    #[test]
    fn test_fixed_targets() {
        for hour in [0, 6, 12, 18] {
            assert_eq!(FaceEffects::Outer.ring_targets(hour, 80), (0, 80));
            assert_eq!(FaceEffects::Inner.ring_targets(hour, 80), (80, 0));
            assert_eq!(FaceEffects::Both.ring_targets(hour, 80), (80, 80));
        }
    }

    #[test]
    fn test_render_sets_fade_targets() {
        let mut display = ClockDisplay::new(ScanRecorder::new(), NoDelay);
        let mut buffers = ClockFrameBuffers::new(&display);
        let fb = display.frame_buffer_mut();
        for region in [Region::FaceInner, Region::FaceOuter] {
            buffers.bind(region, fb).initialize_fade(1, 20_000);
        }

        FaceEffects::On.render(&mut buffers, fb, 18, 200);
        assert_eq!(buffers.bind(Region::FaceInner, fb).fade_target(), 200);
        assert_eq!(buffers.bind(Region::FaceOuter, fb).fade_target(), 0);
        assert!(buffers.view(Region::FaceInner).fade().is_active());

        // values are only reached through the fade
        assert_eq!(fb.lit_count(), 0);
        buffers.accelerate_fade_to_end(fb);
        assert!(buffers.view(Region::FaceInner).values(fb).iter().all(|&v| v == 200));
    }

    #[test]
    fn test_render_leaves_settled_rings_idle() {
        let mut display = ClockDisplay::new(ScanRecorder::new(), NoDelay);
        let mut buffers = ClockFrameBuffers::new(&display);
        let fb = display.frame_buffer_mut();
        for region in [Region::FaceInner, Region::FaceOuter] {
            buffers.bind(region, fb).initialize_fade(1, 20_000);
        }
        FaceEffects::Both.render(&mut buffers, fb, 12, 90);
        buffers.accelerate_fade_to_end(fb);

        FaceEffects::Both.render(&mut buffers, fb, 12, 90);
        assert!(!buffers.view(Region::FaceInner).fade().is_active());
        assert!(!buffers.view(Region::FaceOuter).fade().is_active());
    }
}
