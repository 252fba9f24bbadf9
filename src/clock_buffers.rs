//! The named regions of the clock face and their views.

use crate::display::ClockDisplay;
use crate::display::DutyDelay;
use crate::display::LineDriver;
use crate::framebuffer::FrameBuffer;
use crate::view::FrameBufferView;
use crate::view::ViewMut;
use crate::LED_COUNT;

/// A named group of LEDs on the clock face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Region {
    /// Outer ring, one LED per second
    Seconds,
    /// Middle ring, one LED per minute
    Minutes,
    /// Inner ring, one LED per hour
    Hours,
    /// Arc of LEDs swinging like a pendulum once per second
    Pendulum,
    /// Inner decorative face ring
    FaceInner,
    /// Outer decorative face ring
    FaceOuter,
    /// Left seven-segment digit
    DigitLeft,
    /// Right seven-segment digit
    DigitRight,
}

/// Number of named regions on the clock face.
pub const REGION_COUNT: usize = 8;

impl Region {
    /// Every region, in frame buffer order.
    pub const ALL: [Region; REGION_COUNT] = [
        Region::Seconds,
        Region::Minutes,
        Region::Hours,
        Region::Pendulum,
        Region::FaceInner,
        Region::FaceOuter,
        Region::DigitLeft,
        Region::DigitRight,
    ];

    /// Index of the first LED of the region.
    #[must_use]
    pub const fn offset(self) -> usize {
        match self {
            Region::Seconds => 0,
            Region::Minutes => 60,
            Region::Hours => 120,
            Region::Pendulum => 132,
            Region::FaceInner => 144,
            Region::FaceOuter => 156,
            Region::DigitLeft => 168,
            Region::DigitRight => 175,
        }
    }

    /// Number of LEDs in the region.
    #[must_use]
    pub const fn len(self) -> usize {
        match self {
            Region::Seconds | Region::Minutes => 60,
            Region::Hours | Region::Pendulum | Region::FaceInner | Region::FaceOuter => 12,
            Region::DigitLeft | Region::DigitRight => 7,
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

// The regions tile the frame buffer exactly, in order.
const _: () = {
    let mut next = 0;
    let mut i = 0;
    while i < REGION_COUNT {
        assert!(Region::ALL[i].offset() == next);
        assert!(Region::ALL[i].index() == i);
        next += Region::ALL[i].len();
        i += 1;
    }
    assert!(next == LED_COUNT);
};

/// Views over every [`Region`] of the clock face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockFrameBuffers {
    views: [FrameBufferView; REGION_COUNT],
}

impl ClockFrameBuffers {
    /// Create the region views for `display`.
    pub fn new<L: LineDriver, D: DutyDelay>(display: &ClockDisplay<L, D>) -> Self {
        Self {
            views: Region::ALL
                .map(|region| display.new_frame_buffer_view(region.offset(), region.len())),
        }
    }

    /// The unbound view of `region`.
    #[must_use]
    pub fn view(&self, region: Region) -> &FrameBufferView {
        &self.views[region.index()]
    }

    /// Bind the view of `region` to `framebuffer`.
    pub fn bind<'a>(&'a mut self, region: Region, framebuffer: &'a mut FrameBuffer) -> ViewMut<'a> {
        self.views[region.index()].bind(framebuffer)
    }

    /// Bound seconds ring.
    pub fn seconds<'a>(&'a mut self, framebuffer: &'a mut FrameBuffer) -> ViewMut<'a> {
        self.bind(Region::Seconds, framebuffer)
    }

    /// Bound minutes ring.
    pub fn minutes<'a>(&'a mut self, framebuffer: &'a mut FrameBuffer) -> ViewMut<'a> {
        self.bind(Region::Minutes, framebuffer)
    }

    /// Bound hours ring.
    pub fn hours<'a>(&'a mut self, framebuffer: &'a mut FrameBuffer) -> ViewMut<'a> {
        self.bind(Region::Hours, framebuffer)
    }

    /// Bound pendulum arc.
    pub fn pendulum<'a>(&'a mut self, framebuffer: &'a mut FrameBuffer) -> ViewMut<'a> {
        self.bind(Region::Pendulum, framebuffer)
    }

    /// Advance the fade of every region.
    pub fn update_fade(&mut self, framebuffer: &mut FrameBuffer, now_us: u32) {
        for view in &mut self.views {
            view.bind(framebuffer).update_fade(now_us);
        }
    }

    /// Finish the fade of every region immediately.
    pub fn accelerate_fade_to_end(&mut self, framebuffer: &mut FrameBuffer) {
        for view in &mut self.views {
            view.bind(framebuffer).accelerate_fade_to_end();
        }
    }
}
