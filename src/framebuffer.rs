//! The per-LED brightness buffer of the clock face.
//!
//! The buffer holds one brightness byte per LED, indexed in scan order (see
//! [`crate::led_index`]). All writes are bounds-checked and silently truncated;
//! there is no error path.
//!
//! # Drawing
//! [`FrameBuffer`] implements the `embedded-graphics` [`DrawTarget`] trait on a
//! canvas that is [`LED_COUNT`] pixels wide and one pixel high, with [`Gray8`]
//! luma as brightness. This makes the usual helpers available:
//!
//! ```rust
//! use charlieplex_clock::framebuffer::FrameBuffer;
//! use embedded_graphics::pixelcolor::Gray8;
//! use embedded_graphics::prelude::*;
//! use embedded_graphics::primitives::Rectangle;
//!
//! let mut framebuffer = FrameBuffer::new();
//!
//! // Light the seconds ring at half brightness
//! framebuffer
//!     .fill_solid(&Rectangle::new(Point::new(0, 0), Size::new(60, 1)), Gray8::new(128))
//!     .unwrap();
//! assert_eq!(framebuffer.get(59), Some(128));
//! assert_eq!(framebuffer.get(60), Some(0));
//! ```

use core::convert::Infallible;

use embedded_graphics::pixelcolor::Gray8;
use embedded_graphics::pixelcolor::GrayColor;
use embedded_graphics::prelude::DrawTarget;
use embedded_graphics::prelude::OriginDimensions;
use embedded_graphics::prelude::Size;

use crate::Brightness;
use crate::LED_COUNT;

/// Brightness values for every LED of the clock face.
#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct FrameBuffer {
    values: [Brightness; LED_COUNT],
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    /// Create a frame buffer with every LED off.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            values: [0; LED_COUNT],
        }
    }

    /// Returns the brightness at `index`, or `None` if out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Brightness> {
        self.values.get(index).copied()
    }

    /// Set the brightness at `index`. Out of range indices are ignored.
    pub fn set_value(&mut self, index: usize, value: Brightness) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = value;
        }
    }

    /// Copy `source` into the buffer starting at `dest_index`.
    ///
    /// The copy is truncated at the end of the buffer; a `dest_index` past the
    /// end copies nothing.
    pub fn set_values(&mut self, source: &[Brightness], dest_index: usize) {
        if dest_index >= LED_COUNT {
            return;
        }
        let count = source.len().min(LED_COUNT - dest_index);
        self.values[dest_index..dest_index + count].copy_from_slice(&source[..count]);
    }

    /// Set every LED to the same brightness.
    pub fn set_all_values(&mut self, value: Brightness) {
        self.values.fill(value);
    }

    /// All brightness values in scan order.
    #[must_use]
    pub fn as_slice(&self) -> &[Brightness] {
        &self.values
    }

    /// Number of LEDs with non-zero brightness.
    #[must_use]
    pub fn lit_count(&self) -> usize {
        self.values.iter().filter(|&&v| v > 0).count()
    }

    /// Mutable access to `count` values starting at `start`.
    ///
    /// Callers must pass a range inside the buffer; views validate their
    /// coordinates once at construction.
    pub(crate) fn region_mut(&mut self, start: usize, count: usize) -> &mut [Brightness] {
        &mut self.values[start..start + count]
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(LED_COUNT as u32, 1)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Gray8;

    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = embedded_graphics::Pixel<Self::Color>>,
    {
        for pixel in pixels {
            if pixel.0.x < 0 || pixel.0.y != 0 {
                continue;
            }
            self.set_value(pixel.0.x as usize, pixel.1.luma());
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.set_all_values(color.luma());
        Ok(())
    }
}

impl core::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("size", &self.values.len())
            .field("lit", &self.lit_count())
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for FrameBuffer {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "FrameBuffer<{}>", LED_COUNT);
        defmt::write!(f, " lit: {}", self.lit_count());
    }
}
