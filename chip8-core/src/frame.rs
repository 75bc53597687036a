use bitvec::prelude::*;
#[cfg(feature = "embedded-graphics")]
use embedded_graphics::{image::ImageRaw, pixelcolor::BinaryColor};

pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;
pub(crate) const MEM_LENGTH: usize = WIDTH * HEIGHT / 8;
const ROW_LENGTH: usize = WIDTH / 8;

/// An opaque struct holding the display memory of the machine
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Frame([u8; MEM_LENGTH]);

/// A shared view over a `Frame`
///
/// Has different accessors for the content of frames, which can be used independently
/// to fulfill the needs.
///
/// Each pixel is represented either by a corresponding bit being set, or by `true` value.
/// Internally, the data is stored in a form of concatenating rows from top to bottom of the frame.
/// Rows are represented as an individual bits of continuous memory, matching the state of pixels
/// from left to the right.
///
/// #Note:
/// Can return ImageRaw instance with `embedded-graphics` feature on.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct FrameView<'a>(&'a [u8; MEM_LENGTH]);

impl<'a> FrameView<'a> {
    /// View the raw memory of a frame
    pub fn as_raw(&self) -> &'a [u8] {
        self.0
    }

    /// Create an owned copy of a frame, e.g. to hand it to another thread
    pub fn copy_frame(self) -> Frame {
        Frame(*self.0)
    }

    /// Access frame's bits by indexes
    pub fn get_bit(&self, x: usize, y: usize) -> Option<bool> {
        self.iter_rows_as_bitslices()
            .nth(y)
            .and_then(|row| row.get(x).copied())
    }

    /// Whether no pixel is lit
    pub fn is_blank(&self) -> bool {
        self.0.iter().all(|&byte| byte == 0)
    }

    /// Get iterator over rows in a form of a `BitSlice`s
    pub fn iter_rows_as_bitslices(&self) -> impl Iterator<Item = &'a BitSlice<Msb0, u8>> {
        self.0.chunks(ROW_LENGTH).map(|row| row.view_bits::<Msb0>())
    }

    /// Iter frame pixelwise (each pixel in row for each row in frame) after scaling it
    /// by a given factor.
    pub fn iter_pixelwise_scaled(
        &self,
        scale: usize,
    ) -> impl Iterator<Item = impl Iterator<Item = &'a bool>> {
        self.iter_rows_as_bitslices()
            .map(move |row| {
                row.iter()
                    .flat_map(move |bit| core::iter::repeat(bit).take(scale))
            })
            .flat_map(move |row| core::iter::repeat(row).take(scale))
    }

    /// Get `ImageRaw` structure from frame's data
    #[cfg(feature = "embedded-graphics")]
    pub fn as_raw_image(&self) -> ImageRaw<'a, BinaryColor> {
        ImageRaw::new(self.as_raw(), WIDTH as u32, HEIGHT as u32)
    }
}

impl Frame {
    pub(crate) fn new() -> Self {
        Self([0; MEM_LENGTH])
    }

    /// Get view over frame
    pub fn view(&self) -> FrameView<'_> {
        FrameView(&self.0)
    }

    pub(crate) fn clear(&mut self) {
        self.0 = [0; MEM_LENGTH];
    }

    /// Flip the pixel at `(x, y)`, both coordinates wrapping around the screen.
    ///
    /// Returns `true` when a lit pixel got erased.
    pub(crate) fn flip_bit(&mut self, x: usize, y: usize) -> bool {
        let (x, y) = (x % WIDTH, y % HEIGHT);
        let row = self.0[y * ROW_LENGTH..(y + 1) * ROW_LENGTH].view_bits_mut::<Msb0>();
        let was_lit = row[x];
        row.set(x, !was_lit);
        was_lit
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl Frame {
    pub(crate) fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }
}
