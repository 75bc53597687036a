#[cfg(test)]
pub mod testing {
    use core::fmt;
    use core::ops::RangeBounds;

    #[cfg(feature = "embedded-graphics")]
    use embedded_graphics::{drawable::Pixel, pixelcolor::BinaryColor};

    use crate::frame::{Frame, FrameView, HEIGHT, WIDTH};

    /// Compare two masks only inside the given window of the screen
    #[macro_export]
    macro_rules! assert_eq_2d {
        (x_range: $xrange:expr, y_range: $yrange:expr; $lhs:expr, $rhs:expr $(,)?) => {{
            let mut lhs_mask = crate::utils::testing::ImageMask::new();
            let mut rhs_mask = crate::utils::testing::ImageMask::new();
            lhs_mask.set_slice($xrange, $yrange, &$lhs);
            rhs_mask.set_slice($xrange, $yrange, &$rhs);
            assert_eq!(lhs_mask, rhs_mask);
        }};
    }

    /// One `bool` per pixel, rows top to bottom
    #[derive(Copy, Clone, PartialEq, Eq, Hash)]
    pub struct ImageMask([[bool; WIDTH]; HEIGHT]);

    impl ImageMask {
        pub fn new() -> Self {
            Self([[false; WIDTH]; HEIGHT])
        }

        pub fn set_slice<T>(&mut self, range_x: T, range_y: T, other: &Self)
        where
            T: RangeBounds<usize>,
        {
            for (y, (row, other_row)) in self.0.iter_mut().zip(other.0.iter()).enumerate() {
                if !range_y.contains(&y) {
                    continue;
                }
                for (x, (px, &other_px)) in row.iter_mut().zip(other_row.iter()).enumerate() {
                    if range_x.contains(&x) {
                        *px = other_px;
                    }
                }
            }
        }

        pub fn lit(&self) -> usize {
            self.0.iter().flatten().filter(|&&px| px).count()
        }
    }

    impl fmt::Debug for ImageMask {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            writeln!(f)?;
            for row in &self.0 {
                for &px in row.iter() {
                    write!(f, "{}", if px { '#' } else { '.' })?;
                }
                writeln!(f)?;
            }
            Ok(())
        }
    }

    pub trait ToMask {
        fn to_mask(&self) -> ImageMask;
    }

    /// `#` is a lit pixel, anything else is dark; rows are whitespace separated
    impl ToMask for str {
        fn to_mask(&self) -> ImageMask {
            let mut mask = ImageMask::new();
            mask.0
                .iter_mut()
                .zip(self.split_whitespace())
                .for_each(|(m_row, c_row)| {
                    m_row
                        .iter_mut()
                        .zip(c_row.chars())
                        .for_each(|(m, c)| *m = c == '#')
                });
            mask
        }
    }

    impl ToMask for FrameView<'_> {
        fn to_mask(&self) -> ImageMask {
            let mut mask = ImageMask::new();
            self.iter_rows_as_bitslices()
                .zip(mask.0.iter_mut())
                .for_each(|(f_row, m_row)| {
                    m_row
                        .iter_mut()
                        .zip(f_row.iter())
                        .for_each(|(m, &f)| *m = f)
                });
            mask
        }
    }

    impl ToMask for Frame {
        fn to_mask(&self) -> ImageMask {
            self.view().to_mask()
        }
    }

    #[cfg(feature = "embedded-graphics")]
    impl<I> ToMask for I
    where
        I: Iterator<Item = Pixel<BinaryColor>> + Clone,
    {
        fn to_mask(&self) -> ImageMask {
            let mut mask = ImageMask::new();
            self.clone().for_each(|Pixel(point, color)| {
                if color == BinaryColor::On {
                    mask.0[point.y as usize][point.x as usize] = true;
                }
            });
            mask
        }
    }

    mod tests {
        use super::*;

        #[test]
        fn str_mask_matches_frame() {
            let mut frame = Frame::new();
            frame.flip_bit(1, 0);
            frame.flip_bit(0, 1);
            frame.flip_bit(WIDTH - 1, HEIGHT - 1);

            let mut expected = "
                .#
                #.
            "
            .to_mask();
            expected.0[HEIGHT - 1][WIDTH - 1] = true;

            assert_eq!(frame.to_mask(), expected);
            assert_eq!(expected.lit(), 3);
        }

        #[test]
        fn slice_ignores_outside_window() {
            let mut frame = Frame::new();
            frame.flip_bit(10, 10);
            assert_eq_2d!(x_range: 0..10, y_range: 0..10; frame.to_mask(), ImageMask::new());
        }

        #[cfg(feature = "embedded-graphics")]
        #[test]
        fn raw_image_mask() {
            use embedded_graphics::image::IntoPixelIter;

            let mut frame = Frame::new();
            frame.flip_bit(3, 2);
            frame.flip_bit(60, 31);
            let view = frame.view();
            assert_eq!(view.as_raw_image().pixel_iter().to_mask(), view.to_mask());
        }
    }
}
