use crate::core::color::{self, Color};
use crate::core::framebuffer::{FrameBuffer, PixelSink};
use crate::core::math::Real;
use crate::error::{RenderError, Result};
use log::trace;

/// Per-pixel nearest-depth record for hidden-surface removal.
///
/// Indexed in image space (y pointing up, row 0 at the bottom), the same
/// space the rasterizer samples in. Every cell starts at `+inf`, meaning
/// untouched. Smaller depth is nearer.
#[derive(Debug, Clone, PartialEq)]
pub struct ZBuffer {
    pub width: usize,
    pub height: usize,
    depth_buffer: Vec<Real>,
}

impl ZBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            depth_buffer: vec![Real::INFINITY; width * height],
        }
    }

    /// Marks every cell untouched again.
    pub fn reset(&mut self) {
        self.depth_buffer.fill(Real::INFINITY);
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> Result<usize> {
        if x >= self.width || y >= self.height {
            return Err(RenderError::Index(format!(
                "depth cell ({x}, {y}) outside {}x{} z-buffer",
                self.width, self.height
            )));
        }
        Ok(y * self.width + x)
    }

    pub fn depth(&self, x: usize, y: usize) -> Result<Real> {
        Ok(self.depth_buffer[self.index(x, y)?])
    }

    /// Unconditionally stores `depth`.
    pub fn set_depth(&mut self, x: usize, y: usize, depth: Real) -> Result<()> {
        let idx = self.index(x, y)?;
        self.depth_buffer[idx] = depth;
        Ok(())
    }

    /// Depth test and update.
    ///
    /// Returns true and stores `depth` when it is not farther than the stored
    /// value; ties go to the most recent write.
    #[inline]
    pub fn test_and_update(&mut self, x: usize, y: usize, depth: Real) -> Result<bool> {
        let idx = self.index(x, y)?;
        let current = self.depth_buffer[idx];
        if current < depth {
            trace!("depth regression at ({x}, {y}): stored {current}, offered {depth}");
            return Ok(false);
        }
        self.depth_buffer[idx] = depth;
        Ok(true)
    }

    pub fn is_untouched(&self, x: usize, y: usize) -> Result<bool> {
        Ok(self.depth(x, y)? == Real::INFINITY)
    }

    /// Smallest and largest recorded non-negative finite depth.
    pub fn depth_range(&self) -> Option<(Real, Real)> {
        self.depth_buffer
            .iter()
            .copied()
            .filter(|d| d.is_finite() && *d >= 0.0)
            .fold(None, |range, d| match range {
                None => Some((d, d)),
                Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
            })
    }

    /// Renders the depth values into a viewable image.
    ///
    /// Untouched cells are red and negative depths blue. Everything else is a
    /// grayscale ramp from white (nearest) to black (farthest).
    pub fn export_to_image(&self) -> Result<FrameBuffer> {
        let mut image = FrameBuffer::new(self.width, self.height);
        let (lo, hi) = self.depth_range().unwrap_or((0.0, 0.0));
        let span = hi - lo;

        for y in 0..self.height {
            for x in 0..self.width {
                let d = self.depth_buffer[y * self.width + x];
                let color: Color = if d == Real::INFINITY {
                    color::red()
                } else if d < 0.0 {
                    color::blue()
                } else if span > 0.0 {
                    color::white() * (1.0 - (d - lo) / span)
                } else {
                    color::white()
                };
                image.set_pixel(x, self.height - 1 - y, color)?;
            }
        }
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_untouched() {
        let z = ZBuffer::new(3, 2);
        assert!(z.is_untouched(2, 1).unwrap());
        assert_eq!(z.depth(0, 0).unwrap(), Real::INFINITY);
        assert_eq!(z.depth_range(), None);
    }

    #[test]
    fn out_of_bounds_access_is_an_index_error() {
        let mut z = ZBuffer::new(3, 2);
        assert!(matches!(z.depth(3, 0), Err(RenderError::Index(_))));
        assert!(matches!(z.set_depth(0, 2, 1.0), Err(RenderError::Index(_))));
        assert!(matches!(z.test_and_update(5, 5, 1.0), Err(RenderError::Index(_))));
    }

    #[test]
    fn keeps_the_nearest_depth_and_accepts_ties() {
        let mut z = ZBuffer::new(1, 1);
        assert!(z.test_and_update(0, 0, 0.5).unwrap());
        assert!(!z.test_and_update(0, 0, 0.7).unwrap());
        assert_eq!(z.depth(0, 0).unwrap(), 0.5);
        assert!(z.test_and_update(0, 0, 0.5).unwrap());
        assert!(z.test_and_update(0, 0, 0.2).unwrap());
        assert_eq!(z.depth(0, 0).unwrap(), 0.2);
    }

    #[test]
    fn stored_depth_never_exceeds_any_offer() {
        let mut z = ZBuffer::new(1, 1);
        let offers = [0.9, 0.4, 0.6, 0.4, 0.8, 0.1, 0.3];
        for d in offers {
            z.test_and_update(0, 0, d).unwrap();
            let stored = z.depth(0, 0).unwrap();
            assert!(stored <= d);
        }
        assert_eq!(z.depth(0, 0).unwrap(), 0.1);
    }

    #[test]
    fn export_colors_untouched_negative_and_ramp() {
        let mut z = ZBuffer::new(4, 1);
        z.set_depth(1, 0, -0.5).unwrap();
        z.set_depth(2, 0, 0.2).unwrap();
        z.set_depth(3, 0, 0.8).unwrap();
        let image = z.export_to_image().unwrap();
        assert_eq!(image.get_pixel(0, 0), Some(color::red()));
        assert_eq!(image.get_pixel(1, 0), Some(color::blue()));
        assert_eq!(image.get_pixel(2, 0), Some(color::white()));
        assert_eq!(image.get_pixel(3, 0), Some(color::black()));
    }

    #[test]
    fn export_of_an_empty_buffer_is_empty() {
        let image = ZBuffer::new(0, 0).export_to_image().unwrap();
        assert_eq!((image.width, image.height), (0, 0));
        assert!(image.pixels().is_empty());
    }

    #[test]
    fn export_flips_rows_to_top_down() {
        let mut z = ZBuffer::new(1, 2);
        z.set_depth(0, 0, 0.5).unwrap();
        let image = z.export_to_image().unwrap();
        assert_eq!(image.get_pixel(0, 1), Some(color::white()));
        assert_eq!(image.get_pixel(0, 0), Some(color::red()));
    }
}
