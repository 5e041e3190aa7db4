use crate::core::color::{self, Color};
use crate::error::{RenderError, Result};

/// Addressable width x height color grid.
///
/// Row 0 is the top row, matching image files. The rasterizer works in an
/// image space with y pointing up and flips rows itself before writing.
pub trait PixelSink {
    fn width(&self) -> usize;
    fn height(&self) -> usize;

    /// Writes one pixel. Out-of-range coordinates are an `Index` error.
    fn set_pixel(&mut self, x: usize, y: usize, color: Color) -> Result<()>;
}

/// Owned color buffer, one per rendered frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    color_buffer: Vec<Color>,
}

impl FrameBuffer {
    /// Creates a black frame buffer.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, color::black())
    }

    pub fn filled(width: usize, height: usize, background: Color) -> Self {
        Self {
            width,
            height,
            color_buffer: vec![background; width * height],
        }
    }

    /// Resets every pixel to `color`.
    pub fn clear(&mut self, color: Color) {
        self.color_buffer.fill(color);
    }

    #[inline(always)]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Color> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(self.color_buffer[self.index(x, y)])
    }

    /// Number of pixels whose color satisfies `predicate`.
    pub fn count_pixels(&self, predicate: impl Fn(&Color) -> bool) -> usize {
        self.color_buffer.iter().filter(|c| predicate(c)).count()
    }

    /// Row-major pixel colors, top row first.
    pub fn pixels(&self) -> &[Color] {
        &self.color_buffer
    }
}

impl PixelSink for FrameBuffer {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: Color) -> Result<()> {
        if !self.in_bounds(x, y) {
            return Err(RenderError::Index(format!(
                "pixel ({x}, {y}) outside {}x{} frame buffer",
                self.width, self.height
            )));
        }
        let idx = self.index(x, y);
        self.color_buffer[idx] = color;
        Ok(())
    }
}
