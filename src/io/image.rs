use crate::core::color::{self, to_rgb8};
use crate::core::framebuffer::FrameBuffer;
use image::{ImageBuffer, ImageResult, Rgb, RgbImage};
use log::error;
use std::path::Path;

/// Converts a frame buffer to 8-bit RGB, top row first.
pub fn framebuffer_to_image(fb: &FrameBuffer) -> RgbImage {
    ImageBuffer::from_fn(fb.width as u32, fb.height as u32, |x, y| {
        let color = fb.get_pixel(x as usize, y as usize).unwrap_or_else(color::black);
        Rgb(to_rgb8(&color))
    })
}

/// Saves a frame buffer as an image; the format follows the extension.
pub fn save_framebuffer<P: AsRef<Path>>(fb: &FrameBuffer, path: P) -> ImageResult<()> {
    let path = path.as_ref();
    framebuffer_to_image(fb).save(path).inspect_err(|e| {
        error!("Failed to save image to '{}': {}", path.display(), e);
    })
}
