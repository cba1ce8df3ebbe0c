//! Immediate-mode 2D drawing surfaces.

use crate::schema::Color;

/// A 2D surface drawn with a current fill color, like a canvas 2D context.
///
/// Sizes and coordinates are in logical pixels, origin at the top-left.
pub trait RasterSurface {
    /// Logical `(width, height)` of the surface.
    fn size(&self) -> (f64, f64);

    /// Change the color used by subsequent fills.
    fn set_fill_color(&mut self, color: Color);

    /// Fill an axis-aligned rectangle with the current fill color.
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
}

/// In-memory RGBA pixel surface.
#[derive(Clone, Debug)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    fill: [u8; 4],
    /// Number of fill color changes, to observe drawing-state switches.
    fill_changes: usize,
}

impl PixelSurface {
    /// Create a surface filled with transparent black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
            fill: Color::BLACK.to_rgba(),
            fill_changes: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row-major.
    pub fn as_rgba(&self) -> &[u8] {
        &self.pixels
    }

    /// RGBA value at pixel `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.pixels[offset..offset + 4]);
        Some(rgba)
    }

    /// How many times the fill color has been changed.
    pub fn fill_changes(&self) -> usize {
        self.fill_changes
    }
}

/// Clip `[start, start + len)` to `[0, limit)` in whole pixels.
fn pixel_span(start: f64, len: f64, limit: u32) -> (u32, u32) {
    let lo = start.round().clamp(0.0, limit as f64) as u32;
    let hi = (start + len).round().clamp(0.0, limit as f64) as u32;
    (lo, hi.max(lo))
}

impl RasterSurface for PixelSurface {
    fn size(&self) -> (f64, f64) {
        (self.width as f64, self.height as f64)
    }

    fn set_fill_color(&mut self, color: Color) {
        self.fill = color.to_rgba();
        self.fill_changes += 1;
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let (x0, x1) = pixel_span(x, width, self.width);
        let (y0, y1) = pixel_span(y, height, self.height);
        let stride = self.width as usize * 4;
        for py in y0..y1 {
            let row = py as usize * stride;
            for chunk in self.pixels[row + x0 as usize * 4..row + x1 as usize * 4].chunks_exact_mut(4)
            {
                chunk.copy_from_slice(&self.fill);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_rect() {
        let mut surface = PixelSurface::new(4, 4);
        surface.set_fill_color(Color::rgb(10, 20, 30));
        surface.fill_rect(1.0, 1.0, 2.0, 2.0);

        assert_eq!(surface.pixel(1, 1), Some([10, 20, 30, 255]));
        assert_eq!(surface.pixel(2, 2), Some([10, 20, 30, 255]));
        assert_eq!(surface.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(surface.pixel(3, 3), Some([0, 0, 0, 0]));
        assert_eq!(surface.pixel(4, 0), None);
        assert_eq!(surface.fill_changes(), 1);
    }

    #[test]
    fn test_fill_rect_is_clipped() {
        let mut surface = PixelSurface::new(3, 3);
        surface.set_fill_color(Color::WHITE);
        surface.fill_rect(-2.0, 2.0, 10.0, 10.0);

        assert_eq!(surface.pixel(0, 2), Some([255; 4]));
        assert_eq!(surface.pixel(2, 2), Some([255; 4]));
        assert_eq!(surface.pixel(0, 1), Some([0, 0, 0, 0]));
    }
}
