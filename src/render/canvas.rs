// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::types::Color;

/// An RGBA8 pixel buffer.
///
/// Pixels are stored row by row, top to bottom, with non-premultiplied alpha.
#[derive(Clone, PartialEq, Debug)]
pub struct PixelBuffer {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes.
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Creates a new, fully transparent, buffer.
    pub fn new(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Returns a pixel color.
    ///
    /// Returns `None` when the coordinates are out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let idx = self.index(x as i64, y as i64)?;
        let p = &self.data[idx..idx + 4];
        Some(Color::new_rgba(p[0], p[1], p[2], p[3]))
    }

    /// Fills the whole buffer with a color.
    pub fn fill(&mut self, color: Color) {
        for p in self.data.chunks_mut(4) {
            p[0] = color.red;
            p[1] = color.green;
            p[2] = color.blue;
            p[3] = color.alpha;
        }
    }

    /// Composites a color over the pixel using the source-over operator.
    ///
    /// `coverage` in the `0..1` range multiplies the color alpha.
    /// Out of bounds coordinates are ignored.
    pub fn blend(&mut self, x: i64, y: i64, color: Color, coverage: f64) {
        let idx = match self.index(x, y) {
            Some(idx) => idx,
            None => return,
        };

        let sa = color.alpha as f64 / 255.0 * coverage;
        if !(sa > 0.0) {
            return;
        }

        let p = &mut self.data[idx..idx + 4];
        let da = p[3] as f64 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        if out_a <= 0.0 {
            return;
        }

        let mix = |src: u8, dst: u8| -> u8 {
            let v = (src as f64 * sa + dst as f64 * da * (1.0 - sa)) / out_a;
            v.round().max(0.0).min(255.0) as u8
        };

        p[0] = mix(color.red, p[0]);
        p[1] = mix(color.green, p[1]);
        p[2] = mix(color.blue, p[2]);
        p[3] = (out_a * 255.0).round().min(255.0) as u8;
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }

        Some((y as usize * self.width as usize + x as usize) * 4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_opaque() {
        let mut buf = PixelBuffer::new(2, 1);
        buf.blend(1, 0, Color::new(10, 20, 30), 1.0);
        assert_eq!(buf.pixel(0, 0), Some(Color::transparent()));
        assert_eq!(buf.pixel(1, 0), Some(Color::new(10, 20, 30)));
    }

    #[test]
    fn blend_half_over_black() {
        let mut buf = PixelBuffer::new(1, 1);
        buf.fill(Color::black());
        buf.blend(0, 0, Color::new(255, 0, 0), 0.5);
        assert_eq!(buf.pixel(0, 0), Some(Color::new(128, 0, 0)));
    }

    #[test]
    fn blend_over_transparent() {
        let mut buf = PixelBuffer::new(1, 1);
        buf.blend(0, 0, Color::new_rgba(0, 0, 255, 128), 1.0);
        assert_eq!(buf.pixel(0, 0), Some(Color::new_rgba(0, 0, 255, 128)));
    }

    #[test]
    fn out_of_bounds() {
        let mut buf = PixelBuffer::new(1, 1);
        buf.blend(-1, 0, Color::black(), 1.0);
        buf.blend(0, 1, Color::black(), 1.0);
        assert_eq!(buf.pixel(0, 0), Some(Color::transparent()));
        assert_eq!(buf.pixel(1, 0), None);
    }
}
