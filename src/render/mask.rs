// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

/// A per-pixel coverage buffer.
///
/// Clip paths produce only `0` and `255`, luminance masks use the whole range.
#[derive(Clone, PartialEq, Debug)]
pub struct Mask {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Mask {
    /// Creates a mask with all the values set to `value`.
    pub fn new(width: u32, height: u32, value: u8) -> Mask {
        Mask {
            width,
            height,
            data: vec![value; width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns a value at the specified position or `0` when out of bounds.
    #[inline]
    pub fn get(&self, x: i64, y: i64) -> u8 {
        match self.index(x, y) {
            Some(idx) => self.data[idx],
            None => 0,
        }
    }

    #[inline]
    pub fn set(&mut self, x: i64, y: i64, value: u8) {
        if let Some(idx) = self.index(x, y) {
            self.data[idx] = value;
        }
    }

    /// Keeps only the pixels covered by both masks.
    pub fn intersect(&mut self, other: &Mask) {
        for (a, b) in self.data.iter_mut().zip(other.data.iter()) {
            *a = (*a).min(*b);
        }
    }

    /// Multiplies coverage values.
    pub fn multiply(&mut self, other: &Mask) {
        for (a, b) in self.data.iter_mut().zip(other.data.iter()) {
            *a = ((*a as u32 * *b as u32 + 127) / 255) as u8;
        }
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }

        Some(y as usize * self.width as usize + x as usize)
    }
}
