// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::str::FromStr;

use super::number::clamp_unit;

/// Representation of the `<color>` type with an alpha channel.
///
/// Channels are stored non-premultiplied.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[allow(missing_docs)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Color {
    /// Constructs a new opaque color.
    #[inline]
    pub fn new(red: u8, green: u8, blue: u8) -> Color {
        Color { red, green, blue, alpha: 255 }
    }

    /// Constructs a new color with an alpha channel.
    #[inline]
    pub fn new_rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Color {
        Color { red, green, blue, alpha }
    }

    /// Opaque black, the initial `fill` value.
    #[inline]
    pub fn black() -> Color {
        Color::new(0, 0, 0)
    }

    /// Fully transparent black.
    #[inline]
    pub fn transparent() -> Color {
        Color::new_rgba(0, 0, 0, 0)
    }

    /// Parses a CSS color.
    ///
    /// Supports the full named color table, `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`,
    /// `rgb()`/`rgba()` with integer or percentage channels and `hsl()`/`hsla()`.
    /// Matching is case-insensitive.
    ///
    /// Returns `None` for `none`, `transparent` and anything unrecognized.
    pub fn from_str_opt(text: &str) -> Option<Color> {
        let text = text.trim().to_ascii_lowercase();
        match text.as_str() {
            "" | "none" | "transparent" => return None,
            _ => {}
        }

        match svgtypes::Color::from_str(&text) {
            Ok(c) => Some(Color::new_rgba(c.red, c.green, c.blue, c.alpha)),
            Err(_) => None,
        }
    }

    /// Returns a copy of the color with its alpha multiplied by `factor`.
    #[inline]
    pub fn multiply_alpha(self, factor: f64) -> Color {
        let a = (self.alpha as f64 * clamp_unit(factor)).round();
        Color { alpha: a as u8, ..self }
    }
}
