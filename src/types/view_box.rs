// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::str::FromStr;

use svgtypes::Align;

use super::Transform;

/// Representation of the `viewBox` attribute.
#[derive(Clone, Copy, PartialEq, Debug)]
#[allow(missing_docs)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    /// Constructs a new view box.
    #[inline]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> ViewBox {
        ViewBox { x, y, width, height }
    }

    /// Parses a `viewBox` attribute.
    ///
    /// Returns `None` for malformed input and for a non-positive size.
    pub fn from_str_opt(text: &str) -> Option<ViewBox> {
        let vb = svgtypes::ViewBox::from_str(text).ok()?;
        if !(vb.w > 0.0 && vb.h > 0.0) {
            return None;
        }

        Some(ViewBox::new(vb.x, vb.y, vb.w, vb.h))
    }
}

/// Representation of the `preserveAspectRatio` attribute.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct AspectRatio {
    /// Alignment of the view box inside the viewport.
    pub align: Align,
    /// `slice` when `true`, `meet` otherwise.
    pub slice: bool,
}

impl Default for AspectRatio {
    fn default() -> Self {
        AspectRatio {
            align: Align::XMidYMid,
            slice: false,
        }
    }
}

impl AspectRatio {
    /// Parses a `preserveAspectRatio` attribute, falling back to the default.
    pub fn from_str_or_default(text: &str) -> AspectRatio {
        match svgtypes::AspectRatio::from_str(text) {
            Ok(ar) => AspectRatio { align: ar.align, slice: ar.slice },
            Err(_) => AspectRatio::default(),
        }
    }
}

/// Returns a transform that fits `vb` into a `width`x`height` viewport
/// at the origin, honoring the aspect ratio.
pub fn view_box_to_viewport(vb: &ViewBox, aspect: AspectRatio, width: f64, height: f64) -> Transform {
    let sx = width / vb.width;
    let sy = height / vb.height;

    if aspect.align == Align::None {
        return Transform::new(sx, 0.0, 0.0, sy, -vb.x * sx, -vb.y * sy);
    }

    let s = if aspect.slice { sx.max(sy) } else { sx.min(sy) };
    let extra_w = width - vb.width * s;
    let extra_h = height - vb.height * s;

    let (kx, ky) = match aspect.align {
        Align::None => (0.0, 0.0),
        Align::XMinYMin => (0.0, 0.0),
        Align::XMidYMin => (0.5, 0.0),
        Align::XMaxYMin => (1.0, 0.0),
        Align::XMinYMid => (0.0, 0.5),
        Align::XMidYMid => (0.5, 0.5),
        Align::XMaxYMid => (1.0, 0.5),
        Align::XMinYMax => (0.0, 1.0),
        Align::XMidYMax => (0.5, 1.0),
        Align::XMaxYMax => (1.0, 1.0),
    };

    Transform::new(s, 0.0, 0.0, s, extra_w * kx - vb.x * s, extra_h * ky - vb.y * s)
}
