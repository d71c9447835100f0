// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::collections::HashMap;
use std::rc::Rc;

use crate::types::{
    Color,
    Transform,
    ViewBox,
};

use super::{
    SvgElement,
    Units,
};

/// A gradient spread method.
#[derive(Clone, Copy, PartialEq, Debug)]
#[allow(missing_docs)]
pub enum SpreadMethod {
    Pad,
    Reflect,
    Repeat,
}

/// Gradient geometry.
#[derive(Clone, Copy, PartialEq, Debug)]
#[allow(missing_docs)]
pub enum GradientKind {
    Linear {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Radial {
        cx: f64,
        cy: f64,
        r: f64,
        fx: f64,
        fy: f64,
    },
}

/// A gradient stop.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Stop {
    /// Offset in the `0..1` range.
    pub offset: f64,
    /// Stop color with `stop-opacity` already applied.
    pub color: Color,
}

/// A linear or a radial gradient.
#[derive(Clone, PartialEq, Debug)]
pub struct Gradient {
    /// Gradient geometry.
    pub kind: GradientKind,
    /// Stops sorted by offset.
    pub stops: Vec<Stop>,
    /// `gradientUnits`.
    pub units: Units,
    /// `gradientTransform`.
    pub transform: Transform,
    /// `spreadMethod`.
    pub spread: SpreadMethod,
}

impl Gradient {
    /// Returns a gradient color at the specified position.
    ///
    /// The spread method is applied first, then the color and the alpha
    /// are interpolated between the two bracketing stops.
    ///
    /// A gradient without stops is solid black.
    pub fn sample(&self, t: f64) -> Color {
        let first = match self.stops.first() {
            Some(stop) => *stop,
            None => return Color::black(),
        };

        let t = if t.is_finite() { t } else { 0.0 };
        let t = match self.spread {
            SpreadMethod::Pad => t.max(0.0).min(1.0),
            SpreadMethod::Repeat => t - t.floor(),
            SpreadMethod::Reflect => {
                let t = t.abs() % 2.0;
                if t > 1.0 { 2.0 - t } else { t }
            }
        };

        if t <= first.offset {
            return first.color;
        }

        for pair in self.stops.windows(2) {
            let (s1, s2) = (pair[0], pair[1]);
            if t <= s2.offset {
                let range = s2.offset - s1.offset;
                if range <= 0.0 {
                    return s2.color;
                }

                return lerp_color(s1.color, s2.color, (t - s1.offset) / range);
            }
        }

        // `stops` is not empty
        self.stops[self.stops.len() - 1].color
    }
}

fn lerp_color(c1: Color, c2: Color, k: f64) -> Color {
    let lerp = |a: u8, b: u8| -> u8 {
        let v = a as f64 + (b as f64 - a as f64) * k;
        v.round().max(0.0).min(255.0) as u8
    };

    Color::new_rgba(
        lerp(c1.red, c2.red),
        lerp(c1.green, c2.green),
        lerp(c1.blue, c2.blue),
        lerp(c1.alpha, c2.alpha),
    )
}

/// A pattern paint server.
///
/// Patterns are parsed, but never used as a fill.
#[derive(Clone, PartialEq, Debug)]
#[allow(missing_docs)]
pub struct Pattern {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub units: Units,
    pub content_units: Units,
    pub transform: Transform,
    pub view_box: Option<ViewBox>,
    pub children: Vec<Rc<SvgElement>>,
}

/// A filter primitive, like `feGaussianBlur`, stored as is.
#[derive(Clone, PartialEq, Debug)]
pub struct FilterPrimitive {
    /// Primitive's tag name.
    pub tag_name: String,
    /// Primitive's attributes.
    pub attributes: HashMap<String, String>,
}

/// A filter.
///
/// Filters are parsed, but never applied.
#[derive(Clone, PartialEq, Debug)]
#[allow(missing_docs)]
pub struct Filter {
    pub units: Units,
    pub primitive_units: Units,
    pub primitives: Vec<FilterPrimitive>,
}

/// A document-scoped table of referenceable objects.
///
/// Element tables share elements with the document tree.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Defs {
    /// Linear and radial gradients.
    pub gradients: HashMap<String, Gradient>,
    /// Patterns.
    pub patterns: HashMap<String, Pattern>,
    /// `clipPath` elements.
    pub clip_paths: HashMap<String, Rc<SvgElement>>,
    /// `mask` elements.
    pub masks: HashMap<String, Rc<SvgElement>>,
    /// Filters.
    pub filters: HashMap<String, Filter>,
    /// `symbol` elements.
    pub symbols: HashMap<String, Rc<SvgElement>>,
    /// Any other element with an `id`.
    pub elements: HashMap<String, Rc<SvgElement>>,
}

impl Defs {
    /// Resolves a `<use>` link.
    ///
    /// Ordinary elements are searched first, then symbols.
    pub fn find_linked(&self, id: &str) -> Option<&SvgElement> {
        self.elements.get(id).or_else(|| self.symbols.get(id)).map(|el| &**el)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_stops(spread: SpreadMethod) -> Gradient {
        Gradient {
            kind: GradientKind::Linear { x1: 0.0, y1: 0.0, x2: 1.0, y2: 0.0 },
            stops: vec![
                Stop { offset: 0.0, color: Color::new(255, 0, 0) },
                Stop { offset: 1.0, color: Color::new(0, 0, 255) },
            ],
            units: Units::ObjectBoundingBox,
            transform: Transform::default(),
            spread,
        }
    }

    #[test]
    fn sample_ends() {
        let g = two_stops(SpreadMethod::Pad);
        assert_eq!(g.sample(0.0), Color::new(255, 0, 0));
        assert_eq!(g.sample(1.0), Color::new(0, 0, 255));
    }

    #[test]
    fn sample_middle() {
        let g = two_stops(SpreadMethod::Pad);
        let c = g.sample(0.5);
        assert!((c.red as i32 - 128).abs() <= 1);
        assert_eq!(c.green, 0);
        assert!((c.blue as i32 - 128).abs() <= 1);
        assert_eq!(c.alpha, 255);
    }

    #[test]
    fn sample_pad() {
        let g = two_stops(SpreadMethod::Pad);
        assert_eq!(g.sample(-3.0), Color::new(255, 0, 0));
        assert_eq!(g.sample(7.0), Color::new(0, 0, 255));
    }

    #[test]
    fn sample_repeat() {
        let g = two_stops(SpreadMethod::Repeat);
        assert_eq!(g.sample(1.25), g.sample(0.25));
        assert_eq!(g.sample(-0.75), g.sample(0.25));
    }

    #[test]
    fn sample_reflect() {
        let g = two_stops(SpreadMethod::Reflect);
        assert_eq!(g.sample(1.25), g.sample(0.75));
        assert_eq!(g.sample(-0.25), g.sample(0.25));
    }

    #[test]
    fn sample_no_stops() {
        let mut g = two_stops(SpreadMethod::Pad);
        g.stops.clear();
        assert_eq!(g.sample(0.3), Color::black());
    }

    #[test]
    fn sample_alpha() {
        let mut g = two_stops(SpreadMethod::Pad);
        g.stops[1].color = Color::new_rgba(0, 0, 255, 0);
        assert_eq!(g.sample(0.5).alpha, 128);
    }
}
