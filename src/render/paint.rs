// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::dom::{
    Defs,
    Gradient,
    GradientKind,
    Units,
};
use crate::types::{
    Color,
    Paint,
    Transform,
};

use super::path::BBox;

/// A resolved paint.
pub enum PaintSource<'a> {
    /// A color with all the opacities applied.
    Solid(Color),
    Gradient {
        gradient: &'a Gradient,
        /// Device to gradient space mapping.
        inverse: Transform,
        alpha: f64,
    },
}

impl<'a> PaintSource<'a> {
    /// Returns a paint color at the specified device position.
    pub fn color_at(&self, x: f64, y: f64) -> Color {
        match *self {
            PaintSource::Solid(c) => c,
            PaintSource::Gradient { gradient, ref inverse, alpha } => {
                let (gx, gy) = inverse.apply(x, y);
                gradient.sample(gradient_offset(&gradient.kind, gx, gy)).multiply_alpha(alpha)
            }
        }
    }
}

/// Resolves a paint for an element.
///
/// - `alpha` is the combined fill/stroke opacity and the element opacity;
/// - `ts` maps user space to the device;
/// - `bbox` is the user space bounding box, needed for the `objectBoundingBox` units.
///
/// Returns `None` when nothing should be painted.
pub fn resolve_paint<'a>(
    paint: &Paint,
    current_color: Color,
    alpha: f64,
    defs: &'a Defs,
    ts: &Transform,
    bbox: Option<BBox>,
) -> Option<PaintSource<'a>> {
    if !(alpha > 0.0) {
        return None;
    }

    match *paint {
        Paint::None => None,
        Paint::Color(c) => Some(PaintSource::Solid(c.multiply_alpha(alpha))),
        Paint::CurrentColor => Some(PaintSource::Solid(current_color.multiply_alpha(alpha))),
        Paint::UrlRef(ref id) => {
            if let Some(gradient) = defs.gradients.get(id) {
                gradient_source(gradient, alpha, ts, bbox)
            } else if defs.patterns.contains_key(id) {
                debug!("Pattern fill '{}' is not supported.", id);
                None
            } else {
                warn!("Paint server '{}' cannot be resolved.", id);
                None
            }
        }
    }
}

fn gradient_source<'a>(
    gradient: &'a Gradient,
    alpha: f64,
    ts: &Transform,
    bbox: Option<BBox>,
) -> Option<PaintSource<'a>> {
    let last = match gradient.stops.last() {
        Some(stop) => stop.color,
        None => return Some(PaintSource::Solid(Color::black().multiply_alpha(alpha))),
    };

    if gradient.stops.len() == 1 || is_degenerate(&gradient.kind) {
        return Some(PaintSource::Solid(last.multiply_alpha(alpha)));
    }

    let mut g_ts = *ts;
    if gradient.units == Units::ObjectBoundingBox {
        // an empty bounding box has nothing to map the gradient into
        let units_ts = bbox.and_then(|b| b.to_units_transform())?;
        g_ts.append(&units_ts);
    }
    g_ts.append(&gradient.transform);

    let inverse = g_ts.invert()?;
    Some(PaintSource::Gradient { gradient, inverse, alpha })
}

fn is_degenerate(kind: &GradientKind) -> bool {
    match *kind {
        GradientKind::Linear { x1, y1, x2, y2 } => x1 == x2 && y1 == y2,
        GradientKind::Radial { r, .. } => !(r > 0.0),
    }
}

/// Returns a gradient offset of a point in the gradient space.
fn gradient_offset(kind: &GradientKind, x: f64, y: f64) -> f64 {
    match *kind {
        GradientKind::Linear { x1, y1, x2, y2 } => {
            let dx = x2 - x1;
            let dy = y2 - y1;
            ((x - x1) * dx + (y - y1) * dy) / (dx * dx + dy * dy)
        }
        GradientKind::Radial { cx, cy, r, fx, fy } => {
            // keep the focal point inside the circle
            let (mut fdx, mut fdy) = (fx - cx, fy - cy);
            let fd = (fdx * fdx + fdy * fdy).sqrt();
            let max = r * 0.999;
            if fd > max {
                fdx *= max / fd;
                fdy *= max / fd;
            }
            let (fx, fy) = (cx + fdx, cy + fdy);

            // Solves |d - t * cd| = t * r, where `d` is the point relative to the focal point
            // and `cd` is the center relative to the focal point.
            let (cdx, cdy) = (cx - fx, cy - fy);
            let (dx, dy) = (x - fx, y - fy);
            let a = cdx * cdx + cdy * cdy - r * r;
            let b = -2.0 * (dx * cdx + dy * cdy);
            let c = dx * dx + dy * dy;
            let disc = (b * b - 4.0 * a * c).max(0.0).sqrt();
            let t1 = (-b + disc) / (2.0 * a);
            let t2 = (-b - disc) / (2.0 * a);
            t1.max(t2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{SpreadMethod, Stop};

    fn gradient(kind: GradientKind) -> Gradient {
        Gradient {
            kind,
            stops: vec![
                Stop { offset: 0.0, color: Color::new(255, 0, 0) },
                Stop { offset: 1.0, color: Color::new(0, 0, 255) },
            ],
            units: Units::UserSpaceOnUse,
            transform: Transform::default(),
            spread: SpreadMethod::Pad,
        }
    }

    #[test]
    fn linear_offset() {
        let kind = GradientKind::Linear { x1: 0.0, y1: 0.0, x2: 10.0, y2: 0.0 };
        assert_eq!(gradient_offset(&kind, 5.0, 3.0), 0.5);
        assert_eq!(gradient_offset(&kind, -10.0, 0.0), -1.0);
    }

    #[test]
    fn radial_offset() {
        let kind = GradientKind::Radial { cx: 0.0, cy: 0.0, r: 10.0, fx: 0.0, fy: 0.0 };
        assert!((gradient_offset(&kind, 3.0, 4.0) - 0.5).abs() < 1e-9);
        assert!((gradient_offset(&kind, 0.0, 20.0) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn radial_focal() {
        let kind = GradientKind::Radial { cx: 0.0, cy: 0.0, r: 10.0, fx: 5.0, fy: 0.0 };
        // the focal point itself is the start
        assert!(gradient_offset(&kind, 5.0, 0.0).abs() < 1e-9);
        // and the circle is the end
        assert!((gradient_offset(&kind, -10.0, 0.0) - 1.0).abs() < 1e-9);
        assert!((gradient_offset(&kind, 10.0, 0.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn bbox_units() {
        let mut g = gradient(GradientKind::Linear { x1: 0.0, y1: 0.0, x2: 1.0, y2: 0.0 });
        g.units = Units::ObjectBoundingBox;
        let bbox = BBox { x: 100.0, y: 0.0, width: 100.0, height: 1.0 };
        let paint = gradient_source(&g, 1.0, &Transform::default(), Some(bbox)).unwrap();
        assert_eq!(paint.color_at(100.0, 0.5), Color::new(255, 0, 0));
        assert_eq!(paint.color_at(200.0, 0.5), Color::new(0, 0, 255));
        assert_eq!(paint.color_at(150.0, 0.5), Color::new(128, 0, 128));

        let empty = BBox { x: 0.0, y: 0.0, width: 10.0, height: 0.0 };
        assert!(gradient_source(&g, 1.0, &Transform::default(), Some(empty)).is_none());
    }

    #[test]
    fn degenerate_linear() {
        let g = gradient(GradientKind::Linear { x1: 1.0, y1: 1.0, x2: 1.0, y2: 1.0 });
        match gradient_source(&g, 1.0, &Transform::default(), None) {
            Some(PaintSource::Solid(c)) => assert_eq!(c, Color::new(0, 0, 255)),
            _ => panic!("expected a solid paint"),
        }
    }

    #[test]
    fn unresolved_url() {
        let defs = Defs::default();
        let paint = Paint::UrlRef("qwe".to_string());
        assert!(resolve_paint(&paint, Color::black(), 1.0, &defs, &Transform::default(), None).is_none());
    }

    #[test]
    fn current_color() {
        let defs = Defs::default();
        let color = Color::new(0, 128, 0);
        match resolve_paint(&Paint::CurrentColor, color, 0.5, &defs, &Transform::default(), None) {
            Some(PaintSource::Solid(c)) => assert_eq!(c, Color::new_rgba(0, 128, 0, 128)),
            _ => panic!("expected a solid paint"),
        }
    }
}
