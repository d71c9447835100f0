// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Shape outlines and path flattening.

use std::f64::consts::PI;

use crate::dom::ElementKind;
use crate::types::{
    PathCommand,
    Transform,
};

const CUBIC_SEGMENTS: usize = 20;
const QUAD_SEGMENTS: usize = 16;
const MIN_ARC_SEGMENTS: usize = 8;
// One segment per 11.25 degrees.
const ARC_STEP: f64 = PI / 16.0;

/// A flattened subpath.
#[derive(Clone, PartialEq, Debug)]
pub struct SubPath {
    pub points: Vec<(f64, f64)>,
    /// Ended by `ClosePath` or is a closed shape.
    pub closed: bool,
}

impl SubPath {
    fn new(x: f64, y: f64) -> SubPath {
        SubPath {
            points: vec![(x, y)],
            closed: false,
        }
    }
}

/// An axis-aligned bounding box.
#[derive(Clone, Copy, PartialEq, Debug)]
#[allow(missing_docs)]
pub struct BBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BBox {
    /// Returns a bounding box of the points, ignoring non-finite ones.
    pub fn from_points<'a, I>(points: I) -> Option<BBox>
        where I: IntoIterator<Item = &'a (f64, f64)>
    {
        let mut bounds: Option<(f64, f64, f64, f64)> = None;
        for &(x, y) in points {
            if !x.is_finite() || !y.is_finite() {
                continue;
            }

            bounds = Some(match bounds {
                Some((x1, y1, x2, y2)) => (x1.min(x), y1.min(y), x2.max(x), y2.max(y)),
                None => (x, y, x, y),
            });
        }

        bounds.map(|(x1, y1, x2, y2)| BBox { x: x1, y: y1, width: x2 - x1, height: y2 - y1 })
    }

    pub fn from_subpaths(paths: &[SubPath]) -> Option<BBox> {
        BBox::from_points(paths.iter().flat_map(|p| p.points.iter()))
    }

    pub fn union(&self, other: &BBox) -> BBox {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        BBox {
            x,
            y,
            width: (self.x + self.width).max(other.x + other.width) - x,
            height: (self.y + self.height).max(other.y + other.height) - y,
        }
    }

    /// Returns a bounding box of this one mapped by `ts`.
    pub fn transform(&self, ts: &Transform) -> Option<BBox> {
        let corners = [
            ts.apply(self.x, self.y),
            ts.apply(self.x + self.width, self.y),
            ts.apply(self.x + self.width, self.y + self.height),
            ts.apply(self.x, self.y + self.height),
        ];

        BBox::from_points(corners.iter())
    }

    /// Returns a transform that maps the `0..1` range to the box.
    ///
    /// Returns `None` for an empty box.
    pub fn to_units_transform(&self) -> Option<Transform> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return None;
        }

        Some(Transform::new(self.width, 0.0, 0.0, self.height, self.x, self.y))
    }
}

/// Returns a number of segments required to approximate an ellipse
/// drawn at the specified scale.
pub fn ellipse_segments(rx: f64, ry: f64, scale: f64) -> usize {
    let circumference = PI * (rx.abs() + ry.abs()) * scale;
    let n = (circumference / 2.0).ceil();
    if n.is_finite() {
        (n as usize).max(16).min(512)
    } else {
        16
    }
}

/// Returns user space outlines of a basic shape or a path.
///
/// `scale` is an approximate user space to device scale
/// used to choose the ellipse tessellation density.
///
/// Returns `None` for non-shape elements and for shapes that are not rendered,
/// like a rect with a zero width.
pub fn shape_outline(kind: &ElementKind, scale: f64) -> Option<Vec<SubPath>> {
    let paths = match *kind {
        ElementKind::Rect { x, y, width, height, rx, ry } => {
            vec![rect_outline(x, y, width, height, rx, ry, scale)?]
        }
        ElementKind::Circle { cx, cy, r } => vec![ellipse_outline(cx, cy, r, r, scale)?],
        ElementKind::Ellipse { cx, cy, rx, ry } => vec![ellipse_outline(cx, cy, rx, ry, scale)?],
        ElementKind::Line { x1, y1, x2, y2 } => {
            vec![SubPath { points: vec![(x1, y1), (x2, y2)], closed: false }]
        }
        ElementKind::Polyline { ref points } => {
            if points.len() < 2 {
                return None;
            }

            vec![SubPath { points: points.clone(), closed: false }]
        }
        ElementKind::Polygon { ref points } => {
            if points.len() < 2 {
                return None;
            }

            vec![SubPath { points: points.clone(), closed: true }]
        }
        ElementKind::Path { ref commands, .. } => flatten_path(commands),
        _ => return None,
    };

    if paths.is_empty() {
        return None;
    }

    Some(paths)
}

fn rect_outline(x: f64, y: f64, w: f64, h: f64, rx: f64, ry: f64, scale: f64) -> Option<SubPath> {
    if !(w > 0.0 && h > 0.0) {
        return None;
    }

    let mut points = Vec::new();
    if rx > 0.0 && ry > 0.0 {
        let n = ellipse_segments(rx, ry, scale) / 4;
        push_quarter(&mut points, x + w - rx, y + ry, rx, ry, -0.5 * PI, n);
        push_quarter(&mut points, x + w - rx, y + h - ry, rx, ry, 0.0, n);
        push_quarter(&mut points, x + rx, y + h - ry, rx, ry, 0.5 * PI, n);
        push_quarter(&mut points, x + rx, y + ry, rx, ry, PI, n);
    } else {
        points.extend_from_slice(&[(x, y), (x + w, y), (x + w, y + h), (x, y + h)]);
    }

    Some(SubPath { points, closed: true })
}

fn push_quarter(points: &mut Vec<(f64, f64)>, cx: f64, cy: f64, rx: f64, ry: f64, start: f64, n: usize) {
    for i in 0..n + 1 {
        let a = start + 0.5 * PI * i as f64 / n as f64;
        points.push((cx + rx * a.cos(), cy + ry * a.sin()));
    }
}

fn ellipse_outline(cx: f64, cy: f64, rx: f64, ry: f64, scale: f64) -> Option<SubPath> {
    if !(rx > 0.0 && ry > 0.0) {
        return None;
    }

    let n = ellipse_segments(rx, ry, scale);
    let points = (0..n).map(|i| {
        let a = 2.0 * PI * i as f64 / n as f64;
        (cx + rx * a.cos(), cy + ry * a.sin())
    }).collect();

    Some(SubPath { points, closed: true })
}

/// Returns a circle polygon in device coordinates.
pub fn circle_polygon(cx: f64, cy: f64, r: f64) -> Vec<(f64, f64)> {
    let n = ellipse_segments(r, r, 1.0);
    (0..n).map(|i| {
        let a = 2.0 * PI * i as f64 / n as f64;
        (cx + r * a.cos(), cy + r * a.sin())
    }).collect()
}

pub fn transform_subpaths(paths: &mut [SubPath], ts: &Transform) {
    for path in paths {
        for p in &mut path.points {
            *p = ts.apply(p.0, p.1);
        }
    }
}

#[derive(Clone, Copy)]
enum PrevControl {
    None,
    Cubic(f64, f64),
    Quad(f64, f64),
}

/// Converts path commands into polylines.
///
/// Curves are split into a fixed number of segments,
/// arcs into one segment per 11.25 degrees, at least 8.
pub fn flatten_path(commands: &[PathCommand]) -> Vec<SubPath> {
    let mut paths = Vec::new();
    let mut current: Option<SubPath> = None;

    let (mut x, mut y) = (0.0, 0.0);
    let (mut start_x, mut start_y) = (0.0, 0.0);
    let mut prev_ctrl = PrevControl::None;

    for cmd in commands {
        let abs = cmd.is_absolute();
        let (ox, oy) = if abs { (0.0, 0.0) } else { (x, y) };

        if let PathCommand::MoveTo { x: mx, y: my, .. } = *cmd {
            if let Some(path) = current.take() {
                paths.push(path);
            }

            x = mx + ox;
            y = my + oy;
            start_x = x;
            start_y = y;
            current = Some(SubPath::new(x, y));
            prev_ctrl = PrevControl::None;
            continue;
        }

        if let PathCommand::ClosePath { .. } = *cmd {
            if let Some(mut path) = current.take() {
                path.closed = true;
                paths.push(path);
            }

            x = start_x;
            y = start_y;
            prev_ctrl = PrevControl::None;
            continue;
        }

        // a drawing command right after `ClosePath` starts a new subpath
        let path = current.get_or_insert_with(|| SubPath::new(start_x, start_y));
        let points = &mut path.points;

        let mut next_ctrl = PrevControl::None;
        match *cmd {
            PathCommand::LineTo { x: lx, y: ly, .. } => {
                x = lx + ox;
                y = ly + oy;
                points.push((x, y));
            }
            PathCommand::HorizontalLineTo { x: lx, .. } => {
                x = lx + ox;
                points.push((x, y));
            }
            PathCommand::VerticalLineTo { y: ly, .. } => {
                y = ly + oy;
                points.push((x, y));
            }
            PathCommand::CurveTo { x1, y1, x2, y2, x: ex, y: ey, .. } => {
                let c1 = (x1 + ox, y1 + oy);
                let c2 = (x2 + ox, y2 + oy);
                let end = (ex + ox, ey + oy);
                push_cubic(points, (x, y), c1, c2, end);
                next_ctrl = PrevControl::Cubic(c2.0, c2.1);
                x = end.0;
                y = end.1;
            }
            PathCommand::SmoothCurveTo { x2, y2, x: ex, y: ey, .. } => {
                let c1 = match prev_ctrl {
                    PrevControl::Cubic(px, py) => (2.0 * x - px, 2.0 * y - py),
                    _ => (x, y),
                };
                let c2 = (x2 + ox, y2 + oy);
                let end = (ex + ox, ey + oy);
                push_cubic(points, (x, y), c1, c2, end);
                next_ctrl = PrevControl::Cubic(c2.0, c2.1);
                x = end.0;
                y = end.1;
            }
            PathCommand::Quadratic { x1, y1, x: ex, y: ey, .. } => {
                let c = (x1 + ox, y1 + oy);
                let end = (ex + ox, ey + oy);
                push_quad(points, (x, y), c, end);
                next_ctrl = PrevControl::Quad(c.0, c.1);
                x = end.0;
                y = end.1;
            }
            PathCommand::SmoothQuadratic { x: ex, y: ey, .. } => {
                let c = match prev_ctrl {
                    PrevControl::Quad(px, py) => (2.0 * x - px, 2.0 * y - py),
                    _ => (x, y),
                };
                let end = (ex + ox, ey + oy);
                push_quad(points, (x, y), c, end);
                next_ctrl = PrevControl::Quad(c.0, c.1);
                x = end.0;
                y = end.1;
            }
            PathCommand::EllipticalArc { rx, ry, x_axis_rotation, large_arc, sweep, x: ex, y: ey, .. } => {
                let end = (ex + ox, ey + oy);
                push_arc(points, (x, y), rx, ry, x_axis_rotation, large_arc, sweep, end);
                x = end.0;
                y = end.1;
            }
            PathCommand::MoveTo { .. } | PathCommand::ClosePath { .. } => {}
        }

        prev_ctrl = next_ctrl;
    }

    if let Some(path) = current.take() {
        paths.push(path);
    }

    paths
}

fn push_cubic(points: &mut Vec<(f64, f64)>, p0: (f64, f64), p1: (f64, f64), p2: (f64, f64), p3: (f64, f64)) {
    for i in 1..CUBIC_SEGMENTS + 1 {
        let t = i as f64 / CUBIC_SEGMENTS as f64;
        let mt = 1.0 - t;
        let a = mt * mt * mt;
        let b = 3.0 * mt * mt * t;
        let c = 3.0 * mt * t * t;
        let d = t * t * t;
        points.push((
            a * p0.0 + b * p1.0 + c * p2.0 + d * p3.0,
            a * p0.1 + b * p1.1 + c * p2.1 + d * p3.1,
        ));
    }
}

fn push_quad(points: &mut Vec<(f64, f64)>, p0: (f64, f64), p1: (f64, f64), p2: (f64, f64)) {
    for i in 1..QUAD_SEGMENTS + 1 {
        let t = i as f64 / QUAD_SEGMENTS as f64;
        let mt = 1.0 - t;
        let a = mt * mt;
        let b = 2.0 * mt * t;
        let c = t * t;
        points.push((
            a * p0.0 + b * p1.0 + c * p2.0,
            a * p0.1 + b * p1.1 + c * p2.1,
        ));
    }
}

// Endpoint to center parameterization:
// https://www.w3.org/TR/SVG11/implnote.html#ArcImplementationNotes
fn push_arc(
    points: &mut Vec<(f64, f64)>,
    from: (f64, f64),
    rx: f64,
    ry: f64,
    angle: f64,
    large_arc: bool,
    sweep: bool,
    to: (f64, f64),
) {
    if from == to {
        return;
    }

    let mut rx = rx.abs();
    let mut ry = ry.abs();
    if !(rx > 0.0 && ry > 0.0) {
        points.push(to);
        return;
    }

    let (sin, cos) = angle.to_radians().sin_cos();
    let dx2 = (from.0 - to.0) / 2.0;
    let dy2 = (from.1 - to.1) / 2.0;
    let x1p = cos * dx2 + sin * dy2;
    let y1p = -sin * dx2 + cos * dy2;

    // scale up radii that are too small for the chord
    let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
    if lambda > 1.0 {
        let s = lambda.sqrt();
        rx *= s;
        ry *= s;
    }

    let rx2 = rx * rx;
    let ry2 = ry * ry;
    let num = rx2 * ry2 - rx2 * y1p * y1p - ry2 * x1p * x1p;
    let den = rx2 * y1p * y1p + ry2 * x1p * x1p;
    let mut coef = if den > 0.0 { (num / den).max(0.0).sqrt() } else { 0.0 };
    if large_arc == sweep {
        coef = -coef;
    }

    let cxp = coef * rx * y1p / ry;
    let cyp = -coef * ry * x1p / rx;
    let cx = cos * cxp - sin * cyp + (from.0 + to.0) / 2.0;
    let cy = sin * cxp + cos * cyp + (from.1 + to.1) / 2.0;

    let theta1 = ((y1p - cyp) / ry).atan2((x1p - cxp) / rx);
    let theta2 = ((-y1p - cyp) / ry).atan2((-x1p - cxp) / rx);
    let mut delta = theta2 - theta1;
    if sweep && delta < 0.0 {
        delta += 2.0 * PI;
    } else if !sweep && delta > 0.0 {
        delta -= 2.0 * PI;
    }

    let n = ((delta.abs() / ARC_STEP).ceil() as usize).max(MIN_ARC_SEGMENTS);
    for i in 1..n {
        let t = theta1 + delta * i as f64 / n as f64;
        let (st, ct) = t.sin_cos();
        points.push((
            cx + rx * cos * ct - ry * sin * st,
            cy + rx * sin * ct + ry * cos * st,
        ));
    }

    // avoid accumulated error at the end point
    points.push(to);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::parse_path_data;

    fn flatten(text: &str) -> Vec<SubPath> {
        flatten_path(&parse_path_data(text))
    }

    fn near(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < 1e-6 && (a.1 - b.1).abs() < 1e-6
    }

    #[test]
    fn lines_1() {
        let paths = flatten("M 10 20 l 5 0 v 5 H 0 z");
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].points, vec![(10.0, 20.0), (15.0, 20.0), (15.0, 25.0), (0.0, 25.0)]);
        assert!(paths[0].closed);
    }

    #[test]
    fn close_resets_point() {
        let paths = flatten("M 10 10 L 20 10 Z l 0 5");
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[1].points, vec![(10.0, 10.0), (10.0, 15.0)]);
        assert!(!paths[1].closed);
    }

    #[test]
    fn cubic_segments() {
        let paths = flatten("M 0 0 C 0 10 10 10 10 0");
        assert_eq!(paths[0].points.len(), CUBIC_SEGMENTS + 1);
        assert!(near(*paths[0].points.last().unwrap(), (10.0, 0.0)));
    }

    #[test]
    fn smooth_quad_reflects() {
        let paths = flatten("M 0 0 Q 5 10 10 0 T 20 0");
        let pts = &paths[0].points;
        assert_eq!(pts.len(), 1 + 2 * QUAD_SEGMENTS);
        // the reflected control point is (15, -10)
        assert!(pts[QUAD_SEGMENTS + QUAD_SEGMENTS / 2].1 < 0.0);
    }

    #[test]
    fn arc_zero_radius() {
        let paths = flatten("M 0 0 A 0 0 0 0 0 10 5");
        assert_eq!(paths[0].points, vec![(0.0, 0.0), (10.0, 5.0)]);
    }

    #[test]
    fn arc_semicircle() {
        let paths = flatten("M 0 0 A 5 5 0 0 1 10 0");
        let pts = &paths[0].points;
        assert_eq!(pts.len(), 1 + 16);
        assert!(near(pts[8], (5.0, -5.0)));
        assert_eq!(*pts.last().unwrap(), (10.0, 0.0));
        assert!(pts.iter().all(|p| p.0.is_finite() && p.1.is_finite()));
    }

    #[test]
    fn arc_small_radius() {
        // radii are scaled up to fit the chord
        let paths = flatten("M 0 0 A 1 1 0 0 0 10 0");
        let pts = &paths[0].points;
        assert!(pts.iter().all(|p| p.0.is_finite() && p.1.is_finite()));
        assert!(pts.iter().any(|p| (p.1 - 5.0).abs() < 1e-6));
    }

    #[test]
    fn arc_same_points() {
        let paths = flatten("M 5 5 A 10 10 0 0 0 5 5");
        assert_eq!(paths[0].points, vec![(5.0, 5.0)]);
    }

    #[test]
    fn rect_rounded() {
        let kind = ElementKind::Rect { x: 0.0, y: 0.0, width: 10.0, height: 10.0, rx: 2.0, ry: 2.0 };
        let paths = shape_outline(&kind, 1.0).unwrap();
        let bbox = BBox::from_subpaths(&paths).unwrap();
        assert!(near((bbox.x, bbox.y), (0.0, 0.0)));
        assert!(near((bbox.width, bbox.height), (10.0, 10.0)));
    }

    #[test]
    fn empty_shapes() {
        let rect = ElementKind::Rect { x: 0.0, y: 0.0, width: 0.0, height: 10.0, rx: 0.0, ry: 0.0 };
        assert!(shape_outline(&rect, 1.0).is_none());
        let circle = ElementKind::Circle { cx: 0.0, cy: 0.0, r: -1.0 };
        assert!(shape_outline(&circle, 1.0).is_none());
    }

    #[test]
    fn ellipse_segments_1() {
        assert_eq!(ellipse_segments(1.0, 1.0, 1.0), 16);
        assert_eq!(ellipse_segments(1000.0, 1000.0, 10.0), 512);
    }
}
