// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Stroke outlining.
//!
//! A stroke is converted into a set of overlapping polygons: a quad per segment,
//! a join per vertex and a cap per open end. All the polygons have the same
//! orientation, so filling them together with the nonzero rule gives their union.

use std::mem;

use crate::dom::{
    InheritedStyle,
    LineCap,
    LineJoin,
};

use super::path::{
    circle_polygon,
    SubPath,
};
use super::raster::Polygon;

type Point = (f64, f64);

/// Converts device space subpaths into stroke polygons.
///
/// `scale` maps user space lengths, like the stroke width, to device pixels.
pub fn stroke_polygons(paths: &[SubPath], style: &InheritedStyle, scale: f64) -> Vec<Polygon> {
    let hw = style.stroke_width * scale / 2.0;
    if !(hw > 0.0) || !hw.is_finite() {
        return Vec::new();
    }

    let paths: Vec<SubPath> = paths.iter().map(dedup).collect();

    let paths: Vec<SubPath> = match dash_pattern(&style.stroke_dasharray, scale) {
        Some(dashes) => {
            let offset = style.stroke_dashoffset * scale;
            let mut dashed = Vec::new();
            for path in &paths {
                apply_dash(path, &dashes, offset, &mut dashed);
            }

            dashed.iter().map(dedup).collect()
        }
        None => paths,
    };

    let mut polygons = Vec::new();
    for path in &paths {
        stroke_subpath(path, hw, style, &mut polygons);
    }

    for poly in &mut polygons {
        orient(poly);
    }

    polygons
}

fn stroke_subpath(path: &SubPath, hw: f64, style: &InheritedStyle, out: &mut Vec<Polygon>) {
    let pts = &path.points;
    let n = pts.len();

    if n == 0 {
        return;
    }

    // a zero length subpath is drawn only with round and square caps
    if n == 1 {
        let (x, y) = pts[0];
        match style.stroke_linecap {
            LineCap::Butt => {}
            LineCap::Round => out.push(circle_polygon(x, y, hw)),
            LineCap::Square => {
                out.push(vec![(x - hw, y - hw), (x + hw, y - hw), (x + hw, y + hw), (x - hw, y + hw)]);
            }
        }

        return;
    }

    let seg_count = if path.closed { n } else { n - 1 };
    for i in 0..seg_count {
        let p = pts[i];
        let q = pts[(i + 1) % n];
        let nrm = normal(p, q, hw);
        out.push(vec![
            (p.0 + nrm.0, p.1 + nrm.1),
            (q.0 + nrm.0, q.1 + nrm.1),
            (q.0 - nrm.0, q.1 - nrm.1),
            (p.0 - nrm.0, p.1 - nrm.1),
        ]);
    }

    let joins: Vec<usize> = if path.closed { (0..n).collect() } else { (1..n - 1).collect() };
    for i in joins {
        let prev = pts[(i + n - 1) % n];
        let next = pts[(i + 1) % n];
        add_join(prev, pts[i], next, hw, style, out);
    }

    if !path.closed {
        add_cap(pts[0], pts[1], hw, style.stroke_linecap, out);
        add_cap(pts[n - 1], pts[n - 2], hw, style.stroke_linecap, out);
    }
}

fn add_join(prev: Point, p: Point, next: Point, hw: f64, style: &InheritedStyle, out: &mut Vec<Polygon>) {
    let u1 = unit(prev, p);
    let u2 = unit(p, next);
    let cross = u1.0 * u2.1 - u1.1 * u2.0;
    let dot = u1.0 * u2.0 + u1.1 * u2.1;

    if style.stroke_linejoin == LineJoin::Round {
        if cross.abs() > 1e-9 || dot < 0.0 {
            out.push(circle_polygon(p.0, p.1, hw));
        }

        return;
    }

    // collinear segments do not need a join
    if cross.abs() < 1e-9 {
        return;
    }

    // the outer side of the turn
    let o = -cross.signum();
    let n1 = (-u1.1 * hw * o, u1.0 * hw * o);
    let n2 = (-u2.1 * hw * o, u2.0 * hw * o);
    let a = (p.0 + n1.0, p.1 + n1.1);
    let b = (p.0 + n2.0, p.1 + n2.1);

    if style.stroke_linejoin == LineJoin::Miter {
        // miter length to stroke width ratio is 1 / cos(turn / 2)
        let half_cos = ((1.0 + dot) / 2.0).max(0.0).sqrt();
        if half_cos > 0.0 && 1.0 / half_cos <= style.stroke_miterlimit {
            let k = hw * hw / (hw * hw + n1.0 * n2.0 + n1.1 * n2.1);
            let tip = (p.0 + (n1.0 + n2.0) * k, p.1 + (n1.1 + n2.1) * k);
            out.push(vec![p, a, tip, b]);
            return;
        }
    }

    out.push(vec![p, a, b]);
}

// `from` is the end point, `to` is its neighbour.
fn add_cap(from: Point, to: Point, hw: f64, cap: LineCap, out: &mut Vec<Polygon>) {
    match cap {
        LineCap::Butt => {}
        LineCap::Round => out.push(circle_polygon(from.0, from.1, hw)),
        LineCap::Square => {
            let u = unit(to, from);
            let nrm = normal(to, from, hw);
            let ext = (from.0 + u.0 * hw, from.1 + u.1 * hw);
            out.push(vec![
                (from.0 + nrm.0, from.1 + nrm.1),
                (ext.0 + nrm.0, ext.1 + nrm.1),
                (ext.0 - nrm.0, ext.1 - nrm.1),
                (from.0 - nrm.0, from.1 - nrm.1),
            ]);
        }
    }
}

/// Returns a valid dash pattern in device units.
///
/// Returns `None` for a solid stroke.
fn dash_pattern(list: &[f64], scale: f64) -> Option<Vec<f64>> {
    if list.is_empty() || list.iter().any(|v| !(*v >= 0.0) || !v.is_finite()) {
        return None;
    }

    let mut dashes: Vec<f64> = list.iter().map(|v| v * scale).collect();
    if dashes.len() % 2 == 1 {
        let copy = dashes.clone();
        dashes.extend_from_slice(&copy);
    }

    // too short patterns are practically solid
    let sum: f64 = dashes.iter().sum();
    if !(sum > 1e-3) {
        return None;
    }

    Some(dashes)
}

fn apply_dash(path: &SubPath, dashes: &[f64], offset: f64, out: &mut Vec<SubPath>) {
    let mut pts = path.points.clone();
    if pts.len() < 2 {
        return;
    }

    if path.closed {
        let first = pts[0];
        pts.push(first);
    }

    let total: f64 = dashes.iter().sum();
    let mut offset = offset % total;
    if offset < 0.0 {
        offset += total;
    }

    // skip the offset
    let mut idx = 0;
    let mut left = dashes[0];
    while offset > 0.0 {
        if offset >= left {
            offset -= left;
            idx = (idx + 1) % dashes.len();
            left = dashes[idx];
        } else {
            left -= offset;
            offset = 0.0;
        }
    }

    let mut drawing = idx % 2 == 0;
    let mut current = if drawing { vec![pts[0]] } else { Vec::new() };

    for seg in pts.windows(2) {
        let (a, b) = (seg[0], seg[1]);
        let len = distance(a, b);
        let mut pos = 0.0;

        loop {
            let rest = len - pos;
            if left >= rest {
                left -= rest;
                if drawing {
                    current.push(b);
                }

                break;
            }

            pos += left;
            let p = if len > 0.0 {
                (a.0 + (b.0 - a.0) * pos / len, a.1 + (b.1 - a.1) * pos / len)
            } else {
                b
            };

            if drawing {
                current.push(p);
                out.push(SubPath { points: mem::replace(&mut current, Vec::new()), closed: false });
            }

            idx = (idx + 1) % dashes.len();
            left = dashes[idx];
            drawing = !drawing;

            if drawing {
                current.push(p);
            }
        }
    }

    if drawing && !current.is_empty() {
        out.push(SubPath { points: current, closed: false });
    }
}

// Removes consecutive duplicated points.
fn dedup(path: &SubPath) -> SubPath {
    let mut points: Vec<Point> = Vec::with_capacity(path.points.len());
    for &p in &path.points {
        if !p.0.is_finite() || !p.1.is_finite() {
            continue;
        }

        match points.last() {
            Some(&last) if distance(last, p) < 1e-9 => {}
            _ => points.push(p),
        }
    }

    let mut closed = path.closed;
    if closed && points.len() > 1 && distance(points[0], points[points.len() - 1]) < 1e-9 {
        points.pop();
    }

    if points.len() < 2 {
        closed = false;
    }

    SubPath { points, closed }
}

fn orient(poly: &mut Polygon) {
    let mut area = 0.0;
    let mut prev = match poly.last() {
        Some(&p) => p,
        None => return,
    };

    for &p in poly.iter() {
        area += prev.0 * p.1 - p.0 * prev.1;
        prev = p;
    }

    if area < 0.0 {
        poly.reverse();
    }
}

#[inline]
fn distance(a: Point, b: Point) -> f64 {
    ((b.0 - a.0) * (b.0 - a.0) + (b.1 - a.1) * (b.1 - a.1)).sqrt()
}

#[inline]
fn unit(a: Point, b: Point) -> Point {
    let len = distance(a, b);
    if len > 0.0 {
        ((b.0 - a.0) / len, (b.1 - a.1) / len)
    } else {
        (0.0, 0.0)
    }
}

// A left-hand normal scaled to `hw`.
#[inline]
fn normal(a: Point, b: Point, hw: f64) -> Point {
    let u = unit(a, b);
    (-u.1 * hw, u.0 * hw)
}
