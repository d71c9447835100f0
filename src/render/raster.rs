// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Scanline polygon filling.

use std::cmp::Ordering;

use crate::dom::FillRule;

use super::canvas::PixelBuffer;
use super::mask::Mask;
use super::paint::PaintSource;

/// A closed polygon in device coordinates.
pub type Polygon = Vec<(f64, f64)>;

struct Edge {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    // +1 for downward edges, -1 for upward ones
    dir: i32,
}

/// Calls `f(y, x_start, x_end)` for each horizontal span inside the polygons.
///
/// Each polygon is implicitly closed. Pixels are sampled at their centers,
/// `x_end` is exclusive and all the spans are clipped to the `width`x`height` area.
pub fn for_each_span<F>(polygons: &[Polygon], rule: FillRule, width: u32, height: u32, mut f: F)
    where F: FnMut(i64, i64, i64)
{
    let mut edges = Vec::new();
    let mut min_y = f64::MAX;
    let mut max_y = f64::MIN;

    for poly in polygons {
        if poly.len() < 3 {
            continue;
        }

        if poly.iter().any(|p| !p.0.is_finite() || !p.1.is_finite()) {
            continue;
        }

        let mut prev = poly[poly.len() - 1];
        for &p in poly {
            if prev.1 != p.1 {
                edges.push(Edge {
                    x0: prev.0,
                    y0: prev.1,
                    x1: p.0,
                    y1: p.1,
                    dir: if p.1 > prev.1 { 1 } else { -1 },
                });

                min_y = min_y.min(p.1.min(prev.1));
                max_y = max_y.max(p.1.max(prev.1));
            }

            prev = p;
        }
    }

    if edges.is_empty() {
        return;
    }

    let y_start = ((min_y - 0.5).ceil() as i64).max(0);
    let y_end = ((max_y - 0.5).ceil() as i64).min(height as i64);

    let mut crossings: Vec<(f64, i32)> = Vec::with_capacity(16);
    for y in y_start..y_end {
        let yc = y as f64 + 0.5;

        crossings.clear();
        for e in &edges {
            let (top, bottom) = if e.y0 < e.y1 { (e.y0, e.y1) } else { (e.y1, e.y0) };
            if yc >= top && yc < bottom {
                let x = e.x0 + (yc - e.y0) * (e.x1 - e.x0) / (e.y1 - e.y0);
                crossings.push((x, e.dir));
            }
        }

        crossings.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

        let mut emit = |xa: f64, xb: f64| {
            let x0 = ((xa - 0.5).ceil() as i64).max(0);
            let x1 = ((xb - 0.5).ceil() as i64).min(width as i64);
            if x0 < x1 {
                f(y, x0, x1);
            }
        };

        match rule {
            FillRule::EvenOdd => {
                for pair in crossings.chunks(2) {
                    if pair.len() == 2 {
                        emit(pair[0].0, pair[1].0);
                    }
                }
            }
            FillRule::NonZero => {
                let mut winding = 0;
                let mut start = 0.0;
                for &(x, dir) in &crossings {
                    let prev = winding;
                    winding += dir;
                    if prev == 0 && winding != 0 {
                        start = x;
                    } else if prev != 0 && winding == 0 {
                        emit(start, x);
                    }
                }
            }
        }
    }
}

/// Fills polygons on the canvas.
///
/// Pixels with a zero `mask` value are left untouched,
/// other mask values scale the paint alpha.
pub fn fill_polygons(
    canvas: &mut PixelBuffer,
    mask: Option<&Mask>,
    polygons: &[Polygon],
    rule: FillRule,
    paint: &PaintSource,
) {
    let (width, height) = (canvas.width, canvas.height);
    for_each_span(polygons, rule, width, height, |y, x0, x1| {
        for x in x0..x1 {
            let coverage = match mask {
                Some(mask) => {
                    let v = mask.get(x, y);
                    if v == 0 {
                        continue;
                    }

                    v as f64 / 255.0
                }
                None => 1.0,
            };

            let color = paint.color_at(x as f64 + 0.5, y as f64 + 0.5);
            canvas.blend(x, y, color, coverage);
        }
    });
}

/// Fills polygons into a mask with the specified value.
pub fn fill_mask(mask: &mut Mask, width: u32, height: u32, polygons: &[Polygon], rule: FillRule, value: u8) {
    for_each_span(polygons, rule, width, height, |y, x0, x1| {
        for x in x0..x1 {
            mask.set(x, y, value);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(polygons: &[Polygon], rule: FillRule, w: u32, h: u32) -> Vec<(i64, i64, i64)> {
        let mut list = Vec::new();
        for_each_span(polygons, rule, w, h, |y, x0, x1| list.push((y, x0, x1)));
        list
    }

    fn square(x: f64, y: f64, size: f64) -> Polygon {
        vec![(x, y), (x + size, y), (x + size, y + size), (x, y + size)]
    }

    #[test]
    fn square_1() {
        assert_eq!(spans(&[square(0.0, 0.0, 2.0)], FillRule::NonZero, 4, 4),
                   vec![(0, 0, 2), (1, 0, 2)]);
    }

    #[test]
    fn clipped_1() {
        assert_eq!(spans(&[square(-5.0, -5.0, 7.0)], FillRule::NonZero, 1, 1),
                   vec![(0, 0, 1)]);
    }

    #[test]
    fn rules_on_hole() {
        // the same orientation for both squares
        let polys = vec![square(0.0, 0.0, 6.0), square(2.0, 2.0, 2.0)];
        let evenodd = spans(&polys, FillRule::EvenOdd, 6, 6);
        assert!(evenodd.contains(&(2, 0, 2)));
        assert!(evenodd.contains(&(2, 4, 6)));

        let nonzero = spans(&polys, FillRule::NonZero, 6, 6);
        assert!(nonzero.contains(&(2, 0, 6)));
    }

    #[test]
    fn degenerate_1() {
        let line = vec![(0.0, 0.0), (5.0, 5.0)];
        assert!(spans(&[line], FillRule::NonZero, 10, 10).is_empty());

        let nan = vec![(0.0, 0.0), (5.0, ::std::f64::NAN), (0.0, 5.0)];
        assert!(spans(&[nan], FillRule::NonZero, 10, 10).is_empty());
    }
}
