// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::f64;

use super::number::parse_number_list;

/// Representation of the `<transform>` type as a 2x3 affine matrix.
///
/// ```text
/// | a c e |
/// | b d f |
/// | 0 0 1 |
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[allow(missing_docs)]
pub struct Transform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Transform {
    /// Constructs a new transform.
    #[inline]
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Transform {
        Transform { a, b, c, d, e, f }
    }

    /// Constructs a new translate transform.
    #[inline]
    pub fn new_translate(tx: f64, ty: f64) -> Transform {
        Transform::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Constructs a new scale transform.
    #[inline]
    pub fn new_scale(sx: f64, sy: f64) -> Transform {
        Transform::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Constructs a new rotate transform. The angle is in degrees.
    pub fn new_rotate(angle: f64) -> Transform {
        let (sin, cos) = angle.to_radians().sin_cos();
        Transform::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Constructs a new skew transform along the X axis. The angle is in degrees.
    pub fn new_skew_x(angle: f64) -> Transform {
        Transform::new(1.0, 0.0, angle.to_radians().tan(), 1.0, 0.0, 0.0)
    }

    /// Constructs a new skew transform along the Y axis. The angle is in degrees.
    pub fn new_skew_y(angle: f64) -> Transform {
        Transform::new(1.0, angle.to_radians().tan(), 0.0, 1.0, 0.0, 0.0)
    }

    /// Appends a transform to the current one.
    ///
    /// The appended transform is applied to a point first,
    /// so `parent.append(&child)` gives the child-to-root mapping.
    pub fn append(&mut self, t: &Transform) {
        let a = self.a * t.a + self.c * t.b;
        let b = self.b * t.a + self.d * t.b;
        let c = self.a * t.c + self.c * t.d;
        let d = self.b * t.c + self.d * t.d;
        let e = self.a * t.e + self.c * t.f + self.e;
        let f = self.b * t.e + self.d * t.f + self.f;
        *self = Transform { a, b, c, d, e, f };
    }

    /// Returns a copy with `t` appended.
    #[inline]
    pub fn then(mut self, t: &Transform) -> Transform {
        self.append(t);
        self
    }

    /// Applies the transform to a point.
    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (self.a * x + self.c * y + self.e, self.b * x + self.d * y + self.f)
    }

    /// Returns an inverted transform, if it is invertible.
    pub fn invert(&self) -> Option<Transform> {
        let det = self.a * self.d - self.b * self.c;
        if det.abs() < f64::EPSILON || !det.is_finite() {
            return None;
        }

        let a = self.d / det;
        let b = -self.b / det;
        let c = -self.c / det;
        let d = self.a / det;
        let e = -(a * self.e + c * self.f);
        let f = -(b * self.e + d * self.f);
        Some(Transform { a, b, c, d, e, f })
    }

    /// Returns an average linear scale factor of the transform.
    ///
    /// Used to map stroke widths and tessellation density to device pixels.
    #[inline]
    pub fn mean_scale(&self) -> f64 {
        (self.a * self.d - self.b * self.c).abs().sqrt()
    }
}

impl Default for Transform {
    fn default() -> Transform {
        Transform::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }
}

/// A single entry of a `transform` attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
#[allow(missing_docs)]
pub enum TransformOp {
    Translate { tx: f64, ty: f64 },
    Scale { sx: f64, sy: f64 },
    Rotate { angle: f64, center: Option<(f64, f64)> },
    SkewX { angle: f64 },
    SkewY { angle: f64 },
    Matrix(Transform),
}

impl TransformOp {
    /// Converts the operation into a matrix.
    pub fn to_transform(&self) -> Transform {
        match *self {
            TransformOp::Translate { tx, ty } => Transform::new_translate(tx, ty),
            TransformOp::Scale { sx, sy } => Transform::new_scale(sx, sy),
            TransformOp::Rotate { angle, center: None } => Transform::new_rotate(angle),
            TransformOp::Rotate { angle, center: Some((cx, cy)) } => {
                Transform::new_translate(cx, cy)
                    .then(&Transform::new_rotate(angle))
                    .then(&Transform::new_translate(-cx, -cy))
            }
            TransformOp::SkewX { angle } => Transform::new_skew_x(angle),
            TransformOp::SkewY { angle } => Transform::new_skew_y(angle),
            TransformOp::Matrix(ts) => ts,
        }
    }
}

/// Composes a list of operations, left to right, into a single matrix.
pub fn compose_transform(ops: &[TransformOp]) -> Transform {
    let mut ts = Transform::default();
    for op in ops {
        ts.append(&op.to_transform());
    }

    ts
}

/// Parses a `transform` attribute value.
///
/// Parsing stops at the first malformed entry, keeping the entries before it.
pub fn parse_transform_list(text: &str) -> Vec<TransformOp> {
    let mut ops = Vec::new();
    let bytes = text.as_bytes();
    let mut pos = 0;

    loop {
        while pos < bytes.len() && (bytes[pos].is_ascii_whitespace() || bytes[pos] == b',') {
            pos += 1;
        }

        if pos == bytes.len() {
            break;
        }

        let name_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
            pos += 1;
        }
        let name = &text[name_start..pos];

        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }

        if name.is_empty() || pos == bytes.len() || bytes[pos] != b'(' {
            warn!("Invalid transform list: '{}'.", text);
            break;
        }
        pos += 1;

        let args_end = match text[pos..].find(')') {
            Some(idx) => pos + idx,
            None => {
                warn!("Invalid transform list: '{}'.", text);
                break;
            }
        };

        let args = parse_number_list(&text[pos..args_end]);
        pos = args_end + 1;

        match transform_op(name, &args) {
            Some(op) => ops.push(op),
            None => {
                warn!("Invalid transform function: '{}' with {} arguments.", name, args.len());
                break;
            }
        }
    }

    ops
}

fn transform_op(name: &str, args: &[f64]) -> Option<TransformOp> {
    let op = match (name, args.len()) {
        ("matrix", 6) => {
            TransformOp::Matrix(Transform::new(args[0], args[1], args[2], args[3], args[4], args[5]))
        }
        ("translate", 1) => TransformOp::Translate { tx: args[0], ty: 0.0 },
        ("translate", 2) => TransformOp::Translate { tx: args[0], ty: args[1] },
        ("scale", 1) => TransformOp::Scale { sx: args[0], sy: args[0] },
        ("scale", 2) => TransformOp::Scale { sx: args[0], sy: args[1] },
        ("rotate", 1) => TransformOp::Rotate { angle: args[0], center: None },
        ("rotate", 3) => TransformOp::Rotate { angle: args[0], center: Some((args[1], args[2])) },
        ("skewX", 1) => TransformOp::SkewX { angle: args[0] },
        ("skewY", 1) => TransformOp::SkewY { angle: args[0] },
        _ => return None,
    };

    Some(op)
}
