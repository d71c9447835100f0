// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use svgtypes::NumberListParser;

/// Replaces `NaN` and infinite values with zero.
///
/// SVG consumers are permissive: an attribute that does not yield
/// a finite number behaves as `0`.
#[inline]
pub fn finite_or_zero(n: f64) -> f64 {
    if n.is_finite() { n } else { 0.0 }
}

/// Parses a `<number>`.
///
/// Invalid input is coerced to zero.
pub fn parse_number(text: &str) -> f64 {
    match text.trim().parse::<f64>() {
        Ok(n) => finite_or_zero(n),
        Err(_) => 0.0,
    }
}

/// Parses a `<list-of-numbers>`.
///
/// Parsing stops at the first invalid number.
pub fn parse_number_list(text: &str) -> Vec<f64> {
    let mut list = Vec::new();
    for n in NumberListParser::from(text) {
        match n {
            Ok(n) => list.push(finite_or_zero(n)),
            Err(_) => break,
        }
    }

    list
}

/// Clamps an opacity-like value to the `0..1` range.
#[inline]
pub fn clamp_unit(n: f64) -> f64 {
    if n.is_nan() {
        return 0.0;
    }

    n.max(0.0).min(1.0)
}
