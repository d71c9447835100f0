// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::str::FromStr;

use svgtypes::{
    Length,
    LengthListParser,
    LengthUnit,
};

use super::number::finite_or_zero;

/// Parses a `<length>` keeping its unit.
pub fn parse_length(text: &str) -> Option<Length> {
    Length::from_str(text.trim()).ok()
}

/// Parses a `<length>` and strips its unit.
///
/// `10px`, `10mm` and `10` are all `10`. Invalid input is coerced to zero.
pub fn length_value(text: &str) -> f64 {
    match parse_length(text) {
        Some(len) => finite_or_zero(len.number),
        None => 0.0,
    }
}

/// Parses a length that can be set in fractions or in percents.
///
/// `50%` and `0.5` are both `0.5`.
pub fn fraction_value(text: &str) -> f64 {
    match parse_length(text) {
        Some(len) if len.unit == LengthUnit::Percent => finite_or_zero(len.number / 100.0),
        Some(len) => finite_or_zero(len.number),
        None => 0.0,
    }
}

/// Parses a root element dimension.
///
/// Percentages cannot be resolved without a viewport, so they are treated as unset.
pub fn dimension_value(text: &str) -> Option<f64> {
    let len = parse_length(text)?;
    if len.unit == LengthUnit::Percent {
        return None;
    }

    Some(finite_or_zero(len.number))
}

/// Parses a comma and/or space separated list of lengths, stripping units.
///
/// Parsing stops at the first invalid item.
pub fn parse_length_list(text: &str) -> Vec<f64> {
    let mut list = Vec::new();
    for len in LengthListParser::from(text.trim()) {
        match len {
            Ok(len) => list.push(finite_or_zero(len.number)),
            Err(_) => break,
        }
    }

    list
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_length {
        ($name:ident, $func:ident, $text:expr, $result:expr) => (
            #[test]
            fn $name() {
                assert_eq!($func($text), $result);
            }
        )
    }

    test_length!(length_value_1, length_value, "10", 10.0);
    test_length!(length_value_2, length_value, "10px", 10.0);
    test_length!(length_value_3, length_value, "2.5mm", 2.5);
    test_length!(length_value_4, length_value, "q", 0.0);

    test_length!(fraction_value_1, fraction_value, "50%", 0.5);
    test_length!(fraction_value_2, fraction_value, "0.25", 0.25);

    test_length!(dimension_value_1, dimension_value, "100", Some(100.0));
    test_length!(dimension_value_2, dimension_value, "100%", None);
    test_length!(dimension_value_3, dimension_value, "12pt", Some(12.0));

    test_length!(length_list_1, parse_length_list, "5, 3 2px", vec![5.0, 3.0, 2.0]);
    test_length!(length_list_2, parse_length_list, "5 none", vec![5.0]);
    test_length!(length_list_3, parse_length_list, " 1.5mm,2% ", vec![1.5, 2.0]);
    test_length!(length_list_4, parse_length_list, "", Vec::<f64>::new());
}
