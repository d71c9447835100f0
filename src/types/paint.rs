// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use super::Color;

/// Representation of the `<paint>` type.
#[derive(Clone, PartialEq, Debug)]
pub enum Paint {
    /// Nothing is painted.
    None,
    /// A solid color.
    Color(Color),
    /// A reference to a paint server, usually a gradient, by id.
    UrlRef(String),
    /// Paint with the value of the `color` property.
    CurrentColor,
}

impl Paint {
    /// Parses a `<paint>`.
    ///
    /// Anything unrecognized is `Paint::None`.
    /// A fallback color after `url()` is ignored.
    pub fn from_str(text: &str) -> Paint {
        let text = text.trim();

        if text == "none" {
            return Paint::None;
        }

        if text.eq_ignore_ascii_case("currentColor") {
            return Paint::CurrentColor;
        }

        if text.starts_with("url(") {
            return match parse_url_ref(text) {
                Some(id) => Paint::UrlRef(id),
                None => Paint::None,
            };
        }

        match Color::from_str_opt(text) {
            Some(c) => Paint::Color(c),
            None => Paint::None,
        }
    }

    /// Checks that paint is not `Paint::None`.
    #[inline]
    pub fn is_some(&self) -> bool {
        *self != Paint::None
    }
}

/// Parses a `url(#id)` reference and returns the `id` part.
///
/// Quotes inside the parentheses are allowed.
pub fn parse_url_ref(text: &str) -> Option<String> {
    let text = text.trim();
    if !text.starts_with("url(") {
        return None;
    }

    let end = text.find(')')?;
    let link = text[4..end].trim().trim_matches(|c| c == '\'' || c == '"').trim();
    let link = link.strip_prefix('#')?;
    if link.is_empty() {
        return None;
    }

    Some(link.to_string())
}

/// Parses an `href` value and returns the local `id` part.
pub fn parse_href(text: &str) -> Option<String> {
    let link = text.trim().strip_prefix('#')?;
    if link.is_empty() {
        return None;
    }

    Some(link.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_paint {
        ($name:ident, $text:expr, $result:expr) => (
            #[test]
            fn $name() {
                assert_eq!(Paint::from_str($text), $result);
            }
        )
    }

    test_paint!(parse_paint_1, "none", Paint::None);
    test_paint!(parse_paint_2, "currentColor", Paint::CurrentColor);
    test_paint!(parse_paint_3, "currentcolor", Paint::CurrentColor);
    test_paint!(parse_paint_4, "url(#lg1)", Paint::UrlRef("lg1".to_string()));
    test_paint!(parse_paint_5, "url( '#lg1' ) red", Paint::UrlRef("lg1".to_string()));
    test_paint!(parse_paint_6, "#0f0", Paint::Color(Color::new(0, 255, 0)));
    test_paint!(parse_paint_7, "qwe", Paint::None);
    test_paint!(parse_paint_8, "url(lg1)", Paint::None);
    test_paint!(parse_paint_9, "transparent", Paint::None);

    #[test]
    fn parse_href_1() {
        assert_eq!(parse_href("#sym"), Some("sym".to_string()));
        assert_eq!(parse_href("image.png"), None);
        assert_eq!(parse_href("#"), None);
    }
}
