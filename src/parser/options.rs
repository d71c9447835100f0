// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

/// Options that defines SVG parsing.
#[derive(Clone, Debug)]
pub struct ParseOptions {
    /// Skip invalid/unsupported CSS.
    ///
    /// Enabled by default: an unsupported selector or a malformed style sheet
    /// is logged and skipped.
    ///
    /// When disabled, `UnsupportedCss` and `InvalidCss` errors will occur during parsing.
    pub skip_invalid_css: bool,

    /// A font size used when none of the text ancestors sets one.
    pub default_font_size: f64,
}

impl Default for ParseOptions {
    fn default() -> ParseOptions {
        ParseOptions {
            skip_invalid_css: true,
            default_font_size: 16.0,
        }
    }
}
