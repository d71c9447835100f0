// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::rc::Rc;

use crate::error::Result;
use crate::parser::{
    self,
    ParseOptions,
    StyleSheet,
};
use crate::render::{
    self,
    PixelBuffer,
};
use crate::types::{
    AspectRatio,
    Color,
    ViewBox,
};

use super::{
    Defs,
    StyleProps,
    SvgElement,
};

/// A parsed SVG document.
#[derive(Clone, PartialEq, Debug)]
pub struct SvgDocument {
    /// Intrinsic width with units stripped.
    pub width: f64,
    /// Intrinsic height with units stripped.
    pub height: f64,
    /// The `viewBox` or `0 0 width height` when not set.
    pub view_box: ViewBox,
    /// Root's `preserveAspectRatio`.
    pub preserve_aspect_ratio: AspectRatio,
    /// Top-level elements in document order.
    pub elements: Vec<Rc<SvgElement>>,
    /// Referenceable objects.
    pub defs: Defs,
    /// All `<style>` rules by selector.
    pub styles: StyleSheet,
    /// Presentation attributes and style of the root `svg` element.
    pub root_style: StyleProps,
    /// Font size used when none is set.
    pub default_font_size: f64,
}

impl SvgDocument {
    /// Parses an `SvgDocument` from a string using default options.
    pub fn from_str(text: &str) -> Result<SvgDocument> {
        SvgDocument::from_str_with_opt(text, &ParseOptions::default())
    }

    /// Parses an `SvgDocument` from a string using the specified options.
    pub fn from_str_with_opt(text: &str, opt: &ParseOptions) -> Result<SvgDocument> {
        parser::parse_svg(text, opt)
    }

    /// Renders the document into a new RGBA buffer.
    ///
    /// The target size defaults to the document size.
    /// The buffer is transparent unless `background` is set.
    pub fn render(&self, width: Option<u32>, height: Option<u32>, background: Option<Color>)
        -> PixelBuffer
    {
        render::render(self, width, height, background)
    }
}
