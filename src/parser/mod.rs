// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Markup, style and element parsers that assemble an `SvgDocument`.

pub use self::css::{
    apply_css_styles,
    parse_inline_style,
    parse_style_sheet,
    StyleSheet,
};
pub use self::elements::parse_element;
pub use self::markup::parse_markup;
pub use self::options::*;

mod css;
mod defs;
mod elements;
mod markup;
mod options;
mod text;

use crate::dom::{
    Defs,
    SvgDocument,
    TreeNode,
};
use crate::error::Result;
use crate::types::{
    dimension_value,
    AspectRatio,
    ViewBox,
};

// Used when neither the size nor the `viewBox` is set.
const DEFAULT_WIDTH: f64 = 300.0;
const DEFAULT_HEIGHT: f64 = 150.0;

pub fn parse_svg(text: &str, opt: &ParseOptions) -> Result<SvgDocument> {
    let mut root = parse_markup(text)?;

    // Since we not only parsing, but also converting an SVG structure,
    // we can't do everything in one take.
    // At first, we prepare text nodes and collect style sheets.
    // Than resolve gradients, which can be linked from anywhere.
    // And then convert elements, applying CSS on the way.
    text::prepare_text(&mut root);

    let mut styles = StyleSheet::new();
    for node in root.descendants().filter(|n| n.is_tag("style")) {
        match node.attribute("type") {
            None | Some("") | Some("text/css") => {}
            Some(kind) => {
                warn!("A '{}' style sheet is not supported.", kind);
                continue;
            }
        }

        parse_style_sheet(&node.text_content(), &mut styles, opt)?;
    }

    let (width, height, view_box) = parse_size(&root);
    let preserve_aspect_ratio = AspectRatio::from_str_or_default(
        root.attribute("preserveAspectRatio").unwrap_or("")
    );

    let mut defs = Defs::default();
    defs::collect_gradients(&root, &styles, (view_box.width, view_box.height), &mut defs);

    let elements = root.elements()
        .filter_map(|node| parse_element(node, &styles, &mut defs))
        .collect();

    let root_style = apply_css_styles(&root, &styles);

    Ok(SvgDocument {
        width,
        height,
        view_box,
        preserve_aspect_ratio,
        elements,
        defs,
        styles,
        root_style,
        default_font_size: opt.default_font_size,
    })
}

/// Resolves the document size and the `viewBox` from the root element.
///
/// A missing size is taken from the `viewBox`, keeping its aspect ratio when only
/// one dimension is set. Without both, the size defaults to 300x150.
/// A missing `viewBox` is `0 0 width height`.
pub fn parse_size(root: &TreeNode) -> (f64, f64, ViewBox) {
    let vb = root.attribute("viewBox").and_then(ViewBox::from_str_opt);
    let w = root.attribute("width").and_then(dimension_value);
    let h = root.attribute("height").and_then(dimension_value);

    let (width, height) = match (w, h, vb) {
        (Some(w), Some(h), _) => (w, h),
        (Some(w), None, Some(vb)) => (w, w * vb.height / vb.width),
        (None, Some(h), Some(vb)) => (h * vb.width / vb.height, h),
        (None, None, Some(vb)) => (vb.width, vb.height),
        (Some(w), None, None) => (w, DEFAULT_HEIGHT),
        (None, Some(h), None) => (DEFAULT_WIDTH, h),
        (None, None, None) => (DEFAULT_WIDTH, DEFAULT_HEIGHT),
    };

    let view_box = vb.unwrap_or_else(|| ViewBox::new(0.0, 0.0, width, height));

    (width, height, view_box)
}
