// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

/*!
*svgraster* is an SVG document model and a software rasterizer.

The processing is split into three steps:

- the markup is parsed into a [`TreeNode`] tree;
- the tree, together with `<style>` sheets, is converted into an [`SvgDocument`]:
  a list of typed [`SvgElement`]s with resolved, but not yet inherited, styles
  and a [`Defs`] table of referenceable objects;
- the document is rendered into a straight-alpha RGBA [`PixelBuffer`].

## Example

```
let data = "<svg width='10' height='10'><rect width='5' height='5' fill='red'/></svg>";
let img = svgraster::decode(data, &svgraster::DecodeOptions::default()).unwrap();
assert_eq!(img.pixel(2, 2), Some(svgraster::Color::new(255, 0, 0)));
```

## Limitations

- Patterns and filters are parsed, but not rendered.
- Images are not decoded.
- Text is drawn with a built-in 5x7 bitmap font.
- No anti-aliasing.

[`TreeNode`]: struct.TreeNode.html
[`SvgDocument`]: struct.SvgDocument.html
[`SvgElement`]: struct.SvgElement.html
[`Defs`]: struct.Defs.html
[`PixelBuffer`]: struct.PixelBuffer.html
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
extern crate log;

pub use crate::dom::*;
pub use crate::error::{
    Error,
    Result,
};
pub use crate::parser::{
    apply_css_styles,
    parse_element,
    parse_inline_style,
    parse_markup,
    parse_style_sheet,
    ParseOptions,
    StyleSheet,
};
pub use crate::render::{
    render,
    PixelBuffer,
};
pub use crate::types::*;

mod dom;
mod error;
mod parser;
mod render;
mod types;

// A canvas larger than this is refused by `decode`.
const MAX_CANVAS_BYTES: u64 = i32::max_value() as u64;

/// Basic SVG image information.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct SvgInfo {
    /// Intrinsic width.
    pub width: f64,
    /// Intrinsic height.
    pub height: f64,
    /// The `viewBox` or `0 0 width height` when not set.
    pub view_box: ViewBox,
}

/// Options that defines SVG decoding.
#[derive(Clone, Debug, Default)]
pub struct DecodeOptions {
    /// A target width. The document width is used when not set.
    pub width: Option<u32>,
    /// A target height. The document height is used when not set.
    pub height: Option<u32>,
    /// A background color in any CSS color notation.
    ///
    /// The canvas is transparent when not set or cannot be parsed.
    pub background: Option<String>,
    /// Parsing options.
    pub parse: ParseOptions,
}

/// Checks that the data looks like an SVG image.
///
/// Only the beginning of the data is checked, nothing is parsed.
pub fn is_svg_like<T: AsRef<[u8]>>(data: T) -> bool {
    let text = String::from_utf8_lossy(data.as_ref());
    let text = text.trim_start_matches('\u{feff}').trim_start().to_lowercase();

    if text.starts_with("<svg") {
        true
    } else if text.starts_with("<?xml") {
        text.contains("<svg")
    } else {
        text.starts_with("<!doctype svg")
    }
}

/// Parses an image size without building a document.
pub fn parse_svg_info<T: AsRef<[u8]>>(data: T) -> Result<SvgInfo> {
    let text = ::std::str::from_utf8(data.as_ref())?;
    let root = parse_markup(text)?;
    let (width, height, view_box) = parser::parse_size(&root);

    Ok(SvgInfo { width, height, view_box })
}

/// Parses and renders an SVG image.
pub fn decode<T: AsRef<[u8]>>(data: T, opt: &DecodeOptions) -> Result<PixelBuffer> {
    let text = ::std::str::from_utf8(data.as_ref())?;
    let doc = SvgDocument::from_str_with_opt(text, &opt.parse)?;

    let width = opt.width.unwrap_or_else(|| round_dimension(doc.width));
    let height = opt.height.unwrap_or_else(|| round_dimension(doc.height));
    if width == 0 || height == 0 || width as u64 * height as u64 * 4 > MAX_CANVAS_BYTES {
        return Err(Error::InvalidSize(width, height));
    }

    let background = match opt.background {
        Some(ref text) => {
            let color = Color::from_str_opt(text);
            if color.is_none() {
                warn!("Invalid background color '{}'. Ignored.", text);
            }

            color
        }
        None => None,
    };

    Ok(doc.render(Some(width), Some(height), background))
}

fn round_dimension(n: f64) -> u32 {
    let n = n.round();
    if n > 0.0 && n < u32::max_value() as f64 {
        n as u32
    } else {
        0
    }
}
