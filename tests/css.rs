// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#[macro_use] extern crate pretty_assertions;

use svgraster::{
    Color,
    Error,
    Paint,
    ParseOptions,
    SvgDocument,
};

fn fill_of(text: &str, idx: usize) -> Option<Paint> {
    let doc = SvgDocument::from_str(text).unwrap();
    doc.elements[idx].base.style.fill.clone()
}

fn color(r: u8, g: u8, b: u8) -> Option<Paint> {
    Some(Paint::Color(Color::new(r, g, b)))
}

macro_rules! test_fill {
    ($name:ident, $text:expr, $idx:expr, $result:expr) => (
        #[test]
        fn $name() {
            assert_eq!(fill_of($text, $idx), $result);
        }
    )
}

test_fill!(parse_css_1,
"<svg>
    <style type='text/css'>
        <![CDATA[
            .fil1 {fill:#00913f}
            .str1{stroke:#ffcc00;stroke-width:2}
        ]]>
    </style>
    <rect class='fil1'/>
</svg>",
0, color(0, 0x91, 0x3f));

// style can be set after usage
test_fill!(parse_css_2,
"<svg>
    <rect class='fil1'/>
    <style type='text/css'>.fil1 {fill:#00913f}</style>
</svg>",
0, color(0, 0x91, 0x3f));

// style inside `defs`
test_fill!(parse_css_3,
"<svg>
    <defs><style>rect {fill:blue}</style></defs>
    <rect/>
    <circle/>
</svg>",
0, color(0, 0, 255));

test_fill!(parse_css_4,
"<svg>
    <defs><style>rect {fill:blue}</style></defs>
    <rect/>
    <circle/>
</svg>",
1, None);

// a presentation attribute has the lowest priority
test_fill!(priority_attr_1,
"<svg>
    <style>* {fill:red}</style>
    <rect fill='blue'/>
</svg>",
0, color(255, 0, 0));

test_fill!(priority_universal_1,
"<svg>
    <style>rect {fill:green} * {fill:red}</style>
    <rect/>
</svg>",
0, color(0, 128, 0));

test_fill!(priority_class_1,
"<svg>
    <style>.c1 {fill:green} rect {fill:red}</style>
    <rect class='c1'/>
</svg>",
0, color(0, 128, 0));

// the last class in the attribute wins
test_fill!(priority_class_2,
"<svg>
    <style>.c2 {fill:blue} .c1 {fill:green}</style>
    <rect class='c1 c2'/>
</svg>",
0, color(0, 0, 255));

test_fill!(priority_id_1,
"<svg>
    <style>#r1 {fill:blue} rect {fill:red}</style>
    <rect id='r1'/>
</svg>",
0, color(0, 0, 255));

// a class rule overrides the id rule
test_fill!(priority_id_2,
"<svg>
    <style>#r1 {fill:blue} .c1 {fill:green}</style>
    <rect id='r1' class='c1'/>
</svg>",
0, color(0, 128, 0));

test_fill!(priority_inline_1,
"<svg>
    <style>#r1 {fill:blue}</style>
    <rect id='r1' style='fill:red'/>
</svg>",
0, color(255, 0, 0));

test_fill!(important_1,
"<svg>
    <rect style='fill:blue !important'/>
</svg>",
0, color(0, 0, 255));

// repeated selectors are merged, later declarations win
test_fill!(merge_1,
"<svg>
    <style>rect {fill:blue; stroke:red} rect {fill:green}</style>
    <rect/>
</svg>",
0, color(0, 128, 0));

test_fill!(comments_1,
"<svg>
    <style>/* rect {fill:blue} */ circle {fill:red}</style>
    <rect/>
</svg>",
0, None);

test_fill!(selector_list_1,
"<svg>
    <style>circle, rect {fill:red}</style>
    <circle/>
    <rect/>
</svg>",
1, color(255, 0, 0));

// unsupported selectors are skipped
test_fill!(unsupported_selector_1,
"<svg>
    <style>g rect {fill:red} rect:first-child {fill:green} rect {fill:blue}</style>
    <rect/>
</svg>",
0, color(0, 0, 255));

#[test]
fn unsupported_selector_error_1() {
    let opt = ParseOptions {
        skip_invalid_css: false,
        .. ParseOptions::default()
    };

    let res = SvgDocument::from_str_with_opt(
        "<svg><style>rect:first-child {fill:green}</style></svg>", &opt);

    match res {
        Err(Error::UnsupportedCss(_)) => {}
        _ => panic!("expected UnsupportedCss"),
    }
}

#[test]
fn inline_style_1() {
    let doc = SvgDocument::from_str(
        "<svg><rect style='stroke : blue ; stroke-width:3; unknown:1; opacity: 0.5'/></svg>").unwrap();
    let style = &doc.elements[0].base.style;
    assert_eq!(style.stroke, Some(Paint::Color(Color::new(0, 0, 255))));
    assert_eq!(style.stroke_width, Some(3.0));
    assert_eq!(style.opacity, Some(0.5));
}

#[test]
fn root_style_1() {
    let doc = SvgDocument::from_str(
        "<svg fill='red'><style>svg {stroke:blue}</style></svg>").unwrap();
    assert_eq!(doc.root_style.fill, Some(Paint::Color(Color::new(255, 0, 0))));
    assert_eq!(doc.root_style.stroke, Some(Paint::Color(Color::new(0, 0, 255))));
}
