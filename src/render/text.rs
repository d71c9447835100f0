// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Text layout using a built-in 5x7 bitmap font.
//!
//! Each glyph occupies 5x7 cells plus one empty column, a cell is `font-size / 7` units.
//! The baseline is at the bottom of the glyph.

use crate::dom::{
    ElementKind,
    InheritedStyle,
    TextAnchor,
    TextChild,
    TextData,
};

use super::raster::Polygon;

const GLYPH_WIDTH: usize = 5;
const GLYPH_HEIGHT: usize = 7;
// Glyph width plus spacing, in cells.
const ADVANCE: f64 = 6.0;

// Printable ASCII, from 0x20 to 0x7E.
// Each glyph is 5 columns, left to right, the lowest bit is the top row.
static FONT: [[u8; GLYPH_WIDTH]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x00, 0x00, 0x5F, 0x00, 0x00], // !
    [0x00, 0x07, 0x00, 0x07, 0x00], // "
    [0x14, 0x7F, 0x14, 0x7F, 0x14], // #
    [0x24, 0x2A, 0x7F, 0x2A, 0x12], // $
    [0x23, 0x13, 0x08, 0x64, 0x62], // %
    [0x36, 0x49, 0x55, 0x22, 0x50], // &
    [0x00, 0x05, 0x03, 0x00, 0x00], // '
    [0x00, 0x1C, 0x22, 0x41, 0x00], // (
    [0x00, 0x41, 0x22, 0x1C, 0x00], // )
    [0x14, 0x08, 0x3E, 0x08, 0x14], // *
    [0x08, 0x08, 0x3E, 0x08, 0x08], // +
    [0x00, 0x50, 0x30, 0x00, 0x00], // ,
    [0x08, 0x08, 0x08, 0x08, 0x08], // -
    [0x00, 0x60, 0x60, 0x00, 0x00], // .
    [0x20, 0x10, 0x08, 0x04, 0x02], // /
    [0x3E, 0x51, 0x49, 0x45, 0x3E], // 0
    [0x00, 0x42, 0x7F, 0x40, 0x00], // 1
    [0x42, 0x61, 0x51, 0x49, 0x46], // 2
    [0x21, 0x41, 0x45, 0x4B, 0x31], // 3
    [0x18, 0x14, 0x12, 0x7F, 0x10], // 4
    [0x27, 0x45, 0x45, 0x45, 0x39], // 5
    [0x3C, 0x4A, 0x49, 0x49, 0x30], // 6
    [0x01, 0x71, 0x09, 0x05, 0x03], // 7
    [0x36, 0x49, 0x49, 0x49, 0x36], // 8
    [0x06, 0x49, 0x49, 0x29, 0x1E], // 9
    [0x00, 0x36, 0x36, 0x00, 0x00], // :
    [0x00, 0x56, 0x36, 0x00, 0x00], // ;
    [0x08, 0x14, 0x22, 0x41, 0x00], // <
    [0x14, 0x14, 0x14, 0x14, 0x14], // =
    [0x00, 0x41, 0x22, 0x14, 0x08], // >
    [0x02, 0x01, 0x51, 0x09, 0x06], // ?
    [0x32, 0x49, 0x79, 0x41, 0x3E], // @
    [0x7E, 0x11, 0x11, 0x11, 0x7E], // A
    [0x7F, 0x49, 0x49, 0x49, 0x36], // B
    [0x3E, 0x41, 0x41, 0x41, 0x22], // C
    [0x7F, 0x41, 0x41, 0x22, 0x1C], // D
    [0x7F, 0x49, 0x49, 0x49, 0x41], // E
    [0x7F, 0x09, 0x09, 0x09, 0x01], // F
    [0x3E, 0x41, 0x49, 0x49, 0x7A], // G
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // H
    [0x00, 0x41, 0x7F, 0x41, 0x00], // I
    [0x20, 0x40, 0x41, 0x3F, 0x01], // J
    [0x7F, 0x08, 0x14, 0x22, 0x41], // K
    [0x7F, 0x40, 0x40, 0x40, 0x40], // L
    [0x7F, 0x02, 0x0C, 0x02, 0x7F], // M
    [0x7F, 0x04, 0x08, 0x10, 0x7F], // N
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // O
    [0x7F, 0x09, 0x09, 0x09, 0x06], // P
    [0x3E, 0x41, 0x51, 0x21, 0x5E], // Q
    [0x7F, 0x09, 0x19, 0x29, 0x46], // R
    [0x46, 0x49, 0x49, 0x49, 0x31], // S
    [0x01, 0x01, 0x7F, 0x01, 0x01], // T
    [0x3F, 0x40, 0x40, 0x40, 0x3F], // U
    [0x1F, 0x20, 0x40, 0x20, 0x1F], // V
    [0x3F, 0x40, 0x38, 0x40, 0x3F], // W
    [0x63, 0x14, 0x08, 0x14, 0x63], // X
    [0x07, 0x08, 0x70, 0x08, 0x07], // Y
    [0x61, 0x51, 0x49, 0x45, 0x43], // Z
    [0x00, 0x7F, 0x41, 0x41, 0x00], // [
    [0x02, 0x04, 0x08, 0x10, 0x20], // \
    [0x00, 0x41, 0x41, 0x7F, 0x00], // ]
    [0x04, 0x02, 0x01, 0x02, 0x04], // ^
    [0x40, 0x40, 0x40, 0x40, 0x40], // _
    [0x00, 0x01, 0x02, 0x04, 0x00], // `
    [0x20, 0x54, 0x54, 0x54, 0x78], // a
    [0x7F, 0x48, 0x44, 0x44, 0x38], // b
    [0x38, 0x44, 0x44, 0x44, 0x20], // c
    [0x38, 0x44, 0x44, 0x48, 0x7F], // d
    [0x38, 0x54, 0x54, 0x54, 0x18], // e
    [0x08, 0x7E, 0x09, 0x01, 0x02], // f
    [0x0C, 0x52, 0x52, 0x52, 0x3E], // g
    [0x7F, 0x08, 0x04, 0x04, 0x78], // h
    [0x00, 0x44, 0x7D, 0x40, 0x00], // i
    [0x20, 0x40, 0x44, 0x3D, 0x00], // j
    [0x7F, 0x10, 0x28, 0x44, 0x00], // k
    [0x00, 0x41, 0x7F, 0x40, 0x00], // l
    [0x7C, 0x04, 0x18, 0x04, 0x78], // m
    [0x7C, 0x08, 0x04, 0x04, 0x78], // n
    [0x38, 0x44, 0x44, 0x44, 0x38], // o
    [0x7C, 0x14, 0x14, 0x14, 0x08], // p
    [0x08, 0x14, 0x14, 0x18, 0x7C], // q
    [0x7C, 0x08, 0x04, 0x04, 0x08], // r
    [0x48, 0x54, 0x54, 0x54, 0x20], // s
    [0x04, 0x3F, 0x44, 0x40, 0x20], // t
    [0x3C, 0x40, 0x40, 0x20, 0x7C], // u
    [0x1C, 0x20, 0x40, 0x20, 0x1C], // v
    [0x3C, 0x40, 0x30, 0x40, 0x3C], // w
    [0x44, 0x28, 0x10, 0x28, 0x44], // x
    [0x0C, 0x50, 0x50, 0x50, 0x3C], // y
    [0x44, 0x64, 0x54, 0x4C, 0x44], // z
    [0x00, 0x08, 0x36, 0x41, 0x00], // {
    [0x00, 0x00, 0x7F, 0x00, 0x00], // |
    [0x00, 0x41, 0x36, 0x08, 0x00], // }
    [0x10, 0x08, 0x08, 0x10, 0x08], // ~
];

fn glyph(c: char) -> Option<&'static [u8; GLYPH_WIDTH]> {
    let code = c as u32;
    if code >= 0x20 && code <= 0x7E {
        Some(&FONT[(code - 0x20) as usize])
    } else {
        None
    }
}

/// Glyph cells of a text run, in the text element's user space.
pub struct TextRun {
    /// A style of the innermost `text` or `tspan` containing the run.
    pub style: InheritedStyle,
    pub polygons: Vec<Polygon>,
}

// A run before the anchor is applied.
struct PendingRun {
    style: InheritedStyle,
    x: f64,
    y: f64,
    text: String,
}

struct Chunk {
    anchor: TextAnchor,
    start: f64,
    end: f64,
    runs: Vec<PendingRun>,
}

struct Layout {
    x: f64,
    y: f64,
    chunks: Vec<Chunk>,
}

impl Layout {
    fn start_chunk(&mut self, x: f64, anchor: TextAnchor) {
        self.x = x;
        self.chunks.push(Chunk { anchor, start: x, end: x, runs: Vec::new() });
    }

    fn push_text(&mut self, text: &str, style: &InheritedStyle) {
        let advance = ADVANCE * style.font_size / GLYPH_HEIGHT as f64;
        let run = PendingRun {
            style: style.clone(),
            x: self.x,
            y: self.y,
            text: text.to_string(),
        };

        self.x += advance * text.chars().count() as f64;

        // the first chunk is always started
        if let Some(chunk) = self.chunks.last_mut() {
            chunk.end = self.x;
            chunk.runs.push(run);
        }
    }
}

/// Lays out a `text` element.
///
/// `style` is the text element's resolved style.
/// Each absolutely positioned `x` starts a new chunk, aligned according
/// to the `text-anchor` in effect at its start.
pub fn layout_text(data: &TextData, style: &InheritedStyle) -> Vec<TextRun> {
    let mut layout = Layout {
        x: 0.0,
        y: 0.0,
        chunks: Vec::new(),
    };

    layout.start_chunk(data.x.unwrap_or(0.0), style.text_anchor);
    walk(data, style, true, &mut layout);

    let mut runs = Vec::new();
    for chunk in layout.chunks {
        let width = chunk.end - chunk.start;
        let shift = match chunk.anchor {
            TextAnchor::Start => 0.0,
            TextAnchor::Middle => -width / 2.0,
            TextAnchor::End => -width,
        };

        for run in chunk.runs {
            let polygons = run_polygons(&run, shift);
            if !polygons.is_empty() {
                runs.push(TextRun { style: run.style, polygons });
            }
        }
    }

    runs
}

fn walk(data: &TextData, style: &InheritedStyle, is_root: bool, layout: &mut Layout) {
    if !is_root {
        if let Some(x) = data.x {
            layout.start_chunk(x, style.text_anchor);
        }
    }

    if let Some(y) = data.y {
        layout.y = y;
    }

    layout.x += data.dx.unwrap_or(0.0);
    layout.y += data.dy.unwrap_or(0.0);

    for child in &data.children {
        match *child {
            TextChild::Chars(ref text) => layout.push_text(text, style),
            TextChild::Span(ref span) => {
                if span.base.style.display == Some(false) {
                    continue;
                }

                if let ElementKind::Tspan(ref span_data) = span.kind {
                    let span_style = style.inherit(&span.base.style);
                    walk(span_data, &span_style, false, layout);
                }
            }
        }
    }
}

fn run_polygons(run: &PendingRun, shift: f64) -> Vec<Polygon> {
    let cell = run.style.font_size / GLYPH_HEIGHT as f64;
    let top = run.y - GLYPH_HEIGHT as f64 * cell;

    let mut polygons = Vec::new();
    let mut x = run.x + shift;
    for c in run.text.chars() {
        if let Some(columns) = glyph(c) {
            for (col, bits) in columns.iter().enumerate() {
                let cx = x + col as f64 * cell;
                // merge vertical runs of lit cells into a single rect
                let mut row = 0;
                while row < GLYPH_HEIGHT {
                    if bits & (1 << row) == 0 {
                        row += 1;
                        continue;
                    }

                    let start = row;
                    while row < GLYPH_HEIGHT && bits & (1 << row) != 0 {
                        row += 1;
                    }

                    let y1 = top + start as f64 * cell;
                    let y2 = top + row as f64 * cell;
                    polygons.push(vec![(cx, y1), (cx + cell, y1), (cx + cell, y2), (cx, y2)]);
                }
            }
        }

        x += ADVANCE * cell;
    }

    polygons
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::dom::{
        ElementBase,
        SvgElement,
    };

    fn text(x: Option<f64>, y: Option<f64>, children: Vec<TextChild>) -> TextData {
        TextData { x, y, dx: None, dy: None, children }
    }

    fn chars(s: &str) -> TextChild {
        TextChild::Chars(s.to_string())
    }

    fn bounds(runs: &[TextRun]) -> (f64, f64, f64, f64) {
        let mut b = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
        for run in runs {
            for poly in &run.polygons {
                for &(x, y) in poly {
                    b = (b.0.min(x), b.1.min(y), b.2.max(x), b.3.max(y));
                }
            }
        }
        b
    }

    #[test]
    fn glyph_lookup() {
        assert_eq!(glyph('A'), Some(&[0x7E, 0x11, 0x11, 0x11, 0x7E]));
        assert_eq!(glyph('~'), Some(&[0x10, 0x08, 0x08, 0x10, 0x08]));
        assert_eq!(glyph('\u{e9}'), None);
    }

    #[test]
    fn single_glyph() {
        let style = InheritedStyle::new(7.0);
        let runs = layout_text(&text(Some(10.0), Some(20.0), vec![chars("I")]), &style);
        assert_eq!(runs.len(), 1);
        // 'I' is three columns, the middle one is a full bar
        assert_eq!(bounds(&runs), (11.0, 13.0, 14.0, 20.0));
    }

    #[test]
    fn anchor_end() {
        let mut style = InheritedStyle::new(7.0);
        style.text_anchor = TextAnchor::End;
        let runs = layout_text(&text(Some(12.0), Some(7.0), vec![chars("II")]), &style);
        // two glyphs are 12 units wide
        let b = bounds(&runs);
        assert_eq!(b.0, 1.0);
        assert_eq!(b.2, 10.0);
    }

    #[test]
    fn unknown_char_advances() {
        let style = InheritedStyle::new(7.0);
        let runs = layout_text(&text(None, Some(7.0), vec![chars("\u{e9}I")]), &style);
        assert_eq!(bounds(&runs).0, 7.0);
    }

    #[test]
    fn tspan_offsets() {
        let style = InheritedStyle::new(7.0);
        let span = SvgElement::new(ElementBase::default(), ElementKind::Tspan(TextData {
            x: None,
            y: None,
            dx: Some(4.0),
            dy: Some(-1.0),
            children: vec![chars("I")],
        }));

        let runs = layout_text(&text(Some(0.0), Some(7.0), vec![chars("I"), TextChild::Span(Rc::new(span))]), &style);
        assert_eq!(runs.len(), 2);
        // the second glyph starts at 6 + 4 and is one unit higher
        assert_eq!(bounds(&runs[1..]), (11.0, -1.0, 14.0, 6.0));
    }

    #[test]
    fn spaces_only() {
        let style = InheritedStyle::new(7.0);
        assert!(layout_text(&text(None, None, vec![chars("   ")]), &style).is_empty());
    }
}
