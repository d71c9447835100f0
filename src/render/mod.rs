// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A software rasterizer for `SvgDocument`.
//!
//! The document is walked recursively. Each element gets its own copy
//! of the render state, so nothing has to be restored after the children are drawn.

pub use self::canvas::PixelBuffer;
pub use self::mask::Mask;

mod canvas;
mod clip;
mod mask;
mod paint;
mod path;
mod raster;
mod stroke;
mod text;

use std::rc::Rc;

use crate::dom::{
    Defs,
    ElementKind,
    FillRule,
    InheritedStyle,
    SvgDocument,
    SvgElement,
    TextData,
    Visibility,
};
use crate::types::{
    view_box_to_viewport,
    Color,
    Transform,
};

use self::path::BBox;
use self::raster::Polygon;

// Limits nested `use` and `mask` references.
const MAX_LINK_DEPTH: usize = 16;

/// Renders a document into a new RGBA buffer.
///
/// The target size defaults to the document size, rounded.
/// The `viewBox` is stretched to the target size along each axis.
pub fn render(doc: &SvgDocument, width: Option<u32>, height: Option<u32>, background: Option<Color>)
    -> PixelBuffer
{
    let width = width.unwrap_or_else(|| round_size(doc.width));
    let height = height.unwrap_or_else(|| round_size(doc.height));

    let mut renderer = Renderer::new(&doc.defs, width, height);
    if let Some(color) = background {
        renderer.canvas.fill(color);
    }

    if doc.root_style.display == Some(false) {
        return renderer.canvas;
    }

    let vb = &doc.view_box;
    let sx = width as f64 / vb.width;
    let sy = height as f64 / vb.height;

    let state = State {
        ts: Transform::new(sx, 0.0, 0.0, sy, -vb.x * sx, -vb.y * sy),
        style: InheritedStyle::new(doc.default_font_size).inherit(&doc.root_style),
        opacity: doc.root_style.opacity.unwrap_or(1.0),
        mask: None,
    };

    for el in &doc.elements {
        renderer.render_element(el, &state);
    }

    renderer.canvas
}

fn round_size(n: f64) -> u32 {
    let n = n.round();
    if n.is_finite() && n > 0.0 {
        n.min(u32::max_value() as f64) as u32
    } else {
        0
    }
}

/// A render state of a single element.
#[derive(Clone)]
struct State {
    /// User space to device mapping.
    ts: Transform,
    style: InheritedStyle,
    /// Accumulated opacity of the element and its ancestors.
    opacity: f64,
    /// Combined clip paths and masks of the element and its ancestors.
    mask: Option<Rc<Mask>>,
}

struct Renderer<'a> {
    defs: &'a Defs,
    canvas: PixelBuffer,
    // ids of the `use` and `mask` references being rendered
    links: Vec<String>,
}

impl<'a> Renderer<'a> {
    fn new(defs: &'a Defs, width: u32, height: u32) -> Renderer<'a> {
        Renderer {
            defs,
            canvas: PixelBuffer::new(width, height),
            links: Vec::new(),
        }
    }

    fn render_element(&mut self, el: &SvgElement, parent: &State) {
        let own = &el.base.style;
        if own.display == Some(false) {
            return;
        }

        let mut state = parent.clone();
        state.style = parent.style.inherit(own);
        state.ts.append(&el.base.transform_matrix());
        state.opacity *= own.opacity.unwrap_or(1.0);

        if !(state.opacity > 0.0) {
            return;
        }

        if let Some(ref id) = own.clip_path {
            match self.defs.clip_paths.get(id) {
                Some(clip) => {
                    let mut mask = self.clip_mask(clip, el, &state);
                    if let Some(ref prev) = state.mask {
                        mask.intersect(prev);
                    }
                    state.mask = Some(Rc::new(mask));
                }
                None => warn!("Clip path '{}' cannot be resolved.", id),
            }
        }

        if let Some(ref id) = own.mask {
            match self.defs.masks.get(id) {
                Some(mask_el) => {
                    match self.luminance_mask(id, mask_el, el, &state) {
                        Some(mut mask) => {
                            if let Some(ref prev) = state.mask {
                                mask.multiply(prev);
                            }
                            state.mask = Some(Rc::new(mask));
                        }
                        None => return,
                    }
                }
                None => warn!("Mask '{}' cannot be resolved.", id),
            }
        }

        if let Some(ref id) = own.filter {
            debug!("Filter '{}' is not supported and will be ignored.", id);
        }

        match el.kind {
              ElementKind::Rect { .. }
            | ElementKind::Circle { .. }
            | ElementKind::Ellipse { .. }
            | ElementKind::Line { .. }
            | ElementKind::Polyline { .. }
            | ElementKind::Polygon { .. }
            | ElementKind::Path { .. } => self.draw_shape(&el.kind, &state),
            ElementKind::Text(ref data) => self.draw_text(data, &state),
            ElementKind::Group { ref children } => {
                for child in children {
                    self.render_element(child, &state);
                }
            }
            ElementKind::Use { .. } => self.draw_use(&el.kind, &state),
            ElementKind::Image { .. } => debug!("Images are not supported and will be skipped."),
            // a `tspan` is drawn by its `text`
            // and the rest is rendered only by reference
              ElementKind::Tspan(_)
            | ElementKind::Symbol { .. }
            | ElementKind::ClipPath { .. }
            | ElementKind::Mask { .. } => {}
        }
    }

    fn draw_shape(&mut self, kind: &ElementKind, state: &State) {
        let style = &state.style;
        if style.visibility != Visibility::Visible {
            return;
        }

        let scale = state.ts.mean_scale();
        let mut outline = match path::shape_outline(kind, scale) {
            Some(outline) => outline,
            None => return,
        };

        let bbox = BBox::from_subpaths(&outline);
        path::transform_subpaths(&mut outline, &state.ts);

        let mask = state.mask.as_ref().map(|m| &**m);

        // lines have no interior
        let has_fill = if let ElementKind::Line { .. } = *kind { false } else { true };
        if has_fill {
            let alpha = style.fill_opacity * state.opacity;
            if let Some(paint) = paint::resolve_paint(&style.fill, style.color, alpha,
                                                      self.defs, &state.ts, bbox) {
                let polygons: Vec<Polygon> = outline.iter().map(|p| p.points.clone()).collect();
                raster::fill_polygons(&mut self.canvas, mask, &polygons, style.fill_rule, &paint);
            }
        }

        let alpha = style.stroke_opacity * state.opacity;
        if let Some(paint) = paint::resolve_paint(&style.stroke, style.color, alpha,
                                                  self.defs, &state.ts, bbox) {
            let polygons = stroke::stroke_polygons(&outline, style, scale);
            raster::fill_polygons(&mut self.canvas, mask, &polygons, FillRule::NonZero, &paint);
        }
    }

    fn draw_text(&mut self, data: &TextData, state: &State) {
        let runs = text::layout_text(data, &state.style);
        let bbox = BBox::from_points(runs.iter().flat_map(|r| r.polygons.iter().flat_map(|p| p.iter())));
        let mask = state.mask.as_ref().map(|m| &**m);

        for run in &runs {
            let style = &run.style;
            if style.visibility != Visibility::Visible {
                continue;
            }

            let alpha = style.fill_opacity * state.opacity;
            if let Some(paint) = paint::resolve_paint(&style.fill, style.color, alpha,
                                                      self.defs, &state.ts, bbox) {
                let polygons: Vec<Polygon> = run.polygons.iter()
                    .map(|p| p.iter().map(|&(x, y)| state.ts.apply(x, y)).collect())
                    .collect();
                raster::fill_polygons(&mut self.canvas, mask, &polygons, FillRule::NonZero, &paint);
            }
        }
    }

    fn draw_use(&mut self, kind: &ElementKind, state: &State) {
        let (id, x, y, width, height) = match *kind {
            ElementKind::Use { href: Some(ref id), x, y, width, height } => (id, x, y, width, height),
            _ => return,
        };

        let linked = match self.defs.find_linked(id) {
            Some(el) => el,
            None => {
                warn!("Use link '{}' cannot be resolved.", id);
                return;
            }
        };

        if !self.enter_link(id) {
            return;
        }

        let mut state = state.clone();
        state.ts.append(&Transform::new_translate(x, y));

        if let ElementKind::Symbol { view_box, aspect, ref children } = linked.kind {
            if linked.base.style.display != Some(false) {
                state.style = state.style.inherit(&linked.base.style);
                state.opacity *= linked.base.style.opacity.unwrap_or(1.0);

                if let (Some(vb), Some(w), Some(h)) = (view_box, width, height) {
                    state.ts.append(&view_box_to_viewport(&vb, aspect, w, h));
                }

                for child in children {
                    self.render_element(child, &state);
                }
            }
        } else {
            self.render_element(linked, &state);
        }

        self.links.pop();
    }

    // Returns `false` for circular and too deep references.
    fn enter_link(&mut self, id: &str) -> bool {
        if self.links.iter().any(|l| l == id) {
            warn!("'{}' references itself. Skipped.", id);
            return false;
        }

        if self.links.len() >= MAX_LINK_DEPTH {
            warn!("References are nested too deep at '{}'. Skipped.", id);
            return false;
        }

        self.links.push(id.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_str(text: &str, w: u32, h: u32) -> PixelBuffer {
        let doc = SvgDocument::from_str(text).unwrap();
        render(&doc, Some(w), Some(h), None)
    }

    fn px(buf: &PixelBuffer, x: u32, y: u32) -> (u8, u8, u8, u8) {
        let c = buf.pixel(x, y).unwrap();
        (c.red, c.green, c.blue, c.alpha)
    }

    #[test]
    fn default_size() {
        let doc = SvgDocument::from_str("<svg width='3.4' height='2.6'/>").unwrap();
        let buf = render(&doc, None, None, None);
        assert_eq!((buf.width, buf.height), (3, 3));
    }

    #[test]
    fn view_box_offset() {
        let buf = render_str(
            "<svg viewBox='10 10 10 10'><rect x='10' y='10' width='5' height='5' fill='red'/></svg>",
            10, 10);
        assert_eq!(px(&buf, 0, 0), (255, 0, 0, 255));
        assert_eq!(px(&buf, 4, 4), (255, 0, 0, 255));
        assert_eq!(px(&buf, 5, 5), (0, 0, 0, 0));
    }

    #[test]
    fn hidden_elements() {
        let buf = render_str(
            "<svg width='4' height='4'>\
                <rect width='4' height='4' display='none'/>\
                <g visibility='hidden'><rect width='2' height='4'/>\
                    <rect x='2' width='2' height='4' visibility='visible'/></g>\
             </svg>", 4, 4);
        assert_eq!(px(&buf, 0, 0).3, 0);
        assert_eq!(px(&buf, 3, 0).3, 255);
    }

    #[test]
    fn use_symbol() {
        let buf = render_str(
            "<svg width='10' height='10'>\
                <symbol id='s' viewBox='0 0 1 1'><rect width='1' height='1' fill='lime'/></symbol>\
                <use href='#s' x='5' width='5' height='5'/>\
             </svg>", 10, 10);
        assert_eq!(px(&buf, 7, 2), (0, 255, 0, 255));
        assert_eq!(px(&buf, 2, 2).3, 0);
    }

    #[test]
    fn use_circular() {
        // must not hang
        let buf = render_str(
            "<svg width='4' height='4'>\
                <g id='g1'><use href='#g2'/></g>\
                <g id='g2'><use href='#g1'/><rect width='1' height='1'/></g>\
             </svg>", 4, 4);
        assert_eq!(px(&buf, 0, 0).3, 255);
    }

    #[test]
    fn stroke_rect() {
        let buf = render_str(
            "<svg width='10' height='10'>\
                <rect x='2' y='2' width='6' height='6' fill='none' stroke='blue' stroke-width='2'/>\
             </svg>", 10, 10);
        assert_eq!(px(&buf, 1, 1), (0, 0, 255, 255));
        assert_eq!(px(&buf, 5, 1), (0, 0, 255, 255));
        assert_eq!(px(&buf, 5, 5).3, 0);
    }

    #[test]
    fn clip_path_1() {
        let buf = render_str(
            "<svg width='10' height='10'>\
                <clipPath id='c'><rect width='5' height='10'/></clipPath>\
                <rect width='10' height='10' clip-path='url(#c)'/>\
             </svg>", 10, 10);
        assert_eq!(px(&buf, 2, 5).3, 255);
        assert_eq!(px(&buf, 7, 5).3, 0);
    }

    #[test]
    fn clip_path_bbox_units() {
        let buf = render_str(
            "<svg width='10' height='10'>\
                <clipPath id='c' clipPathUnits='objectBoundingBox'>\
                    <rect width='0.5' height='1'/></clipPath>\
                <rect x='4' width='6' height='10' clip-path='url(#c)'/>\
             </svg>", 10, 10);
        assert_eq!(px(&buf, 5, 5).3, 255);
        assert_eq!(px(&buf, 8, 5).3, 0);
        assert_eq!(px(&buf, 2, 5).3, 0);
    }

    #[test]
    fn mask_1() {
        let buf = render_str(
            "<svg width='10' height='10'>\
                <mask id='m' maskUnits='userSpaceOnUse'>\
                    <rect width='5' height='10' fill='white'/>\
                    <rect x='5' width='5' height='10' fill='black'/></mask>\
                <rect width='10' height='10' fill='red' mask='url(#m)'/>\
             </svg>", 10, 10);
        assert_eq!(px(&buf, 2, 5), (255, 0, 0, 255));
        assert_eq!(px(&buf, 7, 5).3, 0);
    }

    #[test]
    fn unresolved_fill() {
        let buf = render_str("<svg width='2' height='2'><rect width='2' height='2' fill='url(#qwe)'/></svg>", 2, 2);
        assert_eq!(px(&buf, 0, 0).3, 0);
    }

    #[test]
    fn text_1() {
        let buf = render_str("<svg width='20' height='10'><text x='0' y='7' font-size='7'>I</text></svg>", 20, 10);
        assert_eq!(px(&buf, 2, 3), (0, 0, 0, 255));
        assert_eq!(px(&buf, 0, 3).3, 0);
    }
}
