// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Clip paths, masks and bounding boxes.

use std::mem;
use std::rc::Rc;

use crate::dom::{
    Defs,
    ElementKind,
    FillRule,
    InheritedStyle,
    SvgElement,
    Units,
    Visibility,
};
use crate::types::{
    view_box_to_viewport,
    Transform,
};

use super::path::{self, BBox};
use super::raster::{self, Polygon};
use super::text;
use super::{
    Mask,
    PixelBuffer,
    Renderer,
    State,
    MAX_LINK_DEPTH,
};

impl<'a> Renderer<'a> {
    /// Renders a `clipPath` into a 0/255 mask.
    ///
    /// `el` is the clipped element and `state` is its own state.
    pub(super) fn clip_mask(&mut self, clip: &SvgElement, el: &SvgElement, state: &State) -> Mask {
        let (width, height) = (self.canvas.width, self.canvas.height);
        let mut mask = Mask::new(width, height, 0);

        let (units, children) = match clip.kind {
            ElementKind::ClipPath { units, ref children } => (units, children),
            _ => return mask,
        };

        let mut ts = state.ts.then(&clip.base.transform_matrix());
        if units == Units::ObjectBoundingBox {
            let bbox = element_bbox(self.defs, el, &state.style, 0);
            match bbox.and_then(|b| b.to_units_transform()) {
                Some(units_ts) => ts.append(&units_ts),
                // nothing is visible
                None => return mask,
            }
        }

        let style = InheritedStyle::new(state.style.font_size).inherit(&clip.base.style);
        for child in children {
            clip_child(self.defs, child, &ts, &style, &mut mask, 0);
        }

        mask
    }

    /// Renders a `mask` into a luminance mask.
    ///
    /// Returns `None` when the masked element should not be rendered at all.
    pub(super) fn luminance_mask(&mut self, id: &str, mask_el: &SvgElement, el: &SvgElement, state: &State)
        -> Option<Mask>
    {
        let (units, content_units, x, y, w, h, children) = match mask_el.kind {
            ElementKind::Mask { units, content_units, x, y, width, height, ref children } => {
                (units, content_units, x, y, width, height, children)
            }
            _ => return None,
        };

        let bbox = element_bbox(self.defs, el, &state.style, 0);

        let region = if units == Units::ObjectBoundingBox {
            let bbox = bbox?;
            BBox {
                x: bbox.x + x * bbox.width,
                y: bbox.y + y * bbox.height,
                width: w * bbox.width,
                height: h * bbox.height,
            }
        } else {
            BBox { x, y, width: w, height: h }
        };

        if !(region.width > 0.0 && region.height > 0.0) {
            return None;
        }

        let mut content_ts = state.ts;
        if content_units == Units::ObjectBoundingBox {
            content_ts.append(&bbox.and_then(|b| b.to_units_transform())?);
        }

        if !self.enter_link(id) {
            return None;
        }

        let (width, height) = (self.canvas.width, self.canvas.height);
        let mut sub = Renderer {
            defs: self.defs,
            canvas: PixelBuffer::new(width, height),
            links: mem::replace(&mut self.links, Vec::new()),
        };

        let sub_state = State {
            ts: content_ts,
            style: InheritedStyle::new(state.style.font_size).inherit(&mask_el.base.style),
            opacity: 1.0,
            mask: None,
        };

        for child in children {
            sub.render_element(child, &sub_state);
        }

        self.links = sub.links;
        self.links.pop();

        let mut region_mask = Mask::new(width, height, 0);
        let region_poly = rect_polygon(&region, &state.ts);
        raster::fill_mask(&mut region_mask, width, height, &[region_poly], FillRule::NonZero, 255);

        let mut mask = Mask::new(width, height, 0);
        for py in 0..height {
            for px in 0..width {
                let (x, y) = (px as i64, py as i64);
                if region_mask.get(x, y) == 0 {
                    continue;
                }

                if let Some(c) = sub.canvas.pixel(px, py) {
                    mask.set(x, y, luminance_coverage(c.red, c.green, c.blue, c.alpha));
                }
            }
        }

        Some(mask)
    }
}

fn luminance_coverage(r: u8, g: u8, b: u8, a: u8) -> u8 {
    let lum = 0.2125 * r as f64 + 0.7154 * g as f64 + 0.0721 * b as f64;
    let v = (lum * a as f64 / 255.0).round();
    v.max(0.0).min(255.0) as u8
}

fn rect_polygon(r: &BBox, ts: &Transform) -> Polygon {
    vec![
        ts.apply(r.x, r.y),
        ts.apply(r.x + r.width, r.y),
        ts.apply(r.x + r.width, r.y + r.height),
        ts.apply(r.x, r.y + r.height),
    ]
}

// Only shapes, text and `use` elements pointing to them contribute to a clip path.
fn clip_child(
    defs: &Defs,
    el: &SvgElement,
    parent_ts: &Transform,
    parent_style: &InheritedStyle,
    mask: &mut Mask,
    depth: usize,
) {
    if el.base.style.display == Some(false) {
        return;
    }

    let style = parent_style.inherit(&el.base.style);
    let ts = parent_ts.then(&el.base.transform_matrix());
    let (width, height) = (mask.width(), mask.height());

    match el.kind {
        ElementKind::Text(ref data) => {
            for run in text::layout_text(data, &style) {
                if run.style.visibility != Visibility::Visible {
                    continue;
                }

                let polygons: Vec<Polygon> = run.polygons.iter()
                    .map(|p| p.iter().map(|&(x, y)| ts.apply(x, y)).collect())
                    .collect();
                raster::fill_mask(mask, width, height, &polygons, FillRule::NonZero, 255);
            }
        }
        ElementKind::Use { href: Some(ref id), x, y, .. } => {
            if depth >= MAX_LINK_DEPTH {
                warn!("References are nested too deep at '{}'. Skipped.", id);
                return;
            }

            match defs.find_linked(id) {
                Some(linked) => {
                    let ts = ts.then(&Transform::new_translate(x, y));
                    clip_child(defs, linked, &ts, &style, mask, depth + 1);
                }
                None => warn!("Use link '{}' cannot be resolved.", id),
            }
        }
        _ => {
            if style.visibility != Visibility::Visible {
                return;
            }

            if let Some(mut outline) = path::shape_outline(&el.kind, ts.mean_scale()) {
                path::transform_subpaths(&mut outline, &ts);
                let polygons: Vec<Polygon> = outline.into_iter().map(|p| p.points).collect();
                raster::fill_mask(mask, width, height, &polygons, style.clip_rule, 255);
            }
        }
    }
}

/// Returns an element's bounding box in its own user space.
///
/// `style` is the element's inherited style. Strokes are not included.
pub fn element_bbox(defs: &Defs, el: &SvgElement, style: &InheritedStyle, depth: usize) -> Option<BBox> {
    match el.kind {
        ElementKind::Text(ref data) => {
            let runs = text::layout_text(data, style);
            BBox::from_points(runs.iter().flat_map(|r| r.polygons.iter().flat_map(|p| p.iter())))
        }
        ElementKind::Group { ref children } => children_bbox(defs, children, style, depth),
        ElementKind::Symbol { ref children, .. } => children_bbox(defs, children, style, depth),
        ElementKind::Use { href: Some(ref id), x, y, width, height } => {
            if depth >= MAX_LINK_DEPTH {
                return None;
            }

            let linked = defs.find_linked(id)?;
            if linked.base.style.display == Some(false) {
                return None;
            }

            let linked_style = style.inherit(&linked.base.style);
            let mut ts = Transform::new_translate(x, y);
            if let ElementKind::Symbol { view_box, aspect, .. } = linked.kind {
                if let (Some(vb), Some(w), Some(h)) = (view_box, width, height) {
                    ts.append(&view_box_to_viewport(&vb, aspect, w, h));
                }
            } else {
                ts.append(&linked.base.transform_matrix());
            }

            element_bbox(defs, linked, &linked_style, depth + 1)?.transform(&ts)
        }
        _ => {
            let outline = path::shape_outline(&el.kind, 1.0)?;
            BBox::from_subpaths(&outline)
        }
    }
}

fn children_bbox(defs: &Defs, children: &[Rc<SvgElement>], style: &InheritedStyle, depth: usize) -> Option<BBox> {
    let mut bbox: Option<BBox> = None;
    for child in children {
        if child.base.style.display == Some(false) {
            continue;
        }

        let child_style = style.inherit(&child.base.style);
        let child_bbox = element_bbox(defs, child, &child_style, depth)
            .and_then(|b| b.transform(&child.base.transform_matrix()));

        if let Some(b) = child_bbox {
            bbox = Some(match bbox {
                Some(prev) => prev.union(&b),
                None => b,
            });
        }
    }

    bbox
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::SvgDocument;
    use crate::render::render;

    fn first_bbox(text: &str) -> Option<BBox> {
        let doc = SvgDocument::from_str(text).unwrap();
        let el = &doc.elements[0];
        let style = InheritedStyle::new(doc.default_font_size).inherit(&el.base.style);
        element_bbox(&doc.defs, el, &style, 0)
    }

    #[test]
    fn bbox_rect() {
        assert_eq!(first_bbox("<svg><rect x='1' y='2' width='3' height='4'/></svg>"),
                   Some(BBox { x: 1.0, y: 2.0, width: 3.0, height: 4.0 }));
    }

    #[test]
    fn bbox_group() {
        let bbox = first_bbox(
            "<svg><g><rect x='1' y='2' width='3' height='4'/>\
                <rect transform='translate(10 0)' width='1' height='1'/></g></svg>");
        assert_eq!(bbox, Some(BBox { x: 1.0, y: 0.0, width: 10.0, height: 6.0 }));
    }

    #[test]
    fn bbox_use() {
        let bbox = first_bbox("<svg><use href='#r' x='5'/><rect id='r' width='2' height='2'/></svg>");
        assert_eq!(bbox, Some(BBox { x: 5.0, y: 0.0, width: 2.0, height: 2.0 }));
    }

    #[test]
    fn bbox_empty() {
        assert_eq!(first_bbox("<svg><g/></svg>"), None);
        assert_eq!(first_bbox("<svg><use href='#qwe'/></svg>"), None);
    }

    #[test]
    fn luminance_1() {
        assert_eq!(luminance_coverage(255, 255, 255, 255), 255);
        assert_eq!(luminance_coverage(0, 0, 0, 255), 0);
        assert_eq!(luminance_coverage(255, 255, 255, 0), 0);
        assert_eq!(luminance_coverage(0, 255, 0, 255), 182);
    }

    #[test]
    fn clip_rule_evenodd() {
        let doc = SvgDocument::from_str(
            "<svg width='10' height='10'>\
                <clipPath id='c'><path d='M0 0 H10 V10 H0 Z M3 3 H7 V7 H3 Z' clip-rule='evenodd'/></clipPath>\
                <rect width='10' height='10' clip-path='url(#c)'/>\
             </svg>").unwrap();
        let buf = render(&doc, None, None, None);
        assert_eq!(buf.pixel(1, 1).unwrap().alpha, 255);
        assert_eq!(buf.pixel(5, 5).unwrap().alpha, 0);
    }

    #[test]
    fn clip_empty_bbox() {
        // a horizontal line has a zero height bounding box
        let doc = SvgDocument::from_str(
            "<svg width='10' height='10'>\
                <clipPath id='c' clipPathUnits='objectBoundingBox'><rect width='1' height='1'/></clipPath>\
                <line x1='0' y1='5' x2='10' y2='5' stroke='black' stroke-width='4' clip-path='url(#c)'/>\
                <line x1='0' y1='1' x2='10' y2='1' stroke='black' stroke-width='2'/>\
             </svg>").unwrap();
        let buf = render(&doc, None, None, None);
        assert_eq!(buf.pixel(5, 5).unwrap().alpha, 0);
        assert_eq!(buf.pixel(5, 1).unwrap().alpha, 255);
    }

    #[test]
    fn mask_half() {
        let doc = SvgDocument::from_str(
            "<svg width='10' height='10'>\
                <mask id='m' maskUnits='userSpaceOnUse'>\
                    <rect width='10' height='10' fill='white' fill-opacity='0.5'/></mask>\
                <rect width='10' height='10' fill='red' mask='url(#m)'/>\
             </svg>").unwrap();
        let buf = render(&doc, None, None, None);
        let c = buf.pixel(5, 5).unwrap();
        assert_eq!((c.red, c.green, c.blue), (255, 0, 0));
        assert!(c.alpha >= 127 && c.alpha <= 129);
    }

    #[test]
    fn mask_bbox_region() {
        // the default region is -10%..110% of the bounding box
        let doc = SvgDocument::from_str(
            "<svg width='20' height='20'>\
                <mask id='m'><rect width='20' height='20' fill='white'/></mask>\
                <rect x='5' y='5' width='10' height='10' fill='none' stroke='black' stroke-width='4' mask='url(#m)'/>\
             </svg>").unwrap();
        let buf = render(&doc, None, None, None);
        assert_eq!(buf.pixel(4, 10).unwrap().alpha, 255);
        assert_eq!(buf.pixel(3, 10).unwrap().alpha, 0);
    }

    #[test]
    fn mask_self_reference() {
        let doc = SvgDocument::from_str(
            "<svg width='4' height='4'>\
                <mask id='m' maskUnits='userSpaceOnUse'>\
                    <rect width='4' height='4' fill='white' mask='url(#m)'/></mask>\
                <rect width='4' height='4' mask='url(#m)'/>\
             </svg>").unwrap();
        let buf = render(&doc, None, None, None);
        assert_eq!(buf.pixel(1, 1).unwrap().alpha, 0);
    }
}
