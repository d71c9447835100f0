// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::rc::Rc;

use svgtypes::PointsParser;

use crate::dom::{
    Defs,
    ElementBase,
    ElementKind,
    NodeType,
    SvgElement,
    TextChild,
    TextData,
    TreeNode,
    Units,
};
use crate::types::{
    dimension_value,
    fraction_value,
    length_value,
    parse_href,
    parse_length_list,
    parse_path_data,
    parse_transform_list,
    AspectRatio,
    TransformOp,
    ViewBox,
};

use super::css::{
    apply_css_styles,
    StyleSheet,
};
use super::defs;

/// Converts a markup node into a typed element.
///
/// Elements with an `id` are registered in `defs`, so they can be referenced by `<use>`.
/// The returned element and the registered one are the same shared element.
/// `<defs>` children are registered and never returned.
///
/// Returns `None` for unknown and non-renderable elements.
pub fn parse_element(node: &TreeNode, sheet: &StyleSheet, defs: &mut Defs) -> Option<Rc<SvgElement>> {
    if !node.is_element() {
        return None;
    }

    let kind = match node.tag_name.as_str() {
        "rect" => parse_rect(node),
        "circle" => ElementKind::Circle {
            cx: attr_length(node, "cx"),
            cy: attr_length(node, "cy"),
            r: attr_length(node, "r"),
        },
        "ellipse" => ElementKind::Ellipse {
            cx: attr_length(node, "cx"),
            cy: attr_length(node, "cy"),
            rx: attr_length(node, "rx"),
            ry: attr_length(node, "ry"),
        },
        "line" => ElementKind::Line {
            x1: attr_length(node, "x1"),
            y1: attr_length(node, "y1"),
            x2: attr_length(node, "x2"),
            y2: attr_length(node, "y2"),
        },
        "polyline" => ElementKind::Polyline { points: parse_points(node) },
        "polygon" => ElementKind::Polygon { points: parse_points(node) },
        "path" => {
            let data = node.attribute("d").unwrap_or("").to_string();
            let commands = parse_path_data(&data);
            ElementKind::Path { data, commands }
        }
        "text" => ElementKind::Text(parse_text_data(node, sheet, defs)),
        "tspan" => ElementKind::Tspan(parse_text_data(node, sheet, defs)),
        "g" | "a" | "switch" => ElementKind::Group { children: parse_children(node, sheet, defs) },
        "svg" => return parse_nested_svg(node, sheet, defs),
        "image" => ElementKind::Image {
            x: attr_length(node, "x"),
            y: attr_length(node, "y"),
            width: attr_length(node, "width"),
            height: attr_length(node, "height"),
            href: node.attribute("href").map(|s| s.to_string()),
        },
        "use" => ElementKind::Use {
            href: node.attribute("href").and_then(parse_href),
            x: attr_length(node, "x"),
            y: attr_length(node, "y"),
            width: node.attribute("width").and_then(dimension_value),
            height: node.attribute("height").and_then(dimension_value),
        },
        "symbol" => ElementKind::Symbol {
            view_box: node.attribute("viewBox").and_then(ViewBox::from_str_opt),
            aspect: AspectRatio::from_str_or_default(node.attribute("preserveAspectRatio").unwrap_or("")),
            children: parse_children(node, sheet, defs),
        },
        "clipPath" => ElementKind::ClipPath {
            units: parse_units(node.attribute("clipPathUnits"), Units::UserSpaceOnUse),
            children: parse_children(node, sheet, defs),
        },
        "mask" => parse_mask(node, sheet, defs),
        "defs" => {
            parse_defs(node, sheet, defs);
            return None;
        }
        "pattern" => {
            defs::parse_pattern(node, sheet, defs);
            return None;
        }
        "filter" => {
            defs::parse_filter(node, defs);
            return None;
        }
        // Gradients are collected before the elements.
        "linearGradient" | "radialGradient" | "stop" => return None,
        "style" | "title" | "desc" | "metadata" => return None,
        name => {
            debug!("Unknown element '{}' is skipped.", name);
            return None;
        }
    };

    let el = Rc::new(SvgElement::new(parse_base(node, sheet), kind));
    register(&el, defs);
    Some(el)
}

fn parse_base(node: &TreeNode, sheet: &StyleSheet) -> ElementBase {
    ElementBase {
        id: node.id().map(|s| s.to_string()),
        style: apply_css_styles(node, sheet),
        transform: node.attribute("transform").map(parse_transform_list).unwrap_or_default(),
    }
}

fn register(el: &Rc<SvgElement>, defs: &mut Defs) {
    let id = match el.id() {
        Some(id) => id.to_string(),
        None => return,
    };

    let map = match el.kind {
        ElementKind::Symbol { .. } => &mut defs.symbols,
        ElementKind::ClipPath { .. } => &mut defs.clip_paths,
        ElementKind::Mask { .. } => &mut defs.masks,
        _ => &mut defs.elements,
    };

    // the first element with a given id wins
    map.entry(id).or_insert_with(|| Rc::clone(el));
}

fn parse_children(node: &TreeNode, sheet: &StyleSheet, defs: &mut Defs) -> Vec<Rc<SvgElement>> {
    node.elements().filter_map(|child| parse_element(child, sheet, defs)).collect()
}

fn parse_defs(node: &TreeNode, sheet: &StyleSheet, defs: &mut Defs) {
    for child in node.elements() {
        // all the elements are registered by `parse_element` itself
        parse_element(child, sheet, defs);
    }
}

fn parse_rect(node: &TreeNode) -> ElementKind {
    let width = attr_length(node, "width");
    let height = attr_length(node, "height");

    let rx = node.attribute("rx").map(length_value).filter(|v| *v > 0.0);
    let ry = node.attribute("ry").map(length_value).filter(|v| *v > 0.0);

    // a missing radius is equal to the other one
    let (rx, ry) = match (rx, ry) {
        (None, None) => (0.0, 0.0),
        (Some(rx), None) => (rx, rx),
        (None, Some(ry)) => (ry, ry),
        (Some(rx), Some(ry)) => (rx, ry),
    };

    ElementKind::Rect {
        x: attr_length(node, "x"),
        y: attr_length(node, "y"),
        width,
        height,
        rx: rx.min(width / 2.0).max(0.0),
        ry: ry.min(height / 2.0).max(0.0),
    }
}

fn parse_points(node: &TreeNode) -> Vec<(f64, f64)> {
    match node.attribute("points") {
        Some(text) => PointsParser::from(text).collect(),
        None => Vec::new(),
    }
}

fn parse_text_data(node: &TreeNode, sheet: &StyleSheet, defs: &mut Defs) -> TextData {
    let first = |name: &str| -> Option<f64> {
        node.attribute(name).and_then(|v| parse_length_list(v).first().cloned())
    };

    let mut children = Vec::new();
    for child in &node.children {
        match child.node_type {
            NodeType::Text => {
                if !child.text.is_empty() {
                    children.push(TextChild::Chars(child.text.clone()));
                }
            }
            NodeType::Element => {
                if child.tag_name == "tspan" {
                    if let Some(span) = parse_element(child, sheet, defs) {
                        children.push(TextChild::Span(span));
                    }
                } else {
                    // text content of unsupported text children, like `textPath`, is kept
                    let text = child.text_content();
                    if !text.is_empty() {
                        children.push(TextChild::Chars(text));
                    }
                }
            }
        }
    }

    TextData {
        x: first("x"),
        y: first("y"),
        dx: first("dx"),
        dy: first("dy"),
        children,
    }
}

fn parse_mask(node: &TreeNode, sheet: &StyleSheet, defs: &mut Defs) -> ElementKind {
    let units = parse_units(node.attribute("maskUnits"), Units::ObjectBoundingBox);
    let content_units = parse_units(node.attribute("maskContentUnits"), Units::UserSpaceOnUse);

    let coord = |name: &str, def: f64| -> f64 {
        match node.attribute(name) {
            Some(v) if units == Units::ObjectBoundingBox => fraction_value(v),
            Some(v) => length_value(v),
            None => def,
        }
    };

    // the default region is -10%,-10%,120%,120% of the bounding box
    // or an unbounded one in user space
    let (dx, dy, dw, dh) = match units {
        Units::ObjectBoundingBox => (-0.1, -0.1, 1.2, 1.2),
        Units::UserSpaceOnUse => (-1e9, -1e9, 2e9, 2e9),
    };

    ElementKind::Mask {
        units,
        content_units,
        x: coord("x", dx),
        y: coord("y", dy),
        width: coord("width", dw),
        height: coord("height", dh),
        children: parse_children(node, sheet, defs),
    }
}

// A nested `svg` is treated as a group positioned at `x`/`y`
// with its `viewBox` fitted into `width`/`height`.
fn parse_nested_svg(node: &TreeNode, sheet: &StyleSheet, defs: &mut Defs) -> Option<Rc<SvgElement>> {
    let mut base = parse_base(node, sheet);

    let x = attr_length(node, "x");
    let y = attr_length(node, "y");
    if x != 0.0 || y != 0.0 {
        base.transform.push(TransformOp::Translate { tx: x, ty: y });
    }

    let view_box = node.attribute("viewBox").and_then(ViewBox::from_str_opt);
    let width = node.attribute("width").and_then(dimension_value);
    let height = node.attribute("height").and_then(dimension_value);
    if let (Some(vb), Some(w), Some(h)) = (view_box, width, height) {
        let aspect = AspectRatio::from_str_or_default(node.attribute("preserveAspectRatio").unwrap_or(""));
        let ts = crate::types::view_box_to_viewport(&vb, aspect, w, h);
        base.transform.push(TransformOp::Matrix(ts));
    }

    let children = parse_children(node, sheet, defs);
    let el = Rc::new(SvgElement::new(base, ElementKind::Group { children }));
    register(&el, defs);
    Some(el)
}

pub(crate) fn parse_units(text: Option<&str>, def: Units) -> Units {
    match text {
        Some("userSpaceOnUse") => Units::UserSpaceOnUse,
        Some("objectBoundingBox") => Units::ObjectBoundingBox,
        _ => def,
    }
}

fn attr_length(node: &TreeNode, name: &str) -> f64 {
    node.attribute(name).map(length_value).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_markup;
    use crate::types::{Color, Paint, PathCommand};

    fn parse_first(text: &str) -> (Option<Rc<SvgElement>>, Defs) {
        let root = parse_markup(text).unwrap();
        let mut defs = Defs::default();
        let node = root.elements().next().unwrap();
        let el = parse_element(node, &StyleSheet::new(), &mut defs);
        (el, defs)
    }

    #[test]
    fn rect_radius_1() {
        let (el, _) = parse_first("<svg><rect width='10' height='20' rx='8'/></svg>");
        match el.unwrap().kind {
            ElementKind::Rect { rx, ry, .. } => {
                assert_eq!(rx, 5.0);
                assert_eq!(ry, 8.0);
            }
            _ => panic!("not a rect"),
        }
    }

    #[test]
    fn unknown_element() {
        let (el, _) = parse_first("<svg><qwe/></svg>");
        assert!(el.is_none());
    }

    #[test]
    fn path_1() {
        let (el, _) = parse_first("<svg><path d='M 10 20 L 30 40'/></svg>");
        match el.unwrap().kind {
            ElementKind::Path { ref data, ref commands } => {
                assert_eq!(data, "M 10 20 L 30 40");
                assert_eq!(commands[1], PathCommand::LineTo { abs: true, x: 30.0, y: 40.0 });
            }
            _ => panic!("not a path"),
        }
    }

    #[test]
    fn polygon_1() {
        let (el, _) = parse_first("<svg><polygon points='0,0 10,0 10 10 5'/></svg>");
        match el.unwrap().kind {
            ElementKind::Polygon { ref points } => {
                assert_eq!(*points, vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
            }
            _ => panic!("not a polygon"),
        }
    }

    #[test]
    fn group_style_1() {
        let (el, _) = parse_first("<svg><g fill='red' style='stroke:blue'><rect/></g></svg>");
        let el = el.unwrap();
        assert_eq!(el.base.style.fill, Some(Paint::Color(Color::new(255, 0, 0))));
        assert_eq!(el.base.style.stroke, Some(Paint::Color(Color::new(0, 0, 255))));
        assert_eq!(el.children().len(), 1);
        // not inherited yet
        assert_eq!(el.children()[0].base.style.fill, None);
    }

    #[test]
    fn defs_routing_1() {
        let (el, defs) = parse_first(
            "<svg><defs><rect id='r'/><clipPath id='c'/><symbol id='s'/></defs></svg>");
        assert!(el.is_none());
        assert!(defs.elements.contains_key("r"));
        assert!(defs.clip_paths.contains_key("c"));
        assert!(defs.symbols.contains_key("s"));
    }

    #[test]
    fn text_children_1() {
        let (el, _) = parse_first("<svg><text x='1 2' y='3'>a<tspan dx='4'>b</tspan>c</text></svg>");
        match el.unwrap().kind {
            ElementKind::Text(ref data) => {
                assert_eq!(data.x, Some(1.0));
                assert_eq!(data.y, Some(3.0));
                assert_eq!(data.children.len(), 3);
                assert_eq!(data.children[0], TextChild::Chars("a".to_string()));
            }
            _ => panic!("not a text"),
        }
    }

    #[test]
    fn defs_shares_elements() {
        let (el, defs) = parse_first("<svg><g id='g1'><g id='g2'><rect id='r1'/></g></g></svg>");
        let g1 = el.unwrap();
        let g2 = &g1.children()[0];
        let r1 = &g2.children()[0];
        assert!(Rc::ptr_eq(&g1, &defs.elements["g1"]));
        assert!(Rc::ptr_eq(g2, &defs.elements["g2"]));
        assert!(Rc::ptr_eq(r1, &defs.elements["r1"]));
        // owned once by the tree and once by the table
        assert_eq!(Rc::strong_count(r1), 2);
    }
}
