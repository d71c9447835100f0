// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::collections::HashMap;

use crate::dom::{
    Defs,
    Filter,
    FilterPrimitive,
    Gradient,
    GradientKind,
    Pattern,
    SpreadMethod,
    Stop,
    TreeNode,
    Units,
};
use crate::types::{
    compose_transform,
    fraction_value,
    length_value,
    parse_href,
    parse_length,
    parse_transform_list,
    Color,
    LengthUnit,
    Transform,
    ViewBox,
};

use super::css::{
    apply_css_styles,
    StyleSheet,
};
use super::elements::{
    parse_element,
    parse_units,
};

// Limits `href` chains, which can be circular.
const MAX_LINK_DEPTH: usize = 16;

/// Collects all the gradients in the document, wherever they are,
/// and resolves their `href` links.
///
/// `viewport` is used to resolve percentages in the `userSpaceOnUse` units.
pub fn collect_gradients(root: &TreeNode, sheet: &StyleSheet, viewport: (f64, f64), defs: &mut Defs) {
    let mut nodes: HashMap<&str, &TreeNode> = HashMap::new();
    for node in root.descendants() {
        if node.is_tag("linearGradient") || node.is_tag("radialGradient") {
            if let Some(id) = node.id() {
                nodes.entry(id).or_insert(node);
            }
        }
    }

    for (id, node) in &nodes {
        let gradient = resolve_gradient(node, &nodes, sheet, viewport);
        defs.gradients.insert(id.to_string(), gradient);
    }
}

// Returns the node and all the gradients it links to, in order.
fn link_chain<'a>(node: &'a TreeNode, nodes: &HashMap<&str, &'a TreeNode>) -> Vec<&'a TreeNode> {
    let mut chain = vec![node];
    let mut current = node;
    while let Some(link) = current.attribute("href").and_then(parse_href) {
        match nodes.get(link.as_str()) {
            Some(&next) => {
                if chain.len() == MAX_LINK_DEPTH || chain.iter().any(|n| std::ptr::eq(*n, next)) {
                    warn!("Gradient '{}' has a circular link.", link);
                    break;
                }

                chain.push(next);
                current = next;
            }
            None => {
                warn!("Gradient link '{}' cannot be resolved.", link);
                break;
            }
        }
    }

    chain
}

// Returns the first attribute value found along the chain.
fn chain_attr<'a>(chain: &[&'a TreeNode], name: &str) -> Option<&'a str> {
    chain.iter().filter_map(|n| n.attribute(name)).next()
}

fn resolve_gradient(
    node: &TreeNode,
    nodes: &HashMap<&str, &TreeNode>,
    sheet: &StyleSheet,
    viewport: (f64, f64),
) -> Gradient {
    let chain = link_chain(node, nodes);
    let attr = |name: &str| chain_attr(&chain, name);

    let units = parse_units(attr("gradientUnits"), Units::ObjectBoundingBox);
    let transform = attr("gradientTransform")
        .map(|v| compose_transform(&parse_transform_list(v)))
        .unwrap_or_default();
    let spread = match attr("spreadMethod") {
        Some("reflect") => SpreadMethod::Reflect,
        Some("repeat") => SpreadMethod::Repeat,
        _ => SpreadMethod::Pad,
    };

    let (vw, vh) = viewport;
    let vd = ((vw * vw + vh * vh) / 2.0).sqrt();
    let coord = |name: &str, def: &str, axis: f64| -> f64 {
        gradient_coord(attr(name).unwrap_or(def), units, axis)
    };

    let kind = if node.tag_name == "linearGradient" {
        GradientKind::Linear {
            x1: coord("x1", "0%", vw),
            y1: coord("y1", "0%", vh),
            x2: coord("x2", "100%", vw),
            y2: coord("y2", "0%", vh),
        }
    } else {
        let cx = coord("cx", "50%", vw);
        let cy = coord("cy", "50%", vh);
        GradientKind::Radial {
            cx,
            cy,
            r: coord("r", "50%", vd),
            // the focal point defaults to the center
            fx: attr("fx").map(|v| gradient_coord(v, units, vw)).unwrap_or(cx),
            fy: attr("fy").map(|v| gradient_coord(v, units, vh)).unwrap_or(cy),
        }
    };

    // stops are taken from the first gradient in the chain that has them
    let stops = chain.iter()
        .map(|n| parse_stops(n, sheet))
        .find(|stops| !stops.is_empty())
        .unwrap_or_default();

    Gradient {
        kind,
        stops,
        units,
        transform,
        spread,
    }
}

fn gradient_coord(text: &str, units: Units, axis: f64) -> f64 {
    match parse_length(text) {
        Some(len) if len.unit == LengthUnit::Percent => {
            match units {
                Units::ObjectBoundingBox => len.number / 100.0,
                Units::UserSpaceOnUse => len.number / 100.0 * axis,
            }
        }
        Some(len) if len.number.is_finite() => len.number,
        _ => 0.0,
    }
}

fn parse_stops(node: &TreeNode, sheet: &StyleSheet) -> Vec<Stop> {
    let mut stops: Vec<Stop> = node.elements()
        .filter(|n| n.tag_name == "stop")
        .map(|n| {
            let style = apply_css_styles(n, sheet);
            let offset = n.attribute("offset").map(fraction_value).unwrap_or(0.0);
            let color = style.stop_color.unwrap_or_else(Color::black);
            let opacity = style.stop_opacity.unwrap_or(1.0);

            Stop {
                offset: offset.max(0.0).min(1.0),
                color: color.multiply_alpha(opacity),
            }
        })
        .collect();

    // a stable sort keeps equal offsets in the document order
    stops.sort_by(|a, b| a.offset.partial_cmp(&b.offset).unwrap_or(std::cmp::Ordering::Equal));
    stops
}

/// Parses a `pattern` element and registers it in `defs`.
pub fn parse_pattern(node: &TreeNode, sheet: &StyleSheet, defs: &mut Defs) {
    let id = match node.id() {
        Some(id) => id.to_string(),
        None => return,
    };

    let units = parse_units(node.attribute("patternUnits"), Units::ObjectBoundingBox);
    let content_units = parse_units(node.attribute("patternContentUnits"), Units::UserSpaceOnUse);
    let coord = |name: &str| -> f64 {
        match node.attribute(name) {
            Some(v) if units == Units::ObjectBoundingBox => fraction_value(v),
            Some(v) => length_value(v),
            None => 0.0,
        }
    };

    let children = node.elements().filter_map(|n| parse_element(n, sheet, defs)).collect();

    let pattern = Pattern {
        x: coord("x"),
        y: coord("y"),
        width: coord("width"),
        height: coord("height"),
        units,
        content_units,
        transform: node.attribute("patternTransform")
            .map(|v| compose_transform(&parse_transform_list(v)))
            .unwrap_or_else(Transform::default),
        view_box: node.attribute("viewBox").and_then(ViewBox::from_str_opt),
        children,
    };

    defs.patterns.entry(id).or_insert(pattern);
}

/// Parses a `filter` element and registers it in `defs`.
pub fn parse_filter(node: &TreeNode, defs: &mut Defs) {
    let id = match node.id() {
        Some(id) => id.to_string(),
        None => return,
    };

    let primitives = node.elements()
        .map(|n| FilterPrimitive {
            tag_name: n.tag_name.clone(),
            attributes: n.attributes.clone(),
        })
        .collect();

    let filter = Filter {
        units: parse_units(node.attribute("filterUnits"), Units::ObjectBoundingBox),
        primitive_units: parse_units(node.attribute("primitiveUnits"), Units::UserSpaceOnUse),
        primitives,
    };

    defs.filters.entry(id).or_insert(filter);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_markup;

    fn gradients(text: &str) -> Defs {
        let root = parse_markup(text).unwrap();
        let mut defs = Defs::default();
        collect_gradients(&root, &StyleSheet::new(), (100.0, 100.0), &mut defs);
        defs
    }

    #[test]
    fn linear_defaults() {
        let defs = gradients("<svg><linearGradient id='lg'/></svg>");
        let g = &defs.gradients["lg"];
        assert_eq!(g.kind, GradientKind::Linear { x1: 0.0, y1: 0.0, x2: 1.0, y2: 0.0 });
        assert_eq!(g.units, Units::ObjectBoundingBox);
        assert_eq!(g.spread, SpreadMethod::Pad);
        assert!(g.stops.is_empty());
    }

    #[test]
    fn stops_sorted() {
        let defs = gradients(
            "<svg><linearGradient id='lg'>\
                <stop offset='100%' stop-color='blue'/>\
                <stop offset='0.25' stop-color='red' stop-opacity='0.5'/>\
             </linearGradient></svg>");
        let g = &defs.gradients["lg"];
        assert_eq!(g.stops.len(), 2);
        assert_eq!(g.stops[0].offset, 0.25);
        assert_eq!(g.stops[0].color, Color::new_rgba(255, 0, 0, 128));
        assert_eq!(g.stops[1].offset, 1.0);
    }

    #[test]
    fn href_inheritance() {
        let defs = gradients(
            "<svg><linearGradient id='base' gradientUnits='userSpaceOnUse' x2='50'>\
                <stop offset='0' stop-color='red'/>\
             </linearGradient>\
             <radialGradient id='r' href='#base' r='10'/></svg>");
        let g = &defs.gradients["r"];
        assert_eq!(g.units, Units::UserSpaceOnUse);
        assert_eq!(g.stops.len(), 1);
        assert_eq!(g.kind, GradientKind::Radial { cx: 50.0, cy: 50.0, r: 10.0, fx: 50.0, fy: 50.0 });
    }

    #[test]
    fn circular_href() {
        let defs = gradients(
            "<svg><linearGradient id='a' href='#b'/><linearGradient id='b' href='#a'/></svg>");
        assert!(defs.gradients.contains_key("a"));
        assert!(defs.gradients.contains_key("b"));
    }

    #[test]
    fn filter_1() {
        let root = parse_markup(
            "<svg><filter id='f'><feGaussianBlur stdDeviation='2'/></filter></svg>").unwrap();
        let mut defs = Defs::default();
        parse_filter(root.elements().next().unwrap(), &mut defs);
        let f = &defs.filters["f"];
        assert_eq!(f.primitives.len(), 1);
        assert_eq!(f.primitives[0].tag_name, "feGaussianBlur");
    }
}
