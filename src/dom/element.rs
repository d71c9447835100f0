// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::rc::Rc;

use crate::types::{
    compose_transform,
    AspectRatio,
    PathCommand,
    Transform,
    TransformOp,
    ViewBox,
};

use super::StyleProps;

/// Coordinate system units of a paint server, a clip path or a mask.
#[derive(Clone, Copy, PartialEq, Debug)]
#[allow(missing_docs)]
pub enum Units {
    UserSpaceOnUse,
    ObjectBoundingBox,
}

/// Attributes shared by all elements.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct ElementBase {
    /// Element's `id`, if set.
    pub id: Option<String>,
    /// Resolved, but not yet inherited, style.
    pub style: StyleProps,
    /// Transform list in the attribute order.
    pub transform: Vec<TransformOp>,
}

impl ElementBase {
    /// Returns the transform list composed into a single matrix.
    #[inline]
    pub fn transform_matrix(&self) -> Transform {
        compose_transform(&self.transform)
    }
}

/// A child of a `text` or a `tspan` element.
#[derive(Clone, PartialEq, Debug)]
pub enum TextChild {
    /// Character data.
    Chars(String),
    /// A nested `tspan`.
    Span(Rc<SvgElement>),
}

/// Text positioning and content.
///
/// Only the first value of the `x`, `y`, `dx` and `dy` lists is used.
#[derive(Clone, PartialEq, Debug, Default)]
#[allow(missing_docs)]
pub struct TextData {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub dx: Option<f64>,
    pub dy: Option<f64>,
    pub children: Vec<TextChild>,
}

/// Element-specific data.
#[derive(Clone, PartialEq, Debug)]
#[allow(missing_docs)]
pub enum ElementKind {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        rx: f64,
        ry: f64,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
    },
    Ellipse {
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Polyline {
        points: Vec<(f64, f64)>,
    },
    Polygon {
        points: Vec<(f64, f64)>,
    },
    Path {
        /// The `d` attribute as is.
        data: String,
        commands: Vec<PathCommand>,
    },
    Text(TextData),
    Tspan(TextData),
    Group {
        children: Vec<Rc<SvgElement>>,
    },
    /// Only the geometry and the link are recorded. Image data is not decoded.
    Image {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        href: Option<String>,
    },
    Use {
        href: Option<String>,
        x: f64,
        y: f64,
        width: Option<f64>,
        height: Option<f64>,
    },
    Symbol {
        view_box: Option<ViewBox>,
        aspect: AspectRatio,
        children: Vec<Rc<SvgElement>>,
    },
    ClipPath {
        units: Units,
        children: Vec<Rc<SvgElement>>,
    },
    Mask {
        units: Units,
        content_units: Units,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        children: Vec<Rc<SvgElement>>,
    },
}

/// A typed SVG element.
///
/// Elements are reference counted, so the same element can be shared
/// between its parent and the `Defs` table.
#[derive(Clone, PartialEq, Debug)]
pub struct SvgElement {
    /// Common attributes.
    pub base: ElementBase,
    /// Element-specific data.
    pub kind: ElementKind,
}

impl SvgElement {
    /// Constructs a new element.
    #[inline]
    pub fn new(base: ElementBase, kind: ElementKind) -> SvgElement {
        SvgElement { base, kind }
    }

    /// Returns the element's tag name.
    pub fn tag_name(&self) -> &'static str {
        match self.kind {
            ElementKind::Rect { .. } => "rect",
            ElementKind::Circle { .. } => "circle",
            ElementKind::Ellipse { .. } => "ellipse",
            ElementKind::Line { .. } => "line",
            ElementKind::Polyline { .. } => "polyline",
            ElementKind::Polygon { .. } => "polygon",
            ElementKind::Path { .. } => "path",
            ElementKind::Text(_) => "text",
            ElementKind::Tspan(_) => "tspan",
            ElementKind::Group { .. } => "g",
            ElementKind::Image { .. } => "image",
            ElementKind::Use { .. } => "use",
            ElementKind::Symbol { .. } => "symbol",
            ElementKind::ClipPath { .. } => "clipPath",
            ElementKind::Mask { .. } => "mask",
        }
    }

    /// Returns the element's `id`, if set.
    #[inline]
    pub fn id(&self) -> Option<&str> {
        self.base.id.as_ref().map(|s| s.as_str())
    }

    /// Returns element children, if it is a container.
    pub fn children(&self) -> &[Rc<SvgElement>] {
        match self.kind {
              ElementKind::Group { ref children }
            | ElementKind::Symbol { ref children, .. }
            | ElementKind::ClipPath { ref children, .. }
            | ElementKind::Mask { ref children, .. } => children,
            _ => &[],
        }
    }
}
