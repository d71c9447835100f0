// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::types::{
    clamp_unit,
    length_value,
    parse_length_list,
    parse_number,
    parse_url_ref,
    Color,
    Paint,
};

/// A fill rule.
#[derive(Clone, Copy, PartialEq, Debug)]
#[allow(missing_docs)]
pub enum FillRule {
    NonZero,
    EvenOdd,
}

/// A stroke line cap.
#[derive(Clone, Copy, PartialEq, Debug)]
#[allow(missing_docs)]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

/// A stroke line join.
#[derive(Clone, Copy, PartialEq, Debug)]
#[allow(missing_docs)]
pub enum LineJoin {
    Miter,
    Round,
    Bevel,
}

/// A text anchor.
#[derive(Clone, Copy, PartialEq, Debug)]
#[allow(missing_docs)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

/// An element visibility.
#[derive(Clone, Copy, PartialEq, Debug)]
#[allow(missing_docs)]
pub enum Visibility {
    Visible,
    Hidden,
    Collapse,
}

/// Style properties declared on a single element.
///
/// Each field is `None` when the property was not set by a presentation attribute,
/// a style sheet or an inline style. Values are not inherited yet.
#[derive(Clone, PartialEq, Debug, Default)]
#[allow(missing_docs)]
pub struct StyleProps {
    pub fill: Option<Paint>,
    pub fill_rule: Option<FillRule>,
    pub fill_opacity: Option<f64>,
    pub stroke: Option<Paint>,
    pub stroke_width: Option<f64>,
    pub stroke_linecap: Option<LineCap>,
    pub stroke_linejoin: Option<LineJoin>,
    pub stroke_miterlimit: Option<f64>,
    /// An empty list means `none`.
    pub stroke_dasharray: Option<Vec<f64>>,
    pub stroke_dashoffset: Option<f64>,
    pub stroke_opacity: Option<f64>,
    pub opacity: Option<f64>,
    /// A link to a `clipPath` element.
    pub clip_path: Option<String>,
    pub clip_rule: Option<FillRule>,
    /// A link to a `mask` element.
    pub mask: Option<String>,
    /// A link to a `filter` element.
    pub filter: Option<String>,
    /// `false` for `display="none"`.
    pub display: Option<bool>,
    pub visibility: Option<Visibility>,
    pub color: Option<Color>,
    pub font_size: Option<f64>,
    pub text_anchor: Option<TextAnchor>,
    pub stop_color: Option<Color>,
    pub stop_opacity: Option<f64>,
}

impl StyleProps {
    /// Sets a property from its CSS/attribute name and value.
    ///
    /// Returns `false` when the property name is unknown.
    /// Values that cannot be parsed leave the property unchanged,
    /// except paints, which fall back to `none`.
    pub fn set(&mut self, name: &str, value: &str) -> bool {
        let value = value.trim();

        match name {
            "fill" => self.fill = Some(Paint::from_str(value)),
            "fill-rule" => set_opt(&mut self.fill_rule, parse_fill_rule(value)),
            "fill-opacity" => self.fill_opacity = Some(parse_opacity(value)),
            "stroke" => self.stroke = Some(Paint::from_str(value)),
            "stroke-width" => self.stroke_width = Some(length_value(value).max(0.0)),
            "stroke-linecap" => {
                set_opt(&mut self.stroke_linecap, match value {
                    "butt" => Some(LineCap::Butt),
                    "round" => Some(LineCap::Round),
                    "square" => Some(LineCap::Square),
                    _ => None,
                });
            }
            "stroke-linejoin" => {
                set_opt(&mut self.stroke_linejoin, match value {
                    "miter" => Some(LineJoin::Miter),
                    "round" => Some(LineJoin::Round),
                    "bevel" => Some(LineJoin::Bevel),
                    _ => None,
                });
            }
            "stroke-miterlimit" => self.stroke_miterlimit = Some(parse_number(value).max(1.0)),
            "stroke-dasharray" => {
                if value == "none" {
                    self.stroke_dasharray = Some(Vec::new());
                } else {
                    self.stroke_dasharray = Some(parse_length_list(value));
                }
            }
            "stroke-dashoffset" => self.stroke_dashoffset = Some(length_value(value)),
            "stroke-opacity" => self.stroke_opacity = Some(parse_opacity(value)),
            "opacity" => self.opacity = Some(parse_opacity(value)),
            "clip-path" => self.clip_path = parse_url_ref(value),
            "clip-rule" => set_opt(&mut self.clip_rule, parse_fill_rule(value)),
            "mask" => self.mask = parse_url_ref(value),
            "filter" => self.filter = parse_url_ref(value),
            "display" => self.display = Some(value != "none"),
            "visibility" => {
                set_opt(&mut self.visibility, match value {
                    "visible" => Some(Visibility::Visible),
                    "hidden" => Some(Visibility::Hidden),
                    "collapse" => Some(Visibility::Collapse),
                    _ => None,
                });
            }
            "color" => set_opt(&mut self.color, Color::from_str_opt(value)),
            "font-size" => {
                let size = length_value(value);
                if size > 0.0 {
                    self.font_size = Some(size);
                }
            }
            "text-anchor" => {
                set_opt(&mut self.text_anchor, match value {
                    "start" => Some(TextAnchor::Start),
                    "middle" => Some(TextAnchor::Middle),
                    "end" => Some(TextAnchor::End),
                    _ => None,
                });
            }
            "stop-color" => {
                // `none` is a valid value and means transparent
                self.stop_color = Some(Color::from_str_opt(value).unwrap_or_else(Color::transparent));
            }
            "stop-opacity" => self.stop_opacity = Some(parse_opacity(value)),
            _ => return false,
        }

        true
    }

    /// Overrides properties with the ones set in `other`.
    pub fn merge(&mut self, other: &StyleProps) {
        merge_opt(&mut self.fill, &other.fill);
        merge_opt(&mut self.fill_rule, &other.fill_rule);
        merge_opt(&mut self.fill_opacity, &other.fill_opacity);
        merge_opt(&mut self.stroke, &other.stroke);
        merge_opt(&mut self.stroke_width, &other.stroke_width);
        merge_opt(&mut self.stroke_linecap, &other.stroke_linecap);
        merge_opt(&mut self.stroke_linejoin, &other.stroke_linejoin);
        merge_opt(&mut self.stroke_miterlimit, &other.stroke_miterlimit);
        merge_opt(&mut self.stroke_dasharray, &other.stroke_dasharray);
        merge_opt(&mut self.stroke_dashoffset, &other.stroke_dashoffset);
        merge_opt(&mut self.stroke_opacity, &other.stroke_opacity);
        merge_opt(&mut self.opacity, &other.opacity);
        merge_opt(&mut self.clip_path, &other.clip_path);
        merge_opt(&mut self.clip_rule, &other.clip_rule);
        merge_opt(&mut self.mask, &other.mask);
        merge_opt(&mut self.filter, &other.filter);
        merge_opt(&mut self.display, &other.display);
        merge_opt(&mut self.visibility, &other.visibility);
        merge_opt(&mut self.color, &other.color);
        merge_opt(&mut self.font_size, &other.font_size);
        merge_opt(&mut self.text_anchor, &other.text_anchor);
        merge_opt(&mut self.stop_color, &other.stop_color);
        merge_opt(&mut self.stop_opacity, &other.stop_opacity);
    }
}

fn set_opt<T>(field: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *field = value;
    }
}

fn merge_opt<T: Clone>(field: &mut Option<T>, other: &Option<T>) {
    if other.is_some() {
        *field = other.clone();
    }
}

fn pick<T: Clone>(own: &Option<T>, inherited: &T) -> T {
    match *own {
        Some(ref v) => v.clone(),
        None => inherited.clone(),
    }
}

fn parse_fill_rule(value: &str) -> Option<FillRule> {
    match value {
        "nonzero" => Some(FillRule::NonZero),
        "evenodd" => Some(FillRule::EvenOdd),
        _ => None,
    }
}

fn parse_opacity(value: &str) -> f64 {
    let value = value.trim();
    if value.ends_with('%') {
        clamp_unit(parse_number(&value[..value.len() - 1]) / 100.0)
    } else {
        clamp_unit(parse_number(value))
    }
}

/// An inherited style snapshot.
///
/// Each field is resolved from the element's own value,
/// then from the parent snapshot and then from the SVG default.
#[derive(Clone, PartialEq, Debug)]
#[allow(missing_docs)]
pub struct InheritedStyle {
    pub fill: Paint,
    pub fill_rule: FillRule,
    pub fill_opacity: f64,
    pub stroke: Paint,
    pub stroke_width: f64,
    pub stroke_linecap: LineCap,
    pub stroke_linejoin: LineJoin,
    pub stroke_miterlimit: f64,
    pub stroke_dasharray: Vec<f64>,
    pub stroke_dashoffset: f64,
    pub stroke_opacity: f64,
    pub clip_rule: FillRule,
    pub visibility: Visibility,
    pub color: Color,
    pub font_size: f64,
    pub text_anchor: TextAnchor,
}

impl InheritedStyle {
    /// Constructs a snapshot filled with SVG defaults.
    pub fn new(font_size: f64) -> Self {
        InheritedStyle {
            fill: Paint::Color(Color::black()),
            fill_rule: FillRule::NonZero,
            fill_opacity: 1.0,
            stroke: Paint::None,
            stroke_width: 1.0,
            stroke_linecap: LineCap::Butt,
            stroke_linejoin: LineJoin::Miter,
            stroke_miterlimit: 4.0,
            stroke_dasharray: Vec::new(),
            stroke_dashoffset: 0.0,
            stroke_opacity: 1.0,
            clip_rule: FillRule::NonZero,
            visibility: Visibility::Visible,
            color: Color::black(),
            font_size,
            text_anchor: TextAnchor::Start,
        }
    }

    /// Returns a snapshot for a child with the `own` properties.
    ///
    /// Non-inherited properties, like `opacity` or `clip-path`, are not part of the snapshot.
    pub fn inherit(&self, own: &StyleProps) -> InheritedStyle {
        InheritedStyle {
            fill: pick(&own.fill, &self.fill),
            fill_rule: pick(&own.fill_rule, &self.fill_rule),
            fill_opacity: pick(&own.fill_opacity, &self.fill_opacity),
            stroke: pick(&own.stroke, &self.stroke),
            stroke_width: pick(&own.stroke_width, &self.stroke_width),
            stroke_linecap: pick(&own.stroke_linecap, &self.stroke_linecap),
            stroke_linejoin: pick(&own.stroke_linejoin, &self.stroke_linejoin),
            stroke_miterlimit: pick(&own.stroke_miterlimit, &self.stroke_miterlimit),
            stroke_dasharray: pick(&own.stroke_dasharray, &self.stroke_dasharray),
            stroke_dashoffset: pick(&own.stroke_dashoffset, &self.stroke_dashoffset),
            stroke_opacity: pick(&own.stroke_opacity, &self.stroke_opacity),
            clip_rule: pick(&own.clip_rule, &self.clip_rule),
            visibility: pick(&own.visibility, &self.visibility),
            color: pick(&own.color, &self.color),
            font_size: pick(&own.font_size, &self.font_size),
            text_anchor: pick(&own.text_anchor, &self.text_anchor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_1() {
        let mut s = StyleProps::default();
        assert!(s.set("fill", "red"));
        assert!(s.set("stroke-width", "2px"));
        assert!(s.set("fill-opacity", "50%"));
        assert!(s.set("clip-path", "url(#clip1)"));
        assert!(!s.set("unknown-prop", "1"));

        assert_eq!(s.fill, Some(Paint::Color(Color::new(255, 0, 0))));
        assert_eq!(s.stroke_width, Some(2.0));
        assert_eq!(s.fill_opacity, Some(0.5));
        assert_eq!(s.clip_path, Some("clip1".to_string()));
    }

    #[test]
    fn set_invalid_keeps_value() {
        let mut s = StyleProps::default();
        s.set("fill-rule", "evenodd");
        s.set("fill-rule", "qwe");
        assert_eq!(s.fill_rule, Some(FillRule::EvenOdd));
    }

    #[test]
    fn merge_1() {
        let mut a = StyleProps::default();
        a.set("fill", "red");
        a.set("stroke", "blue");

        let mut b = StyleProps::default();
        b.set("fill", "green");

        a.merge(&b);
        assert_eq!(a.fill, Some(Paint::Color(Color::new(0, 128, 0))));
        assert_eq!(a.stroke, Some(Paint::Color(Color::new(0, 0, 255))));
    }

    #[test]
    fn inherit_1() {
        let root = InheritedStyle::new(16.0);
        assert_eq!(root.fill, Paint::Color(Color::black()));
        assert_eq!(root.stroke, Paint::None);

        let mut own = StyleProps::default();
        own.set("stroke", "red");
        own.set("opacity", "0.5");
        let child = root.inherit(&own);
        assert_eq!(child.stroke, Paint::Color(Color::new(255, 0, 0)));
        assert_eq!(child.fill, Paint::Color(Color::black()));
    }
}
