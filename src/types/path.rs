// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use svgtypes::{
    PathParser,
    PathSegment,
};

use super::number::finite_or_zero;

/// A single path data command.
///
/// `abs` indicates an absolute (uppercase) or a relative (lowercase) form.
#[derive(Copy, Clone, Debug, PartialEq)]
#[allow(missing_docs)]
pub enum PathCommand {
    MoveTo {
        abs: bool,
        x: f64,
        y: f64,
    },
    LineTo {
        abs: bool,
        x: f64,
        y: f64,
    },
    HorizontalLineTo {
        abs: bool,
        x: f64,
    },
    VerticalLineTo {
        abs: bool,
        y: f64,
    },
    CurveTo {
        abs: bool,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x: f64,
        y: f64,
    },
    SmoothCurveTo {
        abs: bool,
        x2: f64,
        y2: f64,
        x: f64,
        y: f64,
    },
    Quadratic {
        abs: bool,
        x1: f64,
        y1: f64,
        x: f64,
        y: f64,
    },
    SmoothQuadratic {
        abs: bool,
        x: f64,
        y: f64,
    },
    EllipticalArc {
        abs: bool,
        rx: f64,
        ry: f64,
        x_axis_rotation: f64,
        large_arc: bool,
        sweep: bool,
        x: f64,
        y: f64,
    },
    ClosePath {
        abs: bool,
    },
}

impl PathCommand {
    /// Checks that command is absolute.
    #[inline]
    pub fn is_absolute(&self) -> bool {
        match *self {
              PathCommand::MoveTo { abs, .. }
            | PathCommand::LineTo { abs, .. }
            | PathCommand::HorizontalLineTo { abs, .. }
            | PathCommand::VerticalLineTo { abs, .. }
            | PathCommand::CurveTo { abs, .. }
            | PathCommand::SmoothCurveTo { abs, .. }
            | PathCommand::Quadratic { abs, .. }
            | PathCommand::SmoothQuadratic { abs, .. }
            | PathCommand::EllipticalArc { abs, .. }
            | PathCommand::ClosePath { abs } => abs,
        }
    }
}

impl From<PathSegment> for PathCommand {
    fn from(seg: PathSegment) -> Self {
        let n = finite_or_zero;
        match seg {
            PathSegment::MoveTo { abs, x, y } => {
                PathCommand::MoveTo { abs, x: n(x), y: n(y) }
            }
            PathSegment::LineTo { abs, x, y } => {
                PathCommand::LineTo { abs, x: n(x), y: n(y) }
            }
            PathSegment::HorizontalLineTo { abs, x } => {
                PathCommand::HorizontalLineTo { abs, x: n(x) }
            }
            PathSegment::VerticalLineTo { abs, y } => {
                PathCommand::VerticalLineTo { abs, y: n(y) }
            }
            PathSegment::CurveTo { abs, x1, y1, x2, y2, x, y } => {
                PathCommand::CurveTo {
                    abs, x1: n(x1), y1: n(y1), x2: n(x2), y2: n(y2), x: n(x), y: n(y)
                }
            }
            PathSegment::SmoothCurveTo { abs, x2, y2, x, y } => {
                PathCommand::SmoothCurveTo { abs, x2: n(x2), y2: n(y2), x: n(x), y: n(y) }
            }
            PathSegment::Quadratic { abs, x1, y1, x, y } => {
                PathCommand::Quadratic { abs, x1: n(x1), y1: n(y1), x: n(x), y: n(y) }
            }
            PathSegment::SmoothQuadratic { abs, x, y } => {
                PathCommand::SmoothQuadratic { abs, x: n(x), y: n(y) }
            }
            PathSegment::EllipticalArc { abs, rx, ry, x_axis_rotation, large_arc, sweep, x, y } => {
                PathCommand::EllipticalArc {
                    abs,
                    rx: n(rx),
                    ry: n(ry),
                    x_axis_rotation: n(x_axis_rotation),
                    large_arc,
                    sweep,
                    x: n(x),
                    y: n(y),
                }
            }
            PathSegment::ClosePath { abs } => PathCommand::ClosePath { abs },
        }
    }
}

/// Parses a path data string.
///
/// Implicit command repetition is resolved, so `M 10 20 30 40` yields
/// a `MoveTo` followed by a `LineTo`.
///
/// Segments before the first error are kept, as SVG requires.
/// A stream that does not start with a `MoveTo` is empty.
pub fn parse_path_data(text: &str) -> Vec<PathCommand> {
    let mut commands = Vec::new();
    for seg in PathParser::from(text) {
        match seg {
            Ok(seg) => commands.push(PathCommand::from(seg)),
            Err(e) => {
                warn!("Path data is malformed: {}. Rendered up to the error.", e);
                break;
            }
        }
    }

    match commands.first() {
        Some(PathCommand::MoveTo { .. }) | None => {}
        Some(_) => commands.clear(),
    }

    commands
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_path {
        ($name:ident, $text:expr, $( $seg:expr ),*) => (
            #[test]
            fn $name() {
                let cmds = parse_path_data($text);
                let expected: Vec<PathCommand> = vec![ $( $seg ),* ];
                assert_eq!(cmds, expected);
            }
        )
    }

    test_path!(parse_path_1, "M10 20 L 30 40",
        PathCommand::MoveTo { abs: true, x: 10.0, y: 20.0 },
        PathCommand::LineTo { abs: true, x: 30.0, y: 40.0 }
    );

    test_path!(parse_path_2, "m10 20 30 40",
        PathCommand::MoveTo { abs: false, x: 10.0, y: 20.0 },
        PathCommand::LineTo { abs: false, x: 30.0, y: 40.0 }
    );

    test_path!(parse_path_3, "M10-20L1e1.5",
        PathCommand::MoveTo { abs: true, x: 10.0, y: -20.0 },
        PathCommand::LineTo { abs: true, x: 10.0, y: 0.5 }
    );

    test_path!(parse_path_4, "M0 0 H 10 V 10 h -5 v -5 z",
        PathCommand::MoveTo { abs: true, x: 0.0, y: 0.0 },
        PathCommand::HorizontalLineTo { abs: true, x: 10.0 },
        PathCommand::VerticalLineTo { abs: true, y: 10.0 },
        PathCommand::HorizontalLineTo { abs: false, x: -5.0 },
        PathCommand::VerticalLineTo { abs: false, y: -5.0 },
        PathCommand::ClosePath { abs: false }
    );

    test_path!(parse_path_5, "M0 0 A 5 5 30 1 0 10 10",
        PathCommand::MoveTo { abs: true, x: 0.0, y: 0.0 },
        PathCommand::EllipticalArc {
            abs: true, rx: 5.0, ry: 5.0, x_axis_rotation: 30.0,
            large_arc: true, sweep: false, x: 10.0, y: 10.0
        }
    );

    // Arc flags can be written without separators.
    test_path!(parse_arc_flags_1, "M 0 0 a1 1 0 00 10 10",
        PathCommand::MoveTo { abs: true, x: 0.0, y: 0.0 },
        PathCommand::EllipticalArc {
            abs: false, rx: 1.0, ry: 1.0, x_axis_rotation: 0.0,
            large_arc: false, sweep: false, x: 10.0, y: 10.0
        }
    );

    test_path!(parse_arc_flags_2, "M 0 0 a1 1 0 1110 10",
        PathCommand::MoveTo { abs: true, x: 0.0, y: 0.0 },
        PathCommand::EllipticalArc {
            abs: false, rx: 1.0, ry: 1.0, x_axis_rotation: 0.0,
            large_arc: true, sweep: true, x: 10.0, y: 10.0
        }
    );

    test_path!(parse_path_6, "M0 0 C 1 2 3 4 5 6 S 7 8 9 10 Q 1 1 2 2 T 3 3",
        PathCommand::MoveTo { abs: true, x: 0.0, y: 0.0 },
        PathCommand::CurveTo { abs: true, x1: 1.0, y1: 2.0, x2: 3.0, y2: 4.0, x: 5.0, y: 6.0 },
        PathCommand::SmoothCurveTo { abs: true, x2: 7.0, y2: 8.0, x: 9.0, y: 10.0 },
        PathCommand::Quadratic { abs: true, x1: 1.0, y1: 1.0, x: 2.0, y: 2.0 },
        PathCommand::SmoothQuadratic { abs: true, x: 3.0, y: 3.0 }
    );

    // Keep everything before the error.
    test_path!(parse_path_7, "M10 20 L 30 40 L 50 x",
        PathCommand::MoveTo { abs: true, x: 10.0, y: 20.0 },
        PathCommand::LineTo { abs: true, x: 30.0, y: 40.0 }
    );

    test_path!(parse_path_8, "L 30 40",);
    test_path!(parse_path_9, "",);

    #[test]
    fn is_absolute_1() {
        assert!(PathCommand::ClosePath { abs: true }.is_absolute());
        assert!(!PathCommand::LineTo { abs: false, x: 0.0, y: 0.0 }.is_absolute());
    }
}
