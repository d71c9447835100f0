// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! This module contains submodules which represent SVG value types.

pub use self::color::Color;
pub use self::length::{
    dimension_value,
    fraction_value,
    length_value,
    parse_length,
    parse_length_list,
};
pub use self::number::{
    clamp_unit,
    finite_or_zero,
    parse_number,
    parse_number_list,
};
pub use self::paint::{
    parse_href,
    parse_url_ref,
    Paint,
};
pub use self::path::{
    parse_path_data,
    PathCommand,
};
pub use self::transform::{
    compose_transform,
    parse_transform_list,
    Transform,
    TransformOp,
};
pub use self::view_box::{
    view_box_to_viewport,
    AspectRatio,
    ViewBox,
};

pub use svgtypes::{
    Align,
    LengthUnit,
};

mod color;
mod length;
mod number;
mod paint;
mod path;
mod transform;
mod view_box;
