// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The typed document model.

pub use self::defs::*;
pub use self::document::SvgDocument;
pub use self::element::*;
pub use self::style::*;
pub use self::tree::{
    Descendants,
    NodeType,
    TreeNode,
};

mod defs;
mod document;
mod element;
mod style;
mod tree;
