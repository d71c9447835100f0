// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::error;
use std::fmt;

/// A specialized `Result` type for SVG parsing and decoding.
pub type Result<T> = ::std::result::Result<T, Error>;

/// SVG parsing and decoding errors.
///
/// Rendering itself never fails, so all the variants describe
/// either a broken input or an invalid request.
#[derive(Debug)]
pub enum Error {
    /// Parsed document must have an `svg` root element.
    NoSvgElement,

    /// Input data is not a valid UTF-8 text.
    InvalidUtf8,

    /// *svgraster* supports only simple CSS selectors.
    ///
    /// Returned only when `ParseOptions::skip_invalid_css` is disabled.
    UnsupportedCss(String),

    /// A style sheet cannot be tokenized.
    ///
    /// Returned only when `ParseOptions::skip_invalid_css` is disabled.
    InvalidCss(String),

    /// A requested canvas is empty or too large.
    InvalidSize(u32, u32),

    /// A markup error, like an unterminated tag or a malformed DOCTYPE.
    ParsingFailed(roxmltree::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::NoSvgElement => {
                write!(f, "the document does not have an SVG element")
            }
            Error::InvalidUtf8 => {
                write!(f, "the input is not a valid UTF-8 text")
            }
            Error::UnsupportedCss(ref selector) => {
                write!(f, "unsupported CSS selector: '{}'", selector)
            }
            Error::InvalidCss(ref msg) => {
                write!(f, "invalid CSS: {}", msg)
            }
            Error::InvalidSize(w, h) => {
                write!(f, "invalid canvas size: {}x{}", w, h)
            }
            Error::ParsingFailed(ref e) => {
                write!(f, "SVG data parsing failed cause {}", e)
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::ParsingFailed(ref e) => Some(e),
            _ => None,
        }
    }
}

impl From<roxmltree::Error> for Error {
    fn from(value: roxmltree::Error) -> Self {
        Error::ParsingFailed(value)
    }
}

impl From<::std::str::Utf8Error> for Error {
    fn from(_: ::std::str::Utf8Error) -> Self {
        Error::InvalidUtf8
    }
}
