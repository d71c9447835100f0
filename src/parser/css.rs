// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::collections::HashMap;

use simplecss::Token as CssToken;

use crate::dom::{
    StyleProps,
    TreeNode,
};
use crate::error::{
    Error,
    Result,
};

use super::ParseOptions;

/// A map from a simple selector (`*`, `rect`, `#id` or `.class`)
/// to the declarations of all the rules with this selector.
pub type StyleSheet = HashMap<String, StyleProps>;

/// Parses a style sheet and merges its rules into `sheet`.
///
/// Only simple selectors are supported. A selector repeated across rules
/// merges its declarations, later ones win.
///
/// # Errors
///
/// Only when `ParseOptions::skip_invalid_css` is disabled:
///
/// - `UnsupportedCss` for compound, descendant, attribute and pseudo-class selectors;
/// - `InvalidCss` for a malformed style sheet.
pub fn parse_style_sheet(text: &str, sheet: &mut StyleSheet, opt: &ParseOptions) -> Result<()> {
    let text = strip_comments(text);
    if text.trim().is_empty() {
        return Ok(());
    }

    let mut tokenizer = simplecss::Tokenizer::new(&text);

    // a selector list of the current rule, `None` for unsupported selectors
    let mut selectors: Vec<Option<String>> = Vec::new();
    let mut values: Vec<(&str, &str)> = Vec::with_capacity(16);

    'root: loop {
        selectors.clear();
        values.clear();

        // get list of selectors
        let mut tokens_in_selector = 0;
        loop {
            let token = match tokenizer.parse_next() {
                Ok(t) => t,
                Err(e) => return invalid_css(format!("{:?}", e), opt),
            };

            match token {
                CssToken::EndOfStream => {
                    // parsing finished
                    break 'root;
                }
                CssToken::BlockStart => {
                    // stop selectors parsing
                    break;
                }
                CssToken::Comma => {
                    tokens_in_selector = 0;
                    continue;
                }
                _ => {}
            }

            tokens_in_selector += 1;

            // currently we support only simple selectors
            let selector = match token {
                CssToken::UniversalSelector => Some("*".to_string()),
                CssToken::TypeSelector(name) => Some(name.to_string()),
                CssToken::IdSelector(name) => Some(format!("#{}", name)),
                CssToken::ClassSelector(name) => Some(format!(".{}", name)),
                  CssToken::AttributeSelector(_)
                | CssToken::PseudoClass(_)
                | CssToken::LangPseudoClass(_)
                | CssToken::Combinator(_) => {
                    unsupported_selector(format!("{:?}", token), opt)?;
                    None
                }
                _ => return invalid_css(format!("unexpected token {:?}", token), opt),
            };

            if tokens_in_selector == 1 {
                selectors.push(selector);
            } else if let Some(last) = selectors.last_mut() {
                // a compound or a complex selector, like `rect.cls` or `g rect`
                if let Some(ref text) = *last {
                    unsupported_selector(text.clone(), opt)?;
                }
                *last = None;
            }
        }

        // get list of declarations
        loop {
            let token = match tokenizer.parse_next() {
                Ok(t) => t,
                Err(e) => return invalid_css(format!("{:?}", e), opt),
            };

            match token {
                CssToken::Declaration(name, value) => values.push((name, value)),
                CssToken::BlockEnd => break,
                CssToken::EndOfStream => break 'root,
                _ => return invalid_css(format!("unexpected token {:?}", token), opt),
            }
        }

        let mut props = StyleProps::default();
        for &(name, value) in &values {
            set_property(&mut props, name, value);
        }

        for selector in selectors.iter().filter_map(|s| s.as_ref()) {
            sheet.entry(selector.clone()).or_insert_with(StyleProps::default).merge(&props);
        }
    }

    // the last rule can be left unterminated
    if !values.is_empty() {
        let mut props = StyleProps::default();
        for &(name, value) in &values {
            set_property(&mut props, name, value);
        }

        for selector in selectors.iter().filter_map(|s| s.as_ref()) {
            sheet.entry(selector.clone()).or_insert_with(StyleProps::default).merge(&props);
        }
    }

    Ok(())
}

fn unsupported_selector(text: String, opt: &ParseOptions) -> Result<()> {
    if !opt.skip_invalid_css {
        return Err(Error::UnsupportedCss(text));
    }

    warn!("Unsupported CSS selector near '{}'. Skipped.", text);
    Ok(())
}

fn invalid_css(msg: String, opt: &ParseOptions) -> Result<()> {
    if !opt.skip_invalid_css {
        return Err(Error::InvalidCss(msg));
    }

    warn!("Invalid CSS: {}. The rest of the style sheet is skipped.", msg);
    Ok(())
}

/// Parses an inline `style` attribute.
///
/// Unknown properties are ignored.
pub fn parse_inline_style(text: &str) -> StyleProps {
    let text = strip_comments(text);

    let mut props = StyleProps::default();
    for declaration in text.split(';') {
        if let Some(idx) = declaration.find(':') {
            let (name, value) = declaration.split_at(idx);
            set_property(&mut props, name.trim(), &value[1..]);
        }
    }

    props
}

fn set_property(props: &mut StyleProps, name: &str, value: &str) {
    let value = value.trim();
    let value = match value.find("!important") {
        Some(idx) => value[..idx].trim_end(),
        None => value,
    };

    if !props.set(&name.to_ascii_lowercase(), value) {
        debug!("Unknown CSS property '{}' is ignored.", name);
    }
}

/// Resolves the style of an element.
///
/// In increasing priority: presentation attributes, the `*` rule,
/// the tag name rule, the id rule, each class rule in the `class`
/// attribute order and the inline `style` attribute.
pub fn apply_css_styles(node: &TreeNode, sheet: &StyleSheet) -> StyleProps {
    let mut style = StyleProps::default();
    for (name, value) in &node.attributes {
        if name != "style" {
            style.set(name, value);
        }
    }

    if let Some(props) = sheet.get("*") {
        style.merge(props);
    }

    if let Some(props) = sheet.get(&node.tag_name) {
        style.merge(props);
    }

    if let Some(id) = node.id() {
        if let Some(props) = sheet.get(&format!("#{}", id)) {
            style.merge(props);
        }
    }

    if let Some(class) = node.attribute("class") {
        for name in class.split_whitespace() {
            if let Some(props) = sheet.get(&format!(".{}", name)) {
                style.merge(props);
            }
        }
    }

    if let Some(text) = node.attribute("style") {
        style.merge(&parse_inline_style(text));
    }

    style
}

fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => {
                rest = "";
                break;
            }
        }
    }
    out.push_str(rest);

    out
}
