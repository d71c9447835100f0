// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::borrow::Cow;

use crate::dom::TreeNode;
use crate::error::{
    Error,
    Result,
};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

const PREDEFINED_ENTITIES: &[&str] = &["lt", "gt", "amp", "apos", "quot"];

/// Parses a markup text into a tree.
///
/// Declarations, processing instructions, comments and DTD are skipped,
/// entities are decoded and CDATA becomes text.
/// References to undeclared entities are kept as text, and missing
/// SVG and `xlink` namespace declarations are assumed.
///
/// Elements from foreign namespaces are dropped, together with their children.
///
/// # Errors
///
/// - `ParsingFailed` for malformed markup;
/// - `NoSvgElement` when the root element is not `svg`.
pub fn parse_markup(text: &str) -> Result<TreeNode> {
    let mut opt = roxmltree::ParsingOptions::default();
    opt.allow_dtd = true;

    let text = prepare_markup(text);
    let doc = roxmltree::Document::parse_with_options(&text, opt)?;
    let root = doc.root_element();
    if !is_svg_element(&root) || root.tag_name().name() != "svg" {
        return Err(Error::NoSvgElement);
    }

    Ok(convert_element(root))
}

/// Turns a hand-written SVG into a well-formed XML.
///
/// Declares the SVG and `xlink` namespaces on the root `svg` element
/// when they are missing and escapes `&` that doesn't start
/// a known entity or character reference.
///
/// Comments, CDATA, processing instructions and DOCTYPE are copied as is.
/// Malformed markup is left to the XML parser to report.
fn prepare_markup(text: &str) -> Cow<str> {
    let mut out = String::new();
    let mut entities: Vec<&str> = Vec::new();
    let mut root_seen = false;
    // `text[last..]` is not copied to `out` yet
    let mut last = 0;
    let mut pos = 0;

    while let Some(idx) = text[pos..].find(|c: char| c == '<' || c == '&') {
        let start = pos + idx;
        let rest = &text[start..];

        if rest.starts_with('&') {
            if !is_known_reference(rest, &entities) {
                let name = rest[1..].split(|c: char| c == ';' || c.is_whitespace()).next().unwrap_or("");
                if !name.is_empty() {
                    warn!("Could not resolve entity '{}'. It is kept as text.", name);
                }

                out.push_str(&text[last..start]);
                out.push_str("&amp;");
                last = start + 1;
            }
            pos = start + 1;
        } else if rest.starts_with("<!--") {
            pos = skip_past(text, start + 4, "-->");
        } else if rest.starts_with("<![CDATA[") {
            pos = skip_past(text, start + 9, "]]>");
        } else if rest.starts_with("<?") {
            pos = skip_past(text, start + 2, "?>");
        } else if rest.starts_with("<!") {
            pos = declaration_end(text, start);
            collect_entities(&text[start..pos], &mut entities);
        } else if rest.starts_with("</") {
            pos = start + 2;
        } else {
            if !root_seen {
                root_seen = true;

                let tag = &text[start..tag_end(text, start)];
                let name_len = tag[1..]
                    .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
                    .unwrap_or(tag.len() - 1);

                if &tag[1..1 + name_len] == "svg" {
                    let decls = missing_namespaces(tag, text);
                    if !decls.is_empty() {
                        let at = start + 1 + name_len;
                        out.push_str(&text[last..at]);
                        out.push_str(&decls);
                        last = at;
                    }
                }
            }

            pos = start + 1;
        }
    }

    if last == 0 {
        return Cow::Borrowed(text);
    }

    out.push_str(&text[last..]);
    Cow::Owned(out)
}

fn skip_past(text: &str, from: usize, end: &str) -> usize {
    match text[from..].find(end) {
        Some(idx) => from + idx + end.len(),
        None => text.len(),
    }
}

// The end of a `<!DOCTYPE ...>` with an optional internal subset.
fn declaration_end(text: &str, start: usize) -> usize {
    let mut quote = None;
    let mut depth = 0;
    for (idx, c) in text[start..].char_indices() {
        match quote {
            Some(q) => if c == q { quote = None },
            None => match c {
                '\'' | '"' => quote = Some(c),
                '[' => depth += 1,
                ']' => depth -= 1,
                '>' if depth <= 0 => return start + idx + 1,
                _ => {}
            }
        }
    }

    text.len()
}

fn tag_end(text: &str, start: usize) -> usize {
    let mut quote = None;
    for (idx, c) in text[start..].char_indices() {
        match quote {
            Some(q) => if c == q { quote = None },
            None => match c {
                '\'' | '"' => quote = Some(c),
                '>' => return start + idx + 1,
                _ => {}
            }
        }
    }

    text.len()
}

// Parameter entities are skipped, since they cannot appear in the content.
fn collect_entities<'a>(decl: &'a str, entities: &mut Vec<&'a str>) {
    for (idx, _) in decl.match_indices("<!ENTITY") {
        let rest = decl[idx + 8..].trim_start();
        if rest.starts_with('%') {
            continue;
        }

        let len = rest.find(char::is_whitespace).unwrap_or(rest.len());
        if len != 0 {
            entities.push(&rest[..len]);
        }
    }
}

// `text` starts with `&`.
fn is_known_reference(text: &str, entities: &[&str]) -> bool {
    let end = match text.find(';') {
        Some(end) => end,
        None => return false,
    };

    let name = &text[1..end];
    if name.starts_with("#x") {
        return name.len() > 2 && name[2..].chars().all(|c| c.is_ascii_hexdigit());
    }

    if name.starts_with('#') {
        return name.len() > 1 && name[1..].chars().all(|c| c.is_ascii_digit());
    }

    PREDEFINED_ENTITIES.contains(&name) || entities.contains(&name)
}

fn missing_namespaces(tag: &str, text: &str) -> String {
    let mut decls = String::new();
    if !has_attribute(tag, "xmlns") {
        decls.push_str(&format!(" xmlns=\"{}\"", SVG_NS));
    }

    if text.contains("xlink:") && !has_attribute(tag, "xmlns:xlink") {
        decls.push_str(&format!(" xmlns:xlink=\"{}\"", XLINK_NS));
    }

    decls
}

fn has_attribute(tag: &str, name: &str) -> bool {
    tag.match_indices(name).any(|(idx, _)| {
        let after_space = tag[..idx].ends_with(char::is_whitespace);
        after_space && tag[idx + name.len()..].trim_start().starts_with('=')
    })
}

fn is_svg_element(node: &roxmltree::Node) -> bool {
    match node.tag_name().namespace() {
        None => true,
        Some(ns) => ns == SVG_NS,
    }
}

fn convert_element(node: roxmltree::Node) -> TreeNode {
    let mut tree_node = TreeNode::new_element(node.tag_name().name());

    for attr in node.attributes() {
        let name = match attr.namespace() {
            Some(XML_NS) => format!("xml:{}", attr.name()),
            _ => attr.name().to_string(),
        };

        tree_node.attributes.insert(name, attr.value().to_string());
    }

    for child in node.children() {
        if child.is_element() {
            if is_svg_element(&child) {
                tree_node.children.push(convert_element(child));
            }
        } else if child.is_text() {
            if let Some(text) = child.text() {
                tree_node.children.push(TreeNode::new_text(text));
            }
        }
    }

    tree_node
}
