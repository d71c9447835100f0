// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::dom::TreeNode;

#[derive(Clone, Copy, PartialEq, Debug)]
enum XmlSpace {
    Default,
    Preserve,
}

// Prepare text nodes according to https://www.w3.org/TR/SVG11/text.html#WhiteSpace
//
// This function handles:
// - 'xml:space' processing
// - tabs and newlines replacing
// - spaces trimming and collapsing across `tspan` boundaries
pub fn prepare_text(root: &mut TreeNode) {
    let space = get_xmlspace(root, XmlSpace::Default);
    _prepare_text(root, space);
}

fn _prepare_text(parent: &mut TreeNode, parent_xmlspace: XmlSpace) {
    for node in parent.children.iter_mut().filter(|n| n.is_element()) {
        let xmlspace = get_xmlspace(node, parent_xmlspace);

        if node.tag_name == "text" {
            prepare_text_element(node, xmlspace);
        } else {
            _prepare_text(node, xmlspace);
        }
    }
}

fn get_xmlspace(node: &TreeNode, default: XmlSpace) -> XmlSpace {
    match node.attribute("xml:space") {
        Some("preserve") => XmlSpace::Preserve,
        Some(_) => XmlSpace::Default,
        None => default,
    }
}

fn prepare_text_element(node: &mut TreeNode, xmlspace: XmlSpace) {
    let mut chunks = Vec::new();
    collect_text_nodes(node, xmlspace, &mut chunks);

    for &mut (ref mut text, xmlspace) in chunks.iter_mut() {
        let new_text = normalize(&**text, xmlspace);
        **text = new_text;
    }

    // We manage all text nodes as a single text node
    // and remove duplicated spaces across nodes.
    //
    // For example    '<text>Text <tspan> text </tspan> text</text>'
    // is the same is '<text>Text <tspan>text</tspan> text</text>'

    // 'true' to trim the leading space of the first chunk
    let mut prev_ends_with_space = true;
    for &mut (ref mut text, xmlspace) in chunks.iter_mut() {
        if text.is_empty() {
            continue;
        }

        if xmlspace == XmlSpace::Default && prev_ends_with_space && text.starts_with(' ') {
            text.remove(0);
        }

        if !text.is_empty() {
            prev_ends_with_space = text.ends_with(' ');
        }
    }

    // Remove trailing space of the last non-empty text node.
    if let Some(&mut (ref mut text, xmlspace)) = chunks.iter_mut().rev().find(|c| !c.0.is_empty()) {
        if xmlspace == XmlSpace::Default && text.ends_with(' ') {
            text.pop();
        }
    }
}

fn collect_text_nodes<'a>(
    node: &'a mut TreeNode,
    xmlspace: XmlSpace,
    chunks: &mut Vec<(&'a mut String, XmlSpace)>,
) {
    for child in node.children.iter_mut() {
        if child.is_element() {
            let child_xmlspace = get_xmlspace(child, xmlspace);
            collect_text_nodes(child, child_xmlspace, chunks);
        } else {
            chunks.push((&mut child.text, xmlspace));
        }
    }
}

fn normalize(text: &str, xmlspace: XmlSpace) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        let c = match c {
            '\n' | '\r' | '\t' => ' ',
            _ => c,
        };

        if xmlspace == XmlSpace::Default && c == ' ' && out.ends_with(' ') {
            continue;
        }

        out.push(c);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_markup;

    macro_rules! test_text {
        ($name:ident, $svg:expr, $result:expr) => (
            #[test]
            fn $name() {
                let mut root = parse_markup($svg).unwrap();
                prepare_text(&mut root);
                let text = root.elements().next().unwrap();
                assert_eq!(text.text_content(), $result);
            }
        )
    }

    test_text!(simple_1, "<svg><text>  Text  </text></svg>", "Text");
    test_text!(newlines_1, "<svg><text>\n  Some\n\ttext\n</text></svg>", "Some text");
    test_text!(tspan_1,
        "<svg><text>  Hello \n  <tspan> World </tspan>  !</text></svg>",
        "Hello World !");
    test_text!(tspan_2, "<svg><text>A<tspan> </tspan> B</text></svg>", "A B");
    test_text!(preserve_1,
        "<svg><text xml:space='preserve'>  Text\n  </text></svg>",
        "  Text   ");
    test_text!(preserve_inherited_1,
        "<svg xml:space='preserve'><text> a </text></svg>",
        " a ");
}
