// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::collections::HashMap;

/// List of supported markup node types.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum NodeType {
    /// Element node.
    ///
    /// Only an element can have attributes, children and a tag name.
    Element,
    /// Text node. CDATA is stored as text too.
    Text,
}

/// A generic markup node.
///
/// Attribute names are local names, except `xml:space`.
/// Both `href` and `xlink:href` are stored as `href`.
#[derive(Clone, PartialEq, Debug)]
pub struct TreeNode {
    /// Node type.
    pub node_type: NodeType,
    /// Local tag name. Empty for text nodes.
    pub tag_name: String,
    /// Element attributes.
    pub attributes: HashMap<String, String>,
    /// Child nodes in document order.
    pub children: Vec<TreeNode>,
    /// Text content of a text node.
    pub text: String,
}

impl TreeNode {
    /// Constructs a new element node.
    pub fn new_element(tag_name: &str) -> TreeNode {
        TreeNode {
            node_type: NodeType::Element,
            tag_name: tag_name.to_string(),
            attributes: HashMap::new(),
            children: Vec::new(),
            text: String::new(),
        }
    }

    /// Constructs a new text node.
    pub fn new_text(text: &str) -> TreeNode {
        TreeNode {
            node_type: NodeType::Text,
            tag_name: String::new(),
            attributes: HashMap::new(),
            children: Vec::new(),
            text: text.to_string(),
        }
    }

    /// Checks that node is an element.
    #[inline]
    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    /// Checks that node is an element with the specified tag name.
    #[inline]
    pub fn is_tag(&self, name: &str) -> bool {
        self.is_element() && self.tag_name == name
    }

    /// Returns an attribute value.
    #[inline]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    /// Returns a non-empty `id` attribute.
    pub fn id(&self) -> Option<&str> {
        match self.attribute("id") {
            Some(id) if !id.is_empty() => Some(id),
            _ => None,
        }
    }

    /// Returns an iterator over element children.
    pub fn elements(&self) -> impl Iterator<Item = &TreeNode> {
        self.children.iter().filter(|n| n.is_element())
    }

    /// Returns an iterator over the node and all its descendants, in document order.
    pub fn descendants(&self) -> Descendants {
        Descendants { stack: vec![self] }
    }

    /// Returns a concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        for node in self.descendants() {
            if node.node_type == NodeType::Text {
                text.push_str(&node.text);
            }
        }

        text
    }
}

/// An iterator over a node and its descendants.
pub struct Descendants<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
