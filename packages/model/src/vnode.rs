use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Virtual render node produced by the tree walker and by plugin renderers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VNode {
    /// HTML-like element
    Element {
        tag: String,
        attributes: BTreeMap<String, String>,
        styles: BTreeMap<String, String>,
        children: Vec<VNode>,
        /// Stable identity of the row/cell this node was rendered from
        #[serde(skip_serializing_if = "Option::is_none")]
        key: Option<String>,
    },

    /// Text node
    Text { content: String },

    /// Children without a wrapping element
    Fragment { children: Vec<VNode> },
}

impl VNode {
    pub fn element(tag: impl Into<String>) -> Self {
        VNode::Element {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            styles: BTreeMap::new(),
            children: Vec::new(),
            key: None,
        }
    }

    /// Shorthand for a `div` with a class list
    pub fn div(class: impl Into<String>) -> Self {
        Self::element("div").with_attr("class", class)
    }

    pub fn text(content: impl Into<String>) -> Self {
        VNode::Text {
            content: content.into(),
        }
    }

    pub fn fragment(children: Vec<VNode>) -> Self {
        VNode::Fragment { children }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let VNode::Element {
            ref mut attributes, ..
        } = self
        {
            attributes.insert(key.into(), value.into());
        }
        self
    }

    pub fn with_style(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let VNode::Element { ref mut styles, .. } = self {
            styles.insert(key.into(), value.into());
        }
        self
    }

    pub fn with_styles(mut self, new_styles: BTreeMap<String, String>) -> Self {
        if let VNode::Element { ref mut styles, .. } = self {
            styles.extend(new_styles);
        }
        self
    }

    pub fn with_child(mut self, child: VNode) -> Self {
        match self {
            VNode::Element {
                ref mut children, ..
            }
            | VNode::Fragment {
                ref mut children, ..
            } => children.push(child),
            VNode::Text { .. } => {}
        }
        self
    }

    pub fn with_children(mut self, new_children: Vec<VNode>) -> Self {
        match self {
            VNode::Element {
                ref mut children, ..
            }
            | VNode::Fragment {
                ref mut children, ..
            } => children.extend(new_children),
            VNode::Text { .. } => {}
        }
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        if let VNode::Element {
            key: ref mut node_key,
            ..
        } = self
        {
            *node_key = Some(key.into());
        }
        self
    }

    pub fn key(&self) -> Option<&str> {
        match self {
            VNode::Element { key, .. } => key.as_deref(),
            _ => None,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        match self {
            VNode::Element { attributes, .. } => attributes.get(name).map(String::as_str),
            _ => None,
        }
    }

    pub fn style(&self, name: &str) -> Option<&str> {
        match self {
            VNode::Element { styles, .. } => styles.get(name).map(String::as_str),
            _ => None,
        }
    }

    pub fn children(&self) -> &[VNode] {
        match self {
            VNode::Element { children, .. } | VNode::Fragment { children } => children,
            VNode::Text { .. } => &[],
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|list| list.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Concatenated text content of this subtree
    pub fn text_content(&self) -> String {
        match self {
            VNode::Text { content } => content.clone(),
            _ => self.children().iter().map(VNode::text_content).collect(),
        }
    }

    /// Depth-first search for the first element carrying `key`
    pub fn find_by_key(&self, key: &str) -> Option<&VNode> {
        if self.key() == Some(key) {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find_by_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_queries() {
        let node = VNode::div("folio-row extra")
            .with_key("r1")
            .with_style("pointer-events", "none")
            .with_child(VNode::text("hello "))
            .with_child(VNode::fragment(vec![VNode::text("world")]));

        assert!(node.has_class("folio-row"));
        assert!(!node.has_class("folio"));
        assert_eq!(node.key(), Some("r1"));
        assert_eq!(node.style("pointer-events"), Some("none"));
        assert_eq!(node.text_content(), "hello world");
        assert!(node.find_by_key("r1").is_some());
    }

    #[test]
    fn test_text_ignores_children() {
        let node = VNode::text("a").with_child(VNode::text("b"));
        assert_eq!(node, VNode::text("a"));
    }
}
