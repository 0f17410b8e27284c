//! Static HTML serialization of a render tree.

use crate::walker::RenderTree;
use folio_model::VNode;
use std::collections::BTreeMap;

/// Options for HTML output
#[derive(Debug, Clone)]
pub struct HtmlOptions {
    /// Pretty print HTML
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: "  ".to_string(),
        }
    }
}

impl HtmlOptions {
    pub fn compact() -> Self {
        Self {
            pretty: false,
            ..Default::default()
        }
    }
}

struct Context<'a> {
    options: &'a HtmlOptions,
    depth: usize,
    buffer: String,
}

impl<'a> Context<'a> {
    fn new(options: &'a HtmlOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_indent(&mut self) {
        if !self.options.pretty {
            return;
        }
        for _ in 0..self.depth {
            self.buffer.push_str(&self.options.indent);
        }
    }

    fn newline(&mut self) {
        if self.options.pretty {
            self.buffer.push('\n');
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }
}

/// Serialize the rendered rows of `tree`
///
/// Keys and edit surfaces are not part of the markup.
pub fn to_html(tree: &RenderTree, options: &HtmlOptions) -> String {
    let mut ctx = Context::new(options);
    for node in &tree.nodes {
        write_node(node, &mut ctx);
    }
    ctx.buffer
}

/// Serialize a single node
pub fn node_to_html(node: &VNode, options: &HtmlOptions) -> String {
    let mut ctx = Context::new(options);
    write_node(node, &mut ctx);
    ctx.buffer
}

fn write_node(node: &VNode, ctx: &mut Context<'_>) {
    match node {
        VNode::Element {
            tag,
            attributes,
            styles,
            children,
            ..
        } => write_element(tag, attributes, styles, children, ctx),
        VNode::Text { content } => {
            ctx.add_indent();
            ctx.add(&escape_html(content));
            ctx.newline();
        }
        VNode::Fragment { children } => {
            for child in children {
                write_node(child, ctx);
            }
        }
    }
}

fn write_element(
    tag: &str,
    attributes: &BTreeMap<String, String>,
    styles: &BTreeMap<String, String>,
    children: &[VNode],
    ctx: &mut Context<'_>,
) {
    ctx.add_indent();
    ctx.add(&format!("<{}", tag));

    for (name, value) in attributes {
        if name == "style" && !styles.is_empty() {
            continue;
        }
        ctx.add(&format!(" {}=\"{}\"", name, escape_html(value)));
    }

    if !styles.is_empty() {
        let declarations: Vec<String> = styles
            .iter()
            .map(|(property, value)| format!("{}: {}", property, value))
            .collect();
        ctx.add(&format!(" style=\"{}\"", escape_html(&declarations.join("; "))));
    }

    if children.is_empty() && is_self_closing(tag) {
        ctx.add(" />");
        ctx.newline();
        return;
    }
    ctx.add(">");

    // Text-only content stays on the tag's line
    if children.iter().all(is_text) {
        for child in children {
            if let VNode::Text { content } = child {
                ctx.add(&escape_html(content));
            }
        }
    } else {
        ctx.newline();
        ctx.indent();
        for child in children {
            write_node(child, ctx);
        }
        ctx.dedent();
        ctx.add_indent();
    }

    ctx.add(&format!("</{}>", tag));
    ctx.newline();
}

fn is_text(node: &VNode) -> bool {
    matches!(node, VNode::Text { .. })
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn is_self_closing(tag: &str) -> bool {
    matches!(
        tag,
        "img" | "input" | "br" | "hr" | "meta" | "link" | "area" | "base" | "col" | "embed"
            | "source" | "track" | "wbr"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_output() {
        let node = VNode::div("folio-row")
            .with_key("r1")
            .with_child(
                VNode::div("folio-cell")
                    .with_style("pointer-events", "none")
                    .with_style("background", "red")
                    .with_child(VNode::text("a < b")),
            );

        assert_eq!(
            node_to_html(&node, &HtmlOptions::compact()),
            "<div class=\"folio-row\"><div class=\"folio-cell\" style=\"background: red; pointer-events: none\">a &lt; b</div></div>"
        );
    }

    #[test]
    fn test_pretty_output() {
        let node = VNode::div("outer").with_child(VNode::element("p").with_child(VNode::text("hi")));

        assert_eq!(
            node_to_html(&node, &HtmlOptions::default()),
            "<div class=\"outer\">\n  <p>hi</p>\n</div>\n"
        );
    }

    #[test]
    fn test_attributes_are_escaped_and_void_tags_close() {
        let node = VNode::element("img").with_attr("alt", "\"quoted\" & 'single'");

        assert_eq!(
            node_to_html(&node, &HtmlOptions::compact()),
            "<img alt=\"&quot;quoted&quot; &amp; &#39;single&#39;\" />"
        );
    }

    #[test]
    fn test_fragments_flatten() {
        let node = VNode::div("x").with_child(VNode::fragment(vec![
            VNode::element("b").with_child(VNode::text("1")),
            VNode::element("i").with_child(VNode::text("2")),
        ]));

        assert_eq!(
            node_to_html(&node, &HtmlOptions::compact()),
            "<div class=\"x\"><b>1</b><i>2</i></div>"
        );
    }
}
