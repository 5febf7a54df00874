//! Serialize render-tree snapshots to HTML markup.

use crate::{VNode, VirtualDomDocument};

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

const VOID_ELEMENTS: [&str; 6] = ["br", "hr", "img", "input", "meta", "link"];

struct Context {
    options: HtmlOptions,
    depth: usize,
    buffer: String,
}

impl Context {
    fn new(options: HtmlOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            self.add_indent();
        }
        self.add(text);
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn add_indent(&mut self) {
        for _ in 0..self.depth {
            self.buffer.push_str(&self.options.indent);
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

    fn get_output(self) -> String {
        self.buffer
    }
}

/// Render a list of root nodes
pub fn render_html(nodes: &[VNode], options: HtmlOptions) -> String {
    let mut ctx = Context::new(options);
    for node in nodes {
        render_node(node, &mut ctx);
    }
    ctx.get_output()
}

impl VirtualDomDocument {
    pub fn to_html(&self, options: HtmlOptions) -> String {
        render_html(&self.nodes, options)
    }
}

fn render_node(node: &VNode, ctx: &mut Context) {
    match node {
        VNode::Text { content } => ctx.add_line(&escape_text(content)),
        VNode::Comment { content } => {
            ctx.add_line(&format!("<!-- {} -->", content.replace("--", "- -")))
        }
        VNode::Error { message } => ctx.add_line(&format!(
            "<div class=\"block-error\" role=\"alert\">{}</div>",
            escape_text(message)
        )),
        VNode::Element {
            tag,
            attributes,
            styles,
            children,
            ..
        } => {
            let mut open = format!("<{}", tag);
            for (name, value) in attributes {
                open.push_str(&format!(" {}=\"{}\"", name, escape_attr(value)));
            }
            if !styles.is_empty() {
                let style = styles
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k, v))
                    .collect::<Vec<_>>()
                    .join("; ");
                open.push_str(&format!(" style=\"{}\"", escape_attr(&style)));
            }
            open.push('>');

            if VOID_ELEMENTS.contains(&tag.as_str()) {
                ctx.add_line(&open);
                return;
            }

            // Elements holding a single text child stay on one line
            if let [VNode::Text { content }] = children.as_slice() {
                ctx.add_line(&format!("{}{}</{}>", open, escape_text(content), tag));
                return;
            }

            ctx.add_line(&open);
            ctx.indent();
            for child in children {
                render_node(child, ctx);
            }
            ctx.dedent();
            ctx.add_line(&format!("</{}>", tag));
        }
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
