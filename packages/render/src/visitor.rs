use crate::VNode;

/// Visitor pattern for traversing render snapshots immutably
///
/// Default implementations walk the entire tree. Override specific visit_*
/// methods to act on the nodes you care about.
pub trait Visitor<'a>: Sized {
    fn visit_node(&mut self, node: &'a VNode) {
        walk_node(self, node);
    }

    fn visit_element(&mut self, element: &'a VNode) {
        walk_children(self, element);
    }

    fn visit_text(&mut self, _content: &'a str) {
        // Leaf node, no children to walk
    }

    fn visit_error(&mut self, _message: &'a str) {
        // Leaf node, no children to walk
    }
}

pub fn walk_node<'a, V: Visitor<'a>>(visitor: &mut V, node: &'a VNode) {
    match node {
        VNode::Element { .. } => visitor.visit_element(node),
        VNode::Text { content } => visitor.visit_text(content),
        VNode::Error { message } => visitor.visit_error(message),
        VNode::Comment { .. } => {}
    }
}

pub fn walk_children<'a, V: Visitor<'a>>(visitor: &mut V, element: &'a VNode) {
    for child in element.children() {
        visitor.visit_node(child);
    }
}

struct ElementFinder<'a, F> {
    predicate: F,
    found: Vec<&'a VNode>,
}

impl<'a, F: Fn(&VNode) -> bool> Visitor<'a> for ElementFinder<'a, F> {
    fn visit_element(&mut self, element: &'a VNode) {
        if (self.predicate)(element) {
            self.found.push(element);
        }
        walk_children(self, element);
    }
}

fn find_elements<'a>(nodes: &'a [VNode], predicate: impl Fn(&VNode) -> bool) -> Vec<&'a VNode> {
    let mut finder = ElementFinder {
        predicate,
        found: Vec::new(),
    };
    for node in nodes {
        finder.visit_node(node);
    }
    finder.found
}

/// All elements carrying `class`, in document order
pub fn find_by_class<'a>(nodes: &'a [VNode], class: &str) -> Vec<&'a VNode> {
    find_elements(nodes, |node| node.has_class(class))
}

/// All elements with tag name `tag`, in document order
pub fn find_by_tag<'a>(nodes: &'a [VNode], tag: &str) -> Vec<&'a VNode> {
    find_elements(nodes, |node| node.tag() == Some(tag))
}

#[derive(Default)]
struct ErrorCollector<'a> {
    messages: Vec<&'a str>,
}

impl<'a> Visitor<'a> for ErrorCollector<'a> {
    fn visit_error(&mut self, message: &'a str) {
        self.messages.push(message);
    }
}

/// Messages of every error node
pub fn error_messages(nodes: &[VNode]) -> Vec<&str> {
    let mut collector = ErrorCollector::default();
    for node in nodes {
        collector.visit_node(node);
    }
    collector.messages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<VNode> {
        vec![
            VNode::element("div")
                .with_child(VNode::element("select"))
                .with_child(
                    VNode::element("div")
                        .with_class("product-card")
                        .with_child(VNode::element("h3").with_child(VNode::text("Mug"))),
                ),
            VNode::error("Unknown block type: poll"),
            VNode::element("div").with_child(VNode::element("select")),
        ]
    }

    #[test]
    fn test_find_by_class_and_tag() {
        let nodes = sample();
        let cards = find_by_class(&nodes, "product-card");
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].text_content(), "Mug");
        assert_eq!(find_by_tag(&nodes, "select").len(), 2);
    }

    #[test]
    fn test_error_messages() {
        let nodes = sample();
        assert_eq!(error_messages(&nodes), vec!["Unknown block type: poll"]);
    }
}
