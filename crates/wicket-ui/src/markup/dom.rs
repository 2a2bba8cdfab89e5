//! Arena-based fragment tree for markup results.
//!
//! Nodes are stored in a flat `Vec` arena and linked by index. A fragment
//! is self-contained: it never references host-page nodes, which is what
//! makes the isolated rendering scope an isolation boundary by
//! construction.

/// Index into a [`Fragment`]'s node arena.
pub type NodeId = usize;

/// A parsed markup fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub nodes: Vec<Node>,
    pub root: NodeId,
}

/// A single node in the fragment tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// The kind of fragment node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// The fragment root (the isolated scope boundary).
    Root,
    Element(ElementData),
    Text(String),
}

/// Data associated with an element node.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementData {
    pub tag: TagName,
    pub attributes: Vec<Attribute>,
}

/// An element attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// Tag names a transcript fragment can carry.
///
/// Tags outside this set are stored as `Unknown(String)` and passed
/// through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TagName {
    Div,
    Span,
    P,
    Pre,
    Br,
    Ul,
    Li,
    Script,
    Style,
    Unknown(String),
}

impl TagName {
    /// Parse a (already lower-cased) tag name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "div" => TagName::Div,
            "span" => TagName::Span,
            "p" => TagName::P,
            "pre" => TagName::Pre,
            "br" => TagName::Br,
            "ul" => TagName::Ul,
            "li" => TagName::Li,
            "script" => TagName::Script,
            "style" => TagName::Style,
            other => TagName::Unknown(other.to_string()),
        }
    }

    /// Whether this element's content is raw text (no child elements).
    pub fn is_raw_text(&self) -> bool {
        matches!(self, TagName::Script | TagName::Style)
    }

    /// Whether this element never has children.
    pub fn is_void(&self) -> bool {
        matches!(self, TagName::Br)
    }
}

impl Fragment {
    /// Create an empty fragment containing only the root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Root,
                parent: None,
                children: Vec::new(),
            }],
            root: 0,
        }
    }

    /// Append an element under `parent`, returning its id.
    pub fn append_element(
        &mut self,
        parent: NodeId,
        tag: TagName,
        attributes: Vec<Attribute>,
    ) -> NodeId {
        self.append_node(
            parent,
            NodeKind::Element(ElementData { tag, attributes }),
        )
    }

    /// Append a text node under `parent`, returning its id.
    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        self.append_node(parent, NodeKind::Text(text.into()))
    }

    fn append_node(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(id);
        id
    }

    /// Ids of all `<script>` elements in document order.
    pub fn scripts(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.walk(self.root, &mut |id, node| {
            if let NodeKind::Element(el) = &node.kind
                && el.tag == TagName::Script
            {
                out.push(id);
            }
        });
        out
    }

    /// Look up an attribute value on an element node.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.nodes.get(id)?.kind {
            NodeKind::Element(el) => el
                .attributes
                .iter()
                .find(|a| a.name == name)
                .map(|a| a.value.as_str()),
            _ => None,
        }
    }

    /// Concatenated text of a node's descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.walk(id, &mut |_, node| {
            if let NodeKind::Text(t) = &node.kind {
                out.push_str(t);
            }
        });
        out
    }

    /// Find descendants of `root` whose `class` attribute equals `class`.
    pub fn elements_by_class(&self, root: NodeId, class: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.walk(root, &mut |id, node| {
            if matches!(node.kind, NodeKind::Element(_)) && self.attribute(id, "class") == Some(class)
            {
                out.push(id);
            }
        });
        out
    }

    /// Replace the children of an element with a single text node.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        let old_children = std::mem::take(&mut self.nodes[id].children);
        for child in old_children {
            self.nodes[child].parent = None;
        }
        self.append_text(id, text);
    }

    /// Depth-first pre-order walk from `start`.
    fn walk(&self, start: NodeId, visit: &mut impl FnMut(NodeId, &Node)) {
        let Some(node) = self.nodes.get(start) else {
            return;
        };
        visit(start, node);
        for &child in &node.children {
            self.walk(child, visit);
        }
    }
}

impl Default for Fragment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_fragment_has_only_root() {
        let f = Fragment::new();
        assert_eq!(f.nodes.len(), 1);
        assert_eq!(f.nodes[f.root].kind, NodeKind::Root);
    }

    #[test]
    fn append_links_parent_and_children() {
        let mut f = Fragment::new();
        let div = f.append_element(f.root, TagName::Div, Vec::new());
        let text = f.append_text(div, "hi");
        assert_eq!(f.nodes[div].parent, Some(f.root));
        assert_eq!(f.nodes[div].children, vec![text]);
        assert_eq!(f.nodes[f.root].children, vec![div]);
    }

    #[test]
    fn scripts_found_in_document_order() {
        let mut f = Fragment::new();
        let div = f.append_element(f.root, TagName::Div, Vec::new());
        let s1 = f.append_element(div, TagName::Script, Vec::new());
        let s2 = f.append_element(f.root, TagName::Script, Vec::new());
        assert_eq!(f.scripts(), vec![s1, s2]);
    }

    #[test]
    fn attribute_lookup() {
        let mut f = Fragment::new();
        let el = f.append_element(
            f.root,
            TagName::Script,
            vec![Attribute {
                name: "src".to_string(),
                value: "/x.js".to_string(),
            }],
        );
        assert_eq!(f.attribute(el, "src"), Some("/x.js"));
        assert_eq!(f.attribute(el, "class"), None);
    }

    #[test]
    fn text_content_concatenates_descendants() {
        let mut f = Fragment::new();
        let div = f.append_element(f.root, TagName::Div, Vec::new());
        f.append_text(div, "a");
        let span = f.append_element(div, TagName::Span, Vec::new());
        f.append_text(span, "b");
        assert_eq!(f.text_content(div), "ab");
    }

    #[test]
    fn elements_by_class_scoped_to_subtree() {
        let mut f = Fragment::new();
        let attr = |v: &str| {
            vec![Attribute {
                name: "class".to_string(),
                value: v.to_string(),
            }]
        };
        let outer = f.append_element(f.root, TagName::Div, attr("clock"));
        let inner = f.append_element(outer, TagName::Span, attr("clock"));
        assert_eq!(f.elements_by_class(outer, "clock"), vec![outer, inner]);
        assert_eq!(f.elements_by_class(inner, "clock"), vec![inner]);
    }

    #[test]
    fn set_text_replaces_children() {
        let mut f = Fragment::new();
        let div = f.append_element(f.root, TagName::Div, Vec::new());
        f.append_text(div, "old");
        f.set_text(div, "new");
        assert_eq!(f.text_content(div), "new");
        assert_eq!(f.nodes[div].children.len(), 1);
    }

    #[test]
    fn tag_name_parsing() {
        assert_eq!(TagName::from_name("div"), TagName::Div);
        assert_eq!(TagName::from_name("script"), TagName::Script);
        assert_eq!(
            TagName::from_name("marquee"),
            TagName::Unknown("marquee".to_string())
        );
        assert!(TagName::Script.is_raw_text());
        assert!(TagName::Br.is_void());
        assert!(!TagName::Div.is_raw_text());
    }
}
