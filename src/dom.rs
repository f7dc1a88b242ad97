use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(pub(crate) usize);

#[derive(Debug, Clone)]
pub(crate) enum NodeType {
    Document,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) node_type: NodeType,
}

#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub(crate) tag_name: String,
    pub(crate) attrs: HashMap<String, String>,
    pub(crate) checked: bool,
    pub(crate) disabled: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct Dom {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeId,
}

impl Dom {
    pub(crate) fn new() -> Self {
        let root = Node {
            parent: None,
            children: Vec::new(),
            node_type: NodeType::Document,
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    fn create_node(&mut self, parent: Option<NodeId>, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            node_type,
        });
        if let Some(parent_id) = parent {
            self.nodes[parent_id.0].children.push(id);
        }
        id
    }

    pub(crate) fn create_element(
        &mut self,
        parent: NodeId,
        tag_name: String,
        attrs: HashMap<String, String>,
    ) -> NodeId {
        let checked = attrs.contains_key("checked");
        let disabled = attrs.contains_key("disabled");
        let element = Element {
            tag_name,
            attrs,
            checked,
            disabled,
        };
        self.create_node(Some(parent), NodeType::Element(element))
    }

    pub(crate) fn create_text(&mut self, parent: NodeId, text: String) -> NodeId {
        self.create_node(Some(parent), NodeType::Text(text))
    }

    pub(crate) fn element(&self, node_id: NodeId) -> Option<&Element> {
        match &self.nodes[node_id.0].node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn element_mut(&mut self, node_id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes[node_id.0].node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn tag_name(&self, node_id: NodeId) -> Option<&str> {
        self.element(node_id).map(|e| e.tag_name.as_str())
    }

    pub(crate) fn parent(&self, node_id: NodeId) -> Option<NodeId> {
        self.nodes[node_id.0].parent
    }

    pub(crate) fn children(&self, node_id: NodeId) -> &[NodeId] {
        &self.nodes[node_id.0].children
    }

    pub(crate) fn element_children(&self, node_id: NodeId) -> Vec<NodeId> {
        self.children(node_id)
            .iter()
            .copied()
            .filter(|child| self.element(*child).is_some())
            .collect()
    }

    pub(crate) fn previous_element_sibling(&self, node_id: NodeId) -> Option<NodeId> {
        let parent = self.parent(node_id)?;
        let siblings = self.children(parent);
        let position = siblings.iter().position(|sibling| *sibling == node_id)?;
        siblings[..position]
            .iter()
            .rev()
            .copied()
            .find(|sibling| self.element(*sibling).is_some())
    }

    pub(crate) fn next_element_sibling(&self, node_id: NodeId) -> Option<NodeId> {
        let parent = self.parent(node_id)?;
        let siblings = self.children(parent);
        let position = siblings.iter().position(|sibling| *sibling == node_id)?;
        siblings[position + 1..]
            .iter()
            .copied()
            .find(|sibling| self.element(*sibling).is_some())
    }

    pub(crate) fn is_connected(&self, node_id: NodeId) -> bool {
        let mut cursor = node_id;
        loop {
            if cursor == self.root {
                return true;
            }
            match self.parent(cursor) {
                Some(parent) => cursor = parent,
                None => return false,
            }
        }
    }

    /// Detaches a subtree. Arena slots stay allocated but the subtree is no
    /// longer reachable from the root, so queries never observe it.
    pub(crate) fn remove_node(&mut self, node_id: NodeId) {
        if let Some(parent) = self.parent(node_id) {
            self.nodes[parent.0].children.retain(|child| *child != node_id);
        }
        self.nodes[node_id.0].parent = None;
    }

    pub(crate) fn ancestors(&self, node_id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cursor = self.parent(node_id);
        while let Some(current) = cursor {
            out.push(current);
            cursor = self.parent(current);
        }
        out
    }

    pub(crate) fn elements_in_document_order(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(current) = stack.pop() {
            if self.element(current).is_some() {
                out.push(current);
            }
            for child in self.children(current).iter().rev() {
                stack.push(*child);
            }
        }
        out
    }

    pub(crate) fn attr(&self, node_id: NodeId, name: &str) -> Option<&str> {
        self.element(node_id)
            .and_then(|element| element.attrs.get(name))
            .map(String::as_str)
    }

    pub(crate) fn set_attr(&mut self, node_id: NodeId, name: &str, value: &str) {
        if let Some(element) = self.element_mut(node_id) {
            element.attrs.insert(name.to_string(), value.to_string());
            match name {
                "checked" => element.checked = true,
                "disabled" => element.disabled = true,
                _ => {}
            }
        }
    }

    pub(crate) fn checked(&self, node_id: NodeId) -> bool {
        self.element(node_id).is_some_and(|element| element.checked)
    }

    pub(crate) fn disabled(&self, node_id: NodeId) -> bool {
        self.element(node_id).is_some_and(|element| element.disabled)
    }

    pub(crate) fn set_checked(&mut self, node_id: NodeId, checked: bool) {
        if let Some(element) = self.element_mut(node_id) {
            element.checked = checked;
        }
    }

    pub(crate) fn is_checkbox(&self, node_id: NodeId) -> bool {
        self.element(node_id).is_some_and(|element| {
            element.tag_name == "input"
                && element
                    .attrs
                    .get("type")
                    .is_some_and(|kind| kind.eq_ignore_ascii_case("checkbox"))
        })
    }

    pub(crate) fn has_class(&self, node_id: NodeId, class_name: &str) -> bool {
        self.element(node_id).is_some_and(|element| {
            element
                .attrs
                .get("class")
                .map(|classes| classes.split_whitespace().any(|c| c == class_name))
                .unwrap_or(false)
        })
    }

    pub(crate) fn add_class(&mut self, node_id: NodeId, class_name: &str) {
        if self.has_class(node_id, class_name) {
            return;
        }
        let mut tokens = class_tokens(self.attr(node_id, "class"));
        tokens.push(class_name.to_string());
        let joined = tokens.join(" ");
        if let Some(element) = self.element_mut(node_id) {
            element.attrs.insert("class".to_string(), joined);
        }
    }

    pub(crate) fn remove_class(&mut self, node_id: NodeId, class_name: &str) {
        let mut tokens = class_tokens(self.attr(node_id, "class"));
        tokens.retain(|token| token != class_name);
        let joined = tokens.join(" ");
        if let Some(element) = self.element_mut(node_id) {
            element.attrs.insert("class".to_string(), joined);
        }
    }

    pub(crate) fn toggle_class(&mut self, node_id: NodeId, class_name: &str) {
        if self.has_class(node_id, class_name) {
            self.remove_class(node_id, class_name);
        } else {
            self.add_class(node_id, class_name);
        }
    }

    pub(crate) fn text_content(&self, node_id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node_id, &mut out);
        out
    }

    fn collect_text(&self, node_id: NodeId, out: &mut String) {
        match &self.nodes[node_id.0].node_type {
            NodeType::Text(text) => out.push_str(text),
            _ => {
                for child in self.children(node_id).to_vec() {
                    self.collect_text(child, out);
                }
            }
        }
    }

    pub(crate) fn set_text_content(&mut self, node_id: NodeId, text: &str) {
        let children = self.children(node_id).to_vec();
        for child in children {
            self.remove_node(child);
        }
        self.create_text(node_id, text.to_string());
    }

    /// Shallow start-tag rendering used in assertion failure messages.
    pub(crate) fn snippet(&self, node_id: NodeId) -> String {
        let Some(element) = self.element(node_id) else {
            return "#text".to_string();
        };
        let mut out = format!("<{}", element.tag_name);
        let mut names = element.attrs.keys().collect::<Vec<_>>();
        names.sort();
        for name in names {
            let value = &element.attrs[name];
            out.push_str(&format!(" {name}=\"{value}\""));
        }
        out.push('>');
        out
    }
}

pub(crate) fn class_tokens(class_attr: Option<&str>) -> Vec<String> {
    class_attr
        .map(|value| {
            value
                .split_whitespace()
                .filter(|token| !token.is_empty())
                .map(ToOwned::to_owned)
                .collect::<Vec<_>>()
        })
        .unwrap_or_default()
}
