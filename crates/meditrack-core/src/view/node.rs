//! Host-independent view tree.

use std::collections::BTreeMap;

use serde::Serialize;

use super::Action;

/// Handler binding assigned when a tree is mounted.
pub type HandlerId = u64;

/// One element of a rendered tree.
///
/// Text is always plain text, never markup, so record fields cannot inject
/// structure into the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewNode {
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Set by [`super::Screen::mount`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handler: Option<HandlerId>,
    #[serde(skip)]
    pub action: Option<Action>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ViewNode>,
}

impl ViewNode {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            id: None,
            classes: Vec::new(),
            attrs: BTreeMap::new(),
            text: None,
            handler: None,
            action: None,
            children: Vec::new(),
        }
    }

    /// `<i>` with icon classes, e.g. `"fas fa-check"`.
    pub fn icon(classes: &str) -> Self {
        Self::new("i").class(classes)
    }

    /// `<span>` holding only text.
    pub fn span(text: impl Into<String>) -> Self {
        Self::new("span").text(text)
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Add one or more space-separated classes.
    pub fn class(mut self, classes: &str) -> Self {
        self.classes
            .extend(classes.split_whitespace().map(str::to_string));
        self
    }

    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs.insert(name.to_string(), value.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn child(mut self, child: ViewNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = ViewNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Add a child only when `child` is `Some`.
    pub fn child_opt(mut self, child: Option<ViewNode>) -> Self {
        self.children.extend(child);
        self
    }

    pub fn on_click(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Concatenated text of this node and its descendants, depth first.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(text) = &self.text {
            out.push_str(text);
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// Every node in the tree, depth first, self included.
    pub fn descendants(&self) -> Vec<&ViewNode> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.descendants());
        }
        out
    }

    /// Nodes carrying a class, depth first.
    pub fn find_by_class(&self, class: &str) -> Vec<&ViewNode> {
        self.descendants()
            .into_iter()
            .filter(|n| n.has_class(class))
            .collect()
    }

    /// First node with the given id.
    pub fn find_by_id(&self, id: &str) -> Option<&ViewNode> {
        self.descendants()
            .into_iter()
            .find(|n| n.id.as_deref() == Some(id))
    }

    pub(crate) fn for_each_mut(&mut self, f: &mut impl FnMut(&mut ViewNode)) {
        f(self);
        for child in &mut self.children {
            child.for_each_mut(f);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordId;

    #[test]
    fn test_builder_and_queries() {
        let node = ViewNode::new("li")
            .class("medicine-item  selected")
            .child(ViewNode::span("Aspirin").id("name"))
            .child(ViewNode::span(" 100mg"))
            .child(ViewNode::new("button").on_click(Action::MarkTaken(RecordId::from(1))));

        assert_eq!(node.classes, vec!["medicine-item", "selected"]);
        assert_eq!(node.text_content(), "Aspirin 100mg");
        assert_eq!(node.find_by_id("name").unwrap().tag, "span");
        assert_eq!(node.descendants().len(), 4);
    }

    #[test]
    fn test_serialized_shape_omits_empty_and_actions() {
        let node = ViewNode::new("button")
            .class("edit-btn")
            .on_click(Action::EditDoctor(RecordId::from(2)));

        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json, serde_json::json!({"tag": "button", "classes": ["edit-btn"]}));
    }

    #[test]
    fn test_text_is_not_markup() {
        let node = ViewNode::span("<script>alert(1)</script>");
        let json = serde_json::to_string(&node).unwrap();
        assert!(json.contains(r#""text":"<script>alert(1)</script>""#));
        assert!(node.children.is_empty());
    }
}
