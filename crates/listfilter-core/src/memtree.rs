//! In-memory document tree implementing [`NodeQuery`].
//!
//! Used by tests and by the CLI to load pages from YAML. Selector support is
//! limited to what [`crate::selector`] parses; matching only considers the
//! subtree below the node `select` is called on.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use crate::node::NodeQuery;
use crate::selector::{self, Chain, Compound};

/// Serializable description of a node and its subtree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    #[serde(default = "default_tag")]
    pub tag: String,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub children: Vec<NodeSpec>,
}

fn default_tag() -> String {
    "div".to_string()
}

#[derive(Debug)]
struct NodeData {
    tag: String,
    attrs: BTreeMap<String, String>,
    text: String,
    children: Vec<MemNode>,
    visible: bool,
    distance: Option<(f64, String)>,
}

/// Shared handle to an in-memory node. Clones alias the same node.
#[derive(Debug, Clone)]
pub struct MemNode {
    inner: Arc<RwLock<NodeData>>,
}

impl MemNode {
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            inner: Arc::new(RwLock::new(NodeData {
                tag: tag.to_ascii_lowercase(),
                attrs: BTreeMap::new(),
                text: String::new(),
                children: Vec::new(),
                visible: true,
                distance: None,
            })),
        }
    }

    /// Builds a tree from its serializable description.
    #[must_use]
    pub fn from_spec(spec: &NodeSpec) -> Self {
        let node = Self::new(&spec.tag);
        {
            let mut data = node.write();
            data.attrs.clone_from(&spec.attrs);
            data.text.clone_from(&spec.text);
            data.children = spec.children.iter().map(Self::from_spec).collect();
        }
        node
    }

    #[must_use]
    pub fn with_attr(self, name: &str, value: &str) -> Self {
        self.write()
            .attrs
            .insert(name.to_string(), value.to_string());
        self
    }

    #[must_use]
    pub fn with_class(self, class: &str) -> Self {
        self.with_attr("class", class)
    }

    #[must_use]
    pub fn with_text(self, text: &str) -> Self {
        self.write().text = text.to_string();
        self
    }

    #[must_use]
    pub fn with_child(self, child: MemNode) -> Self {
        self.write().children.push(child);
        self
    }

    #[must_use]
    pub fn tag(&self) -> String {
        self.read().tag.clone()
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.read().visible
    }

    /// Distance in kilometers recorded by the last distance evaluation.
    #[must_use]
    pub fn distance(&self) -> Option<f64> {
        self.read().distance.as_ref().map(|(km, _)| *km)
    }

    #[must_use]
    pub fn formatted_distance(&self) -> Option<String> {
        self.read()
            .distance
            .as_ref()
            .map(|(_, formatted)| formatted.clone())
    }

    fn read(&self) -> RwLockReadGuard<'_, NodeData> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, NodeData> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn children(&self) -> Vec<MemNode> {
        self.read().children.clone()
    }

    fn matches_compound(&self, compound: &Compound) -> bool {
        let data = self.read();
        if compound.tag.as_ref().is_some_and(|tag| *tag != data.tag) {
            return false;
        }
        if compound
            .id
            .as_ref()
            .is_some_and(|id| data.attrs.get("id") != Some(id))
        {
            return false;
        }
        if !compound.classes.is_empty() {
            let classes: Vec<&str> = data
                .attrs
                .get("class")
                .map(|c| c.split_whitespace().collect())
                .unwrap_or_default();
            if !compound
                .classes
                .iter()
                .all(|wanted| classes.contains(&wanted.as_str()))
            {
                return false;
            }
        }
        compound.attrs.iter().all(|test| match data.attrs.get(&test.name) {
            None => false,
            Some(actual) => test.value.as_ref().is_none_or(|v| v == actual),
        })
    }

    /// Right-to-left descendant matching: the last compound must match this
    /// node, each earlier one the nearest remaining ancestor that satisfies it.
    fn matches_chain(&self, chain: &Chain, ancestors: &[MemNode]) -> bool {
        let Some((last, earlier)) = chain.split_last() else {
            return false;
        };
        if !self.matches_compound(last) {
            return false;
        }
        let mut remaining = ancestors;
        for compound in earlier.iter().rev() {
            match remaining
                .iter()
                .rposition(|ancestor| ancestor.matches_compound(compound))
            {
                Some(pos) => remaining = &remaining[..pos],
                None => return false,
            }
        }
        true
    }

    fn collect_matches(
        &self,
        groups: &[Chain],
        ancestors: &mut Vec<MemNode>,
        out: &mut Vec<MemNode>,
    ) {
        ancestors.push(self.clone());
        for child in self.children() {
            if groups
                .iter()
                .any(|chain| child.matches_chain(chain, ancestors))
            {
                out.push(child.clone());
            }
            child.collect_matches(groups, ancestors, out);
        }
        ancestors.pop();
    }
}

impl NodeQuery for MemNode {
    fn select(&self, pattern: &str) -> Vec<Self> {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return vec![self.clone()];
        }
        let Some(groups) = selector::parse(pattern) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        self.collect_matches(&groups, &mut Vec::new(), &mut out);
        out
    }

    fn text(&self) -> String {
        let (mut text, children) = {
            let data = self.read();
            (data.text.clone(), data.children.clone())
        };
        for child in children {
            text.push_str(&child.text());
        }
        text
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.read().attrs.get(name).cloned()
    }

    fn set_text(&self, text: &str) {
        let mut data = self.write();
        data.text = text.to_string();
        data.children.clear();
    }

    fn set_visible(&self, visible: bool) {
        self.write().visible = visible;
    }

    fn set_distance(&self, distance_km: f64, formatted: &str) {
        self.write().distance = Some((distance_km, formatted.to_string()));
    }

    fn same_node(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
