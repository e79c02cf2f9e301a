//! Document tree: mappings own their children, leaves hold scalars.
//!
//! Nodes remember how they were written (scalar quoting, flow or block
//! collections, comments around mapping entries) so an edited document can be
//! written back close to its source.

use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::warn;

use crate::domain::order::{total_cmp, KeyOrder};
use crate::domain::{DomainError, DomainResult, KeyPath};

/// How a string scalar is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScalarStyle {
    /// No source style; written single-quoted.
    #[default]
    Any,
    Plain,
    SingleQuoted,
    DoubleQuoted,
    Literal,
    Folded,
}

/// How a mapping or sequence is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollectionStyle {
    #[default]
    Block,
    /// `{ .. }` or `[ .. ]` on one line
    Flow,
}

/// Leaf value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    /// String value with the style it is written in.
    Str(String, ScalarStyle),
    /// Typed plain scalar (number, boolean, null) kept exactly as written.
    Plain(String),
}

impl Scalar {
    pub fn as_str(&self) -> &str {
        match self {
            Scalar::Str(s, _) | Scalar::Plain(s) => s,
        }
    }

    /// Style a new string value takes when it replaces this scalar.
    fn style(&self) -> ScalarStyle {
        match self {
            Scalar::Str(_, style) => *style,
            Scalar::Plain(_) => ScalarStyle::Plain,
        }
    }
}

/// Items of a sequence node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sequence {
    pub items: Vec<Node>,
    pub style: CollectionStyle,
}

impl From<Vec<Node>> for Sequence {
    fn from(items: Vec<Node>) -> Self {
        Self {
            items,
            style: CollectionStyle::Block,
        }
    }
}

/// Node of a document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Mapping(Mapping),
    Sequence(Sequence),
    Scalar(Scalar),
}

impl Node {
    /// New string value without a source style.
    pub fn string(value: impl Into<String>) -> Self {
        Node::Scalar(Scalar::Str(value.into(), ScalarStyle::Any))
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Node::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Sort every mapping below (and including) this node.
    pub fn sort(&mut self, order: &dyn KeyOrder) {
        match self {
            Node::Mapping(m) => m.sort(order),
            Node::Sequence(seq) => seq.items.iter_mut().for_each(|n| n.sort(order)),
            Node::Scalar(_) => {}
        }
    }

    fn is_sorted(&self, order: &dyn KeyOrder) -> bool {
        match self {
            Node::Mapping(m) => m.is_sorted(order),
            Node::Sequence(seq) => seq.items.iter().all(|n| n.is_sorted(order)),
            Node::Scalar(_) => true,
        }
    }

    /// Turn this node into an empty mapping unless it already is one.
    fn make_mapping(&mut self) -> &mut Mapping {
        if !matches!(self, Node::Mapping(_)) {
            *self = Node::Mapping(Mapping::new());
        }
        match self {
            Node::Mapping(m) => m,
            _ => unreachable!("node was just replaced by a mapping"),
        }
    }
}

/// Source details of one mapping entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntryLayout {
    /// Comment lines above the key; `""` is a blank line.
    pub comments: Vec<String>,
    /// Comment at the end of the key's line.
    pub trailing: Option<String>,
    /// Quoting of the key; `None` for keys added by an edit.
    pub key_style: Option<ScalarStyle>,
}

impl EntryLayout {
    pub fn is_empty(&self) -> bool {
        self.comments.is_empty() && self.trailing.is_none() && self.key_style.is_none()
    }
}

/// Mapping with unique keys, in insertion order until sorted.
///
/// Layouts are keyed by entry name, so they follow their entry when sorting.
#[derive(Debug, Clone, Default)]
pub struct Mapping {
    entries: IndexMap<String, Node>,
    style: CollectionStyle,
    layouts: HashMap<String, EntryLayout>,
}

impl PartialEq for Mapping {
    // order matters: two mappings with the same entries in different order differ
    fn eq(&self, other: &Self) -> bool {
        self.style == other.style
            && self.entries.len() == other.entries.len()
            && self.entries.iter().eq(other.entries.iter())
    }
}

impl Eq for Mapping {}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn style(&self) -> CollectionStyle {
        self.style
    }

    pub fn set_style(&mut self, style: CollectionStyle) {
        self.style = style;
    }

    pub fn layout(&self, key: &str) -> Option<&EntryLayout> {
        self.layouts.get(key)
    }

    pub fn set_layout(&mut self, key: impl Into<String>, layout: EntryLayout) {
        if !layout.is_empty() {
            self.layouts.insert(key.into(), layout);
        }
    }

    /// Remove and return the comments above `key`.
    pub fn take_comments(&mut self, key: &str) -> Vec<String> {
        self.layouts
            .get_mut(key)
            .map(|layout| std::mem::take(&mut layout.comments))
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Set `key` to `node`, returning the node it replaced.
    ///
    /// A replaced key keeps its position.
    pub fn set(&mut self, key: impl Into<String>, node: Node) -> Option<Node> {
        self.entries.insert(key.into(), node)
    }

    /// Set the string `value` at `path`, creating intermediate mappings.
    ///
    /// A replaced scalar passes its style on to the new value; new keys get
    /// [`ScalarStyle::Any`]. Intermediate nodes that are not mappings are
    /// replaced by empty mappings. Fails with [`DomainError::KeyHasChildren`] when the last key
    /// already holds a non-empty mapping; the tree is then left untouched.
    ///
    /// Returns the node previously stored at `path`, if any.
    pub fn insert(&mut self, path: &KeyPath, value: impl Into<String>) -> DomainResult<Option<Node>> {
        self.insert_segments(path.segments(), path, value.into())
    }

    fn insert_segments(
        &mut self,
        segments: &[String],
        path: &KeyPath,
        value: String,
    ) -> DomainResult<Option<Node>> {
        let Some((key, rest)) = segments.split_first() else {
            return Err(DomainError::EmptyKeyPath);
        };

        if rest.is_empty() {
            let style = match self.entries.get(key) {
                Some(Node::Mapping(existing)) if !existing.is_empty() => {
                    return Err(DomainError::KeyHasChildren {
                        path: path.to_string(),
                    });
                }
                Some(Node::Scalar(scalar)) => scalar.style(),
                _ => ScalarStyle::Any,
            };
            let node = Node::Scalar(Scalar::Str(value, style));
            return Ok(self.entries.insert(key.clone(), node));
        }

        let child = self
            .entries
            .entry(key.clone())
            .or_insert_with(|| Node::Mapping(Mapping::new()));
        if !matches!(child, Node::Mapping(_)) {
            warn!("replacing non-mapping value at '{key}' while inserting {path}");
        }
        child.make_mapping().insert_segments(rest, path, value)
    }

    /// Node stored at `path`.
    pub fn lookup(&self, path: &KeyPath) -> Option<&Node> {
        let (last, parents) = path.segments().split_last()?;
        let mut current = self;
        for key in parents {
            current = current.get(key)?.as_mapping()?;
        }
        current.get(last)
    }

    /// Scalar stored at `path`; `None` if absent or not a leaf.
    pub fn lookup_scalar(&self, path: &KeyPath) -> Option<&Scalar> {
        self.lookup(path)?.as_scalar()
    }

    /// Reorder keys at every depth according to `order`.
    ///
    /// Stable and idempotent; ties under `order` fall back to code points.
    pub fn sort(&mut self, order: &dyn KeyOrder) {
        self.entries.sort_by(|k1, _, k2, _| total_cmp(order, k1, k2));
        for child in self.entries.values_mut() {
            child.sort(order);
        }
    }

    /// Whether keys are in ascending order at every depth.
    pub fn is_sorted(&self, order: &dyn KeyOrder) -> bool {
        let keys: Vec<&String> = self.entries.keys().collect();
        keys.windows(2)
            .all(|w| total_cmp(order, w[0], w[1]).is_le())
            && self.entries.values().all(|n| n.is_sorted(order))
    }
}
