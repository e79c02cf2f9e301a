//! YAML text to document tree, built from parser events.
//!
//! The parser reports neither comments nor collection styles; those are read
//! from the source lines next to each event's position.

use std::collections::HashMap;

use tracing::trace;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser};
use yaml_rust2::scanner::{Marker, TScalarStyle};

use super::schema::{is_null, resolves_to_non_string};
use super::source::Source;
use super::Document;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{
    CollectionStyle, DomainError, EntryLayout, Mapping, Node, Scalar, ScalarStyle, Sequence,
};

/// Parse a locale file into its root mapping plus surrounding comments.
///
/// An empty document (no content, only comments, or a bare null) yields an
/// empty mapping. Aliases are expanded to copies of their anchored node.
/// Comments are kept above and behind block mapping entries and at the top and
/// end of the file; comments inside sequences and flow collections are dropped.
///
/// # Errors
/// - YAML syntax errors
/// - duplicate keys within one mapping
/// - non-scalar mapping keys, undefined aliases, more than one document
/// - a root that is not a mapping
pub fn parse_document(content: &str) -> ApplicationResult<Document> {
    let mut parser = Parser::new_from_str(content);
    let mut builder = TreeBuilder::new(content);

    parser
        .load(&mut builder, true)
        .map_err(|e| ApplicationError::yaml(e.to_string()))?;

    builder.finish()
}

/// Collection under construction.
enum Frame {
    Sequence {
        anchor: usize,
        items: Sequence,
        col: usize,
    },
    Mapping {
        anchor: usize,
        entries: Mapping,
        pending_key: Option<PendingKey>,
    },
}

struct PendingKey {
    key: String,
    line: usize,
    col: usize,
    layout: EntryLayout,
}

struct TreeBuilder<'a> {
    source: Source<'a>,
    stack: Vec<Frame>,
    documents: Vec<Node>,
    anchors: HashMap<usize, Node>,
    error: Option<ApplicationError>,
}

impl<'a> TreeBuilder<'a> {
    fn new(content: &'a str) -> Self {
        Self {
            source: Source::new(content),
            stack: Vec::new(),
            documents: Vec::new(),
            anchors: HashMap::new(),
            error: None,
        }
    }

    fn finish(mut self) -> ApplicationResult<Document> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let mut documents = self.documents.into_iter();
        let root = documents.next();
        if documents.next().is_some() {
            return Err(ApplicationError::yaml(
                "multiple documents in one file are not supported",
            ));
        }

        let mut root = match root {
            None => Mapping::new(),
            Some(Node::Mapping(m)) => m,
            Some(Node::Scalar(Scalar::Plain(s))) if is_null(&s) => Mapping::new(),
            Some(_) => return Err(DomainError::RootNotMapping.into()),
        };

        // comments above the first key stay at the top of the file
        let mut header = self.source.take_leading();
        let first = root.keys().next().map(str::to_string);
        if let Some(first) = first {
            header.extend(root.take_comments(&first));
        }
        while header.first().is_some_and(String::is_empty) {
            header.remove(0);
        }
        header.dedup_by(|a, b| a.is_empty() && b.is_empty());
        let footer = self.source.take_trailing();

        Ok(Document {
            header,
            root,
            footer,
        })
    }

    fn fail(&mut self, message: String) {
        if self.error.is_none() {
            self.error = Some(ApplicationError::yaml(message));
        }
    }

    fn remember(&mut self, anchor: usize, node: &Node) {
        if anchor > 0 {
            self.anchors.insert(anchor, node.clone());
        }
    }

    fn collection_style(&self, marker: &Marker, open: char) -> CollectionStyle {
        if self.source.char_at(marker.line(), marker.col()) == Some(open) {
            CollectionStyle::Flow
        } else {
            CollectionStyle::Block
        }
    }

    /// Column that block scalar content must be indented past.
    fn parent_indent(&self) -> Option<usize> {
        match self.stack.last()? {
            Frame::Sequence { col, .. } => Some(*col),
            Frame::Mapping { pending_key, .. } => pending_key.as_ref().map(|k| k.col),
        }
    }

    /// Attach a finished node to the enclosing collection, or to the document list.
    fn attach(&mut self, node: Node, marker: &Marker) {
        let problem = match self.stack.last_mut() {
            None => {
                self.documents.push(node);
                None
            }
            Some(Frame::Sequence { items, .. }) => {
                items.items.push(node);
                None
            }
            Some(Frame::Mapping {
                entries,
                pending_key,
                ..
            }) => match pending_key.take() {
                None => match node {
                    Node::Scalar(scalar) => {
                        let (line, col) = (marker.line(), marker.col());
                        let key_style = match &scalar {
                            Scalar::Str(_, style) => *style,
                            Scalar::Plain(_) => ScalarStyle::Plain,
                        };
                        let mut layout = EntryLayout {
                            key_style: Some(key_style),
                            ..EntryLayout::default()
                        };
                        if entries.style() == CollectionStyle::Block
                            && self.source.starts_line(line, col)
                        {
                            layout.comments = self.source.take_comments_above(line);
                            layout.trailing = self.source.trailing_comment(line, col);
                        }
                        *pending_key = Some(PendingKey {
                            key: scalar.as_str().to_string(),
                            line,
                            col,
                            layout,
                        });
                        None
                    }
                    _ => Some(format!(
                        "unsupported non-scalar mapping key at line {}, column {}",
                        marker.line(),
                        marker.col() + 1
                    )),
                },
                Some(PendingKey {
                    key,
                    line,
                    col,
                    layout,
                }) => {
                    if entries.get(&key).is_some() {
                        Some(format!(
                            "duplicate key '{key}' at line {line}, column {}",
                            col + 1
                        ))
                    } else {
                        entries.set_layout(key.clone(), layout);
                        entries.set(key, node);
                        None
                    }
                }
            },
        };

        if let Some(message) = problem {
            self.fail(message);
        }
    }
}

impl MarkedEventReceiver for TreeBuilder<'_> {
    fn on_event(&mut self, ev: Event, marker: Marker) {
        if self.error.is_some() {
            return;
        }

        match ev {
            Event::Nothing
            | Event::StreamStart
            | Event::StreamEnd
            | Event::DocumentStart
            | Event::DocumentEnd => {}

            Event::Scalar(value, style, anchor, _tag) => {
                if matches!(style, TScalarStyle::Literal | TScalarStyle::Folded) {
                    let parent = self.parent_indent();
                    self.source
                        .cover_block_scalar(marker.line(), marker.col(), parent);
                }
                let node = Node::Scalar(resolve_scalar(value, style));
                self.remember(anchor, &node);
                self.attach(node, &marker);
            }

            Event::SequenceStart(anchor, _tag) => {
                let style = self.collection_style(&marker, '[');
                self.stack.push(Frame::Sequence {
                    anchor,
                    items: Sequence {
                        items: Vec::new(),
                        style,
                    },
                    col: marker.col(),
                });
            }

            Event::MappingStart(anchor, _tag) => {
                let mut entries = Mapping::new();
                entries.set_style(self.collection_style(&marker, '{'));
                self.stack.push(Frame::Mapping {
                    anchor,
                    entries,
                    pending_key: None,
                });
            }

            Event::SequenceEnd | Event::MappingEnd => {
                let (anchor, node) = match self.stack.pop() {
                    Some(Frame::Sequence { anchor, items, .. }) => (anchor, Node::Sequence(items)),
                    Some(Frame::Mapping {
                        anchor, entries, ..
                    }) => (anchor, Node::Mapping(entries)),
                    None => {
                        self.fail("collection end without start".to_string());
                        return;
                    }
                };
                self.remember(anchor, &node);
                self.attach(node, &marker);
            }

            Event::Alias(id) => match self.anchors.get(&id).cloned() {
                Some(node) => self.attach(node, &marker),
                None => self.fail(format!(
                    "undefined alias at line {}, column {}",
                    marker.line(),
                    marker.col() + 1
                )),
            },
        }
    }
}

fn resolve_scalar(value: String, style: TScalarStyle) -> Scalar {
    let style = match style {
        TScalarStyle::Plain if resolves_to_non_string(&value) => {
            // includes the empty value of `key:`
            trace!("typed plain scalar: {value:?}");
            return Scalar::Plain(value);
        }
        TScalarStyle::Plain => ScalarStyle::Plain,
        TScalarStyle::SingleQuoted => ScalarStyle::SingleQuoted,
        TScalarStyle::DoubleQuoted => ScalarStyle::DoubleQuoted,
        TScalarStyle::Literal => ScalarStyle::Literal,
        TScalarStyle::Folded => ScalarStyle::Folded,
    };
    Scalar::Str(value, style)
}
