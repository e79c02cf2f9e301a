//! Document tree to YAML text.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use super::schema::resolves_to_non_string;
use super::Document;
use crate::domain::{CollectionStyle, Mapping, Node, Scalar, ScalarStyle, Sequence};

const INDENT: &str = "  ";

// Characters and placements that keep a scalar from being written plain.
static PLAIN_BLOCKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^[\n\t ,\[\]{}#&*!|>'"%@`]|^[?-]$|^[?-][ \t]|[\n:][ \t]|[ \t]\n|[\n\t ]#|[\n\t :]$"#,
    )
    .expect("plain scalar pattern is valid")
});

/// Scalar text split at the end of its first line.
///
/// A trailing comment goes between `head` and `body`; only block scalars
/// have a body.
struct ScalarText {
    head: String,
    body: String,
}

impl ScalarText {
    fn inline(head: String) -> Self {
        Self {
            head,
            body: String::new(),
        }
    }
}

/// Render a document.
///
/// The result ends with a newline; callers trim it as the file layout requires.
/// Long values are never wrapped.
pub fn render_document(doc: &Document) -> String {
    let mut out = String::new();
    write_comments(&mut out, &doc.header, "");
    let root = &doc.root;
    if root.is_empty() {
        out.push_str("{}\n");
    } else if root.style() == CollectionStyle::Flow {
        out.push_str(&flow_mapping(root));
        out.push('\n');
    } else {
        write_mapping(&mut out, root, 0);
    }
    write_comments(&mut out, &doc.footer, "");
    out
}

fn write_comments(out: &mut String, lines: &[String], pad: &str) {
    for line in lines {
        if !line.is_empty() {
            out.push_str(pad);
            out.push_str(line);
        }
        out.push('\n');
    }
}

fn push_trailing(out: &mut String, comment: Option<&String>) {
    if let Some(comment) = comment {
        out.push(' ');
        out.push_str(comment);
    }
}

fn write_mapping(out: &mut String, mapping: &Mapping, depth: usize) {
    let pad = INDENT.repeat(depth);
    for (index, (key, node)) in mapping.iter().enumerate() {
        let layout = mapping.layout(key);
        let mut comments = layout.map(|l| l.comments.as_slice()).unwrap_or_default();
        if index == 0 {
            // no blank line right below the parent key
            while let [first, rest @ ..] = comments {
                if !first.is_empty() {
                    break;
                }
                comments = rest;
            }
        }
        write_comments(out, comments, &pad);
        let trailing = layout.and_then(|l| l.trailing.as_ref());

        out.push_str(&pad);
        out.push_str(&render_key(key, layout.and_then(|l| l.key_style), false));
        out.push(':');
        match node {
            Node::Scalar(scalar) => {
                let text = render_scalar(scalar, &INDENT.repeat(depth + 1), false);
                if !text.head.is_empty() {
                    out.push(' ');
                    out.push_str(&text.head);
                }
                push_trailing(out, trailing);
                out.push_str(&text.body);
                out.push('\n');
            }
            Node::Mapping(child) if child.is_empty() || child.style() == CollectionStyle::Flow => {
                out.push(' ');
                out.push_str(&flow_mapping(child));
                push_trailing(out, trailing);
                out.push('\n');
            }
            Node::Sequence(seq) if seq.items.is_empty() || seq.style == CollectionStyle::Flow => {
                out.push(' ');
                out.push_str(&flow_sequence(seq));
                push_trailing(out, trailing);
                out.push('\n');
            }
            Node::Mapping(child) => {
                push_trailing(out, trailing);
                out.push('\n');
                write_mapping(out, child, depth + 1);
            }
            Node::Sequence(seq) => {
                push_trailing(out, trailing);
                out.push('\n');
                write_sequence(out, seq, depth + 1);
            }
        }
    }
}

fn write_sequence(out: &mut String, seq: &Sequence, depth: usize) {
    let pad = INDENT.repeat(depth);
    for item in &seq.items {
        out.push_str(&pad);
        out.push('-');
        match item {
            Node::Scalar(scalar) => {
                let text = render_scalar(scalar, &INDENT.repeat(depth + 1), false);
                if !text.head.is_empty() {
                    out.push(' ');
                    out.push_str(&text.head);
                }
                out.push_str(&text.body);
                out.push('\n');
            }
            Node::Mapping(child) if child.is_empty() || child.style() == CollectionStyle::Flow => {
                out.push(' ');
                out.push_str(&flow_mapping(child));
                out.push('\n');
            }
            Node::Sequence(nested) if nested.items.is_empty() || nested.style == CollectionStyle::Flow => {
                out.push(' ');
                out.push_str(&flow_sequence(nested));
                out.push('\n');
            }
            // compact form: the first line of the nested block follows "- "
            Node::Mapping(child) => {
                let mut nested = String::new();
                write_mapping(&mut nested, child, depth + 1);
                push_compact(out, &nested, depth + 1);
            }
            Node::Sequence(nested_seq) => {
                let mut nested = String::new();
                write_sequence(&mut nested, nested_seq, depth + 1);
                push_compact(out, &nested, depth + 1);
            }
        }
    }
}

fn push_compact(out: &mut String, block: &str, depth: usize) {
    out.push(' ');
    out.push_str(&block[INDENT.len() * depth..]);
}

/// `{a: 1, b: [x, y]}`; nested block collections are written flow too.
fn flow_mapping(mapping: &Mapping) -> String {
    let entries: Vec<String> = mapping
        .iter()
        .map(|(key, node)| {
            let key_style = mapping.layout(key).and_then(|l| l.key_style);
            format!("{}: {}", render_key(key, key_style, true), flow_node(node))
        })
        .collect();
    format!("{{{}}}", entries.join(", "))
}

fn flow_sequence(seq: &Sequence) -> String {
    let items: Vec<String> = seq.items.iter().map(flow_node).collect();
    format!("[{}]", items.join(", "))
}

fn flow_node(node: &Node) -> String {
    match node {
        Node::Mapping(m) => flow_mapping(m),
        Node::Sequence(s) => flow_sequence(s),
        Node::Scalar(Scalar::Plain(raw)) if raw.is_empty() => "~".to_string(),
        Node::Scalar(scalar) => render_scalar(scalar, "", true).head,
    }
}

fn render_key(key: &str, style: Option<ScalarStyle>, flow: bool) -> Cow<'_, str> {
    let quotable = !key.contains('\n') && !needs_escapes(key);
    match style {
        Some(ScalarStyle::Plain) if is_plain_text(key, flow) => Cow::Borrowed(key),
        Some(ScalarStyle::SingleQuoted) if quotable => Cow::Owned(single_quoted(key, "")),
        Some(ScalarStyle::DoubleQuoted) => Cow::Owned(double_quoted(key)),
        _ if is_plain_text(key, flow) && !resolves_to_non_string(key) => Cow::Borrowed(key),
        _ if key.contains('"') && !key.contains('\'') && quotable => {
            Cow::Owned(single_quoted(key, ""))
        }
        _ => Cow::Owned(double_quoted(key)),
    }
}

/// Whether `value` reads back as the same string when written unquoted,
/// ignoring core-schema typing.
fn is_plain_text(value: &str, flow: bool) -> bool {
    !value.is_empty()
        && !value.contains('\n')
        && !value.starts_with("---")
        && !value.starts_with("...")
        && !needs_escapes(value)
        && !PLAIN_BLOCKER.is_match(value)
        && !(flow && value.contains([',', '[', ']', '{', '}']))
}

fn render_scalar(scalar: &Scalar, indent: &str, flow: bool) -> ScalarText {
    let (value, style) = match scalar {
        Scalar::Plain(raw) => return ScalarText::inline(raw.clone()),
        Scalar::Str(value, style) => (value, *style),
    };
    match style {
        ScalarStyle::Plain if is_plain_text(value, flow) && !resolves_to_non_string(value) => {
            ScalarText::inline(value.clone())
        }
        ScalarStyle::DoubleQuoted => ScalarText::inline(double_quoted(value)),
        ScalarStyle::Literal | ScalarStyle::Folded if !flow => {
            block_scalar(value, style == ScalarStyle::Folded, indent)
                .unwrap_or_else(|| default_quoted(value, indent, flow))
        }
        _ => default_quoted(value, indent, flow),
    }
}

/// Single quotes unless the value needs escapes or line breaks would not
/// survive folding.
fn default_quoted(value: &str, indent: &str, flow: bool) -> ScalarText {
    let quoted = if needs_escapes(value) || has_space_around_newline(value) || (flow && value.contains('\n'))
    {
        double_quoted(value)
    } else {
        single_quoted(value, indent)
    };
    ScalarText::inline(quoted)
}

/// `|` or `>` scalar with a chomping indicator matching the trailing line
/// breaks. `None` when the value cannot be written as a block.
fn block_scalar(value: &str, folded: bool, indent: &str) -> Option<ScalarText> {
    let content = value.trim_end_matches('\n');
    let breaks = value.len() - content.len();
    if content.is_empty()
        || needs_escapes(value)
        || content.trim_start_matches('\n').starts_with([' ', '\t'])
        || content.lines().any(|line| line.trim().is_empty() && !line.is_empty())
    {
        return None;
    }
    // more-indented lines are not folded; keep them literal
    let folded = folded && !content.split('\n').any(|line| line.starts_with([' ', '\t']));

    let chomp = match breaks {
        0 => "-",
        1 => "",
        _ => "+",
    };
    let mut head = String::from(if folded { ">" } else { "|" });
    head.push_str(chomp);

    let mut body = String::new();
    let mut previous_empty = false;
    for line in content.split('\n') {
        if folded && !previous_empty && !body.is_empty() {
            // a single break between two lines folds into a space
            body.push('\n');
        }
        body.push('\n');
        if !line.is_empty() {
            body.push_str(indent);
            body.push_str(line);
        }
        previous_empty = line.is_empty();
    }
    for _ in 1..breaks {
        body.push('\n');
    }
    Some(ScalarText { head, body })
}

/// Characters that only a double-quoted scalar can carry.
fn needs_escapes(value: &str) -> bool {
    value.chars().any(|c| {
        (c.is_control() && c != '\n' && c != '\t')
            || matches!(c, '\u{feff}' | '\u{2028}' | '\u{2029}')
    })
}

fn has_space_around_newline(value: &str) -> bool {
    ["\n ", "\n\t", " \n", "\t\n"]
        .iter()
        .any(|pattern| value.contains(pattern))
}

/// Single-quoted scalar; every run of line breaks gets one extra break and
/// the continuation is indented, so line folding restores the value.
fn single_quoted(value: &str, indent: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\'' => out.push_str("''"),
            '\n' => {
                out.push('\n');
                while chars.next_if_eq(&'\n').is_some() {
                    out.push('\n');
                }
                out.push('\n');
                out.push_str(indent);
            }
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

fn double_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\0' => out.push_str("\\0"),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\u{0b}' => out.push_str("\\v"),
            '\u{0c}' => out.push_str("\\f"),
            '\r' => out.push_str("\\r"),
            '\u{1b}' => out.push_str("\\e"),
            '\u{85}' => out.push_str("\\N"),
            '\u{2028}' => out.push_str("\\L"),
            '\u{2029}' => out.push_str("\\P"),
            '\u{feff}' => out.push_str("\\uFEFF"),
            c if c.is_control() => out.push_str(&format!("\\x{:02X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
