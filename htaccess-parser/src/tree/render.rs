//! Text reconstruction
//!
//! Output is rebuilt from the current names, arguments and children on every
//! call. Each line is indented by one indent unit per level, and a block is
//! written self-closing exactly when it has no children.

use super::arguments::Arguments;
use super::node::NodeKind;
use super::node_ref::NodeRef;
use serde::{Deserialize, Serialize};

/// Line terminator used when rendering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// Rendering configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Repeated once per level in front of every line
    pub indent: String,
    pub line_ending: LineEnding,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent: "\t".to_string(),
            line_ending: LineEnding::Lf,
        }
    }
}

/// `<Name "a" "b">`, or `<Name "a" "b" />` when self-closing
pub(crate) fn start_tag(name: &str, arguments: &Arguments, self_closing: bool) -> String {
    let mut tag = format!("<{}", name);
    if !arguments.is_empty() {
        tag.push(' ');
        tag.push_str(&arguments.to_string());
    }
    tag.push_str(if self_closing { " />" } else { ">" });
    tag
}

pub(crate) fn end_tag(name: &str) -> String {
    format!("</{}>", name)
}

/// `Name "a" "b"`
pub(crate) fn directive_line(name: &str, arguments: &Arguments) -> String {
    if arguments.is_empty() {
        name.to_string()
    } else {
        format!("{} {}", name, arguments)
    }
}

/// Render `node` and its subtree.
///
/// A document renders its children with a line ending after every line; any
/// other node omits the final line ending.
pub(crate) fn render(node: NodeRef<'_>, options: &RenderOptions) -> String {
    let mut out = String::new();
    write_node(node, options, &mut out);
    if !matches!(node.payload(), NodeKind::Document { .. }) {
        let ending = options.line_ending.as_str();
        if out.ends_with(ending) {
            out.truncate(out.len() - ending.len());
        }
    }
    out
}

enum Step<'a> {
    Open(NodeRef<'a>, usize),
    Close(&'a str, usize),
}

fn write_node(node: NodeRef<'_>, options: &RenderOptions, out: &mut String) {
    let ending = options.line_ending.as_str();
    let mut stack = vec![Step::Open(node, node.level())];

    while let Some(step) = stack.pop() {
        let (node, level) = match step {
            Step::Open(node, level) => (node, level),
            Step::Close(name, level) => {
                push_indent(out, &options.indent, level);
                out.push_str(&end_tag(name));
                out.push_str(ending);
                continue;
            }
        };

        match node.payload() {
            NodeKind::Document { .. } => {
                stack.extend(node.children().rev().map(|c| Step::Open(c, level + 1)));
            }
            NodeKind::Block { name, arguments } => {
                push_indent(out, &options.indent, level);
                out.push_str(&start_tag(name, arguments, !node.has_children()));
                out.push_str(ending);
                if node.has_children() {
                    stack.push(Step::Close(name, level));
                    stack.extend(node.children().rev().map(|c| Step::Open(c, level + 1)));
                }
            }
            NodeKind::Directive { name, arguments } => {
                push_indent(out, &options.indent, level);
                out.push_str(&directive_line(name, arguments));
                out.push_str(ending);
            }
            NodeKind::Comment { text } => {
                push_indent(out, &options.indent, level);
                out.push_str("# ");
                out.push_str(text);
                out.push_str(ending);
            }
            NodeKind::BlankLine => out.push_str(ending),
        }
    }
}

fn push_indent(out: &mut String, indent: &str, level: usize) {
    for _ in 0..level {
        out.push_str(indent);
    }
}
