//! Line parser
//!
//! Builds a [`Document`] from `.htaccess` text, one classified line at a
//! time. A block start opens a new container and the next close tag returns
//! to the enclosing one.

use super::classifier::{classify, LineKind};
use super::diagnostic::{Diagnostic, DiagnosticKind};
use super::lexer::{tokenize_arguments, Location};
use crate::tree::{Document, NodeId, NodeKind};
use std::borrow::Cow;

/// Convert `\r\n` and lone `\r` to `\n`
pub fn normalize_line_endings(source: &str) -> Cow<'_, str> {
    if !source.contains('\r') {
        return Cow::Borrowed(source);
    }
    Cow::Owned(source.replace("\r\n", "\n").replace('\r', "\n"))
}

/// Parse `.htaccess` text. Never fails; problems end up in
/// [`Document::diagnostics`].
pub fn parse(source: &str) -> Document {
    let normalized = normalize_line_endings(source).into_owned();
    let mut doc = Document::with_source(normalized.clone());
    Parser::new(&normalized).parse_into(&mut doc);
    tracing::debug!(
        nodes = doc.root().node_count(true),
        diagnostics = doc.diagnostics().len(),
        "parsed document"
    );
    doc
}

#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    /// 1-based
    number: usize,
    text: &'a str,
    span: Location,
}

/// Block currently being filled
#[derive(Debug, Clone, Copy)]
struct OpenBlock<'a> {
    name: &'a str,
    line: Line<'a>,
}

/// Parser state over normalized source lines
pub struct Parser<'a> {
    lines: Vec<Line<'a>>,
    pos: usize,
}

impl<'a> Parser<'a> {
    /// `source` must already have `\n` line endings
    pub fn new(source: &'a str) -> Self {
        let mut lines = Vec::new();
        let mut offset = 0;
        for (index, raw) in source.split_inclusive('\n').enumerate() {
            let text = raw.strip_suffix('\n').unwrap_or(raw);
            lines.push(Line {
                number: index + 1,
                text,
                span: Location {
                    start: offset,
                    end: offset + text.len(),
                },
            });
            offset += raw.len();
        }
        Self { lines, pos: 0 }
    }

    /// Parse into the root of `doc`.
    ///
    /// Open blocks are kept on an explicit stack: a start tag pushes, a close
    /// tag pops exactly one level, and lines attach to the innermost open
    /// block or to the root.
    pub fn parse_into(mut self, doc: &mut Document) {
        let root = doc.root_id();
        let mut open: Vec<(NodeId, OpenBlock<'a>)> = Vec::new();

        while let Some(line) = self.next_line() {
            let container = open.last().map_or(root, |(id, _)| *id);
            match classify(line.text) {
                LineKind::BlockBoth { name, args } => {
                    doc.push_child(container, block(name, args));
                }
                LineKind::BlockStart { name, args } => {
                    let id = doc.push_child(container, block(name, args));
                    tracing::trace!(block = name, line = line.number, "open block");
                    open.push((id, OpenBlock { name, line }));
                }
                LineKind::BlockEnd { name: close } => match open.pop() {
                    Some((_, block)) => {
                        if !block.name.eq_ignore_ascii_case(close) {
                            tracing::debug!(
                                open = block.name,
                                close,
                                line = line.number,
                                "close tag does not match open block"
                            );
                            record(
                                doc,
                                line,
                                DiagnosticKind::MismatchedClose {
                                    open: block.name.to_string(),
                                    close: close.to_string(),
                                },
                            );
                        }
                    }
                    None => {
                        tracing::debug!(close, line = line.number, "close tag without open block");
                        record(
                            doc,
                            line,
                            DiagnosticKind::StrayClose {
                                close: close.to_string(),
                            },
                        );
                    }
                },
                LineKind::BlankLine => {
                    doc.push_child(container, NodeKind::BlankLine);
                }
                LineKind::Comment { text } => {
                    doc.push_child(
                        container,
                        NodeKind::Comment {
                            text: text.to_string(),
                        },
                    );
                }
                LineKind::Directive { name, args } => {
                    doc.push_child(
                        container,
                        NodeKind::Directive {
                            name: name.to_string(),
                            arguments: tokenize_arguments(args).into(),
                        },
                    );
                }
                LineKind::Unknown => {
                    tracing::debug!(line = line.number, text = line.text, "dropping line");
                    record(
                        doc,
                        line,
                        DiagnosticKind::DroppedLine {
                            text: line.text.trim().to_string(),
                        },
                    );
                }
            }
        }

        // Innermost first
        while let Some((_, block)) = open.pop() {
            tracing::debug!(block = block.name, line = block.line.number, "block never closed");
            record(
                doc,
                block.line,
                DiagnosticKind::UnclosedBlock {
                    name: block.name.to_string(),
                },
            );
        }
    }

    fn next_line(&mut self) -> Option<Line<'a>> {
        let line = self.lines.get(self.pos).copied();
        if line.is_some() {
            self.pos += 1;
        }
        line
    }
}

fn block(name: &str, args: &str) -> NodeKind {
    NodeKind::Block {
        name: name.to_string(),
        arguments: tokenize_arguments(args).into(),
    }
}

fn record(doc: &mut Document, line: Line<'_>, kind: DiagnosticKind) {
    doc.push_diagnostic(Diagnostic::new(line.number, line.span, kind));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NodeType;

    const HTACCESS: &str = "\
# Rewrite setup
<IfModule mod_rewrite.c>
    RewriteEngine On
    RewriteRule ^old/(.*)$ /new/$1 [R=301,L]
</IfModule>
ErrorDocument 404 /missing.html
";

    fn kinds(doc: &Document) -> Vec<NodeType> {
        doc.root().children().map(|n| n.kind()).collect()
    }

    #[test]
    fn test_parse_structure() {
        let doc = parse(HTACCESS);
        assert!(doc.diagnostics().is_empty());
        assert_eq!(
            kinds(&doc),
            [NodeType::Comment, NodeType::Block, NodeType::Directive]
        );

        let block = doc.root().child(1).unwrap();
        assert_eq!(block.name(), "IfModule");
        assert_eq!(block.arguments(), ["mod_rewrite.c"]);
        assert_eq!(block.child_count(), 2);

        let rule = block.child(1).unwrap();
        assert_eq!(rule.name(), "RewriteRule");
        assert_eq!(rule.arguments(), ["^old/(.*)$", "/new/$1", "[R=301,L]"]);
        assert_eq!(rule.level(), 2);
        assert_eq!(rule.parent().unwrap().id(), block.id());
    }

    #[test]
    fn test_round_trip_preserves_structure() {
        let first = parse(HTACCESS);
        let second = parse(&first.render());
        assert_eq!(first.snapshot(), second.snapshot());
        assert_eq!(first.render(), second.render());
    }

    #[test]
    fn test_self_closing_round_trip() {
        let doc = parse("<Limit GET POST />\n");
        let limit = doc.root().first_child().unwrap();
        assert_eq!(limit.kind(), NodeType::Block);
        assert!(!limit.has_children());
        assert_eq!(limit.render(), "\t<Limit \"GET\" \"POST\" />");
    }

    #[test]
    fn test_blank_lines_are_kept() {
        let doc = parse("A b\n\n\n\nC d\n");
        assert_eq!(
            kinds(&doc),
            [
                NodeType::Directive,
                NodeType::BlankLine,
                NodeType::BlankLine,
                NodeType::BlankLine,
                NodeType::Directive,
            ]
        );
    }

    #[test]
    fn test_unknown_line_is_dropped() {
        let doc = parse("A b\n<<<\nC d\n");
        assert_eq!(kinds(&doc), [NodeType::Directive, NodeType::Directive]);
        assert_eq!(doc.diagnostics().len(), 1);

        let diagnostic = &doc.diagnostics()[0];
        assert_eq!(diagnostic.line, 2);
        assert_eq!(diagnostic.span, Location { start: 4, end: 7 });
        assert_eq!(
            diagnostic.kind,
            DiagnosticKind::DroppedLine {
                text: "<<<".to_string()
            }
        );
    }

    #[test]
    fn test_crlf_is_normalized() {
        let doc = parse("<Files x>\r\nDeny all\r\n</Files>\r\n");
        assert_eq!(doc.source(), "<Files x>\nDeny all\n</Files>\n");
        assert_eq!(doc.root().child_count(), 1);
        assert_eq!(doc.root().first_child().unwrap().child_count(), 1);
    }

    #[test]
    fn test_quoted_arguments() {
        let doc = parse("Name \"a b\" c\n");
        assert_eq!(doc.root().first_child().unwrap().arguments(), ["a b", "c"]);
    }

    #[test]
    fn test_close_tag_closes_innermost_block() {
        let doc = parse("<IfModule a>\n<Files b>\nX y\n</IfModule>\nZ w\n</IfModule>\n");
        let outer = doc.root().first_child().unwrap();
        let files = outer.first_child().unwrap();
        assert_eq!(files.name(), "Files");
        assert_eq!(files.child_count(), 1);
        assert_eq!(outer.child_count(), 2);
        assert_eq!(outer.last_child().unwrap().name(), "Z");
        assert_eq!(
            doc.diagnostics()[0].kind,
            DiagnosticKind::MismatchedClose {
                open: "Files".to_string(),
                close: "IfModule".to_string()
            }
        );
        assert_eq!(doc.diagnostics()[0].line, 4);
    }

    #[test]
    fn test_close_tag_case_is_not_a_mismatch() {
        let doc = parse("<ifmodule a>\nX y\n</IfModule>\n");
        assert!(doc.diagnostics().is_empty());
    }

    #[test]
    fn test_stray_close_is_skipped() {
        let doc = parse("</Files>\nA b\n");
        assert_eq!(kinds(&doc), [NodeType::Directive]);
        assert_eq!(
            doc.diagnostics()[0].kind,
            DiagnosticKind::StrayClose {
                close: "Files".to_string()
            }
        );
    }

    #[test]
    fn test_unclosed_block_keeps_contents() {
        let doc = parse("<Files x>\nDeny all\n");
        let files = doc.root().first_child().unwrap();
        assert_eq!(files.child_count(), 1);
        assert_eq!(doc.diagnostics()[0].line, 1);
        assert!(doc.validate().is_err());
    }

    #[test]
    fn test_last_line_without_ending() {
        let doc = parse("A b\nC d");
        assert_eq!(doc.root().child_count(), 2);
        assert_eq!(doc.root().last_child().unwrap().arguments(), ["d"]);
    }

    #[test]
    fn test_unterminated_quote_round_trip() {
        let first = parse("ErrorDocument 403 \"Sorry not allowed\n");
        let error_document = first.root().first_child().unwrap();
        assert_eq!(error_document.arguments(), ["403", "\"Sorry", "not", "allowed"]);

        let second = parse(&first.render());
        assert_eq!(first.snapshot(), second.snapshot());
    }

    #[test]
    fn test_embedded_quote_round_trip() {
        let first = parse("Header set X a\"b\n");
        assert_eq!(first.root().first_child().unwrap().arguments(), ["set", "X", "a\"b"]);
        assert_eq!(first.render(), "\tHeader \"set\" \"X\" \"a\\\"b\"\n");

        let second = parse(&first.render());
        assert_eq!(first.snapshot(), second.snapshot());
        assert_eq!(first.render(), second.render());
    }

    #[test]
    fn test_deep_nesting() {
        let depth = 20_000;
        let source = format!("{}{}", "<A>\n".repeat(depth), "</A>\n".repeat(depth));
        let doc = parse(&source);
        assert!(doc.diagnostics().is_empty());
        assert_eq!(doc.root().node_count(true), depth);

        let innermost = doc.root().descendants().last().unwrap();
        assert_eq!(innermost.level(), depth);

        let unclosed = parse(&"<A>\n".repeat(depth));
        assert_eq!(unclosed.diagnostics().len(), depth);
        assert_eq!(unclosed.diagnostics()[0].line, depth);
    }

    #[test]
    fn test_parse_into_existing_document() {
        let mut doc = Document::new();
        Parser::new("A b\n").parse_into(&mut doc);
        assert_eq!(doc.root().child_count(), 1);
    }
}
