//! Line classification
//!
//! Each line is trimmed and tested against the following rules; the first
//! match wins:
//! 1. `<Name args />`  self-closing block
//! 2. `</Name>`        block end (whitespace allowed around the slash)
//! 3. `<Name args>`    block start
//! 4. empty            blank line
//! 5. `# text`         comment
//! 6. `Name args`      directive
//!
//! Anything else is [`LineKind::Unknown`].

use regex::Regex;
use std::sync::LazyLock;

// With arguments, whitespace must precede `/>` so that `<Directory /srv/>`
// stays an open tag.
static BLOCK_BOTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<\s*(?P<name>[^\s>]+?)(?P<args>\s[^>]*)?\s/>$")
        .expect("self-closing block pattern")
});

static BLOCK_EMPTY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<\s*(?P<name>[^\s>/]+)\s*/>$").expect("empty block pattern"));

static BLOCK_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<\s*/\s*(?P<name>[^\s>]+)\s*>$").expect("block end pattern"));

static BLOCK_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<\s*(?P<name>[^\s>]+)(?P<args>(?:\s[^>]*)?)>$").expect("block start pattern")
});

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^# (?P<text>.+)$").expect("comment pattern"));

static DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<name>\S+)\s(?P<args>.+)$").expect("directive pattern"));

/// What a single line represents. Borrowed slices point into the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    BlockBoth { name: &'a str, args: &'a str },
    BlockEnd { name: &'a str },
    BlockStart { name: &'a str, args: &'a str },
    BlankLine,
    Comment { text: &'a str },
    Directive { name: &'a str, args: &'a str },
    Unknown,
}

/// Classify one input line
pub fn classify(line: &str) -> LineKind<'_> {
    let line = line.trim();

    if let Some(caps) = BLOCK_BOTH.captures(line).or_else(|| BLOCK_EMPTY.captures(line)) {
        return LineKind::BlockBoth {
            name: group(&caps, "name"),
            args: group(&caps, "args").trim(),
        };
    }
    if let Some(caps) = BLOCK_END.captures(line) {
        return LineKind::BlockEnd {
            name: group(&caps, "name"),
        };
    }
    if let Some(caps) = BLOCK_START.captures(line) {
        return LineKind::BlockStart {
            name: group(&caps, "name"),
            args: group(&caps, "args").trim(),
        };
    }
    if line.is_empty() {
        return LineKind::BlankLine;
    }
    if let Some(caps) = COMMENT.captures(line) {
        return LineKind::Comment {
            text: group(&caps, "text").trim(),
        };
    }
    if let Some(caps) = DIRECTIVE.captures(line) {
        return LineKind::Directive {
            name: group(&caps, "name"),
            args: group(&caps, "args").trim(),
        };
    }
    LineKind::Unknown
}

fn group<'a>(caps: &regex::Captures<'a>, name: &str) -> &'a str {
    caps.name(name).map_or("", |m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_closing_block() {
        assert_eq!(
            classify("<Limit GET POST />"),
            LineKind::BlockBoth {
                name: "Limit",
                args: "GET POST"
            }
        );
        assert_eq!(
            classify("  <Limit/>  "),
            LineKind::BlockBoth {
                name: "Limit",
                args: ""
            }
        );
    }

    #[test]
    fn test_trailing_slash_argument_opens_a_block() {
        assert_eq!(
            classify("<Directory /var/www/>"),
            LineKind::BlockStart {
                name: "Directory",
                args: "/var/www/"
            }
        );
        assert_eq!(
            classify("<Limit  GET   />"),
            LineKind::BlockBoth {
                name: "Limit",
                args: "GET"
            }
        );
    }

    #[test]
    fn test_block_end() {
        assert_eq!(
            classify("</IfModule>"),
            LineKind::BlockEnd { name: "IfModule" }
        );
        assert_eq!(
            classify("< / IfModule >"),
            LineKind::BlockEnd { name: "IfModule" }
        );
    }

    #[test]
    fn test_block_start() {
        assert_eq!(
            classify("<IfModule mod_rewrite.c>"),
            LineKind::BlockStart {
                name: "IfModule",
                args: "mod_rewrite.c"
            }
        );
        assert_eq!(
            classify("<Directory \"/var/www/my site\">"),
            LineKind::BlockStart {
                name: "Directory",
                args: "\"/var/www/my site\""
            }
        );
        assert_eq!(
            classify("<Files>"),
            LineKind::BlockStart {
                name: "Files",
                args: ""
            }
        );
    }

    #[test]
    fn test_blank_and_comment() {
        assert_eq!(classify(""), LineKind::BlankLine);
        assert_eq!(classify(" \t "), LineKind::BlankLine);
        assert_eq!(
            classify("  # Turn on rewriting  "),
            LineKind::Comment {
                text: "Turn on rewriting"
            }
        );
    }

    #[test]
    fn test_directive() {
        assert_eq!(
            classify("\tRewriteRule ^(.*)$ index.php [L]"),
            LineKind::Directive {
                name: "RewriteRule",
                args: "^(.*)$ index.php [L]"
            }
        );
        assert_eq!(
            classify("Options\t-Indexes"),
            LineKind::Directive {
                name: "Options",
                args: "-Indexes"
            }
        );
    }

    #[test]
    fn test_comment_without_space_is_a_directive() {
        assert_eq!(
            classify("#commented out"),
            LineKind::Directive {
                name: "#commented",
                args: "out"
            }
        );
    }

    #[test]
    fn test_unknown_lines() {
        assert_eq!(classify("<<<"), LineKind::Unknown);
        assert_eq!(classify("RewriteEngine"), LineKind::Unknown);
        assert_eq!(classify("#"), LineKind::Unknown);
        assert_eq!(classify("<IfModule"), LineKind::Unknown);
    }
}
