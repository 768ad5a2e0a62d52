//! Rewrite table
//!
//! Built from the `RewriteEngine`, `RewriteRule` and `ErrorDocument`
//! directives of a parsed document. Patterns are compiled once at load time.

use htaccess_parser::{Document, NodeRef};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

// `$1` becomes `${1}` so that a following letter is not read as part of the
// group name.
static BACKREFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(\d+)").expect("backreference pattern"));

/// One compiled `RewriteRule`
#[derive(Debug, Clone)]
pub struct RewriteRule {
    pub pattern: String,
    pub substitution: String,
    regex: Regex,
    replacement: String,
}

impl RewriteRule {
    fn compile(pattern: &str, substitution: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: pattern.to_string(),
            substitution: substitution.to_string(),
            regex: Regex::new(pattern)?,
            replacement: expand_backreferences(substitution),
        })
    }

    pub fn is_match(&self, url: &str) -> bool {
        self.regex.is_match(url)
    }

    /// Replace every match of the pattern in `url`
    pub fn apply(&self, url: &str) -> String {
        self.regex.replace_all(url, self.replacement.as_str()).into_owned()
    }
}

fn expand_backreferences(substitution: &str) -> String {
    BACKREFERENCE.replace_all(substitution, "$${${1}}").into_owned()
}

/// Rewrite rules in load order plus error documents by status code
#[derive(Debug, Clone, Default)]
pub struct RewriteTable {
    rules: Vec<RewriteRule>,
    error_documents: HashMap<String, String>,
}

impl RewriteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect rules from `doc`.
    ///
    /// Rewrite rules load only when the first `RewriteEngine` directive says
    /// `on`. Error documents load regardless.
    pub fn from_document(doc: &Document) -> Self {
        let mut table = Self::new();

        let engine_on = doc
            .find(|n| n.name() == "RewriteEngine")
            .is_some_and(|n| n.has_argument_value("on"));

        for node in doc.root().descendants() {
            match node.name() {
                "RewriteRule" if engine_on => {
                    if let Some((pattern, substitution)) = pair(node) {
                        table.add_rule(pattern, substitution);
                    }
                }
                "ErrorDocument" => {
                    if let Some((code, document)) = pair(node) {
                        table
                            .error_documents
                            .insert(code.to_string(), document.to_string());
                    }
                }
                _ => {}
            }
        }

        tracing::info!(
            rules = table.rules.len(),
            error_documents = table.error_documents.len(),
            engine_on,
            "loaded rewrite table"
        );
        table
    }

    /// Add or replace a rule. A pattern already present keeps its position
    /// and takes the new substitution.
    pub fn add_rule(&mut self, pattern: &str, substitution: &str) {
        let rule = match RewriteRule::compile(pattern, substitution) {
            Ok(rule) => rule,
            Err(e) => {
                tracing::warn!("Skipping RewriteRule {}: {}", pattern, e);
                return;
            }
        };
        match self.rules.iter_mut().find(|r| r.pattern == pattern) {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }
    }

    /// Rewrite `url` with the first matching rule
    pub fn rewrite(&self, url: &str) -> Option<String> {
        self.rules
            .iter()
            .find(|rule| rule.is_match(url))
            .map(|rule| rule.apply(url))
    }

    pub fn error_document(&self, code: &str) -> Option<&str> {
        self.error_documents.get(code).map(String::as_str)
    }

    pub fn rules(&self) -> &[RewriteRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty() && self.error_documents.is_empty()
    }
}

/// First two arguments, trimmed; `None` when either is missing or empty
fn pair<'a>(node: NodeRef<'a>) -> Option<(&'a str, &'a str)> {
    match node.arguments() {
        [first, second, ..] => {
            let (first, second) = (first.trim(), second.trim());
            (!first.is_empty() && !second.is_empty()).then_some((first, second))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTACCESS: &str = "\
<IfModule mod_rewrite.c>
    RewriteEngine On
    RewriteRule ^old/(.*)$ /new/$1 [R=301,L]
    RewriteRule ^blog/([0-9]+)$ /post.php?id=$1
    RewriteRule ^lonely$
</IfModule>
ErrorDocument 404 /missing.html
ErrorDocument 500 /oops.html
";

    #[test]
    fn test_rules_load_in_order() {
        let table = RewriteTable::from_document(&Document::parse(HTACCESS));
        let patterns: Vec<&str> = table.rules().iter().map(|r| r.pattern.as_str()).collect();
        assert_eq!(patterns, ["^old/(.*)$", "^blog/([0-9]+)$"]);
    }

    #[test]
    fn test_rewrite_with_backreference() {
        let table = RewriteTable::from_document(&Document::parse(HTACCESS));
        assert_eq!(table.rewrite("old/page").as_deref(), Some("/new/page"));
        assert_eq!(table.rewrite("blog/42").as_deref(), Some("/post.php?id=42"));
        assert_eq!(table.rewrite("other"), None);
    }

    #[test]
    fn test_backreference_followed_by_letters() {
        let mut table = RewriteTable::new();
        table.add_rule("^(a+)$", "/$1x");
        assert_eq!(table.rewrite("aa").as_deref(), Some("/aax"));
    }

    #[test]
    fn test_engine_off_skips_rules() {
        let doc =
            Document::parse("RewriteEngine off\nRewriteRule ^a$ /b\nErrorDocument 404 /x\n");
        let table = RewriteTable::from_document(&doc);
        assert!(table.rules().is_empty());
        assert_eq!(table.error_document("404"), Some("/x"));
    }

    #[test]
    fn test_no_engine_skips_rules() {
        let table = RewriteTable::from_document(&Document::parse("RewriteRule ^a$ /b\n"));
        assert!(table.is_empty());
    }

    #[test]
    fn test_engine_value_is_case_insensitive() {
        let doc = Document::parse("RewriteEngine ON\nRewriteRule ^a$ /b\n");
        let table = RewriteTable::from_document(&doc);
        assert_eq!(table.rewrite("a").as_deref(), Some("/b"));
    }

    #[test]
    fn test_duplicate_pattern_replaces_in_place() {
        let doc = Document::parse(
            "RewriteEngine on\n\
             RewriteRule ^a$ /first\n\
             RewriteRule ^b$ /bee\n\
             RewriteRule ^a$ /second\n",
        );
        let table = RewriteTable::from_document(&doc);
        assert_eq!(table.rules().len(), 2);
        assert_eq!(table.rules()[0].substitution, "/second");
        assert_eq!(table.rewrite("a").as_deref(), Some("/second"));
    }

    #[test]
    fn test_invalid_pattern_is_skipped() {
        let doc =
            Document::parse("RewriteEngine on\nRewriteRule ^(unclosed$ /x\nRewriteRule ^ok$ /y\n");
        let table = RewriteTable::from_document(&doc);
        assert_eq!(table.rules().len(), 1);
        assert_eq!(table.rewrite("ok").as_deref(), Some("/y"));
    }

    #[test]
    fn test_empty_pattern_or_code_is_skipped() {
        let doc = Document::parse(
            "RewriteEngine on\n\
             RewriteRule \"\" /everything\n\
             RewriteRule ^a$ \"  \"\n\
             ErrorDocument \"\" /x.html\n",
        );
        let table = RewriteTable::from_document(&doc);
        assert!(table.is_empty());
        assert_eq!(table.rewrite("anything"), None);
    }

    #[test]
    fn test_error_documents_later_wins() {
        let doc = Document::parse(
            "ErrorDocument 404 /a.html\nErrorDocument 404 /b.html\nErrorDocument 403\n",
        );
        let table = RewriteTable::from_document(&doc);
        assert_eq!(table.error_document("404"), Some("/b.html"));
        assert_eq!(table.error_document("403"), None);
    }
}
