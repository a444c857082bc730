//! token view of an attribute
//!
//! [hcl_edit] does not keep a token list. Whitespace and comments around a node live in its [Decor] (a raw prefix
//! and suffix string). To extract values the way a token based writer would, we flatten an [Attribute] into
//! [Tokens]:
//!
//! ```text
//! # note          <- attribute decor prefix (Comment, Newline)
//! ami = "x" # c   <- Ident, Whitespace, Equal, Whitespace, Expr, Whitespace, Comment
//! ```
//!
//! Comments inside the value itself (`{ # first` or `1 /* c */ + 2`) are split out of the rendered expression as
//! well. String literals and heredocs are skipped while looking for them.
//!
//! Only [TokenKind::Equal] and [TokenKind::Comment] carry meaning for [crate::value], everything else is opaque text.
use hcl_edit::structure::Attribute;
use hcl_edit::{Decor, Decorate};
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// attribute key
    Ident,
    /// the `=` between key and value
    Equal,
    /// a piece of the value expression, rendered verbatim
    Expr,
    Whitespace,
    Newline,
    Comment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokens(Vec<Token>);

impl Tokens {
    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.0
    }

    fn push(&mut self, kind: TokenKind, text: impl Into<String>) {
        self.0.push(Token::new(kind, text));
    }

    fn push_decor_prefix(&mut self, decor: &Decor) {
        if let Some(prefix) = decor.prefix() {
            self.push_decor(prefix);
        }
    }

    fn push_decor_suffix(&mut self, decor: &Decor) {
        if let Some(suffix) = decor.suffix() {
            self.push_decor(suffix);
        }
    }

    /// Scans raw decor text into whitespace, newline and comment tokens
    fn push_decor(&mut self, raw: &str) {
        let mut rest = raw;
        while let Some(first) = rest.chars().next() {
            let (kind, len) = if rest.starts_with('#') || rest.starts_with("//") {
                (TokenKind::Comment, rest.find(['\r', '\n']).unwrap_or(rest.len()))
            } else if rest.starts_with("/*") {
                let len = rest[2..].find("*/").map_or(rest.len(), |end| end + 4);
                (TokenKind::Comment, len)
            } else if rest.starts_with("\r\n") {
                (TokenKind::Newline, 2)
            } else if first == '\n' {
                (TokenKind::Newline, 1)
            } else {
                (TokenKind::Whitespace, whitespace_len(rest).max(first.len_utf8()))
            };

            let (text, tail) = rest.split_at(len);
            self.push(kind, text);
            rest = tail;
        }
    }

    /// Splits a rendered expression into expression pieces and the comments between them
    fn push_expr(&mut self, expr: &str) {
        let mut rest = expr;
        while let Some(comment) = find_comment(rest) {
            if comment.start > 0 {
                self.push(TokenKind::Expr, &rest[..comment.start]);
            }
            self.push(TokenKind::Comment, &rest[comment.clone()]);
            rest = &rest[comment.end..];
        }

        if !rest.is_empty() {
            self.push(TokenKind::Expr, rest);
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Context {
    /// expression code, `braces` counts open `{` so a template interpolation knows where it ends
    Code { braces: usize },
    /// inside a quoted string
    Quoted,
}

/// Byte range of the first comment in expression source, ignoring string literals and heredocs
fn find_comment(expr: &str) -> Option<Range<usize>> {
    let mut stack = vec![Context::Code { braces: 0 }];
    let mut pos = 0;

    while let Some(current) = expr[pos..].chars().next() {
        let tail = &expr[pos..];
        let mut len = current.len_utf8();

        match stack.last().copied() {
            Some(Context::Quoted) => {
                if tail.starts_with('\\') {
                    len += tail[1..].chars().next().map_or(0, char::len_utf8);
                } else if tail.starts_with("$${") || tail.starts_with("%%{") {
                    len = 3;
                } else if tail.starts_with("${") || tail.starts_with("%{") {
                    stack.push(Context::Code { braces: 0 });
                    len = 2;
                } else if current == '"' {
                    stack.pop();
                }
            }
            Some(Context::Code { braces }) => {
                if tail.starts_with('#') || tail.starts_with("//") {
                    let end = tail.find(['\r', '\n']).map_or(expr.len(), |end| pos + end);
                    return Some(pos..end);
                } else if tail.starts_with("/*") {
                    let end = tail[2..].find("*/").map_or(expr.len(), |end| pos + end + 4);
                    return Some(pos..end);
                } else if current == '"' {
                    stack.push(Context::Quoted);
                } else if let Some(heredoc) = heredoc_len(tail) {
                    len = heredoc;
                } else if current == '{' || current == '}' {
                    if current == '}' && braces == 0 && stack.len() > 1 {
                        stack.pop();
                    } else if let Some(Context::Code { braces }) = stack.last_mut() {
                        *braces = if current == '{' {
                            *braces + 1
                        } else {
                            braces.saturating_sub(1)
                        };
                    }
                }
            }
            None => return None,
        }

        pos += len;
    }

    None
}

/// Length of a heredoc (`<<EOT` or `<<-EOT` up to and including its closing marker line)
///
/// `None` when `tail` does not open a heredoc. An unterminated heredoc runs to the end.
fn heredoc_len(tail: &str) -> Option<usize> {
    if !tail.starts_with("<<") {
        return None;
    }

    let start = if tail.starts_with("<<-") { 3 } else { 2 };
    let marker_len = tail[start..]
        .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '-'))
        .unwrap_or(tail.len() - start);
    if marker_len == 0 {
        return None;
    }

    let marker = &tail[start..start + marker_len];
    let after_marker = &tail[start + marker_len..];
    let newline = if after_marker.starts_with("\r\n") {
        2
    } else if after_marker.starts_with('\n') {
        1
    } else {
        return None;
    };

    let mut offset = start + marker_len + newline;
    for line in tail[offset..].split_inclusive('\n') {
        offset += line.len();
        if line.trim() == marker {
            return Some(offset);
        }
    }

    Some(tail.len())
}

/// Length of the leading run that is neither a newline nor the start of a comment
fn whitespace_len(text: &str) -> usize {
    text.char_indices()
        .find(|(pos, _)| {
            let tail = &text[*pos..];
            tail.starts_with(['\n', '#'])
                || tail.starts_with("\r\n")
                || tail.starts_with("//")
                || tail.starts_with("/*")
        })
        .map_or(text.len(), |(pos, _)| pos)
}

impl From<Vec<Token>> for Tokens {
    fn from(value: Vec<Token>) -> Self {
        Self(value)
    }
}

impl<'a> IntoIterator for &'a Tokens {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<&Attribute> for Tokens {
    fn from(attribute: &Attribute) -> Self {
        let mut tokens = Tokens::default();

        tokens.push_decor_prefix(attribute.decor());

        tokens.push_decor_prefix(attribute.key.decor());
        tokens.push(TokenKind::Ident, attribute.key.value().as_str());
        tokens.push_decor_suffix(attribute.key.decor());

        tokens.push(TokenKind::Equal, "=");

        let value = &attribute.value;
        tokens.push_decor_prefix(value.decor());
        let mut bare_value = value.clone();
        *bare_value.decor_mut() = Decor::default();
        tokens.push_expr(&bare_value.to_string());
        tokens.push_decor_suffix(value.decor());

        tokens.push_decor_suffix(attribute.decor());

        tracing::trace!(?tokens, "attribute tokens");
        tokens
    }
}

impl std::fmt::Display for Tokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.iter().try_for_each(|token| f.write_str(&token.text))
    }
}
