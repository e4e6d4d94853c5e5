//! Inline markup: emphasis, code, links, math, sub/superscripts and line breaks.
//!
//! The scanner walks the text once, accumulating plain characters into a buffer that
//! is flushed as a `Text` node whenever a construct is recognized. Constructs that do
//! not close properly are left as plain text.

use super::nodes::{Emphasis, Node, NodeKind};

/// Parse a run of inline org markup into syntax nodes.
pub fn parse_inlines(text: &str) -> Vec<Node> {
    InlineParser::new(text).parse()
}

struct InlineParser<'a> {
    src: &'a str,
    pos: usize,
    out: Vec<Node>,
    buf: String,
}

const EMPHASIS_PRE: &[char] = &['-', '(', '{', '\'', '"'];
const EMPHASIS_POST: &[char] = &['-', '.', ',', ':', '!', '?', ';', '\'', '"', ')', '}', '['];

impl<'a> InlineParser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            out: Vec::new(),
            buf: String::new(),
        }
    }

    fn parse(mut self) -> Vec<Node> {
        while let Some(c) = self.current() {
            let consumed = match c {
                '\\' => self.line_break().or_else(|| self.latex_math()),
                '$' => self.dollar_math(),
                '[' => self.link().or_else(|| self.footnote_reference()),
                '*' | '/' | '_' | '+' | '=' | '~' => self.emphasis(c).or_else(|| self.script(c)),
                '^' => self.script(c),
                'h' => self.bare_link(),
                _ => None,
            };
            match consumed {
                Some((node, end)) => {
                    self.flush();
                    self.out.push(node);
                    self.pos = end;
                }
                None => {
                    self.buf.push(c);
                    self.pos += c.len_utf8();
                }
            }
        }
        self.flush();
        self.out
    }

    fn flush(&mut self) {
        if !self.buf.is_empty() {
            self.out.push(Node::text(std::mem::take(&mut self.buf)));
        }
    }

    fn current(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn previous(&self) -> Option<char> {
        self.src[..self.pos].chars().next_back()
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    /// `\\` at the end of a line.
    fn line_break(&self) -> Option<(Node, usize)> {
        let after = self.rest().strip_prefix("\\\\")?;
        let trailing = after.len() - after.trim_start_matches([' ', '\t']).len();
        let tail = &after[trailing..];
        if tail.is_empty() || tail.starts_with('\n') {
            let newline = usize::from(tail.starts_with('\n'));
            Some((
                Node::leaf(NodeKind::LineBreak),
                self.pos + 2 + trailing + newline,
            ))
        } else {
            None
        }
    }

    /// `\( … \)` and `\[ … \]`.
    fn latex_math(&self) -> Option<(Node, usize)> {
        let rest = self.rest();
        let close = if rest.starts_with("\\(") {
            "\\)"
        } else if rest.starts_with("\\[") {
            "\\]"
        } else {
            return None;
        };
        let inner_end = rest[2..].find(close)? + 2;
        let raw = &rest[..inner_end + 2];
        let value = &rest[2..inner_end];
        Some((math(raw, value), self.pos + raw.len()))
    }

    /// `$…$` and `$$…$$`. The value only drops one `$` from each side.
    fn dollar_math(&self) -> Option<(Node, usize)> {
        let rest = self.rest();
        if rest.starts_with("$$") {
            let close = rest[2..].find("$$")? + 2;
            if close == 2 {
                return None;
            }
            let raw = &rest[..close + 2];
            return Some((math(raw, &raw[1..raw.len() - 1]), self.pos + raw.len()));
        }
        let close = rest[1..].find('$')? + 1;
        let inner = &rest[1..close];
        if inner.is_empty()
            || inner.starts_with(char::is_whitespace)
            || inner.ends_with(char::is_whitespace)
        {
            return None;
        }
        let raw = &rest[..=close];
        Some((math(raw, inner), self.pos + raw.len()))
    }

    /// `[[path][description]]` and `[[path]]`.
    fn link(&self) -> Option<(Node, usize)> {
        let rest = self.rest().strip_prefix("[[")?;
        let end = rest.find("]]")?;
        let body = &rest[..end];
        let (path, children) = match body.split_once("][") {
            Some((path, description)) => (path, parse_inlines(description)),
            None => (body, Vec::new()),
        };
        if path.is_empty() {
            return None;
        }
        let node = Node::new(
            NodeKind::Link {
                path: path.to_string(),
            },
            children,
        );
        Some((node, self.pos + 2 + end + 2))
    }

    /// `[fn:label]`; kept generic.
    fn footnote_reference(&self) -> Option<(Node, usize)> {
        let rest = self.rest();
        let label = rest.strip_prefix("[fn:")?;
        let end = label.find(']')?;
        let name = &label[..end];
        if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            return None;
        }
        let raw = &rest[..4 + end + 1];
        let node = Node::leaf(NodeKind::Unknown {
            kind: "footnote-reference".to_string(),
            value: Some(raw.to_string()),
        });
        Some((node, self.pos + raw.len()))
    }

    /// Bare `http://` / `https://` links.
    fn bare_link(&self) -> Option<(Node, usize)> {
        let rest = self.rest();
        if !(rest.starts_with("http://") || rest.starts_with("https://")) {
            return None;
        }
        if self.previous().is_some_and(char::is_alphanumeric) {
            return None;
        }
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let url = rest[..end].trim_end_matches(['.', ',', ';', ':', '!', '?', ')', '"', '\'']);
        let node = Node::leaf(NodeKind::Link {
            path: url.to_string(),
        });
        Some((node, self.pos + url.len()))
    }

    fn emphasis(&self, marker: char) -> Option<(Node, usize)> {
        if let Some(prev) = self.previous() {
            if !(prev.is_whitespace() || EMPHASIS_PRE.contains(&prev)) {
                return None;
            }
        }
        let body = &self.rest()[1..];
        if body.starts_with(char::is_whitespace) || body.is_empty() {
            return None;
        }
        let mut search = 0;
        while let Some(offset) = body[search..].find(marker) {
            let close = search + offset;
            let inner = &body[..close];
            let after = body[close + 1..].chars().next();
            let valid_close = !inner.is_empty()
                && !inner.ends_with(char::is_whitespace)
                && after.map_or(true, |c| c.is_whitespace() || EMPHASIS_POST.contains(&c));
            if valid_close {
                let end = self.pos + 1 + close + 1;
                let node = match marker {
                    '=' => Node::leaf(NodeKind::Verbatim {
                        value: inner.to_string(),
                    }),
                    '~' => Node::code(inner),
                    _ => Node::new(
                        NodeKind::Emphasis {
                            style: emphasis_style(marker),
                        },
                        parse_inlines(inner),
                    ),
                };
                return Some((node, end));
            }
            search = close + 1;
        }
        None
    }

    /// `_{…}` / `^{…}` (braced) and `_word` / `^word` (unbraced) after a word character.
    fn script(&self, marker: char) -> Option<(Node, usize)> {
        if !matches!(marker, '_' | '^') || !self.previous().is_some_and(char::is_alphanumeric) {
            return None;
        }
        let body = &self.rest()[1..];
        let (braced, inner, consumed) = if let Some(braced_body) = body.strip_prefix('{') {
            let close = braced_body.find('}')?;
            (true, &braced_body[..close], close + 2)
        } else {
            let len = body
                .find(|c: char| !c.is_alphanumeric())
                .unwrap_or(body.len());
            (false, &body[..len], len)
        };
        if inner.is_empty() {
            return None;
        }
        let kind = if marker == '_' {
            NodeKind::Subscript { braced }
        } else {
            NodeKind::Superscript { braced }
        };
        let children = if braced {
            parse_inlines(inner)
        } else {
            vec![Node::text(inner)]
        };
        Some((Node::new(kind, children), self.pos + 1 + consumed))
    }
}

fn math(raw: &str, value: &str) -> Node {
    Node::leaf(NodeKind::Math {
        raw: raw.to_string(),
        value: value.to_string(),
    })
}

fn emphasis_style(marker: char) -> Emphasis {
    match marker {
        '*' => Emphasis::Bold,
        '/' => Emphasis::Italic,
        '_' => Emphasis::Underline,
        _ => Emphasis::Strike,
    }
}
