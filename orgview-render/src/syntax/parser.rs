//! Block-level org parsing (org source → syntax tree)
//!
//! A line-oriented, single pass parser. It recognizes metadata constructs (keywords,
//! planning lines, drawers, clocks) but does not interpret them; that is left to
//! [`crate::transforms::normalize`]. Parsing never fails: constructs that are not
//! closed degrade to paragraph text.
//!
//! Drawers, quote blocks, special blocks and list items parse their bodies with a
//! fresh parser over the captured lines.

use super::inline::parse_inlines;
use super::nodes::{CheckboxState, Node, NodeKind};
use once_cell::sync::Lazy;
use regex::Regex;

static HEADLINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(\*+)\s+(?:(TODO|NEXT|WAITING|DONE|CANCELLED)(?:\s+|$))?(?:\[#([A-Za-z0-9])\]\s*)?(.*?)(?:\s+(:[\w@#%:]+:))?\s*$",
    )
    .expect("headline pattern compiles")
});

static PLANNING_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(SCHEDULED|DEADLINE|CLOSED):\s*([<\[][^>\]]*[>\]])")
        .expect("planning pattern compiles")
});

static DRAWER_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^:([\w-]+):\s*$").expect("drawer pattern compiles"));

static PROPERTY_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^:([^:\s]+):(?:\s+(.*?))?\s*$").expect("property pattern compiles")
});

static CLOCK_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^CLOCK:\s*(\[[^\]]*\](?:--\[[^\]]*\])?)(?:\s*=>\s*(\S+))?\s*$")
        .expect("clock pattern compiles")
});

static BLOCK_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^#\+BEGIN_(\w+)(?:\s+(.*?))?\s*$").expect("block pattern compiles")
});

static KEYWORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#\+(\w[\w-]*):(?:\s+(.*?))?\s*$").expect("keyword pattern compiles"));

static LIST_ITEM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\s*)([-+*]|\d+[.)])(?:\s+|$)(?:\[([ xX-])\](?:\s+|$))?(.*)$")
        .expect("list item pattern compiles")
});

static FOOTNOTE_DEFINITION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[fn:([\w-]+)\]\s*(.*)$").expect("footnote pattern compiles")
});

/// Parse org source into a syntax tree rooted at a `Document` node.
pub fn parse(source: &str) -> Node {
    let lines: Vec<&str> = source.lines().collect();
    let children = BlockParser::new(&lines).parse_blocks();
    log::trace!("parsed {} top-level blocks", children.len());
    Node::new(NodeKind::Document, children)
}

struct BlockParser<'a> {
    lines: &'a [&'a str],
    pos: usize,
}

impl<'a> BlockParser<'a> {
    fn new(lines: &'a [&'a str]) -> Self {
        Self { lines, pos: 0 }
    }

    fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).copied()
    }

    fn parse_blocks(&mut self) -> Vec<Node> {
        let mut nodes = Vec::new();
        while let Some(line) = self.peek() {
            if line.trim().is_empty() {
                self.pos += 1;
                continue;
            }
            nodes.push(self.parse_block(line));
        }
        nodes
    }

    fn parse_block(&mut self, line: &'a str) -> Node {
        let trimmed = line.trim();

        if let Some(node) = self.headline(line) {
            return node;
        }
        if let Some(node) = self.planning(trimmed) {
            return node;
        }
        if let Some(node) = self.drawer(trimmed) {
            return node;
        }
        if let Some(node) = self.clock(trimmed) {
            return node;
        }
        if let Some(node) = self.greater_block(trimmed) {
            return node;
        }
        if let Some(node) = self.keyword(trimmed) {
            return node;
        }
        if is_comment(trimmed) {
            self.pos += 1;
            let value = trimmed.trim_start_matches('#').trim();
            return Node::leaf(NodeKind::Comment {
                value: value.to_string(),
            });
        }
        if is_fixed_width(trimmed) {
            return self.fixed_width();
        }
        if is_rule(trimmed) {
            self.pos += 1;
            return Node::leaf(NodeKind::HorizontalRule);
        }
        if trimmed.starts_with('|') {
            return self.table();
        }
        if let Some(node) = self.footnote_definition(line) {
            return node;
        }
        if let Some(caps) = list_item(line) {
            return self.list(caps.indent);
        }
        self.paragraph()
    }

    fn headline(&mut self, line: &str) -> Option<Node> {
        let caps = HEADLINE.captures(line)?;
        self.pos += 1;
        let level = caps[1].len();
        let keyword = caps.get(2).map(|m| m.as_str().to_string());
        let priority = caps.get(3).and_then(|m| m.as_str().chars().next());
        let title = caps.get(4).map_or("", |m| m.as_str());
        let tags = caps
            .get(5)
            .map(|m| {
                m.as_str()
                    .split(':')
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Some(Node::new(
            NodeKind::Headline {
                level,
                keyword,
                priority,
                tags,
            },
            parse_inlines(title),
        ))
    }

    fn planning(&mut self, trimmed: &str) -> Option<Node> {
        if !["SCHEDULED:", "DEADLINE:", "CLOSED:"]
            .iter()
            .any(|k| trimmed.starts_with(k))
        {
            return None;
        }
        if !PLANNING_ENTRY.replace_all(trimmed, "").trim().is_empty() {
            return None;
        }
        let (mut scheduled, mut deadline, mut closed) = (None, None, None);
        for caps in PLANNING_ENTRY.captures_iter(trimmed) {
            let stamp = Some(caps[2].to_string());
            match &caps[1] {
                "SCHEDULED" => scheduled = stamp,
                "DEADLINE" => deadline = stamp,
                _ => closed = stamp,
            }
        }
        self.pos += 1;
        Some(Node::leaf(NodeKind::Planning {
            scheduled,
            deadline,
            closed,
        }))
    }

    fn drawer(&mut self, trimmed: &str) -> Option<Node> {
        let caps = DRAWER_START.captures(trimmed)?;
        let name = caps[1].to_string();
        if name.eq_ignore_ascii_case("END") {
            return None;
        }
        let end = self.find_line(self.pos + 1, |l| l.trim().eq_ignore_ascii_case(":END:"));
        let Some(end) = end else {
            log::warn!("drawer :{name}: is never closed; treating it as text");
            return None;
        };
        let lines = self.lines;
        let body = &lines[self.pos + 1..end];
        self.pos = end + 1;

        if name.eq_ignore_ascii_case("PROPERTIES") {
            let properties = body
                .iter()
                .filter_map(|l| PROPERTY_LINE.captures(l.trim()))
                .map(|c| {
                    let value = c.get(2).map_or("", |m| m.as_str());
                    (c[1].to_string(), value.to_string())
                })
                .collect();
            return Some(Node::leaf(NodeKind::PropertyDrawer { properties }));
        }

        let children = BlockParser::new(body).parse_blocks();
        Some(Node::new(NodeKind::Drawer { name }, children))
    }

    fn clock(&mut self, trimmed: &str) -> Option<Node> {
        let caps = CLOCK_LINE.captures(trimmed)?;
        self.pos += 1;
        let range = caps[1].to_string();
        let running = !range.contains("--");
        Some(Node::leaf(NodeKind::Clock {
            range,
            duration: caps.get(2).map(|m| m.as_str().to_string()),
            running,
        }))
    }

    fn greater_block(&mut self, trimmed: &str) -> Option<Node> {
        let caps = BLOCK_START.captures(trimmed)?;
        let name = caps[1].to_ascii_uppercase();
        let params = caps.get(2).map_or("", |m| m.as_str()).to_string();
        let end_marker = format!("#+END_{name}");
        let end = self.find_line(self.pos + 1, |l| {
            l.trim().eq_ignore_ascii_case(&end_marker)
        });
        let Some(end) = end else {
            log::warn!("block {name} is never closed; treating it as text");
            return None;
        };
        let lines = self.lines;
        let body = &lines[self.pos + 1..end];
        self.pos = end + 1;

        let first_param = params.split_whitespace().next().map(str::to_string);
        let node = match name.as_str() {
            "SRC" => Node::leaf(NodeKind::SrcBlock {
                language: first_param,
                value: dedent(body),
            }),
            "EXAMPLE" => Node::leaf(NodeKind::ExampleBlock {
                value: dedent(body),
            }),
            "EXPORT" => Node::leaf(NodeKind::ExportBlock {
                backend: first_param.unwrap_or_default().to_ascii_lowercase(),
                value: body.join("\n"),
            }),
            "QUOTE" => Node::new(NodeKind::QuoteBlock, BlockParser::new(body).parse_blocks()),
            _ => Node::new(
                NodeKind::SpecialBlock {
                    name: name.to_ascii_lowercase(),
                },
                BlockParser::new(body).parse_blocks(),
            ),
        };
        Some(node)
    }

    fn keyword(&mut self, trimmed: &str) -> Option<Node> {
        let caps = KEYWORD.captures(trimmed)?;
        self.pos += 1;
        Some(Node::leaf(NodeKind::Keyword {
            key: caps[1].to_string(),
            value: caps.get(2).map_or("", |m| m.as_str()).to_string(),
        }))
    }

    fn fixed_width(&mut self) -> Node {
        let mut lines = Vec::new();
        while let Some(line) = self.peek() {
            let trimmed = line.trim();
            if !is_fixed_width(trimmed) {
                break;
            }
            lines.push(trimmed.strip_prefix(": ").unwrap_or(""));
            self.pos += 1;
        }
        Node::leaf(NodeKind::ExampleBlock {
            value: lines.join("\n"),
        })
    }

    fn table(&mut self) -> Node {
        let mut rows: Vec<Vec<&str>> = Vec::new();
        let mut rule_at: Option<usize> = None;
        while let Some(line) = self.peek() {
            let trimmed = line.trim();
            if !trimmed.starts_with('|') {
                break;
            }
            self.pos += 1;
            if trimmed.starts_with("|-") {
                rule_at.get_or_insert(rows.len());
                continue;
            }
            let inner = trimmed.trim_start_matches('|');
            let inner = inner.strip_suffix('|').unwrap_or(inner);
            rows.push(inner.split('|').map(str::trim).collect());
        }

        let header_rows = match rule_at {
            Some(at) if at < rows.len() => at,
            _ => 0,
        };
        let children = rows
            .into_iter()
            .enumerate()
            .map(|(index, cells)| {
                let cells = cells
                    .into_iter()
                    .map(|cell| Node::new(NodeKind::TableCell, parse_inlines(cell)))
                    .collect();
                Node::new(
                    NodeKind::TableRow {
                        header: index < header_rows,
                    },
                    cells,
                )
            })
            .collect();
        Node::new(NodeKind::Table, children)
    }

    fn footnote_definition(&mut self, line: &str) -> Option<Node> {
        let caps = FOOTNOTE_DEFINITION.captures(line)?;
        self.pos += 1;
        let label = format!("[fn:{}]", &caps[1]);
        let mut content = vec![
            Node::leaf(NodeKind::Unknown {
                kind: "footnote-reference".to_string(),
                value: Some(label),
            }),
            Node::text(" "),
        ];
        content.extend(parse_inlines(&caps[2]));
        Some(Node::new(
            NodeKind::Unknown {
                kind: "footnote-definition".to_string(),
                value: None,
            },
            vec![Node::paragraph(content)],
        ))
    }

    fn list(&mut self, indent: usize) -> Node {
        let mut items = Vec::new();
        let mut ordered = None;
        let mut description = None;

        while let Some(line) = self.peek() {
            if line.trim().is_empty() {
                let next = self.lines[self.pos..]
                    .iter()
                    .position(|l| !l.trim().is_empty());
                match next.map(|offset| self.lines[self.pos + offset]) {
                    Some(next_line)
                        if list_item(next_line).is_some_and(|c| c.indent == indent) =>
                    {
                        self.pos += next.unwrap_or(0);
                        continue;
                    }
                    _ => break,
                }
            }
            let Some(item) = list_item(line) else { break };
            if item.indent != indent {
                break;
            }
            let item_ordered = item.bullet.starts_with(|c: char| c.is_ascii_digit());
            if *ordered.get_or_insert(item_ordered) != item_ordered {
                break;
            }
            self.pos += 1;
            let continuation = self.item_continuation(indent);
            let (node, is_description) = build_item(item, continuation);
            description.get_or_insert(is_description);
            items.push(node);
        }

        Node::new(
            NodeKind::List {
                ordered: ordered.unwrap_or(false),
                description: description.unwrap_or(false),
            },
            items,
        )
    }

    /// Lines indented deeper than the item's bullet, dedented by the bullet column.
    fn item_continuation(&mut self, indent: usize) -> Vec<&'a str> {
        let mut lines = Vec::new();
        while let Some(line) = self.peek() {
            if line.trim().is_empty() {
                let resumes = self
                    .lines
                    .get(self.pos + 1)
                    .is_some_and(|next| !next.trim().is_empty() && indentation(next) > indent);
                if !resumes {
                    break;
                }
                lines.push("");
                self.pos += 1;
                continue;
            }
            if indentation(line) <= indent {
                break;
            }
            lines.push(strip_indent(line, indent));
            self.pos += 1;
        }
        lines
    }

    fn paragraph(&mut self) -> Node {
        let mut lines = Vec::new();
        while let Some(line) = self.peek() {
            if line.trim().is_empty() || (!lines.is_empty() && starts_element(line)) {
                break;
            }
            lines.push(line.trim());
            self.pos += 1;
        }
        Node::paragraph(parse_inlines(&lines.join("\n")))
    }

    fn find_line(&self, from: usize, predicate: impl Fn(&str) -> bool) -> Option<usize> {
        (from..self.lines.len()).find(|&i| predicate(self.lines[i]))
    }
}

struct ListItemLine<'a> {
    indent: usize,
    bullet: &'a str,
    checkbox: CheckboxState,
    body: &'a str,
}

fn list_item(line: &str) -> Option<ListItemLine<'_>> {
    let caps = LIST_ITEM.captures(line)?;
    let indent = caps[1].chars().count();
    let bullet = caps.get(2)?.as_str();
    if bullet == "*" && indent == 0 {
        return None;
    }
    let checkbox = match caps.get(3).map(|m| m.as_str()) {
        Some("X") | Some("x") => CheckboxState::On,
        Some(" ") => CheckboxState::Off,
        Some("-") => CheckboxState::Partial,
        _ => CheckboxState::None,
    };
    Some(ListItemLine {
        indent,
        bullet,
        checkbox,
        body: caps.get(4).map_or("", |m| m.as_str()),
    })
}

fn build_item(item: ListItemLine<'_>, continuation: Vec<&str>) -> (Node, bool) {
    let term_split = item
        .body
        .split_once(" :: ")
        .or_else(|| item.body.strip_suffix(" ::").map(|term| (term, "")));

    let mut children = Vec::new();
    let mut lines: Vec<&str> = Vec::new();
    let is_description = match term_split {
        Some((term, rest)) => {
            children.push(Node::new(NodeKind::DescriptionTerm, parse_inlines(term.trim())));
            if !rest.trim().is_empty() {
                lines.push(rest.trim());
            }
            true
        }
        None => {
            if !item.body.trim().is_empty() {
                lines.push(item.body.trim());
            }
            false
        }
    };
    lines.extend(continuation);
    children.extend(BlockParser::new(&lines).parse_blocks());

    let node = Node::new(
        NodeKind::ListItem {
            checkbox: item.checkbox,
        },
        children,
    );
    (node, is_description)
}

fn starts_element(line: &str) -> bool {
    let trimmed = line.trim();
    HEADLINE.is_match(line)
        || list_item(line).is_some()
        || trimmed.starts_with("#+")
        || trimmed.starts_with('|')
        || DRAWER_START.is_match(trimmed)
        || CLOCK_LINE.is_match(trimmed)
        || is_rule(trimmed)
}

fn is_comment(trimmed: &str) -> bool {
    trimmed == "#" || trimmed.starts_with("# ")
}

fn is_fixed_width(trimmed: &str) -> bool {
    trimmed == ":" || trimmed.starts_with(": ")
}

fn is_rule(trimmed: &str) -> bool {
    trimmed.len() >= 5 && trimmed.chars().all(|c| c == '-')
}

/// Leading whitespace, in characters.
fn indentation(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// `line` without up to `count` leading whitespace characters.
fn strip_indent(line: &str, count: usize) -> &str {
    let start = line
        .char_indices()
        .take_while(|(_, c)| c.is_whitespace())
        .nth(count)
        .map_or(line.len() - line.trim_start().len(), |(i, _)| i);
    &line[start..]
}

fn dedent(lines: &[&str]) -> String {
    let common = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| indentation(l))
        .min()
        .unwrap_or(0);
    lines
        .iter()
        .map(|l| strip_indent(l, common).trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}
