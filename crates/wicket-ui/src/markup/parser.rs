//! Markup fragment parser.
//!
//! A practical subset of HTML tokenization sufficient for transcript
//! fragments: tags with attributes, text, comments, and raw-text content
//! for `<script>`/`<style>`. Malformed input is always handled gracefully;
//! the parser never panics. Unknown tags pass through as elements, stray
//! end tags are ignored, and unclosed elements are closed at end of input.

use super::dom::{Attribute, Fragment, NodeId, TagName};

/// Parse markup source into a fragment tree.
pub fn parse_fragment(source: &str) -> Fragment {
    Parser::new(source).run()
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    fragment: Fragment,
    /// Open element stack: (node id, tag).
    open: Vec<(NodeId, TagName)>,
}

impl Parser {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            fragment: Fragment::new(),
            open: Vec::new(),
        }
    }

    fn run(mut self) -> Fragment {
        let mut text = String::new();
        while let Some(ch) = self.peek() {
            if ch == '<' {
                if self.starts_with("<!--") {
                    self.flush_text(&mut text);
                    self.skip_comment();
                    continue;
                }
                if self.starts_with("</") {
                    self.flush_text(&mut text);
                    self.consume_end_tag();
                    continue;
                }
                if self
                    .chars
                    .get(self.pos + 1)
                    .is_some_and(|c| c.is_ascii_alphabetic())
                {
                    self.flush_text(&mut text);
                    self.consume_start_tag();
                    continue;
                }
                // A lone '<' is literal text.
                text.push('<');
                self.pos += 1;
            } else {
                text.push(ch);
                self.pos += 1;
            }
        }
        self.flush_text(&mut text);
        self.fragment
    }

    fn parent(&self) -> NodeId {
        self.open
            .last()
            .map(|(id, _)| *id)
            .unwrap_or(self.fragment.root)
    }

    fn flush_text(&mut self, text: &mut String) {
        if !text.is_empty() {
            let parent = self.parent();
            self.fragment.append_text(parent, std::mem::take(text));
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn starts_with(&self, s: &str) -> bool {
        s.chars()
            .enumerate()
            .all(|(i, c)| self.chars.get(self.pos + i) == Some(&c))
    }

    fn skip_comment(&mut self) {
        self.pos += 4; // "<!--"
        while self.pos < self.chars.len() && !self.starts_with("-->") {
            self.pos += 1;
        }
        self.pos = (self.pos + 3).min(self.chars.len());
    }

    fn consume_end_tag(&mut self) {
        self.pos += 2; // "</"
        let name = self.read_name();
        self.skip_to_tag_close();
        if name.is_empty() {
            return;
        }
        let tag = TagName::from_name(&name);
        // Pop to the matching open element; ignore stray end tags.
        if let Some(idx) = self.open.iter().rposition(|(_, t)| *t == tag) {
            self.open.truncate(idx);
        }
    }

    fn consume_start_tag(&mut self) {
        self.pos += 1; // "<"
        let name = self.read_name();
        let tag = TagName::from_name(&name);
        let mut attributes = Vec::new();
        let mut self_closing = false;

        loop {
            self.skip_whitespace();
            match self.peek() {
                None => break,
                Some('>') => {
                    self.pos += 1;
                    break;
                },
                Some('/') => {
                    self.pos += 1;
                    if self.peek() == Some('>') {
                        self.pos += 1;
                        self_closing = true;
                        break;
                    }
                },
                Some(_) => {
                    if let Some(attr) = self.read_attribute() {
                        attributes.push(attr);
                    }
                },
            }
        }

        let parent = self.parent();
        let id = self.fragment.append_element(parent, tag.clone(), attributes);

        if tag.is_raw_text() && !self_closing {
            let body = self.read_raw_text(&name);
            if !body.is_empty() {
                self.fragment.append_text(id, body);
            }
            return;
        }
        if !self_closing && !tag.is_void() {
            self.open.push((id, tag));
        }
    }

    fn read_name(&mut self) -> String {
        let mut name = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '-' {
                name.push(ch.to_ascii_lowercase());
                self.pos += 1;
            } else {
                break;
            }
        }
        name
    }

    fn read_attribute(&mut self) -> Option<Attribute> {
        let name = self.read_name();
        if name.is_empty() {
            // Unparseable character inside a tag: skip it.
            self.pos += 1;
            return None;
        }
        self.skip_whitespace();
        if self.peek() != Some('=') {
            return Some(Attribute {
                name,
                value: String::new(),
            });
        }
        self.pos += 1;
        self.skip_whitespace();
        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let mut v = String::new();
                while let Some(ch) = self.peek() {
                    self.pos += 1;
                    if ch == quote {
                        break;
                    }
                    v.push(ch);
                }
                v
            },
            _ => {
                let mut v = String::new();
                while let Some(ch) = self.peek() {
                    if ch.is_whitespace() || ch == '>' || ch == '/' {
                        break;
                    }
                    v.push(ch);
                    self.pos += 1;
                }
                v
            },
        };
        Some(Attribute { name, value })
    }

    /// Consume raw text up to the matching case-insensitive close tag.
    fn read_raw_text(&mut self, name: &str) -> String {
        let close: String = format!("</{name}");
        let mut body = String::new();
        while self.pos < self.chars.len() {
            if self.starts_with_ignore_case(&close) {
                self.pos += close.chars().count();
                self.skip_to_tag_close();
                return body;
            }
            body.push(self.chars[self.pos]);
            self.pos += 1;
        }
        body
    }

    fn starts_with_ignore_case(&self, s: &str) -> bool {
        s.chars().enumerate().all(|(i, c)| {
            self.chars
                .get(self.pos + i)
                .is_some_and(|got| got.eq_ignore_ascii_case(&c))
        })
    }

    fn skip_to_tag_close(&mut self) {
        while let Some(ch) = self.peek() {
            self.pos += 1;
            if ch == '>' {
                break;
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }
}
