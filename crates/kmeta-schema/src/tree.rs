//! # Concrete Parser
//!
//! A small recursive-descent JSON parser that keeps, for every value, the
//! byte offset of its first character in the source text. It runs
//! independently of the `serde_json` parse used for validation; only this
//! tree's offsets are trusted for positioning.
//!
//! The grammar is RFC 8259: no comments, no trailing commas, nothing but
//! whitespace after the top-level value. Anything else yields `None`, which
//! callers treat as "cannot position".

use kmeta_core::PathSegment;

/// Maximum nesting of objects and arrays. Matches `serde_json`'s default
/// recursion limit, so both parses reject the same pathological inputs.
pub const MAX_DEPTH: usize = 128;

/// A value in the concrete tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// What kind of value this is, with its children.
    pub kind: NodeKind,
    /// Byte offset of the value's first character.
    pub offset: usize,
}

/// Node payload.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Members in source order, duplicates kept.
    Object(Vec<Property>),
    /// Elements in source order.
    Array(Vec<Node>),
    String(String),
    /// Raw number text.
    Number(String),
    Boolean(bool),
    Null,
}

/// An object member.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Decoded key.
    pub key: String,
    /// Member value.
    pub value: Node,
}

impl Node {
    /// Direct child addressed by `segment`.
    ///
    /// Key lookups on objects resolve to the last member with that key, the
    /// same member a `serde_json` parse keeps. Kind mismatches return `None`.
    pub fn child(&self, segment: &PathSegment) -> Option<&Node> {
        match (&self.kind, segment) {
            (NodeKind::Object(members), PathSegment::Key(key)) => members
                .iter()
                .rev()
                .find(|p| &p.key == key)
                .map(|p| &p.value),
            (NodeKind::Array(items), PathSegment::Index(index)) => items.get(*index),
            _ => None,
        }
    }

    /// Descendant addressed by `path`; the empty path is this node.
    pub fn find(&self, path: &[PathSegment]) -> Option<&Node> {
        path.iter().try_fold(self, |node, segment| node.child(segment))
    }
}

/// Parse `text` into a concrete tree.
pub fn parse(text: &str) -> Option<Node> {
    let mut parser = Parser {
        text,
        bytes: text.as_bytes(),
        pos: 0,
        depth: 0,
    };
    parser.skip_whitespace();
    let root = parser.value()?;
    parser.skip_whitespace();
    if parser.pos != parser.bytes.len() {
        return None;
    }
    Some(root)
}

struct Parser<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn eat(&mut self, expected: u8) -> Option<()> {
        if self.peek()? == expected {
            self.pos += 1;
            Some(())
        } else {
            None
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    fn node(&self, kind: NodeKind, start: usize) -> Node {
        Node {
            kind,
            offset: start,
        }
    }

    fn value(&mut self) -> Option<Node> {
        let start = self.pos;
        match self.peek()? {
            b'{' => self.nested(Self::object),
            b'[' => self.nested(Self::array),
            b'"' => {
                let s = self.string()?;
                Some(self.node(NodeKind::String(s), start))
            }
            b'-' | b'0'..=b'9' => {
                self.number()?;
                let raw = self.text[start..self.pos].to_string();
                Some(self.node(NodeKind::Number(raw), start))
            }
            b't' => self.literal("true", NodeKind::Boolean(true)),
            b'f' => self.literal("false", NodeKind::Boolean(false)),
            b'n' => self.literal("null", NodeKind::Null),
            _ => None,
        }
    }

    fn nested(&mut self, parse: fn(&mut Self) -> Option<Node>) -> Option<Node> {
        if self.depth >= MAX_DEPTH {
            return None;
        }
        self.depth += 1;
        let node = parse(self);
        self.depth -= 1;
        node
    }

    fn literal(&mut self, word: &str, kind: NodeKind) -> Option<Node> {
        let start = self.pos;
        if !self.text[start..].starts_with(word) {
            return None;
        }
        self.pos += word.len();
        Some(self.node(kind, start))
    }

    fn object(&mut self) -> Option<Node> {
        let start = self.pos;
        self.eat(b'{')?;
        let mut members = Vec::new();
        self.skip_whitespace();
        if self.eat(b'}').is_some() {
            return Some(self.node(NodeKind::Object(members), start));
        }
        loop {
            self.skip_whitespace();
            if self.peek()? != b'"' {
                return None;
            }
            let key = self.string()?;
            self.skip_whitespace();
            self.eat(b':')?;
            self.skip_whitespace();
            let value = self.value()?;
            members.push(Property { key, value });
            self.skip_whitespace();
            match self.peek()? {
                b',' => self.pos += 1,
                b'}' => {
                    self.pos += 1;
                    return Some(self.node(NodeKind::Object(members), start));
                }
                _ => return None,
            }
        }
    }

    fn array(&mut self) -> Option<Node> {
        let start = self.pos;
        self.eat(b'[')?;
        let mut items = Vec::new();
        self.skip_whitespace();
        if self.eat(b']').is_some() {
            return Some(self.node(NodeKind::Array(items), start));
        }
        loop {
            self.skip_whitespace();
            items.push(self.value()?);
            self.skip_whitespace();
            match self.peek()? {
                b',' => self.pos += 1,
                b']' => {
                    self.pos += 1;
                    return Some(self.node(NodeKind::Array(items), start));
                }
                _ => return None,
            }
        }
    }

    /// Parse a string starting at its opening quote and return it decoded.
    fn string(&mut self) -> Option<String> {
        self.eat(b'"')?;
        let mut out = String::new();
        let mut run = self.pos;
        loop {
            match self.peek()? {
                b'"' => {
                    out.push_str(&self.text[run..self.pos]);
                    self.pos += 1;
                    return Some(out);
                }
                b'\\' => {
                    out.push_str(&self.text[run..self.pos]);
                    self.pos += 1;
                    let escaped = self.peek()?;
                    self.pos += 1;
                    match escaped {
                        b'"' => out.push('"'),
                        b'\\' => out.push('\\'),
                        b'/' => out.push('/'),
                        b'b' => out.push('\u{8}'),
                        b'f' => out.push('\u{c}'),
                        b'n' => out.push('\n'),
                        b'r' => out.push('\r'),
                        b't' => out.push('\t'),
                        b'u' => out.push(self.unicode_escape()?),
                        _ => return None,
                    }
                    run = self.pos;
                }
                0x00..=0x1f => return None,
                _ => self.pos += 1,
            }
        }
    }

    /// Decode the digits after `\u`, joining surrogate pairs.
    fn unicode_escape(&mut self) -> Option<char> {
        let first = self.hex4()?;
        match first {
            0xD800..=0xDBFF => {
                self.eat(b'\\')?;
                self.eat(b'u')?;
                let second = self.hex4()?;
                if !(0xDC00..=0xDFFF).contains(&second) {
                    return None;
                }
                let combined = 0x10000 + ((first - 0xD800) << 10) + (second - 0xDC00);
                char::from_u32(combined)
            }
            0xDC00..=0xDFFF => None,
            _ => char::from_u32(first),
        }
    }

    fn hex4(&mut self) -> Option<u32> {
        let digits = self.bytes.get(self.pos..self.pos + 4)?;
        if !digits.iter().all(u8::is_ascii_hexdigit) {
            return None;
        }
        let digits = std::str::from_utf8(digits).ok()?;
        let value = u32::from_str_radix(digits, 16).ok()?;
        self.pos += 4;
        Some(value)
    }

    fn digits(&mut self) -> usize {
        let start = self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        self.pos - start
    }

    fn number(&mut self) -> Option<()> {
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        match self.peek()? {
            b'0' => self.pos += 1,
            b'1'..=b'9' => {
                self.digits();
            }
            _ => return None,
        }
        if self.peek() == Some(b'.') {
            self.pos += 1;
            if self.digits() == 0 {
                return None;
            }
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if self.digits() == 0 {
                return None;
            }
        }
        Some(())
    }
}
