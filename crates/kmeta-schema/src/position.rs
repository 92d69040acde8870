//! # Position Mapping
//!
//! Converts a violation's data path into a text range by walking the
//! concrete tree to the offending value and then scanning the source text.
//!
//! ## Range Heuristic
//!
//! The start of the range is exact: the line and column of the value's
//! first character. The end is a heuristic rather than the value's true
//! syntactic end. Starting at the value, characters are counted until a
//! newline (the count stands), a comma (the count is reduced by one) or the
//! end of the text. The count is added to the start column.
//!
//! For a scalar that ends its line this covers the whole value. Before a
//! comma the range stops one character short of it, so a quoted string
//! loses its closing quote. A nested object or array that spans several
//! lines is cut at the end of its first line, and one written on a single
//! line is cut at its first inner comma. The end always stays on the start
//! line. Editors only need something to underline, so this is kept as is.
//!
//! Columns count UTF-16 code units, the Language Server Protocol's default
//! position encoding. For ASCII text that is the character count.

use kmeta_core::{PathSegment, Position, Range};

use crate::tree::Node;

/// A located value: start line and column, plus the heuristic end column on
/// the same line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Located {
    pub line: u32,
    pub column: u32,
    pub end_column: u32,
}

impl Located {
    /// The single-line range this location covers.
    pub fn range(&self) -> Range {
        Range::new(
            Position::new(self.line, self.column),
            Position::new(self.line, self.end_column),
        )
    }
}

/// Locate the value at `path` in `text`.
///
/// Returns `None` for the empty path (root violations are not located) and
/// for paths that do not resolve in `tree`.
pub fn locate(text: &str, tree: &Node, path: &[PathSegment]) -> Option<Located> {
    if path.is_empty() {
        return None;
    }
    let node = tree.find(path)?;
    Some(locate_offset(text, node.offset))
}

/// Line, column and heuristic end column for the byte `offset` in `text`.
///
/// This is a linear scan from the start of the text on every call; metadata
/// files are a few hundred bytes. Offsets past the end or inside a multi-byte
/// character are clamped back to the previous character boundary.
pub fn locate_offset(text: &str, offset: usize) -> Located {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    let (head, tail) = text.split_at(offset);

    let mut line = 0u32;
    let mut column = 0u32;
    for c in head.chars() {
        if c == '\n' {
            line = line.saturating_add(1);
            column = 0;
        } else {
            column = column.saturating_add(utf16_width(c));
        }
    }

    let mut extent = 0u32;
    for c in tail.chars() {
        match c {
            '\n' => break,
            ',' => {
                extent = extent.saturating_sub(1);
                break;
            }
            _ => extent = extent.saturating_add(utf16_width(c)),
        }
    }

    Located {
        line,
        column,
        end_column: column.saturating_add(extent),
    }
}

fn utf16_width(c: char) -> u32 {
    c.len_utf16() as u32
}
