//! Entities: tagged ranges over the parsed plain text.
//!
//! `start`/`offset` describe the half-open range `[start, start + offset)` of
//! [`crate::ParseResult::text`], counted in UTF-16 code units. That is the
//! length unit of the chat clients sharing the stored shape, so a CJK
//! character counts 1 and an astral character (most emoji) counts 2. Ranges
//! never split a surrogate pair; [`Entity::slice`] maps them back to bytes.

use crate::error::CoverageError;
use crate::expr::ExprNode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// A formatting or semantic range over the parsed text.
///
/// Serialized internally tagged, e.g. `{"type":"Text","start":0,"offset":5}`.
/// This is the stored/broadcast shape, so field names must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Entity {
    Text { start: usize, offset: usize },
    /// Bold span.
    Strong { start: usize, offset: usize },
    /// Explicit `[title](href)` link, or an auto-detected URL (title == href).
    Link { start: usize, offset: usize, href: String },
    /// Arithmetic/dice expression; the range covers its source text.
    Expr { start: usize, offset: usize, node: ExprNode },
}

/// Entity discriminant, used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    Text,
    Strong,
    Link,
    Expr,
}

impl EntityKind {
    pub fn name(self) -> &'static str {
        match self {
            EntityKind::Text => "Text",
            EntityKind::Strong => "Strong",
            EntityKind::Link => "Link",
            EntityKind::Expr => "Expr",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Text { .. } => EntityKind::Text,
            Entity::Strong { .. } => EntityKind::Strong,
            Entity::Link { .. } => EntityKind::Link,
            Entity::Expr { .. } => EntityKind::Expr,
        }
    }

    pub fn start(&self) -> usize {
        match self {
            Entity::Text { start, .. }
            | Entity::Strong { start, .. }
            | Entity::Link { start, .. }
            | Entity::Expr { start, .. } => *start,
        }
    }

    pub fn offset(&self) -> usize {
        match self {
            Entity::Text { offset, .. }
            | Entity::Strong { offset, .. }
            | Entity::Link { offset, .. }
            | Entity::Expr { offset, .. } => *offset,
        }
    }

    /// Exclusive end of the range. Saturates for corrupt stored ranges.
    pub fn end(&self) -> usize {
        self.start().saturating_add(self.offset())
    }

    pub fn range(&self) -> Range<usize> {
        self.start()..self.end()
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Entity::Text { .. })
    }

    /// The slice of `text` this entity covers, if the range is valid for it.
    pub fn slice<'t>(&self, text: &'t str) -> Option<&'t str> {
        let start = byte_index(text, self.start())?;
        let len = byte_index(&text[start..], self.offset())?;
        Some(&text[start..start + len])
    }
}

/// Length of `s` in UTF-16 code units, the unit of entity ranges.
pub(crate) fn utf16_len(s: &str) -> usize {
    s.chars().map(char::len_utf16).sum()
}

/// Byte index of the UTF-16 position `units` in `text`.
///
/// `None` past the end, or between the two halves of a surrogate pair.
pub(crate) fn byte_index(text: &str, units: usize) -> Option<usize> {
    let mut seen = 0;
    for (idx, c) in text.char_indices() {
        if seen >= units {
            return (seen == units).then_some(idx);
        }
        seen += c.len_utf16();
    }
    (seen == units).then_some(text.len())
}

/// Slices entity ranges out of one text, walking forward from the previous
/// lookup so that an ordered entity list is resolved in a single pass.
#[derive(Debug)]
pub(crate) struct Utf16Cursor<'t> {
    text: &'t str,
    units: usize,
    byte: usize,
}

impl<'t> Utf16Cursor<'t> {
    pub fn new(text: &'t str) -> Self {
        Utf16Cursor { text, units: 0, byte: 0 }
    }

    /// Same as [`Entity::slice`].
    pub fn slice(&mut self, entity: &Entity) -> Option<&'t str> {
        if entity.start() < self.units {
            self.units = 0;
            self.byte = 0;
        }
        let start = self.byte + byte_index(&self.text[self.byte..], entity.start() - self.units)?;
        let len = byte_index(&self.text[start..], entity.offset())?;
        self.units = entity.end();
        self.byte = start + len;
        Some(&self.text[start..self.byte])
    }
}

/// Verify that `entities` cover every code unit of `text` exactly once, in order.
pub(crate) fn check_coverage(text: &str, entities: &[Entity]) -> Result<(), CoverageError> {
    let total = utf16_len(text);
    let mut expected = 0;
    let mut byte = 0;
    for (index, entity) in entities.iter().enumerate() {
        let start = entity.start();
        if start > expected {
            return Err(CoverageError::Gap { index, expected, found: start });
        }
        if start < expected {
            return Err(CoverageError::Overlap { index, expected, found: start });
        }
        let end = entity.end();
        if end > total {
            return Err(CoverageError::OutOfBounds { index, end, len: total });
        }
        let Some(len) = byte_index(&text[byte..], entity.offset()) else {
            return Err(CoverageError::NotCharBoundary { index, at: end });
        };
        byte += len;
        expected = end;
    }
    if expected != total {
        return Err(CoverageError::Uncovered { covered: expected, len: total });
    }
    Ok(())
}
