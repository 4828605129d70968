//! Segment navigation inside a separator-joined entry field.
//!
//! Offsets are in characters, not bytes, so they can be handed straight to a
//! text widget's selection API.

use serde::{Deserialize, Serialize};

use crate::parser::SEPARATOR;

/// Half-open character range `[start, end)` of one segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentRange {
    pub start: usize,
    pub end: usize,
}

impl SegmentRange {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Cursor test, inclusive of both ends so a cursor right after the last
    /// character still counts.
    pub fn contains_cursor(&self, cursor: usize) -> bool {
        self.start <= cursor && cursor <= self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Next,
    Prev,
}

/// Ranges of every segment in `value`, in order.
pub fn segment_ranges(value: &str) -> Vec<SegmentRange> {
    let mut start = 0;
    value
        .split(SEPARATOR)
        .map(|part| {
            let end = start + part.chars().count();
            let range = SegmentRange { start, end };
            start = end + 1;
            range
        })
        .collect()
}

/// Index of the first segment containing `cursor`.
pub fn segment_at(ranges: &[SegmentRange], cursor: usize) -> Option<usize> {
    ranges.iter().position(|r| r.contains_cursor(cursor))
}

/// Range to select when moving from the segment under `cursor`.
///
/// Clamps at either end. Returns `None` if the cursor is outside the text.
pub fn move_segment(value: &str, cursor: usize, direction: Direction) -> Option<SegmentRange> {
    let ranges = segment_ranges(value);
    let current = segment_at(&ranges, cursor)?;

    let target = match direction {
        Direction::Next => (current + 1).min(ranges.len() - 1),
        Direction::Prev => current.saturating_sub(1),
    };
    ranges.get(target).copied()
}
