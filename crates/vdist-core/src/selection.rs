//! Half-open range selection over sorted names

use serde::Serialize;

/// A half-open index range `[start, end)` into sorted names.
///
/// Negative bounds count from the end, so `0..-1` selects all but the last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SelectionRange {
    pub start: isize,
    pub end: isize,
}

impl SelectionRange {
    pub fn new(start: isize, end: isize) -> Self {
        Self { start, end }
    }

    /// Apply the range to `sorted`.
    pub fn apply<'a, T>(&self, sorted: &'a [T]) -> &'a [T] {
        select(sorted, self.start, self.end)
    }
}

impl std::fmt::Display for SelectionRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Slice `sorted` to `[start, end)`.
///
/// A negative bound is offset by the length first. Out-of-range bounds
/// clamp to `0..=len`. `start >= end` after that yields an empty slice,
/// never an error.
pub fn select<T>(sorted: &[T], start: isize, end: isize) -> &[T] {
    let start = clamp_index(start, sorted.len());
    let end = clamp_index(end, sorted.len());
    if start >= end {
        return &[];
    }
    &sorted[start..end]
}

fn clamp_index(index: isize, len: usize) -> usize {
    if index < 0 {
        len.saturating_sub(index.unsigned_abs())
    } else {
        index.unsigned_abs().min(len)
    }
}
