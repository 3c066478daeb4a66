//! Line and column lookup for spans.
//!
//! Declarations arrive with byte-offset spans; the queue sorts by line and
//! the terminal emitter prints `path:line:column`, both through
//! [`LineOffsetTable`].

use kiln_ir::Span;

/// Pre-computed line start offsets for O(log L) lookups.
///
/// ```
/// use kiln_diagnostic::span_utils::LineOffsetTable;
///
/// let source = "enum A {}\nenum B {}";
/// let table = LineOffsetTable::build(source);
/// assert_eq!(table.offset_to_line_col(source, 10), (2, 1));
/// ```
#[derive(Clone, Debug, Default)]
pub struct LineOffsetTable {
    /// Byte offset of each line start; `offsets[0] == 0`.
    offsets: Vec<u32>,
}

impl LineOffsetTable {
    /// Build a line offset table from source text.
    pub fn build(source: &str) -> Self {
        let mut offsets = vec![0u32];
        for (i, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                offsets.push(u32::try_from(i + 1).unwrap_or(u32::MAX));
            }
        }
        LineOffsetTable { offsets }
    }

    /// 1-based line number containing `offset`.
    pub fn line_from_offset(&self, offset: u32) -> u32 {
        let line_idx = match self.offsets.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        u32::try_from(line_idx).unwrap_or(u32::MAX - 1) + 1
    }

    /// 1-based (line, column) for `offset`, counting columns in characters.
    pub fn offset_to_line_col(&self, source: &str, offset: u32) -> (u32, u32) {
        let line = self.line_from_offset(offset);
        let line_start = self
            .offsets
            .get((line - 1) as usize)
            .copied()
            .unwrap_or(0) as usize;
        let end = (offset as usize).min(source.len());
        let col_chars = source
            .get(line_start..end)
            .map_or(0, |text| text.chars().count());
        (line, u32::try_from(col_chars).unwrap_or(u32::MAX - 1) + 1)
    }

    /// Number of lines in the source.
    pub fn line_count(&self) -> usize {
        self.offsets.len()
    }
}

/// One-shot (line, column) lookup for a single offset.
pub fn offset_to_line_col(source: &str, offset: u32) -> (u32, u32) {
    LineOffsetTable::build(source).offset_to_line_col(source, offset)
}

/// 1-based (line, column) of a span's start.
pub fn span_start_line_col(source: &str, span: Span) -> (u32, u32) {
    offset_to_line_col(source, span.start)
}
