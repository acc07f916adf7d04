use std::ops::Range;

/// A byte range into the source text of a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    /// Create a new span from a byte range
    pub fn new(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }

    /// Locate a 1-based line/column pair, as reported by `serde_json`, in `source`.
    ///
    /// The column counts bytes, not characters. The span covers the single
    /// character at that byte, moved back to the start of the character when
    /// the column lands inside one. Positions past the end of the input
    /// (unexpected EOF) give an empty span at the end.
    pub fn from_line_column(source: &str, line: usize, column: usize) -> Self {
        let mut offset = 0;
        for (index, text) in source.split_inclusive('\n').enumerate() {
            if index + 1 == line {
                let mut i = column.saturating_sub(1).min(text.len());
                while !text.is_char_boundary(i) {
                    i -= 1;
                }
                let len = text[i..].chars().next().map_or(0, char::len_utf8);
                return Self::new(offset + i..offset + i + len);
            }
            offset += text.len();
        }
        Self::new(source.len()..source.len())
    }

    /// Get the start offset of the span
    pub fn start(&self) -> usize {
        self.start
    }

    /// Get the end offset of the span
    pub fn end(&self) -> usize {
        self.end
    }

    /// Get the length of the span
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the span is empty
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}
