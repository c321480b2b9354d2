//! Text positions for reporting occurrences.

pub use text_size::{TextRange, TextSize};

/// Zero-based line and UTF-8 byte column.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

impl LineCol {
    /// One-based `(line, column)` as printed by editors and compilers.
    #[inline]
    pub fn one_based(self) -> (u32, u32) {
        (self.line + 1, self.col + 1)
    }
}

/// Pre-computed line start offsets for a particular text snapshot.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LineIndex {
    line_starts: Vec<TextSize>,
    line_ends: Vec<TextSize>,
    text_len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut line_starts = vec![TextSize::from(0)];
        let mut line_ends = Vec::new();

        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => {
                    line_ends.push(TextSize::from(i as u32));
                    line_starts.push(TextSize::from((i + 1) as u32));
                    i += 1;
                }
                b'\r' => {
                    let width = if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                    line_ends.push(TextSize::from(i as u32));
                    line_starts.push(TextSize::from((i + width) as u32));
                    i += width;
                }
                _ => i += 1,
            }
        }
        line_ends.push(TextSize::from(text.len() as u32));

        Self {
            line_starts,
            line_ends,
            text_len: TextSize::from(text.len() as u32),
        }
    }

    #[inline]
    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }

    /// Convert a byte offset to a line/column pair. Offsets past the end clamp to EOF.
    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let offset = offset.min(self.text_len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(insert) => insert.saturating_sub(1),
        };
        let col = offset.min(self.line_ends[line]) - self.line_starts[line];
        LineCol {
            line: line as u32,
            col: u32::from(col),
        }
    }
}
