//! Source scanning: comment/string masking, block structure, positions.
//!
//! The masked copy has the same byte length as the input. Comment bytes and
//! string-literal contents are replaced with spaces (newlines are kept), so
//! offsets into either copy refer to the same place.

use lesshint_stream::EngineError;

/// A `{ ... }` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    /// Byte offset of `{`.
    pub open: usize,
    /// Byte offset of the matching `}`.
    pub close: usize,
    /// `@{name}` variable interpolation rather than a rule block.
    pub interpolation: bool,
}

/// Text between two of `;`, `{`, `}` in the masked source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Statement {
    pub start: usize,
    pub end: usize,
    /// Delimiter that ended the statement; `None` at end of input.
    pub terminator: Option<u8>,
}

/// Parsed view of one Less source.
#[derive(Debug)]
pub struct Source<'a> {
    raw: &'a str,
    masked: Vec<u8>,
    line_starts: Vec<usize>,
    blocks: Vec<Block>,
}

impl<'a> Source<'a> {
    /// Scan `raw`. Unclosed comments, strings or blocks and stray `}` are
    /// engine faults.
    pub fn parse(raw: &'a str) -> Result<Self, EngineError> {
        let mut source = Self {
            raw,
            masked: Vec::new(),
            line_starts: line_starts(raw),
            blocks: Vec::new(),
        };
        source.masked = source.mask()?;
        source.blocks = source.match_braces()?;
        Ok(source)
    }

    pub fn masked(&self) -> &[u8] {
        &self.masked
    }

    /// Blocks ordered by opening brace.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Raw lines with their starting offsets, line endings stripped.
    pub fn lines(&self) -> impl Iterator<Item = (usize, &'a str)> + '_ {
        let raw = self.raw;
        self.line_starts.iter().map(move |&start| {
            let line = raw[start..].split('\n').next().unwrap_or("");
            (start, line.strip_suffix('\r').unwrap_or(line))
        })
    }

    /// Split the masked source at `;`, `{` and `}`.
    pub fn statements(&self) -> Vec<Statement> {
        let mut out = Vec::new();
        let mut start = 0;
        for (i, &b) in self.masked.iter().enumerate() {
            if matches!(b, b';' | b'{' | b'}') {
                out.push(Statement {
                    start,
                    end: i,
                    terminator: Some(b),
                });
                start = i + 1;
            }
        }
        if start < self.masked.len() {
            out.push(Statement {
                start,
                end: self.masked.len(),
                terminator: None,
            });
        }
        out
    }

    /// Masked bytes of a statement.
    pub fn text(&self, statement: &Statement) -> &[u8] {
        &self.masked[statement.start..statement.end]
    }

    /// 1-based line and column of a byte offset. Columns count characters.
    pub fn position(&self, offset: usize) -> (u32, u32) {
        let line = self.line_starts.partition_point(|&s| s <= offset).max(1);
        let start = self.line_starts[line - 1];
        let column = self
            .raw
            .get(start..offset)
            .map_or(offset.saturating_sub(start), |s| s.chars().count())
            + 1;
        (line as u32, column as u32)
    }

    fn fault(&self, offset: usize, message: &str) -> EngineError {
        let (line, column) = self.position(offset);
        EngineError::new(format!("{}:{} {}", line, column, message))
    }

    fn mask(&self) -> Result<Vec<u8>, EngineError> {
        let bytes = self.raw.as_bytes();
        let mut out = bytes.to_vec();
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'/' if bytes.get(i + 1) == Some(&b'*') => {
                    let end = find(bytes, i + 2, b"*/")
                        .ok_or_else(|| self.fault(i, "Unclosed comment"))?;
                    blank(&mut out, i, end + 2);
                    i = end + 2;
                }
                // `//` after a colon is a URL scheme, not a comment.
                b'/' if bytes.get(i + 1) == Some(&b'/') && (i == 0 || bytes[i - 1] != b':') => {
                    let end = bytes[i..]
                        .iter()
                        .position(|&b| b == b'\n')
                        .map_or(bytes.len(), |p| i + p);
                    blank(&mut out, i, end);
                    i = end;
                }
                quote @ (b'"' | b'\'') => {
                    let end = string_end(bytes, i + 1, quote)
                        .ok_or_else(|| self.fault(i, "Unclosed string"))?;
                    blank(&mut out, i + 1, end);
                    i = end + 1;
                }
                _ => i += 1,
            }
        }
        Ok(out)
    }

    fn match_braces(&self) -> Result<Vec<Block>, EngineError> {
        let mut open = Vec::new();
        let mut blocks = Vec::new();
        for (i, &b) in self.masked.iter().enumerate() {
            match b {
                b'{' => open.push(i),
                b'}' => {
                    let start = open.pop().ok_or_else(|| self.fault(i, "Unexpected '}'"))?;
                    blocks.push(Block {
                        open: start,
                        close: i,
                        interpolation: start > 0 && self.masked[start - 1] == b'@',
                    });
                }
                _ => {}
            }
        }
        if let Some(&start) = open.last() {
            return Err(self.fault(start, "Unclosed block"));
        }
        blocks.sort_by_key(|b| b.open);
        Ok(blocks)
    }
}

fn line_starts(raw: &str) -> Vec<usize> {
    std::iter::once(0)
        .chain(raw.bytes().enumerate().filter(|&(_, b)| b == b'\n').map(|(i, _)| i + 1))
        .collect()
}

fn find(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| from + p)
}

/// Offset of the closing quote. Escapes are skipped; a bare newline ends
/// the search.
fn string_end(bytes: &[u8], from: usize, quote: u8) -> Option<usize> {
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => return None,
            b if b == quote => return Some(i),
            _ => i += 1,
        }
    }
    None
}

fn blank(out: &mut [u8], from: usize, to: usize) {
    for b in &mut out[from..to] {
        if *b != b'\n' {
            *b = b' ';
        }
    }
}
