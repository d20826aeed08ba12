use crate::buffer::{self, Buffer};
use crate::codec;
use crate::error::{Result, SyncError};

/// One `loc("...")` occurrence found in the source buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal<'a> {
    /// Byte offset of the function name
    pub offset: usize,
    /// Bytes between the quotes, still escaped
    pub raw: &'a [u8],
    /// Decoded key
    pub key: Vec<u8>,
}

impl Literal<'_> {
    pub fn key_lossy(&self) -> String {
        String::from_utf8_lossy(&self.key).into_owned()
    }
}

/// Lazy forward scan over the marker calls of a source buffer.
///
/// A match directly preceded by an ASCII letter belongs to a longer
/// identifier (`malloc("`) and is skipped. Only letters are checked, so
/// `_loc("x")` and `1loc("x")` still count as markers.
///
/// The first error ends the iteration.
pub struct MarkerScanner<'a> {
    source: &'a Buffer,
    open: Vec<u8>,
    max_literal_len: usize,
    pos: usize,
    done: bool,
}

impl<'a> MarkerScanner<'a> {
    /// `max_literal_len` is the scratch capacity: raw literals must be shorter
    pub fn new(source: &'a Buffer, function: &str, max_literal_len: usize) -> Self {
        Self {
            source,
            open: codec::marker_open(function),
            max_literal_len,
            pos: 0,
            done: false,
        }
    }

    fn next_marker(&mut self) -> Option<usize> {
        loop {
            let at = buffer::find(self.source.as_bytes(), &self.open, self.pos)?;
            let glued = at
                .checked_sub(1)
                .and_then(|prev| self.source.get(prev))
                .is_some_and(|b| b.is_ascii_alphabetic());
            if glued {
                self.pos = at + 1;
                continue;
            }
            return Some(at);
        }
    }

    /// Index of the first `"` at or after `start` that is not preceded by `\`
    fn closing_quote(&self, start: usize) -> Option<usize> {
        let mut i = start;
        while let Some(b) = self.source.get(i) {
            if b == b'"' && self.source.get(i - 1) != Some(b'\\') {
                return Some(i);
            }
            i += 1;
        }
        None
    }
}

impl<'a> Iterator for MarkerScanner<'a> {
    type Item = Result<Literal<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let Some(at) = self.next_marker() else {
            self.done = true;
            return None;
        };

        // `start` is past the opening quote, so `start - 1` is always valid.
        let start = at + self.open.len();
        let Some(end) = self.closing_quote(start) else {
            self.done = true;
            return Some(Err(SyncError::UnterminatedLiteral { offset: at }));
        };

        let len = end - start;
        if len >= self.max_literal_len {
            self.done = true;
            return Some(Err(SyncError::OversizedLiteral {
                offset: at,
                len,
                max: self.max_literal_len,
            }));
        }

        self.pos = end + 1;
        let source: &'a Buffer = self.source;
        let raw = &source.as_bytes()[start..end];
        Some(Ok(Literal {
            offset: at,
            raw,
            key: codec::decode(raw),
        }))
    }
}
