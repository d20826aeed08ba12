use std::fmt;

/// Whole-file byte buffer.
///
/// The end of the underlying slice is the logical end marker: [`Buffer::get`]
/// returns `None` there, so scans stop without a separate length check and
/// can never read past the loaded content.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Buffer {
    bytes: Vec<u8>,
}

impl Buffer {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Byte at `index`, or `None` once the end of content is reached
    pub fn get(&self, index: usize) -> Option<u8> {
        self.bytes.get(index).copied()
    }

    pub fn contains(&self, needle: &[u8]) -> bool {
        find(&self.bytes, needle, 0).is_some()
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Buffer")
            .field(&String::from_utf8_lossy(&self.bytes))
            .finish()
    }
}

impl From<&str> for Buffer {
    fn from(value: &str) -> Self {
        Self::new(value.as_bytes())
    }
}

/// Find the first occurrence of `needle` in `haystack` at or after `from`
pub fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from > haystack.len() {
        return None;
    }
    if needle.is_empty() {
        return Some(from);
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| from + pos)
}
