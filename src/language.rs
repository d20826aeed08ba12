//! Line model of a language file.
//!
//! ```text
//! # comment
//! ; comment
//! key = translation
//! key =
//! ```

/// Text inserted once before the first key added by a run
pub const HEADER: &[u8] = b"#\r\n#---- please translate following items and then remove this comment ----#\r\n#\r\n";

/// Presence of this text anywhere in the file suppresses [`HEADER`]
pub const HEADER_MARKER: &[u8] = b"please translate following";

/// One line of a language file, terminator included
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    pub content: &'a [u8],
    /// `\r\n`, `\n`, `\r`, or empty for a last line without terminator
    pub terminator: &'a [u8],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    Comment,
    /// Non-comment line; `key` is the text before the first `=` with
    /// trailing spaces removed (the whole line when there is no `=`)
    Entry { key: &'a [u8] },
}

impl<'a> Line<'a> {
    pub fn kind(&self) -> LineKind<'a> {
        match self.content.first() {
            Some(b'#') | Some(b';') => LineKind::Comment,
            _ => LineKind::Entry {
                key: candidate_key(self.content),
            },
        }
    }

    pub fn len(&self) -> usize {
        self.content.len() + self.terminator.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn candidate_key(content: &[u8]) -> &[u8] {
    let before_eq = match content.iter().position(|&b| b == b'=') {
        Some(eq) => &content[..eq],
        None => content,
    };
    let end = before_eq
        .iter()
        .rposition(|&b| b != b' ')
        .map_or(0, |last| last + 1);
    &before_eq[..end]
}

/// Split a buffer into lines, keeping each line's exact terminator
pub fn split_lines(buf: &[u8]) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let mut start = 0;
    while start < buf.len() {
        let rest = &buf[start..];
        let line = match rest.iter().position(|&b| b == b'\r' || b == b'\n') {
            Some(eol) => {
                let term_len = if rest[eol] == b'\r' && rest.get(eol + 1) == Some(&b'\n') {
                    2
                } else {
                    1
                };
                Line {
                    content: &rest[..eol],
                    terminator: &rest[eol..eol + term_len],
                }
            }
            None => Line {
                content: rest,
                terminator: &[],
            },
        };
        start += line.len();
        lines.push(line);
    }
    lines
}

/// Re-assemble lines byte for byte
pub fn join_lines(lines: &[Line<'_>]) -> Vec<u8> {
    let mut out = Vec::with_capacity(lines.iter().map(Line::len).sum());
    for line in lines {
        out.extend_from_slice(line.content);
        out.extend_from_slice(line.terminator);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_mixed_terminators() {
        let lines = split_lines(b"a = 1\r\nb = 2\nc\rd");
        let contents: Vec<_> = lines.iter().map(|l| l.content).collect();
        let terms: Vec<_> = lines.iter().map(|l| l.terminator).collect();
        assert_eq!(contents, vec![&b"a = 1"[..], b"b = 2", b"c", b"d"]);
        assert_eq!(terms, vec![&b"\r\n"[..], b"\n", b"\r", b""]);
    }

    #[test]
    fn test_split_keeps_blank_lines() {
        let lines = split_lines(b"\r\n\r\nx\r\n");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].content, b"");
        assert_eq!(lines[2].content, b"x");
    }

    #[test]
    fn test_split_empty_buffer() {
        assert!(split_lines(b"").is_empty());
    }

    #[test]
    fn test_join_is_lossless() {
        let buf = b"# c\r\n; d\nkey = v\r\n\r\nlast";
        assert_eq!(join_lines(&split_lines(buf)), buf);
    }

    #[test]
    fn test_comment_lines() {
        for text in [&b"# hi"[..], b"; hi", b"#", b";key = x"] {
            let line = Line {
                content: text,
                terminator: b"\n",
            };
            assert_eq!(line.kind(), LineKind::Comment);
        }
        let indented = Line {
            content: b"  # not a comment",
            terminator: b"",
        };
        assert!(matches!(indented.kind(), LineKind::Entry { .. }));
    }

    #[test]
    fn test_candidate_key() {
        assert_eq!(candidate_key(b"Hello = Hallo"), b"Hello");
        assert_eq!(candidate_key(b"Hello   =   "), b"Hello");
        assert_eq!(candidate_key(b"a = b = c"), b"a");
        assert_eq!(candidate_key(b"no equals  "), b"no equals");
        assert_eq!(candidate_key(b"   "), b"");
        assert_eq!(candidate_key(b"= value"), b"");
        assert_eq!(candidate_key(b"\tx\t = y"), b"\tx\t");
    }

    #[test]
    fn test_header_contains_marker() {
        assert!(HEADER.windows(HEADER_MARKER.len()).any(|w| w == HEADER_MARKER));
    }
}
