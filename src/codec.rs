//! Conversion between the quoted form inside `loc("...")` and the literal
//! form used as a language-file key.
//!
//! The two directions are deliberately not symmetric: [`decode`] drops every
//! backslash, while [`encode`] only escapes double quotes. Pruning looks keys
//! up with [`marker_token`], so it matches whatever the scanner decoded.

/// Drop every backslash and keep the byte that follows it literally
pub fn decode(raw: &[u8]) -> Vec<u8> {
    let mut key = Vec::with_capacity(raw.len());
    let mut bytes = raw.iter().copied();
    while let Some(b) = bytes.next() {
        if b == b'\\' {
            // A trailing lone backslash has nothing to keep.
            if let Some(next) = bytes.next() {
                key.push(next);
            }
        } else {
            key.push(b);
        }
    }
    key
}

/// Put a backslash in front of every double quote
pub fn encode(key: &[u8]) -> Vec<u8> {
    let mut raw = Vec::with_capacity(key.len() + 2);
    for &b in key {
        if b == b'"' {
            raw.push(b'\\');
        }
        raw.push(b);
    }
    raw
}

/// Opening token of a marker call, e.g. `loc("`
pub fn marker_open(function: &str) -> Vec<u8> {
    let mut token = Vec::with_capacity(function.len() + 2);
    token.extend_from_slice(function.as_bytes());
    token.extend_from_slice(b"(\"");
    token
}

/// Full marker call for `key`, e.g. `loc("He said \"hi\"")`
pub fn marker_token(function: &str, key: &[u8]) -> Vec<u8> {
    let mut token = marker_open(function);
    token.extend_from_slice(&encode(key));
    token.extend_from_slice(b"\")");
    token
}

/// Substring that marks `key` as already present in a language file
pub fn entry_lookup(key: &[u8]) -> Vec<u8> {
    let mut token = Vec::with_capacity(key.len() + 3);
    token.push(b'\n');
    token.extend_from_slice(key);
    token.extend_from_slice(b" =");
    token
}

/// Line appended for a newly discovered key
pub fn entry_line(key: &[u8]) -> Vec<u8> {
    let mut line = Vec::with_capacity(key.len() + 5);
    line.extend_from_slice(key);
    line.extend_from_slice(b" = \r\n");
    line
}
