//! Byte-level scanner for JSON values embedded in prose.
//!
//! Model completions interleave JSON fragments with free text. These
//! routines find the exclusive end offset of a candidate value without
//! allocating, so the caller can hand the exact span to serde. Scanning is
//! strict JSON; anything else is a non-match, not an error.

#[inline]
fn skip_ws(bytes: &[u8], mut i: usize) -> usize {
    while matches!(bytes.get(i), Some(&(b' ' | b'\n' | b'\r' | b'\t'))) {
        i += 1;
    }
    i
}

/// End offset of the JSON object starting at `start`, which must point at
/// a `{`. Trailing content after the object is ignored.
pub(crate) fn json_object_end(bytes: &[u8], start: usize) -> Option<usize> {
    if bytes.get(start) != Some(&b'{') {
        return None;
    }
    let mut i = skip_ws(bytes, start + 1);
    if bytes.get(i) == Some(&b'}') {
        return Some(i + 1);
    }
    loop {
        i = string_end(bytes, skip_ws(bytes, i))?;
        i = skip_ws(bytes, i);
        if bytes.get(i) != Some(&b':') {
            return None;
        }
        i = value_end(bytes, i + 1)?;
        i = skip_ws(bytes, i);
        match *bytes.get(i)? {
            b',' => i += 1,
            b'}' => return Some(i + 1),
            _ => return None,
        }
    }
}

/// End offset of any JSON value starting at or after `at` (leading
/// whitespace allowed).
pub(crate) fn value_end(bytes: &[u8], at: usize) -> Option<usize> {
    let i = skip_ws(bytes, at);
    match *bytes.get(i)? {
        b'{' => json_object_end(bytes, i),
        b'[' => array_end(bytes, i),
        b'"' => string_end(bytes, i),
        b't' => literal_end(bytes, i, b"true"),
        b'f' => literal_end(bytes, i, b"false"),
        b'n' => literal_end(bytes, i, b"null"),
        b'-' | b'0'..=b'9' => number_end(bytes, i),
        _ => None,
    }
}

fn array_end(bytes: &[u8], start: usize) -> Option<usize> {
    if bytes.get(start) != Some(&b'[') {
        return None;
    }
    let mut i = skip_ws(bytes, start + 1);
    if bytes.get(i) == Some(&b']') {
        return Some(i + 1);
    }
    loop {
        i = value_end(bytes, i)?;
        i = skip_ws(bytes, i);
        match *bytes.get(i)? {
            b',' => i += 1,
            b']' => return Some(i + 1),
            _ => return None,
        }
    }
}

fn string_end(bytes: &[u8], start: usize) -> Option<usize> {
    if bytes.get(start) != Some(&b'"') {
        return None;
    }
    let mut i = start + 1;
    loop {
        match *bytes.get(i)? {
            b'"' => return Some(i + 1),
            b'\\' => {
                bytes.get(i + 1)?;
                i += 2;
            }
            0x00..=0x1F => return None,
            _ => i += 1,
        }
    }
}

fn literal_end(bytes: &[u8], start: usize, lit: &[u8]) -> Option<usize> {
    let end = start.checked_add(lit.len())?;
    (bytes.get(start..end)? == lit).then_some(end)
}

fn number_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut i = start;
    if bytes.get(i) == Some(&b'-') {
        i += 1;
    }
    match *bytes.get(i)? {
        b'0' => i += 1,
        b'1'..=b'9' => {
            while bytes.get(i).is_some_and(u8::is_ascii_digit) {
                i += 1;
            }
        }
        _ => return None,
    }
    if bytes.get(i) == Some(&b'.') {
        i += 1;
        if !bytes.get(i).is_some_and(u8::is_ascii_digit) {
            return None;
        }
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
    }
    if matches!(bytes.get(i), Some(&(b'e' | b'E'))) {
        i += 1;
        if matches!(bytes.get(i), Some(&(b'+' | b'-'))) {
            i += 1;
        }
        if !bytes.get(i).is_some_and(u8::is_ascii_digit) {
            return None;
        }
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
    }
    Some(i)
}
