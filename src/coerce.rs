//! Best-effort conversion of raw text fragments into JSON values.
//!
//! Tag-based formats carry untyped text payloads; a value like `true`,
//! `(1, 2)` or `'quoted'` should land in the argument object as its typed
//! equivalent, while anything unrecognizable stays a string. Tried in
//! order: explicit `null` literal (any case), strict JSON, a generic
//! literal-expression grammar, then the trimmed text verbatim. Never fails.

use serde_json::Value;

/// Coerce a decoded text fragment into a JSON value.
#[must_use]
pub fn coerce_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("null") {
        return Value::Null;
    }
    if looks_like_json(trimmed) {
        if let Ok(value) = serde_json::from_str(trimmed) {
            return value;
        }
    }
    if let Some(value) = parse_literal(trimmed) {
        return value;
    }
    Value::String(trimmed.to_string())
}

#[inline]
fn looks_like_json(trimmed: &str) -> bool {
    let Some(first) = trimmed.as_bytes().first().copied() else {
        return false;
    };
    matches!(first, b'{' | b'[' | b'"' | b'-' | b'0'..=b'9' | b't' | b'f' | b'n')
}

/// Parse the literal-expression subset: quoted strings (single or double),
/// numbers, booleans in either casing, `None`, and bracketed lists/tuples
/// of nested literals. The whole fragment must be one expression.
fn parse_literal(text: &str) -> Option<Value> {
    let (value, end) = literal_value(text, 0)?;
    let rest = skip_ws(text.as_bytes(), end);
    (rest == text.len()).then_some(value)
}

fn literal_value(text: &str, at: usize) -> Option<(Value, usize)> {
    let bytes = text.as_bytes();
    let i = skip_ws(bytes, at);
    match *bytes.get(i)? {
        b'\'' | b'"' => quoted_string(text, i),
        b'[' => sequence(text, i, b']'),
        b'(' => sequence(text, i, b')'),
        b'T' if text[i..].starts_with("True") => Some((Value::Bool(true), i + 4)),
        b't' if text[i..].starts_with("true") => Some((Value::Bool(true), i + 4)),
        b'F' if text[i..].starts_with("False") => Some((Value::Bool(false), i + 5)),
        b'f' if text[i..].starts_with("false") => Some((Value::Bool(false), i + 5)),
        b'N' if text[i..].starts_with("None") => Some((Value::Null, i + 4)),
        b'-' | b'+' | b'.' | b'0'..=b'9' => number(text, i),
        _ => None,
    }
}

fn quoted_string(text: &str, start: usize) -> Option<(Value, usize)> {
    let bytes = text.as_bytes();
    let quote = *bytes.get(start)?;
    let mut out = String::new();
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b if b == quote => return Some((Value::String(out), i + 1)),
            b'\\' => {
                let escaped = *bytes.get(i + 1)?;
                match escaped {
                    b'n' => out.push('\n'),
                    b'r' => out.push('\r'),
                    b't' => out.push('\t'),
                    b'\\' | b'\'' | b'"' => out.push(char::from(escaped)),
                    // Unknown escapes keep the backslash, like the source.
                    other => {
                        out.push('\\');
                        out.push(char::from(other));
                    }
                }
                i += 2;
            }
            _ => {
                // Push the full UTF-8 scalar, not a byte.
                let ch = text[i..].chars().next()?;
                out.push(ch);
                i += ch.len_utf8();
            }
        }
    }
    None
}

fn sequence(text: &str, start: usize, close: u8) -> Option<(Value, usize)> {
    let bytes = text.as_bytes();
    let mut items = Vec::new();
    let mut i = start + 1;
    loop {
        i = skip_ws(bytes, i);
        if bytes.get(i)? == &close {
            return Some((Value::Array(items), i + 1));
        }
        let (item, next) = literal_value(text, i)?;
        items.push(item);
        i = skip_ws(bytes, next);
        match *bytes.get(i)? {
            b',' => i += 1,
            b if b == close => return Some((Value::Array(items), i + 1)),
            _ => return None,
        }
    }
}

fn number(text: &str, start: usize) -> Option<(Value, usize)> {
    let bytes = text.as_bytes();
    let mut i = start;
    if matches!(bytes.get(i), Some(&(b'-' | b'+'))) {
        i += 1;
    }
    let digits_start = i;
    let mut is_float = false;
    while let Some(&b) = bytes.get(i) {
        match b {
            b'0'..=b'9' => i += 1,
            b'.' if !is_float => {
                is_float = true;
                i += 1;
            }
            b'e' | b'E' => {
                is_float = true;
                i += 1;
                if matches!(bytes.get(i), Some(&(b'+' | b'-'))) {
                    i += 1;
                }
            }
            _ => break,
        }
    }
    if i == digits_start {
        return None;
    }
    let span = &text[start..i];
    if is_float {
        let parsed: f64 = span.parse().ok()?;
        let number = serde_json::Number::from_f64(parsed)?;
        Some((Value::Number(number), i))
    } else {
        let parsed: i64 = span.parse().ok()?;
        Some((Value::Number(parsed.into()), i))
    }
}

#[inline]
fn skip_ws(bytes: &[u8], mut i: usize) -> usize {
    while bytes.get(i).is_some_and(u8::is_ascii_whitespace) {
        i += 1;
    }
    i
}
