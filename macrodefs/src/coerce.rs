use std::fmt::Display;

/// Render a value and encode the result as UTF-8 bytes
pub fn u8bytes<T: Display + ?Sized>(source: &T) -> Vec<u8> {
    source.to_string().into_bytes()
}

/// Check if a character is an ASCII decimal digit
const fn is_digit(c: u8) -> bool {
    c >= b'0' && c <= b'9'
}

/// Parse a base-10 integer the lenient way compiler drivers and scripting
/// runtimes accept it: surrounding whitespace, an optional sign, and single
/// underscores between digits are allowed.
///
/// Only ASCII digits count. Other Unicode decimal digits (`"０"`, `"٠"`)
/// are not numbers here, so such definitions are kept as literal values.
///
/// Returns `None` for anything else, including values that overflow `i64`.
#[must_use]
pub fn parse_base10(candidate: &str) -> Option<i64> {
    let trimmed = candidate.trim();
    let (negative, digits) = match trimmed.as_bytes().first()? {
        b'-' => (true, &trimmed[1..]),
        b'+' => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let bytes = digits.as_bytes();
    if !is_digit(*bytes.first()?) || !is_digit(*bytes.last()?) {
        return None;
    }

    let mut magnitude: i64 = 0;
    let mut previous_underscore = false;
    for &b in bytes {
        if b == b'_' {
            if previous_underscore {
                return None;
            }
            previous_underscore = true;
            continue;
        }
        if !is_digit(b) {
            return None;
        }
        previous_underscore = false;
        magnitude = magnitude
            .checked_mul(10)?
            .checked_add(i64::from(b - b'0'))?;
    }

    Some(if negative { -magnitude } else { magnitude })
}
