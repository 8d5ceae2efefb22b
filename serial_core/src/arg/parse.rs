//! Token to value coercion.

use super::{ArgConstraint, ArgType, Value};

/// Converts `token` into a value of the constraint's type.
///
/// Returns `None` when the token is not a valid literal of that type. Range
/// checking is separate, see [`ArgConstraint::is_in_range`].
pub fn coerce<'a>(token: &'a str, constraint: &ArgConstraint<'_>) -> Option<Value<'a>> {
    match constraint.arg_type {
        ArgType::String => Some(Value::Str(token)),
        ArgType::Int => parse_i32(token).map(Value::Int),
        ArgType::Float => parse_f32(token).map(Value::Float),
    }
}

/// Optional sign followed by at least one decimal digit. Anything else fails,
/// including overflow past the `i32` range.
pub fn parse_i32(s: &str) -> Option<i32> {
    let bytes = s.as_bytes();
    let (negative, digits) = match bytes.first() {
        Some(b'-') => (true, &bytes[1..]),
        Some(b'+') => (false, &bytes[1..]),
        _ => (false, bytes),
    };
    if digits.is_empty() {
        return None;
    }

    // Accumulate towards the sign so that i32::MIN stays representable.
    let mut value: i32 = 0;
    for &b in digits {
        let d = b.wrapping_sub(b'0');
        if d > 9 {
            return None;
        }
        value = value.checked_mul(10)?;
        value = if negative {
            value.checked_sub(d as i32)?
        } else {
            value.checked_add(d as i32)?
        };
    }
    Some(value)
}

/// Parses the longest floating point prefix of `s`, like C `strtod`.
///
/// Trailing characters after a valid prefix are ignored. Fails only when no
/// prefix could be consumed.
pub fn parse_f32(s: &str) -> Option<f32> {
    let len = float_prefix_len(s.as_bytes());
    if len == 0 {
        return None;
    }
    s[..len].parse::<f32>().ok()
}

/// Length of the longest prefix accepted as a decimal float literal.
fn float_prefix_len(bytes: &[u8]) -> usize {
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }

    if let Some(len) = special_prefix_len(&bytes[i..]) {
        return i + len;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut mantissa_digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        mantissa_digits += j - frac_start;
        if mantissa_digits > 0 {
            i = j;
        }
    }

    if mantissa_digits == 0 {
        return 0;
    }

    // Exponent only counts when at least one digit follows it.
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    i
}

/// `inf`, `infinity` and `nan`, case-insensitive.
fn special_prefix_len(bytes: &[u8]) -> Option<usize> {
    let starts_with = |word: &[u8]| {
        bytes.len() >= word.len() && bytes[..word.len()].eq_ignore_ascii_case(word)
    };
    if starts_with(b"infinity") {
        Some(8)
    } else if starts_with(b"inf") {
        Some(3)
    } else if starts_with(b"nan") {
        Some(3)
    } else {
        None
    }
}

// ==================== TESTS =======================
