//! Loose string-to-number rules.
//!
//! Ratings and route parameters arrive as untrusted text. Two conversions are
//! used on them, each written out here instead of leaning on a platform's
//! implicit coercion:
//!
//! - [`parse_int_prefix`]: permissive base-10 integer parsing that reads as
//!   many digits as it can and ignores the rest (`"4.9 stars"` → `4`).
//! - [`to_number`]: whole-string conversion to a float that yields `NaN` for
//!   anything that is not entirely a numeric literal (`"42"` → `42`,
//!   `"abc"` → `NaN`, `""` → `0`).

/// Whitespace and line terminators skipped around numeric text.
const fn is_space(ch: char) -> bool {
    matches!(
        ch,
        '\u{0009}'
            | '\u{000A}'
            | '\u{000B}'
            | '\u{000C}'
            | '\u{000D}'
            | '\u{0020}'
            | '\u{00A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

/// Splits one leading `+` or `-` off `text`.
fn split_sign(text: &str) -> (bool, &str) {
    text.strip_prefix('-').map_or_else(
        || (false, text.strip_prefix('+').unwrap_or(text)),
        |rest| (true, rest),
    )
}

/// Parses the longest base-10 integer prefix of `text`.
///
/// Leading whitespace is skipped and one sign is accepted. Parsing stops at
/// the first non-digit. Returns `None` when no digit follows the sign.
///
/// Values beyond the range of `i64` saturate, so comparisons against
/// `i64` bounds still order correctly.
///
/// ```
/// use movie_routes::coerce::parse_int_prefix;
///
/// assert_eq!(parse_int_prefix("  -12px"), Some(-12));
/// assert_eq!(parse_int_prefix("4.9 stars"), Some(4));
/// assert_eq!(parse_int_prefix("abc"), None);
/// ```
#[must_use]
pub fn parse_int_prefix(text: &str) -> Option<i64> {
    let (negative, body) = split_sign(text.trim_start_matches(is_space));

    body.bytes()
        .take_while(u8::is_ascii_digit)
        .map(|digit| i64::from(digit - b'0'))
        .fold(None, |acc: Option<i64>, digit| {
            let shifted = acc.unwrap_or(0).saturating_mul(10);
            Some(if negative {
                shifted.saturating_sub(digit)
            } else {
                shifted.saturating_add(digit)
            })
        })
}

/// Converts the whole of `text` to a number.
///
/// Surrounding whitespace is trimmed and an empty remainder is `0`.
/// Accepted forms are a signed decimal literal (`12`, `-1.5`, `.5`, `3.`,
/// `1e3`), a signed `Infinity`, or an unsigned `0x`/`0o`/`0b` integer. Any
/// other text yields `NaN`. Nothing is bounds-checked.
///
/// ```
/// use movie_routes::coerce::to_number;
///
/// assert_eq!(to_number("42"), 42.0);
/// assert_eq!(to_number(""), 0.0);
/// assert!(to_number("abc").is_nan());
/// ```
#[must_use]
pub fn to_number(text: &str) -> f64 {
    let trimmed = text.trim_matches(is_space);
    if trimmed.is_empty() {
        return 0.0;
    }

    if let Some(value) = radix_literal(trimmed) {
        return value;
    }

    let (negative, body) = split_sign(trimmed);
    let magnitude = if body == "Infinity" {
        f64::INFINITY
    } else if is_decimal_literal(body) {
        body.parse::<f64>().unwrap_or(f64::NAN)
    } else {
        return f64::NAN;
    };

    if negative { -magnitude } else { magnitude }
}

/// `0x1F`, `0o17`, `0b101`. `None` when `text` has no radix prefix; `NaN` when
/// the prefix is followed by no digits or by a digit outside the radix.
fn radix_literal(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'0' {
        return None;
    }

    let radix = match bytes[1] {
        b'x' | b'X' => 16,
        b'o' | b'O' => 8,
        b'b' | b'B' => 2,
        _ => return None,
    };

    let digits = &text[2..];
    if digits.is_empty() {
        return Some(f64::NAN);
    }

    let value = digits.chars().try_fold(0.0_f64, |acc, ch| {
        ch.to_digit(radix)
            .map(|digit| acc.mul_add(f64::from(radix), f64::from(digit)))
    });
    Some(value.unwrap_or(f64::NAN))
}

/// `digits [. digits] [e [sign] digits]` with at least one mantissa digit.
fn is_decimal_literal(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut pos = 0;

    let count_digits = |from: usize| bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count();

    let int_digits = count_digits(pos);
    pos += int_digits;

    let mut frac_digits = 0;
    if bytes.get(pos) == Some(&b'.') {
        pos += 1;
        frac_digits = count_digits(pos);
        pos += frac_digits;
    }

    if int_digits + frac_digits == 0 {
        return false;
    }

    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        pos += 1;
        if matches!(bytes.get(pos), Some(b'+' | b'-')) {
            pos += 1;
        }
        let exp_digits = count_digits(pos);
        if exp_digits == 0 {
            return false;
        }
        pos += exp_digits;
    }

    pos == bytes.len()
}
