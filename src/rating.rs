//! Rating normalization.
//!
//! Movie payloads carry ratings in whatever shape the upstream source sent:
//! numbers, numeric strings, decorated strings such as `"4.9 stars"`, or
//! nothing at all. [`normalize`] turns any of them into a whole star count
//! that is always within the display range.
//!
//! ```
//! use movie_routes::rating::{normalize, normalize_within};
//! use serde_json::json;
//!
//! assert_eq!(normalize(&json!("4.9 stars")), 4);
//! assert_eq!(normalize(&json!(null)), 0);
//! assert_eq!(normalize_within(&json!("10"), 0, 5), 5);
//! ```

use std::{borrow::Cow, fmt};

use serde_json::Value;

use crate::coerce::parse_int_prefix;

/// Lower bound used by [`normalize`].
pub const DEFAULT_MIN: i64 = 0;

/// Upper bound used by [`normalize`].
pub const DEFAULT_MAX: i64 = 5;

/// Normalizes `value` into `DEFAULT_MIN..=DEFAULT_MAX`.
///
/// A missing field should be passed as [`Value::Null`]; both resolve to `0`.
#[must_use]
pub fn normalize(value: &Value) -> i64 {
    normalize_within(value, DEFAULT_MIN, DEFAULT_MAX)
}

/// Normalizes `value` into `min..=max`.
///
/// The value is rendered as text, its leading integer is parsed with
/// [`parse_int_prefix`], unparsable input counts as `0`, and the result is
/// clamped. Never fails.
///
/// The bounds are not checked against each other. With `min > max` anything
/// below `min` yields `min` and everything else yields `max`; use
/// [`RatingScale`] to reject such bounds up front.
#[must_use]
#[allow(clippy::manual_clamp)] // `Ord::clamp` panics when `min > max`.
pub fn normalize_within(value: &Value, min: i64, max: i64) -> i64 {
    let parsed = parse_int_prefix(&display_text(value)).unwrap_or(0);

    if parsed < min {
        min
    } else if parsed > max {
        max
    } else {
        parsed
    }
}

/// Renders `value` the way loosely typed UI code would print it before
/// parsing: `null` and booleans by name, arrays comma-joined, objects as an
/// opaque tag.
fn display_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::Null => Cow::Borrowed("null"),
        Value::Bool(true) => Cow::Borrowed("true"),
        Value::Bool(false) => Cow::Borrowed("false"),
        Value::String(text) => Cow::Borrowed(text.as_str()),
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                Cow::Owned(int.to_string())
            } else if let Some(uint) = number.as_u64() {
                Cow::Owned(uint.to_string())
            } else {
                Cow::Owned(float_text(number.as_f64().unwrap_or(f64::NAN)))
            }
        }
        Value::Array(items) => Cow::Owned(
            items
                .iter()
                .map(|item| match item {
                    Value::Null => Cow::Borrowed(""),
                    other => display_text(other),
                })
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Object(_) => Cow::Borrowed("[object Object]"),
    }
}

/// Shortest round-trip text of a float, switching to exponent form for very
/// large and very small magnitudes.
fn float_text(value: f64) -> String {
    let magnitude = value.abs();
    if value.is_finite() && (magnitude >= 1e21 || (magnitude > 0.0 && magnitude < 1e-6)) {
        format!("{value:e}")
    } else {
        value.to_string()
    }
}

// ==============================================================================
// RatingScale
// ==============================================================================

/// A validated pair of rating bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RatingScale {
    min: i64,
    max: i64,
}

impl RatingScale {
    /// Creates a scale covering `min..=max`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidScale`] when `min > max`.
    pub const fn new(min: i64, max: i64) -> Result<Self, InvalidScale> {
        if min > max {
            return Err(InvalidScale { min, max });
        }
        Ok(Self { min, max })
    }

    /// Lowest rating on this scale.
    #[must_use]
    pub const fn min(&self) -> i64 {
        self.min
    }

    /// Highest rating on this scale.
    #[must_use]
    pub const fn max(&self) -> i64 {
        self.max
    }

    /// Normalizes `value` into this scale.
    #[must_use]
    pub fn normalize(&self, value: &Value) -> i64 {
        normalize_within(value, self.min, self.max)
    }
}

impl Default for RatingScale {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN,
            max: DEFAULT_MAX,
        }
    }
}

/// Error returned by [`RatingScale::new`] for inverted bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidScale {
    /// The requested lower bound.
    pub min: i64,
    /// The requested upper bound.
    pub max: i64,
}

impl fmt::Display for InvalidScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rating scale minimum {} is greater than maximum {}",
            self.min, self.max
        )
    }
}

impl std::error::Error for InvalidScale {}
