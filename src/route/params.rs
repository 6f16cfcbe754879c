// ==============================================================================
// Route parameters and page props
// ==============================================================================
//
// `RouteParams` holds the raw, percent-decoded strings captured by the
// wayfind match. A route's `Props` rule turns them into the `RouteProps` a
// page is mounted with.

use std::{collections::BTreeMap, fmt, sync::Arc};

use serde::Serialize;

use crate::coerce::to_number;

// ==============================================================================
// RouteParams
// ==============================================================================

/// Parameters captured from the dynamic segments of a matched location.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RouteParams(Vec<(Arc<str>, Arc<str>)>);

impl RouteParams {
    /// Build `RouteParams` from a wayfind `Match`, percent-decoding each
    /// value.
    ///
    /// Bytes that are not valid UTF-8 after decoding are replaced rather
    /// than rejected: a matched route always resolves.
    pub(crate) fn from_match<T>(matched: &wayfind::Match<'_, '_, T>) -> Self {
        let mut params = Vec::with_capacity(matched.parameters.len());

        for (key, value) in &matched.parameters {
            let decoded = percent_encoding::percent_decode_str(value).decode_utf8_lossy();
            params.push((Arc::from(*key), Arc::from(&*decoded)));
        }

        Self(params)
    }

    /// Returns the decoded value captured for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| &**key == name)
            .map(|(_, value)| &**value)
    }

    /// Iterates `(name, value)` pairs in pattern order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, value)| (&**key, &**value))
    }

    /// Number of captured parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` when the matched pattern has no dynamic segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RouteParams
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (Arc::from(key.as_ref()), Arc::from(value.as_ref())))
                .collect(),
        )
    }
}

// ==============================================================================
// RouteProps
// ==============================================================================

/// A single input property handed to a page.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropValue {
    /// A coerced number. May be `NaN` or infinite.
    Number(f64),
    /// Text passed through unchanged.
    Text(String),
}

/// Named input properties a page is mounted with.
///
/// Serializes as a JSON object. Non-finite numbers serialize as `null`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RouteProps(BTreeMap<String, PropValue>);

impl RouteProps {
    /// Creates an empty set of props.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a property.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: PropValue) -> Self {
        self.0.insert(name.into(), value);
        self
    }

    /// Returns the property called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.0.get(name)
    }

    /// Returns `name` when it holds a number.
    #[must_use]
    pub fn number(&self, name: &str) -> Option<f64> {
        match self.0.get(name)? {
            PropValue::Number(n) => Some(*n),
            PropValue::Text(_) => None,
        }
    }

    /// Returns `name` when it holds text.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.0.get(name)? {
            PropValue::Text(text) => Some(text.as_str()),
            PropValue::Number(_) => None,
        }
    }

    /// Number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` when no properties are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ==============================================================================
// Props — how a route derives page props from its params
// ==============================================================================

type PropsFn = Arc<dyn Fn(&RouteParams) -> RouteProps + Send + Sync>;

/// How a route turns its captured parameters into page props.
#[derive(Clone, Default)]
pub enum Props {
    /// The page receives no props.
    #[default]
    None,
    /// Every captured parameter is passed through as text.
    Params,
    /// Props are computed from the parameters.
    Custom(PropsFn),
}

impl Props {
    /// Computes props with `f`.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&RouteParams) -> RouteProps + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Passes parameter `name` as a number prop of the same name, converted
    /// with [`to_number`]. Unconvertible and missing values become `NaN`;
    /// nothing is rejected.
    #[must_use]
    pub fn number(name: &'static str) -> Self {
        Self::custom(move |params| {
            let value = params.get(name).map_or(f64::NAN, to_number);
            RouteProps::new().with(name, PropValue::Number(value))
        })
    }

    pub(crate) fn resolve(&self, params: &RouteParams) -> RouteProps {
        match self {
            Self::None => RouteProps::new(),
            Self::Params => RouteProps(
                params
                    .iter()
                    .map(|(key, value)| (key.to_owned(), PropValue::Text(value.to_owned())))
                    .collect(),
            ),
            Self::Custom(f) => f(params),
        }
    }
}

impl fmt::Debug for Props {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Params => f.write_str("Params"),
            Self::Custom(_) => f.debug_tuple("Custom").finish_non_exhaustive(),
        }
    }
}
