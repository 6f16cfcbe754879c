// ==============================================================================
// Syntax Translation: route patterns → wayfind
// ==============================================================================
//
// Route patterns are written with `:name` dynamic segments (`/:id`), while
// wayfind uses `<name>`. We translate at table-build time so route
// definitions read like the locations they match and the wayfind engine
// receives its native syntax.

use std::{fmt, sync::Arc};

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// Characters escaped when a parameter value is written back into a path
/// segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// A route pattern after validation.
#[allow(clippy::redundant_pub_crate)] // Explicit crate visibility on private-module item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ParsedPattern {
    /// The pattern in wayfind syntax.
    pub(crate) wayfind: String,
    /// Dynamic segment names, in declaration order.
    pub(crate) params: Vec<Arc<str>>,
}

/// Why a route pattern was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PatternError {
    /// The pattern does not start with `/`.
    MissingLeadingSlash,
    /// A `:` segment has no name after it.
    EmptyParamName,
    /// A dynamic segment name contains something other than ASCII
    /// alphanumerics and `_`.
    InvalidParamName(String),
    /// The same dynamic segment name appears twice.
    DuplicateParam(String),
    /// A static segment contains a character reserved by the matcher.
    ReservedCharacter(char),
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingLeadingSlash => write!(f, "pattern must start with `/`"),
            Self::EmptyParamName => write!(f, "dynamic segment `:` has no name"),
            Self::InvalidParamName(name) => write!(f, "invalid parameter name `{name}`"),
            Self::DuplicateParam(name) => write!(f, "parameter `{name}` appears more than once"),
            Self::ReservedCharacter(ch) => write!(f, "reserved character `{ch}` in static segment"),
        }
    }
}

impl std::error::Error for PatternError {}

/// Translates a route pattern to wayfind syntax.
///
/// - `/:name` → `/<name>`
/// - static segments and the leading `/` are preserved as-is
#[allow(clippy::redundant_pub_crate)] // Explicit crate visibility on private-module item.
pub(crate) fn parse_pattern(pattern: &str) -> Result<ParsedPattern, PatternError> {
    let Some(rest) = pattern.strip_prefix('/') else {
        return Err(PatternError::MissingLeadingSlash);
    };

    let mut wayfind = String::with_capacity(pattern.len() + 2);
    let mut params: Vec<Arc<str>> = Vec::new();

    for segment in rest.split('/') {
        wayfind.push('/');

        if let Some(name) = segment.strip_prefix(':') {
            if name.is_empty() {
                return Err(PatternError::EmptyParamName);
            }
            if !name.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_') {
                return Err(PatternError::InvalidParamName(name.to_owned()));
            }
            if params.iter().any(|existing| &**existing == name) {
                return Err(PatternError::DuplicateParam(name.to_owned()));
            }
            wayfind.push('<');
            wayfind.push_str(name);
            wayfind.push('>');
            params.push(Arc::from(name));
        } else {
            if let Some(ch) = segment.chars().find(|ch| matches!(ch, '<' | '>' | ':' | '{' | '}')) {
                return Err(PatternError::ReservedCharacter(ch));
            }
            wayfind.push_str(segment);
        }
    }

    Ok(ParsedPattern { wayfind, params })
}

/// Fills the dynamic segments of a validated pattern, percent-encoding each
/// value. Returns the name of the first parameter `lookup` cannot supply.
#[allow(clippy::redundant_pub_crate)] // Explicit crate visibility on private-module item.
pub(crate) fn fill_pattern<'a, F>(pattern: &'a str, mut lookup: F) -> Result<String, &'a str>
where
    F: FnMut(&str) -> Option<&'a str>,
{
    let mut path = String::with_capacity(pattern.len());

    for segment in pattern.split('/').skip(1) {
        path.push('/');
        match segment.strip_prefix(':') {
            Some(name) => {
                let value = lookup(name).ok_or(name)?;
                path.extend(utf8_percent_encode(value, SEGMENT));
            }
            None => path.push_str(segment),
        }
    }

    if path.is_empty() {
        path.push('/');
    }
    Ok(path)
}
