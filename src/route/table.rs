// ==============================================================================
// RouteTable — immutable dispatch table backed by wayfind
// ==============================================================================
//
// The table is built once from an ordered list of `RouteDef`s and never
// changes afterwards. Patterns are translated to wayfind syntax at build
// time; lookups go through the wayfind tree and come back as `RouteMatch`es
// carrying the captured parameters.

use std::{collections::HashMap, fmt, sync::Arc};

use super::{
    component::Component,
    params::{Props, RouteParams, RouteProps},
};
use crate::syntax::{self, PatternError};

// ==============================================================================
// RouteId
// ==============================================================================

/// An opaque identifier for a registered route, used as an index into the
/// `entries` vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct RouteId(usize);

// ==============================================================================
// RouteDef
// ==============================================================================

/// One route definition: a pattern, the page it shows, an optional name and
/// the rule that derives the page's props.
///
/// ```rust
/// use movie_routes::route::{Component, Page, Props, RouteDef, RouteProps};
///
/// #[derive(Debug)]
/// struct Detail;
///
/// impl Page for Detail {
///     fn render(&self, _props: &RouteProps) -> String {
///         String::new()
///     }
/// }
///
/// let def = RouteDef::new("/:id", Component::lazy(|| async { Detail }))
///     .name("movie-detail")
///     .props(Props::number("id"));
/// # let _ = def;
/// ```
#[derive(Debug, Clone)]
pub struct RouteDef {
    pattern: String,
    component: Component,
    name: Option<String>,
    props: Props,
}

impl RouteDef {
    /// A route showing `component` at `pattern`, with no name and no props.
    pub fn new(pattern: impl Into<String>, component: Component) -> Self {
        Self {
            pattern: pattern.into(),
            component,
            name: None,
            props: Props::None,
        }
    }

    /// Names the route so locations can be built with [`RouteTable::href`].
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets how page props are derived from the captured parameters.
    #[must_use]
    pub fn props(mut self, props: Props) -> Self {
        self.props = props;
        self
    }
}

// ==============================================================================
// RouteTable
// ==============================================================================

#[derive(Clone)]
struct Entry {
    pattern: Arc<str>,
    name: Option<Arc<str>>,
    component: Component,
    props: Props,
}

/// The application's route table.
///
/// Construct it once with [`RouteTable::builder`] and share it (it is
/// `Send + Sync`); there is no global instance.
#[derive(Clone)]
pub struct RouteTable {
    /// wayfind path tree: maps translated patterns to `RouteId`.
    wayfind: wayfind::Router<RouteId>,
    /// Routes indexed by `RouteId`, in declaration order.
    entries: Vec<Entry>,
    /// Route name → `RouteId`.
    names: HashMap<Arc<str>, RouteId>,
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable")
            .field(
                "patterns",
                &self.entries.iter().map(|e| &*e.pattern).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

impl RouteTable {
    /// Start building a table.
    #[must_use]
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    /// Number of routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when the table has no routes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The patterns of all routes, in declaration order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| &*e.pattern)
    }

    /// Matches `path` (no query, no fragment) against the table.
    ///
    /// One trailing slash is optional: `/42/` matches the same route as
    /// `/42`.
    #[must_use]
    pub fn find(&self, path: &str) -> Option<RouteMatch<'_>> {
        let matched = self.wayfind.search(path).or_else(|| {
            let trimmed = path
                .strip_suffix('/')
                .filter(|rest| !rest.is_empty() && !rest.ends_with('/'))?;
            self.wayfind.search(trimmed)
        })?;
        let route_id = *matched.data;

        Some(RouteMatch {
            entry: &self.entries[route_id.0],
            params: RouteParams::from_match(&matched),
        })
    }

    /// Returns the component of the route called `name`.
    #[must_use]
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.names
            .get(name)
            .map(|route_id| &self.entries[route_id.0].component)
    }

    /// Builds the location of the route called `name`, percent-encoding each
    /// parameter value.
    ///
    /// # Errors
    ///
    /// Returns [`HrefError`] when no route has that name or a dynamic
    /// segment has no value in `params`.
    pub fn href(&self, name: &str, params: &[(&str, &str)]) -> Result<String, HrefError> {
        let route_id = self
            .names
            .get(name)
            .ok_or_else(|| HrefError::UnknownRoute(name.to_owned()))?;
        let pattern = &*self.entries[route_id.0].pattern;

        syntax::fill_pattern(pattern, |param| {
            params
                .iter()
                .find(|(key, _)| *key == param)
                .map(|(_, value)| *value)
        })
        .map_err(|param| HrefError::MissingParam {
            route: name.to_owned(),
            param: param.to_owned(),
        })
    }
}

// ==============================================================================
// RouteMatch
// ==============================================================================

/// A route matched against a concrete path.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    entry: &'a Entry,
    params: RouteParams,
}

impl RouteMatch<'_> {
    /// The pattern of the matched route (e.g. `"/:id"`).
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.entry.pattern
    }

    /// The matched route's name, if it has one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.entry.name.as_deref()
    }

    /// Parameters captured from the path.
    #[must_use]
    pub const fn params(&self) -> &RouteParams {
        &self.params
    }

    /// Props for the page, derived by the route's [`Props`] rule.
    #[must_use]
    pub fn props(&self) -> RouteProps {
        self.entry.props.resolve(&self.params)
    }

    /// The page this route shows.
    #[must_use]
    pub const fn component(&self) -> &Component {
        &self.entry.component
    }

    pub(crate) fn pattern_arc(&self) -> Arc<str> {
        Arc::clone(&self.entry.pattern)
    }

    pub(crate) fn name_arc(&self) -> Option<Arc<str>> {
        self.entry.name.clone()
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("pattern", &self.pattern)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

// ==============================================================================
// RouteTableBuilder
// ==============================================================================

/// Collects route definitions and validates them into a [`RouteTable`].
#[derive(Debug, Default)]
pub struct RouteTableBuilder {
    defs: Vec<RouteDef>,
}

impl RouteTableBuilder {
    /// Appends a route.
    #[must_use]
    pub fn route(mut self, def: RouteDef) -> Self {
        self.defs.push(def);
        self
    }

    /// Validates the routes and builds the table.
    ///
    /// # Errors
    ///
    /// Returns [`RouteTableError`] when a pattern is malformed, two routes
    /// share a pattern or a name, or the matcher rejects a pattern (for
    /// instance `/:id` next to `/:slug`).
    pub fn build(self) -> Result<RouteTable, RouteTableError> {
        let mut wayfind = wayfind::Router::new();
        let mut entries: Vec<Entry> = Vec::with_capacity(self.defs.len());
        let mut names = HashMap::new();

        for def in self.defs {
            let RouteDef {
                pattern,
                component,
                name,
                props,
            } = def;

            if entries.iter().any(|e| *e.pattern == *pattern) {
                return Err(RouteTableError::DuplicatePattern(pattern));
            }

            let parsed = syntax::parse_pattern(&pattern).map_err(|source| {
                RouteTableError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                }
            })?;

            let route_id = RouteId(entries.len());
            tracing::trace!(%pattern, params = ?parsed.params, "registering route");
            wayfind
                .insert(&parsed.wayfind, route_id)
                .map_err(|err| RouteTableError::Rejected {
                    pattern: pattern.clone(),
                    reason: err.to_string(),
                })?;

            let name: Option<Arc<str>> = name.map(Arc::from);
            if let Some(name) = &name
                && names.insert(Arc::clone(name), route_id).is_some()
            {
                return Err(RouteTableError::DuplicateName(name.to_string()));
            }

            entries.push(Entry {
                pattern: Arc::from(pattern),
                name,
                component,
                props,
            });
        }

        tracing::debug!(routes = entries.len(), "route table built");

        Ok(RouteTable {
            wayfind,
            entries,
            names,
        })
    }
}

// ==============================================================================
// Errors
// ==============================================================================

/// Why a [`RouteTable`] could not be built.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RouteTableError {
    /// A pattern is malformed.
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// What is wrong with it.
        source: PatternError,
    },
    /// Two routes share a pattern.
    DuplicatePattern(String),
    /// Two routes share a name.
    DuplicateName(String),
    /// The matcher refused the pattern, usually because it overlaps an
    /// earlier one.
    Rejected {
        /// The offending pattern.
        pattern: String,
        /// The matcher's explanation.
        reason: String,
    },
}

impl fmt::Display for RouteTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPattern { pattern, source } => {
                write!(f, "invalid route pattern `{pattern}`: {source}")
            }
            Self::DuplicatePattern(pattern) => write!(f, "duplicate route pattern `{pattern}`"),
            Self::DuplicateName(name) => write!(f, "duplicate route name `{name}`"),
            Self::Rejected { pattern, reason } => {
                write!(f, "failed to insert route `{pattern}`: {reason}")
            }
        }
    }
}

impl std::error::Error for RouteTableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidPattern { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Why [`RouteTable::href`] could not build a location.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HrefError {
    /// No route has the requested name.
    UnknownRoute(String),
    /// A dynamic segment had no value.
    MissingParam {
        /// The route name.
        route: String,
        /// The parameter without a value.
        param: String,
    },
}

impl fmt::Display for HrefError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownRoute(name) => write!(f, "no route named `{name}`"),
            Self::MissingParam { route, param } => {
                write!(f, "route `{route}` requires parameter `{param}`")
            }
        }
    }
}

impl std::error::Error for HrefError {}
