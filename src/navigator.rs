// ==============================================================================
// Navigator — resolves locations against a RouteTable
// ==============================================================================
//
// The navigator is the only consumer of the route table. For each location it
// matches the path, derives the page props, loads the page (running a lazy
// loader on first use) and hands back a `ResolvedRoute`. Locations the table
// does not match go to the fallback.
//
// Resolution is exposed as a `tower::Service<Uri>` so history handling and
// other middleware compose as layers.

use std::{
    fmt,
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use http::Uri;
use tower_service::Service;

use crate::route::{Component, PageRef, RouteParams, RouteProps, RouteTable};

// ==============================================================================
// Fallback
// ==============================================================================

/// How to handle locations that don't match any route.
#[derive(Clone, Debug)]
enum Fallback {
    /// Fail with [`NavigationError::NotFound`].
    Default,
    /// Show a page, with no params and no props.
    Page(Component),
}

// ==============================================================================
// ResolvedRoute
// ==============================================================================

/// The outcome of navigating to a location.
#[derive(Clone)]
pub struct ResolvedRoute {
    /// The path that was resolved, after any history base was stripped.
    pub path: Arc<str>,
    /// The matched pattern, or `None` when the fallback page is shown.
    pub pattern: Option<Arc<str>>,
    /// The matched route's name.
    pub name: Option<Arc<str>>,
    /// Parameters captured from the path.
    pub params: RouteParams,
    /// Props the page is mounted with.
    pub props: RouteProps,
    /// The loaded page.
    pub page: PageRef,
}

impl ResolvedRoute {
    /// `true` when no route matched and the fallback page is shown.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        self.pattern.is_none()
    }

    /// Renders the page with its props.
    #[must_use]
    pub fn render(&self) -> String {
        self.page.render(&self.props)
    }
}

impl fmt::Debug for ResolvedRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedRoute")
            .field("path", &self.path)
            .field("pattern", &self.pattern)
            .field("name", &self.name)
            .field("params", &self.params)
            .field("props", &self.props)
            .finish_non_exhaustive()
    }
}

// ==============================================================================
// NavigationError
// ==============================================================================

/// Why a location could not be resolved.
#[derive(Debug)]
#[non_exhaustive]
pub enum NavigationError {
    /// No route matched and no fallback page is configured.
    NotFound {
        /// The unmatched path.
        path: String,
    },
    /// The location string is not a valid URI reference.
    InvalidLocation(http::uri::InvalidUri),
    /// The location has no absolute path, as in `42` or `movies`.
    RelativeLocation {
        /// The location as given.
        location: String,
    },
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path } => write!(f, "no route matches `{path}`"),
            Self::InvalidLocation(err) => write!(f, "invalid location: {err}"),
            Self::RelativeLocation { location } => {
                write!(f, "location `{location}` does not start with `/`")
            }
        }
    }
}

impl std::error::Error for NavigationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidLocation(err) => Some(err),
            Self::NotFound { .. } | Self::RelativeLocation { .. } => None,
        }
    }
}

impl From<http::uri::InvalidUri> for NavigationError {
    fn from(err: http::uri::InvalidUri) -> Self {
        Self::InvalidLocation(err)
    }
}

// ==============================================================================
// Navigator
// ==============================================================================

/// Resolves locations to pages using a shared [`RouteTable`].
///
/// ```rust,no_run
/// use movie_routes::{Navigator, app};
/// # use movie_routes::route::{Page, RouteProps};
/// # #[derive(Debug)] struct Home;
/// # impl Page for Home { fn render(&self, _: &RouteProps) -> String { String::new() } }
/// # #[derive(Debug)] struct Detail;
/// # impl Page for Detail { fn render(&self, _: &RouteProps) -> String { String::new() } }
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let table = app::routes(Home, || async { Detail })?;
/// let navigator = Navigator::new(table);
///
/// let route = navigator.navigate("/42").await?;
/// assert_eq!(route.props.number("id"), Some(42.0));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Navigator {
    table: Arc<RouteTable>,
    fallback: Fallback,
}

impl Navigator {
    /// Create a navigator over `table`.
    pub fn new(table: impl Into<Arc<RouteTable>>) -> Self {
        Self {
            table: table.into(),
            fallback: Fallback::Default,
        }
    }

    /// Show `component` for locations that don't match any route.
    #[must_use]
    pub fn fallback(mut self, component: Component) -> Self {
        self.fallback = Fallback::Page(component);
        self
    }

    /// The table this navigator resolves against.
    #[must_use]
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Parse `location` and resolve it.
    ///
    /// Any fragment is ignored and the query string takes no part in
    /// matching.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::InvalidLocation`] when `location` does not
    /// parse, [`NavigationError::RelativeLocation`] when its path does not
    /// start with `/`, and [`NavigationError::NotFound`] when nothing matches
    /// and no fallback page is configured.
    pub async fn navigate(&self, location: &str) -> Result<ResolvedRoute, NavigationError> {
        let location = location.split_once('#').map_or(location, |(before, _)| before);
        let uri: Uri = location.parse()?;
        resolve(&self.table, &self.fallback, &uri).await
    }
}

/// Match the path of `location`, derive its props and load its page.
async fn resolve(
    table: &RouteTable,
    fallback: &Fallback,
    location: &Uri,
) -> Result<ResolvedRoute, NavigationError> {
    // `"42".parse::<Uri>()` is an authority with an empty path.
    if !location.path().starts_with('/') {
        tracing::warn!(%location, "location has no absolute path");
        return Err(NavigationError::RelativeLocation {
            location: location.to_string(),
        });
    }
    let path: Arc<str> = Arc::from(location.path());

    let Some(matched) = table.find(&path) else {
        return match fallback {
            Fallback::Default => {
                tracing::warn!(%path, "no route matches location");
                Err(NavigationError::NotFound {
                    path: path.to_string(),
                })
            }
            Fallback::Page(component) => {
                tracing::debug!(%path, "showing fallback page");
                Ok(ResolvedRoute {
                    path,
                    pattern: None,
                    name: None,
                    params: RouteParams::default(),
                    props: RouteProps::new(),
                    page: component.load().await,
                })
            }
        };
    };

    let pattern = matched.pattern_arc();
    let name = matched.name_arc();
    let props = matched.props();
    let component = matched.component().clone();
    let params = matched.params().clone();

    tracing::debug!(%path, %pattern, lazy = component.is_lazy(), "resolved location");

    Ok(ResolvedRoute {
        path,
        pattern: Some(pattern),
        name,
        params,
        props,
        page: component.load().await,
    })
}

// ==============================================================================
// Service<Uri> for Navigator
// ==============================================================================

impl Service<Uri> for Navigator {
    type Response = ResolvedRoute;
    type Error = NavigationError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, location: Uri) -> Self::Future {
        let table = Arc::clone(&self.table);
        let fallback = self.fallback.clone();
        Box::pin(async move { resolve(&table, &fallback, &location).await })
    }
}
