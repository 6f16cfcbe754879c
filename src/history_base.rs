// ==============================================================================
// HistoryBase Middleware
// ==============================================================================
//
// An application served below a base path (`/films/`) sees locations such as
// `/films/42`. This layer strips the base before the location reaches the
// navigator, so route patterns stay relative to the application root.

use std::{
    sync::Arc,
    task::{Context, Poll},
};

use http::Uri;
use tower_service::Service;

// ==============================================================================
// HistoryBaseLayer
// ==============================================================================

/// A [`tower::Layer`] that wraps a navigation service with [`HistoryBase`].
///
/// [`tower::Layer`]: tower_layer::Layer
#[derive(Clone, Debug)]
pub struct HistoryBaseLayer {
    base: Arc<str>,
}

impl HistoryBaseLayer {
    /// Strips `base` (e.g. `"/films"`) from every location.
    #[must_use]
    pub fn new(base: &str) -> Self {
        Self {
            base: Arc::from(base),
        }
    }
}

impl<S> tower_layer::Layer<S> for HistoryBaseLayer {
    type Service = HistoryBase<S>;

    fn layer(&self, inner: S) -> Self::Service {
        HistoryBase {
            inner,
            base: Arc::clone(&self.base),
        }
    }
}

// ==============================================================================
// HistoryBase Service
// ==============================================================================

/// Middleware that strips the history base from navigated locations.
///
/// Locations outside the base are forwarded unchanged.
#[derive(Clone, Debug)]
pub struct HistoryBase<S> {
    inner: S,
    base: Arc<str>,
}

impl<S> Service<Uri> for HistoryBase<S>
where
    S: Service<Uri>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    #[inline]
    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, location: Uri) -> Self::Future {
        match strip_base(&location, &self.base) {
            Some(stripped) => {
                tracing::trace!(from = %location, to = %stripped, "stripped history base");
                self.inner.call(stripped)
            }
            None => self.inner.call(location),
        }
    }
}

// ==============================================================================
// Base stripping
// ==============================================================================

/// Returns `location` relative to `base`, or `None` when `base` is not a
/// whole-segment prefix of its path.
///
/// `/films/42` under base `/films` becomes `/42`; `/films` itself becomes
/// `/`. The query string is kept and `/filmsx` is not under `/films`.
fn strip_base(location: &Uri, base: &str) -> Option<Uri> {
    let path_and_query = location.path_and_query()?;
    let path = path_and_query.path();

    // Bytes of `path` covered by the base, each `/` included.
    let mut covered = 0_usize;
    for pair in pair_segments(segments(path), segments(base)) {
        covered += 1;

        match pair {
            Pair::Both(segment, base_segment) if segment == base_segment => {
                covered += segment.len();
            }
            // `/films/` ends in an empty segment: everything after it is ours.
            Pair::Both(_, "") | Pair::PathOnly(_) => break,
            Pair::Both(..) | Pair::BaseOnly(_) => return None,
        }
    }

    let rest = path.get(covered..).unwrap_or_default();
    let rebuilt = match (rest.starts_with('/'), path_and_query.query()) {
        (true, None) => rest.to_owned(),
        (true, Some(query)) => format!("{rest}?{query}"),
        (false, None) => format!("/{rest}"),
        (false, Some(query)) => format!("/{rest}?{query}"),
    };

    let mut parts = http::uri::Parts::default();
    parts.scheme = location.scheme().cloned();
    parts.authority = location.authority().cloned();
    parts.path_and_query = Some(rebuilt.parse().ok()?);

    Uri::from_parts(parts).ok()
}

// ==============================================================================
// Helpers
// ==============================================================================

/// The segments of an absolute path: `/films/42` yields `films`, `42`.
fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').skip(1)
}

/// Pairs location segments with base segments until both run out.
fn pair_segments<'a>(
    path: impl Iterator<Item = &'a str>,
    base: impl Iterator<Item = &'a str>,
) -> impl Iterator<Item = Pair<'a>> {
    let path = path.map(Some).chain(std::iter::repeat(None));
    let base = base.map(Some).chain(std::iter::repeat(None));
    path.zip(base).map_while(|pair| match pair {
        (Some(segment), Some(base_segment)) => Some(Pair::Both(segment, base_segment)),
        (Some(segment), None) => Some(Pair::PathOnly(segment)),
        (None, Some(base_segment)) => Some(Pair::BaseOnly(base_segment)),
        (None, None) => None,
    })
}

/// One step of [`pair_segments`].
enum Pair<'a> {
    Both(&'a str, &'a str),
    /// The base is used up.
    PathOnly(&'a str),
    /// The location is shorter than the base.
    BaseOnly(&'a str),
}
