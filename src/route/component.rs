// ==============================================================================
// Page components, eager or loaded on demand
// ==============================================================================

use std::{fmt, future::Future, pin::Pin, sync::Arc};

use tokio::sync::OnceCell;

use super::params::RouteProps;

/// A page the navigator can mount.
///
/// Pages own their data fetching and markup; the router only hands them the
/// props resolved for the current location.
pub trait Page: Send + Sync + fmt::Debug {
    /// Renders the page for `props`.
    fn render(&self, props: &RouteProps) -> String;
}

/// A shared handle to a loaded page.
pub type PageRef = Arc<dyn Page>;

fn share<P: Page + 'static>(page: P) -> PageRef {
    Arc::new(page)
}

type LoadFuture = Pin<Box<dyn Future<Output = PageRef> + Send>>;
type Loader = Arc<dyn Fn() -> LoadFuture + Send + Sync>;

/// The page a route points at.
///
/// A lazy component does not run its loader until [`load`](Self::load) is
/// first awaited. Concurrent first loads share one loader call, and every
/// clone of the component shares the loaded page.
#[derive(Clone)]
pub struct Component(Source);

#[derive(Clone)]
enum Source {
    Eager(PageRef),
    Lazy {
        loader: Loader,
        cell: Arc<OnceCell<PageRef>>,
    },
}

impl Component {
    /// A page that is available immediately.
    pub fn eager<P: Page + 'static>(page: P) -> Self {
        Self(Source::Eager(share(page)))
    }

    /// A page produced by `loader` on first navigation.
    pub fn lazy<F, Fut, P>(loader: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = P> + Send + 'static,
        P: Page + 'static,
    {
        let loader: Loader = Arc::new(move || -> LoadFuture {
            let pending = loader();
            Box::pin(async move { share(pending.await) })
        });

        Self(Source::Lazy {
            loader,
            cell: Arc::new(OnceCell::new()),
        })
    }

    /// `true` when the page is loaded on demand.
    #[must_use]
    pub const fn is_lazy(&self) -> bool {
        matches!(self.0, Source::Lazy { .. })
    }

    /// `true` once the page is available without running a loader.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        match &self.0 {
            Source::Eager(_) => true,
            Source::Lazy { cell, .. } => cell.initialized(),
        }
    }

    /// Returns the page, running the loader first if this is the first load.
    pub async fn load(&self) -> PageRef {
        match &self.0 {
            Source::Eager(page) => Arc::clone(page),
            Source::Lazy { loader, cell } => {
                let page = cell
                    .get_or_init(|| {
                        tracing::trace!("loading lazy page component");
                        loader()
                    })
                    .await;
                Arc::clone(page)
            }
        }
    }
}

impl From<PageRef> for Component {
    fn from(page: PageRef) -> Self {
        Self(Source::Eager(page))
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Source::Eager(page) => f.debug_tuple("Eager").field(page).finish(),
            Source::Lazy { cell, .. } => f
                .debug_struct("Lazy")
                .field("loaded", &cell.initialized())
                .finish_non_exhaustive(),
        }
    }
}
