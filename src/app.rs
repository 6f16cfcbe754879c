//! The movie browser's routes.
//!
//! Two pages: the home page listing movies at `/`, and a movie's detail page
//! at `/:id`. The detail page is only loaded once a detail location is
//! visited, and it receives the movie id as a number prop (`NaN` when the
//! segment is not numeric; the page decides what to show then).

use std::future::Future;

use crate::route::{Component, Page, Props, RouteDef, RouteTable, RouteTableError};

/// Pattern of the home page.
pub const HOME: &str = "/";

/// Pattern of the movie detail page.
pub const DETAIL: &str = "/:id";

/// Name of the movie detail route.
pub const DETAIL_ROUTE: &str = "movie-detail";

/// Path parameter and prop carrying the movie id.
pub const ID: &str = "id";

/// Builds the application's route table.
///
/// `home` is available immediately; `detail` is called on the first
/// navigation to a movie and its page is reused afterwards.
///
/// # Errors
///
/// Never in practice: the two fixed patterns are valid and distinct. The
/// builder's error is passed through rather than unwrapped.
pub fn routes<H, F, Fut, D>(home: H, detail: F) -> Result<RouteTable, RouteTableError>
where
    H: Page + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = D> + Send + 'static,
    D: Page + 'static,
{
    RouteTable::builder()
        .route(RouteDef::new(HOME, Component::eager(home)))
        .route(
            RouteDef::new(DETAIL, Component::lazy(detail))
                .name(DETAIL_ROUTE)
                .props(Props::number(ID)),
        )
        .build()
}

/// Location of the detail page for movie `id`.
#[must_use]
pub fn detail_location(id: u64) -> String {
    format!("/{id}")
}
