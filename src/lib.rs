//! # `movie-routes`
//!
//! Routing and rating display for a small movie browser: a home page at `/`,
//! a movie detail page at `/:id`, and a rating normalizer that turns whatever
//! a movie payload carries into a whole number of stars.
//!
//! The route table is built once at startup and handed to a [`Navigator`],
//! which resolves locations to pages:
//!
//! ```rust,ignore
//! use movie_routes::{Navigator, app, rating};
//!
//! let navigator = Navigator::new(app::routes(HomePage, || async { DetailPage })?);
//!
//! let route = navigator.navigate("/42").await?;   // detail page loads here
//! assert_eq!(route.props.number("id"), Some(42.0));
//!
//! let stars = rating::normalize(&movie["rating"]); // always 0..=5
//! ```
//!
//! Mount the navigator under a base path with [`HistoryBaseLayer`]:
//!
//! ```rust,ignore
//! use tower::ServiceBuilder;
//!
//! let navigator = ServiceBuilder::new()
//!     .layer(HistoryBaseLayer::new("/films"))
//!     .service(Navigator::new(table));
//! ```

pub mod app;
pub mod coerce;
mod history_base;
mod navigator;
pub mod rating;
pub mod route;
mod syntax;

pub use history_base::{HistoryBase, HistoryBaseLayer};
pub use navigator::{NavigationError, Navigator, ResolvedRoute};
pub use route::RouteTable;
