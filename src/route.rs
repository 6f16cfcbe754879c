//! Route definitions and the table that dispatches locations to pages.
//!
//! Patterns use `:name` for a dynamic segment. A route may be named, may
//! load its page lazily and may derive page props from its parameters:
//!
//! | Pattern | Page | Props |
//! |---|---|---|
//! | `/` | home | none |
//! | `/:id` | movie detail, loaded on first visit | `{ id: Number(id) }` |

mod component;
mod params;
mod table;

pub use component::{Component, Page, PageRef};
pub use params::{PropValue, Props, RouteParams, RouteProps};
pub use table::{HrefError, RouteDef, RouteMatch, RouteTable, RouteTableBuilder, RouteTableError};

pub use crate::syntax::PatternError;
