//! Catalog of entity schemas.

mod schema;

pub use schema::{Catalog, EntitySchema};
