//! oqlkit - search criteria for object persistence layers
//!
//! Applications describe a query as a [`SearchCriteria`]: a tree of
//! [`Binding`]s, a list of [`Order`]s, an optional [`Limit`] and a list of
//! [`Projection`]s. [`Oql`] compiles it against an entity type into an
//! object-query-language statement with positional `$n` parameters, which a
//! [`QueryEngine`] executes.
//!
//! ```ignore
//! use oqlkit::{Binding, EntityType, Oql, Order, Relation, SearchCriteria};
//!
//! let criteria = SearchCriteria::new()
//!     .with_binding(Binding::and(vec![
//!         Binding::relational("year", Relation::GreaterEqual, 2001),
//!         Binding::like("name", "%foo%"),
//!     ])?)
//!     .with_order(Order::desc("year"));
//!
//! let oql = Oql::new(&EntityType::new("com.example.Widget")?, Some(&criteria))?;
//! assert_eq!(
//!     oql.statement(),
//!     "SELECT DISTINCT o FROM com.example.Widget o WHERE  (o.year >= $1 AND o.name LIKE $2) ORDER BY o.year DESC"
//! );
//! ```

pub mod catalog;
pub mod compiler;
pub mod criteria;
pub mod dao;
pub mod error;
pub mod types;

pub use catalog::{Catalog, EntitySchema};
pub use compiler::{Entity, EntityType, Oql, OqlConfig};
pub use criteria::{
    AggregateFunction, Binding, Limit, Order, Projection, Relation, SearchCriteria, WHOLE_OBJECT,
};
pub use dao::{Dao, QueryEngine};
pub use error::{OqlError, Result};
pub use types::{QueryResult, Row, Value};
