//! Search criteria model.
//!
//! Applications build a [`SearchCriteria`] from bindings, orders, a limit and
//! projections, then hand it to [`crate::compiler::Oql`].

mod binding;
mod order;
mod projection;
mod relation;
mod search;

pub use binding::{
    Binding, InBinding, LikeBinding, LogicalBinding, NotBinding, NullBinding, RelationalBinding,
    TextMatchBinding,
};
pub use order::{Limit, Order};
pub use projection::{AggregateFunction, Projection, WHOLE_OBJECT};
pub use relation::Relation;
pub use search::SearchCriteria;
