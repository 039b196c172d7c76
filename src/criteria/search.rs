//! The aggregate describing one query: binding, orders, limit, projections.

use serde::{Deserialize, Serialize};

use crate::criteria::{Binding, Limit, Order, Projection};
use crate::error::{OqlError, Result};

/// Everything a query needs besides the target entity type.
///
/// List mutators are all-or-nothing: a replace whose input holds a missing
/// (`None`) element fails and leaves the current list untouched, so callers
/// can fix the input and retry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchCriteria {
    binding: Option<Binding>,
    orders: Vec<Order>,
    limit: Option<Limit>,
    projections: Vec<Projection>,
    distinct: bool,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            binding: None,
            orders: Vec::new(),
            limit: None,
            projections: Vec::new(),
            distinct: true,
        }
    }
}

impl SearchCriteria {
    /// Creates empty criteria (no restriction, distinct results).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root binding.
    #[must_use]
    pub fn with_binding(mut self, binding: Binding) -> Self {
        self.binding = Some(binding);
        self
    }

    /// Appends an order.
    #[must_use]
    pub fn with_order(mut self, order: Order) -> Self {
        self.orders.push(order);
        self
    }

    /// Sets the limit.
    #[must_use]
    pub fn with_limit(mut self, limit: Limit) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Appends a projection.
    #[must_use]
    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projections.push(projection);
        self
    }

    /// Sets the distinct flag.
    #[must_use]
    pub fn with_distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }

    // ------------------------------------------------------------------
    // Binding / limit / distinct
    // ------------------------------------------------------------------

    /// Returns the root binding.
    #[must_use]
    pub fn binding(&self) -> Option<&Binding> {
        self.binding.as_ref()
    }

    /// Replaces the root binding.
    pub fn set_binding(&mut self, binding: Option<Binding>) {
        self.binding = binding;
    }

    /// Returns the limit.
    #[must_use]
    pub fn limit(&self) -> Option<&Limit> {
        self.limit.as_ref()
    }

    /// Replaces the limit.
    pub fn set_limit(&mut self, limit: Option<Limit>) {
        self.limit = limit;
    }

    /// Returns whether duplicate results are removed.
    #[must_use]
    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    /// Sets whether duplicate results are removed.
    pub fn set_distinct(&mut self, distinct: bool) {
        self.distinct = distinct;
    }

    // ------------------------------------------------------------------
    // Orders
    // ------------------------------------------------------------------

    /// Returns the orders in precedence order.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Appends one order.
    ///
    /// # Errors
    ///
    /// Returns an error if `order` is `None`.
    pub fn add_order(&mut self, order: impl Into<Option<Order>>) -> Result<()> {
        let order = order
            .into()
            .ok_or_else(|| OqlError::InvalidArgument("order must not be missing".to_string()))?;
        self.orders.push(order);
        Ok(())
    }

    /// Replaces all orders. An empty input clears the list.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the current orders unchanged, if any element
    /// is `None`.
    pub fn set_orders<I, O>(&mut self, orders: I) -> Result<()>
    where
        I: IntoIterator<Item = O>,
        O: Into<Option<Order>>,
    {
        self.orders = collect_all("orders", orders)?;
        Ok(())
    }

    /// Removes all orders.
    pub fn clear_orders(&mut self) {
        self.orders.clear();
    }

    // ------------------------------------------------------------------
    // Projections
    // ------------------------------------------------------------------

    /// Returns the projections in select order.
    #[must_use]
    pub fn projections(&self) -> &[Projection] {
        &self.projections
    }

    /// Appends one projection.
    ///
    /// # Errors
    ///
    /// Returns an error if `projection` is `None`.
    pub fn add_projection(&mut self, projection: impl Into<Option<Projection>>) -> Result<()> {
        let projection = projection.into().ok_or_else(|| {
            OqlError::InvalidArgument("projection must not be missing".to_string())
        })?;
        self.projections.push(projection);
        Ok(())
    }

    /// Replaces all projections. An empty input clears the list.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the current projections unchanged, if any
    /// element is `None`.
    pub fn set_projections<I, P>(&mut self, projections: I) -> Result<()>
    where
        I: IntoIterator<Item = P>,
        P: Into<Option<Projection>>,
    {
        self.projections = collect_all("projections", projections)?;
        Ok(())
    }

    /// Removes all projections.
    pub fn clear_projections(&mut self) {
        self.projections.clear();
    }
}

/// Collects every element or reports the first missing index.
fn collect_all<T, I, E>(what: &str, items: I) -> Result<Vec<T>>
where
    I: IntoIterator<Item = E>,
    E: Into<Option<T>>,
{
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            item.into().ok_or_else(|| {
                OqlError::InvalidArgument(format!("{what}[{i}] must not be missing"))
            })
        })
        .collect()
}
