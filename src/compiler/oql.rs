//! Compiled object-query statements.

use tracing::{debug, trace};

use crate::criteria::{Limit, Order, SearchCriteria};
use crate::error::Result;
use crate::types::Value;

use super::render;
use super::{EntityType, OqlConfig};

/// Aggregate selection used by [`Oql::count_statement`].
const COUNT_SELECT: &str = "SELECT count(*)";

/// A search criteria compiled against one entity type.
///
/// All clauses and the parameter list are rendered once at construction and
/// never change afterwards; the statement builders only read them, so one
/// instance can be shared across threads and reused for paginated variants.
///
/// ```ignore
/// let oql = Oql::new(&EntityType::new("com.example.Widget")?, Some(&criteria))?;
/// engine.execute(&oql.statement(), oql.parameter_values())?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Oql {
    alias: String,
    render_limit: bool,
    select_clause: String,
    from_clause: String,
    where_clause: String,
    order_clause: String,
    limit_clause: String,
    parameter_values: Vec<Value>,
}

impl Oql {
    /// Compiles `criteria` with the default alias and limit rendering off.
    ///
    /// # Errors
    ///
    /// Returns an error if any node of the criteria is malformed.
    pub fn new(entity: &EntityType, criteria: Option<&SearchCriteria>) -> Result<Self> {
        Self::compile(entity, &OqlConfig::default(), criteria)
    }

    /// Compiles `criteria` under an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or any node of the
    /// criteria is malformed.
    pub fn with_config(
        entity: &EntityType,
        config: &OqlConfig,
        criteria: Option<&SearchCriteria>,
    ) -> Result<Self> {
        config.validate()?;
        Self::compile(entity, config, criteria)
    }

    fn compile(
        entity: &EntityType,
        config: &OqlConfig,
        criteria: Option<&SearchCriteria>,
    ) -> Result<Self> {
        let alias = config.alias.as_str();

        let select_clause = render::select_clause(alias, criteria)?;
        let from_clause = render::from_clause(entity, alias);

        let (where_clause, parameter_values) = match criteria.and_then(SearchCriteria::binding) {
            Some(binding) => {
                let fragment = render::where_clause(alias, binding)?;
                (fragment.text, fragment.params)
            }
            None => (String::new(), Vec::new()),
        };

        let order_clause = match criteria {
            Some(c) => render::order_clause(alias, c.orders())?,
            None => String::new(),
        };

        let limit_clause = match criteria.and_then(SearchCriteria::limit) {
            Some(limit) if config.render_limit => render::limit_clause(limit),
            _ => String::new(),
        };

        let oql = Oql {
            alias: alias.to_string(),
            render_limit: config.render_limit,
            select_clause,
            from_clause,
            where_clause,
            order_clause,
            limit_clause,
            parameter_values,
        };
        debug!(
            entity = %entity,
            statement = %oql.statement(),
            parameters = oql.parameter_values.len(),
            "compiled search criteria"
        );
        Ok(oql)
    }

    /// Full statement using the compiled orders and limit.
    #[must_use]
    pub fn statement(&self) -> String {
        self.assemble(&self.order_clause, &self.limit_clause)
    }

    /// Full statement with `orders` and/or `limit` substituted for the
    /// compiled ones. `None` keeps the compiled clause; an empty order slice
    /// drops ORDER BY. The limit is only rendered when limit rendering is
    /// enabled for this instance.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit order names a blank property.
    pub fn statement_with(&self, orders: Option<&[Order]>, limit: Option<&Limit>) -> Result<String> {
        let order_clause = match orders {
            Some(orders) => render::order_clause(&self.alias, orders)?,
            None => self.order_clause.clone(),
        };
        let limit_clause = match limit {
            Some(limit) if self.render_limit => render::limit_clause(limit),
            _ => self.limit_clause.clone(),
        };
        Ok(self.assemble(&order_clause, &limit_clause))
    }

    fn assemble(&self, order_clause: &str, limit_clause: &str) -> String {
        let statement = join_clauses(&[
            self.select_clause.as_str(),
            self.from_clause.as_str(),
            self.where_clause.as_str(),
            order_clause,
            limit_clause,
        ]);
        trace!(%statement, "assembled statement");
        statement
    }

    /// `SELECT count(*)` over the same FROM and WHERE clauses, never ordered
    /// or limited.
    #[must_use]
    pub fn count_statement(&self) -> String {
        join_clauses(&[COUNT_SELECT, self.from_clause.as_str(), self.where_clause.as_str()])
    }

    /// Positional parameters: `parameter_values()[n - 1]` fills `$n`.
    #[must_use]
    pub fn parameter_values(&self) -> &[Value] {
        &self.parameter_values
    }

    /// Returns the alias bound to the entity.
    #[must_use]
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Returns whether LIMIT clauses are rendered.
    #[must_use]
    pub fn renders_limit(&self) -> bool {
        self.render_limit
    }

    #[must_use]
    pub fn select_clause(&self) -> &str {
        &self.select_clause
    }

    #[must_use]
    pub fn from_clause(&self) -> &str {
        &self.from_clause
    }

    /// WHERE clause, empty when the criteria has no binding.
    #[must_use]
    pub fn where_clause(&self) -> &str {
        &self.where_clause
    }

    /// ORDER BY clause, empty when there are no orders.
    #[must_use]
    pub fn order_clause(&self) -> &str {
        &self.order_clause
    }

    /// LIMIT clause, empty unless a limit is present and rendering is on.
    #[must_use]
    pub fn limit_clause(&self) -> &str {
        &self.limit_clause
    }
}

/// Joins the non-empty clauses with single spaces.
fn join_clauses(clauses: &[&str]) -> String {
    clauses
        .iter()
        .filter(|c| !c.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}
