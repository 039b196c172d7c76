//! Data access over an external query engine.
//!
//! [`Dao`] checks criteria against an [`EntitySchema`], compiles them and
//! hands statement plus parameters to a [`QueryEngine`]. Transactions,
//! connections and result materialization belong to the engine.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::catalog::EntitySchema;
use crate::compiler::{Oql, OqlConfig};
use crate::criteria::{Limit, SearchCriteria};
use crate::error::{OqlError, Result};
use crate::types::{QueryResult, Row, Value};

/// Executes compiled statements.
pub trait QueryEngine {
    /// Runs `statement`, filling `$n` from `params[n - 1]`.
    ///
    /// # Errors
    ///
    /// Engine-specific failures, reported as [`OqlError::Engine`].
    fn execute(&self, statement: &str, params: &[Value]) -> Result<QueryResult>;
}

impl<E: QueryEngine + ?Sized> QueryEngine for &E {
    fn execute(&self, statement: &str, params: &[Value]) -> Result<QueryResult> {
        (**self).execute(statement, params)
    }
}

impl<E: QueryEngine + ?Sized> QueryEngine for Box<E> {
    fn execute(&self, statement: &str, params: &[Value]) -> Result<QueryResult> {
        (**self).execute(statement, params)
    }
}

/// Queries for one entity type.
pub struct Dao<E: QueryEngine> {
    engine: E,
    schema: Arc<EntitySchema>,
    config: OqlConfig,
}

impl<E: QueryEngine> Dao<E> {
    /// Creates a DAO with the default compiler configuration.
    pub fn new(engine: E, schema: Arc<EntitySchema>) -> Self {
        Dao {
            engine,
            schema,
            config: OqlConfig::default(),
        }
    }

    /// Creates a DAO with an explicit compiler configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_config(engine: E, schema: Arc<EntitySchema>, config: OqlConfig) -> Result<Self> {
        config.validate()?;
        Ok(Dao {
            engine,
            schema,
            config,
        })
    }

    /// Checks and compiles `criteria`.
    ///
    /// # Errors
    ///
    /// Returns an error if the criteria mention undeclared properties or are
    /// malformed.
    pub fn compile(&self, criteria: &SearchCriteria) -> Result<Oql> {
        self.compile_with(criteria, &self.config)
    }

    fn compile_with(&self, criteria: &SearchCriteria, config: &OqlConfig) -> Result<Oql> {
        self.schema.check_criteria(criteria)?;
        Oql::with_config(&self.schema.entity_type, config, Some(criteria))
    }

    /// Runs the criteria with their own orders and limit.
    ///
    /// # Errors
    ///
    /// Returns compilation or engine errors.
    pub fn find(&self, criteria: &SearchCriteria) -> Result<QueryResult> {
        let oql = self.compile(criteria)?;
        self.run(&oql.statement(), oql.parameter_values())
    }

    /// Runs the criteria restricted to `limit`, whatever the configured
    /// limit rendering.
    ///
    /// # Errors
    ///
    /// Returns compilation or engine errors.
    pub fn find_page(&self, criteria: &SearchCriteria, limit: Limit) -> Result<QueryResult> {
        let config = self.config.clone().with_render_limit(true);
        let oql = self.compile_with(criteria, &config)?;
        let statement = oql.statement_with(None, Some(&limit))?;
        self.run(&statement, oql.parameter_values())
    }

    /// Returns the first matching row.
    ///
    /// # Errors
    ///
    /// Returns compilation or engine errors.
    pub fn find_one(&self, criteria: &SearchCriteria) -> Result<Option<Row>> {
        let mut result = self.find_page(criteria, Limit::new(1, 0))?;
        if result.rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(result.rows.swap_remove(0)))
    }

    /// Counts matching objects, ignoring orders and limit.
    ///
    /// # Errors
    ///
    /// Returns compilation or engine errors, or an engine error if the count
    /// row does not hold a non-negative integer in its first column.
    pub fn count(&self, criteria: &SearchCriteria) -> Result<u64> {
        let oql = self.compile(criteria)?;
        let result = self.run(&oql.count_statement(), oql.parameter_values())?;
        if result.rows.is_empty() {
            return Ok(0);
        }

        let Some(value) = result.first_value() else {
            warn!(columns = ?result.columns, "count statement returned rows without a count column");
            return Err(OqlError::Engine(
                "count returned rows without a count column".to_string(),
            ));
        };
        match value.as_int64() {
            Some(n) => {
                u64::try_from(n).map_err(|_| OqlError::Engine(format!("negative count {n}")))
            }
            None => {
                warn!(value = %value, "count statement returned a non-integer");
                Err(OqlError::Engine(format!(
                    "count returned {} instead of INT64",
                    value.type_name()
                )))
            }
        }
    }

    fn run(&self, statement: &str, params: &[Value]) -> Result<QueryResult> {
        debug!(
            entity = %self.schema.entity_type,
            statement,
            parameters = params.len(),
            "executing"
        );
        self.engine.execute(statement, params)
    }
}
