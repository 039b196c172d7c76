//! Search criteria to object-query-language compiler.
//!
//! Statements take the form
//! `SELECT [DISTINCT] .. FROM <type> <alias> [WHERE ..] [ORDER BY ..] [LIMIT .. OFFSET ..]`
//! with `$1`, `$2`, .. as positional placeholders and `nil` as the null
//! literal.

mod config;
mod entity;
mod oql;
pub mod render;

pub use config::{OqlConfig, DEFAULT_ALIAS};
pub use entity::{Entity, EntityType};
pub use oql::Oql;
