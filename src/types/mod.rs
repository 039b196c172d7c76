//! Value and result types shared by the compiler and the DAO layer.

mod value;

pub use value::{QueryResult, Row, Value};
