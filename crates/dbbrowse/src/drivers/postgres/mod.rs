//! PostgreSQL driver.
//!
//! - [`PostgresDialect`]: SQL syntax strategy for PostgreSQL
//! - [`PostgresCatalog`]: Catalog reader over a deadpool-postgres pool

mod catalog;
mod dialect;
pub mod queries;

pub use catalog::PostgresCatalog;
pub use dialect::PostgresDialect;
