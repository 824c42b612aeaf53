//! MySQL/MariaDB database driver.
//!
//! - [`MysqlDialect`]: SQL syntax strategy
//! - `MysqlCatalog`: catalog reader over an SQLx pool
//!
//! # Feature Flag
//!
//! The catalog reader needs the `mysql` feature (on by default). The dialect
//! has no driver dependency and is always available.
//!
//! # Supported Versions
//!
//! - MySQL 5.7+, 8.0+
//! - MariaDB 10.2+

#[cfg(feature = "mysql")]
mod catalog;
mod dialect;
pub mod queries;

#[cfg(feature = "mysql")]
pub use catalog::MysqlCatalog;
pub use dialect::MysqlDialect;
