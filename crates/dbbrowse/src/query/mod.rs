//! Parameterized statement building.
//!
//! - [`where_clause`]: filter and sort compilation
//! - [`assembler`]: full SELECT, COUNT, UPDATE, INSERT, and DELETE statements

pub mod assembler;
pub mod where_clause;

pub use assembler::{
    build_delete_rows_query, build_insert_row_query, build_table_count_query,
    build_table_data_query, build_update_cell_query, BuiltQuery,
};
pub use where_clause::{build_order_by_clause, build_where_clause, CompiledClause};
