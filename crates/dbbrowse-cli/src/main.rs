//! dbbrowse CLI - build browse/edit statements and inspect database catalogs.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use dbbrowse::core::{
    ColumnValue, DeleteRowsRequest, InsertRowRequest, TableFilterCondition, TableSortRule,
};
use dbbrowse::{
    build_delete_rows_query, build_insert_row_query, build_table_count_query,
    build_table_data_query, build_update_cell_query, connect_catalog, BrowseError, CatalogReader,
    Config, DialectImpl, SqlValue, TableCountOptions, TableDataOptions, UpdateCellRequest,
};
use serde::Serialize;
use tracing::{debug, info, Level};

#[derive(Parser)]
#[command(name = "dbbrowse")]
#[command(about = "Parameterized table browsing and catalog introspection for PostgreSQL and MySQL")]
#[command(version)]
struct Cli {
    /// Path to YAML configuration file
    #[arg(short, long, default_value = "dbbrowse.yaml")]
    config: PathBuf,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the paged SELECT and matching COUNT for a table
    Select {
        #[arg(long)]
        schema: String,

        #[arg(long)]
        table: String,

        /// Filter conditions as a JSON array of {column, operator, value}
        #[arg(long)]
        filters: Option<String>,

        /// Sort rule as column[:asc|desc] (repeatable)
        #[arg(long = "sort")]
        sort: Vec<String>,

        /// Rows per page [default: browse.default_page_size, else 50]
        #[arg(long)]
        limit: Option<u32>,

        /// Rows to skip [default: 0]
        #[arg(long)]
        offset: Option<u64>,

        /// SQL dialect: postgres or mysql
        #[arg(long, default_value = "postgres")]
        dialect: String,
    },

    /// Print the UPDATE for a single cell
    UpdateCell {
        #[arg(long)]
        schema: String,

        #[arg(long)]
        table: String,

        /// Column to change
        #[arg(long)]
        column: String,

        /// New value as JSON (bare text is taken as a string)
        #[arg(long)]
        value: String,

        /// Primary key as column=JSON (repeatable, in key order)
        #[arg(long = "pk", required = true)]
        pk: Vec<String>,

        /// SQL dialect: postgres or mysql
        #[arg(long, default_value = "postgres")]
        dialect: String,
    },

    /// Print the INSERT for one row
    InsertRow {
        #[arg(long)]
        schema: String,

        #[arg(long)]
        table: String,

        /// Column value as column=JSON (repeatable)
        #[arg(long = "set", required = true)]
        set: Vec<String>,

        /// SQL dialect: postgres or mysql
        #[arg(long, default_value = "postgres")]
        dialect: String,
    },

    /// Print the DELETE for rows identified by primary key
    DeleteRows {
        #[arg(long)]
        schema: String,

        #[arg(long)]
        table: String,

        /// Primary key columns, comma separated, in key order
        #[arg(long, value_delimiter = ',', required = true)]
        pk_columns: Vec<String>,

        /// Primary key values of one row as a JSON object (repeatable)
        #[arg(long = "row", required = true)]
        row: Vec<String>,

        /// SQL dialect: postgres or mysql
        #[arg(long, default_value = "postgres")]
        dialect: String,
    },

    /// List schemas of the configured database
    Schemas,

    /// List tables and views of a schema
    Tables {
        /// Schema [default: browse.default_schema]
        #[arg(long)]
        schema: Option<String>,
    },

    /// Describe columns, constraints, and indexes of a table
    Describe {
        /// Schema [default: browse.default_schema]
        #[arg(long)]
        schema: Option<String>,

        #[arg(long)]
        table: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<(), BrowseError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format).map_err(BrowseError::Config)?;

    match cli.command {
        Commands::Select {
            schema,
            table,
            filters,
            sort,
            limit,
            offset,
            dialect,
        } => {
            let dialect = DialectImpl::from_db_type(&dialect)?;

            let mut opts = TableDataOptions::new(schema, table);
            if let Some(raw) = filters {
                opts.filters = serde_json::from_str::<Vec<TableFilterCondition>>(&raw)?;
            }
            opts.sort_rules = sort
                .iter()
                .map(|s| s.parse::<TableSortRule>())
                .collect::<Result<_, _>>()?;
            opts.limit = match limit {
                Some(limit) => Some(limit),
                None => configured_page_size(&cli.config)?,
            };
            opts.offset = offset;

            let data = build_table_data_query(&dialect, &opts)?;
            let count = build_table_count_query(&dialect, &TableCountOptions::from(&opts))?;
            print_json(&serde_json::json!({ "data": data, "count": count }))?;
        }

        Commands::UpdateCell {
            schema,
            table,
            column,
            value,
            pk,
            dialect,
        } => {
            let dialect = DialectImpl::from_db_type(&dialect)?;

            let pairs = pk
                .iter()
                .map(|p| parse_assignment(p))
                .collect::<Result<Vec<_>, _>>()?;
            let req = UpdateCellRequest {
                schema,
                table,
                column_to_update: column,
                new_value: parse_value(&value),
                primary_key_columns: pairs.iter().map(|(c, _)| c.clone()).collect(),
                primary_key_values: pairs.into_iter().collect(),
            };

            print_json(&build_update_cell_query(&dialect, &req)?)?;
        }

        Commands::InsertRow {
            schema,
            table,
            set,
            dialect,
        } => {
            let dialect = DialectImpl::from_db_type(&dialect)?;

            let values = set
                .iter()
                .map(|s| parse_assignment(s).map(|(column, value)| ColumnValue { column, value }))
                .collect::<Result<Vec<_>, _>>()?;
            let req = InsertRowRequest {
                schema,
                table,
                values,
            };

            print_json(&build_insert_row_query(&dialect, &req)?)?;
        }

        Commands::DeleteRows {
            schema,
            table,
            pk_columns,
            row,
            dialect,
        } => {
            let dialect = DialectImpl::from_db_type(&dialect)?;

            let rows = row
                .iter()
                .map(|raw| parse_key_row(raw))
                .collect::<Result<Vec<_>, _>>()?;
            let req = DeleteRowsRequest {
                schema,
                table,
                primary_key_columns: pk_columns,
                rows,
            };

            print_json(&build_delete_rows_query(&dialect, &req)?)?;
        }

        Commands::Schemas => {
            let config = load_config(&cli.config)?;
            let catalog = connect_catalog(&config).await?;
            let result = catalog.list_schemas().await;
            catalog.close().await;
            print_json(&result?)?;
        }

        Commands::Tables { schema } => {
            let config = load_config(&cli.config)?;
            let schema = schema.unwrap_or_else(|| default_schema(&config));
            let catalog = connect_catalog(&config).await?;
            let result = catalog.list_tables(&schema).await;
            catalog.close().await;
            print_json(&result?)?;
        }

        Commands::Describe { schema, table } => {
            let config = load_config(&cli.config)?;
            let schema = schema.unwrap_or_else(|| default_schema(&config));
            let catalog = connect_catalog(&config).await?;
            let result = catalog.describe_table(&schema, &table).await;
            catalog.close().await;
            print_json(&result?)?;
        }
    }

    Ok(())
}

fn load_config(path: &Path) -> Result<Config, BrowseError> {
    let config = Config::load(path)?;
    info!("Loaded configuration from {:?}", path);
    Ok(config)
}

/// Page size from the config file, when one is present.
fn configured_page_size(path: &Path) -> Result<Option<u32>, BrowseError> {
    if !path.exists() {
        return Ok(None);
    }
    let config = load_config(path)?;
    Ok(Some(config.browse.default_page_size))
}

fn default_schema(config: &Config) -> String {
    config
        .browse
        .schema_or_default(config.connection.db_type, &config.connection.database)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), BrowseError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Parse a JSON value; anything that is not valid JSON is taken as text.
fn parse_value(raw: &str) -> SqlValue {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(json) => SqlValue::from_json(json),
        Err(_) => {
            debug!("Treating {:?} as a text value", raw);
            SqlValue::Text(raw.to_string())
        }
    }
}

/// Parse `column=JSON`.
fn parse_assignment(raw: &str) -> Result<(String, SqlValue), BrowseError> {
    match raw.split_once('=') {
        Some((column, value)) if !column.is_empty() => {
            Ok((column.to_string(), parse_value(value)))
        }
        _ => Err(BrowseError::InvalidRequest(format!(
            "expected column=value, got {:?}",
            raw
        ))),
    }
}

/// Parse a JSON object of primary key values.
fn parse_key_row(raw: &str) -> Result<HashMap<String, SqlValue>, BrowseError> {
    let object: HashMap<String, serde_json::Value> = serde_json::from_str(raw)?;
    Ok(object
        .into_iter()
        .map(|(column, value)| (column, SqlValue::from_json(value)))
        .collect())
}

/// Initialize the tracing subscriber on stderr; stdout carries results.
fn setup_logging(verbosity: &str, format: &str) -> Result<(), String> {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        other => return Err(format!("Unknown verbosity '{}'", other)),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false);

    match format {
        "json" => subscriber.json().init(),
        "text" => subscriber.init(),
        other => return Err(format!("Unknown log format '{}'. Use text or json", other)),
    }

    Ok(())
}
