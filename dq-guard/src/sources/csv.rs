//! CSV file source with numeric coercion.

use super::{quote_identifier, DataSource};
use crate::dataset::Dataset;
use crate::logging::LogConfig;
use crate::prelude::*;
use async_trait::async_trait;
use datafusion::arrow::datatypes::{DataType, Field, Schema};
use datafusion::prelude::*;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, instrument};

const TABLE_NAME: &str = "dq_source";

/// Options for configuring CSV file reading.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Whether the CSV file has a header row
    pub has_header: bool,
    /// Field delimiter (default: ',')
    pub delimiter: u8,
    /// Quote character (default: '"')
    pub quote: u8,
    /// Escape character (default: None)
    pub escape: Option<u8>,
    /// Comment prefix (lines starting with this are ignored)
    pub comment: Option<u8>,
    /// Maximum records to read for schema inference
    pub schema_infer_max_records: usize,
    /// Columns parsed as floating point; unparsable values become null
    pub numeric_columns: Vec<String>,
    /// Whether empty text values are read as null
    pub empty_as_null: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            has_header: true,
            delimiter: b',',
            quote: b'"',
            escape: None,
            comment: None,
            schema_infer_max_records: 1000,
            numeric_columns: Vec::new(),
            empty_as_null: true,
        }
    }
}

impl CsvOptions {
    /// Adds columns to coerce to numbers.
    pub fn with_numeric_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.numeric_columns
            .extend(columns.into_iter().map(Into::into));
        self
    }
}

/// A single CSV file.
///
/// Every column is read as text. Columns listed in
/// [`CsvOptions::numeric_columns`] are then cast to `Float64`, with values
/// that do not parse turning into nulls, so that a dirty export such as
/// `Quantity = "ERROR"` reaches the engine as a missing value instead of
/// failing the load.
///
/// # Examples
///
/// ```rust,no_run
/// use dq_guard::sources::{CsvOptions, CsvSource, DataSource};
///
/// # async fn example() -> dq_guard::error::Result<()> {
/// let options = CsvOptions::default().with_numeric_columns(["Quantity", "Total Spent"]);
/// let source = CsvSource::with_options("data/dirty_cafe_sales.csv", options)?;
/// let dataset = source.load().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: String,
    options: CsvOptions,
    log: LogConfig,
}

impl CsvSource {
    /// Creates a new CSV source from a file path.
    pub fn new(path: impl Into<String>) -> Result<Self> {
        Self::with_options(path, CsvOptions::default())
    }

    /// Creates a new CSV source with custom options.
    pub fn with_options(path: impl Into<String>, options: CsvOptions) -> Result<Self> {
        let path = path.into();
        if path.is_empty() {
            return Err(DqError::Configuration(
                "A CSV path must be provided".to_string(),
            ));
        }
        Ok(Self {
            path,
            options,
            log: LogConfig::default(),
        })
    }

    pub fn with_log_config(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn options(&self) -> &CsvOptions {
        &self.options
    }

    fn file_extension(&self) -> String {
        Path::new(&self.path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default()
    }

    fn read_options<'a>(&self, extension: &'a str) -> CsvReadOptions<'a> {
        let mut csv_options = CsvReadOptions::new()
            .has_header(self.options.has_header)
            .delimiter(self.options.delimiter)
            .quote(self.options.quote)
            .schema_infer_max_records(self.options.schema_infer_max_records)
            .file_extension(extension);

        if let Some(escape) = self.options.escape {
            csv_options = csv_options.escape(escape);
        }
        if let Some(comment) = self.options.comment {
            csv_options = csv_options.comment(comment);
        }
        csv_options
    }

    /// Column names in file order.
    async fn column_names(&self, ctx: &SessionContext, extension: &str) -> Result<Vec<String>> {
        let df = ctx
            .read_csv(self.path.as_str(), self.read_options(extension))
            .await
            .map_err(|e| {
                DqError::data_source_with_source("CSV", format!("Failed to read {}", self.path), Box::new(e))
            })?;
        Ok(df
            .schema()
            .fields()
            .iter()
            .map(|field| field.name().clone())
            .collect())
    }

    fn projection(&self, columns: &[String]) -> Result<String> {
        if let Some(missing) = self
            .options
            .numeric_columns
            .iter()
            .find(|name| !columns.contains(name))
        {
            return Err(DqError::unknown_column(missing.as_str(), columns));
        }

        let select_list = columns
            .iter()
            .map(|name| {
                let ident = quote_identifier(name);
                if self.options.numeric_columns.contains(name) {
                    format!("TRY_CAST({ident} AS DOUBLE) AS {ident}")
                } else if self.options.empty_as_null {
                    format!("NULLIF({ident}, '') AS {ident}")
                } else {
                    ident
                }
            })
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!(
            "SELECT {select_list} FROM {}",
            quote_identifier(TABLE_NAME)
        ))
    }
}

#[async_trait]
impl DataSource for CsvSource {
    #[instrument(skip(self), fields(
        source.type = "csv",
        source.path = %self.path,
        csv.delimiter = %(self.options.delimiter as char),
        csv.has_header = self.options.has_header
    ))]
    async fn load(&self) -> Result<Dataset> {
        crate::log_data_op!(
            self.log,
            source.type = "csv",
            source.path = %self.path,
            csv.numeric_columns = ?self.options.numeric_columns,
            "Loading CSV data source"
        );

        let ctx = SessionContext::new();
        let extension = self.file_extension();
        let columns = self.column_names(&ctx, &extension).await?;

        let text_schema = Schema::new(
            columns
                .iter()
                .map(|name| Field::new(name, DataType::Utf8, true))
                .collect::<Vec<_>>(),
        );
        ctx.register_csv(
            TABLE_NAME,
            self.path.as_str(),
            self.read_options(&extension).schema(&text_schema),
        )
        .await?;

        let sql = self.projection(&columns)?;
        debug!(sql = %crate::logging::truncate_field(&sql, self.log.max_field_length), "Coercing CSV columns");

        let df = ctx.sql(&sql).await?;
        let schema = Arc::new(df.schema().as_arrow().clone());
        let batches = df.collect().await?;
        let dataset = Dataset::from_batches(schema, &batches)?;

        crate::log_data_op!(
            self.log,
            source.type = "csv",
            source.path = %self.path,
            dataset.rows = dataset.row_count(),
            dataset.columns = dataset.column_count(),
            "CSV data source loaded"
        );
        Ok(dataset)
    }

    fn description(&self) -> String {
        let path = &self.path;
        format!("CSV file: {path}")
    }
}
