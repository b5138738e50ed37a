use std::path::PathBuf;
use thiserror::Error;

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Failures of the sales aggregation core. Any of these aborts the whole run; there is no partial
/// summary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SalesError {
    #[error("Unable to parse '{text}' as a currency amount")]
    MalformedCurrency { text: String },

    #[error("Cannot aggregate an empty dataset")]
    EmptyDataset,

    #[error("The aggregation result is missing its '{field}' field")]
    IncompleteAggregation { field: &'static str },

    #[error("Revenue for record {id} is too large to represent")]
    RevenueOverflow { id: u64 },

    #[error("Total sales for year {year} are too large to represent")]
    YearTotalOverflow { year: i32 },

    #[error("The sales dataset at '{}' is unavailable", path.display())]
    DatasetUnavailable { path: PathBuf },
}
