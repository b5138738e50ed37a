//! Loads sales records from a JSON or CSV file.

use crate::error::SalesError;
use crate::model::{CsvRecord, SalesRecord};
use crate::{utils, Result};
use anyhow::Context;
use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// The file formats that sales data can be read from.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DatasetFormat {
    /// A JSON array of records with a nested `car` object.
    #[default]
    Json,
    /// A flat CSV file with the header `id,car_make,car_model,car_year,price,total_sales`.
    Csv,
}

serde_plain::derive_display_from_serialize!(DatasetFormat);
serde_plain::derive_fromstr_from_deserialize!(DatasetFormat);

impl DatasetFormat {
    /// Guesses the format from the file extension, falling back to JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => DatasetFormat::Csv,
            _ => DatasetFormat::Json,
        }
    }
}

/// Reads every record in the file at `path`. When `format` is `None` it is chosen from the file
/// extension.
///
/// # Errors
/// Any read or decode failure is reported as `SalesError::DatasetUnavailable`, with the
/// underlying cause attached.
pub async fn load(path: &Path, format: Option<DatasetFormat>) -> Result<Vec<SalesRecord>> {
    let format = format.unwrap_or_else(|| DatasetFormat::from_path(path));
    debug!("Loading {format} sales data from {}", path.display());

    let records = read_and_decode(path, format).await.map_err(|e| {
        e.context(SalesError::DatasetUnavailable {
            path: path.to_path_buf(),
        })
    })?;

    debug!("Loaded {} records", records.len());
    Ok(records)
}

async fn read_and_decode(path: &Path, format: DatasetFormat) -> Result<Vec<SalesRecord>> {
    let content = utils::read(path).await?;
    match format {
        DatasetFormat::Json => serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON sales data in {}", path.display())),
        DatasetFormat::Csv => decode_csv(&content)
            .with_context(|| format!("Failed to parse CSV sales data in {}", path.display())),
    }
}

fn decode_csv(content: &str) -> Result<Vec<SalesRecord>> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .from_reader(content.as_bytes());
    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let record: CsvRecord = result?;
        records.push(record.into());
    }
    Ok(records)
}
