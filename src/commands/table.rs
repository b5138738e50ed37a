use crate::args::DataArgs;
use crate::commands::{load_records, Out};
use crate::table::project;
use crate::{Config, Result};
use anyhow::Context;
use std::io;

/// Loads the sales data and prints the projected table to stdout as CSV.
pub async fn table(config: Config, data: DataArgs) -> Result<Out<()>> {
    let records = load_records(&config, &data).await?;
    let rows = project(&records);
    write_table(io::stdout().lock(), &rows)?;
    Ok(format!("Wrote {} rows", rows.len()).into())
}

/// Writes `rows` as CSV to `writer`.
pub fn write_table<W: io::Write>(writer: W, rows: &[Vec<String>]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.write_record(row).context("Unable to write a table row")?;
    }
    wtr.flush().context("Unable to flush the table")?;
    Ok(())
}
