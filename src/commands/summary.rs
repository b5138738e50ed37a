use crate::aggregate::aggregate;
use crate::args::DataArgs;
use crate::commands::{load_records, Out};
use crate::summary::Summary;
use crate::{Config, Result};
use serde::Serialize;

/// Structured output of the `summary` command.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryOut {
    pub records: usize,
    pub lines: Vec<String>,
}

/// Loads the sales data, aggregates it and prints the three summary lines to stdout.
pub async fn summary(config: Config, data: DataArgs) -> Result<Out<SummaryOut>> {
    let records = load_records(&config, &data).await?;
    let result = aggregate(&records, config.currency())?;
    let summary = Summary::new(&result)?;

    println!("{}", summary.plain());

    Ok(Out::new(
        format!("Summarized {} records", records.len()),
        SummaryOut {
            records: records.len(),
            lines: summary.lines().to_vec(),
        },
    ))
}
