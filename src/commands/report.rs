use crate::aggregate::aggregate;
use crate::args::DataArgs;
use crate::commands::{load_records, Out};
use crate::model::{CurrencyFormat, SalesRecord};
use crate::notify::{Message, Notifier, OutboxNotifier};
use crate::render::{HtmlRenderer, Renderer, ReportDocument};
use crate::summary::Summary;
use crate::table::project;
use crate::{Config, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Structured output of a report run.
#[derive(Debug, Clone, Serialize)]
pub struct ReportOut {
    pub records: usize,
    pub report_path: PathBuf,
    pub summary: Vec<String>,
    /// Where the notification went, if one was sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<String>,
}

/// Runs the full pipeline with the configured renderer and outbox.
///
/// Loads the data, aggregates it, renders the report to the configured path and, when `email`
/// is true, queues the summary message with the report attached.
pub async fn report(config: Config, data: DataArgs, email: bool) -> Result<Out<ReportOut>> {
    let records = load_records(&config, &data).await?;
    let renderer = HtmlRenderer;
    let outbox = OutboxNotifier::new(config.outbox());
    let notifier: Option<&dyn Notifier> = if email { Some(&outbox) } else { None };

    let out = run_report(&config, &records, &renderer, notifier).await?;
    Ok(Out::new(
        format!(
            "Wrote the report for {} records to {}",
            out.records,
            out.report_path.display()
        ),
        out,
    ))
}

/// Produces the report for `records` and optionally notifies.
///
/// Aggregation and formatting happen before anything is written, so a malformed price or an
/// empty dataset leaves no report and sends no message.
pub async fn run_report(
    config: &Config,
    records: &[SalesRecord],
    renderer: &dyn Renderer,
    notifier: Option<&dyn Notifier>,
) -> Result<ReportOut> {
    let summary = summarize(records, config.currency())?;
    let document = ReportDocument::new(config.report_title(), summary.markup(), project(records));

    let report_path = config.report_path();
    renderer.render(&document, &report_path).await?;
    info!("Rendered the report to {}", report_path.display());

    let notification = match notifier {
        Some(notifier) => {
            let message = message(config, &summary, &report_path);
            let description = notifier.send(&message).await?;
            info!("{description}");
            Some(description)
        }
        None => {
            debug!("Skipping the notification");
            None
        }
    };

    Ok(ReportOut {
        records: records.len(),
        report_path,
        summary: summary.lines().to_vec(),
        notification,
    })
}

fn summarize(records: &[SalesRecord], format: &CurrencyFormat) -> Result<Summary> {
    let result = aggregate(records, format)?;
    Ok(Summary::new(&result)?)
}

fn message(config: &Config, summary: &Summary, attachment: &Path) -> Message {
    Message::new(
        config.sender(),
        config.recipient(),
        config.subject(),
        summary.plain(),
        Some(attachment.to_path_buf()),
    )
}
