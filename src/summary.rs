//! Human-readable summary lines built from an `AggregationResult`.

use crate::aggregate::AggregationResult;
use crate::error::SalesError;
use crate::render::escape_html;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// The line break marker understood by the report renderer.
pub const MARKUP_LINE_BREAK: &str = "<br/>";

/// The three summary lines, in fixed order: revenue leader, sales leader, most popular year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    lines: Vec<String>,
}

impl Summary {
    /// Formats the summary lines.
    ///
    /// # Errors
    /// Returns `IncompleteAggregation` if any of the three results is missing.
    pub fn new(result: &AggregationResult) -> Result<Self, SalesError> {
        let top_revenue = result
            .top_revenue()
            .ok_or(SalesError::IncompleteAggregation {
                field: "top_revenue",
            })?;
        let top_sales = result
            .top_sales()
            .ok_or(SalesError::IncompleteAggregation { field: "top_sales" })?;
        let top_year = result
            .top_year()
            .ok_or(SalesError::IncompleteAggregation { field: "top_year" })?;

        let lines = vec![
            format!(
                "The {} generated the most revenue: ${}",
                top_revenue.record.car,
                format_money(top_revenue.revenue)
            ),
            format!(
                "The {} had the most sales: {}",
                top_sales.car, top_sales.total_sales
            ),
            format!(
                "The most popular year was {} with {} sales.",
                top_year.year, top_year.total_sales
            ),
        ];
        Ok(Self { lines })
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The lines HTML-escaped and joined with `<br/>`, for the report body.
    pub fn markup(&self) -> String {
        self.lines
            .iter()
            .map(|line| escape_html(line))
            .collect::<Vec<_>>()
            .join(MARKUP_LINE_BREAK)
    }

    /// The lines joined with newlines, for a plain-text email body.
    pub fn plain(&self) -> String {
        self.lines.join("\n")
    }
}

/// Renders a currency amount with exactly two decimal places, rounding half away from zero.
pub fn format_money(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    // Amounts with 28 or more integer digits have no room for a scale of 2
    match rounded.scale() {
        0 => format!("{rounded}.00"),
        1 => format!("{rounded}0"),
        _ => rounded.to_string(),
    }
}
