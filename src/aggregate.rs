//! The single-pass aggregation over a batch of sales records.
//!
//! One traversal tracks three things at once:
//! - the record with the greatest revenue (`total_sales x price`)
//! - the record with the greatest `total_sales`
//! - the model year with the greatest cumulative `total_sales`
//!
//! Ties always go to whichever record or year was encountered first.

use crate::error::SalesError;
use crate::model::{CurrencyFormat, SalesRecord};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{trace, warn};

/// A record together with the revenue computed for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevenueLeader {
    pub record: SalesRecord,
    pub revenue: Decimal,
}

/// A model year and the sum of `total_sales` over every record of that year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearTotal {
    pub year: i32,
    pub total_sales: i64,
}

/// The outcome of one aggregation pass.
///
/// The fields are optional so that a result can be assembled piecemeal, but `aggregate` and
/// `Aggregator::finish` only ever return results with all three present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregationResult {
    pub top_revenue: Option<RevenueLeader>,
    pub top_sales: Option<SalesRecord>,
    pub top_year: Option<YearTotal>,
}

impl AggregationResult {
    pub fn new(
        top_revenue: Option<RevenueLeader>,
        top_sales: Option<SalesRecord>,
        top_year: Option<YearTotal>,
    ) -> Self {
        Self {
            top_revenue,
            top_sales,
            top_year,
        }
    }

    pub fn top_revenue(&self) -> Option<&RevenueLeader> {
        self.top_revenue.as_ref()
    }

    pub fn top_sales(&self) -> Option<&SalesRecord> {
        self.top_sales.as_ref()
    }

    pub fn top_year(&self) -> Option<YearTotal> {
        self.top_year
    }
}

/// Per-year running totals that remember the order in which years were first seen.
#[derive(Debug, Clone, Default)]
struct YearTotals {
    totals: Vec<YearTotal>,
    index: HashMap<i32, usize>,
}

impl YearTotals {
    fn add(&mut self, year: i32, total_sales: i64) -> Result<(), SalesError> {
        match self.index.get(&year) {
            Some(&ix) => {
                let entry = &mut self.totals[ix];
                entry.total_sales = entry
                    .total_sales
                    .checked_add(total_sales)
                    .ok_or(SalesError::YearTotalOverflow { year })?;
            }
            None => {
                self.index.insert(year, self.totals.len());
                self.totals.push(YearTotal { year, total_sales });
            }
        }
        Ok(())
    }

    /// The year with the largest total. Among equal totals, the earliest introduced year wins.
    fn top(&self) -> Option<YearTotal> {
        let mut best: Option<YearTotal> = None;
        for candidate in &self.totals {
            if best.map_or(true, |b| candidate.total_sales > b.total_sales) {
                best = Some(*candidate);
            }
        }
        best
    }
}

/// A streaming reducer. Feed it records with `push` in input order, then call `finish`.
#[derive(Debug, Clone)]
pub struct Aggregator<'a> {
    format: &'a CurrencyFormat,
    top_revenue: Option<RevenueLeader>,
    top_sales: Option<SalesRecord>,
    years: YearTotals,
    count: usize,
}

impl<'a> Aggregator<'a> {
    /// Creates an empty aggregator that parses prices with `format`.
    pub fn new(format: &'a CurrencyFormat) -> Self {
        Self {
            format,
            top_revenue: None,
            top_sales: None,
            years: YearTotals::default(),
            count: 0,
        }
    }

    /// The number of records pushed so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Folds one record into the running state.
    ///
    /// # Errors
    /// - `MalformedCurrency` if the record's price cannot be parsed
    /// - `RevenueOverflow` if `total_sales x price` does not fit in a `Decimal`
    /// - `YearTotalOverflow` if the running total for the record's year does not fit in an `i64`
    ///
    /// On error the aggregator should be discarded; the caller must not build a summary from it.
    pub fn push(&mut self, record: &SalesRecord) -> Result<(), SalesError> {
        trace!("Aggregating record {}", record.id);
        let price = self.format.parse(&record.price)?;
        let revenue = Decimal::from(record.total_sales)
            .checked_mul(price)
            .ok_or(SalesError::RevenueOverflow { id: record.id })?;

        if record.total_sales < 0 {
            warn!(
                "Record {} has negative total sales ({}), including it as-is",
                record.id, record.total_sales
            );
        }

        self.years.add(record.car.year, record.total_sales)?;

        let revenue_wins = match &self.top_revenue {
            Some(best) => revenue > best.revenue,
            None => true,
        };
        if revenue_wins {
            self.top_revenue = Some(RevenueLeader {
                record: record.clone(),
                revenue,
            });
        }

        let sales_wins = match &self.top_sales {
            Some(best) => record.total_sales > best.total_sales,
            None => true,
        };
        if sales_wins {
            self.top_sales = Some(record.clone());
        }

        self.count += 1;
        Ok(())
    }

    /// Completes the pass.
    ///
    /// # Errors
    /// Returns `EmptyDataset` if no records were pushed.
    pub fn finish(self) -> Result<AggregationResult, SalesError> {
        if self.count == 0 {
            return Err(SalesError::EmptyDataset);
        }
        Ok(AggregationResult {
            top_revenue: self.top_revenue,
            top_sales: self.top_sales,
            top_year: self.years.top(),
        })
    }
}

/// Aggregates `records` in a single pass. This is a pure function of its input.
///
/// # Errors
/// - `EmptyDataset` if `records` is empty
/// - `MalformedCurrency` if any price cannot be parsed; no partial result is returned
/// - `RevenueOverflow` if any revenue cannot be represented
/// - `YearTotalOverflow` if any year's total sales cannot be represented
pub fn aggregate<'r>(
    records: impl IntoIterator<Item = &'r SalesRecord>,
    format: &CurrencyFormat,
) -> Result<AggregationResult, SalesError> {
    let mut aggregator = Aggregator::new(format);
    for record in records {
        aggregator.push(record)?;
    }
    aggregator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Car;
    use rust_decimal_macros::dec;

    fn record(id: u64, make: &str, model: &str, year: i32, price: &str, sales: i64) -> SalesRecord {
        SalesRecord::new(id, Car::new(make, model, year), price, sales)
    }

    fn run(records: &[SalesRecord]) -> Result<AggregationResult, SalesError> {
        aggregate(records, &CurrencyFormat::default())
    }

    fn two_cars() -> Vec<SalesRecord> {
        vec![
            record(1, "Acura", "Integra", 1995, "$500.00", 1192),
            record(2, "Mercedes-Benz", "E-Class", 2009, "$18000.00", 1000),
        ]
    }

    #[test]
    fn test_two_cars() {
        let result = run(&two_cars()).unwrap();

        let top_revenue = result.top_revenue().unwrap();
        assert_eq!(top_revenue.record.id, 2);
        assert_eq!(top_revenue.revenue, dec!(18000000));

        assert_eq!(result.top_sales().unwrap().id, 1);
        assert_eq!(
            result.top_year().unwrap(),
            YearTotal {
                year: 1995,
                total_sales: 1192
            }
        );
    }

    #[test]
    fn test_empty_dataset() {
        assert_eq!(run(&[]).unwrap_err(), SalesError::EmptyDataset);
    }

    #[test]
    fn test_single_record_wins_everything() {
        let records = vec![record(9, "Ford", "Focus", 2007, "$10.50", 4)];
        let result = run(&records).unwrap();
        assert_eq!(result.top_revenue().unwrap().record.id, 9);
        assert_eq!(result.top_revenue().unwrap().revenue, dec!(42.00));
        assert_eq!(result.top_sales().unwrap().id, 9);
        assert_eq!(result.top_year().unwrap().year, 2007);
        assert_eq!(result.top_year().unwrap().total_sales, 4);
    }

    #[test]
    fn test_malformed_price_aborts() {
        let mut records = two_cars();
        records.push(record(3, "Ford", "Focus", 2007, "$12,00", 1));
        records.push(record(4, "Kia", "Rio", 2012, "$9.99", 5000));
        let err = run(&records).unwrap_err();
        assert_eq!(
            err,
            SalesError::MalformedCurrency {
                text: String::from("$12,00")
            }
        );
    }

    #[test]
    fn test_year_totals_accumulate_across_models() {
        let records = vec![
            record(1, "Acura", "Integra", 1995, "$1.00", 700),
            record(2, "Ford", "Focus", 2007, "$1.00", 900),
            record(3, "Kia", "Rio", 2007, "$1.00", 100),
            record(4, "BMW", "M3", 1995, "$1.00", 50),
        ];
        let result = run(&records).unwrap();
        assert_eq!(
            result.top_year().unwrap(),
            YearTotal {
                year: 2007,
                total_sales: 1000
            }
        );
        // The single best seller is still a 2007 Focus, but by a different metric
        assert_eq!(result.top_sales().unwrap().id, 2);
    }

    #[test]
    fn test_revenue_tie_keeps_earliest() {
        let records = vec![
            record(1, "Acura", "Integra", 1995, "$100.00", 10),
            record(2, "Ford", "Focus", 2007, "$50.00", 20),
            record(3, "Kia", "Rio", 2012, "$1000.00", 1),
        ];
        let result = run(&records).unwrap();
        assert_eq!(result.top_revenue().unwrap().record.id, 1);
        assert_eq!(result.top_revenue().unwrap().revenue, dec!(1000));
    }

    #[test]
    fn test_sales_tie_keeps_earliest() {
        let records = vec![
            record(5, "Acura", "Integra", 1995, "$1.00", 30),
            record(6, "Ford", "Focus", 2007, "$2.00", 30),
        ];
        let result = run(&records).unwrap();
        assert_eq!(result.top_sales().unwrap().id, 5);

        let reversed: Vec<SalesRecord> = records.into_iter().rev().collect();
        let result = run(&reversed).unwrap();
        assert_eq!(result.top_sales().unwrap().id, 6);
    }

    #[test]
    fn test_year_tie_uses_encounter_order_not_numeric_order() {
        let records = vec![
            record(1, "Ford", "Focus", 2010, "$1.00", 40),
            record(2, "Acura", "Integra", 1995, "$1.00", 40),
        ];
        let result = run(&records).unwrap();
        assert_eq!(result.top_year().unwrap().year, 2010);

        let reversed: Vec<SalesRecord> = records.into_iter().rev().collect();
        let result = run(&reversed).unwrap();
        assert_eq!(result.top_year().unwrap().year, 1995);
    }

    #[test]
    fn test_permutation_without_ties() {
        let mut records = vec![
            record(1, "Acura", "Integra", 1995, "$500.00", 1192),
            record(2, "Mercedes-Benz", "E-Class", 2009, "$22749.53", 1000),
            record(3, "Ford", "Focus", 2007, "$12000.00", 800),
            record(4, "Kia", "Rio", 2007, "$9000.00", 900),
        ];
        let expected = run(&records).unwrap();
        for _ in 0..records.len() {
            records.rotate_left(1);
            let actual = run(&records).unwrap();
            assert_eq!(actual, expected);
        }
        assert_eq!(expected.top_revenue().unwrap().record.id, 2);
        assert_eq!(expected.top_sales().unwrap().id, 1);
        assert_eq!(expected.top_year().unwrap().year, 2007);
        assert_eq!(expected.top_year().unwrap().total_sales, 1700);
    }

    #[test]
    fn test_maxima_match_brute_force() {
        let records = vec![
            record(1, "A", "a", 2001, "$3.25", 17),
            record(2, "B", "b", 2002, "$0.99", 400),
            record(3, "C", "c", 2001, "$120.00", 2),
            record(4, "D", "d", 2003, "$7.10", 90),
            record(5, "E", "e", 2002, "$15.00", 33),
        ];
        let format = CurrencyFormat::default();
        let result = run(&records).unwrap();

        let max_revenue = records
            .iter()
            .map(|r| Decimal::from(r.total_sales) * format.parse(&r.price).unwrap())
            .max()
            .unwrap();
        assert_eq!(result.top_revenue().unwrap().revenue, max_revenue);

        let max_sales = records.iter().map(|r| r.total_sales).max().unwrap();
        assert_eq!(result.top_sales().unwrap().total_sales, max_sales);

        let top_year = result.top_year().unwrap();
        let year_sum: i64 = records
            .iter()
            .filter(|r| r.car.year == top_year.year)
            .map(|r| r.total_sales)
            .sum();
        assert_eq!(top_year.total_sales, year_sum);
        for year in [2001, 2002, 2003] {
            let sum: i64 = records
                .iter()
                .filter(|r| r.car.year == year)
                .map(|r| r.total_sales)
                .sum();
            assert!(sum <= top_year.total_sales);
        }
    }

    #[test]
    fn test_negative_totals_pass_through() {
        let records = vec![
            record(1, "Acura", "Integra", 1995, "$10.00", -5),
            record(2, "Acura", "Integra", 1995, "$10.00", 3),
            record(3, "Ford", "Focus", 2007, "$10.00", -1),
        ];
        let result = run(&records).unwrap();
        assert_eq!(result.top_revenue().unwrap().record.id, 2);
        assert_eq!(result.top_sales().unwrap().id, 2);
        assert_eq!(
            result.top_year().unwrap(),
            YearTotal {
                year: 2007,
                total_sales: -1
            }
        );
    }

    #[test]
    fn test_year_total_overflow() {
        let records = vec![
            record(1, "Acura", "Integra", 2000, "$1.00", i64::MAX),
            record(2, "Ford", "Focus", 2000, "$1.00", 1),
        ];
        assert_eq!(
            run(&records).unwrap_err(),
            SalesError::YearTotalOverflow { year: 2000 }
        );

        // The same totals in different years are fine
        let records = vec![
            record(1, "Acura", "Integra", 2000, "$1.00", i64::MAX),
            record(2, "Ford", "Focus", 2001, "$1.00", 1),
        ];
        let result = run(&records).unwrap();
        assert_eq!(result.top_year().unwrap().total_sales, i64::MAX);
    }

    #[test]
    fn test_streaming_aggregator() {
        let format = CurrencyFormat::default();
        let mut aggregator = Aggregator::new(&format);
        for r in two_cars() {
            aggregator.push(&r).unwrap();
        }
        assert_eq!(aggregator.count(), 2);
        let result = aggregator.finish().unwrap();
        assert_eq!(result, run(&two_cars()).unwrap());
    }

    #[test]
    fn test_custom_currency_format() {
        let format = CurrencyFormat {
            symbol: String::from("€"),
            decimal_separator: ',',
            grouping_separator: Some('.'),
        };
        let records = vec![
            record(1, "Fiat", "Panda", 2015, "€9.500,00", 10),
            record(2, "Fiat", "500", 2016, "€12.000,50", 9),
        ];
        let result = aggregate(&records, &format).unwrap();
        assert_eq!(result.top_revenue().unwrap().record.id, 2);
        assert_eq!(result.top_revenue().unwrap().revenue, dec!(108004.50));
    }
}
