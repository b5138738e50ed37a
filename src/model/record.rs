use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A vehicle configuration. Not unique across records: the same car and year can appear more
/// than once in a batch.
#[derive(Debug, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Car {
    #[serde(rename = "car_make")]
    pub make: String,
    #[serde(rename = "car_model")]
    pub model: String,
    #[serde(rename = "car_year")]
    pub year: i32,
}

impl Car {
    pub fn new(make: impl Into<String>, model: impl Into<String>, year: i32) -> Self {
        Self {
            make: make.into(),
            model: model.into(),
            year,
        }
    }
}

/// Formats as `{make} {model} ({year})`, e.g. `Acura Integra (1995)`.
impl Display for Car {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} ({})", self.make, self.model, self.year)
    }
}

/// One row of sales data.
///
/// The price is kept as the original text. It is parsed during aggregation, and the table
/// projection displays it unmodified.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SalesRecord {
    pub id: u64,
    pub car: Car,
    pub price: String,
    pub total_sales: i64,
}

impl SalesRecord {
    pub fn new(id: u64, car: Car, price: impl Into<String>, total_sales: i64) -> Self {
        Self {
            id,
            car,
            price: price.into(),
            total_sales,
        }
    }
}

// id,car_make,car_model,car_year,price,total_sales
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub(crate) struct CsvRecord {
    pub(crate) id: u64,
    pub(crate) car_make: String,
    pub(crate) car_model: String,
    pub(crate) car_year: i32,
    pub(crate) price: String,
    pub(crate) total_sales: i64,
}

impl From<CsvRecord> for SalesRecord {
    fn from(value: CsvRecord) -> Self {
        SalesRecord {
            id: value.id,
            car: Car::new(value.car_make, value.car_model, value.car_year),
            price: value.price,
            total_sales: value.total_sales,
        }
    }
}
