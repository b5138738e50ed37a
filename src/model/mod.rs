//! Types that represent the sales data, such as `SalesRecord` and `Car`.
mod currency;
mod record;

pub use currency::{parse_currency, CurrencyFormat};
pub(crate) use record::CsvRecord;
pub use record::{Car, SalesRecord};
