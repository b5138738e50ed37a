pub mod aggregate;
pub mod args;
pub mod commands;
mod config;
mod error;
pub mod loader;
pub mod model;
pub mod notify;
pub mod render;
pub mod summary;
pub mod table;
mod utils;


pub use aggregate::{aggregate, AggregationResult, Aggregator};
pub use config::Config;
pub use error::Error;
pub use error::Result;
pub use error::SalesError;
