//! These structs provide the CLI interface for the cars CLI.

use crate::loader::DatasetFormat;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// cars: Summarize a batch of car sales.
///
/// The program reads car sales records (JSON or CSV), finds the model that generated the most
/// revenue, the model that sold the most units, and the most popular model year, then renders
/// an HTML report and queues a summary email for the configured recipient.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the home directory and initialize the configuration file.
    ///
    /// By default the home directory is $HOME/cars. Pass --cars-home if you want it somewhere
    /// else. The config file can be edited afterwards to change the report title, the email
    /// sender, recipient and subject, or the currency format of the prices.
    Init(InitArgs),
    /// Print the three summary lines.
    Summary(SummaryArgs),
    /// Print every record as a CSV table.
    Table(TableArgs),
    /// Render the HTML report and queue the summary email.
    Report(ReportArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where the config and outbox are held. Defaults to ~/cars
    #[arg(long, env = "CARS_HOME", default_value_t = default_cars_home())]
    cars_home: DisplayPath,
}

impl Common {
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn cars_home(&self) -> &DisplayPath {
        &self.cars_home
    }
}

/// Selects the sales data file. Shared by the commands that read sales data.
#[derive(Debug, Default, Parser, Clone)]
pub struct DataArgs {
    /// The sales data file. Defaults to the data_path in the config file.
    #[arg(long)]
    data: Option<PathBuf>,

    /// The format of the sales data. When omitted it is guessed from the file extension.
    #[arg(long, value_enum)]
    format: Option<DatasetFormat>,
}

impl DataArgs {
    pub fn new(data: Option<PathBuf>, format: Option<DatasetFormat>) -> Self {
        Self { data, format }
    }

    pub fn data(&self) -> Option<&Path> {
        self.data.as_deref()
    }

    pub fn format(&self) -> Option<DatasetFormat> {
        self.format
    }
}

/// (Not shown): Args for the `cars init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The sales data file to use by default. When omitted, car_sales.json in the home directory
    /// is used.
    #[arg(long)]
    data: Option<PathBuf>,

    /// The email address that receives the summary. Defaults to $USER@example.com
    #[arg(long)]
    recipient: Option<String>,
}

impl InitArgs {
    pub fn data(&self) -> Option<&Path> {
        self.data.as_deref()
    }

    pub fn recipient(&self) -> Option<&str> {
        self.recipient.as_deref()
    }
}

/// (Not shown): Args for the `cars summary` command.
#[derive(Debug, Parser, Clone)]
pub struct SummaryArgs {
    #[clap(flatten)]
    data: DataArgs,
}

impl SummaryArgs {
    pub fn data(&self) -> &DataArgs {
        &self.data
    }
}

/// (Not shown): Args for the `cars table` command.
#[derive(Debug, Parser, Clone)]
pub struct TableArgs {
    #[clap(flatten)]
    data: DataArgs,
}

impl TableArgs {
    pub fn data(&self) -> &DataArgs {
        &self.data
    }
}

/// (Not shown): Args for the `cars report` command.
#[derive(Debug, Parser, Clone)]
pub struct ReportArgs {
    #[clap(flatten)]
    data: DataArgs,

    /// Render the report without queueing the summary email.
    #[arg(long)]
    no_email: bool,
}

impl ReportArgs {
    pub fn data(&self) -> &DataArgs {
        &self.data
    }

    pub fn email(&self) -> bool {
        !self.no_email
    }
}

fn default_cars_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("cars"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --cars-home or CARS_HOME instead of relying on the default \
                home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("cars")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
