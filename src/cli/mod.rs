
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

use crate::dashboard::{DEFAULT_RECENT, DEFAULT_TOP};
use crate::import::DEFAULT_REJECTION_LIMIT;
use crate::models::PurchaseFilter;
use crate::types::Currency;

pub const DEFAULT_DATABASE: &str = "db/purchase_tracker.db";
pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Parser)]
#[command(name = "purchase-tracker", version, about = "Import online purchase exports and browse them in CNY and SGD", long_about = None)]
pub struct Cli {
    /// SQLite database holding the purchase dataset
    #[arg(long, global = true, env = "PURCHASE_TRACKER_DB", default_value = DEFAULT_DATABASE)]
    pub database: PathBuf,

    /// CNY to SGD exchange rate applied on import
    #[arg(long, global = true, env = "PURCHASE_TRACKER_RATE", default_value = "0.1962")]
    pub rate: Decimal,

    /// error, warn, info, debug or trace
    #[arg(long, global = true, env = "PURCHASE_TRACKER_LOG", default_value = "error")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create the database and its schema
    Init,
    /// Import a pipe-delimited purchase export
    Import(ImportArgs),
    /// Print summary, daily spend and recent purchases
    Dashboard(DashboardArgs),
    /// Serve the read-only HTTP API
    Api(ApiArgs),
    /// Write matching purchases back out in the import format
    Export(ExportArgs)
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Path of the export file
    pub path: PathBuf,

    /// Validate and summarize without writing to the database
    #[arg(long)]
    pub dry_run: bool,

    /// Number of rejection reasons to print
    #[arg(long, default_value_t = DEFAULT_REJECTION_LIMIT)]
    pub rejection_limit: usize,

    /// Print every rejection reason
    #[arg(long, conflicts_with = "rejection_limit")]
    pub all_rejections: bool
}

impl ImportArgs {
    /// `None` means no limit.
    pub fn report_limit(&self) -> Option<usize> {
        (!self.all_rejections).then_some(self.rejection_limit)
    }
}

#[derive(Debug, Default, Args)]
pub struct FilterArgs {
    /// Earliest purchase date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub date_from: Option<NaiveDate>,

    /// Latest purchase date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub date_to: Option<NaiveDate>,

    /// Lowest unit price in the selected currency
    #[arg(long)]
    pub price_min: Option<Decimal>,

    /// Highest unit price in the selected currency
    #[arg(long)]
    pub price_max: Option<Decimal>,

    /// Currency for price bounds and displayed amounts
    #[arg(long, value_enum, default_value_t)]
    pub currency: Currency,

    /// Case-insensitive item name fragment
    #[arg(long, visible_alias = "search")]
    pub item_name: Option<String>,

    #[arg(long)]
    pub min_quantity: Option<u32>
}

impl FilterArgs {
    pub fn to_filter(&self) -> PurchaseFilter {
        PurchaseFilter {
            date_from: self.date_from,
            date_to: self.date_to,
            price_min: self.price_min,
            price_max: self.price_max,
            currency: self.currency,
            item_name: self.item_name.clone(),
            min_quantity: self.min_quantity
        }
    }
}

#[derive(Debug, Args)]
pub struct DashboardArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Number of recent purchases to list
    #[arg(long, default_value_t = DEFAULT_RECENT)]
    pub recent: usize,

    /// Number of items in the top items table
    #[arg(long, default_value_t = DEFAULT_TOP)]
    pub top: usize
}

#[derive(Debug, Args)]
pub struct ApiArgs {
    #[arg(long, env = "PURCHASE_TRACKER_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    #[arg(long, env = "PURCHASE_TRACKER_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16
}

impl ApiArgs {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Output file; stdout when omitted
    #[arg(long, short)]
    pub output: Option<PathBuf>
}

impl Cli {
    /// Parses the command line after loading `.env`, if there is one.
    pub fn load() -> Self {
        _ = dotenvy::dotenv();
        Self::parse()
    }
}
