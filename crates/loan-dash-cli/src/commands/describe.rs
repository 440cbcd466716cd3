use clap::Args;
use serde_json::Value;

use loan_dash_core::store::SeriesStore;

/// Arguments for summarising a data file
#[derive(Args)]
pub struct DescribeArgs {
    /// Path to the JSON data file
    #[arg(long, default_value = "data.json")]
    pub data: String,
}

pub fn run_describe(args: DescribeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let store = SeriesStore::load(&args.data)?;
    Ok(serde_json::to_value(store.summary())?)
}
