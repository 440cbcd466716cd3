use clap::Args;
use serde_json::Value;
use std::path::PathBuf;

use loan_dash_core::extract;

/// Arguments for the one-shot CSV extraction step
#[derive(Args)]
pub struct ExtractArgs {
    /// Path to the long-format statistics CSV
    #[arg(long)]
    pub input: PathBuf,

    /// Where to write the JSON data file
    #[arg(long, default_value = "data.json")]
    pub out: PathBuf,
}

pub fn run_extract(args: ExtractArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let result = extract::extract_file(&args.input, &args.out)?;
    Ok(serde_json::to_value(result)?)
}
