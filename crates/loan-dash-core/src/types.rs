use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dollar amounts. Raw series are in millions; aggregated output is in billions.
pub type Money = Decimal;

/// Interest rates expressed in percent (4.5 = 4.5%), as published.
pub type Percent = Decimal;

/// Unit of measure attached to every series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "Dollars")]
    Amount,
    #[serde(rename = "Percent")]
    Rate,
}

impl Unit {
    /// The UOM string used in the source CSV and in the data file.
    pub fn uom(&self) -> &'static str {
        match self {
            Unit::Amount => "Dollars",
            Unit::Rate => "Percent",
        }
    }

    pub fn from_uom(uom: &str) -> Option<Unit> {
        match uom.trim() {
            "Dollars" => Some(Unit::Amount),
            "Percent" => Some(Unit::Rate),
            _ => None,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.uom())
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
