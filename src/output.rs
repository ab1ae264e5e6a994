//! Serialization of normalized records and the storage seam
//!
//! Consumers read one JSON array-of-arrays per plan:
//! `[year, month, day, hour, minute, price, gridFee, renewableTax, excise, supplyFee]`.
//! The supply fee column is only written when some record carries one.

use crate::error::Result;
use crate::logging::get_logger;
use crate::tariff::PlanId;
use crate::types::NormalizedRecord;
use serde_json::{Value, json};
use std::fmt;
use std::path::{Path, PathBuf};

/// Time resolution of an output file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Resolution {
    QuarterHourly,
    Hourly,
}

impl Resolution {
    /// Storage key of a plan's file, e.g. `15min/V4.json` or `V4.json`
    pub fn object_key(&self, plan: PlanId) -> String {
        match self {
            Self::QuarterHourly => format!("15min/{}.json", plan),
            Self::Hourly => format!("{}.json", plan),
        }
    }

    /// Length of one record's interval
    pub fn slot_minutes(&self) -> i64 {
        match self {
            Self::QuarterHourly => 15,
            Self::Hourly => 60,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QuarterHourly => f.write_str("15min"),
            Self::Hourly => f.write_str("1h"),
        }
    }
}

/// Fixed-width row of one record
pub fn record_row(record: &NormalizedRecord, with_supply_fee: bool) -> Vec<Value> {
    let mut row = vec![
        json!(record.year),
        json!(record.month),
        json!(record.day),
        json!(record.hour),
        json!(record.minute),
        json!(record.energy_price),
        json!(record.grid_fee),
        json!(record.renewable_tax),
        json!(record.excise),
    ];
    if with_supply_fee {
        row.push(json!(record.supply_fee.unwrap_or(0.0)));
    }
    row
}

/// All rows of a plan as a JSON array of arrays
pub fn render_records(records: &[NormalizedRecord]) -> Result<String> {
    let with_supply_fee = records.iter().any(|r| r.supply_fee.is_some());
    let rows: Vec<Vec<Value>> = records
        .iter()
        .map(|r| record_row(r, with_supply_fee))
        .collect();
    Ok(serde_json::to_string(&rows)?)
}

/// Destination of rendered plan files (object storage, local disk, ...)
#[async_trait::async_trait]
pub trait RecordSink: Send + Sync {
    async fn write(&self, key: &str, body: String) -> Result<()>;
}

/// Writes plan files below a local directory
pub struct FsSink {
    root: PathBuf,
    logger: crate::logging::StructuredLogger,
}

impl FsSink {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            logger: get_logger("output"),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait::async_trait]
impl RecordSink for FsSink {
    async fn write(&self, key: &str, body: String) -> Result<()> {
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = body.len();
        tokio::fs::write(&path, body).await?;
        self.logger
            .info(&format!("Wrote {} ({} bytes)", path.display(), bytes));
        Ok(())
    }
}
