//! Report and prediction file writers

use crate::error::Result;
use crate::pipeline::{PipelineReport, PredictionRecord};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Write the full report as pretty-printed JSON
pub fn write_report_json(path: &Path, report: &PipelineReport) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    info!(path = %path.display(), "wrote JSON report");
    Ok(())
}

/// Write prediction records as CSV with a header row.
///
/// Columns: `position,month,actual,predicted`. `month` is empty for undated
/// sources.
pub fn write_predictions_csv(path: &Path, records: &[PredictionRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    write_predictions(&mut writer, records)?;
    info!(path = %path.display(), rows = records.len(), "wrote predictions");
    Ok(())
}

fn write_predictions<W: Write>(writer: &mut csv::Writer<W>, records: &[PredictionRecord]) -> Result<()> {
    if records.is_empty() {
        writer.write_record(["position", "month", "actual", "predicted"])?;
    }
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
