use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use thiserror::Error;

use crate::domain::news::{Record, REPORT_HEADERS};

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to create report directory {}: {source}", .path.display())]
    Directory {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write report: {0}")]
    Csv(#[from] csv::Error),
    #[error("Failed to flush report: {0}")]
    Io(#[from] std::io::Error),
}

/// Persists the records of one unit of work as a tabular artifact.
pub trait ReportSink {
    fn write(&self, records: &[Record]) -> Result<PathBuf, ReportError>;
}

pub struct CsvReport {
    output_directory: PathBuf,
}

impl CsvReport {
    pub fn new(output_directory: PathBuf) -> Self {
        CsvReport { output_directory }
    }
}

impl ReportSink for CsvReport {
    fn write(&self, records: &[Record]) -> Result<PathBuf, ReportError> {
        std::fs::create_dir_all(&self.output_directory).map_err(|source| {
            ReportError::Directory {
                path: self.output_directory.clone(),
                source,
            }
        })?;

        let path = self.output_directory.join(report_file_name(Local::now()));
        write_records(&path, records)?;

        Ok(path)
    }
}

pub fn report_file_name(now: DateTime<Local>) -> String {
    format!("news_report_{}.csv", now.format("%m-%d-%Y_%H-%M-%S"))
}

fn write_records(path: &Path, records: &[Record]) -> Result<(), ReportError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(REPORT_HEADERS)?;
    for record in records {
        writer.write_record(record.row())?;
    }
    writer.flush()?;

    Ok(())
}
