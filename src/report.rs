//! Sinks for per-epoch training results

use crate::error::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Result of one validation pass
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EpochRecord {
    pub epoch: usize,
    pub ndcg: f64,
    pub train_loss: f64,
    pub validation_loss: f64,
}

/// Common trait for report sinks
pub trait Report {
    /// Record one epoch; epochs arrive in order
    fn log(&mut self, record: EpochRecord) -> Result<()>;

    /// Flush and release the sink. Further calls are no-ops.
    fn close(&mut self) -> Result<()>;
}

/// Report through the `log` facade
#[derive(Debug, Default)]
pub struct LogReport;

impl Report for LogReport {
    fn log(&mut self, record: EpochRecord) -> Result<()> {
        log::info!(
            "epoch {}: ndcg={:.6} train_loss={:.6} validation_loss={:.6}",
            record.epoch, record.ndcg, record.train_loss, record.validation_loss
        );
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// CSV report: a header line then one row per epoch
pub struct CsvReport<W: Write> {
    writer: Option<W>,
    header_written: bool,
}

impl<W: Write> CsvReport<W> {
    pub fn new(writer: W) -> Self {
        CsvReport { writer: Some(writer), header_written: false }
    }

    /// Give the writer back, if the report was not closed
    pub fn into_inner(self) -> Option<W> {
        self.writer
    }
}

impl CsvReport<BufWriter<File>> {
    /// Create (or truncate) a CSV report file
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Ok(CsvReport::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> Report for CsvReport<W> {
    fn log(&mut self, record: EpochRecord) -> Result<()> {
        let Some(writer) = self.writer.as_mut() else {
            log::warn!("epoch {} logged after the report was closed", record.epoch);
            return Ok(());
        };
        if !self.header_written {
            writeln!(writer, "epoch,ndcg,train_loss,validation_loss")?;
            self.header_written = true;
        }
        writeln!(writer, "{},{},{},{}", record.epoch, record.ndcg, record.train_loss, record.validation_loss)?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        Ok(())
    }
}

/// Keeps every record in memory
#[derive(Debug, Default)]
pub struct MemoryReport {
    pub records: Vec<EpochRecord>,
    pub closed: bool,
}

impl Report for MemoryReport {
    fn log(&mut self, record: EpochRecord) -> Result<()> {
        self.records.push(record);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}

impl<R: Report + ?Sized> Report for &mut R {
    fn log(&mut self, record: EpochRecord) -> Result<()> {
        (**self).log(record)
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(epoch: usize) -> EpochRecord {
        EpochRecord { epoch, ndcg: 0.5, train_loss: 0.25, validation_loss: 0.125 }
    }

    #[test]
    fn test_csv_report() {
        let mut report = CsvReport::new(Vec::new());
        report.log(record(1)).unwrap();
        report.log(record(2)).unwrap();

        let text = String::from_utf8(report.into_inner().unwrap()).unwrap();
        assert_eq!(text, "epoch,ndcg,train_loss,validation_loss\n1,0.5,0.25,0.125\n2,0.5,0.25,0.125\n");
    }

    #[test]
    fn test_csv_close_twice() {
        let mut report = CsvReport::new(Vec::new());
        report.log(record(1)).unwrap();
        report.close().unwrap();
        report.close().unwrap();
        report.log(record(2)).unwrap();
        assert!(report.into_inner().is_none());
    }

    #[test]
    fn test_memory_report() {
        let mut report = MemoryReport::default();
        report.log(record(1)).unwrap();
        report.close().unwrap();
        assert_eq!(report.records, vec![record(1)]);
        assert!(report.closed);
    }
}
