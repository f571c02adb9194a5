//! CSV serialisation of export rows.

use std::io::Write;

use crate::error::{ExportError, ExportResult};
use crate::row::Row;

/// UTF-8 byte-order mark written before the header row.
pub const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Header-ordered CSV writer.
///
/// Writes the BOM and header row on start; every row is then written in
/// header order, missing cells as empty strings.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    headers: Vec<String>,
    rows: usize,
}

impl<W: Write> CsvSink<W> {
    pub fn start(mut out: W, headers: Vec<String>) -> ExportResult<Self> {
        out.write_all(BOM)?;
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(out);
        writer.write_record(&headers)?;
        Ok(Self {
            writer,
            headers,
            rows: 0,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows_written(&self) -> usize {
        self.rows
    }

    pub fn write_row(&mut self, row: &Row) -> ExportResult<()> {
        self.writer.write_record(row.values_for(&self.headers))?;
        self.rows += 1;
        Ok(())
    }

    /// Write a batch and flush it through to the underlying writer.
    pub fn write_batch<'a>(&mut self, rows: impl IntoIterator<Item = &'a Row>) -> ExportResult<()> {
        for row in rows {
            self.write_row(row)?;
        }
        self.writer.flush()?;
        Ok(())
    }

    /// Flush and hand back the underlying writer with the data row count.
    pub fn finish(self) -> ExportResult<(W, usize)> {
        let rows = self.rows;
        let out = self
            .writer
            .into_inner()
            .map_err(|err| ExportError::Io(err.into_error()))?;
        Ok((out, rows))
    }
}
