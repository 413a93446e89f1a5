// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::error::{Error, Result};
use std::io::Write;

/// Append-only destination for the wide table.
///
/// The header is written at most once and before any row.
pub trait TableSink {
    fn write_header(&mut self, columns: &[String]) -> Result<()>;

    fn write_rows(&mut self, rows: &[Vec<String>]) -> Result<()>;

    fn flush(&mut self) -> Result<()>;
}

/// CSV output over any writer (a file or stdout).
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    header_written: bool,
}

impl<W: Write> CsvSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            writer: csv::WriterBuilder::new().flexible(false).from_writer(out),
            header_written: false,
        }
    }

    pub fn header_written(&self) -> bool {
        self.header_written
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))
    }
}

impl<W: Write> TableSink for CsvSink<W> {
    fn write_header(&mut self, columns: &[String]) -> Result<()> {
        if self.header_written {
            return Err(Error::HeaderAlreadyWritten);
        }
        self.writer.write_record(columns)?;
        self.header_written = true;
        Ok(())
    }

    fn write_rows(&mut self, rows: &[Vec<String>]) -> Result<()> {
        if !self.header_written {
            return Err(Error::HeaderNotWritten);
        }
        for row in rows {
            self.writer.write_record(row)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
