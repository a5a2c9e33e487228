//! CSV row source for the legacy export
//!
//! The export carries two header/metadata records before the data. Records are
//! numbered from 1 in the order the CSV reader produces them (blank lines are
//! not records), and that number is what `--start-record` refers to.

use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::core::error::MigrationError;

/// First record number holding test data
pub const FIRST_DATA_RECORD: u64 = 3;

/// Column positions in the legacy export
pub mod columns {
    pub const NAME: usize = 0;
    pub const DESCRIPTION: usize = 1;
    pub const STEPS: usize = 3;
    pub const PARAMETERS: [usize; 4] = [4, 5, 6, 7];
    pub const EXPECTED_RESULT: usize = 8;
}

/// One data record of the export
#[derive(Debug, Clone)]
pub struct SourceRow {
    number: u64,
    record: StringRecord,
}

impl SourceRow {
    pub fn new(number: u64, record: StringRecord) -> Self {
        Self { number, record }
    }

    /// 1-based record number within the file
    pub fn number(&self) -> u64 {
        self.number
    }

    /// Raw cell content; a short row fails here rather than when it is read
    pub fn field(&self, column: usize) -> Result<&str, MigrationError> {
        self.record
            .get(column)
            .ok_or(MigrationError::MissingColumn {
                record: self.number,
                column,
            })
    }

    pub fn name(&self) -> Result<&str, MigrationError> {
        self.field(columns::NAME)
    }

    pub fn description(&self) -> Result<&str, MigrationError> {
        self.field(columns::DESCRIPTION)
    }

    pub fn step_text(&self) -> Result<&str, MigrationError> {
        self.field(columns::STEPS)
    }

    pub fn parameter_columns(&self) -> Result<[&str; 4], MigrationError> {
        let [a, b, c, d] = columns::PARAMETERS;
        Ok([self.field(a)?, self.field(b)?, self.field(c)?, self.field(d)?])
    }

    pub fn expected_result(&self) -> Result<&str, MigrationError> {
        self.field(columns::EXPECTED_RESULT)
    }
}

/// Iterator over the data rows of an export, honoring a resume offset
pub struct RowSource<R: Read> {
    records: StringRecordsIntoIter<R>,
    start_record: u64,
    position: u64,
}

impl RowSource<BufReader<File>> {
    /// Open an export file. Rows before `start_record` are skipped.
    pub fn open(path: &Path, start_record: u64) -> Result<Self, MigrationError> {
        let file = File::open(path)?;
        Ok(Self::from_reader(BufReader::new(file), start_record))
    }
}

impl<R: Read> RowSource<R> {
    pub fn from_reader(reader: R, start_record: u64) -> Self {
        let records = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader)
            .into_records();

        Self {
            records,
            start_record,
            position: 0,
        }
    }

    /// Lowest record number this source will yield
    pub fn first_yielded(&self) -> u64 {
        self.start_record.max(FIRST_DATA_RECORD)
    }
}

impl<R: Read> Iterator for RowSource<R> {
    type Item = Result<SourceRow, MigrationError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let record = match self.records.next()? {
                Ok(record) => record,
                Err(e) => return Some(Err(e.into())),
            };
            self.position += 1;

            if self.position < FIRST_DATA_RECORD || self.position < self.start_record {
                log::debug!("Skipping record {}", self.position);
                continue;
            }

            return Some(Ok(SourceRow::new(self.position, record)));
        }
    }
}
