//! Semicolon-delimited dataset sources
//!
//! Each business table loads from `<Table>.csv` with a header row naming
//! the columns. Values are coerced per column type the way SQLite type
//! affinity would store them:
//!
//! - empty field: NULL
//! - INTEGER / REAL: numeric when the text parses, otherwise kept as text
//! - BLOB: `0x`-prefixed hex decoded to bytes, otherwise the raw bytes

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::executor::StoreValue;
use crate::schema::{ColumnDef, ColumnType, TableDescriptor};

use super::errors::{LoadError, LoadResult};

/// Field delimiter of the dataset files
pub const DELIMITER: u8 = b';';

/// A header-validated reader over one table's source
pub struct CsvSource<R: Read> {
    reader: csv::Reader<R>,
    columns: Vec<&'static ColumnDef>,
    label: String,
    record: StringRecord,
}

impl CsvSource<File> {
    /// Opens `path` as the source for `table`
    pub fn open(path: &Path, table: &'static TableDescriptor) -> LoadResult<Self> {
        let label = path.display().to_string();
        let file = File::open(path).map_err(|e| LoadError::unreadable(&label, e))?;
        Self::from_reader(file, label, table)
    }
}

impl<R: Read> CsvSource<R> {
    /// Wraps a reader, validating its header row against `table`
    pub fn from_reader(
        reader: R,
        label: impl Into<String>,
        table: &'static TableDescriptor,
    ) -> LoadResult<Self> {
        let label = label.into();
        let mut reader = ReaderBuilder::new()
            .delimiter(DELIMITER)
            .trim(Trim::Headers)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| LoadError::malformed(&label, e))?
            .clone();

        let columns = headers
            .iter()
            .map(|h| {
                let name = h.trim_start_matches('\u{feff}');
                table
                    .column(name)
                    .ok_or_else(|| LoadError::unknown_column(table.name, name))
            })
            .collect::<LoadResult<Vec<_>>>()?;

        Ok(Self {
            reader,
            columns,
            label,
            record: StringRecord::new(),
        })
    }

    /// Column names in source order
    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    /// Reads up to `max_rows` rows; an empty chunk means end of input
    pub fn next_chunk(&mut self, max_rows: usize) -> LoadResult<Vec<Vec<StoreValue>>> {
        let mut chunk = Vec::with_capacity(max_rows);
        while chunk.len() < max_rows {
            let more = self
                .reader
                .read_record(&mut self.record)
                .map_err(|e| LoadError::malformed(&self.label, e))?;
            if !more {
                break;
            }
            let row = self
                .columns
                .iter()
                .zip(self.record.iter())
                .map(|(col, field)| coerce(field, col.column_type))
                .collect();
            chunk.push(row);
        }
        Ok(chunk)
    }
}

/// Converts one raw field to a bound value
pub fn coerce(field: &str, column_type: ColumnType) -> StoreValue {
    if field.is_empty() {
        return StoreValue::Null;
    }
    let text = || StoreValue::Text(field.to_string());
    match column_type {
        ColumnType::Integer => field
            .trim()
            .parse::<i64>()
            .map(StoreValue::Integer)
            .unwrap_or_else(|_| text()),
        ColumnType::Real => field
            .trim()
            .parse::<f64>()
            .map(StoreValue::Real)
            .unwrap_or_else(|_| text()),
        ColumnType::Text => text(),
        ColumnType::Blob => StoreValue::Blob(
            field
                .strip_prefix("0x")
                .and_then(decode_hex)
                .unwrap_or_else(|| field.as_bytes().to_vec()),
        ),
    }
}

fn decode_hex(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| s.get(i..i + 2).and_then(|b| u8::from_str_radix(b, 16).ok()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::errors::LoadErrorCode;
    use crate::schema::SchemaRegistry;

    fn table(name: &str) -> &'static TableDescriptor {
        SchemaRegistry::northwind().describe(name).unwrap()
    }

    #[test]
    fn test_coerce() {
        assert_eq!(coerce("", ColumnType::Text), StoreValue::Null);
        assert_eq!(coerce("12", ColumnType::Integer), StoreValue::Integer(12));
        assert_eq!(coerce("x1", ColumnType::Integer), StoreValue::Text("x1".into()));
        assert_eq!(coerce("18.5", ColumnType::Real), StoreValue::Real(18.5));
        assert_eq!(coerce("0x0aff", ColumnType::Blob), StoreValue::Blob(vec![0x0a, 0xff]));
        assert_eq!(coerce("ab", ColumnType::Blob), StoreValue::Blob(b"ab".to_vec()));
    }

    #[test]
    fn test_reads_semicolon_rows_in_chunks() {
        let data = "\u{feff}RegionID;RegionDescription\n1;Eastern\n2;Western\n3;Northern\n";
        let mut source = CsvSource::from_reader(data.as_bytes(), "Regions.csv", table("Regions")).unwrap();
        assert_eq!(source.column_names(), ["RegionID", "RegionDescription"]);

        let first = source.next_chunk(2).unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0], vec![StoreValue::Integer(1), StoreValue::Text("Eastern".into())]);

        let rest = source.next_chunk(2).unwrap();
        assert_eq!(rest.len(), 1);
        assert!(source.next_chunk(2).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_header_is_rejected() {
        let data = "RegionID;Nope\n1;x\n";
        let err = CsvSource::from_reader(data.as_bytes(), "Regions.csv", table("Regions"))
            .err()
            .unwrap();
        assert_eq!(err.code(), LoadErrorCode::NwUnknownColumn);
    }

    #[test]
    fn test_ragged_row_is_malformed() {
        let data = "RegionID;RegionDescription\n1;Eastern;extra\n";
        let mut source = CsvSource::from_reader(data.as_bytes(), "Regions.csv", table("Regions")).unwrap();
        let err = source.next_chunk(10).unwrap_err();
        assert_eq!(err.code(), LoadErrorCode::NwSourceMalformed);
    }
}
