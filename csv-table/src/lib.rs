#![warn(clippy::all, rust_2018_idioms)]

//! Loads CSV files into a small column-oriented table of text cells.
//!
//! Cells are kept as raw text; interpreting them as numbers or timestamps is
//! left to the caller (see [`Column::numbers`]).

mod sniff;

use std::{collections::HashSet, path::Path};

use thiserror::Error;

pub use sniff::sniff_delimiter;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("unable to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("no header row found")]
    Empty,
    #[error("column '{0}' not found")]
    MissingColumn(String),
    #[error("value '{value}' in row {row} of column '{column}' is not a number")]
    NotANumber {
        column: String,
        row: usize,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    num_rows: usize,
}

impl Table {
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        let raw_input = std::fs::read_to_string(path)?;
        log::debug!("read {} bytes from {:?}", raw_input.len(), path);
        Self::parse(&raw_input)
    }

    /// Parse CSV text. The first row that is not a comment is the header.
    pub fn parse(raw_input: &str) -> Result<Self, TableError> {
        let delimiter = sniff_delimiter(raw_input);
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter as u8)
            .comment(Some(b'#'))
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(raw_input.as_bytes());

        let headers = reader.headers()?.clone();
        if headers.is_empty() || headers.iter().all(str::is_empty) {
            return Err(TableError::Empty);
        }

        let mut columns: Vec<Column> = Vec::with_capacity(headers.len());
        for header in headers.iter() {
            let name = unique_header(header, &columns);
            columns.push(Column {
                name,
                values: Vec::new(),
            });
        }

        let mut num_rows = 0;
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            if record.len() > columns.len() {
                log::warn!(
                    "row {} has {} cells but there are only {} columns, ignoring the surplus",
                    row + 1,
                    record.len(),
                    columns.len()
                );
            }
            for (i, column) in columns.iter_mut().enumerate() {
                column
                    .values
                    .push(record.get(i).unwrap_or_default().to_string());
            }
            num_rows += 1;
        }

        log::debug!(
            "parsed table with {} columns and {} rows",
            columns.len(),
            num_rows
        );
        Ok(Self { columns, num_rows })
    }

    pub fn field_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column(&self, name: &str) -> Result<&Column, TableError> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }
}

impl Column {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parse every cell as a float. Empty cells become NaN, anything else
    /// that is not a number is an error.
    pub fn numbers(&self) -> Result<Vec<f64>, TableError> {
        self.values
            .iter()
            .enumerate()
            .map(|(row, value)| {
                if value.is_empty() {
                    return Ok(f64::NAN);
                }
                value.parse::<f64>().map_err(|_| TableError::NotANumber {
                    column: self.name.clone(),
                    row,
                    value: value.clone(),
                })
            })
            .collect()
    }

    /// Distinct cell values in the order they first appear.
    pub fn distinct(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.values
            .iter()
            .map(String::as_str)
            .filter(|value| seen.insert(*value))
            .collect()
    }

    pub fn distinct_count(&self) -> usize {
        self.values.iter().collect::<HashSet<_>>().len()
    }
}

// Duplicated headers get a numeric suffix (`x`, `x.1`, `x.2`, ...).
fn unique_header(header: &str, existing: &[Column]) -> String {
    let taken = |name: &str| existing.iter().any(|c| c.name == name);
    if !taken(header) {
        return header.to_string();
    }
    let mut i = 1;
    loop {
        let candidate = format!("{header}.{i}");
        if !taken(&candidate) {
            return candidate;
        }
        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_parse_mixed_columns() {
        init();
        let table = Table::parse("time,temp,site\n12:00:00,1.5,a\n12:00:01,2.5,b\n").unwrap();
        assert_eq!(table.field_names(), vec!["time", "temp", "site"]);
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.column("temp").unwrap().numbers().unwrap(), vec![1.5, 2.5]);
        assert_eq!(
            table.column("time").unwrap().values(),
            &["12:00:00".to_string(), "12:00:01".to_string()]
        );
    }

    #[test]
    fn test_parse_semicolon_with_comments() {
        init();
        let raw = "# exported by logger\nx;y\n1;2\n# interrupted\n3;4\n";
        let table = Table::parse(raw).unwrap();
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.column("y").unwrap().numbers().unwrap(), vec![2.0, 4.0]);
    }

    #[test]
    fn test_short_rows_are_padded() {
        init();
        let table = Table::parse("a,b,c\n1,2\n4,5,6\n").unwrap();
        let c = table.column("c").unwrap().numbers().unwrap();
        assert!(c[0].is_nan());
        assert_eq!(c[1], 6.0);
    }

    #[test]
    fn test_duplicate_headers_get_suffix() {
        let table = Table::parse("v,v,v\n1,2,3\n").unwrap();
        assert_eq!(table.field_names(), vec!["v", "v.1", "v.2"]);
    }

    #[test]
    fn test_numbers_reports_type_mismatch() {
        let table = Table::parse("a\n1\nfoo\n").unwrap();
        let err = table.column("a").unwrap().numbers().unwrap_err();
        assert!(matches!(err, TableError::NotANumber { row: 1, .. }));
    }

    #[test]
    fn test_missing_column() {
        let table = Table::parse("a\n1\n").unwrap();
        assert!(matches!(
            table.column("b"),
            Err(TableError::MissingColumn(name)) if name == "b"
        ));
    }

    #[test]
    fn test_distinct_keeps_first_seen_order() {
        let table = Table::parse("site\nb\na\nb\nc\na\n").unwrap();
        let site = table.column("site").unwrap();
        assert_eq!(site.distinct(), vec!["b", "a", "c"]);
        assert_eq!(site.distinct_count(), 3);
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(Table::parse(""), Err(TableError::Empty)));
    }

    #[test]
    fn test_from_path() {
        init();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "x,y\n0,1\n1,4\n2,9\n").unwrap();
        let table = Table::from_path(file.path()).unwrap();
        assert_eq!(table.num_rows(), 3);
        assert_eq!(table.num_columns(), 2);
    }
}
