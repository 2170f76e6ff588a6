/*!
# Tabular Codec

Reads and writes comma-delimited files as plain rows of string cells. No header
is assumed and rows may differ in length; interpreting columns is left to the
caller.
*/

use crate::{errors::UtilsResult, temporal::Instant};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

pub type Row = Vec<String>;
pub type Table = Vec<Row>;

// ================================================================================================
// Cell values for writing
// ================================================================================================

/// A value destined for one CSV field
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    /// Written in ISO-8601
    Instant(Instant),
    /// Written as an empty field
    Empty,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(text) => f.write_str(text),
            Cell::Integer(value) => write!(f, "{value}"),
            Cell::Float(value) => write!(f, "{value}"),
            Cell::Boolean(value) => write!(f, "{value}"),
            Cell::Instant(instant) => write!(f, "{instant}"),
            Cell::Empty => Ok(()),
        }
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Cell::Text(text)
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::Text(text.to_string())
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Integer(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Float(value)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Boolean(value)
    }
}

impl From<Instant> for Cell {
    fn from(instant: Instant) -> Self {
        Cell::Instant(instant)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map_or(Cell::Empty, Into::into)
    }
}

// ================================================================================================
// CSV Reading
// ================================================================================================

/// Read every row of a CSV file, in file order
pub fn read_table<P: AsRef<Path>>(path: P) -> UtilsResult<Table> {
    let file = File::open(path)?;
    read_table_from_reader(file)
}

/// Read every row of CSV text from `reader`, in stream order.
///
/// A blank line is an empty row, so tables written by [`write_table`] come back
/// with their empty rows in place.
pub fn read_table_from_reader<R: Read>(mut reader: R) -> UtilsResult<Table> {
    let mut input = Vec::new();
    reader.read_to_end(&mut input)?;

    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input.as_slice());

    let mut rows = Vec::new();
    let mut record = StringRecord::new();
    let mut consumed = 0;
    let mut after_record = false;

    while rdr.read_record(&mut record)? {
        push_blank_rows(&mut rows, &input, consumed, after_record);
        rows.push(record.iter().map(str::to_string).collect());
        consumed = usize::try_from(rdr.position().byte()).unwrap_or(input.len());
        after_record = true;
    }
    push_blank_rows(&mut rows, &input, consumed, after_record);

    Ok(rows)
}

/// The csv reader drops blank lines; put them back as empty rows.
///
/// `at` is anywhere inside the run of line breaks between two records (or
/// before the first / after the last). The first break of the run ends the
/// previous record, every further one is a blank line.
fn push_blank_rows(rows: &mut Table, input: &[u8], at: usize, after_record: bool) {
    let is_break = |byte: &&u8| **byte == b'\r' || **byte == b'\n';
    let at = at.min(input.len());
    let start = at - input[..at].iter().rev().take_while(is_break).count();
    let end = at + input[at..].iter().take_while(is_break).count();

    let run = &input[start..end];
    let crlf = run.windows(2).filter(|pair| *pair == b"\r\n").count();
    let breaks = run.len() - crlf;
    let blank = if after_record {
        breaks.saturating_sub(1)
    } else {
        breaks
    };

    rows.extend(std::iter::repeat_with(Vec::new).take(blank));
}

// ================================================================================================
// CSV Writing
// ================================================================================================

/// Write `rows` to a CSV file, replacing any existing content
pub fn write_table<P, R, C>(path: P, rows: &[R]) -> UtilsResult<()>
where
    P: AsRef<Path>,
    R: AsRef<[C]>,
    C: fmt::Display,
{
    let file = File::create(path)?;
    write_table_to_writer(BufWriter::new(file), rows)
}

/// Write `rows` as CSV text to `writer`, one row per line.
///
/// A field is quoted only when it holds a comma, a quote or a line break, and
/// embedded quotes are doubled. A row without cells is written as an empty line.
pub fn write_table_to_writer<W, R, C>(mut writer: W, rows: &[R]) -> UtilsResult<()>
where
    W: Write,
    R: AsRef<[C]>,
    C: fmt::Display,
{
    let mut line = Vec::new();

    for row in rows {
        line.clear();
        encode_row(&mut line, row.as_ref())?;
        writer.write_all(&line)?;
    }

    writer.flush()?;
    Ok(())
}

fn encode_row<C: fmt::Display>(line: &mut Vec<u8>, cells: &[C]) -> UtilsResult<()> {
    // csv renders a record with no fields as `""`, which reads back as one empty cell
    if cells.is_empty() {
        line.push(b'\n');
        return Ok(());
    }

    let mut wtr = WriterBuilder::new().from_writer(line);
    wtr.write_record(cells.iter().map(ToString::to_string))?;
    wtr.flush()?;
    Ok(())
}

// ================================================================================================
// Tests
// ================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::UtilsError;
    use crate::temporal::{resolve_timestamp, TimezoneHint};
    use tempfile::NamedTempFile;

    fn table(rows: &[&[&str]]) -> Table {
        rows.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_write_and_read_table() {
        let rows = table(&[
            &["STUDENT", "AIRPLANE", "INSTRUCTOR", "TAKEOFF"],
            &["S00309", "738GG", "I072", "2015-01-10T10:00:00-05:00"],
            &["S00310", "", "", "2015-01-11T09:00:00"],
        ]);

        let temp_file = NamedTempFile::new().unwrap();
        write_table(temp_file.path(), &rows).unwrap();
        let read_rows = read_table(temp_file.path()).unwrap();

        assert_eq!(rows, read_rows);
    }

    #[test]
    fn test_quoting_roundtrip() {
        let rows = table(&[
            &["plain", "with,comma", "with \"quotes\""],
            &["multi\nline", "trailing space ", " leading"],
        ]);

        let mut buffer = Vec::new();
        write_table_to_writer(&mut buffer, &rows).unwrap();
        let text = String::from_utf8(buffer.clone()).unwrap();

        assert!(text.starts_with("plain,\"with,comma\",\"with \"\"quotes\"\"\"\n"));
        assert_eq!(read_table_from_reader(buffer.as_slice()).unwrap(), rows);
    }

    #[test]
    fn test_ragged_rows_are_kept() {
        let text = "id,name\nA1\nB2,Bea,extra\n";
        let rows = read_table_from_reader(text.as_bytes()).unwrap();

        assert_eq!(rows, table(&[&["id", "name"], &["A1"], &["B2", "Bea", "extra"]]));
    }

    #[test]
    fn test_cells_are_never_typed() {
        let rows = read_table_from_reader("1,2.5,true,\n".as_bytes()).unwrap();
        assert_eq!(rows, table(&[&["1", "2.5", "true", ""]]));
    }

    #[test]
    fn test_write_typed_cells() {
        let takeoff = resolve_timestamp("2015-06-05T07:00:00", &"America/New_York".into()).unwrap();
        let rows = vec![vec![
            Cell::from("S00309"),
            Cell::from(3_i64),
            Cell::from(1.5),
            Cell::from(false),
            Cell::from(takeoff),
            Cell::from(None::<Instant>),
        ]];

        let mut buffer = Vec::new();
        write_table_to_writer(&mut buffer, &rows).unwrap();

        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "S00309,3,1.5,false,2015-06-05T07:00:00-04:00,\n"
        );
    }

    #[test]
    fn test_write_overwrites_existing_file() {
        let temp_file = NamedTempFile::new().unwrap();
        write_table(temp_file.path(), &table(&[&["old"], &["rows"], &["here"]])).unwrap();
        write_table(temp_file.path(), &table(&[&["new"]])).unwrap();

        assert_eq!(read_table(temp_file.path()).unwrap(), table(&[&["new"]]));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_table(dir.path().join("missing.csv"));
        assert!(matches!(result, Err(UtilsError::Io(_))));
    }

    #[test]
    fn test_blank_lines_are_empty_rows() {
        let rows = read_table_from_reader("\na\n\n\nb\n\n".as_bytes()).unwrap();
        assert_eq!(rows, table(&[&[], &["a"], &[], &[], &["b"], &[]]));

        let rows = read_table_from_reader("a\r\n\r\nb\r\n".as_bytes()).unwrap();
        assert_eq!(rows, table(&[&["a"], &[], &["b"]]));

        assert!(read_table_from_reader("".as_bytes()).unwrap().is_empty());
        assert_eq!(read_table_from_reader("a".as_bytes()).unwrap(), table(&[&["a"]]));
    }

    #[test]
    fn test_blank_line_inside_quotes_is_data() {
        let rows = read_table_from_reader("\"one\n\ntwo\",x\n\ny\n".as_bytes()).unwrap();
        assert_eq!(rows, table(&[&["one\n\ntwo", "x"], &[], &["y"]]));
    }

    #[test]
    fn test_empty_row_is_written_as_empty_line() {
        let rows = table(&[&["a"], &[], &[""], &["b"]]);

        let mut buffer = Vec::new();
        write_table_to_writer(&mut buffer, &rows).unwrap();

        assert_eq!(String::from_utf8(buffer.clone()).unwrap(), "a\n\n\"\"\nb\n");
        assert_eq!(read_table_from_reader(buffer.as_slice()).unwrap(), rows);
    }

    #[test]
    fn test_unwritable_destination_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");

        let result = write_table(&path, &table(&[&["a"]]));
        assert!(matches!(result, Err(UtilsError::Io(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_invalid_utf8_is_csv_error() {
        let bytes: &[u8] = b"ok,\xff\xfe\n";
        let result = read_table_from_reader(bytes);
        assert!(matches!(result, Err(UtilsError::Csv(_))));
    }

    #[test]
    fn test_naive_instant_cell() {
        let naive = resolve_timestamp("2015-06-05 07:00", &TimezoneHint::None).unwrap();
        assert_eq!(Cell::from(naive).to_string(), "2015-06-05T07:00:00");
    }
}
