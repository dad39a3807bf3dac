use crate::domain::attempt::AttemptRecord;
use crate::error::{ReconcileError, Result};
use csv::{ByteRecord, StringRecord};
use std::io::Read;
use tracing::warn;

/// Columns that are only ever displayed; invalid UTF-8 in them is replaced
/// rather than dropped.
const DISPLAY_COLUMNS: [&str; 2] = ["author_id", "notes"];

/// Reads field attempts from a CSV source.
///
/// This reader wraps `csv::Reader` and provides an iterator over `Result<AttemptRecord>`.
/// It handles whitespace trimming and short rows automatically; missing
/// trailing columns are treated as absent tags.
///
/// Rows are read as raw bytes so one bad cell does not cost the whole
/// attempt: display columns are decoded lossily, any other cell that is not
/// valid UTF-8 is treated as empty.
pub struct AttemptReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> AttemptReader<R> {
    /// Creates a new `AttemptReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes attempts.
    ///
    /// A header row that cannot be read yields a single error and nothing else.
    pub fn attempts(mut self) -> impl Iterator<Item = Result<AttemptRecord>> {
        let (headers, header_error) = match self.reader.headers() {
            Ok(headers) => (headers.clone(), None),
            Err(e) => (StringRecord::new(), Some(ReconcileError::from(e))),
        };
        let rows = if header_error.is_some() { 0 } else { usize::MAX };

        header_error.map(Err).into_iter().chain(
            self.reader
                .into_byte_records()
                .take(rows)
                .map(move |record| decode(&headers, &record?)),
        )
    }
}

fn decode(headers: &StringRecord, record: &ByteRecord) -> Result<AttemptRecord> {
    let cells: Vec<String> = record
        .iter()
        .enumerate()
        .map(|(index, bytes)| match std::str::from_utf8(bytes) {
            Ok(text) => text.to_string(),
            Err(_) => {
                let column = headers.get(index).unwrap_or_default();
                if DISPLAY_COLUMNS.contains(&column) {
                    String::from_utf8_lossy(bytes).into_owned()
                } else {
                    warn!(column, "Dropping cell that is not valid UTF-8");
                    String::new()
                }
            }
        })
        .collect();
    Ok(StringRecord::from(cells).deserialize(Some(headers))?)
}
