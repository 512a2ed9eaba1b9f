use csv::StringRecord;
use serde::de::DeserializeOwned;

use super::MmsTable;
use crate::error::{ArchiveError, Result};

/// A parsed MMS report: one column-header row and its data rows.
///
/// Reports are line-oriented CSV where the first field discriminates the row
/// kind: `C` comment rows (the file header and the `END OF REPORT` trailer),
/// one `I` column-header row, and `D` data rows matching it. Anything else
/// is malformed.
#[derive(Debug, Clone)]
pub struct MmsReport {
    table: MmsTable,
    headers: StringRecord,
    rows: Vec<StringRecord>,
}

impl MmsReport {
    pub fn parse(table: MmsTable, text: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut headers: Option<StringRecord> = None;
        let mut rows = Vec::new();
        let mut complete = false;

        for record in reader.records() {
            let record =
                record.map_err(|e| ArchiveError::parse(table.to_string(), e.to_string()))?;
            match record.get(0) {
                Some("C") => {
                    if record.get(1) == Some("END OF REPORT") {
                        complete = true;
                    }
                }
                Some("I") => {
                    if headers.is_some() {
                        return Err(ArchiveError::parse(
                            table.to_string(),
                            "unexpected second header row",
                        ));
                    }
                    headers = Some(record);
                }
                Some("D") => {
                    let header_len = match &headers {
                        Some(h) => h.len(),
                        None => {
                            return Err(ArchiveError::parse(
                                table.to_string(),
                                "data row before header row",
                            ));
                        }
                    };
                    if record.len() != header_len {
                        return Err(ArchiveError::parse(
                            table.to_string(),
                            format!(
                                "data row has {} fields, header has {}",
                                record.len(),
                                header_len
                            ),
                        ));
                    }
                    rows.push(record);
                }
                kind => {
                    return Err(ArchiveError::parse(
                        table.to_string(),
                        format!("unrecognised row kind {:?}", kind.unwrap_or("")),
                    ));
                }
            }
        }

        let headers = headers
            .ok_or_else(|| ArchiveError::parse(table.to_string(), "missing header row"))?;
        if !complete {
            // A truncated download is indistinguishable from a complete file
            // without the trailer.
            return Err(ArchiveError::parse(
                table.to_string(),
                "missing end-of-report trailer",
            ));
        }

        Ok(Self {
            table,
            headers,
            rows,
        })
    }

    pub fn table(&self) -> MmsTable {
        self.table
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Deserialize every data row into `T`, matching fields to published
    /// column names. Columns `T` does not name are ignored.
    pub fn rows<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        self.rows
            .iter()
            .map(|record| {
                record
                    .deserialize(Some(&self.headers))
                    .map_err(|e| ArchiveError::parse(self.table.to_string(), e.to_string()))
            })
            .collect()
    }
}
