//! String-only tables for the input spreadsheet and the output file.
//!
//! Every cell stays a `String` end to end, so values such as `$33,200.00`
//! or `08 May 2025` are written back exactly as they were read.

use std::io::{Read, Write};
use std::path::Path;

use crate::types::{DocumentTarget, ExtractedFields, SignoffError, SignoffResult};

/// Input column holding the company name.
pub const COMPANY_COLUMN: &str = "Company";

/// Input column holding the document URL.
pub const DOCUMENT_COLUMN: &str = "Document type";

/// Columns appended to the input table, in output order.
pub const EXTRACTED_COLUMNS: [&str; 4] = [
    "Extracted Signed by",
    "Extracted Signed date",
    "Extracted IP address",
    "Extracted Sent by",
];

/// Widest cell shown by [`Table::preview`].
const PREVIEW_CELL_WIDTH: usize = 32;

/// A header row plus data rows, all strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Create an empty table with the given headers.
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. Short rows are padded with empty cells.
    pub fn push_row<S: Into<String>>(&mut self, cells: impl IntoIterator<Item = S>) -> SignoffResult<()> {
        let mut row: Vec<String> = cells.into_iter().map(Into::into).collect();
        if row.len() > self.headers.len() {
            return Err(SignoffError::InvalidRow {
                row: self.rows.len(),
                reason: format!(
                    "{} cells for {} columns",
                    row.len(),
                    self.headers.len()
                ),
            });
        }
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
        Ok(())
    }

    /// Parse comma-separated text with a header row.
    pub fn from_csv_reader<R: Read>(reader: R) -> SignoffResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect::<Vec<_>>();
        let mut table = Table::new(headers);

        for record in csv_reader.records() {
            let record = record?;
            table.push_row(record.iter())?;
        }

        Ok(table)
    }

    pub fn from_csv_str(text: &str) -> SignoffResult<Self> {
        Self::from_csv_reader(text.as_bytes())
    }

    pub fn read_path(path: &Path) -> SignoffResult<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file)
    }

    /// Write the table as CSV with a header row.
    pub fn write_csv<W: Write>(&self, writer: W) -> SignoffResult<()> {
        let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);
        csv_writer.write_record(&self.headers)?;
        for row in &self.rows {
            csv_writer.write_record(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Write the table to `path`, replacing any existing file.
    pub fn write_path(&self, path: &Path) -> SignoffResult<()> {
        let file = std::fs::File::create(path)?;
        self.write_csv(std::io::BufWriter::new(file))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the column named `name`.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    /// The document target described by row `row`.
    pub fn target(&self, row: usize) -> SignoffResult<DocumentTarget> {
        let company_col = self
            .column(COMPANY_COLUMN)
            .ok_or_else(|| SignoffError::MissingColumn(COMPANY_COLUMN.to_string()))?;
        let document_col = self
            .column(DOCUMENT_COLUMN)
            .ok_or_else(|| SignoffError::MissingColumn(DOCUMENT_COLUMN.to_string()))?;

        let company = self.cell(row, company_col).unwrap_or_default().trim();
        let document_url = self.cell(row, document_col).unwrap_or_default().trim();
        if document_url.is_empty() {
            return Err(SignoffError::InvalidRow {
                row,
                reason: format!("empty {DOCUMENT_COLUMN:?} cell"),
            });
        }

        Ok(DocumentTarget {
            company: company.to_string(),
            document_url: document_url.to_string(),
        })
    }

    /// Render the first `limit` rows as an aligned text grid.
    pub fn preview(&self, limit: usize) -> String {
        let shown: Vec<Vec<String>> = std::iter::once(&self.headers)
            .chain(self.rows.iter().take(limit))
            .map(|row| row.iter().map(|c| clip(c)).collect())
            .collect();

        let mut widths = vec![0usize; self.headers.len()];
        for row in &shown {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let mut out = String::new();
        for (n, row) in shown.iter().enumerate() {
            let label = if n == 0 { String::new() } else { (n - 1).to_string() };
            out.push_str(&format!("{label:>4}"));
            for (i, cell) in row.iter().enumerate() {
                out.push_str("  ");
                out.push_str(&format!("{cell:<width$}", width = widths[i]));
            }
            out.push('\n');
        }
        if self.rows.len() > limit {
            out.push_str(&format!("... {} more rows\n", self.rows.len() - limit));
        }
        out
    }
}

fn clip(cell: &str) -> String {
    let single_line = cell.replace(['\n', '\r'], " ");
    if single_line.chars().count() <= PREVIEW_CELL_WIDTH {
        return single_line;
    }
    let mut clipped: String = single_line.chars().take(PREVIEW_CELL_WIDTH - 3).collect();
    clipped.push_str("...");
    clipped
}

/// The input table augmented with the four extracted columns.
///
/// Every input row stays in place; extracted cells start empty and are
/// filled once per processed row.
#[derive(Debug, Clone)]
pub struct ResultTable {
    table: Table,
    extracted: [usize; 4],
}

impl ResultTable {
    /// Copy the input and add (or reuse) the extracted columns.
    pub fn from_input(input: &Table) -> Self {
        let mut table = input.clone();
        let extracted = EXTRACTED_COLUMNS.map(|name| match table.column(name) {
            Some(idx) => idx,
            None => {
                table.headers.push(name.to_string());
                for row in &mut table.rows {
                    row.push(String::new());
                }
                table.headers.len() - 1
            }
        });
        for row in &mut table.rows {
            for &idx in &extracted {
                row[idx].clear();
            }
        }
        Self { table, extracted }
    }

    /// Fill the extracted cells of row `row`.
    pub fn record(&mut self, row: usize, fields: &ExtractedFields) {
        let Some(cells) = self.table.rows.get_mut(row) else {
            tracing::warn!("ignoring result for row {row}: out of range");
            return;
        };
        for (idx, value) in self.extracted.iter().zip(fields.to_columns()) {
            cells[*idx] = value;
        }
    }

    /// Extracted values for row `row`, in output order.
    pub fn extracted(&self, row: usize) -> Option<[&str; 4]> {
        let cells = self.table.rows.get(row)?;
        Some(self.extracted.map(|idx| cells[idx].as_str()))
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn into_table(self) -> Table {
        self.table
    }
}
