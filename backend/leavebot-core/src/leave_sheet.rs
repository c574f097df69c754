// src/leave_sheet.rs
use calamine::{open_workbook, Data, Range, Reader, Xlsx, XlsxError};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::leave::LeaveRecord;

// --- Constants ---

pub const SHEET_NAME: &str = "VOGSY Data";

const LONG_DATE_FORMAT: &str = "%b %d %Y"; // "May 23 2025"
const SLASH_DATE_FORMAT: &str = "%m/%d/%Y"; // "5/23/2025"

// --- Errors ---

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Failed to open workbook {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: XlsxError,
    },

    #[error("'{0}' sheet not found")]
    MissingSheet(String),

    #[error("Failed to read sheet '{sheet}': {source}")]
    Sheet {
        sheet: String,
        #[source]
        source: XlsxError,
    },

    #[error("Could not find expected columns in sheet: {}", .0.join(", "))]
    MissingColumns(Vec<&'static str>),

    #[error("Invalid date format in row {row}, column '{column}': {text:?}")]
    InvalidDate {
        row: usize,
        column: &'static str,
        text: String,
    },
}

// --- Column Model ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveColumn {
    Employee,
    StartDate,
    FinishDate,
    LeaveType,
    Status,
    OrgUnit,
}

impl LeaveColumn {
    pub const ALL: [LeaveColumn; 6] = [
        LeaveColumn::Employee,
        LeaveColumn::StartDate,
        LeaveColumn::FinishDate,
        LeaveColumn::LeaveType,
        LeaveColumn::Status,
        LeaveColumn::OrgUnit,
    ];

    /// Header text used by the header-driven layout.
    pub fn header(self) -> &'static str {
        match self {
            LeaveColumn::Employee => "Employee",
            LeaveColumn::StartDate => "Start date",
            LeaveColumn::FinishDate => "Finish date",
            LeaveColumn::LeaveType => "Description leave budget",
            LeaveColumn::Status => "Status",
            LeaveColumn::OrgUnit => "Company / department",
        }
    }

    /// 1-indexed column used by the fixed layout.
    pub fn fixed_position(self) -> usize {
        match self {
            LeaveColumn::Employee => 1,
            LeaveColumn::OrgUnit => 2,
            LeaveColumn::StartDate => 3,
            LeaveColumn::FinishDate => 4,
            LeaveColumn::LeaveType => 6,
            LeaveColumn::Status => 9,
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnLayout {
    /// Locate columns by their header text in row 1.
    ByHeader,
    /// Hard-coded column positions; row 1 is skipped unread.
    Fixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateTextFormat {
    /// "May 23 2025" or "5/23/2025".
    Standard,
    /// "Fri May 23 2025 00:00:00 GMT+0100": tokens 2-4 hold the long form.
    WeekdayPrefixed,
}

// 0-indexed absolute column per LeaveColumn slot
#[derive(Debug, Clone, Copy)]
struct ColumnIndices([usize; 6]);

impl ColumnIndices {
    fn get(&self, column: LeaveColumn) -> usize {
        self.0[column.slot()]
    }
}

// --- Cell Access ---

/// The only view of a spreadsheet row the extractor relies on.
pub trait CellSource {
    /// Trimmed string form of the cell at `col` (0-indexed), "" when empty.
    fn text(&self, col: usize) -> String;
    /// Native date held by the cell, if any.
    fn date(&self, col: usize) -> Option<NaiveDate>;
    /// True when the row carries no values at all.
    fn is_blank(&self) -> bool;
    /// Number of addressable columns, counted from column 0.
    fn width(&self) -> usize;
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 => (*f as i64).to_string(),
        other => other.to_string().trim().to_string(),
    }
}

fn cell_date(cell: &Data) -> Option<NaiveDate> {
    match cell {
        Data::DateTime(dt) if dt.is_datetime() => dt.as_datetime().map(|dt| dt.date()),
        Data::DateTimeIso(s) => s
            .get(..10)
            .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()),
        _ => None,
    }
}

fn cell_is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

impl CellSource for Vec<Data> {
    fn text(&self, col: usize) -> String {
        self.get(col).map(cell_text).unwrap_or_default()
    }

    fn date(&self, col: usize) -> Option<NaiveDate> {
        self.get(col).and_then(cell_date)
    }

    fn is_blank(&self) -> bool {
        self.iter().all(cell_is_blank)
    }

    fn width(&self) -> usize {
        self.len()
    }
}

/// A calamine row slice. Ranges start at the first used cell, so
/// `offset` maps absolute sheet columns back into the slice.
pub struct SheetRow<'a> {
    cells: &'a [Data],
    offset: usize,
}

impl<'a> SheetRow<'a> {
    pub fn new(cells: &'a [Data], offset: usize) -> Self {
        Self { cells, offset }
    }

    fn cell(&self, col: usize) -> Option<&Data> {
        col.checked_sub(self.offset).and_then(|i| self.cells.get(i))
    }
}

impl CellSource for SheetRow<'_> {
    fn text(&self, col: usize) -> String {
        self.cell(col).map(cell_text).unwrap_or_default()
    }

    fn date(&self, col: usize) -> Option<NaiveDate> {
        self.cell(col).and_then(cell_date)
    }

    fn is_blank(&self) -> bool {
        self.cells.iter().all(cell_is_blank)
    }

    fn width(&self) -> usize {
        self.offset + self.cells.len()
    }
}

// --- Date Parsing ---

/// Parses the displayed text of a date cell.
pub fn parse_leave_date(text: &str, format: DateTextFormat) -> Option<NaiveDate> {
    match format {
        DateTextFormat::Standard => {
            let text = text.trim();
            NaiveDate::parse_from_str(text, LONG_DATE_FORMAT)
                .or_else(|_| NaiveDate::parse_from_str(text, SLASH_DATE_FORMAT))
                .ok()
        }
        DateTextFormat::WeekdayPrefixed => {
            let parts: Vec<&str> = text.split_whitespace().skip(1).take(3).collect();
            if parts.len() < 3 {
                return None;
            }
            NaiveDate::parse_from_str(&parts.join(" "), LONG_DATE_FORMAT).ok()
        }
    }
}

// --- Reader ---

#[derive(Debug, Clone, Copy)]
pub struct LeaveSheetReader {
    layout: ColumnLayout,
    date_format: DateTextFormat,
}

impl LeaveSheetReader {
    pub fn new(layout: ColumnLayout, date_format: DateTextFormat) -> Self {
        Self {
            layout,
            date_format,
        }
    }

    /// Opens the workbook and extracts every leave row of the `VOGSY Data` sheet.
    pub fn read_workbook(&self, path: &Path) -> Result<Vec<LeaveRecord>, ExtractError> {
        info!("Reading leave export from {}", path.display());
        let mut workbook: Xlsx<_> = open_workbook(path).map_err(|source| ExtractError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        if !workbook.sheet_names().iter().any(|name| name == SHEET_NAME) {
            return Err(ExtractError::MissingSheet(SHEET_NAME.to_string()));
        }

        let range = workbook
            .worksheet_range(SHEET_NAME)
            .map_err(|source| ExtractError::Sheet {
                sheet: SHEET_NAME.to_string(),
                source,
            })?;

        self.read_range(&range)
    }

    pub fn read_range(&self, range: &Range<Data>) -> Result<Vec<LeaveRecord>, ExtractError> {
        let (first_row, first_col) = range
            .start()
            .map(|(row, col)| (row as usize, col as usize))
            .unwrap_or((0, 0));

        let rows: Vec<SheetRow<'_>> = range
            .rows()
            .map(|cells| SheetRow::new(cells, first_col))
            .collect();

        if first_row == 0 {
            return self.extract(&rows);
        }

        // Row 1 is the header even when calamine trimmed it away as blank.
        // Data then starts at sheet row first_row + 1.
        let header = SheetRow::new(&[], first_col);
        self.extract_rows(&header, &rows, first_row + 1)
    }

    /// Extracts records from `rows`, where `rows[0]` is the header row.
    /// Any bad date aborts the whole extraction.
    pub fn extract<R: CellSource>(&self, rows: &[R]) -> Result<Vec<LeaveRecord>, ExtractError> {
        let Some((header, data_rows)) = rows.split_first() else {
            return match self.layout {
                ColumnLayout::ByHeader => Err(ExtractError::MissingColumns(
                    LeaveColumn::ALL.iter().map(|c| c.header()).collect(),
                )),
                ColumnLayout::Fixed => Ok(Vec::new()),
            };
        };
        self.extract_rows(header, data_rows, 2)
    }

    // `first_row_number` is the 1-indexed sheet row of `data_rows[0]`
    fn extract_rows<R: CellSource>(
        &self,
        header: &R,
        data_rows: &[R],
        first_row_number: usize,
    ) -> Result<Vec<LeaveRecord>, ExtractError> {
        let columns = match self.layout {
            ColumnLayout::ByHeader => locate_columns(header)?,
            ColumnLayout::Fixed => {
                ColumnIndices(LeaveColumn::ALL.map(|column| column.fixed_position() - 1))
            }
        };

        let mut records = Vec::with_capacity(data_rows.len());
        for (idx, row) in data_rows.iter().enumerate() {
            if row.is_blank() {
                continue;
            }
            records.push(self.extract_row(row, &columns, first_row_number + idx)?);
        }

        info!("Extracted {} leave records from '{}'", records.len(), SHEET_NAME);
        Ok(records)
    }

    fn extract_row<R: CellSource>(
        &self,
        row: &R,
        columns: &ColumnIndices,
        row_number: usize,
    ) -> Result<LeaveRecord, ExtractError> {
        let start_date = self.read_date(row, columns, LeaveColumn::StartDate, row_number)?;
        let finish_date = self.read_date(row, columns, LeaveColumn::FinishDate, row_number)?;

        let record = LeaveRecord::new(
            &row.text(columns.get(LeaveColumn::Employee)),
            start_date,
            finish_date,
            &row.text(columns.get(LeaveColumn::LeaveType)),
            &row.text(columns.get(LeaveColumn::Status)),
            &row.text(columns.get(LeaveColumn::OrgUnit)),
        );
        debug!("Row {}: {:?}", row_number, record);
        Ok(record)
    }

    fn read_date<R: CellSource>(
        &self,
        row: &R,
        columns: &ColumnIndices,
        column: LeaveColumn,
        row_number: usize,
    ) -> Result<NaiveDate, ExtractError> {
        let col = columns.get(column);
        if let Some(date) = row.date(col) {
            return Ok(date);
        }

        let text = row.text(col);
        parse_leave_date(&text, self.date_format).ok_or(ExtractError::InvalidDate {
            row: row_number,
            column: column.header(),
            text,
        })
    }
}

fn locate_columns<R: CellSource>(header: &R) -> Result<ColumnIndices, ExtractError> {
    let mut found: [Option<usize>; 6] = [None; 6];
    for col in 0..header.width() {
        let text = header.text(col);
        // First matching header wins
        for column in LeaveColumn::ALL {
            if found[column.slot()].is_none() && text == column.header() {
                found[column.slot()] = Some(col);
            }
        }
    }

    let missing: Vec<&'static str> = LeaveColumn::ALL
        .iter()
        .filter(|column| found[column.slot()].is_none())
        .map(|column| column.header())
        .collect();
    if !missing.is_empty() {
        return Err(ExtractError::MissingColumns(missing));
    }

    Ok(ColumnIndices(found.map(|idx| idx.unwrap_or_default())))
}
