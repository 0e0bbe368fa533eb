//! Turns the raw CAFCI export (two merged header rows, section dividers, blank
//! quotes) into a flat table with one combined header row.

use super::error::{PipelineError, Result};
use super::fund::COL_DAILY_VARIATION;
use super::table::FlatTable;
use calamine::{Data, Reader, open_workbook_auto};
use std::path::Path;
use tracing::{debug, info};

/// Token identifying the first of the two header rows.
pub const HEADER_TOKEN: &str = "Fondo";

/// Offset (relative to the first data row) of the divider row present in the
/// CAFCI export.
// TODO: replace with divider detection once a second export layout is available to compare against.
const DIVIDER_ROW_OFFSET: usize = 9;

const NAN_TOKEN: &str = "nan";

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => {
                let s = s.trim();
                s.is_empty() || s == NAN_TOKEN
            }
            Cell::Number(n) => n.is_nan(),
        }
    }

    /// Text rendering used for the flat table. Integral numbers are written
    /// without a fractional part so codes like the liquidity term read `0`.
    pub fn to_text(&self) -> String {
        if self.is_blank() {
            return String::new();
        }
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Cell::Number(n) => n.to_string(),
        }
    }

    fn header_text(&self) -> Option<String> {
        if self.is_blank() {
            None
        } else {
            Some(self.to_text().trim().to_string())
        }
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Float(f) => Cell::Number(*f),
            Data::String(s) => Cell::Text(s.clone()),
            Data::Bool(b) => Cell::Text(b.to_string()),
            Data::DateTime(dt) => Cell::Number(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
            Data::Error(_) | Data::Empty => Cell::Empty,
        }
    }
}

/// Reads the first worksheet of an xls/xlsx workbook as a raw grid.
pub fn read_workbook<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<Cell>>> {
    let path = path.as_ref();
    let mut workbook =
        open_workbook_auto(path).map_err(|e| PipelineError::source_unavailable(path, e))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| PipelineError::source_unavailable(path, "workbook has no worksheets"))?
        .map_err(|e| PipelineError::source_unavailable(path, e))?;

    let grid: Vec<Vec<Cell>> = range
        .rows()
        .map(|row| row.iter().map(Cell::from).collect())
        .collect();
    debug!("Read {} raw rows from {}", grid.len(), path.display());
    Ok(grid)
}

/// Joins the two header levels of a column. Blank parts are dropped, so a
/// column labelled only on the second row keeps just that label. A column
/// blank on both rows is named [`NAN_TOKEN`].
fn combine_header(top: Option<&str>, bottom: Option<&str>) -> String {
    match (top, bottom) {
        (Some(t), Some(b)) => format!("{t}_{b}"),
        (Some(t), None) => t.to_string(),
        (None, Some(b)) => b.to_string(),
        (None, None) => NAN_TOKEN.to_string(),
    }
    .trim()
    .to_string()
}

/// Normalizes a raw grid into a flat table.
///
/// The header is the first row holding a cell equal to [`HEADER_TOKEN`] plus
/// the row below it. Blank cells of the second header row inherit the label
/// above them, which rebuilds the merged cells of the export. An already
/// normalized table carries `Fondo_Fondo` instead of a bare `Fondo`, so
/// normalizing it again fails with [`PipelineError::HeaderNotFound`].
pub fn normalize(grid: &[Vec<Cell>]) -> Result<FlatTable> {
    let header_idx = grid
        .iter()
        .position(|row| {
            row.iter()
                .any(|c| c.header_text().as_deref() == Some(HEADER_TOKEN))
        })
        .ok_or_else(|| PipelineError::HeaderNotFound(HEADER_TOKEN.to_string()))?;

    let top = &grid[header_idx];
    let bottom = grid
        .get(header_idx + 1)
        .ok_or_else(|| PipelineError::SchemaMismatch("second header row".to_string()))?;
    let width = grid.iter().map(Vec::len).max().unwrap_or(0);

    let headers: Vec<String> = (0..width)
        .map(|col| {
            let t = top.get(col).and_then(Cell::header_text);
            let b = bottom.get(col).and_then(Cell::header_text).or_else(|| t.clone());
            combine_header(t.as_deref(), b.as_deref())
        })
        .collect();

    let rows: Vec<Vec<String>> = grid[header_idx + 2..]
        .iter()
        .map(|row| {
            (0..width)
                .map(|col| row.get(col).map_or_else(String::new, Cell::to_text))
                .collect()
        })
        .collect();

    let mut table = FlatTable::new(headers, rows);

    if table.len() > DIVIDER_ROW_OFFSET {
        let dropped = table.rows.remove(DIVIDER_ROW_OFFSET);
        debug!("Dropped divider row: {:?}", dropped.first());
    }

    if let Some(col) = table.column_containing(COL_DAILY_VARIATION) {
        let before = table.len();
        table.rows.retain(|row| !row[col].trim().is_empty());
        debug!("Dropped {} rows without daily variation", before - table.len());
    }

    Ok(table)
}

/// Reads the workbook at `input`, normalizes it and persists it as TSV at `output`.
pub fn normalize_workbook<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
) -> Result<FlatTable> {
    let grid = read_workbook(&input)?;
    let table = normalize(&grid)?;
    table.write_tsv(&output)?;
    info!(
        "Normalized {} into {} ({} funds)",
        input.as_ref().display(),
        output.as_ref().display(),
        table.len()
    );
    Ok(table)
}
