//! Reads vehicle tables from CSV or spreadsheet input.

use anyhow::{Context, Result, bail};
use calamine::{Data, Reader, open_workbook_auto};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::input::{InputFile, InputKind};
use crate::table::Table;

/// Worksheet that holds the vehicle records in spreadsheet input.
pub const VEHICLES_SHEET: &str = "Vehicles";

/// A loaded table plus the CSV written for spreadsheet input.
#[derive(Debug)]
pub struct Loaded {
    pub table: Table,
    pub intermediate_csv: Option<PathBuf>,
}

/// Loads the vehicle table from `input`.
///
/// Spreadsheets are converted to `<base>.csv` (overwriting) before returning.
///
/// # Errors
///
/// Fails if the file cannot be opened, the `Vehicles` sheet is missing, or
/// the input is a store file.
#[tracing::instrument(skip_all, fields(path = %input.path().display(), kind = %input.kind()))]
pub fn load_table(input: &InputFile) -> Result<Loaded> {
    match input.kind() {
        InputKind::Csv => {
            let table = Table::from_csv_path(input.path())?;
            info!(rows = table.len(), "CSV loaded");
            Ok(Loaded {
                table,
                intermediate_csv: None,
            })
        }
        InputKind::Xlsx | InputKind::Xls => {
            let table = read_vehicles_sheet(input.path())?;
            let csv_path = input.intermediate_csv();
            table.write_csv(&csv_path)?;
            info!(rows = table.len(), csv = %csv_path.display(), "Spreadsheet converted to CSV");
            Ok(Loaded {
                table,
                intermediate_csv: Some(csv_path),
            })
        }
        InputKind::Store => bail!(
            "{} is a store file and has no table to load",
            input.path().display()
        ),
    }
}

/// Reads the `Vehicles` worksheet with every cell rendered as text.
pub fn read_vehicles_sheet(path: &Path) -> Result<Table> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("failed to open spreadsheet {}", path.display()))?;

    let range = workbook
        .worksheet_range(VEHICLES_SHEET)
        .with_context(|| format!("sheet '{VEHICLES_SHEET}' not found in {}", path.display()))?;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header) => header.iter().map(cell_text).collect(),
        None => Vec::new(),
    };
    let rows = rows.map(|row| row.iter().map(cell_text).collect()).collect();

    Ok(Table::new(headers, rows))
}

/// Renders a cell the way it reads in the sheet: whole floats lose their
/// trailing `.0`, empty cells become empty strings.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            (*f as i64).to_string()
        }
        other => other.to_string(),
    }
}
