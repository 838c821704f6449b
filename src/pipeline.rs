//! End-to-end run: load, sanitize, score, store, export.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::input::{InputFile, InputKind};
use crate::loader::{Loaded, load_table};
use crate::output::{ExportBucket, status_line, write_json, write_xml};
use crate::sanitizer::sanitize;
use crate::scoring::{ScoreThresholds, ScoredConvoy, score_table};
use crate::store::ConvoyStore;

/// A file written by the run and how many items went into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub count: usize,
}

impl FileReport {
    fn new(path: impl Into<PathBuf>, count: usize) -> Self {
        Self {
            path: path.into(),
            count,
        }
    }
}

/// What a run produced. Steps skipped for the input kind are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// CSV converted from spreadsheet input; count is data lines.
    pub intermediate_csv: Option<FileReport>,
    /// Sanitized CSV; count is corrected cells.
    pub checked_csv: Option<FileReport>,
    /// Cells that held no digits at all and were emptied.
    pub emptied_cells: usize,
    /// Store file; count is inserted records.
    pub store: Option<FileReport>,
    pub json: FileReport,
    pub xml: FileReport,
}

impl RunSummary {
    /// Progress lines in the order the steps ran.
    pub fn status_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(r) = &self.intermediate_csv {
            lines.push(status_line(r.count, "line", "added to", &r.path));
        }
        if let Some(r) = &self.checked_csv {
            lines.push(status_line(r.count, "cell", "corrected in", &r.path));
        }
        if let Some(r) = &self.store {
            lines.push(status_line(r.count, "record", "inserted into", &r.path));
        }
        lines.push(status_line(self.json.count, "vehicle", "saved into", &self.json.path));
        lines.push(status_line(self.xml.count, "vehicle", "saved into", &self.xml.path));
        lines
    }
}

/// Runs every step the input kind calls for.
///
/// Table input is loaded, sanitized unless already `[CHECKED]`, scored and
/// written to `<base>.s3db`. Store input skips straight to export. Both
/// exports are always written, even when a bucket is empty.
#[tracing::instrument(skip_all, fields(input = %input.path().display()))]
pub fn run(input: &InputFile, thresholds: &ScoreThresholds) -> Result<RunSummary> {
    let mut intermediate_csv = None;
    let mut checked_csv = None;
    let mut emptied_cells = 0;
    let mut store_report = None;

    let store_path = match input.kind() {
        InputKind::Store => input.path().to_path_buf(),
        InputKind::Csv | InputKind::Xlsx | InputKind::Xls => {
            let Loaded {
                mut table,
                intermediate_csv: converted,
            } = load_table(input)?;
            intermediate_csv = converted.map(|path| FileReport::new(path, table.len()));

            if input.is_checked() {
                info!("Input already checked, skipping sanitization");
            } else {
                let report = sanitize(&mut table);
                if !report.emptied.is_empty() {
                    warn!(
                        emptied = report.emptied.len(),
                        "Some cells held no digits and were emptied"
                    );
                }
                emptied_cells = report.emptied.len();

                let path = input.checked_csv();
                table.write_csv(&path)?;
                checked_csv = Some(FileReport::new(path, report.corrected));
            }

            let convoy = score_table(&table, thresholds)?;

            let path = input.store_path();
            let inserted = store_convoy(&path, &convoy)?;
            store_report = Some(FileReport::new(&path, inserted));
            path
        }
    };

    let (json, xml) = export(&store_path, input)?;

    Ok(RunSummary {
        intermediate_csv,
        checked_csv,
        emptied_cells,
        store: store_report,
        json,
        xml,
    })
}

fn store_convoy(path: &Path, convoy: &ScoredConvoy) -> Result<usize> {
    let mut store = ConvoyStore::open(path)?;
    store.reset()?;
    let inserted = store.insert_all(convoy)?;
    store.close()?;
    Ok(inserted)
}

/// Queries both buckets and writes `<base>.json` and `<base>.xml`.
fn export(store_path: &Path, input: &InputFile) -> Result<(FileReport, FileReport)> {
    let store = ConvoyStore::open_existing(store_path)?;
    let high = store.vehicles(ExportBucket::Json)?;
    let low = store.vehicles(ExportBucket::Xml)?;
    store.close()?;

    let json_path = input.json_path();
    let xml_path = input.xml_path();
    let json = FileReport::new(&json_path, write_json(&json_path, &high)?);
    let xml = FileReport::new(&xml_path, write_xml(&xml_path, &low)?);

    info!(json = json.count, xml = xml.count, "Convoy exported");
    Ok((json, xml))
}
