//! Input file classification and output path derivation.
//!
//! Every artefact produced by a run is named after the input's base name
//! (the path without its extension), with a trailing `[CHECKED]` marker
//! removed so that re-running on a checked CSV targets the same store and
//! export files as the original run.

use anyhow::{Result, bail};
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Marker appended to the base name of a sanitized CSV.
pub const CHECKED_MARKER: &str = "[CHECKED]";

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Csv,
    Xlsx,
    Xls,
    /// A store produced by a previous run; only the export step runs.
    Store,
}

impl InputKind {
    pub fn is_spreadsheet(self) -> bool {
        matches!(self, InputKind::Xlsx | InputKind::Xls)
    }

    pub fn extension(self) -> &'static str {
        match self {
            InputKind::Csv => "csv",
            InputKind::Xlsx => "xlsx",
            InputKind::Xls => "xls",
            InputKind::Store => "s3db",
        }
    }
}

impl FromStr for InputKind {
    type Err = anyhow::Error;

    fn from_str(ext: &str) -> Result<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Ok(InputKind::Csv),
            "xlsx" => Ok(InputKind::Xlsx),
            "xls" => Ok(InputKind::Xls),
            "s3db" => Ok(InputKind::Store),
            other => bail!("unsupported input extension '.{other}' (expected csv, xlsx, xls or s3db)"),
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A validated input path split into base name and kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    path: PathBuf,
    base: PathBuf,
    kind: InputKind,
}

impl InputFile {
    /// Classifies `path` by its extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the path has no extension or the extension is not
    /// one of the supported [`InputKind`]s.
    pub fn parse(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            bail!("input '{}' has no file extension", path.display());
        };
        let kind: InputKind = ext.parse()?;

        Ok(Self {
            path: path.to_path_buf(),
            base: path.with_extension(""),
            kind,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> InputKind {
        self.kind
    }

    /// The input path without its extension.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// True when the input is a CSV that already went through sanitization.
    pub fn is_checked(&self) -> bool {
        self.base_name().ends_with(CHECKED_MARKER)
    }

    /// Base name with any `[CHECKED]` marker removed; all outputs derive from it.
    pub fn output_base(&self) -> PathBuf {
        match self.base_name().strip_suffix(CHECKED_MARKER) {
            Some(stripped) => self.base.with_file_name(stripped),
            None => self.base.clone(),
        }
    }

    /// CSV written next to a spreadsheet input.
    pub fn intermediate_csv(&self) -> PathBuf {
        with_suffix(&self.base, ".csv")
    }

    pub fn checked_csv(&self) -> PathBuf {
        with_suffix(&self.base, &format!("{CHECKED_MARKER}.csv"))
    }

    pub fn store_path(&self) -> PathBuf {
        with_suffix(&self.output_base(), ".s3db")
    }

    pub fn json_path(&self) -> PathBuf {
        with_suffix(&self.output_base(), ".json")
    }

    pub fn xml_path(&self) -> PathBuf {
        with_suffix(&self.output_base(), ".xml")
    }

    fn base_name(&self) -> &str {
        self.base
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }
}

fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_extension() {
        assert_eq!("csv".parse::<InputKind>().unwrap(), InputKind::Csv);
        assert_eq!("XLSX".parse::<InputKind>().unwrap(), InputKind::Xlsx);
        assert_eq!("xls".parse::<InputKind>().unwrap(), InputKind::Xls);
        assert_eq!("s3db".parse::<InputKind>().unwrap(), InputKind::Store);
        assert!("txt".parse::<InputKind>().is_err());
    }

    #[test]
    fn test_parse_spreadsheet_paths() {
        let input = InputFile::parse("data/convoy.xlsx").unwrap();

        assert_eq!(input.kind(), InputKind::Xlsx);
        assert!(input.kind().is_spreadsheet());
        assert!(!input.is_checked());
        assert_eq!(input.intermediate_csv(), PathBuf::from("data/convoy.csv"));
        assert_eq!(input.checked_csv(), PathBuf::from("data/convoy[CHECKED].csv"));
        assert_eq!(input.store_path(), PathBuf::from("data/convoy.s3db"));
        assert_eq!(input.json_path(), PathBuf::from("data/convoy.json"));
        assert_eq!(input.xml_path(), PathBuf::from("data/convoy.xml"));
    }

    #[test]
    fn test_checked_input_strips_marker_for_outputs() {
        let input = InputFile::parse("convoy[CHECKED].csv").unwrap();

        assert!(input.is_checked());
        assert_eq!(input.output_base(), PathBuf::from("convoy"));
        assert_eq!(input.store_path(), PathBuf::from("convoy.s3db"));
        assert_eq!(input.json_path(), PathBuf::from("convoy.json"));
    }

    #[test]
    fn test_marker_strip_keeps_trailing_letters() {
        // A plain character-set strip would also eat the trailing "D" and "C".
        let input = InputFile::parse("convoy_CD[CHECKED].csv").unwrap();
        assert_eq!(input.output_base(), PathBuf::from("convoy_CD"));
    }

    #[test]
    fn test_parse_rejects_missing_or_unknown_extension() {
        assert!(InputFile::parse("convoy").is_err());
        assert!(InputFile::parse("convoy.txt").is_err());
    }

    #[test]
    fn test_dotted_directory_is_not_an_extension() {
        let input = InputFile::parse("runs.2024/convoy.csv").unwrap();
        assert_eq!(input.base(), Path::new("runs.2024/convoy"));
    }
}
