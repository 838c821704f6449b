//! Cell cleaning: reduces every non-numeric cell to its digits.

use tracing::{debug, warn};

use crate::table::Table;

/// A cell the sanitizer emptied because it held no digits at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptiedCell {
    pub row: usize,
    pub column: String,
    pub original: String,
}

/// Outcome of [`sanitize`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SanitizeReport {
    /// Number of cells rewritten.
    pub corrected: usize,
    /// Subset of the corrected cells that ended up empty.
    pub emptied: Vec<EmptiedCell>,
}

/// True when `cell` is one or more ASCII digits and nothing else.
pub fn is_all_digits(cell: &str) -> bool {
    !cell.is_empty() && cell.bytes().all(|b| b.is_ascii_digit())
}

/// Keeps only the ASCII digits of `cell`, in order.
pub fn digits_only(cell: &str) -> String {
    cell.chars().filter(char::is_ascii_digit).collect()
}

/// Rewrites every cell that is not purely numeric, column by column.
///
/// Cells with no digits become empty strings and are still counted as
/// corrected; they are listed in [`SanitizeReport::emptied`] so the caller
/// can decide what to do with them.
#[tracing::instrument(skip_all, fields(rows = table.len()))]
pub fn sanitize(table: &mut Table) -> SanitizeReport {
    let mut report = SanitizeReport::default();
    let headers = table.headers().to_vec();

    for (col, column) in headers.iter().enumerate() {
        for (row, cells) in table.rows_mut().iter_mut().enumerate() {
            let Some(cell) = cells.get_mut(col) else {
                continue;
            };
            if is_all_digits(cell) {
                continue;
            }

            let cleaned = digits_only(cell);
            debug!(row, column = %column, from = %cell, to = %cleaned, "Cell corrected");
            if cleaned.is_empty() {
                warn!(row, column = %column, original = %cell, "Cell has no digits left");
                report.emptied.push(EmptiedCell {
                    row,
                    column: column.clone(),
                    original: cell.clone(),
                });
            }
            *cell = cleaned;
            report.corrected += 1;
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[&[&str]]) -> Table {
        Table::new(
            vec!["vehicle_id".into(), "engine_capacity".into()],
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_is_all_digits() {
        assert!(is_all_digits("0"));
        assert!(is_all_digits("450"));
        assert!(!is_all_digits(""));
        assert!(!is_all_digits("45 0"));
        assert!(!is_all_digits("-4"));
    }

    #[test]
    fn test_clean_table_is_untouched() {
        let mut t = table(&[&["1", "200"], &["2", "40"]]);
        let before = t.clone();

        let report = sanitize(&mut t);

        assert_eq!(report.corrected, 0);
        assert!(report.emptied.is_empty());
        assert_eq!(t, before);
    }

    #[test]
    fn test_mixed_cell_keeps_digits_in_order() {
        let mut t = table(&[&["1", "12a-b3"]]);

        let report = sanitize(&mut t);

        assert_eq!(t.rows()[0][1], "123");
        assert_eq!(report.corrected, 1);
        assert!(report.emptied.is_empty());
    }

    #[test]
    fn test_cell_without_digits_becomes_empty_and_counts() {
        let mut t = table(&[&["abc", "200 l"]]);

        let report = sanitize(&mut t);

        assert_eq!(t.rows()[0], vec!["", "200"]);
        assert_eq!(report.corrected, 2);
        assert_eq!(
            report.emptied,
            vec![EmptiedCell {
                row: 0,
                column: "vehicle_id".into(),
                original: "abc".into(),
            }]
        );
    }

    #[test]
    fn test_empty_cell_is_counted() {
        let mut t = table(&[&["1", ""]]);
        let report = sanitize(&mut t);
        assert_eq!(report.corrected, 1);
        assert_eq!(report.emptied.len(), 1);
    }

    #[test]
    fn test_non_ascii_digits_are_dropped() {
        assert_eq!(digits_only("١٢3 km"), "3");
    }
}
