//! Header-row column resolution.

use serde::Serialize;

use crate::normalize::{normalize_header, normalize_header_str};
use crate::types::Cell;

/// A header cell matched to a semantic field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMatch {
    /// 0-based column index in the header row.
    pub index: usize,
    /// Header text as written in the file.
    pub header: String,
    /// Normalized header that matched a candidate.
    pub normalized: String,
}

/// Find the first header (scanning left to right) whose normalized form equals any candidate.
///
/// Candidate order only decides which spellings are acceptable; when several columns match,
/// the leftmost one wins regardless of which candidate it matched.
pub fn find_column_by_names<S: AsRef<str>>(headers: &[Cell], candidates: &[S]) -> Option<ColumnMatch> {
    let wanted: Vec<String> = candidates
        .iter()
        .map(|c| normalize_header_str(c.as_ref()))
        .filter(|c| !c.is_empty())
        .collect();

    headers.iter().enumerate().find_map(|(index, cell)| {
        let normalized = normalize_header(cell);
        wanted.contains(&normalized).then(|| ColumnMatch {
            index,
            header: cell.to_text(),
            normalized,
        })
    })
}
