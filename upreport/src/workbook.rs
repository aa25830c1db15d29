use crate::error::ReportError;
use crate::source::{TableReader, TableRow};
use crate::ReportResult;
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

/// Reads `.xls`/`.xlsx` sheets; the first row supplies the column names.
#[derive(Debug, Default, Clone, Copy)]
pub struct WorkbookReader;

impl TableReader for WorkbookReader {
    fn read_table(&self, path: &Path, sheet: &str) -> ReportResult<Vec<TableRow>> {
        if !path.is_file() {
            return Err(ReportError::not_found(format!(
                "workbook {}",
                path.display()
            )));
        }

        let mut workbook = open_workbook_auto(path)
            .map_err(|e| ReportError::Workbook(format!("{}: {}", path.display(), e)))?;
        let range = workbook
            .worksheet_range(sheet)
            .map_err(|e| ReportError::Workbook(format!("sheet '{}': {}", sheet, e)))?;

        let mut rows = range.rows();
        let header: Vec<String> = match rows.next() {
            Some(row) => row.iter().map(|cell| cell.to_string().trim().to_string()).collect(),
            None => return Ok(Vec::new()),
        };

        let table = rows
            .map(|row| {
                header
                    .iter()
                    .zip(row)
                    .filter(|(name, cell)| !name.is_empty() && !matches!(cell, Data::Empty))
                    .map(|(name, cell)| (name.clone(), cell.to_string()))
                    .collect::<TableRow>()
            })
            .filter(|row| !row.is_empty())
            .collect();

        Ok(table)
    }
}
