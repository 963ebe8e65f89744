//! Tabular export of the enriched score table
//!
//! Both formats carry an unnamed leading row-index column followed by
//! `Country`, `Pandemic-ready score` and `iso_alpha`.

use crate::geocode::{EnrichedRow, EnrichedScoreTable};
use crate::{ProfilingError, Result, COUNTRY_COLUMN, ISO_COLUMN, SCORE_COLUMN};
use csv::{ReaderBuilder, WriterBuilder};
use rust_xlsxwriter::{Format, Workbook};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

/// Field delimiter of the CSV export
pub const CSV_DELIMITER: u8 = b';';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Csv,
    Excel,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "xlsx",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Csv => f.write_str("csv"),
            ExportFormat::Excel => f.write_str("excel"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            other => Err(format!("unknown export format: {other}")),
        }
    }
}

/// `<base>.<ext>`, keeping any dots already in the base path
pub fn output_path(base: &Path, format: ExportFormat) -> PathBuf {
    let mut path = base.as_os_str().to_owned();
    path.push(".");
    path.push(format.extension());
    PathBuf::from(path)
}

/// Export the table next to `base` in the given format, returning the file path
pub fn export(table: &EnrichedScoreTable, base: &Path, format: ExportFormat) -> Result<PathBuf> {
    let path = output_path(base, format);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    match format {
        ExportFormat::Csv => write_csv(table, &path)?,
        ExportFormat::Excel => write_xlsx(table, &path)?,
    }

    info!("Exported {} rows as {} to {:?}", table.len(), format, path);
    Ok(path)
}

/// Write the table as `;`-separated text
pub fn write_csv(table: &EnrichedScoreTable, path: &Path) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .delimiter(CSV_DELIMITER)
        .from_path(path)?;

    writer.write_record(["", COUNTRY_COLUMN, SCORE_COLUMN, ISO_COLUMN])?;
    for (i, row) in table.rows.iter().enumerate() {
        writer.write_record([
            i.to_string(),
            row.country.clone(),
            row.score.to_string(),
            row.iso_alpha.clone(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the table as an XLSX workbook with a single sheet
pub fn write_xlsx(table: &EnrichedScoreTable, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();

    for (col, title) in [COUNTRY_COLUMN, SCORE_COLUMN, ISO_COLUMN].iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16 + 1, *title, &header)?;
    }

    for (i, row) in table.rows.iter().enumerate() {
        let r = i as u32 + 1;
        worksheet.write_number_with_format(r, 0, i as f64, &header)?;
        worksheet.write_string(r, 1, &row.country)?;
        worksheet.write_number(r, 2, row.score as f64)?;
        worksheet.write_string(r, 3, &row.iso_alpha)?;
    }

    workbook.save(path)?;
    Ok(())
}

/// Read a file written by [`write_csv`] back into a table
pub fn read_csv(path: impl AsRef<Path>) -> Result<EnrichedScoreTable> {
    let mut reader = ReaderBuilder::new()
        .delimiter(CSV_DELIMITER)
        .has_headers(true)
        .from_path(path.as_ref())?;

    let headers = reader.headers()?.clone();
    let expected = ["", COUNTRY_COLUMN, SCORE_COLUMN, ISO_COLUMN];
    if headers.iter().ne(expected.iter().copied()) {
        return Err(ProfilingError::MalformedTable(format!(
            "unexpected header {:?}",
            headers
        )));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let score = record[2].parse::<i64>().map_err(|e| {
            ProfilingError::MalformedTable(format!("bad score {:?}: {}", &record[2], e))
        })?;
        rows.push(EnrichedRow {
            country: record[1].to_string(),
            score,
            iso_alpha: record[3].to_string(),
        });
    }

    Ok(EnrichedScoreTable { rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::UNRESOLVED_ISO;
    use tempfile::tempdir;

    fn table() -> EnrichedScoreTable {
        let rows = [("Chad", -3, "TCD"), ("Atlantis", 4, UNRESOLVED_ISO), ("Costa Rica", 4, "CRI")];
        EnrichedScoreTable {
            rows: rows
                .iter()
                .map(|(c, s, iso)| EnrichedRow {
                    country: c.to_string(),
                    score: *s,
                    iso_alpha: iso.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_output_path_appends_extension() {
        let base = Path::new("Results/country_pandemic_risk 2020-05-10 14:30");
        assert_eq!(
            output_path(base, ExportFormat::Csv),
            PathBuf::from("Results/country_pandemic_risk 2020-05-10 14:30.csv")
        );
        assert_eq!(
            output_path(Path::new("out/v1.2"), ExportFormat::Excel),
            PathBuf::from("out/v1.2.xlsx")
        );
    }

    #[test]
    fn test_csv_layout() {
        let dir = tempdir().unwrap();
        let path = export(&table(), &dir.path().join("scores"), ExportFormat::Csv).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], ";Country;Pandemic-ready score;iso_alpha");
        assert_eq!(lines[1], "0;Chad;-3;TCD");
        assert_eq!(lines[2], "1;Atlantis;4; ");
    }

    #[test]
    fn test_csv_round_trip() {
        let dir = tempdir().unwrap();
        let path = export(&table(), &dir.path().join("scores"), ExportFormat::Csv).unwrap();

        assert_eq!(read_csv(&path).unwrap(), table());
    }

    #[test]
    fn test_export_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("Results/countryProfiling/risk");
        let path = export(&table(), &base, ExportFormat::Csv).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_xlsx_export_is_independent_of_csv() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("scores");

        let xlsx = export(&table(), &base, ExportFormat::Excel).unwrap();
        assert_eq!(xlsx.extension().unwrap(), "xlsx");
        assert!(fs::metadata(&xlsx).unwrap().len() > 0);
        assert!(!output_path(&base, ExportFormat::Csv).exists());

        // Re-running overwrites in place
        export(&table(), &base, ExportFormat::Excel).unwrap();
        assert!(xlsx.exists());
    }

    #[test]
    fn test_read_csv_rejects_foreign_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("other.csv");
        fs::write(&path, "a;b;c;d\n0;x;1;y\n").unwrap();

        assert!(matches!(read_csv(&path), Err(ProfilingError::MalformedTable(_))));
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("csv".parse(), Ok(ExportFormat::Csv));
        assert_eq!("Excel".parse(), Ok(ExportFormat::Excel));
        assert_eq!("xlsx".parse(), Ok(ExportFormat::Excel));
        assert!("pdf".parse::<ExportFormat>().is_err());
    }
}
