//! CSV ingestion and persistence.

use crate::error::{Result, ResultExt};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::fs::{self, File};
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info};

/// Rows used for schema inference.
const INFER_SCHEMA_ROWS: usize = 100;

/// Load a CSV file with multiple fallback strategies.
///
/// Tries a standard read first, then a read without quote handling, then a
/// read of the content with doubled quotes collapsed and blank lines removed.
/// A missing file fails immediately.
pub fn load_csv(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Input file not found: {}", path.display()),
        )
        .into());
    }

    // Strategy 1: Standard loading with quote handling
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => debug!("Standard loading failed: {}", e),
    }

    // Strategy 2: Without quote handling
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(None))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => debug!("Loading without quotes failed: {}", e),
    }

    // Strategy 3: Pre-clean content
    let content = fs::read_to_string(path).context(format!("Reading {}", path.display()))?;
    let cleaned = clean_csv_content(&content);
    info!("Retrying {} after normalizing quotes", path.display());

    CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .into_reader_with_file_handle(Cursor::new(cleaned.into_bytes()))
        .finish()
        .context(format!("Parsing {}", path.display()))
}

/// Collapse doubled quotes and drop blank lines.
fn clean_csv_content(content: &str) -> String {
    content
        .replace("\"\"\"", "\"")
        .replace("\"\"", "\"")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write a DataFrame as CSV with a header row and no index column.
///
/// Missing parent directories are created.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).context(format!("Creating {}", parent.display()))?;
    }

    let mut file = File::create(path).context(format!("Creating {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .context(format!("Writing {}", path.display()))?;

    info!(
        "Wrote {} rows x {} columns to {}",
        df.height(),
        df.width(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_csv_content() {
        let raw = "a,b\n\n\"\"x\"\",1\n   \n";
        assert_eq!(clean_csv_content(raw), "a,b\n\"x\",1");
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_csv(Path::new("definitely/not/here.csv")).unwrap_err();
        assert_eq!(err.error_code(), "IO_ERROR");
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.csv");

        let mut df = df![
            "Name" => ["Ann", "Bob"],
            "Age" => [30i64, 71],
        ]
        .unwrap();
        write_csv(&mut df, &path).unwrap();

        let loaded = load_csv(&path).unwrap();
        assert_eq!(loaded.shape(), (2, 2));
        assert_eq!(loaded.get_column_names(), df.get_column_names());
    }
}
