//! Panel and table I/O for the faro CLI.

use std::fs::{self, File};
use std::path::Path;

use faro::{FaroError, Panel, Result};
use log::info;
use polars::prelude::*;
use serde::Serialize;

/// Fails with [`FaroError::MissingArtifact`] unless `path` exists.
pub(crate) fn require_file(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(FaroError::MissingArtifact(format!("input file {}", path.display())))
    }
}

/// Reads a long-format panel from a CSV file with a header row.
///
/// `date` may be a `YYYY-MM-DD` string; `ticker` must be a string column.
pub(crate) fn read_panel(path: &Path) -> Result<Panel> {
    require_file(path)?;

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(10_000))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    let panel = Panel::from_frame(&df)?;
    info!(
        "Loaded {} rows ({} tickers, {} columns) from {}",
        panel.len(),
        panel.n_tickers(),
        panel.column_names().len(),
        path.display()
    );
    Ok(panel)
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Writes a table as CSV, creating parent directories as needed.
pub(crate) fn write_csv(mut df: DataFrame, path: &Path) -> Result<()> {
    create_parent(path)?;
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(&mut df)?;
    info!("Wrote {} rows to {}", df.height(), path.display());
    Ok(())
}

/// Writes any serializable value as pretty-printed JSON.
pub(crate) fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    create_parent(path)?;
    serde_json::to_writer_pretty(File::create(path)?, value)?;
    info!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use faro::Date;

    fn scratch(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("faro-cli-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_missing_input_is_missing_artifact() {
        let result = read_panel(Path::new("/definitely/not/here/prices.csv"));
        assert!(matches!(result, Err(FaroError::MissingArtifact(_))));
    }

    #[test]
    fn test_panel_survives_csv() {
        let d1 = Date::from_ymd_opt(2024, 1, 2).unwrap();
        let d2 = Date::from_ymd_opt(2024, 1, 3).unwrap();
        let panel = Panel::new(vec![d1, d1, d2], vec!["AAA".into(), "BBB".into(), "AAA".into()])
            .unwrap()
            .with_column("close", vec![10.0, 20.0, f64::NAN])
            .unwrap();

        let path = scratch("panel.csv");
        write_csv(panel.to_frame().unwrap(), &path).unwrap();
        let back = read_panel(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(back.dates(), panel.dates());
        assert_eq!(back.tickers(), panel.tickers());
        let close = back.column("close").unwrap();
        assert_eq!(close[..2], [10.0, 20.0]);
        assert!(close[2].is_nan());
    }
}
