// src/data_input/trial_parser.rs

use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use crate::constants::TRIAL_ROW_WIDTH;
use crate::data_input::trial_data::{TimestepSample, TrialLog};
use crate::error::{AnalysisError, Result};

/// Parses a headerless trial CSV into fixed-width tables.
///
/// The file is read twice: once to count rows so the tables can be allocated
/// at their final size, then again to fill them. Every line is a row and must
/// have exactly [`TRIAL_ROW_WIDTH`] numeric fields, so a blank line is
/// rejected like any short row; the first bad row aborts the parse.
pub fn parse_trial_log(path: &Path) -> Result<TrialLog> {
    let file = File::open(path).map_err(|e| AnalysisError::io(path, e))?;
    let log = read_trial_log(BufReader::new(file), path)?;
    tracing::info!(
        "Finished reading {} data rows from '{}'.",
        log.len(),
        path.display()
    );
    Ok(log)
}

/// Same as [`parse_trial_log`] over any seekable reader. `path` is only used
/// in error messages.
pub fn read_trial_log<R: Read + Seek>(mut reader: R, path: &Path) -> Result<TrialLog> {
    // First pass: count rows without converting them. Every line is a row, so
    // a blank line is a row with no fields.
    let rows_nb = {
        let mut count = 0;
        for line in BufReader::new(&mut reader).split(b'\n') {
            let line = line.map_err(|e| AnalysisError::io(path, e))?;
            count += 1;
            if line.iter().all(u8::is_ascii_whitespace) {
                return Err(AnalysisError::RowWidth {
                    path: path.to_path_buf(),
                    row: count,
                    expected: TRIAL_ROW_WIDTH,
                    actual: 0,
                    raw: String::new(),
                });
            }
        }
        count
    };
    tracing::debug!("Counted {rows_nb} rows in '{}'", path.display());

    reader
        .seek(SeekFrom::Start(0))
        .map_err(|e| AnalysisError::io(path, e))?;

    // Second pass: convert and store.
    let mut log = TrialLog::with_rows(rows_nb);
    let mut csv_reader = trial_csv_reader(&mut reader);
    let mut rows_read = 0;
    for (row_index, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| AnalysisError::csv(path, e))?;
        if row_index >= rows_nb {
            return Err(AnalysisError::RowCountChanged {
                path: path.to_path_buf(),
                counted: rows_nb,
                read: row_index + 1,
            });
        }
        let sample = parse_row(&record, row_index + 1, path)?;
        log.set_row(row_index, &sample);
        rows_read += 1;
    }

    if rows_read != rows_nb {
        return Err(AnalysisError::RowCountChanged {
            path: path.to_path_buf(),
            counted: rows_nb,
            read: rows_read,
        });
    }

    Ok(log)
}

fn trial_csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    // flexible: width is checked per row so the error can name the row.
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// Converts one record into a sample. `row` is 1-based.
pub fn parse_row(record: &StringRecord, row: usize, path: &Path) -> Result<TimestepSample> {
    let raw = || record.iter().collect::<Vec<_>>().join(",");

    if record.len() != TRIAL_ROW_WIDTH {
        return Err(AnalysisError::RowWidth {
            path: path.to_path_buf(),
            row,
            expected: TRIAL_ROW_WIDTH,
            actual: record.len(),
            raw: raw(),
        });
    }

    let mut values = Vec::with_capacity(TRIAL_ROW_WIDTH);
    for (column, field) in record.iter().enumerate() {
        let value = field
            .parse::<f64>()
            .map_err(|_| AnalysisError::InvalidField {
                path: path.to_path_buf(),
                row,
                column,
                value: field.to_string(),
                raw: raw(),
            })?;
        values.push(value);
    }

    TimestepSample::from_values(&values).ok_or_else(|| AnalysisError::RowWidth {
        path: path.to_path_buf(),
        row,
        expected: TRIAL_ROW_WIDTH,
        actual: values.len(),
        raw: raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn csv_row(time: f64, ddq: f64, width: usize) -> String {
        let mut fields = vec![time.to_string()];
        for col in 1..width {
            let value = if col >= 22 { ddq } else { col as f64 };
            fields.push(value.to_string());
        }
        fields.join(",")
    }

    #[test]
    fn test_row_count_matches_table_heights() {
        let input = [0.0, 0.1, 0.2, 0.3]
            .iter()
            .enumerate()
            .map(|(i, &t)| csv_row(t, i as f64, 27))
            .collect::<Vec<_>>()
            .join("\n");
        let log = read_trial_log(Cursor::new(input), Path::new("t.csv")).unwrap();
        assert_eq!(log.times.len(), 4);
        for table in [
            &log.torque_crocoddyl,
            &log.torque_riccati,
            &log.torque_measured,
            &log.ddq,
        ] {
            assert_eq!(table.dim(), (4, 5));
        }
        assert_eq!(log.targets.dim(), (4, 3));
        assert_eq!(log.errors.dim(), (4, 3));
        assert_eq!(log.ddq[[3, 4]], 3.0);
        assert_eq!(log.torque_measured[[0, 0]], 17.0);
    }

    #[test]
    fn test_short_row_is_rejected() {
        let input = format!("{}\n{}\n", csv_row(0.0, 0.0, 27), csv_row(0.1, 0.0, 26));
        let err = read_trial_log(Cursor::new(input), Path::new("t.csv")).unwrap_err();
        match err {
            AnalysisError::RowWidth {
                row,
                expected,
                actual,
                ..
            } => {
                assert_eq!(row, 2);
                assert_eq!(expected, 27);
                assert_eq!(actual, 26);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_long_row_is_rejected() {
        let input = csv_row(0.0, 0.0, 28);
        let err = read_trial_log(Cursor::new(input), Path::new("t.csv")).unwrap_err();
        assert!(matches!(err, AnalysisError::RowWidth { actual: 28, .. }));
    }

    #[test]
    fn test_invalid_field_names_row_and_column() {
        let mut fields: Vec<String> = (0..27).map(|i| i.to_string()).collect();
        fields[9] = "abc".to_string();
        let input = fields.join(",");
        let err = read_trial_log(Cursor::new(input), Path::new("t.csv")).unwrap_err();
        match err {
            AnalysisError::InvalidField {
                row, column, value, ..
            } => {
                assert_eq!(row, 1);
                assert_eq!(column, 9);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_blank_line_is_rejected() {
        let input = format!(
            "{}\n\n{}\n{}\n",
            csv_row(0.0, 0.0, 27),
            csv_row(0.1, 0.0, 27),
            csv_row(0.2, 0.0, 27)
        );
        let err = read_trial_log(Cursor::new(input), Path::new("t.csv")).unwrap_err();
        match err {
            AnalysisError::RowWidth { row, actual, .. } => {
                assert_eq!(row, 2);
                assert_eq!(actual, 0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_trailing_blank_line_is_rejected() {
        let input = format!("{}\n{}\n\n", csv_row(0.0, 0.0, 27), csv_row(0.1, 0.0, 27));
        let err = read_trial_log(Cursor::new(input), Path::new("t.csv")).unwrap_err();
        assert!(matches!(err, AnalysisError::RowWidth { row: 3, actual: 0, .. }));
    }

    #[test]
    fn test_single_final_newline_is_accepted() {
        let input = format!("{}\n{}\n", csv_row(0.0, 0.0, 27), csv_row(0.1, 0.0, 27));
        let log = read_trial_log(Cursor::new(input), Path::new("t.csv")).unwrap();
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_empty_input_yields_empty_tables() {
        let log = read_trial_log(Cursor::new(String::new()), Path::new("t.csv")).unwrap();
        assert!(log.is_empty());
        assert_eq!(log.ddq.dim(), (0, 5));
    }

    #[test]
    fn test_fields_with_spaces_are_accepted() {
        let input = csv_row(0.5, 1.0, 27).replace(',', ", ");
        let log = read_trial_log(Cursor::new(input), Path::new("t.csv")).unwrap();
        assert_eq!(log.times[0], 0.5);
        assert_eq!(log.ddq[[0, 0]], 1.0);
    }
}
