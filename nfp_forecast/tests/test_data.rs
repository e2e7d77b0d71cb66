use chrono::NaiveDate;
use nfp_forecast::data::{LoadOptions, RawSeries, SeriesLoader};
use nfp_forecast::ForecastError;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::io::Write;
use tempfile::NamedTempFile;

fn csv_file(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file
}

#[test]
fn test_loader_from_csv() {
    let file = csv_file(&[
        "date,payems",
        "2023-01-01,155000",
        "2023-02-01,155300",
        "2023-03-01,155450",
        "2023-04-01,155700",
    ]);

    let raw = SeriesLoader::from_csv(file.path(), &LoadOptions::default()).unwrap();

    assert_eq!(raw.len(), 4);
    assert_eq!(raw.column(), "payems");
    assert_eq!(raw.values(), &[155000.0, 155300.0, 155450.0, 155700.0]);
    assert_eq!(
        raw.last_month(),
        Some(NaiveDate::from_ymd_opt(2023, 4, 1).unwrap())
    );
}

#[test]
fn test_loader_single_column() {
    let file = csv_file(&["level", "100", "102", "101", "105"]);

    let raw = SeriesLoader::from_csv(file.path(), &LoadOptions::default()).unwrap();
    assert_eq!(raw.values(), &[100.0, 102.0, 101.0, 105.0]);
    assert!(raw.months().is_none());
}

#[rstest]
#[case("monthly_payrolls")]
#[case("payroll_time")]
#[case("date_adjusted_level")]
fn test_loader_numeric_column_with_date_like_name(#[case] header: &str) {
    let file = csv_file(&[header, "100", "102", "101", "105", "108", "107"]);

    let raw = SeriesLoader::from_csv(file.path(), &LoadOptions::default()).unwrap();
    assert_eq!(raw.column(), header);
    assert_eq!(raw.values(), &[100.0, 102.0, 101.0, 105.0, 108.0, 107.0]);
    assert!(raw.months().is_none());
}

#[test]
fn test_loader_numeric_level_next_to_date_like_numeric_column() {
    let file = csv_file(&["date,payroll_time", "2023-01-01,100", "2023-02-01,102"]);

    let raw = SeriesLoader::from_csv(file.path(), &LoadOptions::default()).unwrap();
    assert_eq!(raw.column(), "payroll_time");
    assert!(raw.months().is_some());
}

#[test]
fn test_loader_does_not_skip_broken_level_column() {
    let file = csv_file(&[
        "date,payems,id",
        "2023-01-01,155000,1",
        "2023-02-01,n/a,2",
        "2023-03-01,155450,3",
    ]);

    let err = SeriesLoader::from_csv(file.path(), &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, ForecastError::Load(_)));
    assert!(err.to_string().contains("payems"));
}

#[test]
fn test_loader_named_value_column() {
    let file = csv_file(&[
        "month,manufacturing,total",
        "2023-01,12900,155000",
        "2023-02,12910,155300",
        "2023-03,12905,155450",
    ]);

    let options = LoadOptions {
        value_column: Some("total".to_string()),
        date_column: None,
    };
    let raw = SeriesLoader::from_csv(file.path(), &options).unwrap();
    assert_eq!(raw.column(), "total");
    assert_eq!(raw.values(), &[155000.0, 155300.0, 155450.0]);
    assert_eq!(
        raw.months().unwrap()[0],
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
    );
}

#[test]
fn test_loader_missing_file() {
    let result = SeriesLoader::from_csv("nonexistent_file.csv", &LoadOptions::default());
    assert!(matches!(result, Err(ForecastError::Load(_))));
}

#[test]
fn test_loader_non_numeric_cells() {
    let file = csv_file(&["date,payems", "2023-01-01,155000", "2023-02-01,n/a", "2023-03-01,155450"]);

    let result = SeriesLoader::from_csv(file.path(), &LoadOptions::default());
    assert!(matches!(result, Err(ForecastError::Load(_))));
}

#[test]
fn test_loader_empty_cells() {
    let file = csv_file(&["date,payems", "2023-01-01,155000", "2023-02-01,", "2023-03-01,155450"]);

    let result = SeriesLoader::from_csv(file.path(), &LoadOptions::default());
    assert!(matches!(result, Err(ForecastError::Load(_))));
}

#[test]
fn test_loader_unknown_column() {
    let file = csv_file(&["level", "100", "102"]);
    let options = LoadOptions {
        value_column: Some("payems".to_string()),
        date_column: None,
    };

    let result = SeriesLoader::from_csv(file.path(), &options);
    assert!(matches!(result, Err(ForecastError::Load(_))));
}

#[test]
fn test_loader_rejects_unordered_months() {
    let file = csv_file(&["date,payems", "2023-02-01,155000", "2023-01-01,155300"]);

    let result = SeriesLoader::from_csv(file.path(), &LoadOptions::default());
    assert!(matches!(result, Err(ForecastError::Load(_))));
}

#[test]
fn test_differencer() {
    let raw = RawSeries::from_values(vec![100.0, 102.0, 101.0, 105.0, 108.0, 107.0]);
    let diffs = raw.difference().unwrap();

    assert_eq!(diffs.len(), raw.len() - 1);
    assert_eq!(diffs.values(), &[2.0, -1.0, 4.0, 3.0, -1.0]);
}

#[test]
fn test_differencer_needs_two_levels() {
    let raw = RawSeries::from_values(vec![100.0]);
    assert!(matches!(
        raw.difference(),
        Err(ForecastError::InvalidInput(_))
    ));
}
