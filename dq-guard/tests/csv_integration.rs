//! Loading café exports from CSV and validating them.

use dq_guard::core::{Expectation, ExpectationSuite, ValidationEngine};
use dq_guard::dataset::ColumnType;
use dq_guard::error::DqError;
use dq_guard::interchange;
use dq_guard::profile::QualityKpis;
use dq_guard::reference::{self, transaction_labels, transaction_suite};
use dq_guard::scoring::BadgeTier;
use dq_guard::sources::{CsvOptions, CsvSource, DataSource};
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

const DIRTY_EXPORT: &str = "\
Transaction ID,Item,Quantity,Price Per Unit,Total Spent,Payment Method,Location,Transaction Date
TXN_1961373,Coffee,2,2.0,4.0,Credit Card,Takeaway,2023-09-08
TXN_4977031,Cake,4,3.0,12.0,Cash,In-store,2023-05-16
TXN_4271903,Cookie,4,1.0,ERROR,Credit Card,In-store,2023-07-19
TXN_7034554,Salad,2,5.0,10.0,UNKNOWN,UNKNOWN,2023-04-27
TXN_3160411,Coffee,ERROR,2.0,4.0,Digital Wallet,In-store,2023-06-11
TXN_2602893,Smoothie,5,4.0,20.0,Credit Card,,2023-03-31
TXN_4433211,UNKNOWN,3,3.0,9.0,ERROR,Takeaway,2023-10-06
TXN_6699534,Sandwich,4,4.0,16.0,Cash,UNKNOWN,2023-10-28
TXN_4717867,,5,3.0,15.0,,Takeaway,2023-07-28
TXN_2064365,Sandwich,5,4.0,20.0,,In-store,2023-12-31
TXN_2548360,Salad,5,5.0,25.0,Cash,Takeaway,2023-11-07
TXN_7619095,Sandwich,2,4.0,8.0,Cash,In-store,2023-05-03
TXN_9437049,Cookie,5,1.0,5.0,,Takeaway,2023-06-01
TXN_8915701,ERROR,2,1.5,3.0,,In-store,2023-03-21
TXN_2847255,Salad,3,5.0,15.0,Credit Card,In-store,2023-11-15
TXN_3765707,Sandwich,1,4.0,4.0,,,2023-06-10
TXN_6769710,Juice,2,3.0,6.0,Cash,In-store,2023-02-24
TXN_8876618,Cake,5,3.0,15.0,Cash,In-store,2023-03-25
TXN_3709394,Juice,4,3.0,12.0,Cash,Takeaway,2023-01-15
TXN_3522028,Smoothie,4,4.0,ERROR,Credit Card,In-store,2023-04-04
TXN_3522028,Smoothie,4,4.0,16.0,Cash,In-store,ERROR
TXN_1254810,Coffee,,2.0,4.0,Cash,In-store,
";

fn write_csv(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".csv").unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn reference_source(file: &NamedTempFile) -> CsvSource {
    let options = CsvOptions::default().with_numeric_columns(
        transaction_suite().unwrap().numeric_columns(),
    );
    CsvSource::with_options(file.path().to_str().unwrap(), options).unwrap()
}

#[tokio::test]
async fn test_dirty_export_counts() {
    let file = write_csv(DIRTY_EXPORT);
    let dataset = reference_source(&file).load().await.unwrap();

    assert_eq!(dataset.row_count(), 22);
    assert_eq!(dataset.column_count(), 8);
    assert_eq!(
        dataset.column(reference::QUANTITY).unwrap().column_type(),
        ColumnType::Float
    );
    assert_eq!(
        dataset.column(reference::TOTAL_SPENT).unwrap().column_type(),
        ColumnType::Float
    );
    assert_eq!(
        dataset.column(reference::PAYMENT_METHOD).unwrap().column_type(),
        ColumnType::Text
    );

    let report = ValidationEngine::new()
        .run(&dataset, &transaction_suite().unwrap())
        .unwrap();
    let counts: Vec<u64> = report.results.iter().map(|r| r.unexpected_count()).collect();

    // not_null id, unique id, quantity, total spent, payment method, date
    assert_eq!(counts, vec![0, 2, 2, 2, 2, 2]);
    assert_eq!(report.summary().success_count, 1);
    assert_eq!(report.badge().tier, BadgeTier::None);
}

#[tokio::test]
async fn test_kpis_from_loaded_export() {
    let file = write_csv(DIRTY_EXPORT);
    let dataset = reference_source(&file).load().await.unwrap();
    let report = ValidationEngine::new()
        .run(&dataset, &transaction_suite().unwrap())
        .unwrap();

    let kpis = QualityKpis::compute(&dataset, &report.summary());
    assert_eq!(kpis.row_count, 22);
    assert_eq!(kpis.error_percentage, 45.5);

    let missing = |column: &str| {
        kpis.missing_by_column
            .iter()
            .find(|m| m.column == column)
            .map(|m| m.missing_count)
            .unwrap_or(0)
    };
    assert_eq!(missing(reference::TRANSACTION_ID), 0);
    assert_eq!(missing("Item"), 1);
    assert_eq!(missing(reference::QUANTITY), 2);
    assert_eq!(missing(reference::TOTAL_SPENT), 2);
    assert_eq!(missing(reference::PAYMENT_METHOD), 5);
    assert_eq!(missing("Location"), 2);
    assert_eq!(missing(reference::TRANSACTION_DATE), 1);
}

#[tokio::test]
async fn test_results_written_for_dashboard() {
    let file = write_csv(DIRTY_EXPORT);
    let dataset = reference_source(&file).load().await.unwrap();
    let report = ValidationEngine::new()
        .run(&dataset, &transaction_suite().unwrap())
        .unwrap();

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("validation_results.json");
    let records = interchange::to_records(&report.results, &transaction_labels());
    interchange::write_records(&out, &records).unwrap();

    let loaded = interchange::load_records(&out).unwrap().require().unwrap();
    assert_eq!(loaded, records);
    assert_eq!(loaded[0].test, "Transaktion ID nicht null");
    assert_eq!(loaded[0].status.as_str(), interchange::STATUS_PASSED);
    assert_eq!(loaded[1].status.as_str(), interchange::STATUS_FAILED);
}

#[tokio::test]
async fn test_numeric_column_must_exist() {
    let file = write_csv("id,amount\n1,2.0\n");
    let options = CsvOptions::default().with_numeric_columns([reference::QUANTITY]);
    let source = CsvSource::with_options(file.path().to_str().unwrap(), options).unwrap();

    let err = source.load().await.unwrap_err();
    assert!(matches!(err, DqError::UnknownColumn { ref column, .. } if column == reference::QUANTITY));
}

#[tokio::test]
async fn test_missing_file_is_a_source_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.csv");
    let source = CsvSource::new(path.to_str().unwrap()).unwrap();

    assert!(source.load().await.is_err());
}

#[test]
fn test_empty_path_rejected() {
    let err = CsvSource::new("").unwrap_err();
    assert!(err.is_configuration_error());
}

#[tokio::test]
async fn test_nan_cells_are_missing_values() {
    let file = write_csv("id,Quantity\n1,NaN\n2,nan\n3,3\n4,ERROR\n");
    let options = CsvOptions::default().with_numeric_columns([reference::QUANTITY]);
    let dataset = CsvSource::with_options(file.path().to_str().unwrap(), options)
        .unwrap()
        .load()
        .await
        .unwrap();

    let suite = ExpectationSuite::builder("quantity")
        .expectation(Expectation::not_null(reference::QUANTITY))
        .expectation(Expectation::unique(reference::QUANTITY))
        .build();
    let report = ValidationEngine::new().run(&dataset, &suite).unwrap();
    let counts: Vec<u64> = report.results.iter().map(|r| r.unexpected_count()).collect();
    assert_eq!(counts, vec![3, 0]);

    let kpis = QualityKpis::compute(&dataset, &report.summary());
    let quantity = kpis
        .missing_by_column
        .iter()
        .find(|m| m.column == reference::QUANTITY)
        .unwrap();
    assert_eq!(quantity.missing_count, 3);
}
