use std::collections::BTreeSet;
use std::io::Write;
use tempfile::NamedTempFile;
use tsa_dashboard::data::{DataLoader, DataProcessor, Record};
use tsa_dashboard::stats::{AggregateRow, StatsCalculator};

const SAMPLE: &str = "\
disasterNumber,damagedStateAbbreviation,repairAmount,tsaEligible
4332, TX ,1500.25,1
4332,TX,NA,0
4337,FL,\"1,200.00\",Yes
4337,FL,300,No
4339,PR,abc,2
4339,PR,75.5,1.0
";

fn sample_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(SAMPLE.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn load_filter_aggregate() {
    let file = sample_file();
    let mut loader = DataLoader::default();
    let table = loader.load(file.path()).expect("sample loads");

    assert_eq!(
        table.records(),
        vec![
            Record::new("TX", 1, 1500.25),
            Record::new("TX", 0, 0.0),
            Record::new("FL", 1, 0.0),
            Record::new("FL", 0, 300.0),
            Record::new("PR", 0, 0.0),
            Record::new("PR", 1, 75.5),
        ]
    );
    assert_eq!(
        DataProcessor::state_options(&table),
        vec!["FL".to_string(), "PR".to_string(), "TX".to_string()]
    );

    let rates = StatsCalculator::rates_by_state(&table);
    assert_eq!(
        rates,
        vec![
            AggregateRow {
                state: "FL".to_string(),
                tsa_rate: 0.5,
                count: 2
            },
            AggregateRow {
                state: "PR".to_string(),
                tsa_rate: 0.5,
                count: 2
            },
            AggregateRow {
                state: "TX".to_string(),
                tsa_rate: 0.5,
                count: 2
            },
        ]
    );

    let selected: BTreeSet<String> = ["TX".to_string()].into_iter().collect();
    let filtered = DataProcessor::filter_by_states(&table, &selected).unwrap();
    assert_eq!(filtered.height(), 2);
    assert_eq!(filtered.column_names().len(), 4);

    let unfiltered = DataProcessor::filter_by_states(&table, &BTreeSet::new()).unwrap();
    assert_eq!(unfiltered.records(), table.records());
}

#[test]
fn dashboard_for_all_states() {
    let file = sample_file();
    let mut loader = DataLoader::default();
    let table = loader.load(file.path()).unwrap();

    let data = StatsCalculator::compute_dashboard(&table, &BTreeSet::new(), 40).unwrap();
    assert_eq!(data.summary.records, 6);
    assert_eq!(data.summary.eligible, 3);
    assert_eq!(data.histogram.len(), 40);
    assert_eq!(data.histogram.iter().map(|b| b.count).sum::<usize>(), 6);
    assert_eq!(data.boxes.len(), 2);
    assert_eq!(data.rates.len(), 3);
}

#[test]
fn empty_file_is_load_error() {
    let file = NamedTempFile::new().unwrap();
    let mut loader = DataLoader::default();
    assert!(loader.load(file.path()).is_err());
}
