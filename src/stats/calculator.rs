//! Statistics Calculator Module
//! TSA eligibility rates per state plus the descriptive inputs of each chart.

use crate::data::{CleanedTable, DataProcessor, ProcessorError};
use statrs::statistics::{Data, OrderStatistics};
use std::collections::{BTreeMap, BTreeSet};

/// Mean TSA eligibility for one state code.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRow {
    pub state: String,
    pub tsa_rate: f64,
    pub count: usize,
}

/// One equal-width histogram bin, `[start, end)` except the last which is closed.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Five-number summary of repair amounts for one eligibility class.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub tsa_eligible: i64,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub mean: f64,
}

/// Headline numbers for the filtered table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DatasetSummary {
    pub records: usize,
    pub eligible: usize,
    pub eligibility_rate: Option<f64>,
    pub mean_repair: Option<f64>,
    pub median_repair: Option<f64>,
    pub std_repair: Option<f64>,
}

/// Everything the dashboard draws for one filter selection.
#[derive(Debug, Clone)]
pub struct ChartData {
    pub filtered: CleanedTable,
    pub summary: DatasetSummary,
    pub histogram: Vec<HistogramBin>,
    pub boxes: Vec<BoxSummary>,
    pub rates: Vec<AggregateRow>,
}

/// Eligibility classes in boxplot order.
const TSA_CLASSES: [i64; 2] = [0, 1];

/// Handles descriptive calculations over cleaned tables.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Mean of `tsaEligible` per state, ascending by state code.
    pub fn rates_by_state(table: &CleanedTable) -> Vec<AggregateRow> {
        let mut groups: BTreeMap<String, (i64, usize)> = BTreeMap::new();

        for (state, flag) in table.states().into_iter().zip(table.tsa_flags()) {
            let entry = groups.entry(state).or_insert((0, 0));
            entry.0 += flag;
            entry.1 += 1;
        }

        groups
            .into_iter()
            .map(|(state, (sum, count))| AggregateRow {
                state,
                tsa_rate: sum as f64 / count as f64,
                count,
            })
            .collect()
    }

    /// Equal-width histogram over `[min, max]` with exactly `bins` bins.
    pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
        if values.is_empty() || bins == 0 {
            return Vec::new();
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        if max <= min {
            return vec![HistogramBin {
                start: min,
                end: min + 1.0,
                count: values.len(),
            }];
        }

        let width = (max - min) / bins as f64;
        let mut counts = vec![0usize; bins];
        for &v in values {
            let idx = (((v - min) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                start: min + i as f64 * width,
                end: if i + 1 == bins {
                    max
                } else {
                    min + (i + 1) as f64 * width
                },
                count,
            })
            .collect()
    }

    /// Boxplot summary; whiskers reach the furthest samples within 1.5 IQR.
    pub fn box_summary(tsa_eligible: i64, values: &[f64]) -> Option<BoxSummary> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mut data = Data::new(sorted.clone());
        let q1 = data.lower_quartile();
        let median = data.median();
        let q3 = data.upper_quartile();
        let iqr = q3 - q1;

        let min = sorted[0];
        let max = sorted[sorted.len() - 1];
        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|&v| v >= q1 - 1.5 * iqr)
            .unwrap_or(q1);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= q3 + 1.5 * iqr)
            .unwrap_or(q3);

        Some(BoxSummary {
            tsa_eligible,
            count: sorted.len(),
            min,
            q1,
            median,
            q3,
            max,
            lower_whisker,
            upper_whisker,
            mean: sorted.iter().sum::<f64>() / sorted.len() as f64,
        })
    }

    /// Repair amount summaries per eligibility class present (`0` then `1`).
    pub fn box_summaries(table: &CleanedTable) -> Vec<BoxSummary> {
        let flags = table.tsa_flags();
        let amounts = table.repair_amounts();

        TSA_CLASSES
            .iter()
            .filter_map(|&class| {
                let values: Vec<f64> = flags
                    .iter()
                    .zip(&amounts)
                    .filter(|(flag, _)| **flag == class)
                    .map(|(_, amount)| *amount)
                    .collect();
                Self::box_summary(class, &values)
            })
            .collect()
    }

    pub fn summarize(table: &CleanedTable) -> DatasetSummary {
        use statrs::statistics::Statistics;

        let amounts = table.repair_amounts();
        let records = amounts.len();
        if records == 0 {
            return DatasetSummary::default();
        }

        let eligible = table.tsa_flags().iter().filter(|&&f| f == 1).count();
        let median = Data::new(amounts.clone()).median();
        let std_repair = (records > 1).then(|| amounts.iter().std_dev());

        DatasetSummary {
            records,
            eligible,
            eligibility_rate: Some(eligible as f64 / records as f64),
            mean_repair: Some(amounts.iter().mean()),
            median_repair: Some(median),
            std_repair,
        }
    }

    /// Filter, then compute every chart input for the selection.
    pub fn compute_dashboard(
        table: &CleanedTable,
        selected: &BTreeSet<String>,
        bins: usize,
    ) -> Result<ChartData, ProcessorError> {
        let filtered = DataProcessor::filter_by_states(table, selected)?;

        let ((summary, histogram), (boxes, rates)) = rayon::join(
            || {
                (
                    Self::summarize(&filtered),
                    Self::histogram(&filtered.repair_amounts(), bins),
                )
            },
            || {
                (
                    Self::box_summaries(&filtered),
                    Self::rates_by_state(&filtered),
                )
            },
        );

        Ok(ChartData {
            filtered,
            summary,
            histogram,
            boxes,
            rates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Record;

    #[test]
    fn rates_by_state_sorted_means() {
        let table = CleanedTable::from_records(&[
            Record::new("B", 1, 0.0),
            Record::new("A", 1, 0.0),
            Record::new("A", 0, 0.0),
        ]);

        let rates = StatsCalculator::rates_by_state(&table);
        assert_eq!(
            rates,
            vec![
                AggregateRow {
                    state: "A".to_string(),
                    tsa_rate: 0.5,
                    count: 2
                },
                AggregateRow {
                    state: "B".to_string(),
                    tsa_rate: 1.0,
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn rates_by_state_empty() {
        let table = CleanedTable::from_records(&[]);
        assert!(StatsCalculator::rates_by_state(&table).is_empty());
    }

    #[test]
    fn histogram_has_requested_bins() {
        let values: Vec<f64> = (0..=100).map(f64::from).collect();
        let bins = StatsCalculator::histogram(&values, 40);

        assert_eq!(bins.len(), 40);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 101);
        assert_eq!(bins[0].start, 0.0);
        assert_eq!(bins[39].end, 100.0);
        // The maximum lands in the last bin
        assert!(bins[39].count >= 1);
    }

    #[test]
    fn histogram_constant_and_empty() {
        let bins = StatsCalculator::histogram(&[5.0, 5.0, 5.0], 40);
        assert_eq!(
            bins,
            vec![HistogramBin {
                start: 5.0,
                end: 6.0,
                count: 3
            }]
        );
        assert!(StatsCalculator::histogram(&[], 40).is_empty());
    }

    #[test]
    fn box_summary_quartiles() {
        let summary = StatsCalculator::box_summary(1, &[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(summary.count, 5);
        assert_eq!(summary.median, 3.0);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 5.0);
        assert!(summary.q1 <= summary.median && summary.median <= summary.q3);
        assert_eq!(summary.mean, 3.0);
    }

    #[test]
    fn box_summary_whiskers_exclude_outliers() {
        let summary =
            StatsCalculator::box_summary(0, &[10.0, 11.0, 12.0, 13.0, 14.0, 1000.0]).unwrap();
        assert_eq!(summary.max, 1000.0);
        assert!(summary.upper_whisker < 1000.0);
        assert_eq!(summary.lower_whisker, 10.0);
    }

    #[test]
    fn box_summaries_per_class() {
        let table = CleanedTable::from_records(&[
            Record::new("TX", 1, 100.0),
            Record::new("TX", 1, 300.0),
            Record::new("FL", 0, 50.0),
        ]);
        let boxes = StatsCalculator::box_summaries(&table);
        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[0].tsa_eligible, 0);
        assert_eq!(boxes[0].count, 1);
        assert_eq!(boxes[1].tsa_eligible, 1);
        assert_eq!(boxes[1].mean, 200.0);

        let only_eligible = CleanedTable::from_records(&[Record::new("TX", 1, 1.0)]);
        let boxes = StatsCalculator::box_summaries(&only_eligible);
        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0].tsa_eligible, 1);
    }

    #[test]
    fn summarize_counts() {
        let table = CleanedTable::from_records(&[
            Record::new("TX", 1, 100.0),
            Record::new("FL", 0, 300.0),
        ]);
        let summary = StatsCalculator::summarize(&table);
        assert_eq!(summary.records, 2);
        assert_eq!(summary.eligible, 1);
        assert_eq!(summary.eligibility_rate, Some(0.5));
        assert_eq!(summary.mean_repair, Some(200.0));
        assert_eq!(summary.median_repair, Some(200.0));
        assert!(summary.std_repair.is_some());

        let empty = StatsCalculator::summarize(&CleanedTable::from_records(&[]));
        assert_eq!(empty, DatasetSummary::default());
    }

    #[test]
    fn compute_dashboard_applies_filter() {
        let table = CleanedTable::from_records(&[
            Record::new("TX", 1, 100.0),
            Record::new("FL", 0, 300.0),
            Record::new("TX", 0, 200.0),
        ]);
        let selected: BTreeSet<String> = ["TX".to_string()].into_iter().collect();

        let data = StatsCalculator::compute_dashboard(&table, &selected, 40).unwrap();
        assert_eq!(data.summary.records, 2);
        assert_eq!(data.rates.len(), 1);
        assert_eq!(data.rates[0].tsa_rate, 0.5);
        assert_eq!(data.histogram.len(), 40);
        assert_eq!(data.boxes.len(), 2);
    }
}
