//! Data Cleaner Module
//! Column-level coercion of the raw FEMA table into a `CleanedTable`.

use super::loader::DataLoadError;
use polars::prelude::*;

/// Monetary repair amount column.
pub const REPAIR_AMOUNT: &str = "repairAmount";
/// TSA eligibility flag column.
pub const TSA_ELIGIBLE: &str = "tsaEligible";
/// State / territory code column.
pub const STATE: &str = "damagedStateAbbreviation";

pub const REQUIRED_COLUMNS: [&str; 3] = [REPAIR_AMOUNT, TSA_ELIGIBLE, STATE];

/// Field tokens read as null while parsing the CSV.
pub const NULL_MARKERS: [&str; 5] = ["", " ", "NA", "NaN", "nan"];

/// Text a null state code becomes after cleaning.
pub const MISSING_STATE: &str = "nan";

/// Options for value coercion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleaningOptions {
    /// Strip thousands separators and `$` before parsing repair amounts.
    pub lenient_amounts: bool,
}

/// One cleaned row, restricted to the three normalized columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub repair_amount: f64,
    pub tsa_eligible: i64,
    pub state: String,
}

impl Record {
    pub fn new(state: &str, tsa_eligible: i64, repair_amount: f64) -> Self {
        Self {
            repair_amount,
            tsa_eligible,
            state: state.to_string(),
        }
    }
}

/// Table after coercion.
///
/// `repairAmount` is a finite non-negative `f64`, `tsaEligible` is `0` or `1`
/// and `damagedStateAbbreviation` is a trimmed, non-null string. Every other
/// source column is carried through as text for the preview.
#[derive(Debug, Clone)]
pub struct CleanedTable {
    df: DataFrame,
}

impl CleanedTable {
    /// Wrap a frame that already satisfies the cleaned invariants.
    pub(crate) fn from_frame(df: DataFrame) -> Self {
        Self { df }
    }

    /// Build a table directly from records (three columns only).
    pub fn from_records(records: &[Record]) -> Self {
        let repair: Vec<f64> = records
            .iter()
            .map(|r| sanitize_amount(r.repair_amount))
            .collect();
        let tsa: Vec<i64> = records
            .iter()
            .map(|r| i64::from(r.tsa_eligible == 1))
            .collect();
        let states: Vec<String> = records.iter().map(|r| r.state.trim().to_string()).collect();

        let df = DataFrame::new(vec![
            Column::new(REPAIR_AMOUNT.into(), repair),
            Column::new(TSA_ELIGIBLE.into(), tsa),
            Column::new(STATE.into(), states),
        ])
        .expect("record columns have equal length");

        Self { df }
    }

    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// First `n` rows with every column.
    pub fn preview(&self, n: usize) -> DataFrame {
        self.df.head(Some(n))
    }

    pub fn repair_amounts(&self) -> Vec<f64> {
        self.df
            .column(REPAIR_AMOUNT)
            .ok()
            .and_then(|col| {
                col.f64()
                    .ok()
                    .map(|ca| ca.into_iter().map(|v| v.unwrap_or(0.0)).collect())
            })
            .unwrap_or_default()
    }

    pub fn tsa_flags(&self) -> Vec<i64> {
        self.df
            .column(TSA_ELIGIBLE)
            .ok()
            .and_then(|col| {
                col.i64()
                    .ok()
                    .map(|ca| ca.into_iter().map(|v| v.unwrap_or(0)).collect())
            })
            .unwrap_or_default()
    }

    pub fn states(&self) -> Vec<String> {
        self.df
            .column(STATE)
            .ok()
            .and_then(|col| {
                col.str().ok().map(|ca| {
                    ca.into_iter()
                        .map(|v| v.unwrap_or(MISSING_STATE).to_string())
                        .collect()
                })
            })
            .unwrap_or_default()
    }

    /// Cleaned rows in source order.
    pub fn records(&self) -> Vec<Record> {
        self.repair_amounts()
            .into_iter()
            .zip(self.tsa_flags())
            .zip(self.states())
            .map(|((repair_amount, tsa_eligible), state)| Record {
                repair_amount,
                tsa_eligible,
                state,
            })
            .collect()
    }
}

fn sanitize_amount(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Coerce one raw `repairAmount` field. Anything unparseable becomes `0`.
pub fn coerce_repair_amount(raw: Option<&str>, options: CleaningOptions) -> f64 {
    let Some(raw) = raw else {
        return 0.0;
    };

    let text = raw.trim();
    let parsed = if options.lenient_amounts {
        let stripped: String = text.chars().filter(|c| !matches!(c, ',' | '$')).collect();
        stripped.trim().parse::<f64>()
    } else {
        text.parse::<f64>()
    };

    parsed.map(sanitize_amount).unwrap_or(0.0)
}

/// Coerce one raw `tsaEligible` field to `0` or `1`.
pub fn coerce_tsa_flag(raw: Option<&str>) -> i64 {
    let Some(raw) = raw else {
        return 0;
    };

    match raw.trim() {
        "1" | "Yes" => 1,
        "0" | "No" => 0,
        // Numeric fallback: "1.0" counts, "2" or "-1" do not
        other => match other.parse::<f64>() {
            Ok(v) if v.is_finite() && v.trunc() == 1.0 => 1,
            _ => 0,
        },
    }
}

/// Coerce one raw state code; a null becomes the literal `"nan"`.
pub fn coerce_state(raw: Option<&str>) -> String {
    raw.unwrap_or(MISSING_STATE).trim().to_string()
}

/// Apply the column coercions to a freshly parsed frame.
pub fn clean_frame(mut df: DataFrame, options: CleaningOptions) -> Result<CleanedTable, DataLoadError> {
    for name in REQUIRED_COLUMNS {
        if df.column(name).is_err() {
            return Err(DataLoadError::MissingColumn(name.to_string()));
        }
    }

    let repair_text = df.column(REPAIR_AMOUNT)?.cast(&DataType::String)?;
    let repair: Vec<f64> = repair_text
        .str()?
        .into_iter()
        .map(|v| coerce_repair_amount(v, options))
        .collect();

    let tsa_text = df.column(TSA_ELIGIBLE)?.cast(&DataType::String)?;
    let tsa: Vec<i64> = tsa_text.str()?.into_iter().map(coerce_tsa_flag).collect();

    let state_text = df.column(STATE)?.cast(&DataType::String)?;
    let states: Vec<String> = state_text.str()?.into_iter().map(coerce_state).collect();

    df.with_column(Column::new(REPAIR_AMOUNT.into(), repair))?;
    df.with_column(Column::new(TSA_ELIGIBLE.into(), tsa))?;
    df.with_column(Column::new(STATE.into(), states))?;

    Ok(CleanedTable::from_frame(df))
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRICT: CleaningOptions = CleaningOptions {
        lenient_amounts: false,
    };
    const LENIENT: CleaningOptions = CleaningOptions {
        lenient_amounts: true,
    };

    #[test]
    fn repair_amount_parses_plain_numbers() {
        assert_eq!(coerce_repair_amount(Some("1200.50"), STRICT), 1200.5);
        assert_eq!(coerce_repair_amount(Some(" 75 "), STRICT), 75.0);
        assert_eq!(coerce_repair_amount(Some("1e3"), STRICT), 1000.0);
    }

    #[test]
    fn repair_amount_unparseable_is_zero() {
        for raw in [None, Some(""), Some(" "), Some("abc"), Some("12abc"), Some("N/A")] {
            assert_eq!(coerce_repair_amount(raw, STRICT), 0.0, "{raw:?}");
        }
    }

    #[test]
    fn repair_amount_non_finite_or_negative_is_zero() {
        assert_eq!(coerce_repair_amount(Some("inf"), STRICT), 0.0);
        assert_eq!(coerce_repair_amount(Some("NaN"), STRICT), 0.0);
        assert_eq!(coerce_repair_amount(Some("-40"), STRICT), 0.0);
    }

    #[test]
    fn thousands_separator_strict() {
        assert_eq!(coerce_repair_amount(Some("1,200.00"), STRICT), 0.0);
        assert_eq!(coerce_repair_amount(Some("$300"), STRICT), 0.0);
    }

    #[test]
    fn thousands_separator_lenient() {
        assert_eq!(coerce_repair_amount(Some("1,200.00"), LENIENT), 1200.0);
        assert_eq!(coerce_repair_amount(Some(" $1,200.00 "), LENIENT), 1200.0);
        assert_eq!(coerce_repair_amount(Some("$"), LENIENT), 0.0);
    }

    #[test]
    fn tsa_flag_mapping() {
        assert_eq!(coerce_tsa_flag(Some("1")), 1);
        assert_eq!(coerce_tsa_flag(Some("0")), 0);
        assert_eq!(coerce_tsa_flag(Some("Yes")), 1);
        assert_eq!(coerce_tsa_flag(Some("No")), 0);
        assert_eq!(coerce_tsa_flag(Some("  Yes ")), 1);
    }

    #[test]
    fn tsa_flag_fallback() {
        assert_eq!(coerce_tsa_flag(Some("1.0")), 1);
        assert_eq!(coerce_tsa_flag(Some("0.0")), 0);
        assert_eq!(coerce_tsa_flag(Some("2")), 0);
        assert_eq!(coerce_tsa_flag(Some("-1")), 0);
        assert_eq!(coerce_tsa_flag(Some("yes")), 0);
        assert_eq!(coerce_tsa_flag(Some("True")), 0);
        assert_eq!(coerce_tsa_flag(None), 0);
    }

    #[test]
    fn state_trimmed_and_null_is_nan() {
        assert_eq!(coerce_state(Some("  TX ")), "TX");
        assert_eq!(coerce_state(None), "nan");
    }

    #[test]
    fn clean_frame_coerces_columns_and_keeps_others() {
        let df = DataFrame::new(vec![
            Column::new(
                REPAIR_AMOUNT.into(),
                vec![Some("100"), None, Some("bad"), Some("1,200.00")],
            ),
            Column::new(
                TSA_ELIGIBLE.into(),
                vec![Some("Yes"), Some("0"), None, Some("2")],
            ),
            Column::new(STATE.into(), vec![Some(" TX"), Some("FL "), None, Some("PR")]),
            Column::new("disasterNumber".into(), vec!["4332", "4337", "4339", "4339"]),
        ])
        .unwrap();

        let table = clean_frame(df, STRICT).unwrap();
        assert_eq!(table.height(), 4);
        assert_eq!(
            table.records(),
            vec![
                Record::new("TX", 1, 100.0),
                Record::new("FL", 0, 0.0),
                Record::new("nan", 0, 0.0),
                Record::new("PR", 0, 0.0),
            ]
        );
        assert!(table.column_names().contains(&"disasterNumber".to_string()));
    }

    #[test]
    fn clean_frame_requires_columns() {
        let df = DataFrame::new(vec![
            Column::new(REPAIR_AMOUNT.into(), vec!["1"]),
            Column::new(STATE.into(), vec!["TX"]),
        ])
        .unwrap();

        match clean_frame(df, STRICT) {
            Err(DataLoadError::MissingColumn(name)) => assert_eq!(name, TSA_ELIGIBLE),
            other => panic!("expected missing column, got {other:?}"),
        }
    }

    #[test]
    fn from_records_enforces_invariants() {
        let table = CleanedTable::from_records(&[
            Record::new(" AL ", 3, f64::NAN),
            Record::new("AK", 1, 10.0),
        ]);
        assert_eq!(
            table.records(),
            vec![Record::new("AL", 0, 0.0), Record::new("AK", 1, 10.0)]
        );
    }
}
