//! Data module - CSV loading, cleaning and filtering

mod cleaner;
mod loader;
mod processor;

pub use cleaner::{
    clean_frame, coerce_repair_amount, coerce_state, coerce_tsa_flag, CleanedTable,
    CleaningOptions, Record, MISSING_STATE, NULL_MARKERS, REPAIR_AMOUNT, STATE, TSA_ELIGIBLE,
};
pub use loader::{DataLoadError, DataLoader};
pub use processor::{DataProcessor, ProcessorError};
