//! FEMA TSA Eligibility Dashboard
//!
//! Loads FEMA disaster-assistance records from CSV, cleans the repair amount,
//! TSA eligibility and state columns, filters by state and aggregates TSA
//! eligibility rates for the interactive charts.

pub mod charts;
pub mod config;
pub mod data;
pub mod gui;
pub mod stats;
