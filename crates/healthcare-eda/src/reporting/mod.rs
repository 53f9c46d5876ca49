//! Report generation module.
//!
//! Two outputs are produced from a finished run:
//! - Plain-text sections printed to the terminal ([`console`])
//! - An [`EdaReport`] for JSON output (`--json`) or a report file
//!   (`--emit-report`)
//!
//! # Example
//!
//! ```rust,ignore
//! use healthcare_eda::reporting::ReportGenerator;
//!
//! let report = ReportGenerator::build_report(&input, &output, &result);
//! println!("{}", serde_json::to_string_pretty(&report)?);
//!
//! let generator = ReportGenerator::new(PathBuf::from("output"));
//! generator.write_report_to_file(&report, "healthcare_dataset")?;
//! ```

pub mod console;
mod generator;

pub use generator::{EdaReport, ProcessingSummaryReport, ReportGenerator};
