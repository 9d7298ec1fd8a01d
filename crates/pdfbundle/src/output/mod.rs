//! Output formatting and display for pdfbundle.
//!
//! This module handles all user-facing output including:
//! - Formatted status messages
//! - Error and warning display
//! - Summary reports for extractions and merges
//! - Quiet, verbose and JSON modes
//!
//! # Examples
//!
//! ```no_run
//! use pdfbundle::output::OutputFormatter;
//! use pdfbundle::config::Config;
//!
//! # fn example(config: Config) {
//! let formatter = OutputFormatter::from_config(&config);
//! formatter.info("Extracting archive");
//! formatter.success("Extraction completed");
//! # }
//! ```

pub mod formatter;

pub use formatter::{MessageLevel, OutputFormatter};

use crate::catalog::Artifact;
use crate::ingest::{CandidateFile, ExtractionReport};
use crate::merge::MergeStatistics;

/// Display the outcome of an archive extraction.
pub fn display_extraction_report(formatter: &OutputFormatter, report: &ExtractionReport) {
    if report.entries_skipped > 0 {
        formatter.warning(&format!(
            "Warning: skipped {} entr{} with unsafe paths in {}",
            report.entries_skipped,
            if report.entries_skipped == 1 { "y" } else { "ies" },
            report.archive
        ));
    }

    formatter.success(&format!(
        "Extracted {} file(s) from {} into {} ({})",
        report.entries_written,
        report.archive,
        report.folder,
        report.format_bytes_written()
    ));
    formatter.detail("Time", &format!("{:.2}s", report.extract_time.as_secs_f64()));
}

/// Display candidate files as a numbered list.
pub fn display_candidates(formatter: &OutputFormatter, candidates: &[CandidateFile]) {
    if candidates.is_empty() {
        formatter.info("No PDF or PNG files found");
        return;
    }

    for (index, candidate) in candidates.iter().enumerate() {
        formatter.list_item(
            index + 1,
            &format!("[{}] {}", candidate.kind.label(), candidate.key),
        );
    }
}

/// Display merge statistics to the user.
pub fn display_merge_statistics(formatter: &OutputFormatter, stats: &MergeStatistics) {
    if stats.files_skipped > 0 {
        formatter.warning(&format!(
            "Warning: skipped {} file(s) that are neither PDF nor PNG",
            stats.files_skipped
        ));
    }

    formatter.info(&format!(
        "Merged {} file(s) in {:.2}s: {} pages, {}",
        stats.files_merged,
        stats.merge_time.as_secs_f64(),
        stats.total_pages,
        stats.format_output_size()
    ));
    formatter.detail("PDF inputs", &stats.pdf_inputs.to_string());
    formatter.detail("Image inputs", &stats.image_inputs.to_string());
    formatter.detail("Input size", &stats.format_input_size());
}

/// Display artifacts as a table of name and size.
pub fn display_artifacts(formatter: &OutputFormatter, artifacts: &[Artifact]) {
    if artifacts.is_empty() {
        formatter.info("No merged PDFs yet");
        return;
    }

    let width = artifacts.iter().map(|a| a.name.len()).max().unwrap_or(0);
    for artifact in artifacts {
        formatter.line(&format!("{:<width$}  {}", artifact.name, artifact.format_size()));
    }
}
