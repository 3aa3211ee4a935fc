//! Output formatting for CLI operations.

use dexzip::progress::format_bytes_iec as humanize_bytes;
use dexzip::{MergeReport, Verification};
use serde_json::json;
use std::path::Path;

/// Trait for output formatting
pub trait OutputFormatter {
    /// Formats a completed merge
    fn format_report(&self, report: &MergeReport, output: &Path) -> String;

    /// Formats verification results
    fn format_verification(&self, verification: &Verification) -> String;

    /// Formats a merge with its verification as a single document
    fn format_verified_report(
        &self,
        report: &MergeReport,
        output: &Path,
        verification: &Verification,
    ) -> String {
        let mut text = self.format_report(report, output);
        text.push_str(&self.format_verification(verification));
        text
    }
}

/// Human-readable output formatter
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn format_report(&self, report: &MergeReport, output: &Path) -> String {
        let mut text = String::new();

        text.push_str(&format!("{} generated\n", output.display()));
        text.push_str(&"-".repeat(40));
        text.push('\n');
        text.push_str(&format!(
            "  Inner:          {} ({})\n",
            humanize_bytes(report.inner_size),
            report.inner_format.name()
        ));
        text.push_str(&format!(
            "  Outer:          {}\n",
            humanize_bytes(report.outer_size)
        ));
        text.push_str(&format!(
            "  Total:          {} ({:.1}% inner)\n",
            humanize_bytes(report.total_size),
            report.inner_percent()
        ));
        text.push_str(&format!(
            "  Directory:      {} -> {} ({})\n",
            report.patch.old_directory_start,
            report.patch.new_directory_start,
            humanize_bytes(report.directory.directory_len() as u64)
        ));
        text.push_str(&format!(
            "  Entries:        {}\n",
            report.patch.entries_patched
        ));
        text.push_str(&format!("  SHA-1:          {}\n", report.signature_hex()));
        text.push_str(&format!("  Adler-32:       {:08x}\n", report.checksum));

        text
    }

    fn format_verification(&self, verification: &Verification) -> String {
        let mark = |ok: bool| if ok { "OK" } else { "FAILED" };
        let mut text = String::new();

        text.push_str("Verification:\n");
        text.push_str(&format!("  Length:         {}\n", mark(verification.length_ok())));
        text.push_str(&format!(
            "  Signature:      {}\n",
            mark(verification.signature_ok())
        ));
        text.push_str(&format!(
            "  Checksum:       {}\n",
            mark(verification.checksum_ok())
        ));
        text.push_str(&format!(
            "  Archive:        {} ({} entries, {} misplaced)\n",
            mark(verification.archive_ok()),
            verification.entries_checked,
            verification.misplaced_entries.len()
        ));

        text
    }
}

/// JSON output formatter
pub struct JsonFormatter;

impl JsonFormatter {
    fn report_value(report: &MergeReport, output: &Path) -> serde_json::Value {
        json!({
            "output": output.display().to_string(),
            "inner_format": report.inner_format.name(),
            "inner_size": report.inner_size,
            "outer_size": report.outer_size,
            "total_size": report.total_size,
            "old_directory_start": report.patch.old_directory_start,
            "new_directory_start": report.patch.new_directory_start,
            "directory_size": report.directory.directory_len(),
            "entries_patched": report.patch.entries_patched,
            "sha1": report.signature_hex(),
            "adler32": format!("{:08x}", report.checksum),
        })
    }

    fn verification_value(verification: &Verification) -> serde_json::Value {
        json!({
            "ok": verification.is_ok(),
            "length": verification.length_ok(),
            "signature": verification.signature_ok(),
            "checksum": verification.checksum_ok(),
            "archive": verification.archive_ok(),
            "entries_checked": verification.entries_checked,
            "misplaced_entries": verification.misplaced_entries,
        })
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &MergeReport, output: &Path) -> String {
        serde_json::to_string_pretty(&Self::report_value(report, output)).unwrap_or_default()
    }

    fn format_verification(&self, verification: &Verification) -> String {
        serde_json::to_string_pretty(&Self::verification_value(verification)).unwrap_or_default()
    }

    fn format_verified_report(
        &self,
        report: &MergeReport,
        output: &Path,
        verification: &Verification,
    ) -> String {
        let mut obj = Self::report_value(report, output);
        obj["verification"] = Self::verification_value(verification);
        serde_json::to_string_pretty(&obj).unwrap_or_default()
    }
}

/// Creates a formatter based on output format
pub fn create_formatter(format: super::OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        super::OutputFormat::Human => Box::new(HumanFormatter),
        super::OutputFormat::Json => Box::new(JsonFormatter),
    }
}
