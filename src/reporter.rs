use crate::types::RunReport;

/// Emit the run report as a single JSON line to stdout.
///
/// Logs go to stderr, so stdout stays machine-readable.
pub fn report_run(report: &RunReport) {
    if let Ok(json) = serde_json::to_string(report) {
        println!("{json}");
    }
}
