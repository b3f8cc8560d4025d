//! Formatted terminal output.

use crate::domain::{RunMode, StatValue};
use crate::fit::PowerLawFit;

/// Format a measurement as `value +/- error`.
///
/// Velocities print in plain decimal; astronomical magnitudes (luminosities
/// in W, distances in m) switch to scientific notation.
pub fn format_stat(v: &StatValue) -> String {
    if v.value != 0.0 && (v.value.abs() >= 1e6 || v.value.abs() < 1e-3) {
        format!("{:.4e} +/- {:.4e}", v.value, v.error)
    } else {
        format!("{:.4} +/- {:.4}", v.value, v.error)
    }
}

/// One per-source console line, e.g. `NGC7331 - HWHM 250.0000 +/- 3.0000`.
pub fn format_source_line(name: &str, quantity: &str, v: &StatValue) -> String {
    format!("{name} - {quantity} {}", format_stat(v))
}

/// Header for one pass of the batch.
pub fn format_pass_header(mode: RunMode, used: usize, skipped: usize) -> String {
    format!(
        "=== tfd {} pass: {used} source(s) processed, {skipped} skipped ===",
        mode.display_name()
    )
}

/// Summary of the calibrated relation.
pub fn format_relation_summary(fit: &PowerLawFit) -> String {
    let mut out = String::new();
    out.push_str("Fitted relation: L(V) = A * V^B\n");
    out.push_str(&format!("  A = {}\n", format_stat(&fit.relation.amplitude)));
    out.push_str(&format!("  B = {}\n", format_stat(&fit.relation.exponent)));
    out.push_str(&format!(
        "  quality: sse={:.4e} rmse={:.4e} n={}",
        fit.quality.sse, fit.quality.rmse, fit.quality.n
    ));
    out
}
