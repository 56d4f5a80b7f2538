//! Plain-text rendering of simulation results

use std::fmt::Write;

use retireplan_core::inflation::deflate_over;
use retireplan_core::model::{MonteCarloSummary, YearSnapshot};

/// Whole-unit amount with thousands separators, e.g. `-1,234,567`
pub fn format_amount(value: f64) -> String {
    let units = value.abs().round() as i64;

    let digits = units.to_string();
    let mut result = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    let formatted: String = result.chars().rev().collect();

    if value < 0.0 && units != 0 {
        format!("-{formatted}")
    } else {
        formatted
    }
}

/// Format a fraction as a percentage
pub fn format_percentage(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

/// Deflate nominal totals back to the first simulated year
#[derive(Debug, Clone, Copy)]
pub struct RealTerms {
    pub start_age: u32,
    pub inflation_rate: f64,
}

impl RealTerms {
    fn total(&self, snap: &YearSnapshot) -> f64 {
        deflate_over(
            snap.total,
            self.inflation_rate,
            snap.age.saturating_sub(self.start_age),
        )
    }
}

const AMOUNT_WIDTH: usize = 16;

/// Render a deterministic trajectory as an aligned table
pub fn render_trajectory(snapshots: &[YearSnapshot], real: Option<RealTerms>) -> String {
    let mut out = String::new();

    let mut headers = vec!["Taxable", "Tax-Deferred", "Tax-Exempt", "Total"];
    if real.is_some() {
        headers.push("Real Total");
    }

    let _ = write!(out, "{:>5}", "Age");
    for header in &headers {
        let _ = write!(out, "{header:>AMOUNT_WIDTH$}");
    }
    out.push('\n');

    for snap in snapshots {
        let _ = write!(out, "{:>5}", snap.age);
        let mut values = vec![snap.taxable, snap.tax_deferred, snap.tax_exempt, snap.total];
        if let Some(terms) = &real {
            values.push(terms.total(snap));
        }
        for value in values {
            let _ = write!(out, "{:>AMOUNT_WIDTH$}", format_amount(value));
        }
        out.push('\n');
    }

    out
}

/// Render a Monte Carlo summary
pub fn render_monte_carlo(summary: &MonteCarloSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Trials:          {}", summary.iterations);
    let _ = writeln!(
        out,
        "Success rate:    {}",
        format_percentage(summary.success_rate)
    );
    if summary.failed_trials > 0 {
        let _ = writeln!(out, "Failed trials:   {}", summary.failed_trials);
    }
    let _ = writeln!(out, "Mean balance:    {}", format_amount(summary.mean));
    let _ = writeln!(out, "5th percentile:  {}", format_amount(summary.p5));
    let _ = writeln!(out, "Median:          {}", format_amount(summary.p50));
    let _ = writeln!(out, "95th percentile: {}", format_amount(summary.p95));
    out
}
