//! Console and JSON rendering of a benchmark run.

use std::fmt::Write;

use infra_system::{ApplyReport, SystemConfig};
use serde::Serialize;

use crate::bench::Comparison;
use crate::config::BenchConfig;
use crate::runner::RunSummary;

const RULE: &str = "--------------------------------------------------";

/// Report header: title, sizing line and a rule.
pub fn render_header(config: &BenchConfig) -> String {
    format!(
        "=== Portfolio Risk Benchmark ===\n\
         Positions: {} | Simulations: {} | Threads: {}\n{RULE}\n",
        config.positions, config.simulations, config.threads
    )
}

/// Requested tuning followed by the per-feature outcome.
pub fn render_tuning(system: &SystemConfig, report: &ApplyReport) -> String {
    let mut out = String::from("Applying system configuration...\n");
    for line in system.describe() {
        let _ = writeln!(out, "  {line}");
    }
    out.push_str("\nApplied Configuration:\n");
    for outcome in &report.outcomes {
        let status = match &outcome.error {
            None => "ok".to_string(),
            Some(err) => format!("not applied: {err}"),
        };
        let _ = writeln!(out, "  {:<18} {:<24} [{status}]", outcome.feature.to_string(), outcome.detail);
    }
    out.push('\n');
    out
}

fn render_comparison(out: &mut String, comparison: &Comparison) {
    let _ = writeln!(out, "\n{}:", comparison.kernel);
    let _ = writeln!(out, "  Single-threaded: {:>8.1} ms", comparison.single.elapsed_ms);
    match comparison.speedup {
        Some(speedup) => {
            let _ = writeln!(
                out,
                "  Multi-threaded:  {:>8.1} ms ({speedup:.1}x speedup)",
                comparison.multi.elapsed_ms
            );
        }
        None => {
            let _ = writeln!(
                out,
                "  Multi-threaded:  {:>8.1} ms (speedup n/a)",
                comparison.multi.elapsed_ms
            );
        }
    }
}

/// Console report of a run, without the header.
///
/// # Examples
/// ```no_run
/// use service_cli::config::BenchConfig;
/// use service_cli::report::render_table;
/// use service_cli::runner::run;
///
/// let config = BenchConfig { positions: 100, simulations: 1_000, ..Default::default() };
/// let summary = run(&config).unwrap();
/// print!("{}", render_table(&summary));
/// ```
pub fn render_table(summary: &RunSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Generated {} positions in {:.1} ms",
        summary.positions, summary.generation_ms
    );

    for comparison in [&summary.monte_carlo, &summary.greeks, &summary.aggregation] {
        render_comparison(&mut out, comparison);
    }

    let _ = writeln!(out, "\n{RULE}");
    let _ = writeln!(out, "Results Summary:");
    let _ = writeln!(out, "  VaR (99%):          ${:>16.2}", summary.var.var_99);
    let _ = writeln!(out, "  VaR (95%):          ${:>16.2}", summary.var.var_95);
    let _ = writeln!(out, "  Expected Shortfall: ${:>16.2}", summary.var.expected_shortfall);
    let _ = writeln!(out, "  Portfolio Delta:     {:>16.2}", summary.portfolio_delta);
    let _ = writeln!(out, "  Net Exposure:       ${:>16.2}", summary.net_exposure);
    let _ = writeln!(out, "  Long / Short:       ${:.2} / ${:.2}", summary.long_exposure, summary.short_exposure);
    let _ = writeln!(out, "  Unique Symbols:      {:>16}", summary.unique_symbols);

    if !summary.top_exposures.is_empty() {
        let _ = writeln!(out, "\nTop {} Exposures:", summary.top_exposures.len());
        for row in &summary.top_exposures {
            let avg = row
                .exposure
                .avg_price
                .map_or_else(|| "-".to_string(), |p| format!("{p:.2}"));
            let _ = writeln!(
                out,
                "  {:<8} notional {:>16.2}  qty {:>12.2}  avg {:>10}  ({} positions)",
                row.symbol, row.exposure.notional, row.exposure.quantity, avg, row.exposure.position_count
            );
        }
    }

    let check = &summary.cross_check;
    let _ = writeln!(
        out,
        "\nCross-check: greeks {}, aggregation {}",
        if check.greeks_identical { "identical" } else { "DIFFER" },
        if check.aggregation_agrees { "agrees" } else { "DIFFERS" },
    );

    let _ = writeln!(out, "\n{RULE}");
    let _ = writeln!(out, "Total Benchmark Time:");
    let _ = writeln!(out, "  Single-threaded: {:>8.1} ms", summary.total.single_ms);
    let _ = writeln!(out, "  Multi-threaded:  {:>8.1} ms", summary.total.multi_ms);
    match summary.total.speedup {
        Some(speedup) => {
            let _ = writeln!(out, "  Overall Speedup: {speedup:.2}x");
        }
        None => {
            let _ = writeln!(out, "  Overall Speedup: n/a");
        }
    }
    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    config: &'a BenchConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    tuning: Option<&'a ApplyReport>,
    results: &'a RunSummary,
}

/// The run as one pretty-printed JSON document.
pub fn render_json(
    config: &BenchConfig,
    tuning: Option<&ApplyReport>,
    summary: &RunSummary,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        config,
        tuning,
        results: summary,
    })
}
