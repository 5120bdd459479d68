//! Statistics over loaded run data: latency percentiles, throughput and
//! the write-amplification estimate.

use crate::model::{PercentileStats, RunMetadata, ThroughputStats};

/// Compute distributional statistics over a latency sample set.
///
/// An empty input returns the all-zero sentinel record (count 0); callers
/// check `count` before treating the other fields as real values.
pub fn percentiles(samples: &[f64]) -> PercentileStats {
    if samples.is_empty() {
        return PercentileStats::default();
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let n = sorted.len();
    PercentileStats {
        count: n,
        min: sorted[0],
        max: sorted[n - 1],
        mean: samples.iter().sum::<f64>() / n as f64,
        median: median(&sorted),
        p50: percentile(&sorted, 50.0),
        p95: percentile(&sorted, 95.0),
        p99: percentile(&sorted, 99.0),
        p99_9: percentile(&sorted, 99.9),
        p99_99: percentile(&sorted, 99.99),
    }
}

fn median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Linear-interpolation percentile over pre-sorted data.
fn percentile(sorted: &[f64], rank: f64) -> f64 {
    let pos = rank / 100.0 * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (pos - lo as f64) * (sorted[hi] - sorted[lo])
    }
}

/// Derive per-phase IOPS from run metadata. A figure is produced only
/// when its duration key is positive.
pub fn throughput(metadata: &RunMetadata) -> ThroughputStats {
    let mut stats = ThroughputStats::default();

    let warmup_duration = metadata.number("warmup_duration");
    if warmup_duration > 0.0 {
        stats.warmup_iops = Some(metadata.number("warmup_ops") / warmup_duration);
    }

    let overwrite_duration = metadata.number("overwrite_duration");
    if overwrite_duration > 0.0 {
        let total_ops = metadata.number("overwrites") + metadata.number("victim_reads");
        stats.overwrite_iops = Some(total_ops / overwrite_duration);
    }

    stats
}

/// Estimate the Write Amplification Factor from run metadata.
///
/// This is a documented heuristic, not a measurement: the overwrite ratio
/// stands in for GC pressure (`1.0 + ratio * 2.5`, capped at 5.0). Accurate
/// WAF needs flash-level write accounting the result files do not carry, so
/// the value must stay labeled an estimate wherever it is reported.
pub fn write_amplification(metadata: &RunMetadata) -> f64 {
    let overwrites = metadata.number("overwrites");
    let host_writes = metadata.number("warmup_ops")
        + metadata.number("victim_writes")
        + metadata.number("noisy_writes")
        + overwrites;

    if host_writes == 0.0 || overwrites <= 0.0 {
        return 1.0;
    }
    let estimate = 1.0 + (overwrites / host_writes) * 2.5;
    estimate.min(5.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MetaValue;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn meta(pairs: &[(&str, f64)]) -> RunMetadata {
        let mut m = RunMetadata::default();
        for (k, v) in pairs {
            m.insert(k, MetaValue::Float(*v));
        }
        m
    }

    #[test]
    fn empty_input_returns_zero_sentinel() {
        let stats = percentiles(&[]);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.min, 0.0);
        assert_eq!(stats.max, 0.0);
        assert_eq!(stats.mean, 0.0);
        assert_eq!(stats.median, 0.0);
        assert_eq!(stats.p50, 0.0);
        assert_eq!(stats.p95, 0.0);
        assert_eq!(stats.p99, 0.0);
        assert_eq!(stats.p99_9, 0.0);
        assert_eq!(stats.p99_99, 0.0);
    }

    #[test]
    fn p50_matches_median() {
        let odd = [5.0, 1.0, 9.0, 3.0, 7.0];
        let even = [40.0, 10.0, 20.0, 30.0];
        for samples in [&odd[..], &even[..]] {
            let stats = percentiles(samples);
            assert!(close(stats.p50, stats.median), "p50 {} != median {}", stats.p50, stats.median);
        }
    }

    #[test]
    fn interpolated_percentiles_match_reference() {
        // 10, 20, ..., 1000
        let samples: Vec<f64> = (1..=100).map(|i| (i * 10) as f64).collect();
        let stats = percentiles(&samples);
        assert_eq!(stats.count, 100);
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 1000.0);
        assert!(close(stats.mean, 505.0));
        assert!(close(stats.median, 505.0));
        assert!(close(stats.p95, 950.5));
        assert!(close(stats.p99, 990.1));
        assert!(close(stats.p99_9, 999.01));
        assert!(close(stats.p99_99, 999.901));
    }

    #[test]
    fn single_sample_is_its_own_percentile() {
        let stats = percentiles(&[42.0]);
        assert_eq!(stats.count, 1);
        assert!(close(stats.p99_99, 42.0));
        assert!(close(stats.median, 42.0));
    }

    #[test]
    fn warmup_iops_needs_positive_duration() {
        let stats = throughput(&meta(&[("warmup_ops", 1000.0), ("warmup_duration", 10.0)]));
        assert_eq!(stats.warmup_iops, Some(100.0));

        let stats = throughput(&meta(&[("warmup_ops", 1000.0), ("warmup_duration", 0.0)]));
        assert_eq!(stats.warmup_iops, None);

        let stats = throughput(&meta(&[("warmup_ops", 1000.0)]));
        assert_eq!(stats, ThroughputStats::default());
    }

    #[test]
    fn overwrite_iops_counts_victim_reads_with_zero_default() {
        let stats = throughput(&meta(&[
            ("overwrites", 800.0),
            ("victim_reads", 200.0),
            ("overwrite_duration", 10.0),
        ]));
        assert_eq!(stats.overwrite_iops, Some(100.0));

        let stats = throughput(&meta(&[("overwrites", 1000.0), ("overwrite_duration", 10.0)]));
        assert_eq!(stats.overwrite_iops, Some(100.0));
    }

    #[test]
    fn waf_is_one_without_host_writes() {
        assert_eq!(write_amplification(&meta(&[])), 1.0);
        assert_eq!(
            write_amplification(&meta(&[("overwrites", 0.0), ("warmup_ops", 0.0)])),
            1.0
        );
    }

    #[test]
    fn waf_is_one_without_overwrites() {
        let m = meta(&[("warmup_ops", 500.0), ("victim_writes", 100.0)]);
        assert_eq!(write_amplification(&m), 1.0);
    }

    #[test]
    fn waf_stays_within_bounds() {
        let cases = [
            meta(&[("overwrites", 1000.0)]),
            meta(&[("overwrites", 1000.0), ("warmup_ops", 1000.0)]),
            meta(&[
                ("overwrites", 5.0),
                ("warmup_ops", 100000.0),
                ("noisy_writes", 250.0),
            ]),
        ];
        for m in &cases {
            let waf = write_amplification(m);
            assert!((1.0..=5.0).contains(&waf), "waf {waf} out of range");
        }
        // all writes are overwrites: ratio 1.0 -> 3.5
        assert!(close(write_amplification(&cases[0]), 3.5));
    }
}
