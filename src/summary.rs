//! Composes the loader and the statistics calculator into a per-run summary.

use crate::loader::{self, RunData};
use crate::metrics;
use crate::model::{MetaValue, Phase, RunSummary, SampleSet};
use anyhow::Result;
use std::collections::BTreeMap;
use std::path::Path;

/// A run summary plus the raw samples it was derived from. The samples are
/// kept because the CDF chart consumes the raw victim-read arrays.
pub struct AnalyzedRun {
    pub summary: RunSummary,
    pub samples: SampleSet,
}

pub fn analyze_run(dir: &Path) -> Result<AnalyzedRun> {
    let RunData { metadata, samples } = loader::load_run(dir)?;

    let mut latencies = BTreeMap::new();
    for phase in Phase::ALL {
        let data = samples.get(phase);
        if !data.is_empty() {
            latencies.insert(phase, metrics::percentiles(data));
        }
    }

    let summary = RunSummary {
        name: metadata
            .get("test_name")
            .map_or_else(|| "Unknown".to_string(), MetaValue::to_string),
        duration: metadata
            .get("test_duration")
            .cloned()
            .unwrap_or(MetaValue::Int(0)),
        throughput: metrics::throughput(&metadata),
        waf: metrics::write_amplification(&metadata),
        latencies,
    };

    Ok(AnalyzedRun { summary, samples })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ThroughputStats;
    use std::fs;

    #[test]
    fn summary_keeps_only_phases_with_samples() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        fs::write(
            tmp.path().join(Phase::VictimRead.sample_file()),
            "100 200 300\n",
        )?;
        fs::write(
            tmp.path().join("metadata.txt"),
            "test_name=baseline\ntest_duration=300\noverwrites=1000\noverwrite_duration=10\n",
        )?;

        let run = analyze_run(tmp.path())?;
        assert_eq!(run.summary.name, "baseline");
        assert_eq!(run.summary.duration, MetaValue::Int(300));
        assert_eq!(run.summary.latencies.len(), 1);
        assert_eq!(run.summary.latencies[&Phase::VictimRead].count, 3);
        assert_eq!(run.summary.throughput.overwrite_iops, Some(100.0));
        assert!((1.0..=5.0).contains(&run.summary.waf));
        assert_eq!(run.samples.get(Phase::VictimRead).len(), 3);
        Ok(())
    }

    #[test]
    fn empty_directory_yields_defaults() -> Result<()> {
        let tmp = tempfile::tempdir()?;

        let run = analyze_run(tmp.path())?;
        assert_eq!(run.summary.name, "Unknown");
        assert_eq!(run.summary.duration, MetaValue::Int(0));
        assert!(run.summary.latencies.is_empty());
        assert_eq!(run.summary.throughput, ThroughputStats::default());
        assert_eq!(run.summary.waf, 1.0);
        Ok(())
    }
}
