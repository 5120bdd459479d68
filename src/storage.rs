//! Output artifacts: the report file and the optional JSON summary export.

use crate::model::RunSummary;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

#[derive(Serialize)]
struct ExportEnvelope<'a> {
    generated_utc: String,
    baseline: &'a RunSummary,
    treatment: &'a RunSummary,
}

pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("create output directory: {}", dir.display()))
}

pub fn write_report(dir: &Path, report: &str) -> Result<PathBuf> {
    let path = dir.join("analysis_report.txt");
    fs::write(&path, report).with_context(|| format!("write report: {}", path.display()))?;
    Ok(path)
}

/// Pretty-printed JSON envelope with both summaries and a UTC timestamp.
pub fn export_json(path: &Path, baseline: &RunSummary, treatment: &RunSummary) -> Result<()> {
    let generated_utc = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("format export timestamp")?;
    let envelope = ExportEnvelope {
        generated_utc,
        baseline,
        treatment,
    };
    let json = serde_json::to_string_pretty(&envelope).context("serialize summary export")?;
    fs::write(path, json).with_context(|| format!("write JSON export: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MetaValue, PercentileStats, Phase, ThroughputStats};
    use std::collections::BTreeMap;

    fn summary() -> RunSummary {
        let mut latencies = BTreeMap::new();
        latencies.insert(
            Phase::VictimRead,
            PercentileStats {
                count: 3,
                min: 1.0,
                max: 3.0,
                mean: 2.0,
                median: 2.0,
                p50: 2.0,
                p95: 2.9,
                p99: 2.98,
                p99_9: 2.998,
                p99_99: 2.9998,
            },
        );
        RunSummary {
            name: "run1".to_string(),
            duration: MetaValue::Int(300),
            throughput: ThroughputStats {
                warmup_iops: None,
                overwrite_iops: Some(100.0),
            },
            waf: 3.5,
            latencies,
        }
    }

    #[test]
    fn export_envelope_is_valid_json() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("summary.json");
        export_json(&path, &summary(), &summary())?;

        let raw = fs::read_to_string(&path)?;
        let value: serde_json::Value = serde_json::from_str(&raw)?;
        assert!(value["generated_utc"].is_string());
        assert_eq!(value["baseline"]["waf"], 3.5);
        assert_eq!(
            value["treatment"]["latencies"]["victim_read"]["p99.9"],
            2.998
        );
        // warmup_iops was None and must not be serialized
        assert!(value["baseline"]["throughput"]
            .as_object()
            .is_some_and(|tp| !tp.contains_key("warmup_iops")));
        Ok(())
    }
}
