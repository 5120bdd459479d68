//! Loads a run directory: `metadata.txt` plus the five per-phase latency
//! sample files. Missing files are tolerated; malformed sample values are
//! fatal for the run.

use crate::model::{MetaValue, Phase, RunMetadata, SampleSet};
use anyhow::{ensure, Context, Result};
use std::fs;
use std::path::Path;

/// Raw contents of one run directory.
#[derive(Debug)]
pub struct RunData {
    pub metadata: RunMetadata,
    pub samples: SampleSet,
}

pub fn load_run(dir: &Path) -> Result<RunData> {
    Ok(RunData {
        metadata: load_metadata(dir)?,
        samples: load_samples(dir)?,
    })
}

/// Lines without `=` are skipped; the split is on the first `=` only, so
/// values may themselves contain `=`.
fn load_metadata(dir: &Path) -> Result<RunMetadata> {
    let mut metadata = RunMetadata::default();
    let path = dir.join("metadata.txt");
    if !path.exists() {
        return Ok(metadata);
    }
    let contents = fs::read_to_string(&path)
        .with_context(|| format!("read metadata file: {}", path.display()))?;
    for line in contents.lines() {
        if let Some((key, value)) = line.trim().split_once('=') {
            metadata.insert(key, MetaValue::coerce(value));
        }
    }
    Ok(metadata)
}

fn load_samples(dir: &Path) -> Result<SampleSet> {
    let mut samples = SampleSet::default();
    for phase in Phase::ALL {
        let path = dir.join(phase.sample_file());
        let values = if path.exists() {
            parse_samples(&path)?
        } else {
            Vec::new()
        };
        samples.insert(phase, values);
    }
    Ok(samples)
}

/// Whitespace/newline-delimited floats. Any non-numeric token aborts the
/// whole run; there is no partial salvage of a corrupt sample file.
fn parse_samples(path: &Path) -> Result<Vec<f64>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read latency file: {}", path.display()))?;
    contents
        .split_whitespace()
        .map(|token| {
            let value = token.parse::<f64>().with_context(|| {
                format!("malformed latency value {:?} in {}", token, path.display())
            })?;
            // f64 parsing accepts nan/inf tokens; those would poison the stats
            ensure!(
                value.is_finite(),
                "malformed latency value {:?} in {}",
                token,
                path.display()
            );
            Ok(value)
        })
        .collect()
}
