use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Metadata value parsed from a `key=value` line.
///
/// Coercion order: a value containing a `.` is tried as a float, anything
/// else as an integer, and either failure falls back to keeping the raw
/// string. Coercion never errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Int(i64),
    Float(f64),
    Str(String),
}

impl MetaValue {
    pub fn coerce(raw: &str) -> MetaValue {
        if raw.contains('.') {
            if let Ok(f) = raw.trim().parse::<f64>() {
                return MetaValue::Float(f);
            }
        } else if let Ok(i) = raw.trim().parse::<i64>() {
            return MetaValue::Int(i);
        }
        MetaValue::Str(raw.to_string())
    }

    /// Numeric view; non-numeric values count as zero.
    pub fn as_f64(&self) -> f64 {
        match self {
            MetaValue::Int(i) => *i as f64,
            MetaValue::Float(f) => *f,
            MetaValue::Str(_) => 0.0,
        }
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Int(i) => write!(f, "{i}"),
            // Floats always render with a fractional part (10.0, not 10)
            MetaValue::Float(v) if v.fract() == 0.0 => write!(f, "{v:.1}"),
            MetaValue::Float(v) => write!(f, "{v}"),
            MetaValue::Str(s) => f.write_str(s),
        }
    }
}

/// Key/value metadata for one test run, loaded from `metadata.txt`.
/// No key is required; absent keys default at the point of use.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunMetadata {
    entries: BTreeMap<String, MetaValue>,
}

impl RunMetadata {
    pub fn insert(&mut self, key: &str, value: MetaValue) {
        self.entries.insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.entries.get(key)
    }

    /// Numeric accessor: 0.0 when the key is absent or non-numeric.
    pub fn number(&self, key: &str) -> f64 {
        self.entries.get(key).map_or(0.0, MetaValue::as_f64)
    }
}

/// The five fixed phases of a QoS test run, in execution order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Warmup,
    VictimWrite,
    NoisyWrite,
    Overwrite,
    VictimRead,
}

impl Phase {
    pub const ALL: [Phase; 5] = [
        Phase::Warmup,
        Phase::VictimWrite,
        Phase::NoisyWrite,
        Phase::Overwrite,
        Phase::VictimRead,
    ];

    /// Fixed per-phase latency sample file name inside a run directory.
    pub fn sample_file(self) -> &'static str {
        match self {
            Phase::Warmup => "warmup_latencies.txt",
            Phase::VictimWrite => "victim_write_latencies.txt",
            Phase::NoisyWrite => "noisy_write_latencies.txt",
            Phase::Overwrite => "overwrite_latencies.txt",
            Phase::VictimRead => "victim_read_latencies.txt",
        }
    }
}

/// Per-phase latency samples (microseconds). Every phase is present;
/// a missing or empty sample file yields an empty vector.
#[derive(Debug, Clone, Default)]
pub struct SampleSet {
    phases: BTreeMap<Phase, Vec<f64>>,
}

impl SampleSet {
    pub fn insert(&mut self, phase: Phase, samples: Vec<f64>) {
        self.phases.insert(phase, samples);
    }

    pub fn get(&self, phase: Phase) -> &[f64] {
        self.phases.get(&phase).map_or(&[], Vec::as_slice)
    }
}

/// Distributional statistics for one phase's samples.
///
/// Invariant: `count == 0` means every other field is exactly 0.0. The
/// zero sentinel stands in for "no data" so callers only need to check
/// `count` before treating the values as real.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PercentileStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub p50: f64,
    pub p95: f64,
    pub p99: f64,
    #[serde(rename = "p99.9")]
    pub p99_9: f64,
    #[serde(rename = "p99.99")]
    pub p99_99: f64,
}

/// Derived throughput figures; a field is present only when its duration
/// metadata was positive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ThroughputStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warmup_iops: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overwrite_iops: Option<f64>,
}

/// Everything derived from one run directory. Immutable once built;
/// `latencies` holds only phases that actually had samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub name: String,
    pub duration: MetaValue,
    pub throughput: ThroughputStats,
    pub waf: f64,
    pub latencies: BTreeMap<Phase, PercentileStats>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coercion_follows_float_int_string_order() {
        assert_eq!(MetaValue::coerce("run1"), MetaValue::Str("run1".to_string()));
        assert_eq!(MetaValue::coerce("500"), MetaValue::Int(500));
        assert_eq!(MetaValue::coerce("5.0"), MetaValue::Float(5.0));
        assert_eq!(MetaValue::coerce("-3"), MetaValue::Int(-3));
        // contains a dot but is not a float: stays a string
        assert_eq!(
            MetaValue::coerce("1.2.3"),
            MetaValue::Str("1.2.3".to_string())
        );
    }

    #[test]
    fn coercion_tolerates_surrounding_whitespace() {
        assert_eq!(MetaValue::coerce(" 7 "), MetaValue::Int(7));
        assert_eq!(MetaValue::coerce(" 2.5 "), MetaValue::Float(2.5));
    }

    #[test]
    fn non_numeric_values_read_as_zero() {
        assert_eq!(MetaValue::Str("x".to_string()).as_f64(), 0.0);
        assert_eq!(MetaValue::Int(4).as_f64(), 4.0);
        assert_eq!(MetaValue::Float(2.5).as_f64(), 2.5);

        let meta = RunMetadata::default();
        assert_eq!(meta.number("absent"), 0.0);
    }

    #[test]
    fn display_keeps_float_fraction() {
        assert_eq!(MetaValue::Int(300).to_string(), "300");
        assert_eq!(MetaValue::Float(10.0).to_string(), "10.0");
        assert_eq!(MetaValue::Float(10.5).to_string(), "10.5");
        assert_eq!(MetaValue::Str("run1".to_string()).to_string(), "run1");
    }

    #[test]
    fn sample_set_defaults_to_empty_slice() {
        let set = SampleSet::default();
        assert!(set.get(Phase::VictimRead).is_empty());
    }
}
