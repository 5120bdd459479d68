use crate::model::Phase;
use crate::summary::AnalyzedRun;
use crate::{plots, report, storage, summary};
use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "fdp-qos-cli",
    version,
    about = "Compare latency results from a baseline run and an FDP-isolated run"
)]
pub struct Cli {
    /// Directory with the baseline (no FDP) test results
    pub baseline_dir: PathBuf,

    /// Directory with the FDP-isolated test results
    pub treatment_dir: PathBuf,

    /// Directory for the report and chart artifacts
    #[arg(long, default_value = "analysis_results")]
    pub output_dir: PathBuf,

    /// Export both run summaries as JSON
    #[arg(long)]
    pub export_json: Option<PathBuf>,

    /// Skip chart rendering (report and export are still produced)
    #[arg(long)]
    pub skip_plots: bool,
}

/// Run the whole analysis batch: validate, load, summarize, report, plot.
/// Progress goes to stderr; stdout stays quiet.
pub fn run(args: Cli) -> Result<()> {
    // Directory checks come before any loading
    if !args.baseline_dir.is_dir() {
        bail!("NO FDP directory not found: {}", args.baseline_dir.display());
    }
    if !args.treatment_dir.is_dir() {
        bail!(
            "WITH FDP directory not found: {}",
            args.treatment_dir.display()
        );
    }

    let heavy = "=".repeat(80);
    eprintln!("\n{heavy}");
    eprintln!("FDP QoS ANALYSIS PIPELINE");
    eprintln!("{heavy}\n");

    eprintln!("Loading test results...");
    let baseline = summary::analyze_run(&args.baseline_dir)
        .with_context(|| format!("analyze baseline run: {}", args.baseline_dir.display()))?;
    let treatment = summary::analyze_run(&args.treatment_dir)
        .with_context(|| format!("analyze treatment run: {}", args.treatment_dir.display()))?;

    eprintln!("✓ Test 1 (NO FDP):  {} victim reads", victim_reads(&baseline));
    eprintln!("✓ Test 2 (WITH FDP): {} victim reads\n", victim_reads(&treatment));

    storage::ensure_output_dir(&args.output_dir)?;

    let rendered = report::render(&baseline.summary, &treatment.summary);
    let report_path = storage::write_report(&args.output_dir, &rendered)?;
    eprintln!("✓ Analysis report saved: {}", report_path.display());
    let mut artifacts = vec![report_path];

    if let Some(path) = args.export_json.as_deref() {
        storage::export_json(path, &baseline.summary, &treatment.summary)?;
        eprintln!("✓ JSON summary saved: {}", path.display());
    }

    if !args.skip_plots {
        eprintln!("\nGenerating visualizations...\n");
        let charts = plots::render_all(&baseline, &treatment, &args.output_dir)?;
        for path in &charts {
            eprintln!("✓ Chart saved: {}", path.display());
        }
        artifacts.extend(charts);
    }

    eprintln!("\n{heavy}");
    eprintln!("ANALYSIS COMPLETE!");
    eprintln!("{heavy}");
    eprintln!("\nAll results saved to: {}/", args.output_dir.display());
    eprintln!("\nGenerated files:");
    for path in &artifacts {
        if let Some(name) = path.file_name() {
            eprintln!("  - {}", name.to_string_lossy());
        }
    }
    eprintln!();

    Ok(())
}

fn victim_reads(run: &AnalyzedRun) -> usize {
    run.summary
        .latencies
        .get(&Phase::VictimRead)
        .map_or(0, |stats| stats.count)
}
