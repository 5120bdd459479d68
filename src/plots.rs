//! Chart rendering: a thin adapter from the analysis numbers to PNG files.

use crate::model::{PercentileStats, Phase};
use crate::summary::AnalyzedRun;
use anyhow::{Context, Result};
use plotters::chart::ChartContext;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::{Path, PathBuf};

const WIDE: (u32, u32) = (1000, 600);
const NARROW: (u32, u32) = (800, 600);
const FONT: &str = "sans-serif";
const BASELINE_COLOR: RGBColor = RGBColor(0xd6, 0x27, 0x28);
const TREATMENT_COLOR: RGBColor = RGBColor(0x2c, 0xa0, 0x2c);
const BASELINE_LABEL: &str = "Without FDP";
const TREATMENT_LABEL: &str = "With FDP (Isolated)";

type Chart2d<'a, 'b> = ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Render every chart the loaded data supports and return the written paths.
pub fn render_all(
    baseline: &AnalyzedRun,
    treatment: &AnalyzedRun,
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    let b_stats = baseline.summary.latencies.get(&Phase::VictimRead);
    let t_stats = treatment.summary.latencies.get(&Phase::VictimRead);
    if let (Some(b), Some(t)) = (b_stats, t_stats) {
        let path = out_dir.join("cdf_victim_read.png");
        cdf_chart(
            baseline.samples.get(Phase::VictimRead),
            treatment.samples.get(Phase::VictimRead),
            &path,
        )
        .with_context(|| format!("render chart: {}", path.display()))?;
        written.push(path);

        let path = out_dir.join("tail_latency_comparison.png");
        tail_latency_chart(b, t, &path)
            .with_context(|| format!("render chart: {}", path.display()))?;
        written.push(path);
    }

    let path = out_dir.join("waf_comparison.png");
    waf_chart(baseline.summary.waf, treatment.summary.waf, &path)
        .with_context(|| format!("render chart: {}", path.display()))?;
    written.push(path);

    if let (Some(b_iops), Some(t_iops)) = (
        baseline.summary.throughput.overwrite_iops,
        treatment.summary.throughput.overwrite_iops,
    ) {
        let path = out_dir.join("throughput_comparison.png");
        throughput_chart(b_iops, t_iops, &path)
            .with_context(|| format!("render chart: {}", path.display()))?;
        written.push(path);
    } else {
        eprintln!("⚠ No throughput data available");
    }

    Ok(written)
}

fn bar(chart: &mut Chart2d, x0: f64, x1: f64, value: f64, color: RGBColor) -> Result<()> {
    chart.draw_series(std::iter::once(Rectangle::new(
        [(x0, 0.0), (x1, value)],
        color.mix(0.8).filled(),
    )))?;
    Ok(())
}

fn label_above(chart: &mut Chart2d, x: f64, y: f64, text: String, size: i32) -> Result<()> {
    let style = TextStyle::from((FONT, size)).pos(Pos::new(HPos::Center, VPos::Bottom));
    chart.draw_series(std::iter::once(Text::new(text, (x, y), style)))?;
    Ok(())
}

/// Empirical CDF of victim-read latency for both runs, with guide lines at
/// the tail percentiles. A run with no samples contributes no series.
fn cdf_chart(baseline: &[f64], treatment: &[f64], path: &Path) -> Result<()> {
    let root = BitMapBackend::new(path, WIDE).into_drawing_area();
    root.fill(&WHITE)?;

    let max_x = baseline
        .iter()
        .chain(treatment.iter())
        .cloned()
        .fold(1.0f64, f64::max);
    let mut chart = ChartBuilder::on(&root)
        .caption("Victim Read Latency CDF", (FONT, 28))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d(0.0..max_x * 1.02, 0.0..1.02f64)?;
    chart
        .configure_mesh()
        .x_desc("Latency (μs)")
        .y_desc("CDF")
        .label_style((FONT, 14))
        .draw()?;

    for (samples, color, label) in [
        (baseline, BASELINE_COLOR, BASELINE_LABEL),
        (treatment, TREATMENT_COLOR, TREATMENT_LABEL),
    ] {
        if samples.is_empty() {
            continue;
        }
        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let n = sorted.len() as f64;
        let points: Vec<(f64, f64)> = sorted
            .iter()
            .enumerate()
            .map(|(i, &v)| (v, (i + 1) as f64 / n))
            .collect();
        chart
            .draw_series(LineSeries::new(points, color.stroke_width(2)))?
            .label(label)
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
    }

    for (guide, tag) in [(0.95, "P95"), (0.99, "P99"), (0.999, "P99.9")] {
        chart.draw_series(LineSeries::new(
            vec![(0.0, guide), (max_x * 1.02, guide)],
            BLACK.mix(0.3),
        ))?;
        chart.draw_series(std::iter::once(Text::new(
            tag,
            (max_x * 0.02, guide + 0.005),
            (FONT, 12),
        )))?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

/// Grouped bars over the tail percentiles of victim-read latency, with the
/// improvement percentage annotated per group when both values are present.
fn tail_latency_chart(
    baseline: &PercentileStats,
    treatment: &PercentileStats,
    path: &Path,
) -> Result<()> {
    let metrics: [(&str, fn(&PercentileStats) -> f64); 4] = [
        ("P50", |s| s.p50),
        ("P95", |s| s.p95),
        ("P99", |s| s.p99),
        ("P99.9", |s| s.p99_9),
    ];

    let root = BitMapBackend::new(path, WIDE).into_drawing_area();
    root.fill(&WHITE)?;

    let max_y = metrics
        .iter()
        .map(|(_, get)| get(baseline).max(get(treatment)))
        .fold(1.0f64, f64::max);
    let mut chart = ChartBuilder::on(&root)
        .caption("Tail Latency Comparison (Victim Reads)", (FONT, 28))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d(-0.5f64..3.5f64, 0.0..max_y * 1.25)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(8)
        .x_label_formatter(&|x| group_label(*x, &["P50", "P95", "P99", "P99.9"]))
        .x_desc("Percentile")
        .y_desc("Latency (μs)")
        .label_style((FONT, 14))
        .draw()?;

    chart
        .draw_series(metrics.iter().enumerate().map(|(i, (_, get))| {
            let x = i as f64;
            Rectangle::new([(x - 0.35, 0.0), (x, get(baseline))], BASELINE_COLOR.mix(0.8).filled())
        }))?
        .label(BASELINE_LABEL)
        .legend(|(x, y)| {
            Rectangle::new([(x, y - 5), (x + 14, y + 5)], BASELINE_COLOR.mix(0.8).filled())
        });
    chart
        .draw_series(metrics.iter().enumerate().map(|(i, (_, get))| {
            let x = i as f64;
            Rectangle::new([(x, 0.0), (x + 0.35, get(treatment))], TREATMENT_COLOR.mix(0.8).filled())
        }))?
        .label(TREATMENT_LABEL)
        .legend(|(x, y)| {
            Rectangle::new([(x, y - 5), (x + 14, y + 5)], TREATMENT_COLOR.mix(0.8).filled())
        });

    for (i, (_, get)) in metrics.iter().enumerate() {
        let x = i as f64;
        let b_val = get(baseline);
        let t_val = get(treatment);
        if b_val > 0.0 {
            label_above(&mut chart, x - 0.175, b_val, format!("{b_val:.0}"), 12)?;
        }
        if t_val > 0.0 {
            label_above(&mut chart, x + 0.175, t_val, format!("{t_val:.0}"), 12)?;
        }
        if b_val > 0.0 && t_val > 0.0 {
            let improvement = (b_val - t_val) / b_val * 100.0;
            label_above(
                &mut chart,
                x,
                b_val.max(t_val) * 1.1,
                format!("{improvement:+.1}%"),
                14,
            )?;
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

fn waf_chart(baseline_waf: f64, treatment_waf: f64, path: &Path) -> Result<()> {
    let root = BitMapBackend::new(path, NARROW).into_drawing_area();
    root.fill(&WHITE)?;

    let max_y = baseline_waf.max(treatment_waf);
    let mut chart = ChartBuilder::on(&root)
        .caption("Write Amplification Comparison (Estimated)", (FONT, 28))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d(-0.5f64..1.5f64, 0.0..max_y * 1.3)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(4)
        .x_label_formatter(&|x| group_label(*x, &["Without FDP", "With FDP"]))
        .y_desc("Write Amplification Factor (WAF)")
        .label_style((FONT, 14))
        .draw()?;

    bar(&mut chart, -0.3, 0.3, baseline_waf, BASELINE_COLOR)?;
    bar(&mut chart, 0.7, 1.3, treatment_waf, TREATMENT_COLOR)?;
    label_above(&mut chart, 0.0, baseline_waf, format!("{baseline_waf:.2}x"), 16)?;
    label_above(&mut chart, 1.0, treatment_waf, format!("{treatment_waf:.2}x"), 16)?;

    // baseline WAF is always >= 1.0
    let reduction = (baseline_waf - treatment_waf) / baseline_waf * 100.0;
    label_above(
        &mut chart,
        0.5,
        max_y * 1.2,
        format!("Reduction: {reduction:.1}%"),
        16,
    )?;

    root.present()?;
    Ok(())
}

fn throughput_chart(baseline_iops: f64, treatment_iops: f64, path: &Path) -> Result<()> {
    let root = BitMapBackend::new(path, NARROW).into_drawing_area();
    root.fill(&WHITE)?;

    let max_y = baseline_iops.max(treatment_iops).max(1.0);
    let mut chart = ChartBuilder::on(&root)
        .caption("Throughput Comparison", (FONT, 28))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d(-1.0f64..1.0f64, 0.0..max_y * 1.2)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(3)
        .x_label_formatter(&|x| group_label(*x, &["Overwrite Phase"]))
        .y_desc("Throughput (IOPS)")
        .label_style((FONT, 14))
        .draw()?;

    chart
        .draw_series(std::iter::once(Rectangle::new(
            [(-0.35, 0.0), (0.0, baseline_iops)],
            BASELINE_COLOR.mix(0.8).filled(),
        )))?
        .label(BASELINE_LABEL)
        .legend(|(x, y)| {
            Rectangle::new([(x, y - 5), (x + 14, y + 5)], BASELINE_COLOR.mix(0.8).filled())
        });
    chart
        .draw_series(std::iter::once(Rectangle::new(
            [(0.0, 0.0), (0.35, treatment_iops)],
            TREATMENT_COLOR.mix(0.8).filled(),
        )))?
        .label(TREATMENT_LABEL)
        .legend(|(x, y)| {
            Rectangle::new([(x, y - 5), (x + 14, y + 5)], TREATMENT_COLOR.mix(0.8).filled())
        });

    label_above(&mut chart, -0.175, baseline_iops, format!("{baseline_iops:.0}"), 14)?;
    label_above(&mut chart, 0.175, treatment_iops, format!("{treatment_iops:.0}"), 14)?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

/// Tick label for grouped bar charts: text at the integer group centers,
/// blank everywhere else.
fn group_label(x: f64, labels: &[&str]) -> String {
    let idx = x.round();
    if (x - idx).abs() < 0.01 && idx >= 0.0 && (idx as usize) < labels.len() {
        labels[idx as usize].to_string()
    } else {
        String::new()
    }
}
