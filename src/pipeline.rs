//! End-to-end run: load, aggregate, render, assemble.

use crate::analysis::{summarize, AnalysisSettings, LeagueSummary};
use crate::chart::{self, ChartJob, ChartLimits, ChartRenderer, ChartSet};
use crate::config::Config;
use crate::error::AnalysisWarning;
use crate::loader::{DataLoader, Dataset};
use crate::report::{write_reports, ReportContext, WrittenReports};
use anyhow::{Context, Result};
use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

/// Settings for one run, resolved from config and CLI.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub matches_path: PathBuf,
    pub deliveries_path: PathBuf,
    pub output_dir: PathBuf,
    pub settings: AnalysisSettings,
    pub limits: ChartLimits,
    pub chart_size: (u32, u32),
    pub export_json: bool,
    pub title: String,
    pub subtitle: String,
    pub show_progress: bool,
}

impl PipelineOptions {
    pub fn from_config(config: &Config, show_progress: bool) -> Self {
        Self {
            matches_path: config.data.matches_path(),
            deliveries_path: config.data.deliveries_path(),
            output_dir: PathBuf::from(&config.output.dir),
            settings: AnalysisSettings {
                top_n: config.analysis.top_n,
                featured_player: config.featured_player().map(str::to_string),
            },
            limits: ChartLimits {
                cities: config.analysis.city_chart_limit,
                rankings: config.analysis.ranking_chart_limit,
            },
            chart_size: (config.charts.width, config.charts.height),
            export_json: config.output.export_json,
            title: config.report.title.clone(),
            subtitle: config.report.subtitle.clone(),
            show_progress,
        }
    }

    pub fn loader(&self) -> DataLoader {
        DataLoader::new(&self.matches_path, &self.deliveries_path)
    }
}

/// State carried from one stage to the next.
#[derive(Debug)]
pub struct PipelineContext {
    pub dataset: Dataset,
    pub summary: LeagueSummary,
    pub charts: ChartSet,
    pub reports: WrittenReports,
}

impl PipelineContext {
    pub fn warnings(&self) -> &[AnalysisWarning] {
        &self.summary.warnings
    }
}

/// Runs every stage in order.
pub struct Pipeline {
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(options: PipelineOptions) -> Self {
        Self { options }
    }

    pub fn run(&self) -> Result<PipelineContext> {
        let start = Instant::now();
        let opts = &self.options;

        std::fs::create_dir_all(&opts.output_dir).with_context(|| {
            format!(
                "Failed to create output directory: {}",
                opts.output_dir.display()
            )
        })?;

        info!("Stage 1/4: loading data");
        let dataset = opts.loader().load().context("Failed to load input data")?;

        info!("Stage 2/4: aggregating statistics");
        let summary = summarize(&dataset, &opts.settings);

        info!("Stage 3/4: rendering charts");
        let mut jobs = chart::league_charts(&summary, opts.limits);
        if let Some(player) = &summary.player {
            jobs.extend(chart::player_charts(&player.profile));
        }
        let charts = self.render_charts(&jobs)?;

        info!("Stage 4/4: assembling reports");
        let ctx = ReportContext {
            summary: &summary,
            charts: &charts,
            title: &opts.title,
            subtitle: &opts.subtitle,
            limits: opts.limits,
            generated_at: Local::now(),
        };
        let reports = write_reports(&ctx, &opts.output_dir, opts.export_json)
            .context("Failed to write reports")?;

        info!(
            "Run finished in {:.2}s: {} charts, {} reports, {} warnings",
            start.elapsed().as_secs_f64(),
            charts.len(),
            reports.all().len(),
            summary.warnings.len()
        );

        Ok(PipelineContext {
            dataset,
            summary,
            charts,
            reports,
        })
    }

    fn render_charts(&self, jobs: &[ChartJob]) -> Result<ChartSet> {
        let renderer = ChartRenderer::new(&self.options.output_dir, self.options.chart_size);
        let progress = self.progress_bar(jobs.len() as u64)?;

        let mut charts = ChartSet::default();
        for job in jobs {
            progress.set_message(job.file_name);
            let rendered = renderer
                .render(job.file_name, job.kind, &job.table)
                .with_context(|| format!("Failed to render chart {}", job.file_name))?;
            if rendered.placeholder {
                debug!("{} has no data, drew placeholder", rendered.file_name);
            }
            charts.insert(rendered);
            progress.inc(1);
        }
        progress.finish_and_clear();

        info!(
            "Rendered {} charts into {} ({} placeholders)",
            charts.len(),
            renderer.output_dir().display(),
            charts.placeholders().count()
        );
        Ok(charts)
    }

    fn progress_bar(&self, len: u64) -> Result<ProgressBar> {
        if !self.options.show_progress {
            return Ok(ProgressBar::hidden());
        }
        let pb = ProgressBar::new(len);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                .progress_chars("#>-"),
        );
        Ok(pb)
    }
}
