use crate::output::{print_json, print_table};
use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use dmaic_core::{
    project::{Metric, Project},
    state::{ActionKind, State},
    types::Phase,
};
use std::path::Path;
use std::str::FromStr;

#[derive(Subcommand)]
pub enum MetricSubcommand {
    /// Record a measurement on a project
    Add {
        slug: String,
        name: String,
        value: f64,
        #[arg(long)]
        unit: Option<String>,
        /// Owning phase (define, measure, ...)
        #[arg(long)]
        phase: Option<String>,
        /// Kind of measurement (baseline, current, target, ...)
        #[arg(long = "type")]
        metric_type: Option<String>,
        /// Measurement date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// List recorded metrics, optionally filtered by phase
    List {
        slug: String,
        #[arg(long)]
        phase: Option<String>,
    },
}

pub fn run(
    root: &Path,
    subcmd: MetricSubcommand,
    json: bool,
    user: Option<&str>,
) -> anyhow::Result<()> {
    match subcmd {
        MetricSubcommand::Add {
            slug,
            name,
            value,
            unit,
            phase,
            metric_type,
            date,
            notes,
        } => add(
            root,
            &slug,
            name,
            value,
            unit,
            phase,
            metric_type,
            date,
            notes,
            json,
            user,
        ),
        MetricSubcommand::List { slug, phase } => list(root, &slug, phase.as_deref(), json),
    }
}

#[allow(clippy::too_many_arguments)]
fn add(
    root: &Path,
    slug: &str,
    name: String,
    value: f64,
    unit: Option<String>,
    phase: Option<String>,
    metric_type: Option<String>,
    date: Option<String>,
    notes: Option<String>,
    json: bool,
    user: Option<&str>,
) -> anyhow::Result<()> {
    let phase = phase
        .map(|p| Phase::from_str(&p))
        .transpose()
        .context("unknown phase")?;
    let measurement_date = date
        .map(|d| {
            NaiveDate::from_str(&d).with_context(|| format!("invalid date '{d}': expected YYYY-MM-DD"))
        })
        .transpose()?;

    let mut project =
        Project::load(root, slug).with_context(|| format!("project '{slug}' not found"))?;
    let metric = Metric {
        name: name.clone(),
        metric_type,
        value,
        unit,
        phase,
        measurement_date,
        notes,
        recorded_at: Utc::now(),
    };
    project.record_metric(metric.clone());
    project.save(root).context("failed to save project")?;

    let mut state = State::load(root).context("failed to load state")?;
    state.record_action(
        slug,
        ActionKind::RecordMetric,
        phase,
        user.map(str::to_string),
        &name,
    );
    state.save(root).context("failed to save state")?;

    if json {
        print_json(&metric)?;
    } else {
        println!("Recorded metric '{name}' = {value} on '{slug}'");
    }
    Ok(())
}

fn list(root: &Path, slug: &str, phase: Option<&str>, json: bool) -> anyhow::Result<()> {
    let phase = phase.map(Phase::from_str).transpose().context("unknown phase")?;
    let project =
        Project::load(root, slug).with_context(|| format!("project '{slug}' not found"))?;

    let metrics: Vec<&Metric> = project
        .metrics
        .iter()
        .filter(|m| phase.map(|p| m.phase == Some(p)).unwrap_or(true))
        .collect();

    if json {
        print_json(&metrics)?;
        return Ok(());
    }

    if metrics.is_empty() {
        println!("No metrics recorded for '{slug}'.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = metrics
        .iter()
        .map(|m| {
            vec![
                m.name.clone(),
                m.value.to_string(),
                m.unit.clone().unwrap_or_default(),
                m.phase.map(|p| p.to_string()).unwrap_or_default(),
                m.metric_type.clone().unwrap_or_default(),
            ]
        })
        .collect();
    print_table(&["NAME", "VALUE", "UNIT", "PHASE", "TYPE"], rows);
    Ok(())
}
