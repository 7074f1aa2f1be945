use crate::output::print_json;
use anyhow::Context;
use chrono::Utc;
use clap::Subcommand;
use dmaic_core::{
    project::Project,
    state::{ActionKind, State},
    types::{Phase, PhaseStatus},
};
use std::path::Path;
use std::str::FromStr;

#[derive(Subcommand)]
pub enum PhaseSubcommand {
    /// Start a phase (requires the previous phase to be completed)
    Start {
        slug: String,
        phase: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Complete an in-progress phase and advance the project
    Complete {
        slug: String,
        phase: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Show the five-phase board for a project
    Status { slug: String },
}

pub fn run(
    root: &Path,
    subcmd: PhaseSubcommand,
    json: bool,
    user: Option<&str>,
) -> anyhow::Result<()> {
    match subcmd {
        PhaseSubcommand::Start { slug, phase, notes } => {
            start(root, &slug, &phase, notes, json, user)
        }
        PhaseSubcommand::Complete { slug, phase, notes } => {
            complete(root, &slug, &phase, notes, json, user)
        }
        PhaseSubcommand::Status { slug } => status(root, &slug, json),
    }
}

fn start(
    root: &Path,
    slug: &str,
    phase_str: &str,
    notes: Option<String>,
    json: bool,
    user: Option<&str>,
) -> anyhow::Result<()> {
    let phase = Phase::from_str(phase_str).with_context(|| format!("unknown phase: {phase_str}"))?;
    let mut project =
        Project::load(root, slug).with_context(|| format!("project '{slug}' not found"))?;

    project
        .start_phase(phase, Utc::now().date_naive(), notes)
        .with_context(|| format!("cannot start phase '{phase}' of '{slug}'"))?;
    project.save(root).context("failed to save project")?;

    let mut state = State::load(root).context("failed to load state")?;
    state.record_action(
        slug,
        ActionKind::StartPhase,
        Some(phase),
        user.map(str::to_string),
        "started",
    );
    state.save(root).context("failed to save state")?;

    if json {
        print_json(&serde_json::json!({
            "slug": slug,
            "phase": phase.to_string(),
            "status": "in_progress",
        }))?;
    } else {
        println!("Started {} phase of '{slug}'", phase.label());
    }
    Ok(())
}

fn complete(
    root: &Path,
    slug: &str,
    phase_str: &str,
    notes: Option<String>,
    json: bool,
    user: Option<&str>,
) -> anyhow::Result<()> {
    let phase = Phase::from_str(phase_str).with_context(|| format!("unknown phase: {phase_str}"))?;
    let mut project =
        Project::load(root, slug).with_context(|| format!("project '{slug}' not found"))?;

    project
        .complete_phase(phase, Utc::now().date_naive(), notes)
        .with_context(|| format!("cannot complete phase '{phase}' of '{slug}'"))?;
    project.save(root).context("failed to save project")?;

    let mut state = State::load(root).context("failed to load state")?;
    state.record_action(
        slug,
        ActionKind::CompletePhase,
        Some(phase),
        user.map(str::to_string),
        "completed",
    );
    state.save(root).context("failed to save state")?;

    if json {
        print_json(&serde_json::json!({
            "slug": slug,
            "phase": phase.to_string(),
            "status": "completed",
            "current_phase": project.current_phase.to_string(),
        }))?;
    } else {
        println!("Completed {} phase of '{slug}'", phase.label());
        if project.current_phase != phase {
            println!(
                "Project advanced to {} — start it with: dmaic phase start {slug} {}",
                project.current_phase.label(),
                project.current_phase
            );
        }
    }
    Ok(())
}

fn status(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    let project =
        Project::load(root, slug).with_context(|| format!("project '{slug}' not found"))?;

    if json {
        let board: Vec<_> = Phase::all()
            .iter()
            .map(|&phase| {
                let record = project.phase_record(phase);
                serde_json::json!({
                    "phase": phase.to_string(),
                    "status": project.phase_status(phase).to_string(),
                    "start_date": record.and_then(|r| r.start_date),
                    "completion_date": record.and_then(|r| r.completion_date),
                    "notes": record.and_then(|r| r.notes.clone()),
                    "can_start": project.can_start(phase).is_ok(),
                    "can_complete": project.can_complete(phase).is_ok(),
                })
            })
            .collect();
        print_json(&serde_json::json!({
            "slug": project.slug,
            "current_phase": project.current_phase.to_string(),
            "phases": board,
        }))?;
        return Ok(());
    }

    println!("Project: {} — {}", project.slug, project.title);
    if let Some(remaining) = project.days_remaining(Utc::now().date_naive()) {
        println!("Target:  {} days remaining", remaining);
    }
    println!();

    for &phase in Phase::all() {
        let status = project.phase_status(phase);
        let marker = match status {
            PhaseStatus::Completed => "[x]",
            PhaseStatus::InProgress => "[>]",
            PhaseStatus::NotStarted => "[ ]",
        };
        let current = if project.current_phase == phase {
            "  <- current"
        } else {
            ""
        };
        println!("{marker} {:<8} {}{current}", phase.label(), status);

        if let Some(record) = project.phase_record(phase) {
            if let Some(d) = record.start_date {
                println!("    started:   {d}");
            }
            if let Some(d) = record.completion_date {
                println!("    completed: {d}");
            }
            if let Some(ref notes) = record.notes {
                println!("    notes:     {notes}");
            }
        }
    }
    Ok(())
}
