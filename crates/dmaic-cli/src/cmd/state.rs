use crate::output::{print_json, print_table};
use anyhow::Context;
use dmaic_core::{project::Project, state::State};
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let state = State::load(root).context("failed to load state")?;
    let projects = Project::list(root).context("failed to list projects")?;

    if json {
        let summary = serde_json::json!({
            "workspace": state.workspace,
            "projects": projects
                .iter()
                .map(|p| {
                    serde_json::json!({
                        "slug": p.slug,
                        "title": p.title,
                        "status": p.status.to_string(),
                        "current_phase": p.current_phase.to_string(),
                    })
                })
                .collect::<Vec<_>>(),
            "recent_history": state.history.iter().rev().take(10).collect::<Vec<_>>(),
        });
        print_json(&summary)?;
        return Ok(());
    }

    println!("Workspace: {}", state.workspace);
    println!("Projects:  {}", projects.len());
    println!();

    if !projects.is_empty() {
        let rows: Vec<Vec<String>> = projects
            .iter()
            .map(|p| {
                vec![
                    p.slug.clone(),
                    p.current_phase.to_string(),
                    p.status.to_string(),
                    format!("{}/5 phases", p.completed_phase_count()),
                ]
            })
            .collect();
        print_table(&["SLUG", "PHASE", "STATUS", "PROGRESS"], rows);
        println!();
    }

    if !state.history.is_empty() {
        println!("Recent activity:");
        for entry in state.history.iter().rev().take(10) {
            let actor = entry.actor.as_deref().unwrap_or("-");
            let phase = entry
                .phase
                .map(|p| format!(" [{p}]"))
                .unwrap_or_default();
            println!(
                "  {} {} {}{} — {} ({actor})",
                entry.timestamp.format("%Y-%m-%d %H:%M"),
                entry.project,
                entry.action,
                phase,
                entry.outcome,
            );
        }
    }
    Ok(())
}
