use crate::output::{print_json, print_table};
use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use dmaic_core::{
    project::Project,
    state::{ActionKind, State},
    types::ProjectStatus,
};
use std::path::Path;
use std::str::FromStr;

#[derive(Subcommand)]
pub enum ProjectSubcommand {
    /// Create a new improvement project (starts in the define phase)
    Create {
        slug: String,
        #[arg(long)]
        title: Option<String>,
        /// Optional one-liner describing the problem being worked
        #[arg(long)]
        description: Option<String>,
        /// Target completion date (YYYY-MM-DD)
        #[arg(long)]
        target: Option<String>,
    },
    /// List all projects
    List,
    /// Show project details
    Show { slug: String },
    /// Update project settings
    Update {
        slug: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,
        /// Target completion date (YYYY-MM-DD)
        #[arg(long)]
        target: Option<String>,
    },
    /// Set the project status (draft, active, on_hold, completed, cancelled)
    Status { slug: String, status: String },
    /// Delete a project and everything it owns
    Delete { slug: String },
}

pub fn run(
    root: &Path,
    subcmd: ProjectSubcommand,
    json: bool,
    user: Option<&str>,
) -> anyhow::Result<()> {
    match subcmd {
        ProjectSubcommand::Create {
            slug,
            title,
            description,
            target,
        } => create(root, &slug, title, description, target, json, user),
        ProjectSubcommand::List => list(root, json),
        ProjectSubcommand::Show { slug } => show(root, &slug, json),
        ProjectSubcommand::Update {
            slug,
            title,
            description,
            start,
            target,
        } => update(root, &slug, title, description, start, target, json, user),
        ProjectSubcommand::Status { slug, status } => set_status(root, &slug, &status, json, user),
        ProjectSubcommand::Delete { slug } => delete(root, &slug, json, user),
    }
}

fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_str(s).with_context(|| format!("invalid date '{s}': expected YYYY-MM-DD"))
}

#[allow(clippy::too_many_arguments)]
fn create(
    root: &Path,
    slug: &str,
    title: Option<String>,
    description: Option<String>,
    target: Option<String>,
    json: bool,
    user: Option<&str>,
) -> anyhow::Result<()> {
    let title = title.unwrap_or_else(|| slug.replace('-', " "));
    let mut project = Project::create(root, slug, &title)
        .with_context(|| format!("failed to create project '{slug}'"))?;
    if description.is_some() {
        project.set_description(description);
    }
    project.set_owner(user.map(str::to_string));
    if let Some(target) = target {
        project.set_dates(None, Some(parse_date(&target)?));
    }
    project.save(root).context("failed to save project")?;

    let mut state = State::load(root).context("failed to load state")?;
    state.add_project(slug);
    state.record_action(
        slug,
        ActionKind::CreateProject,
        None,
        user.map(str::to_string),
        "created",
    );
    state.save(root).context("failed to save state")?;

    if json {
        print_json(&project)?;
    } else {
        println!("Created project: {slug} — {title}");
        println!("Next: dmaic phase start {slug} define");
    }
    Ok(())
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let projects = Project::list(root).context("failed to list projects")?;

    if json {
        let summaries: Vec<_> = projects
            .iter()
            .map(|p| {
                serde_json::json!({
                    "slug": p.slug,
                    "title": p.title,
                    "status": p.status.to_string(),
                    "current_phase": p.current_phase.to_string(),
                    "phases_completed": p.completed_phase_count(),
                })
            })
            .collect();
        print_json(&summaries)?;
        return Ok(());
    }

    if projects.is_empty() {
        println!("No projects yet.");
        return Ok(());
    }

    let today = Utc::now().date_naive();
    let rows: Vec<Vec<String>> = projects
        .iter()
        .map(|p| {
            vec![
                p.slug.clone(),
                p.current_phase.to_string(),
                p.status.to_string(),
                p.days_remaining(today)
                    .map(|d| format!("{d}d"))
                    .unwrap_or_default(),
                p.title.clone(),
            ]
        })
        .collect();
    print_table(&["SLUG", "PHASE", "STATUS", "REMAINING", "TITLE"], rows);
    Ok(())
}

fn show(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    let project = Project::load(root, slug).with_context(|| format!("project '{slug}' not found"))?;

    if json {
        print_json(&project)?;
        return Ok(());
    }

    println!("Project: {} — {}", project.slug, project.title);
    if let Some(ref desc) = project.description {
        println!("Desc:    {desc}");
    }
    println!("Status:  {}", project.status);
    println!("Phase:   {}", project.current_phase);
    if let Some(ref owner) = project.owner {
        println!("Owner:   {owner}");
    }
    if let Some(target) = project.target_completion_date {
        let today = Utc::now().date_naive();
        let remaining = project.days_remaining(today).unwrap_or(0);
        println!("Target:  {target} ({remaining} days remaining)");
    }
    println!("Created: {}", project.created_at.format("%Y-%m-%d %H:%M"));

    if !project.metrics.is_empty() {
        println!("\nMetrics ({}):", project.metrics.len());
        for m in &project.metrics {
            let unit = m.unit.as_deref().unwrap_or("");
            println!("  {:<24} {} {}", m.name, m.value, unit);
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn update(
    root: &Path,
    slug: &str,
    title: Option<String>,
    description: Option<String>,
    start: Option<String>,
    target: Option<String>,
    json: bool,
    user: Option<&str>,
) -> anyhow::Result<()> {
    let mut project =
        Project::load(root, slug).with_context(|| format!("project '{slug}' not found"))?;

    if let Some(title) = title {
        project.update_title(title);
    }
    if description.is_some() {
        project.set_description(description);
    }
    let start = start.map(|s| parse_date(&s)).transpose()?;
    let target = target.map(|s| parse_date(&s)).transpose()?;
    if start.is_some() || target.is_some() {
        project.set_dates(start, target);
    }
    project.save(root).context("failed to save project")?;

    let mut state = State::load(root).context("failed to load state")?;
    state.record_action(
        slug,
        ActionKind::UpdateSettings,
        None,
        user.map(str::to_string),
        "settings updated",
    );
    state.save(root).context("failed to save state")?;

    if json {
        print_json(&project)?;
    } else {
        println!("Updated project: {slug}");
    }
    Ok(())
}

fn set_status(
    root: &Path,
    slug: &str,
    status: &str,
    json: bool,
    user: Option<&str>,
) -> anyhow::Result<()> {
    let status =
        ProjectStatus::from_str(status).with_context(|| format!("unknown status: {status}"))?;
    let mut project =
        Project::load(root, slug).with_context(|| format!("project '{slug}' not found"))?;
    project.set_status(status, Utc::now().date_naive());
    project.save(root).context("failed to save project")?;

    let mut state = State::load(root).context("failed to load state")?;
    state.record_action(
        slug,
        ActionKind::UpdateSettings,
        None,
        user.map(str::to_string),
        &format!("status -> {status}"),
    );
    state.save(root).context("failed to save state")?;

    if json {
        print_json(&serde_json::json!({ "slug": slug, "status": status.to_string() }))?;
    } else {
        println!("Project '{slug}' is now {status}");
    }
    Ok(())
}

fn delete(root: &Path, slug: &str, json: bool, user: Option<&str>) -> anyhow::Result<()> {
    Project::delete(root, slug).with_context(|| format!("project '{slug}' not found"))?;

    let mut state = State::load(root).context("failed to load state")?;
    state.remove_project(slug);
    state.record_action(
        slug,
        ActionKind::DeleteProject,
        None,
        user.map(str::to_string),
        "deleted",
    );
    state.save(root).context("failed to save state")?;

    if json {
        print_json(&serde_json::json!({ "slug": slug, "deleted": true }))?;
    } else {
        println!("Deleted project: {slug} (phases, tools, and metrics removed)");
    }
    Ok(())
}
