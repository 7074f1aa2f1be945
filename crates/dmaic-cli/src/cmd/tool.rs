use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use dmaic_core::{
    catalog,
    state::{ActionKind, State},
    tool::ToolStore,
    tool_data::ToolData,
    types::{Phase, ToolType},
};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Subcommand)]
pub enum ToolSubcommand {
    /// Save a new version of a tool document from a JSON payload
    Save {
        slug: String,
        /// Tool type (e.g. fmea, pareto, project_charter)
        tool: String,
        /// Path to the payload JSON file, or '-' for stdin
        #[arg(long)]
        data: PathBuf,
        /// What changed in this version
        #[arg(long)]
        notes: Option<String>,
    },
    /// Show the active version of a tool, or a specific historical version
    #[command(disable_version_flag = true)]
    Show {
        slug: String,
        tool: String,
        #[arg(long)]
        version: Option<u32>,
    },
    /// List all saved versions of a tool
    List { slug: String, tool: String },
    /// List the tool catalog, optionally for one phase
    Catalog {
        #[arg(long)]
        phase: Option<String>,
    },
}

pub fn run(
    root: &Path,
    subcmd: ToolSubcommand,
    json: bool,
    user: Option<&str>,
) -> anyhow::Result<()> {
    match subcmd {
        ToolSubcommand::Save {
            slug,
            tool,
            data,
            notes,
        } => save(root, &slug, &tool, &data, notes, json, user),
        ToolSubcommand::Show {
            slug,
            tool,
            version,
        } => show(root, &slug, &tool, version, json),
        ToolSubcommand::List { slug, tool } => list(root, &slug, &tool, json),
        ToolSubcommand::Catalog { phase } => show_catalog(phase.as_deref(), json),
    }
}

fn parse_tool(tool: &str) -> anyhow::Result<ToolType> {
    ToolType::from_str(tool).with_context(|| format!("unknown tool type: {tool}"))
}

fn save(
    root: &Path,
    slug: &str,
    tool: &str,
    data_path: &Path,
    notes: Option<String>,
    json: bool,
    user: Option<&str>,
) -> anyhow::Result<()> {
    let tool_type = parse_tool(tool)?;

    let raw = if data_path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(data_path)
            .with_context(|| format!("failed to read {}", data_path.display()))?
    };
    let value: serde_json::Value =
        serde_json::from_str(&raw).context("payload is not valid JSON")?;
    let data = ToolData::from_json(tool_type, value)
        .with_context(|| format!("payload does not match the '{tool_type}' schema"))?;

    let store = ToolStore::open(root, slug)?;
    let saved = store
        .save_new_version(data, notes)
        .with_context(|| format!("failed to save '{tool_type}' for '{slug}'"))?;

    let mut state = State::load(root).context("failed to load state")?;
    state.record_action(
        slug,
        ActionKind::SaveTool,
        Some(saved.phase),
        user.map(str::to_string),
        &format!("{tool_type} v{}", saved.version),
    );
    state.save(root).context("failed to save state")?;

    if json {
        print_json(&saved)?;
    } else {
        println!(
            "Saved {} v{} for '{slug}' (previous version archived)",
            saved.tool_name, saved.version
        );
    }
    Ok(())
}

fn show(
    root: &Path,
    slug: &str,
    tool: &str,
    version: Option<u32>,
    json: bool,
) -> anyhow::Result<()> {
    let tool_type = parse_tool(tool)?;
    let store = ToolStore::open(root, slug)?;
    let Some(record) = store.get_version(tool_type, version)? else {
        println!("No {} saved yet for '{slug}'.", tool_type.display_name());
        return Ok(());
    };

    if json {
        print_json(&record)?;
        return Ok(());
    }

    println!(
        "{} v{} [{}] — {}",
        record.tool_name,
        record.version,
        record.status,
        record.created_at.format("%Y-%m-%d %H:%M")
    );
    if let Some(ref notes) = record.version_notes {
        println!("Notes: {notes}");
    }
    if record.status != dmaic_core::types::ToolStatus::Active {
        println!("(historical version — read-only)");
    }
    println!();

    // Derived statistics for the analysis tools; raw document otherwise.
    match &record.data {
        ToolData::Pareto(pareto) => {
            let rows: Vec<Vec<String>> = pareto
                .ranked()
                .iter()
                .map(|r| {
                    vec![
                        r.category.clone(),
                        r.frequency.to_string(),
                        format!("{:.1}%", r.percentage),
                        format!("{:.1}%", r.cumulative_percentage),
                        if r.vital_few { "vital few".to_string() } else { String::new() },
                    ]
                })
                .collect();
            println!("{}", pareto.analysis_title);
            print_table(&["CATEGORY", "FREQ", "PCT", "CUM PCT", ""], rows);
        }
        ToolData::Fmea(fmea) => {
            let rows: Vec<Vec<String>> = fmea
                .items
                .iter()
                .map(|i| {
                    vec![
                        i.process_step.clone(),
                        i.potential_failure.clone(),
                        i.severity.to_string(),
                        i.occurrence.to_string(),
                        i.detection.to_string(),
                        i.rpn().to_string(),
                    ]
                })
                .collect();
            println!("{}", fmea.process_name);
            print_table(&["STEP", "FAILURE MODE", "S", "O", "D", "RPN"], rows);
        }
        data => {
            print!("{}", serde_yaml::to_string(data)?);
        }
    }
    Ok(())
}

fn list(root: &Path, slug: &str, tool: &str, json: bool) -> anyhow::Result<()> {
    let tool_type = parse_tool(tool)?;
    let store = ToolStore::open(root, slug)?;
    let versions = store.list_versions(tool_type)?;

    if json {
        let summaries: Vec<_> = versions
            .iter()
            .map(|v| {
                serde_json::json!({
                    "id": v.id,
                    "version": v.version,
                    "status": v.status.to_string(),
                    "created_at": v.created_at,
                    "version_notes": v.version_notes,
                })
            })
            .collect();
        print_json(&summaries)?;
        return Ok(());
    }

    if versions.is_empty() {
        println!("No {} saved yet for '{slug}'.", tool_type.display_name());
        return Ok(());
    }

    let rows: Vec<Vec<String>> = versions
        .iter()
        .map(|v| {
            vec![
                format!("v{}", v.version),
                v.status.to_string(),
                v.created_at.format("%Y-%m-%d %H:%M").to_string(),
                v.version_notes.clone().unwrap_or_default(),
            ]
        })
        .collect();
    print_table(&["VERSION", "STATUS", "CREATED", "NOTES"], rows);
    Ok(())
}

fn show_catalog(phase: Option<&str>, json: bool) -> anyhow::Result<()> {
    let phase = phase
        .map(Phase::from_str)
        .transpose()
        .context("unknown phase")?;

    let defs: Vec<_> = catalog::CATALOG
        .iter()
        .filter(|d| phase.map(|p| d.phase == p).unwrap_or(true))
        .collect();

    if json {
        let entries: Vec<_> = defs
            .iter()
            .map(|d| {
                serde_json::json!({
                    "tool_type": d.tool_type.to_string(),
                    "name": d.name,
                    "description": d.description,
                    "phase": d.phase.to_string(),
                })
            })
            .collect();
        print_json(&entries)?;
        return Ok(());
    }

    let rows: Vec<Vec<String>> = defs
        .iter()
        .map(|d| {
            vec![
                d.tool_type.to_string(),
                d.phase.to_string(),
                d.name.to_string(),
                d.description.to_string(),
            ]
        })
        .collect();
    print_table(&["TYPE", "PHASE", "NAME", "DESCRIPTION"], rows);
    Ok(())
}
