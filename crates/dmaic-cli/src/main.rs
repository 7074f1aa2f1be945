mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    metric::MetricSubcommand, phase::PhaseSubcommand, project::ProjectSubcommand,
    tool::ToolSubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "dmaic",
    about = "Lean Six Sigma project tracker — DMAIC phases, versioned tools, and metrics",
    version,
    propagate_version = true
)]
struct Cli {
    /// Workspace root (default: auto-detect from .dmaic/ or .git/)
    #[arg(long, global = true, env = "DMAIC_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Acting user, recorded on every state-changing operation
    #[arg(long, global = true, env = "DMAIC_USER")]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a DMAIC workspace in the current project
    Init,

    /// Show workspace state and recent activity
    State,

    /// Manage improvement projects
    Project {
        #[command(subcommand)]
        subcommand: ProjectSubcommand,
    },

    /// Start, complete, and inspect DMAIC phases
    Phase {
        #[command(subcommand)]
        subcommand: PhaseSubcommand,
    },

    /// Save and browse versioned tool documents
    Tool {
        #[command(subcommand)]
        subcommand: ToolSubcommand,
    },

    /// Record and list project metrics
    Metric {
        #[command(subcommand)]
        subcommand: MetricSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    let user = cli.user;

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::State => cmd::state::run(&root, cli.json),
        Commands::Project { subcommand } => {
            cmd::project::run(&root, subcommand, cli.json, user.as_deref())
        }
        Commands::Phase { subcommand } => {
            cmd::phase::run(&root, subcommand, cli.json, user.as_deref())
        }
        Commands::Tool { subcommand } => {
            cmd::tool::run(&root, subcommand, cli.json, user.as_deref())
        }
        Commands::Metric { subcommand } => {
            cmd::metric::run(&root, subcommand, cli.json, user.as_deref())
        }
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
