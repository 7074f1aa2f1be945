use anyhow::Context;
use dmaic_core::{io, paths, state::State};
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    let workspace_name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "workspace".to_string());

    println!("Initializing DMAIC workspace in: {}", root.display());

    for dir in [paths::DMAIC_DIR, paths::PROJECTS_DIR] {
        let p = root.join(dir);
        io::ensure_dir(&p).with_context(|| format!("failed to create {}", p.display()))?;
    }

    let state_path = paths::state_path(root);
    if !state_path.exists() {
        let state = State::new(&workspace_name);
        state.save(root).context("failed to write state.yaml")?;
        println!("  created: .dmaic/state.yaml");
    } else {
        println!("  exists:  .dmaic/state.yaml");
    }

    println!("Done. Create a project with: dmaic project create <slug> --title <title>");
    Ok(())
}
