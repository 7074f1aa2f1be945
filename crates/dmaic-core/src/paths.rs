use crate::error::{DmaicError, Result};
use crate::types::ToolType;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const DMAIC_DIR: &str = ".dmaic";
pub const PROJECTS_DIR: &str = ".dmaic/projects";

pub const STATE_FILE: &str = ".dmaic/state.yaml";
pub const MANIFEST_FILE: &str = "manifest.yaml";
pub const TOOLS_SUBDIR: &str = "tools";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn dmaic_dir(root: &Path) -> PathBuf {
    root.join(DMAIC_DIR)
}

pub fn state_path(root: &Path) -> PathBuf {
    root.join(STATE_FILE)
}

pub fn project_dir(root: &Path, slug: &str) -> PathBuf {
    root.join(PROJECTS_DIR).join(slug)
}

pub fn project_manifest(root: &Path, slug: &str) -> PathBuf {
    project_dir(root, slug).join(MANIFEST_FILE)
}

pub fn tool_dir(root: &Path, slug: &str, tool_type: ToolType) -> PathBuf {
    project_dir(root, slug)
        .join(TOOLS_SUBDIR)
        .join(tool_type.as_str())
}

pub fn tool_version_path(root: &Path, slug: &str, tool_type: ToolType, version: u32) -> PathBuf {
    tool_dir(root, slug, tool_type).join(format!("v{version}.yaml"))
}

// ---------------------------------------------------------------------------
// Slug validation
// ---------------------------------------------------------------------------

static SLUG_RE: OnceLock<Regex> = OnceLock::new();

fn slug_re() -> &'static Regex {
    SLUG_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").unwrap())
}

pub fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() || slug.len() > 64 || !slug_re().is_match(slug) {
        return Err(DmaicError::InvalidSlug(slug.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
