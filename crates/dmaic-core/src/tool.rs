//! Versioned tool store.
//!
//! Every save of a tool document appends a new version file and archives the
//! previously active one, so for each (project, tool type) pair at most one
//! version is `active` and history is never rewritten. Version numbers are
//! dense, strictly increasing from 1, and derived from what is on disk at
//! save time. The store does not consult phase state; a tool may be saved
//! for any phase regardless of where the project currently stands.

use crate::error::{DmaicError, Result};
use crate::paths;
use crate::tool_data::ToolData;
use crate::types::{Phase, ToolStatus, ToolType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// ToolVersion
// ---------------------------------------------------------------------------

/// One saved snapshot of a tool document. Immutable after creation except
/// for the single active-to-archived flip performed by the next save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolVersion {
    pub id: Uuid,
    pub project: String,
    pub tool_name: String,
    pub phase: Phase,
    pub version: u32,
    pub status: ToolStatus,
    pub data: ToolData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ToolVersion {
    pub fn tool_type(&self) -> ToolType {
        self.data.tool_type()
    }
}

// ---------------------------------------------------------------------------
// ToolStore
// ---------------------------------------------------------------------------

/// Store handle bound to one project's tool documents.
pub struct ToolStore<'a> {
    root: &'a Path,
    project: String,
}

impl<'a> ToolStore<'a> {
    /// Bind to a project's tools. Fails when the project does not exist.
    pub fn open(root: &'a Path, project: &str) -> Result<Self> {
        if !paths::project_manifest(root, project).exists() {
            return Err(DmaicError::ProjectNotFound(project.to_string()));
        }
        Ok(Self {
            root,
            project: project.to_string(),
        })
    }

    /// Save a new version of a tool document.
    ///
    /// The payload is trimmed of blank leaves first and rejected when
    /// nothing meaningful remains. The current active version (if any) is
    /// archived, then the new version is inserted as `active` with number
    /// `max(existing) + 1`. Losing the insert race re-runs both steps from
    /// a fresh listing, so the racing writer's record is archived before
    /// the retry. The two steps are separate writes: a failed insert after
    /// a successful archive leaves the pair with zero active versions,
    /// which callers recover from by re-submitting the save.
    pub fn save_new_version(
        &self,
        data: ToolData,
        version_notes: Option<String>,
    ) -> Result<ToolVersion> {
        let tool_type = data.tool_type();
        let data = data.trimmed();
        if data.is_empty() {
            return Err(DmaicError::EmptyToolData {
                tool: tool_type.to_string(),
            });
        }

        loop {
            let existing = self.list_versions(tool_type)?;

            // Step 1: archive every currently active version. Re-run on
            // each retry so a record inserted by a racing save gets
            // archived too, keeping at most one active version per pair.
            for active in existing.iter().filter(|v| v.status == ToolStatus::Active) {
                let mut archived = active.clone();
                archived.status = ToolStatus::Archived;
                let path = self.version_path(tool_type, archived.version);
                crate::io::atomic_write(&path, serde_yaml::to_string(&archived)?.as_bytes())?;
            }

            // Step 2: insert the new version. The version file doubles as
            // a uniqueness constraint on (project, tool_type, version):
            // losing a race surfaces as an existing file, and the whole
            // archive-then-insert sequence re-runs with a fresh listing
            // instead of reusing or overwriting a number.
            let version = existing.iter().map(|v| v.version).max().unwrap_or(0) + 1;
            let record = ToolVersion {
                id: Uuid::new_v4(),
                project: self.project.clone(),
                tool_name: tool_type.display_name().to_string(),
                phase: tool_type.phase(),
                version,
                status: ToolStatus::Active,
                data: data.clone(),
                version_notes: version_notes.clone(),
                created_at: Utc::now(),
            };
            let path = self.version_path(tool_type, version);
            if crate::io::write_if_missing(&path, serde_yaml::to_string(&record)?.as_bytes())? {
                return Ok(record);
            }
        }
    }

    /// All versions for a tool, descending by version number.
    pub fn list_versions(&self, tool_type: ToolType) -> Result<Vec<ToolVersion>> {
        let dir = paths::tool_dir(self.root, &self.project, tool_type);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut versions = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            if Self::version_number(&entry.path()).is_none() {
                continue;
            }
            let raw = std::fs::read_to_string(entry.path())?;
            let record: ToolVersion = serde_yaml::from_str(&raw)?;
            versions.push(record);
        }
        versions.sort_by(|a, b| b.version.cmp(&a.version));
        Ok(versions)
    }

    /// The current active version, or `None` when the tool has never been
    /// saved ("no data yet" — distinct from a version lookup miss).
    pub fn active_version(&self, tool_type: ToolType) -> Result<Option<ToolVersion>> {
        Ok(self
            .list_versions(tool_type)?
            .into_iter()
            .find(|v| v.status == ToolStatus::Active))
    }

    /// A specific version when `version` is given (`VersionNotFound` if
    /// absent), otherwise the active version or `None`.
    pub fn get_version(
        &self,
        tool_type: ToolType,
        version: Option<u32>,
    ) -> Result<Option<ToolVersion>> {
        match version {
            Some(n) => {
                let path = self.version_path(tool_type, n);
                if !path.exists() {
                    return Err(DmaicError::VersionNotFound {
                        tool: tool_type.to_string(),
                        version: n,
                    });
                }
                let raw = std::fs::read_to_string(&path)?;
                Ok(Some(serde_yaml::from_str(&raw)?))
            }
            None => self.active_version(tool_type),
        }
    }

    fn version_path(&self, tool_type: ToolType, version: u32) -> PathBuf {
        paths::tool_version_path(self.root, &self.project, tool_type, version)
    }

    fn version_number(path: &Path) -> Option<u32> {
        let stem = path.file_stem()?.to_str()?;
        if path.extension()?.to_str()? != "yaml" {
            return None;
        }
        stem.strip_prefix('v')?.parse().ok()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
