use crate::error::{DmaicError, Result};
use crate::paths;
use crate::types::Phase;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    CreateProject,
    UpdateSettings,
    StartPhase,
    CompletePhase,
    SaveTool,
    RecordMetric,
    DeleteProject,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActionKind::CreateProject => "create_project",
            ActionKind::UpdateSettings => "update_settings",
            ActionKind::StartPhase => "start_phase",
            ActionKind::CompletePhase => "complete_phase",
            ActionKind::SaveTool => "save_tool",
            ActionKind::RecordMetric => "record_metric",
            ActionKind::DeleteProject => "delete_project",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub project: String,
    pub action: ActionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<Phase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub outcome: String,
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Workspace-level state: which projects exist and a bounded audit trail of
/// actions taken against them, with the acting user recorded explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct State {
    #[serde(default = "default_version")]
    pub version: u32,
    pub workspace: String,
    pub active_projects: Vec<String>,
    pub history: Vec<HistoryEntry>,
    pub last_updated: DateTime<Utc>,
}

fn default_version() -> u32 {
    1
}

impl State {
    pub fn new(workspace: impl Into<String>) -> Self {
        Self {
            version: 1,
            workspace: workspace.into(),
            active_projects: Vec::new(),
            history: Vec::new(),
            last_updated: Utc::now(),
        }
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::state_path(root);
        if !path.exists() {
            return Err(DmaicError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let state: State = serde_yaml::from_str(&data)?;
        Ok(state)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::state_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // ---------------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------------

    pub fn add_project(&mut self, slug: &str) {
        if !self.active_projects.contains(&slug.to_string()) {
            self.active_projects.push(slug.to_string());
        }
        self.last_updated = Utc::now();
    }

    pub fn remove_project(&mut self, slug: &str) {
        self.active_projects.retain(|s| s != slug);
        self.last_updated = Utc::now();
    }

    pub fn record_action(
        &mut self,
        project: &str,
        action: ActionKind,
        phase: Option<Phase>,
        actor: Option<String>,
        outcome: &str,
    ) {
        self.history.push(HistoryEntry {
            project: project.to_string(),
            action,
            phase,
            actor,
            timestamp: Utc::now(),
            outcome: outcome.to_string(),
        });
        // Trim history to last 200 entries
        if self.history.len() > 200 {
            self.history.drain(..self.history.len() - 200);
        }
        self.last_updated = Utc::now();
    }

    pub fn last_action(&self) -> Option<&HistoryEntry> {
        self.history.last()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn state_roundtrip() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".dmaic")).unwrap();

        let mut state = State::new("plant-ops");
        state.add_project("reduce-scrap");
        state.record_action(
            "reduce-scrap",
            ActionKind::StartPhase,
            Some(Phase::Define),
            Some("maria".to_string()),
            "ok",
        );
        state.save(dir.path()).unwrap();

        let loaded = State::load(dir.path()).unwrap();
        assert_eq!(loaded.workspace, "plant-ops");
        assert!(loaded.active_projects.contains(&"reduce-scrap".to_string()));
        assert_eq!(loaded.history.len(), 1);
        assert_eq!(loaded.history[0].actor.as_deref(), Some("maria"));
    }

    #[test]
    fn state_not_initialized() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            State::load(dir.path()),
            Err(DmaicError::NotInitialized)
        ));
    }

    #[test]
    fn history_capped_at_200() {
        let mut state = State::new("ws");
        for i in 0..250 {
            state.record_action(
                "p",
                ActionKind::SaveTool,
                None,
                None,
                &format!("save {i}"),
            );
        }
        assert_eq!(state.history.len(), 200);
        assert_eq!(state.last_action().unwrap().outcome, "save 249");
    }

    #[test]
    fn add_project_idempotent() {
        let mut state = State::new("ws");
        state.add_project("a");
        state.add_project("a");
        assert_eq!(state.active_projects.len(), 1);

        state.remove_project("a");
        assert!(state.active_projects.is_empty());
    }
}
