use crate::error::{DmaicError, Result};
use crate::paths;
use crate::types::{Phase, PhaseStatus, ProjectStatus};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// PhaseRecord
// ---------------------------------------------------------------------------

/// State of one (project, phase) pair. Created lazily on first start;
/// absence of a record means the phase has not been started.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseRecord {
    pub phase: Phase,
    pub status: PhaseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// ---------------------------------------------------------------------------
// Metric
// ---------------------------------------------------------------------------

/// A named measurement attached to a project, consumed for display only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metric {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_type: Option<String>,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<Phase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub slug: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: ProjectStatus,
    /// Advanced only by the phase state machine, never set arbitrarily.
    pub current_phase: Phase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_completion_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_completion_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub phases: Vec<PhaseRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metrics: Vec<Metric>,
}

impl Project {
    pub fn new(slug: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            slug: slug.into(),
            title: title.into(),
            description: None,
            status: ProjectStatus::Draft,
            current_phase: Phase::Define,
            owner: None,
            start_date: None,
            target_completion_date: None,
            actual_completion_date: None,
            created_at: now,
            updated_at: now,
            phases: Vec::new(),
            metrics: Vec::new(),
        }
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    pub fn create(root: &Path, slug: impl Into<String>, title: impl Into<String>) -> Result<Self> {
        let slug = slug.into();
        paths::validate_slug(&slug)?;

        if !root.join(paths::PROJECTS_DIR).exists() {
            return Err(DmaicError::NotInitialized);
        }

        let dir = paths::project_dir(root, &slug);
        if dir.exists() {
            return Err(DmaicError::ProjectExists(slug));
        }

        let project = Self::new(slug, title);
        project.save(root)?;
        Ok(project)
    }

    pub fn load(root: &Path, slug: &str) -> Result<Self> {
        let manifest = paths::project_manifest(root, slug);
        if !manifest.exists() {
            return Err(DmaicError::ProjectNotFound(slug.to_string()));
        }
        let data = std::fs::read_to_string(&manifest)?;
        let project: Project = serde_yaml::from_str(&data)?;
        Ok(project)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let manifest = paths::project_manifest(root, &self.slug);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&manifest, data.as_bytes())
    }

    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let projects_dir = root.join(paths::PROJECTS_DIR);
        if !projects_dir.exists() {
            return Ok(Vec::new());
        }

        let mut projects = Vec::new();
        for entry in std::fs::read_dir(&projects_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                let slug = entry.file_name().to_string_lossy().into_owned();
                match Self::load(root, &slug) {
                    Ok(p) => projects.push(p),
                    Err(DmaicError::ProjectNotFound(_)) => {}
                    Err(e) => return Err(e),
                }
            }
        }
        projects.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(projects)
    }

    /// Delete the project directory, cascading to all phase records, tool
    /// versions, and metrics it owns.
    pub fn delete(root: &Path, slug: &str) -> Result<()> {
        let dir = paths::project_dir(root, slug);
        if !dir.exists() {
            return Err(DmaicError::ProjectNotFound(slug.to_string()));
        }
        std::fs::remove_dir_all(&dir)?;
        Ok(())
    }

    // ---------------------------------------------------------------------------
    // Settings mutations
    // ---------------------------------------------------------------------------

    pub fn update_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.updated_at = Utc::now();
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
        self.updated_at = Utc::now();
    }

    pub fn set_owner(&mut self, owner: Option<String>) {
        self.owner = owner;
        self.updated_at = Utc::now();
    }

    pub fn set_dates(&mut self, start: Option<NaiveDate>, target: Option<NaiveDate>) {
        if start.is_some() {
            self.start_date = start;
        }
        if target.is_some() {
            self.target_completion_date = target;
        }
        self.updated_at = Utc::now();
    }

    /// Set the project status. Completing stamps the actual-completion date;
    /// moving out of completed clears it again.
    pub fn set_status(&mut self, status: ProjectStatus, today: NaiveDate) {
        self.status = status;
        match status {
            ProjectStatus::Completed => self.actual_completion_date = Some(today),
            _ => self.actual_completion_date = None,
        }
        self.updated_at = Utc::now();
    }

    // ---------------------------------------------------------------------------
    // Metrics
    // ---------------------------------------------------------------------------

    pub fn record_metric(&mut self, metric: Metric) {
        self.metrics.push(metric);
        self.updated_at = Utc::now();
    }

    pub fn metrics_for_phase(&self, phase: Phase) -> Vec<&Metric> {
        self.metrics
            .iter()
            .filter(|m| m.phase == Some(phase))
            .collect()
    }

    // ---------------------------------------------------------------------------
    // Derived display values
    // ---------------------------------------------------------------------------

    /// Days until the target completion date, negative when overdue.
    /// Computed for display, never persisted.
    pub fn days_remaining(&self, today: NaiveDate) -> Option<i64> {
        self.target_completion_date
            .map(|target| (target - today).num_days())
    }

    pub fn completed_phase_count(&self) -> usize {
        self.phases
            .iter()
            .filter(|p| p.status == PhaseStatus::Completed)
            .count()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
