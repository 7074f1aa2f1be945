use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// The five DMAIC phases, in fixed order. `Ord` follows declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Define,
    Measure,
    Analyze,
    Improve,
    Control,
}

impl Phase {
    pub fn all() -> &'static [Phase] {
        &[
            Phase::Define,
            Phase::Measure,
            Phase::Analyze,
            Phase::Improve,
            Phase::Control,
        ]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Option<Phase> {
        let all = Phase::all();
        all.get(self.index() + 1).copied()
    }

    pub fn previous(self) -> Option<Phase> {
        let all = Phase::all();
        self.index().checked_sub(1).and_then(|i| all.get(i)).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Define => "define",
            Phase::Measure => "measure",
            Phase::Analyze => "analyze",
            Phase::Improve => "improve",
            Phase::Control => "control",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Define => "Define",
            Phase::Measure => "Measure",
            Phase::Analyze => "Analyze",
            Phase::Improve => "Improve",
            Phase::Control => "Control",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Phase::Define => "Define the problem, goals, and scope",
            Phase::Measure => "Collect data and establish baseline metrics",
            Phase::Analyze => "Identify root causes of the problem",
            Phase::Improve => "Develop and implement solutions",
            Phase::Control => "Sustain improvements and monitor results",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Phase {
    type Err = crate::error::DmaicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "define" => Ok(Phase::Define),
            "measure" => Ok(Phase::Measure),
            "analyze" => Ok(Phase::Analyze),
            "improve" => Ok(Phase::Improve),
            "control" => Ok(Phase::Control),
            _ => Err(crate::error::DmaicError::InvalidPhase(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// PhaseStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl fmt::Display for PhaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PhaseStatus::NotStarted => "not_started",
            PhaseStatus::InProgress => "in_progress",
            PhaseStatus::Completed => "completed",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// ProjectStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Draft,
    Active,
    OnHold,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Draft => "draft",
            ProjectStatus::Active => "active",
            ProjectStatus::OnHold => "on_hold",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProjectStatus {
    type Err = crate::error::DmaicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(ProjectStatus::Draft),
            "active" => Ok(ProjectStatus::Active),
            "on_hold" | "on-hold" => Ok(ProjectStatus::OnHold),
            "completed" => Ok(ProjectStatus::Completed),
            "cancelled" => Ok(ProjectStatus::Cancelled),
            _ => Err(crate::error::DmaicError::InvalidStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// ToolStatus
// ---------------------------------------------------------------------------

/// Version status of a saved tool document: the single current revision
/// versus all superseded ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolStatus {
    Active,
    Archived,
}

impl fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ToolStatus::Active => "active",
            ToolStatus::Archived => "archived",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// ToolType
// ---------------------------------------------------------------------------

/// The catalog of structured tool documents, three per phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolType {
    ProjectCharter,
    Sipoc,
    Voc,
    DataCollectionPlan,
    ProcessMap,
    BaselineMetrics,
    Fishbone,
    Pareto,
    StatisticalAnalysis,
    Fmea,
    SolutionTesting,
    ImplementationPlan,
    ControlChart,
    Sop,
    SustainabilityPlan,
}

impl ToolType {
    pub fn all() -> &'static [ToolType] {
        &[
            ToolType::ProjectCharter,
            ToolType::Sipoc,
            ToolType::Voc,
            ToolType::DataCollectionPlan,
            ToolType::ProcessMap,
            ToolType::BaselineMetrics,
            ToolType::Fishbone,
            ToolType::Pareto,
            ToolType::StatisticalAnalysis,
            ToolType::Fmea,
            ToolType::SolutionTesting,
            ToolType::ImplementationPlan,
            ToolType::ControlChart,
            ToolType::Sop,
            ToolType::SustainabilityPlan,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ToolType::ProjectCharter => "project_charter",
            ToolType::Sipoc => "sipoc",
            ToolType::Voc => "voc",
            ToolType::DataCollectionPlan => "data_collection_plan",
            ToolType::ProcessMap => "process_map",
            ToolType::BaselineMetrics => "baseline_metrics",
            ToolType::Fishbone => "fishbone",
            ToolType::Pareto => "pareto",
            ToolType::StatisticalAnalysis => "statistical_analysis",
            ToolType::Fmea => "fmea",
            ToolType::SolutionTesting => "solution_testing",
            ToolType::ImplementationPlan => "implementation_plan",
            ToolType::ControlChart => "control_chart",
            ToolType::Sop => "sop",
            ToolType::SustainabilityPlan => "sustainability_plan",
        }
    }
}

impl fmt::Display for ToolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ToolType {
    type Err = crate::error::DmaicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolType::all()
            .iter()
            .find(|t| t.as_str() == s)
            .copied()
            .ok_or_else(|| crate::error::DmaicError::InvalidToolType(s.to_string()))
    }
}
