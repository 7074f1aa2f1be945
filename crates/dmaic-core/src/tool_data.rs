//! Typed payloads for every tool in the catalog.
//!
//! `ToolData` is a tagged union keyed by `tool_type`, so a saved document
//! round-trips through YAML/JSON with its schema checked at the boundary
//! instead of being carried as an untyped blob. Trimming drops blank leaf
//! fields the way the entry forms do before saving; a payload with no
//! meaningful content left is rejected by the store.

use crate::error::{DmaicError, Result};
use crate::types::ToolType;
use serde::{Deserialize, Serialize};

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

// ---------------------------------------------------------------------------
// Define-phase payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Charter {
    pub problem_statement: String,
    pub goal_statement: String,
    pub scope: String,
    pub business_case: String,
    pub team_members: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sipoc {
    #[serde(default)]
    pub suppliers: Vec<String>,
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub process: Vec<String>,
    #[serde(default)]
    pub outputs: Vec<String>,
    #[serde(default)]
    pub customers: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VocPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl Default for VocPriority {
    fn default() -> Self {
        VocPriority::Medium
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocItem {
    pub customer_segment: String,
    pub need: String,
    pub pain_point: String,
    pub current_state: String,
    pub desired_state: String,
    #[serde(default)]
    pub priority: VocPriority,
}

impl VocItem {
    fn has_content(&self) -> bool {
        !blank(&self.customer_segment)
            || !blank(&self.need)
            || !blank(&self.pain_point)
            || !blank(&self.current_state)
            || !blank(&self.desired_state)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voc {
    #[serde(default)]
    pub items: Vec<VocItem>,
}

// ---------------------------------------------------------------------------
// Measure-phase payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataCollectionItem {
    pub data_element: String,
    pub definition: String,
    pub data_type: String,
    pub collection_method: String,
    pub data_source: String,
    pub responsible_person: String,
    pub frequency: String,
    pub sample_size: String,
    pub tools_required: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataCollectionPlan {
    #[serde(default)]
    pub items: Vec<DataCollectionItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    Process,
    Decision,
    StartEnd,
    Delay,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessStep {
    pub step_number: u32,
    pub step_type: StepType,
    pub step_name: String,
    pub description: String,
    pub responsible_party: String,
    pub duration: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessMap {
    pub process_name: String,
    #[serde(default)]
    pub steps: Vec<ProcessStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricItem {
    pub metric_name: String,
    pub baseline_value: String,
    pub target_value: String,
    pub unit: String,
    pub measurement_method: String,
    pub frequency: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineMetrics {
    #[serde(default)]
    pub metrics: Vec<MetricItem>,
}

// ---------------------------------------------------------------------------
// Analyze-phase payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cause {
    pub cause: String,
    #[serde(default)]
    pub subcauses: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FishboneCategories {
    #[serde(default)]
    pub people: Vec<Cause>,
    #[serde(default)]
    pub process: Vec<Cause>,
    #[serde(default)]
    pub equipment: Vec<Cause>,
    #[serde(default)]
    pub materials: Vec<Cause>,
    #[serde(default)]
    pub environment: Vec<Cause>,
    #[serde(default)]
    pub measurement: Vec<Cause>,
}

impl FishboneCategories {
    fn trimmed(&self) -> Self {
        let clean = |causes: &[Cause]| -> Vec<Cause> {
            causes
                .iter()
                .filter(|c| !blank(&c.cause))
                .map(|c| Cause {
                    cause: c.cause.clone(),
                    subcauses: c.subcauses.iter().filter(|s| !blank(s)).cloned().collect(),
                })
                .collect()
        };
        Self {
            people: clean(&self.people),
            process: clean(&self.process),
            equipment: clean(&self.equipment),
            materials: clean(&self.materials),
            environment: clean(&self.environment),
            measurement: clean(&self.measurement),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fishbone {
    pub problem_statement: String,
    #[serde(default)]
    pub categories: FishboneCategories,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParetoItem {
    pub category: String,
    pub frequency: u64,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pareto {
    pub analysis_title: String,
    #[serde(default)]
    pub items: Vec<ParetoItem>,
}

/// One row of a ranked Pareto analysis. Computed on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParetoRow {
    pub category: String,
    pub frequency: u64,
    pub description: String,
    pub percentage: f64,
    pub cumulative_percentage: f64,
    pub vital_few: bool,
}

impl Pareto {
    pub fn total_frequency(&self) -> u64 {
        self.items.iter().map(|i| i.frequency).sum()
    }

    /// Items sorted by descending frequency with cumulative percentages.
    /// An item is part of the "vital few" while the cumulative share of
    /// frequency is at or below 80% (the 80/20 rule).
    pub fn ranked(&self) -> Vec<ParetoRow> {
        let total = self.total_frequency();
        let mut sorted: Vec<&ParetoItem> = self.items.iter().collect();
        sorted.sort_by(|a, b| b.frequency.cmp(&a.frequency));

        let mut cumulative = 0u64;
        sorted
            .into_iter()
            .map(|item| {
                cumulative += item.frequency;
                let (pct, cum_pct) = if total == 0 {
                    (0.0, 0.0)
                } else {
                    (
                        item.frequency as f64 / total as f64 * 100.0,
                        cumulative as f64 / total as f64 * 100.0,
                    )
                };
                ParetoRow {
                    category: item.category.clone(),
                    frequency: item.frequency,
                    description: item.description.clone(),
                    percentage: pct,
                    cumulative_percentage: cum_pct,
                    vital_few: total > 0 && cum_pct <= 80.0 + 1e-9,
                }
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Improve-phase payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FmeaItem {
    pub process_step: String,
    pub potential_failure: String,
    #[serde(default)]
    pub effects: String,
    /// 1-10
    pub severity: u8,
    #[serde(default)]
    pub causes: String,
    /// 1-10
    pub occurrence: u8,
    #[serde(default)]
    pub current_controls: String,
    /// 1-10
    pub detection: u8,
    /// severity x occurrence x detection, recomputed on save
    #[serde(default)]
    pub rpn: u32,
    #[serde(default)]
    pub recommended_actions: String,
}

impl FmeaItem {
    /// Risk Priority Number: severity x occurrence x detection.
    pub fn rpn(&self) -> u32 {
        self.severity as u32 * self.occurrence as u32 * self.detection as u32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fmea {
    pub process_name: String,
    #[serde(default)]
    pub items: Vec<FmeaItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    Planned,
    InProgress,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestItem {
    pub solution_name: String,
    pub test_objective: String,
    pub test_method: String,
    pub start_date: String,
    pub end_date: String,
    pub sample_size: String,
    pub baseline_result: String,
    pub test_result: String,
    pub improvement_percentage: String,
    pub status: TestStatus,
    pub findings: String,
    pub next_steps: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionTesting {
    pub project_objective: String,
    #[serde(default)]
    pub tests: Vec<TestItem>,
}

// ---------------------------------------------------------------------------
// Worksheet (generic title-plus-items payload)
// ---------------------------------------------------------------------------

/// Shared payload for catalog tools without a dedicated schema
/// (statistical analysis, implementation plan, control chart, SOP,
/// sustainability plan): a title plus an ordered list of structured items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worksheet {
    pub title: String,
    #[serde(default)]
    pub items: Vec<WorksheetItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorksheetItem {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub notes: String,
}

// ---------------------------------------------------------------------------
// ToolData
// ---------------------------------------------------------------------------

/// One saved tool document, tagged by `tool_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tool_type", rename_all = "snake_case")]
pub enum ToolData {
    ProjectCharter(Charter),
    Sipoc(Sipoc),
    Voc(Voc),
    DataCollectionPlan(DataCollectionPlan),
    ProcessMap(ProcessMap),
    BaselineMetrics(BaselineMetrics),
    Fishbone(Fishbone),
    Pareto(Pareto),
    StatisticalAnalysis(Worksheet),
    Fmea(Fmea),
    SolutionTesting(SolutionTesting),
    ImplementationPlan(Worksheet),
    ControlChart(Worksheet),
    Sop(Worksheet),
    SustainabilityPlan(Worksheet),
}

impl ToolData {
    pub fn tool_type(&self) -> ToolType {
        match self {
            ToolData::ProjectCharter(_) => ToolType::ProjectCharter,
            ToolData::Sipoc(_) => ToolType::Sipoc,
            ToolData::Voc(_) => ToolType::Voc,
            ToolData::DataCollectionPlan(_) => ToolType::DataCollectionPlan,
            ToolData::ProcessMap(_) => ToolType::ProcessMap,
            ToolData::BaselineMetrics(_) => ToolType::BaselineMetrics,
            ToolData::Fishbone(_) => ToolType::Fishbone,
            ToolData::Pareto(_) => ToolType::Pareto,
            ToolData::StatisticalAnalysis(_) => ToolType::StatisticalAnalysis,
            ToolData::Fmea(_) => ToolType::Fmea,
            ToolData::SolutionTesting(_) => ToolType::SolutionTesting,
            ToolData::ImplementationPlan(_) => ToolType::ImplementationPlan,
            ToolData::ControlChart(_) => ToolType::ControlChart,
            ToolData::Sop(_) => ToolType::Sop,
            ToolData::SustainabilityPlan(_) => ToolType::SustainabilityPlan,
        }
    }

    /// Deserialize an untagged payload object for a known tool type.
    ///
    /// Callers that name the tool type out of band (the CLI, a form route)
    /// hand over the bare payload; the tag is injected before decoding.
    pub fn from_json(tool_type: ToolType, value: serde_json::Value) -> Result<Self> {
        let mut value = value;
        let obj = value
            .as_object_mut()
            .ok_or_else(|| DmaicError::Storage("tool payload must be a JSON object".to_string()))?;
        obj.insert(
            "tool_type".to_string(),
            serde_json::Value::String(tool_type.as_str().to_string()),
        );
        Ok(serde_json::from_value(value)?)
    }

    /// Drop blank leaf fields and list entries, the way the entry forms
    /// clean a document before saving. FMEA RPNs are recomputed here so a
    /// stale caller-supplied value never persists.
    pub fn trimmed(&self) -> Self {
        match self {
            ToolData::ProjectCharter(c) => ToolData::ProjectCharter(c.clone()),
            ToolData::Sipoc(s) => {
                let clean = |v: &[String]| v.iter().filter(|s| !blank(s)).cloned().collect();
                ToolData::Sipoc(Sipoc {
                    suppliers: clean(&s.suppliers),
                    inputs: clean(&s.inputs),
                    process: clean(&s.process),
                    outputs: clean(&s.outputs),
                    customers: clean(&s.customers),
                })
            }
            ToolData::Voc(v) => ToolData::Voc(Voc {
                items: v.items.iter().filter(|i| i.has_content()).cloned().collect(),
            }),
            ToolData::DataCollectionPlan(p) => ToolData::DataCollectionPlan(DataCollectionPlan {
                items: p
                    .items
                    .iter()
                    .filter(|i| !blank(&i.data_element))
                    .cloned()
                    .collect(),
            }),
            ToolData::ProcessMap(m) => ToolData::ProcessMap(ProcessMap {
                process_name: m.process_name.clone(),
                steps: m
                    .steps
                    .iter()
                    .filter(|s| !blank(&s.step_name))
                    .cloned()
                    .collect(),
            }),
            ToolData::BaselineMetrics(b) => ToolData::BaselineMetrics(BaselineMetrics {
                metrics: b
                    .metrics
                    .iter()
                    .filter(|m| !blank(&m.metric_name) && !blank(&m.baseline_value))
                    .cloned()
                    .collect(),
            }),
            ToolData::Fishbone(f) => ToolData::Fishbone(Fishbone {
                problem_statement: f.problem_statement.clone(),
                categories: f.categories.trimmed(),
            }),
            ToolData::Pareto(p) => ToolData::Pareto(Pareto {
                analysis_title: p.analysis_title.clone(),
                items: p
                    .items
                    .iter()
                    .filter(|i| !blank(&i.category))
                    .cloned()
                    .collect(),
            }),
            ToolData::Fmea(f) => ToolData::Fmea(Fmea {
                process_name: f.process_name.clone(),
                items: f
                    .items
                    .iter()
                    .filter(|i| !blank(&i.process_step) || !blank(&i.potential_failure))
                    .map(|i| {
                        let mut item = i.clone();
                        item.rpn = item.rpn();
                        item
                    })
                    .collect(),
            }),
            ToolData::SolutionTesting(s) => ToolData::SolutionTesting(SolutionTesting {
                project_objective: s.project_objective.clone(),
                tests: s
                    .tests
                    .iter()
                    .filter(|t| !blank(&t.solution_name) || !blank(&t.test_objective))
                    .cloned()
                    .collect(),
            }),
            ToolData::StatisticalAnalysis(w) => ToolData::StatisticalAnalysis(w.trimmed()),
            ToolData::ImplementationPlan(w) => ToolData::ImplementationPlan(w.trimmed()),
            ToolData::ControlChart(w) => ToolData::ControlChart(w.trimmed()),
            ToolData::Sop(w) => ToolData::Sop(w.trimmed()),
            ToolData::SustainabilityPlan(w) => ToolData::SustainabilityPlan(w.trimmed()),
        }
    }

    /// Minimal-content check, evaluated after trimming. Each tool names the
    /// one thing a save cannot do without: a charter with any field filled,
    /// a fishbone with a problem statement, a metric with a baseline, and
    /// so on. Structural schema validation already happened at decode time.
    pub fn is_empty(&self) -> bool {
        match self {
            ToolData::ProjectCharter(c) => {
                blank(&c.problem_statement)
                    && blank(&c.goal_statement)
                    && blank(&c.scope)
                    && blank(&c.business_case)
                    && blank(&c.team_members)
            }
            ToolData::Sipoc(s) => {
                s.suppliers.is_empty()
                    && s.inputs.is_empty()
                    && s.process.is_empty()
                    && s.outputs.is_empty()
                    && s.customers.is_empty()
            }
            ToolData::Voc(v) => v.items.is_empty(),
            ToolData::DataCollectionPlan(p) => p.items.is_empty(),
            ToolData::ProcessMap(m) => m.steps.is_empty(),
            ToolData::BaselineMetrics(b) => b.metrics.is_empty(),
            ToolData::Fishbone(f) => blank(&f.problem_statement),
            ToolData::Pareto(p) => p.items.is_empty(),
            ToolData::Fmea(f) => f.items.is_empty(),
            ToolData::SolutionTesting(s) => s.tests.is_empty(),
            ToolData::StatisticalAnalysis(w)
            | ToolData::ImplementationPlan(w)
            | ToolData::ControlChart(w)
            | ToolData::Sop(w)
            | ToolData::SustainabilityPlan(w) => blank(&w.title) && w.items.is_empty(),
        }
    }
}

impl Worksheet {
    fn trimmed(&self) -> Self {
        Self {
            title: self.title.clone(),
            items: self
                .items
                .iter()
                .filter(|i| !blank(&i.name) || !blank(&i.description))
                .cloned()
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
