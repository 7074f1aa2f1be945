//! Static catalog of DMAIC tools: display name, description, and owning
//! phase for each tool type. Three tools per phase.

use crate::types::{Phase, ToolType};

#[derive(Debug, Clone, Copy)]
pub struct ToolDefinition {
    pub tool_type: ToolType,
    pub name: &'static str,
    pub description: &'static str,
    pub phase: Phase,
}

pub const CATALOG: &[ToolDefinition] = &[
    ToolDefinition {
        tool_type: ToolType::ProjectCharter,
        name: "Project Charter",
        description: "Define the problem, goals, scope, and business case",
        phase: Phase::Define,
    },
    ToolDefinition {
        tool_type: ToolType::Sipoc,
        name: "SIPOC Diagram",
        description: "High-level process map: Suppliers, Inputs, Process, Outputs, Customers",
        phase: Phase::Define,
    },
    ToolDefinition {
        tool_type: ToolType::Voc,
        name: "Voice of Customer",
        description: "Capture and analyze customer requirements and feedback",
        phase: Phase::Define,
    },
    ToolDefinition {
        tool_type: ToolType::DataCollectionPlan,
        name: "Data Collection Plan",
        description: "Plan what, when, where, and how to collect data",
        phase: Phase::Measure,
    },
    ToolDefinition {
        tool_type: ToolType::ProcessMap,
        name: "Process Map",
        description: "Detailed flowchart of the current process",
        phase: Phase::Measure,
    },
    ToolDefinition {
        tool_type: ToolType::BaselineMetrics,
        name: "Baseline Metrics",
        description: "Establish current performance levels",
        phase: Phase::Measure,
    },
    ToolDefinition {
        tool_type: ToolType::Fishbone,
        name: "Fishbone Diagram",
        description: "Identify root causes using cause-and-effect analysis",
        phase: Phase::Analyze,
    },
    ToolDefinition {
        tool_type: ToolType::Pareto,
        name: "Pareto Chart",
        description: "80/20 analysis to identify vital few causes",
        phase: Phase::Analyze,
    },
    ToolDefinition {
        tool_type: ToolType::StatisticalAnalysis,
        name: "Statistical Analysis",
        description: "Hypothesis testing and correlation analysis",
        phase: Phase::Analyze,
    },
    ToolDefinition {
        tool_type: ToolType::Fmea,
        name: "FMEA",
        description: "Failure Mode and Effects Analysis to assess risks",
        phase: Phase::Improve,
    },
    ToolDefinition {
        tool_type: ToolType::SolutionTesting,
        name: "Solution Testing",
        description: "Pilot test and validate proposed improvements",
        phase: Phase::Improve,
    },
    ToolDefinition {
        tool_type: ToolType::ImplementationPlan,
        name: "Implementation Plan",
        description: "Detailed plan for rolling out improvements",
        phase: Phase::Improve,
    },
    ToolDefinition {
        tool_type: ToolType::ControlChart,
        name: "Control Chart",
        description: "Monitor process stability over time",
        phase: Phase::Control,
    },
    ToolDefinition {
        tool_type: ToolType::Sop,
        name: "Standard Operating Procedure",
        description: "Document standardized work procedures",
        phase: Phase::Control,
    },
    ToolDefinition {
        tool_type: ToolType::SustainabilityPlan,
        name: "Sustainability Plan",
        description: "Ensure improvements are sustained long-term",
        phase: Phase::Control,
    },
];

pub fn definition(tool_type: ToolType) -> &'static ToolDefinition {
    // CATALOG covers every ToolType variant; enforced by catalog_complete.
    CATALOG
        .iter()
        .find(|d| d.tool_type == tool_type)
        .expect("catalog entry missing for tool type")
}

pub fn tools_for_phase(phase: Phase) -> Vec<&'static ToolDefinition> {
    CATALOG.iter().filter(|d| d.phase == phase).collect()
}

impl ToolType {
    /// Default owning phase from the catalog.
    pub fn phase(self) -> Phase {
        definition(self).phase
    }

    /// Human-readable tool name from the catalog.
    pub fn display_name(self) -> &'static str {
        definition(self).name
    }
}
