//! The DMAIC phase state machine.
//!
//! Per phase, per project: `not_started -> in_progress -> completed`.
//! Phases start strictly in order (a phase may start only when its
//! predecessor is completed) and `completed` is terminal — there is no
//! reopening transition. The machine owns all writes to
//! `Project.current_phase` and to phase record statuses.

use crate::error::{DmaicError, Result};
use crate::project::{PhaseRecord, Project};
use crate::types::{Phase, PhaseStatus};
use chrono::{NaiveDate, Utc};

impl Project {
    pub fn phase_record(&self, phase: Phase) -> Option<&PhaseRecord> {
        self.phases.iter().find(|p| p.phase == phase)
    }

    fn phase_record_mut(&mut self, phase: Phase) -> Option<&mut PhaseRecord> {
        self.phases.iter_mut().find(|p| p.phase == phase)
    }

    /// Status of a (project, phase) pair; a missing record reads as
    /// `not_started`.
    pub fn phase_status(&self, phase: Phase) -> PhaseStatus {
        self.phase_record(phase)
            .map(|p| p.status)
            .unwrap_or(PhaseStatus::NotStarted)
    }

    /// Pure precondition check for `start_phase`. No side effects.
    pub fn can_start(&self, phase: Phase) -> Result<()> {
        if self.phase_status(phase) == PhaseStatus::Completed {
            return Err(DmaicError::InvalidPhaseTransition {
                project: self.slug.clone(),
                phase: phase.to_string(),
                status: PhaseStatus::Completed.to_string(),
            });
        }
        if let Some(previous) = phase.previous() {
            if self.phase_status(previous) != PhaseStatus::Completed {
                return Err(DmaicError::PhaseOrderViolation {
                    project: self.slug.clone(),
                    phase: phase.to_string(),
                    reason: format!("phase '{previous}' is not completed"),
                });
            }
        }
        Ok(())
    }

    /// Pure precondition check for `complete_phase`. No side effects.
    pub fn can_complete(&self, phase: Phase) -> Result<()> {
        let status = self.phase_status(phase);
        if status != PhaseStatus::InProgress {
            return Err(DmaicError::InvalidPhaseTransition {
                project: self.slug.clone(),
                phase: phase.to_string(),
                status: status.to_string(),
            });
        }
        Ok(())
    }

    /// Start a phase: upsert its record to `in_progress` and point
    /// `current_phase` at it.
    ///
    /// Calling this on an already-`in_progress` phase overwrites the start
    /// date and notes (restart semantics, preserved from the original
    /// behavior rather than treated as a no-op).
    pub fn start_phase(
        &mut self,
        phase: Phase,
        today: NaiveDate,
        notes: Option<String>,
    ) -> Result<()> {
        self.can_start(phase)?;

        match self.phase_record_mut(phase) {
            Some(record) => {
                record.status = PhaseStatus::InProgress;
                record.start_date = Some(today);
                record.notes = notes;
            }
            None => {
                self.phases.push(PhaseRecord {
                    phase,
                    status: PhaseStatus::InProgress,
                    start_date: Some(today),
                    completion_date: None,
                    notes,
                });
            }
        }

        self.current_phase = phase;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Complete an `in_progress` phase and advance `current_phase` to the
    /// next phase in order. The pointer moves without auto-starting the next
    /// phase's record; completing `control` leaves the pointer in place.
    pub fn complete_phase(
        &mut self,
        phase: Phase,
        today: NaiveDate,
        notes: Option<String>,
    ) -> Result<()> {
        self.can_complete(phase)?;

        // can_complete guarantees the record exists
        if let Some(record) = self.phase_record_mut(phase) {
            record.status = PhaseStatus::Completed;
            record.completion_date = Some(today);
            record.notes = notes;
        }

        if let Some(next) = phase.next() {
            self.current_phase = next;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 30).unwrap()
    }

    #[test]
    fn define_starts_without_predecessor() {
        let mut project = Project::new("scrap", "Scrap");
        project.start_phase(Phase::Define, today(), None).unwrap();
        assert_eq!(project.phase_status(Phase::Define), PhaseStatus::InProgress);
        assert_eq!(project.current_phase, Phase::Define);
    }

    #[test]
    fn later_phase_blocked_until_predecessor_completed() {
        let mut project = Project::new("scrap", "Scrap");
        project.start_phase(Phase::Define, today(), None).unwrap();

        let err = project
            .start_phase(Phase::Measure, today(), None)
            .unwrap_err();
        assert!(matches!(err, DmaicError::PhaseOrderViolation { .. }));

        project.complete_phase(Phase::Define, today(), None).unwrap();
        project.start_phase(Phase::Measure, today(), None).unwrap();
        assert_eq!(project.current_phase, Phase::Measure);
    }

    #[test]
    fn skipping_a_phase_is_rejected() {
        let mut project = Project::new("scrap", "Scrap");
        project.start_phase(Phase::Define, today(), None).unwrap();
        project.complete_phase(Phase::Define, today(), None).unwrap();

        // Measure completed is required before Analyze, merely starting it is not enough
        assert!(project.start_phase(Phase::Analyze, today(), None).is_err());
        project.start_phase(Phase::Measure, today(), None).unwrap();
        assert!(project.start_phase(Phase::Analyze, today(), None).is_err());
    }

    #[test]
    fn complete_requires_in_progress() {
        let mut project = Project::new("scrap", "Scrap");

        // No record at all
        let err = project
            .complete_phase(Phase::Define, today(), None)
            .unwrap_err();
        assert!(matches!(err, DmaicError::InvalidPhaseTransition { .. }));

        project.start_phase(Phase::Define, today(), None).unwrap();
        project.complete_phase(Phase::Define, today(), None).unwrap();

        // Already completed
        assert!(project.complete_phase(Phase::Define, today(), None).is_err());
    }

    #[test]
    fn completing_advances_pointer_without_autostart() {
        let mut project = Project::new("scrap", "Scrap");
        project.start_phase(Phase::Define, today(), None).unwrap();
        project.complete_phase(Phase::Define, today(), None).unwrap();

        assert_eq!(project.current_phase, Phase::Measure);
        assert_eq!(project.phase_status(Phase::Measure), PhaseStatus::NotStarted);
    }

    #[test]
    fn control_is_terminal() {
        let mut project = Project::new("scrap", "Scrap");
        for phase in Phase::all() {
            project.start_phase(*phase, today(), None).unwrap();
            project.complete_phase(*phase, today(), None).unwrap();
        }
        // No phase after control; pointer stays put
        assert_eq!(project.current_phase, Phase::Control);
        assert_eq!(project.phase_status(Phase::Control), PhaseStatus::Completed);
    }

    #[test]
    fn restart_overwrites_start_date_and_notes() {
        let mut project = Project::new("scrap", "Scrap");
        let day1 = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let day2 = NaiveDate::from_ymd_opt(2026, 8, 15).unwrap();

        project
            .start_phase(Phase::Define, day1, Some("kickoff".to_string()))
            .unwrap();
        project
            .start_phase(Phase::Define, day2, Some("restarted".to_string()))
            .unwrap();

        let record = project.phase_record(Phase::Define).unwrap();
        assert_eq!(record.start_date, Some(day2));
        assert_eq!(record.notes.as_deref(), Some("restarted"));
    }

    #[test]
    fn no_reopening_of_completed_phase() {
        let mut project = Project::new("scrap", "Scrap");
        project.start_phase(Phase::Define, today(), None).unwrap();
        project.complete_phase(Phase::Define, today(), None).unwrap();

        let err = project.start_phase(Phase::Define, today(), None).unwrap_err();
        assert!(matches!(err, DmaicError::InvalidPhaseTransition { .. }));
    }

    #[test]
    fn predicates_have_no_side_effects() {
        let project = Project::new("scrap", "Scrap");
        assert!(project.can_start(Phase::Define).is_ok());
        assert!(project.can_start(Phase::Measure).is_err());
        assert!(project.can_complete(Phase::Define).is_err());
        // Nothing recorded by the checks
        assert!(project.phases.is_empty());
        assert_eq!(project.current_phase, Phase::Define);
    }

    #[test]
    fn completion_notes_stored() {
        let mut project = Project::new("scrap", "Scrap");
        project.start_phase(Phase::Define, today(), None).unwrap();
        project
            .complete_phase(Phase::Define, today(), Some("charter approved".to_string()))
            .unwrap();

        let record = project.phase_record(Phase::Define).unwrap();
        assert_eq!(record.status, PhaseStatus::Completed);
        assert_eq!(record.completion_date, Some(today()));
        assert_eq!(record.notes.as_deref(), Some("charter approved"));
    }
}
