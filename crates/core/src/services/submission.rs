//! Submission aggregation: anonymous answers applied against a form.

use canvass_common::{AppError, AppResult};
use canvass_db::repositories::{FormRepository, SectionRepository, StatRepository};
use serde::Deserialize;
use tracing::debug;

/// Submission aggregation service.
#[derive(Clone)]
pub struct SubmissionService {
    form_repo: FormRepository,
    section_repo: SectionRepository,
    stat_repo: StatRepository,
}

/// One submitted answer: a section and the selected option values.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerInput {
    pub section_id: String,
    #[serde(default)]
    pub values: Vec<String>,
}

/// An anonymous submission against a form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionInput {
    #[serde(default)]
    pub answers: Vec<AnswerInput>,
}

/// Per-answer result. Skips are internal bookkeeping only; callers of the
/// public API cannot distinguish a skip from an applied answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// Counters were incremented for every selected value.
    Applied,
    /// The section is unknown or belongs to a different form; no counter
    /// was touched.
    SkippedUnknownSection,
}

impl SubmissionService {
    /// Create a new submission service.
    #[must_use]
    pub const fn new(
        form_repo: FormRepository,
        section_repo: SectionRepository,
        stat_repo: StatRepository,
    ) -> Self {
        Self {
            form_repo,
            section_repo,
            stat_repo,
        }
    }

    /// Apply a submission to a form's counters.
    ///
    /// Fails with `FormNotFound` when the form id does not resolve. Answers
    /// naming a section outside the form are dropped answer-by-answer; the
    /// remaining increments commit as one transaction.
    pub async fn submit(
        &self,
        form_id: &str,
        input: SubmissionInput,
    ) -> AppResult<Vec<AnswerOutcome>> {
        let form = self.form_repo.get_by_id(form_id).await?;

        let mut outcomes = Vec::with_capacity(input.answers.len());
        let mut selections: Vec<(String, Vec<String>)> = Vec::new();

        for answer in input.answers {
            match self.section_repo.find_by_id(&answer.section_id).await? {
                Some(section) if section.form_id == form.id => {
                    selections.push((section.id, answer.values));
                    outcomes.push(AnswerOutcome::Applied);
                }
                _ => {
                    debug!(
                        form_id = %form.id,
                        section_id = %answer.section_id,
                        "Skipped answer for unknown or foreign section"
                    );
                    outcomes.push(AnswerOutcome::SkippedUnknownSection);
                }
            }
        }

        self.stat_repo.record_selections(&form.id, &selections).await?;

        Ok(outcomes)
    }
}
