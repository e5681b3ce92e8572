//! Stats projection: raw counters shaped into the owner's report view.

use std::collections::HashMap;

use canvass_common::AppResult;
use canvass_db::repositories::{FormRepository, SectionRepository, StatRepository};
use canvass_db::entities::user;
use serde::Serialize;
use tracing::info;

use super::form::authorize_owner;

/// Stats projection service.
#[derive(Clone)]
pub struct StatsService {
    form_repo: FormRepository,
    section_repo: SectionRepository,
    stat_repo: StatRepository,
}

/// Aggregated results for one form.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FormStats {
    pub title: String,
    pub description: String,
    pub sections: Vec<SectionStats>,
}

/// Aggregated results for one section, options in declared order.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SectionStats {
    pub title: String,
    pub options: Vec<OptionStat>,
}

/// Vote count for one option value.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OptionStat {
    pub value: String,
    pub count: i64,
}

impl StatsService {
    /// Create a new stats service.
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

    /// Project a form's counters for its owner.
    ///
    /// The projection is shaped by the current section and option
    /// definitions: options with no recorded votes appear with count 0,
    /// and stat rows for options no longer declared are not projected.
    pub async fn project(&self, form_id: &str, owner: &user::Model) -> AppResult<FormStats> {
        let form = self.form_repo.get_by_id(form_id).await?;
        authorize_owner(&form, owner)?;

        let sections = self.section_repo.find_by_form(form_id).await?;
        let stats = self.stat_repo.find_by_form(form_id).await?;

        // One lookup table for all sections; stat rows are keyed by the
        // (section, optionValue) pair.
        let counts: HashMap<(String, String), i64> = stats
            .into_iter()
            .map(|s| ((s.section_id, s.option_value), s.count))
            .collect();

        let section_stats = sections
            .into_iter()
            .map(|section| {
                let options = section
                    .option_values()
                    .into_iter()
                    .map(|value| {
                        let count = counts
                            .get(&(section.id.clone(), value.clone()))
                            .copied()
                            .unwrap_or(0);
                        OptionStat { value, count }
                    })
                    .collect();
                SectionStats {
                    title: section.title,
                    options,
                }
            })
            .collect();

        Ok(FormStats {
            title: form.title,
            description: form.description,
            sections: section_stats,
        })
    }

    /// Delete stat rows orphaned by section replacement. Owner-only.
    ///
    /// Returns the number of rows purged.
    pub async fn purge_orphaned(&self, form_id: &str, owner: &user::Model) -> AppResult<u64> {
        let form = self.form_repo.get_by_id(form_id).await?;
        authorize_owner(&form, owner)?;

        let live_ids: Vec<String> = self
            .section_repo
            .find_by_form(form_id)
            .await?
            .into_iter()
            .map(|s| s.id)
            .collect();

        let purged = self.stat_repo.delete_orphaned(form_id, &live_ids).await?;

        info!(form_id = %form.id, purged, "Purged orphaned stats");

        Ok(purged)
    }
}
