use std::collections::HashSet;

use tracing::warn;

use super::FeedSnapshot;
use crate::{ImporterError, Result};

pub struct FeedValidator;

impl FeedValidator {
    /// Checks the three feeds before anything is written. Errors abort the
    /// sync; warnings are returned for logging.
    pub fn validate(snapshot: &FeedSnapshot) -> Result<ValidationReport> {
        let mut report = ValidationReport::default();

        let mut field_ids = HashSet::new();
        for entry in &snapshot.field.field {
            if !field_ids.insert(entry.dg_id) {
                report
                    .errors
                    .push(format!("Duplicate dg_id {} in field list", entry.dg_id));
            }
            if entry.player_name.trim().is_empty() {
                report
                    .errors
                    .push(format!("Field entry {} has an empty player_name", entry.dg_id));
            }
            if entry.r1_teetime.as_deref().is_none_or(|t| t.trim().is_empty()) {
                report.warnings.push(format!(
                    "Field entry '{}' ({}) has no round one tee time",
                    entry.player_name, entry.dg_id
                ));
            }
            if entry.withdrawn() {
                report.warnings.push(format!(
                    "Field entry '{}' ({}) is flagged as withdrawn",
                    entry.player_name, entry.dg_id
                ));
            }
        }

        let mut ranked_ids = HashSet::new();
        for entry in &snapshot.rankings.rankings {
            if !ranked_ids.insert(entry.dg_id) {
                report
                    .errors
                    .push(format!("Duplicate dg_id {} in rankings", entry.dg_id));
            }
        }

        let mut live_ids = HashSet::new();
        for entry in &snapshot.live.data {
            if !live_ids.insert(entry.dg_id) {
                report
                    .errors
                    .push(format!("Duplicate dg_id {} in live feed", entry.dg_id));
            }
            if entry.player_name.trim().is_empty() {
                report
                    .errors
                    .push(format!("Live entry {} has an empty player_name", entry.dg_id));
            }
            if !field_ids.is_empty() && !field_ids.contains(&entry.dg_id) {
                report.warnings.push(format!(
                    "Live entry '{}' ({}) is not in the field list",
                    entry.player_name, entry.dg_id
                ));
            }
        }

        let estimated = snapshot
            .rankings
            .rankings
            .iter()
            .filter(|r| r.dg_skill_estimate.is_some())
            .map(|r| r.dg_id)
            .collect::<HashSet<_>>();
        let mut unranked = field_ids
            .union(&live_ids)
            .filter(|id| !estimated.contains(id))
            .copied()
            .collect::<Vec<_>>();
        unranked.sort_unstable();
        if !unranked.is_empty() {
            report.warnings.push(format!(
                "{} player(s) have no skill estimate: {:?}",
                unranked.len(),
                unranked
            ));
        }

        if !report.errors.is_empty() {
            Err(ImporterError::ValidationError(format!(
                "Validation failed with {} error(s): {}",
                report.errors.len(),
                report.errors.join("; ")
            )))
        } else {
            Ok(report)
        }
    }
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            warn!("{}", warning);
        }
    }
}
