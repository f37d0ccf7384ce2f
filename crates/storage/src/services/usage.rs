use std::collections::HashMap;

use super::rating::round2;
use crate::models::Team;

/// Percentage of rosters that include each golfer, keyed by provider id.
///
/// A tournament without rosters has no usage at all, so the map is empty
/// rather than full of zeros.
pub fn compute_usage(teams: &[Team]) -> HashMap<i64, f64> {
    let mut usage = HashMap::new();
    if teams.is_empty() {
        return usage;
    }

    for team in teams {
        let mut seen = Vec::with_capacity(team.golfer_api_ids.len());
        for api_id in &team.golfer_api_ids {
            if seen.contains(api_id) {
                continue;
            }
            seen.push(*api_id);
            *usage.entry(*api_id).or_insert(0.0) += 1.0;
        }
    }

    let total = teams.len() as f64;
    for count in usage.values_mut() {
        *count = round2(*count / total * 100.0);
    }

    usage
}
