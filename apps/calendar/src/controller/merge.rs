//! Merging the per-level obligation groups into one date-ordered list.

use serde::Serialize;
use shared::domain::{JurisdictionLevel, Obligation, ObligationsResponse};

/// An obligation tagged with the backend group it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergedObligation {
    pub level: JurisdictionLevel,
    #[serde(flatten)]
    pub obligation: Obligation,
}

/// Concatenates federal, state, county and municipality groups, then stable-sorts
/// by due date. Missing or unparseable dates go after every dated obligation.
pub fn combine_obligations(response: &ObligationsResponse) -> Vec<MergedObligation> {
    let mut merged: Vec<MergedObligation> = JurisdictionLevel::GROUPS
        .iter()
        .flat_map(|level| {
            response
                .group(level)
                .iter()
                .map(move |obligation| MergedObligation {
                    level: level.clone(),
                    obligation: obligation.clone(),
                })
        })
        .collect();
    merged.sort_by_cached_key(|m| {
        let due = m.obligation.due_date_value();
        (due.is_none(), due)
    });
    merged
}
