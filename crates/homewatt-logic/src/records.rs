//! Stored submissions and the annotated usage log.
//!
//! These mirror the records a storage layer keeps (one per profile, one per
//! usage submission). Reading and writing them is the caller's business; this
//! module only joins them and attaches consumption estimates.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::estimator::{estimate_consumption, ConsumptionResult};
use crate::profile::Profile;
use crate::reference::ReferenceData;
use crate::usage::UsageAnswers;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    pub id: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(flatten)]
    pub profile: Profile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
    pub user_id: String,
    #[serde(default)]
    pub usage: UsageAnswers,
    #[serde(default)]
    pub date: String,
}

/// A usage record with its estimate, when its owner's profile is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedUsage {
    #[serde(flatten)]
    pub record: UsageRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumption: Option<ConsumptionResult>,
}

/// Everything stored, with each usage annotated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageLog {
    pub users: Vec<ProfileRecord>,
    pub usages: Vec<AnnotatedUsage>,
}

/// Attach an estimate to every usage whose `user_id` matches a profile.
/// Input order is kept; when profile ids repeat, the last one wins.
pub fn annotate_usage_log(
    reference: &ReferenceData,
    profiles: &[ProfileRecord],
    usages: &[UsageRecord],
) -> Vec<AnnotatedUsage> {
    let by_id: HashMap<&str, &Profile> = profiles
        .iter()
        .map(|p| (p.id.as_str(), &p.profile))
        .collect();

    let annotated: Vec<AnnotatedUsage> = usages
        .iter()
        .map(|record| AnnotatedUsage {
            consumption: by_id
                .get(record.user_id.as_str())
                .map(|profile| estimate_consumption(reference, profile, &record.usage)),
            record: record.clone(),
        })
        .collect();

    let orphans = annotated.iter().filter(|u| u.consumption.is_none()).count();
    if orphans > 0 {
        log::debug!("{} usage records have no matching profile", orphans);
    }
    annotated
}

pub fn build_usage_log(
    reference: &ReferenceData,
    profiles: Vec<ProfileRecord>,
    usages: &[UsageRecord],
) -> UsageLog {
    let usages = annotate_usage_log(reference, &profiles, usages);
    UsageLog {
        users: profiles,
        usages,
    }
}
