//! Count and metadata reconciliation
//!
//! Before registration the local job is aligned with what is already running,
//! so a deploy does not reset counts changed by scaling, and does not erase a
//! pending redeploy marker.

use pilot_core::domain::job::Job;
use tracing::{debug, info};

use crate::error::{DeployError, Result};

/// Task group metadata key whose value forces a new version when changed
pub const REDEPLOY_META_KEY: &str = "pilot_redeploy";

/// Overwrites local group counts with the counts of same-named remote groups
///
/// Groups are never added or removed. A missing remote job leaves the local
/// job untouched.
pub fn reconcile_counts(local: &mut Job, remote: Option<&Job>) {
    let Some(remote) = remote else {
        return;
    };

    debug!(
        "attempting to update group counts for job \"{}\" from remote job",
        local.identifier()
    );

    let job_name = local.name.clone();
    for remote_group in &remote.task_groups {
        let Some(group) = local.group_mut(&remote_group.name) else {
            continue;
        };
        if group.count != remote_group.count {
            info!(
                "updating count to match running job \"{}\", group \"{}\" from {} to {}",
                job_name, group.name, group.count, remote_group.count
            );
            group.count = remote_group.count;
        }
    }
}

/// Carries the remote redeploy marker into same-named local groups
///
/// The marker is only ever copied, never removed or invented.
pub fn reconcile_redeploy_meta(local: &mut Job, remote: Option<&Job>) {
    let Some(remote) = remote else {
        return;
    };

    debug!(
        "attempting to update redeploy meta for job \"{}\" from remote job",
        local.identifier()
    );

    for remote_group in &remote.task_groups {
        let Some(value) = remote_group.meta_value(REDEPLOY_META_KEY) else {
            continue;
        };
        let Some(group) = local.group_mut(&remote_group.name) else {
            continue;
        };
        debug!(
            "updating `{}` meta key to match remote group \"{}\"",
            REDEPLOY_META_KEY, group.name
        );
        group
            .meta_mut()
            .insert(REDEPLOY_META_KEY.to_string(), value.to_string());
    }
}

/// Stamps the redeploy marker on the named groups, or on every group when
/// `groups` is empty
///
/// Fails without touching the job if a named group does not exist.
pub fn stamp_redeploy_marker(job: &mut Job, groups: &[String], value: &str) -> Result<()> {
    if let Some(missing) = groups.iter().find(|name| job.group(name).is_none()) {
        return Err(DeployError::GroupNotFound(missing.clone()));
    }

    for group in &mut job.task_groups {
        if groups.is_empty() || groups.contains(&group.name) {
            group
                .meta_mut()
                .insert(REDEPLOY_META_KEY.to_string(), value.to_string());
        }
    }

    Ok(())
}
