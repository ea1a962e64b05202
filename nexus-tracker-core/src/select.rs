//! Which versions of a classified artifact get published, and what the
//! published record looks like.

use crate::classify::Classification;
use crate::contract::PublishRecord;
use crate::metadata::{ArtifactIdentity, VersionManifest};

pub const ARCHIVE_STATUS: &str = "Archive";

/// All versions on first sight, only the newest on update, nothing otherwise.
pub fn select_versions(classification: Classification, manifest: &VersionManifest) -> Vec<String> {
    match classification {
        Classification::FirstSeen => manifest.versions.clone(),
        Classification::Updated => manifest.newest().map(str::to_string).into_iter().collect(),
        Classification::Unchanged => Vec::new(),
    }
}

pub fn build_record(
    identity: &ArtifactIdentity,
    manifest: &VersionManifest,
    version: &str,
    packaging: &str,
    author: &str,
) -> PublishRecord {
    PublishRecord {
        timestamp: manifest.last_updated.to_string(),
        version: version.to_string(),
        current_id: format!(
            "{}-{}-{}.{}",
            identity.group_path, identity.name, version, packaging
        ),
        resource_key: identity.resource_key(),
        status: ARCHIVE_STATUS.to_string(),
        author: author.to_string(),
    }
}
