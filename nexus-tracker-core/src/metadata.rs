//! Maven metadata resolution: artifact coordinates, repository URL layout and
//! parsing of `maven-metadata.xml` and `.pom` documents.

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, error, info};

use crate::contract::{ListingItem, Transport};
use crate::error::TrackerError;
use crate::timestamp::Timestamp;

pub const MANIFEST_FILENAME: &str = "maven-metadata.xml";
pub const DEFAULT_PACKAGING: &str = "jar";

/// Coordinates of one artifact in one hosted repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactIdentity {
    pub repository: String,
    /// Dotted form as listed, e.g. `com.example.platform`.
    pub group: String,
    pub name: String,
    /// `group` with its first separators turned into `/`.
    pub group_path: String,
}

impl ArtifactIdentity {
    pub fn from_item(item: &ListingItem, group_path_depth: usize) -> Self {
        Self {
            repository: item.repository.clone(),
            group: item.group.clone(),
            name: item.name.clone(),
            group_path: normalize_group(&item.group, group_path_depth),
        }
    }

    pub fn resource_key(&self) -> String {
        format!("{}:{}", self.group, self.name)
    }

    fn artifact_base_url(&self, base_url: &str) -> String {
        join_url(
            base_url,
            &["repository", &self.repository, &self.group_path, &self.name],
        )
    }

    pub fn manifest_url(&self, base_url: &str) -> String {
        join_url(&self.artifact_base_url(base_url), &[MANIFEST_FILENAME])
    }

    pub fn descriptor_url(&self, base_url: &str, version: &str) -> String {
        let pom = format!("{}-{}.pom", self.name, version);
        join_url(&self.artifact_base_url(base_url), &[version, &pom])
    }
}

/// Replaces at most `depth` occurrences of `.` with `/`, left to right.
pub fn normalize_group(group: &str, depth: usize) -> String {
    let mut out = String::with_capacity(group.len());
    let mut replaced = 0;
    for c in group.chars() {
        if c == '.' && replaced < depth {
            out.push('/');
            replaced += 1;
        } else {
            out.push(c);
        }
    }
    out
}

/// Joins path segments onto `base`, collapsing the slashes at each seam.
pub fn join_url(base: &str, segments: &[&str]) -> String {
    let mut url = base.trim_end_matches('/').to_string();
    for segment in segments {
        let segment = segment.trim_matches('/');
        if segment.is_empty() {
            continue;
        }
        url.push('/');
        url.push_str(segment);
    }
    url
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionManifest {
    pub last_updated: Timestamp,
    /// Document order; the last element is the newest.
    pub versions: Vec<String>,
}

impl VersionManifest {
    pub fn newest(&self) -> Option<&str> {
        self.versions.last().map(String::as_str)
    }
}

/// Parses a `maven-metadata.xml` document. A single `<version>` and a list of
/// them both come out as a sequence.
pub fn parse_manifest(xml: &[u8]) -> Result<VersionManifest, TrackerError> {
    let texts = element_texts(
        xml,
        MANIFEST_FILENAME,
        &[
            "metadata/versioning/lastUpdated",
            "metadata/versioning/versions/version",
        ],
    )?;

    let mut last_updated = None;
    let mut versions = Vec::new();
    for (path, text) in texts {
        if path.ends_with("lastUpdated") {
            last_updated = Some(text);
        } else {
            versions.push(text);
        }
    }

    let last_updated = last_updated
        .ok_or_else(|| TrackerError::parse(MANIFEST_FILENAME, "missing versioning/lastUpdated"))?;
    let last_updated = Timestamp::parse(&last_updated)?;
    if versions.is_empty() {
        return Err(TrackerError::parse(
            MANIFEST_FILENAME,
            "no versioning/versions/version entries",
        ));
    }

    Ok(VersionManifest {
        last_updated,
        versions,
    })
}

/// Reads `project/packaging` from a `.pom`, falling back to Maven's default.
pub fn parse_packaging(xml: &[u8]) -> Result<String, TrackerError> {
    let texts = element_texts(xml, "pom", &["project/packaging"])?;
    Ok(texts
        .into_iter()
        .map(|(_, text)| text)
        .find(|text| !text.is_empty())
        .unwrap_or_else(|| DEFAULT_PACKAGING.to_string()))
}

/// Collects the text of every element whose slash-joined local-name path is in
/// `wanted`, in document order.
fn element_texts(
    xml: &[u8],
    context: &str,
    wanted: &[&str],
) -> Result<Vec<(String, String)>, TrackerError> {
    let mut reader = Reader::from_reader(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut stack: Vec<String> = Vec::new();
    let mut found = Vec::new();
    let mut saw_root = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                saw_root = true;
                stack.push(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
            }
            Ok(Event::Empty(_)) => {
                saw_root = true;
            }
            Ok(Event::End(_)) => {
                stack.pop();
            }
            Ok(Event::Text(ref e)) => {
                let path = stack.join("/");
                if wanted.contains(&path.as_str()) {
                    let text = e
                        .unescape()
                        .map_err(|err| TrackerError::parse(context, err))?
                        .trim()
                        .to_string();
                    found.push((path, text));
                }
            }
            Ok(Event::CData(ref e)) => {
                let path = stack.join("/");
                if wanted.contains(&path.as_str()) {
                    let text = String::from_utf8_lossy(&**e).trim().to_string();
                    found.push((path, text));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                error!(error = ?e, context, "Malformed XML document");
                return Err(TrackerError::parse(
                    context,
                    format!("at byte {}: {e}", reader.buffer_position()),
                ));
            }
        }
        buf.clear();
    }

    if !saw_root {
        return Err(TrackerError::parse(context, "document has no root element"));
    }
    Ok(found)
}

/// Fetches and parses artifact manifests over a [`Transport`].
pub struct MetadataResolver<'a, T: Transport + ?Sized> {
    transport: &'a T,
    base_url: &'a str,
}

impl<'a, T: Transport + ?Sized> MetadataResolver<'a, T> {
    pub fn new(transport: &'a T, base_url: &'a str) -> Self {
        Self {
            transport,
            base_url,
        }
    }

    pub async fn resolve(
        &self,
        identity: &ArtifactIdentity,
    ) -> Result<VersionManifest, TrackerError> {
        let url = identity.manifest_url(self.base_url);
        debug!(url = %url, "Fetching version manifest");
        let what = format!("manifest for {}", identity.resource_key());

        let body = self
            .transport
            .fetch_document(&url)
            .await
            .map_err(|e| TrackerError::resolution(what.clone(), e))?;
        let manifest = parse_manifest(&body).map_err(|e| TrackerError::resolution(what, e))?;

        info!(
            repository = %identity.repository,
            resource_key = %identity.resource_key(),
            last_updated = %manifest.last_updated,
            versions = manifest.versions.len(),
            "Resolved version manifest"
        );
        Ok(manifest)
    }

    /// Packaging type of one version, read from its package descriptor.
    pub async fn packaging(
        &self,
        identity: &ArtifactIdentity,
        version: &str,
    ) -> Result<String, TrackerError> {
        let url = identity.descriptor_url(self.base_url, version);
        debug!(url = %url, "Fetching package descriptor");
        let what = format!("descriptor for {}:{}", identity.resource_key(), version);

        let body = self
            .transport
            .fetch_document(&url)
            .await
            .map_err(|e| TrackerError::resolution(what.clone(), e))?;
        parse_packaging(&body).map_err(|e| TrackerError::resolution(what, e))
    }
}
