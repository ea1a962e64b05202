use nexus_tracker_core::classify::Classification;
use nexus_tracker_core::contract::ListingItem;
use nexus_tracker_core::metadata::{
    join_url, normalize_group, parse_manifest, parse_packaging, ArtifactIdentity, VersionManifest,
};
use nexus_tracker_core::select::{build_record, select_versions, ARCHIVE_STATUS};
use nexus_tracker_core::timestamp::Timestamp;
use nexus_tracker_core::TrackerError;

const MANIFEST_MANY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<metadata>
  <groupId>com.example</groupId>
  <artifactId>demo</artifactId>
  <versioning>
    <latest>1.2</latest>
    <release>1.2</release>
    <versions>
      <version>1.0</version>
      <version>1.1</version>
      <version>1.2</version>
    </versions>
    <lastUpdated>20230201000000</lastUpdated>
  </versioning>
</metadata>"#;

const MANIFEST_SINGLE: &str = r#"<metadata>
  <versioning>
    <lastUpdated>20230101000000</lastUpdated>
    <versions><version>0.9.0</version></versions>
  </versioning>
</metadata>"#;

fn manifest(last_updated: &str, versions: &[&str]) -> VersionManifest {
    VersionManifest {
        last_updated: Timestamp::parse(last_updated).unwrap(),
        versions: versions.iter().map(|v| v.to_string()).collect(),
    }
}

fn identity(group: &str, name: &str) -> ArtifactIdentity {
    ArtifactIdentity::from_item(
        &ListingItem {
            repository: "libs-release".into(),
            group: group.into(),
            name: name.into(),
        },
        3,
    )
}

#[test]
fn test_manifest_with_version_list_keeps_document_order() {
    let parsed = parse_manifest(MANIFEST_MANY.as_bytes()).expect("parse");
    assert_eq!(parsed.last_updated.as_str(), "20230201000000");
    assert_eq!(parsed.versions, vec!["1.0", "1.1", "1.2"]);
    assert_eq!(parsed.newest(), Some("1.2"));
}

#[test]
fn test_manifest_with_single_version_becomes_sequence() {
    let parsed = parse_manifest(MANIFEST_SINGLE.as_bytes()).expect("parse");
    assert_eq!(parsed.versions, vec!["0.9.0"]);
}

#[test]
fn test_manifest_without_last_updated_is_rejected() {
    let xml = "<metadata><versioning><versions><version>1.0</version></versions></versioning></metadata>";
    let err = parse_manifest(xml.as_bytes()).unwrap_err();
    assert!(matches!(err, TrackerError::Parse { .. }), "got {err:?}");
}

#[test]
fn test_manifest_without_versions_is_rejected() {
    let xml = "<metadata><versioning><lastUpdated>20230101000000</lastUpdated><versions/></versioning></metadata>";
    assert!(parse_manifest(xml.as_bytes()).is_err());
}

#[test]
fn test_malformed_manifest_is_rejected() {
    let xml = "<metadata><versioning><lastUpdated>2023</versioning>";
    assert!(parse_manifest(xml.as_bytes()).is_err());
    assert!(parse_manifest(b"not xml at all").is_err());
}

#[test]
fn test_packaging_read_from_namespaced_pom() {
    let pom = r#"<?xml version="1.0"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
  <modelVersion>4.0.0</modelVersion>
  <groupId>com.example</groupId>
  <artifactId>webapp</artifactId>
  <version>1.0</version>
  <packaging>war</packaging>
  <dependencies><dependency><packaging>ignored</packaging></dependency></dependencies>
</project>"#;
    assert_eq!(parse_packaging(pom.as_bytes()).unwrap(), "war");
}

#[test]
fn test_packaging_defaults_to_jar() {
    let pom = "<project><artifactId>lib</artifactId></project>";
    assert_eq!(parse_packaging(pom.as_bytes()).unwrap(), "jar");
}

#[test]
fn test_group_normalization_replaces_only_leading_separators() {
    assert_eq!(normalize_group("com.example", 3), "com/example");
    assert_eq!(normalize_group("org.acme.tools.cli.extra", 3), "org/acme/tools/cli.extra");
    assert_eq!(normalize_group("org.acme.tools", 0), "org.acme.tools");
    assert_eq!(normalize_group("flat", 3), "flat");
}

#[test]
fn test_url_layout_for_manifest_and_descriptor() {
    let id = identity("com.example.platform", "demo");
    assert_eq!(
        id.manifest_url("http://nexus.local:8081/"),
        "http://nexus.local:8081/repository/libs-release/com/example/platform/demo/maven-metadata.xml"
    );
    assert_eq!(
        id.descriptor_url("http://nexus.local:8081", "1.2"),
        "http://nexus.local:8081/repository/libs-release/com/example/platform/demo/1.2/demo-1.2.pom"
    );
    assert_eq!(join_url("http://h/", &["/a/", "", "b"]), "http://h/a/b");
}

#[test]
fn test_first_seen_selects_every_version_in_order() {
    let m = manifest("20230101000000", &["1.0", "1.1", "2.0-beta"]);
    let selected = select_versions(Classification::FirstSeen, &m);
    assert_eq!(selected.len(), m.versions.len());
    assert_eq!(selected, m.versions);
}

#[test]
fn test_updated_selects_only_the_last_version() {
    let m = manifest("20230201000000", &["1.0", "1.1", "1.2"]);
    assert_eq!(select_versions(Classification::Updated, &m), vec!["1.2"]);
}

#[test]
fn test_unchanged_selects_nothing() {
    let m = manifest("20230201000000", &["1.0"]);
    assert!(select_versions(Classification::Unchanged, &m).is_empty());
}

#[test]
fn test_publish_record_fields_and_wire_names() {
    let id = identity("com.example", "demo");
    let m = manifest("20230101000000", &["1.0"]);
    let record = build_record(&id, &m, "1.0", "jar", "ci-bot");

    assert_eq!(record.timestamp, "20230101000000");
    assert_eq!(record.version, "1.0");
    assert_eq!(record.current_id, "com/example-demo-1.0.jar");
    assert_eq!(record.resource_key, "com.example:demo");
    assert_eq!(record.status, ARCHIVE_STATUS);
    assert_eq!(record.author, "ci-bot");

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["currentID"], "com/example-demo-1.0.jar");
    assert_eq!(json["resourceKey"], "com.example:demo");
    assert_eq!(json["Status"], "Archive");
    assert_eq!(json["Author"], "ci-bot");
}
