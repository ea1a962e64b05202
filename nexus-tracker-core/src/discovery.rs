//! Pagination driver: walks the listing endpoint page by page and runs
//! resolve → classify → select → publish once per distinct artifact.
//!
//! # Deduplication
//! Within a page, an item is skipped when its repository equals that of the
//! item processed just before it, unless it is the page's first item. The
//! "previous repository" carries over page boundaries. Repositories that
//! reappear non-contiguously are processed again; the listing is expected to
//! be grouped by repository.
//!
//! # Failure policy
//! - A page that cannot be fetched or decoded aborts the run.
//! - A manifest that cannot be resolved aborts the run.
//! - A package descriptor that cannot be resolved skips that version only.
//! - A publish failure aborts the run; tracking already written stays written.

use std::time::Instant;

use reqwest::Url;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::classify::{ChangeClassifier, Classification};
use crate::config::NexusConfig;
use crate::contract::{ListingItem, ListingPage, Publisher, Transport};
use crate::error::TrackerError;
use crate::metadata::{ArtifactIdentity, MetadataResolver};
use crate::select::{build_record, select_versions};

pub const CONTINUATION_PARAM: &str = "continuationToken";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryReport {
    pub run_id: String,
    pub pages: usize,
    pub items_seen: usize,
    pub duplicates_skipped: usize,
    pub artifacts_processed: usize,
    pub first_seen: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub records_published: usize,
    pub versions_skipped: usize,
    pub elapsed_ms: u128,
}

/// Resolves the configured first listing query to an absolute URL. A
/// scheme-less `host:port/path` takes the scheme of `base_url`.
pub fn listing_url(config: &NexusConfig) -> Result<Url, TrackerError> {
    let endpoint = config.first_end_point.trim();
    let base = format!("{}/", config.base_url.trim_end_matches('/'));
    let base = Url::parse(&base).map_err(|e| TrackerError::parse("base_url", e))?;

    match Url::parse(endpoint) {
        Ok(url) if url.has_host() => Ok(url),
        // `host:port/path` parses with the host as its scheme.
        Ok(_) => {
            let url = Url::parse(&format!("{}://{}", base.scheme(), endpoint))
                .map_err(|e| TrackerError::parse("first_end_point", e))?;
            if !url.has_host() {
                return Err(TrackerError::parse("first_end_point", "URL has no host"));
            }
            Ok(url)
        }
        Err(_) => base
            .join(endpoint.trim_start_matches('/'))
            .map_err(|e| TrackerError::parse("first_end_point", e)),
    }
}

/// The original query with `continuationToken=<token>` appended.
pub fn continuation_url(first: &Url, token: &str) -> Url {
    let mut next = first.clone();
    next.query_pairs_mut().append_pair(CONTINUATION_PARAM, token);
    next
}

pub async fn fetch_page<T: Transport + ?Sized>(
    transport: &T,
    url: &Url,
) -> Result<ListingPage, TrackerError> {
    let value = transport.fetch_json(url.as_str()).await?;
    serde_json::from_value::<ListingPage>(value).map_err(|e| {
        error!(error = ?e, url = %url, "Listing page has unexpected shape");
        TrackerError::parse(format!("listing page {url}"), e)
    })
}

/// Runs one discovery pass. `author` is the authenticated principal stamped
/// on every record.
pub async fn run<T, P>(
    config: &NexusConfig,
    author: &str,
    transport: &T,
    publisher: &P,
    classifier: &mut ChangeClassifier,
) -> Result<DiscoveryReport, TrackerError>
where
    T: Transport + ?Sized,
    P: Publisher + ?Sized,
{
    let run_id = Uuid::new_v4().to_string();
    let span = info_span!("discovery", run_id = %run_id);
    let started = Instant::now();

    let result = async {
        let mut report = DiscoveryReport {
            run_id: run_id.clone(),
            ..DiscoveryReport::default()
        };
        let first = listing_url(config)?;
        let resolver = MetadataResolver::new(transport, &config.base_url);
        info!(url = %first, "Starting discovery");

        let mut url = first.clone();
        let mut previous: Option<String> = None;
        loop {
            let page = fetch_page(transport, &url).await?;
            report.pages += 1;
            info!(
                page = report.pages,
                items = page.items.len(),
                has_next = page.continuation_token.is_some(),
                "Fetched listing page"
            );

            for (index, item) in page.items.iter().enumerate() {
                report.items_seen += 1;
                if index != 0 && previous.as_deref() == Some(item.repository.as_str()) {
                    report.duplicates_skipped += 1;
                    debug!(repository = %item.repository, name = %item.name, "Skipping consecutive item of same repository");
                    continue;
                }
                previous = Some(item.repository.clone());
                process_item(config, author, &resolver, publisher, classifier, item, &mut report)
                    .await?;
            }

            match page.continuation_token.as_deref().map(str::trim) {
                Some(token) if !token.is_empty() => {
                    url = continuation_url(&first, token);
                }
                Some(_) => {
                    warn!(page = report.pages, "Empty continuation token, treating as last page");
                    break;
                }
                None => break,
            }
        }
        Ok::<DiscoveryReport, TrackerError>(report)
    }
    .instrument(span.clone())
    .await;

    let _enter = span.enter();
    match result {
        Ok(mut report) => {
            report.elapsed_ms = started.elapsed().as_millis();
            info!(
                pages = report.pages,
                artifacts = report.artifacts_processed,
                published = report.records_published,
                skipped_versions = report.versions_skipped,
                elapsed_ms = report.elapsed_ms,
                "Discovery complete"
            );
            Ok(report)
        }
        Err(e) => {
            error!(error = %e, elapsed_ms = started.elapsed().as_millis(), "Discovery aborted");
            Err(e)
        }
    }
}

async fn process_item<T, P>(
    config: &NexusConfig,
    author: &str,
    resolver: &MetadataResolver<'_, T>,
    publisher: &P,
    classifier: &mut ChangeClassifier,
    item: &ListingItem,
    report: &mut DiscoveryReport,
) -> Result<(), TrackerError>
where
    T: Transport + ?Sized,
    P: Publisher + ?Sized,
{
    let identity = ArtifactIdentity::from_item(item, config.group_path_depth);
    let manifest = resolver.resolve(&identity).await?;
    report.artifacts_processed += 1;

    let classification = classifier.classify(&identity.repository, &manifest.last_updated)?;
    match classification {
        Classification::FirstSeen => report.first_seen += 1,
        Classification::Updated => report.updated += 1,
        Classification::Unchanged => report.unchanged += 1,
    }

    let versions = select_versions(classification, &manifest);
    let mut records = Vec::with_capacity(versions.len());
    for version in &versions {
        match resolver.packaging(&identity, version).await {
            Ok(packaging) => {
                records.push(build_record(&identity, &manifest, version, &packaging, author));
            }
            Err(e) => {
                report.versions_skipped += 1;
                warn!(
                    error = %e,
                    resource_key = %identity.resource_key(),
                    version = %version,
                    "Skipping version with unresolvable descriptor"
                );
            }
        }
    }

    if records.is_empty() {
        return Ok(());
    }
    let count = records.len();
    publisher.publish(records).await.map_err(|e| {
        error!(error = %e, resource_key = %identity.resource_key(), "Publishing records failed");
        e
    })?;
    report.records_published += count;
    info!(
        resource_key = %identity.resource_key(),
        ?classification,
        records = count,
        "Published artifact versions"
    );
    Ok(())
}
