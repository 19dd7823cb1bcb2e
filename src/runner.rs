use anyhow::Result;
use chrono::Utc;
use reqwest::Client;
use tracing::{info, warn};

use crate::api;
use crate::notifier::{Delivery, TelegramNotifier, format_new_token_message};
use crate::store::TokenStore;
use crate::types::{ProcessedTokens, RunReport, TokenRecord};

/// Addresses from `candidates` not yet present in `processed`, discovery
/// order preserved. First occurrence wins within a batch.
pub fn detect_new_addresses(candidates: &[String], processed: &ProcessedTokens) -> Vec<String> {
    let mut new_addresses: Vec<String> = Vec::new();
    for address in candidates {
        if processed.contains_key(address) || new_addresses.contains(address) {
            continue;
        }
        new_addresses.push(address.clone());
    }
    new_addresses
}

/// Insert a `notified = true` record for each new address. Existing entries
/// are never touched.
pub fn record_new_addresses(processed: &mut ProcessedTokens, new_addresses: &[String]) {
    let now = Utc::now();
    for address in new_addresses {
        processed.insert(
            address.clone(),
            TokenRecord {
                first_seen: now,
                notified: true,
            },
        );
    }
}

/// One full watcher pass: fetch, diff against the store, notify, persist.
///
/// Notifications go out before the store is saved. A crash in between means
/// those tokens are re-notified on the next run (at-least-once delivery).
pub async fn run(
    client: &Client,
    base_url: &str,
    network: &str,
    store: &dyn TokenStore,
    notifier: &TelegramNotifier,
    dry_run: bool,
) -> Result<RunReport> {
    info!("Fetching new {network} pools...");
    let candidates = match api::fetch_new_pool_addresses(client, base_url, network).await {
        Ok(candidates) => candidates,
        Err(e) => {
            warn!("Failed to fetch new pools: {e:#}");
            Vec::new()
        }
    };

    let mut report = RunReport {
        timestamp: Utc::now().to_rfc3339(),
        candidates: candidates.len(),
        new_tokens: Vec::new(),
        delivered: 0,
        failed: 0,
        saved: false,
    };

    if candidates.is_empty() {
        info!("No new pools listed");
        return Ok(report);
    }

    // A malformed store file is the one failure that terminates the run.
    let mut processed = store.load()?;

    let new_addresses = detect_new_addresses(&candidates, &processed);
    if new_addresses.is_empty() {
        info!(
            "All {} candidate(s) already processed, store untouched",
            candidates.len()
        );
        return Ok(report);
    }

    info!("Detected {} new token(s)", new_addresses.len());
    record_new_addresses(&mut processed, &new_addresses);

    for address in &new_addresses {
        if dry_run {
            info!("[dry-run] Would notify about {address}");
            continue;
        }
        match notifier.notify(&format_new_token_message(address)).await {
            Ok(Delivery::Sent) => {
                info!("Notified about {address}");
                report.delivered += 1;
            }
            Ok(Delivery::NotConfigured) => {
                report.failed += 1;
            }
            Err(e) => {
                warn!("Failed to notify about {address}: {e:#}");
                report.failed += 1;
            }
        }
    }

    report.new_tokens = new_addresses;
    if dry_run {
        info!("[dry-run] Skipping store save");
    } else {
        store.save(&processed)?;
        report.saved = true;
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{JsonFileStore, TokenStore};
    use std::path::PathBuf;
    use std::time::Duration;

    fn addrs(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn test_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "eth-token-watch-runner-{name}-{}.json",
            std::process::id()
        ))
    }

    // ── detect_new_addresses ───────────────────────────────────────

    #[test]
    fn detects_all_against_empty_store() {
        let processed = ProcessedTokens::new();
        let new = detect_new_addresses(&addrs(&["0xA", "0xB"]), &processed);
        assert_eq!(new, addrs(&["0xA", "0xB"]));
    }

    #[test]
    fn known_addresses_are_skipped() {
        let mut processed = ProcessedTokens::new();
        record_new_addresses(&mut processed, &addrs(&["0xA"]));
        let new = detect_new_addresses(&addrs(&["0xA", "0xB"]), &processed);
        assert_eq!(new, addrs(&["0xB"]));
    }

    #[test]
    fn batch_duplicates_keep_first_occurrence() {
        let processed = ProcessedTokens::new();
        let new = detect_new_addresses(&addrs(&["0xA", "0xB", "0xA"]), &processed);
        assert_eq!(new, addrs(&["0xA", "0xB"]));
    }

    #[test]
    fn second_pass_over_same_candidates_is_empty() {
        let candidates = addrs(&["0xA", "0xB"]);
        let mut processed = ProcessedTokens::new();

        let first = detect_new_addresses(&candidates, &processed);
        assert_eq!(first.len(), 2);
        record_new_addresses(&mut processed, &first);

        let second = detect_new_addresses(&candidates, &processed);
        assert!(second.is_empty());
    }

    // ── record_new_addresses ───────────────────────────────────────

    #[test]
    fn records_are_notified_and_existing_entries_untouched() {
        let mut processed = ProcessedTokens::new();
        record_new_addresses(&mut processed, &addrs(&["0xOLD"]));
        let original_first_seen = processed["0xOLD"].first_seen;

        record_new_addresses(&mut processed, &addrs(&["0xNEW"]));
        assert!(processed["0xNEW"].notified);
        assert_eq!(processed["0xOLD"].first_seen, original_first_seen);
    }

    // ── run ────────────────────────────────────────────────────────

    #[tokio::test]
    async fn unreachable_listing_api_leaves_store_untouched() {
        let path = test_path("unreachable");
        let store = JsonFileStore::new(&path);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
            .expect("client");
        let notifier = TelegramNotifier::new(client.clone(), None);

        let report = run(&client, "http://127.0.0.1:9", "eth", &store, &notifier, false)
            .await
            .expect("run");

        assert_eq!(report.candidates, 0);
        assert!(report.new_tokens.is_empty());
        assert!(!report.saved);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn first_discovery_persists_and_second_is_noop() {
        let path = test_path("scenario");
        let _ = std::fs::remove_file(&path);
        let store = JsonFileStore::new(&path);

        // First pass over eth_0xABC: one new entry, persisted
        let mut processed = store.load().expect("load");
        let new = detect_new_addresses(&addrs(&["0xABC"]), &processed);
        assert_eq!(new, addrs(&["0xABC"]));
        record_new_addresses(&mut processed, &new);
        store.save(&processed).expect("save");

        let reloaded = store.load().expect("reload");
        assert!(reloaded["0xABC"].notified);

        // Second pass with the same upstream set: nothing new
        let second = detect_new_addresses(&addrs(&["0xABC"]), &reloaded);
        assert!(second.is_empty());

        let _ = std::fs::remove_file(&path);
    }
}
