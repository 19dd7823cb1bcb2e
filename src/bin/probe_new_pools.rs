//! Probe: GeckoTerminal new_pools endpoint
//!
//! Hits GET {GECKO_API_BASE}/networks/eth/new_pools once and documents:
//! - Response status and latency
//! - Top-level shape and per-pool fields
//! - base_token id prefix distribution
//! - Candidate addresses after prefix filtering
//!
//! Read-only: no store mutation, no notifications.

use std::time::Instant;

use anyhow::Result;
use serde_json::Value;

use eth_token_watch::api::extract_token_addresses;
use eth_token_watch::types::NewPoolsResponse;
use eth_token_watch::{DEFAULT_NETWORK, GECKO_API_BASE};

#[tokio::main]
async fn main() -> Result<()> {
    let client = reqwest::Client::new();
    let url = format!("{GECKO_API_BASE}/networks/{DEFAULT_NETWORK}/new_pools");

    println!("=== Probe: new_pools ===");
    println!("URL: {url}");
    println!();

    let start = Instant::now();
    let resp = client.get(&url).send().await?;
    let latency = start.elapsed();
    let status = resp.status();
    let body: Value = resp.json().await?;
    println!("Status: {status}");
    println!("Latency: {latency:?}");
    println!();

    let pools = body.get("data").and_then(|v| v.as_array());
    match pools {
        Some(arr) => {
            println!("Pool count: {}", arr.len());
            if let Some(first) = arr.first() {
                println!("\nSample pool (first):");
                println!("{}", serde_json::to_string_pretty(first)?);
            }

            // base_token id prefix distribution
            let mut with_prefix = 0;
            let mut other = 0;
            for pool in arr {
                let id = pool
                    .pointer("/relationships/base_token/data/id")
                    .and_then(|v| v.as_str())
                    .unwrap_or("");
                if id.starts_with(&format!("{DEFAULT_NETWORK}_")) {
                    with_prefix += 1;
                } else {
                    other += 1;
                }
            }
            println!();
            println!("base_token ids with {DEFAULT_NETWORK}_ prefix: {with_prefix}");
            println!("other/missing ids: {other}");
        }
        None => {
            println!("Response has no data array:");
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
    }
    println!();

    // Run the same extraction the watcher uses
    let decoded: NewPoolsResponse = serde_json::from_value(body)?;
    let candidates = extract_token_addresses(&decoded, DEFAULT_NETWORK);
    println!("--- Extracted candidates ({}) ---", candidates.len());
    for address in &candidates {
        println!("  {address}");
    }

    println!();
    println!("=== Probe complete ===");
    Ok(())
}
