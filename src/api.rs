use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{debug, warn};

use crate::types::NewPoolsResponse;

/// Fetch candidate token addresses from the new-pools listing endpoint.
///
/// A non-success HTTP status is logged and yields an empty list, which the
/// caller treats the same as a listing with no matching pools. Transport and
/// decode failures bubble up as errors.
pub async fn fetch_new_pool_addresses(
    client: &Client,
    base_url: &str,
    network: &str,
) -> Result<Vec<String>> {
    let url = format!("{base_url}/networks/{network}/new_pools");
    let resp = client
        .get(&url)
        .send()
        .await
        .context("new_pools request failed")?;

    let status = resp.status();
    if !status.is_success() {
        warn!("Listing API returned {status}, treating as no new pools");
        return Ok(Vec::new());
    }

    let body: NewPoolsResponse = resp
        .json()
        .await
        .context("failed to decode new_pools response")?;
    let addresses = extract_token_addresses(&body, network);
    debug!("Extracted {} candidate address(es)", addresses.len());
    Ok(addresses)
}

/// Pull base-token addresses out of a decoded listing response.
///
/// Keeps only ids carrying the `{network}_` prefix and strips it to yield the
/// raw address. Entries with missing nested fields are skipped.
pub fn extract_token_addresses(resp: &NewPoolsResponse, network: &str) -> Vec<String> {
    let prefix = format!("{network}_");
    resp.data
        .iter()
        .filter_map(|pool| {
            pool.relationships
                .as_ref()?
                .base_token
                .as_ref()?
                .data
                .as_ref()?
                .id
                .as_deref()
        })
        .filter_map(|id| id.strip_prefix(&prefix))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: serde_json::Value) -> NewPoolsResponse {
        serde_json::from_value(value).expect("valid listing JSON")
    }

    fn pool_with_id(id: &str) -> serde_json::Value {
        json!({
            "id": format!("{id}_pool"),
            "type": "pool",
            "relationships": {
                "base_token": { "data": { "id": id, "type": "token" } }
            }
        })
    }

    #[test]
    fn extracts_prefixed_addresses_in_order() {
        let resp = decode(json!({
            "data": [pool_with_id("eth_0xAAA"), pool_with_id("eth_0xBBB")]
        }));
        let addresses = extract_token_addresses(&resp, "eth");
        assert_eq!(addresses, vec!["0xAAA", "0xBBB"]);
    }

    #[test]
    fn excludes_other_networks() {
        let resp = decode(json!({
            "data": [
                pool_with_id("eth_0xAAA"),
                pool_with_id("solana_So111"),
                pool_with_id("base_0xBBB"),
            ]
        }));
        let addresses = extract_token_addresses(&resp, "eth");
        assert_eq!(addresses, vec!["0xAAA"]);
    }

    #[test]
    fn tolerates_missing_nested_fields() {
        let resp = decode(json!({
            "data": [
                { "id": "p1", "type": "pool" },
                { "id": "p2", "relationships": {} },
                { "id": "p3", "relationships": { "base_token": {} } },
                { "id": "p4", "relationships": { "base_token": { "data": {} } } },
                pool_with_id("eth_0xCCC"),
            ]
        }));
        let addresses = extract_token_addresses(&resp, "eth");
        assert_eq!(addresses, vec!["0xCCC"]);
    }

    #[test]
    fn empty_and_absent_data() {
        let empty = decode(json!({ "data": [] }));
        assert!(extract_token_addresses(&empty, "eth").is_empty());

        let absent = decode(json!({}));
        assert!(extract_token_addresses(&absent, "eth").is_empty());
    }

    #[test]
    fn prefix_must_match_exactly() {
        // "ethereum_" starts with "eth" but not with the "eth_" prefix
        let resp = decode(json!({
            "data": [pool_with_id("ethereum_0xAAA"), pool_with_id("eth_0xBBB")]
        }));
        let addresses = extract_token_addresses(&resp, "eth");
        assert_eq!(addresses, vec!["0xBBB"]);
    }
}
