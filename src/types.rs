use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Durable record for a token address that has been seen and notified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRecord {
    pub first_seen: DateTime<Utc>,
    pub notified: bool,
}

/// The watcher's entire durable state: address → record, append-only.
pub type ProcessedTokens = BTreeMap<String, TokenRecord>;

/// Listing response from `/networks/{network}/new_pools`.
///
/// Every nested level is optional so a malformed entry degrades to "no
/// candidate" instead of failing the whole decode.
#[derive(Debug, Deserialize)]
pub struct NewPoolsResponse {
    #[serde(default)]
    pub data: Vec<PoolEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PoolEntry {
    pub relationships: Option<PoolRelationships>,
}

#[derive(Debug, Deserialize)]
pub struct PoolRelationships {
    pub base_token: Option<TokenRef>,
}

#[derive(Debug, Deserialize)]
pub struct TokenRef {
    pub data: Option<TokenRefData>,
}

#[derive(Debug, Deserialize)]
pub struct TokenRefData {
    /// Chain-prefixed token id, e.g. `eth_0xabc...`
    pub id: Option<String>,
}

/// Summary of one watcher pass, emitted as a JSON line on stdout.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub timestamp: String,
    /// Candidate addresses returned by the listing endpoint.
    pub candidates: usize,
    /// Addresses seen for the first time this pass, discovery order.
    pub new_tokens: Vec<String>,
    pub delivered: usize,
    pub failed: usize,
    /// Whether the store was rewritten (false for no-op and dry runs).
    pub saved: bool,
}
