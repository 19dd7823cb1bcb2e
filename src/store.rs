use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::types::ProcessedTokens;

/// Key-value store for processed tokens.
///
/// The orchestrator depends only on this trait, so the flat-file store can be
/// swapped for a bounded backing implementation without touching it.
pub trait TokenStore {
    fn load(&self) -> Result<ProcessedTokens>;
    fn save(&self, tokens: &ProcessedTokens) -> Result<()>;
}

/// Single-file JSON store holding the full processed-token mapping.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for JsonFileStore {
    /// A missing file is an empty mapping; a malformed one is an error the
    /// caller propagates.
    fn load(&self) -> Result<ProcessedTokens> {
        if !self.path.exists() {
            return Ok(ProcessedTokens::new());
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let tokens = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse {}", self.path.display()))?;
        Ok(tokens)
    }

    /// Full rewrite through a sibling temp file renamed over the target, so a
    /// crash mid-write cannot leave a truncated store behind.
    fn save(&self, tokens: &ProcessedTokens) -> Result<()> {
        let contents =
            serde_json::to_string_pretty(tokens).context("failed to serialize token store")?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, contents).with_context(|| format!("failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;
        Ok(())
    }
}
