use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Static blurb shown next to a tracked symbol's chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescriptorEntry {
    pub symbol: String,
    pub title: String,
    pub description: String,
}

/// The tracked-symbol descriptors, loaded once at startup and never mutated.
/// Entry order is the render order of the dashboard panels.
#[derive(Debug, Clone)]
pub struct DescriptorSet {
    entries: Vec<DescriptorEntry>,
}

impl DescriptorSet {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read descriptor file {}", path.display()))?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let entries: Vec<DescriptorEntry> =
            serde_json::from_str(raw).context("descriptor file is not valid JSON")?;
        if entries.is_empty() {
            anyhow::bail!("descriptor file contains no entries");
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[DescriptorEntry] {
        &self.entries
    }

    pub fn symbols(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.symbol.clone()).collect()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.entries.iter().any(|e| e.symbol == symbol)
    }
}
